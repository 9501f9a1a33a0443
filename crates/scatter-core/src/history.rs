//! Initial-nucleus layout and the spectator-exclusion rule.

use serde::{Deserialize, Serialize};

use crate::particle::{ParticleData, ParticleId};

/// Beam side a particle originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeamSide {
    /// Member of the projectile nucleus.
    Projectile,
    /// Member of the target nucleus.
    Target,
    /// Produced particle or not part of an initial nucleus.
    Produced,
}

/// Id ranges of the two initial nuclei.
///
/// Ids `< n_projectile` belong to the projectile, ids in
/// `[n_projectile, n_total)` to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NucleusLayout {
    /// Total number of initial nucleons.
    pub n_total: u32,
    /// Number of projectile nucleons.
    pub n_projectile: u32,
}

impl NucleusLayout {
    /// Creates a layout for `n_projectile` projectile and `n_total - n_projectile`
    /// target nucleons.
    pub fn new(n_total: u32, n_projectile: u32) -> Self {
        Self {
            n_total,
            n_projectile: n_projectile.min(n_total),
        }
    }

    /// Beam side of the particle with the given id.
    pub fn side(&self, id: ParticleId) -> BeamSide {
        let raw = id.as_raw();
        if raw >= self.n_total {
            BeamSide::Produced
        } else if raw < self.n_projectile {
            BeamSide::Projectile
        } else {
            BeamSide::Target
        }
    }

    /// Whether two particles are untouched members of the same initial nucleus.
    ///
    /// Such pairs never collide.
    pub fn is_spectator_pair(
        &self,
        a: &ParticleData,
        b: &ParticleData,
        nucleon_has_interacted: &[bool],
    ) -> bool {
        let side_a = self.side(a.id);
        if side_a == BeamSide::Produced || side_a != self.side(b.id) {
            return false;
        }
        !(has_interacted(nucleon_has_interacted, a.id)
            || has_interacted(nucleon_has_interacted, b.id))
    }
}

/// Reads the history flag of a particle; missing entries mean "not yet".
pub fn has_interacted(nucleon_has_interacted: &[bool], id: ParticleId) -> bool {
    nucleon_has_interacted.get(id.index()).copied().unwrap_or(false)
}
