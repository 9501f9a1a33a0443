//! Read-only particle records consumed by the collision criteria.

use serde::{Deserialize, Serialize};

use crate::kinematics::{FourVector, ThreeVector};
use crate::registry::TypeId;

/// Unique, non-negative particle identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticleId(u32);

impl ParticleId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u32 {
        self.0
    }

    /// Index into per-particle tables such as the interaction history.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

fn default_scaling() -> f64 {
    1.0
}

/// Formation record controlling the time-dependent cross-section scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    /// Time at which formation starts (fm).
    #[serde(default)]
    pub begin_time: f64,
    /// Time at which the particle is fully formed (fm).
    #[serde(default)]
    pub formation_time: f64,
    /// Scaling factor before formation starts.
    #[serde(default = "default_scaling")]
    pub initial_factor: f64,
    /// Growth power; non-positive values select a step function.
    #[serde(default)]
    pub power: f64,
}

impl Default for Formation {
    fn default() -> Self {
        Self {
            begin_time: 0.0,
            formation_time: 0.0,
            initial_factor: default_scaling(),
            power: 0.0,
        }
    }
}

impl Formation {
    /// Cross-section scaling factor at `time`.
    pub fn scaling_factor(&self, time: f64) -> f64 {
        if self.power <= 0.0 {
            if time < self.formation_time {
                self.initial_factor
            } else {
                1.0
            }
        } else if time >= self.formation_time {
            1.0
        } else if time <= self.begin_time {
            self.initial_factor
        } else {
            let fraction =
                (time - self.begin_time) / (self.formation_time - self.begin_time);
            self.initial_factor + (1.0 - self.initial_factor) * fraction.powf(self.power)
        }
    }
}

/// Snapshot of one simulated particle.
///
/// Owned by the simulation's particle store; the engine only ever borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleData {
    /// Unique identifier.
    pub id: ParticleId,
    /// Species of the particle.
    pub type_id: TypeId,
    /// Four-momentum in GeV.
    pub momentum: FourVector,
    /// Four-position in fm.
    pub position: FourVector,
    /// Identifier of the last process the particle took part in (0 = none).
    #[serde(default)]
    pub id_process: u32,
    /// Formation record for cross-section scaling.
    #[serde(default)]
    pub formation: Formation,
}

impl ParticleData {
    /// Creates a formed particle at rest at the origin with the given mass.
    pub fn new(id: ParticleId, type_id: TypeId, mass: f64) -> Self {
        Self {
            id,
            type_id,
            momentum: FourVector::new(mass, 0.0, 0.0, 0.0),
            position: FourVector::default(),
            id_process: 0,
            formation: Formation::default(),
        }
    }

    /// Sets an on-shell momentum for the given mass and spatial momentum.
    pub fn set_4momentum(&mut self, mass: f64, px: f64, py: f64, pz: f64) {
        self.momentum = FourVector::on_shell(mass, ThreeVector::new(px, py, pz));
    }

    /// Sets the four-position.
    pub fn set_position(&mut self, position: FourVector) {
        self.position = position;
    }

    /// Effective (invariant) mass from the four-momentum.
    pub fn effective_mass(&self) -> f64 {
        self.momentum.abs()
    }

    /// Three-velocity `p/E`.
    pub fn velocity(&self) -> ThreeVector {
        self.momentum.velocity()
    }

    /// Cross-section scaling factor `delta_time` after the particle's current time.
    pub fn xsec_scaling_factor(&self, delta_time: f64) -> f64 {
        self.formation.scaling_factor(self.position.x0 + delta_time)
    }
}
