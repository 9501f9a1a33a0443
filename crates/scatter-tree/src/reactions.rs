//! Listing of every reaction the channel model can produce.

use scatter_core::particle::{ParticleData, ParticleId};
use scatter_core::registry::{TypeId, TypeRegistry};
use scatter_find::{ChannelModel, ChannelSettings, CollisionBranch, ProcessKind};
use serde::{Deserialize, Serialize};

/// Centre-of-mass momenta probed for every pair, in GeV.
pub const REACTION_SCAN_MOMENTA: [f64; 8] = [0.1, 0.3, 0.5, 1.0, 2.0, 3.0, 5.0, 10.0];

/// Reactions grouped by pair of iso-multiplets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReactionListing {
    /// Number of iso-multiplets in the registry.
    pub iso_types: usize,
    /// Number of distinct multiplet pairs, `n (n - 1) / 2`.
    pub pairs: usize,
    /// One comma-separated line per multiplet pair with a nonzero cross section.
    pub lines: Vec<String>,
}

impl ReactionListing {
    /// Text rendering with the two summary lines first.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} iso-particle types.\n", self.iso_types));
        out.push_str(&format!("They can make {} pairs.\n", self.pairs));
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

fn iso_names(registry: &TypeRegistry, ids: &[TypeId]) -> String {
    ids.iter()
        .map(|id| registry.get(*id).iso_name.as_str())
        .collect()
}

fn describe(registry: &TypeRegistry, a: TypeId, b: TypeId, channel: &CollisionBranch) -> String {
    let incoming = iso_names(registry, &[a, b]);
    if channel.process.is_string() {
        return format!("{incoming} → strings");
    }
    let tag = match channel.process {
        ProcessKind::Elastic => "el",
        ProcessKind::TwoToTwo => "inel",
        _ => "?",
    };
    format!(
        "{incoming} → {} ({tag})",
        iso_names(registry, &channel.products)
    )
}

/// Lists the reactions of every pair of iso-multiplets.
///
/// Each pair of member states is probed at [`REACTION_SCAN_MOMENTA`];
/// momenta where the total cross section vanishes contribute nothing.
/// Within one multiplet only pairs with `a <= b` are probed.
pub fn dump_reactions(
    registry: &TypeRegistry,
    model: &dyn ChannelModel,
    settings: &ChannelSettings,
) -> ReactionListing {
    let multiplets = registry.iso_multiplets();
    let iso_types = multiplets.len();
    let mut listing = ReactionListing {
        iso_types,
        pairs: iso_types * iso_types.saturating_sub(1) / 2,
        lines: Vec::new(),
    };

    for (i, (_, states_a)) in multiplets.iter().enumerate() {
        for (offset, (_, states_b)) in multiplets[i..].iter().enumerate() {
            let same_multiplet = offset == 0;
            let mut any_nonzero = false;
            let mut reactions = Vec::new();
            for &a in states_a {
                for &b in states_b {
                    if same_multiplet && a > b {
                        continue;
                    }
                    let mass_a = registry.get(a).mass;
                    let mass_b = registry.get(b).mass;
                    let mut first = ParticleData::new(ParticleId::from_raw(0), a, mass_a);
                    let mut second = ParticleData::new(ParticleId::from_raw(1), b, mass_b);
                    for pcm in REACTION_SCAN_MOMENTA {
                        first.set_4momentum(mass_a, pcm, 0.0, 0.0);
                        second.set_4momentum(mass_b, -pcm, 0.0, 0.0);
                        let channels =
                            model.collision_channels(registry, &first, &second, settings);
                        let total: f64 = channels.iter().map(|channel| channel.weight).sum();
                        if total <= 0.0 {
                            continue;
                        }
                        any_nonzero = true;
                        reactions.extend(
                            channels
                                .iter()
                                .map(|channel| describe(registry, a, b, channel)),
                        );
                    }
                }
            }
            if !any_nonzero {
                continue;
            }
            reactions.sort();
            reactions.dedup();
            listing.lines.push(reactions.join(", "));
        }
    }
    listing
}
