use serde::{Deserialize, Serialize};

/// Exclusive cross section of one final state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalStateCrossSection {
    /// Concatenated names of the final-state particles.
    pub name: String,
    /// Cross section in mb.
    pub cross_section: f64,
    /// Summed pole mass of the final-state particles in GeV.
    pub mass: f64,
}

impl FinalStateCrossSection {
    /// Creates an entry.
    pub fn new(name: impl Into<String>, cross_section: f64, mass: f64) -> Self {
        Self {
            name: name.into(),
            cross_section,
            mass,
        }
    }
}

/// Sorts entries by name and merges equal names by summing their cross sections.
///
/// The first entry of each run keeps its mass. Applying it twice changes nothing.
pub fn deduplicate(entries: &mut Vec<FinalStateCrossSection>) {
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    let mut merged: Vec<FinalStateCrossSection> = Vec::with_capacity(entries.len());
    for entry in entries.drain(..) {
        match merged.last_mut() {
            Some(last) if last.name == entry.name => last.cross_section += entry.cross_section,
            _ => merged.push(entry),
        }
    }
    *entries = merged;
}
