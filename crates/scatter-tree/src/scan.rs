//! Energy scans of partial and final-state cross sections.

use std::collections::BTreeMap;

use scatter_core::constants::REALLY_SMALL;
use scatter_core::kinematics::{pcm_from_s, s_from_plab};
use scatter_core::particle::{ParticleData, ParticleId};
use scatter_core::registry::{TypeId, TypeRegistry};
use scatter_find::{ChannelModel, ChannelSettings, ScatterActionsFinder};
use serde::{Deserialize, Serialize};

use crate::aggregate::deduplicate;
use crate::decaytree::build_tree;

/// Number of default scan points.
pub const DEFAULT_POINTS: usize = 200;
/// Centre-of-mass momentum step of the default scan in GeV.
pub const MOMENTUM_STEP: f64 = 0.02;

/// Name of the column holding the total cross section.
pub const TOTAL_COLUMN: &str = "total";

/// Options of a cross-section scan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Report exclusive final states instead of partial processes.
    #[serde(default)]
    pub final_state: bool,
    /// Projectile lab momenta in GeV; empty selects the default grid.
    #[serde(default)]
    pub plab: Vec<f64>,
    /// Mass of the first particle; the pole mass when absent.
    #[serde(default)]
    pub mass_a: Option<f64>,
    /// Mass of the second particle; the pole mass when absent.
    #[serde(default)]
    pub mass_b: Option<f64>,
}

/// One column of a [`CrossSectionTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSectionColumn {
    /// Channel or final-state name.
    pub name: String,
    /// Summed pole mass of the products; `-1` for the total.
    pub mass: f64,
    /// `(sqrts, cross section)` pairs in scan order.
    pub values: Vec<(f64, f64)>,
}

impl CrossSectionColumn {
    /// Cross section at `sqrts`, zero when the column has no value there.
    pub fn value_at(&self, sqrts: f64) -> f64 {
        self.values
            .iter()
            .find(|(energy, _)| (energy - sqrts).abs() < REALLY_SMALL)
            .map_or(0.0, |(_, xs)| *xs)
    }
}

/// Result of a cross-section scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSectionTable {
    /// Concatenated names of the colliding pair.
    pub pair: String,
    /// Centre-of-mass energies of the rows in GeV.
    pub sqrts: Vec<f64>,
    /// Columns ordered by ascending product mass.
    pub columns: Vec<CrossSectionColumn>,
    /// Columns left out because they vanish at every energy.
    pub dropped_zero_channels: usize,
}

impl CrossSectionTable {
    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&CrossSectionColumn> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Fixed-width text rendering.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "# Dumping partial {} cross-sections in mb, energies in GeV\n",
            self.pair
        ));
        out.push_str("   sqrt_s");
        for column in &self.columns {
            out.push_str(&format!("{:>16}", column.name));
        }
        out.push('\n');
        for sqrts in &self.sqrts {
            out.push_str(&format!("{sqrts:9.6}"));
            for column in &self.columns {
                out.push_str(&format!("{:16.6}", column.value_at(*sqrts)));
            }
            out.push('\n');
        }
        out
    }
}

/// Cross-section scanner over a pair of particle types.
pub struct CrossSectionScan<'a> {
    registry: &'a TypeRegistry,
    model: &'a dyn ChannelModel,
    settings: &'a ChannelSettings,
}

impl<'a> CrossSectionScan<'a> {
    /// Scanner over an explicit model and settings.
    pub fn new(
        registry: &'a TypeRegistry,
        model: &'a dyn ChannelModel,
        settings: &'a ChannelSettings,
    ) -> Self {
        Self {
            registry,
            model,
            settings,
        }
    }

    /// Scanner sharing the finder's registry, model and settings.
    pub fn from_finder(finder: &'a ScatterActionsFinder) -> Self {
        Self::new(finder.registry(), finder.model(), finder.settings())
    }

    /// Centre-of-mass momenta of the scan points.
    ///
    /// Lab momenta are sorted and deduplicated before conversion.
    pub fn momenta(plab: &[f64], mass_a: f64, mass_b: f64) -> Vec<f64> {
        if plab.is_empty() {
            return (0..DEFAULT_POINTS)
                .map(|i| MOMENTUM_STEP * (i + 1) as f64)
                .collect();
        }
        let mut plab = plab.to_vec();
        plab.sort_by(f64::total_cmp);
        plab.dedup();
        plab.into_iter()
            .map(|p| pcm_from_s(s_from_plab(p, mass_a, mass_b), mass_a, mass_b))
            .collect()
    }

    fn pair_at(
        &self,
        a: TypeId,
        b: TypeId,
        mass_a: f64,
        mass_b: f64,
        pcm: f64,
    ) -> [ParticleData; 2] {
        let mut first = ParticleData::new(ParticleId::from_raw(0), a, mass_a);
        let mut second = ParticleData::new(ParticleId::from_raw(1), b, mass_b);
        first.set_4momentum(mass_a, pcm, 0.0, 0.0);
        second.set_4momentum(mass_b, -pcm, 0.0, 0.0);
        [first, second]
    }

    /// Scans partial (or final-state) cross sections of `a` + `b`.
    pub fn dump_cross_sections(
        &self,
        a: TypeId,
        b: TypeId,
        options: &ScanOptions,
    ) -> CrossSectionTable {
        let registry = self.registry;
        let mass_a = options.mass_a.unwrap_or(registry.get(a).mass);
        let mass_b = options.mass_b.unwrap_or(registry.get(b).mass);

        let mut dump: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
        let mut masses: BTreeMap<String, f64> = BTreeMap::new();
        let mut energies = Vec::new();

        for pcm in Self::momenta(&options.plab, mass_a, mass_b) {
            let [first, second] = self.pair_at(a, b, mass_a, mass_b, pcm);
            let sqrts = (first.momentum + second.momentum).abs();
            energies.push(sqrts);

            let channels = self
                .model
                .collision_channels(registry, &first, &second, self.settings);
            let total: f64 = channels.iter().map(|channel| channel.weight).sum();
            dump.entry(TOTAL_COLUMN.to_owned())
                .or_default()
                .push((sqrts, total));
            masses.insert(TOTAL_COLUMN.to_owned(), -1.0);

            if options.final_state {
                let tree = build_tree(registry, a, b, &channels, sqrts);
                let mut final_states = tree.final_state_cross_sections(registry);
                deduplicate(&mut final_states);
                for entry in final_states {
                    // String channels leave no named final state.
                    if entry.name.is_empty() {
                        continue;
                    }
                    masses.insert(entry.name.clone(), entry.mass);
                    dump.entry(entry.name)
                        .or_default()
                        .push((sqrts, entry.cross_section));
                }
                continue;
            }

            for channel in channels.iter().filter(|channel| channel.weight > 0.0) {
                let description = channel.description(registry);
                masses.insert(description.clone(), registry.total_mass(&channel.products));
                let column = dump.entry(description).or_default();
                match column.last_mut() {
                    Some(last) if (last.0 - sqrts).abs() < REALLY_SMALL => {
                        last.1 += channel.weight;
                    }
                    _ => column.push((sqrts, channel.weight)),
                }
            }
        }

        let before = dump.len();
        dump.retain(|name, values| {
            name == TOTAL_COLUMN || values.iter().map(|(_, xs)| xs).sum::<f64>() != 0.0
        });
        let dropped_zero_channels = before - dump.len();
        if dropped_zero_channels > 0 {
            log::debug!("dropped {dropped_zero_channels} channels without cross section");
        }

        let mut columns: Vec<CrossSectionColumn> = dump
            .into_iter()
            .map(|(name, values)| CrossSectionColumn {
                mass: masses.get(&name).copied().unwrap_or(0.0),
                name,
                values,
            })
            .collect();
        columns.sort_by(|x, y| x.mass.total_cmp(&y.mass));

        CrossSectionTable {
            pair: registry.joined_names(&[a, b]),
            sqrts: energies,
            columns,
            dropped_zero_channels,
        }
    }
}
