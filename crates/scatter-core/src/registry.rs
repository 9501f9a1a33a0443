//! Particle-type and decay-mode registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::WIDTH_CUTOFF;
use crate::errors::{ErrorInfo, ScatterError};

/// Identifier of a particle type within a [`TypeRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeId(u32);

impl TypeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u32 {
        self.0
    }

    fn index(&self) -> usize {
        self.0 as usize
    }
}

/// One decay channel of an unstable particle type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayBranch {
    /// Product types of the decay.
    pub products: Vec<TypeId>,
    /// Branching ratio, normalized per parent type.
    pub weight: f64,
}

/// Static properties of a particle species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleType {
    /// Display name, unique within the registry.
    pub name: String,
    /// Name of the isospin multiplet the type belongs to.
    pub iso_name: String,
    /// Pole mass in GeV.
    pub mass: f64,
    /// Total width in GeV.
    pub width: f64,
    /// Electric charge in units of e.
    pub charge: i32,
    /// Baryon number.
    pub baryon_number: i32,
    /// Strangeness.
    pub strangeness: i32,
    /// Decay channels; empty for stable types.
    pub decay_modes: Vec<DecayBranch>,
}

impl ParticleType {
    /// Whether the type is treated as stable.
    pub fn is_stable(&self) -> bool {
        self.width < WIDTH_CUTOFF
    }

    /// Whether the type is a baryon (positive baryon number).
    pub fn is_baryon(&self) -> bool {
        self.baryon_number > 0
    }

    /// Number of valence quarks (3 for (anti)baryons, 2 for mesons).
    pub fn valence_quarks(&self) -> u32 {
        if self.baryon_number != 0 {
            3
        } else {
            2
        }
    }
}

/// Decay branch as written in a registry file, products referenced by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecaySpec {
    /// Unnormalized branching weight.
    pub weight: f64,
    /// Product type names.
    pub products: Vec<String>,
}

/// Particle type as written in a registry file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleTypeSpec {
    /// Unique type name.
    pub name: String,
    /// Isospin multiplet name; defaults to the type name.
    #[serde(default)]
    pub iso: String,
    /// Pole mass in GeV.
    pub mass: f64,
    /// Width in GeV.
    #[serde(default)]
    pub width: f64,
    /// Electric charge.
    #[serde(default)]
    pub charge: i32,
    /// Baryon number.
    #[serde(default)]
    pub baryon_number: i32,
    /// Strangeness.
    #[serde(default)]
    pub strangeness: i32,
    /// Decay channels.
    #[serde(default)]
    pub decays: Vec<DecaySpec>,
}

/// Registry file layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RegistrySpec {
    /// All particle types.
    pub particles: Vec<ParticleTypeSpec>,
}

/// Read-only lookup of particle types and their decay modes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeRegistry {
    types: Vec<ParticleType>,
    by_name: BTreeMap<String, TypeId>,
}

impl TypeRegistry {
    /// Builds a registry, resolving decay products and normalizing branch weights.
    pub fn new(spec: RegistrySpec) -> Result<Self, ScatterError> {
        let mut by_name = BTreeMap::new();
        for (index, particle) in spec.particles.iter().enumerate() {
            if particle.name.is_empty() {
                return Err(ScatterError::Registry(
                    ErrorInfo::new("empty-name", "particle type without a name")
                        .with_context("index", index),
                ));
            }
            if !particle.mass.is_finite() || particle.mass < 0.0 {
                return Err(ScatterError::Registry(
                    ErrorInfo::new("invalid-mass", "pole mass must be finite and non-negative")
                        .with_context("type", &particle.name)
                        .with_context("mass", particle.mass),
                ));
            }
            let id = TypeId::from_raw(index as u32);
            if by_name.insert(particle.name.clone(), id).is_some() {
                return Err(ScatterError::Registry(
                    ErrorInfo::new("duplicate-type", "particle type defined twice")
                        .with_context("type", &particle.name),
                ));
            }
        }

        let mut types = Vec::with_capacity(spec.particles.len());
        for particle in spec.particles {
            let mut decay_modes = Vec::with_capacity(particle.decays.len());
            for decay in &particle.decays {
                if decay.products.is_empty() {
                    return Err(ScatterError::Registry(
                        ErrorInfo::new("empty-decay", "decay branch without products")
                            .with_context("type", &particle.name),
                    ));
                }
                if !decay.weight.is_finite() || decay.weight < 0.0 {
                    return Err(ScatterError::Registry(
                        ErrorInfo::new("invalid-weight", "branching weight must be non-negative")
                            .with_context("type", &particle.name)
                            .with_context("weight", decay.weight),
                    ));
                }
                let products = decay
                    .products
                    .iter()
                    .map(|name| {
                        by_name.get(name).copied().ok_or_else(|| {
                            ScatterError::Registry(
                                ErrorInfo::new("unknown-product", "decay product is not registered")
                                    .with_context("type", &particle.name)
                                    .with_context("product", name),
                            )
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                decay_modes.push(DecayBranch {
                    products,
                    weight: decay.weight,
                });
            }
            let total: f64 = decay_modes.iter().map(|branch| branch.weight).sum();
            if total > 0.0 {
                for branch in &mut decay_modes {
                    branch.weight /= total;
                }
            }
            let iso_name = if particle.iso.is_empty() {
                particle.name.clone()
            } else {
                particle.iso
            };
            types.push(ParticleType {
                name: particle.name,
                iso_name,
                mass: particle.mass,
                width: particle.width,
                charge: particle.charge,
                baryon_number: particle.baryon_number,
                strangeness: particle.strangeness,
                decay_modes,
            });
        }

        if let Some(index) = decay_cycle(&types) {
            return Err(ScatterError::Registry(
                ErrorInfo::new("decay-cycle", "decay chain leads back to its parent type")
                    .with_context("type", &types[index].name)
                    .with_hint("every decay must end in stable types"),
            ));
        }

        Ok(Self { types, by_name })
    }

    /// Parses a YAML registry document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ScatterError> {
        let spec: RegistrySpec = serde_yaml::from_str(yaml).map_err(|err| {
            ScatterError::Serde(ErrorInfo::new("registry-parse", err.to_string()))
        })?;
        Self::new(spec)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry has no types.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns the type for an identifier.
    ///
    /// Identifiers are only minted by this registry, so a foreign id is a
    /// programming error.
    pub fn get(&self, id: TypeId) -> &ParticleType {
        &self.types[id.index()]
    }

    /// Looks up a type identifier by name.
    pub fn find(&self, name: &str) -> Result<TypeId, ScatterError> {
        self.by_name.get(name).copied().ok_or_else(|| {
            ScatterError::Registry(
                ErrorInfo::new("unknown-type", "particle type is not registered")
                    .with_context("type", name),
            )
        })
    }

    /// Iterates over all identifiers in registration order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = TypeId> + '_ {
        (0..self.types.len()).map(|index| TypeId::from_raw(index as u32))
    }

    /// Iso-multiplet names in order of first appearance, each with its member states.
    pub fn iso_multiplets(&self) -> Vec<(String, Vec<TypeId>)> {
        let mut multiplets: Vec<(String, Vec<TypeId>)> = Vec::new();
        for id in self.ids() {
            let iso = &self.get(id).iso_name;
            match multiplets.iter_mut().find(|(name, _)| name == iso) {
                Some((_, states)) => states.push(id),
                None => multiplets.push((iso.clone(), vec![id])),
            }
        }
        multiplets
    }

    /// Sum of the pole masses of the given types.
    pub fn total_mass(&self, ids: &[TypeId]) -> f64 {
        ids.iter().map(|id| self.get(*id).mass).sum()
    }

    /// Concatenated names of the given types.
    pub fn joined_names(&self, ids: &[TypeId]) -> String {
        ids.iter().map(|id| self.get(*id).name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Visit {
    Pending,
    Active,
    Finished,
}

/// Index of a type reachable from itself through decay products, if any.
fn decay_cycle(types: &[ParticleType]) -> Option<usize> {
    fn visit(index: usize, types: &[ParticleType], marks: &mut [Visit]) -> Option<usize> {
        match marks[index] {
            Visit::Active => return Some(index),
            Visit::Finished => return None,
            Visit::Pending => {}
        }
        marks[index] = Visit::Active;
        for branch in &types[index].decay_modes {
            for product in &branch.products {
                if let Some(found) = visit(product.index(), types, marks) {
                    return Some(found);
                }
            }
        }
        marks[index] = Visit::Finished;
        None
    }

    let mut marks = vec![Visit::Pending; types.len()];
    (0..types.len()).find_map(|index| visit(index, types, &mut marks))
}
