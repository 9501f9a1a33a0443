use std::collections::BTreeSet;

use scatter_core::particle::ParticleData;
use scatter_core::registry::{TypeId, TypeRegistry};
use serde::{Deserialize, Serialize};

use crate::config::{CollisionTermConfig, IncludedReaction, NNbarTreatment};

/// Kind of process an outgoing channel represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessKind {
    /// Same particle types in and out.
    Elastic,
    /// Resonance formation.
    TwoToOne,
    /// Inelastic two-body to two-body.
    TwoToTwo,
    /// Three (or more) particles forming one resonance.
    MultiToOne,
    /// Soft string excitation.
    StringSoft,
    /// Hard (perturbative) string excitation.
    StringHard,
}

impl ProcessKind {
    /// Whether the channel is resolved by string fragmentation.
    pub fn is_string(&self) -> bool {
        matches!(self, ProcessKind::StringSoft | ProcessKind::StringHard)
    }
}

/// One weighted outgoing channel of a candidate interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionBranch {
    /// Outgoing particle types; empty for string channels.
    pub products: Vec<TypeId>,
    /// Process kind.
    pub process: ProcessKind,
    /// Partial cross section in mb, or a rate for multi-particle channels.
    pub weight: f64,
}

impl CollisionBranch {
    /// Creates a channel.
    pub fn new(products: Vec<TypeId>, process: ProcessKind, weight: f64) -> Self {
        Self {
            products,
            process,
            weight,
        }
    }

    /// Label used for report columns and tree nodes.
    pub fn description(&self, registry: &TypeRegistry) -> String {
        match self.process {
            ProcessKind::StringSoft => "string (soft)".to_owned(),
            ProcessKind::StringHard => "string (hard)".to_owned(),
            _ => registry.joined_names(&self.products),
        }
    }
}

/// Switches the channel model must honour when enumerating two-body channels.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSettings {
    /// Constant elastic cross section in mb; negative keeps the model's value.
    pub elastic_parameter: f64,
    /// Isotropic angular distributions.
    pub isotropic: bool,
    /// Resonance formation enabled.
    pub two_to_one: bool,
    /// Enabled 2 → 2 families.
    pub included_2to2: BTreeSet<IncludedReaction>,
    /// Elastic NN cutoff in GeV.
    pub elastic_nn_cutoff_sqrts: f64,
    /// String excitation enabled.
    pub strings: bool,
    /// Additive-quark-model fallback enabled.
    pub use_aqm: bool,
    /// Nucleon-antinucleon treatment.
    pub nnbar_treatment: NNbarTreatment,
}

impl From<&CollisionTermConfig> for ChannelSettings {
    fn from(config: &CollisionTermConfig) -> Self {
        Self {
            elastic_parameter: config.elastic_cross_section,
            isotropic: config.isotropic,
            two_to_one: config.two_to_one,
            included_2to2: config.included_2to2.clone(),
            elastic_nn_cutoff_sqrts: config.elastic_nn_cutoff_sqrts,
            strings: config.strings,
            use_aqm: config.use_aqm,
            nnbar_treatment: config.nnbar_treatment,
        }
    }
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self::from(&CollisionTermConfig::default())
    }
}

/// Physics collaborator supplying outgoing channels and their weights.
///
/// Implementations must be deterministic for identical inputs; all draws
/// consumed by the collision criteria happen in the finder.
pub trait ChannelModel: Send + Sync {
    /// All two-body channels of the pair, weights in mb.
    fn collision_channels(
        &self,
        registry: &TypeRegistry,
        a: &ParticleData,
        b: &ParticleData,
        settings: &ChannelSettings,
    ) -> Vec<CollisionBranch>;

    /// Multi-particle channels of the group, weights are rates.
    fn multi_particle_channels(
        &self,
        registry: &TypeRegistry,
        incoming: &[&ParticleData],
    ) -> Vec<CollisionBranch>;

    /// Acceptance probability of a multi-particle channel in one cell and step.
    fn multi_particle_probability(
        &self,
        registry: &TypeRegistry,
        incoming: &[&ParticleData],
        branch: &CollisionBranch,
        dt: f64,
        cell_vol: f64,
    ) -> f64;
}
