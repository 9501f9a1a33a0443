//! YAML run configuration and its defaults.

use std::collections::BTreeSet;

use scatter_core::errors::{ErrorInfo, ScatterError};
use serde::{Deserialize, Serialize};

/// Decision procedure used to accept or reject candidate collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CollisionCriterion {
    /// Transverse distance in the pair's centre-of-momentum frame.
    #[default]
    Geometric,
    /// Collision probability per cell and timestep.
    Stochastic,
    /// Manifestly covariant transverse distance.
    Covariant,
}

impl CollisionCriterion {
    /// Name used in logs and error payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionCriterion::Geometric => "Geometric",
            CollisionCriterion::Stochastic => "Stochastic",
            CollisionCriterion::Covariant => "Covariant",
        }
    }
}

/// Reaction families that can be switched on individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IncludedReaction {
    /// Elastic scattering.
    Elastic,
    /// NN → N N*.
    #[serde(rename = "NN_to_NR")]
    NnToNr,
    /// NN → Δ R.
    #[serde(rename = "NN_to_DR")]
    NnToDr,
    /// KN → KN.
    #[serde(rename = "KN_to_KN")]
    KnToKn,
    /// KN → KΔ.
    #[serde(rename = "KN_to_KDelta")]
    KnToKDelta,
    /// Strangeness exchange.
    #[serde(rename = "Strangeness_exchange")]
    StrangenessExchange,
    /// Nucleon-antinucleon reactions.
    #[serde(rename = "NNbar")]
    NNbar,
}

impl IncludedReaction {
    /// Every reaction family.
    pub fn all() -> BTreeSet<IncludedReaction> {
        [
            IncludedReaction::Elastic,
            IncludedReaction::NnToNr,
            IncludedReaction::NnToDr,
            IncludedReaction::KnToKn,
            IncludedReaction::KnToKDelta,
            IncludedReaction::StrangenessExchange,
            IncludedReaction::NNbar,
        ]
        .into_iter()
        .collect()
    }
}

/// How nucleon-antinucleon annihilation is modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NNbarTreatment {
    /// Only elastic N N̄ scattering.
    #[serde(rename = "no annihilation")]
    NoAnnihilation,
    /// Annihilation through resonance channels.
    #[serde(rename = "resonances")]
    Resonances,
    /// Annihilation through string excitation.
    #[default]
    #[serde(rename = "strings")]
    Strings,
}

/// String-excitation parameters forwarded to the execution stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringParameters {
    /// Formation time of string fragments in fm/c.
    #[serde(default = "default_formation_time")]
    pub formation_time: f64,
}

fn default_formation_time() -> f64 {
    1.0
}

impl Default for StringParameters {
    fn default() -> Self {
        Self {
            formation_time: default_formation_time(),
        }
    }
}

/// Collision-term section of the run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionTermConfig {
    /// Active collision criterion.
    #[serde(default)]
    pub collision_criterion: CollisionCriterion,
    /// Constant elastic cross section in mb; negative keeps the model's value.
    #[serde(default = "default_elastic_cross_section")]
    pub elastic_cross_section: f64,
    /// Perform all collisions isotropically.
    #[serde(default)]
    pub isotropic: bool,
    /// Allow resonance formation (2 → 1).
    #[serde(default = "default_true")]
    pub two_to_one: bool,
    /// Enabled 2 → 2 reaction families.
    #[serde(default = "IncludedReaction::all")]
    pub included_2to2: BTreeSet<IncludedReaction>,
    /// Elastic NN collisions below this √s (GeV) are forbidden.
    #[serde(default = "default_elastic_nn_cutoff")]
    pub elastic_nn_cutoff_sqrts: f64,
    /// Enable string excitation.
    #[serde(default = "default_true")]
    pub strings: bool,
    /// Use the additive quark model for unparametrized pairs.
    #[serde(default = "default_true")]
    pub use_aqm: bool,
    /// Nucleon-antinucleon treatment.
    #[serde(default)]
    pub nnbar_treatment: NNbarTreatment,
    /// String-excitation parameters.
    #[serde(default)]
    pub string_parameters: StringParameters,
}

fn default_elastic_cross_section() -> f64 {
    -1.0
}

fn default_true() -> bool {
    true
}

fn default_elastic_nn_cutoff() -> f64 {
    1.98
}

impl Default for CollisionTermConfig {
    fn default() -> Self {
        Self {
            collision_criterion: CollisionCriterion::default(),
            elastic_cross_section: default_elastic_cross_section(),
            isotropic: false,
            two_to_one: true,
            included_2to2: IncludedReaction::all(),
            elastic_nn_cutoff_sqrts: default_elastic_nn_cutoff(),
            strings: true,
            use_aqm: true,
            nnbar_treatment: NNbarTreatment::default(),
            string_parameters: StringParameters::default(),
        }
    }
}

/// YAML-configurable parameters for a collision-finding run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Test-particle multiplicity; cross sections are divided by it.
    #[serde(default = "default_testparticles")]
    pub testparticles: u32,
    /// Master seed for all probability draws.
    #[serde(default = "default_master_seed")]
    pub seed: u64,
    /// Collision-term settings.
    #[serde(default)]
    pub collision_term: CollisionTermConfig,
}

fn default_testparticles() -> u32 {
    1
}

fn default_master_seed() -> u64 {
    0x05EE_D5EE_DD15_5EED_u64
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            testparticles: default_testparticles(),
            seed: default_master_seed(),
            collision_term: CollisionTermConfig::default(),
        }
    }
}

fn config_error(code: &str, message: impl Into<String>) -> ScatterError {
    ScatterError::Config(ErrorInfo::new(code, message))
}

impl RunConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ScatterError> {
        let config: RunConfig = serde_yaml::from_str(yaml)
            .map_err(|err| ScatterError::Serde(ErrorInfo::new("config-parse", err.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ScatterError> {
        if self.testparticles == 0 {
            return Err(config_error(
                "testparticles",
                "test-particle multiplicity must be at least 1",
            ));
        }
        let term = &self.collision_term;
        if !term.elastic_cross_section.is_finite() {
            return Err(config_error(
                "elastic-cross-section",
                "elastic cross section must be finite",
            ));
        }
        if !term.string_parameters.formation_time.is_finite()
            || term.string_parameters.formation_time < 0.0
        {
            return Err(config_error(
                "formation-time",
                "string formation time must be non-negative",
            ));
        }
        if term.elastic_nn_cutoff_sqrts > 2.02 {
            log::warn!(
                "elastic NN cutoff {} GeV lies above the NN → NNπ threshold",
                term.elastic_nn_cutoff_sqrts
            );
        }
        Ok(())
    }
}
