//! YAML-driven reference channel model.
//!
//! Reactions are listed per unordered incoming pair with either a constant or
//! a Breit-Wigner shaped cross section. The run switches carried by
//! [`ChannelSettings`] are applied on top of the table, and three-particle
//! back-reactions are derived from the registry's decay branches.

use scatter_core::errors::{ErrorInfo, ScatterError};
use scatter_core::kinematics::FourVector;
use scatter_core::particle::ParticleData;
use scatter_core::registry::{TypeId, TypeRegistry};
use serde::{Deserialize, Serialize};

use crate::config::{IncludedReaction, NNbarTreatment};
use crate::model::{ChannelModel, ChannelSettings, CollisionBranch, ProcessKind};

/// Energy dependence of a tabulated cross section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossSectionShape {
    /// Energy-independent value in mb.
    Constant(f64),
    /// Peak value in mb at `mass`, falling off with full width `width` (GeV).
    BreitWigner {
        /// Value at the pole in mb.
        peak: f64,
        /// Pole position in GeV.
        mass: f64,
        /// Full width in GeV.
        width: f64,
    },
}

impl CrossSectionShape {
    /// Cross section at the given centre-of-mass energy.
    pub fn evaluate(&self, sqrts: f64) -> f64 {
        match *self {
            CrossSectionShape::Constant(sigma) => sigma,
            CrossSectionShape::BreitWigner { peak, mass, width } => {
                peak * breit_wigner_profile(sqrts, mass, width)
            }
        }
    }
}

fn breit_wigner_profile(sqrts: f64, mass: f64, width: f64) -> f64 {
    let half_width_sqr = 0.25 * width * width;
    if half_width_sqr <= 0.0 {
        return if (sqrts - mass).abs() < f64::EPSILON { 1.0 } else { 0.0 };
    }
    let offset = sqrts - mass;
    half_width_sqr / (offset * offset + half_width_sqr)
}

/// Reaction entry as written in a model file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionSpec {
    /// The two incoming type names; order is irrelevant.
    pub incoming: Vec<String>,
    /// Outgoing type names; empty for string channels.
    #[serde(default)]
    pub products: Vec<String>,
    /// Process kind.
    pub process: ProcessKind,
    /// Reaction family gated by `included_2to2`.
    #[serde(default)]
    pub family: Option<IncludedReaction>,
    /// Energy dependence.
    pub cross_section: CrossSectionShape,
    /// √s threshold in GeV, added to the product masses except for resonance formation.
    #[serde(default)]
    pub threshold: f64,
}

/// Model file layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TabulatedSpec {
    /// Two-body reactions.
    #[serde(default)]
    pub reactions: Vec<ReactionSpec>,
    /// Elastic reference (mb) for untabulated pairs under the additive quark model.
    #[serde(default)]
    pub aqm_elastic: Option<f64>,
    /// Rate coefficient of three-particle back-reactions; zero disables them.
    #[serde(default)]
    pub multi_particle_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct Reaction {
    incoming: (TypeId, TypeId),
    products: Vec<TypeId>,
    process: ProcessKind,
    family: Option<IncludedReaction>,
    shape: CrossSectionShape,
    threshold: f64,
}

/// Table-driven [`ChannelModel`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabulatedModel {
    reactions: Vec<Reaction>,
    aqm_elastic: Option<f64>,
    multi_particle_rate: f64,
}

fn ordered(a: TypeId, b: TypeId) -> (TypeId, TypeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn model_error(code: &str, message: &str, index: usize) -> ScatterError {
    ScatterError::Config(ErrorInfo::new(code, message).with_context("reaction", index))
}

impl TabulatedModel {
    /// Resolves a parsed model file against the registry.
    pub fn new(spec: TabulatedSpec, registry: &TypeRegistry) -> Result<Self, ScatterError> {
        let mut reactions = Vec::with_capacity(spec.reactions.len());
        for (index, entry) in spec.reactions.into_iter().enumerate() {
            if entry.incoming.len() != 2 {
                return Err(model_error(
                    "reaction-arity",
                    "a reaction needs exactly two incoming types",
                    index,
                ));
            }
            let a = registry.find(&entry.incoming[0])?;
            let b = registry.find(&entry.incoming[1])?;
            let products = entry
                .products
                .iter()
                .map(|name| registry.find(name))
                .collect::<Result<Vec<_>, _>>()?;
            if products.is_empty() && !entry.process.is_string() {
                return Err(model_error(
                    "reaction-products",
                    "only string channels may omit products",
                    index,
                ));
            }
            if entry.process == ProcessKind::MultiToOne {
                return Err(model_error(
                    "reaction-process",
                    "multi-particle channels come from decay branches",
                    index,
                ));
            }
            if entry.process == ProcessKind::Elastic {
                let mut sorted = products.clone();
                sorted.sort();
                let (lo, hi) = ordered(a, b);
                if sorted != [lo, hi] {
                    return Err(model_error(
                        "reaction-elastic",
                        "elastic products must equal the incoming types",
                        index,
                    ));
                }
            }
            reactions.push(Reaction {
                incoming: ordered(a, b),
                products,
                process: entry.process,
                family: entry.family,
                shape: entry.cross_section,
                threshold: entry.threshold,
            });
        }
        if !spec.multi_particle_rate.is_finite() || spec.multi_particle_rate < 0.0 {
            return Err(ScatterError::Config(
                ErrorInfo::new("multi-particle-rate", "rate must be finite and non-negative")
                    .with_context("rate", spec.multi_particle_rate),
            ));
        }
        Ok(Self {
            reactions,
            aqm_elastic: spec.aqm_elastic,
            multi_particle_rate: spec.multi_particle_rate,
        })
    }

    /// Parses a YAML model document.
    pub fn from_yaml_str(yaml: &str, registry: &TypeRegistry) -> Result<Self, ScatterError> {
        let spec: TabulatedSpec = serde_yaml::from_str(yaml)
            .map_err(|err| ScatterError::Serde(ErrorInfo::new("model-parse", err.to_string())))?;
        Self::new(spec, registry)
    }

    /// Number of tabulated reactions.
    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }
}

/// Applies the run switches to one tabulated reaction.
fn admits(reaction: &Reaction, nnbar: bool, settings: &ChannelSettings) -> bool {
    match reaction.process {
        ProcessKind::Elastic => settings.included_2to2.contains(&IncludedReaction::Elastic),
        ProcessKind::TwoToOne => {
            settings.two_to_one
                && !(nnbar && settings.nnbar_treatment != NNbarTreatment::Resonances)
        }
        ProcessKind::TwoToTwo => {
            let family_enabled = reaction
                .family
                .map_or(true, |family| settings.included_2to2.contains(&family));
            let annihilation_enabled = !nnbar
                || (settings.nnbar_treatment == NNbarTreatment::Resonances
                    && settings.included_2to2.contains(&IncludedReaction::NNbar));
            family_enabled && annihilation_enabled
        }
        ProcessKind::StringSoft | ProcessKind::StringHard => {
            settings.strings && !(nnbar && settings.nnbar_treatment != NNbarTreatment::Strings)
        }
        ProcessKind::MultiToOne => false,
    }
}

fn is_nucleon_like(registry: &TypeRegistry, id: TypeId) -> bool {
    let ptype = registry.get(id);
    ptype.baryon_number.abs() == 1 && matches!(ptype.iso_name.as_str(), "N" | "N̅" | "Nbar")
}

fn is_nucleon_antinucleon(registry: &TypeRegistry, a: TypeId, b: TypeId) -> bool {
    is_nucleon_like(registry, a)
        && is_nucleon_like(registry, b)
        && registry.get(a).baryon_number * registry.get(b).baryon_number == -1
}

fn is_nucleon_pair(registry: &TypeRegistry, a: TypeId, b: TypeId) -> bool {
    let (ta, tb) = (registry.get(a), registry.get(b));
    ta.iso_name == "N" && tb.iso_name == "N"
}

fn aqm_factor(registry: &TypeRegistry, a: TypeId, b: TypeId) -> f64 {
    [a, b]
        .iter()
        .map(|id| registry.get(*id).valence_quarks() as f64 / 3.0)
        .product()
}

impl ChannelModel for TabulatedModel {
    fn collision_channels(
        &self,
        registry: &TypeRegistry,
        a: &ParticleData,
        b: &ParticleData,
        settings: &ChannelSettings,
    ) -> Vec<CollisionBranch> {
        let sqrts = (a.momentum + b.momentum).abs();
        let key = ordered(a.type_id, b.type_id);
        let nnbar = is_nucleon_antinucleon(registry, a.type_id, b.type_id);
        let below_nn_cutoff = is_nucleon_pair(registry, a.type_id, b.type_id)
            && sqrts < settings.elastic_nn_cutoff_sqrts;

        let mut channels = Vec::new();
        let mut tabulated = false;
        for reaction in self.reactions.iter().filter(|r| r.incoming == key) {
            tabulated = true;
            if !admits(reaction, nnbar, settings) {
                continue;
            }
            if reaction.process == ProcessKind::Elastic && below_nn_cutoff {
                continue;
            }
            let product_mass = if reaction.process == ProcessKind::TwoToOne {
                0.0
            } else {
                registry.total_mass(&reaction.products)
            };
            let threshold = product_mass + reaction.threshold;
            if sqrts <= threshold {
                continue;
            }
            let weight = if reaction.process == ProcessKind::Elastic
                && settings.elastic_parameter >= 0.0
            {
                settings.elastic_parameter
            } else {
                reaction.shape.evaluate(sqrts)
            };
            if weight > 0.0 {
                channels.push(CollisionBranch::new(
                    reaction.products.clone(),
                    reaction.process,
                    weight,
                ));
            }
        }

        let has_elastic = channels
            .iter()
            .any(|branch| branch.process == ProcessKind::Elastic);
        let elastic_allowed = settings.included_2to2.contains(&IncludedReaction::Elastic)
            && !below_nn_cutoff;
        if !has_elastic && elastic_allowed {
            let fallback = if settings.elastic_parameter >= 0.0 {
                Some(settings.elastic_parameter)
            } else if settings.use_aqm && !tabulated {
                self.aqm_elastic
                    .map(|reference| reference * aqm_factor(registry, a.type_id, b.type_id))
            } else {
                None
            };
            if let Some(weight) = fallback.filter(|w| *w > 0.0) {
                channels.push(CollisionBranch::new(
                    vec![a.type_id, b.type_id],
                    ProcessKind::Elastic,
                    weight,
                ));
            }
        }
        channels
    }

    fn multi_particle_channels(
        &self,
        registry: &TypeRegistry,
        incoming: &[&ParticleData],
    ) -> Vec<CollisionBranch> {
        if self.multi_particle_rate <= 0.0 || incoming.len() < 3 {
            return Vec::new();
        }
        let mut incoming_types: Vec<TypeId> = incoming.iter().map(|p| p.type_id).collect();
        incoming_types.sort();
        let sqrts = incoming
            .iter()
            .map(|p| p.momentum)
            .fold(FourVector::default(), |sum, p| sum + p)
            .abs();

        let mut channels = Vec::new();
        for id in registry.ids() {
            let resonance = registry.get(id);
            if resonance.is_stable() {
                continue;
            }
            for branch in &resonance.decay_modes {
                let mut products = branch.products.clone();
                products.sort();
                if products != incoming_types {
                    continue;
                }
                let weight = self.multi_particle_rate
                    * branch.weight
                    * breit_wigner_profile(sqrts, resonance.mass, resonance.width);
                if weight > 0.0 {
                    channels.push(CollisionBranch::new(vec![id], ProcessKind::MultiToOne, weight));
                }
            }
        }
        channels
    }

    fn multi_particle_probability(
        &self,
        _registry: &TypeRegistry,
        incoming: &[&ParticleData],
        branch: &CollisionBranch,
        dt: f64,
        cell_vol: f64,
    ) -> f64 {
        let energies: f64 = incoming.iter().map(|p| p.momentum.x0).product();
        branch.weight * dt / (cell_vol * cell_vol * energies)
    }
}
