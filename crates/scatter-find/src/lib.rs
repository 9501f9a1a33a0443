#![deny(missing_docs)]

//! Collision criteria and candidate enumeration for the scatter engine.
//!
//! A [`ScatterActionsFinder`] decides, for every candidate pair or triple of
//! particles in one timestep, whether it interacts under the configured
//! [`CollisionCriterion`]. Outgoing channels are supplied by a
//! [`ChannelModel`]; [`TabulatedModel`] is the YAML-driven reference model.

/// Accepted interaction descriptors.
pub mod action;
/// YAML run configuration and its defaults.
pub mod config;
/// Pair and multi-particle evaluators plus the candidate enumerator.
pub mod finder;
/// Channel-model boundary.
pub mod model;
/// Table-driven channel model.
pub mod tabulated;

pub use action::{Action, ActionKind, ActionSummary, ChannelSummary};
pub use config::{
    CollisionCriterion, CollisionTermConfig, IncludedReaction, NNbarTreatment, RunConfig,
    StringParameters,
};
pub use finder::{ScatterActionsFinder, StepContext};
pub use model::{ChannelModel, ChannelSettings, CollisionBranch, ProcessKind};
pub use tabulated::{CrossSectionShape, ReactionSpec, TabulatedModel, TabulatedSpec};
