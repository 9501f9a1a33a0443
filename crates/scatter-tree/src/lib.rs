#![deny(missing_docs)]

//! Diagnostics on top of the channel model.
//!
//! [`build_tree`] expands a collision's channels into every decay cascade,
//! [`CrossSectionScan`] tabulates partial or final-state cross sections over
//! an energy range and [`dump_reactions`] lists what each pair of
//! iso-multiplets can turn into.

/// Final-state cross sections and their deduplication.
pub mod aggregate;
/// Decay trees of two-body processes.
pub mod decaytree;
/// Reaction listing over all iso-multiplet pairs.
pub mod reactions;
/// Energy scans and fixed-width tables.
pub mod scan;

pub use aggregate::{deduplicate, FinalStateCrossSection};
pub use decaytree::{add_decays, build_tree, Node};
pub use reactions::{dump_reactions, ReactionListing, REACTION_SCAN_MOMENTA};
pub use scan::{
    CrossSectionColumn, CrossSectionScan, CrossSectionTable, ScanOptions, DEFAULT_POINTS,
    MOMENTUM_STEP, TOTAL_COLUMN,
};
