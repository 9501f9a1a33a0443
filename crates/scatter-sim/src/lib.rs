//! Command implementations behind the `scatter-sim` binary.
//!
//! Every subcommand reads a YAML particle registry and a YAML channel model;
//! the run configuration is optional and falls back to its defaults.

pub mod commands;
pub mod inputs;
