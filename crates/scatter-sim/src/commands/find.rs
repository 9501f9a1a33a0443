use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use scatter_find::{ActionSummary, CollisionCriterion, StepContext};
use serde::{Deserialize, Serialize};

use crate::inputs::{build_particles, emit, EventFile, Setup};

#[derive(Args, Debug)]
pub struct FindArgs {
    /// YAML particle registry.
    #[arg(long)]
    pub registry: PathBuf,
    /// YAML channel model.
    #[arg(long)]
    pub model: PathBuf,
    /// Optional YAML run configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// JSON event holding the cell's particles and step context.
    #[arg(long)]
    pub event: PathBuf,
    /// Cell index selecting the random substream.
    #[arg(long, default_value_t = 0)]
    pub cell: u64,
    /// Output file; stdout when absent.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Accepted actions of one cell search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindReport {
    pub criterion: CollisionCriterion,
    pub dt: f64,
    pub cell_vol: f64,
    pub actions: Vec<ActionSummary>,
}

pub fn report(args: &FindArgs) -> Result<FindReport, Box<dyn Error>> {
    let setup = Setup::load(&args.registry, &args.model, args.config.as_deref())?;
    let event = EventFile::load(&args.event)?;
    let finder = setup.finder(event.layout)?;
    let particles = build_particles(&setup.registry, &event.particles)?;
    let neighbors = build_particles(&setup.registry, &event.neighbors)?;

    let ctx = StepContext::new(event.dt)
        .with_beam_momentum(&event.beam_momentum)
        .with_history(&event.history);
    let mut rng = finder.cell_rng(args.cell);

    let mut actions = finder.find_actions_in_cell(&particles, event.cell_vol, &ctx, &mut rng)?;
    if !neighbors.is_empty() {
        actions.extend(finder.find_actions_with_neighbors(&particles, &neighbors, &ctx, &mut rng)?);
    }
    log::info!(
        "{} actions among {} particles ({} criterion)",
        actions.len(),
        particles.len() + neighbors.len(),
        finder.criterion().as_str()
    );

    Ok(FindReport {
        criterion: finder.criterion(),
        dt: event.dt,
        cell_vol: event.cell_vol,
        actions: actions
            .iter()
            .map(|action| action.summary(finder.registry()))
            .collect(),
    })
}

pub fn run(args: &FindArgs) -> Result<(), Box<dyn Error>> {
    let report = report(args)?;
    emit(
        args.out.as_deref(),
        &(serde_json::to_string_pretty(&report)? + "\n"),
    )
}
