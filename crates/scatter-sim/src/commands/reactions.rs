use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use scatter_tree::{dump_reactions, ReactionListing};

use crate::inputs::{emit, Setup};

#[derive(Args, Debug)]
pub struct ReactionsArgs {
    /// YAML particle registry.
    #[arg(long)]
    pub registry: PathBuf,
    /// YAML channel model.
    #[arg(long)]
    pub model: PathBuf,
    /// Optional YAML run configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output file; stdout when absent.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn listing(args: &ReactionsArgs) -> Result<ReactionListing, Box<dyn Error>> {
    let setup = Setup::load(&args.registry, &args.model, args.config.as_deref())?;
    Ok(dump_reactions(
        &setup.registry,
        setup.model.as_ref(),
        &setup.settings(),
    ))
}

pub fn run(args: &ReactionsArgs) -> Result<(), Box<dyn Error>> {
    let listing = listing(args)?;
    emit(args.out.as_deref(), &listing.render())
}
