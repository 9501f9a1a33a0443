use std::error::Error;

use clap::{Parser, Subcommand};
use env_logger::Env;
use scatter_sim::commands::{
    cross_sections::{self, CrossSectionsArgs},
    find::{self, FindArgs},
    reactions::{self, ReactionsArgs},
};

#[derive(Parser, Debug)]
#[command(name = "scatter-sim", about = "Collision finding and cross-section diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tabulate partial or final-state cross sections of one pair.
    CrossSections(CrossSectionsArgs),
    /// List the reactions of every pair of iso-multiplets.
    Reactions(ReactionsArgs),
    /// Run the collision criteria on one cell of particles.
    Find(FindArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::CrossSections(args) => cross_sections::run(&args),
        Command::Reactions(args) => reactions::run(&args),
        Command::Find(args) => find::run(&args),
    }
}
