use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use scatter_tree::{CrossSectionScan, CrossSectionTable, ScanOptions};

use crate::inputs::{emit, Setup};

#[derive(Args, Debug)]
pub struct CrossSectionsArgs {
    /// YAML particle registry.
    #[arg(long)]
    pub registry: PathBuf,
    /// YAML channel model.
    #[arg(long)]
    pub model: PathBuf,
    /// Optional YAML run configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Name of the first particle type.
    pub a: String,
    /// Name of the second particle type.
    pub b: String,
    /// Report exclusive final states instead of partial processes.
    #[arg(long)]
    pub final_state: bool,
    /// Comma-separated projectile lab momenta in GeV.
    #[arg(long, value_delimiter = ',')]
    pub plab: Vec<f64>,
    /// Mass of the first particle; defaults to its pole mass.
    #[arg(long)]
    pub mass_a: Option<f64>,
    /// Mass of the second particle; defaults to its pole mass.
    #[arg(long)]
    pub mass_b: Option<f64>,
    /// Emit JSON instead of the fixed-width table.
    #[arg(long)]
    pub json: bool,
    /// Output file; stdout when absent.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn table(args: &CrossSectionsArgs) -> Result<CrossSectionTable, Box<dyn Error>> {
    let setup = Setup::load(&args.registry, &args.model, args.config.as_deref())?;
    let a = setup.registry.find(&args.a)?;
    let b = setup.registry.find(&args.b)?;
    let settings = setup.settings();
    let options = ScanOptions {
        final_state: args.final_state,
        plab: args.plab.clone(),
        mass_a: args.mass_a,
        mass_b: args.mass_b,
    };
    let scan = CrossSectionScan::new(&setup.registry, setup.model.as_ref(), &settings);
    let table = scan.dump_cross_sections(a, b, &options);
    log::info!(
        "{} cross sections: {} columns at {} energies ({} empty channels dropped)",
        table.pair,
        table.columns.len(),
        table.sqrts.len(),
        table.dropped_zero_channels
    );
    Ok(table)
}

pub fn run(args: &CrossSectionsArgs) -> Result<(), Box<dyn Error>> {
    let table = table(args)?;
    let text = if args.json {
        serde_json::to_string_pretty(&table)? + "\n"
    } else {
        table.render()
    };
    emit(args.out.as_deref(), &text)
}
