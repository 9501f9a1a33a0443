//! Loading of registry, model, run configuration and event files.

use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use scatter_core::errors::{ErrorInfo, ScatterError};
use scatter_core::history::NucleusLayout;
use scatter_core::kinematics::FourVector;
use scatter_core::particle::{Formation, ParticleData, ParticleId};
use scatter_core::registry::TypeRegistry;
use scatter_find::{ChannelSettings, RunConfig, ScatterActionsFinder, TabulatedModel};
use serde::{Deserialize, Serialize};

/// Registry, model and configuration shared by all subcommands.
pub struct Setup {
    /// Particle types and decay modes.
    pub registry: Arc<TypeRegistry>,
    /// Channel model.
    pub model: Arc<TabulatedModel>,
    /// Run configuration.
    pub config: RunConfig,
}

impl Setup {
    /// Reads all three inputs; a missing `config` path selects the defaults.
    pub fn load(
        registry: &Path,
        model: &Path,
        config: Option<&Path>,
    ) -> Result<Self, Box<dyn Error>> {
        let registry = Arc::new(TypeRegistry::from_yaml_str(&fs::read_to_string(registry)?)?);
        let model = Arc::new(TabulatedModel::from_yaml_str(
            &fs::read_to_string(model)?,
            &registry,
        )?);
        let config = match config {
            Some(path) => RunConfig::from_yaml_str(&fs::read_to_string(path)?)?,
            None => RunConfig::default(),
        };
        log::debug!(
            "loaded {} particle types and {} reactions",
            registry.len(),
            model.len()
        );
        Ok(Self {
            registry,
            model,
            config,
        })
    }

    /// Channel switches derived from the collision-term configuration.
    pub fn settings(&self) -> ChannelSettings {
        ChannelSettings::from(&self.config.collision_term)
    }

    /// Finder over this setup.
    pub fn finder(&self, layout: NucleusLayout) -> Result<ScatterActionsFinder, ScatterError> {
        ScatterActionsFinder::new(
            self.config.clone(),
            Arc::clone(&self.registry),
            self.model.clone(),
            layout,
        )
    }
}

/// One particle as written in an event file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleEntry {
    /// Unique id.
    pub id: u32,
    /// Type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Effective mass; the pole mass when absent.
    #[serde(default)]
    pub mass: Option<f64>,
    /// Spatial momentum in GeV.
    pub momentum: [f64; 3],
    /// Four-position `(t, x, y, z)` in fm.
    #[serde(default)]
    pub position: [f64; 4],
    #[serde(default)]
    pub id_process: u32,
    #[serde(default)]
    pub formation: Formation,
}

/// A cell of particles plus the per-step context of a collision search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFile {
    /// Timestep in fm/c.
    pub dt: f64,
    /// Cell volume in fm³; zero outside stochastic runs.
    #[serde(default)]
    pub cell_vol: f64,
    #[serde(default)]
    pub layout: NucleusLayout,
    /// Frozen beam momenta indexed by particle id.
    #[serde(default)]
    pub beam_momentum: Vec<FourVector>,
    /// Interaction-history flags indexed by particle id.
    #[serde(default)]
    pub history: Vec<bool>,
    /// Particles of the searched cell.
    pub particles: Vec<ParticleEntry>,
    /// Particles of neighbouring cells.
    #[serde(default)]
    pub neighbors: Vec<ParticleEntry>,
}

impl EventFile {
    /// Parses a JSON event.
    pub fn from_json_str(json: &str) -> Result<Self, ScatterError> {
        serde_json::from_str(json)
            .map_err(|err| ScatterError::Serde(ErrorInfo::new("event-parse", err.to_string())))
    }

    /// Reads a JSON event file.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        Ok(Self::from_json_str(&fs::read_to_string(path)?)?)
    }
}

/// Resolves event entries against the registry.
pub fn build_particles(
    registry: &TypeRegistry,
    entries: &[ParticleEntry],
) -> Result<Vec<ParticleData>, ScatterError> {
    entries
        .iter()
        .map(|entry| {
            let type_id = registry.find(&entry.type_name)?;
            let mass = entry.mass.unwrap_or(registry.get(type_id).mass);
            let mut particle = ParticleData::new(ParticleId::from_raw(entry.id), type_id, mass);
            let [px, py, pz] = entry.momentum;
            particle.set_4momentum(mass, px, py, pz);
            let [t, x, y, z] = entry.position;
            particle.set_position(FourVector::new(t, x, y, z));
            particle.id_process = entry.id_process;
            particle.formation = entry.formation;
            Ok(particle)
        })
        .collect()
}

/// Writes `text` to `out`, or to stdout when no path is given.
pub fn emit(out: Option<&Path>, text: &str) -> Result<(), Box<dyn Error>> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, text)?;
            log::info!("wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
