#![deny(missing_docs)]
#![doc = "Core types for the scatter engine: kinematics, particle-type registry, particle records, structured errors and deterministic randomness."]

pub mod constants;
pub mod errors;
pub mod history;
pub mod kinematics;
pub mod particle;
pub mod registry;
pub mod rng;

pub use errors::{ErrorInfo, ScatterError};
pub use history::{has_interacted, BeamSide, NucleusLayout};
pub use kinematics::{pcm_from_s, s_from_plab, FourVector, ThreeVector};
pub use particle::{Formation, ParticleData, ParticleId};
pub use registry::{
    DecayBranch, DecaySpec, ParticleType, ParticleTypeSpec, RegistrySpec, TypeId, TypeRegistry,
};
pub use rng::{derive_substream_seed, RandomSource, RngHandle};
