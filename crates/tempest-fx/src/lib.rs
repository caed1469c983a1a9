//! Data-driven particle-system descriptors for the Tempest engine.
//!
//! Effect documents (attributed trees, parsed by the platform layer) become
//! typed, immutable descriptors; descriptors instantiate live particle
//! systems owned by whoever asked for them (an attack event, a unit).
//! Descriptors also persist to and restore from save-state documents.

pub mod assets;
pub mod descriptor;
pub mod error;
pub mod projectile;
pub mod registry;
pub mod splash;
pub mod system;

#[cfg(feature = "mem-trace")]
pub mod trace;

pub use assets::{AssetFactory, DocumentReader, ModelRef, ResourceScope, TextureRef};
pub use descriptor::ParticleSystemDescriptor;
pub use error::{AssetError, FxError, Result};
pub use projectile::{ProjectileDescriptor, Trajectory};
pub use registry::{FileReference, LoadRegistry};
pub use splash::SplashDescriptor;
pub use system::{
    BlendMode, OwnerId, ParticleSystem, Primitive, ProjectileParticleSystem,
    SIM_TICKS_PER_SECOND, SplashParticleSystem, State,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
