//! Attributed document tree for the Tempest engine's data-driven loaders.
//!
//! Effect definitions, per-placement overrides, and save-state snapshots all
//! travel through this tree shape. The text format and its parser live in
//! the platform layer; this crate only defines the node/attribute model, the
//! typed accessors loaders rely on, and override-vs-base resolution.

pub mod error;
pub mod node;

pub use error::{Result, TreeError};
pub use node::{Attribute, ResolvedNode, TreeNode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
