//! Mesh data and the fixed-function model render pass for the Tempest
//! engine.
//!
//! [`ModelRenderer`] walks a [`Model`]'s mesh list inside a begin/end
//! bracket and issues the correct state and draw sequence against a
//! [`GraphicsDevice`], choosing the buffered path for static geometry when
//! the device supports it and the immediate-array path otherwise. A
//! color-picking mode renders flat-colored geometry for selection
//! hit-testing.

pub mod device;
pub mod mesh;
pub mod render;

pub use device::{
    ArrayKind, ArrayPointer, BlendFactor, Capability, FrontFace, GraphicsDevice, IndexPointer,
};
pub use mesh::{BufferId, Mesh, MeshBuffers, MeshFlags, Model, TextureId};
pub use render::{MeshCallback, ModelRenderer, RenderFlags, RenderMode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
