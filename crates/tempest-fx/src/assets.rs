//! Collaborator interfaces for asset resolution and document reading.
//!
//! The renderer owns the texture/model caches; descriptor loading only asks
//! it for handles and records every file it touches in the [`LoadRegistry`].

use std::path::Path;

use tempest_tree::TreeNode;

use crate::error::AssetError;
use crate::registry::LoadRegistry;

/// Which cache an asset belongs to (controls unload timing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceScope {
    /// Lives for the whole process
    Global,
    /// Unloaded when leaving the menu
    Menu,
    /// Unloaded when the game ends
    Game,
}

/// Weak handle into the renderer's texture cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureRef(pub u64);

/// Weak handle into the renderer's model cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelRef(pub u64);

/// Renderer-provided factory for textures and models.
///
/// Failures are the factory's own contract and propagate through descriptor
/// loading unchanged.
pub trait AssetFactory {
    /// Loads a 2D texture. `luminance` selects a single-channel alpha
    /// format instead of RGBA.
    fn new_texture_2d(
        &mut self,
        scope: ResourceScope,
        path: &Path,
        luminance: bool,
    ) -> std::result::Result<TextureRef, AssetError>;

    /// Loads a model, recording its own sub-file dependencies into the
    /// registry under `parent_loader`.
    fn new_model(
        &mut self,
        scope: ResourceScope,
        path: &Path,
        is_static: bool,
        registry: &mut LoadRegistry,
        parent_loader: &str,
    ) -> std::result::Result<ModelRef, AssetError>;
}

/// Reads a structured document into an attributed tree.
///
/// Stands in for the platform's text parser when a child effect or a
/// specialization document has to be loaded from its own file. `asset_root`
/// is the root of the active asset tree, available to implementations for
/// shared-data path substitution.
pub trait DocumentReader {
    fn read(&self, path: &Path, asset_root: &Path)
    -> std::result::Result<TreeNode, AssetError>;
}
