//! Shared fixtures: stub asset factory, map-backed document reader, and
//! effect-document builders.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tempest_fx::{
    AssetError, AssetFactory, DocumentReader, LoadRegistry, ModelRef, ResourceScope, TextureRef,
};
use tempest_tree::TreeNode;

/// Records every factory call and hands out sequential handles.
#[derive(Default)]
pub struct StubFactory {
    pub textures: Vec<(PathBuf, bool)>,
    pub models: Vec<PathBuf>,
}

impl AssetFactory for StubFactory {
    fn new_texture_2d(
        &mut self,
        _scope: ResourceScope,
        path: &Path,
        luminance: bool,
    ) -> Result<TextureRef, AssetError> {
        self.textures.push((path.to_path_buf(), luminance));
        Ok(TextureRef(self.textures.len() as u64))
    }

    fn new_model(
        &mut self,
        _scope: ResourceScope,
        path: &Path,
        _is_static: bool,
        _registry: &mut LoadRegistry,
        _parent_loader: &str,
    ) -> Result<ModelRef, AssetError> {
        self.models.push(path.to_path_buf());
        Ok(ModelRef(self.models.len() as u64))
    }
}

/// Serves pre-built documents by path, like the platform parser would.
#[derive(Default)]
pub struct MapReader {
    documents: HashMap<PathBuf, TreeNode>,
}

impl MapReader {
    pub fn with(mut self, path: impl Into<PathBuf>, document: TreeNode) -> Self {
        self.documents.insert(path.into(), document);
        self
    }
}

impl DocumentReader for MapReader {
    fn read(&self, path: &Path, _asset_root: &Path) -> Result<TreeNode, AssetError> {
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| format!("no document at '{}'", path.display()).into())
    }
}

fn add_value_node(root: &mut TreeNode, name: &str, value: &str) {
    root.add_child(name).add_attribute("value", value);
}

fn add_color_node(root: &mut TreeNode, name: &str, rgba: [&str; 4]) {
    let node = root.add_child(name);
    node.add_attribute("red", rgba[0]);
    node.add_attribute("green", rgba[1]);
    node.add_attribute("blue", rgba[2]);
    node.add_attribute("alpha", rgba[3]);
}

/// A complete, valid base effect document. Speed 72/s and gravity 4/s per
/// the document contract; loaders normalize those to per-tick values.
pub fn base_effect_doc() -> TreeNode {
    let mut root = TreeNode::new("particle-system");

    let texture = root.add_child("texture");
    texture.add_attribute("value", "true");
    texture.add_attribute("luminance", "false");
    texture.add_attribute("path", "images/flame.png");

    add_value_node(&mut root, "primitive", "quad");

    let offset = root.add_child("offset");
    offset.add_attribute("x", "0.0");
    offset.add_attribute("y", "1.5");
    offset.add_attribute("z", "0.0");

    add_color_node(&mut root, "color", ["1.0", "0.5", "0.25", "1.0"]);
    add_color_node(&mut root, "color-no-energy", ["0.5", "0.25", "0.0", "0.0"]);

    add_value_node(&mut root, "size", "1.2");
    add_value_node(&mut root, "size-no-energy", "0.4");
    add_value_node(&mut root, "speed", "72");
    add_value_node(&mut root, "gravity", "4");
    add_value_node(&mut root, "emission-rate", "20");
    add_value_node(&mut root, "energy-max", "60");
    add_value_node(&mut root, "energy-var", "15");

    root
}

/// A base document plus a parabolic trajectory block with scale 2.5 and no
/// frequency node.
pub fn parabolic_projectile_doc() -> TreeNode {
    let mut root = base_effect_doc();
    let trajectory = root.add_child("trajectory");
    trajectory.add_attribute("type", "parabolic");
    trajectory.add_child("speed").add_attribute("value", "120");
    trajectory.add_child("scale").add_attribute("value", "2.5");
    root
}

/// A base document plus fade and spread blocks.
pub fn splash_doc(vertical_a: &str, vertical_b: &str) -> TreeNode {
    let mut root = base_effect_doc();
    add_value_node(&mut root, "emission-rate-fade", "0.5");

    let vertical = root.add_child("vertical-spread");
    vertical.add_attribute("a", vertical_a);
    vertical.add_attribute("b", vertical_b);

    let horizontal = root.add_child("horizontal-spread");
    horizontal.add_attribute("a", "0.75");
    horizontal.add_attribute("b", "0.25");

    root
}
