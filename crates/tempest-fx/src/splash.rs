//! Splash descriptor: the impact burst paired with a projectile.

use std::path::Path;

use tempest_tree::{ResolvedNode, TreeNode};

use crate::assets::{AssetFactory, DocumentReader};
use crate::descriptor::{ParticleSystemDescriptor, read_document};
use crate::error::Result;
use crate::registry::LoadRegistry;
use crate::system::{OwnerId, SplashParticleSystem, State};

/// Save-state tag for the splash specialization fields.
pub const SPLASH_SAVE_TAG: &str = "ParticleSystemTypeSplash";

/// Descriptor for the splash particle system of an attack: the base field
/// set plus emission fade and spread parameters.
#[derive(Debug, Clone, Default)]
pub struct SplashDescriptor {
    pub base: ParticleSystemDescriptor,
    /// Emission-rate falloff per tick while the splash winds down
    pub emission_rate_fade: f32,
    /// Vertical spread amplitude, clamped to [0, 1]
    pub vertical_spread_a: f32,
    /// Vertical spread offset, clamped to [-1, 1]
    pub vertical_spread_b: f32,
    /// Horizontal spread amplitude, clamped to [0, 1]
    pub horizontal_spread_a: f32,
    /// Horizontal spread offset, clamped to [-1, 1]
    pub horizontal_spread_b: f32,
}

impl SplashDescriptor {
    /// Loads the splash document at `path`, optionally merged with an
    /// inline override node (inline wins), then layers the fade and spread
    /// fields over the base field set. Spread fields are read
    /// unconditionally and clamped to their documented ranges.
    ///
    /// Any failure aborts the whole load with the document path attached.
    #[allow(clippy::too_many_arguments)]
    pub fn load(
        override_node: Option<&TreeNode>,
        dir: &Path,
        path: &Path,
        reader: &dyn DocumentReader,
        factory: &mut dyn AssetFactory,
        registry: &mut LoadRegistry,
        parent_loader: &str,
        asset_root: &Path,
    ) -> Result<Self> {
        let document = read_document(reader, path, asset_root, registry, parent_loader)?;
        let node = match override_node {
            Some(over) => ResolvedNode::with_base(over, &document),
            None => ResolvedNode::new(&document),
        };

        Self::load_resolved(
            node,
            dir,
            reader,
            factory,
            registry,
            parent_loader,
            asset_root,
        )
        .map_err(|e| e.in_file(path))
    }

    #[allow(clippy::too_many_arguments)]
    fn load_resolved(
        node: ResolvedNode<'_>,
        dir: &Path,
        reader: &dyn DocumentReader,
        factory: &mut dyn AssetFactory,
        registry: &mut LoadRegistry,
        parent_loader: &str,
        asset_root: &Path,
    ) -> Result<Self> {
        let base = ParticleSystemDescriptor::load(
            node,
            dir,
            reader,
            factory,
            registry,
            parent_loader,
            asset_root,
        )?;

        let emission_rate_fade = node
            .child("emission-rate-fade")?
            .attribute("value")?
            .float_value()?;

        let vertical = node.child("vertical-spread")?;
        let vertical_spread_a = vertical.attribute("a")?.float_value_clamped(0.0, 1.0)?;
        let vertical_spread_b = vertical.attribute("b")?.float_value_clamped(-1.0, 1.0)?;

        let horizontal = node.child("horizontal-spread")?;
        let horizontal_spread_a = horizontal.attribute("a")?.float_value_clamped(0.0, 1.0)?;
        let horizontal_spread_b = horizontal.attribute("b")?.float_value_clamped(-1.0, 1.0)?;

        Ok(Self {
            base,
            emission_rate_fade,
            vertical_spread_a,
            vertical_spread_b,
            horizontal_spread_a,
            horizontal_spread_b,
        })
    }

    /// Builds a live splash system owned by `owner`. No failure path;
    /// fields were validated at load time.
    pub fn create(&self, owner: OwnerId) -> SplashParticleSystem {
        let mut ps = SplashParticleSystem::new(owner);
        self.base.apply_to(&mut ps.system);
        ps.system.state = State::Play;
        ps.emission_rate_fade = self.emission_rate_fade;
        ps.vertical_spread_a = self.vertical_spread_a;
        ps.vertical_spread_b = self.vertical_spread_b;
        ps.horizontal_spread_a = self.horizontal_spread_a;
        ps.horizontal_spread_b = self.horizontal_spread_b;
        ps
    }

    /// Writes the base field set and a sibling `ParticleSystemTypeSplash`
    /// node with the fade and spread fields.
    pub fn save_state(&self, parent: &mut TreeNode) {
        self.base.save_state(parent);

        let node = parent.add_child(SPLASH_SAVE_TAG);
        node.add_attribute_f32("emissionRateFade", self.emission_rate_fade);
        node.add_attribute_f32("verticalSpreadA", self.vertical_spread_a);
        node.add_attribute_f32("verticalSpreadB", self.vertical_spread_b);
        node.add_attribute_f32("horizontalSpreadA", self.horizontal_spread_a);
        node.add_attribute_f32("horizontalSpreadB", self.horizontal_spread_b);
    }

    /// Restores a splash descriptor from its two save-state nodes.
    pub fn load_state(parent: &TreeNode) -> Result<Self> {
        let base = ParticleSystemDescriptor::load_state(parent)?;

        let node = parent.child(SPLASH_SAVE_TAG)?;
        Ok(Self {
            base,
            emission_rate_fade: node.attribute("emissionRateFade")?.float_value()?,
            vertical_spread_a: node.attribute("verticalSpreadA")?.float_value()?,
            vertical_spread_b: node.attribute("verticalSpreadB")?.float_value()?,
            horizontal_spread_a: node.attribute("horizontalSpreadA")?.float_value()?,
            horizontal_spread_b: node.attribute("horizontalSpreadB")?.float_value()?,
        })
    }
}
