//! Base particle-system descriptor: document loading, save-state
//! persistence, and live-system instantiation.
//!
//! Descriptors are built once at asset-load time and are immutable
//! afterwards except through explicit clone/assign. Children are owned
//! descriptors of unbounded depth; `Clone` deep-copies the whole subtree.

use std::path::Path;

use glam::{Vec3, Vec4};
use log::debug;

use tempest_tree::{ResolvedNode, TreeNode};

use crate::assets::{AssetFactory, DocumentReader, ModelRef, ResourceScope, TextureRef};
use crate::error::{FxError, Result};
use crate::registry::LoadRegistry;
use crate::system::{BlendMode, ParticleSystem, Primitive, SIM_TICKS_PER_SECOND, State};

/// Save-state tag for a top-level descriptor.
pub const SAVE_TAG: &str = "ParticleSystemType";
/// Save-state tag for nested child descriptors.
pub const CHILD_SAVE_TAG: &str = "UnitParticleSystemType";

/// Static parameters of a particle effect, loaded from an effect document.
#[derive(Debug, Clone)]
pub struct ParticleSystemDescriptor {
    /// Type identifier, assigned by the owning asset (unit type, weapon)
    pub type_name: String,
    /// Particle texture, if the document enables one
    pub texture: Option<TextureRef>,
    /// Particle model, if the document enables one
    pub model: Option<ModelRef>,
    /// Model animation-cycle duration, never negative
    pub model_cycle: f32,
    pub primitive: Primitive,
    /// Spatial offset from the emitting object
    pub offset: Vec3,
    /// Base color, channels in [0, 1]
    pub color: Vec4,
    /// Color when the particle runs out of energy, channels in [0, 1]
    pub color_no_energy: Vec4,
    pub size: f32,
    pub size_no_energy: f32,
    /// Per-tick speed (document value / tick rate)
    pub speed: f32,
    /// Per-tick gravity (document value / tick rate)
    pub gravity: f32,
    pub emission_rate: f32,
    pub energy_max: i32,
    pub energy_var: i32,
    pub blend_mode: BlendMode,
    pub teamcolor_energy: bool,
    pub teamcolor_no_energy: bool,
    pub alternations: i32,
    /// Ticks to wait before the system starts playing
    pub start_delay: i32,
    /// Owned child descriptors; order is render/update order
    pub children: Vec<ParticleSystemDescriptor>,
    /// HP gate: only show the effect inside the [min_hp, max_hp] band.
    /// Not read from effect documents; set by the owning asset and
    /// round-tripped by save-state persistence.
    pub hp_gate_enabled: bool,
    pub min_hp: i32,
    pub max_hp: i32,
    pub hp_gate_is_percent: bool,
}

impl Default for ParticleSystemDescriptor {
    fn default() -> Self {
        #[cfg(feature = "mem-trace")]
        crate::trace::descriptor_created();

        Self {
            type_name: String::new(),
            texture: None,
            model: None,
            model_cycle: 0.0,
            primitive: Primitive::Quad,
            offset: Vec3::ZERO,
            color: Vec4::ONE,
            color_no_energy: Vec4::ONE,
            size: 0.0,
            size_no_energy: 0.0,
            speed: 0.0,
            gravity: 0.0,
            emission_rate: 0.0,
            energy_max: 0,
            energy_var: 0,
            blend_mode: BlendMode::Normal,
            teamcolor_energy: false,
            teamcolor_no_energy: false,
            alternations: 0,
            start_delay: 0,
            children: Vec::new(),
            hp_gate_enabled: false,
            min_hp: 0,
            max_hp: 0,
            hp_gate_is_percent: false,
        }
    }
}

impl ParticleSystemDescriptor {
    /// Reads every base field from `node`.
    ///
    /// Texture and model resolution goes through `factory`; every file
    /// touched is recorded in `registry` under `parent_loader`. Child
    /// descriptors are parsed only when the `child-particles` flag is true;
    /// each child's own document is read through `reader` and merged with
    /// the inline entry, inline attributes and nodes taking precedence.
    #[allow(clippy::too_many_arguments)]
    pub fn load(
        node: ResolvedNode<'_>,
        dir: &Path,
        reader: &dyn DocumentReader,
        factory: &mut dyn AssetFactory,
        registry: &mut LoadRegistry,
        parent_loader: &str,
        asset_root: &Path,
    ) -> Result<Self> {
        let mut desc = Self::default();

        // texture
        let texture_node = node.child("texture")?;
        if texture_node.attribute("value")?.bool_value()? {
            let luminance = texture_node.attribute("luminance")?.bool_value()?;
            let path_attr = texture_node.attribute("path")?;
            let path = path_attr.path_value(dir)?;
            let texture = factory
                .new_texture_2d(ResourceScope::Game, &path, luminance)
                .map_err(FxError::Asset)?;
            registry.record(&path, parent_loader, path_attr.restricted_value()?);
            debug!("loaded particle texture '{}'", path.display());
            desc.texture = Some(texture);
        }

        // model
        if let Some(model_node) = node.try_child("model") {
            if model_node.attribute("value")?.bool_value()? {
                let path_attr = model_node.attribute("path")?;
                let path = path_attr.path_value(dir)?;
                let model = factory
                    .new_model(ResourceScope::Game, &path, false, registry, parent_loader)
                    .map_err(FxError::Asset)?;
                registry.record(&path, parent_loader, path_attr.restricted_value()?);
                debug!("loaded particle model '{}'", path.display());
                desc.model = Some(model);

                if let Some(cycles_node) = model_node.try_child("cycles") {
                    let value = cycles_node.attribute("value")?.float_value()?;
                    if value < 0.0 {
                        return Err(FxError::NegativeModelCycle { value });
                    }
                    desc.model_cycle = value;
                }
            }
        }

        // primitive
        let primitive_node = node.child("primitive")?;
        desc.primitive = Primitive::from_str(primitive_node.attribute("value")?.restricted_value()?)?;

        // offset
        let offset_node = node.child("offset")?;
        desc.offset = Vec3::new(
            offset_node.attribute("x")?.float_value()?,
            offset_node.attribute("y")?.float_value()?,
            offset_node.attribute("z")?.float_value()?,
        );

        // colors, each channel clamped to [0, 1]
        desc.color = read_color(node.child("color")?)?;
        desc.color_no_energy = read_color(node.child("color-no-energy")?)?;

        // sizes
        desc.size = node.child("size")?.attribute("value")?.float_value()?;
        desc.size_no_energy = node
            .child("size-no-energy")?
            .attribute("value")?
            .float_value()?;

        // per-second document values become per-tick
        desc.speed =
            node.child("speed")?.attribute("value")?.float_value()? / SIM_TICKS_PER_SECOND;
        desc.gravity =
            node.child("gravity")?.attribute("value")?.float_value()? / SIM_TICKS_PER_SECOND;

        // emission
        desc.emission_rate = node
            .child("emission-rate")?
            .attribute("value")?
            .float_value()?;
        desc.energy_max = node.child("energy-max")?.attribute("value")?.int_value()?;
        desc.energy_var = node.child("energy-var")?.attribute("value")?.int_value()?;

        // optional nodes with documented defaults
        if let Some(n) = node.try_child("teamcolorNoEnergy") {
            desc.teamcolor_no_energy = n.attribute("value")?.bool_value()?;
        }
        if let Some(n) = node.try_child("teamcolorEnergy") {
            desc.teamcolor_energy = n.attribute("value")?.bool_value()?;
        }
        if let Some(n) = node.try_child("alternations") {
            desc.alternations = n.attribute("value")?.int_value()?;
        }
        if let Some(n) = node.try_child("particleSystemStartDelay") {
            desc.start_delay = n.attribute("value")?.int_value()?;
        }
        if let Some(n) = node.try_child("mode") {
            desc.blend_mode = BlendMode::from_str(n.attribute("value")?.restricted_value()?)?;
        }

        // child particle systems
        if let Some(children_node) = node.try_child("child-particles") {
            if children_node.attribute("value")?.bool_value()? {
                for file_node in children_node.children_named("particle-file") {
                    let rel = file_node.attribute("path")?.restricted_value()?.to_string();
                    let child_path = dir.join(&rel);
                    let child_dir = child_path
                        .parent()
                        .map_or_else(Default::default, Path::to_path_buf);
                    let child = Self::load_from_file(
                        Some(file_node),
                        &child_dir,
                        &child_path,
                        reader,
                        factory,
                        registry,
                        parent_loader,
                        asset_root,
                    )?;
                    registry.record(&child_path, parent_loader, &rel);
                    desc.children.push(child);
                }
            }
        }

        Ok(desc)
    }

    /// Loads a descriptor whose document lives in its own file, optionally
    /// merged with an inline override node (the inline node wins).
    ///
    /// Any failure aborts the whole load with the document path attached;
    /// no partial descriptor is left installed.
    #[allow(clippy::too_many_arguments)]
    pub fn load_from_file(
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
        let resolved = match override_node {
            Some(over) => ResolvedNode::with_base(over, &document),
            None => ResolvedNode::new(&document),
        };
        Self::load(
            resolved,
            dir,
            reader,
            factory,
            registry,
            parent_loader,
            asset_root,
        )
        .map_err(|e| e.in_file(path))
    }

    /// Copies every field onto `system` and instantiates one playing child
    /// system per child descriptor, in descriptor order, all wired to the
    /// same owner. Fields were validated at load time; this cannot fail.
    pub fn apply_to(&self, system: &mut ParticleSystem) {
        for child_desc in &self.children {
            let mut child = ParticleSystem::new(system.owner());
            child_desc.apply_to(&mut child);
            child.state = State::Play;
            system.add_child(child);
        }
        system.texture = self.texture;
        system.model = self.model;
        system.model_cycle = self.model_cycle;
        system.primitive = self.primitive;
        system.offset = self.offset;
        system.color = self.color;
        system.color_no_energy = self.color_no_energy;
        system.particle_size = self.size;
        system.size_no_energy = self.size_no_energy;
        system.speed = self.speed;
        system.gravity = self.gravity;
        system.emission_rate = self.emission_rate;
        system.energy_max = self.energy_max;
        system.energy_var = self.energy_var;
        system.blend_mode = self.blend_mode;
        system.teamcolor_energy = self.teamcolor_energy;
        system.teamcolor_no_energy = self.teamcolor_no_energy;
        system.alternations = self.alternations;
        system.start_delay = self.start_delay;
    }

    // ----- save-state persistence -----

    /// Writes the full field set (children recursively) as a
    /// `ParticleSystemType` child of `parent`.
    pub fn save_state(&self, parent: &mut TreeNode) {
        self.save_state_as(parent, SAVE_TAG);
    }

    pub(crate) fn save_state_as(&self, parent: &mut TreeNode, tag: &str) {
        let node = parent.add_child(tag);
        node.add_attribute("type", &self.type_name);
        node.add_attribute_f32("modelCycle", self.model_cycle);
        node.add_attribute("primitive", self.primitive.as_str());
        node.add_attribute("offset", fmt_vec3(self.offset));
        node.add_attribute("color", fmt_vec4(self.color));
        node.add_attribute("colorNoEnergy", fmt_vec4(self.color_no_energy));
        node.add_attribute_f32("size", self.size);
        node.add_attribute_f32("sizeNoEnergy", self.size_no_energy);
        node.add_attribute_f32("speed", self.speed);
        node.add_attribute_f32("gravity", self.gravity);
        node.add_attribute_f32("emissionRate", self.emission_rate);
        node.add_attribute_i32("energyMax", self.energy_max);
        node.add_attribute_i32("energyVar", self.energy_var);
        node.add_attribute("mode", self.blend_mode.as_str());
        node.add_attribute_bool("teamcolorNoEnergy", self.teamcolor_no_energy);
        node.add_attribute_bool("teamcolorEnergy", self.teamcolor_energy);
        node.add_attribute_i32("alternations", self.alternations);
        node.add_attribute_i32("particleSystemStartDelay", self.start_delay);
        for child in &self.children {
            child.save_state_as(node, CHILD_SAVE_TAG);
        }
        node.add_attribute_bool("minmaxEnabled", self.hp_gate_enabled);
        node.add_attribute_i32("minHp", self.min_hp);
        node.add_attribute_i32("maxHp", self.max_hp);
        node.add_attribute_bool("minmaxIsPercent", self.hp_gate_is_percent);
    }

    /// Restores a descriptor from the `ParticleSystemType` child of
    /// `parent`. Texture and model handles are not persisted; they are
    /// re-resolved by the owning asset on load.
    pub fn load_state(parent: &TreeNode) -> Result<Self> {
        Self::from_state_node(parent.child(SAVE_TAG)?)
    }

    pub(crate) fn from_state_node(node: &TreeNode) -> Result<Self> {
        let mut desc = Self::default();
        desc.type_name = node.attribute("type")?.value().to_string();
        desc.model_cycle = node.attribute("modelCycle")?.float_value()?;
        desc.primitive = Primitive::from_str(node.attribute("primitive")?.value())?;
        desc.offset = parse_vec3(node.attribute("offset")?.value())?;
        desc.color = parse_vec4(node.attribute("color")?.value())?;
        desc.color_no_energy = parse_vec4(node.attribute("colorNoEnergy")?.value())?;
        desc.size = node.attribute("size")?.float_value()?;
        desc.size_no_energy = node.attribute("sizeNoEnergy")?.float_value()?;
        desc.speed = node.attribute("speed")?.float_value()?;
        desc.gravity = node.attribute("gravity")?.float_value()?;
        desc.emission_rate = node.attribute("emissionRate")?.float_value()?;
        desc.energy_max = node.attribute("energyMax")?.int_value()?;
        desc.energy_var = node.attribute("energyVar")?.int_value()?;
        desc.blend_mode = BlendMode::from_str(node.attribute("mode")?.value())?;
        desc.teamcolor_no_energy = node.attribute("teamcolorNoEnergy")?.int_value()? != 0;
        desc.teamcolor_energy = node.attribute("teamcolorEnergy")?.int_value()? != 0;
        desc.alternations = node.attribute("alternations")?.int_value()?;
        desc.start_delay = node.attribute("particleSystemStartDelay")?.int_value()?;
        for child_node in node.children_named(CHILD_SAVE_TAG) {
            desc.children.push(Self::from_state_node(child_node)?);
        }
        desc.hp_gate_enabled = node.attribute("minmaxEnabled")?.int_value()? != 0;
        desc.min_hp = node.attribute("minHp")?.int_value()?;
        desc.max_hp = node.attribute("maxHp")?.int_value()?;
        desc.hp_gate_is_percent = node.attribute("minmaxIsPercent")?.int_value()? != 0;
        Ok(desc)
    }
}

/// Reads a document and records the read in the registry.
pub(crate) fn read_document(
    reader: &dyn DocumentReader,
    path: &Path,
    asset_root: &Path,
    registry: &mut LoadRegistry,
    parent_loader: &str,
) -> Result<TreeNode> {
    let document = reader
        .read(path, asset_root)
        .map_err(FxError::Asset)
        .map_err(|e| e.in_file(path))?;
    registry.record(path, parent_loader, parent_loader);
    Ok(document)
}

fn read_color(node: &TreeNode) -> Result<Vec4> {
    Ok(Vec4::new(
        node.attribute("red")?.float_value_clamped(0.0, 1.0)?,
        node.attribute("green")?.float_value_clamped(0.0, 1.0)?,
        node.attribute("blue")?.float_value_clamped(0.0, 1.0)?,
        node.attribute("alpha")?.float_value_clamped(0.0, 1.0)?,
    ))
}

pub(crate) fn fmt_vec3(v: Vec3) -> String {
    format!("{:.6} {:.6} {:.6}", v.x, v.y, v.z)
}

pub(crate) fn fmt_vec4(v: Vec4) -> String {
    format!("{:.6} {:.6} {:.6} {:.6}", v.x, v.y, v.z, v.w)
}

fn parse_components<const N: usize>(value: &str) -> Result<[f32; N]> {
    let mut out = [0.0f32; N];
    let mut parts = value.split_whitespace();
    for slot in &mut out {
        *slot = parts
            .next()
            .and_then(|p| p.parse::<f32>().ok())
            .ok_or_else(|| FxError::MalformedVector {
                value: value.to_string(),
                expected: N,
            })?;
    }
    if parts.next().is_some() {
        return Err(FxError::MalformedVector {
            value: value.to_string(),
            expected: N,
        });
    }
    Ok(out)
}

pub(crate) fn parse_vec3(value: &str) -> Result<Vec3> {
    let [x, y, z] = parse_components::<3>(value)?;
    Ok(Vec3::new(x, y, z))
}

pub(crate) fn parse_vec4(value: &str) -> Result<Vec4> {
    let [x, y, z, w] = parse_components::<4>(value)?;
    Ok(Vec4::new(x, y, z, w))
}
