//! Trajectory-driven projectile descriptor.

use std::path::Path;

use tempest_tree::{ResolvedNode, TreeNode};

use crate::assets::{AssetFactory, DocumentReader};
use crate::descriptor::{ParticleSystemDescriptor, read_document};
use crate::error::{FxError, Result};
use crate::registry::LoadRegistry;
use crate::system::{OwnerId, ProjectileParticleSystem, SIM_TICKS_PER_SECOND, State};

/// Save-state tag for the projectile specialization fields.
pub const PROJECTILE_SAVE_TAG: &str = "ParticleSystemTypeProjectile";

/// Flight path of a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trajectory {
    #[default]
    Straight,
    Parabolic,
    Spiral,
}

impl Trajectory {
    /// Parse the restricted document string.
    pub fn from_str(value: &str) -> Result<Self> {
        match value {
            "linear" | "straight" => Ok(Self::Straight),
            "parabolic" => Ok(Self::Parabolic),
            "spiral" => Ok(Self::Spiral),
            _ => Err(FxError::UnknownTrajectory {
                value: value.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Straight => "straight",
            Self::Parabolic => "parabolic",
            Self::Spiral => "spiral",
        }
    }
}

/// Descriptor for the projectile particle system of an attack: the base
/// field set plus trajectory parameters.
#[derive(Debug, Clone, Default)]
pub struct ProjectileDescriptor {
    pub base: ParticleSystemDescriptor,
    pub trajectory: Trajectory,
    /// Per-tick trajectory speed (document value / tick rate)
    pub trajectory_speed: f32,
    /// Arc scale; read only for parabolic and spiral trajectories,
    /// otherwise 1.0
    pub trajectory_scale: f32,
    /// Rotation frequency; read only for spiral trajectories, otherwise 1.0
    pub trajectory_frequency: f32,
}

impl ProjectileDescriptor {
    /// Loads the projectile document at `path`, optionally merged with an
    /// inline override node (inline wins), then layers the trajectory
    /// fields over the base field set.
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

        let trajectory_node = node.child("trajectory")?;
        let trajectory = Trajectory::from_str(trajectory_node.attribute("type")?.restricted_value()?)?;

        let trajectory_speed = trajectory_node
            .child("speed")?
            .attribute("value")?
            .float_value()?
            / SIM_TICKS_PER_SECOND;

        // scale only matters for arcing trajectories
        let trajectory_scale = match trajectory {
            Trajectory::Parabolic | Trajectory::Spiral => trajectory_node
                .child("scale")?
                .attribute("value")?
                .float_value()?,
            Trajectory::Straight => 1.0,
        };

        // frequency only matters for spirals
        let trajectory_frequency = match trajectory {
            Trajectory::Spiral => trajectory_node
                .child("frequency")?
                .attribute("value")?
                .float_value()?,
            _ => 1.0,
        };

        Ok(Self {
            base,
            trajectory,
            trajectory_speed,
            trajectory_scale,
            trajectory_frequency,
        })
    }

    /// Builds a live projectile system owned by `owner`, playing children
    /// and all. No failure path; fields were validated at load time.
    pub fn create(&self, owner: OwnerId) -> ProjectileParticleSystem {
        let mut ps = ProjectileParticleSystem::new(owner);
        self.base.apply_to(&mut ps.system);
        ps.system.state = State::Play;
        ps.trajectory = self.trajectory;
        ps.trajectory_speed = self.trajectory_speed;
        ps.trajectory_scale = self.trajectory_scale;
        ps.trajectory_frequency = self.trajectory_frequency;
        ps
    }

    /// Writes the base field set and a sibling
    /// `ParticleSystemTypeProjectile` node with the trajectory fields.
    pub fn save_state(&self, parent: &mut TreeNode) {
        self.base.save_state(parent);

        let node = parent.add_child(PROJECTILE_SAVE_TAG);
        node.add_attribute("trajectory", self.trajectory.as_str());
        node.add_attribute_f32("trajectorySpeed", self.trajectory_speed);
        node.add_attribute_f32("trajectoryScale", self.trajectory_scale);
        node.add_attribute_f32("trajectoryFrequency", self.trajectory_frequency);
    }

    /// Restores a projectile descriptor from its two save-state nodes.
    pub fn load_state(parent: &TreeNode) -> Result<Self> {
        let base = ParticleSystemDescriptor::load_state(parent)?;

        let node = parent.child(PROJECTILE_SAVE_TAG)?;
        Ok(Self {
            base,
            trajectory: Trajectory::from_str(node.attribute("trajectory")?.value())?,
            trajectory_speed: node.attribute("trajectorySpeed")?.float_value()?,
            trajectory_scale: node.attribute("trajectoryScale")?.float_value()?,
            trajectory_frequency: node.attribute("trajectoryFrequency")?.float_value()?,
        })
    }
}
