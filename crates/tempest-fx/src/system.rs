//! Live particle-system objects instantiated from descriptors.
//!
//! Only construction and configuration live here; per-frame integration of
//! particle positions is the simulation loop's job.

use glam::{Vec3, Vec4};

use crate::assets::{ModelRef, TextureRef};
use crate::error::FxError;

/// Simulation tick rate the document values are normalized against.
/// Speeds and gravities in effect documents are per-second; live systems
/// store per-tick values.
pub const SIM_TICKS_PER_SECOND: f32 = 40.0;

/// How a particle is rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Primitive {
    /// Camera-facing textured quad
    #[default]
    Quad,
    /// Line segment along the velocity vector
    Line,
}

impl Primitive {
    /// Parse the restricted document string.
    pub fn from_str(value: &str) -> std::result::Result<Self, FxError> {
        match value {
            "quad" => Ok(Self::Quad),
            "line" => Ok(Self::Line),
            _ => Err(FxError::UnknownPrimitive {
                value: value.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quad => "quad",
            Self::Line => "line",
        }
    }
}

/// Particle blend mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Additive (source factor one)
    #[default]
    Normal,
    /// Subtractive-looking (source factor one-minus-alpha)
    Black,
}

impl BlendMode {
    /// Parse the restricted document string.
    pub fn from_str(value: &str) -> std::result::Result<Self, FxError> {
        match value {
            "normal" => Ok(Self::Normal),
            "black" => Ok(Self::Black),
            _ => Err(FxError::UnknownBlendMode {
                value: value.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Black => "black",
        }
    }
}

/// Playback state of a live system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Constructed but not yet emitting
    #[default]
    Pause,
    /// Emitting
    Play,
    /// Winding down, no new emissions
    Fade,
}

/// Logical owner of a live system (an attack event, a unit, ...). The owner
/// is whoever requested instantiation; descriptors never track live systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(pub u64);

/// Base live particle system. Field values are filled in from a descriptor
/// by [`crate::descriptor::ParticleSystemDescriptor::apply_to`].
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub state: State,
    pub texture: Option<TextureRef>,
    pub model: Option<ModelRef>,
    pub model_cycle: f32,
    pub primitive: Primitive,
    pub offset: Vec3,
    pub color: Vec4,
    pub color_no_energy: Vec4,
    pub particle_size: f32,
    pub size_no_energy: f32,
    pub speed: f32,
    pub gravity: f32,
    pub emission_rate: f32,
    pub energy_max: i32,
    pub energy_var: i32,
    pub blend_mode: BlendMode,
    pub teamcolor_energy: bool,
    pub teamcolor_no_energy: bool,
    pub alternations: i32,
    pub start_delay: i32,
    owner: OwnerId,
    children: Vec<ParticleSystem>,
}

impl ParticleSystem {
    pub fn new(owner: OwnerId) -> Self {
        Self {
            state: State::Pause,
            texture: None,
            model: None,
            model_cycle: 0.0,
            primitive: Primitive::Quad,
            offset: Vec3::ZERO,
            color: Vec4::ONE,
            color_no_energy: Vec4::ONE,
            particle_size: 0.0,
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
            owner,
            children: Vec::new(),
        }
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn add_child(&mut self, child: ParticleSystem) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[ParticleSystem] {
        &self.children
    }
}

/// Live projectile system: base fields plus the trajectory parameters.
#[derive(Debug, Clone)]
pub struct ProjectileParticleSystem {
    pub system: ParticleSystem,
    pub trajectory: crate::projectile::Trajectory,
    pub trajectory_speed: f32,
    pub trajectory_scale: f32,
    pub trajectory_frequency: f32,
}

impl ProjectileParticleSystem {
    pub fn new(owner: OwnerId) -> Self {
        Self {
            system: ParticleSystem::new(owner),
            trajectory: crate::projectile::Trajectory::Straight,
            trajectory_speed: 0.0,
            trajectory_scale: 0.0,
            trajectory_frequency: 0.0,
        }
    }
}

/// Live splash system: base fields plus fade and spread parameters.
#[derive(Debug, Clone)]
pub struct SplashParticleSystem {
    pub system: ParticleSystem,
    pub emission_rate_fade: f32,
    pub vertical_spread_a: f32,
    pub vertical_spread_b: f32,
    pub horizontal_spread_a: f32,
    pub horizontal_spread_b: f32,
}

impl SplashParticleSystem {
    pub fn new(owner: OwnerId) -> Self {
        Self {
            system: ParticleSystem::new(owner),
            emission_rate_fade: 0.0,
            vertical_spread_a: 0.0,
            vertical_spread_b: 0.0,
            horizontal_spread_a: 0.0,
            horizontal_spread_b: 0.0,
        }
    }
}
