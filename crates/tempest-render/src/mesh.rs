//! Mesh and model data consumed by the render pass.
//!
//! A mesh holds CPU arrays for the current animation frame plus lazily
//! built hardware buffers. The render pass never mutates geometry; buffer
//! construction is the only one-time mutation and runs inline on the
//! render thread immediately before first use.

use std::cell::OnceCell;

use bitflags::bitflags;
use glam::Vec3;

use crate::device::GraphicsDevice;

/// Native hardware texture handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

impl TextureId {
    /// The "no texture bound" handle.
    pub const NONE: TextureId = TextureId(0);
}

/// Hardware buffer handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

bitflags! {
    /// Per-mesh property bits from the model format.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MeshFlags: u32 {
        /// Diffuse color is modulated by the owning faction's color
        const CUSTOM_COLOR = 0x1;
        /// Render both faces, culling disabled
        const TWO_SIDED = 0x2;
        /// Excluded from selection render passes
        const NO_SELECT = 0x4;
    }
}

/// Hardware buffers for a static mesh, built once on first buffered render.
#[derive(Debug, Clone, Copy)]
pub struct MeshBuffers {
    pub vertices: BufferId,
    pub normals: BufferId,
    pub tex_coords: BufferId,
    pub indices: BufferId,
}

impl MeshBuffers {
    fn build(mesh: &Mesh, device: &mut dyn GraphicsDevice) -> Self {
        Self {
            vertices: device.create_buffer(&flatten_vec3(&mesh.vertices)),
            normals: device.create_buffer(&flatten_vec3(&mesh.normals)),
            tex_coords: device.create_buffer(&flatten_vec2(&mesh.tex_coords)),
            indices: device.create_index_buffer(&mesh.indices),
        }
    }
}

/// One mesh of a model: current-frame geometry arrays plus material state.
#[derive(Debug, Default)]
pub struct Mesh {
    pub name: String,
    /// Number of animation frames; more than one disables the buffered path
    pub frame_count: u32,
    pub flags: MeshFlags,
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub diffuse_color: Vec3,
    pub opacity: f32,
    pub texture: Option<TextureId>,
    buffers: OnceCell<MeshBuffers>,
}

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frame_count: 1,
            opacity: 1.0,
            ..Self::default()
        }
    }

    /// Static geometry is eligible for the buffered path.
    pub fn is_static(&self) -> bool {
        self.frame_count == 1
    }

    pub fn two_sided(&self) -> bool {
        self.flags.contains(MeshFlags::TWO_SIDED)
    }

    pub fn no_select(&self) -> bool {
        self.flags.contains(MeshFlags::NO_SELECT)
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn has_built_buffers(&self) -> bool {
        self.buffers.get().is_some()
    }

    /// Hardware buffers for this mesh, built on first call. Idempotent;
    /// single-threaded by the concurrency model, so no lock is needed.
    pub fn buffers(&self, device: &mut dyn GraphicsDevice) -> &MeshBuffers {
        self.buffers
            .get_or_init(|| MeshBuffers::build(self, device))
    }
}

/// An ordered list of meshes; order is draw order.
#[derive(Debug, Default)]
pub struct Model {
    pub meshes: Vec<Mesh>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}

fn flatten_vec3(values: &[Vec3]) -> Vec<f32> {
    let mut out = Vec::with_capacity(values.len() * 3);
    for v in values {
        out.extend_from_slice(&v.to_array());
    }
    out
}

fn flatten_vec2(values: &[[f32; 2]]) -> Vec<f32> {
    let mut out = Vec::with_capacity(values.len() * 2);
    for v in values {
        out.extend_from_slice(v);
    }
    out
}
