//! Graphics device interface consumed by the render pass.
//!
//! The concrete device wraps the platform graphics API; the pass only ever
//! talks to this trait, which keeps it testable against a recording stub.

use glam::{Vec3, Vec4};

use crate::mesh::{BufferId, TextureId};

/// Toggleable fixed-function capabilities the pass manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Blend,
    Normalize,
    PolygonOffsetFill,
}

/// Client-side array states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    Vertex,
    Normal,
    TexCoord,
}

/// Blend function factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    SrcAlpha,
    OneMinusSrcAlpha,
}

/// Triangle winding order for front faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontFace {
    CounterClockwise,
    Clockwise,
}

/// Source of an attribute array: a hardware buffer or a CPU-resident slice.
#[derive(Debug, Clone, Copy)]
pub enum ArrayPointer<'a> {
    Buffer(BufferId),
    Vec3s(&'a [Vec3]),
    Vec2s(&'a [[f32; 2]]),
}

/// Source of an index array.
#[derive(Debug, Clone, Copy)]
pub enum IndexPointer<'a> {
    Buffer(BufferId),
    Slice(&'a [u32]),
}

/// Low-level rendering operations the model render pass issues.
///
/// Object-safe so passes can hold `&mut dyn GraphicsDevice`. Implementations
/// are expected to execute calls immediately on the thread owning the
/// graphics context.
pub trait GraphicsDevice {
    /// Whether hardware vertex/index buffers are available.
    fn supports_buffers(&self) -> bool;

    /// Uploads an attribute array and returns its buffer handle.
    fn create_buffer(&mut self, data: &[f32]) -> BufferId;

    /// Uploads an index array and returns its buffer handle.
    fn create_index_buffer(&mut self, data: &[u32]) -> BufferId;

    /// Pushes a snapshot of the render state touched by the pass.
    fn push_state(&mut self);

    /// Restores the most recently pushed snapshot.
    fn pop_state(&mut self);

    fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor);
    fn set_front_face(&mut self, winding: FrontFace);

    /// Enables or disables back-face culling.
    fn set_cull_face(&mut self, enabled: bool);

    fn enable(&mut self, capability: Capability);
    fn disable(&mut self, capability: Capability);

    fn enable_array(&mut self, kind: ArrayKind);
    fn disable_array(&mut self, kind: ArrayKind);

    fn set_polygon_offset(&mut self, factor: f32, units: f32);

    fn set_color(&mut self, color: Vec4);

    /// Binds `texture` on the active unit; [`TextureId::NONE`] unbinds.
    fn bind_texture(&mut self, texture: TextureId);

    /// Whether `texture` refers to a live hardware texture. Stale handles
    /// are possible after device resets; binding is skipped for them.
    fn texture_is_resident(&self, texture: TextureId) -> bool;

    /// Selects the active texture unit (0 is the primary unit).
    fn set_texture_unit(&mut self, unit: u32);

    fn vertex_pointer(&mut self, pointer: ArrayPointer<'_>);
    fn normal_pointer(&mut self, pointer: ArrayPointer<'_>);
    fn tex_coord_pointer(&mut self, pointer: ArrayPointer<'_>);

    /// Draws an indexed triangle list over vertices `0..vertex_count`.
    fn draw_indexed_triangles(&mut self, vertex_count: u32, indices: IndexPointer<'_>);

    /// Draws independent line segments from consecutive point pairs.
    fn draw_lines(&mut self, points: &[Vec3]);

    fn begin_color_picking(&mut self);
    fn end_color_picking(&mut self);

    /// Post-operation consistency check; fatal in debug builds.
    fn assert_ok(&self);
}
