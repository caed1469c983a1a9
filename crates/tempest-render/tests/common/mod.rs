//! Shared fixtures: a recording graphics device and mesh builders.

use std::collections::HashSet;

use glam::{Vec3, Vec4};

use tempest_render::{
    ArrayKind, ArrayPointer, BlendFactor, BufferId, Capability, FrontFace, GraphicsDevice,
    IndexPointer, Mesh, TextureId,
};

/// Array source with the CPU payload erased, for call comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Buffer(BufferId),
    Cpu,
}

impl From<ArrayPointer<'_>> for Pointer {
    fn from(pointer: ArrayPointer<'_>) -> Self {
        match pointer {
            ArrayPointer::Buffer(id) => Pointer::Buffer(id),
            ArrayPointer::Vec3s(_) | ArrayPointer::Vec2s(_) => Pointer::Cpu,
        }
    }
}

impl From<IndexPointer<'_>> for Pointer {
    fn from(pointer: IndexPointer<'_>) -> Self {
        match pointer {
            IndexPointer::Buffer(id) => Pointer::Buffer(id),
            IndexPointer::Slice(_) => Pointer::Cpu,
        }
    }
}

/// Every state-changing or drawing call a pass can issue. Queries
/// (`supports_buffers`, `texture_is_resident`, `assert_ok`) are not
/// recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    PushState,
    PopState,
    SetBlendFunc(BlendFactor, BlendFactor),
    SetFrontFace(FrontFace),
    SetCullFace(bool),
    Enable(Capability),
    Disable(Capability),
    EnableArray(ArrayKind),
    DisableArray(ArrayKind),
    SetPolygonOffset(f32, f32),
    SetColor(Vec4),
    BindTexture(TextureId),
    SetTextureUnit(u32),
    CreateBuffer(usize),
    CreateIndexBuffer(usize),
    VertexPointer(Pointer),
    NormalPointer(Pointer),
    TexCoordPointer(Pointer),
    DrawIndexedTriangles { vertex_count: u32, indices: Pointer },
    DrawLines(usize),
    BeginColorPicking,
    EndColorPicking,
}

/// Records every call for later inspection.
pub struct RecordingDevice {
    pub buffers_supported: bool,
    pub resident: HashSet<TextureId>,
    pub calls: Vec<Call>,
    next_buffer: u32,
}

impl RecordingDevice {
    pub fn new(buffers_supported: bool) -> Self {
        Self {
            buffers_supported,
            resident: HashSet::new(),
            calls: Vec::new(),
            next_buffer: 1,
        }
    }

    pub fn with_resident(mut self, texture: TextureId) -> Self {
        self.resident.insert(texture);
        self
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn position(&self, call: &Call) -> Option<usize> {
        self.calls.iter().position(|c| c == call)
    }
}

impl GraphicsDevice for RecordingDevice {
    fn supports_buffers(&self) -> bool {
        self.buffers_supported
    }

    fn create_buffer(&mut self, data: &[f32]) -> BufferId {
        self.calls.push(Call::CreateBuffer(data.len()));
        let id = BufferId(self.next_buffer);
        self.next_buffer += 1;
        id
    }

    fn create_index_buffer(&mut self, data: &[u32]) -> BufferId {
        self.calls.push(Call::CreateIndexBuffer(data.len()));
        let id = BufferId(self.next_buffer);
        self.next_buffer += 1;
        id
    }

    fn push_state(&mut self) {
        self.calls.push(Call::PushState);
    }

    fn pop_state(&mut self) {
        self.calls.push(Call::PopState);
    }

    fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.calls.push(Call::SetBlendFunc(src, dst));
    }

    fn set_front_face(&mut self, winding: FrontFace) {
        self.calls.push(Call::SetFrontFace(winding));
    }

    fn set_cull_face(&mut self, enabled: bool) {
        self.calls.push(Call::SetCullFace(enabled));
    }

    fn enable(&mut self, capability: Capability) {
        self.calls.push(Call::Enable(capability));
    }

    fn disable(&mut self, capability: Capability) {
        self.calls.push(Call::Disable(capability));
    }

    fn enable_array(&mut self, kind: ArrayKind) {
        self.calls.push(Call::EnableArray(kind));
    }

    fn disable_array(&mut self, kind: ArrayKind) {
        self.calls.push(Call::DisableArray(kind));
    }

    fn set_polygon_offset(&mut self, factor: f32, units: f32) {
        self.calls.push(Call::SetPolygonOffset(factor, units));
    }

    fn set_color(&mut self, color: Vec4) {
        self.calls.push(Call::SetColor(color));
    }

    fn bind_texture(&mut self, texture: TextureId) {
        self.calls.push(Call::BindTexture(texture));
    }

    fn texture_is_resident(&self, texture: TextureId) -> bool {
        self.resident.contains(&texture)
    }

    fn set_texture_unit(&mut self, unit: u32) {
        self.calls.push(Call::SetTextureUnit(unit));
    }

    fn vertex_pointer(&mut self, pointer: ArrayPointer<'_>) {
        self.calls.push(Call::VertexPointer(pointer.into()));
    }

    fn normal_pointer(&mut self, pointer: ArrayPointer<'_>) {
        self.calls.push(Call::NormalPointer(pointer.into()));
    }

    fn tex_coord_pointer(&mut self, pointer: ArrayPointer<'_>) {
        self.calls.push(Call::TexCoordPointer(pointer.into()));
    }

    fn draw_indexed_triangles(&mut self, vertex_count: u32, indices: IndexPointer<'_>) {
        self.calls.push(Call::DrawIndexedTriangles {
            vertex_count,
            indices: indices.into(),
        });
    }

    fn draw_lines(&mut self, points: &[Vec3]) {
        self.calls.push(Call::DrawLines(points.len()));
    }

    fn begin_color_picking(&mut self) {
        self.calls.push(Call::BeginColorPicking);
    }

    fn end_color_picking(&mut self) {
        self.calls.push(Call::EndColorPicking);
    }

    fn assert_ok(&self) {}
}

/// A single triangle with per-vertex normals and tex coords.
pub fn triangle_mesh(name: &str, texture: Option<TextureId>) -> Mesh {
    let mut mesh = Mesh::new(name);
    mesh.vertices = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];
    mesh.normals = vec![Vec3::Z; 3];
    mesh.tex_coords = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
    mesh.indices = vec![0, 1, 2];
    mesh.diffuse_color = Vec3::new(0.8, 0.7, 0.6);
    mesh.texture = texture;
    mesh
}
