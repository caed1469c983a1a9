//! The model render pass.
//!
//! A three-phase state machine per pass: `begin` captures flags and pushes
//! device state, `render`/`render_normals_only` walk a model's mesh list,
//! `end` restores the pushed state. Begin/end pairing is a precondition,
//! checked with debug assertions; the pass is not reentrant.

use bitflags::bitflags;
use glam::Vec4;
use log::warn;

use crate::device::{
    ArrayKind, ArrayPointer, BlendFactor, Capability, FrontFace, GraphicsDevice, IndexPointer,
};
use crate::mesh::{Mesh, Model, TextureId};

/// Polygon offset applied outside color-picking mode.
const POLYGON_OFFSET_FACTOR: f32 = 0.005;

bitflags! {
    /// What the pass renders, captured at `begin`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RenderFlags: u32 {
        const NORMALS = 0x1;
        const TEXTURES = 0x2;
        const COLORS = 0x4;
        /// Selection hit-testing; skips blend, color, and texture state.
        /// Flat picking colors are established by the caller.
        const COLOR_PICKING = 0x8;
    }
}

/// Mesh filter for a render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Normal,
    /// Selection pass; meshes flagged no-select are skipped entirely
    Selection,
}

/// Per-mesh hook invoked after texture resolution, before geometry setup.
pub trait MeshCallback {
    fn execute(&mut self, mesh: &Mesh);
}

/// Walks a model's mesh list and issues the draw sequence for each mesh,
/// buffered when the device and the mesh allow it, immediate otherwise.
pub struct ModelRenderer<'cb> {
    rendering: bool,
    flags: RenderFlags,
    last_texture: TextureId,
    callback: Option<&'cb mut dyn MeshCallback>,
    duplicate_tex_coords: bool,
    secondary_tex_coord_unit: u32,
}

impl Default for ModelRenderer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'cb> ModelRenderer<'cb> {
    pub fn new() -> Self {
        Self {
            rendering: false,
            flags: RenderFlags::empty(),
            last_texture: TextureId::NONE,
            callback: None,
            duplicate_tex_coords: false,
            secondary_tex_coord_unit: 1,
        }
    }

    /// Also bind texture coordinates to a secondary unit before the
    /// primary one (used for shadow or lightmap passes).
    pub fn set_duplicate_tex_coords(&mut self, enabled: bool) {
        self.duplicate_tex_coords = enabled;
    }

    pub fn set_secondary_tex_coord_unit(&mut self, unit: u32) {
        self.secondary_tex_coord_unit = unit;
    }

    fn color_picking(&self) -> bool {
        self.flags.contains(RenderFlags::COLOR_PICKING)
    }

    /// Starts a pass: captures `flags`, resets the texture bind cache,
    /// pushes device state, and applies the mode's global defaults.
    /// Blend, normalize, and polygon-offset setup is skipped in
    /// color-picking mode.
    pub fn begin(
        &mut self,
        device: &mut dyn GraphicsDevice,
        flags: RenderFlags,
        callback: Option<&'cb mut dyn MeshCallback>,
    ) {
        debug_assert!(!self.rendering, "begin called while already rendering");
        device.assert_ok();

        self.flags = flags;
        self.callback = callback;
        self.rendering = true;
        self.last_texture = TextureId::NONE;
        device.bind_texture(TextureId::NONE);

        device.push_state();

        if !self.color_picking() {
            device.set_blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
        }
        device.set_front_face(FrontFace::CounterClockwise);

        if !self.color_picking() {
            device.enable(Capability::Normalize);
            device.enable(Capability::Blend);
            device.enable(Capability::PolygonOffsetFill);
            device.set_polygon_offset(POLYGON_OFFSET_FACTOR, 0.0);
        }

        device.enable_array(ArrayKind::Vertex);
        if flags.contains(RenderFlags::NORMALS) {
            device.enable_array(ArrayKind::Normal);
        }
        if flags.contains(RenderFlags::TEXTURES) {
            device.enable_array(ArrayKind::TexCoord);
        }

        if self.color_picking() {
            device.begin_color_picking();
        }

        device.assert_ok();
    }

    /// Ends the pass and restores the state pushed by [`begin`](Self::begin).
    pub fn end(&mut self, device: &mut dyn GraphicsDevice) {
        debug_assert!(self.rendering, "end called without begin");
        device.assert_ok();

        self.rendering = false;
        self.callback = None;

        if !self.color_picking() {
            device.set_polygon_offset(0.0, 0.0);
            device.disable(Capability::PolygonOffsetFill);
        }

        device.pop_state();

        if self.color_picking() {
            device.end_color_picking();
        }

        device.assert_ok();
    }

    /// Renders every mesh of `model` in array order.
    pub fn render(&mut self, device: &mut dyn GraphicsDevice, model: &Model, mode: RenderMode) {
        debug_assert!(self.rendering, "render called without begin");
        device.assert_ok();

        for mesh in &model.meshes {
            self.render_mesh(device, mesh, mode);
        }

        device.assert_ok();
    }

    /// Debug pass: draws a line from each vertex to vertex plus normal.
    /// Performs no culling, texture, or color state changes.
    pub fn render_normals_only(&mut self, device: &mut dyn GraphicsDevice, model: &Model) {
        debug_assert!(self.rendering, "render called without begin");
        device.assert_ok();

        for mesh in &model.meshes {
            self.render_mesh_normals(device, mesh);
        }

        device.assert_ok();
    }

    fn render_mesh(&mut self, device: &mut dyn GraphicsDevice, mesh: &Mesh, mode: RenderMode) {
        // no state changes and no draw for unselectable meshes in a
        // selection pass
        if mode == RenderMode::Selection && mesh.no_select() {
            return;
        }

        device.set_cull_face(!mesh.two_sided());

        if !self.color_picking() {
            if self.flags.contains(RenderFlags::COLORS) {
                device.set_color(Vec4::new(
                    mesh.diffuse_color.x,
                    mesh.diffuse_color.y,
                    mesh.diffuse_color.z,
                    mesh.opacity,
                ));
            }

            match mesh.texture {
                Some(texture) if self.flags.contains(RenderFlags::TEXTURES) => {
                    if self.last_texture != texture {
                        if device.texture_is_resident(texture) {
                            device.bind_texture(texture);
                            self.last_texture = texture;
                        } else {
                            // stale handle; degrade to untextured and keep
                            // going rather than failing the draw
                            warn!(
                                "mesh '{}' references non-resident texture {:?}",
                                mesh.name, texture
                            );
                            device.bind_texture(TextureId::NONE);
                            self.last_texture = TextureId::NONE;
                        }
                    }
                }
                _ => {
                    device.bind_texture(TextureId::NONE);
                    self.last_texture = TextureId::NONE;
                }
            }

            if let Some(callback) = self.callback.as_mut() {
                callback.execute(mesh);
            }
        }

        let buffered = device.supports_buffers() && mesh.is_static();
        let textured = self.flags.contains(RenderFlags::TEXTURES) && mesh.texture.is_some();

        if buffered {
            let buffers = *mesh.buffers(device);

            device.vertex_pointer(ArrayPointer::Buffer(buffers.vertices));

            if self.flags.contains(RenderFlags::NORMALS) {
                device.enable_array(ArrayKind::Normal);
                device.normal_pointer(ArrayPointer::Buffer(buffers.normals));
            } else {
                device.disable_array(ArrayKind::Normal);
            }

            self.point_tex_coords(device, textured, ArrayPointer::Buffer(buffers.tex_coords));

            device.draw_indexed_triangles(mesh.vertex_count(), IndexPointer::Buffer(buffers.indices));
        } else {
            device.vertex_pointer(ArrayPointer::Vec3s(&mesh.vertices));

            if self.flags.contains(RenderFlags::NORMALS) {
                device.enable_array(ArrayKind::Normal);
                device.normal_pointer(ArrayPointer::Vec3s(&mesh.normals));
            } else {
                device.disable_array(ArrayKind::Normal);
            }

            self.point_tex_coords(device, textured, ArrayPointer::Vec2s(&mesh.tex_coords));

            device.draw_indexed_triangles(mesh.vertex_count(), IndexPointer::Slice(&mesh.indices));
        }

        device.assert_ok();
    }

    /// Binds the tex-coord pointer, to the secondary unit first when
    /// duplication is on, always finishing on the primary unit.
    fn point_tex_coords(
        &self,
        device: &mut dyn GraphicsDevice,
        textured: bool,
        pointer: ArrayPointer<'_>,
    ) {
        if textured {
            if self.duplicate_tex_coords {
                device.set_texture_unit(self.secondary_tex_coord_unit);
                device.enable_array(ArrayKind::TexCoord);
                device.tex_coord_pointer(pointer);
            }
            device.set_texture_unit(0);
            device.enable_array(ArrayKind::TexCoord);
            device.tex_coord_pointer(pointer);
        } else {
            if self.duplicate_tex_coords {
                device.set_texture_unit(self.secondary_tex_coord_unit);
                device.disable_array(ArrayKind::TexCoord);
            }
            device.set_texture_unit(0);
            device.disable_array(ArrayKind::TexCoord);
        }
    }

    fn render_mesh_normals(&mut self, device: &mut dyn GraphicsDevice, mesh: &Mesh) {
        if device.supports_buffers() && mesh.is_static() {
            let buffers = *mesh.buffers(device);

            device.enable_array(ArrayKind::Vertex);
            device.vertex_pointer(ArrayPointer::Buffer(buffers.vertices));
            device.enable_array(ArrayKind::Normal);
            device.normal_pointer(ArrayPointer::Buffer(buffers.normals));

            device.draw_indexed_triangles(mesh.vertex_count(), IndexPointer::Buffer(buffers.indices));
        } else {
            let mut points = Vec::with_capacity(mesh.indices.len() * 2);
            for &index in &mesh.indices {
                let vertex = mesh.vertices[index as usize];
                points.push(vertex);
                points.push(vertex + mesh.normals[index as usize]);
            }
            device.draw_lines(&points);
        }
    }
}
