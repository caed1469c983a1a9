//! Buffered vs immediate-array path selection and geometry setup.

use pretty_assertions::assert_eq;

use tempest_render::{
    ArrayKind, Model, ModelRenderer, RenderFlags, RenderMode, TextureId,
};

use crate::common::{Call, Pointer, RecordingDevice, triangle_mesh};

#[test]
fn test_immediate_path_without_buffer_support() {
    let mut device = RecordingDevice::new(false);
    let model = Model {
        meshes: vec![triangle_mesh("body", None)],
    };

    let mut renderer = ModelRenderer::new();
    renderer.begin(&mut device, RenderFlags::empty(), None);
    renderer.render(&mut device, &model, RenderMode::Normal);
    renderer.end(&mut device);

    assert_eq!(device.count(&Call::VertexPointer(Pointer::Cpu)), 1);
    assert!(device.calls.contains(&Call::DrawIndexedTriangles {
        vertex_count: 3,
        indices: Pointer::Cpu,
    }));
    assert!(!device
        .calls
        .iter()
        .any(|c| matches!(c, Call::CreateBuffer(_))));
}

#[test]
fn test_immediate_path_for_animated_mesh() {
    let mut device = RecordingDevice::new(true);
    let mut mesh = triangle_mesh("flag", None);
    mesh.frame_count = 4;
    let model = Model { meshes: vec![mesh] };

    let mut renderer = ModelRenderer::new();
    renderer.begin(&mut device, RenderFlags::empty(), None);
    renderer.render(&mut device, &model, RenderMode::Normal);
    renderer.end(&mut device);

    assert_eq!(device.count(&Call::VertexPointer(Pointer::Cpu)), 1);
    assert!(!device
        .calls
        .iter()
        .any(|c| matches!(c, Call::CreateBuffer(_))));
}

#[test]
fn test_buffered_path_for_static_mesh() {
    let mut device = RecordingDevice::new(true);
    let mesh = triangle_mesh("body", None);
    let model = Model { meshes: vec![mesh] };

    let mut renderer = ModelRenderer::new();
    renderer.begin(&mut device, RenderFlags::NORMALS, None);
    renderer.render(&mut device, &model, RenderMode::Normal);
    renderer.end(&mut device);

    // vertices, normals, tex coords uploaded plus one index buffer
    assert_eq!(
        device
            .calls
            .iter()
            .filter(|c| matches!(c, Call::CreateBuffer(_)))
            .count(),
        3
    );
    assert_eq!(device.count(&Call::CreateIndexBuffer(3)), 1);
    assert!(device
        .calls
        .iter()
        .any(|c| matches!(c, Call::VertexPointer(Pointer::Buffer(_)))));
    assert!(device
        .calls
        .iter()
        .any(|c| matches!(
            c,
            Call::DrawIndexedTriangles {
                vertex_count: 3,
                indices: Pointer::Buffer(_),
            }
        )));
    assert!(model.meshes[0].has_built_buffers());
}

#[test]
fn test_buffers_built_once_across_renders() {
    let mut device = RecordingDevice::new(true);
    let model = Model {
        meshes: vec![triangle_mesh("body", None)],
    };

    let mut renderer = ModelRenderer::new();
    renderer.begin(&mut device, RenderFlags::empty(), None);
    renderer.render(&mut device, &model, RenderMode::Normal);
    let creates_after_first = device
        .calls
        .iter()
        .filter(|c| matches!(c, Call::CreateBuffer(_) | Call::CreateIndexBuffer(_)))
        .count();
    renderer.render(&mut device, &model, RenderMode::Normal);
    renderer.end(&mut device);

    let creates_after_second = device
        .calls
        .iter()
        .filter(|c| matches!(c, Call::CreateBuffer(_) | Call::CreateIndexBuffer(_)))
        .count();
    assert_eq!(creates_after_first, 4);
    assert_eq!(creates_after_second, 4);
}

#[test]
fn test_normal_array_disabled_when_normals_off() {
    let mut device = RecordingDevice::new(false);
    let model = Model {
        meshes: vec![triangle_mesh("body", None)],
    };

    let mut renderer = ModelRenderer::new();
    renderer.begin(&mut device, RenderFlags::empty(), None);
    renderer.render(&mut device, &model, RenderMode::Normal);
    renderer.end(&mut device);

    assert_eq!(device.count(&Call::DisableArray(ArrayKind::Normal)), 1);
    assert!(!device
        .calls
        .iter()
        .any(|c| matches!(c, Call::NormalPointer(_))));
}

#[test]
fn test_tex_coord_array_disabled_for_untextured_mesh() {
    let mut device = RecordingDevice::new(false);
    let model = Model {
        meshes: vec![triangle_mesh("body", None)],
    };

    let mut renderer = ModelRenderer::new();
    renderer.begin(&mut device, RenderFlags::TEXTURES, None);
    renderer.render(&mut device, &model, RenderMode::Normal);
    renderer.end(&mut device);

    assert_eq!(device.count(&Call::DisableArray(ArrayKind::TexCoord)), 1);
    assert!(!device
        .calls
        .iter()
        .any(|c| matches!(c, Call::TexCoordPointer(_))));
}

#[test]
fn test_duplicate_tex_coords_binds_secondary_unit_first() {
    let texture = TextureId(4);
    let mut device = RecordingDevice::new(false).with_resident(texture);
    let model = Model {
        meshes: vec![triangle_mesh("body", Some(texture))],
    };

    let mut renderer = ModelRenderer::new();
    renderer.set_duplicate_tex_coords(true);
    renderer.set_secondary_tex_coord_unit(2);
    renderer.begin(&mut device, RenderFlags::TEXTURES, None);
    renderer.render(&mut device, &model, RenderMode::Normal);
    renderer.end(&mut device);

    let secondary = device.position(&Call::SetTextureUnit(2));
    let primary = device.position(&Call::SetTextureUnit(0));
    assert!(secondary.is_some());
    assert!(primary.is_some());
    assert!(secondary < primary);
    assert_eq!(device.count(&Call::TexCoordPointer(Pointer::Cpu)), 2);
}

#[test]
fn test_normals_only_immediate_draws_line_pairs() {
    let mut device = RecordingDevice::new(false);
    let model = Model {
        meshes: vec![triangle_mesh("body", None)],
    };

    let mut renderer = ModelRenderer::new();
    renderer.begin(&mut device, RenderFlags::NORMALS, None);
    let before = device.calls.len();
    renderer.render_normals_only(&mut device, &model);
    renderer.end(&mut device);

    // one point pair per index, no other state changes
    assert_eq!(&device.calls[before..before + 1], &[Call::DrawLines(6)]);
}

#[test]
fn test_normals_only_buffered_draws_index_range() {
    let mut device = RecordingDevice::new(true);
    let model = Model {
        meshes: vec![triangle_mesh("body", None)],
    };

    let mut renderer = ModelRenderer::new();
    renderer.begin(&mut device, RenderFlags::NORMALS, None);
    renderer.render_normals_only(&mut device, &model);
    renderer.end(&mut device);

    assert!(device
        .calls
        .iter()
        .any(|c| matches!(c, Call::NormalPointer(Pointer::Buffer(_)))));
    assert!(device
        .calls
        .iter()
        .any(|c| matches!(
            c,
            Call::DrawIndexedTriangles {
                vertex_count: 3,
                indices: Pointer::Buffer(_),
            }
        )));
    assert!(!device.calls.iter().any(|c| matches!(c, Call::DrawLines(_))));
}
