//! End-to-end mesh construction through the public API.

use std::sync::Arc;

use ember_core::geometry::AxisAlignedBox;
use ember_core::math::{Point3, Vec2};
use ember_core::memory::{Allocator, PackedBuffer, TrackingResource};
use ember_render::mesh::{
    ConstructError, CubeBuilder, Mesh, MeshBuilder, MeshConfig, Polygon3dBuilder,
    PrimitiveTopology, SphereBuilder, VertexAttributeFormat, VertexAttributeSemantic,
};

fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .is_test(true)
        .try_init();
}

fn assert_stream_invariants(mesh: &Mesh) {
    assert_eq!(mesh.data().len() % mesh.stride(), 0);
    assert_eq!(mesh.data().len() / mesh.stride(), mesh.vertex_count());
    assert_eq!(mesh.offset_to_positions(), 0);
    assert_eq!(mesh.offset_to_colors(), mesh.bytes_per_positions());
    assert_eq!(
        mesh.offset_to_uvs(),
        mesh.offset_to_colors() + mesh.bytes_per_colors()
    );
    assert_eq!(
        mesh.offset_to_normals(),
        mesh.offset_to_uvs() + mesh.bytes_per_uvs()
    );
    assert_eq!(
        mesh.offset_to_tangents(),
        mesh.offset_to_normals() + mesh.bytes_per_normals()
    );
    assert_eq!(
        mesh.offset_to_bitangents(),
        mesh.offset_to_tangents() + mesh.bytes_per_tangents()
    );
    assert_eq!(
        mesh.stride(),
        mesh.offset_to_bitangents() + mesh.bytes_per_bitangents()
    );
    if mesh.topology() == PrimitiveTopology::Triangles {
        assert_eq!(mesh.indices().len() % 3, 0);
    }
}

#[test]
fn triangle_from_polygon_arrays() {
    init_logger();

    let mut builder = Polygon3dBuilder::new(PrimitiveTopology::Triangles);
    builder.set_positions(&[
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ]);
    builder.set_uvs(&[
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 1.0),
    ]);
    builder.set_indices(&[0, 1, 2]);
    let mesh = builder.build();

    assert_eq!(mesh.position_components(), 3);
    assert_eq!(mesh.uv_components(), 2);
    assert_eq!(mesh.color_components(), 0);
    assert_eq!(mesh.normal_components(), 0);
    assert_eq!(mesh.tangent_components(), 0);
    assert_eq!(mesh.bitangent_components(), 0);
    assert!(!mesh.has_colors() && !mesh.has_normals());
    assert_eq!(mesh.stride(), 20);
    assert_eq!(mesh.data().len(), 60);
    assert_eq!(mesh.indices().len(), 3);
    assert_eq!(mesh.bounding_volume().lower(), Point3::new(0.0, 0.0, 0.0));
    assert_eq!(mesh.bounding_volume().upper(), Point3::new(1.0, 1.0, 0.0));
    assert_stream_invariants(&mesh);
}

#[test]
fn cube_layout() {
    init_logger();

    let mesh = CubeBuilder::new().build();
    assert_eq!(mesh.vertex_count(), 24);
    assert_eq!(mesh.indices().len(), 36);
    assert_eq!(mesh.position_components(), 3);
    assert_eq!(mesh.uv_components(), 2);
    assert_eq!(mesh.normal_components(), 3);
    assert_eq!(mesh.bytes_per_normals(), 4 * 2);
    assert_eq!(
        *mesh.bounding_volume(),
        AxisAlignedBox::from_points(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
    );
    assert!(mesh.indices().iter().all(|&i| i < 24));
    assert_stream_invariants(&mesh);

    let layout = mesh.vertex_layout();
    assert_eq!(layout.stride, 12 + 8 + 8);
    let normal = layout
        .get_attribute(VertexAttributeSemantic::Normal)
        .unwrap();
    assert_eq!(normal.format, VertexAttributeFormat::Snorm16x4);
    assert_eq!(normal.offset, 20);
    assert_eq!(normal.components, 3);
}

#[test]
fn sphere_vertices_on_unit_sphere() {
    init_logger();

    let mesh = SphereBuilder::new(4, 2).build();
    assert_eq!(mesh.vertex_count(), 15);
    assert_eq!(mesh.indices().len(), 6 * 4 * 2);
    assert_stream_invariants(&mesh);

    for vertex in mesh.vertices() {
        let vertex = vertex.unwrap();
        let position = vertex.position_3d().coords;
        assert!((position.norm() - 1.0).abs() < 1e-5);
        // Normals are stored as 16-bit lanes, so compare at that precision.
        assert!((vertex.normal_3d() - position).amax() < 1e-4);
        assert!(vertex.uv[..2].iter().all(|c| (0.0..=1.0).contains(c)));
    }
}

#[test]
fn checked_factory_rejections() {
    init_logger();

    let config = MeshConfig::new(PrimitiveTopology::Triangles).with_position_components(5);
    let error = Mesh::new(config).unwrap_err();
    assert_eq!(error, ConstructError::InvalidPositionComponent(5));

    let indices = vec![0u16, 1, 2, 0, 1];
    let config = MeshConfig::new(PrimitiveTopology::Triangles).with_indices(indices);
    assert!(matches!(
        Mesh::new(config),
        Err(ConstructError::InvalidIndices { count: 5, .. })
    ));
}

#[test]
fn mesh_copies_into_another_allocator() {
    let tracking = Arc::new(TrackingResource::new());
    let mesh = SphereBuilder::new(8, 4).build();

    let copy = mesh.copy_with(Allocator::new(tracking.clone()));
    let mesh_bytes = mesh.data().len() + mesh.index_bytes().len();
    assert!(tracking.live_bytes() >= mesh_bytes);
    assert_eq!(copy.data(), mesh.data());
    assert_eq!(copy.indices(), mesh.indices());
    assert_eq!(copy.vertex_layout(), mesh.vertex_layout());

    drop(copy);
    assert_eq!(tracking.live_bytes(), 0);
}

#[test]
fn hand_packed_config_matches_builder() {
    let mut data = PackedBuffer::new();
    {
        let mut writer = data.writer();
        writer.pack_objects(&[0.0f32, 0.0, 0.0, 0.0, 0.0]);
        writer.pack_objects(&[1.0f32, 0.0, 0.0, 1.0, 0.0]);
        writer.pack_objects(&[0.0f32, 1.0, 0.0, 0.0, 1.0]);
    }
    let config = MeshConfig::new(PrimitiveTopology::Triangles)
        .with_vertex_data(data)
        .with_indices(vec![0u16, 1, 2])
        .with_position_components(3)
        .with_uv_components(2);
    let checked = Mesh::new(config).unwrap();

    let mut builder = Polygon3dBuilder::new(PrimitiveTopology::Triangles);
    builder.set_positions(&[
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ]);
    builder.set_uvs(&[
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 1.0),
    ]);
    builder.add_triangle(0, 1, 2);
    let built = builder.build();

    assert_eq!(checked.data(), built.data());
    assert_eq!(checked.indices(), built.indices());
}
