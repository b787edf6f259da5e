//! The append-based vertex stream builder and the build contract shared by
//! every mesh builder.

use ember_core::color::Color;
use ember_core::geometry::AxisAlignedBox;
use ember_core::math::{Point2, Point3, Vec2, Vec3};
use ember_core::memory::{AllocVec, Allocator, PackedBuffer, PackedBufferWriter};

use super::{
    ColorPacker, Mesh, MeshConfig, PointPacker, PrimitiveTopology, VectorPacker, VertexComponents,
};

/// Something that can produce a [`Mesh`].
pub trait MeshBuilder {
    /// Build a mesh whose storage comes from `allocator`.
    fn build_with(&self, allocator: Allocator) -> Mesh;

    /// Build a mesh on the global heap.
    fn build(&self) -> Mesh {
        self.build_with(Allocator::default())
    }
}

fn trace_built(kind: &str, mesh: &Mesh) {
    log::trace!(
        "Built {} mesh: {} vertices, {} indices, stride {}",
        kind,
        mesh.vertex_count(),
        mesh.index_count(),
        mesh.stride()
    );
}

/// Appends raw attributes to an interlaced vertex stream.
///
/// Nothing is validated while appending: the caller writes every present
/// attribute of each vertex, in the order position, color, UV, normal,
/// tangent, bitangent, using the component counts set beforehand. Debug
/// builds assert the result when the mesh is produced.
///
/// ```
/// use ember_core::math::Point2;
/// use ember_render::mesh::{PrimitiveTopology, UncheckedMeshBuilder};
///
/// let mut builder = UncheckedMeshBuilder::new(PrimitiveTopology::Triangles);
/// builder.set_components_per_position(2);
/// builder
///     .add_position_2d(Point2::new(0.0, 0.0))
///     .add_position_2d(Point2::new(1.0, 0.0))
///     .add_position_2d(Point2::new(0.0, 1.0))
///     .add_triangle(0, 1, 2);
///
/// let mesh = builder.release();
/// assert_eq!(mesh.vertex_count(), 3);
/// ```
#[derive(Debug)]
pub struct UncheckedMeshBuilder {
    config: MeshConfig,
}

impl UncheckedMeshBuilder {
    pub fn new(topology: PrimitiveTopology) -> Self {
        Self::new_in(topology, Allocator::default())
    }

    /// Builder whose vertex stream and indices allocate from `allocator`.
    pub fn new_in(topology: PrimitiveTopology, allocator: Allocator) -> Self {
        Self {
            config: MeshConfig {
                vertex_data: PackedBuffer::new_in(allocator.clone()),
                indices: AllocVec::new_in(allocator),
                ..MeshConfig::new(topology)
            },
        }
    }

    // ===== Layout =====

    pub fn set_components_per_position(&mut self, components: u8) -> &mut Self {
        self.config.position_components = components;
        self
    }

    pub fn set_components_per_color(&mut self, components: u8) -> &mut Self {
        self.config.color_components = components;
        self
    }

    pub fn set_components_per_uv(&mut self, components: u8) -> &mut Self {
        self.config.uv_components = components;
        self
    }

    pub fn set_components_per_normal(&mut self, components: u8) -> &mut Self {
        self.config.normal_components = components;
        self
    }

    pub fn set_components_per_tangent(&mut self, components: u8) -> &mut Self {
        self.config.tangent_components = components;
        self
    }

    pub fn set_components_per_bitangent(&mut self, components: u8) -> &mut Self {
        self.config.bitangent_components = components;
        self
    }

    pub fn set_components(&mut self, components: VertexComponents) -> &mut Self {
        self.config.set_components(components);
        self
    }

    pub fn components(&self) -> VertexComponents {
        self.config.components()
    }

    pub fn stride(&self) -> usize {
        self.components().stride()
    }

    // ===== Capacity =====

    /// Make room for `count` more vertices at the current stride.
    pub fn reserve_vertices(&mut self, count: usize) -> &mut Self {
        let bytes = count * self.stride();
        self.reserve_bytes(bytes)
    }

    /// Make room for `count` more bytes of vertex data.
    pub fn reserve_bytes(&mut self, count: usize) -> &mut Self {
        let total = self.config.vertex_data.size() + count;
        self.config.vertex_data.reserve(total);
        self
    }

    pub fn reserve_indices(&mut self, count: usize) -> &mut Self {
        self.config.indices.reserve(count);
        self
    }

    pub fn set_bounding_box(&mut self, bounding_volume: AxisAlignedBox) -> &mut Self {
        self.config.bounding_volume = bounding_volume;
        self
    }

    // ===== Attributes =====

    fn writer(&mut self) -> PackedBufferWriter<'_> {
        self.config.vertex_data.writer()
    }

    pub fn add_position_2d(&mut self, position: Point2) -> &mut Self {
        self.writer().pack_object_with(&position, &PointPacker);
        self
    }

    pub fn add_position_3d(&mut self, position: Point3) -> &mut Self {
        self.writer().pack_object_with(&position, &PointPacker);
        self
    }

    /// Append a color using the configured channel count.
    ///
    /// # Panics
    ///
    /// In debug builds, if no color channels were configured.
    pub fn add_color(&mut self, color: Color) -> &mut Self {
        let packer = self.color_packer();
        self.writer().pack_object_with(&color, &packer);
        self
    }

    /// Append a color given as a 32-bit word with red in the top byte.
    ///
    /// # Panics
    ///
    /// In debug builds, if no color channels were configured.
    pub fn add_color_rgba(&mut self, rgba: u32) -> &mut Self {
        let packer = self.color_packer();
        self.writer().pack_object_with(&rgba, &packer);
        self
    }

    fn color_packer(&self) -> ColorPacker {
        debug_assert!(
            self.config.color_components > 0,
            "set_components_per_color must precede add_color"
        );
        ColorPacker::with_channels(self.config.color_components)
    }

    pub fn add_uv_1d(&mut self, u: f32) -> &mut Self {
        self.writer().pack_object_with(&u, &PointPacker);
        self
    }

    pub fn add_uv_2d(&mut self, uv: Vec2) -> &mut Self {
        self.writer().pack_object_with(&uv, &PointPacker);
        self
    }

    pub fn add_uv_3d(&mut self, uvw: Vec3) -> &mut Self {
        self.writer().pack_object_with(&uvw, &PointPacker);
        self
    }

    pub fn add_normal(&mut self, normal: Vec3) -> &mut Self {
        self.writer().pack_object_with(&normal, &VectorPacker);
        self
    }

    pub fn add_tangent(&mut self, tangent: Vec3) -> &mut Self {
        self.writer().pack_object_with(&tangent, &VectorPacker);
        self
    }

    pub fn add_bitangent(&mut self, bitangent: Vec3) -> &mut Self {
        self.writer().pack_object_with(&bitangent, &VectorPacker);
        self
    }

    // ===== Indices =====

    pub fn add_index(&mut self, index: u16) -> &mut Self {
        self.config.indices.push(index);
        self
    }

    pub fn add_triangle(&mut self, v0: u16, v1: u16, v2: u16) -> &mut Self {
        self.config.indices.extend_from_slice(&[v0, v1, v2]);
        self
    }

    /// Append a quad as the triangles `(v0, v1, v2)` and `(v2, v3, v0)`.
    pub fn add_quad(&mut self, v0: u16, v1: u16, v2: u16, v3: u16) -> &mut Self {
        self.config
            .indices
            .extend_from_slice(&[v0, v1, v2, v2, v3, v0]);
        self
    }

    /// Bytes of vertex data appended so far.
    pub fn vertex_bytes(&self) -> usize {
        self.config.vertex_data.size()
    }

    pub fn index_count(&self) -> usize {
        self.config.indices.len()
    }

    /// Turn the builder's storage into a mesh without copying.
    pub fn release(self) -> Mesh {
        self.release_as("unchecked")
    }

    pub(super) fn release_as(self, kind: &str) -> Mesh {
        let mesh = Mesh::new_unchecked(self.config);
        trace_built(kind, &mesh);
        mesh
    }
}

impl MeshBuilder for UncheckedMeshBuilder {
    fn build_with(&self, allocator: Allocator) -> Mesh {
        let config = MeshConfig {
            vertex_data: self.config.vertex_data.copy_with(allocator.clone()),
            indices: self.config.indices.copy_with(allocator),
            topology: self.config.topology,
            bounding_volume: self.config.bounding_volume,
            ..Default::default()
        }
        .with_components(self.components());
        let mesh = Mesh::new_unchecked(config);
        trace_built("unchecked", &mesh);
        mesh
    }
}
