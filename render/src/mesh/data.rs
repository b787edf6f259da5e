//! Mesh configuration and the immutable mesh built from it.
//!
//! A [`MeshConfig`] carries an interlaced vertex stream, 16-bit indices, a
//! topology, per-attribute component counts and a bounding box. It becomes a
//! [`Mesh`] either through the checked path ([`Mesh::new`]), which reports
//! the first rule the record breaks, or the unchecked path
//! ([`Mesh::new_unchecked`]), which only asserts in debug builds.
//!
//! # Example
//!
//! ```
//! use ember_core::memory::PackedBuffer;
//! use ember_render::mesh::{ConstructError, Mesh, MeshConfig, PrimitiveTopology};
//!
//! let mut vertex_data = PackedBuffer::new();
//! vertex_data.writer().pack_objects(&[0.0f32, 0.0, 1.0, 0.0, 0.0, 1.0]);
//!
//! let config = MeshConfig::new(PrimitiveTopology::Triangles)
//!     .with_vertex_data(vertex_data)
//!     .with_indices(vec![0u16, 1, 2])
//!     .with_position_components(2);
//! let mesh = Mesh::new(config)?;
//! assert_eq!(mesh.vertex_count(), 3);
//! # Ok::<(), ConstructError>(())
//! ```

use std::fmt;

use ember_core::geometry::AxisAlignedBox;
use ember_core::memory::{AllocVec, Allocator, PackedBuffer};

use super::{
    ConstructError, PrimitiveTopology, VertexAttributeSemantic, VertexComponents, VertexIter,
    VertexLayout,
};

/// Builder-facing record validated into a [`Mesh`].
#[derive(Debug, Default)]
pub struct MeshConfig {
    /// Interlaced vertex stream.
    pub vertex_data: PackedBuffer,
    pub indices: AllocVec<u16>,
    pub topology: PrimitiveTopology,
    pub position_components: u8,
    pub color_components: u8,
    pub uv_components: u8,
    pub normal_components: u8,
    pub tangent_components: u8,
    pub bitangent_components: u8,
    pub bounding_volume: AxisAlignedBox,
}

impl MeshConfig {
    /// An empty record with the given topology.
    pub fn new(topology: PrimitiveTopology) -> Self {
        Self {
            topology,
            ..Default::default()
        }
    }

    pub fn with_vertex_data(mut self, vertex_data: impl Into<PackedBuffer>) -> Self {
        self.vertex_data = vertex_data.into();
        self
    }

    pub fn with_indices(mut self, indices: impl Into<AllocVec<u16>>) -> Self {
        self.indices = indices.into();
        self
    }

    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_position_components(mut self, components: u8) -> Self {
        self.position_components = components;
        self
    }

    pub fn with_color_components(mut self, components: u8) -> Self {
        self.color_components = components;
        self
    }

    pub fn with_uv_components(mut self, components: u8) -> Self {
        self.uv_components = components;
        self
    }

    pub fn with_normal_components(mut self, components: u8) -> Self {
        self.normal_components = components;
        self
    }

    pub fn with_tangent_components(mut self, components: u8) -> Self {
        self.tangent_components = components;
        self
    }

    pub fn with_bitangent_components(mut self, components: u8) -> Self {
        self.bitangent_components = components;
        self
    }

    /// Set all six component counts at once.
    pub fn with_components(mut self, components: VertexComponents) -> Self {
        self.set_components(components);
        self
    }

    pub fn with_bounding_volume(mut self, bounding_volume: AxisAlignedBox) -> Self {
        self.bounding_volume = bounding_volume;
        self
    }

    pub fn components(&self) -> VertexComponents {
        VertexComponents {
            position: self.position_components,
            color: self.color_components,
            uv: self.uv_components,
            normal: self.normal_components,
            tangent: self.tangent_components,
            bitangent: self.bitangent_components,
        }
    }

    pub fn set_components(&mut self, components: VertexComponents) {
        self.position_components = components.position;
        self.color_components = components.color;
        self.uv_components = components.uv;
        self.normal_components = components.normal;
        self.tangent_components = components.tangent;
        self.bitangent_components = components.bitangent;
    }

    /// Check the record against every mesh rule.
    ///
    /// Component counts are checked first, in interlacing order, then the
    /// vertex data size, then the index count.
    pub fn validate(&self) -> Result<(), ConstructError> {
        let components = self.components();
        components.validate()?;

        let stride = components.stride();
        let size = self.vertex_data.size();
        let misaligned = if stride == 0 {
            size != 0
        } else {
            size % stride != 0
        };
        if misaligned {
            return Err(ConstructError::InvalidVertexData { size, stride });
        }

        let count = self.indices.len();
        match self.topology.index_multiple() {
            Some(multiple) if count % multiple != 0 => Err(ConstructError::InvalidIndices {
                count,
                topology: self.topology,
                multiple,
            }),
            _ => Ok(()),
        }
    }
}

/// Pack a logical count with its padded count: logical in the high nibble.
#[inline]
const fn pack_padded(components: u8) -> u8 {
    (components << 4) | VertexComponents::padded(components)
}

/// Immutable interlaced vertex stream with 16-bit indices.
///
/// Copying is explicit through [`copy`](Self::copy) and
/// [`copy_with`](Self::copy_with).
pub struct Mesh {
    vertex_data: PackedBuffer,
    indices: AllocVec<u16>,
    bounding_volume: AxisAlignedBox,
    topology: PrimitiveTopology,
    position_components: u8,
    color_components: u8,
    uv_components: u8,
    // High nibble logical count, low nibble padded count.
    normal_components: u8,
    tangent_components: u8,
    bitangent_components: u8,
}

impl Mesh {
    /// Validate `config` and build a mesh from it.
    pub fn new(config: MeshConfig) -> Result<Self, ConstructError> {
        if let Err(error) = config.validate() {
            log::debug!("Rejected mesh config: {}", error);
            return Err(error);
        }
        Ok(Self::from_config(config))
    }

    /// Build a mesh from a record the caller guarantees is valid.
    ///
    /// # Panics
    ///
    /// In debug builds, if `config` breaks any rule [`Mesh::new`] checks.
    pub fn new_unchecked(config: MeshConfig) -> Self {
        debug_assert_eq!(config.validate(), Ok(()), "invalid mesh config");
        Self::from_config(config)
    }

    fn from_config(config: MeshConfig) -> Self {
        Self {
            vertex_data: config.vertex_data,
            indices: config.indices,
            bounding_volume: config.bounding_volume,
            topology: config.topology,
            position_components: config.position_components,
            color_components: config.color_components,
            uv_components: config.uv_components,
            normal_components: pack_padded(config.normal_components),
            tangent_components: pack_padded(config.tangent_components),
            bitangent_components: pack_padded(config.bitangent_components),
        }
    }

    /// Deep copy using this mesh's allocators.
    pub fn copy(&self) -> Self {
        self.with_storage(self.vertex_data.copy(), self.indices.copy())
    }

    /// Deep copy into storage drawn from `allocator`.
    pub fn copy_with(&self, allocator: Allocator) -> Self {
        self.with_storage(
            self.vertex_data.copy_with(allocator.clone()),
            self.indices.copy_with(allocator),
        )
    }

    fn with_storage(&self, vertex_data: PackedBuffer, indices: AllocVec<u16>) -> Self {
        Self {
            vertex_data,
            indices,
            bounding_volume: self.bounding_volume,
            topology: self.topology,
            position_components: self.position_components,
            color_components: self.color_components,
            uv_components: self.uv_components,
            normal_components: self.normal_components,
            tangent_components: self.tangent_components,
            bitangent_components: self.bitangent_components,
        }
    }

    // ===== Presence =====

    pub fn has_positions(&self) -> bool {
        self.position_components != 0
    }

    pub fn has_colors(&self) -> bool {
        self.color_components != 0
    }

    pub fn has_uvs(&self) -> bool {
        self.uv_components != 0
    }

    pub fn has_normals(&self) -> bool {
        self.normal_components != 0
    }

    pub fn has_tangents(&self) -> bool {
        self.tangent_components != 0
    }

    pub fn has_bitangents(&self) -> bool {
        self.bitangent_components != 0
    }

    pub fn has_indices(&self) -> bool {
        !self.indices.is_empty()
    }

    // ===== Logical component counts =====

    pub fn position_components(&self) -> u8 {
        self.position_components
    }

    pub fn color_components(&self) -> u8 {
        self.color_components
    }

    pub fn uv_components(&self) -> u8 {
        self.uv_components
    }

    pub fn normal_components(&self) -> u8 {
        self.normal_components >> 4
    }

    pub fn tangent_components(&self) -> u8 {
        self.tangent_components >> 4
    }

    pub fn bitangent_components(&self) -> u8 {
        self.bitangent_components >> 4
    }

    /// All six logical counts.
    pub fn components(&self) -> VertexComponents {
        VertexComponents {
            position: self.position_components(),
            color: self.color_components(),
            uv: self.uv_components(),
            normal: self.normal_components(),
            tangent: self.tangent_components(),
            bitangent: self.bitangent_components(),
        }
    }

    // ===== Byte sizes per vertex =====

    pub fn bytes_per_positions(&self) -> usize {
        self.position_components as usize * size_of::<f32>()
    }

    pub fn bytes_per_colors(&self) -> usize {
        VertexComponents::padded(self.color_components) as usize
    }

    pub fn bytes_per_uvs(&self) -> usize {
        self.uv_components as usize * size_of::<f32>()
    }

    pub fn bytes_per_normals(&self) -> usize {
        (self.normal_components & 0x0f) as usize * size_of::<i16>()
    }

    pub fn bytes_per_tangents(&self) -> usize {
        (self.tangent_components & 0x0f) as usize * size_of::<i16>()
    }

    pub fn bytes_per_bitangents(&self) -> usize {
        (self.bitangent_components & 0x0f) as usize * size_of::<i16>()
    }

    // ===== Offsets within a vertex =====

    pub fn offset_to_positions(&self) -> usize {
        0
    }

    pub fn offset_to_colors(&self) -> usize {
        self.offset_to_positions() + self.bytes_per_positions()
    }

    pub fn offset_to_uvs(&self) -> usize {
        self.offset_to_colors() + self.bytes_per_colors()
    }

    pub fn offset_to_normals(&self) -> usize {
        self.offset_to_uvs() + self.bytes_per_uvs()
    }

    pub fn offset_to_tangents(&self) -> usize {
        self.offset_to_normals() + self.bytes_per_normals()
    }

    pub fn offset_to_bitangents(&self) -> usize {
        self.offset_to_tangents() + self.bytes_per_tangents()
    }

    /// Bytes from the start of one vertex to the next.
    pub fn stride(&self) -> usize {
        self.offset_to_bitangents() + self.bytes_per_bitangents()
    }

    /// Byte offset of `semantic` from the start of a vertex.
    pub fn offset_to(&self, semantic: VertexAttributeSemantic) -> usize {
        match semantic {
            VertexAttributeSemantic::Position => self.offset_to_positions(),
            VertexAttributeSemantic::Color => self.offset_to_colors(),
            VertexAttributeSemantic::TexCoord => self.offset_to_uvs(),
            VertexAttributeSemantic::Normal => self.offset_to_normals(),
            VertexAttributeSemantic::Tangent => self.offset_to_tangents(),
            VertexAttributeSemantic::Bitangent => self.offset_to_bitangents(),
        }
    }

    // ===== Data =====

    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    /// The interlaced vertex bytes.
    pub fn data(&self) -> &[u8] {
        self.vertex_data.as_bytes()
    }

    pub fn vertex_data(&self) -> &PackedBuffer {
        &self.vertex_data
    }

    pub fn indices(&self) -> &[u16] {
        self.indices.as_slice()
    }

    /// The index array as native-endian bytes, ready for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.indices.as_slice())
    }

    pub fn bounding_volume(&self) -> &AxisAlignedBox {
        &self.bounding_volume
    }

    /// Number of whole vertices in the stream.
    pub fn vertex_count(&self) -> usize {
        match self.stride() {
            0 => 0,
            stride => self.vertex_data.size() / stride,
        }
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of primitives the index stream describes.
    pub fn primitive_count(&self) -> usize {
        self.topology.primitive_count(self.indices.len())
    }

    /// Descriptor for a renderer reading [`data`](Self::data).
    pub fn vertex_layout(&self) -> VertexLayout {
        VertexLayout::from_components(&self.components())
    }

    /// Decode every vertex back out of the stream.
    pub fn vertices(&self) -> VertexIter<'_> {
        VertexIter::new(self)
    }

    /// Give up the mesh and return its vertex stream and indices.
    pub fn into_parts(self) -> (PackedBuffer, AllocVec<u16>) {
        (self.vertex_data, self.indices)
    }
}

impl fmt::Debug for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("topology", &self.topology)
            .field("components", &self.components())
            .field("stride", &self.stride())
            .field("vertex_count", &self.vertex_count())
            .field("index_count", &self.index_count())
            .field("bounding_volume", &self.bounding_volume)
            .finish()
    }
}

static_assertions::assert_impl_all!(Mesh: Send, Sync);
static_assertions::assert_not_impl_any!(Mesh: Clone, Copy);

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ember_core::math::Point3;
    use ember_core::memory::TrackingResource;
    use rstest::rstest;

    use super::*;

    fn triangle_config() -> MeshConfig {
        let mut vertex_data = PackedBuffer::new();
        vertex_data
            .writer()
            .pack_objects(&[0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        MeshConfig::new(PrimitiveTopology::Triangles)
            .with_vertex_data(vertex_data)
            .with_indices(vec![0u16, 1, 2])
            .with_position_components(3)
            .with_bounding_volume(AxisAlignedBox::from_points(
                Point3::origin(),
                Point3::new(1.0, 1.0, 0.0),
            ))
    }

    #[test]
    fn checked_construction() {
        let mesh = Mesh::new(triangle_config()).unwrap();
        assert_eq!(mesh.stride(), 12);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.primitive_count(), 1);
        assert!(mesh.has_positions());
        assert!(!mesh.has_colors());
        assert!(mesh.has_indices());
        assert_eq!(mesh.index_bytes().len(), 6);
    }

    #[test]
    fn packed_normal_counts() {
        let config = MeshConfig::new(PrimitiveTopology::Points)
            .with_position_components(3)
            .with_normal_components(3)
            .with_tangent_components(1)
            .with_bitangent_components(2);
        let mesh = Mesh::new(config).unwrap();
        assert_eq!(mesh.normal_components, 0x34);
        assert_eq!(mesh.tangent_components, 0x11);
        assert_eq!(mesh.bitangent_components, 0x22);
        assert_eq!(mesh.normal_components(), 3);
        assert_eq!(mesh.bytes_per_normals(), 8);
        assert_eq!(mesh.bytes_per_tangents(), 2);
        assert_eq!(mesh.bytes_per_bitangents(), 4);
        assert_eq!(mesh.stride(), 12 + 8 + 2 + 4);
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn offsets_match_components() {
        let components = VertexComponents {
            position: 3,
            color: 4,
            uv: 2,
            normal: 3,
            tangent: 3,
            bitangent: 3,
        };
        let config = MeshConfig::new(PrimitiveTopology::Points).with_components(components);
        let mesh = Mesh::new(config).unwrap();
        for semantic in VertexAttributeSemantic::ALL {
            assert_eq!(mesh.offset_to(semantic), components.offset_to(semantic));
        }
        assert_eq!(mesh.stride(), components.stride());
        assert_eq!(mesh.components(), components);
        assert_eq!(mesh.vertex_layout().stride as usize, mesh.stride());
    }

    #[rstest]
    #[case::position(
        MeshConfig::new(PrimitiveTopology::Points).with_position_components(5),
        ConstructError::InvalidPositionComponent(5)
    )]
    #[case::uv(
        MeshConfig::new(PrimitiveTopology::Points).with_uv_components(4),
        ConstructError::InvalidUvComponent(4)
    )]
    #[case::bitangent(
        MeshConfig::new(PrimitiveTopology::Points).with_bitangent_components(5),
        ConstructError::InvalidBitangentComponent(5)
    )]
    #[case::lines(
        MeshConfig::new(PrimitiveTopology::Lines).with_indices(vec![0u16, 1, 2]),
        ConstructError::InvalidIndices { count: 3, topology: PrimitiveTopology::Lines, multiple: 2 }
    )]
    #[case::data_without_stride(
        MeshConfig::new(PrimitiveTopology::Points).with_vertex_data(vec![1u8, 2]),
        ConstructError::InvalidVertexData { size: 2, stride: 0 }
    )]
    #[case::partial_vertex(
        MeshConfig::new(PrimitiveTopology::Points)
            .with_position_components(2)
            .with_vertex_data(vec![0u8; 12]),
        ConstructError::InvalidVertexData { size: 12, stride: 8 }
    )]
    fn rejected_configs(#[case] config: MeshConfig, #[case] expected: ConstructError) {
        assert_eq!(Mesh::new(config).unwrap_err(), expected);
    }

    #[test]
    fn components_checked_before_sizes() {
        let config = MeshConfig::new(PrimitiveTopology::Triangles)
            .with_color_components(7)
            .with_indices(vec![0u16, 1])
            .with_vertex_data(vec![0u8; 3]);
        assert_eq!(
            config.validate(),
            Err(ConstructError::InvalidColorComponent(7))
        );
    }

    #[test]
    fn strips_accept_any_index_count() {
        let indices = vec![0u16, 1, 2, 3, 4];
        let config = MeshConfig::new(PrimitiveTopology::TriangleStrip).with_indices(indices);
        assert!(Mesh::new(config).is_ok());
    }

    #[test]
    #[should_panic(expected = "invalid mesh config")]
    #[cfg(debug_assertions)]
    fn unchecked_asserts_in_debug() {
        let config = MeshConfig::new(PrimitiveTopology::Triangles).with_indices(vec![0u16]);
        Mesh::new_unchecked(config);
    }

    #[test]
    fn copies_are_deep() {
        let tracking = Arc::new(TrackingResource::new());
        let mesh = Mesh::new(triangle_config()).unwrap();

        let copy = mesh.copy_with(Allocator::new(tracking.clone()));
        assert_eq!(tracking.allocations(), 2);
        assert_eq!(copy.data(), mesh.data());
        assert_eq!(copy.indices(), mesh.indices());
        assert_ne!(copy.data().as_ptr(), mesh.data().as_ptr());
        assert_eq!(copy.bounding_volume(), mesh.bounding_volume());
        assert_eq!(copy.components(), mesh.components());

        let again = copy.copy();
        assert_eq!(tracking.allocations(), 4);
        assert_eq!(again.stride(), mesh.stride());
        drop((copy, again));
        assert_eq!(tracking.live_bytes(), 0);
    }
}
