//! Polygon builders that interlace per-attribute arrays into a mesh.
//!
//! [`Polygon2dBuilder`] and [`Polygon3dBuilder`] collect positions, colors,
//! UVs and normals (plus tangents and bitangents in 3D) as separate arrays
//! and interlace them when built. An attribute is emitted only when its
//! array is non-empty; vertices past the end of a shorter array receive the
//! attribute's default value.
//!
//! ```
//! use ember_core::math::{Point3, Vec2};
//! use ember_render::mesh::{MeshBuilder, Polygon3dBuilder, PrimitiveTopology};
//!
//! let mut builder = Polygon3dBuilder::new(PrimitiveTopology::Triangles);
//! builder.set_positions(&[
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ]);
//! builder.set_uvs(&[Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]);
//! builder.add_triangle(0, 1, 2);
//!
//! let mesh = builder.build();
//! assert_eq!(mesh.stride(), 20);
//! ```

use ember_core::color::Color;
use ember_core::geometry::AxisAlignedBox;
use ember_core::math::{Point2, Point3, Vec2, Vec3};
use ember_core::memory::{AllocVec, Allocator};

use super::{Mesh, MeshBuilder, PrimitiveTopology, UncheckedMeshBuilder, VertexComponents};

mod sealed {
    pub trait Sealed {}

    impl Sealed for ember_core::math::Point2 {}
    impl Sealed for ember_core::math::Point3 {}
}

/// Position type accepted by a [`PolygonBuilder`].
pub trait PolygonPosition: sealed::Sealed + Copy {
    /// Components written per position.
    const COMPONENTS: u8;

    /// The position embedded in 3D space.
    fn to_point3(&self) -> Point3;

    #[doc(hidden)]
    fn append_to(&self, builder: &mut UncheckedMeshBuilder);
}

impl PolygonPosition for Point2 {
    const COMPONENTS: u8 = 2;

    fn to_point3(&self) -> Point3 {
        Point3::new(self.x, self.y, 0.0)
    }

    fn append_to(&self, builder: &mut UncheckedMeshBuilder) {
        builder.add_position_2d(*self);
    }
}

impl PolygonPosition for Point3 {
    const COMPONENTS: u8 = 3;

    fn to_point3(&self) -> Point3 {
        *self
    }

    fn append_to(&self, builder: &mut UncheckedMeshBuilder) {
        builder.add_position_3d(*self);
    }
}

/// Builds a mesh from separate attribute arrays.
#[derive(Debug)]
pub struct PolygonBuilder<P: PolygonPosition> {
    topology: PrimitiveTopology,
    positions: AllocVec<P>,
    colors: AllocVec<Color>,
    uvs: AllocVec<Vec2>,
    normals: AllocVec<Vec3>,
    tangents: AllocVec<Vec3>,
    bitangents: AllocVec<Vec3>,
    indices: AllocVec<u16>,
    bounds: Option<AxisAlignedBox>,
}

/// Polygon builder with 2D positions.
pub type Polygon2dBuilder = PolygonBuilder<Point2>;

/// Polygon builder with 3D positions, tangents and bitangents.
pub type Polygon3dBuilder = PolygonBuilder<Point3>;

impl<P: PolygonPosition> PolygonBuilder<P> {
    pub fn new(topology: PrimitiveTopology) -> Self {
        Self::new_in(topology, Allocator::default())
    }

    /// Builder whose attribute arrays allocate from `allocator`.
    pub fn new_in(topology: PrimitiveTopology, allocator: Allocator) -> Self {
        Self {
            topology,
            positions: AllocVec::new_in(allocator.clone()),
            colors: AllocVec::new_in(allocator.clone()),
            uvs: AllocVec::new_in(allocator.clone()),
            normals: AllocVec::new_in(allocator.clone()),
            tangents: AllocVec::new_in(allocator.clone()),
            bitangents: AllocVec::new_in(allocator.clone()),
            indices: AllocVec::new_in(allocator),
            bounds: None,
        }
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    // ===== Capacity =====

    /// Make room for `count` more vertices in every 2D attribute array.
    pub fn reserve(&mut self, count: usize) {
        self.reserve_positions(count);
        self.reserve_colors(count);
        self.reserve_uvs(count);
        self.reserve_normals(count);
    }

    pub fn reserve_positions(&mut self, count: usize) {
        self.positions.reserve(count);
    }

    pub fn reserve_colors(&mut self, count: usize) {
        self.colors.reserve(count);
    }

    pub fn reserve_uvs(&mut self, count: usize) {
        self.uvs.reserve(count);
    }

    pub fn reserve_normals(&mut self, count: usize) {
        self.normals.reserve(count);
    }

    pub fn reserve_indices(&mut self, count: usize) {
        self.indices.reserve(count);
    }

    /// Make room for `count` more triangles.
    pub fn reserve_faces(&mut self, count: usize) {
        self.indices.reserve(count * 3);
    }

    // ===== Whole arrays =====

    /// Replace every position and recompute the bounding box.
    pub fn set_positions(&mut self, positions: &[P]) {
        self.positions.clear();
        self.bounds = None;
        for &position in positions {
            self.add_position(position);
        }
    }

    pub fn set_colors(&mut self, colors: &[Color]) {
        self.colors.clear();
        self.colors.extend_from_slice(colors);
    }

    pub fn set_uvs(&mut self, uvs: &[Vec2]) {
        self.uvs.clear();
        self.uvs.extend_from_slice(uvs);
    }

    pub fn set_normals(&mut self, normals: &[Vec3]) {
        self.normals.clear();
        self.normals.extend_from_slice(normals);
    }

    pub fn set_indices(&mut self, indices: &[u16]) {
        self.indices.clear();
        self.indices.extend_from_slice(indices);
    }

    // ===== Single entries =====

    pub fn add_position(&mut self, position: P) {
        let point = position.to_point3();
        self.bounds = Some(match self.bounds {
            Some(mut bounds) => {
                bounds.expand_to_include(&point);
                bounds
            }
            None => AxisAlignedBox::from_point(point),
        });
        self.positions.push(position);
    }

    pub fn add_color(&mut self, color: Color) {
        self.colors.push(color);
    }

    pub fn add_uv(&mut self, uv: Vec2) {
        self.uvs.push(uv);
    }

    pub fn add_normal(&mut self, normal: Vec3) {
        self.normals.push(normal);
    }

    pub fn add_index(&mut self, index: u16) {
        self.indices.push(index);
    }

    pub fn add_triangle(&mut self, v0: u16, v1: u16, v2: u16) {
        self.indices.extend_from_slice(&[v0, v1, v2]);
    }

    /// Add a quad as the triangles `(v0, v1, v2)` and `(v2, v3, v0)`.
    pub fn add_quad(&mut self, v0: u16, v1: u16, v2: u16, v3: u16) {
        self.add_triangle(v0, v1, v2);
        self.add_triangle(v2, v3, v0);
    }

    // ===== Queries =====

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[P] {
        &self.positions
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Smallest box containing every position, or a degenerate box at the
    /// origin when there are none.
    pub fn bounding_box(&self) -> AxisAlignedBox {
        self.bounds.unwrap_or_default()
    }

    /// Component counts the built mesh will carry.
    pub fn components(&self) -> VertexComponents {
        let count = |present: bool, components: u8| if present { components } else { 0 };
        VertexComponents {
            position: count(!self.positions.is_empty(), P::COMPONENTS),
            color: count(!self.colors.is_empty(), 4),
            uv: count(!self.uvs.is_empty(), 2),
            normal: count(!self.normals.is_empty(), 3),
            tangent: count(!self.tangents.is_empty(), 3),
            bitangent: count(!self.bitangents.is_empty(), 3),
        }
    }
}

impl PolygonBuilder<Point3> {
    pub fn reserve_tangents(&mut self, count: usize) {
        self.tangents.reserve(count);
    }

    pub fn reserve_bitangents(&mut self, count: usize) {
        self.bitangents.reserve(count);
    }

    pub fn set_tangents(&mut self, tangents: &[Vec3]) {
        self.tangents.clear();
        self.tangents.extend_from_slice(tangents);
    }

    pub fn set_bitangents(&mut self, bitangents: &[Vec3]) {
        self.bitangents.clear();
        self.bitangents.extend_from_slice(bitangents);
    }

    pub fn add_tangent(&mut self, tangent: Vec3) {
        self.tangents.push(tangent);
    }

    pub fn add_bitangent(&mut self, bitangent: Vec3) {
        self.bitangents.push(bitangent);
    }
}

fn entry_or_default<T: Copy + Default>(values: &[T], index: usize) -> T {
    values.get(index).copied().unwrap_or_default()
}

impl<P: PolygonPosition> MeshBuilder for PolygonBuilder<P> {
    fn build_with(&self, allocator: Allocator) -> Mesh {
        let components = self.components();
        let mut builder = UncheckedMeshBuilder::new_in(self.topology, allocator);
        builder
            .set_components(components)
            .reserve_vertices(self.positions.len())
            .reserve_indices(self.indices.len())
            .set_bounding_box(self.bounding_box());

        for (i, position) in self.positions.iter().enumerate() {
            position.append_to(&mut builder);
            if components.color != 0 {
                builder.add_color(entry_or_default(&self.colors, i));
            }
            if components.uv != 0 {
                builder.add_uv_2d(entry_or_default(&self.uvs, i));
            }
            if components.normal != 0 {
                builder.add_normal(entry_or_default(&self.normals, i));
            }
            if components.tangent != 0 {
                builder.add_tangent(entry_or_default(&self.tangents, i));
            }
            if components.bitangent != 0 {
                builder.add_bitangent(entry_or_default(&self.bitangents, i));
            }
        }
        for &index in self.indices.iter() {
            builder.add_index(index);
        }
        builder.release_as("polygon")
    }
}
