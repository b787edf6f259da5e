//! Procedural cube and sphere meshes.

use std::f32::consts::PI;

use ember_core::geometry::AxisAlignedBox;
use ember_core::math::{Point3, Vec2, Vec3};
use ember_core::memory::Allocator;

use super::{Mesh, MeshBuilder, PrimitiveTopology, UncheckedMeshBuilder, VertexComponents};

const THIRD: f32 = 1.0 / 3.0;
const TWO_THIRDS: f32 = 2.0 / 3.0;

/// One cube face: outward normal, four corners and their atlas UVs.
struct Face {
    normal: [f32; 3],
    corners: [[f32; 3]; 4],
    uvs: [[f32; 2]; 4],
}

// Atlas is two columns by three rows.
const FACES: [Face; 6] = [
    // Bottom
    Face {
        normal: [0.0, -1.0, 0.0],
        corners: [
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [1.0, -1.0, 1.0],
            [-1.0, -1.0, 1.0],
        ],
        uvs: [[0.0, 0.0], [0.5, 0.0], [0.5, THIRD], [0.0, THIRD]],
    },
    // Back
    Face {
        normal: [0.0, 0.0, -1.0],
        corners: [
            [1.0, -1.0, -1.0],
            [-1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [1.0, 1.0, -1.0],
        ],
        uvs: [[0.5, 0.0], [1.0, 0.0], [1.0, THIRD], [0.5, THIRD]],
    },
    // Top
    Face {
        normal: [0.0, 1.0, 0.0],
        corners: [
            [-1.0, 1.0, -1.0],
            [1.0, 1.0, -1.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
        ],
        uvs: [
            [0.0, THIRD],
            [0.5, THIRD],
            [0.5, TWO_THIRDS],
            [0.0, TWO_THIRDS],
        ],
    },
    // Front
    Face {
        normal: [0.0, 0.0, 1.0],
        corners: [
            [1.0, -1.0, 1.0],
            [-1.0, -1.0, 1.0],
            [-1.0, 1.0, 1.0],
            [1.0, 1.0, 1.0],
        ],
        uvs: [
            [0.5, THIRD],
            [1.0, THIRD],
            [1.0, TWO_THIRDS],
            [0.5, TWO_THIRDS],
        ],
    },
    // Left
    Face {
        normal: [-1.0, 0.0, 0.0],
        corners: [
            [-1.0, -1.0, 1.0],
            [-1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, 1.0, 1.0],
        ],
        uvs: [[0.0, TWO_THIRDS], [0.5, TWO_THIRDS], [0.5, 1.0], [0.0, 1.0]],
    },
    // Right
    Face {
        normal: [1.0, 0.0, 0.0],
        corners: [
            [1.0, -1.0, 1.0],
            [1.0, -1.0, -1.0],
            [1.0, 1.0, -1.0],
            [1.0, 1.0, 1.0],
        ],
        uvs: [[0.5, TWO_THIRDS], [1.0, TWO_THIRDS], [1.0, 1.0], [0.5, 1.0]],
    },
];

fn unit_box() -> AxisAlignedBox {
    AxisAlignedBox::from_points(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
}

const POSITION_UV_NORMAL: VertexComponents = VertexComponents {
    position: 3,
    color: 0,
    uv: 2,
    normal: 3,
    tangent: 0,
    bitangent: 0,
};

/// Builds a cube spanning `[-1, 1]` on every axis.
///
/// Each face has its own four vertices so that normals stay flat, giving
/// 24 vertices and 36 triangle indices. UVs map the faces onto a two by
/// three atlas.
#[derive(Debug, Clone, Copy, Default)]
pub struct CubeBuilder;

impl CubeBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl MeshBuilder for CubeBuilder {
    fn build_with(&self, allocator: Allocator) -> Mesh {
        let mut builder = UncheckedMeshBuilder::new_in(PrimitiveTopology::Triangles, allocator);
        builder
            .set_components(POSITION_UV_NORMAL)
            .reserve_vertices(FACES.len() * 4)
            .reserve_indices(FACES.len() * 6)
            .set_bounding_box(unit_box());

        for (face_index, face) in FACES.iter().enumerate() {
            let normal = Vec3::from(face.normal);
            for (corner, uv) in face.corners.iter().zip(&face.uvs) {
                builder
                    .add_position_3d(Point3::from(*corner))
                    .add_uv_2d(Vec2::from(*uv))
                    .add_normal(normal);
            }
            let base = (face_index * 4) as u16;
            builder.add_quad(base, base + 1, base + 2, base + 3);
        }
        builder.release_as("cube")
    }
}

/// Builds a UV sphere of radius one.
///
/// The sphere is a grid of `x_segments` longitude by `y_segments` latitude
/// cells, with one vertex per grid corner and the seam duplicated so that
/// UVs run cleanly from 0 to 1. Normals equal positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SphereBuilder {
    x_segments: u16,
    y_segments: u16,
}

impl SphereBuilder {
    /// # Panics
    ///
    /// If either segment count is zero, or the grid has more corners than a
    /// 16-bit index can address.
    pub fn new(x_segments: u16, y_segments: u16) -> Self {
        assert!(
            x_segments > 0 && y_segments > 0,
            "sphere needs at least one segment per axis"
        );
        let corners = (x_segments as usize + 1) * (y_segments as usize + 1);
        assert!(
            corners <= u16::MAX as usize + 1,
            "{x_segments}x{y_segments} sphere needs {corners} vertices, beyond 16-bit indices"
        );
        Self {
            x_segments,
            y_segments,
        }
    }

    pub fn x_segments(&self) -> u16 {
        self.x_segments
    }

    pub fn y_segments(&self) -> u16 {
        self.y_segments
    }

    pub fn vertex_count(&self) -> usize {
        (self.x_segments as usize + 1) * (self.y_segments as usize + 1)
    }

    pub fn index_count(&self) -> usize {
        6 * self.x_segments as usize * self.y_segments as usize
    }
}

impl Default for SphereBuilder {
    fn default() -> Self {
        Self::new(32, 16)
    }
}

impl MeshBuilder for SphereBuilder {
    fn build_with(&self, allocator: Allocator) -> Mesh {
        let (x_segments, y_segments) = (self.x_segments, self.y_segments);
        let mut builder = UncheckedMeshBuilder::new_in(PrimitiveTopology::Triangles, allocator);
        builder
            .set_components(POSITION_UV_NORMAL)
            .reserve_vertices(self.vertex_count())
            .reserve_indices(self.index_count())
            .set_bounding_box(unit_box());

        for y in 0..=y_segments {
            let v = y as f32 / y_segments as f32;
            let (sin_theta, cos_theta) = (PI * v).sin_cos();
            for x in 0..=x_segments {
                let u = x as f32 / x_segments as f32;
                let (sin_phi, cos_phi) = (2.0 * PI * u).sin_cos();
                let direction = Vec3::new(cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
                builder
                    .add_position_3d(Point3::from(direction))
                    .add_uv_2d(Vec2::new(u, v))
                    .add_normal(direction);
            }
        }

        let row = x_segments + 1;
        for y in 0..y_segments {
            for x in 0..x_segments {
                builder.add_quad(
                    (y + 1) * row + x,
                    y * row + x,
                    y * row + x + 1,
                    (y + 1) * row + x + 1,
                );
            }
        }
        builder.release_as("sphere")
    }
}
