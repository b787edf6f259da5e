//! Mesh construction and layout.
//!
//! This module provides:
//! - [`PrimitiveTopology`] - How indices are assembled into primitives
//! - [`VertexComponents`] - Per-attribute component counts and the byte layout they imply
//! - [`VertexLayout`] - Descriptor handed to a renderer
//! - [`MeshConfig`] / [`Mesh`] - The checked and unchecked construction paths
//! - [`ConstructError`] - Why a configuration was rejected
//! - Attribute packers: [`PointPacker`], [`ColorPacker`], [`VectorPacker`]
//! - Builders: [`UncheckedMeshBuilder`], [`Polygon2dBuilder`], [`Polygon3dBuilder`],
//!   [`CubeBuilder`], [`SphereBuilder`]
//!
//! # Vertex layout
//!
//! Attributes are interlaced per vertex in the fixed order position, color,
//! UV, normal, tangent, bitangent. Absent attributes take no space.
//!
//! | Attribute | Scalar | Lanes stored |
//! |-----------|--------|--------------|
//! | position  | `f32`  | logical count |
//! | color     | `u8`   | logical count rounded up to 1, 2 or 4 |
//! | uv        | `f32`  | logical count |
//! | normal, tangent, bitangent | `i16` | logical count rounded up to 1, 2 or 4 |

mod builder;
mod components;
mod data;
mod error;
mod generators;
mod layout;
mod packers;
mod polygon;
mod topology;
mod view;

pub use builder::{MeshBuilder, UncheckedMeshBuilder};
pub use components::VertexComponents;
pub use data::{Mesh, MeshConfig};
pub use error::ConstructError;
pub use generators::{CubeBuilder, SphereBuilder};
pub use layout::{VertexAttribute, VertexAttributeFormat, VertexAttributeSemantic, VertexLayout};
pub use packers::{ColorPacker, PointPacker, VectorPacker};
pub use polygon::{Polygon2dBuilder, Polygon3dBuilder, PolygonBuilder, PolygonPosition};
pub use topology::PrimitiveTopology;
pub use view::{DecodedVertex, VertexIter};
