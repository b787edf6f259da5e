//! # Ember Render
//!
//! CPU-side mesh data for the Ember engine:
//!
//! - [`mesh::Mesh`] - Immutable interlaced vertex stream with 16-bit indices
//! - [`mesh::MeshConfig`] - Builder-facing record validated into a mesh
//! - [`mesh::VertexLayout`] - Stride, offsets and GPU formats of a mesh's attributes
//! - Builders for polygons, cubes and spheres
//!
//! Vertex attributes are compressed on the way in: normals, tangents and
//! bitangents become 16-bit signed normalized lanes and colors become RGBA
//! bytes.

pub mod mesh;

pub use ember_core::memory::Allocator;

/// Render library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
