use super::PrimitiveTopology;

/// Why a [`MeshConfig`](super::MeshConfig) could not become a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConstructError {
    #[error(
        "{count} indices do not form whole {topology} primitives (need a multiple of {multiple})"
    )]
    InvalidIndices {
        count: usize,
        topology: PrimitiveTopology,
        multiple: usize,
    },
    #[error("vertex data of {size} bytes is not a multiple of the {stride}-byte stride")]
    InvalidVertexData { size: usize, stride: usize },
    #[error("position component count {0} is outside 0..=4")]
    InvalidPositionComponent(u8),
    #[error("color component count {0} is outside 0..=4")]
    InvalidColorComponent(u8),
    #[error("uv component count {0} is outside 0..=3")]
    InvalidUvComponent(u8),
    #[error("normal component count {0} is outside 0..=4")]
    InvalidNormalComponent(u8),
    #[error("tangent component count {0} is outside 0..=4")]
    InvalidTangentComponent(u8),
    #[error("bitangent component count {0} is outside 0..=4")]
    InvalidBitangentComponent(u8),
}
