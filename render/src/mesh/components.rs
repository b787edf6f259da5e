//! Per-attribute component counts and the interlaced byte layout they imply.

use super::{ConstructError, VertexAttributeSemantic};

/// Logical component counts of each vertex attribute.
///
/// A count of zero means the attribute is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VertexComponents {
    pub position: u8,
    pub color: u8,
    pub uv: u8,
    pub normal: u8,
    pub tangent: u8,
    pub bitangent: u8,
}

impl VertexComponents {
    /// Round a logical count up to the stored lane count of a padded attribute.
    ///
    /// `0 -> 0`, `1 -> 1`, `2 -> 2`, `3 -> 4`, `4 -> 4`.
    pub const fn padded(components: u8) -> u8 {
        if components == 0 {
            0
        } else {
            components.next_power_of_two()
        }
    }

    pub fn get(&self, semantic: VertexAttributeSemantic) -> u8 {
        match semantic {
            VertexAttributeSemantic::Position => self.position,
            VertexAttributeSemantic::Color => self.color,
            VertexAttributeSemantic::TexCoord => self.uv,
            VertexAttributeSemantic::Normal => self.normal,
            VertexAttributeSemantic::Tangent => self.tangent,
            VertexAttributeSemantic::Bitangent => self.bitangent,
        }
    }

    pub fn set(&mut self, semantic: VertexAttributeSemantic, components: u8) {
        let slot = match semantic {
            VertexAttributeSemantic::Position => &mut self.position,
            VertexAttributeSemantic::Color => &mut self.color,
            VertexAttributeSemantic::TexCoord => &mut self.uv,
            VertexAttributeSemantic::Normal => &mut self.normal,
            VertexAttributeSemantic::Tangent => &mut self.tangent,
            VertexAttributeSemantic::Bitangent => &mut self.bitangent,
        };
        *slot = components;
    }

    /// Stored lane count of `semantic`, including padding.
    pub fn lanes(&self, semantic: VertexAttributeSemantic) -> u8 {
        let components = self.get(semantic);
        if semantic.is_padded() {
            Self::padded(components)
        } else {
            components
        }
    }

    /// Bytes `semantic` occupies in one vertex.
    pub fn bytes_per(&self, semantic: VertexAttributeSemantic) -> usize {
        self.lanes(semantic) as usize * semantic.scalar_size()
    }

    /// Byte offset of `semantic` from the start of a vertex.
    pub fn offset_to(&self, semantic: VertexAttributeSemantic) -> usize {
        VertexAttributeSemantic::ALL[..semantic.index()]
            .iter()
            .map(|&before| self.bytes_per(before))
            .sum()
    }

    /// Bytes from the start of one vertex to the next.
    pub fn stride(&self) -> usize {
        VertexAttributeSemantic::ALL
            .iter()
            .map(|&semantic| self.bytes_per(semantic))
            .sum()
    }

    /// Check every count against its attribute's range, in interlacing order.
    pub fn validate(&self) -> Result<(), ConstructError> {
        for semantic in VertexAttributeSemantic::ALL {
            let components = self.get(semantic);
            if components > semantic.max_components() {
                return Err(invalid_component(semantic)(components));
            }
        }
        Ok(())
    }
}

fn invalid_component(semantic: VertexAttributeSemantic) -> fn(u8) -> ConstructError {
    match semantic {
        VertexAttributeSemantic::Position => ConstructError::InvalidPositionComponent,
        VertexAttributeSemantic::Color => ConstructError::InvalidColorComponent,
        VertexAttributeSemantic::TexCoord => ConstructError::InvalidUvComponent,
        VertexAttributeSemantic::Normal => ConstructError::InvalidNormalComponent,
        VertexAttributeSemantic::Tangent => ConstructError::InvalidTangentComponent,
        VertexAttributeSemantic::Bitangent => ConstructError::InvalidBitangentComponent,
    }
}
