//! Vertex layout descriptors for interlaced mesh data.
//!
//! A [`VertexLayout`] tells a renderer how to read one vertex out of a
//! mesh's interlaced stream: the stride, and for each present attribute its
//! semantic, GPU-facing format, byte offset and logical component count.
//!
//! # Example
//!
//! ```
//! use ember_render::mesh::{VertexAttributeFormat, VertexAttributeSemantic, VertexComponents, VertexLayout};
//!
//! let components = VertexComponents {
//!     position: 3,
//!     normal: 3,
//!     ..Default::default()
//! };
//! let layout = VertexLayout::from_components(&components);
//!
//! assert_eq!(layout.stride, 20);
//! let normal = layout.get_attribute(VertexAttributeSemantic::Normal).unwrap();
//! assert_eq!(normal.offset, 12);
//! assert_eq!(normal.format, VertexAttributeFormat::Snorm16x4);
//! ```

use super::VertexComponents;

/// Semantic meaning of a vertex attribute.
///
/// Variants are declared in the order attributes appear within a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexAttributeSemantic {
    /// Vertex position (32-bit floats).
    Position,
    /// Vertex color (8-bit unsigned channels).
    Color,
    /// Texture coordinates (32-bit floats).
    TexCoord,
    /// Vertex normal (16-bit signed normalized).
    Normal,
    /// Vertex tangent (16-bit signed normalized).
    Tangent,
    /// Vertex bitangent (16-bit signed normalized).
    Bitangent,
}

impl VertexAttributeSemantic {
    /// Every semantic in interlacing order.
    pub const ALL: [Self; 6] = [
        Self::Position,
        Self::Color,
        Self::TexCoord,
        Self::Normal,
        Self::Tangent,
        Self::Bitangent,
    ];

    /// Position of this semantic in the interlacing order.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Largest logical component count a mesh accepts for this semantic.
    pub fn max_components(&self) -> u8 {
        match self {
            Self::TexCoord => 3,
            _ => 4,
        }
    }

    /// Size in bytes of one stored component.
    pub fn scalar_size(&self) -> usize {
        match self {
            Self::Position | Self::TexCoord => 4,
            Self::Color => 1,
            Self::Normal | Self::Tangent | Self::Bitangent => 2,
        }
    }

    /// Whether stored lanes are rounded up to a power of two.
    pub fn is_padded(&self) -> bool {
        !matches!(self, Self::Position | Self::TexCoord)
    }
}

/// GPU-facing format of a stored attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeFormat {
    /// Single 32-bit float.
    Float,
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
    /// Four 32-bit floats.
    Float4,
    /// One 8-bit unsigned integer (normalized to 0.0-1.0).
    Unorm8,
    /// Two 8-bit unsigned integers (normalized to 0.0-1.0).
    Unorm8x2,
    /// Four 8-bit unsigned integers (normalized to 0.0-1.0).
    Unorm8x4,
    /// One 16-bit signed integer (normalized to -1.0-1.0).
    Snorm16,
    /// Two 16-bit signed integers (normalized to -1.0-1.0).
    Snorm16x2,
    /// Four 16-bit signed integers (normalized to -1.0-1.0).
    Snorm16x4,
}

impl VertexAttributeFormat {
    /// Get the size in bytes of this format.
    pub fn size(&self) -> usize {
        match self {
            Self::Float => 4,
            Self::Float2 => 8,
            Self::Float3 => 12,
            Self::Float4 => 16,
            Self::Unorm8 => 1,
            Self::Unorm8x2 => 2,
            Self::Unorm8x4 => 4,
            Self::Snorm16 => 2,
            Self::Snorm16x2 => 4,
            Self::Snorm16x4 => 8,
        }
    }

    /// Format used to store `components` logical lanes of `semantic`.
    ///
    /// Returns `None` for an absent attribute or an out-of-range count.
    pub fn for_semantic(semantic: VertexAttributeSemantic, components: u8) -> Option<Self> {
        use VertexAttributeSemantic as S;
        match (semantic, components) {
            (_, 0) => None,
            (S::Position | S::TexCoord, 1) => Some(Self::Float),
            (S::Position | S::TexCoord, 2) => Some(Self::Float2),
            (S::Position | S::TexCoord, 3) => Some(Self::Float3),
            (S::Position, 4) => Some(Self::Float4),
            (S::Color, 1) => Some(Self::Unorm8),
            (S::Color, 2) => Some(Self::Unorm8x2),
            (S::Color, 3 | 4) => Some(Self::Unorm8x4),
            (S::Normal | S::Tangent | S::Bitangent, 1) => Some(Self::Snorm16),
            (S::Normal | S::Tangent | S::Bitangent, 2) => Some(Self::Snorm16x2),
            (S::Normal | S::Tangent | S::Bitangent, 3 | 4) => Some(Self::Snorm16x4),
            _ => None,
        }
    }
}

/// A single vertex attribute description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Semantic meaning of this attribute.
    pub semantic: VertexAttributeSemantic,
    /// Stored format, including any padding lanes.
    pub format: VertexAttributeFormat,
    /// Byte offset within one vertex.
    pub offset: u32,
    /// Logical component count, excluding padding lanes.
    pub components: u8,
}

impl VertexAttribute {
    pub fn new(
        semantic: VertexAttributeSemantic,
        format: VertexAttributeFormat,
        offset: u32,
        components: u8,
    ) -> Self {
        Self {
            semantic,
            format,
            offset,
            components,
        }
    }
}

/// Layout of one interlaced vertex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VertexLayout {
    /// Bytes from the start of one vertex to the next.
    pub stride: u32,
    /// Present attributes in interlacing order.
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    /// Create a new empty vertex layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Describe the layout implied by a set of component counts.
    ///
    /// Counts are expected to be valid; attributes without a matching format
    /// are left out.
    pub fn from_components(components: &VertexComponents) -> Self {
        let mut layout = Self::new().with_stride(components.stride() as u32);
        for semantic in VertexAttributeSemantic::ALL {
            let count = components.get(semantic);
            if let Some(format) = VertexAttributeFormat::for_semantic(semantic, count) {
                let offset = components.offset_to(semantic) as u32;
                let attribute = VertexAttribute::new(semantic, format, offset, count);
                layout = layout.with_attribute(attribute);
            }
        }
        layout
    }

    /// Add a vertex attribute.
    pub fn with_attribute(mut self, attribute: VertexAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Set the bytes from one vertex to the next.
    pub fn with_stride(mut self, stride: u32) -> Self {
        self.stride = stride;
        self
    }

    /// Check if this layout has a specific semantic.
    pub fn has_semantic(&self, semantic: VertexAttributeSemantic) -> bool {
        self.attributes.iter().any(|attr| attr.semantic == semantic)
    }

    /// Get an attribute by semantic.
    pub fn get_attribute(&self, semantic: VertexAttributeSemantic) -> Option<&VertexAttribute> {
        self.attributes
            .iter()
            .find(|attr| attr.semantic == semantic)
    }
}
