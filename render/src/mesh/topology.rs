use std::fmt;

/// How a mesh's index stream is assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    /// Every three indices form a triangle (default).
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveTopology {
    /// The number the index count must be a multiple of, if any.
    pub fn index_multiple(&self) -> Option<usize> {
        match self {
            Self::Triangles => Some(3),
            Self::Lines => Some(2),
            _ => None,
        }
    }

    /// Number of primitives described by `index_count` indices.
    pub fn primitive_count(&self, index_count: usize) -> usize {
        match self {
            Self::Points => index_count,
            Self::Lines => index_count / 2,
            Self::LineStrip => index_count.saturating_sub(1),
            Self::LineLoop => {
                if index_count < 2 {
                    0
                } else {
                    index_count
                }
            }
            Self::Triangles => index_count / 3,
            Self::TriangleStrip | Self::TriangleFan => index_count.saturating_sub(2),
        }
    }
}

impl fmt::Display for PrimitiveTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Points => "points",
            Self::Lines => "lines",
            Self::LineStrip => "line strip",
            Self::LineLoop => "line loop",
            Self::Triangles => "triangles",
            Self::TriangleStrip => "triangle strip",
            Self::TriangleFan => "triangle fan",
        };
        f.write_str(name)
    }
}
