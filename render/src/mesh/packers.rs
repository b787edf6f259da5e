//! Attribute packers used to write and read the interlaced vertex stream.
//!
//! - [`PointPacker`] - 32-bit floats, verbatim (positions and UVs)
//! - [`ColorPacker`] - RGBA bytes, red first
//! - [`VectorPacker`] - 16-bit signed normalized lanes (normals, tangents, bitangents)

use ember_core::color::Color;
use ember_core::math::{Point2, Point3, Point4, Vec2, Vec3, Vec4};
use ember_core::memory::{PackedBufferReader, PackedBufferWriter, Packer, UnpackError};

use super::VertexComponents;

macro_rules! lane_packer {
    ($packer:ty, $value:ty, [$lane:ty; $n:literal], |$v:ident| $to:expr, |$a:ident| $from:expr) => {
        impl Packer<$value> for $packer {
            fn pack(&self, writer: &mut PackedBufferWriter<'_>, $v: &$value) {
                let lanes: [$lane; $n] = $to;
                writer.pack_object(&lanes);
            }

            fn unpack(&self, reader: &mut PackedBufferReader<'_>) -> Result<$value, UnpackError> {
                let $a: [$lane; $n] = reader.unpack_object()?;
                Ok($from)
            }
        }
    };
}

// ============================================================================
// Points
// ============================================================================

/// Packs points and coordinates as consecutive 32-bit floats.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointPacker;

lane_packer!(PointPacker, f32, [f32; 1], |v| [*v], |a| a[0]);
lane_packer!(
    PointPacker,
    Point2,
    [f32; 2],
    |v| [v.x, v.y],
    |a| Point2::new(a[0], a[1])
);
lane_packer!(
    PointPacker,
    Point3,
    [f32; 3],
    |v| [v.x, v.y, v.z],
    |a| Point3::new(a[0], a[1], a[2])
);
lane_packer!(
    PointPacker,
    Point4,
    [f32; 4],
    |v| [v.x, v.y, v.z, v.w],
    |a| Point4::new(a[0], a[1], a[2], a[3])
);
lane_packer!(
    PointPacker,
    Vec2,
    [f32; 2],
    |v| [v.x, v.y],
    |a| Vec2::new(a[0], a[1])
);
lane_packer!(
    PointPacker,
    Vec3,
    [f32; 3],
    |v| [v.x, v.y, v.z],
    |a| Vec3::new(a[0], a[1], a[2])
);

// ============================================================================
// Colors
// ============================================================================

/// Packs colors as 8-bit channels in R, G, B, A order.
///
/// A packer for fewer than four channels writes only the leading bytes,
/// rounded up to a power of two. Channels it does not store decode as
/// zero, except alpha which decodes as opaque.
#[derive(Debug, Clone, Copy)]
pub struct ColorPacker {
    lanes: u8,
}

impl ColorPacker {
    /// Packer for all four channels.
    pub const fn new() -> Self {
        Self { lanes: 4 }
    }

    /// Packer for the leading `channels` channels, `1..=4`.
    pub fn with_channels(channels: u8) -> Self {
        debug_assert!(
            (1..=4).contains(&channels),
            "color channel count {channels} outside 1..=4"
        );
        Self {
            lanes: VertexComponents::padded(channels.clamp(1, 4)),
        }
    }

    /// Bytes written per color.
    pub fn lanes(&self) -> usize {
        self.lanes as usize
    }
}

impl Default for ColorPacker {
    fn default() -> Self {
        Self::new()
    }
}

impl Packer<u32> for ColorPacker {
    fn pack(&self, writer: &mut PackedBufferWriter<'_>, rgba: &u32) {
        writer.write_bytes(&rgba.to_be_bytes()[..self.lanes()]);
    }

    fn unpack(&self, reader: &mut PackedBufferReader<'_>) -> Result<u32, UnpackError> {
        reader.rewind_on_error(|reader| {
            let mut bytes = [0, 0, 0, u8::MAX];
            for byte in &mut bytes[..self.lanes()] {
                *byte = reader.unpack_object()?;
            }
            Ok(u32::from_be_bytes(bytes))
        })
    }
}

impl Packer<Color> for ColorPacker {
    fn pack(&self, writer: &mut PackedBufferWriter<'_>, color: &Color) {
        Packer::<u32>::pack(self, writer, &color.to_rgba32());
    }

    fn unpack(&self, reader: &mut PackedBufferReader<'_>) -> Result<Color, UnpackError> {
        Packer::<u32>::unpack(self, reader).map(Color::from_rgba32)
    }
}

// ============================================================================
// Vectors
// ============================================================================

/// Packs unit-range vectors as 16-bit signed normalized lanes.
///
/// Three-component vectors gain a zero fourth lane.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorPacker;

impl VectorPacker {
    /// Scale `x` in `-1.0..=1.0` to `i16`, truncating toward zero.
    #[inline]
    pub fn compress(x: f32) -> i16 {
        (x * i16::MAX as f32) as i16
    }

    #[inline]
    pub fn decompress(x: i16) -> f32 {
        x as f32 / i16::MAX as f32
    }
}

lane_packer!(
    VectorPacker,
    f32,
    [i16; 1],
    |v| [VectorPacker::compress(*v)],
    |a| VectorPacker::decompress(a[0])
);
lane_packer!(
    VectorPacker,
    Vec2,
    [i16; 2],
    |v| [VectorPacker::compress(v.x), VectorPacker::compress(v.y)],
    |a| Vec2::new(
        VectorPacker::decompress(a[0]),
        VectorPacker::decompress(a[1])
    )
);
lane_packer!(
    VectorPacker,
    Vec3,
    [i16; 4],
    |v| [
        VectorPacker::compress(v.x),
        VectorPacker::compress(v.y),
        VectorPacker::compress(v.z),
        0
    ],
    |a| Vec3::new(
        VectorPacker::decompress(a[0]),
        VectorPacker::decompress(a[1]),
        VectorPacker::decompress(a[2])
    )
);
lane_packer!(
    VectorPacker,
    Vec4,
    [i16; 4],
    |v| [
        VectorPacker::compress(v.x),
        VectorPacker::compress(v.y),
        VectorPacker::compress(v.z),
        VectorPacker::compress(v.w)
    ],
    |a| Vec4::from(a.map(VectorPacker::decompress))
);
