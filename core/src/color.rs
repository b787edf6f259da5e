//! Linear RGBA color.

/// A linear RGBA color with `f32` channels in `0.0..=1.0`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from three channels.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Decode a packed `0xRRGGBBAA` word.
    pub fn from_rgba32(rgba: u32) -> Self {
        Self::from_rgba_bytes(rgba.to_be_bytes())
    }

    /// Encode as a packed `0xRRGGBBAA` word.
    ///
    /// Channels are scaled by 255 and truncated; values outside `0.0..=1.0`
    /// saturate.
    pub fn to_rgba32(&self) -> u32 {
        u32::from_be_bytes(self.to_rgba_bytes())
    }

    pub fn from_rgba_bytes(bytes: [u8; 4]) -> Self {
        let channel = |b: u8| b as f32 / 255.0;
        Self::new(
            channel(bytes[0]),
            channel(bytes[1]),
            channel(bytes[2]),
            channel(bytes[3]),
        )
    }

    /// Channels as `[R, G, B, A]` bytes.
    pub fn to_rgba_bytes(&self) -> [u8; 4] {
        let channel = |c: f32| (c * 255.0) as u8;
        [
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a),
        ]
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl From<Color> for [f32; 4] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}
