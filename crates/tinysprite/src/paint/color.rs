/// Straight-alpha RGBA color in `[0, 1]`, used for clearing the target.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    /// Opaque color.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub(crate) fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

/// A vertex color packed into one 32-bit word.
///
/// Bytes are laid out R, G, B, A in memory, matching a `unorm8x4` vertex
/// attribute, independent of host endianness. The same value is replicated on
/// all four corners of a quad.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PackedColor(u32);

impl Default for PackedColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl PackedColor {
    pub const WHITE: PackedColor = PackedColor(u32::MAX);

    #[inline]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(u32::from_ne_bytes([r, g, b, a]))
    }

    #[inline]
    pub const fn to_rgba8(self) -> [u8; 4] {
        self.0.to_ne_bytes()
    }

    /// The raw word as written into vertex memory.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }
}
