/// Normalized texture-coordinate rectangle: `(u0, v0)` top-left, `(u1, v1)` bottom-right.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UvRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl Default for UvRect {
    fn default() -> Self {
        Self::FULL
    }
}

impl UvRect {
    /// The whole texture.
    pub const FULL: UvRect = UvRect::new(0.0, 0.0, 1.0, 1.0);

    #[inline]
    pub const fn new(u0: f32, v0: f32, u1: f32, v1: f32) -> Self {
        Self { u0, v0, u1, v1 }
    }

    /// UVs for a pixel frame `(x, y, w, h)` inside a `tex_w × tex_h` texture.
    ///
    /// Typical use is picking one cell out of a sprite sheet.
    #[inline]
    pub fn from_frame(tex_w: u32, tex_h: u32, x: f32, y: f32, w: f32, h: f32) -> Self {
        let tw = tex_w.max(1) as f32;
        let th = tex_h.max(1) as f32;
        let u0 = x / tw;
        let v0 = y / th;
        Self {
            u0,
            v0,
            u1: u0 + w / tw,
            v1: v0 + h / th,
        }
    }

    /// UV pairs in the same corner order as [`Rect::corners`](super::Rect::corners).
    #[inline]
    pub fn corners(self) -> [[f32; 2]; 4] {
        [
            [self.u0, self.v0],
            [self.u1, self.v1],
            [self.u0, self.v1],
            [self.u1, self.v0],
        ]
    }
}
