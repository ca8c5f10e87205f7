use super::Vec2;

/// Quad rectangle in local logical pixels (top-left origin, +Y down).
///
/// Width and height may be negative; that mirrors the sprite rather than being
/// normalized away.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// The four corners in batch write order:
    /// top-left, bottom-right, bottom-left, top-right.
    ///
    /// This order pairs with the `[0, 1, 2, 0, 3, 1]` index pattern.
    #[inline]
    pub fn corners(self) -> [[f32; 2]; 4] {
        let (x0, y0) = (self.origin.x, self.origin.y);
        let (x1, y1) = (x0 + self.size.x, y0 + self.size.y);
        [[x0, y0], [x1, y1], [x0, y1], [x1, y0]]
    }
}
