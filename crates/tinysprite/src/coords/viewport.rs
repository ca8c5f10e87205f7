/// Render-target size in logical pixels.
///
/// Sprites are positioned in this space; the vertex shaders map it to NDC.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Size as uploaded to the GPU; never zero so the shader never divides by it.
    #[inline]
    pub fn uniform_size(self) -> [f32; 2] {
        [self.width.max(1.0), self.height.max(1.0)]
    }
}
