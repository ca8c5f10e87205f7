use anyhow::Result;

use crate::coords::{Rect, UvRect, Viewport};
use crate::paint::{Color, PackedColor};

use super::batch::{AffineLayout, BatchConfig, BatchStats, DrawBackend, SpriteBatch};
use super::gpu_backend::WgpuBackend;
use super::transform::{Affine, MatrixStack};
use super::RenderCtx;

/// Immediate-mode sprite renderer with a CPU matrix stack.
///
/// Quad corners are transformed on the CPU by the current matrix at the time
/// of [`img`](Self::img); later transform calls do not affect quads already
/// written.
pub struct SpriteRenderer<B: DrawBackend = WgpuBackend> {
    batch: SpriteBatch<AffineLayout, B>,
    matrices: MatrixStack,
    color: PackedColor,
    clear_color: Color,
}

impl SpriteRenderer<WgpuBackend> {
    pub fn new(ctx: &RenderCtx<'_>, config: &BatchConfig) -> Result<Self> {
        let backend = WgpuBackend::new::<AffineLayout>(ctx, config)?;
        Self::with_backend(backend, config)
    }

    /// Points following clears and draws at `target` and updates the
    /// projection. Call once per frame before drawing, and pair it with
    /// [`end_frame`](Self::end_frame) before presenting.
    pub fn begin_frame(&mut self, target: &wgpu::TextureView, viewport: Viewport) {
        let backend = self.batch.backend_mut();
        backend.set_target(target);
        backend.set_viewport(viewport);
    }
}

impl<B: DrawBackend> SpriteRenderer<B> {
    pub fn with_backend(backend: B, config: &BatchConfig) -> Result<Self> {
        Ok(Self {
            batch: SpriteBatch::new(backend, config)?,
            matrices: MatrixStack::new(),
            color: PackedColor::WHITE,
            clear_color: Color::BLACK,
        })
    }

    /// Color used by [`clear`](Self::clear). Components in `0.0..=1.0`.
    pub fn set_clear_color(&mut self, r: f32, g: f32, b: f32) {
        self.clear_color = Color::rgb(r, g, b);
    }

    pub fn clear(&mut self) {
        self.batch.clear(self.clear_color);
    }

    /// Tint multiplied into the texture sample of every following quad.
    #[inline]
    pub fn set_color(&mut self, color: PackedColor) {
        self.color = color;
    }

    #[inline]
    pub fn color(&self) -> PackedColor {
        self.color
    }

    #[inline]
    pub fn translate(&mut self, x: f32, y: f32) {
        self.matrices.translate(x, y);
    }

    #[inline]
    pub fn scale(&mut self, x: f32, y: f32) {
        self.matrices.scale(x, y);
    }

    #[inline]
    pub fn rotate(&mut self, theta: f32) {
        self.matrices.rotate(theta);
    }

    #[inline]
    pub fn push(&mut self) {
        self.matrices.push();
    }

    #[inline]
    pub fn pop(&mut self) {
        self.matrices.pop();
    }

    #[inline]
    pub fn transform(&self) -> &Affine {
        self.matrices.current()
    }

    /// Draws `texture` (or the `uv` part of it) into the rectangle
    /// `(x, y, w, h)` of the current local frame.
    #[inline]
    pub fn img(&mut self, texture: &B::Texture, x: f32, y: f32, w: f32, h: f32, uv: UvRect) {
        self.batch.push(
            texture,
            Rect::new(x, y, w, h),
            uv,
            self.matrices.current(),
            self.color,
        );
    }

    pub fn flush(&mut self) {
        self.batch.flush();
    }

    /// Flushes and lets go of the frame target. Nothing is drawn again until
    /// the next `begin_frame`.
    pub fn end_frame(&mut self) {
        self.batch.end_frame();
    }

    /// Quads waiting for the next flush.
    #[inline]
    pub fn len(&self) -> usize {
        self.batch.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    pub fn take_stats(&mut self) -> BatchStats {
        self.batch.take_stats()
    }

    #[inline]
    pub fn backend(&self) -> &B {
        self.batch.backend()
    }
}
