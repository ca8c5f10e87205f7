use anyhow::Result;

use crate::coords::{Rect, UvRect, Viewport};
use crate::paint::{Color, PackedColor};

use super::batch::{
    BatchConfig, BatchStats, DrawBackend, InstanceLayout, InstanceTransform, SpriteBatch,
};
use super::gpu_backend::WgpuBackend;
use super::RenderCtx;

/// Sprite renderer that leaves the transform to the vertex shader.
///
/// Each quad carries its own rotation, translation and scale; there is no
/// matrix stack.
pub struct InstanceRenderer<B: DrawBackend = WgpuBackend> {
    batch: SpriteBatch<InstanceLayout, B>,
    color: PackedColor,
    clear_color: Color,
}

impl InstanceRenderer<WgpuBackend> {
    pub fn new(ctx: &RenderCtx<'_>, config: &BatchConfig) -> Result<Self> {
        let backend = WgpuBackend::new::<InstanceLayout>(ctx, config)?;
        Self::with_backend(backend, config)
    }

    pub fn begin_frame(&mut self, target: &wgpu::TextureView, viewport: Viewport) {
        let backend = self.batch.backend_mut();
        backend.set_target(target);
        backend.set_viewport(viewport);
    }
}

impl<B: DrawBackend> InstanceRenderer<B> {
    pub fn with_backend(backend: B, config: &BatchConfig) -> Result<Self> {
        Ok(Self {
            batch: SpriteBatch::new(backend, config)?,
            color: PackedColor::WHITE,
            clear_color: Color::BLACK,
        })
    }

    pub fn set_clear_color(&mut self, r: f32, g: f32, b: f32) {
        self.clear_color = Color::rgb(r, g, b);
    }

    pub fn clear(&mut self) {
        self.batch.clear(self.clear_color);
    }

    #[inline]
    pub fn set_color(&mut self, color: PackedColor) {
        self.color = color;
    }

    #[inline]
    pub fn color(&self) -> PackedColor {
        self.color
    }

    /// Draws the local rectangle `(x, y, w, h)` placed by `transform`.
    ///
    /// `(x, y)` is relative to the transform's pivot, so `(-w/2, -h/2, w, h)`
    /// rotates a sprite about its center.
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub fn img(
        &mut self,
        texture: &B::Texture,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        transform: InstanceTransform,
        uv: UvRect,
    ) {
        self.batch
            .push(texture, Rect::new(x, y, w, h), uv, &transform, self.color);
    }

    pub fn flush(&mut self) {
        self.batch.flush();
    }

    /// Flushes and lets go of the frame target. Nothing is drawn again until
    /// the next `begin_frame`.
    pub fn end_frame(&mut self) {
        self.batch.end_frame();
    }

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::render::batch::recording::{Event, FakeTexture, RecordingBackend};
    use crate::render::batch::{InstanceVertex, CAPACITY};

    fn renderer() -> InstanceRenderer<RecordingBackend> {
        InstanceRenderer::with_backend(RecordingBackend::default(), &BatchConfig::default())
            .unwrap()
    }

    #[test]
    fn writes_raw_corners_and_the_transform() {
        let tex = FakeTexture::new(32, 32);
        let t = InstanceTransform::new(0.5, 10.0, 20.0, 2.0, 3.0);
        let mut r = renderer();
        r.img(&tex, 0.0, 0.0, 32.0, 32.0, t, UvRect::FULL);
        assert!(r.backend().draws().is_empty());
        r.flush();

        let v: Vec<InstanceVertex> = r.backend().uploaded_vertices();
        assert_eq!(v.len(), 4);
        let pos: Vec<_> = v.iter().map(|v| v.position).collect();
        assert_eq!(pos, [[0.0, 0.0], [32.0, 32.0], [0.0, 32.0], [32.0, 0.0]]);
        for vert in &v {
            assert_eq!(vert.rotation, 0.5);
            assert_eq!(vert.translation, [10.0, 20.0]);
            assert_eq!(vert.scale, [2.0, 3.0]);
        }
        assert_eq!(v[1].uv, [1.0, 1.0]);
    }

    #[test]
    fn identity_transform_matches_the_local_rect() {
        let t = InstanceTransform::IDENTITY;
        assert_eq!(t.apply([32.0, 16.0]), [32.0, 16.0]);
        assert_eq!(t.translation, Vec2::zero());
    }

    #[test]
    fn overflow_flushes_without_rebinding() {
        let tex = FakeTexture::new(1, 1);
        let mut r = renderer();
        for _ in 0..=CAPACITY {
            r.img(&tex, 0.0, 0.0, 1.0, 1.0, InstanceTransform::IDENTITY, UvRect::FULL);
        }
        r.flush();
        assert_eq!(r.backend().draws(), [CAPACITY as u32 * 6, 6]);
        assert_eq!(r.backend().binds().len(), 1);
    }

    #[test]
    fn end_frame_flushes_before_releasing_the_frame() {
        let tex = FakeTexture::new(1, 1);
        let mut r = renderer();
        r.img(&tex, 0.0, 0.0, 1.0, 1.0, InstanceTransform::IDENTITY, UvRect::FULL);
        r.end_frame();
        let events = &r.backend().events;
        assert_eq!(events[events.len() - 2..], [Event::Draw(6), Event::EndFrame]);
    }

    #[test]
    fn stats_count_quads_and_draws() {
        let a = FakeTexture::new(1, 1);
        let b = FakeTexture::new(1, 1);
        let mut r = renderer();
        for tex in [&a, &b, &b] {
            r.img(tex, 0.0, 0.0, 1.0, 1.0, InstanceTransform::IDENTITY, UvRect::FULL);
        }
        r.flush();
        let stats = r.take_stats();
        assert_eq!(stats.draw_calls, 2);
        assert_eq!(stats.texture_binds, 2);
        assert_eq!(stats.quads, 3);
    }
}
