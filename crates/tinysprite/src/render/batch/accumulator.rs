use crate::coords::{Rect, UvRect};
use crate::paint::{Color, PackedColor};

use super::buffers::{index_count, QuadBuffers, CAPACITY, MAX_CAPACITY};
use super::{DrawBackend, TextureHandle, TextureId, VertexLayout};

/// Batch sizing.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Quads per draw call. Must be in `1..=16384` so every vertex stays
    /// addressable by a 16-bit index.
    pub capacity: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { capacity: CAPACITY }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (1..=MAX_CAPACITY).contains(&self.capacity),
            "batch capacity {} outside 1..={MAX_CAPACITY}",
            self.capacity
        );
        Ok(())
    }
}

/// Counters accumulated between [`SpriteBatch::take_stats`] calls.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub draw_calls: u32,
    pub texture_binds: u32,
    pub quads: u64,
}

/// Accumulates textured quads into one vertex buffer and submits them in as
/// few draw calls as the texture sequence and capacity allow.
///
/// Invariants between calls:
/// - `0 <= count < capacity`
/// - every quad in `[0, count)` was submitted with the texture `current`
pub struct SpriteBatch<L: VertexLayout, B: DrawBackend> {
    buffers: QuadBuffers<L::Vertex>,
    backend: B,
    count: usize,
    current: Option<TextureId>,
    stats: BatchStats,
}

impl<L: VertexLayout, B: DrawBackend> SpriteBatch<L, B> {
    pub fn new(backend: B, config: &BatchConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            buffers: QuadBuffers::new(config.capacity),
            backend,
            count: 0,
            current: None,
            stats: BatchStats::default(),
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffers.capacity()
    }

    /// Quads written since the last flush.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Texture of the live batch (`None` until the first quad).
    #[inline]
    pub fn current_texture(&self) -> Option<TextureId> {
        self.current
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Returns the counters gathered since the previous call and resets them.
    pub fn take_stats(&mut self) -> BatchStats {
        std::mem::take(&mut self.stats)
    }

    /// Appends one quad.
    ///
    /// Flushes first when `texture` differs from the live batch's texture or
    /// when the quad would not fit; rebinds only on an actual texture change.
    /// Flushes again right after the write if that filled the batch.
    pub fn push(
        &mut self,
        texture: &B::Texture,
        rect: Rect,
        uv: UvRect,
        params: &L::Params,
        color: PackedColor,
    ) {
        let id = texture.id();
        let texture_changed = self.current != Some(id);

        if texture_changed || self.count + 1 > self.capacity() {
            self.submit();
            if texture_changed {
                self.current = Some(id);
                self.backend.bind_texture(texture);
                self.stats.texture_binds += 1;
            }
        }

        L::write_quad(self.buffers.quad_mut(self.count), rect, uv, params, color);
        self.count += 1;

        if self.count >= self.capacity() {
            self.submit();
        }
    }

    /// Submits any pending quads. No-op when the batch is empty.
    pub fn flush(&mut self) {
        self.submit();
    }

    /// Submits any pending quads, then releases the backend's frame target.
    pub fn end_frame(&mut self) {
        self.submit();
        self.backend.end_frame();
    }

    /// Forwards a clear to the backend. Pending quads stay pending and land on
    /// top of the cleared target at the next flush.
    pub fn clear(&mut self, color: Color) {
        self.backend.clear(color);
    }

    fn submit(&mut self) {
        if self.count == 0 {
            return;
        }
        self.buffers.upload_range(self.count, &mut self.backend);
        self.backend.draw_indexed(index_count(self.count));

        self.stats.draw_calls += 1;
        self.stats.quads += self.count as u64;
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::batch::recording::{Event, FakeTexture, RecordingBackend};
    use crate::render::batch::{AffineLayout, SpriteVertex};
    use crate::render::transform::Affine;

    type Batch = SpriteBatch<AffineLayout, RecordingBackend>;

    const STRIDE: usize = std::mem::size_of::<SpriteVertex>() * 4;

    fn batch(capacity: usize) -> Batch {
        SpriteBatch::new(RecordingBackend::default(), &BatchConfig { capacity }).unwrap()
    }

    fn quad(b: &mut Batch, tex: &FakeTexture) {
        b.push(
            tex,
            Rect::new(0.0, 0.0, 32.0, 32.0),
            UvRect::FULL,
            &Affine::IDENTITY,
            PackedColor::WHITE,
        );
    }

    #[test]
    fn default_capacity_is_10922() {
        assert_eq!(BatchConfig::default().capacity, 10_922);
    }

    #[test]
    fn rejects_capacity_outside_u16_range() {
        assert!(BatchConfig { capacity: 0 }.validate().is_err());
        assert!(BatchConfig { capacity: 16_385 }.validate().is_err());
        assert!(BatchConfig { capacity: 16_384 }.validate().is_ok());
    }

    #[test]
    fn single_texture_under_capacity_is_one_draw() {
        let tex = FakeTexture::new(32, 32);
        let mut b = batch(CAPACITY);
        for _ in 0..500 {
            quad(&mut b, &tex);
        }
        assert!(b.backend().draws().is_empty());

        b.flush();
        assert_eq!(b.backend().draws(), [500 * 6]);
        assert_eq!(b.backend().binds(), [tex.id()]);
        assert!(b.is_empty());
    }

    #[test]
    fn exactly_capacity_flushes_on_the_last_write() {
        let tex = FakeTexture::new(1, 1);
        let mut b = batch(CAPACITY);
        for _ in 0..CAPACITY {
            quad(&mut b, &tex);
        }
        assert_eq!(b.backend().draws(), [index_count(CAPACITY)]);
        assert_eq!(b.len(), 0);

        b.flush();
        assert_eq!(b.backend().draws().len(), 1);
    }

    #[test]
    fn capacity_plus_one_is_two_draws() {
        let tex = FakeTexture::new(1, 1);
        let mut b = batch(CAPACITY);
        for _ in 0..=CAPACITY {
            quad(&mut b, &tex);
        }
        assert_eq!(b.backend().draws(), [index_count(CAPACITY)]);
        assert_eq!(b.len(), 1);

        b.flush();
        assert_eq!(b.backend().draws(), [index_count(CAPACITY), 6]);
        assert_eq!(b.backend().binds().len(), 1);
    }

    #[test]
    fn overflow_splits_into_ceil_n_over_capacity_draws() {
        let cap = 7;
        let tex = FakeTexture::new(1, 1);
        for n in [1usize, 6, 7, 8, 14, 15, 50] {
            let mut b = batch(cap);
            for _ in 0..n {
                quad(&mut b, &tex);
            }
            b.flush();

            let draws = b.backend().draws();
            assert_eq!(draws.len(), n.div_ceil(cap), "n = {n}");
            let total: u32 = draws.iter().sum();
            assert_eq!(total, index_count(n));
            assert!(draws[..draws.len() - 1].iter().all(|&d| d == index_count(cap)));
            assert_eq!(b.backend().binds().len(), 1, "capacity flush must not rebind");
        }
    }

    #[test]
    fn count_stays_below_capacity_between_calls() {
        let tex = FakeTexture::new(1, 1);
        let mut b = batch(5);
        for _ in 0..23 {
            quad(&mut b, &tex);
            assert!(b.len() < b.capacity());
        }
    }

    #[test]
    fn alternating_textures_flush_and_rebind_on_every_switch() {
        let a = FakeTexture::new(1, 1);
        let c = FakeTexture::new(1, 1);
        let mut b = batch(CAPACITY);
        for i in 0..10 {
            quad(&mut b, if i % 2 == 0 { &a } else { &c });
        }
        b.flush();

        assert_eq!(b.backend().draws(), [6; 10]);
        assert_eq!(b.backend().binds().len(), 10);
        assert_eq!(b.take_stats().texture_binds, 10);
    }

    #[test]
    fn runs_of_one_texture_share_a_draw() {
        let a = FakeTexture::new(1, 1);
        let c = FakeTexture::new(1, 1);
        let mut b = batch(CAPACITY);
        for tex in [&a, &a, &a, &c, &c, &a] {
            quad(&mut b, tex);
        }
        b.flush();

        assert_eq!(b.backend().draws(), [18, 12, 6]);
        assert_eq!(b.backend().binds(), [a.id(), c.id(), a.id()]);
    }

    #[test]
    fn texture_switch_right_after_a_capacity_flush() {
        let a = FakeTexture::new(1, 1);
        let c = FakeTexture::new(1, 1);
        let mut b = batch(3);
        for tex in [&a, &a, &a, &c, &c, &c, &c] {
            quad(&mut b, tex);
        }
        b.flush();

        assert_eq!(b.backend().draws(), [18, 18, 6]);
        assert_eq!(b.backend().binds(), [a.id(), c.id()]);
        let events = &b.backend().events;
        assert_eq!(events[..3], [Event::Bind(a.id()), Event::Upload(3 * STRIDE), Event::Draw(18)]);
        assert_eq!(events[3], Event::Bind(c.id()));
    }

    #[test]
    fn clones_of_a_texture_do_not_break_the_batch() {
        let a = FakeTexture::new(4, 4);
        let a2 = a.clone();
        let mut b = batch(CAPACITY);
        quad(&mut b, &a);
        quad(&mut b, &a2);
        b.flush();
        assert_eq!(b.backend().draws(), [12]);
    }

    #[test]
    fn first_quad_binds_without_an_empty_draw() {
        let tex = FakeTexture::new(1, 1);
        let mut b = batch(CAPACITY);
        quad(&mut b, &tex);
        assert_eq!(b.backend().events, [Event::Bind(tex.id())]);
        assert_eq!(b.current_texture(), Some(tex.id()));
    }

    #[test]
    fn upload_always_precedes_its_draw_with_the_exact_range() {
        let a = FakeTexture::new(1, 1);
        let c = FakeTexture::new(1, 1);
        let mut b = batch(CAPACITY);
        quad(&mut b, &a);
        quad(&mut b, &a);
        quad(&mut b, &c);
        b.flush();

        assert_eq!(
            b.backend().events,
            [
                Event::Bind(a.id()),
                Event::Upload(2 * STRIDE),
                Event::Draw(12),
                Event::Bind(c.id()),
                Event::Upload(STRIDE),
                Event::Draw(6),
            ]
        );
    }

    #[test]
    fn flush_is_idempotent() {
        let tex = FakeTexture::new(1, 1);
        let mut b = batch(CAPACITY);
        b.flush();
        quad(&mut b, &tex);
        b.flush();
        b.flush();
        assert_eq!(b.backend().draws(), [6]);
    }

    #[test]
    fn stats_are_drained() {
        let tex = FakeTexture::new(1, 1);
        let mut b = batch(4);
        for _ in 0..9 {
            quad(&mut b, &tex);
        }
        b.flush();
        assert_eq!(
            b.take_stats(),
            BatchStats { draw_calls: 3, texture_binds: 1, quads: 9 }
        );
        assert_eq!(b.take_stats(), BatchStats::default());
    }

    #[test]
    fn end_frame_submits_pending_quads_before_releasing_the_target() {
        let tex = FakeTexture::new(1, 1);
        let mut b = batch(CAPACITY);
        quad(&mut b, &tex);
        quad(&mut b, &tex);
        b.end_frame();

        assert!(b.is_empty());
        assert_eq!(
            b.backend().events[1..],
            [Event::Upload(2 * STRIDE), Event::Draw(12), Event::EndFrame]
        );
    }

    #[test]
    fn ending_an_empty_frame_draws_nothing() {
        let tex = FakeTexture::new(1, 1);
        let mut b = batch(CAPACITY);
        quad(&mut b, &tex);
        b.end_frame();
        b.end_frame();
        b.flush();

        let events = &b.backend().events;
        assert_eq!(events.last(), Some(&Event::EndFrame));
        assert_eq!(b.backend().draws(), [6]);
    }

    #[test]
    fn clear_reaches_the_backend_and_keeps_pending_quads() {
        let tex = FakeTexture::new(1, 1);
        let mut b = batch(CAPACITY);
        quad(&mut b, &tex);
        b.clear(Color::rgb(0.227, 0.227, 0.227));
        assert_eq!(b.len(), 1);
        assert!(matches!(b.backend().events.last(), Some(Event::Clear(_))));
    }
}
