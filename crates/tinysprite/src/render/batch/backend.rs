use std::sync::atomic::{AtomicU64, Ordering};

use crate::paint::Color;

/// Process-unique texture identity.
///
/// Batching compares identities, not contents: clones of one texture share an
/// id, two uploads of the same pixels do not.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u64);

impl TextureId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// What the batcher needs to know about a texture.
pub trait TextureHandle {
    fn id(&self) -> TextureId;
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

/// GPU command seam used by [`SpriteBatch`](super::SpriteBatch).
///
/// Calls arrive in submission order: for every batch, one `upload_vertices`
/// immediately followed by one `draw_indexed`. `bind_texture` happens between
/// batches, only when the texture actually changes.
pub trait DrawBackend {
    type Texture: TextureHandle;

    /// Replaces the start of the GPU vertex buffer with `bytes`.
    fn upload_vertices(&mut self, bytes: &[u8]);

    /// Makes `texture` the sampled texture for following draws.
    fn bind_texture(&mut self, texture: &Self::Texture);

    /// Draws `index_count` indices (a multiple of 6) from offset zero as a
    /// 16-bit indexed triangle list.
    fn draw_indexed(&mut self, index_count: u32);

    /// Clears the current target.
    fn clear(&mut self, color: Color);

    /// The frame is finished; the current target must not be drawn to again.
    fn end_frame(&mut self) {}
}
