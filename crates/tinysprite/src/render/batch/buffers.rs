use bytemuck::Pod;

use super::DrawBackend;

/// Quads per batch. Leaves index headroom under the 16-bit limit
/// (`CAPACITY * 4 <= 65536`).
pub const CAPACITY: usize = 10_922;

pub const VERTICES_PER_QUAD: usize = 4;
pub const INDICES_PER_QUAD: usize = 6;

/// Largest capacity whose vertices are all addressable by a `u16` index.
pub const MAX_CAPACITY: usize = (u16::MAX as usize + 1) / VERTICES_PER_QUAD;

/// Triangulation of one quad, relative to its first vertex.
///
/// Vertices are written top-left, bottom-right, bottom-left, top-right, so
/// this yields (TL, BR, BL) and (TL, TR, BR).
pub const QUAD_INDEX_PATTERN: [u16; INDICES_PER_QUAD] = [0, 1, 2, 0, 3, 1];

/// Index data for `capacity` quads.
///
/// Quad `i` gets `[4i, 4i+1, 4i+2, 4i, 4i+3, 4i+1]`.
pub fn quad_indices(capacity: usize) -> Vec<u16> {
    debug_assert!(capacity <= MAX_CAPACITY);
    let mut out = Vec::with_capacity(capacity * INDICES_PER_QUAD);
    for quad in 0..capacity {
        let base = (quad * VERTICES_PER_QUAD) as u16;
        out.extend(QUAD_INDEX_PATTERN.iter().map(|i| base + i));
    }
    out
}

/// Index count for drawing `quads` quads.
#[inline]
pub fn index_count(quads: usize) -> u32 {
    (quads * INDICES_PER_QUAD) as u32
}

/// Bytes needed to hold `capacity` quads of `V`, on the CPU and on the GPU.
#[inline]
pub const fn vertex_buffer_size<V>(capacity: usize) -> u64 {
    (capacity * VERTICES_PER_QUAD * std::mem::size_of::<V>()) as u64
}

/// CPU backing store for one batch worth of vertices.
///
/// Allocated once at full capacity; writes go into quad slots and only a
/// fully written prefix is ever handed to the backend.
pub struct QuadBuffers<V> {
    quads: Vec<[V; VERTICES_PER_QUAD]>,
}

impl<V: Pod> QuadBuffers<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            quads: vec![[V::zeroed(); VERTICES_PER_QUAD]; capacity],
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.quads.len()
    }

    /// The four vertex slots of quad `slot`.
    #[inline]
    pub fn quad_mut(&mut self, slot: usize) -> &mut [V; VERTICES_PER_QUAD] {
        &mut self.quads[slot]
    }

    /// Pushes the first `count` quads to the GPU buffer.
    ///
    /// Panics if `count` exceeds capacity.
    pub fn upload_range<B: DrawBackend>(&self, count: usize, backend: &mut B) {
        assert!(count <= self.capacity(), "upload of {count} quads exceeds capacity");
        backend.upload_vertices(bytemuck::cast_slice(&self.quads[..count]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::batch::recording::RecordingBackend;

    #[test]
    fn every_slot_follows_the_pattern() {
        let idx = quad_indices(CAPACITY);
        assert_eq!(idx.len(), CAPACITY * 6);
        for (i, quad) in idx.chunks_exact(6).enumerate() {
            let b = (4 * i) as u16;
            assert_eq!(quad, [b, b + 1, b + 2, b, b + 3, b + 1]);
        }
    }

    #[test]
    fn last_index_fits_in_u16() {
        let idx = quad_indices(MAX_CAPACITY);
        assert_eq!(idx.iter().copied().max(), Some(u16::MAX));
        assert!(CAPACITY * VERTICES_PER_QUAD <= 65_536);
    }

    #[test]
    fn index_count_is_six_per_quad() {
        assert_eq!(index_count(0), 0);
        assert_eq!(index_count(CAPACITY), (CAPACITY * 6) as u32);
    }

    #[test]
    fn full_upload_fills_the_sized_buffer() {
        let b = QuadBuffers::<[f32; 5]>::new(8);
        let mut backend = RecordingBackend::default();
        b.upload_range(8, &mut backend);
        assert_eq!(vertex_buffer_size::<[f32; 5]>(8), 8 * 4 * 20);
        assert_eq!(backend.uploaded.len() as u64, vertex_buffer_size::<[f32; 5]>(8));
    }

    #[test]
    #[should_panic(expected = "exceeds capacity")]
    fn upload_past_capacity_panics() {
        let b = QuadBuffers::<[f32; 5]>::new(2);
        b.upload_range(3, &mut RecordingBackend::default());
    }
}
