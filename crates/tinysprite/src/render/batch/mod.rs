//! Quad batching: CPU vertex store, vertex layouts, and the accumulator that
//! decides when to hand a batch to the GPU.

mod accumulator;
mod backend;
mod buffers;
mod layout;

#[cfg(test)]
pub(crate) mod recording;

pub use accumulator::{BatchConfig, BatchStats, SpriteBatch};
pub use backend::{DrawBackend, TextureHandle, TextureId};
pub use buffers::{
    index_count, quad_indices, vertex_buffer_size, QuadBuffers, CAPACITY, INDICES_PER_QUAD, MAX_CAPACITY,
    QUAD_INDEX_PATTERN, VERTICES_PER_QUAD,
};
pub use layout::{
    AffineLayout, InstanceLayout, InstanceTransform, InstanceVertex, SpriteVertex, VertexLayout,
};
