//! GPU rendering subsystem.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport uniform.
//!
//! The batching logic in [`batch`] is backend-agnostic; [`WgpuBackend`] is the
//! GPU implementation the renderers use by default.

pub mod batch;
mod common;
mod ctx;
mod gpu_backend;
mod instanced;
mod sprite;
mod texture;
pub mod transform;

pub use batch::{BatchConfig, BatchStats, InstanceTransform};
pub use ctx::RenderCtx;
pub use gpu_backend::WgpuBackend;
pub use instanced::InstanceRenderer;
pub use sprite::SpriteRenderer;
pub use texture::Texture;
pub use transform::{Affine, MatrixStack, MAX_STACK};
