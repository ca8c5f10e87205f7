//! Coordinate and geometry types.
//!
//! Canonical CPU space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! The vertex shaders convert to NDC using a viewport uniform.

mod rect;
mod uv;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use uv::UvRect;
pub use vec2::Vec2;
pub use viewport::Viewport;
