//! Immediate-mode batched 2D sprite renderer on wgpu.
//!
//! Sprites are accumulated into one vertex buffer and drawn with as few
//! indexed draw calls as texture changes and batch capacity allow. Two
//! renderers share the batching core:
//! - [`render::SpriteRenderer`] transforms corners on the CPU with a matrix stack
//! - [`render::InstanceRenderer`] sends rotation/translation/scale per quad and
//!   transforms in the vertex shader
//!
//! [`window::Runtime`] provides a minimal winit + wgpu loop to drive them.

pub mod core;
pub mod device;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
