//! Color representations.
//!
//! - [`Color`]: float RGBA, used for clearing
//! - [`PackedColor`]: 32-bit per-quad vertex color

mod color;

pub use color::{Color, PackedColor};
