//! Frame timing: per-frame delta time and a frame-rate meter.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime, RateMeter};
