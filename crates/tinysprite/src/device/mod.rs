//! GPU device and surface management: adapter/device/queue creation, surface
//! configuration, frame acquisition.

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
