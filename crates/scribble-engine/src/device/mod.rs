//! GPU device + surface management.
//!
//! - [`Gpu`]: wgpu instance/adapter/device/queue and the window surface
//! - [`GpuFrame`]: one acquired swapchain texture plus its encoder
//! - [`SurfaceErrorAction`]: what to do after a failed acquisition

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
