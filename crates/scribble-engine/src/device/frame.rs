/// One acquired swapchain texture with its view and command encoder.
///
/// Short-lived: hand it back to [`Gpu::submit`](super::Gpu::submit) in the same
/// frame. Holding the texture blocks acquisition of the next one.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
