use winit::dpi::PhysicalSize;

use super::{GpuInit, SurfaceErrorAction};

/// Window surface plus the configuration it was last given.
pub(crate) struct WindowSurface<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,

    /// Drawable size in physical pixels. May be 0x0 while minimized, in which case
    /// `config` keeps the last non-zero size.
    size: PhysicalSize<u32>,
}

impl<'w> WindowSurface<'w> {
    /// Picks format and alpha mode from the adapter's capabilities and configures
    /// the surface. `None` when the adapter cannot present to it at all.
    pub(crate) fn configure(
        surface: wgpu::Surface<'w>,
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        size: PhysicalSize<u32>,
        init: &GpuInit,
    ) -> Option<Self> {
        let caps = surface.get_capabilities(adapter);
        let format = pick_format(&caps.formats, init.prefer_srgb)?;
        let alpha_mode = init
            .alpha_mode
            .filter(|m| caps.alpha_modes.contains(m))
            .or_else(|| caps.alpha_modes.first().copied())
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        surface.configure(device, &config);

        Some(Self {
            surface,
            config,
            size,
        })
    }

    pub(crate) fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    fn has_area(&self) -> bool {
        self.size.width > 0 && self.size.height > 0
    }

    /// Records the new size and reconfigures unless it is zero; wgpu rejects 0x0
    /// surfaces.
    pub(crate) fn resize(&mut self, device: &wgpu::Device, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if !self.has_area() {
            log::debug!("surface minimized; configuration kept");
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(device, &self.config);
    }

    pub(crate) fn acquire(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Reconfigures after a lost or outdated surface and classifies the rest.
    pub(crate) fn recover(
        &self,
        device: &wgpu::Device,
        err: wgpu::SurfaceError,
    ) -> SurfaceErrorAction {
        let action = classify(&err);
        match action {
            SurfaceErrorAction::Reconfigured => {
                if self.has_area() {
                    self.surface.configure(device, &self.config);
                }
                log::debug!("surface {err:?}; reconfigured");
            }
            SurfaceErrorAction::SkipFrame => log::debug!("surface {err:?}; frame skipped"),
            SurfaceErrorAction::Fatal => log::error!("surface {err:?}; giving up"),
        }
        action
    }
}

/// First sRGB format when preferred, else the adapter's first choice.
fn pick_format(formats: &[wgpu::TextureFormat], prefer_srgb: bool) -> Option<wgpu::TextureFormat> {
    let srgb = formats.iter().copied().find(|f| f.is_srgb());
    match srgb {
        Some(f) if prefer_srgb => Some(f),
        _ => formats.first().copied(),
    }
}

fn classify(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat::{Bgra8Unorm, Bgra8UnormSrgb, Rgba16Float};

    #[test]
    fn srgb_preferred_when_available() {
        let formats = [Bgra8Unorm, Bgra8UnormSrgb];
        assert_eq!(pick_format(&formats, true), Some(Bgra8UnormSrgb));
        assert_eq!(pick_format(&formats, false), Some(Bgra8Unorm));
        assert_eq!(pick_format(&[Rgba16Float], true), Some(Rgba16Float));
        assert_eq!(pick_format(&[], true), None);
    }

    #[test]
    fn only_out_of_memory_is_fatal() {
        assert!(classify(&wgpu::SurfaceError::OutOfMemory).is_fatal());
        assert_eq!(
            classify(&wgpu::SurfaceError::Outdated),
            SurfaceErrorAction::Reconfigured
        );
        assert_eq!(classify(&wgpu::SurfaceError::Timeout), SurfaceErrorAction::SkipFrame);
    }
}
