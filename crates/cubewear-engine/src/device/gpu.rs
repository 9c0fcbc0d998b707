use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::error::InitializationError;
use crate::render::RenderCtx;

use super::surface::{
    check_depth_format, choose_alpha_mode, choose_surface_format, create_depth_view,
    surface_error_action,
};
use super::{GpuFrame, GpuInit, SurfaceErrorAction};

/// GPU state for one watch surface: device, queue, swapchain configuration
/// and a depth buffer kept at the surface size.
///
/// Borrows the window for `'w`; the host keeps both in one self-referencing
/// entry so the window outlives the surface.
pub struct Gpu<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    depth_format: wgpu::TextureFormat,
    depth_view: wgpu::TextureView,

    /// Physical pixels; may be zero while the window is minimized.
    size: PhysicalSize<u32>,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu. A surface that
    /// offers no color format, or an adapter that cannot render the requested
    /// depth format, fails with `InitializationError::SurfaceConfig`.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        // Surface lifetime is tied to `window` via `'w`.
        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("cubewear device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| InitializationError::Device(e.to_string()))
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&caps.formats, init.prefer_srgb)
            .map_err(InitializationError::from)?;
        check_depth_format(
            init.depth_format,
            adapter.get_texture_format_features(init.depth_format),
        )
        .map_err(InitializationError::from)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode,
            alpha_mode: choose_alpha_mode(&caps.alpha_modes, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, init.depth_format, size.width, size.height);

        log::debug!(
            "surface configured: {}x{} {:?}, depth {:?}",
            size.width,
            size.height,
            format,
            init.depth_format
        );

        Ok(Gpu {
            surface,
            device,
            queue,
            config,
            depth_format: init.depth_format,
            depth_view,
            size,
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn depth_format(&self) -> wgpu::TextureFormat {
        self.depth_format
    }

    /// Depth attachment matching the current surface size.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Renderer-facing view of this context.
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(&self.device, &self.queue, self.config.format, self.depth_format)
    }

    /// Reconfigures the surface and depth buffer after a resize.
    ///
    /// A 0x0 size only updates the recorded size; the swapchain and depth
    /// buffer keep their last valid configuration until a real size arrives.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view =
            create_depth_view(&self.device, self.depth_format, new_size.width, new_size.height);
    }

    /// Acquires the next swapchain texture and opens a command encoder.
    ///
    /// Finish the frame with `submit` or `discard`.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("cubewear frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands and presents the frame.
    pub fn submit(&self, frame: GpuFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        drop(frame.view);
        frame.surface_texture.present();
    }

    /// Drops a frame without presenting anything.
    pub fn discard(&self, frame: GpuFrame) {
        drop(frame.view);
        drop(frame.surface_texture);
    }

    /// Decides what to do about a failed acquisition, reconfiguring the
    /// swapchain when it was lost or outdated.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        let action = surface_error_action(&err);
        if action == SurfaceErrorAction::Reconfigured
            && self.size.width > 0
            && self.size.height > 0
        {
            self.surface.configure(&self.device, &self.config);
        }
        action
    }
}
