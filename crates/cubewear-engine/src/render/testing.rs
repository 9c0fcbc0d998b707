//! Headless GPU and font fixtures for renderer tests.

use crate::render::RenderCtx;
use crate::text::TextRasterizer;

pub(crate) const SURFACE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Device on wgpu's no-op backend. Validation runs as usual; nothing is
/// executed.
pub(crate) struct TestGpu {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl TestGpu {
    /// `None` where the no-op backend is unavailable; callers skip.
    pub(crate) fn noop() -> Option<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::NOOP,
            backend_options: wgpu::BackendOptions {
                noop: wgpu::NoopBackendOptions { enable: true },
                ..Default::default()
            },
            ..Default::default()
        });

        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
                .ok()?;
        let (device, queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default())).ok()?;

        Some(Self { device, queue })
    }

    pub(crate) fn ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(&self.device, &self.queue, SURFACE_FORMAT, DEPTH_FORMAT)
    }
}

const FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

/// Rasterizer over the first installed system font; tests needing real
/// glyphs skip without one.
pub(crate) fn system_rasterizer() -> Option<TextRasterizer> {
    FONT_PATHS
        .iter()
        .find_map(|p| std::fs::read(p).ok())
        .and_then(|bytes| TextRasterizer::from_bytes(&bytes).ok())
}
