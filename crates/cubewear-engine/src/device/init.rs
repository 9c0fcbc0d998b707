/// How the GPU layer is brought up for the watch surface.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub backends: wgpu::Backends,
    /// Watch faces run on battery; `LowPower` keeps integrated GPUs selected.
    pub power_preference: wgpu::PowerPreference,

    /// Pick `Bgra8UnormSrgb`/`Rgba8UnormSrgb` when the surface offers one.
    pub prefer_srgb: bool,
    /// FIFO paces frames to the display refresh, which is what the
    /// frame-rate overlay measures.
    pub present_mode: wgpu::PresentMode,
    /// Ignored when the surface does not support it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub desired_maximum_frame_latency: u32,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Depth attachment format for the cube pass.
    pub depth_format: wgpu::TextureFormat,
}

impl GpuInit {
    /// Settings for software or CI adapters: downlevel limits, any backend.
    pub fn downlevel() -> Self {
        Self {
            required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
            ..Self::default()
        }
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::LowPower,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            desired_maximum_frame_latency: 2,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            depth_format: wgpu::TextureFormat::Depth24Plus,
        }
    }
}
