use crate::error::SurfaceConfigError;

use super::SurfaceErrorAction;

pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Result<wgpu::TextureFormat, SurfaceConfigError> {
    let first = formats.first().copied().ok_or(SurfaceConfigError::NoSurfaceFormat)?;

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| formats.contains(f)) {
            return Ok(f);
        }
    }

    Ok(first)
}

pub(crate) fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Checks that `format` is a depth format the adapter can render into.
pub(crate) fn check_depth_format(
    format: wgpu::TextureFormat,
    features: wgpu::TextureFormatFeatures,
) -> Result<(), SurfaceConfigError> {
    let renderable = features
        .allowed_usages
        .contains(wgpu::TextureUsages::RENDER_ATTACHMENT);

    if format.has_depth_aspect() && renderable {
        Ok(())
    } else {
        Err(SurfaceConfigError::NoDepthFormat(format))
    }
}

/// Maps an acquisition error to the action the frame loop should take.
///
/// `Reconfigured` means the caller must reconfigure the surface before the
/// next acquisition.
pub(crate) fn surface_error_action(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
        wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

pub(crate) fn create_depth_view(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("cubewear depth"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
