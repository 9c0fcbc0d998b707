//! Shared GPU state helpers used by the cube and overlay renderers.

use std::num::NonZeroU64;

// ── blend ─────────────────────────────────────────────────────────────────

/// `One, OneMinusSrcAlpha` on both color and alpha.
pub(crate) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── depth ─────────────────────────────────────────────────────────────────

/// Depth state for geometry that occludes: `Less` with writes.
pub(crate) fn depth_tested(format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Depth state for screen-space overlays: always passes and never writes.
///
/// The pass has a depth attachment, so the pipeline still declares its
/// format; the depth buffer content is left exactly as the cube wrote it.
pub(crate) fn depth_ignored(format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format,
        depth_write_enabled: false,
        depth_compare: wgpu::CompareFunction::Always,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

// ── geometry ──────────────────────────────────────────────────────────────

/// Two triangles over a 4-vertex quad.
pub(crate) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Minimum binding size for a uniform block of type `T`.
pub(crate) fn uniform_binding_size<T>() -> Option<NonZeroU64> {
    NonZeroU64::new(std::mem::size_of::<T>() as u64)
}

/// Vertex layout for a tightly packed per-vertex stream of `floats` f32 values.
pub(crate) fn float_stream(
    attributes: &'static [wgpu::VertexAttribute],
    floats: usize,
) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: (floats * std::mem::size_of::<f32>()) as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}
