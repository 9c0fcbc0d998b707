use bytemuck::Pod;

use crate::error::InitializationError;
use crate::render::RenderCtx;

use super::common::uniform_binding_size;

/// Texture and sampler bound next to the uniform block (bindings 1 and 2).
#[derive(Copy, Clone)]
pub struct SampledTexture<'a> {
    pub view: &'a wgpu::TextureView,
    pub sampler: &'a wgpu::Sampler,
}

/// Everything needed to build a `ShaderProgram`.
pub struct ProgramDesc<'a> {
    pub label: &'static str,
    pub source: &'a str,
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    /// Size in bytes of the uniform block at binding 0.
    pub uniform_size: u64,
    pub texture: Option<SampledTexture<'a>>,
    pub blend: Option<wgpu::BlendState>,
    pub cull_mode: Option<wgpu::Face>,
    pub depth: wgpu::DepthStencilState,
}

/// A compiled and linked GPU program with its uniform bindings.
///
/// Every handle a draw needs is created once here, so drawing never looks
/// anything up by name. Dropping the program releases all of its resources.
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ShaderProgram {
    /// Compiles `desc.source` and links it into a render pipeline.
    ///
    /// WGSL validation failures become `ShaderCompile`; pipeline creation
    /// failures (missing entry points, layout mismatches) become `ShaderLink`.
    pub fn link(ctx: &RenderCtx<'_>, desc: ProgramDesc<'_>) -> Result<Self, InitializationError> {
        let label = desc.label;

        let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(desc.source.into()),
        });
        if let Some(err) = pollster::block_on(scope.pop()) {
            log::error!("shader `{label}` failed to compile: {err}");
            return Err(InitializationError::ShaderCompile {
                label: label.to_string(),
                message: err.to_string(),
            });
        }

        let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let mut entries = vec![wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: std::num::NonZeroU64::new(desc.uniform_size),
            },
            count: None,
        }];
        if desc.texture.is_some() {
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            });
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            });
        }

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &entries,
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: desc.vertex_buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: desc.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: desc.cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(desc.depth),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            log::error!("shader `{label}` failed to link: {err}");
            return Err(InitializationError::ShaderLink {
                label: label.to_string(),
                message: err.to_string(),
            });
        }

        let uniforms = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: desc.uniform_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut bind_entries = vec![wgpu::BindGroupEntry {
            binding: 0,
            resource: uniforms.as_entire_binding(),
        }];
        if let Some(tex) = desc.texture {
            bind_entries.push(wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(tex.view),
            });
            bind_entries.push(wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(tex.sampler),
            });
        }

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &bgl,
            entries: &bind_entries,
        });

        log::debug!("linked shader program `{label}`");

        Ok(Self {
            pipeline,
            uniforms,
            bind_group,
        })
    }

    /// Uploads the uniform block. Takes effect for the next submission.
    pub fn write_uniforms<T: Pod>(&self, queue: &wgpu::Queue, value: &T) {
        debug_assert_eq!(
            Some(self.uniforms.size()),
            uniform_binding_size::<T>().map(|n| n.get())
        );
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(value));
    }

    /// Makes this program current in `pass`.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::common::{depth_tested, float_stream};
    use crate::render::testing::TestGpu;

    const POSITION: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    const FLAT: &str = r#"
struct U { m: mat4x4<f32> };
@group(0) @binding(0) var<uniform> u: U;

@vertex
fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {
  return u.m * vec4<f32>(p, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
  return vec4<f32>(1.0);
}
"#;

    fn link(gpu: &TestGpu, label: &'static str, source: &str) -> Result<ShaderProgram, InitializationError> {
        let ctx = gpu.ctx();
        ShaderProgram::link(
            &ctx,
            ProgramDesc {
                label,
                source,
                vertex_buffers: &[float_stream(&POSITION, 3)],
                uniform_size: 64,
                texture: None,
                blend: None,
                cull_mode: None,
                depth: depth_tested(ctx.depth_format),
            },
        )
    }

    // ── link ──────────────────────────────────────────────────────────────

    #[test]
    fn valid_program_links() {
        let Some(gpu) = TestGpu::noop() else { return };
        let program = link(&gpu, "flat", FLAT).unwrap();
        program.write_uniforms(&gpu.queue, &glam::Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn invalid_wgsl_is_a_compile_error() {
        let Some(gpu) = TestGpu::noop() else { return };
        match link(&gpu, "broken", "@vertex fn vs_main( -> {") {
            Err(InitializationError::ShaderCompile { label, message }) => {
                assert_eq!(label, "broken");
                assert!(!message.is_empty());
            }
            Err(other) => panic!("expected ShaderCompile, got {other}"),
            Ok(_) => panic!("broken WGSL linked"),
        }
    }

    #[test]
    fn missing_fragment_entry_point_is_a_link_error() {
        let Some(gpu) = TestGpu::noop() else { return };
        let source = FLAT.replace("fn fs_main", "fn fs_other");
        match link(&gpu, "no fragment", &source) {
            Err(InitializationError::ShaderLink { label, .. }) => assert_eq!(label, "no fragment"),
            Err(other) => panic!("expected ShaderLink, got {other}"),
            Ok(_) => panic!("program without fs_main linked"),
        }
    }
}
