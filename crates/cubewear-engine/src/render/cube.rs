use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::assets::{AssetSource, CUBE_SHADER};
use crate::error::InitializationError;
use crate::render::RenderCtx;
use crate::scene::FrameMatrices;

use super::common::{depth_tested, float_stream};
use super::mesh::{CubeMesh, CUBE_VERTEX_COUNT};
use super::shader::{ProgramDesc, ShaderProgram};

/// Uniform block of `shaders/cube.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct CubeUniforms {
    pub mvp: [[f32; 4]; 4],
    pub mv: [[f32; 4]; 4],
    pub light_pos: [f32; 4],
}

impl CubeUniforms {
    /// Light sits at the eye-space origin, i.e. on the camera.
    pub(crate) fn new(m: &FrameMatrices) -> Self {
        Self {
            mvp: m.mvp.to_cols_array_2d(),
            mv: m.mv.to_cols_array_2d(),
            light_pos: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const COLOR_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x4];
const NORMAL_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];

/// Draws the lit, face-colored cube.
///
/// Geometry is uploaded once as three separate vertex streams and rebound on
/// every draw. The program depth-tests (`Less`) and writes depth.
pub struct CubeRenderer {
    program: ShaderProgram,
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    normals: wgpu::Buffer,
}

impl CubeRenderer {
    pub fn new(ctx: &RenderCtx<'_>, assets: &dyn AssetSource) -> Result<Self, InitializationError> {
        let source = assets.load_text(CUBE_SHADER)?;

        let program = ShaderProgram::link(
            ctx,
            ProgramDesc {
                label: "cubewear cube",
                source: &source,
                vertex_buffers: &[
                    float_stream(&POSITION_ATTRS, 3),
                    float_stream(&COLOR_ATTRS, 4),
                    float_stream(&NORMAL_ATTRS, 3),
                ],
                uniform_size: std::mem::size_of::<CubeUniforms>() as u64,
                texture: None,
                blend: None,
                cull_mode: Some(wgpu::Face::Back),
                depth: depth_tested(ctx.depth_format),
            },
        )?;

        let mesh = CubeMesh::new();
        let stream = |label: &'static str, contents: &[u8]| {
            ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::VERTEX,
            })
        };

        Ok(Self {
            program,
            positions: stream("cubewear cube positions", bytemuck::cast_slice(&mesh.positions)),
            colors: stream("cubewear cube colors", bytemuck::cast_slice(&mesh.colors)),
            normals: stream("cubewear cube normals", bytemuck::cast_slice(&mesh.normals)),
        })
    }

    /// Records one draw of the cube with the given matrices.
    ///
    /// Leaves the cube program bound in `pass`.
    pub fn draw(&self, ctx: &RenderCtx<'_>, pass: &mut wgpu::RenderPass<'_>, m: &FrameMatrices) {
        self.program.write_uniforms(ctx.queue, &CubeUniforms::new(m));

        self.program.bind(pass);
        pass.set_vertex_buffer(0, self.positions.slice(..));
        pass.set_vertex_buffer(1, self.colors.slice(..));
        pass.set_vertex_buffer(2, self.normals.slice(..));
        pass.draw(0..CUBE_VERTEX_COUNT as u32, 0..1);
    }
}
