//! Frame-rate overlay: measures the achieved frame rate and draws it as a
//! screen-space text quad on top of the cube.
//!
//! Text is rasterized on the CPU into a `GlyphCanvas` sized for the widest
//! value and uploaded to an `Rgba8Unorm` texture. The upload happens only
//! when the displayed integer changes, which `FrameRateMeter` limits to once
//! per sampling window.

mod meter;

pub use meter::{FrameRateMeter, SAMPLE_WINDOW};

use std::time::Duration;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::config::OverlayConfig;
use crate::error::InitializationError;
use crate::math::{compose_mvp, look_at, ortho, translation, Matrix4};
use crate::render::RenderCtx;
use crate::text::{GlyphCanvas, TextRasterizer};

use super::common::{depth_ignored, float_stream, premul_alpha_blend, QUAD_INDICES};
use super::shader::{ProgramDesc, SampledTexture, ShaderProgram};

const OVERLAY_SHADER: &str = r#"
struct Uniforms {
  mvp: mat4x4<f32>,
};

@group(0) @binding(0) var<uniform> u: Uniforms;
@group(0) @binding(1) var glyphs: texture_2d<f32>;
@group(0) @binding(2) var glyph_sampler: sampler;

struct VsOut {
  @builtin(position) clip: vec4<f32>,
  @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) uv: vec2<f32>) -> VsOut {
  var out: VsOut;
  out.clip = u.mvp * vec4<f32>(position, 1.0);
  out.uv = uv;
  return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
  // Texels are already premultiplied.
  return textureSample(glyphs, glyph_sampler, in.uv);
}
"#;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct OverlayUniforms {
    mvp: [[f32; 4]; 4],
}

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const UV_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];

/// Texture coordinates for the quad corners, row 0 of the canvas on top.
const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]];

/// Quad corners in pixels for a `width` x `height` glyph texture, +Y up.
fn quad_positions(width: f32, height: f32) -> [[f32; 3]; 4] {
    [
        [0.0, height, 0.0],
        [0.0, 0.0, 0.0],
        [width, 0.0, 0.0],
        [width, height, 0.0],
    ]
}

/// Screen-space MVP that centers a `quad` sized texture on `anchor` (a
/// fraction of the surface, from the bottom-left).
///
/// The camera sits at z = 1 looking at the origin inside a [-2, 2] depth
/// range, so the quad lands at depth 0.75, well inside the clip volume.
pub(crate) fn placement(surface: (u32, u32), quad: (u32, u32), anchor: [f32; 2]) -> Matrix4 {
    let (w, h) = (surface.0 as f32, surface.1 as f32);
    let (bw, bh) = (quad.0 as f32, quad.1 as f32);

    let projection = ortho(0.0, w, 0.0, h, -2.0, 2.0);
    let view = look_at(Vec3::Z, Vec3::ZERO, Vec3::Y);
    let model = translation(Vec3::new(
        (anchor[0] * w - bw * 0.5).round(),
        (anchor[1] * h - bh * 0.5).round(),
        0.0,
    ));

    compose_mvp(projection, view, model).1
}

/// Self-measuring frame-rate counter drawn as a textured quad.
pub struct FrameRateOverlay {
    config: OverlayConfig,
    text: TextRasterizer,
    canvas: GlyphCanvas,
    /// Layout-space y mapped to canvas row 0; shared by every value so the
    /// baseline never moves.
    text_top: f32,
    meter: FrameRateMeter,

    program: ShaderProgram,
    texture: wgpu::Texture,
    positions: wgpu::Buffer,
    uvs: wgpu::Buffer,
    indices: wgpu::Buffer,

    surface: Option<(u32, u32)>,
    uploads: u64,
}

impl FrameRateOverlay {
    /// Creates the overlay for one surface epoch. The first sampling window
    /// starts at `now`; the texture stays blank until it closes.
    pub fn new(
        ctx: &RenderCtx<'_>,
        mut text: TextRasterizer,
        config: OverlayConfig,
        now: Duration,
    ) -> Result<Self, InitializationError> {
        let widest = config.format_rate(config.max_rate);
        let (width, height, text_top) = match text.measure(&widest, config.text_px) {
            Some(b) => (b.width().ceil() as u32, b.height().ceil() as u32, b.min_y),
            None => {
                log::warn!("overlay template {:?} has no visible glyphs", config.format);
                (1, 1, 0.0)
            }
        };
        let canvas = GlyphCanvas::new(width, height);

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("cubewear overlay glyphs"),
            size: wgpu::Extent3d {
                width: canvas.width(),
                height: canvas.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        upload(ctx.queue, &texture, &canvas);

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("cubewear overlay sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let program = ShaderProgram::link(
            ctx,
            ProgramDesc {
                label: "cubewear overlay",
                source: OVERLAY_SHADER,
                vertex_buffers: &[float_stream(&POSITION_ATTRS, 3), float_stream(&UV_ATTRS, 2)],
                uniform_size: std::mem::size_of::<OverlayUniforms>() as u64,
                texture: Some(SampledTexture {
                    view: &view,
                    sampler: &sampler,
                }),
                blend: Some(premul_alpha_blend()),
                cull_mode: None,
                depth: depth_ignored(ctx.depth_format),
            },
        )?;

        let positions = quad_positions(canvas.width() as f32, canvas.height() as f32);
        let buffer = |label: &'static str, contents: &[u8], usage| {
            ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            })
        };

        Ok(Self {
            positions: buffer(
                "cubewear overlay positions",
                bytemuck::cast_slice(&positions),
                wgpu::BufferUsages::VERTEX,
            ),
            uvs: buffer(
                "cubewear overlay uvs",
                bytemuck::cast_slice(&QUAD_UVS),
                wgpu::BufferUsages::VERTEX,
            ),
            indices: buffer(
                "cubewear overlay indices",
                bytemuck::cast_slice(&QUAD_INDICES),
                wgpu::BufferUsages::INDEX,
            ),
            config,
            text,
            canvas,
            text_top,
            meter: FrameRateMeter::new(now),
            program,
            texture,
            surface: None,
            uploads: 0,
        })
    }

    /// Records the surface size used to place the quad. Zero sizes hide the
    /// overlay until the next valid size.
    pub fn on_surface_changed(&mut self, width: u32, height: u32) {
        self.surface = (width > 0 && height > 0).then_some((width, height));
    }

    /// Counts one rendered frame at monotonic time `now`.
    ///
    /// Re-rasterizes and re-uploads the glyph texture only when the
    /// displayed rate changed. Returns whether an upload happened.
    pub fn tick(&mut self, queue: &wgpu::Queue, now: Duration) -> bool {
        let Some(rate) = self.meter.tick(now) else {
            return false;
        };

        let label = self.config.format_rate(rate);
        self.canvas.clear();
        self.text.draw_centered(
            &mut self.canvas,
            &label,
            self.config.text_px,
            self.text_top,
            self.config.color,
        );
        upload(queue, &self.texture, &self.canvas);
        self.uploads += 1;

        log::debug!("frame rate now {rate} ({label:?})");
        true
    }

    /// Starts a fresh sampling window, e.g. after rendering was paused.
    pub fn restart(&mut self, now: Duration) {
        self.meter.restart(now);
    }

    /// Draws the quad over whatever the pass already holds.
    ///
    /// The pipeline neither tests nor writes depth, so the depth buffer and
    /// the depth state of other pipelines in the pass are untouched.
    pub fn draw(&self, ctx: &RenderCtx<'_>, pass: &mut wgpu::RenderPass<'_>) {
        let Some(surface) = self.surface else { return };

        let mvp = placement(surface, self.size(), self.config.anchor);
        self.program.write_uniforms(
            ctx.queue,
            &OverlayUniforms {
                mvp: mvp.to_cols_array_2d(),
            },
        );

        self.program.bind(pass);
        pass.set_vertex_buffer(0, self.positions.slice(..));
        pass.set_vertex_buffer(1, self.uvs.slice(..));
        pass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }

    /// Glyph texture size in pixels.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    #[inline]
    pub fn shown_rate(&self) -> u32 {
        self.meter.shown()
    }

    /// Number of glyph texture uploads after the initial blank one.
    #[inline]
    pub fn uploads(&self) -> u64 {
        self.uploads
    }
}

fn upload(queue: &wgpu::Queue, texture: &wgpu::Texture, canvas: &GlyphCanvas) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        canvas.pixels(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(canvas.bytes_per_row()),
            rows_per_image: Some(canvas.height()),
        },
        wgpu::Extent3d {
            width: canvas.width(),
            height: canvas.height(),
            depth_or_array_layers: 1,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{system_rasterizer, TestGpu};
    use glam::Vec4;

    fn ndc(m: Matrix4, x: f32, y: f32) -> Vec3 {
        let c = m * Vec4::new(x, y, 0.0, 1.0);
        c.truncate() / c.w
    }

    // ── placement ─────────────────────────────────────────────────────────

    #[test]
    fn quad_is_centered_on_anchor() {
        let m = placement((400, 400), (80, 20), [0.25, 0.25]);
        let center = ndc(m, 40.0, 10.0);
        assert!((center.x + 0.5).abs() < 1e-5, "{center:?}");
        assert!((center.y + 0.5).abs() < 1e-5, "{center:?}");
    }

    #[test]
    fn quad_depth_is_inside_clip_volume() {
        let m = placement((320, 290), (64, 18), [0.25, 0.25]);
        let z = ndc(m, 0.0, 0.0).z;
        assert!((z - 0.75).abs() < 1e-5);
    }

    #[test]
    fn placement_follows_surface_size() {
        let small = placement((200, 200), (50, 10), [0.5, 0.5]);
        let large = placement((800, 600), (50, 10), [0.5, 0.5]);
        assert_ne!(small, large);
        // Centered anchor maps the quad center to the middle of the screen.
        let c = ndc(large, 25.0, 5.0);
        assert!(c.x.abs() < 1e-5 && c.y.abs() < 1e-5);
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn top_left_corner_samples_first_canvas_row() {
        let p = quad_positions(30.0, 12.0);
        // The corner with the largest y shows texel row 0 (v = 0).
        for (pos, uv) in p.iter().zip(QUAD_UVS) {
            assert_eq!(pos[1] == 12.0, uv[1] == 0.0);
            assert_eq!(pos[0] == 30.0, uv[0] == 1.0);
        }
    }

    #[test]
    fn uniform_block_is_one_matrix() {
        assert_eq!(std::mem::size_of::<OverlayUniforms>(), 64);
    }

    #[test]
    fn inline_shader_has_entry_points() {
        assert!(OVERLAY_SHADER.contains("fn vs_main"));
        assert!(OVERLAY_SHADER.contains("fn fs_main"));
    }

    // ── glyph uploads ─────────────────────────────────────────────────────

    #[test]
    fn ten_seconds_at_steady_rate_upload_at_most_ten_times() {
        let Some(gpu) = TestGpu::noop() else { return };
        let Some(text) = system_rasterizer() else { return };
        let mut overlay =
            FrameRateOverlay::new(&gpu.ctx(), text, OverlayConfig::default(), Duration::ZERO).unwrap();

        let frame = Duration::from_nanos(1_000_000_000u64.div_ceil(60));
        let mut updated = 0;
        for k in 1..=600u32 {
            if overlay.tick(&gpu.queue, frame * k) {
                updated += 1;
            }
        }

        assert_eq!(overlay.uploads(), updated);
        assert!((1..=10).contains(&overlay.uploads()), "{} uploads", overlay.uploads());
        assert!(overlay.shown_rate().abs_diff(60) <= 1);
    }

    #[test]
    fn glyph_texture_fits_widest_rate() {
        let Some(gpu) = TestGpu::noop() else { return };
        let Some(mut text) = system_rasterizer() else { return };
        let widest = text.measure("999 fps", 24.0).unwrap();
        let overlay =
            FrameRateOverlay::new(&gpu.ctx(), text, OverlayConfig::default(), Duration::ZERO).unwrap();

        assert_eq!(
            overlay.size(),
            (widest.width().ceil() as u32, widest.height().ceil() as u32)
        );
        assert_eq!(overlay.uploads(), 0);
    }
}
