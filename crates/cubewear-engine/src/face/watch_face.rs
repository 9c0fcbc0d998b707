use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};

use crate::assets::AssetSource;
use crate::config::WatchFaceConfig;
use crate::error::{FrameError, InitializationError};
use crate::render::{CubeRenderer, FrameRateOverlay, RenderCtx, RenderTarget};
use crate::scene::{policy_for, DisplayMode, FrameMatrices, RenderContext};
use crate::text::TextRasterizer;
use crate::time::{Calendar, FrameInstant};

/// What the face asks of its host after handling an event.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Redraw {
    /// Schedule another frame as soon as possible.
    Invalidate,
    /// Leave the redraw cadence to the host (ambient ticks, visibility).
    None,
}

/// Result of a rendered frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameOutcome {
    /// Cube rotation used for this frame, in degrees.
    pub rotation_degrees: f32,
    /// The overlay text changed and its texture was re-uploaded.
    pub rate_updated: bool,
    pub redraw: Redraw,
}

/// GPU resources owned for one surface epoch.
struct SurfaceResources {
    cube: CubeRenderer,
    overlay: Option<FrameRateOverlay>,
}

/// The watch face as seen by its host.
///
/// The host forwards surface lifecycle, frame, visibility, ambient and time
/// events; the face renders and answers with a `Redraw` request. Everything
/// runs on the host's rendering thread.
pub struct WatchFace {
    config: WatchFaceConfig,
    font: Vec<u8>,
    calendar: Calendar,
    context: RenderContext,
    resources: Option<SurfaceResources>,
    surface_size: (u32, u32),
    visible: bool,
    mode: DisplayMode,
}

impl WatchFace {
    /// `font` holds the TrueType/OpenType bytes used for the overlay text.
    pub fn new(config: WatchFaceConfig, font: Vec<u8>) -> Self {
        let context = RenderContext::new(config.camera.clone());
        Self {
            config,
            font,
            calendar: Calendar::local(),
            context,
            resources: None,
            surface_size: (0, 0),
            visible: true,
            mode: DisplayMode::Interactive,
        }
    }

    /// Replaces the calendar (time zone) used for the rotation.
    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    // ── surface lifecycle ──────────────────────────────────────────────────

    /// Creates every GPU resource for a new surface.
    ///
    /// Resources from a previous surface are dropped first; nothing is reused
    /// across surfaces. On error the face has no resources and frames fail
    /// with `FrameError::SurfaceNotReady` until a later call succeeds.
    pub fn on_surface_created(
        &mut self,
        ctx: &RenderCtx<'_>,
        assets: &dyn AssetSource,
        width: u32,
        height: u32,
        now: Duration,
    ) -> Result<Redraw, InitializationError> {
        log::debug!("surface created: {width}x{height}");
        self.on_surface_destroyed();

        let cube = CubeRenderer::new(ctx, assets)?;
        let overlay = if self.config.show_frame_rate {
            let text = TextRasterizer::from_bytes(&self.font)?;
            Some(FrameRateOverlay::new(
                ctx,
                text,
                self.config.overlay.clone(),
                now,
            )?)
        } else {
            None
        };

        self.resources = Some(SurfaceResources { cube, overlay });

        if let Err(err) = self.on_surface_changed(width, height) {
            log::warn!("new surface is unusable until resized: {err}");
        }
        Ok(self.redraw_request())
    }

    /// Rebuilds the projection for a resized surface.
    pub fn on_surface_changed(&mut self, width: u32, height: u32) -> Result<Redraw, FrameError> {
        log::debug!("surface changed: {width}x{height}");
        self.surface_size = (width, height);

        let result = self.context.on_surface_changed(width, height);
        if let Some(overlay) = self.overlay_mut() {
            overlay.on_surface_changed(width, height);
        }
        if result.is_err() {
            self.context.on_surface_lost();
        }
        result.map(|()| self.redraw_request())
    }

    /// Releases every GPU resource of the current surface.
    pub fn on_surface_destroyed(&mut self) {
        if self.resources.take().is_some() {
            log::debug!("surface resources released");
        }
        self.context.on_surface_lost();
    }

    // ── frames ─────────────────────────────────────────────────────────────

    /// Computes the rotation and matrices for `wall` in `mode`.
    ///
    /// Does not touch the GPU.
    pub fn prepare(
        &mut self,
        wall: DateTime<Utc>,
        mode: DisplayMode,
    ) -> Result<(f32, FrameMatrices), FrameError> {
        self.mode = mode;

        let reading = self.calendar.read(wall);
        let degrees = policy_for(mode).rotation_degrees(&reading);

        let (width, height) = self.surface_size;
        let matrices = self
            .context
            .update(degrees)
            .ok_or(FrameError::InvalidSurfaceDimensions { width, height })?;

        Ok((degrees, matrices))
    }

    /// Renders one frame: clear, cube, then the overlay, in a single pass.
    ///
    /// Skipped frames (no resources, zero-sized surface) record nothing.
    pub fn on_frame(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        instant: FrameInstant,
        mode: DisplayMode,
    ) -> Result<FrameOutcome, FrameError> {
        if self.resources.is_none() {
            return Err(FrameError::SurfaceNotReady);
        }
        let (rotation_degrees, matrices) = self.prepare(instant.wall, mode)?;
        let clear = self.config.clear_color;

        let Some(res) = self.resources.as_mut() else {
            return Err(FrameError::SurfaceNotReady);
        };

        let rate_updated = match res.overlay.as_mut() {
            Some(overlay) => overlay.tick(ctx.queue, instant.monotonic),
            None => false,
        };

        {
            let mut pass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cubewear frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            res.cube.draw(ctx, &mut pass, &matrices);
            if let Some(overlay) = res.overlay.as_ref() {
                overlay.draw(ctx, &mut pass);
            }
        }

        Ok(FrameOutcome {
            rotation_degrees,
            rate_updated,
            redraw: self.redraw_request(),
        })
    }

    // ── host events ────────────────────────────────────────────────────────

    /// Visibility changed. Becoming visible re-reads the local time zone and
    /// restarts frame-rate sampling at `now`.
    pub fn on_visibility_changed(&mut self, visible: bool, now: Duration) -> Redraw {
        log::debug!("visibility changed: {visible}");
        if visible && !self.visible {
            self.calendar.set_time_zone(Calendar::local_offset());
            if let Some(overlay) = self.overlay_mut() {
                overlay.restart(now);
            }
        }
        self.visible = visible;
        self.redraw_request()
    }

    /// Ambient mode entered or left. Always asks for one frame in the new mode.
    pub fn on_ambient_mode_changed(&mut self, ambient: bool, now: Duration) -> Redraw {
        log::debug!("ambient mode changed: {ambient}");
        let mode = DisplayMode::from_ambient(ambient);
        if self.mode.is_ambient() && !ambient {
            if let Some(overlay) = self.overlay_mut() {
                overlay.restart(now);
            }
        }
        self.mode = mode;
        Redraw::Invalidate
    }

    /// Periodic host tick (once a minute in ambient mode).
    pub fn on_time_tick(&mut self) -> Redraw {
        log::debug!("time tick (ambient: {})", self.mode.is_ambient());
        Redraw::Invalidate
    }

    /// The host's time zone changed to `offset`.
    pub fn on_time_zone_changed(&mut self, offset: FixedOffset) -> Redraw {
        log::debug!("time zone changed to {offset}");
        if self.calendar.set_time_zone(offset) {
            Redraw::Invalidate
        } else {
            Redraw::None
        }
    }

    /// Continuous redraw iff visible and interactive.
    pub fn redraw_request(&self) -> Redraw {
        if self.visible && !self.mode.is_ambient() {
            Redraw::Invalidate
        } else {
            Redraw::None
        }
    }

    // ── accessors ──────────────────────────────────────────────────────────

    #[inline]
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    #[inline]
    pub fn render_context(&self) -> &RenderContext {
        &self.context
    }

    #[inline]
    pub fn config(&self) -> &WatchFaceConfig {
        &self.config
    }

    pub fn has_surface_resources(&self) -> bool {
        self.resources.is_some()
    }

    /// Frame rate currently shown by the overlay, if it is enabled.
    pub fn shown_frame_rate(&self) -> Option<u32> {
        self.resources
            .as_ref()
            .and_then(|r| r.overlay.as_ref())
            .map(FrameRateOverlay::shown_rate)
    }

    fn overlay_mut(&mut self) -> Option<&mut FrameRateOverlay> {
        self.resources.as_mut().and_then(|r| r.overlay.as_mut())
    }
}
