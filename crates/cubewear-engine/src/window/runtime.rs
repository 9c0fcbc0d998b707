use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, Timelike, Utc};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::assets::AssetSource;
use crate::config::WatchFaceConfig;
use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::face::{FrameOutcome, Redraw, WatchFace};
use crate::render::RenderTarget;
use crate::scene::DisplayMode;
use crate::time::{Calendar, FrameInstant, MonotonicClock};

/// When ambient-mode frames are scheduled.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AmbientTick {
    /// At the start of every wall-clock minute.
    WallClockMinute,
    /// At a fixed interval after the previous tick.
    Every(Duration),
}

impl AmbientTick {
    /// Delay from `now` until the next tick.
    pub fn delay_after(&self, now: DateTime<Utc>) -> Duration {
        let delay = match *self {
            AmbientTick::WallClockMinute => {
                let into = Duration::new(now.second() as u64, now.nanosecond().min(999_999_999));
                Duration::from_secs(60).saturating_sub(into)
            }
            AmbientTick::Every(interval) => interval,
        };
        delay.max(Duration::from_millis(1))
    }
}

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Start in ambient mode.
    pub start_ambient: bool,
    pub ambient_tick: AmbientTick,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "cubewear".to_string(),
            initial_size: LogicalSize::new(360.0, 360.0),
            start_ambient: false,
            ambient_tick: AmbientTick::WallClockMinute,
        }
    }
}

/// Host events the desktop runtime emulates from the keyboard.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// `A`: enter or leave ambient mode.
    ToggleAmbient,
    /// `Z`: re-read the local time zone, as if it was broadcast as changed.
    RereadTimeZone,
    /// `Escape`: close the face.
    Exit,
}

impl HostCommand {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::KeyA => Some(HostCommand::ToggleAmbient),
            KeyCode::KeyZ => Some(HostCommand::RereadTimeZone),
            KeyCode::Escape => Some(HostCommand::Exit),
            _ => None,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and hosts `face_config` in it until the window closes.
    pub fn run(
        config: RuntimeConfig,
        gpu_init: GpuInit,
        face_config: WatchFaceConfig,
        assets: Box<dyn AssetSource>,
        font: Vec<u8>,
    ) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;

        let mut state = HostState {
            ambient: config.start_ambient,
            config,
            gpu_init,
            face: WatchFace::new(face_config, font),
            assets,
            entry: None,
            clock: MonotonicClock::new(),
            visible: true,
            next_tick: None,
            exit_requested: false,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

#[derive(Debug)]
enum FrameStep {
    Rendered(FrameOutcome),
    /// Swapchain acquisition failed but the surface is usable again.
    Retry,
    /// The face declined the frame (no resources, zero-sized surface).
    Skipped,
    Fatal,
}

impl FrameStep {
    /// Redraw to request after this step. `wanted` is the face's own request.
    ///
    /// A skipped frame waits for the next surface event; requesting again
    /// would spin while the window is minimized.
    fn follow_up(&self, wanted: Redraw) -> Redraw {
        match self {
            FrameStep::Rendered(outcome) => outcome.redraw,
            FrameStep::Retry => wanted,
            FrameStep::Skipped | FrameStep::Fatal => Redraw::None,
        }
    }
}

struct HostState {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    face: WatchFace,
    assets: Box<dyn AssetSource>,

    entry: Option<WindowEntry>,
    clock: MonotonicClock,

    visible: bool,
    ambient: bool,
    next_tick: Option<Instant>,
    exit_requested: bool,
}

impl HostState {
    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()?;

        let now = self.clock.elapsed();
        let (face, assets) = (&mut self.face, &self.assets);
        let redraw = entry.with(|f| {
            let size = f.gpu.size();
            face.on_surface_created(&f.gpu.render_ctx(), assets.as_ref(), size.width, size.height, now)
        })?;

        self.entry = Some(entry);
        self.apply(redraw);
        Ok(())
    }

    /// Acts on a face redraw request.
    fn apply(&self, redraw: Redraw) {
        if redraw == Redraw::Invalidate {
            if let Some(entry) = self.entry.as_ref() {
                entry.with_window(|w| w.request_redraw());
            }
        }
    }

    fn run_command(&mut self, cmd: HostCommand, event_loop: &ActiveEventLoop) {
        match cmd {
            HostCommand::ToggleAmbient => {
                self.ambient = !self.ambient;
                let redraw = self.face.on_ambient_mode_changed(self.ambient, self.clock.elapsed());
                self.next_tick = None;
                self.apply(redraw);
            }
            HostCommand::RereadTimeZone => {
                let redraw = self.face.on_time_zone_changed(Calendar::local_offset());
                self.apply(redraw);
            }
            HostCommand::Exit => {
                self.face.on_surface_destroyed();
                self.request_exit(event_loop);
            }
        }
    }

    fn render(&mut self) -> FrameStep {
        let Some(entry) = self.entry.as_mut() else {
            return FrameStep::Skipped;
        };

        let face = &mut self.face;
        let clock = &mut self.clock;
        let mode = DisplayMode::from_ambient(self.ambient);

        entry.with_mut(|f| {
            let mut frame = match f.gpu.begin_frame() {
                Ok(frame) => frame,
                Err(err) => {
                    log::warn!("surface acquisition failed: {err}");
                    return match f.gpu.handle_surface_error(err) {
                        SurfaceErrorAction::Fatal => FrameStep::Fatal,
                        SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                            FrameStep::Retry
                        }
                    };
                }
            };

            let instant = FrameInstant::new(Utc::now(), clock.tick().now);
            let ctx = f.gpu.render_ctx();
            let result = {
                let mut target =
                    RenderTarget::new(&mut frame.encoder, &frame.view, f.gpu.depth_view());
                face.on_frame(&ctx, &mut target, instant, mode)
            };

            match result {
                Ok(outcome) => {
                    f.gpu.submit(frame);
                    FrameStep::Rendered(outcome)
                }
                Err(err) => {
                    log::warn!("frame skipped: {err}");
                    f.gpu.discard(frame);
                    FrameStep::Skipped
                }
            }
        })
    }

    fn schedule_ambient_tick(&mut self) {
        let delay = self.config.ambient_tick.delay_after(Utc::now());
        self.next_tick = Some(Instant::now() + delay);
    }
}

impl ApplicationHandler for HostState {
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if let StartCause::ResumeTimeReached { .. } = cause {
            self.next_tick = None;
            if self.ambient && self.visible {
                let redraw = self.face.on_time_tick();
                self.apply(redraw);
            }
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(e) = self.create_surface(event_loop) {
            log::error!("failed to create watch face surface: {e:#}");
            self.request_exit(event_loop);
            return;
        }

        if self.ambient {
            let redraw = self.face.on_ambient_mode_changed(true, self.clock.elapsed());
            self.apply(redraw);
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.face.on_surface_destroyed();
        self.entry = None;
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.ambient && self.visible {
            if self.next_tick.is_none() {
                self.schedule_ambient_tick();
            }
            if let Some(deadline) = self.next_tick {
                event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
                return;
            }
        }

        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.face.on_surface_destroyed();
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                let Some(entry) = self.entry.as_mut() else { return };
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));

                match self.face.on_surface_changed(new_size.width, new_size.height) {
                    Ok(redraw) => self.apply(redraw),
                    Err(err) => log::debug!("resize ignored: {err}"),
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let Some(entry) = self.entry.as_mut() else { return };
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));

                if let Ok(redraw) = self.face.on_surface_changed(new_size.width, new_size.height) {
                    self.apply(redraw);
                }
            }

            WindowEvent::Occluded(occluded) => {
                self.visible = !occluded;
                let redraw = self.face.on_visibility_changed(self.visible, self.clock.elapsed());
                self.apply(redraw);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(cmd) = HostCommand::from_key(code) {
                        log::debug!("host command {cmd:?}");
                        self.run_command(cmd, event_loop);
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                let step = self.render();
                if let FrameStep::Fatal = step {
                    log::error!("GPU out of memory; closing the watch face");
                    self.face.on_surface_destroyed();
                    self.request_exit(event_loop);
                    return;
                }
                self.apply(step.follow_up(self.face.redraw_request()));
            }

            _ => {}
        }
    }
}
