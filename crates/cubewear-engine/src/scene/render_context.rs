use glam::Vec3;

use crate::config::CameraConfig;
use crate::error::FrameError;
use crate::math::{compose_mvp, frustum, look_at, rotation_degrees, translation, Matrix4};

/// Matrices for one cube draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameMatrices {
    /// View * Model.
    pub mv: Matrix4,
    /// Projection * View * Model.
    pub mvp: Matrix4,
}

/// Camera and projection state for the cube.
///
/// Projection and view depend only on the surface size and are rebuilt in
/// `on_surface_changed`. `update` never accumulates: every call overwrites
/// the current matrices from scratch.
#[derive(Debug, Clone)]
pub struct RenderContext {
    camera: CameraConfig,
    surface: Option<(u32, u32)>,
    projection: Matrix4,
    view: Matrix4,
    current: Option<FrameMatrices>,
}

impl RenderContext {
    pub fn new(camera: CameraConfig) -> Self {
        let view = look_at(camera.eye, Vec3::ZERO, Vec3::Y);
        Self {
            camera,
            surface: None,
            projection: Matrix4::IDENTITY,
            view,
            current: None,
        }
    }

    /// Rebuilds projection and view for a `width` x `height` surface.
    ///
    /// Zero-sized surfaces are rejected and leave the previous state intact.
    pub fn on_surface_changed(&mut self, width: u32, height: u32) -> Result<(), FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::InvalidSurfaceDimensions { width, height });
        }

        let aspect = width as f32 / height as f32;
        let CameraConfig { near, far, eye, .. } = self.camera;

        self.projection = frustum(-aspect, aspect, -1.0, 1.0, near, far);
        self.view = look_at(eye, Vec3::ZERO, Vec3::Y);
        self.surface = Some((width, height));
        self.current = None;

        Ok(())
    }

    /// Drops surface-dependent state. `update` returns `None` until the next
    /// successful `on_surface_changed`.
    pub fn on_surface_lost(&mut self) {
        self.surface = None;
        self.current = None;
    }

    /// Computes the matrices for a cube rotated by `degrees`.
    ///
    /// Returns `None` when no valid surface has been configured.
    pub fn update(&mut self, degrees: f32) -> Option<FrameMatrices> {
        self.surface?;

        let model = translation(self.camera.model_offset)
            * rotation_degrees(degrees, self.camera.rotation_axis);
        let (mv, mvp) = compose_mvp(self.projection, self.view, model);

        let m = FrameMatrices { mv, mvp };
        self.current = Some(m);
        Some(m)
    }

    /// Aspect ratio of the configured surface.
    pub fn aspect(&self) -> Option<f32> {
        self.surface.map(|(w, h)| w as f32 / h as f32)
    }

    pub fn surface_size(&self) -> Option<(u32, u32)> {
        self.surface
    }

    #[inline]
    pub fn projection(&self) -> Matrix4 {
        self.projection
    }

    #[inline]
    pub fn view(&self) -> Matrix4 {
        self.view
    }

    /// Matrices produced by the most recent `update`.
    #[inline]
    pub fn current(&self) -> Option<FrameMatrices> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn ready(w: u32, h: u32) -> RenderContext {
        let mut ctx = RenderContext::new(CameraConfig::default());
        ctx.on_surface_changed(w, h).unwrap();
        ctx
    }

    // ── surface ───────────────────────────────────────────────────────────

    #[test]
    fn projection_uses_aspect_ratio() {
        for &(w, h) in &[(320u32, 320u32), (400, 300), (280, 456)] {
            let ctx = ready(w, h);
            let a = w as f32 / h as f32;
            assert_eq!(ctx.aspect(), Some(a));
            let expected = frustum(-a, a, -1.0, 1.0, 1.0, 10.0);
            assert_eq!(ctx.projection(), expected);
        }
    }

    #[test]
    fn zero_sized_surface_is_rejected() {
        let mut ctx = ready(320, 320);
        let before = ctx.projection();

        let err = ctx.on_surface_changed(0, 320).unwrap_err();
        assert_eq!(err, FrameError::InvalidSurfaceDimensions { width: 0, height: 320 });
        assert!(ctx.on_surface_changed(320, 0).is_err());

        assert_eq!(ctx.projection(), before);
        assert_eq!(ctx.surface_size(), Some((320, 320)));
    }

    #[test]
    fn update_without_surface_skips() {
        let mut ctx = RenderContext::new(CameraConfig::default());
        assert!(ctx.update(10.0).is_none());

        let mut ctx = ready(100, 100);
        assert!(ctx.update(10.0).is_some());
        ctx.on_surface_lost();
        assert!(ctx.update(10.0).is_none());
    }

    // ── per-frame ─────────────────────────────────────────────────────────

    #[test]
    fn update_does_not_touch_projection_or_view() {
        let mut ctx = ready(300, 200);
        let (p, v) = (ctx.projection(), ctx.view());
        for deg in [0.0, 45.0, 359.0] {
            ctx.update(deg);
            assert_eq!(ctx.projection(), p);
            assert_eq!(ctx.view(), v);
        }
    }

    #[test]
    fn update_overwrites_rather_than_accumulates() {
        let mut ctx = ready(320, 320);
        let first = ctx.update(30.0).unwrap();
        ctx.update(200.0);
        let again = ctx.update(30.0).unwrap();
        assert_eq!(first.mvp.to_cols_array(), again.mvp.to_cols_array());
        assert_eq!(ctx.current(), Some(again));
    }

    #[test]
    fn mvp_is_projection_times_mv() {
        let mut ctx = ready(360, 360);
        let m = ctx.update(77.0).unwrap();
        assert_eq!(m.mvp, ctx.projection() * m.mv);
    }

    #[test]
    fn cube_center_lands_inside_clip_volume() {
        let mut ctx = ready(320, 320);
        let m = ctx.update(0.0).unwrap();
        let c = m.mvp * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = c.truncate() / c.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn tumbling_variant_also_frames_the_cube() {
        let mut ctx = RenderContext::new(CameraConfig::tumbling());
        ctx.on_surface_changed(320, 290).unwrap();
        let m = ctx.update(123.0).unwrap();
        let c = m.mvp * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let z = c.z / c.w;
        assert!(z > 0.0 && z < 1.0);
    }
}
