//! Watch-face configuration.
//!
//! Keep these structures small. Defaults reproduce the shipped watch face.

use glam::Vec3;

use crate::paint::Color;

/// Camera, projection and model placement for the cube.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// Near plane distance of the frustum.
    pub near: f32,
    /// Far plane distance of the frustum.
    pub far: f32,
    /// Camera position. The camera always looks at the origin with +Y up.
    pub eye: Vec3,
    /// Translation applied to the cube before rotating it.
    pub model_offset: Vec3,
    /// Axis the cube rotates around. Need not be normalized.
    pub rotation_axis: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            near: 1.0,
            far: 10.0,
            eye: Vec3::new(0.0, 0.0, -1.0),
            model_offset: Vec3::new(0.0, 0.0, 2.0),
            rotation_axis: Vec3::Y,
        }
    }
}

impl CameraConfig {
    /// Tighter frustum with the cube tumbling about the diagonal axis.
    pub fn tumbling() -> Self {
        Self {
            near: 3.0,
            far: 7.0,
            eye: Vec3::new(0.0, 0.0, -4.0),
            model_offset: Vec3::ZERO,
            rotation_axis: Vec3::ONE,
        }
    }
}

/// Frame-rate text overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    /// Text size in pixels.
    pub text_px: f32,
    /// Text color (premultiplied).
    pub color: Color,
    /// Display template; `{}` is replaced by the rate.
    pub format: String,
    /// Widest rate the glyph texture must fit.
    pub max_rate: u32,
    /// Anchor of the text center as a fraction of the surface, from the
    /// bottom-left corner.
    pub anchor: [f32; 2],
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            text_px: 24.0,
            color: Color::WHITE,
            format: "{} fps".to_string(),
            max_rate: 999,
            anchor: [0.25, 0.25],
        }
    }
}

impl OverlayConfig {
    /// Formats `rate` with the configured template.
    pub fn format_rate(&self, rate: u32) -> String {
        if self.format.contains("{}") {
            self.format.replacen("{}", &rate.to_string(), 1)
        } else {
            format!("{rate} {}", self.format)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatchFaceConfig {
    pub camera: CameraConfig,
    pub overlay: OverlayConfig,
    /// Background color for every frame; transparent so the host's
    /// compositor shows through on an alpha-capable surface.
    pub clear_color: Color,
    /// Draw the frame-rate overlay.
    pub show_frame_rate: bool,
}

impl Default for WatchFaceConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            overlay: OverlayConfig::default(),
            clear_color: Color::TRANSPARENT,
            show_frame_rate: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_face_clears_to_transparent() {
        let c = WatchFaceConfig::default();
        assert_eq!(c.clear_color, Color::TRANSPARENT);
        assert!(c.show_frame_rate);
    }

    #[test]
    fn default_template() {
        let c = OverlayConfig::default();
        assert_eq!(c.format_rate(60), "60 fps");
        assert_eq!(c.format_rate(c.max_rate), "999 fps");
    }

    #[test]
    fn custom_template_replaces_first_placeholder() {
        let c = OverlayConfig {
            format: "FPS: {} ({})".into(),
            ..OverlayConfig::default()
        };
        assert_eq!(c.format_rate(7), "FPS: 7 ({})");
    }

    #[test]
    fn template_without_placeholder_is_used_as_suffix() {
        let c = OverlayConfig {
            format: "Hz".into(),
            ..OverlayConfig::default()
        };
        assert_eq!(c.format_rate(30), "30 Hz");
    }

    #[test]
    fn default_camera_sits_in_front_of_cube() {
        let c = CameraConfig::default();
        let distance = (c.model_offset - c.eye).length();
        assert!(distance > c.near && distance < c.far);
    }

    #[test]
    fn tumbling_camera_sits_in_front_of_cube() {
        let c = CameraConfig::tumbling();
        let distance = (c.model_offset - c.eye).length();
        assert!(distance > c.near && distance < c.far);
    }
}
