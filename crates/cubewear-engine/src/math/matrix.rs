use glam::{Mat4, Vec3, Vec4};

/// Column-major 4x4 float matrix.
pub type Matrix4 = Mat4;

/// Perspective projection from an explicit view volume.
///
/// `near` and `far` are positive distances along the view direction.
#[inline]
pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Matrix4 {
    debug_assert!(near > 0.0 && far > near);
    let (w, h, d) = (right - left, top - bottom, near - far);
    Mat4::from_cols(
        Vec4::new(2.0 * near / w, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 * near / h, 0.0, 0.0),
        Vec4::new((right + left) / w, (top + bottom) / h, far / d, -1.0),
        Vec4::new(0.0, 0.0, near * far / d, 0.0),
    )
}

/// Orthographic projection.
#[inline]
pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Matrix4 {
    Mat4::orthographic_rh(left, right, bottom, top, near, far)
}

#[inline]
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Matrix4 {
    Mat4::look_at_rh(eye, center, up)
}

#[inline]
pub fn translation(offset: Vec3) -> Matrix4 {
    Mat4::from_translation(offset)
}

/// Rotation by `degrees` around `axis`. The axis does not need to be normalized;
/// a zero axis yields the identity.
pub fn rotation_degrees(degrees: f32, axis: Vec3) -> Matrix4 {
    match axis.try_normalize() {
        Some(axis) => Mat4::from_axis_angle(axis, degrees.to_radians()),
        None => Mat4::IDENTITY,
    }
}

/// Returns `(mv, mvp)` with `mv = view * model` and `mvp = projection * mv`.
#[inline]
pub fn compose_mvp(projection: Matrix4, view: Matrix4, model: Matrix4) -> (Matrix4, Matrix4) {
    let mv = view * model;
    (mv, projection * mv)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── frustum ───────────────────────────────────────────────────────────

    #[test]
    fn symmetric_frustum_has_no_skew() {
        for &(w, h) in &[(320u32, 320u32), (360, 480), (1920, 1080), (1, 7)] {
            let a = w as f32 / h as f32;
            let p = frustum(-a, a, -1.0, 1.0, 1.0, 10.0);
            // Off-center terms vanish for a symmetric volume.
            assert_eq!(p.z_axis.x, 0.0);
            assert_eq!(p.z_axis.y, 0.0);
            // x scale is near / a, y scale is near / 1.
            assert!((p.x_axis.x - 1.0 / a).abs() < 1e-6);
            assert!((p.y_axis.y - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn frustum_maps_near_and_far_to_depth_range() {
        let p = frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 10.0);

        let near = p * Vec4::new(0.0, 0.0, -1.0, 1.0);
        let far = p * Vec4::new(0.0, 0.0, -10.0, 1.0);

        assert!((near.z / near.w).abs() < 1e-6);
        assert!((far.z / far.w - 1.0).abs() < 1e-6);
    }

    #[test]
    fn frustum_mirrors_x() {
        let a = 1.5;
        let p = frustum(-a, a, -1.0, 1.0, 2.0, 8.0);
        let l = p * Vec4::new(-0.7, 0.3, -4.0, 1.0);
        let r = p * Vec4::new(0.7, 0.3, -4.0, 1.0);
        assert!((l.x + r.x).abs() < 1e-6);
        assert_eq!(l.y, r.y);
    }

    // ── ortho ─────────────────────────────────────────────────────────────

    #[test]
    fn ortho_maps_pixel_corners_to_ndc() {
        let p = ortho(0.0, 400.0, 0.0, 300.0, -1.0, 1.0);
        let bl = p * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let tr = p * Vec4::new(400.0, 300.0, 0.0, 1.0);
        assert!((bl.x + 1.0).abs() < 1e-6 && (bl.y + 1.0).abs() < 1e-6);
        assert!((tr.x - 1.0).abs() < 1e-6 && (tr.y - 1.0).abs() < 1e-6);
    }

    // ── rotation ──────────────────────────────────────────────────────────

    #[test]
    fn quarter_turn_about_y() {
        let m = rotation_degrees(90.0, Vec3::Y);
        let v = m.transform_vector3(Vec3::X);
        assert!(v.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
    }

    #[test]
    fn unnormalized_axis_is_accepted() {
        let a = rotation_degrees(33.0, Vec3::new(1.0, 1.0, 1.0));
        let b = rotation_degrees(33.0, Vec3::new(1.0, 1.0, 1.0).normalize());
        assert!(a.abs_diff_eq(b, 1e-6));
    }

    #[test]
    fn zero_axis_is_identity() {
        assert_eq!(rotation_degrees(45.0, Vec3::ZERO), Mat4::IDENTITY);
    }

    // ── composition ───────────────────────────────────────────────────────

    #[test]
    fn mvp_is_reproducible_bit_for_bit() {
        let p = frustum(-1.2, 1.2, -1.0, 1.0, 1.0, 10.0);
        let v = look_at(Vec3::new(0.0, 0.0, -1.0), Vec3::ZERO, Vec3::Y);
        let m = translation(Vec3::new(0.0, 0.0, 2.0)) * rotation_degrees(123.4, Vec3::Y);

        let (mv_a, mvp_a) = compose_mvp(p, v, m);
        let (mv_b, mvp_b) = compose_mvp(p, v, m);

        assert_eq!(mv_a.to_cols_array(), mv_b.to_cols_array());
        assert_eq!(mvp_a.to_cols_array(), mvp_b.to_cols_array());
    }

    #[test]
    fn mvp_is_associative_within_tolerance() {
        let p = frustum(-0.75, 0.75, -1.0, 1.0, 1.0, 10.0);
        let v = look_at(Vec3::new(0.0, 0.0, -1.0), Vec3::ZERO, Vec3::Y);
        let m = rotation_degrees(71.0, Vec3::new(1.0, 1.0, 1.0));

        let (_, mvp) = compose_mvp(p, v, m);
        let other = (p * v) * m;
        assert!(mvp.abs_diff_eq(other, 1e-5));
    }
}
