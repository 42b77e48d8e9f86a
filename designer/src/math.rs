//! Thin helpers over `glam` for the handful of transforms the designer needs.

pub use glam::{Vec3, Mat4};

/// Clamps by numeric bounds, whichever way round they are passed.
pub fn clamp(value: f32, a: f32, b: f32) -> f32 {
  value.max(a.min(b)).min(a.max(b))
}

/// Right-handed perspective with a `[0, 1]` depth range.
/// `width` and `height` only contribute their ratio.
pub fn perspective_fov(fov: f32, width: f32, height: f32, near: f32, far: f32) -> Mat4 {
  Mat4::perspective_rh(fov, width / height, near, far)
}

/// `RotateX(r.x) * RotateY(r.y) * RotateZ(r.z) * Scale(s)`.
pub fn compose(rotation: Vec3, scale: Vec3) -> Mat4 {
  Mat4::from_rotation_x(rotation.x)
    * Mat4::from_rotation_y(rotation.y)
    * Mat4::from_rotation_z(rotation.z)
    * Mat4::from_scale(scale)
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use super::*;

  #[test]
  fn clamp_ignores_argument_order() {
    assert_eq!(clamp(20.0, 0.025, 10.0), 10.0);
    assert_eq!(clamp(20.0, 10.0, 0.025), 10.0);
    assert_eq!(clamp(0.0, 10.0, 0.025), 0.025);
    assert_eq!(clamp(1.0, 0.025, 10.0), 1.0);
  }

  #[test]
  fn perspective_uses_height_over_width() {
    let p = perspective_fov(90f32.to_radians(), 800.0, 600.0, 0.001, 30.0);
    assert_relative_eq!(p.x_axis.x, 0.75, epsilon = 1e-5);
    assert_relative_eq!(p.y_axis.y, 1.0, epsilon = 1e-5);
    assert_relative_eq!(p.z_axis.w, -1.0);
  }

  #[test]
  fn compose_without_rotation_is_scale() {
    let m = compose(Vec3::ZERO, Vec3::splat(2.0));
    assert!(m.abs_diff_eq(Mat4::from_scale(Vec3::splat(2.0)), 1e-6));
  }

  #[test]
  fn compose_rotates_x_before_y() {
    let (x, y) = (0.3, 1.1);
    let m = compose(Vec3::new(x, y, 0.0), Vec3::ONE);
    let expected = Mat4::from_rotation_x(x) * Mat4::from_rotation_y(y);
    assert!(m.abs_diff_eq(expected, 1e-6));
    let swapped = Mat4::from_rotation_y(y) * Mat4::from_rotation_x(x);
    assert!(!m.abs_diff_eq(swapped, 1e-3));
  }
}
