//! Mouse-drag rotation, scroll scaling and the projection.

use glam::{Vec3, Mat4};
use crate::math;

/// Pointer coordinates are divided by this to get radians.
pub const REFERENCE_EXTENT: f32 = 800.0;
pub const SCROLL_STEP: f32 = 0.005;
pub const SCALE_MIN: f32 = 0.025;
pub const SCALE_MAX: f32 = 10.0;
pub const FOV: f32 = 90.0;
pub const NEAR: f32 = 0.001;
pub const FAR: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drag {
  Started,
  Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
  pub dragging: bool,
  pub pitch: f32,
  pub yaw: f32,
  pub scale: f32,
  pub transform: Mat4,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionState {
  pub projection: Mat4,
}

pub struct Controller {
  multiplier: f32,
  interaction: InteractionState,
  projection: ProjectionState,
}

impl Controller {
  pub fn new(multiplier: f32, width: u32, height: u32) -> Self {
    let mut controller = Self {
      multiplier,
      interaction: InteractionState {
        dragging: false,
        pitch: 0.0,
        yaw: 0.0,
        scale: 1.0,
        transform: Mat4::IDENTITY,
      },
      projection: ProjectionState {
        projection: Mat4::IDENTITY,
      },
    };
    controller.scroll(0.0);
    controller.resize(width, height);
    controller.recompute();
    controller
  }

  /// Samples the primary button and pointer for this frame and recomputes the
  /// transform. Returns the drag transition, if any.
  pub fn update(&mut self, primary: bool, cursor: (f64, f64)) -> Option<Drag> {
    let state = &mut self.interaction;
    let change = match (state.dragging, primary) {
      (false, true) => Some(Drag::Started),
      (true, false) => Some(Drag::Stopped),
      _ => None,
    };
    state.dragging = primary;
    if state.dragging {
      // absolute, not relative: restarting a drag elsewhere jumps
      state.yaw = cursor.0 as f32 / REFERENCE_EXTENT;
      state.pitch = cursor.1 as f32 / REFERENCE_EXTENT;
    }
    self.recompute();
    change
  }

  pub fn scroll(&mut self, delta: f32) {
    let (min, max) = self.scale_bounds();
    let state = &mut self.interaction;
    state.scale = math::clamp(state.scale + delta * SCROLL_STEP, min, max);
  }

  /// Zero-sized surfaces keep the previous projection.
  pub fn resize(&mut self, width: u32, height: u32) {
    if width == 0 || height == 0 {
      return;
    }
    self.projection.projection = math::perspective_fov(
      FOV.to_radians(),
      width as f32,
      height as f32,
      NEAR,
      FAR * self.multiplier,
    );
  }

  fn recompute(&mut self) {
    let state = &mut self.interaction;
    state.transform = math::compose(
      Vec3::new(-state.pitch, -state.yaw, 0.0),
      Vec3::splat(state.scale),
    );
  }

  pub fn scale_bounds(&self) -> (f32, f32) {
    (SCALE_MIN * self.multiplier, SCALE_MAX * self.multiplier)
  }

  pub fn state(&self) -> &InteractionState {
    &self.interaction
  }

  pub fn transform(&self) -> Mat4 {
    self.interaction.transform
  }

  pub fn projection(&self) -> Mat4 {
    self.projection.projection
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use super::*;

  #[test]
  fn drag_to_corner() {
    let mut c = Controller::new(1.0, 800, 600);
    assert_eq!(c.update(true, (0.0, 0.0)), Some(Drag::Started));
    assert_eq!(c.update(true, (800.0, 600.0)), None);
    assert_relative_eq!(c.state().yaw, 1.0);
    assert_relative_eq!(c.state().pitch, 0.75, epsilon = 1e-6);
    let expected = Mat4::from_rotation_x(-0.75) * Mat4::from_rotation_y(-1.0);
    assert!(c.transform().abs_diff_eq(expected, 1e-6));
  }

  #[test]
  fn rotation_holds_after_release() {
    let mut c = Controller::new(1.0, 800, 600);
    c.update(true, (400.0, 200.0));
    assert_eq!(c.update(false, (10.0, 10.0)), Some(Drag::Stopped));
    assert_relative_eq!(c.state().yaw, 0.5);
    assert_relative_eq!(c.state().pitch, 0.25);
    assert_eq!(c.update(false, (0.0, 0.0)), None);
  }

  #[test]
  fn scale_stays_in_bounds() {
    for m in [0.5, 1.0, 2.0, 40.0] {
      let mut c = Controller::new(m, 800, 600);
      let (min, max) = c.scale_bounds();
      for delta in [5000.0, -1.0, 3.0, -90000.0, 12.5, 0.0, 1e9, -1e9] {
        c.scroll(delta);
        let s = c.state().scale;
        assert!(s >= min && s <= max, "scale {} outside [{}, {}]", s, min, max);
      }
    }
  }

  #[test]
  fn scroll_steps_scale() {
    let mut c = Controller::new(1.0, 800, 600);
    c.scroll(10.0);
    assert_relative_eq!(c.state().scale, 1.05, epsilon = 1e-6);
    c.scroll(-1e6);
    assert_relative_eq!(c.state().scale, 0.025);
  }

  #[test]
  fn initial_scale_is_clamped() {
    let c = Controller::new(200.0, 800, 600);
    assert_relative_eq!(c.state().scale, 5.0, epsilon = 1e-5);
  }

  #[test]
  fn transform_includes_scale() {
    let mut c = Controller::new(1.0, 800, 600);
    c.scroll(100.0);
    c.update(false, (0.0, 0.0));
    assert!(c.transform().abs_diff_eq(Mat4::from_scale(Vec3::splat(1.5)), 1e-6));
  }

  #[test]
  fn far_plane_follows_multiplier() {
    let near = Controller::new(1.0, 800, 600).projection();
    let far = Controller::new(2.0, 800, 600).projection();
    assert_relative_eq!(near.x_axis.x, far.x_axis.x);
    assert!(near.z_axis.z != far.z_axis.z);
    assert!(far.abs_diff_eq(math::perspective_fov(FOV.to_radians(), 800.0, 600.0, NEAR, 60.0), 1e-6));
  }

  #[test]
  fn zero_size_keeps_projection() {
    let mut c = Controller::new(1.0, 800, 600);
    let before = c.projection();
    c.resize(0, 600);
    assert_eq!(c.projection(), before);
    c.resize(600, 600);
    assert_relative_eq!(c.projection().x_axis.x, 1.0, epsilon = 1e-5);
  }
}
