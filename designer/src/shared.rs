use glam::{Vec3, Mat4};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
  pub pos: Vec3,
}

/// Uniform block bound at set 0, binding 0. Field order and padding follow
/// std140 so the GLSL side can declare it as a plain `uniform Globals` block.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Globals {
  pub projection: Mat4,
  pub view: Mat4,
  pub transform: Mat4,
  pub time: f32,
  pub delta_time: f32,
  _pad: [f32; 2],
}

impl Globals {
  pub fn new(projection: Mat4, view: Mat4, transform: Mat4, time: f32, delta_time: f32) -> Self {
    Self {
      projection,
      view,
      transform,
      time,
      delta_time,
      _pad: [0.0; 2],
    }
  }
}
