use std::fmt;
use std::str::FromStr;
use glam::Vec3;
use crate::error::ConfigError;
use crate::shared::Vertex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
  Plane,
  Plane10x10,
  Cube,
}

impl Shape {
  pub const ALL: [Shape; 3] = [Shape::Plane, Shape::Plane10x10, Shape::Cube];

  pub fn name(self) -> &'static str {
    match self {
      Shape::Plane => "plane",
      Shape::Plane10x10 => "plane10x10",
      Shape::Cube => "cube",
    }
  }

  fn index(self) -> usize {
    self as usize
  }
}

impl fmt::Display for Shape {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.pad(self.name())
  }
}

impl FromStr for Shape {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Shape::ALL
      .into_iter()
      .find(|shape| shape.name() == s)
      .ok_or_else(|| ConfigError::UnknownShape(s.to_string()))
  }
}

const PLANE: [[f32; 3]; 6] = [
  [1.0, 0.0, 1.0],
  [-1.0, 0.0, 1.0],
  [1.0, 0.0, -1.0],
  [-1.0, 0.0, 1.0],
  [1.0, 0.0, -1.0],
  [-1.0, 0.0, -1.0],
];

#[rustfmt::skip]
const CUBE: [[f32; 3]; 36] = [
  [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0], [1.0, -1.0, 1.0],
  [-1.0, 1.0, 1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0],

  [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, -1.0],
  [-1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0],

  [1.0, 1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, -1.0],
  [1.0, -1.0, 1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0],

  [-1.0, 1.0, 1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, -1.0],
  [-1.0, -1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0],

  [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0], [1.0, -1.0, -1.0],
  [-1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [-1.0, -1.0, -1.0],

  [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, -1.0, -1.0],
  [-1.0, 1.0, -1.0], [1.0, -1.0, -1.0], [-1.0, -1.0, -1.0],
];

const GRID: usize = 10;

// same extent and winding as PLANE, split into GRID x GRID quads
fn grid() -> Vec<[f32; 3]> {
  let step = 2.0 / GRID as f32;
  let mut out = Vec::with_capacity(GRID * GRID * 6);
  for row in 0..GRID {
    for col in 0..GRID {
      let (x0, z0) = (-1.0 + col as f32 * step, -1.0 + row as f32 * step);
      let (x1, z1) = (x0 + step, z0 + step);
      out.extend_from_slice(&[
        [x1, 0.0, z1],
        [x0, 0.0, z1],
        [x1, 0.0, z0],
        [x0, 0.0, z1],
        [x1, 0.0, z0],
        [x0, 0.0, z0],
      ]);
    }
  }
  out
}

pub fn vertices(shape: Shape, multiplier: f32) -> Vec<Vertex> {
  let table = match shape {
    Shape::Plane => PLANE.to_vec(),
    Shape::Plane10x10 => grid(),
    Shape::Cube => CUBE.to_vec(),
  };
  table
    .into_iter()
    .map(|p| Vertex {
      pos: Vec3::from(p) * multiplier,
    })
    .collect()
}

/// Every built-in mesh, scaled once at startup.
pub struct Meshes([Vec<Vertex>; 3]);

impl Meshes {
  pub fn new(multiplier: f32) -> Self {
    Self(Shape::ALL.map(|shape| vertices(shape, multiplier)))
  }

  pub fn get(&self, shape: Shape) -> &[Vertex] {
    &self.0[shape.index()]
  }
}
