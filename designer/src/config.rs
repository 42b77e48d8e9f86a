use crate::mesh::Shape;
use crate::shader::StageSource;

/// Everything the designer needs from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
  pub shape: Shape,
  pub stages: StageSource,
  /// Scales mesh vertices, the far plane and the zoom bounds.
  pub multiplier: f32,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      shape: Shape::Plane,
      stages: StageSource::new(),
      multiplier: 1.0,
    }
  }
}
