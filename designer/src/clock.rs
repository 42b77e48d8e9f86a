use std::time::Instant;

pub struct FrameClock {
  start: Instant,
  last: f32,
}

impl FrameClock {
  pub fn new() -> Self {
    Self {
      start: Instant::now(),
      last: 0.0,
    }
  }

  /// Seconds since start and since the previous tick.
  pub fn tick(&mut self) -> (f32, f32) {
    let now = self.start.elapsed().as_secs_f32();
    let delta = now - self.last;
    self.last = now;
    (now, delta)
  }
}
