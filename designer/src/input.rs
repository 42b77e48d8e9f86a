use std::collections::HashSet;
use winit::event::{WindowEvent, ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::{PhysicalKey, KeyCode};

/// Keyboard and pointer state accumulated from window events between frames.
pub struct Input {
  held: HashSet<KeyCode>,
  pressed: Vec<KeyCode>,
  primary: bool,
  cursor: (f64, f64),
  /// While set, the pointer is grabbed and `cursor` is a virtual position
  /// driven by raw motion deltas, unbounded by the window.
  grabbed: bool,
  scroll: f32,
}

impl Input {
  pub fn new() -> Self {
    Self {
      held: HashSet::new(),
      pressed: vec![],
      primary: false,
      cursor: (0.0, 0.0),
      grabbed: false,
      scroll: 0.0,
    }
  }

  pub fn event(&mut self, event: &WindowEvent) {
    match event {
      WindowEvent::KeyboardInput { event, .. } => {
        if let PhysicalKey::Code(k) = event.physical_key {
          self.key(k, event.state == ElementState::Pressed, event.repeat);
        }
      }
      WindowEvent::MouseInput { state, button, .. } => {
        self.button(*button, *state == ElementState::Pressed)
      }
      WindowEvent::CursorMoved { position, .. } => self.cursor_moved(position.x, position.y),
      WindowEvent::MouseWheel { delta, .. } => self.wheel(*delta),
      WindowEvent::Focused(false) => self.release_all(),
      _ => {}
    }
  }

  pub fn key(&mut self, key: KeyCode, pressed: bool, repeat: bool) {
    if pressed {
      if !repeat {
        self.pressed.push(key);
      }
      self.held.insert(key);
    } else {
      self.held.remove(&key);
    }
  }

  pub fn button(&mut self, button: MouseButton, pressed: bool) {
    if button == MouseButton::Left {
      self.primary = pressed;
    }
  }

  pub fn cursor_moved(&mut self, x: f64, y: f64) {
    if !self.grabbed {
      self.cursor = (x, y);
    }
  }

  /// Raw pointer motion, only applied while grabbed.
  pub fn motion(&mut self, dx: f64, dy: f64) {
    if self.grabbed {
      self.cursor.0 += dx;
      self.cursor.1 += dy;
    }
  }

  pub fn set_grabbed(&mut self, grabbed: bool) {
    self.grabbed = grabbed;
  }

  pub fn grabbed(&self) -> bool {
    self.grabbed
  }

  /// Positive is away from the user. Pixel deltas count 0.01 per pixel.
  pub fn wheel(&mut self, delta: MouseScrollDelta) {
    self.scroll += match delta {
      MouseScrollDelta::LineDelta(_, v) => v,
      MouseScrollDelta::PixelDelta(pos) => 0.01 * pos.y as f32,
    };
  }

  fn release_all(&mut self) {
    self.held.clear();
    self.primary = false;
  }

  pub fn held(&self, key: KeyCode) -> bool {
    self.held.contains(&key)
  }

  pub fn primary_held(&self) -> bool {
    self.primary
  }

  pub fn cursor(&self) -> (f64, f64) {
    self.cursor
  }

  /// Keys newly pressed since the last call, in press order.
  pub fn take_pressed(&mut self) -> Vec<KeyCode> {
    std::mem::take(&mut self.pressed)
  }

  pub fn take_scroll(&mut self) -> f32 {
    std::mem::take(&mut self.scroll)
  }
}

/// Fires once on the transition from released to held.
#[derive(Debug, Default)]
pub struct EdgeTrigger {
  held: bool,
}

impl EdgeTrigger {
  pub fn update(&mut self, held: bool) -> bool {
    let rising = held && !self.held;
    self.held = held;
    rising
  }
}

#[cfg(test)]
mod tests {
  use winit::dpi::PhysicalPosition;
  use super::*;

  #[test]
  fn held_signal_fires_once() {
    let mut trigger = EdgeTrigger::default();
    let fired = (0..10).filter(|_| trigger.update(true)).count();
    assert_eq!(fired, 1);
  }

  #[test]
  fn fires_on_first_held_frame_and_again_after_release() {
    let mut trigger = EdgeTrigger::default();
    let frames = [false, false, true, true, false, true, true];
    let fired = frames.map(|held| trigger.update(held));
    assert_eq!(fired, [false, false, true, false, false, true, false]);
  }

  #[test]
  fn repeats_do_not_count_as_presses() {
    let mut input = Input::new();
    input.key(KeyCode::Digit2, true, false);
    input.key(KeyCode::Digit2, true, true);
    input.key(KeyCode::Digit2, true, true);
    assert!(input.held(KeyCode::Digit2));
    assert_eq!(input.take_pressed(), [KeyCode::Digit2]);
    assert!(input.take_pressed().is_empty());
  }

  #[test]
  fn grabbed_cursor_follows_motion_past_the_window() {
    let mut input = Input::new();
    input.cursor_moved(700.0, 500.0);
    input.motion(50.0, 50.0);
    assert_eq!(input.cursor(), (700.0, 500.0));

    input.set_grabbed(true);
    input.motion(300.0, 250.0);
    input.motion(300.0, 250.0);
    // a locked pointer keeps reporting its parked position
    input.cursor_moved(400.0, 300.0);
    assert_eq!(input.cursor(), (1300.0, 1000.0));

    input.set_grabbed(false);
    input.cursor_moved(10.0, 20.0);
    assert_eq!(input.cursor(), (10.0, 20.0));
    input.key(KeyCode::Digit2, false, false);
    assert!(!input.held(KeyCode::Digit2));
  }

  #[test]
  fn scroll_accumulates_until_taken() {
    let mut input = Input::new();
    input.wheel(MouseScrollDelta::LineDelta(0.0, 1.0));
    input.wheel(MouseScrollDelta::LineDelta(0.0, 2.0));
    input.wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -100.0)));
    approx::assert_relative_eq!(input.take_scroll(), 2.0, epsilon = 1e-6);
    assert_eq!(input.take_scroll(), 0.0);
  }

  #[test]
  fn only_left_button_drags() {
    let mut input = Input::new();
    input.button(MouseButton::Right, true);
    assert!(!input.primary_held());
    input.button(MouseButton::Left, true);
    assert!(input.primary_held());
    input.release_all();
    assert!(!input.primary_held());
  }
}
