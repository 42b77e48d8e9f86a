#![allow(clippy::new_without_default)]
pub mod gfx;
pub mod pipeline;
pub mod shader;
pub mod interaction;
pub mod input;
pub mod session;
pub mod mesh;
pub mod math;
pub mod clock;
pub mod config;
pub mod error;
pub mod shared;

use winit::window::{WindowBuilder, Window, CursorGrabMode};
use winit::event_loop::{EventLoop, EventLoopWindowTarget};
use winit::event::{Event, WindowEvent, DeviceEvent};
use winit::dpi::LogicalSize;
use log::{info, warn, error};
use crate::gfx::Renderer;
use crate::input::Input;
use crate::interaction::Drag;
use crate::session::Session;

pub use crate::config::Config;
pub use crate::error::{Error, ConfigError, ShaderError};
pub use glam;

pub type Result<T = (), E = Error> = std::result::Result<T, E>;

pub const TITLE: &str = "GLSL Shader Designer";
pub const WINDOW_SIZE: (u32, u32) = (800, 600);

pub struct Designer {
  config: Config,
}

impl Designer {
  pub fn new(config: Config) -> Self {
    Self { config }
  }

  /// Opens the window and runs the frame loop until it is closed.
  pub fn run(self) -> Result {
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
      .with_title(TITLE)
      .with_inner_size(LogicalSize::new(WINDOW_SIZE.0, WINDOW_SIZE.1))
      .build(&event_loop)
      .map_err(|e| Error::Surface(e.to_string()))?;
    let mut renderer = pollster::block_on(Renderer::init(&window))?;
    let size = window.inner_size();
    let mut session = Session::new(&mut renderer, &self.config, (size.width, size.height))?;
    renderer.upload_mesh(session.mesh());
    let mut input = Input::new();
    info!("Showing {}, press R to reload shaders", session.shape());

    event_loop.run(move |event, elwt| match event {
      Event::WindowEvent { event, .. } => match event {
        WindowEvent::RedrawRequested if !session.is_minimized() => {
          frame(&mut renderer, &mut session, &mut input, &window, elwt)
        }
        WindowEvent::RedrawRequested => {}
        WindowEvent::Resized(size) => {
          renderer.resize(size);
          session.resize(size.width, size.height);
        }
        WindowEvent::CloseRequested => elwt.exit(),
        event => input.event(&event),
      },
      Event::DeviceEvent {
        event: DeviceEvent::MouseMotion { delta },
        ..
      } => input.motion(delta.0, delta.1),
      Event::AboutToWait => window.request_redraw(),
      _ => {}
    })?;
    Ok(())
  }
}

fn frame(
  renderer: &mut Renderer,
  session: &mut Session<Renderer>,
  input: &mut Input,
  window: &Window,
  elwt: &EventLoopWindowTarget<()>,
) {
  let plan = session.prepare(renderer, input);
  if plan.mesh.is_some() {
    renderer.upload_mesh(session.mesh());
  }
  match renderer.frame(session.program(), &plan.globals) {
    Ok(()) => {}
    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
      renderer.reconfigure(window.inner_size())
    }
    Err(wgpu::SurfaceError::Timeout) => warn!("Surface timed out, skipping frame"),
    Err(wgpu::SurfaceError::OutOfMemory) => {
      error!("Out of GPU memory, closing");
      elwt.exit();
    }
  }
  match session.interact(input) {
    Some(Drag::Started) => {
      window.set_cursor_visible(false);
      if let Err(e) = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
      {
        warn!("Cannot grab the cursor: {}", e);
      }
    }
    Some(Drag::Stopped) => {
      if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
        warn!("Cannot release the cursor: {}", e);
      }
      window.set_cursor_visible(true);
    }
    None => {}
  }
}
