//! Per-frame orchestration of the pipeline manager and the controller,
//! independent of any window or GPU.

use glam::Mat4;
use log::error;
use winit::keyboard::KeyCode;
use crate::Result;
use crate::clock::FrameClock;
use crate::config::Config;
use crate::input::{Input, EdgeTrigger};
use crate::interaction::{Controller, Drag};
use crate::mesh::{Meshes, Shape};
use crate::pipeline::{Backend, Pipeline, PipelineManager};
use crate::shared::{Globals, Vertex};

pub const RELOAD_KEY: KeyCode = KeyCode::KeyR;

fn shape_for(key: KeyCode) -> Option<Shape> {
  match key {
    KeyCode::Digit1 => Some(Shape::Plane),
    KeyCode::Digit2 => Some(Shape::Plane10x10),
    KeyCode::Digit3 => Some(Shape::Cube),
    _ => None,
  }
}

/// What the renderer has to do this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plan {
  pub globals: Globals,
  /// Set when the vertex buffer must be refilled with this shape.
  pub mesh: Option<Shape>,
  pub reloaded: bool,
}

pub struct Session<B: Backend> {
  pipelines: PipelineManager<B>,
  controller: Controller,
  clock: FrameClock,
  reload: EdgeTrigger,
  meshes: Meshes,
  shape: Shape,
  minimized: bool,
}

impl<B: Backend> Session<B> {
  pub fn new(backend: &mut B, config: &Config, size: (u32, u32)) -> Result<Self> {
    let pipelines = PipelineManager::new(backend, config.stages.clone())?;
    println!("{}", pipelines.live().report());
    Ok(Self {
      pipelines,
      controller: Controller::new(config.multiplier, size.0, size.1),
      clock: FrameClock::new(),
      reload: EdgeTrigger::default(),
      meshes: Meshes::new(config.multiplier),
      shape: config.shape,
      minimized: false,
    })
  }

  /// Mesh switch, reload and clock, everything that happens before the draw.
  pub fn prepare(&mut self, backend: &mut B, input: &mut Input) -> Plan {
    let mut mesh = None;
    for shape in input.take_pressed().into_iter().filter_map(shape_for) {
      self.shape = shape;
      mesh = Some(shape);
    }

    let reloaded = self.reload.update(input.held(RELOAD_KEY));
    if reloaded {
      match self.pipelines.reload(backend) {
        Ok(pipeline) => println!("{}", pipeline.report()),
        Err(e) => error!("Reload aborted, keeping the current pipeline: {}", e),
      }
    }

    let (time, delta) = self.clock.tick();
    Plan {
      globals: Globals::new(
        self.controller.projection(),
        Mat4::IDENTITY,
        self.controller.transform(),
        time,
        delta,
      ),
      mesh,
      reloaded,
    }
  }

  /// Feeds this frame's pointer and scroll samples to the controller. A drag
  /// switches the input to a virtual cursor until it stops.
  pub fn interact(&mut self, input: &mut Input) -> Option<Drag> {
    self.controller.scroll(input.take_scroll());
    let drag = self.controller.update(input.primary_held(), input.cursor());
    match drag {
      Some(Drag::Started) => input.set_grabbed(true),
      Some(Drag::Stopped) => input.set_grabbed(false),
      None => {}
    }
    drag
  }

  pub fn resize(&mut self, width: u32, height: u32) {
    self.minimized = width == 0 || height == 0;
    self.controller.resize(width, height);
  }

  /// No frames are drawn while the surface has no area.
  pub fn is_minimized(&self) -> bool {
    self.minimized
  }

  pub fn pipeline(&self) -> &Pipeline<B> {
    self.pipelines.live()
  }

  pub fn program(&self) -> Option<&B::Program> {
    self.pipelines.live().program()
  }

  pub fn controller(&self) -> &Controller {
    &self.controller
  }

  pub fn shape(&self) -> Shape {
    self.shape
  }

  pub fn mesh(&self) -> &[Vertex] {
    self.meshes.get(self.shape)
  }
}
