//! Building, linking and hot-swapping shader programs.
//!
//! The graphics API is only reached through [`Backend`], so everything here
//! runs the same against the wgpu renderer and against a recording test
//! double.

use std::{fmt, mem};
use log::{error, info};
use crate::error::{ConfigError, ShaderError};
use crate::shader::{self, StageHandle, StageKind, StageSource};

/// What the pipeline code needs from a graphics API. Resources are released
/// by dropping them.
pub trait Backend {
  type Module;
  type Program;

  /// Compiles one stage, or returns the driver's diagnostic log.
  fn compile(&mut self, kind: StageKind, source: &str) -> Result<Self::Module, String>;

  /// Links compiled stages into a program, or returns the diagnostic log.
  fn link(&mut self, stages: &[(StageKind, &Self::Module)]) -> Result<Self::Program, String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
  /// No stages attached, link never attempted.
  Unlinked,
  Linked,
  Failed(String),
}

pub struct Pipeline<B: Backend> {
  stages: Vec<StageHandle<B::Module>>,
  program: Option<B::Program>,
  status: LinkStatus,
}

impl<B: Backend> Pipeline<B> {
  pub fn empty() -> Self {
    Self {
      stages: vec![],
      program: None,
      status: LinkStatus::Unlinked,
    }
  }

  /// Compiles every stage in `sources`, attaches them and attempts a link.
  /// Compile and link failures are reported and kept on the pipeline; only an
  /// unreadable source file fails the build.
  pub fn build(backend: &mut B, sources: &StageSource) -> Result<Self, ConfigError> {
    let mut stages = Vec::with_capacity(sources.len());
    for (kind, path) in sources.iter() {
      stages.push(shader::compile(backend, path, kind)?);
    }
    let mut pipeline = Self {
      stages,
      ..Self::empty()
    };
    pipeline.link(backend);
    Ok(pipeline)
  }

  fn link(&mut self, backend: &mut B) {
    if self.stages.is_empty() {
      return;
    }
    let broken = self
      .stages
      .iter()
      .filter(|s| !s.compiled())
      .map(|s| s.kind().name())
      .collect::<Vec<_>>();
    let result = if broken.is_empty() {
      let modules = self
        .stages
        .iter()
        .filter_map(|s| s.module().map(|m| (s.kind(), m)))
        .collect::<Vec<_>>();
      backend.link(&modules)
    } else {
      Err(format!("attached stages did not compile: {}", broken.join(", ")))
    };
    match result {
      Ok(program) => {
        self.program = Some(program);
        self.status = LinkStatus::Linked;
      }
      Err(log) => {
        error!("{}", ShaderError::Link { log: log.clone() });
        self.status = LinkStatus::Failed(log);
      }
    }
  }

  pub fn stages(&self) -> &[StageHandle<B::Module>] {
    &self.stages
  }

  pub fn kinds(&self) -> Vec<StageKind> {
    self.stages.iter().map(StageHandle::kind).collect()
  }

  /// The linked program, if there is one to draw with.
  pub fn program(&self) -> Option<&B::Program> {
    self.program.as_ref()
  }

  pub fn status(&self) -> &LinkStatus {
    &self.status
  }

  pub fn is_linked(&self) -> bool {
    self.status == LinkStatus::Linked
  }

  pub fn report(&self) -> Report<'_, B> {
    Report(self)
  }
}

/// Per-stage rebuild summary, one line per stage followed by the link result.
pub struct Report<'a, B: Backend>(&'a Pipeline<B>);

impl<B: Backend> fmt::Display for Report<'_, B> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    for stage in &self.0.stages {
      let state = if stage.compiled() { "ok" } else { "FAILED" };
      writeln!(f, "{:<16} {:<6} {}", stage.kind(), state, stage.path().display())?;
      for line in stage.log().into_iter().flat_map(str::lines) {
        writeln!(f, "    {}", line)?;
      }
    }
    match &self.0.status {
      LinkStatus::Unlinked => write!(f, "link: no stages attached"),
      LinkStatus::Linked => write!(f, "link: ok"),
      LinkStatus::Failed(log) => {
        write!(f, "link: FAILED")?;
        for line in log.lines() {
          write!(f, "\n    {}", line)?;
        }
        Ok(())
      }
    }
  }
}

/// Owns the stage sources and the one live pipeline.
pub struct PipelineManager<B: Backend> {
  sources: StageSource,
  live: Pipeline<B>,
}

impl<B: Backend> PipelineManager<B> {
  /// Runs the initial build. An unreadable source is fatal here.
  pub fn new(backend: &mut B, sources: StageSource) -> Result<Self, ConfigError> {
    let live = Pipeline::build(backend, &sources)?;
    Ok(Self { sources, live })
  }

  pub fn live(&self) -> &Pipeline<B> {
    &self.live
  }

  /// Rebuilds from the same sources and swaps the result in, even if it
  /// failed to link. The old pipeline is dropped only once the new one has
  /// been compiled and link-attempted; if the build itself fails the old one
  /// stays live.
  pub fn reload(&mut self, backend: &mut B) -> Result<&Pipeline<B>, ConfigError> {
    let next = Pipeline::build(backend, &self.sources)?;
    let previous = mem::replace(&mut self.live, next);
    drop(previous);
    info!(
      "Reloaded {} stage(s), {}",
      self.live.stages.len(),
      match self.live.status {
        LinkStatus::Linked => "linked",
        LinkStatus::Unlinked => "nothing to link",
        LinkStatus::Failed(_) => "link failed",
      }
    );
    Ok(&self.live)
  }
}
