use std::io;
use std::path::PathBuf;
use thiserror::Error;
use crate::shader::StageKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error("cannot create output surface: {0}")]
  Surface(String),
  #[error("cannot load graphics context: {0}")]
  Context(String),
  #[error("event loop failed: {0}")]
  EventLoop(#[from] winit::error::EventLoopError),
}

impl Error {
  pub fn exit_code(&self) -> i32 {
    match self {
      Error::Config(_) | Error::EventLoop(_) => 1,
      Error::Surface(_) => -1,
      Error::Context(_) => -2,
    }
  }
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("cannot read {kind} shader '{}': {source}", .path.display())]
  FileNotReadable {
    path: PathBuf,
    kind: StageKind,
    source: io::Error,
  },
  #[error("path for the {kind} shader is {len} bytes long, the limit is {max}")]
  PathTooLong { kind: StageKind, len: usize, max: usize },
  #[error("missing value for {0}")]
  MissingValue(String),
  #[error("unknown shape '{0}', expected plane, plane10x10 or cube")]
  UnknownShape(String),
  #[error("invalid multiplier '{0}', expected a positive number")]
  InvalidMultiplier(String),
}

/// Recoverable shader diagnostics. These are logged and kept on the pipeline,
/// the render loop carries on with whatever was built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShaderError {
  #[error("{kind} shader '{}' failed to compile:\n{log}", .path.display())]
  Compile {
    path: PathBuf,
    kind: StageKind,
    log: String,
  },
  #[error("program failed to link:\n{log}")]
  Link { log: String },
}
