use std::{fmt, fs, str};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use log::{debug, error};
use crate::error::{ConfigError, ShaderError};
use crate::pipeline::Backend;

/// Longest accepted shader path, in bytes.
pub const MAX_PATH_LEN: usize = 1023;

/// Declaration order is the attach order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageKind {
  Vertex,
  Fragment,
  Compute,
  Geometry,
  TessEvaluation,
  TessControl,
}

impl StageKind {
  pub const ALL: [StageKind; 6] = [
    StageKind::Vertex,
    StageKind::Fragment,
    StageKind::Compute,
    StageKind::Geometry,
    StageKind::TessEvaluation,
    StageKind::TessControl,
  ];

  pub fn name(self) -> &'static str {
    match self {
      StageKind::Vertex => "vertex",
      StageKind::Fragment => "fragment",
      StageKind::Compute => "compute",
      StageKind::Geometry => "geometry",
      StageKind::TessEvaluation => "tess_evaluation",
      StageKind::TessControl => "tess_control",
    }
  }
}

impl fmt::Display for StageKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.pad(self.name())
  }
}

/// Which stages to build and where their sources live. Fixed for the
/// lifetime of the process, a reload re-reads the same paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageSource(BTreeMap<StageKind, PathBuf>);

impl StageSource {
  pub fn new() -> Self {
    Self::default()
  }

  /// An empty path clears the stage.
  pub fn insert(&mut self, kind: StageKind, path: &str) -> Result<(), ConfigError> {
    if path.len() > MAX_PATH_LEN {
      return Err(ConfigError::PathTooLong {
        kind,
        len: path.len(),
        max: MAX_PATH_LEN,
      });
    }
    if path.is_empty() {
      self.0.remove(&kind);
    } else {
      self.0.insert(kind, PathBuf::from(path));
    }
    Ok(())
  }

  pub fn get(&self, kind: StageKind) -> Option<&Path> {
    self.0.get(&kind).map(PathBuf::as_path)
  }

  pub fn iter(&self) -> impl Iterator<Item = (StageKind, &Path)> {
    self.0.iter().map(|(k, p)| (*k, p.as_path()))
  }

  pub fn kinds(&self) -> Vec<StageKind> {
    self.0.keys().copied().collect()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

/// One compiled stage. A stage that failed to compile still gets a handle,
/// it just carries a log instead of a module.
pub struct StageHandle<M> {
  kind: StageKind,
  path: PathBuf,
  module: Option<M>,
  log: Option<String>,
}

impl<M> StageHandle<M> {
  pub fn kind(&self) -> StageKind {
    self.kind
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn module(&self) -> Option<&M> {
    self.module.as_ref()
  }

  pub fn compiled(&self) -> bool {
    self.module.is_some()
  }

  pub fn log(&self) -> Option<&str> {
    self.log.as_deref()
  }
}

pub fn compile<B: Backend>(
  backend: &mut B,
  path: &Path,
  kind: StageKind,
) -> Result<StageHandle<B::Module>, ConfigError> {
  let bytes = fs::read(path).map_err(|source| ConfigError::FileNotReadable {
    path: path.to_path_buf(),
    kind,
    source,
  })?;
  let result = match str::from_utf8(&bytes) {
    Ok(source) => backend.compile(kind, source),
    Err(e) => Err(format!("source is not valid UTF-8: {}", e)),
  };
  let (module, log) = match result {
    Ok(module) => {
      debug!("Compiled {} shader '{}'", kind, path.display());
      (Some(module), None)
    }
    Err(log) => {
      error!(
        "{}",
        ShaderError::Compile {
          path: path.to_path_buf(),
          kind,
          log: log.clone(),
        }
      );
      (None, Some(log))
    }
  };
  Ok(StageHandle {
    kind,
    path: path.to_path_buf(),
    module,
    log,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn iterates_in_attach_order() {
    let mut sources = StageSource::new();
    sources.insert(StageKind::TessControl, "a.tesc").unwrap();
    sources.insert(StageKind::Fragment, "a.frag").unwrap();
    sources.insert(StageKind::Vertex, "a.vert").unwrap();
    assert_eq!(
      sources.kinds(),
      [StageKind::Vertex, StageKind::Fragment, StageKind::TessControl]
    );
  }

  #[test]
  fn last_path_wins_and_empty_clears() {
    let mut sources = StageSource::new();
    sources.insert(StageKind::Vertex, "old.vert").unwrap();
    sources.insert(StageKind::Vertex, "new.vert").unwrap();
    assert_eq!(sources.get(StageKind::Vertex), Some(Path::new("new.vert")));
    sources.insert(StageKind::Vertex, "").unwrap();
    assert!(sources.is_empty());
  }

  #[test]
  fn rejects_oversized_paths() {
    let mut sources = StageSource::new();
    let long = "a".repeat(MAX_PATH_LEN + 1);
    assert!(matches!(
      sources.insert(StageKind::Geometry, &long),
      Err(ConfigError::PathTooLong { kind: StageKind::Geometry, len, .. }) if len == MAX_PATH_LEN + 1
    ));
    assert!(sources.insert(StageKind::Geometry, &long[1..]).is_ok());
  }

  #[test]
  fn display_pads() {
    assert_eq!(format!("[{:<10}]", StageKind::Vertex), "[vertex    ]");
  }
}
