#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use designer::pipeline::Backend;
use designer::shader::StageKind;
use tempfile::TempDir;

pub const VERT: &str = "#version 450\nlayout(location = 0) in vec3 aPosition;\nvoid main() {}\n";
pub const FRAG: &str = "#version 450\nlayout(location = 0) out vec4 c;\nvoid main() { c = vec4(1.0); }\n";
pub const COMP: &str = "#version 450\nlayout(local_size_x = 1) in;\nvoid main() {}\n";
pub const BROKEN: &str = "#version 450\n#error unterminated statement\nvoid main() { c = vec4(1.0) }\n";

pub type Events = Rc<RefCell<Vec<String>>>;

pub struct Module {
  pub id: usize,
  pub kind: StageKind,
  events: Events,
}

impl Drop for Module {
  fn drop(&mut self) {
    self.events.borrow_mut().push(format!("drop module {}", self.id));
  }
}

pub struct Program {
  pub id: usize,
  pub kinds: Vec<StageKind>,
  events: Events,
}

impl Drop for Program {
  fn drop(&mut self) {
    self.events.borrow_mut().push(format!("drop program {}", self.id));
  }
}

/// Backend double that records every compile, link and release in order.
#[derive(Default)]
pub struct Recorder {
  pub events: Events,
  next: usize,
}

impl Recorder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn events(&self) -> Vec<String> {
    self.events.borrow().clone()
  }

  pub fn clear(&self) {
    self.events.borrow_mut().clear();
  }

  pub fn count(&self, prefix: &str) -> usize {
    self.events.borrow().iter().filter(|e| e.starts_with(prefix)).count()
  }

  fn id(&mut self) -> usize {
    self.next += 1;
    self.next
  }

  fn push(&self, event: String) {
    self.events.borrow_mut().push(event);
  }
}

impl Backend for Recorder {
  type Module = Module;
  type Program = Program;

  fn compile(&mut self, kind: StageKind, source: &str) -> Result<Module, String> {
    let id = self.id();
    if !source.contains("void main") || source.contains("#error") {
      self.push(format!("compile {} failed", kind.name()));
      return Err(format!("0:2: error: {} source rejected\n0:3: error: syntax error", kind.name()));
    }
    self.push(format!("compile {} {}", kind.name(), id));
    Ok(Module {
      id,
      kind,
      events: self.events.clone(),
    })
  }

  fn link(&mut self, stages: &[(StageKind, &Module)]) -> Result<Program, String> {
    let kinds = stages.iter().map(|(k, _)| *k).collect::<Vec<_>>();
    if kinds.contains(&StageKind::Compute) && kinds.len() > 1 {
      self.push("link failed".into());
      return Err("compute cannot be linked with other stages".into());
    }
    let id = self.id();
    self.push(format!("link {}", id));
    Ok(Program {
      id,
      kinds,
      events: self.events.clone(),
    })
  }
}

pub fn write(dir: &TempDir, name: &str, source: &str) -> PathBuf {
  let path = dir.path().join(name);
  fs::write(&path, source).unwrap();
  path
}

pub fn path_str(path: &Path) -> &str {
  path.to_str().unwrap()
}
