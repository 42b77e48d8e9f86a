use log::warn;
use designer::{Config, ConfigError};
use designer::interaction::FAR;
use designer::mesh::Shape;
use designer::shader::StageKind;

#[derive(Debug, PartialEq)]
pub enum Command {
  Run(Config),
  Help,
  /// Started without arguments.
  Hint,
}

fn short_flag(kind: StageKind) -> &'static str {
  match kind {
    StageKind::Vertex => "-v",
    StageKind::Fragment => "-f",
    StageKind::Compute => "-c",
    StageKind::Geometry => "-g",
    StageKind::TessEvaluation => "-te",
    StageKind::TessControl => "-tc",
  }
}

/// Long flags are the stage names, `--vertex` through `--tess_control`.
fn stage_flag(arg: &str) -> Option<StageKind> {
  StageKind::ALL.into_iter().find(|kind| {
    arg == short_flag(*kind) || arg.strip_prefix("--") == Some(kind.name())
  })
}

/// Parses everything after the program name.
pub fn parse<I>(args: I) -> Result<Command, ConfigError>
where
  I: IntoIterator<Item = String>,
{
  let mut it = args.into_iter().peekable();
  if it.peek().is_none() {
    return Ok(Command::Hint);
  }

  let mut config = Config::default();
  while let Some(arg) = it.next() {
    let mut value = || it.next().ok_or_else(|| ConfigError::MissingValue(arg.clone()));
    match arg.as_str() {
      "--help" | "-h" => return Ok(Command::Help),
      "--shape" | "-s" => config.shape = value()?.parse::<Shape>()?,
      "--multiply_by" | "-mb" => {
        let raw = value()?;
        config.multiplier = raw
          .parse::<f32>()
          .ok()
          .filter(|m| *m > 0.0 && (FAR * m).is_finite())
          .ok_or(ConfigError::InvalidMultiplier(raw))?;
      }
      flag => match stage_flag(flag) {
        Some(kind) => config.stages.insert(kind, &value()?)?,
        None => warn!("Ignoring unknown argument '{}'", flag),
      },
    }
  }
  Ok(Command::Run(config))
}

pub fn usage(program: &str) -> String {
  let mut out = format!("Usage: {} [options]\n\nOptions:\n", program);
  out.push_str("  --help, -h                     show this message\n");
  out.push_str("  --shape, -s <shape>            plane (default), plane10x10 or cube\n");
  for kind in StageKind::ALL {
    let flag = format!("--{}, {} <path>", kind.name(), short_flag(kind));
    out.push_str(&format!("  {:<30} {} shader source\n", flag, kind));
  }
  out.push_str("  --multiply_by, -mb <factor>    scale meshes, zoom range and far plane (default 1.0)\n");
  out.push_str("\nControls:\n");
  out.push_str("  1 / 2 / 3     plane / plane10x10 / cube\n");
  out.push_str("  R             reload shaders\n");
  out.push_str("  left drag     rotate\n");
  out.push_str("  scroll        scale\n");
  out
}
