mod cli;

use std::{env, process};
use log::{error, LevelFilter};
use designer::Designer;
use crate::cli::Command;

fn main() {
  env_logger::builder()
    .filter_level(LevelFilter::Info)
    .filter(Some("wgpu_core"), LevelFilter::Warn)
    .filter(Some("wgpu_hal"), LevelFilter::Warn)
    .filter(Some("naga"), LevelFilter::Warn)
    .parse_default_env()
    .init();

  let mut args = env::args();
  let program = args.next().unwrap_or_else(|| "viewer".into());
  let config = match cli::parse(args) {
    Ok(Command::Run(config)) => config,
    Ok(Command::Help) => {
      print!("{}", cli::usage(&program));
      return;
    }
    Ok(Command::Hint) => {
      println!("Type --help or -h to get more info!");
      return;
    }
    Err(e) => {
      error!("{}", e);
      eprint!("{}", cli::usage(&program));
      process::exit(1);
    }
  };

  if let Err(e) = Designer::new(config).run() {
    error!("{}", e);
    process::exit(e.exit_code());
  }
}
