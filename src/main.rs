use std::path::PathBuf;

use clap::Parser;
use log::{error, info};

use simpler::config::{ConfigError, ViewerConfig};

mod demo_scene;
use demo_scene::DemoScene;

const DEFAULT_CONFIG: &str = "simpler.toml";

#[derive(Debug, Parser)]
#[command(name = "simpler", about = "Axis overlay viewer with a demo scene.", version)]
struct Args {
  /// TOML config file. Falls back to ./simpler.toml, then built-in defaults.
  config: Option<PathBuf>,

  /// Log at debug level regardless of the config file.
  #[arg(long)]
  debug: bool,
}

fn load_config(args: &Args) -> Result<(ViewerConfig, Option<PathBuf>), ConfigError> {
  let path = match &args.config {
    Some(path) => path.clone(),
    None => PathBuf::from(DEFAULT_CONFIG),
  };
  if args.config.is_none() && !path.exists() {
    return Ok((ViewerConfig::default(), None));
  }
  Ok((ViewerConfig::load(&path)?, Some(path)))
}

fn main() {
  let args = Args::parse();
  let loaded = load_config(&args);
  let debug = args.debug || loaded.as_ref().is_ok_and(|(c, _)| c.debug);
  env_logger::Builder::from_env(
    env_logger::Env::default().default_filter_or(if debug { "debug" } else { "info" })
  ).init();

  let config = match loaded {
    Ok((config, Some(path))) => {
      info!("loaded config from {}", path.display());
      config
    }
    Ok((config, None)) => config,
    Err(e) => {
      error!("{e}");
      std::process::exit(1);
    }
  };
  if let Err(e) = simpler::launch(&config, DemoScene::default()) {
    error!("{e}");
    std::process::exit(1);
  }
}

#[cfg(test)]
mod main_tests {
  use super::*;

  #[test]
  fn args_take_optional_config() {
    let args = Args::try_parse_from(["simpler"]).unwrap();
    assert!(args.config.is_none());
    assert!(!args.debug);
    let args = Args::try_parse_from(["simpler", "--debug", "axes.toml"]).unwrap();
    assert_eq!(args.config, Some(PathBuf::from("axes.toml")));
    assert!(args.debug);
  }
  #[test]
  fn explicit_missing_config_is_an_error() {
    let args = Args::try_parse_from(["simpler", "/nonexistent/axes.toml"]).unwrap();
    assert!(matches!(load_config(&args), Err(ConfigError::Io(_))));
  }
}
