//! Lunaris - moon phase viewer

use std::path::PathBuf;

use lunaris::app;
use lunaris::config::ViewerConfig;
use lunaris::core::{logging, Error};
use lunaris::phase::{catalog, PhaseId};

fn main() {
    logging::init();
    log::info!("Lunaris starting...");

    let args: Vec<String> = std::env::args().collect();
    let result = load_config(&args).and_then(app::run);

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Build the config from `--config`, then apply `--texture`, `--speed` and
/// `--phase`.
fn load_config(args: &[String]) -> Result<ViewerConfig, Error> {
    let mut config = match parse_path_arg(args, "--config", "-c") {
        Some(path) => {
            log::info!("Loading config from: {}", path.display());
            ViewerConfig::load(&path)?
        }
        None => ViewerConfig::default(),
    };

    if let Some(path) = parse_path_arg(args, "--texture", "-t") {
        log::info!("Moon texture: {}", path.display());
        config.texture_path = Some(path);
    }

    if let Some(speed) = parse_speed_arg(args)? {
        log::info!("Animation speed: {}", speed);
        config.speed.initial = speed;
    }

    if let Some(phase) = parse_phase_arg(args)? {
        log::info!("Initial phase: {}", phase.display_name());
        config.initial_phase = Some(phase);
    }

    config.validate()?;
    Ok(config)
}

/// Parse a path-valued argument from the command line
fn parse_path_arg(args: &[String], long: &str, short: &str) -> Option<PathBuf> {
    for i in 0..args.len() {
        if args[i] == long || args[i] == short {
            if let Some(value) = args.get(i + 1) {
                return Some(PathBuf::from(value));
            }
        }
    }
    None
}

/// Parse --speed argument from command line
fn parse_speed_arg(args: &[String]) -> Result<Option<f32>, Error> {
    for i in 0..args.len() {
        if args[i] == "--speed" || args[i] == "-s" {
            if let Some(speed_str) = args.get(i + 1) {
                return speed_str
                    .parse()
                    .map(Some)
                    .map_err(|_| Error::Config(format!("invalid --speed value: {}", speed_str)));
            }
        }
    }
    Ok(None)
}

/// Parse --phase argument (a catalog key such as `full-moon`)
fn parse_phase_arg(args: &[String]) -> Result<Option<PhaseId>, Error> {
    for i in 0..args.len() {
        if args[i] == "--phase" || args[i] == "-p" {
            if let Some(key) = args.get(i + 1) {
                return PhaseId::from_key(key).map(Some).ok_or_else(|| {
                    let keys: Vec<&str> = catalog().iter().map(|p| p.key).collect();
                    Error::Config(format!("unknown --phase {}, expected one of: {}", key, keys.join(", ")))
                });
            }
        }
    }
    Ok(None)
}
