//! The `aurora` binary: opens the animated planet backdrop.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags,
//! e.g. `aurora --width 1920 --height 1080 --seed 42`.

use clap::Parser;
use tracing::error;

use aurora_config::{CliArgs, Config, default_config_dir};

fn main() {
    let args = CliArgs::parse();

    let config_dir = match args.config.clone().map_or_else(default_config_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Failed to resolve config directory: {e}");
            std::process::exit(1);
        }
    };

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    aurora_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = aurora_app::run(config) {
        error!("Aurora exited with an error: {e}");
        std::process::exit(1);
    }
}
