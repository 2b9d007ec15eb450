//! Command-line argument parsing for Aurora.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Aurora command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "aurora", about = "Animated planet backdrop for the login screen")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Window title.
    #[arg(long)]
    pub title: Option<String>,

    /// MSAA sample count (1 or 4).
    #[arg(long)]
    pub msaa: Option<u32>,

    /// Directory containing the planet and cloud textures.
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Seed for a reproducible starfield.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(ref title) = args.title {
            self.window.title = title.clone();
        }
        if let Some(samples) = args.msaa {
            self.render.msaa_samples = samples;
        }
        if let Some(ref root) = args.assets {
            self.assets.root = root.clone();
        }
        if let Some(seed) = args.seed {
            self.starfield.seed = Some(seed);
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
