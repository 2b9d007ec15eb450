//! Structured logging and tracing for Aurora.
//!
//! Console output with uptime timestamps and module paths, plus JSON file
//! logging in debug builds. The log level comes from `RUST_LOG`, then the
//! config's `debug.log_level`, then a quiet default that silences wgpu.

use aurora_config::Config;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter: `info` everywhere, `warn` for the GPU stack.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// File name of the JSON log written in debug builds.
pub const LOG_FILE_NAME: &str = "aurora.log";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - Optional directory for JSON log files (debug builds only)
/// * `debug_build` - Whether this is a debug build (enables file logging)
/// * `config` - Optional configuration to use for log level override
///
/// ```no_run
/// use aurora_log::init_logging;
/// use aurora_config::Config;
///
/// let config = Config::default();
/// init_logging(None, false, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_string(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// Resolve the filter directive string from an optional config.
///
/// A bare level from the config (e.g. `"debug"`) still keeps wgpu and naga at
/// `warn`, since their info output floods the console every frame.
pub fn filter_string(config: Option<&Config>) -> String {
    match config.map(|c| c.debug.log_level.trim()) {
        Some(level) if !level.is_empty() && !level.contains('=') => {
            format!("{level},wgpu=warn,naga=warn")
        }
        Some(directives) if !directives.is_empty() => directives.to_string(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let filter_str = format!("{}", EnvFilter::new(filter_string(None)));
        assert!(filter_str.contains("wgpu=warn"));
        assert!(filter_str.contains("naga=warn"));
        assert!(filter_str.contains("info"));
    }

    #[test]
    fn test_filter_string_without_config() {
        assert_eq!(filter_string(None), DEFAULT_FILTER);
    }

    #[test]
    fn test_bare_level_keeps_gpu_quiet() {
        let mut config = Config::default();
        config.debug.log_level = "debug".to_string();
        assert_eq!(filter_string(Some(&config)), "debug,wgpu=warn,naga=warn");
    }

    #[test]
    fn test_full_directives_pass_through() {
        let mut config = Config::default();
        config.debug.log_level = "warn,aurora_app=trace".to_string();
        assert_eq!(filter_string(Some(&config)), "warn,aurora_app=trace");
    }

    #[test]
    fn test_empty_level_falls_back_to_default() {
        let mut config = Config::default();
        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_string(Some(&config)), DEFAULT_FILTER);
    }

    #[test]
    fn test_env_filter_parsing() {
        let valid_filters = [
            "info",
            "debug,aurora_render=trace",
            "warn,aurora_input=debug,aurora_app=trace",
            "error",
        ];

        for filter_str in &valid_filters {
            let result = EnvFilter::try_from(*filter_str);
            assert!(result.is_ok(), "Failed to parse filter: {}", filter_str);
        }
    }

    #[test]
    fn test_log_file_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_file_path = temp_dir.path().join(LOG_FILE_NAME);
        assert_eq!(log_file_path.file_name().unwrap(), "aurora.log");
    }
}
