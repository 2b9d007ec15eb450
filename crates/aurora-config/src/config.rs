//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Camera projection and start position.
    pub camera: CameraConfig,
    /// Pointer interaction tuning.
    pub input: InputConfig,
    /// Texture asset location.
    pub assets: AssetsConfig,
    /// Background starfield settings.
    pub starfield: StarfieldConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
    /// Request a transparent window so the cleared background shows through.
    pub transparent: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// MSAA sample count (1 disables antialiasing, 4 enables it).
    pub msaa_samples: u32,
    /// RGBA clear color. Alpha 0 keeps the canvas see-through.
    pub clear_color: [f64; 4],
}

/// Perspective camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// Initial camera distance along +Z.
    pub start_z: f32,
}

/// Pointer interaction configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Camera target offset per unit of normalized pointer position.
    pub camera_sway: f32,
    /// Fraction of the remaining distance the camera covers per pointer event.
    pub ease_factor: f32,
    /// Form tilt at the screen edge, in degrees.
    pub max_tilt_degrees: f32,
    /// CSS perspective distance applied to the form, in pixels.
    pub form_perspective_px: f32,
}

/// Texture asset configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory that relative texture locations are resolved against.
    pub root: PathBuf,
}

/// Starfield configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Fixed seed for a reproducible field. `None` draws a fresh field each launch.
    pub seed: Option<u64>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Aurora".to_string(),
            transparent: true,
            vsync: true,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            msaa_samples: 4,
            clear_color: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            start_z: 5.0,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            camera_sway: 0.5,
            ease_factor: 0.05,
            max_tilt_degrees: 10.0,
            form_perspective_px: 1000.0,
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// The platform config directory for Aurora (e.g. `~/.config/aurora`).
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("aurora"))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("msaa_samples: 4"));
    }

    #[test]
    fn test_defaults_match_scene_camera() {
        let camera = CameraConfig::default();
        assert_eq!(camera.fov_y_degrees, 75.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 1000.0);
        assert_eq!(camera.start_z, 5.0);

        let input = InputConfig::default();
        assert_eq!(input.ease_factor, 0.05);
        assert_eq!(input.camera_sway, 0.5);
        assert_eq!(input.max_tilt_degrees, 10.0);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), render: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.input, InputConfig::default());
        assert_eq!(config.starfield.seed, None);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_seed_parses_as_option() {
        let config: Config = ron::from_str("(starfield: (seed: Some(42)))").unwrap();
        assert_eq!(config.starfield.seed, Some(42));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.assets.root = PathBuf::from("/srv/textures");
        config.starfield.seed = Some(7);

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
