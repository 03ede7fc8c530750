//! Application-level configuration loading, including the team palette and on-disk locations.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::{
    controller::ControllerSettings,
    game::{DEFAULT_ROUNDS, DEFAULT_TIMER_SECONDS, TeamColor},
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "CHARADES_BACK_CONFIG_PATH";
const DEFAULT_IMAGES_DIR: &str = "result";
const DEFAULT_SNAPSHOT_PATH: &str = "data/charades-game.json";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    palette: Vec<TeamColor>,
    images_dir: PathBuf,
    snapshot_path: PathBuf,
    default_rounds: u32,
    default_timer_seconds: u32,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        colors = app_config.palette.len(),
                        images_dir = %app_config.images_dir.display(),
                        "loaded config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Directory holding the captioned image deck.
    pub fn images_dir(&self) -> &PathBuf {
        &self.images_dir
    }

    /// File the session snapshot is written to.
    pub fn snapshot_path(&self) -> &PathBuf {
        &self.snapshot_path
    }

    /// Defaults handed to the game controller.
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            palette: self.palette.clone(),
            default_rounds: self.default_rounds,
            default_timer_seconds: self.default_timer_seconds,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            default_rounds: DEFAULT_ROUNDS,
            default_timer_seconds: DEFAULT_TIMER_SECONDS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    colors: Option<Vec<RawColor>>,
    images_dir: Option<PathBuf>,
    snapshot_path: Option<PathBuf>,
    default_rounds: Option<u32>,
    default_timer_seconds: Option<u32>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        let palette = value
            .colors
            .map(|colors| colors.into_iter().map(Into::into).collect::<Vec<_>>())
            .filter(|colors| !colors.is_empty())
            .unwrap_or(defaults.palette);
        Self {
            palette,
            images_dir: value.images_dir.unwrap_or(defaults.images_dir),
            snapshot_path: value.snapshot_path.unwrap_or(defaults.snapshot_path),
            default_rounds: value.default_rounds.unwrap_or(defaults.default_rounds),
            default_timer_seconds: value
                .default_timer_seconds
                .filter(|seconds| *seconds > 0)
                .unwrap_or(defaults.default_timer_seconds),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of a single palette entry inside the configuration file.
struct RawColor {
    hex: String,
    name: String,
}

impl From<RawColor> for TeamColor {
    fn from(value: RawColor) -> Self {
        Self {
            hex: value.hex,
            name: value.name,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in palette shipped with the binary.
fn default_palette() -> Vec<TeamColor> {
    [
        ("#8b5cf6", "Purple Haze"),
        ("#06b6d4", "Ocean Blue"),
        ("#f59e0b", "Golden Sun"),
        ("#10b981", "Emerald Green"),
        ("#ef4444", "Cherry Red"),
        ("#8b5cf6", "Violet Dream"),
    ]
    .into_iter()
    .map(|(hex, name)| TeamColor {
        hex: hex.into(),
        name: name.into(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let raw: RawConfig =
            serde_json::from_str(r##"{"imagesDir": "deck", "defaultTimerSeconds": 0}"##).unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.images_dir(), &PathBuf::from("deck"));
        assert_eq!(config.controller_settings().palette.len(), 6);
        assert_eq!(config.controller_settings().default_timer_seconds, 60);
    }

    #[test]
    fn custom_palette_replaces_default() {
        let raw: RawConfig = serde_json::from_str(
            r##"{"colors": [{"hex": "#000000", "name": "Ink"}], "defaultRounds": 5}"##,
        )
        .unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.controller_settings().palette[0].name, "Ink");
        assert_eq!(config.controller_settings().default_rounds, 5);
    }
}
