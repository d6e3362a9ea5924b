//! Session configuration.
//!
//! Read from a TOML file named by `BUSINESS_MAP_CONFIG`, or from the
//! built-in default embedded at compile time. Every section has defaults,
//! so a file only needs the values it changes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use business_map_loader::DatasetSources;
use business_map_viewport_models::{LatLng, MapView};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "BUSINESS_MAP_CONFIG";

/// Environment variable naming the base directory for relative dataset
/// paths.
pub const DATA_DIR_ENV: &str = "BUSINESS_MAP_DATA_DIR";

/// Built-in configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Zoom thresholds driving the boundary level machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomThresholds {
    /// Minimum zoom for the medium level.
    pub medium: u8,
    /// Minimum zoom for the fine level.
    pub fine: u8,
    /// If set, a machine already at medium or fine only drops to coarse
    /// below this zoom. Must be below `medium`.
    pub exit_medium: Option<u8>,
}

impl Default for ZoomThresholds {
    fn default() -> Self {
        Self {
            medium: 13,
            fine: 15,
            exit_medium: None,
        }
    }
}

/// Initial and fly-to views.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Initial center as `[lat, lng]`.
    pub center: [f64; 2],
    /// Initial zoom.
    pub zoom: u8,
    /// Zoom used when flying to a single record.
    pub fly_to_zoom: u8,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: [3.5952, 98.6722],
            zoom: 12,
            fly_to_zoom: 16,
        }
    }
}

impl ViewConfig {
    /// The initial map view.
    #[must_use]
    pub const fn initial(&self) -> MapView {
        MapView::new(LatLng::new(self.center[0], self.center[1]), self.zoom)
    }
}

/// Everything a [`MapSession`](crate::MapSession) needs besides the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where the four collections are loaded from.
    pub datasets: DatasetSources,
    /// Level machine thresholds.
    pub zoom: ZoomThresholds,
    /// Map views.
    pub view: ViewConfig,
    /// Delay before a pan/zoom burst triggers a visibility recomputation.
    pub debounce_ms: u64,
    /// Panic on programmer misuse instead of logging it.
    pub strict: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            datasets: DatasetSources::default(),
            zoom: ZoomThresholds::default(),
            view: ViewConfig::default(),
            debounce_ms: 200,
            strict: cfg!(debug_assertions),
        }
    }
}

impl SessionConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Parse`] if the document is not valid TOML for this
    ///   schema.
    /// * [`ConfigError::Invalid`] if the zoom thresholds are inconsistent.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// The built-in configuration.
    ///
    /// # Errors
    ///
    /// Only if the embedded TOML is broken, which is a build defect.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    /// Loads the configuration named by the process environment.
    ///
    /// # Errors
    ///
    /// See [`Self::load_with`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Loads the configuration using `env` to read environment variables.
    ///
    /// The file named by [`CONFIG_ENV`] is read if set, else the built-in
    /// default. Relative dataset paths are resolved against
    /// [`DATA_DIR_ENV`] if set, else the config file's directory, else
    /// left as they are.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or is invalid.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let (mut config, config_dir) = match env(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                let contents =
                    std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                        path: path.clone(),
                        source,
                    })?;
                log::info!("Using config {}", path.display());
                (
                    Self::from_toml(&contents)?,
                    path.parent().map(Path::to_path_buf),
                )
            }
            None => (Self::embedded()?, None),
        };

        if let Some(base) = env(DATA_DIR_ENV).map(PathBuf::from).or(config_dir) {
            config.datasets = config.datasets.resolve(&base);
        }

        Ok(config)
    }

    /// Debounce delay as a [`Duration`].
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let ZoomThresholds {
            medium,
            fine,
            exit_medium,
        } = self.zoom;

        if medium >= fine {
            return Err(ConfigError::Invalid {
                message: format!("zoom.medium ({medium}) must be below zoom.fine ({fine})"),
            });
        }
        if let Some(exit) = exit_medium
            && exit >= medium
        {
            return Err(ConfigError::Invalid {
                message: format!(
                    "zoom.exit_medium ({exit}) must be below zoom.medium ({medium})"
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use business_map_loader::DatasetLocation;

    use super::*;

    #[test]
    fn embedded_config_matches_defaults() {
        let config = SessionConfig::embedded().unwrap();
        assert_eq!(config.zoom, ZoomThresholds::default());
        assert_eq!(config.view, ViewConfig::default());
        assert_eq!(config.debounce(), Duration::from_millis(200));
        assert_eq!(
            config.datasets.businesses,
            Some(DatasetLocation::parse("data/usaha.geojson"))
        );
        assert_eq!(config.strict, cfg!(debug_assertions));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = SessionConfig::from_toml(
            r"
            strict = false

            [zoom]
            exit_medium = 12
            ",
        )
        .unwrap();
        assert_eq!(config.zoom.medium, 13);
        assert_eq!(config.zoom.exit_medium, Some(12));
        assert!(!config.strict);
        assert_eq!(config.datasets, DatasetSources::default());
    }

    #[test]
    fn inconsistent_thresholds_are_rejected() {
        let err = SessionConfig::from_toml("[zoom]\nmedium = 16\nfine = 15\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }), "{err}");

        let err = SessionConfig::from_toml("[zoom]\nmedium = 15\nfine = 15\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }), "{err}");

        let err = SessionConfig::from_toml("[zoom]\nexit_medium = 13\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }), "{err}");
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = SessionConfig::from_toml("debounce_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err}");
    }

    fn env_of(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let env: BTreeMap<&str, &str> = pairs.iter().copied().collect();
        move |key| env.get(key).map(ToString::to_string)
    }

    #[test]
    fn data_dir_resolves_relative_paths() {
        let env = env_of(&[(DATA_DIR_ENV, "/srv/business-map")]);
        let config = SessionConfig::load_with(env).unwrap();
        assert_eq!(
            config.datasets.districts,
            Some(DatasetLocation::parse("/srv/business-map/data/kecamatan.geojson"))
        );
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let env = env_of(&[(CONFIG_ENV, "/nonexistent/business-map.toml")]);
        let err = SessionConfig::load_with(env).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }), "{err}");
    }
}
