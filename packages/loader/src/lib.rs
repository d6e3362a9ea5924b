#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset loading for the business map.
//!
//! Four independent `GeoJSON` `FeatureCollection`s are fetched
//! concurrently: businesses, districts, sub-districts and local units.
//! Each collection is isolated: a failure is logged and leaves that
//! collection absent without affecting the other three. Loaded collections
//! are immutable and shared as `Arc<[T]>`.

pub mod business;
pub mod fetch;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use business_map_boundary::normalize::normalize_features;
use business_map_boundary_models::{BoundaryFeature, BoundaryLevel};
use business_map_business_models::BusinessRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading one collection.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading a local file failed.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is not a usable feature collection.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Where a collection is loaded from: a local file or an `http(s)` URL.
///
/// Written in configuration as a plain string; anything starting with
/// `http://` or `https://` is a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DatasetLocation {
    /// Local file path.
    File(PathBuf),
    /// Remote URL.
    Url(String),
}

impl DatasetLocation {
    /// Parses a location string.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }

    /// Resolves a relative file path against `base`. URLs and absolute
    /// paths are returned unchanged.
    #[must_use]
    pub fn resolve(&self, base: &Path) -> Self {
        match self {
            Self::File(path) if path.is_relative() => Self::File(base.join(path)),
            other => other.clone(),
        }
    }
}

impl From<String> for DatasetLocation {
    fn from(location: String) -> Self {
        Self::parse(&location)
    }
}

impl From<DatasetLocation> for String {
    fn from(location: DatasetLocation) -> Self {
        location.to_string()
    }
}

impl fmt::Display for DatasetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Locations of the four collections. A missing entry means the
/// collection is not loaded at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSources {
    /// Business points.
    pub businesses: Option<DatasetLocation>,
    /// District polygons (coarse level).
    pub districts: Option<DatasetLocation>,
    /// Sub-district polygons (medium level).
    pub sub_districts: Option<DatasetLocation>,
    /// Local unit polygons (fine level).
    pub local_units: Option<DatasetLocation>,
}

impl DatasetSources {
    /// Resolves every relative file path against `base`.
    #[must_use]
    pub fn resolve(&self, base: &Path) -> Self {
        Self {
            businesses: self.businesses.as_ref().map(|l| l.resolve(base)),
            districts: self.districts.as_ref().map(|l| l.resolve(base)),
            sub_districts: self.sub_districts.as_ref().map(|l| l.resolve(base)),
            local_units: self.local_units.as_ref().map(|l| l.resolve(base)),
        }
    }

    /// Location of the boundary collection for `level`.
    #[must_use]
    pub const fn boundaries(&self, level: BoundaryLevel) -> Option<&DatasetLocation> {
        match level {
            BoundaryLevel::District => self.districts.as_ref(),
            BoundaryLevel::SubDistrict => self.sub_districts.as_ref(),
            BoundaryLevel::LocalUnit => self.local_units.as_ref(),
        }
    }
}

/// The loaded collections. `None` marks a collection that was not
/// configured or failed to load.
#[derive(Debug, Clone, Default)]
pub struct LoadedDatasets {
    /// Business records, in file order.
    pub businesses: Option<Arc<[BusinessRecord]>>,
    /// District boundaries.
    pub districts: Option<Arc<[BoundaryFeature]>>,
    /// Sub-district boundaries.
    pub sub_districts: Option<Arc<[BoundaryFeature]>>,
    /// Local unit boundaries.
    pub local_units: Option<Arc<[BoundaryFeature]>>,
}

impl LoadedDatasets {
    /// Business records, empty if the collection is absent.
    #[must_use]
    pub fn records(&self) -> &[BusinessRecord] {
        self.businesses.as_deref().unwrap_or_default()
    }

    /// Boundary collection for `level`, if loaded.
    #[must_use]
    pub const fn boundaries(&self, level: BoundaryLevel) -> Option<&Arc<[BoundaryFeature]>> {
        match level {
            BoundaryLevel::District => self.districts.as_ref(),
            BoundaryLevel::SubDistrict => self.sub_districts.as_ref(),
            BoundaryLevel::LocalUnit => self.local_units.as_ref(),
        }
    }

    /// Levels whose boundary collection is loaded, coarsest first.
    #[must_use]
    pub fn loaded_levels(&self) -> Vec<BoundaryLevel> {
        BoundaryLevel::all()
            .iter()
            .copied()
            .filter(|level| self.boundaries(*level).is_some())
            .collect()
    }
}

/// Loads all configured collections concurrently.
///
/// Never fails as a whole: each collection's error is logged at warn level
/// and that collection is left as `None`.
pub async fn load_all(client: &reqwest::Client, sources: &DatasetSources) -> LoadedDatasets {
    let (businesses, districts, sub_districts, local_units) = tokio::join!(
        load_businesses(client, sources.businesses.as_ref()),
        load_boundaries(client, sources.districts.as_ref(), BoundaryLevel::District),
        load_boundaries(client, sources.sub_districts.as_ref(), BoundaryLevel::SubDistrict),
        load_boundaries(client, sources.local_units.as_ref(), BoundaryLevel::LocalUnit),
    );

    LoadedDatasets {
        businesses,
        districts,
        sub_districts,
        local_units,
    }
}

async fn load_businesses(
    client: &reqwest::Client,
    location: Option<&DatasetLocation>,
) -> Option<Arc<[BusinessRecord]>> {
    let Some(location) = location else {
        log::info!("No business dataset configured");
        return None;
    };

    match fetch::fetch_features(client, location).await {
        Ok(features) => {
            let records = business::parse_records(&features);
            log::info!(
                "Loaded {} of {} businesses from {location}",
                records.len(),
                features.len()
            );
            Some(records.into())
        }
        Err(e) => {
            log::warn!("Failed to load businesses from {location}: {e}");
            None
        }
    }
}

async fn load_boundaries(
    client: &reqwest::Client,
    location: Option<&DatasetLocation>,
    level: BoundaryLevel,
) -> Option<Arc<[BoundaryFeature]>> {
    let Some(location) = location else {
        log::info!("No {level} boundary dataset configured");
        return None;
    };

    match fetch::fetch_features(client, location).await {
        Ok(features) => {
            let boundaries = normalize_features(&features, level);
            log::info!("Loaded {} {level} boundaries from {location}", boundaries.len());
            Some(boundaries.into())
        }
        Err(e) => {
            log::warn!("Failed to load {level} boundaries from {location}: {e}");
            None
        }
    }
}
