#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The business map session.
//!
//! A [`MapSession`] is the single owner of all mutable map state: filter
//! selection, search and sort, viewport, boundary level, hover and
//! selection, and the visibility caches. The rendering layer reports what
//! happened through [`MapEvent`]s and [`UserAction`]s, reads the view
//! commands the session emits, and observes immutable
//! [`SessionSnapshot`]s through a `tokio::sync::watch` channel.

pub mod config;
pub mod event;
pub mod level;
pub mod session;
pub mod snapshot;

use std::path::PathBuf;

use thiserror::Error;

pub use config::SessionConfig;
pub use event::{MapEvent, UserAction};
pub use level::{BoundaryLevelMachine, LevelChange};
pub use session::MapSession;
pub use snapshot::SessionSnapshot;

/// Errors that can occur while loading the session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// TOML parsing failed.
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parsed but are inconsistent.
    #[error("Invalid config: {message}")]
    Invalid {
        /// What is wrong.
        message: String,
    },
}
