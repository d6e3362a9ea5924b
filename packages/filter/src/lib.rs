#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Cascading filter engine.
//!
//! Everything here is a pure function of its inputs: a new
//! [`FilterState`](business_map_filter_models::FilterState) is returned for
//! every change, and record lists are borrowed subsequences of the loaded
//! collection. The session owns the current state and decides what to do
//! with errors.

pub mod cascade;
pub mod matching;
pub mod options;

#[cfg(test)]
pub(crate) mod fixtures;

pub use cascade::{apply, apply_named, is_disabled, reset, select_record};
pub use matching::matching_records;
pub use options::options;
