#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Viewport-driven behavior of the business map.
//!
//! [`visibility`] keeps the per-level "features inside the viewport"
//! caches for the culled boundary levels, recomputing them on a debounce
//! timer. [`sync`] turns record sets and fly-to requests into map view
//! commands, suppressing repeats. Time is always passed in explicitly
//! through a [`debounce::Clock`], so the whole crate runs the same under a
//! real or a virtual clock.

pub mod debounce;
pub mod sync;
pub mod visibility;

pub use debounce::{Clock, DebounceTimer, ManualClock, SystemClock};
pub use sync::{MapViewSync, fly_to, view_for};
pub use visibility::VisibilityEngine;
