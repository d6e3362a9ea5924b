#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Boundary normalization, envelope index and viewport culling.
//!
//! Raw `GeoJSON` boundary features are normalized into
//! [`BoundaryFeature`](business_map_boundary_models::BoundaryFeature)
//! values by [`normalize`]. Each level's collection is then wrapped in a
//! [`BoundaryIndex`], which computes one bounding-box envelope per feature
//! and answers "which features intersect this viewport" through an R-tree.
//! Features whose geometry cannot be parsed get no envelope and are never
//! returned.

pub mod geometry;
pub mod index;
pub mod info;
pub mod normalize;
pub mod outline;

pub use index::{BoundaryIndex, compute_visible};
