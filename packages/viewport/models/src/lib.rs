#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Viewport, bounding box and map view types.
//!
//! These are the plain values exchanged between the map engine and the
//! presentation layer: where the map is looking, how far it is zoomed in,
//! and which geographic rectangle is currently visible.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Smallest box containing every `(lat, lng)` point, or `None` when
    /// the iterator is empty.
    pub fn from_points(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self::new(p.lng, p.lat, p.lng, p.lat),
                Some(b) => Self::new(
                    b.west.min(p.lng),
                    b.south.min(p.lat),
                    b.east.max(p.lng),
                    b.north.max(p.lat),
                ),
            })
        })
    }

    /// The same box with its corners ordered so that `west <= east` and
    /// `south <= north`.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self::new(
            self.west.min(self.east),
            self.south.min(self.north),
            self.west.max(self.east),
            self.south.max(self.north),
        )
    }

    /// Whether the two boxes overlap. Boxes that only share an edge or a
    /// corner count as overlapping.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.west <= other.east
            && other.west <= self.east
            && self.south <= other.north
            && other.south <= self.north
    }

    /// Whether `other` lies entirely inside this box.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.west <= other.west
            && self.south <= other.south
            && self.east >= other.east
            && self.north >= other.north
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }
}

/// A `(latitude, longitude)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lng: f64,
}

impl LatLng {
    /// Creates a new coordinate pair.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A target map position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// Map center.
    pub center: LatLng,
    /// Integer zoom level.
    pub zoom: u8,
}

impl MapView {
    /// Creates a new map view.
    #[must_use]
    pub const fn new(center: LatLng, zoom: u8) -> Self {
        Self { center, zoom }
    }
}

/// What the map is currently showing.
///
/// Only ever updated from pan/zoom events reported by the map, never
/// edited directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    /// Current center.
    pub center: LatLng,
    /// Current integer zoom.
    pub zoom: u8,
    /// Currently visible rectangle, unknown until the map reports it.
    pub bounds: Option<BoundingBox>,
}

impl ViewportState {
    /// A viewport at `view` whose visible bounds are not yet known.
    #[must_use]
    pub const fn at(view: MapView) -> Self {
        Self {
            center: view.center,
            zoom: view.zoom,
            bounds: None,
        }
    }
}

/// A positioning command for the map widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewCommand {
    /// Jump to a view without animation.
    SetView {
        /// Target view.
        view: MapView,
    },
    /// Animate to a view.
    FlyTo {
        /// Target view.
        view: MapView,
    },
    /// Fit the given bounds, never zooming in past `max_zoom`.
    FitBounds {
        /// Bounds to fit.
        bounds: BoundingBox,
        /// Zoom ceiling.
        max_zoom: u8,
    },
}
