//! Inputs to a [`MapSession`](crate::MapSession).

use business_map_boundary_models::BoundaryKey;
use business_map_filter_models::{FilterField, SortKey};
use business_map_viewport_models::{BoundingBox, LatLng};

/// Something the map widget reports.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// A zoom gesture or animation ended.
    ZoomChanged {
        /// New integer zoom.
        zoom: u8,
        /// New center.
        center: LatLng,
        /// New visible rectangle.
        bounds: BoundingBox,
    },
    /// A pan ended.
    PanChanged {
        /// New center.
        center: LatLng,
        /// New visible rectangle.
        bounds: BoundingBox,
    },
    /// The pointer entered (`Some`) or left (`None`) a boundary.
    FeatureHovered(Option<BoundaryKey>),
    /// A boundary was clicked.
    FeatureSelected(BoundaryKey),
}

/// Something the user did in the controls around the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Set a filter field from control text.
    SetFilter {
        /// Field being set.
        field: FilterField,
        /// Control text; `"all"` is the wildcard.
        value: String,
    },
    /// Clear all filters, the search text and the record selection.
    ResetFilters,
    /// Replace the search text.
    SetSearch(String),
    /// Click a column header.
    SortBy(SortKey),
    /// Fly to a record and select its location in the filters.
    SelectRecord {
        /// Record ID.
        id: String,
    },
    /// Turn the medium-level override on or off.
    SetForceMedium(bool),
}
