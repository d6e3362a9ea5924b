//! Immutable views of session state.

use std::collections::BTreeSet;

use business_map_boundary::info::BoundaryInfo;
use business_map_boundary_models::{BoundaryKey, BoundaryLevel};
use business_map_filter_models::{FilterField, FilterState, RecordQuery};
use business_map_viewport_models::ViewportState;

/// Everything a renderer needs, captured after one state change.
///
/// Snapshots are never mutated after publication; every change produces a
/// new one with a higher `version`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// Increases by one per published change.
    pub version: u64,
    /// Current filter selection.
    pub filters: FilterState,
    /// Filter controls that must be disabled.
    pub disabled: BTreeSet<FilterField>,
    /// Search text and sort order.
    pub query: RecordQuery,
    /// IDs of the matching records, in list order.
    pub record_ids: Vec<String>,
    /// Record last navigated to.
    pub selected_record: Option<String>,
    /// Last reported viewport.
    pub viewport: ViewportState,
    /// Active boundary level.
    pub level: BoundaryLevel,
    /// Whether the medium level is forced on.
    pub force_medium: bool,
    /// Hovered boundary.
    pub hovered: Option<BoundaryKey>,
    /// Selected boundary.
    pub selected_boundary: Option<BoundaryKey>,
    /// Overlay labels of the hovered, else selected, boundary.
    pub info: Option<BoundaryInfo>,
    /// IDs of the boundaries to draw at the active level.
    pub rendered_boundaries: Vec<String>,
}

impl SessionSnapshot {
    /// An empty snapshot at `viewport`, before anything is computed.
    #[must_use]
    pub fn empty(viewport: ViewportState) -> Self {
        Self {
            version: 0,
            filters: FilterState::default(),
            disabled: BTreeSet::new(),
            query: RecordQuery::default(),
            record_ids: Vec::new(),
            selected_record: None,
            viewport,
            level: BoundaryLevel::District,
            force_medium: false,
            hovered: None,
            selected_boundary: None,
            info: None,
            rendered_boundaries: Vec::new(),
        }
    }

    /// Whether the control for `field` is disabled.
    #[must_use]
    pub fn is_disabled(&self, field: FilterField) -> bool {
        self.disabled.contains(&field)
    }
}
