//! The session container.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use business_map_boundary::BoundaryIndex;
use business_map_boundary::info::BoundaryInfo;
use business_map_boundary::outline::city_outline_geojson;
use business_map_boundary_models::{BoundaryFeature, BoundaryLevel};
use business_map_business_models::BusinessRecord;
use business_map_filter::{cascade, matching_records, options};
use business_map_filter_models::{
    FilterField, FilterState, RecordQuery, SortDirection, SortOrder, WILDCARD,
};
use business_map_loader::LoadedDatasets;
use business_map_viewport::{Clock, MapViewSync, VisibilityEngine};
use business_map_viewport_models::{BoundingBox, LatLng, MapView, ViewCommand, ViewportState};
use tokio::sync::watch;

use crate::config::SessionConfig;
use crate::event::{MapEvent, UserAction};
use crate::level::{BoundaryLevelMachine, LevelChange};
use crate::snapshot::SessionSnapshot;

/// Zoom ceiling when fitting a district picked from the filters.
const DISTRICT_FIT_MAX_ZOOM: u8 = 13;

/// Zoom ceiling when fitting a sub-district picked from the filters.
const SUB_DISTRICT_FIT_MAX_ZOOM: u8 = 16;

/// Single owner of all mutable map state for one user session.
///
/// Inputs arrive through [`handle_event`](Self::handle_event) and
/// [`dispatch`](Self::dispatch). Each input that changes anything
/// publishes a new [`SessionSnapshot`]. Positioning commands for the map
/// widget queue up until [`take_commands`](Self::take_commands).
///
/// The only deferred work is the debounced visibility recomputation; the
/// host calls [`tick`](Self::tick) at or after
/// [`next_deadline`](Self::next_deadline).
pub struct MapSession {
    config: SessionConfig,
    clock: Arc<dyn Clock>,
    datasets: LoadedDatasets,
    indexes: BTreeMap<BoundaryLevel, Arc<BoundaryIndex>>,
    filters: FilterState,
    query: RecordQuery,
    selected_record: Option<String>,
    viewport: ViewportState,
    levels: BoundaryLevelMachine,
    visibility: VisibilityEngine,
    view_sync: MapViewSync,
    commands: Vec<ViewCommand>,
    snapshots: watch::Sender<Arc<SessionSnapshot>>,
    version: u64,
    ended: bool,
}

impl MapSession {
    /// Starts a session over loaded data.
    ///
    /// Builds one envelope index per loaded boundary level and publishes
    /// the initial snapshot.
    #[must_use]
    pub fn new(config: SessionConfig, datasets: LoadedDatasets, clock: Arc<dyn Clock>) -> Self {
        let indexes: BTreeMap<BoundaryLevel, Arc<BoundaryIndex>> = BoundaryLevel::all()
            .iter()
            .filter_map(|level| {
                datasets.boundaries(*level).map(|features| {
                    (
                        *level,
                        Arc::new(BoundaryIndex::build(*level, Arc::clone(features))),
                    )
                })
            })
            .collect();

        let levels = BoundaryLevelMachine::new(config.zoom, datasets.loaded_levels());
        let visibility = VisibilityEngine::new(config.debounce(), indexes.values().cloned());
        let viewport = ViewportState::at(config.view.initial());

        log::info!(
            "Session started with {} businesses and levels {:?}",
            datasets.records().len(),
            datasets.loaded_levels()
        );

        let mut session = Self {
            config,
            clock,
            datasets,
            indexes,
            filters: FilterState::default(),
            query: RecordQuery::default(),
            selected_record: None,
            viewport,
            levels,
            visibility,
            view_sync: MapViewSync::new(),
            commands: Vec::new(),
            snapshots: watch::Sender::new(Arc::new(SessionSnapshot::empty(viewport))),
            version: 0,
            ended: false,
        };
        session.publish();
        session
    }

    /// Receiver for published snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionSnapshot>> {
        self.snapshots.subscribe()
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current filter selection.
    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Current search text and sort order.
    #[must_use]
    pub const fn query(&self) -> &RecordQuery {
        &self.query
    }

    /// Last reported viewport.
    #[must_use]
    pub const fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// Active boundary level.
    #[must_use]
    pub const fn level(&self) -> BoundaryLevel {
        self.levels.level()
    }

    /// Records matching the current filters, search and sort.
    #[must_use]
    pub fn records(&self) -> Vec<&BusinessRecord> {
        matching_records(self.datasets.records(), &self.filters, &self.query)
    }

    /// Values offered for `field` under the current selection.
    #[must_use]
    pub fn options(&self, field: FilterField) -> Vec<String> {
        options(self.datasets.records(), &self.filters, field)
    }

    /// Whether the control for `field` is disabled.
    #[must_use]
    pub fn is_disabled(&self, field: FilterField) -> bool {
        cascade::is_disabled(field, &self.filters)
    }

    /// Boundaries to draw at the active level: the whole collection for
    /// the coarse level, the viewport-culled subset otherwise.
    #[must_use]
    pub fn rendered_boundaries(&self) -> Vec<&BoundaryFeature> {
        let level = self.levels.level();
        if level.is_culled() {
            self.visibility.visible_at(level)
        } else {
            self.indexes
                .get(&level)
                .map(|index| index.features().iter().collect())
                .unwrap_or_default()
        }
    }

    /// Overlay labels of the hovered, else selected, boundary.
    #[must_use]
    pub fn boundary_info(&self) -> Option<BoundaryInfo> {
        let key = self.levels.displayed()?;
        let feature = self.indexes.get(&key.level)?.get(&key.id)?;
        Some(BoundaryInfo::for_feature(feature, key.level))
    }

    /// Outline of the whole city as a `GeoJSON` geometry, merged from the
    /// district polygons.
    #[must_use]
    pub fn city_outline(&self) -> Option<serde_json::Value> {
        city_outline_geojson(self.datasets.districts.as_deref()?)
    }

    /// Drains the queued view commands, oldest first.
    pub fn take_commands(&mut self) -> Vec<ViewCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Deadline of the pending visibility recomputation, if any.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Duration> {
        self.visibility.next_deadline()
    }

    /// Runs deferred work that is due. Returns whether a new snapshot was
    /// published.
    pub fn tick(&mut self) -> bool {
        if self.ended || !self.visibility.tick(self.clock.now()) {
            return false;
        }
        self.publish();
        true
    }

    /// Ends the session: pending work is cancelled and later inputs are
    /// ignored.
    pub fn end(&mut self) {
        self.visibility.dispose();
        self.commands.clear();
        self.ended = true;
        log::debug!("Session ended at version {}", self.version);
    }

    /// Applies a map widget event.
    pub fn handle_event(&mut self, event: MapEvent) {
        if self.ended {
            log::debug!("Ignoring {event:?} after session end");
            return;
        }

        match event {
            MapEvent::ZoomChanged {
                zoom,
                center,
                bounds,
            } => {
                self.viewport.zoom = zoom;
                self.viewport_moved(center, bounds);
            }
            MapEvent::PanChanged { center, bounds } => self.viewport_moved(center, bounds),
            MapEvent::FeatureHovered(key) => {
                if !self.levels.hover(key) {
                    return;
                }
            }
            MapEvent::FeatureSelected(key) => {
                if !self.levels.select(Some(key)) {
                    return;
                }
            }
        }

        self.publish();
    }

    /// Applies a user action from the controls.
    pub fn dispatch(&mut self, action: UserAction) {
        if self.ended {
            log::debug!("Ignoring {action:?} after session end");
            return;
        }

        match action {
            UserAction::SetFilter { field, value } => {
                if !self.set_filter(field, &value) {
                    return;
                }
            }
            UserAction::ResetFilters => {
                self.filters = cascade::reset();
                self.query.search.clear();
                self.selected_record = None;
                self.follow_records();
            }
            UserAction::SetSearch(text) => {
                self.query.search = text;
                self.follow_records();
            }
            UserAction::SortBy(key) => {
                self.query.sort = Some(self.query.sort.map_or(
                    SortOrder {
                        key,
                        direction: SortDirection::Asc,
                    },
                    |order| order.toggled(key),
                ));
            }
            UserAction::SelectRecord { id } => {
                if !self.select_record(&id) {
                    return;
                }
            }
            UserAction::SetForceMedium(force) => {
                let change = self.levels.set_force_medium(force, self.viewport.zoom);
                self.level_changed(change);
            }
        }

        self.publish();
    }

    fn viewport_moved(&mut self, center: LatLng, bounds: BoundingBox) {
        self.viewport.center = center;
        self.viewport.bounds = Some(bounds);
        self.view_sync.viewport_moved(MapView::new(center, self.viewport.zoom));
        self.visibility.viewport_changed(bounds, self.clock.now());
        let change = self.levels.on_zoom(self.viewport.zoom);
        self.level_changed(change);
    }

    fn level_changed(&mut self, change: Option<LevelChange>) {
        if let Some(change) = change {
            self.visibility.set_level(change.to);
        }
    }

    fn set_filter(&mut self, field: FilterField, value: &str) -> bool {
        match cascade::apply(&self.filters, field, value) {
            Ok(next) => self.filters = next,
            Err(e) => {
                self.misuse(&e);
                return false;
            }
        }

        let focused = match field {
            FilterField::District => self.focus_boundary(BoundaryLevel::District, value),
            FilterField::SubDistrict => self.focus_boundary(BoundaryLevel::SubDistrict, value),
            _ => false,
        };
        if !focused {
            self.follow_records();
        }
        true
    }

    /// Selects the boundary named `name` at `level` and fits the map to it.
    /// The wildcard clears the selection and returns to the coarse level.
    /// Returns whether a fit command was issued.
    fn focus_boundary(&mut self, level: BoundaryLevel, name: &str) -> bool {
        if name == WILDCARD {
            let change = self.levels.unfocus();
            self.level_changed(change);
            return false;
        }

        let Some(index) = self.indexes.get(&level) else {
            return false;
        };
        let Some(feature) = index.find_by_name(name) else {
            log::debug!("No {level} boundary named {name:?}");
            return false;
        };
        let key = feature.key();
        let bounds = index.bounds_of(&feature.id);

        let change = self.levels.focus(key);
        self.level_changed(change);

        let Some(bounds) = bounds else {
            return false;
        };
        let max_zoom = if level == BoundaryLevel::District {
            DISTRICT_FIT_MAX_ZOOM
        } else {
            SUB_DISTRICT_FIT_MAX_ZOOM
        };
        if let Some(command) = self.view_sync.fit_bounds(bounds, max_zoom) {
            self.commands.push(command);
        }
        true
    }

    fn select_record(&mut self, id: &str) -> bool {
        let Some(record) = self.datasets.records().iter().find(|r| r.id == id) else {
            self.misuse(&format!("No business record with id {id:?}"));
            return false;
        };

        self.filters = cascade::select_record(record);
        self.selected_record = Some(record.id.clone());
        if let Some(command) = self
            .view_sync
            .fly_to_record(record, self.config.view.fly_to_zoom)
        {
            self.commands.push(command);
        }
        true
    }

    fn follow_records(&mut self) {
        let records = matching_records(self.datasets.records(), &self.filters, &self.query);
        if let Some(command) = self.view_sync.follow_records(&records) {
            self.commands.push(command);
        }
    }

    fn misuse(&self, err: &dyn Display) {
        assert!(!self.config.strict, "Session misuse: {err}");
        log::error!("Session misuse ignored: {err}");
    }

    fn publish(&mut self) {
        self.version += 1;
        let snapshot = SessionSnapshot {
            version: self.version,
            filters: self.filters.clone(),
            disabled: FilterField::all()
                .iter()
                .copied()
                .filter(|field| cascade::is_disabled(*field, &self.filters))
                .collect(),
            query: self.query.clone(),
            record_ids: self.records().iter().map(|r| r.id.clone()).collect(),
            selected_record: self.selected_record.clone(),
            viewport: self.viewport,
            level: self.levels.level(),
            force_medium: self.levels.force_medium(),
            hovered: self.levels.hovered().cloned(),
            selected_boundary: self.levels.selected().cloned(),
            info: self.boundary_info(),
            rendered_boundaries: self
                .rendered_boundaries()
                .iter()
                .map(|f| f.id.clone())
                .collect(),
        };
        self.snapshots.send_replace(Arc::new(snapshot));
    }
}
