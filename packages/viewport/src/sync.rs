//! Map view synchronization.
//!
//! Computes where the map should look for a record set or a single record
//! and only emits a [`ViewCommand`] when that target differs from the last
//! one sent.

use business_map_business_models::BusinessRecord;
use business_map_viewport_models::{BoundingBox, LatLng, MapView, ViewCommand};

/// Target view covering every record: the midpoint of the latitude and
/// longitude extremes, zoomed by the larger of the two spans.
///
/// Returns `None` for an empty set, meaning "leave the view alone".
#[must_use]
pub fn view_for(records: &[&BusinessRecord]) -> Option<MapView> {
    let bounds = BoundingBox::from_points(
        records
            .iter()
            .map(|r| LatLng::new(r.latitude, r.longitude)),
    )?;

    let span = (bounds.north - bounds.south).max(bounds.east - bounds.west);
    Some(MapView::new(bounds.center(), zoom_for_span(span)))
}

/// Zoom for a bounding-box span in degrees.
#[must_use]
pub fn zoom_for_span(span: f64) -> u8 {
    if span < 0.01 {
        15
    } else if span < 0.05 {
        13
    } else if span > 0.2 {
        10
    } else {
        12
    }
}

/// Target view centered on `record` at `zoom`.
#[must_use]
pub const fn fly_to(record: &BusinessRecord, zoom: u8) -> MapView {
    MapView::new(LatLng::new(record.latitude, record.longitude), zoom)
}

/// Coordinate tolerance, in degrees, when comparing a reported view with a
/// target.
const SAME_VIEW_EPSILON: f64 = 1e-7;

fn same_view(a: MapView, b: MapView) -> bool {
    a.zoom == b.zoom
        && (a.center.lat - b.center.lat).abs() < SAME_VIEW_EPSILON
        && (a.center.lng - b.center.lng).abs() < SAME_VIEW_EPSILON
}

/// Remembers the last command sent to the map and drops repeats.
#[derive(Debug, Clone, Default)]
pub struct MapViewSync {
    last: Option<ViewCommand>,
}

impl MapViewSync {
    /// A synchronizer that has not sent anything yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Follows a filtered record set. Empty sets never move the map.
    pub fn follow_records(&mut self, records: &[&BusinessRecord]) -> Option<ViewCommand> {
        let view = view_for(records)?;
        self.emit(ViewCommand::SetView { view })
    }

    /// Animates to a single record.
    pub fn fly_to_record(&mut self, record: &BusinessRecord, zoom: u8) -> Option<ViewCommand> {
        self.emit(ViewCommand::FlyTo {
            view: fly_to(record, zoom),
        })
    }

    /// Fits a boundary's bounds.
    pub fn fit_bounds(&mut self, bounds: BoundingBox, max_zoom: u8) -> Option<ViewCommand> {
        self.emit(ViewCommand::FitBounds { bounds, max_zoom })
    }

    /// Forgets the last target so the next command is always emitted.
    pub const fn forget(&mut self) {
        self.last = None;
    }

    /// Reconciles with the view the map reports after a pan or zoom.
    ///
    /// The last target is kept only while the map still shows it: the same
    /// center and zoom for [`ViewCommand::SetView`] and
    /// [`ViewCommand::FlyTo`], a center inside the bounds for
    /// [`ViewCommand::FitBounds`]. Otherwise it is forgotten so that
    /// repeating the action moves the map again.
    pub fn viewport_moved(&mut self, reported: MapView) {
        let still_there = match self.last {
            None => return,
            Some(ViewCommand::SetView { view } | ViewCommand::FlyTo { view }) => {
                same_view(view, reported)
            }
            Some(ViewCommand::FitBounds { bounds, .. }) => {
                let LatLng { lat, lng } = reported.center;
                bounds.contains(&BoundingBox::new(lng, lat, lng, lat))
            }
        };

        if !still_there {
            log::trace!("Map moved to {reported:?}, forgetting last view target");
            self.forget();
        }
    }

    fn emit(&mut self, command: ViewCommand) -> Option<ViewCommand> {
        if self.last == Some(command) {
            log::trace!("Suppressing repeated view command {command:?}");
            return None;
        }
        log::debug!("View command {command:?}");
        self.last = Some(command);
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use business_map_business_models::MapType;

    use super::*;

    fn at(id: &str, latitude: f64, longitude: f64) -> BusinessRecord {
        BusinessRecord {
            id: id.to_string(),
            name: format!("Usaha {id}"),
            address: String::new(),
            map_type: MapType::Prelist,
            category: "Makanan".to_string(),
            category_code: "56".to_string(),
            region: "Kota Medan".to_string(),
            district: "Medan Baru".to_string(),
            sub_district: "Darat".to_string(),
            local_unit: "0001".to_string(),
            census_block: "B0001".to_string(),
            latitude,
            longitude,
            data_source: "Survei".to_string(),
            phone: None,
        }
    }

    #[test]
    fn wide_spread_zooms_out() {
        let a = at("a", 3.50, 98.65);
        let b = at("b", 3.52, 98.65);
        let c = at("c", 3.70, 98.65);
        let view = view_for(&[&a, &b, &c]).unwrap();
        assert!((view.center.lat - 3.6).abs() < 1e-9);
        assert!((view.center.lng - 98.65).abs() < 1e-9);
        // 3.7 - 3.5 is slightly above 0.2 in binary floating point.
        assert_eq!(view.zoom, 10);
    }

    #[test]
    fn single_record_zooms_in() {
        let a = at("a", 3.5, 98.6);
        let view = view_for(&[&a]).unwrap();
        assert_eq!(view, MapView::new(LatLng::new(3.5, 98.6), 15));
    }

    #[test]
    fn empty_set_leaves_the_view_alone() {
        assert!(view_for(&[]).is_none());
        let mut sync = MapViewSync::new();
        assert!(sync.follow_records(&[]).is_none());

        let a = at("a", 3.5, 98.6);
        assert!(sync.follow_records(&[&a]).is_some());
    }

    #[test]
    fn span_breakpoints() {
        assert_eq!(zoom_for_span(0.0), 15);
        assert_eq!(zoom_for_span(0.009), 15);
        assert_eq!(zoom_for_span(0.01), 13);
        assert_eq!(zoom_for_span(0.049), 13);
        assert_eq!(zoom_for_span(0.05), 12);
        assert_eq!(zoom_for_span(0.2), 12);
        assert_eq!(zoom_for_span(0.21), 10);
    }

    #[test]
    fn repeated_targets_are_suppressed() {
        let a = at("a", 3.5, 98.6);
        let b = at("b", 3.52, 98.61);
        let mut sync = MapViewSync::new();

        assert!(sync.follow_records(&[&a, &b]).is_some());
        assert!(sync.follow_records(&[&a, &b]).is_none());
        assert!(sync.follow_records(&[&b, &a]).is_none());

        let fly = sync.fly_to_record(&a, 16).unwrap();
        assert_eq!(
            fly,
            ViewCommand::FlyTo {
                view: MapView::new(LatLng::new(3.5, 98.6), 16)
            }
        );
        assert!(sync.fly_to_record(&a, 16).is_none());

        sync.forget();
        assert!(sync.fly_to_record(&a, 16).is_some());
    }

    #[test]
    fn fit_bounds_is_deduplicated_too() {
        let bounds = BoundingBox::new(98.6, 3.5, 98.7, 3.6);
        let mut sync = MapViewSync::new();
        assert_eq!(
            sync.fit_bounds(bounds, 13),
            Some(ViewCommand::FitBounds {
                bounds,
                max_zoom: 13
            })
        );
        assert!(sync.fit_bounds(bounds, 13).is_none());
        assert!(sync.fit_bounds(bounds, 16).is_some());
    }

    #[test]
    fn moving_away_rearms_the_last_target() {
        let a = at("a", 3.5, 98.6);
        let target = MapView::new(LatLng::new(3.5, 98.6), 16);
        let mut sync = MapViewSync::new();
        assert!(sync.fly_to_record(&a, 16).is_some());

        sync.viewport_moved(target);
        assert!(sync.fly_to_record(&a, 16).is_none());

        sync.viewport_moved(MapView::new(LatLng::new(3.6, 98.7), 16));
        assert_eq!(
            sync.fly_to_record(&a, 16),
            Some(ViewCommand::FlyTo { view: target })
        );

        sync.viewport_moved(MapView::new(LatLng::new(3.5, 98.6), 14));
        assert!(sync.fly_to_record(&a, 16).is_some());
    }

    #[test]
    fn fitted_bounds_stay_current_while_centered_inside() {
        let bounds = BoundingBox::new(98.6, 3.5, 98.7, 3.6);
        let mut sync = MapViewSync::new();
        assert!(sync.fit_bounds(bounds, 13).is_some());

        sync.viewport_moved(MapView::new(LatLng::new(3.55, 98.65), 13));
        assert!(sync.fit_bounds(bounds, 13).is_none());

        sync.viewport_moved(MapView::new(LatLng::new(3.8, 98.65), 13));
        assert!(sync.fit_bounds(bounds, 13).is_some());
    }
}
