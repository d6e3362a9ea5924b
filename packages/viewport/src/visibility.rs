//! Debounced viewport culling for the medium and fine boundary levels.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use business_map_boundary::BoundaryIndex;
use business_map_boundary_models::{BoundaryFeature, BoundaryLevel};
use business_map_viewport_models::BoundingBox;

use crate::debounce::DebounceTimer;

/// Owns the "features inside the viewport" cache of every culled level.
///
/// Only the active level ever has a non-empty cache. Entering a culled
/// level computes its cache immediately; pan and zoom events within it are
/// debounced; leaving it drops the cache.
pub struct VisibilityEngine {
    indexes: BTreeMap<BoundaryLevel, Arc<BoundaryIndex>>,
    active: BoundaryLevel,
    viewport: Option<BoundingBox>,
    cache: Vec<usize>,
    timer: DebounceTimer,
    disposed: bool,
}

impl VisibilityEngine {
    /// An engine over the loaded indexes, starting at the coarse level.
    ///
    /// Indexes for non-culled levels are ignored.
    #[must_use]
    pub fn new(delay: Duration, indexes: impl IntoIterator<Item = Arc<BoundaryIndex>>) -> Self {
        let indexes = indexes
            .into_iter()
            .filter(|index| index.level().is_culled())
            .map(|index| (index.level(), index))
            .collect();

        Self {
            indexes,
            active: BoundaryLevel::District,
            viewport: None,
            cache: Vec::new(),
            timer: DebounceTimer::new(delay),
            disposed: false,
        }
    }

    /// Whether `level`'s collection is loaded and culled.
    #[must_use]
    pub fn has_level(&self, level: BoundaryLevel) -> bool {
        self.indexes.contains_key(&level)
    }

    /// Switches the active level.
    ///
    /// The previous level's cache is dropped and any pending recomputation
    /// is cancelled. If the new level is culled, loaded and the viewport is
    /// known, its cache is computed right away.
    pub fn set_level(&mut self, level: BoundaryLevel) {
        if self.disposed || level == self.active {
            return;
        }

        log::debug!("Visibility level {} -> {level}", self.active);
        self.active = level;
        self.cache.clear();
        self.timer.cancel();
        self.recompute();
    }

    /// Records a new visible rectangle and (re)arms the debounce timer.
    pub fn viewport_changed(&mut self, bounds: BoundingBox, now: Duration) {
        if self.disposed {
            return;
        }

        self.viewport = Some(bounds);
        if self.indexes.contains_key(&self.active) {
            self.timer.schedule(now);
        }
    }

    /// Runs the pending recomputation if its deadline has passed. Returns
    /// whether the cache was recomputed.
    pub fn tick(&mut self, now: Duration) -> bool {
        if self.timer.fire(now) {
            self.recompute();
            true
        } else {
            false
        }
    }

    /// Deadline of the pending recomputation, if any.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Duration> {
        self.timer.deadline()
    }

    /// Cancels pending work and drops all caches. Further events are
    /// ignored.
    pub fn dispose(&mut self) {
        self.timer.cancel();
        self.cache.clear();
        self.disposed = true;
    }

    /// Visible features of the active level. Empty for the coarse level, an
    /// unloaded level, or before the viewport is known.
    #[must_use]
    pub fn visible(&self) -> Vec<&BoundaryFeature> {
        self.indexes.get(&self.active).map_or_else(Vec::new, |index| {
            let features = index.features();
            self.cache.iter().map(|i| &features[*i]).collect()
        })
    }

    /// Visible features of `level`: the cache if `level` is active, empty
    /// otherwise.
    #[must_use]
    pub fn visible_at(&self, level: BoundaryLevel) -> Vec<&BoundaryFeature> {
        if level == self.active {
            self.visible()
        } else {
            Vec::new()
        }
    }

    fn recompute(&mut self) {
        let (Some(index), Some(viewport)) = (self.indexes.get(&self.active), self.viewport) else {
            self.cache.clear();
            return;
        };

        self.cache = index.visible_positions(&viewport);
        log::debug!(
            "{} of {} {} boundaries visible",
            self.cache.len(),
            index.features().len(),
            self.active
        );
    }
}

#[cfg(test)]
mod tests {
    use business_map_boundary_models::BoundaryParents;

    use super::*;
    use crate::debounce::{Clock, ManualClock};

    const DELAY: Duration = Duration::from_millis(200);

    fn square(id: &str, level: BoundaryLevel, west: f64, size: f64) -> BoundaryFeature {
        let (south, east, north) = (0.0, west + size, size);
        BoundaryFeature {
            id: id.to_string(),
            level,
            name: Some(id.to_string()),
            parents: BoundaryParents::default(),
            geometry: Some(serde_json::json!({
                "type": "Polygon",
                "coordinates": [[
                    [west, south], [east, south], [east, north], [west, north], [west, south]
                ]]
            })),
            properties: serde_json::Map::new(),
        }
    }

    fn index(level: BoundaryLevel) -> Arc<BoundaryIndex> {
        let features: Vec<BoundaryFeature> = (0..10)
            .map(|i| square(&format!("{level}-{i}"), level, f64::from(i) * 2.0, 1.0))
            .collect();
        Arc::new(BoundaryIndex::build(level, features.into()))
    }

    fn engine() -> VisibilityEngine {
        VisibilityEngine::new(
            DELAY,
            [
                index(BoundaryLevel::District),
                index(BoundaryLevel::SubDistrict),
                index(BoundaryLevel::LocalUnit),
            ],
        )
    }

    fn ids(features: &[&BoundaryFeature]) -> Vec<String> {
        features.iter().map(|f| f.id.clone()).collect()
    }

    #[test]
    fn coarse_level_is_never_culled() {
        let clock = ManualClock::new();
        let mut engine = engine();
        assert!(!engine.has_level(BoundaryLevel::District));

        engine.viewport_changed(BoundingBox::new(0.0, 0.0, 5.0, 1.0), clock.now());
        assert_eq!(engine.next_deadline(), None);
        assert!(engine.visible().is_empty());
    }

    #[test]
    fn entering_a_level_computes_immediately() {
        let clock = ManualClock::new();
        let mut engine = engine();
        engine.viewport_changed(BoundingBox::new(0.0, 0.0, 5.0, 1.0), clock.now());

        engine.set_level(BoundaryLevel::SubDistrict);
        assert_eq!(
            ids(&engine.visible()),
            vec!["sub_district-0", "sub_district-1", "sub_district-2"]
        );
        assert!(engine.visible_at(BoundaryLevel::LocalUnit).is_empty());
    }

    #[test]
    fn pan_burst_recomputes_once_after_the_delay() {
        let clock = ManualClock::new();
        let mut engine = engine();
        engine.viewport_changed(BoundingBox::new(0.0, 0.0, 1.0, 1.0), clock.now());
        engine.set_level(BoundaryLevel::LocalUnit);
        assert_eq!(ids(&engine.visible()), vec!["local_unit-0"]);

        let mut recomputes = 0;
        for step in 1..=5 {
            let west = f64::from(step) * 2.0;
            engine.viewport_changed(BoundingBox::new(west, 0.0, west + 1.0, 1.0), clock.now());
            clock.advance(Duration::from_millis(100));
            if engine.tick(clock.now()) {
                recomputes += 1;
            }
        }
        assert_eq!(recomputes, 0);
        assert_eq!(ids(&engine.visible()), vec!["local_unit-0"]);

        clock.advance(Duration::from_millis(100));
        assert!(engine.tick(clock.now()));
        assert_eq!(ids(&engine.visible()), vec!["local_unit-5"]);
        assert!(!engine.tick(clock.now()));
    }

    #[test]
    fn leaving_a_level_drops_its_cache_and_pending_work() {
        let clock = ManualClock::new();
        let mut engine = engine();
        engine.viewport_changed(BoundingBox::new(0.0, 0.0, 20.0, 1.0), clock.now());
        engine.set_level(BoundaryLevel::SubDistrict);
        assert_eq!(engine.visible().len(), 10);

        engine.viewport_changed(BoundingBox::new(0.0, 0.0, 1.0, 1.0), clock.now());
        engine.set_level(BoundaryLevel::District);
        assert!(engine.visible().is_empty());
        assert!(engine.visible_at(BoundaryLevel::SubDistrict).is_empty());
        assert_eq!(engine.next_deadline(), None);
    }

    #[test]
    fn unloaded_level_is_empty() {
        let clock = ManualClock::new();
        let mut engine = VisibilityEngine::new(DELAY, [index(BoundaryLevel::SubDistrict)]);
        engine.viewport_changed(BoundingBox::new(0.0, 0.0, 20.0, 1.0), clock.now());
        engine.set_level(BoundaryLevel::LocalUnit);
        assert!(engine.visible().is_empty());
        assert_eq!(engine.next_deadline(), None);
    }

    #[test]
    fn dispose_cancels_everything() {
        let clock = ManualClock::new();
        let mut engine = engine();
        engine.set_level(BoundaryLevel::SubDistrict);
        engine.viewport_changed(BoundingBox::new(0.0, 0.0, 20.0, 1.0), clock.now());
        engine.dispose();

        clock.advance(DELAY * 2);
        assert!(!engine.tick(clock.now()));
        assert!(engine.visible().is_empty());

        engine.viewport_changed(BoundingBox::new(0.0, 0.0, 20.0, 1.0), clock.now());
        assert_eq!(engine.next_deadline(), None);
    }

    #[test]
    fn culling_matches_linear_scan() {
        let clock = ManualClock::new();
        let sub = index(BoundaryLevel::SubDistrict);
        let mut engine = VisibilityEngine::new(DELAY, [Arc::clone(&sub)]);
        let viewport = BoundingBox::new(3.0, 0.5, 9.0, 0.7);
        engine.viewport_changed(viewport, clock.now());
        engine.set_level(BoundaryLevel::SubDistrict);

        let expected = business_map_boundary::compute_visible(sub.features(), &viewport);
        assert_eq!(ids(&engine.visible()), ids(&expected));
    }
}
