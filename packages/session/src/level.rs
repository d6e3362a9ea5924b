//! Zoom-driven boundary level state machine.

use business_map_boundary_models::{BoundaryKey, BoundaryLevel};

use crate::config::ZoomThresholds;

/// A change of the active boundary level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    /// Level before the change.
    pub from: BoundaryLevel,
    /// Level after the change.
    pub to: BoundaryLevel,
}

/// Owns the active boundary level plus the hovered and selected features.
///
/// Every evaluation that actually changes the level clears hover and
/// selection. Levels without loaded data are never entered; the machine
/// falls back to the finest loaded level not finer than the one the zoom
/// asks for, with the coarse level as the floor.
#[derive(Debug, Clone)]
pub struct BoundaryLevelMachine {
    thresholds: ZoomThresholds,
    loaded: Vec<BoundaryLevel>,
    level: BoundaryLevel,
    force_medium: bool,
    hovered: Option<BoundaryKey>,
    selected: Option<BoundaryKey>,
}

impl BoundaryLevelMachine {
    /// A machine at the coarse level.
    #[must_use]
    pub fn new(
        thresholds: ZoomThresholds,
        loaded: impl IntoIterator<Item = BoundaryLevel>,
    ) -> Self {
        Self {
            thresholds,
            loaded: loaded.into_iter().collect(),
            level: BoundaryLevel::District,
            force_medium: false,
            hovered: None,
            selected: None,
        }
    }

    /// Active level.
    #[must_use]
    pub const fn level(&self) -> BoundaryLevel {
        self.level
    }

    /// Whether the medium level is forced on below its zoom threshold.
    #[must_use]
    pub const fn force_medium(&self) -> bool {
        self.force_medium
    }

    /// Hovered feature.
    #[must_use]
    pub const fn hovered(&self) -> Option<&BoundaryKey> {
        self.hovered.as_ref()
    }

    /// Selected feature.
    #[must_use]
    pub const fn selected(&self) -> Option<&BoundaryKey> {
        self.selected.as_ref()
    }

    /// Feature shown in the info overlay: hovered, else selected.
    #[must_use]
    pub fn displayed(&self) -> Option<&BoundaryKey> {
        self.hovered.as_ref().or(self.selected.as_ref())
    }

    /// Level the machine would pick at `zoom`, before availability
    /// clamping.
    #[must_use]
    pub fn desired(&self, zoom: u8) -> BoundaryLevel {
        let ZoomThresholds {
            medium,
            fine,
            exit_medium,
        } = self.thresholds;

        if zoom >= fine {
            BoundaryLevel::LocalUnit
        } else if self.force_medium || zoom >= medium {
            BoundaryLevel::SubDistrict
        } else if exit_medium
            .is_some_and(|exit| self.level != BoundaryLevel::District && zoom >= exit)
        {
            BoundaryLevel::SubDistrict
        } else {
            BoundaryLevel::District
        }
    }

    /// Re-evaluates the level for a zoom or pan event.
    pub fn on_zoom(&mut self, zoom: u8) -> Option<LevelChange> {
        let target = self.clamp(self.desired(zoom));
        self.transition(target)
    }

    /// Turns the medium override on or off and re-evaluates at `zoom`.
    pub fn set_force_medium(&mut self, force: bool, zoom: u8) -> Option<LevelChange> {
        self.force_medium = force;
        self.on_zoom(zoom)
    }

    /// Sets or clears the hovered feature. Returns whether it changed.
    pub fn hover(&mut self, key: Option<BoundaryKey>) -> bool {
        if self.hovered == key {
            return false;
        }
        self.hovered = key;
        true
    }

    /// Sets or clears the selected feature. Returns whether it changed.
    pub fn select(&mut self, key: Option<BoundaryKey>) -> bool {
        if self.selected == key {
            return false;
        }
        self.selected = key;
        true
    }

    /// Selects `key` and switches to its level without clearing anything.
    /// Used when a boundary is picked from the filter controls.
    pub fn focus(&mut self, key: BoundaryKey) -> Option<LevelChange> {
        let from = self.level;
        self.level = key.level;
        self.selected = Some(key);
        (from != self.level).then_some(LevelChange {
            from,
            to: self.level,
        })
    }

    /// Clears the selection and returns to the coarse level.
    pub fn unfocus(&mut self) -> Option<LevelChange> {
        let from = self.level;
        self.selected = None;
        self.level = BoundaryLevel::District;
        (from != self.level).then_some(LevelChange {
            from,
            to: self.level,
        })
    }

    fn clamp(&self, desired: BoundaryLevel) -> BoundaryLevel {
        let mut level = desired;
        while !self.loaded.contains(&level) {
            match level.coarser() {
                Some(coarser) => level = coarser,
                None => break,
            }
        }
        level
    }

    fn transition(&mut self, target: BoundaryLevel) -> Option<LevelChange> {
        if target == self.level {
            return None;
        }

        let change = LevelChange {
            from: self.level,
            to: target,
        };
        log::debug!("Boundary level {} -> {}", change.from, change.to);
        self.level = target;
        self.hovered = None;
        self.selected = None;
        Some(change)
    }
}
