#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Administrative boundary levels and feature types.
//!
//! Boundaries come in three nested resolutions. Each level is loaded as an
//! independent collection; there are no parent/child pointers between
//! levels. Containment is only ever established by bounding-box tests or
//! by matching the administrative names a business record carries.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Boundary resolution, from coarsest to finest.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BoundaryLevel {
    /// Coarse level: districts (kecamatan).
    District,
    /// Medium level: sub-districts / villages (kelurahan/desa).
    SubDistrict,
    /// Fine level: smallest local units (SLS).
    LocalUnit,
}

impl BoundaryLevel {
    /// Label shown in the boundary info overlay.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::District => "Kecamatan",
            Self::SubDistrict => "Desa",
            Self::LocalUnit => "SLS",
        }
    }

    /// Whether this level has too many features to render in full and must
    /// be culled to the viewport.
    #[must_use]
    pub const fn is_culled(self) -> bool {
        !matches!(self, Self::District)
    }

    /// The next coarser level, or `None` for [`Self::District`].
    #[must_use]
    pub const fn coarser(self) -> Option<Self> {
        match self {
            Self::District => None,
            Self::SubDistrict => Some(Self::District),
            Self::LocalUnit => Some(Self::SubDistrict),
        }
    }

    /// Returns all variants of this enum, coarsest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::District, Self::SubDistrict, Self::LocalUnit]
    }
}

/// Administrative names of the areas enclosing a boundary feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryParents {
    /// Province name.
    pub province: Option<String>,
    /// Regency / city name.
    pub region: Option<String>,
    /// District name.
    pub district: Option<String>,
    /// Sub-district / village name.
    pub sub_district: Option<String>,
}

/// One administrative polygon at a single [`BoundaryLevel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryFeature {
    /// Stable identifier within the level's collection.
    pub id: String,
    /// Level this feature belongs to.
    pub level: BoundaryLevel,
    /// Display name, if the source carries one.
    pub name: Option<String>,
    /// Enclosing administrative names, for breadcrumbs.
    pub parents: BoundaryParents,
    /// Raw `GeoJSON` geometry object. Parsed lazily so that one malformed
    /// polygon never prevents the rest of the collection from loading.
    pub geometry: Option<serde_json::Value>,
    /// Remaining source properties, untouched.
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl BoundaryFeature {
    /// Reference to this feature for hover/selection bookkeeping.
    #[must_use]
    pub fn key(&self) -> BoundaryKey {
        BoundaryKey {
            level: self.level,
            id: self.id.clone(),
        }
    }
}

/// Identifies a boundary feature across levels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundaryKey {
    /// Level of the referenced feature.
    pub level: BoundaryLevel,
    /// Feature ID within that level.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_coarse_to_fine() {
        let levels = BoundaryLevel::all();
        for pair in levels.windows(2) {
            assert!(pair[0] < pair[1], "{:?} should be coarser", pair[0]);
            assert_eq!(pair[1].coarser(), Some(pair[0]));
        }
        assert_eq!(BoundaryLevel::District.coarser(), None);
    }

    #[test]
    fn only_district_level_is_unculled() {
        assert!(!BoundaryLevel::District.is_culled());
        assert!(BoundaryLevel::SubDistrict.is_culled());
        assert!(BoundaryLevel::LocalUnit.is_culled());
    }

    #[test]
    fn level_wire_names() {
        assert_eq!(BoundaryLevel::SubDistrict.to_string(), "sub_district");
        assert_eq!(
            "local_unit".parse::<BoundaryLevel>().unwrap(),
            BoundaryLevel::LocalUnit
        );
    }
}
