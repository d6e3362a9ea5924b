#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter field, value, state and sort order types.
//!
//! The seven filter fields form a dependency chain. In cascade order:
//!
//! ```text
//! map_type → category → data_source → district → sub_district → area_unit_value
//! ```
//!
//! `area_unit_kind` sits beside the chain: it never becomes a wildcard and
//! only decides which record attribute `area_unit_value` is compared with.

use business_map_business_models::{AreaUnitKind, MapType};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// The textual wildcard accepted wherever a filter value is parsed.
pub const WILDCARD: &str = "all";

/// One of the seven filter controls.
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
pub enum FilterField {
    /// Survey map type. Root of the chain.
    MapType,
    /// Business category.
    Category,
    /// Data source. Only selectable for the prelist map type.
    DataSource,
    /// District.
    District,
    /// Sub-district / village.
    SubDistrict,
    /// Which area identifier the area filter uses.
    AreaUnitKind,
    /// Local unit or census block value.
    AreaUnitValue,
}

impl FilterField {
    /// Position in the cascade chain. `None` for
    /// [`FilterField::AreaUnitKind`], which is outside the chain.
    #[must_use]
    pub const fn rank(self) -> Option<u8> {
        match self {
            Self::MapType => Some(0),
            Self::Category => Some(1),
            Self::DataSource => Some(2),
            Self::District => Some(3),
            Self::SubDistrict => Some(4),
            Self::AreaUnitValue => Some(5),
            Self::AreaUnitKind => None,
        }
    }

    /// Whether `self` comes strictly after `other` in the cascade chain.
    #[must_use]
    pub fn is_downstream_of(self, other: Self) -> bool {
        match (self.rank(), other.rank()) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        }
    }

    /// The field whose selection enables this one, if any.
    #[must_use]
    pub const fn enabling_parent(self) -> Option<Self> {
        match self {
            Self::MapType | Self::AreaUnitKind => None,
            Self::Category | Self::DataSource => Some(Self::MapType),
            Self::District => Some(Self::Category),
            Self::SubDistrict => Some(Self::District),
            Self::AreaUnitValue => Some(Self::SubDistrict),
        }
    }

    /// Returns all variants of this enum, in cascade order with
    /// [`FilterField::AreaUnitKind`] just before the value it qualifies.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::MapType,
            Self::Category,
            Self::DataSource,
            Self::District,
            Self::SubDistrict,
            Self::AreaUnitKind,
            Self::AreaUnitValue,
        ]
    }

    /// The six chain fields in cascade order.
    #[must_use]
    pub const fn chain() -> &'static [Self] {
        &[
            Self::MapType,
            Self::Category,
            Self::DataSource,
            Self::District,
            Self::SubDistrict,
            Self::AreaUnitValue,
        ]
    }
}

/// A filter value: the wildcard or one concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue<T = String> {
    /// No constraint.
    All,
    /// Exactly this value.
    Only(T),
}

impl<T> Default for FilterValue<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T> FilterValue<T> {
    /// Whether this is the wildcard.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// The concrete value, if any.
    #[must_use]
    pub const fn as_only(&self) -> Option<&T> {
        match self {
            Self::All => None,
            Self::Only(v) => Some(v),
        }
    }
}

impl<T: PartialEq> FilterValue<T> {
    /// Whether `candidate` satisfies this value.
    #[must_use]
    pub fn accepts(&self, candidate: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(v) => v == candidate,
        }
    }
}

impl FilterValue<String> {
    /// Parses control text: [`WILDCARD`] is the wildcard, anything else a
    /// concrete value.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if text == WILDCARD {
            Self::All
        } else {
            Self::Only(text.to_string())
        }
    }

    /// Whether `candidate` satisfies this value.
    #[must_use]
    pub fn accepts_str(&self, candidate: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(v) => v == candidate,
        }
    }
}

impl From<&str> for FilterValue<String> {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

/// The complete filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Map type.
    pub map_type: FilterValue<MapType>,
    /// Category name.
    pub category: FilterValue,
    /// Data source.
    pub data_source: FilterValue,
    /// District name.
    pub district: FilterValue,
    /// Sub-district name.
    pub sub_district: FilterValue,
    /// Which area identifier `area_unit_value` refers to.
    pub area_unit_kind: AreaUnitKind,
    /// Local unit or census block value.
    pub area_unit_value: FilterValue,
}

impl FilterState {
    /// Whether `field` currently holds the wildcard. Always `false` for
    /// [`FilterField::AreaUnitKind`].
    #[must_use]
    pub const fn is_wildcard(&self, field: FilterField) -> bool {
        match field {
            FilterField::MapType => self.map_type.is_all(),
            FilterField::Category => self.category.is_all(),
            FilterField::DataSource => self.data_source.is_all(),
            FilterField::District => self.district.is_all(),
            FilterField::SubDistrict => self.sub_district.is_all(),
            FilterField::AreaUnitKind => false,
            FilterField::AreaUnitValue => self.area_unit_value.is_all(),
        }
    }

    /// Control text for `field`: [`WILDCARD`] or the concrete value.
    #[must_use]
    pub fn display_value(&self, field: FilterField) -> String {
        fn text(value: &FilterValue) -> String {
            value.as_only().map_or_else(|| WILDCARD.to_string(), Clone::clone)
        }

        match field {
            FilterField::MapType => self
                .map_type
                .as_only()
                .map_or_else(|| WILDCARD.to_string(), ToString::to_string),
            FilterField::Category => text(&self.category),
            FilterField::DataSource => text(&self.data_source),
            FilterField::District => text(&self.district),
            FilterField::SubDistrict => text(&self.sub_district),
            FilterField::AreaUnitKind => self.area_unit_kind.to_string(),
            FilterField::AreaUnitValue => text(&self.area_unit_value),
        }
    }
}

/// Column a record list can be sorted by.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortKey {
    /// Business name.
    #[default]
    Name,
    /// Map type.
    MapType,
    /// Category name.
    Category,
    /// District name.
    District,
}

/// Sort direction.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortDirection {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// A sort key plus direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortOrder {
    /// Column.
    pub key: SortKey,
    /// Direction.
    pub direction: SortDirection,
}

impl SortOrder {
    /// Result of clicking the `key` column header: the same column flips
    /// direction, a different column starts ascending.
    #[must_use]
    pub fn toggled(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                direction: match self.direction {
                    SortDirection::Asc => SortDirection::Desc,
                    SortDirection::Desc => SortDirection::Asc,
                },
            }
        } else {
            Self {
                key,
                direction: SortDirection::Asc,
            }
        }
    }
}

/// Free-text search plus optional sort, applied together with the filter
/// state when listing records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordQuery {
    /// Case-insensitive search text. Blank means no search.
    pub search: String,
    /// Sort order. `None` keeps load order.
    pub sort: Option<SortOrder>,
}

/// Errors raised by invalid filter operations.
///
/// All of these indicate a caller bug: the presentation layer should never
/// offer an unknown field or let a disabled control change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Field name did not parse.
    #[error("Unknown filter field: {0}")]
    UnknownField(String),

    /// Field is disabled in the current state.
    #[error("Filter field {field} is disabled")]
    Disabled {
        /// The disabled field.
        field: FilterField,
    },

    /// Value is not valid for the field.
    #[error("Invalid value {value:?} for filter field {field}")]
    InvalidValue {
        /// The field being set.
        field: FilterField,
        /// The rejected value.
        value: String,
    },
}
