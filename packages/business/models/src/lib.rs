#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Business record types and the map-type / area-unit taxonomy.
//!
//! A [`BusinessRecord`] is one geolocated business as loaded from the
//! businesses feature collection. Records are immutable once loaded and
//! shared read-only by every other component of the map engine.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Zoom level used for the "locate externally" deep link.
pub const EXTERNAL_LINK_ZOOM: u8 = 16;

/// Which survey map a business record was captured on.
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
pub enum MapType {
    /// Pre-listing map. The only map type whose records carry a
    /// meaningful data-source tag.
    Prelist,
    /// Final listing map.
    Listing,
}

impl MapType {
    /// Whether records of this map type can be narrowed by data source.
    #[must_use]
    pub const fn has_data_source(self) -> bool {
        matches!(self, Self::Prelist)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Prelist, Self::Listing]
    }
}

/// Which smallest-area identifier the area filter compares against.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
pub enum AreaUnitKind {
    /// Smallest local administrative unit (SLS).
    #[default]
    #[strum(to_string = "local_unit", serialize = "sls")]
    #[serde(alias = "sls")]
    LocalUnit,
    /// Census block.
    #[strum(to_string = "census_block", serialize = "blok_sensus")]
    #[serde(alias = "blok_sensus")]
    CensusBlock,
}

impl AreaUnitKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::LocalUnit, Self::CensusBlock]
    }
}

/// A single geolocated business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRecord {
    /// Unique record ID.
    pub id: String,
    /// Business name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Survey map the record was captured on.
    pub map_type: MapType,
    /// Business category name (KBLI category).
    pub category: String,
    /// Business category code (KBLI code).
    pub category_code: String,
    /// Regency / city.
    pub region: String,
    /// District (coarse boundary level).
    pub district: String,
    /// Sub-district / village (medium boundary level).
    pub sub_district: String,
    /// Smallest local unit ID (fine boundary level).
    pub local_unit: String,
    /// Census block ID.
    pub census_block: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Where the record came from.
    pub data_source: String,
    /// Contact phone number.
    pub phone: Option<String>,
}

impl BusinessRecord {
    /// Returns the area identifier selected by `kind`.
    #[must_use]
    pub fn area_unit(&self, kind: AreaUnitKind) -> &str {
        match kind {
            AreaUnitKind::LocalUnit => &self.local_unit,
            AreaUnitKind::CensusBlock => &self.census_block,
        }
    }

    /// Deep link that opens this record's location in Google Maps,
    /// labelled with the business name.
    #[must_use]
    pub fn external_map_url(&self) -> String {
        format!(
            "https://www.google.com/maps?q={},{}&z={EXTERNAL_LINK_ZOOM}&t=m&hl=id&label={}",
            self.latitude,
            self.longitude,
            encode_uri_component(&self.name),
        )
    }
}

/// Percent-encodes everything except the RFC 3986 unreserved set and the
/// sub-delimiters `!*'()`.
fn encode_uri_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(char::from(byte)),
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> BusinessRecord {
        BusinessRecord {
            id: "b-1".to_string(),
            name: name.to_string(),
            address: "Jl. Gatot Subroto 1".to_string(),
            map_type: MapType::Prelist,
            category: "Perdagangan".to_string(),
            category_code: "47111".to_string(),
            region: "Kota Medan".to_string(),
            district: "Medan Baru".to_string(),
            sub_district: "Darat".to_string(),
            local_unit: "001B".to_string(),
            census_block: "010A".to_string(),
            latitude: 3.5823,
            longitude: 98.6612,
            data_source: "Survei".to_string(),
            phone: None,
        }
    }

    #[test]
    fn map_type_wire_names() {
        assert_eq!(MapType::Prelist.to_string(), "prelist");
        assert_eq!("listing".parse::<MapType>().unwrap(), MapType::Listing);
        assert!("other".parse::<MapType>().is_err());
    }

    #[test]
    fn only_prelist_has_data_source() {
        for map_type in MapType::all() {
            assert_eq!(
                map_type.has_data_source(),
                *map_type == MapType::Prelist,
                "{map_type:?}"
            );
        }
    }

    #[test]
    fn area_unit_kind_accepts_legacy_names() {
        assert_eq!(
            "sls".parse::<AreaUnitKind>().unwrap(),
            AreaUnitKind::LocalUnit
        );
        assert_eq!(
            "blok_sensus".parse::<AreaUnitKind>().unwrap(),
            AreaUnitKind::CensusBlock
        );
        assert_eq!(AreaUnitKind::CensusBlock.to_string(), "census_block");
    }

    #[test]
    fn area_unit_selects_field() {
        let r = record("Toko A");
        assert_eq!(r.area_unit(AreaUnitKind::LocalUnit), "001B");
        assert_eq!(r.area_unit(AreaUnitKind::CensusBlock), "010A");
    }

    #[test]
    fn external_map_url_encodes_name() {
        let r = record("Toko Kue & Roti");
        assert_eq!(
            r.external_map_url(),
            "https://www.google.com/maps?q=3.5823,98.6612&z=16&t=m&hl=id&label=Toko%20Kue%20%26%20Roti"
        );
    }
}
