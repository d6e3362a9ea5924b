//! Normalizes raw `GeoJSON` features into [`BoundaryFeature`] values.
//!
//! The three source collections name their attributes differently: the
//! district file carries `nmkec`, the village file `nmdesa`, and local
//! unit files use any of several keys for the unit name. This module hides
//! those differences behind one shape.

use business_map_boundary_models::{BoundaryFeature, BoundaryLevel, BoundaryParents};

/// Property keys that may carry a local unit's display name, in priority
/// order.
const LOCAL_UNIT_NAME_KEYS: &[&str] = &["nmsls", "nm_sls", "sls", "nama", "name", "blok_sensus"];

/// Property keys that may carry the village name on a local unit feature.
const VILLAGE_NAME_KEYS: &[&str] = &[
    "nmdesa",
    "nama_kelurahan",
    "kelurahan",
    "nmkel",
    "nama_kel",
    "keldesa",
];

/// Normalizes every feature of a collection for the given level.
///
/// Features without an identifier are given their position as ID so that
/// hover/selection bookkeeping still works.
#[must_use]
pub fn normalize_features(
    features: &[serde_json::Value],
    level: BoundaryLevel,
) -> Vec<BoundaryFeature> {
    features
        .iter()
        .enumerate()
        .map(|(position, feature)| normalize_feature(feature, level, position))
        .collect()
}

/// Normalizes a single `GeoJSON` feature.
fn normalize_feature(
    feature: &serde_json::Value,
    level: BoundaryLevel,
    position: usize,
) -> BoundaryFeature {
    let properties = feature
        .get("properties")
        .and_then(serde_json::Value::as_object)
        .cloned()
        .unwrap_or_default();

    let id = feature_id(feature, &properties).unwrap_or_else(|| position.to_string());

    let district = text(&properties, "nmkec");
    let village = first_text(&properties, VILLAGE_NAME_KEYS);

    let name = match level {
        BoundaryLevel::District => district.clone(),
        BoundaryLevel::SubDistrict => village.clone(),
        BoundaryLevel::LocalUnit => first_text(&properties, LOCAL_UNIT_NAME_KEYS),
    };

    let parents = BoundaryParents {
        province: text(&properties, "nmprov"),
        region: text(&properties, "nmkab"),
        district,
        sub_district: village,
    };

    let geometry = feature.get("geometry").filter(|g| !g.is_null()).cloned();

    BoundaryFeature {
        id,
        level,
        name,
        parents,
        geometry,
        properties,
    }
}

/// `gid` property first, then the top-level feature `id`.
fn feature_id(
    feature: &serde_json::Value,
    properties: &serde_json::Map<String, serde_json::Value>,
) -> Option<String> {
    properties
        .get("gid")
        .or_else(|| feature.get("id"))
        .and_then(scalar_to_string)
}

fn text(properties: &serde_json::Map<String, serde_json::Value>, key: &str) -> Option<String> {
    properties.get(key).and_then(scalar_to_string)
}

fn first_text(
    properties: &serde_json::Map<String, serde_json::Value>,
    keys: &[&str],
) -> Option<String> {
    keys.iter().find_map(|key| text(properties, key))
}

/// Renders a string or number property as trimmed text; empty strings,
/// `null`, and compound values yield `None`.
fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn district_feature() {
        let raw = serde_json::json!({
            "type": "Feature",
            "properties": { "gid": 7, "nmkec": "Medan Baru", "nmkab": "Kota Medan", "nmprov": "Sumatera Utara" },
            "geometry": { "type": "Polygon", "coordinates": [] }
        });
        let feature = normalize_feature(&raw, BoundaryLevel::District, 0);
        assert_eq!(feature.id, "7");
        assert_eq!(feature.name.as_deref(), Some("Medan Baru"));
        assert_eq!(feature.parents.region.as_deref(), Some("Kota Medan"));
        assert_eq!(feature.parents.province.as_deref(), Some("Sumatera Utara"));
        assert!(feature.geometry.is_some());
    }

    #[test]
    fn local_unit_name_falls_back_through_keys() {
        let raw = serde_json::json!({
            "type": "Feature",
            "properties": { "gid": "s-1", "nm_sls": "  ", "nama": "RT 01", "kelurahan": "Darat", "nmkec": "Medan Baru" },
            "geometry": null
        });
        let feature = normalize_feature(&raw, BoundaryLevel::LocalUnit, 3);
        assert_eq!(feature.name.as_deref(), Some("RT 01"));
        assert_eq!(feature.parents.sub_district.as_deref(), Some("Darat"));
        assert_eq!(feature.parents.district.as_deref(), Some("Medan Baru"));
        assert!(feature.geometry.is_none());
    }

    #[test]
    fn missing_id_uses_position() {
        let features = vec![
            serde_json::json!({ "type": "Feature", "properties": {}, "geometry": null }),
            serde_json::json!({ "type": "Feature", "id": 42, "geometry": null }),
        ];
        let normalized = normalize_features(&features, BoundaryLevel::SubDistrict);
        assert_eq!(normalized[0].id, "0");
        assert_eq!(normalized[1].id, "42");
        assert!(normalized[1].properties.is_empty());
    }
}
