//! City outline built from the district collection.

use business_map_boundary_models::BoundaryFeature;
use geo::MultiPolygon;

use crate::geometry::parse_multipolygon;

/// Merges every parseable polygon of `districts` into one
/// [`MultiPolygon`]. No dissolving is done; shared edges stay.
///
/// Returns `None` when no district has usable geometry.
#[must_use]
pub fn city_outline(districts: &[BoundaryFeature]) -> Option<MultiPolygon<f64>> {
    let polygons: Vec<_> = districts
        .iter()
        .filter_map(|f| f.geometry.as_ref().and_then(parse_multipolygon))
        .flat_map(|mp| mp.0)
        .collect();

    if polygons.is_empty() {
        None
    } else {
        Some(MultiPolygon(polygons))
    }
}

/// The outline as a `GeoJSON` geometry object.
#[must_use]
pub fn city_outline_geojson(districts: &[BoundaryFeature]) -> Option<serde_json::Value> {
    let outline = city_outline(districts)?;
    let geometry = geojson::Geometry::new(geojson::Value::from(&outline));
    serde_json::to_value(geometry).ok()
}
