//! Geometry parsing and envelope computation.

use business_map_viewport_models::BoundingBox;
use geo::{BoundingRect, MultiPolygon};

/// Parses a raw `GeoJSON` geometry object into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
#[must_use]
pub fn parse_multipolygon(raw: &serde_json::Value) -> Option<MultiPolygon<f64>> {
    let geom: geojson::Geometry = serde_json::from_value(raw.clone()).ok()?;
    let geo_geom: geo::Geometry<f64> = geom.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

/// Bounding box of a [`MultiPolygon`], or `None` if it has no coordinates
/// or any corner is not finite.
#[must_use]
pub fn envelope(mp: &MultiPolygon<f64>) -> Option<BoundingBox> {
    let rect = mp.bounding_rect()?;
    let bbox = BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y);
    [bbox.west, bbox.south, bbox.east, bbox.north]
        .iter()
        .all(|v| v.is_finite())
        .then_some(bbox)
}

/// Parses `raw` and returns its envelope in one step.
#[must_use]
pub fn raw_envelope(raw: &serde_json::Value) -> Option<BoundingBox> {
    envelope(&parse_multipolygon(raw)?)
}
