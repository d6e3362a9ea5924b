//! Converts business point features into [`BusinessRecord`]s.

use business_map_business_models::{BusinessRecord, MapType};
use serde_json::{Map, Value};

use crate::LoadError;

/// Parses every feature, skipping (and logging) the ones that cannot be
/// turned into a record.
#[must_use]
pub fn parse_records(features: &[Value]) -> Vec<BusinessRecord> {
    let mut skipped = 0_usize;
    let records: Vec<BusinessRecord> = features
        .iter()
        .enumerate()
        .filter_map(|(position, feature)| match parse_record(feature, position) {
            Ok(record) => Some(record),
            Err(e) => {
                log::debug!("Skipping business feature {position}: {e}");
                skipped += 1;
                None
            }
        })
        .collect();

    if skipped > 0 {
        log::warn!("Skipped {skipped} malformed business features");
    }
    records
}

/// Parses one business feature.
///
/// Code-like properties may be strings or numbers. A feature without an
/// `id` gets its 1-based position.
///
/// # Errors
///
/// Returns [`LoadError::Conversion`] if the feature has no point
/// coordinates or an unknown map type.
pub fn parse_record(feature: &Value, position: usize) -> Result<BusinessRecord, LoadError> {
    let empty = Map::new();
    let props = feature
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let (longitude, latitude) = point(feature).ok_or_else(|| LoadError::Conversion {
        message: "missing or invalid point geometry".to_string(),
    })?;

    let raw_map_type = text(props, "jenis_peta");
    let map_type: MapType = raw_map_type
        .trim()
        .to_lowercase()
        .parse()
        .map_err(|_| LoadError::Conversion {
            message: format!("unknown map type {raw_map_type:?}"),
        })?;

    let id = Some(text(props, "id"))
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| (position + 1).to_string());

    Ok(BusinessRecord {
        id,
        name: text(props, "nama_usaha"),
        address: text(props, "alamat"),
        map_type,
        category: text(props, "kbli_kategori"),
        category_code: text(props, "kbli_kode"),
        region: text(props, "kabupaten_kota"),
        district: text(props, "kecamatan"),
        sub_district: text(props, "kelurahan_desa"),
        local_unit: text(props, "sls"),
        census_block: text(props, "blok_sensus"),
        latitude,
        longitude,
        data_source: text(props, "sumber_data"),
        phone: Some(text(props, "telepon")).filter(|phone| !phone.is_empty()),
    })
}

/// `[lng, lat]` of a `Point` geometry.
fn point(feature: &Value) -> Option<(f64, f64)> {
    let geometry = feature.get("geometry")?;
    if geometry.get("type").and_then(Value::as_str) != Some("Point") {
        return None;
    }
    let coords = geometry.get("coordinates")?.as_array()?;
    let lng = coords.first()?.as_f64()?;
    let lat = coords.get(1)?.as_f64()?;
    (lng.is_finite() && lat.is_finite()).then_some((lng, lat))
}

/// A property as trimmed text. Numbers are formatted, anything else is
/// empty.
fn text(props: &Map<String, Value>, key: &str) -> String {
    match props.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
