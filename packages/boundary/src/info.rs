//! Labels for the boundary info overlay.

use business_map_boundary_models::{BoundaryFeature, BoundaryLevel};
use serde_json::Value;

/// Placeholder village name some source files use for features that have
/// no real village. Treated as absent.
const PLACEHOLDER_VILLAGE: &str = "Desa.Medan";

/// Title, type label and breadcrumb line for one boundary feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryInfo {
    /// Main title.
    pub title: String,
    /// Kind of area, e.g. `Kecamatan`.
    pub type_label: &'static str,
    /// Breadcrumb of enclosing areas, `" • "`-separated. May be empty.
    pub extra: String,
}

impl BoundaryInfo {
    /// Builds the overlay labels for `feature` as displayed at `level`.
    #[must_use]
    pub fn for_feature(feature: &BoundaryFeature, level: BoundaryLevel) -> Self {
        let parents = &feature.parents;
        let gid = feature
            .properties
            .get("gid")
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_default();

        match level {
            BoundaryLevel::District => {
                let title = feature
                    .name
                    .clone()
                    .or_else(|| parents.region.clone())
                    .or_else(|| parents.province.clone())
                    .unwrap_or_else(|| format!("Kecamatan {gid}"));
                Self {
                    title,
                    type_label: level.label(),
                    extra: String::new(),
                }
            }
            BoundaryLevel::SubDistrict => {
                let title = feature
                    .name
                    .clone()
                    .filter(|n| n != PLACEHOLDER_VILLAGE)
                    .or_else(|| parents.district.clone())
                    .or_else(|| parents.region.clone())
                    .unwrap_or_else(|| format!("Desa {gid}"));
                let extra = parents
                    .district
                    .as_ref()
                    .map(|d| format!("Kec: {d}"))
                    .unwrap_or_default();
                Self {
                    title,
                    type_label: level.label(),
                    extra,
                }
            }
            BoundaryLevel::LocalUnit => {
                let title = feature
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("SLS {gid}"));
                let mut parts = Vec::new();
                if let Some(village) = &parents.sub_district {
                    parts.push(format!("Desa: {village}"));
                }
                if let Some(district) = &parents.district {
                    parts.push(format!("Kec: {district}"));
                }
                Self {
                    title,
                    type_label: level.label(),
                    extra: parts.join(" • "),
                }
            }
        }
    }
}
