#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared pieces of the `business_map` binary: filter arguments, the
//! simulated viewport and table formatting.

use business_map_business_models::BusinessRecord;
use business_map_filter_models::{FilterError, FilterField, SortKey};
use business_map_session::{MapSession, UserAction};
use business_map_viewport_models::{BoundingBox, LatLng};
use clap::Args;
use thiserror::Error;

/// Width and height in pixels of the simulated map widget.
const VIEWPORT_PX: (f64, f64) = (1024.0, 768.0);

/// Web map tile size in pixels.
const TILE_PX: f64 = 256.0;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Session configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] business_map_session::ConfigError),

    /// A filter argument was rejected.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Export failed.
    #[error(transparent)]
    Export(#[from] business_map_export::ExportError),

    /// No record with the given ID.
    #[error("No business record with id {0:?}")]
    UnknownRecord(String),

    /// No business data could be loaded.
    #[error("No business records loaded; check the datasets configuration")]
    NoData,
}

/// Filter, search and sort arguments shared by `list`, `options` and
/// `export`.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Map type (`prelist` or `listing`)
    #[arg(long)]
    pub map_type: Option<String>,
    /// Category name
    #[arg(long)]
    pub category: Option<String>,
    /// Data source (prelist only)
    #[arg(long)]
    pub data_source: Option<String>,
    /// District name
    #[arg(long)]
    pub district: Option<String>,
    /// Sub-district name
    #[arg(long)]
    pub sub_district: Option<String>,
    /// Area unit kind (`local_unit` or `census_block`)
    #[arg(long)]
    pub area_kind: Option<String>,
    /// Local unit or census block value
    #[arg(long)]
    pub area_value: Option<String>,
    /// Case-insensitive search text
    #[arg(long)]
    pub search: Option<String>,
    /// Sort column
    #[arg(long)]
    pub sort: Option<SortKey>,
    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

impl FilterArgs {
    /// Field/value pairs in cascade order. Setting them in this order
    /// never trips a downstream reset.
    #[must_use]
    pub fn selections(&self) -> Vec<(FilterField, &str)> {
        [
            (FilterField::MapType, &self.map_type),
            (FilterField::Category, &self.category),
            (FilterField::DataSource, &self.data_source),
            (FilterField::District, &self.district),
            (FilterField::SubDistrict, &self.sub_district),
            (FilterField::AreaUnitKind, &self.area_kind),
            (FilterField::AreaUnitValue, &self.area_value),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }

    /// Applies the arguments to `session` as user actions.
    ///
    /// Each selection is validated against the session's current filters
    /// before it is dispatched.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Filter`] for a disabled field or invalid value.
    pub fn apply(&self, session: &mut MapSession) -> Result<(), CliError> {
        for (field, value) in self.selections() {
            business_map_filter::apply(session.filters(), field, value)?;
            session.dispatch(UserAction::SetFilter {
                field,
                value: value.to_string(),
            });
        }

        if let Some(search) = &self.search {
            session.dispatch(UserAction::SetSearch(search.clone()));
        }

        if let Some(key) = self.sort {
            session.dispatch(UserAction::SortBy(key));
            if self.desc {
                session.dispatch(UserAction::SortBy(key));
            }
        }

        Ok(())
    }
}

/// Approximate visible rectangle of the simulated map widget centered on
/// `center` at `zoom`. Latitude distortion is ignored.
#[must_use]
pub fn simulated_bounds(center: LatLng, zoom: u8) -> BoundingBox {
    let degrees_per_px = 360.0 / (TILE_PX * 2_f64.powi(i32::from(zoom)));
    let half_width = VIEWPORT_PX.0 * degrees_per_px / 2.0;
    let half_height = VIEWPORT_PX.1 * degrees_per_px / 2.0;

    BoundingBox::new(
        center.lng - half_width,
        center.lat - half_height,
        center.lng + half_width,
        center.lat + half_height,
    )
}

/// Shortens `text` to at most `width` characters, marking the cut with
/// `...`.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Header and rows of the `list` table.
#[must_use]
pub fn format_table(records: &[&BusinessRecord]) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<8} {:<32} {:<8} {:<24} {:<20} {}",
        "ID", "NAME", "MAP", "CATEGORY", "DISTRICT", "SUB-DISTRICT"
    )];
    lines.push("-".repeat(110));
    lines.extend(records.iter().map(|r| {
        format!(
            "{:<8} {:<32} {:<8} {:<24} {:<20} {}",
            truncate(&r.id, 8),
            truncate(&r.name, 32),
            r.map_type.to_string(),
            truncate(&r.category, 24),
            truncate(&r.district, 20),
            r.sub_district
        )
    }));
    lines
}

#[cfg(test)]
mod tests {
    use business_map_business_models::MapType;

    use super::*;

    #[test]
    fn selections_follow_cascade_order() {
        let args = FilterArgs {
            area_value: Some("003".to_string()),
            map_type: Some("prelist".to_string()),
            district: Some("Medan Baru".to_string()),
            ..FilterArgs::default()
        };
        let fields: Vec<FilterField> = args.selections().iter().map(|(f, _)| *f).collect();
        assert_eq!(
            fields,
            vec![
                FilterField::MapType,
                FilterField::District,
                FilterField::AreaUnitValue
            ]
        );
    }

    #[test]
    fn bounds_halve_per_zoom_level() {
        let center = LatLng::new(3.5952, 98.6722);
        let wide = simulated_bounds(center, 12);
        let narrow = simulated_bounds(center, 13);

        let width = |b: BoundingBox| b.east - b.west;
        assert!((width(wide) - 2.0 * width(narrow)).abs() < 1e-9);
        assert!((width(wide) - 0.3515625).abs() < 1e-9);
        assert!(wide.contains(&narrow));

        let c = narrow.center();
        assert!((c.lat - center.lat).abs() < 1e-9);
        assert!((c.lng - center.lng).abs() < 1e-9);
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("Warung", 10), "Warung");
        assert_eq!(truncate("Rumah Makan Padang Sederhana", 12), "Rumah Mak...");
        assert_eq!(truncate("Kafé Ümit Ökçe", 8), "Kafé ...");
    }

    #[test]
    fn table_has_header_and_one_line_per_record() {
        let record = BusinessRecord {
            id: "7".to_string(),
            name: "Toko Ani".to_string(),
            address: String::new(),
            map_type: MapType::Listing,
            category: "Perdagangan".to_string(),
            category_code: String::new(),
            region: String::new(),
            district: "Medan Kota".to_string(),
            sub_district: "Teladan".to_string(),
            local_unit: String::new(),
            census_block: String::new(),
            latitude: 3.57,
            longitude: 98.67,
            data_source: String::new(),
            phone: None,
        };
        let lines = format_table(&[&record]);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[2].starts_with("7 "), "{}", lines[2]);
        assert!(lines[2].contains("listing"));
        assert!(lines[2].ends_with("Teladan"));
    }
}
