//! Option lists for the filter controls.

use std::collections::BTreeSet;

use business_map_business_models::{AreaUnitKind, BusinessRecord};
use business_map_filter_models::{FilterField, FilterState};

/// Sorted distinct non-empty values offered for `field`.
///
/// Only records satisfying every non-wildcard chain field strictly
/// upstream of `field` contribute. For [`FilterField::AreaUnitValue`] the
/// attribute is the one selected by the state's area unit kind; for
/// [`FilterField::AreaUnitKind`] the kind names are returned unchanged.
#[must_use]
pub fn options(
    records: &[BusinessRecord],
    state: &FilterState,
    field: FilterField,
) -> Vec<String> {
    if field == FilterField::AreaUnitKind {
        return AreaUnitKind::all().iter().map(ToString::to_string).collect();
    }

    let upstream: Vec<FilterField> = FilterField::chain()
        .iter()
        .copied()
        .filter(|f| field.is_downstream_of(*f) && !state.is_wildcard(*f))
        .collect();

    records
        .iter()
        .filter(|r| upstream.iter().all(|f| accepts(r, state, *f)))
        .map(|r| attribute(r, state, field))
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn attribute(record: &BusinessRecord, state: &FilterState, field: FilterField) -> String {
    match field {
        FilterField::MapType => record.map_type.to_string(),
        FilterField::Category => record.category.clone(),
        FilterField::DataSource => record.data_source.clone(),
        FilterField::District => record.district.clone(),
        FilterField::SubDistrict => record.sub_district.clone(),
        FilterField::AreaUnitKind => state.area_unit_kind.to_string(),
        FilterField::AreaUnitValue => record.area_unit(state.area_unit_kind).to_string(),
    }
}

fn accepts(record: &BusinessRecord, state: &FilterState, field: FilterField) -> bool {
    match field {
        FilterField::MapType => state.map_type.accepts(&record.map_type),
        FilterField::Category => state.category.accepts_str(&record.category),
        FilterField::DataSource => state.data_source.accepts_str(&record.data_source),
        FilterField::District => state.district.accepts_str(&record.district),
        FilterField::SubDistrict => state.sub_district.accepts_str(&record.sub_district),
        FilterField::AreaUnitKind => true,
        FilterField::AreaUnitValue => state
            .area_unit_value
            .accepts_str(record.area_unit(state.area_unit_kind)),
    }
}
