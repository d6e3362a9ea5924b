//! Filter selection rules: setting a field, cascading resets, and the
//! disablement predicate.

use business_map_business_models::{AreaUnitKind, BusinessRecord, MapType};
use business_map_filter_models::{FilterError, FilterField, FilterState, FilterValue, WILDCARD};

/// Whether the control for `field` must be disabled in `state`.
///
/// A field is disabled when the field that enables it is a wildcard or is
/// itself disabled. The data-source field is additionally disabled unless
/// the selected map type carries data sources.
#[must_use]
pub fn is_disabled(field: FilterField, state: &FilterState) -> bool {
    if field == FilterField::DataSource {
        return state
            .map_type
            .as_only()
            .is_none_or(|map_type| !map_type.has_data_source());
    }

    field
        .enabling_parent()
        .is_some_and(|parent| state.is_wildcard(parent) || is_disabled(parent, state))
}

/// Sets `field` to the value given as control text and returns the new
/// state.
///
/// Every chain field after `field` is reset to the wildcard. Changing the
/// area unit kind resets the area unit value.
///
/// # Errors
///
/// * [`FilterError::Disabled`] if a concrete value is set on a disabled
///   field. Setting the wildcard is always allowed.
/// * [`FilterError::InvalidValue`] if the text is not a valid value for the
///   field (an unknown map type, or an unknown or wildcard area unit kind).
pub fn apply(
    state: &FilterState,
    field: FilterField,
    text: &str,
) -> Result<FilterState, FilterError> {
    let invalid = || FilterError::InvalidValue {
        field,
        value: text.to_string(),
    };

    if text != WILDCARD && is_disabled(field, state) {
        return Err(FilterError::Disabled { field });
    }

    let mut next = state.clone();
    match field {
        FilterField::MapType => {
            next.map_type = if text == WILDCARD {
                FilterValue::All
            } else {
                FilterValue::Only(text.parse::<MapType>().map_err(|_| invalid())?)
            };
        }
        FilterField::AreaUnitKind => {
            let kind: AreaUnitKind = text.parse().map_err(|_| invalid())?;
            if kind != next.area_unit_kind {
                next.area_unit_kind = kind;
                next.area_unit_value = FilterValue::All;
            }
            return Ok(next);
        }
        FilterField::Category => next.category = FilterValue::parse(text),
        FilterField::DataSource => next.data_source = FilterValue::parse(text),
        FilterField::District => next.district = FilterValue::parse(text),
        FilterField::SubDistrict => next.sub_district = FilterValue::parse(text),
        FilterField::AreaUnitValue => next.area_unit_value = FilterValue::parse(text),
    }

    for downstream in FilterField::chain()
        .iter()
        .filter(|f| f.is_downstream_of(field))
    {
        clear(&mut next, *downstream);
    }

    log::debug!("Filter {field} set to {text:?}");
    Ok(next)
}

/// Like [`apply`], with the field given by name.
///
/// # Errors
///
/// [`FilterError::UnknownField`] if `field` does not name a filter field,
/// otherwise as [`apply`].
pub fn apply_named(
    state: &FilterState,
    field: &str,
    text: &str,
) -> Result<FilterState, FilterError> {
    let parsed: FilterField = field
        .parse()
        .map_err(|_| FilterError::UnknownField(field.to_string()))?;
    apply(state, parsed, text)
}

/// All fields back to the wildcard, area unit kind back to local units.
#[must_use]
pub fn reset() -> FilterState {
    FilterState::default()
}

/// The filter state that selects exactly `record`'s location, as if the
/// user had drilled down the hierarchy to it.
///
/// The data source is copied even for map types whose data-source control
/// is disabled, so the selection stays filter-equivalent.
#[must_use]
pub fn select_record(record: &BusinessRecord) -> FilterState {
    FilterState {
        map_type: FilterValue::Only(record.map_type),
        category: FilterValue::Only(record.category.clone()),
        data_source: FilterValue::Only(record.data_source.clone()),
        district: FilterValue::Only(record.district.clone()),
        sub_district: FilterValue::Only(record.sub_district.clone()),
        area_unit_kind: AreaUnitKind::LocalUnit,
        area_unit_value: FilterValue::Only(record.local_unit.clone()),
    }
}

fn clear(state: &mut FilterState, field: FilterField) {
    match field {
        FilterField::MapType => state.map_type = FilterValue::All,
        FilterField::Category => state.category = FilterValue::All,
        FilterField::DataSource => state.data_source = FilterValue::All,
        FilterField::District => state.district = FilterValue::All,
        FilterField::SubDistrict => state.sub_district = FilterValue::All,
        FilterField::AreaUnitValue => state.area_unit_value = FilterValue::All,
        FilterField::AreaUnitKind => {}
    }
}
