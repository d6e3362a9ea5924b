//! Record matching: search, filter and sort.

use std::cmp::Reverse;

use business_map_business_models::BusinessRecord;
use business_map_filter_models::{FilterState, RecordQuery, SortDirection, SortKey};

/// Records matching `query.search`, then every non-wildcard field of
/// `state`, sorted by `query.sort` if set.
///
/// Search is a case-insensitive substring match against name, address,
/// local unit ID, sub-district and district; a record matches if any of
/// them contains the text. Sorting is stable and case-insensitive.
///
/// The result borrows from `records` and preserves load order when no
/// sort is requested.
#[must_use]
pub fn matching_records<'a>(
    records: &'a [BusinessRecord],
    state: &FilterState,
    query: &RecordQuery,
) -> Vec<&'a BusinessRecord> {
    let needle = query.search.trim().to_lowercase();

    let mut matched: Vec<&BusinessRecord> = records
        .iter()
        .filter(|r| needle.is_empty() || matches_search(r, &needle))
        .filter(|r| matches_filters(r, state))
        .collect();

    if let Some(order) = query.sort {
        match order.direction {
            SortDirection::Asc => matched.sort_by_cached_key(|r| sort_text(r, order.key)),
            SortDirection::Desc => {
                matched.sort_by_cached_key(|r| Reverse(sort_text(r, order.key)));
            }
        }
    }

    matched
}

/// Whether `record` satisfies every non-wildcard field of `state`.
#[must_use]
pub fn matches_filters(record: &BusinessRecord, state: &FilterState) -> bool {
    state.map_type.accepts(&record.map_type)
        && state.category.accepts_str(&record.category)
        && state.district.accepts_str(&record.district)
        && state.sub_district.accepts_str(&record.sub_district)
        && state
            .area_unit_value
            .accepts_str(record.area_unit(state.area_unit_kind))
        && state.data_source.accepts_str(&record.data_source)
}

fn matches_search(record: &BusinessRecord, needle: &str) -> bool {
    [
        &record.name,
        &record.address,
        &record.local_unit,
        &record.sub_district,
        &record.district,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

fn sort_text(record: &BusinessRecord, key: SortKey) -> String {
    match key {
        SortKey::Name => record.name.to_lowercase(),
        SortKey::MapType => record.map_type.to_string(),
        SortKey::Category => record.category.to_lowercase(),
        SortKey::District => record.district.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use business_map_business_models::MapType;
    use business_map_filter_models::{FilterField, SortOrder};

    use super::*;
    use crate::cascade::{apply, select_record};
    use crate::fixtures::records;

    fn ids(matched: &[&BusinessRecord]) -> Vec<String> {
        matched.iter().map(|r| r.id.clone()).collect()
    }

    fn search(text: &str) -> RecordQuery {
        RecordQuery {
            search: text.to_string(),
            sort: None,
        }
    }

    #[test]
    fn wildcard_state_returns_everything_in_order() {
        let records = records();
        let matched =
            matching_records(&records, &FilterState::default(), &RecordQuery::default());
        assert_eq!(ids(&matched), vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let records = records();
        let state = FilterState::default();
        let found = |text: &str| ids(&matching_records(&records, &state, &search(text)));
        assert_eq!(found("WARUNG"), vec!["1", "6"]);
        assert_eq!(found("teladan"), vec!["3"]);
        assert_eq!(found("0005"), vec!["5"]);
        assert_eq!(found("  medan kota "), vec!["3", "5"]);
        assert!(found("zzz").is_empty());
    }

    #[test]
    fn search_ignores_data_source() {
        let records = records();
        let matched = matching_records(&records, &FilterState::default(), &search("registrasi"));
        assert!(matched.is_empty());
    }

    #[test]
    fn filters_are_anded() {
        let records = records();
        let state = apply(&FilterState::default(), FilterField::MapType, "prelist").unwrap();
        let state = apply(&state, FilterField::Category, "Makanan").unwrap();
        let matched = matching_records(&records, &state, &RecordQuery::default());
        assert_eq!(ids(&matched), vec!["1", "4", "6"]);

        let state = apply(&state, FilterField::DataSource, "Survei").unwrap();
        let matched = matching_records(&records, &state, &RecordQuery::default());
        assert_eq!(ids(&matched), vec!["1", "6"]);
    }

    #[test]
    fn area_value_uses_selected_kind() {
        let records = records();
        let mut state = select_record(&records[0]);
        state.area_unit_kind = business_map_business_models::AreaUnitKind::CensusBlock;
        state.area_unit_value = "B0001".into();
        let matched = matching_records(&records, &state, &RecordQuery::default());
        assert_eq!(ids(&matched), vec!["1", "6"]);
    }

    #[test]
    fn sorting_is_stable_and_case_insensitive() {
        let records = records();
        let mut query = RecordQuery {
            search: String::new(),
            sort: Some(SortOrder::default()),
        };
        let asc = matching_records(&records, &FilterState::default(), &query);
        assert_eq!(ids(&asc), vec!["2", "3", "5", "4", "6", "1"]);

        query.sort = Some(SortOrder {
            key: SortKey::Category,
            direction: SortDirection::Desc,
        });
        let desc = matching_records(&records, &FilterState::default(), &query);
        assert_eq!(ids(&desc), vec!["3", "1", "4", "5", "6", "2"]);
    }

    #[test]
    fn sort_by_map_type_keeps_load_order_within_groups() {
        let records = records();
        let query = RecordQuery {
            search: String::new(),
            sort: Some(SortOrder {
                key: SortKey::MapType,
                direction: SortDirection::Asc,
            }),
        };
        let matched = matching_records(&records, &FilterState::default(), &query);
        assert_eq!(ids(&matched), vec!["3", "5", "1", "2", "4", "6"]);
        assert!(matched[..2].iter().all(|r| r.map_type == MapType::Listing));
    }

    #[test]
    fn matching_is_idempotent_and_a_subsequence() {
        let records = records();
        let state = apply(&FilterState::default(), FilterField::MapType, "listing").unwrap();
        let query = search("medan");
        let first = matching_records(&records, &state, &query);
        let second = matching_records(&records, &state, &query);
        assert_eq!(ids(&first), ids(&second));

        let mut cursor = records.iter();
        for matched in &first {
            assert!(
                cursor.any(|r| std::ptr::eq(r, *matched)),
                "{} is not a subsequence element",
                matched.id
            );
        }
    }

    #[test]
    fn selected_record_is_the_only_match_when_location_is_unique() {
        let records = records();
        let state = select_record(&records[3]);
        let matched = matching_records(&records, &state, &RecordQuery::default());
        assert_eq!(ids(&matched), vec!["4"]);
    }

    #[test]
    fn selecting_a_record_keeps_records_sharing_its_location() {
        let records = records();
        let state = select_record(&records[0]);
        let matched = matching_records(&records, &state, &RecordQuery::default());
        assert_eq!(ids(&matched), vec!["1", "6"]);
    }
}
