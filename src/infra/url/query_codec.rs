//! Filter state <-> query string.
//!
//! Empty values are never written, so "absent" and "explicitly empty" read back
//! the same: the caller's default.

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::domain::entities::filter::{FilterState, FilterValue, SortOrder};

const KEY_PAGE: &str = "page";
const KEY_LIMIT: &str = "limit";
const KEY_Q: &str = "q";
const KEY_SORT_BY: &str = "sortBy";
const KEY_ORDER: &str = "order";

pub fn serialize_filters(filters: &FilterState) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());

    out.append_pair(KEY_PAGE, &filters.page.to_string());
    out.append_pair(KEY_LIMIT, &filters.limit.to_string());
    if let Some(q) = filters.q.as_deref().filter(|q| !q.is_empty()) {
        out.append_pair(KEY_Q, q);
    }
    if let Some(sort_by) = filters.sort_by.as_deref().filter(|key| !key.is_empty()) {
        out.append_pair(KEY_SORT_BY, sort_by);
    }
    if let Some(order) = filters.order {
        out.append_pair(KEY_ORDER, order.as_str());
    }

    for (key, value) in &filters.extra {
        match value {
            FilterValue::Single(value) => {
                if !value.is_empty() {
                    out.append_pair(key, value);
                }
            }
            FilterValue::List(values) => {
                for value in values.iter().filter(|value| !value.is_empty()) {
                    out.append_pair(key, value);
                }
            }
        }
    }

    out.finish()
}

/// Reads `query` on top of `defaults`. Never fails: bad `page`, `limit` or
/// `order` values keep the default.
///
/// The query string carries no types, so a key that occurs once reads back as
/// [`FilterValue::Single`]. Keys holding lists must be declared as lists in
/// `defaults` (an empty list is enough) for a one-element list to survive a
/// round trip.
pub fn parse_filters(query: &str, defaults: &FilterState) -> FilterState {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut parsed = defaults.clone();
    let mut extra: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            KEY_PAGE => parsed.page = positive_or(&value, defaults.page),
            KEY_LIMIT => parsed.limit = positive_or(&value, defaults.limit),
            KEY_Q => parsed.q = non_empty(value.into_owned()),
            KEY_SORT_BY => parsed.sort_by = non_empty(value.into_owned()),
            KEY_ORDER => {
                parsed.order = SortOrder::parse(&value).or(defaults.order);
            }
            _ => {
                if !value.is_empty() {
                    extra
                        .entry(key.into_owned())
                        .or_default()
                        .push(value.into_owned());
                }
            }
        }
    }

    for (key, mut values) in extra {
        let wants_list = matches!(defaults.extra.get(&key), Some(FilterValue::List(_)));
        let value = if wants_list || values.len() > 1 {
            FilterValue::List(values)
        } else {
            // A single occurrence; `values` is never empty here.
            match values.pop() {
                Some(value) => FilterValue::Single(value),
                None => continue,
            }
        };
        parsed.extra.insert(key, value);
    }

    parsed
}

fn positive_or(raw: &str, fallback: u32) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => value,
        _ => fallback,
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn defaults() -> FilterState {
        FilterState::default().with_limit(10)
    }

    #[test]
    fn invalid_page_and_limit_fall_back_to_defaults() {
        let parsed = parse_filters("page=-5&limit=abc", &defaults());

        assert_eq!(parsed.page, 1);
        assert_eq!(parsed.limit, 10);
    }

    #[test]
    fn zero_and_fractional_numbers_fall_back() {
        let parsed = parse_filters("page=0&limit=2.5", &defaults());

        assert_eq!(parsed.page, 1);
        assert_eq!(parsed.limit, 10);
    }

    #[test]
    fn serialize_omits_empty_values() {
        let mut filters = defaults();
        filters.q = Some(String::new());
        filters.extra.insert("role".to_string(), FilterValue::from(""));

        assert_eq!(serialize_filters(&filters), "page=1&limit=10");
    }

    #[test]
    fn serialize_is_deterministic_and_sorts_extra_keys() {
        let filters = defaults()
            .with_sort("name", SortOrder::Desc)
            .with_filter("status", "active")
            .with_filter("role", "Admin");

        assert_eq!(
            serialize_filters(&filters),
            "page=1&limit=10&sortBy=name&order=desc&role=Admin&status=active"
        );
    }

    #[test]
    fn list_values_become_repeated_keys_and_back() {
        let filters = defaults().with_filter(
            "status",
            vec!["active".to_string(), "suspended".to_string()],
        );

        let query = serialize_filters(&filters);
        assert_eq!(query, "page=1&limit=10&status=active&status=suspended");
        assert_eq!(parse_filters(&query, &defaults()), filters);
    }

    #[test]
    fn list_default_keeps_single_occurrence_as_list() {
        let defaults = defaults().with_filter("tag", Vec::<String>::new());

        let parsed = parse_filters("tag=new", &defaults);

        assert_eq!(
            parsed.extra.get("tag"),
            Some(&FilterValue::List(vec!["new".to_string()]))
        );
    }

    #[test]
    fn search_text_is_percent_encoded() {
        let mut filters = defaults();
        filters.q = Some("a&b c".to_string());

        let query = serialize_filters(&filters);

        assert_eq!(query, "page=1&limit=10&q=a%26b+c");
        assert_eq!(parse_filters(&query, &defaults()).q.as_deref(), Some("a&b c"));
    }

    #[test]
    fn leading_question_mark_and_unknown_order_are_tolerated() {
        let defaults = defaults().with_sort("name", SortOrder::Asc);

        let parsed = parse_filters("?order=sideways&page=3", &defaults);

        assert_eq!(parsed.page, 3);
        assert_eq!(parsed.order, Some(SortOrder::Asc));
    }

    fn filter_state() -> impl Strategy<Value = FilterState> {
        (
            1u32..500,
            1u32..200,
            proptest::option::of("[a-z &=%]{1,12}"),
            proptest::option::of("[a-zA-Z]{1,8}"),
            proptest::option::of(prop_oneof![Just(SortOrder::Asc), Just(SortOrder::Desc)]),
            proptest::collection::btree_map("[a-z]{3,6}", extra_value(), 0..3),
        )
            .prop_filter("extra keys must not shadow core keys", |(.., extra)| {
                ["page", "limit", "order"]
                    .iter()
                    .all(|key| !extra.contains_key(*key))
            })
            .prop_map(|(page, limit, q, sort_by, order, extra)| FilterState {
                page,
                limit,
                q,
                sort_by,
                order,
                extra,
            })
    }

    fn extra_value() -> impl Strategy<Value = FilterValue> {
        prop_oneof![
            "[a-zA-Z0-9 ]{1,6}".prop_map(FilterValue::Single),
            proptest::collection::vec("[a-zA-Z0-9 ]{1,6}", 1..4).prop_map(FilterValue::List),
        ]
    }

    // Declares every list-valued key of `filters` as a list.
    fn defaults_declaring_lists(filters: &FilterState) -> FilterState {
        let mut defaults = FilterState::default();
        for (key, value) in &filters.extra {
            if matches!(value, FilterValue::List(_)) {
                defaults.extra.insert(key.clone(), FilterValue::List(Vec::new()));
            }
        }
        defaults
    }

    #[test]
    fn undeclared_single_item_list_reads_back_as_single() {
        let filters = defaults().with_filter("status", vec!["active".to_string()]);
        let query = serialize_filters(&filters);

        let undeclared = parse_filters(&query, &defaults());
        let declared = parse_filters(&query, &defaults_declaring_lists(&filters));

        assert_eq!(
            undeclared.extra.get("status"),
            Some(&FilterValue::Single("active".to_string()))
        );
        assert_eq!(declared, filters);
    }

    proptest! {
        #[test]
        fn parse_reverses_serialize(filters in filter_state()) {
            let query = serialize_filters(&filters);
            let defaults = defaults_declaring_lists(&filters);
            prop_assert_eq!(parse_filters(&query, &defaults), filters);
        }
    }
}
