//! Search parameter records and the cleaning step applied before they are
//! sent to the API or written back into a URL.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::query::raw::RawQuery;

/// Value of a flat parameter map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(i64),
    Text(String),
    List(Vec<String>),
}

impl ParamValue {
    /// Non-empty text, non-zero number, or non-empty list.
    pub fn is_truthy(&self) -> bool {
        match self {
            ParamValue::Number(n) => *n != 0,
            ParamValue::Text(s) => !s.is_empty(),
            ParamValue::List(values) => !values.is_empty(),
        }
    }

    /// Values as they appear in a query string; lists repeat their key.
    pub fn to_query_values(&self) -> Vec<String> {
        match self {
            ParamValue::Number(n) => vec![n.to_string()],
            ParamValue::Text(s) => vec![s.clone()],
            ParamValue::List(values) => values.clone(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::List(values)
    }
}

pub type ParamMap = BTreeMap<String, ParamValue>;

/// Drop every entry whose value is falsy.
pub fn clean(params: ParamMap) -> ParamMap {
    params.into_iter().filter(|(_, value)| value.is_truthy()).collect()
}

/// Flatten a map into `(key, value)` pairs, repeating keys for lists.
pub fn to_pairs(params: &ParamMap) -> Vec<(String, String)> {
    params
        .iter()
        .flat_map(|(key, value)| {
            value
                .to_query_values()
                .into_iter()
                .map(move |v| (key.clone(), v))
        })
        .collect()
}

/// Filters accepted by the partner and partnership search endpoints.
///
/// Every `Some` field holds a non-empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisor: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub partner_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ucl_entity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobility_type: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

pub type PartnerSearchParams = SearchParams;
pub type PartnershipSearchParams = SearchParams;

impl SearchParams {
    fn from_clean(mut map: ParamMap) -> Self {
        let mut text = |key: &str| match map.remove(key)? {
            ParamValue::Text(s) => Some(s),
            ParamValue::Number(n) => Some(n.to_string()),
            ParamValue::List(values) => values.into_iter().next(),
        };
        let campus = text("campus");
        let city = text("city");
        let continent = text("continent");
        let country = text("country");
        let education_field = text("education_field");
        let limit = text("limit");
        let offset = text("offset");
        let partner = text("partner");
        let supervisor = text("supervisor");
        let partner_type = text("type");
        let ucl_entity = text("ucl_entity");
        let ordering = text("ordering");

        let mut list = |key: &str| match map.remove(key)? {
            ParamValue::List(values) => Some(values),
            ParamValue::Text(s) => Some(vec![s]),
            ParamValue::Number(n) => Some(vec![n.to_string()]),
        };
        let mobility_type = list("mobility_type");
        let funding = list("funding");

        Self {
            campus,
            city,
            continent,
            country,
            education_field,
            limit,
            offset,
            partner,
            supervisor,
            partner_type,
            ucl_entity,
            mobility_type,
            funding,
            ordering,
        }
    }

    /// The present fields as a flat map.
    pub fn to_param_map(&self) -> ParamMap {
        let mut map = ParamMap::new();
        let texts = [
            ("campus", &self.campus),
            ("city", &self.city),
            ("continent", &self.continent),
            ("country", &self.country),
            ("education_field", &self.education_field),
            ("limit", &self.limit),
            ("offset", &self.offset),
            ("partner", &self.partner),
            ("supervisor", &self.supervisor),
            ("type", &self.partner_type),
            ("ucl_entity", &self.ucl_entity),
            ("ordering", &self.ordering),
        ];
        for (key, value) in texts {
            if let Some(value) = value {
                map.insert(key.to_string(), ParamValue::Text(value.clone()));
            }
        }
        for (key, value) in [("mobility_type", &self.mobility_type), ("funding", &self.funding)] {
            if let Some(values) = value {
                map.insert(key.to_string(), ParamValue::List(values.clone()));
            }
        }
        map
    }

    /// Query-string pairs for an HTTP request.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        to_pairs(&self.to_param_map())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Fallback value for each field when the query does not provide one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDefaults {
    pub campus: &'static str,
    pub city: &'static str,
    pub continent: &'static str,
    pub country: &'static str,
    pub education_field: &'static str,
    pub limit: &'static str,
    pub offset: &'static str,
    pub partner: &'static str,
    pub supervisor: &'static str,
    pub partner_type: &'static str,
    pub ucl_entity: &'static str,
    pub mobility_type: &'static [&'static str],
    pub funding: &'static [&'static str],
    pub ordering: &'static str,
}

impl QueryDefaults {
    pub const EMPTY: Self = Self {
        campus: "",
        city: "",
        continent: "",
        country: "",
        education_field: "",
        limit: "",
        offset: "",
        partner: "",
        supervisor: "",
        partner_type: "",
        ucl_entity: "",
        mobility_type: &[],
        funding: &[],
        ordering: "",
    };

    /// Partner searches impose no ordering.
    pub const PARTNER: Self = Self::EMPTY;

    /// Partnership lists are ordered by UCL entity unless asked otherwise.
    pub const PARTNERSHIP: Self = Self {
        ordering: "ucl_entity",
        ..Self::EMPTY
    };
}

/// Query keys that feed the paging fields of a builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingKeys {
    pub limit: &'static str,
    pub offset: &'static str,
}

pub const PARTNER_PAGING: PagingKeys = PagingKeys {
    limit: "limit",
    offset: "offset",
};

pub const PARTNERSHIP_PAGING: PagingKeys = PagingKeys {
    limit: "limitPartnership",
    offset: "offsetPartnership",
};

/// Parameters for the partner search, read from URL state.
pub fn partner_params(query: &RawQuery) -> PartnerSearchParams {
    partner_params_with(query, &QueryDefaults::PARTNER)
}

pub fn partner_params_with(query: &RawQuery, defaults: &QueryDefaults) -> PartnerSearchParams {
    build(query, defaults, PARTNER_PAGING)
}

/// Parameters for the partnership search, read from URL state.
///
/// Paging comes from `limitPartnership`/`offsetPartnership` so the partnership
/// list of a partner can page independently of the partner list.
pub fn partnership_params(query: &RawQuery) -> PartnershipSearchParams {
    partnership_params_with(query, &QueryDefaults::PARTNERSHIP)
}

pub fn partnership_params_with(query: &RawQuery, defaults: &QueryDefaults) -> PartnershipSearchParams {
    build(query, defaults, PARTNERSHIP_PAGING)
}

fn build(query: &RawQuery, defaults: &QueryDefaults, paging: PagingKeys) -> SearchParams {
    let text = |key: &str, default: &str| ParamValue::Text(query.text(key).unwrap_or(default).to_string());
    let list = |key: &str, default: &[&str]| {
        ParamValue::List(
            query
                .list(key)
                .unwrap_or_else(|| default.iter().map(|s| s.to_string()).collect()),
        )
    };

    let mut map = ParamMap::new();
    map.insert("campus".into(), text("campus", defaults.campus));
    map.insert("city".into(), text("city", defaults.city));
    map.insert("continent".into(), text("continent", defaults.continent));
    map.insert("country".into(), text("country", defaults.country));
    map.insert("education_field".into(), text("education_field", defaults.education_field));
    map.insert("limit".into(), text(paging.limit, defaults.limit));
    map.insert("offset".into(), text(paging.offset, defaults.offset));
    map.insert("partner".into(), text("partner", defaults.partner));
    map.insert("supervisor".into(), text("supervisor", defaults.supervisor));
    map.insert("type".into(), text("type", defaults.partner_type));
    map.insert("ucl_entity".into(), text("ucl_entity", defaults.ucl_entity));
    map.insert("mobility_type".into(), list("mobility_type", defaults.mobility_type));
    map.insert("funding".into(), list("funding", defaults.funding));
    map.insert("ordering".into(), text("ordering", defaults.ordering));

    SearchParams::from_clean(clean(map))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, ParamValue)]) -> ParamMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn clean_drops_falsy_values() {
        let input = map(&[
            ("a", ParamValue::from("")),
            ("b", ParamValue::from("x")),
            ("c", ParamValue::List(vec![])),
            ("d", ParamValue::List(vec!["y".into()])),
            ("e", ParamValue::Number(0)),
            ("f", ParamValue::Number(25)),
        ]);
        let expected = map(&[
            ("b", ParamValue::from("x")),
            ("d", ParamValue::List(vec!["y".into()])),
            ("f", ParamValue::Number(25)),
        ]);
        assert_eq!(clean(input), expected);
    }

    #[test]
    fn pairs_repeat_list_keys() {
        let input = map(&[
            ("funding", ParamValue::List(vec!["A".into(), "B".into()])),
            ("limit", ParamValue::Number(25)),
        ]);
        assert_eq!(
            to_pairs(&input),
            vec![
                ("funding".to_string(), "A".to_string()),
                ("funding".to_string(), "B".to_string()),
                ("limit".to_string(), "25".to_string()),
            ]
        );
    }

    #[test]
    fn partner_builder_reads_generic_paging_keys() {
        let q = RawQuery::parse("limit=25&offset=50&limitPartnership=10&country=BE&city=");
        let params = partner_params(&q);
        assert_eq!(params.limit.as_deref(), Some("25"));
        assert_eq!(params.offset.as_deref(), Some("50"));
        assert_eq!(params.country.as_deref(), Some("BE"));
        assert_eq!(params.city, None);
        assert_eq!(params.ordering, None);
    }

    #[test]
    fn partnership_builder_reads_partnership_paging_keys() {
        let q = RawQuery::parse("limit=25&offset=50&limitPartnership=10&offsetPartnership=20");
        let params = partnership_params(&q);
        assert_eq!(params.limit.as_deref(), Some("10"));
        assert_eq!(params.offset.as_deref(), Some("20"));
        assert_eq!(params.ordering.as_deref(), Some("ucl_entity"));
    }

    #[test]
    fn partnership_ordering_can_be_overridden() {
        let params = partnership_params(&RawQuery::parse("ordering=country"));
        assert_eq!(params.ordering.as_deref(), Some("country"));
    }

    #[test]
    fn text_fields_take_first_non_empty_repeat() {
        let params = partner_params(&RawQuery::parse("city=&city=Namur&country=BE"));
        assert_eq!(params.city.as_deref(), Some("Namur"));
        assert_eq!(params.country.as_deref(), Some("BE"));

        let model = crate::query::SearchModel::from_query(&RawQuery::parse("continent=&continent=Europe"));
        assert_eq!(model.continent, "Europe");
    }

    #[test]
    fn list_fields_accept_single_and_repeated_values() {
        let q = RawQuery::parse("mobility_type=student&funding=A&funding=B");
        let params = partner_params(&q);
        assert_eq!(params.mobility_type, Some(vec!["student".to_string()]));
        assert_eq!(params.funding, Some(vec!["A".to_string(), "B".to_string()]));
    }

    #[test]
    fn empty_query_yields_empty_partner_params() {
        assert!(partner_params(&RawQuery::new()).is_empty());
    }

    #[test]
    fn custom_defaults_fill_missing_fields() {
        let defaults = QueryDefaults {
            limit: "25",
            funding: &["Erasmus+"],
            ..QueryDefaults::EMPTY
        };
        let params = partner_params_with(&RawQuery::parse("limit=10"), &defaults);
        assert_eq!(params.limit.as_deref(), Some("10"));
        assert_eq!(params.funding, Some(vec!["Erasmus+".to_string()]));
    }

    #[test]
    fn type_field_serializes_under_its_wire_name() {
        let params = partner_params(&RawQuery::parse("type=university&partner=p-1"));
        assert_eq!(
            params.to_pairs(),
            vec![
                ("partner".to_string(), "p-1".to_string()),
                ("type".to_string(), "university".to_string()),
            ]
        );
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["type"], "university");
    }
}
