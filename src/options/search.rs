//! Option lists of the search form, built from the configuration endpoint.

use crate::domain::{ConfigNode, Configuration, ValueLabel};
use crate::options::{Level, format_items, value_label_list};

/// A checkbox choice (mobility type, funding).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxItem {
    pub value: String,
    pub label: String,
    pub checked: bool,
}

impl CheckboxItem {
    pub fn new(value: impl Into<String>, label: impl Into<String>, checked: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            checked,
        }
    }
}

/// Mobility type checkboxes as `(value, label)`.
pub const MOBILITY_TYPES: [(&str, &str); 2] = [("student", "Student"), ("staff", "Staff")];

pub fn mobility_checkboxes(selected: &[String]) -> Vec<CheckboxItem> {
    MOBILITY_TYPES
        .iter()
        .map(|(value, label)| CheckboxItem::new(*value, *label, selected.iter().any(|s| s == value)))
        .collect()
}

/// Keep the first occurrence of every item.
pub fn unique<T: PartialEq + Clone>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

/// Every list a search form offers.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub continents: Vec<ValueLabel>,
    pub countries: Vec<ValueLabel>,
    pub cities: Vec<String>,
    pub education_fields: Vec<ValueLabel>,
    pub partners: Vec<ValueLabel>,
    pub ucl_entities: Vec<ValueLabel>,
    pub fundings: Vec<String>,
    continent_tree: Vec<ConfigNode>,
    country_nodes: Vec<ConfigNode>,
}

impl SearchOptions {
    pub fn from_config(config: &Configuration) -> Self {
        let country_nodes: Vec<ConfigNode> = config
            .continents
            .iter()
            .filter_map(|continent| continent.children("countries"))
            .flatten()
            .cloned()
            .collect();

        let all_cities: Vec<String> = country_nodes
            .iter()
            .filter_map(|country| country.children("cities"))
            .flat_map(format_items)
            .map(|city| city.label)
            .collect();

        Self {
            continents: value_label_list(&config.continents, None, None),
            countries: format_items(&country_nodes),
            cities: unique(&all_cities),
            education_fields: format_items(&config.education_fields),
            partners: format_items(&config.partners),
            ucl_entities: format_items(&config.ucl_universities),
            fundings: config.fundings.clone(),
            continent_tree: config.continents.clone(),
            country_nodes,
        }
    }

    /// Countries of the continent named `continent`; all countries when empty.
    pub fn countries_for(&self, continent: &str) -> Vec<ValueLabel> {
        if continent.is_empty() {
            return self.countries.clone();
        }
        value_label_list(&self.continent_tree, Some(&Level::new("countries", continent)), None)
    }

    /// Cities of the country with ISO code `iso_code`; all cities when empty or
    /// unknown.
    pub fn cities_for(&self, iso_code: &str) -> Vec<String> {
        if iso_code.is_empty() {
            return self.cities.clone();
        }
        self.country_nodes
            .iter()
            .find(|country| country.iso_code() == Some(iso_code))
            .map(|country| {
                country
                    .children("cities")
                    .map(|cities| format_items(cities).into_iter().map(|c| c.label).collect())
                    .unwrap_or_default()
            })
            .unwrap_or_else(|| self.cities.clone())
    }

    pub fn funding_checkboxes(&self, selected: &[String]) -> Vec<CheckboxItem> {
        self.fundings
            .iter()
            .map(|funding| CheckboxItem::new(funding.clone(), funding.clone(), selected.contains(funding)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigRecord;

    fn config() -> Configuration {
        let belgium = ConfigRecord::named("Belgium")
            .with_iso_code("BE")
            .with_children("cities", vec![ConfigNode::leaf("Brussels"), ConfigNode::leaf("Namur")]);
        let france = ConfigRecord::named("France")
            .with_iso_code("FR")
            .with_children("cities", vec![ConfigNode::leaf("Paris"), ConfigNode::leaf("Brussels")]);
        let morocco = ConfigRecord::named("Morocco")
            .with_iso_code("MA")
            .with_children("cities", vec![ConfigNode::leaf("Rabat")]);
        Configuration {
            continents: vec![
                ConfigRecord::named("Europe")
                    .with_children("countries", vec![belgium.into(), france.into()])
                    .into(),
                ConfigRecord::named("Africa")
                    .with_children("countries", vec![morocco.into()])
                    .into(),
            ],
            fundings: vec!["Erasmus+".into(), "FAME".into()],
            education_fields: vec![ConfigRecord {
                label: Some("Economics".into()),
                value: Some("31".into()),
                ..ConfigRecord::default()
            }
            .into()],
            partners: vec![],
            ucl_universities: vec![ConfigRecord::named("EPL").with_id("u-1").into()],
        }
    }

    #[test]
    fn flattens_countries_across_continents() {
        let options = SearchOptions::from_config(&config());
        let ids: Vec<_> = options.countries.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["BE", "FR", "MA"]);
        assert_eq!(options.continents.len(), 2);
    }

    #[test]
    fn city_list_is_deduplicated_in_first_seen_order() {
        let options = SearchOptions::from_config(&config());
        assert_eq!(options.cities, vec!["Brussels", "Namur", "Paris", "Rabat"]);
    }

    #[test]
    fn continent_filter_narrows_countries() {
        let options = SearchOptions::from_config(&config());
        let europe: Vec<_> = options.countries_for("Europe").into_iter().map(|c| c.id).collect();
        assert_eq!(europe, vec!["BE", "FR"]);
        assert_eq!(options.countries_for("").len(), 3);
        assert!(options.countries_for("Atlantis").is_empty());
    }

    #[test]
    fn country_filter_narrows_cities() {
        let options = SearchOptions::from_config(&config());
        assert_eq!(options.cities_for("MA"), vec!["Rabat"]);
        assert_eq!(options.cities_for("").len(), 4);
        assert_eq!(options.cities_for("ZZ").len(), 4);
    }

    #[test]
    fn checkboxes_reflect_selection() {
        let options = SearchOptions::from_config(&config());
        let fundings = options.funding_checkboxes(&["FAME".to_string()]);
        assert!(!fundings[0].checked);
        assert!(fundings[1].checked);

        let mobility = mobility_checkboxes(&["staff".to_string()]);
        assert_eq!(mobility[1], CheckboxItem::new("staff", "Staff", true));
        assert!(!mobility[0].checked);
    }

    #[test]
    fn unique_keeps_first_occurrence() {
        assert_eq!(unique(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
