//! Search form state: the request model, the display labels of its typeahead
//! fields, and the cascading continent → country → city lists.

use crate::domain::ValueLabel;
use crate::options::{SearchOptions, label_of};
use crate::query::params::{ParamMap, ParamValue, clean};
use crate::query::raw::RawQuery;

/// Filter values sent with a search and written to the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchModel {
    pub continent: String,
    pub country: String,
    pub city: String,
    pub partner: String,
    pub ucl_entity: String,
    pub campus: String,
    pub supervisor: String,
    pub education_field: String,
    pub mobility_type: Vec<String>,
    pub funding: Vec<String>,
    pub limit: u32,
    pub offset: u32,
}

impl SearchModel {
    pub const DEFAULT: Self = Self {
        continent: String::new(),
        country: String::new(),
        city: String::new(),
        partner: String::new(),
        ucl_entity: String::new(),
        campus: String::new(),
        supervisor: String::new(),
        education_field: String::new(),
        mobility_type: Vec::new(),
        funding: Vec::new(),
        limit: 25,
        offset: 0,
    };

    /// Default model overlaid with URL state. `mobility_type` and `funding`
    /// always come out as lists; non-numeric paging values keep the defaults.
    pub fn from_query(query: &RawQuery) -> Self {
        let mut model = Self::DEFAULT;
        let text = |key: &str| query.text(key).map(str::to_string).unwrap_or_default();

        model.continent = text("continent");
        model.country = text("country");
        model.city = text("city");
        model.partner = text("partner");
        model.ucl_entity = text("ucl_entity");
        model.campus = text("campus");
        model.supervisor = text("supervisor");
        model.education_field = text("education_field");
        model.mobility_type = query.list("mobility_type").unwrap_or_default();
        model.funding = query.list("funding").unwrap_or_default();
        if let Some(limit) = query.text("limit").and_then(|v| v.parse().ok()) {
            model.limit = limit;
        }
        if let Some(offset) = query.text("offset").and_then(|v| v.parse().ok()) {
            model.offset = offset;
        }
        model
    }

    /// All fields as a flat, uncleaned map.
    pub fn to_param_map(&self) -> ParamMap {
        let mut map = ParamMap::new();
        let texts = [
            ("continent", &self.continent),
            ("country", &self.country),
            ("city", &self.city),
            ("partner", &self.partner),
            ("ucl_entity", &self.ucl_entity),
            ("campus", &self.campus),
            ("supervisor", &self.supervisor),
            ("education_field", &self.education_field),
        ];
        for (key, value) in texts {
            map.insert(key.to_string(), ParamValue::Text(value.clone()));
        }
        map.insert("mobility_type".into(), ParamValue::List(self.mobility_type.clone()));
        map.insert("funding".into(), ParamValue::List(self.funding.clone()));
        map.insert("limit".into(), ParamValue::Number(i64::from(self.limit)));
        map.insert("offset".into(), ParamValue::Number(i64::from(self.offset)));
        map
    }

    /// Start a new search: back to the first page, cleaned URL parameters.
    pub fn search_params(&mut self) -> ParamMap {
        self.offset = 0;
        clean(self.to_param_map())
    }

    /// The model as URL query state, e.g. to feed the parameter builders.
    pub fn to_query(&self) -> RawQuery {
        let mut query = RawQuery::new();
        for (key, value) in clean(self.to_param_map()) {
            match value {
                ParamValue::List(values) => query.insert(key, values),
                other => query.insert(key, other.to_query_values().concat()),
            }
        }
        query
    }

    pub fn reset(&mut self) {
        *self = Self::DEFAULT;
    }
}

impl Default for SearchModel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Text shown in the typeahead inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    pub country: String,
    pub ucl_entity: String,
    pub supervisor: String,
    pub education_field: String,
    pub partner: String,
}

impl FormFields {
    pub const DEFAULT: Self = Self {
        country: String::new(),
        ucl_entity: String::new(),
        supervisor: String::new(),
        education_field: String::new(),
        partner: String::new(),
    };

    /// Labels for the ids stored in `model`; unknown ids show as-is.
    pub fn resolve(model: &SearchModel, options: &SearchOptions) -> Self {
        let resolve = |items: &[ValueLabel], value: &str| {
            if value.is_empty() {
                String::new()
            } else {
                label_of(items, value)
            }
        };
        Self {
            country: resolve(&options.countries, &model.country),
            ucl_entity: resolve(&options.ucl_entities, &model.ucl_entity),
            supervisor: model.supervisor.clone(),
            education_field: resolve(&options.education_fields, &model.education_field),
            partner: resolve(&options.partners, &model.partner),
        }
    }
}

impl Default for FormFields {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A search form bound to its option lists.
#[derive(Debug, Clone)]
pub struct SearchForm {
    pub model: SearchModel,
    pub fields: FormFields,
    /// Countries offered for the current continent.
    pub countries: Vec<ValueLabel>,
    /// Cities offered for the current country.
    pub cities: Vec<String>,
    options: SearchOptions,
}

impl SearchForm {
    /// Restore a form from URL state.
    pub fn new(model: SearchModel, options: SearchOptions) -> Self {
        let countries = options.countries_for(&model.continent);
        let cities = options.cities_for(&model.country);
        let fields = FormFields::resolve(&model, &options);
        Self {
            model,
            fields,
            countries,
            cities,
            options,
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Pick a continent (`None` clears it). Country choice is reset either way.
    pub fn select_continent(&mut self, continent: Option<&ValueLabel>) {
        match continent {
            Some(item) => {
                self.model.continent = item.id.clone();
                self.countries = self.options.countries_for(&item.label);
            }
            None => {
                self.model.continent.clear();
                self.countries = self.options.countries.clone();
            }
        }
        self.select_country(None);
    }

    pub fn select_country(&mut self, country: Option<&ValueLabel>) {
        match country {
            Some(item) => {
                self.model.country = item.id.clone();
                self.fields.country = item.label.clone();
                self.cities = self.options.cities_for(&item.id);
            }
            None => {
                self.model.country.clear();
                self.fields.country.clear();
                self.cities = self.options.cities.clone();
            }
        }
    }

    pub fn select_city(&mut self, city: Option<&str>) {
        self.model.city = city.unwrap_or_default().to_string();
    }

    pub fn select_ucl_entity(&mut self, entity: Option<&ValueLabel>) {
        (self.model.ucl_entity, self.fields.ucl_entity) = split(entity);
    }

    pub fn select_partner(&mut self, partner: Option<&ValueLabel>) {
        (self.model.partner, self.fields.partner) = split(partner);
    }

    pub fn select_education_field(&mut self, field: Option<&ValueLabel>) {
        (self.model.education_field, self.fields.education_field) = split(field);
    }

    /// Toggle a mobility type checkbox.
    pub fn toggle_mobility_type(&mut self, value: &str) {
        toggle(&mut self.model.mobility_type, value);
    }

    pub fn toggle_funding(&mut self, value: &str) {
        toggle(&mut self.model.funding, value);
    }

    /// Clear every filter and restore the full lists.
    pub fn reset(&mut self) {
        self.model.reset();
        self.fields = FormFields::DEFAULT;
        self.countries = self.options.countries.clone();
        self.cities = self.options.cities.clone();
    }
}

fn split(item: Option<&ValueLabel>) -> (String, String) {
    item.map(|i| (i.id.clone(), i.label.clone())).unwrap_or_default()
}

fn toggle(values: &mut Vec<String>, value: &str) {
    if let Some(pos) = values.iter().position(|v| v == value) {
        values.remove(pos);
    } else {
        values.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigNode, ConfigRecord, Configuration};

    fn options() -> SearchOptions {
        let belgium = ConfigRecord::named("Belgium")
            .with_iso_code("BE")
            .with_children("cities", vec![ConfigNode::leaf("Namur")]);
        let chile = ConfigRecord::named("Chile")
            .with_iso_code("CL")
            .with_children("cities", vec![ConfigNode::leaf("Santiago")]);
        SearchOptions::from_config(&Configuration {
            continents: vec![
                ConfigRecord::named("Europe")
                    .with_children("countries", vec![belgium.into()])
                    .into(),
                ConfigRecord::named("South America")
                    .with_children("countries", vec![chile.into()])
                    .into(),
            ],
            partners: vec![ConfigRecord::named("KU Leuven").with_id("p-1").into()],
            ..Configuration::default()
        })
    }

    #[test]
    fn model_restores_from_query() {
        let q = RawQuery::parse("continent=Europe&mobility_type=student&funding=A&funding=B&offset=50&limit=abc");
        let model = SearchModel::from_query(&q);
        assert_eq!(model.continent, "Europe");
        assert_eq!(model.mobility_type, vec!["student"]);
        assert_eq!(model.funding, vec!["A", "B"]);
        assert_eq!(model.offset, 50);
        assert_eq!(model.limit, 25);
    }

    #[test]
    fn search_resets_offset_and_cleans() {
        let mut model = SearchModel {
            country: "BE".into(),
            offset: 75,
            ..SearchModel::DEFAULT
        };
        let params = model.search_params();
        assert_eq!(model.offset, 0);
        assert_eq!(params.get("country"), Some(&ParamValue::from("BE")));
        assert_eq!(params.get("limit"), Some(&ParamValue::Number(25)));
        assert!(!params.contains_key("offset"));
        assert!(!params.contains_key("funding"));
    }

    #[test]
    fn to_query_feeds_the_builders() {
        let model = SearchModel {
            partner: "p-1".into(),
            funding: vec!["A".into()],
            ..SearchModel::DEFAULT
        };
        let params = crate::query::partner_params(&model.to_query());
        assert_eq!(params.partner.as_deref(), Some("p-1"));
        assert_eq!(params.limit.as_deref(), Some("25"));
        assert_eq!(params.funding, Some(vec!["A".to_string()]));
    }

    #[test]
    fn fields_resolve_labels_or_pass_through() {
        let model = SearchModel {
            country: "BE".into(),
            partner: "p-unknown".into(),
            ..SearchModel::DEFAULT
        };
        let fields = FormFields::resolve(&model, &options());
        assert_eq!(fields.country, "Belgium");
        assert_eq!(fields.partner, "p-unknown");
        assert_eq!(fields.education_field, "");
    }

    #[test]
    fn continent_selection_cascades() {
        let mut form = SearchForm::new(SearchModel::DEFAULT, options());
        assert_eq!(form.countries.len(), 2);

        let europe = ValueLabel::new("Europe", "Europe");
        form.select_continent(Some(&europe));
        assert_eq!(form.model.continent, "Europe");
        assert_eq!(form.countries, vec![ValueLabel::new("BE", "Belgium")]);

        form.select_country(Some(&ValueLabel::new("BE", "Belgium")));
        assert_eq!(form.cities, vec!["Namur"]);
        assert_eq!(form.fields.country, "Belgium");

        form.select_continent(None);
        assert_eq!(form.model.country, "");
        assert_eq!(form.countries.len(), 2);
        assert_eq!(form.cities, vec!["Namur", "Santiago"]);
    }

    #[test]
    fn restored_continent_narrows_countries() {
        let model = SearchModel {
            continent: "South America".into(),
            ..SearchModel::DEFAULT
        };
        let form = SearchForm::new(model, options());
        assert_eq!(form.countries, vec![ValueLabel::new("CL", "Chile")]);
    }

    #[test]
    fn toggles_and_reset() {
        let mut form = SearchForm::new(SearchModel::DEFAULT, options());
        form.toggle_mobility_type("student");
        form.toggle_mobility_type("staff");
        form.toggle_mobility_type("student");
        assert_eq!(form.model.mobility_type, vec!["staff"]);

        form.select_partner(Some(&ValueLabel::new("p-1", "KU Leuven")));
        assert_eq!(form.fields.partner, "KU Leuven");

        form.reset();
        assert_eq!(form.model, SearchModel::DEFAULT);
        assert_eq!(form.fields, FormFields::DEFAULT);
    }
}
