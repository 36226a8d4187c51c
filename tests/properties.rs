use partners_directory::domain::{ConfigNode, MobilityFlags, ValueLabel};
use partners_directory::mobility::mobility_type;
use partners_directory::options::{format_items, label_of};
use partners_directory::query::{ParamMap, ParamValue, RawQuery, clean, partner_params};
use proptest::prelude::*;

fn param_value() -> impl Strategy<Value = ParamValue> {
    prop_oneof![
        (-3i64..3).prop_map(ParamValue::Number),
        "[a-z]{0,3}".prop_map(ParamValue::Text),
        prop::collection::vec("[a-z]{0,3}", 0..3).prop_map(ParamValue::List),
    ]
}

fn param_map() -> impl Strategy<Value = ParamMap> {
    prop::collection::btree_map("[a-z_]{1,10}", param_value(), 0..8)
}

proptest! {
    #[test]
    fn clean_is_idempotent(params in param_map()) {
        let once = clean(params);
        prop_assert_eq!(clean(once.clone()), once);
    }

    #[test]
    fn clean_keeps_exactly_the_truthy_entries(params in param_map()) {
        let cleaned = clean(params.clone());
        for (key, value) in &params {
            prop_assert_eq!(cleaned.contains_key(key), value.is_truthy());
        }
        prop_assert!(cleaned.values().all(ParamValue::is_truthy));
    }

    #[test]
    fn format_items_preserves_length_and_order(names in prop::collection::vec("[A-Za-z ]{1,12}", 0..10)) {
        let nodes: Vec<ConfigNode> = names.iter().map(|n| ConfigNode::leaf(n.as_str())).collect();
        let items = format_items(&nodes);
        prop_assert_eq!(items.len(), names.len());
        for (item, name) in items.iter().zip(&names) {
            prop_assert_eq!(&item.id, name);
            prop_assert_eq!(&item.label, name);
        }
    }

    #[test]
    fn label_of_passes_unknown_values_through(
        ids in prop::collection::vec("[a-z]{1,6}", 0..6),
        value in "[0-9]{1,6}",
    ) {
        let items: Vec<ValueLabel> = ids.iter().map(|id| ValueLabel::new(id.as_str(), id.to_uppercase())).collect();
        prop_assert_eq!(label_of(&items, &value), value);
    }

    #[test]
    fn label_of_finds_known_ids(ids in prop::collection::vec("[a-z]{1,6}", 1..6), pick in any::<prop::sample::Index>()) {
        let items: Vec<ValueLabel> = ids.iter().map(|id| ValueLabel::new(id.as_str(), format!("label {id}"))).collect();
        let id = &ids[pick.index(ids.len())];
        prop_assert_eq!(label_of(&items, id), format!("label {id}"));
    }

    #[test]
    fn partner_builder_keeps_non_empty_country(country in "[A-Z]{2}") {
        let mut query = RawQuery::new();
        query.insert("country", country.as_str());
        prop_assert_eq!(partner_params(&query).country, Some(country));
    }

    #[test]
    fn mobility_type_is_empty_only_without_flags(
        (is_sms, is_smp, is_smst, is_sta, is_stt) in any::<(bool, bool, bool, bool, bool)>(),
    ) {
        let flags = MobilityFlags { is_sms, is_smp, is_smst, is_sta, is_stt };
        let any = is_sms || is_smp || is_smst || is_sta || is_stt;
        prop_assert_eq!(mobility_type(&flags).is_empty(), !any);
    }
}
