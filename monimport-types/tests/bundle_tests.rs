use monimport_types::{Bundle, EntityKind, EntityRecord};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeMap;

#[test]
fn empty_bundle_has_every_post_merge_kind() {
    let bundle = Bundle::empty();
    let kinds: Vec<EntityKind> = bundle.kinds().collect();
    assert_eq!(kinds.len(), 8);
    assert!(!bundle.contains_kind(EntityKind::ServiceTemplates));
    for kind in kinds {
        assert!(bundle.get(kind).is_empty());
    }
    assert!(bundle.is_empty());
}

#[test]
fn get_on_absent_kind_is_empty() {
    let bundle = Bundle::default();
    assert!(bundle.get(EntityKind::Hosts).is_empty());
}

#[test]
fn counts_and_total() {
    let mut collections = BTreeMap::new();
    collections.insert(
        EntityKind::Hosts,
        vec![
            EntityRecord::from_pairs([("host_name", json!("h1"))]),
            EntityRecord::from_pairs([("host_name", json!("h2"))]),
        ],
    );
    collections.insert(EntityKind::Commands, Vec::new());
    let bundle = Bundle::from_collections(collections);

    assert_eq!(bundle.total_records(), 2);
    assert_eq!(
        bundle.counts(),
        vec![(EntityKind::Commands, 0), (EntityKind::Hosts, 2)]
    );
    assert!(!bundle.is_empty());
}

#[test]
fn serializes_keyed_by_kind_in_fetch_order() {
    let mut collections = BTreeMap::new();
    collections.insert(
        EntityKind::Services,
        vec![EntityRecord::from_pairs([("service_description", json!("ping"))])],
    );
    collections.insert(EntityKind::Commands, Vec::new());
    let bundle = Bundle::from_collections(collections);

    let json = bundle.to_json_pretty().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value,
        json!({"commands": [], "services": [{"service_description": "ping"}]})
    );
    assert!(json.find("commands").unwrap() < json.find("services").unwrap());
}

#[test]
fn deserializes_from_keyed_object() {
    let bundle: Bundle =
        serde_json::from_value(json!({"hosts": [{"host_name": "h1"}], "contacts": []})).unwrap();
    assert_eq!(bundle.get(EntityKind::Hosts).len(), 1);
    assert!(bundle.contains_kind(EntityKind::Contacts));
}
