use monimport_types::EntityKind;
use std::str::FromStr;

#[test]
fn fetch_order_is_fixed() {
    let keys: Vec<&str> = EntityKind::FETCH_ORDER.iter().map(|k| k.key()).collect();
    assert_eq!(
        keys,
        vec![
            "commands",
            "hosts",
            "hostgroups",
            "servicestemplates",
            "services",
            "contacts",
            "timeperiods",
            "hostdependencies",
            "servicedependencies",
        ]
    );
}

#[test]
fn derived_ord_matches_fetch_order() {
    let mut sorted = EntityKind::FETCH_ORDER;
    sorted.reverse();
    sorted.sort();
    assert_eq!(sorted, EntityKind::FETCH_ORDER);
}

#[test]
fn from_str_roundtrips_every_key() {
    for kind in EntityKind::FETCH_ORDER {
        assert_eq!(EntityKind::from_str(kind.key()).unwrap(), kind);
    }
}

#[test]
fn from_str_rejects_unknown() {
    let err = EntityKind::from_str("realms").unwrap_err();
    assert!(err.to_string().contains("realms"));
}

#[test]
fn serde_uses_bundle_key() {
    let json = serde_json::to_string(&EntityKind::ServiceTemplates).unwrap();
    assert_eq!(json, "\"servicestemplates\"");
    let kind: EntityKind = serde_json::from_str("\"hostdependencies\"").unwrap();
    assert_eq!(kind, EntityKind::HostDependencies);
}

#[test]
fn remote_methods_are_distinct() {
    let mut methods: Vec<&str> = EntityKind::FETCH_ORDER.iter().map(|k| k.remote_method()).collect();
    methods.sort_unstable();
    methods.dedup();
    assert_eq!(methods.len(), 9);
    assert_eq!(EntityKind::ServiceTemplates.remote_method(), "monitoring.shinkenTemplates");
}

#[test]
fn only_templates_leave_the_bundle() {
    let dropped: Vec<EntityKind> = EntityKind::FETCH_ORDER
        .into_iter()
        .filter(|k| !k.in_bundle())
        .collect();
    assert_eq!(dropped, vec![EntityKind::ServiceTemplates]);
}
