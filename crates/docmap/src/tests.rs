// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cross-module tests: registry, resolver, container adapter and both engines.

use super::*;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

fn address_book() -> TypeRegistry {
    let registry = TypeRegistry::new();
    TypeBuilder::embeddable("Address")
        .scalar("street")
        .scalar("city")
        .register(&registry);
    TypeBuilder::embeddable("PostalAddress")
        .extends("Address")
        .scalar("postcode")
        .register(&registry);
    TypeBuilder::root("Person")
        .scalar("name")
        .scalar("age")
        .embed_one("home", "Address")
        .embed_list("previous", "Address")
        .embed_keyed_map("by_label", "Address")
        .embed_ordered_map("route", "Address")
        .register(&registry);
    registry
}

fn address(street: &str, city: &str) -> Instance {
    Instance::new("Address")
        .with_plain("street", street)
        .with_plain("city", city)
}

#[test]
fn test_full_round_trip() {
    let registry = address_book();
    let transcoder = Transcoder::new(&registry);

    let mut by_label = HashMap::new();
    by_label.insert("work".to_string(), Value::from(address("1 Loop", "Cupertino")));
    by_label.insert("home".to_string(), Value::from(address("2 Elm", "Springfield")));

    let mut route = IndexMap::new();
    route.insert("start".to_string(), Value::from(address("A St", "Alpha")));
    route.insert("via".to_string(), Value::from(address("B St", "Beta")));
    route.insert("end".to_string(), Value::from(address("C St", "Gamma")));

    let person = Instance::new("Person")
        .with_plain("name", "Ada")
        .with_plain("age", 36i64)
        .with("home", address("3 Oak", "London"))
        .with(
            "previous",
            vec![address("4 Pine", "Paris"), address("5 Ash", "Rome")],
        )
        .with("by_label", Value::Table(by_label))
        .with("route", Value::Ordered(route));

    // 1. Encode
    let doc = transcoder.encode(&person).expect("encode");
    let previous = doc.get("previous").and_then(Document::as_array).expect("array");
    assert_eq!(previous.len(), 2);
    assert_eq!(previous[1].get("city").and_then(Document::as_str), Some("Rome"));

    // 2. Keyed maps become objects
    let labels = doc.get("by_label").and_then(Document::as_object).expect("object");
    assert_eq!(labels.len(), 2);

    // 3. Ordered maps keep insertion order
    let route_keys: Vec<&str> = doc
        .get("route")
        .and_then(Document::as_object)
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(route_keys, vec!["start", "via", "end"]);

    // 4. Decode and compare
    let back = transcoder.decode("Person", &doc).expect("decode");
    assert_eq!(back, person);
    assert!(matches!(back.get("by_label"), Some(Value::Table(_))));
    let decoded_route: Vec<&str> = back
        .get("route")
        .and_then(Value::as_ordered)
        .expect("ordered")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(decoded_route, vec!["start", "via", "end"]);
}

#[test]
fn test_keyed_map_source_for_ordered_field() {
    let registry = address_book();
    let transcoder = Transcoder::new(&registry);

    // An unordered table is accepted for an ordered field; entries come out
    // sorted by key.
    let mut table = HashMap::new();
    table.insert("zulu".to_string(), Value::from(address("Z", "Zurich")));
    table.insert("alpha".to_string(), Value::from(address("A", "Athens")));
    let person = Instance::new("Person").with("route", Value::Table(table));

    let doc = transcoder.encode(&person).expect("encode");
    let keys: Vec<&str> = doc
        .get("route")
        .and_then(Document::as_object)
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["alpha", "zulu"]);
}

#[test]
fn test_inherited_fields_survive_round_trip() {
    let registry = address_book();
    let transcoder = Transcoder::new(&registry);

    let postal = Instance::new("PostalAddress")
        .with_plain("street", "10 High St")
        .with_plain("postcode", "OX1");
    let doc = transcoder.encode(&postal).expect("encode embeddable top-level");
    assert_eq!(doc.get("street").and_then(Document::as_str), Some("10 High St"));
    assert_eq!(doc.get("postcode").and_then(Document::as_str), Some("OX1"));

    let back = transcoder.decode("PostalAddress", &doc).expect("decode");
    assert_eq!(back, postal);

    let resolved = registry.resolve(&"PostalAddress".into()).expect("resolve");
    assert_eq!(resolved.ancestors(), &[TypeKey::new("Address")]);
    assert_eq!(resolved.field_count(), 3);
}

#[test]
fn test_cross_reference_rejected_deep_inside_containers() {
    let registry = address_book();
    let transcoder = Transcoder::new(&registry);

    let friend = Instance::new("Person").with_plain("name", "Grace");
    let mut route = IndexMap::new();
    route.insert("start".to_string(), Value::from(address("A", "Alpha")));
    route.insert("oops".to_string(), Value::from(friend));
    let person = Instance::new("Person").with("route", Value::Ordered(route));

    let err = transcoder.encode(&person).expect_err("root nested in map");
    assert_eq!(
        err,
        TranscodeError::CrossDocumentReference {
            field: "route.oops".into(),
            type_name: "Person".into(),
        }
    );
}

#[test]
fn test_container_shape_mismatch_both_ways() {
    let registry = address_book();
    let transcoder = Transcoder::new(&registry);

    let person = Instance::new("Person").with("previous", address("X", "Y"));
    let err = transcoder.encode(&person).expect_err("instance is not a list");
    assert!(matches!(
        err,
        TranscodeError::InvalidContainerShape { ref field, expected: "sequence", .. } if field == "previous"
    ));

    let doc = Document::object([("by_label", Document::array([Document::NULL]))]);
    let err = transcoder.decode("Person", &doc).expect_err("array is not keyed");
    assert!(matches!(
        err,
        TranscodeError::InvalidContainerShape { expected: "keyed", found: "array", .. }
    ));
}

#[test]
fn test_custom_hierarchy_drives_resolution() {
    struct Dotted;
    impl TypeHierarchy for Dotted {
        fn supertype(&self, key: &TypeKey) -> Option<TypeKey> {
            key.name().rsplit_once('.').map(|(parent, _)| TypeKey::new(parent))
        }
    }

    let registry = TypeRegistry::with_hierarchy(Arc::new(Dotted));
    TypeBuilder::root("event").scalar("at").register(&registry);
    TypeBuilder::root("event.click").scalar("x").register(&registry);
    TypeBuilder::embeddable("event.click.double").register(&registry);

    let click = registry.resolve(&"event.click".into()).expect("resolve");
    assert!(click.field("at").is_some());

    let err = registry
        .resolve(&"event.click.double".into())
        .expect_err("embeddable below roots");
    assert_eq!(
        err,
        TranscodeError::TypeHierarchyMismatch {
            descendant: "event.click.double".into(),
            ancestor: "event.click".into(),
        }
    );
}

#[test]
fn test_concurrent_first_resolution() {
    let registry = address_book();
    let key = TypeKey::new("Person");

    let resolved: Vec<Arc<ResolvedDescriptor>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| registry.resolve(&key).expect("resolve")))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .collect()
    });

    for r in &resolved[1..] {
        assert!(Arc::ptr_eq(&resolved[0], r));
    }
}

#[test]
fn test_concurrent_transcoding() {
    let registry = address_book();
    let transcoder = Transcoder::new(&registry);

    std::thread::scope(|s| {
        for t in 0..4i64 {
            let transcoder = transcoder.clone();
            s.spawn(move || {
                for i in 0..50i64 {
                    let person = Instance::new("Person")
                        .with_plain("age", t * 100 + i)
                        .with("home", address("S", "C"));
                    let doc = transcoder.encode(&person).expect("encode");
                    let back = transcoder.decode("Person", &doc).expect("decode");
                    assert_eq!(back, person);
                }
            });
        }
    });
}

fn random_word(rng: &mut fastrand::Rng) -> String {
    let len = rng.usize(1..8);
    (0..len).map(|_| rng.lowercase()).collect()
}

fn random_address(rng: &mut fastrand::Rng) -> Value {
    if rng.u8(0..10) == 0 {
        return Value::Plain(Document::NULL);
    }
    let mut addr = Instance::new("Address").with_plain("street", random_word(rng));
    if rng.bool() {
        addr.set("city", Document::from(random_word(rng)));
    }
    Value::from(addr)
}

#[test]
fn test_randomized_round_trip() {
    let registry = address_book();
    let transcoder = Transcoder::new(&registry);
    let mut rng = fastrand::Rng::with_seed(0x5eed);

    for _ in 0..200 {
        let mut person = Instance::new("Person").with_plain("name", random_word(&mut rng));
        if rng.bool() {
            person.set("age", Document::from(rng.i64(0..120)));
        }
        if rng.bool() {
            person.set("home", random_address(&mut rng));
        }
        let previous: Vec<Value> = (0..rng.usize(0..5))
            .map(|_| random_address(&mut rng))
            .collect();
        person.set("previous", Value::List(previous));

        let by_label: HashMap<String, Value> = (0..rng.usize(0..4))
            .map(|_| (random_word(&mut rng), random_address(&mut rng)))
            .collect();
        person.set("by_label", Value::Table(by_label));

        let route: IndexMap<String, Value> = (0..rng.usize(0..4))
            .map(|_| (random_word(&mut rng), random_address(&mut rng)))
            .collect();
        person.set("route", Value::Ordered(route));

        let doc = transcoder.encode(&person).expect("encode");
        let back = transcoder.decode("Person", &doc).expect("decode");
        assert_eq!(back, person);
    }
}

#[test]
fn test_defaults_then_decoded_values() {
    let registry = TypeRegistry::new();
    TypeBuilder::root("Settings")
        .scalar_with_default("theme", Document::from("dark"))
        .scalar_with_default("volume", Document::from(5i64))
        .register(&registry);
    let transcoder = Transcoder::new(&registry);

    let doc = Document::object([("volume", Document::from(11i64))]);
    let settings = transcoder.decode("Settings", &doc).expect("decode");
    assert_eq!(settings.get_str("theme"), Some("dark"));
    assert_eq!(settings.get_i64("volume"), Some(11));
}

#[cfg(feature = "json")]
#[test]
fn test_json_document_decodes() {
    let registry = address_book();
    let json = serde_json::json!({
        "name": "Ada",
        "home": { "street": "1 Main", "city": "Leeds", "_id": 7 },
        "previous": [{ "city": "York" }, null]
    });
    let person = Transcoder::new(&registry)
        .decode("Person", &Document::from(json))
        .expect("decode");
    let home = person.get_object("home").expect("home");
    assert_eq!(home.get_str("city"), Some("Leeds"));
    assert!(!home.contains("_id"));
    let previous = person.get_list("previous").expect("list");
    assert!(previous[1].is_null());
}
