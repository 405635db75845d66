// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end behaviour of the public API: registration, resolution and both
//! engines, driven only through `docmap::*`.

use docmap::{
    Discriminator, Document, FieldDescriptor, FieldShape, Instance, TranscodeConfig,
    TranscodeError, Transcoder, TypeBuilder, TypeKey, TypeRegistry, Value,
};
use std::collections::HashMap;

fn pets_registry() -> TypeRegistry {
    let registry = TypeRegistry::new();
    TypeBuilder::embeddable("Animal").scalar("name").register(&registry);
    TypeBuilder::embeddable("Cat").extends("Animal").register(&registry);
    TypeBuilder::embeddable("Dog").extends("Animal").register(&registry);
    TypeBuilder::root("Owner")
        .scalar("name")
        .embed_list_with(
            "pets",
            Discriminator::new(|raw| {
                if raw.get("type").and_then(Document::as_str) == Some("cat") {
                    TypeKey::new("Cat")
                } else {
                    TypeKey::new("Dog")
                }
            }),
        )
        .register(&registry);
    registry
}

#[test]
fn test_round_trip_scalar_and_embed_one() {
    let registry = TypeRegistry::new();
    TypeBuilder::embeddable("Geo")
        .scalar("lat")
        .scalar("lon")
        .register(&registry);
    TypeBuilder::embeddable("Place")
        .scalar("label")
        .embed_one("geo", "Geo")
        .register(&registry);
    TypeBuilder::root("Venue")
        .scalar("name")
        .scalar("capacity")
        .scalar("open")
        .scalar("logo")
        .embed_one("place", "Place")
        .register(&registry);
    let transcoder = Transcoder::new(&registry);

    let venue = Instance::new("Venue")
        .with_plain("name", "Hall")
        .with_plain("capacity", 1200i64)
        .with_plain("open", true)
        .with_plain("logo", &[0xCAu8, 0xFE][..])
        .with(
            "place",
            Instance::new("Place").with_plain("label", "Centre").with(
                "geo",
                Instance::new("Geo")
                    .with_plain("lat", 51.5)
                    .with_plain("lon", -0.12),
            ),
        );

    let doc = transcoder.encode(&venue).expect("encode");
    let back = transcoder.decode("Venue", &doc).expect("decode");
    assert_eq!(back, venue);
}

#[test]
fn test_inheritance_flattening_and_override() {
    let registry = TypeRegistry::new();
    TypeBuilder::embeddable("Base")
        .scalar("a")
        .embed_one("shared", "Base")
        .register(&registry);
    TypeBuilder::embeddable("Child")
        .extends("Base")
        .scalar("b")
        .embed_list("shared", "Base")
        .register(&registry);

    let child = registry.resolve(&"Child".into()).expect("resolve");
    assert!(child.field("a").is_some());
    assert!(child.field("b").is_some());
    // Redeclaration in the child wins.
    assert_eq!(
        child.field("shared").map(FieldDescriptor::shape),
        Some(FieldShape::EmbedList)
    );

    let base = registry.resolve(&"Base".into()).expect("resolve");
    assert!(base.field("b").is_none());
}

#[test]
fn test_mismatch_detection_direct_and_two_levels_up() {
    let registry = TypeRegistry::new();
    TypeBuilder::embeddable("Base").register(&registry);
    TypeBuilder::root("Child").extends("Base").register(&registry);
    assert_eq!(
        registry.resolve(&"Child".into()).expect_err("mismatch"),
        TranscodeError::TypeHierarchyMismatch {
            descendant: "Child".into(),
            ancestor: "Base".into(),
        }
    );

    TypeBuilder::embeddable("GrandBase").register(&registry);
    TypeBuilder::root("Middle").extends("GrandBase").register(&registry);
    TypeBuilder::root("Leaf").extends("Middle").register(&registry);
    assert_eq!(
        registry.resolve(&"Leaf".into()).expect_err("mismatch two levels up"),
        TranscodeError::TypeHierarchyMismatch {
            descendant: "Leaf".into(),
            ancestor: "GrandBase".into(),
        }
    );

    // The failure is permanent for the type.
    assert!(registry.resolve(&"Leaf".into()).is_err());
    let transcoder = Transcoder::new(&registry);
    assert!(transcoder.encode(&Instance::new("Leaf")).is_err());
}

#[test]
fn test_polymorphic_decode_preserves_order() {
    let registry = pets_registry();
    let doc = Document::object([(
        "pets",
        Document::array([
            Document::object([("type", Document::from("cat")), ("name", Document::from("Whiskers"))]),
            Document::object([("type", Document::from("dog")), ("name", Document::from("Tank"))]),
        ]),
    )]);

    let owner = Transcoder::new(&registry)
        .decode("Owner", &doc)
        .expect("decode");
    let pets = owner.get_list("pets").expect("pets");
    assert_eq!(
        pets[0],
        Value::from(Instance::new("Cat").with_plain("name", "Whiskers"))
    );
    assert_eq!(
        pets[1],
        Value::from(Instance::new("Dog").with_plain("name", "Tank"))
    );
}

#[test]
fn test_keyed_map_encodes_and_decodes_into_ordered_map() {
    let registry = TypeRegistry::new();
    TypeBuilder::embeddable("Addr").scalar("line").register(&registry);
    TypeBuilder::root("Contact")
        .embed_keyed_map("addresses", "Addr")
        .register(&registry);
    TypeBuilder::root("ContactLog")
        .embed_ordered_map("addresses", "Addr")
        .register(&registry);
    let transcoder = Transcoder::new(&registry);

    let a1 = Instance::new("Addr").with_plain("line", "1 Home Rd");
    let a2 = Instance::new("Addr").with_plain("line", "2 Office Pk");
    let mut table = HashMap::new();
    table.insert("home".to_string(), Value::from(a1.clone()));
    table.insert("office".to_string(), Value::from(a2.clone()));
    let contact = Instance::new("Contact").with("addresses", Value::Table(table));

    let doc = transcoder.encode(&contact).expect("encode");
    let expected = Document::object([(
        "addresses",
        Document::object([
            ("home", transcoder.encode(&a1).expect("encode a1")),
            ("office", transcoder.encode(&a2).expect("encode a2")),
        ]),
    )]);
    assert_eq!(doc, expected);

    let log = transcoder.decode("ContactLog", &doc).expect("decode");
    let ordered = log
        .get("addresses")
        .and_then(Value::as_ordered)
        .expect("ordered map");
    let keys: Vec<&str> = ordered.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["home", "office"]);
    assert_eq!(ordered.get("office"), Some(&Value::from(a2)));
}

#[test]
fn test_cross_reference_rejected_at_any_depth() {
    let registry = TypeRegistry::new();
    TypeBuilder::root("User").scalar("name").register(&registry);
    TypeBuilder::embeddable("Node")
        .embed_one("child", "Node")
        .embed_one("owner", "User")
        .register(&registry);
    TypeBuilder::root("Tree").embed_one("top", "Node").register(&registry);
    let transcoder = Transcoder::new(&registry);

    for depth in [0usize, 1, 5] {
        let mut node = Instance::new("Node").with("owner", Instance::new("User"));
        for _ in 0..depth {
            node = Instance::new("Node").with("child", node);
        }
        let tree = Instance::new("Tree").with("top", node);
        let err = transcoder.encode(&tree).expect_err("root nested");
        assert!(
            matches!(err, TranscodeError::CrossDocumentReference { ref type_name, .. } if type_name == "User"),
            "depth {}: {}",
            depth,
            err
        );
    }
}

#[test]
fn test_unmapped_fields_dropped_and_keys_ignored() {
    let registry = pets_registry();
    let transcoder = Transcoder::with_config(&registry, TranscodeConfig::new().with_log_unmapped(true));

    let owner = Instance::new("Owner")
        .with_plain("name", "Sam")
        .with_plain("cache", "transient");
    let doc = transcoder.encode(&owner).expect("encode");
    assert_eq!(doc, Document::object([("name", Document::from("Sam"))]));

    let stored = Document::object([
        ("_id", Document::from(42i64)),
        ("name", Document::from("Sam")),
        ("legacy", Document::from(true)),
    ]);
    let decoded = transcoder.decode("Owner", &stored).expect("decode");
    assert_eq!(decoded, Instance::new("Owner").with_plain("name", "Sam"));
}

#[test]
fn test_invalid_embedded_type_names_field() {
    let registry = pets_registry();
    let bad_registry = TypeRegistry::new();
    TypeBuilder::root("Shelter")
        .embed_list_with("pets", Discriminator::fixed("Unknown"))
        .register(&bad_registry);

    let doc = Document::object([("pets", Document::array([Document::object([("name", Document::from("x"))])]))]);
    let err = Transcoder::new(&bad_registry)
        .decode("Shelter", &doc)
        .expect_err("unknown embedded type");
    assert_eq!(
        err,
        TranscodeError::InvalidEmbeddedType {
            field: "pets[0]".into(),
            type_name: "Unknown".into(),
        }
    );

    // A well-formed registry is unaffected.
    assert!(Transcoder::new(&registry).decode("Owner", &doc).is_ok());
}

#[test]
fn test_not_a_mapped_type() {
    let registry = TypeRegistry::new();
    let transcoder = Transcoder::new(&registry);
    assert_eq!(
        transcoder.encode(&Instance::new("Nope")).expect_err("encode"),
        TranscodeError::NotAMappedType { type_name: "Nope".into() }
    );
    assert!(matches!(
        transcoder.decode("Nope", &Document::default()),
        Err(TranscodeError::NotAMappedType { .. })
    ));
}

#[test]
fn test_global_registry_entry_points() {
    TypeBuilder::embeddable("props.global.Tag")
        .scalar("label")
        .register(docmap::registry());
    TypeBuilder::root("props.global.Post")
        .scalar("title")
        .embed_list("tags", "props.global.Tag")
        .register(docmap::registry());

    let post = Instance::new("props.global.Post")
        .with_plain("title", "Hello")
        .with(
            "tags",
            vec![Instance::new("props.global.Tag").with_plain("label", "intro")],
        );
    let doc = docmap::encode(&post).expect("encode");
    let back = docmap::decode("props.global.Post", &doc).expect("decode");
    assert_eq!(back, post);

    let mut target = Instance::new("props.global.Post").with_plain("title", "Old");
    docmap::decode_into(&mut target, &Document::object([("title", Document::from("New"))]))
        .expect("decode_into");
    assert_eq!(target.get_str("title"), Some("New"));
}
