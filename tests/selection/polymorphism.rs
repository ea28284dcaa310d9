use crate::helpers::{field_subselection, parse_document, response_names, schema};
use qla::selection::{CollectContext, FieldPath};
use std::rc::Rc;

#[test]
fn interface_with_shared_shape_is_uniform() {
    let schema = schema();
    let document = parse_document("query Q { animal { name age } }");
    let context = CollectContext::new(&schema, &document, true);
    let possible = context
        .collect_fields(
            "Animal",
            field_subselection(&document, "animal"),
            &FieldPath::root().child("animal"),
        )
        .expect("resolves");
    assert!(possible.is_uniform());
    assert_eq!(possible.variants.len(), 1);
    assert!(Rc::ptr_eq(&possible.variants[0], &possible.return_type));
    assert_eq!(response_names(&possible.return_type), vec!["name", "age"]);
}

#[test]
fn type_conditioned_spread_splits_interface_into_variants() {
    let schema = schema();
    let document = parse_document("query Q { animal { name ... on Dog { barks } } }");
    let context = CollectContext::new(&schema, &document, true);
    let possible = context
        .collect_fields(
            "Animal",
            field_subselection(&document, "animal"),
            &FieldPath::root().child("animal"),
        )
        .expect("resolves");
    assert!(!possible.is_uniform());
    // Baseline plus one variant per possible type, divergent or not.
    assert_eq!(possible.variants.len(), 3);
    assert!(Rc::ptr_eq(&possible.variants[0], &possible.return_type));
    assert_eq!(response_names(&possible.return_type), vec!["name"]);

    let cat = possible.variant_for("Cat").expect("cat variant");
    assert_eq!(response_names(cat), vec!["name"]);
    let dog = possible.variant_for("Dog").expect("dog variant");
    assert_eq!(response_names(dog), vec!["name", "barks"]);
    assert_eq!(dog.fields[1].path.to_string(), "animal.barks");
}

#[test]
fn spread_conditioned_on_the_interface_itself_stays_uniform() {
    let schema = schema();
    let document = parse_document("query Q { animal { ... on Animal { name } age } }");
    let context = CollectContext::new(&schema, &document, true);
    let possible = context
        .collect_fields(
            "Animal",
            field_subselection(&document, "animal"),
            &FieldPath::root().child("animal"),
        )
        .expect("resolves");
    // Every possible type inherits the same nodes, so one shape suffices.
    assert!(possible.is_uniform());
    assert_eq!(response_names(&possible.return_type), vec!["name", "age"]);
}

#[test]
fn union_with_only_typename_is_uniform() {
    let schema = schema();
    let document = parse_document("query Q { pet { __typename } }");
    let context = CollectContext::new(&schema, &document, true);
    let possible = context
        .collect_fields(
            "Pet",
            field_subselection(&document, "pet"),
            &FieldPath::root().child("pet"),
        )
        .expect("resolves");
    assert!(possible.is_uniform());
    assert_eq!(response_names(&possible.return_type), vec!["__typename"]);
}

#[test]
fn union_members_with_own_fields_get_own_variants() {
    let schema = schema();
    let document = parse_document(
        "query Q { pet { __typename ... on Cat { purrs } ... on Dog { barks } } }",
    );
    let context = CollectContext::new(&schema, &document, true);
    let possible = context
        .collect_fields(
            "Pet",
            field_subselection(&document, "pet"),
            &FieldPath::root().child("pet"),
        )
        .expect("resolves");
    assert_eq!(possible.variants.len(), 3);
    assert_eq!(response_names(&possible.return_type), vec!["__typename"]);
    let cat = possible.variant_for("Cat").expect("cat variant");
    assert_eq!(response_names(cat), vec!["__typename", "purrs"]);
    let dog = possible.variant_for("Dog").expect("dog variant");
    assert_eq!(response_names(dog), vec!["__typename", "barks"]);
}

#[test]
fn concrete_object_type_never_classifies() {
    let schema = schema();
    let document = parse_document("query Q { cat { name purrs } }");
    let context = CollectContext::new(&schema, &document, true);
    let possible = context
        .collect_fields(
            "Cat",
            field_subselection(&document, "cat"),
            &FieldPath::root().child("cat"),
        )
        .expect("resolves");
    assert!(possible.is_uniform());
    assert_eq!(response_names(&possible.return_type), vec!["name", "purrs"]);
}
