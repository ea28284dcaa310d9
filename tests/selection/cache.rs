use crate::helpers::{field_subselection, operation_selection_set, parse_document, schema};
use qla::selection::{CollectContext, FieldPath};
use std::rc::Rc;

#[test]
fn repeated_collection_returns_the_identical_instance() {
    let schema = schema();
    let document = parse_document("query Q { title version }");
    let context = CollectContext::new(&schema, &document, true);
    let selection_set = operation_selection_set(&document);
    let first = context
        .collect_fields("Query", selection_set, &FieldPath::root())
        .expect("resolves");
    let second = context
        .collect_fields("Query", selection_set, &FieldPath::root())
        .expect("resolves");
    assert!(Rc::ptr_eq(&first, &second));
}

#[test]
fn variant_shapes_are_shared_with_direct_collection() {
    let schema = schema();
    let document = parse_document("query Q { animal { name ... on Dog { barks } } }");
    let context = CollectContext::new(&schema, &document, true);
    let selection_set = field_subselection(&document, "animal");
    let path = FieldPath::root().child("animal");

    let as_interface = context
        .collect_fields("Animal", selection_set, &path)
        .expect("resolves");
    let as_dog = context
        .collect_fields("Dog", selection_set, &path)
        .expect("resolves");

    // The Dog shape computed while classifying the interface is the same
    // instance a direct Dog collection returns.
    let dog_variant = as_interface.variant_for("Dog").expect("dog variant");
    assert!(Rc::ptr_eq(dog_variant, &as_dog.return_type));
}

#[test]
fn distinct_types_resolve_distinct_instances_for_one_node() {
    let schema = schema();
    let document = parse_document("query Q { animal { name } }");
    let context = CollectContext::new(&schema, &document, true);
    let selection_set = field_subselection(&document, "animal");
    let path = FieldPath::root().child("animal");

    let as_interface = context
        .collect_fields("Animal", selection_set, &path)
        .expect("resolves");
    let as_cat = context
        .collect_fields("Cat", selection_set, &path)
        .expect("resolves");
    assert!(!Rc::ptr_eq(&as_interface.return_type, &as_cat.return_type));
    assert_eq!(as_cat.return_type.parent_type.name, "Cat");
}
