use crate::helpers::{operation_selection_set, parse_document, response_names, schema};
use qla::selection::{CollectContext, FieldPath, Warning};

#[test]
fn duplicate_with_divergent_subselections_keeps_first_and_warns() {
    let schema = schema();
    let document = parse_document("query Q { animal { name } animal { age } }");
    let context = CollectContext::new(&schema, &document, true);
    let possible = context
        .collect_fields(
            "Query",
            operation_selection_set(&document),
            &FieldPath::root(),
        )
        .expect("resolves");
    assert_eq!(response_names(&possible.return_type), vec!["animal"]);
    let warnings = context.take_warnings();
    assert_eq!(warnings.len(), 1);
    match &warnings[0] {
        Warning::DiscardedDuplicateSelection {
            response_name,
            position,
            kept_position,
        } => {
            assert_eq!(response_name, "animal");
            assert!(kept_position < position);
        }
        other => panic!("unexpected warning: {other:?}"),
    }
}

#[test]
fn same_fragment_spread_twice_dedups_silently() {
    let schema = schema();
    let document = parse_document(
        "
query Q {
  ...AnimalBits
  ...AnimalBits
}

fragment AnimalBits on Query {
  animal {
    name
  }
}
        ",
    );
    let context = CollectContext::new(&schema, &document, true);
    let possible = context
        .collect_fields(
            "Query",
            operation_selection_set(&document),
            &FieldPath::root(),
        )
        .expect("resolves");
    // Both spreads inline the same `animal` node, so there is nothing to
    // warn about.
    assert_eq!(response_names(&possible.return_type), vec!["animal"]);
    assert!(context.take_warnings().is_empty());
}

#[test]
fn deprecated_field_use_warns_when_enabled() {
    let schema = schema();
    let document = parse_document("query Q { legacyTitle }");
    let context = CollectContext::new(&schema, &document, true);
    context
        .collect_fields(
            "Query",
            operation_selection_set(&document),
            &FieldPath::root(),
        )
        .expect("resolves");
    let warnings = context.take_warnings();
    assert!(matches!(
        &warnings[..],
        [Warning::DeprecatedFieldUse { field_name, parent_type_name, .. }]
            if field_name == "legacyTitle" && parent_type_name == "Query"
    ));
}

#[test]
fn deprecated_field_use_is_silent_when_disabled() {
    let schema = schema();
    let document = parse_document("query Q { legacyTitle }");
    let context = CollectContext::new(&schema, &document, false);
    context
        .collect_fields(
            "Query",
            operation_selection_set(&document),
            &FieldPath::root(),
        )
        .expect("resolves");
    assert!(context.take_warnings().is_empty());
}
