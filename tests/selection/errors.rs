use crate::helpers::{operation_selection_set, parse_document, schema};
use qla::diagnostics::PrintableMessage;
use qla::selection::{CollectContext, Error, FieldPath};
use std::path::Path;

#[test]
fn selecting_an_undefined_field_is_fatal() {
    let schema = schema();
    let document = parse_document("query Q { title ghost }");
    let context = CollectContext::new(&schema, &document, true);
    let error = context
        .collect_fields(
            "Query",
            operation_selection_set(&document),
            &FieldPath::root(),
        )
        .expect_err("ghost is not a Query field");
    match error {
        Error::UnknownField {
            parent_type_name,
            field_name,
            ..
        } => {
            assert_eq!(parent_type_name, "Query");
            assert_eq!(field_name, "ghost");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn spreading_an_undefined_fragment_is_fatal() {
    let schema = schema();
    let document = parse_document("query Q { ...Missing }");
    let context = CollectContext::new(&schema, &document, true);
    let error = context
        .collect_fields(
            "Query",
            operation_selection_set(&document),
            &FieldPath::root(),
        )
        .expect_err("fragment is undefined");
    assert!(matches!(error, Error::UnknownFragment(name, _, _) if name == "Missing"));
}

#[test]
fn fragment_condition_on_unknown_type_is_fatal() {
    let schema = schema();
    let document = parse_document(
        "
query Q {
  ...Ghosty
}

fragment Ghosty on Ghost {
  title
}
        ",
    );
    let context = CollectContext::new(&schema, &document, true);
    let error = context
        .collect_fields(
            "Query",
            operation_selection_set(&document),
            &FieldPath::root(),
        )
        .expect_err("condition names an unknown type");
    assert!(matches!(
        error,
        Error::UnknownTypeCondition { type_name, .. } if type_name == "Ghost"
    ));
}

#[test]
fn collecting_against_an_unknown_type_is_fatal() {
    let schema = schema();
    let document = parse_document("query Q { title }");
    let context = CollectContext::new(&schema, &document, true);
    let error = context
        .collect_fields(
            "Ghost",
            operation_selection_set(&document),
            &FieldPath::root(),
        )
        .expect_err("type is not in the schema");
    assert!(matches!(error, Error::MissingType(name) if name == "Ghost"));
}

#[test]
fn unknown_field_message_suggests_near_misses() {
    let schema = schema();
    let contents = "query Q { titel }";
    let document = parse_document(contents);
    let context = CollectContext::new(&schema, &document, true);
    let error = context
        .collect_fields(
            "Query",
            operation_selection_set(&document),
            &FieldPath::root(),
        )
        .expect_err("titel is misspelled");
    let message = PrintableMessage::from((contents, Path::new("q.graphql"), error));
    assert!(message.is_error());
    let rendered = message.to_string();
    assert!(rendered.contains("unknown field `titel`"));
    assert!(rendered.contains("`title`"));
}
