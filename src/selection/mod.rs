//! Resolution of selection sets into the field lists codegen reads from.
use crate::diagnostics::{similar_help_suggestions, PrintableMessage};
use crate::schema;
use crate::schema::field as schema_field;
use crate::ParsedTextType;
use graphql_parser::query as parsed_query;
use graphql_parser::Pos;
use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

mod cache;
pub mod fragment;
mod resolve;

pub use self::fragment::{Fragment, FragmentKey, FragmentNode, FragmentRegistry};

#[derive(Debug, PartialEq)]
pub enum Warning {
    /// A later selection reused a response name already taken in the same
    /// set and carried its own sub-selections; only the first occurrence's
    /// sub-selections survive.
    DiscardedDuplicateSelection {
        position: Pos,
        response_name: String,
        kept_position: Pos,
    },
    DeprecatedFieldUse {
        position: Pos,
        field_name: String,
        parent_type_name: String,
    },
}

impl From<(&str, &Path, Warning)> for PrintableMessage {
    fn from((contents, file_path, warning): (&str, &Path, Warning)) -> Self {
        match warning {
            Warning::DiscardedDuplicateSelection {
                position,
                response_name,
                kept_position,
            } => PrintableMessage::new_compile_warning(
                &format!("duplicate selection of `{response_name}` discarded"),
                file_path,
                contents,
                &position,
                Some(&format!(
                    "The occurrence at {}:{} wins, and sub-selections of later occurrences are not merged into it.",
                    kept_position.line, kept_position.column,
                )),
            ),
            Warning::DeprecatedFieldUse {
                position,
                field_name,
                parent_type_name,
            } => PrintableMessage::new_compile_warning(
                &format!("use of deprecated field `{field_name}` on type `{parent_type_name}`"),
                file_path,
                contents,
                &position,
                None,
            ),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    UnknownField {
        parent_type_name: String,
        field_name: String,
        position: Pos,
        possible_field_names: Vec<String>,
    },
    UnknownFragment(String, Pos, Vec<String>),
    UnknownTypeCondition {
        type_name: String,
        position: Pos,
    },
    MissingType(String),
    SelectionOnTerminalType(String, Pos),
}

impl From<(&str, &Path, Error)> for PrintableMessage {
    fn from((contents, file_path, error): (&str, &Path, Error)) -> Self {
        match error {
            Error::UnknownField {
                parent_type_name,
                field_name,
                position,
                possible_field_names,
            } => {
                let extra = similar_help_suggestions(&field_name, possible_field_names.into_iter())
                    .unwrap_or_default();
                PrintableMessage::new_compile_error(
                    &format!("unknown field `{field_name}`"),
                    file_path,
                    contents,
                    &position,
                    Some(&format!("Check the fields of `{parent_type_name}`.{extra}")),
                )
            }
            Error::UnknownFragment(name, position, possible_spread_names) => {
                let extra = similar_help_suggestions(&name, possible_spread_names.into_iter())
                    .unwrap_or_else(|| " Did you forget to import it?".to_string());
                PrintableMessage::new_compile_error(
                    &format!("unknown spread fragment name `{name}`"),
                    file_path,
                    contents,
                    &position,
                    Some(&format!(
                        "This fragment name doesn't appear to be in scope.{extra}"
                    )),
                )
            }
            Error::UnknownTypeCondition {
                type_name,
                position,
            } => PrintableMessage::new_compile_error(
                &format!("unknown type `{type_name}` in type condition"),
                file_path,
                contents,
                &position,
                Some("The schema has no type with this name."),
            ),
            Error::MissingType(type_name) => PrintableMessage::new_simple_program_error(&format!(
                "failed lookup of type `{type_name}`"
            )),
            Error::SelectionOnTerminalType(type_name, position) => {
                PrintableMessage::new_compile_error(
                    &format!("unexpected selection on terminal type `{type_name}`"),
                    file_path,
                    contents,
                    &position,
                    Some("This type has no selectable fields."),
                )
            }
        }
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Response-name path from the operation root to a selection, stamped onto
/// every resolved field for diagnostics and downstream batching keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn root() -> Self {
        FieldPath::default()
    }

    pub fn child(&self, response_name: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(response_name.to_string());
        FieldPath { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// One resolved field of a response object.
#[derive(Debug)]
pub struct FieldSelection<'s, 'd> {
    pub field: &'s schema_field::Field,
    pub node: &'s parsed_query::Field<'d, ParsedTextType>,
    /// Key the field's value appears under in a response: alias or name.
    pub response_name: &'s str,
    pub path: FieldPath,
}

impl FieldSelection<'_, '_> {
    /// Stable identity of the originating AST node within one parse.
    pub fn node_id(&self) -> Pos {
        self.node.position
    }
}

/// The resolved shape of one (type, selection set) pair.
#[derive(Debug)]
pub struct SelectionInfo<'s, 'd> {
    pub parent_type: &'s schema::Type,
    pub selection_set: &'s parsed_query::SelectionSet<'d, ParsedTextType>,
    /// First-seen, depth-first, left-to-right; response names unique.
    pub fields: Vec<FieldSelection<'s, 'd>>,
    /// Fragments spread at the top level of this set, with their nesting.
    pub fragments: Vec<FragmentNode<'s, 'd>>,
    /// The original set rewritten to exactly the resolved field nodes, for
    /// downstream serialization and hash stability.
    pub expanded: parsed_query::SelectionSet<'d, ParsedTextType>,
}

impl<'s, 'd> SelectionInfo<'s, 'd> {
    pub fn response_names(&self) -> impl Iterator<Item = &'s str> + use<'s, '_, 'd> {
        self.fields.iter().map(|selection| selection.response_name)
    }
}

/// Everything codegen needs to type one selection set: the shape resolved
/// against the requested type, and either that shape alone (all concrete
/// possibilities agree) or one shape per concrete possibility.
#[derive(Debug)]
pub struct PossibleSelections<'s, 'd> {
    pub return_type: Rc<SelectionInfo<'s, 'd>>,
    /// `[return_type]` alone when uniform; otherwise the baseline followed
    /// by every concrete possible type's shape.
    pub variants: Vec<Rc<SelectionInfo<'s, 'd>>>,
}

impl<'s, 'd> PossibleSelections<'s, 'd> {
    pub fn is_uniform(&self) -> bool {
        self.variants.len() == 1
    }

    pub fn variant_for(&self, type_name: &str) -> Option<&Rc<SelectionInfo<'s, 'd>>> {
        self.variants
            .iter()
            .find(|variant| variant.parent_type.name == type_name)
    }
}

/// Per-(schema, document) run state: fragment registry, memoized shapes,
/// accumulated warnings. Single-threaded by design; parallel runs each get
/// their own context.
pub struct CollectContext<'s, 'd> {
    pub schema: &'s schema::Schema,
    fragments: FragmentRegistry<'s, 'd>,
    cache: cache::SelectionCache<'s, 'd>,
    show_deprecation_warnings: bool,
    warnings: RefCell<Vec<Warning>>,
}

impl<'s, 'd> CollectContext<'s, 'd> {
    pub fn new(
        schema: &'s schema::Schema,
        document: &'s parsed_query::Document<'d, ParsedTextType>,
        show_deprecation_warnings: bool,
    ) -> Self {
        CollectContext {
            schema,
            fragments: FragmentRegistry::new(document),
            cache: cache::SelectionCache::default(),
            show_deprecation_warnings,
            warnings: RefCell::new(Vec::new()),
        }
    }

    /// Register fragment definitions imported from outside the document.
    pub fn add_imported_fragments(
        &mut self,
        definitions: impl IntoIterator<
            Item = &'s parsed_query::FragmentDefinition<'d, ParsedTextType>,
        >,
    ) {
        self.fragments.add_definitions(definitions);
    }

    pub fn fragments(&self) -> &FragmentRegistry<'s, 'd> {
        &self.fragments
    }

    /// Resolve the shape of `selection_set` read as `type_name`. Calling
    /// this twice with the same type and selection-set node returns the
    /// same instance.
    pub fn collect_fields(
        &self,
        type_name: &str,
        selection_set: &'s parsed_query::SelectionSet<'d, ParsedTextType>,
        path: &FieldPath,
    ) -> Result<Rc<PossibleSelections<'s, 'd>>> {
        resolve::collect_fields(self, type_name, selection_set, path)
    }

    pub fn take_warnings(&self) -> Vec<Warning> {
        self.warnings.replace(Vec::new())
    }

    fn push_warning(&self, warning: Warning) {
        let mut warnings = self.warnings.borrow_mut();
        // Classifier reruns revisit the same nodes once per concrete type.
        if !warnings.contains(&warning) {
            warnings.push(warning);
        }
    }
}
