use super::Error;
use crate::schema::Schema;
use crate::ParsedTextType;
use graphql_parser::query as parsed_query;
use graphql_parser::Pos;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

type FragmentDefinition<'d> = parsed_query::FragmentDefinition<'d, ParsedTextType>;
type SelectionSet<'d> = parsed_query::SelectionSet<'d, ParsedTextType>;

/// Identity of a fragment within one document run. Named fragments use
/// their declared name; inline fragments get a key synthesized from their
/// source span, so repeated visits of one node resolve identically while
/// distinct occurrences never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FragmentKey {
    Named(String),
    Inline { start: Pos, end: Pos },
}

impl fmt::Display for FragmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::Inline { start, end } => write!(
                f,
                "{}:{}-{}:{}",
                start.line, start.column, end.line, end.column
            ),
        }
    }
}

#[derive(Debug)]
pub struct Fragment<'s, 'd> {
    pub key: FragmentKey,
    /// Schema-resolved name of the type this fragment narrows to.
    pub type_condition: String,
    pub position: Pos,
    pub selection_set: &'s SelectionSet<'d>,
}

/// Provenance-tree node: a fragment plus the fragments spread while
/// resolving its inner selection set, in document order.
#[derive(Debug, Clone)]
pub struct FragmentNode<'s, 'd> {
    pub fragment: Rc<Fragment<'s, 'd>>,
    pub children: Vec<FragmentNode<'s, 'd>>,
}

/// Resolves and memoizes the fragments of one document run.
pub struct FragmentRegistry<'s, 'd> {
    definitions: HashMap<&'s str, &'s FragmentDefinition<'d>>,
    resolved: RefCell<HashMap<FragmentKey, Rc<Fragment<'s, 'd>>>>,
}

impl<'s, 'd> FragmentRegistry<'s, 'd> {
    pub fn new(document: &'s parsed_query::Document<'d, ParsedTextType>) -> Self {
        let mut registry = FragmentRegistry {
            definitions: HashMap::new(),
            resolved: RefCell::new(HashMap::new()),
        };
        registry.add_definitions(document.definitions.iter().filter_map(
            |definition| match definition {
                parsed_query::Definition::Fragment(fragment_definition) => {
                    Some(fragment_definition)
                }
                parsed_query::Definition::Operation(_) => None,
            },
        ));
        registry
    }

    /// Register fragment definitions from outside the run's own document,
    /// e.g. fragments a sibling file exports. Definitions must come from
    /// the same parse result as the document so node spans stay unique.
    pub fn add_definitions(
        &mut self,
        definitions: impl IntoIterator<Item = &'s FragmentDefinition<'d>>,
    ) {
        for definition in definitions {
            self.definitions.insert(&definition.name, definition);
        }
    }

    pub fn resolve_named(
        &self,
        schema: &Schema,
        name: &str,
        position: Pos,
    ) -> Result<Rc<Fragment<'s, 'd>>, Error> {
        let key = FragmentKey::Named(name.to_string());
        if let Some(hit) = self.resolved.borrow().get(&key) {
            return Ok(Rc::clone(hit));
        }
        let definition = self.definitions.get(name).ok_or_else(|| {
            Error::UnknownFragment(
                name.to_string(),
                position,
                self.definitions.keys().map(|key| key.to_string()).collect(),
            )
        })?;
        let parsed_query::TypeCondition::On(ref type_name) = definition.type_condition;
        self.intern(
            schema,
            key,
            type_name,
            definition.position,
            &definition.selection_set,
        )
    }

    pub fn resolve_inline(
        &self,
        schema: &Schema,
        parent_type_name: &str,
        inline: &'s parsed_query::InlineFragment<'d, ParsedTextType>,
    ) -> Result<Rc<Fragment<'s, 'd>>, Error> {
        let key = FragmentKey::Inline {
            start: inline.position,
            end: inline.selection_set.span.1,
        };
        if let Some(hit) = self.resolved.borrow().get(&key) {
            return Ok(Rc::clone(hit));
        }
        // No explicit condition narrows nothing: the fragment's effective
        // type is whatever type encloses it.
        let type_name = match &inline.type_condition {
            Some(parsed_query::TypeCondition::On(type_name)) => type_name.as_str(),
            None => parent_type_name,
        };
        self.intern(schema, key, type_name, inline.position, &inline.selection_set)
    }

    fn intern(
        &self,
        schema: &Schema,
        key: FragmentKey,
        type_name: &str,
        position: Pos,
        selection_set: &'s SelectionSet<'d>,
    ) -> Result<Rc<Fragment<'s, 'd>>, Error> {
        if schema.get_type_for_name(type_name).is_none() {
            return Err(Error::UnknownTypeCondition {
                type_name: type_name.to_string(),
                position,
            });
        }
        let fragment = Rc::new(Fragment {
            key: key.clone(),
            type_condition: type_name.to_string(),
            position,
            selection_set,
        });
        self.resolved.borrow_mut().insert(key, Rc::clone(&fragment));
        Ok(fragment)
    }
}
