use super::fragment::FragmentNode;
use super::{
    CollectContext, Error, FieldPath, FieldSelection, PossibleSelections, Result, SelectionInfo,
    Warning,
};
use crate::schema::{field as schema_field, InterfaceType, Type, TypeDefinition, UnionType};
use crate::ParsedTextType;
use graphql_parser::query as parsed_query;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::rc::Rc;

type SelectionSet<'d> = parsed_query::SelectionSet<'d, ParsedTextType>;

/// Accumulates the flattened field list of one resolution pass: document
/// order preserved, response names deduplicated with the first occurrence
/// winning.
struct FieldCollector<'s, 'd, 'p> {
    path: &'p FieldPath,
    ordered: Vec<FieldSelection<'s, 'd>>,
    by_response_name: HashMap<&'s str, usize>,
}

impl<'s, 'd> FieldCollector<'s, 'd, '_> {
    fn insert(
        &mut self,
        context: &CollectContext<'s, 'd>,
        node: &'s parsed_query::Field<'d, ParsedTextType>,
        field: &'s schema_field::Field,
    ) {
        let response_name: &'s str = node.alias.as_deref().unwrap_or(&node.name);
        match self.by_response_name.entry(response_name) {
            Entry::Occupied(existing) => {
                let kept = &self.ordered[*existing.get()];
                let same_node = kept.node.position == node.position;
                let carries_selections = !kept.node.selection_set.items.is_empty()
                    || !node.selection_set.items.is_empty();
                if !same_node && carries_selections {
                    // The discarded occurrence may request sub-fields the
                    // kept one does not; surface that instead of dropping
                    // it silently.
                    context.push_warning(Warning::DiscardedDuplicateSelection {
                        position: node.position,
                        response_name: response_name.to_string(),
                        kept_position: kept.node.position,
                    });
                }
            }
            Entry::Vacant(vacancy) => {
                vacancy.insert(self.ordered.len());
                self.ordered.push(FieldSelection {
                    field,
                    node,
                    response_name,
                    path: self.path.child(response_name),
                });
            }
        }
    }
}

pub(super) fn collect_fields<'s, 'd>(
    context: &CollectContext<'s, 'd>,
    type_name: &str,
    selection_set: &'s SelectionSet<'d>,
    path: &FieldPath,
) -> Result<Rc<PossibleSelections<'s, 'd>>> {
    let parent_type = context
        .schema
        .get_type_for_name(type_name)
        .ok_or_else(|| Error::MissingType(type_name.to_string()))?;
    if let Some(hit) = context
        .cache
        .get_classified(&parent_type.name, selection_set.span)
    {
        return Ok(hit);
    }
    let baseline = resolve_selection_set(context, parent_type, selection_set, path)?;
    let variants = classify(context, parent_type, &baseline, selection_set, path)?;
    let possible = Rc::new(PossibleSelections {
        return_type: Rc::clone(&baseline),
        variants,
    });
    context
        .cache
        .store_classified(&parent_type.name, selection_set.span, Rc::clone(&possible));
    Ok(possible)
}

/// Decide whether every concrete possibility of an abstract type can share
/// the baseline shape or each needs its own. Divergence is detected by
/// positional node identity: a type-conditioned spread contributes nodes
/// to some variants that the baseline pass never sees.
fn classify<'s, 'd>(
    context: &CollectContext<'s, 'd>,
    parent_type: &'s Type,
    baseline: &Rc<SelectionInfo<'s, 'd>>,
    selection_set: &'s SelectionSet<'d>,
    path: &FieldPath,
) -> Result<Vec<Rc<SelectionInfo<'s, 'd>>>> {
    let concrete_names: &[String] = match &parent_type.definition {
        TypeDefinition::Union(UnionType { possible_types, .. }) => possible_types,
        TypeDefinition::Interface(InterfaceType { possible_types, .. })
            if possible_types.len() > 1 =>
        {
            possible_types
        }
        _ => return Ok(vec![Rc::clone(baseline)]),
    };
    let mut variants = Vec::with_capacity(concrete_names.len());
    for concrete_name in concrete_names {
        let concrete_type = context
            .schema
            .get_type_for_name(concrete_name)
            .ok_or_else(|| Error::MissingType(concrete_name.clone()))?;
        variants.push(resolve_selection_set(
            context,
            concrete_type,
            selection_set,
            path,
        )?);
    }
    let uniform = variants
        .iter()
        .all(|variant| fields_match(&baseline.fields, &variant.fields));
    if uniform {
        return Ok(vec![Rc::clone(baseline)]);
    }
    let mut all = Vec::with_capacity(variants.len() + 1);
    all.push(Rc::clone(baseline));
    all.extend(variants);
    Ok(all)
}

fn fields_match(baseline: &[FieldSelection], variant: &[FieldSelection]) -> bool {
    baseline.len() == variant.len()
        && baseline
            .iter()
            .zip(variant)
            .all(|(left, right)| left.node_id() == right.node_id())
}

fn resolve_selection_set<'s, 'd>(
    context: &CollectContext<'s, 'd>,
    parent_type: &'s Type,
    selection_set: &'s SelectionSet<'d>,
    path: &FieldPath,
) -> Result<Rc<SelectionInfo<'s, 'd>>> {
    if let Some(hit) = context
        .cache
        .get_resolved(&parent_type.name, selection_set.span)
    {
        return Ok(hit);
    }
    let mut collector = FieldCollector {
        path,
        ordered: Vec::with_capacity(selection_set.items.len()),
        by_response_name: HashMap::with_capacity(selection_set.items.len()),
    };
    let mut fragments = Vec::new();
    flatten_into(
        context,
        parent_type,
        selection_set,
        &mut collector,
        &mut fragments,
    )?;
    let fields = collector.ordered;
    let expanded = parsed_query::SelectionSet {
        span: selection_set.span,
        items: fields
            .iter()
            .map(|selection| parsed_query::Selection::Field(selection.node.clone()))
            .collect(),
    };
    let info = Rc::new(SelectionInfo {
        parent_type,
        selection_set,
        fields,
        fragments,
        expanded,
    });
    context
        .cache
        .store_resolved(&parent_type.name, selection_set.span, Rc::clone(&info));
    Ok(info)
}

fn flatten_into<'s, 'd>(
    context: &CollectContext<'s, 'd>,
    parent_type: &'s Type,
    selection_set: &'s SelectionSet<'d>,
    collector: &mut FieldCollector<'s, 'd, '_>,
    fragment_nodes: &mut Vec<FragmentNode<'s, 'd>>,
) -> Result<()> {
    let fields_lookup = parent_type.definition.get_fields_lookup().ok_or_else(|| {
        Error::SelectionOnTerminalType(parent_type.name.clone(), selection_set.span.0)
    })?;
    for selection in &selection_set.items {
        let fragment = match selection {
            parsed_query::Selection::Field(node) => {
                let field =
                    fields_lookup
                        .get(node.name.as_str())
                        .ok_or_else(|| Error::UnknownField {
                            parent_type_name: parent_type.name.clone(),
                            field_name: node.name.clone(),
                            position: node.position,
                            possible_field_names: fields_lookup.keys().cloned().collect(),
                        })?;
                if context.show_deprecation_warnings && field.deprecated {
                    context.push_warning(Warning::DeprecatedFieldUse {
                        position: node.position,
                        field_name: field.name.clone(),
                        parent_type_name: parent_type.name.clone(),
                    });
                }
                collector.insert(context, node, field);
                continue;
            }
            parsed_query::Selection::FragmentSpread(spread) => context.fragments.resolve_named(
                context.schema,
                &spread.fragment_name,
                spread.position,
            )?,
            parsed_query::Selection::InlineFragment(inline) => {
                context
                    .fragments
                    .resolve_inline(context.schema, &parent_type.name, inline)?
            }
        };
        // An inapplicable type condition is valid GraphQL meaning "not for
        // this type"; the spread contributes nothing.
        if !context
            .schema
            .spread_applies(&fragment.type_condition, &parent_type.name)
        {
            continue;
        }
        // The fragment's fields resolve against the currently visited
        // type, not its declared condition, so narrowing already in effect
        // is preserved.
        let mut children = Vec::new();
        flatten_into(
            context,
            parent_type,
            fragment.selection_set,
            collector,
            &mut children,
        )?;
        fragment_nodes.push(FragmentNode { fragment, children });
    }
    Ok(())
}
