use super::{PossibleSelections, SelectionInfo};
use graphql_parser::Pos;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Identity of a selection-set node within one parse result: its source
/// span. Stable across repeated traversal and comparable without pointer
/// games.
pub(super) type SelectionSetId = (Pos, Pos);

/// Two-level memo keyed by visited type name, then selection-set identity.
/// Guarantees at most one resolved instance per (type, node) for the run,
/// so later generator stages can compare shapes by `Rc` identity.
#[derive(Default)]
pub(super) struct SelectionCache<'s, 'd> {
    resolved: RefCell<HashMap<&'s str, HashMap<SelectionSetId, Rc<SelectionInfo<'s, 'd>>>>>,
    classified: RefCell<HashMap<&'s str, HashMap<SelectionSetId, Rc<PossibleSelections<'s, 'd>>>>>,
}

impl<'s, 'd> SelectionCache<'s, 'd> {
    pub(super) fn get_resolved(
        &self,
        type_name: &str,
        id: SelectionSetId,
    ) -> Option<Rc<SelectionInfo<'s, 'd>>> {
        self.resolved
            .borrow()
            .get(type_name)
            .and_then(|inner| inner.get(&id))
            .map(Rc::clone)
    }

    pub(super) fn store_resolved(
        &self,
        type_name: &'s str,
        id: SelectionSetId,
        info: Rc<SelectionInfo<'s, 'd>>,
    ) {
        self.resolved
            .borrow_mut()
            .entry(type_name)
            .or_default()
            .insert(id, info);
    }

    pub(super) fn get_classified(
        &self,
        type_name: &str,
        id: SelectionSetId,
    ) -> Option<Rc<PossibleSelections<'s, 'd>>> {
        self.classified
            .borrow()
            .get(type_name)
            .and_then(|inner| inner.get(&id))
            .map(Rc::clone)
    }

    pub(super) fn store_classified(
        &self,
        type_name: &'s str,
        id: SelectionSetId,
        possible: Rc<PossibleSelections<'s, 'd>>,
    ) {
        self.classified
            .borrow_mut()
            .entry(type_name)
            .or_default()
            .insert(id, possible);
    }
}
