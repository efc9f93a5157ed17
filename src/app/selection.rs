use std::collections::BTreeSet;

use crate::entities::EntityType;

#[derive(Clone, Debug, Default, PartialEq)]
pub(in crate::app) struct SelectionState {
    pub(in crate::app) selected: Option<String>,
    pub(in crate::app) hovered: Option<String>,
    pub(in crate::app) type_filter: BTreeSet<EntityType>,
}

impl SelectionState {
    pub(in crate::app) fn is_type_visible(&self, entity_type: EntityType) -> bool {
        self.type_filter.is_empty() || self.type_filter.contains(&entity_type)
    }

    pub(in crate::app) fn toggle_type(&mut self, entity_type: EntityType) {
        if !self.type_filter.remove(&entity_type) {
            self.type_filter.insert(entity_type);
        }
    }

    pub(in crate::app) fn emphasized(&self) -> Option<&str> {
        self.selected.as_deref().or(self.hovered.as_deref())
    }

    pub(in crate::app) fn reset(&mut self) {
        self.selected = None;
        self.hovered = None;
        self.type_filter.clear();
    }
}
