//! Work-order / sales-order grouping and click-driven highlighting.

use std::collections::{HashMap, HashSet};

use super::schedule::ScheduleItem;

/// Which relation the current selection highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightMode {
    #[default]
    None,
    WorkOrder,
    SalesOrder,
}

/// Forward and inverse maps for one grouping dimension.
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    key_of: HashMap<String, String>,
    members: HashMap<String, HashSet<String>>,
}

impl GroupIndex {
    fn insert(&mut self, item_id: &str, key: &str) {
        self.key_of.insert(item_id.to_string(), key.to_string());
        self.members
            .entry(key.to_string())
            .or_default()
            .insert(item_id.to_string());
    }

    pub fn key_of(&self, item_id: &str) -> Option<&str> {
        self.key_of.get(item_id).map(String::as_str)
    }

    pub fn members(&self, key: &str) -> Option<&HashSet<String>> {
        self.members.get(key)
    }
}

/// Reverse indices over the current item set. Rebuilt wholesale, never patched.
#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    item_ids: HashSet<String>,
    work_orders: GroupIndex,
    sales_orders: GroupIndex,
}

impl RelationIndex {
    pub fn build(items: &[ScheduleItem]) -> Self {
        let mut index = Self::default();
        for item in items {
            if !index.item_ids.insert(item.id.clone()) {
                tracing::warn!(id = %item.id, "duplicate schedule item id, keeping first");
                continue;
            }
            if let Some(wo) = item.work_order.as_deref().filter(|k| !k.is_empty()) {
                index.work_orders.insert(&item.id, wo);
            }
            if let Some(so) = item.sales_order.as_deref().filter(|k| !k.is_empty()) {
                index.sales_orders.insert(&item.id, so);
            }
        }
        index
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.item_ids.contains(item_id)
    }

    pub fn group(&self, mode: HighlightMode) -> Option<&GroupIndex> {
        match mode {
            HighlightMode::None => None,
            HighlightMode::WorkOrder => Some(&self.work_orders),
            HighlightMode::SalesOrder => Some(&self.sales_orders),
        }
    }

    /// Items highlighted for `selection`, or `None` when nothing is
    /// highlighted (no selection, mode `None`, or a stale selected id).
    pub fn highlighted(&self, selection: &SelectionState) -> Option<HashSet<String>> {
        let selected = selection.selected.as_deref()?;
        let group = self.group(selection.mode)?;
        if !self.contains(selected) {
            return None;
        }
        let mut set: HashSet<String> = group
            .key_of(selected)
            .and_then(|key| group.members(key))
            .cloned()
            .unwrap_or_default();
        set.insert(selected.to_string());
        Some(set)
    }
}

/// The selected item and which relation it highlights.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected: Option<String>,
    pub mode: HighlightMode,
}

impl SelectionState {
    /// Select a new item, or cycle work order -> sales order -> cleared when
    /// the selected item is clicked again.
    pub fn click(&mut self, item_id: &str) {
        if self.selected.as_deref() != Some(item_id) {
            self.selected = Some(item_id.to_string());
            self.mode = HighlightMode::WorkOrder;
            return;
        }
        match self.mode {
            HighlightMode::WorkOrder => self.mode = HighlightMode::SalesOrder,
            HighlightMode::SalesOrder => self.clear(),
            HighlightMode::None => self.mode = HighlightMode::WorkOrder,
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.mode = HighlightMode::None;
    }
}

/// Items to keep at full emphasis. `ids == None` means no highlight is
/// active and everything renders normally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlight {
    ids: Option<HashSet<String>>,
}

impl Highlight {
    pub fn resolve(index: &RelationIndex, selection: &SelectionState) -> Self {
        Self {
            ids: index.highlighted(selection),
        }
    }

    pub fn is_active(&self) -> bool {
        self.ids.is_some()
    }

    /// Whether `item_id` is emphasized (always true with no active highlight).
    pub fn includes(&self, item_id: &str) -> bool {
        self.ids.as_ref().map_or(true, |ids| ids.contains(item_id))
    }

    pub fn ids(&self) -> Option<&HashSet<String>> {
        self.ids.as_ref()
    }
}
