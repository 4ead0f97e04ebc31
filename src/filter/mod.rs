//! Hierarchical filter selection and its reconciliation.
//!
//! The selection is a path through the region → variable → item hierarchy.
//! After every change the path is reconciled top-down: a variable that no
//! longer exists under the selected region is replaced by the first one that
//! does, and likewise for the item. Resets only ever flow downstream, so a
//! single pass reaches the fixed point.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::derive::{item_options, region_options, variable_options};
use crate::store::DataStore;

/// The current selection at each hierarchy level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    /// Selected region.
    pub selected_region: String,
    /// Selected variable; always offered under `selected_region`, or empty.
    pub selected_variable: String,
    /// Selected item; always offered under region and variable, or empty.
    pub selected_item: String,
}

/// A level of the selection hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Top level, independent.
    Region,
    /// Depends on region.
    Variable,
    /// Depends on region and variable; a leaf.
    Item,
}

impl Level {
    /// All levels, top-down.
    pub const ALL: [Level; 3] = [Level::Region, Level::Variable, Level::Item];

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Region => "Region",
            Self::Variable => "Variable",
            Self::Item => "Item",
        }
    }
}

/// A user-driven selection change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    /// Choose a region.
    SelectRegion(String),
    /// Choose a variable under the current region.
    SelectVariable(String),
    /// Choose an item under the current region and variable.
    SelectItem(String),
}

impl FilterEvent {
    /// Build the event that selects `value` at `level`.
    #[must_use]
    pub fn select(level: Level, value: impl Into<String>) -> Self {
        match level {
            Level::Region => Self::SelectRegion(value.into()),
            Level::Variable => Self::SelectVariable(value.into()),
            Level::Item => Self::SelectItem(value.into()),
        }
    }
}

impl FilterState {
    /// Selection right after load: the dimensions of the first record.
    #[must_use]
    pub fn initial(store: &DataStore) -> Self {
        store
            .first()
            .map(|first| Self {
                selected_region: first.region.clone(),
                selected_variable: first.variable.clone(),
                selected_item: first.item.clone(),
            })
            .unwrap_or_default()
    }

    /// Current value at a level.
    #[must_use]
    pub fn get(&self, level: Level) -> &str {
        match level {
            Level::Region => &self.selected_region,
            Level::Variable => &self.selected_variable,
            Level::Item => &self.selected_item,
        }
    }

    /// Values selectable at a level given the levels above it.
    #[must_use]
    pub fn options(&self, store: &DataStore, level: Level) -> Vec<String> {
        match level {
            Level::Region => region_options(store),
            Level::Variable => variable_options(store, &self.selected_region),
            Level::Item => item_options(store, &self.selected_region, &self.selected_variable),
        }
    }

    /// Whether the hierarchy membership invariant holds against `store`.
    #[must_use]
    pub fn is_consistent(&self, store: &DataStore) -> bool {
        let member_or_empty = |options: Vec<String>, value: &str| {
            if options.is_empty() {
                value.is_empty()
            } else {
                options.iter().any(|option| option == value)
            }
        };
        member_or_empty(self.options(store, Level::Variable), &self.selected_variable)
            && member_or_empty(self.options(store, Level::Item), &self.selected_item)
    }

    /// Snapshot as the assistant context.
    #[must_use]
    pub fn context(&self) -> crate::model::ChatContext {
        crate::model::ChatContext {
            region: self.selected_region.clone(),
            variable: self.selected_variable.clone(),
            item: self.selected_item.clone(),
        }
    }

    fn reconcile_variable(&mut self, store: &DataStore) {
        let options = variable_options(store, &self.selected_region);
        if !options.contains(&self.selected_variable) {
            let replacement = options.into_iter().next().unwrap_or_default();
            debug!(from = %self.selected_variable, to = %replacement, "variable reset");
            self.selected_variable = replacement;
        }
    }

    fn reconcile_item(&mut self, store: &DataStore) {
        let options = item_options(store, &self.selected_region, &self.selected_variable);
        if !options.contains(&self.selected_item) {
            let replacement = options.into_iter().next().unwrap_or_default();
            debug!(from = %self.selected_item, to = %replacement, "item reset");
            self.selected_item = replacement;
        }
    }
}

/// Apply one selection change and reconcile everything below it.
///
/// Region is free; variable and item values that are not currently offered
/// are ignored and leave the state unchanged.
#[must_use]
pub fn reduce(state: &FilterState, store: &DataStore, event: FilterEvent) -> FilterState {
    let mut next = state.clone();
    match event {
        FilterEvent::SelectRegion(region) => {
            next.selected_region = region;
            next.reconcile_variable(store);
            next.reconcile_item(store);
        }
        FilterEvent::SelectVariable(variable) => {
            if !variable_options(store, &next.selected_region).contains(&variable) {
                debug!(%variable, "ignoring variable not offered under region");
                return next;
            }
            next.selected_variable = variable;
            next.reconcile_item(store);
        }
        FilterEvent::SelectItem(item) => {
            if !item_options(store, &next.selected_region, &next.selected_variable).contains(&item) {
                debug!(%item, "ignoring item not offered under variable");
                return next;
            }
            next.selected_item = item;
        }
    }
    next
}

/// The event that moves the selection at `level` one option forward or back,
/// wrapping at either end. `None` when the level has no options.
#[must_use]
pub fn cycle(state: &FilterState, store: &DataStore, level: Level, forward: bool) -> Option<FilterEvent> {
    let options = state.options(store, level);
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    let target = match options.iter().position(|o| o == state.get(level)) {
        Some(current) if forward => (current + 1) % len,
        Some(current) => (current + len - 1) % len,
        None => 0,
    };
    options
        .into_iter()
        .nth(target)
        .map(|value| FilterEvent::select(level, value))
}
