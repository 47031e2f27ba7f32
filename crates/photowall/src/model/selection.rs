//! Multi-select state over an ordered item list.
//!
//! [`SelectionModel`] tracks which items of the host's current list are
//! selected, whether the gallery is in selection mode, and the anchor used
//! for shift-click range selection.
//!
//! # Example
//!
//! ```
//! use photowall::model::{ClickModifiers, ItemId, SelectionModel};
//!
//! let mut selection = SelectionModel::new();
//! selection.set_items(["a", "b", "c", "d", "e"].map(ItemId::from).to_vec());
//!
//! selection.toggle(&ItemId::from("a"), ClickModifiers::NONE);
//! selection.toggle(&ItemId::from("d"), ClickModifiers::SHIFT);
//!
//! assert_eq!(selection.selected_ids(), ["a", "b", "c", "d"].map(ItemId::from).to_vec());
//! ```

use std::collections::{HashMap, HashSet};

use photowall_core::Signal;
use photowall_core::logging::targets;

use super::item::{ItemId, Selectable};

/// Whether the gallery is in multi-select mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Clicks open items; nothing is selected.
    #[default]
    Off,
    /// Clicks select items.
    On,
}

/// Keyboard modifiers held during a selection click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl ClickModifiers {
    /// A plain click.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        meta: false,
    };

    /// Shift held: range selection.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Ctrl held: additive selection.
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Cmd (meta) held: additive selection.
    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    /// Whether the click adds to the selection (ctrl or cmd).
    pub fn is_additive(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Payload of [`SelectionModel::selection_changed`].
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChange<T> {
    /// Selected identifiers in item-list order.
    pub selected_ids: Vec<ItemId>,
    /// Selected items in item-list order.
    pub selected_items: Vec<T>,
    /// Number of selected identifiers.
    pub count: usize,
}

/// Manages multi-select state over the host's current item list.
///
/// The selected set is always a subset of the identifiers in the item
/// list: [`set_items`](Self::set_items) prunes identifiers that disappeared
/// and selecting an unknown identifier does nothing.
///
/// # Signals
///
/// - `selection_changed`: emitted after every operation that changed the
///   selected set
/// - `mode_changed`: emitted when selection mode is entered or exited
pub struct SelectionModel<T> {
    mode: SelectionMode,
    items: Vec<T>,
    /// First index of every identifier in `items`.
    index: HashMap<ItemId, usize>,
    selected: HashSet<ItemId>,
    anchor: Option<usize>,

    /// Emitted when the selected set changes.
    pub selection_changed: Signal<SelectionChange<T>>,

    /// Emitted when selection mode changes.
    pub mode_changed: Signal<SelectionMode>,
}

impl<T> Default for SelectionModel<T>
where
    T: Selectable + Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SelectionModel<T>
where
    T: Selectable + Clone + Send + 'static,
{
    /// Creates an empty selection model with selection mode off.
    pub fn new() -> Self {
        Self {
            mode: SelectionMode::Off,
            items: Vec::new(),
            index: HashMap::new(),
            selected: HashSet::new(),
            anchor: None,
            selection_changed: Signal::new(),
            mode_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Replace the item list.
    ///
    /// Selected identifiers missing from the new list are pruned, notifying
    /// listeners only if something was removed. An anchor beyond the new
    /// list is dropped.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.index.clear();
        for (position, item) in self.items.iter().enumerate() {
            self.index.entry(item.item_id()).or_insert(position);
        }

        if self.anchor.is_some_and(|anchor| anchor >= self.items.len()) {
            self.anchor = None;
        }

        let before = self.selected.len();
        let index = &self.index;
        self.selected.retain(|id| index.contains_key(id));
        let pruned = before - self.selected.len();

        if pruned > 0 {
            tracing::debug!(target: targets::SELECTION, pruned, "pruned stale selection");
            self.notify();
        }
    }

    /// The current item list.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    // =========================================================================
    // Mode
    // =========================================================================

    /// Current selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Whether selection mode is on.
    pub fn is_selection_mode(&self) -> bool {
        self.mode == SelectionMode::On
    }

    /// Turn selection mode on, keeping the current selection.
    pub fn enter_selection_mode(&mut self) {
        self.set_mode(SelectionMode::On);
    }

    /// Turn selection mode off, clearing the selection and the anchor.
    pub fn exit_selection_mode(&mut self) {
        self.set_mode(SelectionMode::Off);
        self.deselect_all();
    }

    /// Flip selection mode.
    pub fn toggle_selection_mode(&mut self) {
        match self.mode {
            SelectionMode::On => self.exit_selection_mode(),
            SelectionMode::Off => self.enter_selection_mode(),
        }
    }

    fn set_mode(&mut self, mode: SelectionMode) {
        if self.mode != mode {
            tracing::debug!(target: targets::SELECTION, ?mode, "selection mode changed");
            self.mode = mode;
            self.mode_changed.emit(mode);
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether an item is selected.
    pub fn is_selected(&self, item: &impl Selectable) -> bool {
        self.selected.contains(&item.item_id())
    }

    /// Whether anything is selected.
    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Number of selected identifiers.
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Whether every item in a non-empty list is selected.
    pub fn is_all_selected(&self) -> bool {
        !self.index.is_empty() && self.selected.len() == self.index.len()
    }

    /// Selected identifiers in item-list order.
    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .enumerate()
            .map(|(position, item)| (position, item.item_id()))
            .filter(|(position, id)| {
                self.index.get(id) == Some(position) && self.selected.contains(id)
            })
            .map(|(_, id)| id)
            .collect()
    }

    /// Selected items in item-list order.
    ///
    /// An identifier listed more than once contributes only its first
    /// item, matching [`selected_ids`](Self::selected_ids).
    pub fn selected_items(&self) -> Vec<T> {
        self.items
            .iter()
            .enumerate()
            .filter(|(position, item)| {
                let id = item.item_id();
                self.index.get(&id) == Some(position) && self.selected.contains(&id)
            })
            .map(|(_, item)| item.clone())
            .collect()
    }

    /// Index of the item that anchors range selection.
    pub fn anchor_index(&self) -> Option<usize> {
        self.anchor
    }

    // =========================================================================
    // Click Handling
    // =========================================================================

    /// Handle a selection click on an item.
    ///
    /// Shift extends from the anchor, ctrl/cmd adds, and a plain click flips
    /// the item. Returns whether the selected set changed.
    pub fn toggle(&mut self, item: &impl Selectable, modifiers: ClickModifiers) -> bool {
        if modifiers.shift {
            self.toggle_range(item)
        } else if modifiers.is_additive() {
            self.toggle_additive(item)
        } else {
            self.toggle_single(item)
        }
    }

    /// Plain click: flip the item and make it the anchor.
    ///
    /// Clicking an item that is not in the list does nothing.
    pub fn toggle_single(&mut self, item: &impl Selectable) -> bool {
        let id = item.item_id();
        let Some(position) = self.index.get(&id).copied() else {
            return false;
        };
        self.flip(id, position)
    }

    /// Ctrl/cmd click: flip the item within the existing selection.
    pub fn toggle_additive(&mut self, item: &impl Selectable) -> bool {
        let id = item.item_id();
        let Some(position) = self.index.get(&id).copied() else {
            return false;
        };
        self.flip(id, position)
    }

    /// Shift click: add every item between the anchor and this one.
    ///
    /// Without an anchor this behaves like a plain click.
    pub fn toggle_range(&mut self, item: &impl Selectable) -> bool {
        let id = item.item_id();
        let Some(position) = self.index.get(&id).copied() else {
            return false;
        };
        let Some(anchor) = self.anchor else {
            return self.flip(id, position);
        };

        let (start, end) = (anchor.min(position), anchor.max(position));
        let mut added = 0;
        for item in &self.items[start..=end] {
            if self.selected.insert(item.item_id()) {
                added += 1;
            }
        }
        self.anchor = Some(position);

        tracing::debug!(target: targets::SELECTION, start, end, added, "range selected");
        if added > 0 {
            self.notify();
        }
        added > 0
    }

    fn flip(&mut self, id: ItemId, position: usize) -> bool {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        self.anchor = Some(position);
        self.notify();
        true
    }

    // =========================================================================
    // Set Operations
    // =========================================================================

    /// Select one item. Unknown or already selected items are ignored.
    pub fn select(&mut self, item: &impl Selectable) -> bool {
        let id = item.item_id();
        if !self.index.contains_key(&id) || !self.selected.insert(id) {
            return false;
        }
        self.notify();
        true
    }

    /// Deselect one item.
    pub fn deselect(&mut self, item: &impl Selectable) -> bool {
        if !self.selected.remove(&item.item_id()) {
            return false;
        }
        self.notify();
        true
    }

    /// Select several items at once, notifying at most once.
    pub fn select_multiple<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator,
        I::Item: Selectable,
    {
        let mut changed = false;
        for item in items {
            let id = item.item_id();
            if self.index.contains_key(&id) {
                changed |= self.selected.insert(id);
            }
        }
        if changed {
            self.notify();
        }
        changed
    }

    /// Deselect several items at once, notifying at most once.
    pub fn deselect_multiple<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator,
        I::Item: Selectable,
    {
        let mut changed = false;
        for item in items {
            changed |= self.selected.remove(&item.item_id());
        }
        if changed {
            self.notify();
        }
        changed
    }

    /// Select every item in the list.
    pub fn select_all(&mut self) -> bool {
        let before = self.selected.len();
        self.selected.extend(self.index.keys().cloned());
        let changed = self.selected.len() != before;
        if changed {
            self.notify();
        }
        changed
    }

    /// Clear the selection and the anchor.
    pub fn deselect_all(&mut self) -> bool {
        self.anchor = None;
        if self.selected.is_empty() {
            return false;
        }
        self.selected.clear();
        self.notify();
        true
    }

    /// Select everything, or clear if everything is already selected.
    pub fn toggle_select_all(&mut self) -> bool {
        if self.is_all_selected() {
            self.deselect_all()
        } else {
            self.select_all()
        }
    }

    /// Replace the selection with its complement within the item list.
    pub fn invert_selection(&mut self) -> bool {
        let inverted: HashSet<ItemId> = self
            .index
            .keys()
            .filter(|id| !self.selected.contains(*id))
            .cloned()
            .collect();
        if inverted == self.selected {
            return false;
        }
        self.selected = inverted;
        self.notify();
        true
    }

    /// Drop the item list, the selection and the anchor, and leave
    /// selection mode. No signal is emitted.
    pub fn reset(&mut self) {
        self.selected.clear();
        self.anchor = None;
        self.mode = SelectionMode::Off;
        self.items.clear();
        self.index.clear();
    }

    fn notify(&self) {
        let selected_ids = self.selected_ids();
        let count = selected_ids.len();
        tracing::debug!(target: targets::SELECTION, count, "selection changed");
        self.selection_changed.emit(SelectionChange {
            selected_ids,
            selected_items: self.selected_items(),
            count,
        });
    }
}
