//! Selection set and the selection controller operations.

use std::collections::BTreeSet;

use common::CartItemId;

use crate::error::CartError;
use crate::store::CartStore;

/// The cart item IDs currently marked for checkout.
///
/// Also tracks whether every item of the cart is selected, which drives the
/// bulk "select all" affordance. The flag is recomputed from the full ID set
/// after every mutation, never flipped on its own. An empty cart is never
/// "all selected".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<CartItemId>,
    all_selected: bool,
}

impl SelectionSet {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `item_id` is selected.
    pub fn contains(&self, item_id: CartItemId) -> bool {
        self.ids.contains(&item_id)
    }

    /// Returns the number of selected items.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates over the selected IDs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = CartItemId> + '_ {
        self.ids.iter().copied()
    }

    /// Returns true if the selection equals the cart's full ID set.
    pub fn all_selected(&self) -> bool {
        self.all_selected
    }

    fn toggle(&mut self, item_id: CartItemId) -> bool {
        if self.ids.remove(&item_id) {
            false
        } else {
            self.ids.insert(item_id);
            true
        }
    }

    pub(crate) fn retain_present(&mut self, present: &[CartItemId]) {
        self.ids.retain(|id| present.contains(id));
    }

    pub(crate) fn sync_flag(&mut self, all_ids: &[CartItemId]) {
        self.all_selected = !all_ids.is_empty()
            && self.ids.len() == all_ids.len()
            && all_ids.iter().all(|id| self.ids.contains(id));
    }
}

impl FromIterator<CartItemId> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = CartItemId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
            all_selected: false,
        }
    }
}

/// Selection controller: every operation re-asserts the selection invariants
/// against the store's current collection.
impl CartStore {
    /// Flips the selection of one item and returns whether it is now selected.
    ///
    /// Items that are not in the store cannot be selected.
    pub fn toggle(&mut self, item_id: CartItemId) -> Result<bool, CartError> {
        self.require(item_id)?;
        let selected = self.selection.toggle(item_id);
        self.reconcile_selection();
        Ok(selected)
    }

    /// Selects every item in the store.
    pub fn select_all(&mut self) {
        self.selection = self.ids().collect();
        self.reconcile_selection();
    }

    /// Clears the selection.
    pub fn clear_all(&mut self) {
        self.selection = SelectionSet::new();
        self.reconcile_selection();
    }

    /// Bulk toggle: clears when everything is selected, otherwise selects all.
    ///
    /// Returns the resulting "all selected" flag.
    pub fn toggle_all(&mut self) -> bool {
        if self.selection.all_selected() {
            self.clear_all();
        } else {
            self.select_all();
        }
        self.selection.all_selected()
    }
}
