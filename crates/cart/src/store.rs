//! Locally held view of the remote cart.

use common::{CartItem, CartItemId, Money};

use crate::error::CartError;
use crate::selection::SelectionSet;

/// The in-memory cart: fetched items in remote order plus the selection.
///
/// The store exclusively owns both for the lifetime of the view. Every
/// mutation of the item collection prunes the selection and recomputes the
/// "all selected" flag, so the selection never refers to an item that is no
/// longer here.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    items: Vec<CartItem>,
    pub(crate) selection: SelectionSet,
}

impl CartStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Returns the item with the given ID.
    pub fn get(&self, item_id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Returns true if an item with the given ID is present.
    pub fn contains(&self, item_id: CartItemId) -> bool {
        self.get(item_id).is_some()
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the IDs of all items, in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = CartItemId> + '_ {
        self.items.iter().map(|i| i.id)
    }

    /// Returns the current selection.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Replaces the whole collection, keeping the selection for items that
    /// are still present.
    pub fn replace(&mut self, items: Vec<CartItem>) {
        self.items = items;
        self.reconcile_selection();
    }

    /// Removes one item from the local collection and from the selection.
    ///
    /// Purely local: the remote item is not touched.
    pub fn remove(&mut self, item_id: CartItemId) -> Option<CartItem> {
        let index = self.items.iter().position(|i| i.id == item_id)?;
        let removed = self.items.remove(index);
        self.reconcile_selection();
        Some(removed)
    }

    /// Sums `price * quantity` over the items whose ID is in `selection`.
    ///
    /// Computed on every call; nothing is cached.
    pub fn total_for_selection(&self, selection: &SelectionSet) -> Money {
        self.items
            .iter()
            .filter(|i| selection.contains(i.id))
            .map(CartItem::line_total)
            .sum()
    }

    /// Total of the store's own selection.
    pub fn selected_total(&self) -> Money {
        self.total_for_selection(&self.selection)
    }

    /// Snapshot of the selected items, in insertion order.
    pub fn selected_items(&self) -> Vec<CartItem> {
        self.items
            .iter()
            .filter(|i| self.selection.contains(i.id))
            .cloned()
            .collect()
    }

    /// Returns an error unless the item is present.
    pub(crate) fn require(&self, item_id: CartItemId) -> Result<&CartItem, CartError> {
        self.get(item_id).ok_or(CartError::ItemNotFound(item_id))
    }

    pub(crate) fn reconcile_selection(&mut self) {
        let present: Vec<CartItemId> = self.ids().collect();
        self.selection.retain_present(&present);
        self.selection.sync_flag(&present);
    }
}
