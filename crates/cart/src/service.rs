//! Cart service: fetching the store from the remote cart and removing items.

use common::{CartItem, CartItemId, UserIdentity};
use resources::CartResource;

use crate::error::CartError;
use crate::store::CartStore;

/// Page size requested when listing a cart.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Service connecting a [`CartStore`] to the remote cart resource.
pub struct CartService<C: CartResource> {
    resource: C,
    page_size: usize,
}

impl<C: CartResource> CartService<C> {
    /// Creates a cart service over the given resource.
    pub fn new(resource: C) -> Self {
        Self {
            resource,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the listing page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Returns a reference to the underlying resource.
    pub fn resource(&self) -> &C {
        &self.resource
    }

    /// Fetches the cart of `identity` and replaces the store's collection.
    ///
    /// On failure the store is left exactly as it was. Records that violate
    /// the item invariants are skipped.
    #[tracing::instrument(skip(self, store, identity), fields(user = %identity))]
    pub async fn load<'s>(
        &self,
        store: &'s mut CartStore,
        identity: &UserIdentity,
    ) -> Result<&'s [CartItem], CartError> {
        metrics::counter!("cart_loads_total").increment(1);

        let listed = match self.resource.list(identity, self.page_size).await {
            Ok(items) => items,
            Err(e) => {
                metrics::counter!("cart_load_failures_total").increment(1);
                tracing::warn!(error = %e, "failed to fetch cart items");
                return Err(CartError::Fetch(e));
            }
        };

        let items: Vec<CartItem> = listed
            .into_iter()
            .filter(|item| match validate(item) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping invalid cart item");
                    false
                }
            })
            .collect();

        tracing::info!(count = items.len(), "cart loaded");
        store.replace(items);
        Ok(store.items())
    }

    /// Deletes one item from the remote cart, then from the store.
    ///
    /// If the remote delete fails the store is not modified.
    #[tracing::instrument(skip(self, store))]
    pub async fn remove_item(
        &self,
        store: &mut CartStore,
        item_id: CartItemId,
    ) -> Result<CartItem, CartError> {
        let document_id = store.require(item_id)?.document_id.clone();

        self.resource
            .delete(&document_id)
            .await
            .map_err(|source| CartError::Delete { item_id, source })?;

        store.remove(item_id).ok_or(CartError::ItemNotFound(item_id))
    }
}

/// Checks the invariants of a listed cart item.
pub fn validate(item: &CartItem) -> Result<(), CartError> {
    if item.quantity == 0 {
        return Err(CartError::InvalidItem {
            item_id: item.id,
            reason: "quantity must be greater than 0".to_string(),
        });
    }
    if item.price.is_negative() {
        return Err(CartError::InvalidItem {
            item_id: item.id,
            reason: format!("price {} is negative", item.price),
        });
    }
    if item.checked_line_total().is_none() {
        return Err(CartError::InvalidItem {
            item_id: item.id,
            reason: format!("line total of {} x {} overflows", item.quantity, item.price),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;
    use resources::InMemoryCartResource;
    use rust_decimal::Decimal;

    fn huge_price() -> Money {
        Money::new(Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0))
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        let item = CartItem::new(1, "doc-1", "Widget", 0, Money::from_cents(100));
        assert!(matches!(validate(&item), Err(CartError::InvalidItem { .. })));
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let item = CartItem::new(1, "doc-1", "Widget", 1, Money::from_cents(-100));
        assert!(matches!(validate(&item), Err(CartError::InvalidItem { .. })));
    }

    #[test]
    fn test_validate_accepts_free_items() {
        let item = CartItem::new(1, "doc-1", "Sample", 1, Money::zero());
        assert!(validate(&item).is_ok());
    }

    #[test]
    fn test_validate_rejects_overflowing_line_total() {
        let item = CartItem::new(1, "doc-1", "Bulk", 4_000_000_000, huge_price());
        assert!(matches!(validate(&item), Err(CartError::InvalidItem { .. })));
    }

    #[tokio::test]
    async fn test_load_skips_overflowing_item() {
        let remote = InMemoryCartResource::with_items(vec![
            CartItem::new(1, "doc-1", "Bulk", 4_000_000_000, huge_price()).with_user("alice"),
            CartItem::new(2, "doc-2", "Widget", 2, Money::from_cents(150)).with_user("alice"),
        ]);
        let service = CartService::new(remote);
        let mut store = CartStore::new();

        let items = service
            .load(&mut store, &UserIdentity::new("alice"))
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, CartItemId::new(2));
        store.select_all();
        assert_eq!(store.selected_total(), Money::from_cents(300));
    }
}
