//! Cart error types.

use common::CartItemId;
use resources::ResourceError;
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Listing the cart failed; the store was left untouched.
    #[error("Failed to fetch cart items: {0}")]
    Fetch(#[source] ResourceError),

    /// Removing an item from the remote cart failed.
    #[error("Failed to delete cart item {item_id}: {source}")]
    Delete {
        item_id: CartItemId,
        #[source]
        source: ResourceError,
    },

    /// The item is not in the store.
    #[error("Cart item not found: {0}")]
    ItemNotFound(CartItemId),

    /// A listed record violates the cart item invariants.
    #[error("Invalid cart item {item_id}: {reason}")]
    InvalidItem { item_id: CartItemId, reason: String },
}

/// Convenience type alias for cart results.
pub type Result<T> = std::result::Result<T, CartError>;
