use async_trait::async_trait;
use common::{CartItem, DocumentId, NewTransaction, TransactionRecord, UserIdentity};

use crate::Result;

/// The remote collection of cart items.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait CartResource: Send + Sync {
    /// Lists the cart items owned by `user`, asking for at most `limit` records.
    ///
    /// The filter is an equality match on the item's `user_name`. Items are
    /// returned in the order the resource stores them.
    async fn list(&self, user: &UserIdentity, limit: usize) -> Result<Vec<CartItem>>;

    /// Deletes one cart item by its remote document ID.
    async fn delete(&self, document_id: &DocumentId) -> Result<()>;
}

/// The remote collection of transaction records.
#[async_trait]
pub trait TransactionResource: Send + Sync {
    /// Persists a new transaction record and returns it as stored.
    async fn create(&self, transaction: NewTransaction) -> Result<TransactionRecord>;
}
