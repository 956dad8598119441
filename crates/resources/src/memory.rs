use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use common::{CartItem, DocumentId, NewTransaction, TransactionRecord, UserIdentity};
use tokio::sync::RwLock;

use crate::{
    ResourceError, Result,
    resource::{CartResource, TransactionResource},
};

#[derive(Debug, Default)]
struct CartState {
    items: Vec<CartItem>,
    fail_on_list: bool,
    fail_delete: HashSet<DocumentId>,
    list_calls: usize,
    delete_calls: usize,
}

/// In-memory cart resource for testing.
///
/// Items keep insertion order. Failures can be injected per operation, and
/// every call is counted so tests can assert that no request was made.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartResource {
    state: Arc<RwLock<CartState>>,
}

impl InMemoryCartResource {
    /// Creates an empty cart resource.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cart resource holding `items`.
    pub fn with_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let state = CartState {
            items: items.into_iter().collect(),
            ..CartState::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Appends an item, as a prior "add to cart" action would.
    pub async fn insert(&self, item: CartItem) {
        self.state.write().await.items.push(item);
    }

    /// Configures every listing to fail.
    pub async fn set_fail_on_list(&self, fail: bool) {
        self.state.write().await.fail_on_list = fail;
    }

    /// Configures deletion of `document_id` to fail.
    pub async fn fail_delete_of(&self, document_id: impl Into<DocumentId>) {
        self.state
            .write()
            .await
            .fail_delete
            .insert(document_id.into());
    }

    /// Returns true if an item with the given document ID is stored.
    pub async fn contains(&self, document_id: &DocumentId) -> bool {
        self.state
            .read()
            .await
            .items
            .iter()
            .any(|i| &i.document_id == document_id)
    }

    /// Returns the number of stored items.
    pub async fn item_count(&self) -> usize {
        self.state.read().await.items.len()
    }

    /// Returns the number of list and delete calls received so far.
    pub async fn call_counts(&self) -> (usize, usize) {
        let state = self.state.read().await;
        (state.list_calls, state.delete_calls)
    }
}

#[async_trait]
impl CartResource for InMemoryCartResource {
    async fn list(&self, user: &UserIdentity, limit: usize) -> Result<Vec<CartItem>> {
        let mut state = self.state.write().await;
        state.list_calls += 1;

        if state.fail_on_list {
            return Err(ResourceError::Rejected("cart listing unavailable".to_string()));
        }

        Ok(state
            .items
            .iter()
            .filter(|i| i.user_name.as_deref() == Some(user.name()))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn delete(&self, document_id: &DocumentId) -> Result<()> {
        let mut state = self.state.write().await;
        state.delete_calls += 1;

        if state.fail_delete.contains(document_id) {
            return Err(ResourceError::Rejected(format!(
                "cannot delete cart item {document_id}"
            )));
        }

        let before = state.items.len();
        state.items.retain(|i| &i.document_id != document_id);
        if state.items.len() == before {
            return Err(ResourceError::Status {
                status: 404,
                body: format!("cart item {document_id} not found"),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct TransactionState {
    records: Vec<TransactionRecord>,
    next_id: u64,
    fail_create_for: HashSet<String>,
    create_calls: usize,
}

/// In-memory transaction resource for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransactionResource {
    state: Arc<RwLock<TransactionState>>,
}

impl InMemoryTransactionResource {
    /// Creates an empty transaction resource.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures creation to fail for transactions of `product_name`.
    pub async fn fail_create_for(&self, product_name: impl Into<String>) {
        self.state
            .write()
            .await
            .fail_create_for
            .insert(product_name.into());
    }

    /// Returns all persisted records in creation order.
    pub async fn records(&self) -> Vec<TransactionRecord> {
        self.state.read().await.records.clone()
    }

    /// Returns the number of persisted records.
    pub async fn record_count(&self) -> usize {
        self.state.read().await.records.len()
    }

    /// Returns the number of create calls received so far.
    pub async fn create_calls(&self) -> usize {
        self.state.read().await.create_calls
    }
}

#[async_trait]
impl TransactionResource for InMemoryTransactionResource {
    async fn create(&self, transaction: NewTransaction) -> Result<TransactionRecord> {
        let mut state = self.state.write().await;
        state.create_calls += 1;

        if state.fail_create_for.contains(&transaction.product_name) {
            return Err(ResourceError::Rejected(format!(
                "transaction for {} refused",
                transaction.product_name
            )));
        }

        state.next_id += 1;
        let record = TransactionRecord {
            id: state.next_id,
            document_id: Some(DocumentId::new(format!("TX-{:04}", state.next_id))),
            details: transaction,
        };
        state.records.push(record.clone());
        Ok(record)
    }
}
