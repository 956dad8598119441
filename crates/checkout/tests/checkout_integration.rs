//! Integration tests for batch checkout against in-memory resources.

use std::sync::Arc;

use async_trait::async_trait;
use cart::{CartService, CartStore};
use checkout::{CartSession, CheckoutError, CheckoutOrchestrator, ItemStatus, RefreshStatus};
use chrono::NaiveDate;
use common::{
    CartItem, CartItemId, DocumentId, Money, NewTransaction, TransactionRecord, UserIdentity,
};
use resources::{
    InMemoryCartResource, InMemoryTransactionResource, StaticIdentity, TransactionResource,
};
use tokio::sync::Notify;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn item(id: u64, name: &str, cents: i64, quantity: u32) -> CartItem {
    CartItem::new(id, format!("doc-{id}"), name, quantity, Money::from_cents(cents))
        .with_user("alice")
        .with_branch("Downtown")
}

async fn loaded_store(carts: &InMemoryCartResource) -> CartStore {
    let mut store = CartStore::new();
    CartService::new(carts.clone())
        .load(&mut store, &UserIdentity::new("alice"))
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn test_create_failure_does_not_abort_batch() {
    let carts = InMemoryCartResource::with_items(vec![
        item(1, "Latte", 450, 1),
        item(2, "Scone", 300, 2),
        item(3, "Bagel", 275, 1),
    ]);
    let transactions = InMemoryTransactionResource::new();
    transactions.fail_create_for("Scone").await;
    let orchestrator =
        CheckoutOrchestrator::new(carts.clone(), transactions.clone()).with_clock(day);

    let mut store = loaded_store(&carts).await;
    store.select_all();
    let report = orchestrator.checkout(&mut store).await.unwrap();

    assert_eq!(report.processed(), 3);
    assert_eq!(report.success_count(), 2);
    assert_eq!(report.failure_count(), 1);
    assert!(matches!(report.outcomes[1].status, ItemStatus::CreateFailed { .. }));
    assert_eq!(report.inconsistent().count(), 0);

    // Only the failed item survives, remotely and locally, and stays selected.
    assert_eq!(carts.item_count().await, 1);
    assert!(carts.contains(&DocumentId::new("doc-2")).await);
    assert_eq!(store.len(), 1);
    assert!(store.selection().contains(CartItemId::new(2)));
    assert_eq!(transactions.record_count().await, 2);
    assert_eq!(transactions.create_calls().await, 3);
}

#[tokio::test]
async fn test_items_processed_in_cart_order() {
    let carts = InMemoryCartResource::with_items(vec![
        item(7, "Latte", 450, 1),
        item(3, "Scone", 300, 1),
        item(5, "Bagel", 275, 1),
    ]);
    let transactions = InMemoryTransactionResource::new();
    let orchestrator =
        CheckoutOrchestrator::new(carts.clone(), transactions.clone()).with_clock(day);

    let mut store = loaded_store(&carts).await;
    store.select_all();
    let report = orchestrator.checkout(&mut store).await.unwrap();

    let order: Vec<u64> = report.outcomes.iter().map(|o| o.item_id.get()).collect();
    assert_eq!(order, vec![7, 3, 5]);
    let products: Vec<String> = transactions
        .records()
        .await
        .into_iter()
        .map(|r| r.details.product_name)
        .collect();
    assert_eq!(products, vec!["Latte", "Scone", "Bagel"]);
}

#[tokio::test]
async fn test_empty_selection_makes_no_remote_calls() {
    let carts = InMemoryCartResource::with_items(vec![item(1, "Latte", 450, 1)]);
    let transactions = InMemoryTransactionResource::new();
    let orchestrator = CheckoutOrchestrator::new(carts.clone(), transactions.clone());

    let mut store = loaded_store(&carts).await;
    let report = orchestrator.checkout(&mut store).await.unwrap();

    assert_eq!(report.processed(), 0);
    assert!(!report.requires_refresh());
    // The single list call comes from loading the store.
    assert_eq!(carts.call_counts().await, (1, 0));
    assert_eq!(transactions.create_calls().await, 0);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_delete_failure_is_reported_as_inconsistent() {
    let carts =
        InMemoryCartResource::with_items(vec![item(1, "Latte", 450, 2), item(2, "Scone", 300, 1)]);
    carts.fail_delete_of("doc-1").await;
    let transactions = InMemoryTransactionResource::new();
    let orchestrator =
        CheckoutOrchestrator::new(carts.clone(), transactions.clone()).with_clock(day);

    let mut store = loaded_store(&carts).await;
    store.select_all();
    let report = orchestrator.checkout(&mut store).await.unwrap();

    match &report.outcomes[0].status {
        ItemStatus::DeleteFailed { transaction, .. } => {
            assert_eq!(transaction.details.total, Money::from_cents(900));
        }
        other => panic!("expected DeleteFailed, got {other:?}"),
    }
    assert!(report.outcomes[1].status.is_success());

    let inconsistent: Vec<CartItemId> = report.inconsistent().map(|o| o.item_id).collect();
    assert_eq!(inconsistent, vec![CartItemId::new(1)]);
    assert_eq!(transactions.record_count().await, 2);
    assert!(carts.contains(&DocumentId::new("doc-1")).await);
    assert!(store.contains(CartItemId::new(1)));
    assert!(report.summary().contains("1 recorded but still in cart"));
}

#[tokio::test]
async fn test_recorded_transaction_fields() {
    let carts = InMemoryCartResource::with_items(vec![item(1, "Latte", 1000, 2)]);
    let transactions = InMemoryTransactionResource::new();
    let orchestrator =
        CheckoutOrchestrator::new(carts.clone(), transactions.clone()).with_clock(day);

    let mut store = loaded_store(&carts).await;
    store.select_all();
    assert_eq!(store.selected_total(), Money::from_cents(2000));
    orchestrator.checkout(&mut store).await.unwrap();

    let record = &transactions.records().await[0];
    assert_eq!(record.details.product_name, "Latte");
    assert_eq!(record.details.quantity, 2);
    assert_eq!(record.details.total, Money::from_cents(2000));
    assert_eq!(record.details.customer_name, "alice");
    assert_eq!(record.details.branch_name.as_deref(), Some("Downtown"));
    assert_eq!(record.details.date, day());
}

/// Transaction resource that parks inside `create` until released.
#[derive(Clone)]
struct GatedTransactions {
    inner: InMemoryTransactionResource,
    entered: Arc<Notify>,
    gate: Arc<Notify>,
}

#[async_trait]
impl TransactionResource for GatedTransactions {
    async fn create(&self, transaction: NewTransaction) -> resources::Result<TransactionRecord> {
        self.entered.notify_one();
        self.gate.notified().await;
        self.inner.create(transaction).await
    }
}

#[tokio::test]
async fn test_overlapping_checkout_is_rejected() {
    let carts = InMemoryCartResource::with_items(vec![item(1, "Latte", 450, 1)]);
    let gated = GatedTransactions {
        inner: InMemoryTransactionResource::new(),
        entered: Arc::new(Notify::new()),
        gate: Arc::new(Notify::new()),
    };
    let orchestrator = CheckoutOrchestrator::new(carts.clone(), gated.clone());

    let mut first_store = loaded_store(&carts).await;
    first_store.select_all();
    let mut second_store = loaded_store(&carts).await;
    second_store.select_all();

    let (first, second) = tokio::join!(orchestrator.checkout(&mut first_store), async {
        gated.entered.notified().await;
        assert!(orchestrator.is_in_flight());
        let result = orchestrator.checkout(&mut second_store).await;
        gated.gate.notify_one();
        result
    });

    assert!(matches!(second, Err(CheckoutError::AlreadyInFlight)));
    assert_eq!(first.unwrap().success_count(), 1);
    assert!(!orchestrator.is_in_flight());
    assert_eq!(gated.inner.create_calls().await, 1);
}

#[tokio::test]
async fn test_session_checkout_reloads_cart() {
    let carts =
        InMemoryCartResource::with_items(vec![item(1, "Latte", 450, 1), item(2, "Scone", 300, 1)]);
    let transactions = InMemoryTransactionResource::new();
    transactions.fail_create_for("Scone").await;
    let mut session = CartSession::new(carts.clone(), transactions, StaticIdentity::new("alice"))
        .with_clock(day);
    session.refresh().await.unwrap();
    session.select_all();

    // Another client adds to the cart while the batch is pending.
    carts.insert(item(3, "Bagel", 275, 1)).await;
    let report = session.checkout().await.unwrap();

    assert_eq!(report.refresh, RefreshStatus::Reloaded { items: 2 });
    let ids: Vec<u64> = session.items().iter().map(|i| i.id.get()).collect();
    assert_eq!(ids, vec![2, 3]);
    assert!(session.store().selection().contains(CartItemId::new(2)));
    assert!(!session.store().selection().all_selected());
}

#[tokio::test]
async fn test_session_refresh_failure_is_recorded() {
    let carts = InMemoryCartResource::with_items(vec![item(1, "Latte", 450, 1)]);
    let mut session = CartSession::new(
        carts.clone(),
        InMemoryTransactionResource::new(),
        StaticIdentity::new("alice"),
    );
    session.refresh().await.unwrap();
    session.select_all();

    carts.set_fail_on_list(true).await;
    let report = session.checkout().await.unwrap();

    assert_eq!(report.success_count(), 1);
    assert!(matches!(report.refresh, RefreshStatus::Failed { .. }));
    assert!(session.items().is_empty());
}

#[tokio::test]
async fn test_session_checkout_requires_identity() {
    let carts = InMemoryCartResource::with_items(vec![item(1, "Latte", 450, 1)]);
    let transactions = InMemoryTransactionResource::new();
    let mut session =
        CartSession::new(carts.clone(), transactions.clone(), StaticIdentity::anonymous());

    let result = session.checkout().await;

    assert!(matches!(result, Err(CheckoutError::Identity(_))));
    assert_eq!(transactions.create_calls().await, 0);
    assert_eq!(carts.call_counts().await, (0, 0));
}

#[tokio::test]
async fn test_session_remove_item() {
    let carts =
        InMemoryCartResource::with_items(vec![item(1, "Latte", 450, 1), item(2, "Scone", 300, 1)]);
    let mut session = CartSession::new(
        carts.clone(),
        InMemoryTransactionResource::new(),
        StaticIdentity::new("alice"),
    );
    session.refresh().await.unwrap();
    session.toggle(CartItemId::new(1)).unwrap();

    let removed = session.remove_item(CartItemId::new(1)).await.unwrap();

    assert_eq!(removed.product_name, "Latte");
    assert!(session.store().selection().is_empty());
    assert_eq!(session.selected_total(), Money::zero());
    assert_eq!(carts.item_count().await, 1);
}
