//! Checkout orchestrator: selected cart items into transaction records.

use cart::CartStore;
use chrono::{NaiveDate, Utc};
use common::{CartItem, CheckoutId, NewTransaction};
use resources::{CartResource, TransactionResource};

use crate::error::CheckoutError;
use crate::latch::InFlightLatch;
use crate::outcome::{CheckoutReport, ItemOutcome, ItemStatus};

type Clock = Box<dyn Fn() -> NaiveDate + Send + Sync>;

/// Converts the selected items of a [`CartStore`] into transaction records.
///
/// Items are processed strictly one after another, in the store's insertion
/// order, over a snapshot of the selection taken when the batch starts. For
/// each item the transaction is created first and the cart item deleted
/// second; a failure at either step is recorded and the batch moves on.
pub struct CheckoutOrchestrator<C, T>
where
    C: CartResource,
    T: TransactionResource,
{
    carts: C,
    transactions: T,
    clock: Clock,
    latch: InFlightLatch,
}

impl<C, T> CheckoutOrchestrator<C, T>
where
    C: CartResource,
    T: TransactionResource,
{
    /// Creates an orchestrator dating transactions with the current UTC day.
    pub fn new(carts: C, transactions: T) -> Self {
        Self {
            carts,
            transactions,
            clock: Box::new(|| Utc::now().date_naive()),
            latch: InFlightLatch::new(),
        }
    }

    /// Replaces the source of the transaction date.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Returns true while a batch is running.
    pub fn is_in_flight(&self) -> bool {
        self.latch.is_held()
    }

    /// Checks out every selected item of `store`.
    ///
    /// Successfully processed items are removed from the store. Per-item
    /// failures are reported in the returned [`CheckoutReport`]; the only
    /// error is an overlapping call. An empty selection makes no remote call.
    ///
    /// The caller must reload the store afterwards when
    /// [`CheckoutReport::requires_refresh`] is true.
    #[tracing::instrument(skip(self, store), fields(checkout_id = tracing::field::Empty))]
    pub async fn checkout(&self, store: &mut CartStore) -> Result<CheckoutReport, CheckoutError> {
        let _guard = self
            .latch
            .try_acquire()
            .ok_or(CheckoutError::AlreadyInFlight)?;

        let checkout_id = CheckoutId::new();
        tracing::Span::current().record("checkout_id", tracing::field::display(checkout_id));
        metrics::counter!("checkout_batches_total").increment(1);
        let started_at = Utc::now();
        let timer = std::time::Instant::now();

        let batch = store.selected_items();
        let date = (self.clock)();
        tracing::info!(items = batch.len(), %date, "checkout started");

        let mut outcomes = Vec::with_capacity(batch.len());
        for item in &batch {
            let status = self.process_item(store, item, date).await;
            metrics::counter!("checkout_items_total", "outcome" => status.label()).increment(1);
            outcomes.push(ItemOutcome {
                item_id: item.id,
                product_name: item.product_name.clone(),
                status,
            });
        }

        let report = CheckoutReport::new(checkout_id, started_at, outcomes);
        metrics::histogram!("checkout_duration_seconds").record(timer.elapsed().as_secs_f64());
        tracing::info!(
            processed = report.processed(),
            succeeded = report.success_count(),
            failed = report.failure_count(),
            "checkout complete"
        );
        Ok(report)
    }

    /// Runs create-then-delete for one item and reconciles the store.
    async fn process_item(
        &self,
        store: &mut CartStore,
        item: &CartItem,
        date: NaiveDate,
    ) -> ItemStatus {
        if item.checked_line_total().is_none() {
            tracing::warn!(item_id = %item.id, "line total overflows, item skipped");
            return ItemStatus::CreateFailed {
                reason: format!("line total of {} x {} overflows", item.quantity, item.price),
            };
        }
        let payload = NewTransaction::from_cart_item(item, date);

        let transaction = match self.transactions.create(payload).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(item_id = %item.id, error = %e, "transaction create failed");
                return ItemStatus::CreateFailed {
                    reason: e.to_string(),
                };
            }
        };

        match self.carts.delete(&item.document_id).await {
            Ok(()) => {
                store.remove(item.id);
                tracing::debug!(
                    item_id = %item.id,
                    transaction_id = transaction.id,
                    "item checked out"
                );
                ItemStatus::Success { transaction }
            }
            Err(e) => {
                tracing::warn!(
                    item_id = %item.id,
                    document_id = %item.document_id,
                    transaction_id = transaction.id,
                    error = %e,
                    "transaction recorded but cart item could not be deleted"
                );
                ItemStatus::DeleteFailed {
                    reason: e.to_string(),
                    transaction,
                }
            }
        }
    }
}
