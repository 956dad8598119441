//! Per-item outcomes and the terminal checkout report.

use chrono::{DateTime, Utc};
use common::{CartItemId, CheckoutId, TransactionRecord};
use serde::Serialize;

/// Result of processing one selected cart item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemStatus {
    /// The transaction was recorded and the cart item deleted.
    Success { transaction: TransactionRecord },

    /// The transaction could not be created. The item is untouched in the
    /// cart and stays selected.
    CreateFailed { reason: String },

    /// The transaction was recorded but the cart item could not be deleted.
    ///
    /// The item persists remotely and locally, so a later checkout would
    /// record it again. This state is recoverable but must be surfaced.
    DeleteFailed {
        reason: String,
        transaction: TransactionRecord,
    },
}

impl ItemStatus {
    /// Returns true for [`ItemStatus::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, ItemStatus::Success { .. })
    }

    /// Returns the transaction record, if one was created.
    pub fn transaction(&self) -> Option<&TransactionRecord> {
        match self {
            ItemStatus::Success { transaction } | ItemStatus::DeleteFailed { transaction, .. } => {
                Some(transaction)
            }
            ItemStatus::CreateFailed { .. } => None,
        }
    }

    /// Short label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Success { .. } => "success",
            ItemStatus::CreateFailed { .. } => "create_failed",
            ItemStatus::DeleteFailed { .. } => "delete_failed",
        }
    }
}

/// Outcome of one item, in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemOutcome {
    pub item_id: CartItemId,
    pub product_name: String,
    #[serde(flatten)]
    pub status: ItemStatus,
}

/// What happened to the local cart view after the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RefreshStatus {
    /// No refresh was attempted by the caller.
    #[default]
    NotRequested,

    /// Nothing was processed, so nothing could have drifted.
    Skipped,

    /// The cart was reloaded from the remote resource.
    Reloaded { items: usize },

    /// The reload failed; the local view may be stale.
    Failed { reason: String },
}

/// Terminal summary of a checkout batch.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReport {
    pub checkout_id: CheckoutId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<ItemOutcome>,
    pub refresh: RefreshStatus,
}

impl CheckoutReport {
    pub(crate) fn new(
        checkout_id: CheckoutId,
        started_at: DateTime<Utc>,
        outcomes: Vec<ItemOutcome>,
    ) -> Self {
        Self {
            checkout_id,
            started_at,
            finished_at: Utc::now(),
            outcomes,
            refresh: RefreshStatus::NotRequested,
        }
    }

    /// Number of items the batch attempted.
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of items fully checked out.
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_success()).count()
    }

    /// Number of items with any failure.
    pub fn failure_count(&self) -> usize {
        self.processed() - self.success_count()
    }

    /// Items whose transaction exists while the cart item survived.
    pub fn inconsistent(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, ItemStatus::DeleteFailed { .. }))
    }

    /// All transaction records created by the batch.
    pub fn transactions(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.outcomes.iter().filter_map(|o| o.status.transaction())
    }

    /// True when the local view may differ from the server and must be
    /// reloaded.
    pub fn requires_refresh(&self) -> bool {
        self.processed() > 0
    }

    /// One-line message for presentation.
    pub fn summary(&self) -> String {
        if self.processed() == 0 {
            return "Nothing selected: 0 items processed".to_string();
        }
        if self.failure_count() == 0 {
            return format!("Checkout successful: {} item(s) processed", self.processed());
        }
        let inconsistent = self.inconsistent().count();
        let mut message = format!(
            "Checkout finished: {} succeeded, {} failed",
            self.success_count(),
            self.failure_count()
        );
        if inconsistent > 0 {
            message.push_str(&format!(" ({inconsistent} recorded but still in cart)"));
        }
        message
    }
}
