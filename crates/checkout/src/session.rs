//! Caller-facing cart session.

use cart::{CartService, CartStore};
use chrono::NaiveDate;
use common::{CartItem, CartItemId, Money, UserIdentity};
use resources::{CartResource, IdentityProvider, TransactionResource};

use crate::error::{CheckoutError, Result};
use crate::orchestrator::CheckoutOrchestrator;
use crate::outcome::{CheckoutReport, RefreshStatus};

/// One user's view of their cart: the store, its selection controller, the
/// remote operations and checkout, behind a single handle.
pub struct CartSession<C, T, I>
where
    C: CartResource + Clone,
    T: TransactionResource,
    I: IdentityProvider,
{
    identity: I,
    service: CartService<C>,
    orchestrator: CheckoutOrchestrator<C, T>,
    store: CartStore,
}

impl<C, T, I> CartSession<C, T, I>
where
    C: CartResource + Clone,
    T: TransactionResource,
    I: IdentityProvider,
{
    /// Creates a session with an empty store. Call [`refresh`](Self::refresh)
    /// to populate it.
    pub fn new(carts: C, transactions: T, identity: I) -> Self {
        Self {
            identity,
            service: CartService::new(carts.clone()),
            orchestrator: CheckoutOrchestrator::new(carts, transactions),
            store: CartStore::new(),
        }
    }

    /// Overrides the listing page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.service = self.service.with_page_size(page_size);
        self
    }

    /// Replaces the source of the transaction date.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.orchestrator = self.orchestrator.with_clock(clock);
        self
    }

    fn user(&self) -> Result<UserIdentity> {
        self.identity
            .current_user()
            .map_err(CheckoutError::Identity)
    }

    /// Reloads the cart of the current user.
    pub async fn refresh(&mut self) -> Result<&[CartItem]> {
        let user = self.user()?;
        Ok(self.service.load(&mut self.store, &user).await?)
    }

    /// Returns the store.
    pub fn store(&self) -> &CartStore {
        &self.store
    }

    /// Returns the items in cart order.
    pub fn items(&self) -> &[CartItem] {
        self.store.items()
    }

    /// Flips the selection of one item.
    pub fn toggle(&mut self, item_id: CartItemId) -> Result<bool> {
        Ok(self.store.toggle(item_id)?)
    }

    /// Selects every item.
    pub fn select_all(&mut self) {
        self.store.select_all();
    }

    /// Clears the selection.
    pub fn clear_all(&mut self) {
        self.store.clear_all();
    }

    /// Bulk toggle; returns the resulting "all selected" flag.
    pub fn toggle_all(&mut self) -> bool {
        self.store.toggle_all()
    }

    /// Total of the selected items.
    pub fn selected_total(&self) -> Money {
        self.store.selected_total()
    }

    /// Deletes one item remotely and locally.
    pub async fn remove_item(&mut self, item_id: CartItemId) -> Result<CartItem> {
        Ok(self.service.remove_item(&mut self.store, item_id).await?)
    }

    /// Checks out the selected items, then reloads the cart if anything was
    /// processed.
    ///
    /// The identity is resolved before any remote write, so an unknown user
    /// fails the whole batch up front. A failed reload is recorded in the
    /// report instead of discarding it.
    #[tracing::instrument(skip(self))]
    pub async fn checkout(&mut self) -> Result<CheckoutReport> {
        let user = self.user()?;
        let mut report = self.orchestrator.checkout(&mut self.store).await?;

        report.refresh = if report.requires_refresh() {
            match self.service.load(&mut self.store, &user).await {
                Ok(items) => RefreshStatus::Reloaded { items: items.len() },
                Err(e) => {
                    tracing::warn!(error = %e, "cart refresh after checkout failed");
                    RefreshStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            }
        } else {
            RefreshStatus::Skipped
        };

        Ok(report)
    }
}
