//! Command implementations over a [`CartSession`].
//!
//! Every command reloads the cart first, so it acts on the server's current
//! view, and renders its result as text or JSON.

use std::collections::BTreeSet;

use checkout::{CartSession, ItemStatus, RefreshStatus};
use common::{CartItem, CartItemId};
use resources::{CartResource, IdentityProvider, TransactionResource};

use crate::error::Result;

/// Rendered result of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub text: String,
    /// False when the command finished but some part of it failed.
    pub success: bool,
}

impl Output {
    fn ok(text: String) -> Self {
        Self { text, success: true }
    }
}

/// Which cart items a command applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub all: bool,
    pub items: Vec<CartItemId>,
}

impl Selection {
    fn apply<C, T, I>(&self, session: &mut CartSession<C, T, I>) -> Result<()>
    where
        C: CartResource + Clone,
        T: TransactionResource,
        I: IdentityProvider,
    {
        if self.all {
            session.select_all();
            return Ok(());
        }
        let unique: BTreeSet<CartItemId> = self.items.iter().copied().collect();
        for id in unique {
            session.toggle(id)?;
        }
        Ok(())
    }
}

fn render_item(item: &CartItem) -> String {
    format!(
        "{:>6}  {:<28} {:>4} x {:>9} = {:>10}",
        item.id.to_string(),
        item.product_name,
        item.quantity,
        item.price.to_string(),
        item.line_total().to_string()
    )
}

/// Lists the current user's cart.
pub async fn list<C, T, I>(session: &mut CartSession<C, T, I>, json: bool) -> Result<Output>
where
    C: CartResource + Clone,
    T: TransactionResource,
    I: IdentityProvider,
{
    let items = session.refresh().await?;
    if json {
        return Ok(Output::ok(serde_json::to_string_pretty(items)?));
    }
    if items.is_empty() {
        return Ok(Output::ok("Cart is empty".to_string()));
    }
    let mut lines: Vec<String> = items.iter().map(render_item).collect();
    lines.push(format!("{} item(s)", items.len()));
    Ok(Output::ok(lines.join("\n")))
}

/// Prints the total of the selected items.
pub async fn total<C, T, I>(
    session: &mut CartSession<C, T, I>,
    selection: &Selection,
    json: bool,
) -> Result<Output>
where
    C: CartResource + Clone,
    T: TransactionResource,
    I: IdentityProvider,
{
    session.refresh().await?;
    selection.apply(session)?;
    let total = session.selected_total();
    let count = session.store().selection().len();

    let text = if json {
        serde_json::to_string_pretty(&serde_json::json!({
            "selected": count,
            "total": total,
        }))?
    } else {
        format!("{count} item(s) selected, total {total}")
    };
    Ok(Output::ok(text))
}

/// Removes one item from the cart.
pub async fn remove<C, T, I>(
    session: &mut CartSession<C, T, I>,
    item_id: CartItemId,
) -> Result<Output>
where
    C: CartResource + Clone,
    T: TransactionResource,
    I: IdentityProvider,
{
    session.refresh().await?;
    let removed = session.remove_item(item_id).await?;
    Ok(Output::ok(format!(
        "Removed {} ({})",
        removed.product_name, removed.id
    )))
}

/// Checks out the selected items.
///
/// The output is unsuccessful when any item failed or the cart could not be
/// reloaded afterwards.
pub async fn checkout<C, T, I>(
    session: &mut CartSession<C, T, I>,
    selection: &Selection,
    json: bool,
) -> Result<Output>
where
    C: CartResource + Clone,
    T: TransactionResource,
    I: IdentityProvider,
{
    session.refresh().await?;
    selection.apply(session)?;
    let report = session.checkout().await?;

    let success =
        report.failure_count() == 0 && !matches!(report.refresh, RefreshStatus::Failed { .. });

    if json {
        return Ok(Output {
            text: serde_json::to_string_pretty(&report)?,
            success,
        });
    }

    let mut lines = vec![report.summary()];
    for outcome in &report.outcomes {
        let line = match &outcome.status {
            ItemStatus::Success { transaction } => format!(
                "  ok      {} {} -> transaction {}",
                outcome.item_id, outcome.product_name, transaction.id
            ),
            ItemStatus::CreateFailed { reason } => format!(
                "  failed  {} {}: {reason}",
                outcome.item_id, outcome.product_name
            ),
            ItemStatus::DeleteFailed {
                reason,
                transaction,
            } => format!(
                "  stale   {} {}: recorded as transaction {} but not removed from cart: {reason}",
                outcome.item_id, outcome.product_name, transaction.id
            ),
        };
        lines.push(line);
    }
    if let RefreshStatus::Failed { reason } = &report.refresh {
        lines.push(format!("Cart could not be reloaded: {reason}"));
    }

    Ok(Output {
        text: lines.join("\n"),
        success,
    })
}
