//! Payment webhook handler.
//!
//! The provider posts form-encoded `id=<payment id>` on every status
//! change. The body is never trusted: the status is re-fetched from the
//! provider before anything is updated.

use axum::{Form, extract::State, http::StatusCode};
use serde::Deserialize;

use valroux_core::OrderStatus;

use crate::db::OrderRepository;
use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PaymentWebhook {
    pub id: String,
}

/// `POST /api/webhooks/payment`
///
/// Returns 200 for every known order so the provider stops retrying;
/// unknown payment ids 404.
pub async fn payment(
    State(state): State<AppState>,
    Form(webhook): Form<PaymentWebhook>,
) -> Result<StatusCode> {
    let orders = OrderRepository::new(state.pool().clone());
    let order = orders.find_by_payment_id(&webhook.id).await?;

    let payment = state.mollie().get_payment(&webhook.id).await?;

    if payment.status.is_terminal_failure() {
        let restored = orders
            .cancel_and_restore_stock(order.id, payment.status)
            .await?;
        tracing::info!(
            order_number = %order.order_number,
            payment_status = %payment.status,
            restored,
            "Payment failed terminally"
        );
        return Ok(StatusCode::OK);
    }

    let next_status = if payment.status == valroux_core::PaymentStatus::Paid
        && order.status == OrderStatus::Pending
    {
        Some(OrderStatus::Paid)
    } else {
        None
    };

    orders
        .update_payment_status(order.id, payment.status, next_status)
        .await?;

    tracing::info!(
        order_number = %order.order_number,
        payment_status = %payment.status,
        "Payment status updated"
    );
    Ok(StatusCode::OK)
}
