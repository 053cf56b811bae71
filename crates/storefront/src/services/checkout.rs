//! Order placement.
//!
//! Checkout never trusts prices from the client: every line is re-priced
//! from the database, totals are computed in cents, stock is reserved
//! transactionally, and only then is the hosted payment created. If payment
//! creation fails the order is cancelled and its stock returned.

use rust_decimal::Decimal;
use rand::Rng;

use valroux_core::{Cents, CountryCode, CustomerId, OrderTotals, PaymentStatus, subtotal_cents};

use crate::db::orders::{NewOrder, NewOrderItem, OrderRepository};
use crate::db::{CartRepository, ProductRepository, VatRateRepository};
use crate::error::{AppError, Result};
use crate::models::{Order, ShippingAddress, ShippingSelection};
use crate::state::AppState;

use valroux_core::CartId;

/// Characters used in order numbers; ambiguous glyphs (0/O, 1/I) left out.
const ORDER_NUMBER_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Checkout request after route-level validation.
#[derive(Debug)]
pub struct CheckoutInput {
    pub customer_id: Option<CustomerId>,
    pub email: String,
    pub address: ShippingAddress,
    pub company_name: Option<String>,
    pub vat_number: Option<String>,
    pub shipping: ShippingSelection,
}

/// What the frontend needs to continue: order reference and where to send
/// the customer to pay.
#[derive(Debug)]
pub struct CheckoutOutcome {
    pub order_number: String,
    pub total_cents: i64,
    pub checkout_url: String,
}

/// The domestic (BE) VAT rate, used when no rate is configured for the
/// destination country.
fn domestic_vat_rate() -> Decimal {
    Decimal::new(2100, 2)
}

/// Place an order from the session cart.
///
/// # Errors
///
/// - `AppError::Validation` for an empty cart or unavailable wines
/// - `AppError::Conflict` when stock is insufficient
/// - `AppError::Payment` when the payment provider rejects the payment
///   (stock has been restored by then)
pub async fn place_order(
    state: &AppState,
    cart_id: CartId,
    input: CheckoutInput,
) -> Result<CheckoutOutcome> {
    let carts = CartRepository::new(state.pool().clone());
    let products = ProductRepository::new(state.pool().clone());
    let orders = OrderRepository::new(state.pool().clone());
    let vat_rates = VatRateRepository::new(state.pool().clone());

    let lines = carts.get_lines(cart_id).await?;
    if lines.is_empty() {
        return Err(AppError::validation("Cart is empty"));
    }

    // Re-price from the database, never from the cart view or the client
    let ids: Vec<_> = lines.iter().map(|l| l.product_id).collect();
    let catalog = products.get_by_ids(&ids).await?;

    let mut items = Vec::with_capacity(lines.len());
    for line in &lines {
        let Some(product) = catalog.iter().find(|p| p.id == line.product_id) else {
            return Err(AppError::validation(format!(
                "{} is no longer available",
                line.name
            )));
        };
        if !product.visible {
            return Err(AppError::validation(format!(
                "{} is no longer available",
                product.name
            )));
        }

        let line_total = product.price
            * Decimal::from(line.quantity);
        items.push(NewOrderItem {
            product_id: product.id,
            product_name: product.name.clone(),
            vintage: product.vintage,
            unit_price: product.price,
            unit_price_cents: Cents::from_decimal_euros(product.price)
                .map_err(|e| AppError::Internal(e.to_string()))?,
            quantity: line.quantity,
            total_cents: Cents::from_decimal_euros(line_total)
                .map_err(|e| AppError::Internal(e.to_string()))?,
        });
    }

    let subtotal = subtotal_cents(
        items
            .iter()
            .map(|i| (i.unit_price, u32::try_from(i.quantity).unwrap_or(0))),
    )
    .map_err(|e| AppError::Internal(e.to_string()))?;

    let country = CountryCode::parse(&input.address.country)
        .map_err(|e| AppError::validation(e.to_string()))?;
    let vat_rate = vat_rates
        .rate_for_country(&country)
        .await?
        .unwrap_or_else(domestic_vat_rate);

    let shipping = Cents::new(input.shipping.price_cents);
    let totals = OrderTotals::compute(subtotal, shipping, vat_rate)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let order_number = generate_order_number();
    let order = orders
        .create(NewOrder {
            order_number: order_number.clone(),
            customer_id: input.customer_id,
            email: input.email.clone(),
            currency: "EUR".to_string(),
            subtotal_cents: totals.subtotal,
            shipping_cents: totals.shipping,
            vat_rate,
            vat_cents: totals.vat,
            total_cents: totals.total,
            shipping_carrier: input.shipping.carrier.clone(),
            shipping_method_name: input.shipping.name.clone(),
            shipping_method_id: input.shipping.id.clone(),
            address: input.address,
            company_name: input.company_name,
            vat_number: input.vat_number,
            items,
        })
        .await?;

    let checkout_url = create_payment(state, &orders, &order).await?;

    carts.clear(cart_id).await?;

    tracing::info!(
        order_number = %order.order_number,
        total_cents = order.total_cents.value(),
        "Order placed"
    );

    Ok(CheckoutOutcome {
        order_number: order.order_number,
        total_cents: order.total_cents.value(),
        checkout_url,
    })
}

/// Create the hosted payment; on failure, cancel the order and return its
/// stock before surfacing the error.
async fn create_payment(
    state: &AppState,
    orders: &OrderRepository,
    order: &Order,
) -> Result<String> {
    let base_url = state.config().base_url.trim_end_matches('/');
    let redirect_url = format!("{base_url}/checkout/complete?order={}", order.order_number);
    let webhook_url = format!("{base_url}/api/webhooks/payment");
    let description = format!("Valroux order {}", order.order_number);

    let created = match state
        .mollie()
        .create_payment(
            order.total_cents,
            &description,
            &order.order_number,
            &redirect_url,
            &webhook_url,
        )
        .await
    {
        Ok(created) => created,
        Err(err) => {
            tracing::error!(
                order_number = %order.order_number,
                error = %err,
                "Payment creation failed; cancelling order"
            );
            orders
                .cancel_and_restore_stock(order.id, PaymentStatus::Failed)
                .await?;
            return Err(AppError::Payment(err));
        }
    };

    orders.set_payment_id(order.id, &created.id).await?;
    Ok(created.checkout_url)
}

/// Generate a `VLX-XXXXXX` order number.
#[allow(clippy::indexing_slicing)] // index bounded by the alphabet length
fn generate_order_number() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..6)
        .map(|_| {
            let i = rng.random_range(0..ORDER_NUMBER_ALPHABET.len());
            ORDER_NUMBER_ALPHABET[i] as char
        })
        .collect();
    format!("VLX-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_shape() {
        let number = generate_order_number();
        assert_eq!(number.len(), 10);
        assert!(number.starts_with("VLX-"));
        assert!(
            number[4..]
                .bytes()
                .all(|b| ORDER_NUMBER_ALPHABET.contains(&b))
        );
    }

    #[test]
    fn test_order_numbers_vary() {
        let a = generate_order_number();
        let b = generate_order_number();
        let c = generate_order_number();
        assert!(a != b || b != c);
    }
}
