//! Shipping label creation and tracking lookup.

use tracing::{info, instrument};

use valroux_core::OrderId;

use crate::db::AdminOrderRepository;
use crate::error::{AppError, Result};
use crate::models::Order;
use crate::sendcloud::{
    CreateParcelRequest, NewParcel, ShipmentMethod, ShippingClient, TrackingInfo,
};

/// Service that buys labels from the shipping aggregator.
#[derive(Debug, Clone)]
pub struct LabelService {
    orders: AdminOrderRepository,
    client: Option<ShippingClient>,
}

impl LabelService {
    pub const fn new(orders: AdminOrderRepository, client: Option<ShippingClient>) -> Self {
        Self { orders, client }
    }

    /// Create a parcel with a label for an order and persist the result.
    ///
    /// # Errors
    ///
    /// - `Conflict` when the order already has a label.
    /// - `BadGateway` when the aggregator is unconfigured or fails; there is
    ///   no fallback for labels.
    #[instrument(skip(self))]
    pub async fn create_label(&self, order_id: OrderId) -> Result<Order> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| AppError::BadGateway("shipping aggregator not configured".to_string()))?;

        let order = self.orders.get(order_id).await?;
        if order.label_id.is_some() {
            return Err(AppError::Conflict(
                "order already has a shipping label".to_string(),
            ));
        }

        let weight_grams = self.orders.weight_grams(order_id).await?;
        let request = parcel_request(&order, weight_grams);

        let parcel = client
            .create_parcel(&request)
            .await
            .map_err(|e| AppError::BadGateway(e.to_string()))?;

        let tracking_number = parcel.tracking_number.as_deref().unwrap_or_default();
        let updated = self
            .orders
            .set_label(
                order_id,
                parcel.id,
                tracking_number,
                parcel.tracking_url.as_deref(),
            )
            .await?;

        info!(
            order_number = %updated.order_number,
            parcel_id = parcel.id,
            "Shipping label created"
        );

        Ok(updated)
    }

    /// Look up tracking history for a parcel.
    #[instrument(skip(self))]
    pub async fn tracking(&self, tracking_number: &str) -> Result<TrackingInfo> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| AppError::BadGateway("shipping aggregator not configured".to_string()))?;

        client
            .tracking(tracking_number)
            .await
            .map_err(|e| AppError::BadGateway(e.to_string()))
    }
}

/// Build the parcel payload from the order snapshot. The aggregator wants
/// weight in kilograms as a decimal string.
fn parcel_request(order: &Order, weight_grams: i64) -> CreateParcelRequest {
    let shipment = order
        .shipping_method_id
        .parse::<i64>()
        .ok()
        .map(|id| ShipmentMethod { id });

    CreateParcelRequest {
        parcel: NewParcel {
            name: order.ship_to_name.clone(),
            company_name: order.company_name.clone(),
            address: order.ship_to_street.clone(),
            house_number: order.ship_to_house_number.clone(),
            city: order.ship_to_city.clone(),
            postal_code: order.ship_to_postal_code.clone(),
            country: order.ship_to_country.clone(),
            email: order.email.clone(),
            telephone: order.phone.clone(),
            weight: format_weight_kg(weight_grams),
            order_number: order.order_number.clone(),
            request_label: true,
            shipment,
        },
    }
}

fn format_weight_kg(grams: i64) -> String {
    format!("{}.{:03}", grams.div_euclid(1000), grams.rem_euclid(1000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_formatting() {
        assert_eq!(format_weight_kg(1300), "1.300");
        assert_eq!(format_weight_kg(2600), "2.600");
        assert_eq!(format_weight_kg(950), "0.950");
        assert_eq!(format_weight_kg(1005), "1.005");
    }
}
