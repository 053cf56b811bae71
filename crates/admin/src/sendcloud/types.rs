//! Aggregator API request and response types.

use serde::{Deserialize, Serialize};

/// Request body for `POST /v2/parcels`.
#[derive(Debug, Serialize)]
pub struct CreateParcelRequest {
    pub parcel: NewParcel,
}

/// Parcel data sent to the aggregator. Weight is in kilograms as a decimal
/// string (their convention), everything else is taken from the order
/// snapshot verbatim.
#[derive(Debug, Serialize)]
pub struct NewParcel {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    pub weight: String,
    pub order_number: String,
    pub request_label: bool,
    /// Aggregator method id. Absent for orders placed against fallback
    /// rates; the aggregator then applies its configured default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipment: Option<ShipmentMethod>,
}

/// Shipping method reference on a parcel.
#[derive(Debug, Serialize)]
pub struct ShipmentMethod {
    pub id: i64,
}

/// Response envelope for `POST /v2/parcels`.
#[derive(Debug, Deserialize)]
pub struct ParcelResponse {
    pub parcel: Parcel,
}

/// A created parcel.
#[derive(Debug, Deserialize)]
pub struct Parcel {
    pub id: i64,
    pub tracking_number: Option<String>,
    pub tracking_url: Option<String>,
    #[serde(default)]
    pub status: Option<ParcelStatus>,
    #[serde(default)]
    pub label: Option<ParcelLabel>,
}

/// Parcel status as reported by the aggregator.
#[derive(Debug, Deserialize)]
pub struct ParcelStatus {
    pub id: i64,
    pub message: String,
}

/// Label download links for a parcel.
#[derive(Debug, Deserialize)]
pub struct ParcelLabel {
    #[serde(default)]
    pub label_printer: Option<String>,
    #[serde(default)]
    pub normal_printer: Vec<String>,
}

/// Response for `GET /v2/tracking/{tracking_number}`.
#[derive(Debug, Deserialize, Serialize)]
pub struct TrackingInfo {
    #[serde(default)]
    pub expected_delivery_date: Option<String>,
    #[serde(default)]
    pub carrier_code: Option<String>,
    #[serde(default)]
    pub states: Vec<TrackingState>,
}

/// One scan event in a parcel's tracking history.
#[derive(Debug, Deserialize, Serialize)]
pub struct TrackingState {
    pub carrier_message: String,
    #[serde(default)]
    pub carrier_update_timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_parcel_response() {
        let body = r#"{
            "parcel": {
                "id": 4221890,
                "tracking_number": "3SYZXG192833858",
                "tracking_url": "https://tracking.example.com/3SYZXG192833858",
                "status": {"id": 1000, "message": "Ready to send"},
                "label": {
                    "label_printer": "https://panel.sendcloud.sc/api/v2/labels/label_printer/4221890",
                    "normal_printer": ["https://panel.sendcloud.sc/api/v2/labels/normal_printer/4221890"]
                }
            }
        }"#;

        let parsed: ParcelResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.parcel.id, 4_221_890);
        assert_eq!(
            parsed.parcel.tracking_number.as_deref(),
            Some("3SYZXG192833858")
        );
        assert!(parsed.parcel.label.is_some());
    }

    #[test]
    fn test_parse_parcel_without_label_yet() {
        let body = r#"{"parcel": {"id": 99, "tracking_number": null, "tracking_url": null}}"#;
        let parsed: ParcelResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.parcel.id, 99);
        assert!(parsed.parcel.tracking_number.is_none());
        assert!(parsed.parcel.label.is_none());
    }

    #[test]
    fn test_serialize_parcel_request_skips_absent_fields() {
        let request = CreateParcelRequest {
            parcel: NewParcel {
                name: "Anna Peeters".to_string(),
                company_name: None,
                address: "Rue Grande 12".to_string(),
                house_number: None,
                city: "Torgny".to_string(),
                postal_code: "6767".to_string(),
                country: "BE".to_string(),
                email: "anna@example.com".to_string(),
                telephone: None,
                weight: "2.600".to_string(),
                order_number: "VLX-A2B3C4".to_string(),
                request_label: true,
                shipment: Some(ShipmentMethod { id: 8 }),
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        let parcel = json.get("parcel").unwrap();
        assert!(parcel.get("company_name").is_none());
        assert_eq!(parcel["request_label"], serde_json::json!(true));
        assert_eq!(parcel["shipment"]["id"], serde_json::json!(8));
    }
}
