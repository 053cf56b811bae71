//! Ad-catalog batch API types.

use serde::{Deserialize, Serialize};

/// Batch method for one catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemMethod {
    Update,
    Delete,
}

/// One request inside an `items_batch` call.
#[derive(Debug, Clone, Serialize)]
pub struct ItemRequest {
    pub method: ItemMethod,
    pub data: ItemData,
}

/// Catalog item fields. For DELETE only `id` matters; the remaining fields
/// are skipped when empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemData {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

/// Request body for `POST /{catalog_id}/items_batch`.
#[derive(Debug, Serialize)]
pub struct ItemsBatchRequest<'a> {
    pub item_type: &'static str,
    pub requests: &'a [ItemRequest],
}

/// Response body for `POST /{catalog_id}/items_batch`.
#[derive(Debug, Deserialize)]
pub struct ItemsBatchResponse {
    #[serde(default)]
    pub handles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&ItemMethod::Update).unwrap(),
            "\"UPDATE\""
        );
        assert_eq!(
            serde_json::to_string(&ItemMethod::Delete).unwrap(),
            "\"DELETE\""
        );
    }

    #[test]
    fn test_delete_item_serializes_id_only() {
        let request = ItemRequest {
            method: ItemMethod::Delete,
            data: ItemData {
                id: "42".to_string(),
                ..ItemData::default()
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["method"], "DELETE");
        assert_eq!(json["data"]["id"], "42");
        assert!(json["data"].get("title").is_none());
    }
}
