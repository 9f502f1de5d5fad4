//! Messages carried from the capture engine to the aggregation store.

use serde::{Deserialize, Serialize};

use crate::listing::ListingSnapshot;

/// Wire identifier for [`ListingMessage::NewListing`].
pub const NEW_LISTING_MESSAGE_TYPE: &str = "NEW_LISTING";

/// A message on the capture → aggregation channel.
///
/// Serialized as `{ "type": "NEW_LISTING", "data": { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ListingMessage {
    /// A fresh snapshot of the listing form.
    #[serde(rename = "NEW_LISTING")]
    NewListing(ListingSnapshot),
}

impl ListingMessage {
    /// The wire type name for this message.
    #[must_use]
    pub fn message_type(&self) -> &'static str {
        match self {
            Self::NewListing(_) => NEW_LISTING_MESSAGE_TYPE,
        }
    }
}

/// Optional acknowledgement a receiver may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Acknowledgement status.
    pub status: AckStatus,
}

impl Ack {
    /// The `{ "status": "received" }` acknowledgement.
    #[must_use]
    pub fn received() -> Self {
        Self {
            status: AckStatus::Received,
        }
    }
}

/// Acknowledgement status values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckStatus {
    /// The message was accepted for processing.
    Received,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_listing_message_uses_type_and_data_envelope() {
        let message = ListingMessage::NewListing(ListingSnapshot {
            price: 5.0,
            ..ListingSnapshot::default()
        });

        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["type"], "NEW_LISTING");
        assert_eq!(json["data"]["price"], 5.0);
        assert_eq!(message.message_type(), NEW_LISTING_MESSAGE_TYPE);
    }

    #[test]
    fn test_new_listing_message_parses_from_page_payload() {
        let raw = serde_json::json!({
            "type": "NEW_LISTING",
            "data": {
                "title": "",
                "description": "Cord trousers",
                "price": 12.5,
                "images": [],
                "condition": "",
                "size": "30",
                "category": ""
            }
        });

        let message: ListingMessage = serde_json::from_value(raw).unwrap();

        let ListingMessage::NewListing(snapshot) = message;
        assert_eq!(snapshot.description, "Cord trousers");
        assert_eq!(snapshot.size, "30");
    }

    #[test]
    fn test_ack_serializes_as_received() {
        assert_eq!(
            serde_json::to_value(Ack::received()).unwrap(),
            serde_json::json!({ "status": "received" })
        );
    }
}
