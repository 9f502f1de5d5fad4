//! Listing schema shared by the capture engine and the aggregation store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One atomic read of the listing form.
///
/// A snapshot has no identity; each one supersedes the previous one in full.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSnapshot {
    /// Listing title, read from an unscoped `name="title"` field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-text description.
    pub description: String,
    /// Asking price; `0` when absent or unparsable.
    pub price: f64,
    /// Locally generated blob references of uploaded images, in page order.
    pub images: Vec<String>,
    /// Selected item condition.
    pub condition: String,
    /// Selected size.
    pub size: String,
    /// Selected category.
    pub category: String,
}

/// Publish state of a listing on one destination marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishState {
    /// Not yet attempted.
    Pending,
    /// Published successfully.
    Posted,
    /// Publishing failed.
    Failed,
}

impl PublishState {
    /// Whether a status may move from `self` to `next`.
    ///
    /// Only `pending` can move, and only forward. Staying put is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self == next || matches!((self, next), (Self::Pending, Self::Posted | Self::Failed))
    }
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Posted => "posted",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}
