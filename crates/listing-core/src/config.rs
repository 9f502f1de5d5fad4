//! Configuration for the capture engine and the aggregation store.
//!
//! Selectors are configuration, not logic: swapping a selector changes where
//! a field is read from, never how it is read.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// URL fragment that marks the listing creation flow.
pub const DEFAULT_CREATION_PATH: &str = "/products/create";

/// Minimum spacing between two extraction passes, in milliseconds.
pub const DEFAULT_UPDATE_DELAY_MS: u64 = 500;

/// URL scheme of locally generated, not-yet-uploaded images.
pub const DEFAULT_BLOB_SCHEME: &str = "blob:";

/// Destinations tracked on every new listing record.
pub const DEFAULT_DESTINATIONS: [&str; 2] = ["facebook", "ebay"];

/// One selector per structural listing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorMap {
    /// Title input. Read unscoped, outside the per-listing form fields.
    pub title: String,
    /// Description textarea.
    pub description: String,
    /// Price input.
    pub price: String,
    /// Size custom-select root.
    pub size: String,
    /// Uploaded product image marker.
    pub images: String,
    /// Condition custom-select root.
    pub condition: String,
    /// Category custom-select root.
    pub category: String,
}

impl Default for SelectorMap {
    fn default() -> Self {
        Self {
            title: r#"[name="title"]"#.to_owned(),
            description: r#"[data-testid="description__input"]"#.to_owned(),
            price: r#"[data-testid="price__input"]"#.to_owned(),
            size: r#"[data-testid="createProductSizes__sizeRow0__size"]"#.to_owned(),
            images: r#"img[alt="Uploaded Product"][src^="blob:"]"#.to_owned(),
            condition: r#"[data-testid="listingSelect__listing__condition"]"#.to_owned(),
            category: r#"[data-testid="listingCategories__category"]"#.to_owned(),
        }
    }
}

/// Capture engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// URL fragment that activates the engine.
    pub creation_path: String,
    /// Throttle window in milliseconds.
    pub update_delay_ms: u64,
    /// Scheme an image source must start with to be captured.
    pub blob_scheme: String,
    /// Field selectors.
    pub selectors: SelectorMap,
}

impl CaptureConfig {
    /// The throttle window as a time delta.
    #[must_use]
    pub fn update_delay(&self) -> TimeDelta {
        TimeDelta::milliseconds(i64::try_from(self.update_delay_ms).unwrap_or(i64::MAX))
    }

    /// Whether `url` is inside the listing creation flow.
    #[must_use]
    pub fn in_creation_flow(&self, url: &str) -> bool {
        url.contains(&self.creation_path)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            creation_path: DEFAULT_CREATION_PATH.to_owned(),
            update_delay_ms: DEFAULT_UPDATE_DELAY_MS,
            blob_scheme: DEFAULT_BLOB_SCHEME.to_owned(),
            selectors: SelectorMap::default(),
        }
    }
}

/// Aggregation store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// URL fragment that keeps the current listing session alive.
    pub creation_path: String,
    /// Destinations given a `pending` status on each new record.
    pub destinations: Vec<String>,
}

impl AggregationConfig {
    /// Whether `url` is inside the listing creation flow.
    #[must_use]
    pub fn in_creation_flow(&self, url: &str) -> bool {
        url.contains(&self.creation_path)
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            creation_path: DEFAULT_CREATION_PATH.to_owned(),
            destinations: DEFAULT_DESTINATIONS.iter().map(|d| (*d).to_owned()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capture_config_uses_half_second_window() {
        let config = CaptureConfig::default();
        assert_eq!(config.update_delay(), TimeDelta::milliseconds(500));
        assert!(config.in_creation_flow("https://www.depop.com/products/create/"));
        assert!(!config.in_creation_flow("https://www.depop.com/products/edit/1"));
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: CaptureConfig =
            serde_json::from_value(serde_json::json!({ "update_delay_ms": 250 })).unwrap();

        assert_eq!(config.update_delay_ms, 250);
        assert_eq!(config.creation_path, DEFAULT_CREATION_PATH);
        assert_eq!(config.selectors, SelectorMap::default());
    }

    #[test]
    fn test_default_aggregation_config_tracks_two_destinations() {
        let config = AggregationConfig::default();
        assert_eq!(config.destinations, vec!["facebook", "ebay"]);
    }
}
