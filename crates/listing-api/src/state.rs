//! Shared application state.

use std::sync::Arc;

use listing_aggregation::AggregationStore;
use tokio::sync::Mutex;

/// Application state shared across all request handlers.
///
/// The aggregation store sits behind one async mutex, so requests are
/// applied one at a time in arrival order.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The aggregation store.
    pub store: Arc<Mutex<AggregationStore>>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(store: AggregationStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use listing_aggregation::AggregationStore;
    use listing_core::config::AggregationConfig;
    use listing_core::storage::KeyValueStore;
    use listing_test_support::{FixedClock, MockRng};

    use super::AppState;

    /// State over `kv` with a fixed clock and an all-zero id suffix.
    pub(crate) fn state_with(kv: Arc<dyn KeyValueStore>) -> AppState {
        let clock = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        ));
        AppState::new(AggregationStore::new(
            AggregationConfig::default(),
            clock,
            Box::new(MockRng),
            kv,
        ))
    }
}
