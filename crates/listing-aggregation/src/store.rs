//! The aggregation store: the long-lived owner of the session state.

use std::sync::Arc;

use listing_core::clock::Clock;
use listing_core::config::AggregationConfig;
use listing_core::error::DomainError;
use listing_core::listing::{ListingSnapshot, PublishState};
use listing_core::message::{Ack, ListingMessage};
use listing_core::rng::DeterministicRng;
use listing_core::storage::KeyValueStore;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::command_handlers::{self, NavigationOutcome};
use crate::application::query_handlers::{self, ListingView};
use crate::domain::commands::{CaptureSnapshot, CompleteListing, MarkDestination, RecordNavigation};
use crate::domain::session::SessionState;

/// Folds capture messages and navigation into one listing per session.
///
/// Every operation takes `&mut self`, so messages are applied one at a time
/// in arrival order.
pub struct AggregationStore {
    session: SessionState,
    config: AggregationConfig,
    clock: Arc<dyn Clock>,
    rng: Box<dyn DeterministicRng>,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for AggregationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregationStore")
            .field("session", &self.session)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AggregationStore {
    /// Creates a store with no active session.
    #[must_use]
    pub fn new(
        config: AggregationConfig,
        clock: Arc<dyn Clock>,
        rng: Box<dyn DeterministicRng>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            session: SessionState::new(),
            config,
            clock,
            rng,
            store,
        }
    }

    /// Handles a message from the capture engine.
    ///
    /// Always acknowledges. A failed persist is logged and the session is
    /// left as it was; the next snapshot writes the full state again.
    pub async fn on_message(&mut self, message: ListingMessage) -> Ack {
        let message_type = message.message_type();
        match message {
            ListingMessage::NewListing(snapshot) => {
                if let Err(e) = self.on_listing_event(snapshot).await {
                    warn!(message_type, error = %e, "failed to apply listing snapshot");
                }
            }
        }
        Ack::received()
    }

    /// Merges `snapshot` into the current listing, opening one if needed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Persistence` if the record cannot be written.
    pub async fn on_listing_event(
        &mut self,
        snapshot: ListingSnapshot,
    ) -> Result<ListingView, DomainError> {
        let command = CaptureSnapshot {
            correlation_id: Uuid::new_v4(),
            snapshot,
        };
        let result = command_handlers::handle_capture_snapshot(
            &command,
            &mut self.session,
            &self.config,
            self.clock.as_ref(),
            self.rng.as_mut(),
            self.store.as_ref(),
        )
        .await?;
        Ok(ListingView::from(&result.record))
    }

    /// Reports a URL change of the active tab.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for an empty URL, or
    /// `DomainError::Persistence` if the stored record cannot be cleared.
    /// The session is reset regardless.
    pub async fn on_navigation(&mut self, url: &str) -> Result<NavigationOutcome, DomainError> {
        let command = RecordNavigation {
            correlation_id: Uuid::new_v4(),
            url: url.to_owned(),
        };
        command_handlers::handle_record_navigation(
            &command,
            &mut self.session,
            &self.config,
            self.store.as_ref(),
        )
        .await
    }

    /// Moves one destination of the current listing to `state`.
    ///
    /// # Errors
    ///
    /// See [`command_handlers::handle_mark_destination`].
    pub async fn mark_destination(
        &mut self,
        destination: &str,
        state: PublishState,
    ) -> Result<ListingView, DomainError> {
        let command = MarkDestination {
            correlation_id: Uuid::new_v4(),
            destination: destination.to_owned(),
            state,
        };
        let result = command_handlers::handle_mark_destination(
            &command,
            &mut self.session,
            self.clock.as_ref(),
            self.store.as_ref(),
        )
        .await?;
        Ok(ListingView::from(&result.record))
    }

    /// Archives the current listing and ends the session.
    ///
    /// # Errors
    ///
    /// See [`command_handlers::handle_complete_listing`].
    pub async fn complete_listing(&mut self) -> Result<ListingView, DomainError> {
        let command = CompleteListing {
            correlation_id: Uuid::new_v4(),
        };
        let record = command_handlers::handle_complete_listing(
            &command,
            &mut self.session,
            self.store.as_ref(),
        )
        .await?;
        Ok(ListingView::from(&record))
    }

    /// The listing being composed, if a session is active.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ListingNotFound` if no session is active.
    pub fn current_listing(&self) -> Result<ListingView, DomainError> {
        query_handlers::get_current_listing(&self.session)
    }

    /// Every completed listing, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Persistence` if the store cannot be read.
    pub async fn completed_listings(&self) -> Result<Vec<ListingView>, DomainError> {
        query_handlers::list_completed_listings(self.store.as_ref()).await
    }

    /// Applies messages until every sender is dropped, then returns the
    /// store so its final state can be inspected.
    pub async fn run(mut self, mut messages: UnboundedReceiver<ListingMessage>) -> Self {
        let mut handled = 0_usize;
        while let Some(message) = messages.recv().await {
            self.on_message(message).await;
            handled += 1;
        }
        info!(handled, "listing message channel closed");
        self
    }
}
