//! The capture engine: decides when to re-scan the page and emits snapshots.

use std::sync::Arc;

use listing_core::clock::Clock;
use listing_core::config::CaptureConfig;
use listing_core::error::DomainError;
use listing_core::listing::ListingSnapshot;
use listing_core::message::ListingMessage;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, trace, warn};

use crate::extract::Extractor;
use crate::page::{MutationRecord, Page, PageEvent, is_form_tag};
use crate::throttle::Throttle;

/// Observes one page and sends a snapshot for each admitted trigger.
///
/// One engine exists per page context. It never sees the aggregated record;
/// it only produces `NEW_LISTING` messages.
pub struct CaptureEngine {
    config: CaptureConfig,
    extractor: Extractor,
    throttle: Throttle,
    clock: Arc<dyn Clock>,
    sender: UnboundedSender<ListingMessage>,
}

impl std::fmt::Debug for CaptureEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureEngine")
            .field("creation_path", &self.config.creation_path)
            .field("last_update", &self.throttle.last_update())
            .finish_non_exhaustive()
    }
}

impl CaptureEngine {
    /// Creates an engine that sends snapshots on `sender`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if a configured selector is
    /// invalid.
    pub fn new(
        config: CaptureConfig,
        clock: Arc<dyn Clock>,
        sender: UnboundedSender<ListingMessage>,
    ) -> Result<Self, DomainError> {
        let extractor = Extractor::new(&config)?;
        let throttle = Throttle::new(config.update_delay());
        info!(creation_path = %config.creation_path, "capture engine initialized");
        Ok(Self {
            config,
            extractor,
            throttle,
            clock,
            sender,
        })
    }

    /// Handles one page event.
    ///
    /// Returns the snapshot sent, or `None` when the event was outside the
    /// creation flow, irrelevant, throttled, or the field read failed.
    pub fn handle_event(&mut self, event: &PageEvent, page: &dyn Page) -> Option<ListingSnapshot> {
        let url = page.url();
        if !self.config.in_creation_flow(&url) {
            trace!(%url, "outside creation flow, ignoring event");
            return None;
        }

        let relevant = match event {
            PageEvent::Mutations { records } => records.iter().any(|r| self.is_relevant(r)),
            PageEvent::Input(input) => is_form_tag(&input.target_tag),
        };
        if !relevant {
            return None;
        }

        let now = self.clock.now();
        if !self.throttle.try_acquire(now) {
            debug!("trigger inside throttle window, dropped");
            return None;
        }

        self.capture(page)
    }

    /// Drains `events` until the sender side closes.
    ///
    /// Returns the number of snapshots sent.
    pub async fn run(mut self, mut events: UnboundedReceiver<PageEvent>, page: &dyn Page) -> usize {
        let mut sent = 0;
        while let Some(event) = events.recv().await {
            if self.handle_event(&event, page).is_some() {
                sent += 1;
            }
        }
        info!(sent, "page event stream closed");
        sent
    }

    fn is_relevant(&self, record: &MutationRecord) -> bool {
        record.target_tag.as_deref().is_some_and(is_form_tag)
            || self.extractor.contains_product_image(&record.target_html)
    }

    fn capture(&self, page: &dyn Page) -> Option<ListingSnapshot> {
        debug!("capturing listing data");

        let images = match self.capture_images(page) {
            Ok(images) => {
                debug!(count = images.len(), "captured images");
                images
            }
            Err(e) => {
                warn!(error = %e, "image capture failed");
                Vec::new()
            }
        };

        match self.capture_fields(page) {
            Ok(mut snapshot) => {
                snapshot.images = images;
                self.emit(&snapshot);
                Some(snapshot)
            }
            Err(e) => {
                error!(error = %e, "listing capture failed");
                None
            }
        }
    }

    fn capture_images(&self, page: &dyn Page) -> Result<Vec<String>, DomainError> {
        let doc = page.document()?;
        Ok(self.extractor.images(&doc))
    }

    fn capture_fields(&self, page: &dyn Page) -> Result<ListingSnapshot, DomainError> {
        let doc = page.document()?;
        Ok(self.extractor.fields(&doc))
    }

    fn emit(&self, snapshot: &ListingSnapshot) {
        debug!(
            price = snapshot.price,
            images = snapshot.images.len(),
            "sending listing snapshot"
        );
        if self
            .sender
            .send(ListingMessage::NewListing(snapshot.clone()))
            .is_err()
        {
            warn!("aggregation channel closed, snapshot dropped");
        }
    }
}
