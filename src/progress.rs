//! Progress-callback trait for per-document batch events.
//!
//! Inject an [`Arc<dyn DeckProgressCallback>`] via
//! [`crate::config::DeckConfigBuilder::progress_callback`] to receive events
//! as the orchestrator walks the uploaded documents. The library knows
//! nothing about how the host reports progress: a terminal bar, a web
//! socket, or a log line are all just implementations of this trait.
//!
//! # Example
//!
//! ```rust
//! use facesheet_deck::{DeckConfig, DeckProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     slides: Arc<AtomicUsize>,
//! }
//!
//! impl DeckProgressCallback for CountingCallback {
//!     fn on_document_complete(&self, position: usize, total: usize, name: &str, slides: usize) {
//!         self.slides.fetch_add(slides, Ordering::SeqCst);
//!         eprintln!("{position}/{total} {name}: {slides} slide(s)");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     slides: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = DeckConfig::builder()
//!     .progress_callback(counter as Arc<dyn DeckProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the batch orchestrator as it processes each document.
///
/// Implementations must be `Send + Sync`: the async entry points run the
/// batch on a blocking worker thread. All methods have default no-op
/// implementations so callers only override what they care about.
pub trait DeckProgressCallback: Send + Sync {
    /// Called once after validation, before the first document is read.
    ///
    /// # Arguments
    /// * `total_documents` — number of documents in the batch
    fn on_batch_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called just before a document is extracted.
    ///
    /// # Arguments
    /// * `position` — 1-based upload position
    /// * `total`    — number of documents in the batch
    /// * `name`     — document name
    fn on_document_start(&self, position: usize, total: usize, name: &str) {
        let _ = (position, total, name);
    }

    /// Called when a document produced its slide content.
    ///
    /// # Arguments
    /// * `slides` — number of slides this document contributes
    fn on_document_complete(&self, position: usize, total: usize, name: &str, slides: usize) {
        let _ = (position, total, name, slides);
    }

    /// Called when a document is skipped.
    ///
    /// # Arguments
    /// * `error` — human-readable reason
    fn on_document_error(&self, position: usize, total: usize, error: &str) {
        let _ = (position, total, error);
    }

    /// Called once after every document has been attempted.
    ///
    /// # Arguments
    /// * `total_documents` — documents in the batch
    /// * `slides`          — slides that made it into the deck
    fn on_batch_complete(&self, total_documents: usize, slides: usize) {
        let _ = (total_documents, slides);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl DeckProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::DeckConfig`].
pub type ProgressCallback = Arc<dyn DeckProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        slides: AtomicUsize,
        errors: AtomicUsize,
    }

    impl DeckProgressCallback for TrackingCallback {
        fn on_document_start(&self, _position: usize, _total: usize, _name: &str) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_document_complete(&self, _position: usize, _total: usize, _name: &str, slides: usize) {
            self.slides.fetch_add(slides, Ordering::SeqCst);
        }

        fn on_document_error(&self, _position: usize, _total: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(3);
        cb.on_document_start(1, 3, "a.pdf");
        cb.on_document_complete(1, 3, "a.pdf", 1);
        cb.on_document_error(2, 3, "malformed");
        cb.on_batch_complete(3, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            starts: AtomicUsize::new(0),
            slides: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
        };

        tracker.on_document_start(1, 2, "a.pdf");
        tracker.on_document_complete(1, 2, "a.pdf", 2);
        tracker.on_document_start(2, 2, "b.pdf");
        tracker.on_document_error(2, 2, "no photo");

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.slides.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_batch_start(10);
        cb.on_document_start(1, 10, "x.pdf");
    }
}
