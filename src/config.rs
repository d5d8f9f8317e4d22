//! Configuration types for facesheet-to-deck conversion.
//!
//! All batch behaviour is controlled through [`DeckConfig`], built via its
//! [`DeckConfigBuilder`]. The slide layout, photo size and QR parameters are
//! fixed constants of the pipeline stages; only the knobs that bound a batch
//! or shape its ordering live here.

use crate::error::DeckError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for a facesheet batch.
///
/// Built via [`DeckConfig::builder()`] or using [`DeckConfig::default()`].
///
/// # Example
/// ```rust
/// use facesheet_deck::{DeckConfig, DocumentOrder};
///
/// let config = DeckConfig::builder()
///     .max_documents(200)
///     .order(DocumentOrder::FileName)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct DeckConfig {
    /// Maximum number of documents accepted per invocation. Default: 500.
    ///
    /// Every document is held in memory until the deck is packaged, so this
    /// cap bounds both peak memory and wall-clock time. A typical interview
    /// season stays well below it.
    pub max_documents: usize,

    /// Maximum size of a single uploaded PDF in bytes. Default: 32 MiB.
    ///
    /// Larger documents are skipped with
    /// [`crate::error::DocumentError::DocumentTooLarge`]; the rest of the
    /// batch continues. Path inputs are checked while reading: an oversized
    /// file or archive entry is never loaded past this many bytes.
    pub max_document_bytes: usize,

    /// Slide order. Default: [`DocumentOrder::Upload`].
    pub order: DocumentOrder,

    /// Deck title written to the presentation's document properties.
    pub title: String,

    /// Optional progress callback fired per document.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            max_documents: 500,
            max_document_bytes: 32 * 1024 * 1024,
            order: DocumentOrder::default(),
            title: "Applicant Facesheets".to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for DeckConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeckConfig")
            .field("max_documents", &self.max_documents)
            .field("max_document_bytes", &self.max_document_bytes)
            .field("order", &self.order)
            .field("title", &self.title)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn DeckProgressCallback>"),
            )
            .finish()
    }
}

impl DeckConfig {
    /// Create a new builder for `DeckConfig`.
    pub fn builder() -> DeckConfigBuilder {
        DeckConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`DeckConfig`].
#[derive(Debug)]
pub struct DeckConfigBuilder {
    config: DeckConfig,
}

impl DeckConfigBuilder {
    pub fn max_documents(mut self, n: usize) -> Self {
        self.config.max_documents = n;
        self
    }

    pub fn max_document_bytes(mut self, bytes: usize) -> Self {
        self.config.max_document_bytes = bytes;
        self
    }

    pub fn order(mut self, order: DocumentOrder) -> Self {
        self.config.order = order;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<DeckConfig, DeckError> {
        let c = &self.config;
        if c.max_documents == 0 {
            return Err(DeckError::InvalidConfig(
                "max_documents must be ≥ 1".into(),
            ));
        }
        if c.max_document_bytes == 0 {
            return Err(DeckError::InvalidConfig(
                "max_document_bytes must be ≥ 1".into(),
            ));
        }
        if c.title.trim().is_empty() {
            return Err(DeckError::InvalidConfig("title must not be empty".into()));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Order in which documents become slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DocumentOrder {
    /// Keep the order the documents were supplied in. (default)
    #[default]
    Upload,
    /// Sort by document name, case-insensitively (stable for equal names).
    FileName,
}

impl DocumentOrder {
    /// Reorder `items` in place; `name` extracts each item's document name.
    pub fn apply<T>(&self, items: &mut [T], name: impl Fn(&T) -> &str) {
        match self {
            DocumentOrder::Upload => {}
            DocumentOrder::FileName => {
                items.sort_by_cached_key(|item| name(item).to_lowercase());
            }
        }
    }
}
