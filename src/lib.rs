//! # facesheet-deck
//!
//! Turn a batch of applicant facesheet PDFs into a PowerPoint deck: one
//! slide per applicant photo, each with a QR code that opens a pre-filled
//! evaluation form for that applicant.
//!
//! ## Pipeline Overview
//!
//! ```text
//! facesheet PDFs + form URL
//!  │
//!  ├─ 0. Validate  form URL must contain two '=' (fatal otherwise)
//!  ├─ 1. Input     files, directories, .zip archives → named buffers
//!  ├─ 2. Extract   name, AAMC ID, medical school, raw photo streams (lopdf)
//!  ├─ 3. Normalize decode → RGB → 187×262 Lanczos3 → PNG (image)
//!  ├─ 4. Encode    truncated URL + name → QR code, EC level L (qrcode)
//!  ├─ 5. Compose   photo, QR, hyperlinked name, details, "i/n" label
//!  └─ 6. Package   one .pptx (zip), written once at the end
//! ```
//!
//! A document that fails extraction or photo decoding is skipped and listed
//! in [`DeckSummary::diagnostics`]; the rest of the batch still produces its
//! slides. Only an invalid form URL, an empty batch, an oversized batch, or a
//! batch where every document failed is an `Err`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use facesheet_deck::{convert_to_file, DeckConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let form = "https://forms.example/d/abc/viewform?usp=pp_url&entry.1=TEST";
//!     let summary = convert_to_file(&["facesheets.zip"], form, "present.pptx", &DeckConfig::default()).await?;
//!     eprintln!("{} slides", summary.stats.slides);
//!     for skipped in &summary.diagnostics {
//!         eprintln!("skipped: {skipped}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! In-memory callers (a web upload handler, say) use [`build_deck`] directly
//! with [`FacesheetDocument`]s and serve [`DeckOutput::artifact`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `facesheet2pptx` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! facesheet-deck = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod deck;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{DeckConfig, DeckConfigBuilder, DocumentOrder};
pub use convert::{build_deck, convert, convert_sync, convert_to_file, inspect, inspect_documents};
pub use error::{DeckError, DocumentError, MalformedReason};
pub use output::{
    DeckArtifact, DeckOutput, DeckStats, DeckSummary, InspectedDocument, SlideSummary,
    DECK_FILE_NAME, DECK_MIME_TYPE,
};
pub use pipeline::encode::FormUrlTemplate;
pub use pipeline::extract::FacesheetRecord;
pub use pipeline::input::FacesheetDocument;
pub use progress::{DeckProgressCallback, NoopProgressCallback, ProgressCallback};
