//! Error types for the facesheet-deck library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`DeckError`] is **fatal**: the batch cannot proceed or produced nothing
//!   (bad form URL, no documents, every document failed). Returned as
//!   `Err(DeckError)` from [`crate::convert::build_deck`] and friends.
//!
//! * [`DocumentError`] is **non-fatal**: one uploaded facesheet could not be
//!   turned into slides (missing landmark, undecodable photo). Collected into
//!   [`crate::output::DeckSummary::diagnostics`] while the remaining
//!   documents still produce their slides.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the facesheet-deck library.
///
/// Document-level failures use [`DocumentError`] and are reported in the
/// summary rather than propagated here, unless no slide survived.
#[derive(Debug, Error)]
pub enum DeckError {
    // ── Batch errors ──────────────────────────────────────────────────────
    /// The pre-filled form link lacks the `=` delimiters that anchor the
    /// applicant-name field.
    #[error(
        "Invalid form URL '{url}': expected at least two '=' characters, found {found}.\n\
Use the form's \"Get pre-filled link\" URL with a placeholder answer such as TEST."
    )]
    InvalidFormUrl { url: String, found: usize },

    /// No documents were supplied.
    #[error("No facesheet documents were supplied")]
    EmptyBatch,

    /// More documents than the configured per-invocation cap.
    #[error("{count} documents supplied but at most {limit} are accepted per batch")]
    TooManyDocuments { count: usize, limit: usize },

    /// Every document failed; no artifact is produced.
    #[error("All {total} documents failed; no slides were produced.\nFirst error: {}", first_diagnostic(.diagnostics))]
    AllDocumentsFailed {
        total: usize,
        diagnostics: Vec<DocumentError>,
    },

    /// Some documents succeeded but at least one was skipped.
    ///
    /// Returned by [`crate::output::DeckOutput::into_result`] when the
    /// caller wants to treat any skipped document as an error.
    #[error("{failed}/{total} documents were skipped")]
    PartialFailure {
        succeeded: usize,
        failed: usize,
        total: usize,
    },

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input path was not found.
    #[error("Input not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the input.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Reading an input failed for another I/O reason.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `.zip` input could not be opened or one of its entries could not be read.
    #[error("Archive '{path}' is unreadable: {detail}")]
    ArchiveUnreadable { path: PathBuf, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The slide deck could not be serialised into a presentation package.
    #[error("Failed to package the slide deck: {0}")]
    PackagingFailed(String),

    /// Could not create or write the output presentation file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn first_diagnostic(diagnostics: &[DocumentError]) -> String {
    diagnostics
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "Unknown error".to_string())
}

/// A non-fatal error for a single uploaded document.
///
/// `position` is the 1-based upload position and `document` the name the
/// document was uploaded under, so every skipped facesheet can be listed
/// next to the download.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DocumentError {
    /// Required text landmark or ID pattern absent, or the PDF is unreadable.
    #[error("Document {position} ('{document}'): malformed facesheet: {reason}")]
    MalformedDocument {
        position: usize,
        document: String,
        reason: MalformedReason,
    },

    /// An embedded photo could not be decoded.
    #[error("Document {position} ('{document}'): photo {image} has an unsupported format: {detail}")]
    UnsupportedImageFormat {
        position: usize,
        document: String,
        image: usize,
        detail: String,
    },

    /// The deep link did not fit into a scannable code.
    #[error("Document {position} ('{document}'): QR code encoding failed: {detail}")]
    CodeEncodingFailed {
        position: usize,
        document: String,
        detail: String,
    },

    /// The document exceeds the configured size cap.
    #[error("Document {position} ('{document}'): {bytes} bytes exceeds the {limit}-byte limit")]
    DocumentTooLarge {
        position: usize,
        document: String,
        bytes: usize,
        limit: usize,
    },
}

impl DocumentError {
    /// 1-based upload position of the failing document.
    pub fn position(&self) -> usize {
        match self {
            DocumentError::MalformedDocument { position, .. }
            | DocumentError::UnsupportedImageFormat { position, .. }
            | DocumentError::CodeEncodingFailed { position, .. }
            | DocumentError::DocumentTooLarge { position, .. } => *position,
        }
    }

    /// Name of the failing document.
    pub fn document(&self) -> &str {
        match self {
            DocumentError::MalformedDocument { document, .. }
            | DocumentError::UnsupportedImageFormat { document, .. }
            | DocumentError::CodeEncodingFailed { document, .. }
            | DocumentError::DocumentTooLarge { document, .. } => document,
        }
    }
}

/// Why a facesheet was rejected by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MalformedReason {
    /// The bytes do not start with the `%PDF` signature.
    #[error("not a PDF (first bytes: {magic:?})")]
    NotAPdf { magic: Vec<u8> },

    /// The PDF object graph could not be parsed.
    #[error("unparseable PDF: {detail}")]
    Unparseable { detail: String },

    /// The document has no pages.
    #[error("document has no pages")]
    NoPages,

    /// Text of the first page could not be extracted.
    #[error("first-page text unavailable: {detail}")]
    TextUnavailable { detail: String },

    /// No parenthesised numeric applicant ID in the text.
    #[error("no parenthesised numeric AAMC ID found")]
    MissingApplicantId,

    /// Fewer than two leading words to form the full name.
    #[error("applicant name not found")]
    MissingName,

    /// A fixed text landmark is absent.
    #[error("landmark '{0}' not found")]
    MissingLandmark(String),

    /// The medical-school landmarks enclose only whitespace.
    #[error("medical school is empty")]
    EmptyMedicalSchool,

    /// The first page's resource dictionary is structurally invalid.
    #[error("invalid page resources: {detail}")]
    BadResources { detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_form_url_display() {
        let e = DeckError::InvalidFormUrl {
            url: "no-equals-here".into(),
            found: 0,
        };
        let msg = e.to_string();
        assert!(msg.contains("no-equals-here"), "got: {msg}");
        assert!(msg.contains("found 0"), "got: {msg}");
    }

    #[test]
    fn all_documents_failed_shows_first_error() {
        let e = DeckError::AllDocumentsFailed {
            total: 2,
            diagnostics: vec![DocumentError::MalformedDocument {
                position: 1,
                document: "a.pdf".into(),
                reason: MalformedReason::MissingApplicantId,
            }],
        };
        let msg = e.to_string();
        assert!(msg.contains("All 2 documents"), "got: {msg}");
        assert!(msg.contains("a.pdf"), "got: {msg}");
    }

    #[test]
    fn all_documents_failed_without_diagnostics() {
        let e = DeckError::AllDocumentsFailed {
            total: 0,
            diagnostics: vec![],
        };
        assert!(e.to_string().contains("Unknown error"));
    }

    #[test]
    fn partial_failure_display() {
        let e = DeckError::PartialFailure {
            succeeded: 9,
            failed: 1,
            total: 10,
        };
        assert!(e.to_string().contains("1/10"));
    }

    #[test]
    fn document_error_accessors() {
        let e = DocumentError::UnsupportedImageFormat {
            position: 3,
            document: "smith.pdf".into(),
            image: 1,
            detail: "bad header".into(),
        };
        assert_eq!(e.position(), 3);
        assert_eq!(e.document(), "smith.pdf");
        assert!(e.to_string().contains("photo 1"));
    }

    #[test]
    fn malformed_landmark_display() {
        let e = DocumentError::MalformedDocument {
            position: 2,
            document: "doe.pdf".into(),
            reason: MalformedReason::MissingLandmark("Location:".into()),
        };
        let msg = e.to_string();
        assert!(msg.contains("Location:"), "got: {msg}");
        assert!(msg.contains("Document 2"), "got: {msg}");
    }

    #[test]
    fn document_error_serialises() {
        let e = DocumentError::DocumentTooLarge {
            position: 1,
            document: "big.pdf".into(),
            bytes: 10,
            limit: 5,
        };
        let json = serde_json::to_string(&e).expect("serialise");
        assert!(json.contains("DocumentTooLarge"));
        assert!(json.contains("big.pdf"));
    }
}
