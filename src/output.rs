//! Output types returned by the orchestrator.

use crate::error::{DeckError, DocumentError};
use crate::pipeline::extract::FacesheetRecord;
use serde::{Deserialize, Serialize};

/// Conventional file name of the finished deck.
pub const DECK_FILE_NAME: &str = "present.pptx";

/// MIME type of the finished deck.
pub const DECK_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// The complete result of a batch.
#[derive(Debug, Clone)]
pub struct DeckOutput {
    /// The packaged presentation.
    pub artifact: DeckArtifact,

    /// What went into it, and what was skipped.
    pub summary: DeckSummary,
}

impl DeckOutput {
    /// Treat any skipped document as an error.
    ///
    /// Returns [`DeckError::PartialFailure`] when at least one document
    /// produced no slide; otherwise returns `self` unchanged.
    pub fn into_result(self) -> Result<Self, DeckError> {
        let stats = &self.summary.stats;
        if stats.documents_failed > 0 {
            return Err(DeckError::PartialFailure {
                succeeded: stats.documents_succeeded,
                failed: stats.documents_failed,
                total: stats.documents_total,
            });
        }
        Ok(self)
    }
}

/// The binary deck plus the metadata a delivery layer needs.
#[derive(Clone, PartialEq, Eq)]
pub struct DeckArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DeckArtifact {
    pub(crate) fn pptx(bytes: Vec<u8>) -> Self {
        Self {
            file_name: DECK_FILE_NAME.to_string(),
            mime_type: DECK_MIME_TYPE.to_string(),
            bytes,
        }
    }
}

impl std::fmt::Debug for DeckArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckArtifact")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Per-slide and per-document account of a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckSummary {
    /// Slides in deck order.
    pub slides: Vec<SlideSummary>,

    /// One entry per skipped document, in upload order.
    pub diagnostics: Vec<DocumentError>,

    pub stats: DeckStats,
}

/// One slide of the deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSummary {
    /// 1-based slide index, as printed in the slide label.
    pub index: usize,
    /// Label denominator.
    pub total: usize,
    /// Source document name.
    pub document: String,
    pub record: FacesheetRecord,
    /// Deep link behind the QR code and the name hyperlink.
    pub link: String,
    pub has_photo: bool,
}

/// Aggregate counts for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckStats {
    pub documents_total: usize,
    pub documents_succeeded: usize,
    pub documents_failed: usize,
    pub slides: usize,
    /// Slides produced from documents without an embedded photo.
    pub photoless_slides: usize,
    pub artifact_bytes: usize,
    pub total_duration_ms: u64,
}

/// Extraction-only view of one document, as returned by
/// [`crate::convert::inspect`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectedDocument {
    pub position: usize,
    pub document: String,
    pub record: Option<FacesheetRecord>,
    /// Number of embedded raster images on the first page.
    pub image_count: usize,
    pub error: Option<DocumentError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MalformedReason;

    fn output(failed: usize) -> DeckOutput {
        DeckOutput {
            artifact: DeckArtifact::pptx(vec![1, 2, 3]),
            summary: DeckSummary {
                slides: vec![],
                diagnostics: (0..failed)
                    .map(|i| DocumentError::MalformedDocument {
                        position: i + 1,
                        document: format!("{i}.pdf"),
                        reason: MalformedReason::NoPages,
                    })
                    .collect(),
                stats: DeckStats {
                    documents_total: 3,
                    documents_succeeded: 3 - failed,
                    documents_failed: failed,
                    ..DeckStats::default()
                },
            },
        }
    }

    #[test]
    fn artifact_carries_name_and_mime() {
        let a = DeckArtifact::pptx(vec![0; 4]);
        assert_eq!(a.file_name, "present.pptx");
        assert!(a.mime_type.ends_with("presentationml.presentation"));
        assert!(format!("{a:?}").contains("bytes: 4"));
    }

    #[test]
    fn into_result_passes_clean_batches() {
        assert!(output(0).into_result().is_ok());
    }

    #[test]
    fn into_result_flags_skipped_documents() {
        match output(1).into_result() {
            Err(DeckError::PartialFailure {
                succeeded,
                failed,
                total,
            }) => assert_eq!((succeeded, failed, total), (2, 1, 3)),
            other => panic!("expected PartialFailure, got {other:?}"),
        }
    }

    #[test]
    fn summary_serialises() {
        let json = serde_json::to_string(&output(1).summary).unwrap();
        assert!(json.contains("\"documents_failed\":1"));
        assert!(json.contains("MalformedDocument"));
    }
}
