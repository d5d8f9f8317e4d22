//! Batch orchestration: documents in, one packaged deck out.
//!
//! [`build_deck`] is the synchronous core. It validates the form-URL template
//! before touching any document, then runs in two phases:
//!
//! 1. **Prepare**: every document, in slide order, goes through extract →
//!    normalize → encode. A document either yields all of its slides or none:
//!    the first failing photo skips the whole document and records a
//!    [`DocumentError`].
//! 2. **Compose**: the prepared slides are laid out with labels `i/total`,
//!    where `total` is the number of slides actually produced, so labels stay
//!    contiguous when documents are skipped.
//!
//! The deck is packaged exactly once, after the last slide. If nothing
//! survived phase 1 the batch fails with [`DeckError::AllDocumentsFailed`]
//! and no artifact is produced.
//!
//! The async entry points resolve filesystem inputs and run the core on a
//! blocking worker; separate invocations share no state.

use crate::config::DeckConfig;
use crate::deck::Deck;
use crate::error::{DeckError, DocumentError};
use crate::output::{DeckArtifact, DeckOutput, DeckStats, DeckSummary, InspectedDocument, SlideSummary};
use crate::pipeline::compose::{compose_slide, SlideContent};
use crate::pipeline::encode::{encode_deep_link, FormUrlTemplate};
use crate::pipeline::extract::extract_facesheet;
use crate::pipeline::input::{self, FacesheetDocument};
use crate::pipeline::normalize::normalize_photo;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Build a deck from in-memory documents.
///
/// # Arguments
/// * `documents` — facesheet PDFs in upload order
/// * `form_url`  — the form's pre-filled link (at least two `=`)
/// * `config`    — batch configuration
///
/// # Returns
/// `Ok(DeckOutput)` when at least one slide was produced, even if some
/// documents were skipped (see `output.summary.diagnostics`).
///
/// # Errors
/// Batch-fatal conditions only, checked in this order:
/// - [`DeckError::InvalidFormUrl`], before any document is read
/// - [`DeckError::EmptyBatch`]
/// - [`DeckError::TooManyDocuments`]
/// - [`DeckError::AllDocumentsFailed`] when no document produced a slide
/// - [`DeckError::PackagingFailed`]
pub fn build_deck(
    documents: Vec<FacesheetDocument>,
    form_url: &str,
    config: &DeckConfig,
) -> Result<DeckOutput, DeckError> {
    let start = Instant::now();

    let template = FormUrlTemplate::parse(form_url)?;
    if documents.is_empty() {
        return Err(DeckError::EmptyBatch);
    }
    if documents.len() > config.max_documents {
        return Err(DeckError::TooManyDocuments {
            count: documents.len(),
            limit: config.max_documents,
        });
    }

    let total = documents.len();
    info!("Starting batch: {} document(s), template {}", total, template);

    // Positions are fixed at upload time so diagnostics name what the user
    // supplied, whatever the slide order.
    let mut documents: Vec<(usize, FacesheetDocument)> = documents
        .into_iter()
        .enumerate()
        .map(|(i, d)| (i + 1, d))
        .collect();
    config.order.apply(&mut documents, |(_, d)| d.name.as_str());

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    // ── Phase 1: prepare ─────────────────────────────────────────────────
    let mut prepared: Vec<SlideContent> = Vec::new();
    let mut diagnostics: Vec<DocumentError> = Vec::new();
    let mut succeeded = 0usize;

    for (position, document) in &documents {
        let position = *position;
        if let Some(ref cb) = config.progress_callback {
            cb.on_document_start(position, total, &document.name);
        }

        match prepare_document(position, document, &template, config) {
            Ok(contents) => {
                debug!(
                    "Document {} ('{}') prepared: {} slide(s)",
                    position,
                    document.name,
                    contents.len()
                );
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_complete(position, total, &document.name, contents.len());
                }
                succeeded += 1;
                prepared.extend(contents);
            }
            Err(e) => {
                warn!("Skipping {}", e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_error(position, total, &e.to_string());
                }
                diagnostics.push(e);
            }
        }
    }
    diagnostics.sort_by_key(DocumentError::position);

    if prepared.is_empty() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_batch_complete(total, 0);
        }
        return Err(DeckError::AllDocumentsFailed { total, diagnostics });
    }

    // ── Phase 2: compose ─────────────────────────────────────────────────
    let slide_total = prepared.len();
    let mut deck = Deck::new(config.title.as_str());
    let mut slides = Vec::with_capacity(slide_total);
    for (i, content) in prepared.into_iter().enumerate() {
        let index = i + 1;
        compose_slide(&mut deck, &content, index, slide_total);
        slides.push(SlideSummary {
            index,
            total: slide_total,
            document: content.document,
            has_photo: content.photo.is_some(),
            record: content.record,
            link: content.link,
        });
    }

    // ── Package ──────────────────────────────────────────────────────────
    let bytes = deck.to_pptx()?;
    let artifact = DeckArtifact::pptx(bytes);

    let stats = DeckStats {
        documents_total: total,
        documents_succeeded: succeeded,
        documents_failed: diagnostics.len(),
        slides: slides.len(),
        photoless_slides: slides.iter().filter(|s| !s.has_photo).count(),
        artifact_bytes: artifact.bytes.len(),
        total_duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Batch complete: {} slide(s) from {}/{} document(s), {} bytes, {}ms",
        stats.slides, stats.documents_succeeded, total, stats.artifact_bytes, stats.total_duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, stats.slides);
    }

    Ok(DeckOutput {
        artifact,
        summary: DeckSummary {
            slides,
            diagnostics,
            stats,
        },
    })
}

/// Resolve `inputs` (files, directories, `.zip` archives) and build a deck.
///
/// The template is validated before any path is read.
pub async fn convert<P: AsRef<Path>>(
    inputs: &[P],
    form_url: &str,
    config: &DeckConfig,
) -> Result<DeckOutput, DeckError> {
    FormUrlTemplate::parse(form_url)?;

    let documents = input::resolve_inputs(inputs, config.max_document_bytes).await?;
    let form_url = form_url.to_string();
    let config = config.clone();
    tokio::task::spawn_blocking(move || build_deck(documents, &form_url, &config))
        .await
        .map_err(|e| DeckError::Internal(format!("deck worker failed: {e}")))?
}

/// Build a deck and write it to `output_path`.
///
/// Uses atomic write (temp file + rename) so a failed run never leaves a
/// truncated presentation behind.
pub async fn convert_to_file<P: AsRef<Path>>(
    inputs: &[P],
    form_url: &str,
    output_path: impl AsRef<Path>,
    config: &DeckConfig,
) -> Result<DeckSummary, DeckError> {
    let output = convert(inputs, form_url, config).await?;
    let path = output_path.as_ref();
    let write_failed = |e: std::io::Error| DeckError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_failed)?;
    }

    let tmp_path = path.with_extension("pptx.tmp");
    tokio::fs::write(&tmp_path, &output.artifact.bytes)
        .await
        .map_err(write_failed)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_failed)?;

    info!("Wrote {} ({} bytes)", path.display(), output.artifact.bytes.len());
    Ok(output.summary)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync<P: AsRef<Path>>(
    inputs: &[P],
    form_url: &str,
    config: &DeckConfig,
) -> Result<DeckOutput, DeckError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DeckError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(inputs, form_url, config))
}

/// Run only the extractor over every input document.
///
/// Needs no form URL. Per-document failures are reported in
/// [`InspectedDocument::error`], never as `Err`.
pub async fn inspect<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<InspectedDocument>, DeckError> {
    let documents = input::resolve_inputs(inputs, DeckConfig::default().max_document_bytes).await?;
    tokio::task::spawn_blocking(move || inspect_documents(&documents))
        .await
        .map_err(|e| DeckError::Internal(format!("inspect worker failed: {e}")))
}

/// Extraction-only report for in-memory documents, in upload order.
pub fn inspect_documents(documents: &[FacesheetDocument]) -> Vec<InspectedDocument> {
    documents
        .iter()
        .enumerate()
        .map(|(i, d)| inspect_document(i + 1, d))
        .collect()
}

fn inspect_document(position: usize, document: &FacesheetDocument) -> InspectedDocument {
    if let Err(e) = check_size(position, document, DeckConfig::default().max_document_bytes) {
        return InspectedDocument {
            position,
            document: document.name.clone(),
            record: None,
            image_count: 0,
            error: Some(e),
        };
    }

    match extract_facesheet(&document.bytes) {
        Ok(sheet) => InspectedDocument {
            position,
            document: document.name.clone(),
            record: Some(sheet.record),
            image_count: sheet.photos.len(),
            error: None,
        },
        Err(reason) => InspectedDocument {
            position,
            document: document.name.clone(),
            record: None,
            image_count: 0,
            error: Some(DocumentError::MalformedDocument {
                position,
                document: document.name.clone(),
                reason,
            }),
        },
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn check_size(position: usize, document: &FacesheetDocument, limit: usize) -> Result<(), DocumentError> {
    if document.size() > limit {
        return Err(DocumentError::DocumentTooLarge {
            position,
            document: document.name.clone(),
            bytes: document.size(),
            limit,
        });
    }
    Ok(())
}

/// Extract, normalize and encode one document into its slide contents.
///
/// A document without photos yields a single photo-less slide.
fn prepare_document(
    position: usize,
    document: &FacesheetDocument,
    template: &FormUrlTemplate,
    config: &DeckConfig,
) -> Result<Vec<SlideContent>, DocumentError> {
    check_size(position, document, config.max_document_bytes)?;

    let sheet = extract_facesheet(&document.bytes).map_err(|reason| {
        DocumentError::MalformedDocument {
            position,
            document: document.name.clone(),
            reason,
        }
    })?;

    let code = encode_deep_link(template, &sheet.record.full_name).map_err(|e| {
        DocumentError::CodeEncodingFailed {
            position,
            document: document.name.clone(),
            detail: e.to_string(),
        }
    })?;

    let photos = if sheet.photos.is_empty() {
        warn!(
            "Document {} ('{}') has no embedded photo; its slide will have none",
            position, document.name
        );
        vec![None]
    } else {
        sheet
            .photos
            .iter()
            .enumerate()
            .map(|(i, blob)| {
                normalize_photo(blob).map(Some).map_err(|e| {
                    DocumentError::UnsupportedImageFormat {
                        position,
                        document: document.name.clone(),
                        image: i + 1,
                        detail: e.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(photos
        .into_iter()
        .map(|photo| SlideContent {
            document: document.name.clone(),
            record: sheet.record.clone(),
            photo,
            code: Some(code.image.clone()),
            link: code.url.clone(),
        })
        .collect())
}
