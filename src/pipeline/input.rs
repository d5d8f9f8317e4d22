//! Input resolution: turn user-supplied paths into named PDF buffers.
//!
//! Three kinds of path are accepted:
//!
//! * a file, read as one document (whatever its extension; the extractor
//!   checks the `%PDF` signature);
//! * a directory, contributing its `*.pdf` files sorted by file name;
//! * a `.zip` archive (the bulk-print download), contributing its `*.pdf`
//!   entries in archive order. Directory entries and `__MACOSX/` metadata
//!   are skipped.
//!
//! Paths are read concurrently; documents come back in input order. Files
//! and archive entries larger than the per-document limit are not loaded:
//! they come back as empty placeholders carrying the observed size, and the
//! orchestrator reports them as too large.

use crate::error::DeckError;
use futures::future::try_join_all;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// One uploaded facesheet: its display name and raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct FacesheetDocument {
    pub name: String,
    pub bytes: Vec<u8>,
    size: usize,
}

impl FacesheetDocument {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len(),
            bytes,
        }
    }

    /// A document left unread because it exceeds the size limit. `bytes`
    /// is empty; `size` is what was observed before reading stopped.
    pub(crate) fn oversized(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            bytes: Vec::new(),
            size,
        }
    }

    /// Size of the document in bytes, including documents left unread.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl std::fmt::Debug for FacesheetDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacesheetDocument")
            .field("name", &self.name)
            .field("bytes", &self.bytes.len())
            .field("size", &self.size)
            .finish()
    }
}

/// Read every input path into documents, preserving input order.
///
/// `max_document_bytes` bounds how much of any single file or archive entry
/// is read.
pub async fn resolve_inputs<P: AsRef<Path>>(
    inputs: &[P],
    max_document_bytes: usize,
) -> Result<Vec<FacesheetDocument>, DeckError> {
    let groups = try_join_all(
        inputs
            .iter()
            .map(|p| resolve_one(p.as_ref().to_path_buf(), max_document_bytes)),
    )
    .await?;
    let documents: Vec<FacesheetDocument> = groups.into_iter().flatten().collect();
    info!(
        "Resolved {} document(s) from {} input(s)",
        documents.len(),
        inputs.len()
    );
    Ok(documents)
}

async fn resolve_one(path: PathBuf, limit: usize) -> Result<Vec<FacesheetDocument>, DeckError> {
    let metadata = tokio::fs::metadata(&path)
        .await
        .map_err(|e| io_error(&path, e))?;

    if metadata.is_dir() {
        return read_directory(&path, limit).await;
    }

    if has_extension(&path, "zip") {
        let bytes = tokio::fs::read(&path).await.map_err(|e| io_error(&path, e))?;
        return documents_from_zip(&path, bytes, limit);
    }

    Ok(vec![read_document(&path, limit).await?])
}

/// Read one file as a document unless its size already exceeds `limit`.
async fn read_document(path: &Path, limit: usize) -> Result<FacesheetDocument, DeckError> {
    let len = tokio::fs::metadata(path)
        .await
        .map_err(|e| io_error(path, e))?
        .len();
    if len > limit as u64 {
        warn!("{} is {} bytes, over the {} byte limit; not read", path.display(), len, limit);
        return Ok(FacesheetDocument::oversized(
            display_name(path),
            usize::try_from(len).unwrap_or(usize::MAX),
        ));
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| io_error(path, e))?;
    debug!("Read {} ({} bytes)", path.display(), bytes.len());
    Ok(FacesheetDocument::new(display_name(path), bytes))
}

async fn read_directory(dir: &Path, limit: usize) -> Result<Vec<FacesheetDocument>, DeckError> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| io_error(dir, e))?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(dir, e))? {
        let path = entry.path();
        let is_file = entry
            .file_type()
            .await
            .map(|t| t.is_file())
            .unwrap_or(false);
        if is_file && has_extension(&path, "pdf") {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("{}: {} PDF file(s)", dir.display(), paths.len());

    try_join_all(paths.iter().map(|path| read_document(path, limit))).await
}

/// Every `*.pdf` entry of an in-memory zip archive, in archive order.
///
/// At most `limit + 1` bytes of each entry are inflated, whatever size the
/// archive header declares; larger entries become oversized placeholders.
pub fn documents_from_zip(
    path: &Path,
    bytes: Vec<u8>,
    limit: usize,
) -> Result<Vec<FacesheetDocument>, DeckError> {
    let unreadable = |detail: String| DeckError::ArchiveUnreadable {
        path: path.to_path_buf(),
        detail,
    };

    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| unreadable(e.to_string()))?;
    let mut documents = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| unreadable(e.to_string()))?;
        let entry_name = entry.name().to_string();
        if entry.is_dir()
            || entry_name.starts_with("__MACOSX/")
            || !entry_name.to_ascii_lowercase().ends_with(".pdf")
        {
            continue;
        }

        let name = entry_name.rsplit('/').next().unwrap_or(&entry_name).to_string();
        let declared = usize::try_from(entry.size()).unwrap_or(usize::MAX);
        let mut data = Vec::with_capacity(declared.min(limit));
        (&mut entry)
            .take((limit as u64).saturating_add(1))
            .read_to_end(&mut data)
            .map_err(|e| unreadable(format!("{entry_name}: {e}")))?;

        if data.len() > limit {
            let size = declared.max(data.len());
            warn!("{}: entry {} is over the {} byte limit; not loaded", path.display(), entry_name, limit);
            documents.push(FacesheetDocument::oversized(name, size));
        } else {
            documents.push(FacesheetDocument::new(name, data));
        }
    }

    debug!("{}: {} PDF entr(ies)", path.display(), documents.len());
    Ok(documents)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn io_error(path: &Path, e: std::io::Error) -> DeckError {
    match e.kind() {
        std::io::ErrorKind::NotFound => DeckError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => DeckError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => DeckError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    }
}
