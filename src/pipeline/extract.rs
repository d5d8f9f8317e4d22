//! Field and photo extraction from a facesheet PDF.
//!
//! A facesheet is a single-page applicant summary with a fixed layout. The
//! first page's text carries the applicant's name as its first two words,
//! the AAMC ID as the first parenthesised number, and the medical school
//! between two fixed landmarks:
//!
//! ```text
//! Jane Doe (12345678) ...
//! Most Recent Medical School: University of Somewhere School of Medicine
//! Location: Somewhere, ST
//! ```
//!
//! Photos are the raster-image XObjects referenced directly from the first
//! page's resource dictionary (inherited through the page tree when the page
//! itself has none). Their stream bytes are returned undecoded, in
//! declaration order; decoding is the normalizer's job.

use crate::error::MalformedReason;
use lopdf::{Dictionary, Document, Object, ObjectId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Landmark that precedes the medical school.
pub const MEDICAL_SCHOOL_LANDMARK: &str = "Most Recent Medical School:";

/// Landmark that terminates the medical school.
pub const LOCATION_LANDMARK: &str = "Location:";

static APPLICANT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((\d+)\)").unwrap());

/// Encoded bytes of one embedded photo, exactly as stored in the PDF stream.
pub type RawImageBlob = Vec<u8>;

/// Identifying fields parsed from a facesheet's first page.
///
/// All three fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacesheetRecord {
    pub full_name: String,
    /// Digits only.
    pub aamc_id: String,
    pub med_school: String,
}

/// Everything the extractor recovers from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facesheet {
    pub record: FacesheetRecord,
    /// Raw photo payloads in declaration order; possibly empty.
    pub photos: Vec<RawImageBlob>,
}

/// Parse one facesheet PDF.
pub fn extract_facesheet(bytes: &[u8]) -> Result<Facesheet, MalformedReason> {
    if !bytes.starts_with(b"%PDF") {
        return Err(MalformedReason::NotAPdf {
            magic: bytes.iter().take(4).copied().collect(),
        });
    }

    let doc = Document::load_mem(bytes).map_err(|e| MalformedReason::Unparseable {
        detail: e.to_string(),
    })?;

    let (page_number, page_id) = doc
        .get_pages()
        .into_iter()
        .next()
        .ok_or(MalformedReason::NoPages)?;

    let text = doc
        .extract_text(&[page_number])
        .map_err(|e| MalformedReason::TextUnavailable {
            detail: e.to_string(),
        })?;
    debug!("First page text: {} chars", text.len());

    let record = parse_fields(&text)?;
    let photos = page_images(&doc, page_id)?;
    debug!(
        "Extracted '{}' ({}) with {} photo(s)",
        record.full_name,
        record.aamc_id,
        photos.len()
    );

    Ok(Facesheet { record, photos })
}

/// Parse the identifying fields out of first-page text.
pub fn parse_fields(text: &str) -> Result<FacesheetRecord, MalformedReason> {
    let aamc_id = APPLICANT_ID
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(MalformedReason::MissingApplicantId)?;

    let mut words = text.split_whitespace();
    let full_name = match (words.next(), words.next()) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        _ => return Err(MalformedReason::MissingName),
    };

    let start = text
        .find(MEDICAL_SCHOOL_LANDMARK)
        .map(|i| i + MEDICAL_SCHOOL_LANDMARK.len())
        .ok_or_else(|| MalformedReason::MissingLandmark(MEDICAL_SCHOOL_LANDMARK.to_string()))?;
    let len = text[start..]
        .find(LOCATION_LANDMARK)
        .ok_or_else(|| MalformedReason::MissingLandmark(LOCATION_LANDMARK.to_string()))?;

    let med_school = text[start..start + len].trim().to_string();
    if med_school.is_empty() {
        return Err(MalformedReason::EmptyMedicalSchool);
    }

    Ok(FacesheetRecord {
        full_name,
        aamc_id,
        med_school,
    })
}

// ── Resources ────────────────────────────────────────────────────────────

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object, lopdf::Error> {
    match obj {
        Object::Reference(id) => doc.get_object(*id),
        other => Ok(other),
    }
}

/// The page's `/Resources`, following `/Parent` links for inherited values.
fn page_resources(doc: &Document, page_id: ObjectId) -> Result<Option<&Dictionary>, MalformedReason> {
    let bad = |e: lopdf::Error| MalformedReason::BadResources {
        detail: e.to_string(),
    };

    let mut current = page_id;
    // Bounded to survive cyclic /Parent chains.
    for _ in 0..64 {
        let node = doc.get_object(current).and_then(Object::as_dict).map_err(bad)?;
        if let Ok(resources) = node.get(b"Resources") {
            return resolve(doc, resources).and_then(Object::as_dict).map(Some).map_err(bad);
        }
        match node.get(b"Parent") {
            Ok(parent) => current = parent.as_reference().map_err(bad)?,
            Err(_) => return Ok(None),
        }
    }
    Err(MalformedReason::BadResources {
        detail: "page tree is too deep or cyclic".to_string(),
    })
}

/// Raw payloads of every image XObject directly referenced by the page.
fn page_images(doc: &Document, page_id: ObjectId) -> Result<Vec<RawImageBlob>, MalformedReason> {
    let Some(resources) = page_resources(doc, page_id)? else {
        return Ok(Vec::new());
    };
    let Ok(xobjects) = resources.get(b"XObject") else {
        return Ok(Vec::new());
    };
    let xobjects = resolve(doc, xobjects)
        .and_then(Object::as_dict)
        .map_err(|e| MalformedReason::BadResources {
            detail: format!("/XObject: {e}"),
        })?;

    let mut images = Vec::new();
    for (name, entry) in xobjects.iter() {
        let stream = match resolve(doc, entry).and_then(Object::as_stream) {
            Ok(stream) => stream,
            Err(e) => {
                debug!("Skipping XObject /{}: {}", String::from_utf8_lossy(name), e);
                continue;
            }
        };
        let is_image = matches!(
            stream.dict.get(b"Subtype").and_then(|o| o.as_name()),
            Ok(subtype) if subtype == b"Image"
        );
        if is_image {
            debug!(
                "Image XObject /{}: {} bytes",
                String::from_utf8_lossy(name),
                stream.content.len()
            );
            images.push(stream.content.clone());
        }
    }
    Ok(images)
}
