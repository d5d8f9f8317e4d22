//! Zip packaging of a [`Deck`] into a `.pptx` file.

use super::parts::{self, Relationship};
use super::{Deck, Shape};
use std::io::{Cursor, Write};
use thiserror::Error;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Failure while writing the presentation package.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("zip: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// Relationship ids in ppt/_rels/presentation.xml.rels before the slides.
const PRESENTATION_FIXED_RELS: usize = 5;

struct Package {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl Package {
    fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    fn put(&mut self, name: &str, data: &[u8]) -> Result<(), PackageError> {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(data)?;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, PackageError> {
        Ok(self.zip.finish()?.into_inner())
    }
}

/// Serialise `deck` into the bytes of a `.pptx` file.
pub(crate) fn write_pptx(deck: &Deck) -> Result<Vec<u8>, PackageError> {
    let slide_count = deck.len();
    let mut pkg = Package::new();

    pkg.put("[Content_Types].xml", parts::content_types_xml(slide_count).as_bytes())?;
    pkg.put(
        "_rels/.rels",
        parts::relationships_xml(&[
            Relationship::internal("rId1", parts::REL_OFFICE_DOCUMENT, "ppt/presentation.xml"),
            Relationship::internal("rId2", parts::REL_CORE_PROPERTIES, "docProps/core.xml"),
            Relationship::internal("rId3", parts::REL_EXTENDED_PROPERTIES, "docProps/app.xml"),
        ])
        .as_bytes(),
    )?;
    pkg.put("docProps/core.xml", parts::core_properties_xml(deck.title()).as_bytes())?;
    pkg.put("docProps/app.xml", parts::app_properties_xml(slide_count).as_bytes())?;

    // ── Presentation ──
    let first_slide_rid = PRESENTATION_FIXED_RELS + 1;
    pkg.put(
        "ppt/presentation.xml",
        parts::presentation_xml(slide_count, first_slide_rid).as_bytes(),
    )?;
    let mut pres_rels = vec![
        Relationship::internal("rId1", parts::REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
        Relationship::internal("rId2", parts::REL_THEME, "theme/theme1.xml"),
        Relationship::internal("rId3", parts::REL_PRES_PROPS, "presProps.xml"),
        Relationship::internal("rId4", parts::REL_VIEW_PROPS, "viewProps.xml"),
        Relationship::internal("rId5", parts::REL_TABLE_STYLES, "tableStyles.xml"),
    ];
    for n in 1..=slide_count {
        pres_rels.push(Relationship::internal(
            format!("rId{}", first_slide_rid + n - 1),
            parts::REL_SLIDE,
            format!("slides/slide{n}.xml"),
        ));
    }
    pkg.put(
        "ppt/_rels/presentation.xml.rels",
        parts::relationships_xml(&pres_rels).as_bytes(),
    )?;
    pkg.put("ppt/presProps.xml", parts::PRES_PROPS_XML.as_bytes())?;
    pkg.put("ppt/viewProps.xml", parts::VIEW_PROPS_XML.as_bytes())?;
    pkg.put("ppt/tableStyles.xml", parts::TABLE_STYLES_XML.as_bytes())?;

    // ── Master, layout, theme ──
    pkg.put("ppt/slideMasters/slideMaster1.xml", parts::slide_master_xml().as_bytes())?;
    pkg.put(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        parts::relationships_xml(&[
            Relationship::internal("rId1", parts::REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
            Relationship::internal("rId2", parts::REL_THEME, "../theme/theme1.xml"),
        ])
        .as_bytes(),
    )?;
    pkg.put("ppt/slideLayouts/slideLayout1.xml", parts::slide_layout_xml().as_bytes())?;
    pkg.put(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        parts::relationships_xml(&[Relationship::internal(
            "rId1",
            parts::REL_SLIDE_MASTER,
            "../slideMasters/slideMaster1.xml",
        )])
        .as_bytes(),
    )?;
    pkg.put("ppt/theme/theme1.xml", parts::theme_xml().as_bytes())?;

    // ── Slides ──
    let mut media_count = 0usize;
    for (i, slide) in deck.slides().iter().enumerate() {
        let n = i + 1;
        let mut rels = vec![Relationship::internal(
            "rId1",
            parts::REL_SLIDE_LAYOUT,
            "../slideLayouts/slideLayout1.xml",
        )];
        let mut xml = parts::slide_open();
        // Shape id 1 is the group shape of the tree.
        let mut shape_id = 2usize;

        for shape in slide.shapes() {
            match shape {
                Shape::Picture(picture) => {
                    media_count += 1;
                    let media = format!("image{media_count}.png");
                    pkg.put(&format!("ppt/media/{media}"), &picture.image.bytes)?;
                    let rid = format!("rId{}", rels.len() + 1);
                    rels.push(Relationship::internal(
                        rid.clone(),
                        parts::REL_IMAGE,
                        format!("../media/{media}"),
                    ));
                    xml.push_str(&parts::picture_xml(shape_id, picture, &rid));
                }
                Shape::TextBox(text_box) => {
                    let mut link_rids = Vec::new();
                    for target in parts::hyperlink_targets(text_box) {
                        let rid = format!("rId{}", rels.len() + 1);
                        rels.push(Relationship::external(rid.clone(), parts::REL_HYPERLINK, target));
                        link_rids.push(rid);
                    }
                    xml.push_str(&parts::text_box_xml(shape_id, text_box, &link_rids));
                }
            }
            shape_id += 1;
        }
        xml.push_str(parts::SLIDE_CLOSE);

        pkg.put(&format!("ppt/slides/slide{n}.xml"), xml.as_bytes())?;
        pkg.put(
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            parts::relationships_xml(&rels).as_bytes(),
        )?;
    }

    let bytes = pkg.finish()?;
    debug!(
        "Packaged {} slide(s), {} image(s), {} bytes",
        slide_count,
        media_count,
        bytes.len()
    );
    Ok(bytes)
}
