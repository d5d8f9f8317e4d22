//! Slide composition: one applicant onto one slide of the shared deck.
//!
//! Layout (10 in × 7.5 in slide):
//!
//! ```text
//!  1in          5in
//!  ┌────────┐   ┌──────┐             2in
//!  │ photo  │   │  QR  │
//!  │        │   └──────┘
//!  │        │   Jane Doe  (24pt, hyperlink)     4in
//!  └────────┘   School    (16pt)
//!               AAMC ID: 12345678 (16pt)
//!                                       3/12    7in
//! ```

use crate::deck::{
    Alignment, Deck, Emu, Font, Paragraph, PngImage, Point, Rgb, Size, Slide, TextBox, TextRun,
};
use crate::pipeline::extract::FacesheetRecord;
use tracing::info;

/// Typeface of every text run.
pub const FONT_FAMILY: &str = "Arial";

pub const NAME_FONT_PT: u32 = 24;
pub const DETAIL_FONT_PT: u32 = 16;
pub const LABEL_FONT_PT: u32 = 12;
pub const LABEL_COLOR: Rgb = Rgb(128, 128, 128);

pub const PHOTO_AT: Point = Point::new(Emu::centi_inches(100), Emu::centi_inches(200));
pub const CODE_AT: Point = Point::new(Emu::centi_inches(500), Emu::centi_inches(200));
pub const TEXT_AT: Point = Point::new(Emu::centi_inches(500), Emu::centi_inches(400));
pub const TEXT_SIZE: Size = Size::new(Emu::centi_inches(400), Emu::centi_inches(200));
pub const LABEL_AT: Point = Point::new(Emu::centi_inches(850), Emu::centi_inches(700));
pub const LABEL_SIZE: Size = Size::new(Emu::centi_inches(100), Emu::centi_inches(20));

/// Everything one slide shows.
#[derive(Debug, Clone)]
pub struct SlideContent {
    /// Name of the source document.
    pub document: String,
    pub record: FacesheetRecord,
    pub photo: Option<PngImage>,
    pub code: Option<PngImage>,
    /// Hyperlink target of the name run.
    pub link: String,
}

/// `"<index>/<total>"`.
pub fn slide_label(index: usize, total: usize) -> String {
    format!("{index}/{total}")
}

/// Append one slide for `content`; returns the new slide's number.
///
/// `index` is 1-based and `total` is the number of slides the batch will
/// contain.
pub fn compose_slide(deck: &mut Deck, content: &SlideContent, index: usize, total: usize) -> usize {
    let record = &content.record;
    let mut slide = Slide::new();

    if let Some(photo) = &content.photo {
        slide.add_picture(photo.clone(), PHOTO_AT, format!("Photo of {}", record.full_name));
    }
    if let Some(code) = &content.code {
        slide.add_picture(code.clone(), CODE_AT, content.link.clone());
    }

    slide.add_text_box(TextBox {
        at: TEXT_AT,
        size: TEXT_SIZE,
        word_wrap: true,
        paragraphs: details(record, &content.link),
    });

    slide.add_text_box(TextBox {
        at: LABEL_AT,
        size: LABEL_SIZE,
        word_wrap: false,
        paragraphs: vec![Paragraph::new(TextRun::new(
            slide_label(index, total),
            Font::new(FONT_FAMILY, LABEL_FONT_PT).with_color(LABEL_COLOR),
        ))
        .aligned(Alignment::Right)],
    });

    let number = deck.push(slide);
    info!(
        "Slide {}/{}: {} ({})",
        index, total, record.full_name, content.document
    );
    number
}

/// Name (hyperlinked), each line of the medical school, then the ID.
fn details(record: &FacesheetRecord, link: &str) -> Vec<Paragraph> {
    let detail = || Font::new(FONT_FAMILY, DETAIL_FONT_PT);

    let mut paragraphs = vec![Paragraph::new(
        TextRun::new(record.full_name.as_str(), Font::new(FONT_FAMILY, NAME_FONT_PT))
            .with_hyperlink(link),
    )];
    paragraphs.extend(
        record
            .med_school
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| Paragraph::new(TextRun::new(l, detail()))),
    );
    paragraphs.push(Paragraph::new(TextRun::new(
        format!("AAMC ID: {}", record.aamc_id),
        detail(),
    )));
    paragraphs
}
