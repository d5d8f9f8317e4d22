//! Append-only slide deck model and `.pptx` packaging.
//!
//! A [`Deck`] owns an ordered list of [`Slide`]s. Slides are assembled
//! completely (pictures, text boxes, runs) and then handed to
//! [`Deck::push`]; once appended they cannot be modified. The deck is
//! serialised exactly once, by [`Deck::to_pptx`], into an Office Open XML
//! presentation package.
//!
//! ## Units
//!
//! Geometry is expressed in English Metric Units ([`Emu`]): 914 400 per
//! inch, 12 700 per point. Pictures default to their native size at 72 dpi,
//! i.e. 12 700 EMU per pixel, which is how PowerPoint sizes a PNG that
//! carries no resolution metadata.

mod package;
mod parts;

use crate::error::DeckError;
use image::DynamicImage;
use std::io::Cursor;

pub use package::PackageError;

/// EMU per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// EMU per pixel at 72 dpi.
pub const EMU_PER_PX: i64 = 12_700;

/// Slide width: 10 in (4:3).
pub const SLIDE_WIDTH: Emu = Emu::centi_inches(1000);

/// Slide height: 7.5 in (4:3).
pub const SLIDE_HEIGHT: Emu = Emu::centi_inches(750);

// ── Geometry ─────────────────────────────────────────────────────────────

/// A length in English Metric Units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Emu(pub i64);

impl Emu {
    /// Length from hundredths of an inch (`centi_inches(250)` = 2.5 in).
    pub const fn centi_inches(n: i64) -> Self {
        Emu(n * EMU_PER_INCH / 100)
    }

    /// Length of `px` pixels at 72 dpi.
    pub const fn from_px(px: u32) -> Self {
        Emu(px as i64 * EMU_PER_PX)
    }
}

/// Top-left corner of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: Emu,
    pub y: Emu,
}

impl Point {
    pub const fn new(x: Emu, y: Emu) -> Self {
        Self { x, y }
    }
}

/// Extent of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cx: Emu,
    pub cy: Emu,
}

impl Size {
    pub const fn new(cx: Emu, cy: Emu) -> Self {
        Self { cx, cy }
    }
}

// ── Media ────────────────────────────────────────────────────────────────

/// A PNG-encoded raster with its pixel dimensions.
#[derive(Clone, PartialEq, Eq)]
pub struct PngImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl PngImage {
    /// Encode `img` losslessly as PNG.
    pub fn encode(img: &DynamicImage) -> Result<Self, image::ImageError> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(Self {
            bytes,
            width: img.width(),
            height: img.height(),
        })
    }

    /// Native on-slide size at 72 dpi.
    pub fn native_size(&self) -> Size {
        Size::new(Emu::from_px(self.width), Emu::from_px(self.height))
    }
}

impl std::fmt::Debug for PngImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PngImage")
            .field("bytes", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

// ── Text ─────────────────────────────────────────────────────────────────

/// 24-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Upper-case hex form used by DrawingML (`808080`).
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Character formatting for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub typeface: String,
    pub size_pt: u32,
    pub color: Option<Rgb>,
}

impl Font {
    pub fn new(typeface: impl Into<String>, size_pt: u32) -> Self {
        Self {
            typeface: typeface.into(),
            size_pt,
            color: None,
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }
}

/// A span of text sharing one font and an optional hyperlink target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub font: Font,
    pub hyperlink: Option<String>,
}

impl TextRun {
    pub fn new(text: impl Into<String>, font: Font) -> Self {
        Self {
            text: text.into(),
            font,
            hyperlink: None,
        }
    }

    pub fn with_hyperlink(mut self, target: impl Into<String>) -> Self {
        self.hyperlink = Some(target.into());
        self
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// One paragraph of a text box.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub alignment: Alignment,
    pub runs: Vec<TextRun>,
}

impl Paragraph {
    pub fn new(run: TextRun) -> Self {
        Self {
            alignment: Alignment::Left,
            runs: vec![run],
        }
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

// ── Shapes ───────────────────────────────────────────────────────────────

/// A raster picture placed at its native size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub image: PngImage,
    pub at: Point,
    pub description: String,
}

/// A free-floating text box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBox {
    pub at: Point,
    pub size: Size,
    pub word_wrap: bool,
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Picture(Picture),
    TextBox(TextBox),
}

/// One slide: shapes in z-order (first is bottom-most).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slide {
    shapes: Vec<Shape>,
}

impl Slide {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_picture(&mut self, image: PngImage, at: Point, description: impl Into<String>) {
        self.shapes.push(Shape::Picture(Picture {
            image,
            at,
            description: description.into(),
        }));
    }

    pub fn add_text_box(&mut self, text_box: TextBox) {
        self.shapes.push(Shape::TextBox(text_box));
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn pictures(&self) -> impl Iterator<Item = &Picture> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Picture(p) => Some(p),
            Shape::TextBox(_) => None,
        })
    }

    pub fn text_boxes(&self) -> impl Iterator<Item = &TextBox> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::TextBox(t) => Some(t),
            Shape::Picture(_) => None,
        })
    }
}

// ── Deck ─────────────────────────────────────────────────────────────────

/// Ordered, append-only collection of slides.
#[derive(Debug, Clone)]
pub struct Deck {
    title: String,
    slides: Vec<Slide>,
}

impl Deck {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slides: Vec::new(),
        }
    }

    /// Append a finished slide; returns its 1-based slide number.
    pub fn push(&mut self, slide: Slide) -> usize {
        self.slides.push(slide);
        self.slides.len()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Serialise the deck into a `.pptx` package.
    pub fn to_pptx(&self) -> Result<Vec<u8>, DeckError> {
        package::write_pptx(self).map_err(|e| DeckError::PackagingFailed(e.to_string()))
    }
}
