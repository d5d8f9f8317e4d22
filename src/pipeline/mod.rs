//! Pipeline stages for facesheet-to-deck conversion.
//!
//! Each submodule implements exactly one transformation step. All stages are
//! pure, synchronous transformations over in-memory buffers; the
//! orchestrator in [`crate::convert`] drives them one document at a time.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ normalize ──▶ encode ──▶ compose
//! (paths)   (lopdf)     (image)       (qrcode)   (deck)
//! ```
//!
//! 1. [`input`]     — read files, directories and `.zip` archives into
//!    named [`input::FacesheetDocument`]s
//! 2. [`extract`]   — first-page text fields and raw photo streams
//! 3. [`normalize`] — decode, convert to RGB, resize to 187×262, PNG-encode
//! 4. [`encode`]    — form-URL template validation and the QR deep link
//! 5. [`compose`]   — lay out one slide on the shared [`crate::deck::Deck`]

pub mod compose;
pub mod encode;
pub mod extract;
pub mod input;
pub mod normalize;

/// Synthetic facesheet PDFs for unit tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use lopdf::{dictionary, Dictionary, Document, Object, Stream};
    use std::io::Cursor;

    /// An image XObject to embed in a fixture page.
    pub struct FixturePhoto {
        pub bytes: Vec<u8>,
        pub width: u32,
        pub height: u32,
        pub filter: Option<&'static str>,
    }

    impl FixturePhoto {
        pub fn jpeg(bytes: Vec<u8>, width: u32, height: u32) -> Self {
            Self {
                bytes,
                width,
                height,
                filter: Some("DCTDecode"),
            }
        }

        /// Bytes no image decoder accepts.
        pub fn undecodable() -> Self {
            Self {
                bytes: b"\x00\x01not-an-image\xff\xfe".to_vec(),
                width: 8,
                height: 8,
                filter: Some("FlateDecode"),
            }
        }
    }

    /// A JPEG with a colour gradient.
    pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 96])
        });
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
            .expect("encode jpeg");
        out
    }

    pub fn facesheet_lines(name: &str, id: &str, school: &str) -> Vec<String> {
        vec![
            format!("{name} ({id})"),
            "Applicant Summary".to_string(),
            format!("Most Recent Medical School: {school}"),
            "Location: Springfield, IL".to_string(),
        ]
    }

    fn pdf_string(text: &str) -> String {
        text.replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)")
    }

    /// A one-page PDF with one text line per `BT`/`ET` block and each photo
    /// as an image XObject.
    pub fn facesheet_pdf(lines: &[String], photos: &[FixturePhoto]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });

        let mut content = String::new();
        let mut xobjects = Dictionary::new();
        for (i, photo) in photos.iter().enumerate() {
            let mut dict = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(photo.width),
                "Height" => i64::from(photo.height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            };
            if let Some(filter) = photo.filter {
                dict.set("Filter", Object::Name(filter.as_bytes().to_vec()));
            }
            let id = doc.add_object(Stream::new(dict, photo.bytes.clone()));
            let name = format!("Im{}", i + 1);
            content.push_str(&format!(
                "q {} 0 0 {} {} 500 cm /{name} Do Q\n",
                photo.width,
                photo.height,
                72 + i * 200
            ));
            xobjects.set(name, id);
        }

        for (i, line) in lines.iter().enumerate() {
            content.push_str(&format!(
                "BT /F1 11 Tf 72 {} Td ({}) Tj ET\n",
                740 - i * 16,
                pdf_string(line)
            ));
        }
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let mut resources = dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        };
        if !photos.is_empty() {
            resources.set("XObject", xobjects);
        }

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).expect("save pdf");
        out
    }
}
