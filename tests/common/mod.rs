//! Shared fixtures for the integration tests: synthetic facesheet PDFs and
//! helpers for looking inside a produced `.pptx`.

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub const FORM_URL: &str = "https://forms.example/d/abc/viewform?usp=pp_url&entry.1=TEST";
pub const FORM_PREFIX: &str = "https://forms.example/d/abc/viewform?usp=pp_url&entry.1=";

/// Builder for a one-page facesheet PDF.
pub struct Facesheet {
    name: String,
    id: String,
    school: Option<String>,
    photos: Vec<(u32, u32)>,
}

impl Facesheet {
    pub fn new(name: &str, id: &str) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
            school: Some("University of Somewhere School of Medicine".to_string()),
            photos: vec![(120, 160)],
        }
    }

    pub fn school(mut self, school: &str) -> Self {
        self.school = Some(school.to_string());
        self
    }

    /// Drop the "Most Recent Medical School:" line entirely.
    pub fn without_school_landmark(mut self) -> Self {
        self.school = None;
        self
    }

    pub fn photos(mut self, sizes: &[(u32, u32)]) -> Self {
        self.photos = sizes.to_vec();
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut lines = vec![
            format!("{} ({})", self.name, self.id),
            "ERAS Applicant Summary".to_string(),
        ];
        if let Some(school) = &self.school {
            lines.push(format!("Most Recent Medical School: {school}"));
        }
        lines.push("Location: Springfield, IL".to_string());

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
        for (i, &(w, h)) in self.photos.iter().enumerate() {
            let id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(w),
                    "Height" => i64::from(h),
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                },
                jpeg(w, h, i as u8),
            ));
            let name = format!("Im{}", i + 1);
            content.push_str(&format!("q {w} 0 0 {h} 72 480 cm /{name} Do Q\n"));
            xobjects.set(name, id);
        }
        for (i, line) in lines.iter().enumerate() {
            let escaped = line
                .replace('\\', "\\\\")
                .replace('(', "\\(")
                .replace(')', "\\)");
            content.push_str(&format!(
                "BT /F1 11 Tf 72 {} Td ({escaped}) Tj ET\n",
                740 - i * 16
            ));
        }
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let mut resources = dictionary! { "Font" => dictionary! { "F1" => font_id } };
        if !self.photos.is_empty() {
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
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).expect("save fixture pdf");
        out
    }
}

fn jpeg(width: u32, height: u32, seed: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, seed.wrapping_mul(40)])
    });
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
        .expect("encode jpeg");
    out
}

// ── .pptx inspection ─────────────────────────────────────────────────────────

pub fn part_names(pptx: &[u8]) -> Vec<String> {
    let archive = ZipArchive::new(Cursor::new(pptx)).expect("pptx is a zip");
    archive.file_names().map(str::to_string).collect()
}

pub fn read_part(pptx: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(pptx)).expect("pptx is a zip");
    let mut file = archive
        .by_name(name)
        .unwrap_or_else(|e| panic!("missing part {name}: {e}"));
    let mut out = String::new();
    file.read_to_string(&mut out).expect("utf-8 part");
    out
}

pub fn slide_count(pptx: &[u8]) -> usize {
    part_names(pptx)
        .iter()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .count()
}

/// Text of every `<a:t>` run on slide `n`, in document order.
pub fn slide_texts(pptx: &[u8], n: usize) -> Vec<String> {
    let xml = read_part(pptx, &format!("ppt/slides/slide{n}.xml"));
    xml.split("<a:t>")
        .skip(1)
        .filter_map(|s| s.split("</a:t>").next())
        .map(str::to_string)
        .collect()
}

/// Unescaped `Target` of every external relationship in a `.rels` part.
pub fn external_targets(rels: &str) -> Vec<String> {
    rels.split("<Relationship ")
        .skip(1)
        .filter(|r| r.contains("TargetMode=\"External\""))
        .filter_map(|r| r.split("Target=\"").nth(1))
        .filter_map(|t| t.split('"').next())
        .map(|t| {
            t.replace("&lt;", "<")
                .replace("&gt;", ">")
                .replace("&quot;", "\"")
                .replace("&apos;", "'")
                .replace("&amp;", "&")
        })
        .collect()
}
