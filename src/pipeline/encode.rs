//! Deep-link encoding: form-URL template + applicant name → QR code PNG.
//!
//! The template is a form's "pre-filled link" whose applicant-name answer
//! has been filled with a placeholder:
//!
//! ```text
//! https://forms.example/d/abc/viewform?usp=pp_url&entry.1=TEST
//! ```
//!
//! Everything after the second `=` is the placeholder answer. It is cut off
//! and replaced by each applicant's name, concatenated verbatim (names are
//! not percent-encoded, so a name with URL-reserved characters produces a
//! link the form may misread).
//!
//! ## QR parameters
//!
//! Error correction level L, 2 px modules, 4-module quiet zone, version
//! chosen automatically as the smallest that fits the payload.

use crate::deck::PngImage;
use crate::error::DeckError;
use image::{DynamicImage, Luma};
use qrcode::{EcLevel, QrCode};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Pixels per QR module.
pub const MODULE_SIZE: u32 = 2;

/// Quiet-zone width in modules.
pub const QUIET_ZONE_MODULES: u32 = 4;

/// A form URL truncated right after its second `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormUrlTemplate {
    prefix: String,
}

impl FormUrlTemplate {
    /// Validate `url` and truncate it after the second `=`.
    ///
    /// # Errors
    /// [`DeckError::InvalidFormUrl`] when `url` contains fewer than two `=`.
    pub fn parse(url: &str) -> Result<Self, DeckError> {
        match url.match_indices('=').nth(1) {
            Some((i, _)) => Ok(Self {
                prefix: url[..=i].to_string(),
            }),
            None => Err(DeckError::InvalidFormUrl {
                url: url.to_string(),
                found: url.matches('=').count(),
            }),
        }
    }

    /// The truncated template, ending in `=`.
    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    /// The deep link for one applicant.
    pub fn link_for(&self, full_name: &str) -> String {
        format!("{}{}", self.prefix, full_name)
    }
}

impl fmt::Display for FormUrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix)
    }
}

/// A deep link and its rendered QR code.
#[derive(Debug, Clone)]
pub struct DeepLinkCode {
    pub url: String,
    pub image: PngImage,
    /// QR symbol version (1–40).
    pub version: i16,
}

#[derive(Debug, Error)]
pub enum CodeError {
    #[error("payload does not fit a QR code: {0}")]
    Capacity(String),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),
}

/// Build the deep link for `full_name` and render it as a QR code.
pub fn encode_deep_link(template: &FormUrlTemplate, full_name: &str) -> Result<DeepLinkCode, CodeError> {
    let url = template.link_for(full_name);
    let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::L)
        .map_err(|e| CodeError::Capacity(e.to_string()))?;

    let version = match code.version() {
        qrcode::Version::Normal(v) | qrcode::Version::Micro(v) => v,
    };

    let raster = code
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .module_dimensions(MODULE_SIZE, MODULE_SIZE)
        .build();
    let image = PngImage::encode(&DynamicImage::ImageLuma8(raster))?;
    debug!(
        "QR version {} ({} modules) for {} byte link → {}x{} px",
        version,
        code.width(),
        url.len(),
        image.width,
        image.height
    );

    Ok(DeepLinkCode {
        url,
        image,
        version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrcode::Color;

    const TEMPLATE: &str = "https://forms.example/d/abc/viewform?usp=pp_url&entry.1=TEST";

    #[test]
    fn truncates_after_second_equals() {
        let t = FormUrlTemplate::parse(TEMPLATE).expect("valid");
        assert_eq!(t.as_str(), "https://forms.example/d/abc/viewform?usp=pp_url&entry.1=");
        assert!(TEMPLATE.starts_with(t.as_str()));
        assert_eq!(t.to_string(), t.as_str());
    }

    #[test]
    fn truncation_is_a_prefix_ending_at_second_equals() {
        for url in ["a=b=c", "==", "x=y=", "p?a=1&b=2&c=3", "=mid=end=more"] {
            let t = FormUrlTemplate::parse(url).expect(url);
            assert!(url.starts_with(t.as_str()), "{url}");
            assert!(t.as_str().ends_with('='), "{url}");
            assert_eq!(t.as_str().matches('=').count(), 2, "{url}");
        }
    }

    #[test]
    fn fewer_than_two_equals_is_rejected() {
        for (url, found) in [("no-equals-here", 0), ("a=b", 1), ("", 0)] {
            match FormUrlTemplate::parse(url) {
                Err(DeckError::InvalidFormUrl { url: u, found: f }) => {
                    assert_eq!(u, url);
                    assert_eq!(f, found);
                }
                other => panic!("expected InvalidFormUrl for {url:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn link_concatenates_name_verbatim() {
        let t = FormUrlTemplate::parse(TEMPLATE).unwrap();
        assert_eq!(
            t.link_for("Jane Doe"),
            "https://forms.example/d/abc/viewform?usp=pp_url&entry.1=Jane Doe"
        );
        assert!(t.link_for("A&B O'Neil").ends_with("=A&B O'Neil"));
    }

    #[test]
    fn rendered_modules_match_expected_payload() {
        let t = FormUrlTemplate::parse(TEMPLATE).unwrap();
        let code = encode_deep_link(&t, "Jane Doe").expect("encode");
        let expected = "https://forms.example/d/abc/viewform?usp=pp_url&entry.1=Jane Doe";
        assert_eq!(code.url, expected);

        let reference = QrCode::with_error_correction_level(expected.as_bytes(), EcLevel::L).unwrap();
        let modules = reference.width() as u32;
        let side = (modules + 2 * QUIET_ZONE_MODULES) * MODULE_SIZE;
        assert_eq!((code.image.width, code.image.height), (side, side));

        let raster = image::load_from_memory(&code.image.bytes)
            .expect("png decodes")
            .to_luma8();
        let colors = reference.to_colors();
        for y in 0..modules {
            for x in 0..modules {
                let px = raster.get_pixel(
                    (x + QUIET_ZONE_MODULES) * MODULE_SIZE,
                    (y + QUIET_ZONE_MODULES) * MODULE_SIZE,
                )[0];
                let dark = colors[(y * modules + x) as usize] == Color::Dark;
                assert_eq!(px == 0, dark, "module ({x},{y})");
            }
        }
        // Quiet zone is white.
        assert_eq!(raster.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn longer_names_need_no_smaller_version() {
        let t = FormUrlTemplate::parse(TEMPLATE).unwrap();
        let short = encode_deep_link(&t, "Al Bo").unwrap();
        let long = encode_deep_link(&t, &"Maximilian ".repeat(20)).unwrap();
        assert!(long.version >= short.version);
        assert!(long.image.width >= short.image.width);
    }

    #[test]
    fn oversized_payload_fails() {
        let t = FormUrlTemplate::parse("a=b=").unwrap();
        let huge = "x".repeat(4000);
        assert!(matches!(encode_deep_link(&t, &huge), Err(CodeError::Capacity(_))));
    }
}
