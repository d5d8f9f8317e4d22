//! XML parts of a PresentationML package.
//!
//! Fixed parts (master, layout, theme, property parts) are static strings;
//! parts that depend on the slide count or on slide content are rendered by
//! the functions below. Every piece of caller-supplied text goes through
//! [`escape`].

use super::{Alignment, Picture, Point, Size, TextBox, TextRun, SLIDE_HEIGHT, SLIDE_WIDTH};
use std::borrow::Cow;

pub(super) const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

pub(super) const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub(super) const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
pub(super) const REL_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
pub(super) const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
pub(super) const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub(super) const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub(super) const REL_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
pub(super) const REL_PRES_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
pub(super) const REL_VIEW_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
pub(super) const REL_TABLE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";
pub(super) const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
pub(super) const REL_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

/// Escape text for use in XML content and attribute values.
///
/// Characters outside the XML 1.0 `Char` production (C0 controls other than
/// tab, line feed and carriage return; U+FFFE; U+FFFF) are dropped.
pub(crate) fn escape(text: &str) -> Cow<'_, str> {
    let needs_work = text
        .chars()
        .any(|c| matches!(c, '&' | '<' | '>' | '"' | '\'') || !is_xml_char(c));
    if !needs_work {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
    Cow::Owned(out)
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

// ── Relationships ────────────────────────────────────────────────────────

/// One entry of a `.rels` part.
pub(super) struct Relationship {
    pub id: String,
    pub rel_type: &'static str,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    pub fn internal(id: impl Into<String>, rel_type: &'static str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rel_type,
            target: target.into(),
            external: false,
        }
    }

    pub fn external(id: impl Into<String>, rel_type: &'static str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rel_type,
            target: target.into(),
            external: true,
        }
    }
}

pub(super) fn relationships_xml(rels: &[Relationship]) -> String {
    let mut xml = format!("{XML_DECL}\n<Relationships xmlns=\"{NS_PKG_RELS}\">");
    for rel in rels {
        xml.push_str(&format!(
            "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"{}/>",
            rel.id,
            rel.rel_type,
            escape(&rel.target),
            if rel.external {
                " TargetMode=\"External\""
            } else {
                ""
            }
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

// ── Package-level parts ──────────────────────────────────────────────────

pub(super) fn content_types_xml(slide_count: usize) -> String {
    let mut xml = format!(
        "{XML_DECL}\n<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Default Extension=\"png\" ContentType=\"image/png\"/>\
<Override PartName=\"/ppt/presentation.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml\"/>\
<Override PartName=\"/ppt/slideMasters/slideMaster1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml\"/>\
<Override PartName=\"/ppt/slideLayouts/slideLayout1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml\"/>\
<Override PartName=\"/ppt/theme/theme1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.theme+xml\"/>\
<Override PartName=\"/ppt/presProps.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.presProps+xml\"/>\
<Override PartName=\"/ppt/viewProps.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml\"/>\
<Override PartName=\"/ppt/tableStyles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml\"/>\
<Override PartName=\"/docProps/core.xml\" ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>\
<Override PartName=\"/docProps/app.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.extended-properties+xml\"/>"
    );
    for n in 1..=slide_count {
        xml.push_str(&format!(
            "<Override PartName=\"/ppt/slides/slide{n}.xml\" \
ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>"
        ));
    }
    xml.push_str("</Types>");
    xml
}

pub(super) fn core_properties_xml(title: &str) -> String {
    format!(
        "{XML_DECL}\n<cp:coreProperties \
xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
xmlns:dcterms=\"http://purl.org/dc/terms/\" \
xmlns:dcmitype=\"http://purl.org/dc/dcmitype/\" \
xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\
<dc:title>{}</dc:title><dc:creator>facesheet-deck</dc:creator>\
<cp:lastModifiedBy>facesheet-deck</cp:lastModifiedBy><cp:revision>1</cp:revision>\
</cp:coreProperties>",
        escape(title)
    )
}

pub(super) fn app_properties_xml(slide_count: usize) -> String {
    format!(
        "{XML_DECL}\n<Properties \
xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\" \
xmlns:vt=\"http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes\">\
<Application>facesheet-deck</Application><PresentationFormat>On-screen Show (4:3)</PresentationFormat>\
<Slides>{slide_count}</Slides><Notes>0</Notes><HiddenSlides>0</HiddenSlides>\
<AppVersion>16.0000</AppVersion></Properties>"
    )
}

/// `ppt/presentation.xml`; slide relationships start at `rId{first_slide_rid}`.
pub(super) fn presentation_xml(slide_count: usize, first_slide_rid: usize) -> String {
    let mut xml = format!(
        "{XML_DECL}\n<p:presentation xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\" saveSubsetFonts=\"1\">\
<p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst><p:sldIdLst>"
    );
    for i in 0..slide_count {
        xml.push_str(&format!(
            "<p:sldId id=\"{}\" r:id=\"rId{}\"/>",
            256 + i,
            first_slide_rid + i
        ));
    }
    xml.push_str(&format!(
        "</p:sldIdLst><p:sldSz cx=\"{}\" cy=\"{}\" type=\"screen4x3\"/>\
<p:notesSz cx=\"6858000\" cy=\"9144000\"/>{DEFAULT_TEXT_STYLE}</p:presentation>",
        SLIDE_WIDTH.0, SLIDE_HEIGHT.0
    ));
    xml
}

const DEFAULT_TEXT_STYLE: &str = "<p:defaultTextStyle><a:defPPr><a:defRPr lang=\"en-US\"/></a:defPPr>\
<a:lvl1pPr marL=\"0\" algn=\"l\" defTabSz=\"914400\" rtl=\"0\" eaLnBrk=\"1\" latinLnBrk=\"0\" hangingPunct=\"1\">\
<a:defRPr sz=\"1800\" kern=\"1200\"><a:solidFill><a:schemeClr val=\"tx1\"/></a:solidFill>\
<a:latin typeface=\"+mn-lt\"/><a:ea typeface=\"+mn-ea\"/><a:cs typeface=\"+mn-cs\"/></a:defRPr></a:lvl1pPr>\
</p:defaultTextStyle>";

pub(super) const PRES_PROPS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<p:presentationPr xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#
);

pub(super) const VIEW_PROPS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<p:viewPr xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
    r#"<p:normalViewPr><p:restoredLeft sz="15620"/><p:restoredTop sz="94660"/></p:normalViewPr>"#,
    r#"<p:gridSpacing cx="76200" cy="76200"/></p:viewPr>"#
);

pub(super) const TABLE_STYLES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<a:tblStyleLst xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" def="{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}"/>"#
);

const EMPTY_GROUP: &str = "<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
<p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/>\
<a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>";

pub(super) fn slide_master_xml() -> String {
    format!(
        "{XML_DECL}\n<p:sldMaster xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\">\
<p:cSld><p:bg><p:bgRef idx=\"1001\"><a:schemeClr val=\"bg1\"/></p:bgRef></p:bg>\
<p:spTree>{EMPTY_GROUP}</p:spTree></p:cSld>\
<p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" accent2=\"accent2\" \
accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/>\
<p:sldLayoutIdLst><p:sldLayoutId id=\"2147483649\" r:id=\"rId1\"/></p:sldLayoutIdLst>\
<p:txStyles><p:titleStyle><a:lvl1pPr algn=\"l\"><a:defRPr sz=\"4400\" kern=\"1200\">\
<a:solidFill><a:schemeClr val=\"tx1\"/></a:solidFill><a:latin typeface=\"+mj-lt\"/></a:defRPr></a:lvl1pPr></p:titleStyle>\
<p:bodyStyle><a:lvl1pPr marL=\"0\" algn=\"l\"><a:defRPr sz=\"2800\" kern=\"1200\">\
<a:solidFill><a:schemeClr val=\"tx1\"/></a:solidFill><a:latin typeface=\"+mn-lt\"/></a:defRPr></a:lvl1pPr></p:bodyStyle>\
<p:otherStyle><a:lvl1pPr marL=\"0\" algn=\"l\"><a:defRPr sz=\"1800\" kern=\"1200\">\
<a:solidFill><a:schemeClr val=\"tx1\"/></a:solidFill><a:latin typeface=\"+mn-lt\"/></a:defRPr></a:lvl1pPr></p:otherStyle>\
</p:txStyles></p:sldMaster>"
    )
}

pub(super) fn slide_layout_xml() -> String {
    format!(
        "{XML_DECL}\n<p:sldLayout xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\" type=\"blank\" preserve=\"1\">\
<p:cSld name=\"Blank\"><p:spTree>{EMPTY_GROUP}</p:spTree></p:cSld>\
<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"
    )
}

pub(super) fn theme_xml() -> String {
    format!(
        "{XML_DECL}\n<a:theme xmlns:a=\"{NS_A}\" name=\"Office Theme\"><a:themeElements>\
<a:clrScheme name=\"Office\">\
<a:dk1><a:sysClr val=\"windowText\" lastClr=\"000000\"/></a:dk1>\
<a:lt1><a:sysClr val=\"window\" lastClr=\"FFFFFF\"/></a:lt1>\
<a:dk2><a:srgbClr val=\"44546A\"/></a:dk2><a:lt2><a:srgbClr val=\"E7E6E6\"/></a:lt2>\
<a:accent1><a:srgbClr val=\"4472C4\"/></a:accent1><a:accent2><a:srgbClr val=\"ED7D31\"/></a:accent2>\
<a:accent3><a:srgbClr val=\"A5A5A5\"/></a:accent3><a:accent4><a:srgbClr val=\"FFC000\"/></a:accent4>\
<a:accent5><a:srgbClr val=\"5B9BD5\"/></a:accent5><a:accent6><a:srgbClr val=\"70AD47\"/></a:accent6>\
<a:hlink><a:srgbClr val=\"0563C1\"/></a:hlink><a:folHlink><a:srgbClr val=\"954F72\"/></a:folHlink>\
</a:clrScheme>\
<a:fontScheme name=\"Office\">\
<a:majorFont><a:latin typeface=\"Calibri Light\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:majorFont>\
<a:minorFont><a:latin typeface=\"Calibri\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:minorFont>\
</a:fontScheme>\
<a:fmtScheme name=\"Office\"><a:fillStyleLst>\
<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
<a:solidFill><a:schemeClr val=\"phClr\"><a:tint val=\"50000\"/></a:schemeClr></a:solidFill>\
<a:solidFill><a:schemeClr val=\"phClr\"><a:shade val=\"80000\"/></a:schemeClr></a:solidFill>\
</a:fillStyleLst><a:lnStyleLst>\
<a:ln w=\"6350\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>\
<a:ln w=\"12700\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>\
<a:ln w=\"19050\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>\
</a:lnStyleLst><a:effectStyleLst>\
<a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle>\
<a:effectStyle><a:effectLst/></a:effectStyle>\
</a:effectStyleLst><a:bgFillStyleLst>\
<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
<a:solidFill><a:schemeClr val=\"phClr\"><a:tint val=\"95000\"/></a:schemeClr></a:solidFill>\
<a:solidFill><a:schemeClr val=\"phClr\"><a:shade val=\"90000\"/></a:schemeClr></a:solidFill>\
</a:bgFillStyleLst></a:fmtScheme></a:themeElements>\
<a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"
    )
}

// ── Slide content ────────────────────────────────────────────────────────

pub(super) fn slide_open() -> String {
    format!(
        "{XML_DECL}\n<p:sld xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\">\
<p:cSld><p:spTree>{EMPTY_GROUP}"
    )
}

pub(super) const SLIDE_CLOSE: &str =
    "</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>";

fn xfrm(at: Point, size: Size) -> String {
    format!(
        "<a:xfrm><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>",
        at.x.0, at.y.0, size.cx.0, size.cy.0
    )
}

pub(super) fn picture_xml(shape_id: usize, picture: &Picture, embed_rid: &str) -> String {
    format!(
        "<p:pic><p:nvPicPr><p:cNvPr id=\"{shape_id}\" name=\"Picture {n}\" descr=\"{descr}\"/>\
<p:cNvPicPr><a:picLocks noChangeAspect=\"1\"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>\
<p:blipFill><a:blip r:embed=\"{embed_rid}\"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>\
<p:spPr>{xfrm}<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr></p:pic>",
        n = shape_id - 1,
        descr = escape(&picture.description),
        xfrm = xfrm(picture.at, picture.image.native_size()),
    )
}

/// Render a text box; `link_rids[i]` is the relationship id of the i-th
/// hyperlinked run in document order.
pub(super) fn text_box_xml(shape_id: usize, text_box: &TextBox, link_rids: &[String]) -> String {
    let mut links = link_rids.iter();
    let mut xml = format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{shape_id}\" name=\"TextBox {n}\"/><p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr>\
<p:spPr>{xfrm}<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>\
<p:txBody><a:bodyPr wrap=\"{wrap}\" rtlCol=\"0\"><a:spAutoFit/></a:bodyPr><a:lstStyle/>",
        n = shape_id - 1,
        xfrm = xfrm(text_box.at, text_box.size),
        wrap = if text_box.word_wrap { "square" } else { "none" },
    );

    for paragraph in &text_box.paragraphs {
        xml.push_str("<a:p>");
        match paragraph.alignment {
            Alignment::Left => {}
            Alignment::Center => xml.push_str("<a:pPr algn=\"ctr\"/>"),
            Alignment::Right => xml.push_str("<a:pPr algn=\"r\"/>"),
        }
        for run in &paragraph.runs {
            let rid = if run.hyperlink.is_some() {
                links.next().map(String::as_str)
            } else {
                None
            };
            xml.push_str(&run_xml(run, rid));
        }
        xml.push_str("</a:p>");
    }

    xml.push_str("</p:txBody></p:sp>");
    xml
}

fn run_xml(run: &TextRun, hyperlink_rid: Option<&str>) -> String {
    let fill = run
        .font
        .color
        .map(|c| format!("<a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>", c.hex()))
        .unwrap_or_default();
    let typeface = escape(&run.font.typeface);
    let link = hyperlink_rid
        .map(|rid| format!("<a:hlinkClick r:id=\"{rid}\"/>"))
        .unwrap_or_default();
    format!(
        "<a:r><a:rPr lang=\"en-US\" sz=\"{sz}\" dirty=\"0\">{fill}\
<a:latin typeface=\"{typeface}\"/><a:cs typeface=\"{typeface}\"/>{link}</a:rPr>\
<a:t>{text}</a:t></a:r>",
        sz = run.font.size_pt * 100,
        text = escape(&run.text),
    )
}

/// Hyperlink targets of a text box's runs, in document order.
pub(super) fn hyperlink_targets(text_box: &TextBox) -> impl Iterator<Item = &str> {
    text_box
        .paragraphs
        .iter()
        .flat_map(|p| p.runs.iter())
        .filter_map(|r| r.hyperlink.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Emu, Font, Paragraph, Rgb};

    #[test]
    fn escape_passes_plain_text_through() {
        assert!(matches!(escape("Jane Doe"), Cow::Borrowed("Jane Doe")));
    }

    #[test]
    fn escape_markup_and_controls() {
        assert_eq!(
            escape("a&b <c> \"d\" 'e'\u{0007}"),
            "a&amp;b &lt;c&gt; &quot;d&quot; &apos;e&apos;"
        );
        assert_eq!(escape("tab\tok"), "tab\tok");
    }

    #[test]
    fn relationships_mark_external_targets() {
        let xml = relationships_xml(&[
            Relationship::internal("rId1", REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
            Relationship::external("rId2", REL_HYPERLINK, "https://x.test/?a=1&b=Jane Doe"),
        ]);
        assert!(xml.contains("Target=\"../slideLayouts/slideLayout1.xml\"/>"));
        assert!(xml.contains("Target=\"https://x.test/?a=1&amp;b=Jane Doe\" TargetMode=\"External\""));
    }

    #[test]
    fn presentation_lists_every_slide() {
        let xml = presentation_xml(3, 5);
        assert!(xml.contains("<p:sldId id=\"256\" r:id=\"rId5\"/>"));
        assert!(xml.contains("<p:sldId id=\"258\" r:id=\"rId7\"/>"));
        assert!(!xml.contains("id=\"259\""));
        assert!(xml.contains("cx=\"9144000\" cy=\"6858000\""));
    }

    #[test]
    fn content_types_override_each_slide() {
        let xml = content_types_xml(2);
        assert!(xml.contains("/ppt/slides/slide1.xml"));
        assert!(xml.contains("/ppt/slides/slide2.xml"));
        assert!(!xml.contains("/ppt/slides/slide3.xml"));
    }

    #[test]
    fn text_box_renders_runs_links_and_alignment() {
        let tb = TextBox {
            at: Point::new(Emu(1), Emu(2)),
            size: Size::new(Emu(3), Emu(4)),
            word_wrap: false,
            paragraphs: vec![
                Paragraph::new(
                    TextRun::new("Jane Doe", Font::new("Arial", 24)).with_hyperlink("https://x/"),
                ),
                Paragraph::new(TextRun::new(
                    "1/3",
                    Font::new("Arial", 12).with_color(Rgb(128, 128, 128)),
                ))
                .aligned(Alignment::Right),
            ],
        };
        assert_eq!(hyperlink_targets(&tb).collect::<Vec<_>>(), vec!["https://x/"]);

        let xml = text_box_xml(3, &tb, &["rId4".to_string()]);
        assert!(xml.contains("name=\"TextBox 2\""));
        assert!(xml.contains("wrap=\"none\""));
        assert!(xml.contains("sz=\"2400\""));
        assert!(xml.contains("<a:hlinkClick r:id=\"rId4\"/>"));
        assert!(xml.contains("<a:pPr algn=\"r\"/>"));
        assert!(xml.contains("<a:srgbClr val=\"808080\"/>"));
        assert!(xml.contains("<a:t>1/3</a:t>"));
        assert_eq!(xml.matches("hlinkClick").count(), 1);
    }
}
