//! OPC package for a deck: presentation, one master, one blank layout, a
//! theme and the slides.

use crate::config::{PitchConfig, hex_digits};
use crate::content::Metadata;
use crate::error::Result;
use crate::opc::{self, CoreProperties, escape_xml};

use super::slide::{Slide, emu};

const NS: &str = "xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
                  xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
                  xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\"";

const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const EMPTY_TREE: &str = "<p:spTree><p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/>\
                          </p:nvGrpSpPr><p:grpSpPr/></p:spTree>";

/// Write the deck into an in-memory ZIP archive.
pub fn write_package(slides: &[Slide], meta: &Metadata, theme: &PitchConfig) -> Result<Vec<u8>> {
    let mut parts = vec![
        ("[Content_Types].xml".to_string(), content_types(slides.len())),
        (
            "_rels/.rels".to_string(),
            opc::package_rels("ppt/presentation.xml"),
        ),
        ("docProps/core.xml".to_string(), core_properties(meta)),
        ("ppt/presentation.xml".to_string(), presentation(slides.len(), theme)),
        (
            "ppt/_rels/presentation.xml.rels".to_string(),
            presentation_rels(slides.len()),
        ),
        ("ppt/slideMasters/slideMaster1.xml".to_string(), slide_master()),
        (
            "ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(),
            rels(&[
                ("slideLayout", "../slideLayouts/slideLayout1.xml"),
                ("theme", "../theme/theme1.xml"),
            ]),
        ),
        ("ppt/slideLayouts/slideLayout1.xml".to_string(), slide_layout()),
        (
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels".to_string(),
            rels(&[("slideMaster", "../slideMasters/slideMaster1.xml")]),
        ),
        ("ppt/theme/theme1.xml".to_string(), theme_xml(theme)),
        (
            "ppt/presProps.xml".to_string(),
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
                 <p:presentationPr {NS}/>"
            ),
        ),
    ];

    for (i, slide) in slides.iter().enumerate() {
        let n = i + 1;
        parts.push((format!("ppt/slides/slide{n}.xml"), slide.to_xml()));
        parts.push((
            format!("ppt/slides/_rels/slide{n}.xml.rels"),
            rels(&[("slideLayout", "../slideLayouts/slideLayout1.xml")]),
        ));
    }

    opc::write_parts(&parts)
}

fn core_properties(meta: &Metadata) -> String {
    CoreProperties {
        title: format!("{} - Pitch Deck", meta.game_title),
        subject: meta.tagline.clone(),
        creator: meta.studio_name.clone(),
        keywords: format!("pitch, {}, {}", meta.genre, meta.platform),
        version: None,
    }
    .to_xml()
}

fn content_types(slide_count: usize) -> String {
    let pml = "application/vnd.openxmlformats-officedocument.presentationml";
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
    );
    out.push_str(&format!(
        "<Default Extension=\"rels\" ContentType=\"{}\"/>",
        opc::RELS_CONTENT_TYPE
    ));
    out.push_str("<Default Extension=\"xml\" ContentType=\"application/xml\"/>");
    out.push_str(&format!(
        "<Override PartName=\"/ppt/presentation.xml\" ContentType=\"{pml}.presentation.main+xml\"/>"
    ));
    out.push_str(&format!(
        "<Override PartName=\"/ppt/slideMasters/slideMaster1.xml\" ContentType=\"{pml}.slideMaster+xml\"/>"
    ));
    out.push_str(&format!(
        "<Override PartName=\"/ppt/slideLayouts/slideLayout1.xml\" ContentType=\"{pml}.slideLayout+xml\"/>"
    ));
    out.push_str(&format!(
        "<Override PartName=\"/ppt/presProps.xml\" ContentType=\"{pml}.presProps+xml\"/>"
    ));
    for n in 1..=slide_count {
        out.push_str(&format!(
            "<Override PartName=\"/ppt/slides/slide{n}.xml\" ContentType=\"{pml}.slide+xml\"/>"
        ));
    }
    out.push_str(
        "<Override PartName=\"/ppt/theme/theme1.xml\" \
         ContentType=\"application/vnd.openxmlformats-officedocument.theme+xml\"/>",
    );
    out.push_str(&format!(
        "<Override PartName=\"/docProps/core.xml\" ContentType=\"{}\"/>",
        opc::CORE_CONTENT_TYPE
    ));
    out.push_str("</Types>");
    out
}

/// Relationships numbered `rId1..` in the order given. Types are short
/// names under the office document relationship namespace.
fn rels(targets: &[(&str, &str)]) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    );
    for (i, (kind, target)) in targets.iter().enumerate() {
        out.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"{REL_NS}/{kind}\" Target=\"{target}\"/>",
            i + 1
        ));
    }
    out.push_str("</Relationships>");
    out
}

/// Master is `rId1`, theme `rId2`, slides from `rId3`, presentation
/// properties last.
fn presentation_rels(slide_count: usize) -> String {
    let slides: Vec<String> = (1..=slide_count)
        .map(|n| format!("slides/slide{n}.xml"))
        .collect();
    let mut targets = vec![
        ("slideMaster", "slideMasters/slideMaster1.xml"),
        ("theme", "theme/theme1.xml"),
    ];
    targets.extend(slides.iter().map(|target| ("slide", target.as_str())));
    targets.push(("presProps", "presProps.xml"));
    rels(&targets)
}

fn presentation(slide_count: usize, theme: &PitchConfig) -> String {
    let mut out = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <p:presentation {NS} saveSubsetFonts=\"1\">\
         <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
         <p:sldIdLst>"
    );
    for n in 0..slide_count {
        out.push_str(&format!(
            "<p:sldId id=\"{}\" r:id=\"rId{}\"/>",
            256 + n,
            n + 3
        ));
    }
    out.push_str(&format!(
        "</p:sldIdLst><p:sldSz cx=\"{}\" cy=\"{}\"/><p:notesSz cx=\"6858000\" cy=\"9144000\"/>\
         </p:presentation>",
        emu(theme.slide_width),
        emu(theme.slide_height)
    ));
    out
}

fn slide_master() -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <p:sldMaster {NS}><p:cSld>{EMPTY_TREE}</p:cSld>\
         <p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" \
         accent2=\"accent2\" accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" \
         accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/>\
         <p:sldLayoutIdLst><p:sldLayoutId id=\"2147483649\" r:id=\"rId1\"/></p:sldLayoutIdLst>\
         </p:sldMaster>"
    )
}

fn slide_layout() -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <p:sldLayout {NS} type=\"blank\" preserve=\"1\"><p:cSld name=\"Blank\">{EMPTY_TREE}</p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"
    )
}

/// Office theme carrying the deck palette and fonts. Format schemes need
/// three entries each.
fn theme_xml(theme: &PitchConfig) -> String {
    let color = |name: &str, value: &str| {
        format!(
            "<a:{name}><a:srgbClr val=\"{}\"/></a:{name}>",
            hex_digits(value)
        )
    };
    let scheme = [
        color("dk1", &theme.bg_dark),
        color("lt1", &theme.text_primary),
        color("dk2", &theme.bg_slide),
        color("lt2", &theme.text_secondary),
        color("accent1", &theme.accent_blue),
        color("accent2", &theme.accent_gold),
        color("accent3", &theme.accent_green),
        color("accent4", &theme.accent_red),
        color("accent5", &theme.bg_card),
        color("accent6", &theme.text_secondary),
        color("hlink", &theme.accent_blue),
        color("folHlink", &theme.accent_gold),
    ]
    .concat();

    let font = |tag: &str, face: &str| {
        format!(
            "<a:{tag}><a:latin typeface=\"{}\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:{tag}>",
            escape_xml(face)
        )
    };
    let fill = "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>";
    let line = "<a:ln w=\"9525\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>";
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <a:theme xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" name=\"Pitch\">\
         <a:themeElements><a:clrScheme name=\"Pitch\">{scheme}</a:clrScheme>\
         <a:fontScheme name=\"Pitch\">{}{}</a:fontScheme>\
         <a:fmtScheme name=\"Pitch\">\
         <a:fillStyleLst>{fill}{fill}{fill}</a:fillStyleLst>\
         <a:lnStyleLst>{line}{line}{line}</a:lnStyleLst>\
         <a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst>\
         <a:bgFillStyleLst>{fill}{fill}{fill}</a:bgFillStyleLst>\
         </a:fmtScheme></a:themeElements></a:theme>",
        font("majorFont", &theme.heading_font),
        font("minorFont", &theme.body_font)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pptx::slide::Frame;
    use std::io::{Cursor, Read};

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut out = String::new();
        part.read_to_string(&mut out).unwrap();
        out
    }

    fn two_slides() -> Vec<Slide> {
        let mut first = Slide::new("#0f172a");
        first.rect(Frame::new(0.0, 0.0, 0.08, 5.625), "#e8b84b");
        vec![first, Slide::new("#162139")]
    }

    #[test]
    fn package_lists_every_slide() {
        let bytes =
            write_package(&two_slides(), &Metadata::default(), &PitchConfig::default()).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert!(names.contains(&"ppt/slides/slide2.xml"));
        assert!(names.contains(&"ppt/slides/_rels/slide2.xml.rels"));
        assert!(!names.contains(&"ppt/slides/slide3.xml"));

        let types = read_part(&bytes, "[Content_Types].xml");
        assert!(types.contains("/ppt/slides/slide2.xml"));
        assert!(types.contains("presentationml.slideMaster+xml"));

        let presentation = read_part(&bytes, "ppt/presentation.xml");
        assert!(presentation.contains("<p:sldId id=\"257\" r:id=\"rId4\"/>"));
        assert!(presentation.contains("<p:sldSz cx=\"9144000\" cy=\"5143500\"/>"));
    }

    #[test]
    fn presentation_rels_follow_slide_ids() {
        let rels = presentation_rels(2);
        assert!(rels.contains("Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster\""));
        assert!(rels.contains("Id=\"rId3\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide\" Target=\"slides/slide1.xml\""));
        assert!(rels.contains("Id=\"rId5\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps\""));
    }

    #[test]
    fn theme_carries_palette_and_fonts() {
        let xml = theme_xml(&PitchConfig::default());
        assert!(xml.contains("<a:dk1><a:srgbClr val=\"0F172A\"/></a:dk1>"));
        assert!(xml.contains("<a:majorFont><a:latin typeface=\"Calibri\"/>"));
        assert_eq!(xml.matches("<a:effectStyle>").count(), 3);
    }

    #[test]
    fn metadata_is_escaped() {
        let meta = Metadata {
            game_title: "Cats & Dogs".to_string(),
            ..Metadata::default()
        };
        let xml = core_properties(&meta);
        assert!(xml.contains("<dc:title>Cats &amp; Dogs - Pitch Deck</dc:title>"));
    }
}
