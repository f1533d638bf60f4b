use crate::config::{Config, hex_digits};
use crate::content::Metadata;
use crate::error::Result;
use crate::opc::{self, CoreProperties, escape_xml};

use super::xml::{self, Border, ParaProps, RunProps};

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/word/settings.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml"/>
  <Override PartName="/word/header1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml"/>
  <Override PartName="/word/footer1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings" Target="settings.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/>
  <Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/>
</Relationships>"#;

/// Fields (page numbers, the TOC) are refreshed when Word opens the file.
const SETTINGS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:updateFields w:val="true"/>
  <w:defaultTabStop w:val="283"/>
</w:settings>"#;

/// Write every part of the package into an in-memory ZIP archive.
pub fn write_package(config: &Config, meta: &Metadata, body: &str) -> Result<Vec<u8>> {
    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", opc::package_rels("word/document.xml")),
        ("docProps/core.xml", core_properties(meta)),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.to_string()),
        ("word/document.xml", document(config, body)),
        ("word/styles.xml", styles(config)),
        ("word/settings.xml", SETTINGS.to_string()),
        ("word/header1.xml", header(config, meta)),
        ("word/footer1.xml", footer(config, meta)),
    ];
    let parts: Vec<(String, String)> = parts
        .into_iter()
        .map(|(name, content)| (name.to_string(), content))
        .collect();
    opc::write_parts(&parts)
}

fn core_properties(meta: &Metadata) -> String {
    CoreProperties {
        title: format!("{} - Game Design Document", meta.game_title),
        subject: meta.tagline.clone(),
        creator: meta.studio_name.clone(),
        keywords: format!("GDD, {}, {}", meta.genre, meta.platform),
        version: Some(meta.version.clone()),
    }
    .to_xml()
}

fn document(config: &Config, body: &str) -> String {
    let page = &config.page;
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NS}" xmlns:r="{R_NS}"><w:body>{body}<w:sectPr><w:headerReference w:type="default" r:id="rId3"/><w:footerReference w:type="default" r:id="rId4"/><w:pgSz w:w="{}" w:h="{}"/><w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="567" w:footer="567" w:gutter="0"/><w:titlePg/></w:sectPr></w:body></w:document>"#,
        xml::twips_mm(page.width),
        xml::twips_mm(page.height),
        xml::twips_mm(page.margin_top),
        xml::twips_mm(page.margin_right),
        xml::twips_mm(page.margin_bottom),
        xml::twips_mm(page.margin_left),
    )
}

fn styles(config: &Config) -> String {
    let font = &config.font;
    let colors = &config.colors;
    let mut out = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{W_NS}"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="{body}" w:hAnsi="{body}" w:cs="{body}"/><w:color w:val="{color}"/><w:sz w:val="{size}"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="0"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
        body = escape_xml(&font.body),
        color = hex_digits(&colors.body),
        size = (font.body_size * 2.0).round() as u32,
    );

    for level in 1..=4u8 {
        let (above, below) = config.spacing.heading_gaps(level);
        let border = if level == 1 {
            format!(
                "<w:pBdr><w:bottom w:val=\"single\" w:sz=\"6\" w:space=\"1\" w:color=\"{}\"/></w:pBdr>",
                hex_digits(&colors.heading_1)
            )
        } else {
            String::new()
        };
        out.push_str(&format!(
            r#"<w:style w:type="paragraph" w:styleId="Heading{level}"><w:name w:val="heading {level}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/>{border}<w:spacing w:before="{}" w:after="{}"/><w:outlineLvl w:val="{}"/></w:pPr><w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/><w:b/><w:color w:val="{}"/><w:sz w:val="{}"/></w:rPr></w:style>"#,
            xml::twips_mm(above),
            xml::twips_mm(below),
            level - 1,
            hex_digits(colors.heading(level)),
            (font.size_for_heading(level) * 2.0).round() as u32,
            font = escape_xml(&font.heading),
        ));
    }

    out.push_str(&format!(
        r#"<w:style w:type="paragraph" w:styleId="TOCHeading"><w:name w:val="TOC Heading"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:spacing w:after="{}"/></w:pPr><w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/><w:b/><w:color w:val="{}"/><w:sz w:val="{}"/></w:rPr></w:style></w:styles>"#,
        xml::twips_mm(config.spacing.paragraph),
        hex_digits(&colors.heading_1),
        (font.h1_size * 2.0).round() as u32,
        font = escape_xml(&font.heading),
    ));
    out
}

fn chrome_run<'a>(config: &'a Config) -> RunProps<'a> {
    RunProps {
        font: Some(&config.font.body),
        color: Some(&config.colors.caption),
        size: Some(config.font.header_size),
        ..RunProps::default()
    }
}

fn header(config: &Config, meta: &Metadata) -> String {
    let text = format!(
        "{}  |  Game Design Document  |  {}",
        meta.game_title, meta.version
    );
    let para = xml::paragraph(
        &ParaProps {
            border: Some(Border::Bottom {
                color: &config.colors.table_border,
                size: 4,
            }),
            align: Some("right"),
            ..ParaProps::default()
        },
        &xml::run(&text, &chrome_run(config)),
    );
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:hdr xmlns:w=\"{W_NS}\">{para}</w:hdr>"
    )
}

fn footer(config: &Config, meta: &Metadata) -> String {
    let props = chrome_run(config);
    let runs = [
        xml::run("Page ", &props),
        xml::field("PAGE", &props),
        xml::run(" of ", &props),
        xml::field("NUMPAGES", &props),
        xml::run(&format!("   |   CONFIDENTIAL   |   {}", meta.date), &props),
    ]
    .concat();
    let para = xml::paragraph(
        &ParaProps {
            align: Some("center"),
            ..ParaProps::default()
        },
        &runs,
    );
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:ftr xmlns:w=\"{W_NS}\">{para}</w:ftr>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut out = String::new();
        part.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn package_contains_all_parts() {
        let config = Config::default();
        let meta = Metadata::default();
        let bytes = write_package(&config, &meta, "<w:p/>").unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "docProps/core.xml",
                "word/_rels/document.xml.rels",
                "word/document.xml",
                "word/footer1.xml",
                "word/header1.xml",
                "word/settings.xml",
                "word/styles.xml",
            ]
        );
    }

    #[test]
    fn document_has_page_setup_and_title_page() {
        let config = Config::default();
        let bytes = write_package(&config, &Metadata::default(), "<w:p/>").unwrap();
        let doc = read_part(&bytes, "word/document.xml");
        assert!(doc.contains("<w:body><w:p/><w:sectPr>"));
        assert!(doc.contains("<w:pgSz w:w=\"11906\" w:h=\"16838\"/>"));
        assert!(doc.contains("<w:titlePg/>"));
    }

    #[test]
    fn headings_have_outline_levels() {
        let styles = styles(&Config::default());
        for level in 1..=4 {
            assert!(styles.contains(&format!("w:styleId=\"Heading{level}\"")));
            assert!(styles.contains(&format!("<w:outlineLvl w:val=\"{}\"/>", level - 1)));
        }
        assert!(styles.contains("<w:sz w:val=\"44\"/>"));
    }

    #[test]
    fn footer_numbers_pages() {
        let meta = Metadata {
            date: "March 2025".into(),
            ..Metadata::default()
        };
        let footer = footer(&Config::default(), &meta);
        assert!(footer.contains("> PAGE </w:instrText>"));
        assert!(footer.contains("> NUMPAGES </w:instrText>"));
        assert!(footer.contains("CONFIDENTIAL   |   March 2025"));
    }

    #[test]
    fn metadata_is_escaped() {
        let meta = Metadata {
            game_title: "Cats & Dogs".into(),
            ..Metadata::default()
        };
        let core = core_properties(&meta);
        assert!(core.contains("<dc:title>Cats &amp; Dogs - Game Design Document</dc:title>"));
        let header = header(&Config::default(), &meta);
        assert!(header.contains("Cats &amp; Dogs  |  Game Design Document  |  v0.1"));
    }
}
