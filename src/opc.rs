//! Open Packaging plumbing shared by the Word and PowerPoint writers: XML
//! escaping, core document properties and the ZIP container.

#[cfg(any(feature = "docx", feature = "pptx"))]
use std::io::{Cursor, Write};

#[cfg(any(feature = "docx", feature = "pptx"))]
use zip::ZipWriter;
#[cfg(any(feature = "docx", feature = "pptx"))]
use zip::write::SimpleFileOptions;

#[cfg(any(feature = "docx", feature = "pptx"))]
use crate::error::Result;

pub const RELS_CONTENT_TYPE: &str = "application/vnd.openxmlformats-package.relationships+xml";
pub const CORE_CONTENT_TYPE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
pub const CORE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
pub const OFFICE_DOCUMENT_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Contents of `docProps/core.xml`. No timestamps, so output is reproducible.
#[derive(Debug, Default)]
pub struct CoreProperties {
    pub title: String,
    pub subject: String,
    pub creator: String,
    pub keywords: String,
    pub version: Option<String>,
}

impl CoreProperties {
    pub fn to_xml(&self) -> String {
        let version = self
            .version
            .as_deref()
            .map(|v| format!("\n  <cp:version>{}</cp:version>", escape_xml(v)))
            .unwrap_or_default();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <dc:title>{}</dc:title>
  <dc:subject>{}</dc:subject>
  <dc:creator>{}</dc:creator>
  <cp:keywords>{}</cp:keywords>{version}
</cp:coreProperties>"#,
            escape_xml(&self.title),
            escape_xml(&self.subject),
            escape_xml(&self.creator),
            escape_xml(&self.keywords),
        )
    }
}

/// Package-level relationships: the main part and the core properties.
pub fn package_rels(main_part: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="{OFFICE_DOCUMENT_REL_TYPE}" Target="{main_part}"/>
  <Relationship Id="rId2" Type="{CORE_REL_TYPE}" Target="docProps/core.xml"/>
</Relationships>"#
    )
}

/// Write `(name, content)` parts into an in-memory ZIP archive, in order.
#[cfg(any(feature = "docx", feature = "pptx"))]
pub fn write_parts(parts: &[(String, String)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, content) in parts {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(content.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn core_properties_are_escaped() {
        let props = CoreProperties {
            title: "Cats & Dogs".into(),
            creator: "Night Owl".into(),
            ..CoreProperties::default()
        };
        let xml = props.to_xml();
        assert!(xml.contains("<dc:title>Cats &amp; Dogs</dc:title>"));
        assert!(xml.contains("<dc:creator>Night Owl</dc:creator>"));
        assert!(!xml.contains("cp:version"));
    }

    #[test]
    fn package_rels_point_at_main_part() {
        let rels = package_rels("ppt/presentation.xml");
        assert!(rels.contains("Target=\"ppt/presentation.xml\""));
        assert!(rels.contains("Target=\"docProps/core.xml\""));
    }
}
