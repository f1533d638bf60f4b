//! Word (DOCX) output.
//!
//! The backend accumulates the body of `word/document.xml`; [`package`]
//! wraps it with styles, header, footer and metadata into a ZIP container.

#[cfg(feature = "docx")]
mod package;
pub mod xml;

use crate::block::CalloutKind;
use crate::config::Config;
use crate::content::Metadata;
use crate::error::Result;
use crate::render::{Backend, Feature};

use xml::{Border, ParaProps, RunProps};

/// Heading levels included in the Word table of contents field.
const TOC_INSTRUCTION: &str = "TOC \\o \"1-3\" \\h \\z \\u";

pub struct DocxBackend<'a> {
    config: &'a Config,
    body: String,
    /// Column widths of the open table, in millimetres.
    widths: Vec<f32>,
}

impl<'a> DocxBackend<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            body: String::new(),
            widths: Vec::new(),
        }
    }

    /// The body paragraphs and tables written so far.
    pub fn body_xml(&self) -> &str {
        &self.body
    }

    /// Package the document as DOCX bytes.
    #[cfg(feature = "docx")]
    pub fn into_bytes(self, meta: &Metadata) -> Result<Vec<u8>> {
        package::write_package(self.config, meta, &self.body)
    }

    fn body_run(&self, text: &str) -> String {
        xml::run(
            text,
            &RunProps {
                font: Some(&self.config.font.body),
                size: Some(self.config.font.body_size),
                color: Some(&self.config.colors.body),
                ..RunProps::default()
            },
        )
    }

    fn cell(&self, width: f32, fill: &str, runs: &str, align: Option<&str>) -> String {
        format!(
            "<w:tc><w:tcPr><w:tcW w:w=\"{}\" w:type=\"dxa\"/>\
             <w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/></w:tcPr>{}</w:tc>",
            xml::twips_mm(width),
            crate::config::hex_digits(fill),
            xml::paragraph(
                &ParaProps {
                    before: Some(2.0),
                    after: Some(2.0),
                    align,
                    ..ParaProps::default()
                },
                runs
            )
        )
    }

    fn cover_line(&mut self, text: &str, run: RunProps, after: f32) {
        let para = xml::paragraph(
            &ParaProps {
                after: Some(after),
                align: Some("center"),
                ..ParaProps::default()
            },
            &xml::run(text, &run),
        );
        self.body.push_str(&para);
    }
}

impl Backend for DocxBackend<'_> {
    fn supports(&self, feature: Feature) -> bool {
        feature != Feature::TocEntries
    }

    fn paginates_natively(&self) -> bool {
        true
    }

    fn cover_page(&mut self, meta: &Metadata) -> Result<()> {
        let config = self.config;
        let font = &config.font;
        let colors = &config.colors;

        let spacer = xml::paragraph(
            &ParaProps {
                before: Some(120.0),
                ..ParaProps::default()
            },
            "",
        );
        self.body.push_str(&spacer);

        let title = xml::paragraph(
            &ParaProps {
                border: Some(Border::Bottom {
                    color: &colors.cover_accent,
                    size: 12,
                }),
                after: Some(18.0),
                align: Some("center"),
                ..ParaProps::default()
            },
            &xml::run(
                &meta.game_title,
                &RunProps {
                    font: Some(&font.heading),
                    bold: true,
                    color: Some(&colors.heading_1),
                    size: Some(font.cover_title_size),
                    ..RunProps::default()
                },
            ),
        );
        self.body.push_str(&title);

        self.cover_line(
            &meta.tagline,
            RunProps {
                font: Some(&font.body),
                italic: true,
                color: Some(&colors.heading_4),
                size: Some(font.cover_tagline_size),
                ..RunProps::default()
            },
            24.0,
        );
        self.cover_line(
            &format!("{}  ·  {}  ·  {}", meta.genre, meta.platform, meta.audience),
            RunProps {
                font: Some(&font.body),
                color: Some(&colors.caption),
                size: Some(font.body_size + 1.0),
                ..RunProps::default()
            },
            60.0,
        );
        self.cover_line(
            &meta.studio_name,
            RunProps {
                font: Some(&font.heading),
                bold: true,
                color: Some(&colors.heading_1),
                size: Some(14.0),
                ..RunProps::default()
            },
            6.0,
        );
        let details = [
            "Game Design Document".to_string(),
            format!("Version: {}  ·  Date: {}", meta.version, meta.date),
            format!("Lead Designer(s): {}", meta.lead_designer),
        ];
        for line in &details {
            self.cover_line(
                line,
                RunProps {
                    font: Some(&font.body),
                    color: Some(&colors.caption),
                    size: Some(11.0),
                    ..RunProps::default()
                },
                4.0,
            );
        }
        self.cover_line(
            "CONFIDENTIAL. For internal use and authorized partners only. \
             Do not distribute without written permission.",
            RunProps {
                font: Some(&font.body),
                italic: true,
                color: Some(&colors.caption),
                size: Some(9.0),
                ..RunProps::default()
            },
            0.0,
        );
        Ok(())
    }

    fn page_break(&mut self) -> Result<()> {
        self.body.push_str(xml::page_break());
        Ok(())
    }

    fn heading(&mut self, level: u8, text: &str) -> Result<()> {
        let style = format!("Heading{}", level.clamp(1, 4));
        let para = xml::paragraph(
            &ParaProps {
                style: Some(&style),
                ..ParaProps::default()
            },
            &xml::run(text, &RunProps::default()),
        );
        self.body.push_str(&para);
        Ok(())
    }

    fn paragraph(&mut self, text: &str) -> Result<()> {
        let para = xml::paragraph(
            &ParaProps {
                after: Some(6.0),
                align: Some("both"),
                ..ParaProps::default()
            },
            &self.body_run(text),
        );
        self.body.push_str(&para);
        Ok(())
    }

    fn bullet(&mut self, text: &str, indent: u8) -> Result<()> {
        let spacing = &self.config.spacing;
        let marker = if indent == 0 { "•" } else { "–" };
        let runs = format!("{}{}{}", self.body_run(marker), xml::tab(), self.body_run(text));
        let para = xml::paragraph(
            &ParaProps {
                before: Some(2.0),
                after: Some(2.0),
                indent: Some(spacing.bullet_indent * f32::from(indent + 2)),
                hanging: Some(spacing.bullet_indent),
                ..ParaProps::default()
            },
            &runs,
        );
        self.body.push_str(&para);
        Ok(())
    }

    fn numbered_item(&mut self, number: usize, text: &str) -> Result<()> {
        let spacing = &self.config.spacing;
        let runs = format!(
            "{}{}{}",
            self.body_run(&format!("{number}.")),
            xml::tab(),
            self.body_run(text)
        );
        let para = xml::paragraph(
            &ParaProps {
                before: Some(2.0),
                after: Some(2.0),
                indent: Some(spacing.bullet_indent * 2.0),
                hanging: Some(spacing.bullet_indent),
                ..ParaProps::default()
            },
            &runs,
        );
        self.body.push_str(&para);
        Ok(())
    }

    fn begin_table(&mut self, headers: &[String], widths: &[f32]) -> Result<()> {
        let colors = &self.config.colors;
        let border = crate::config::hex_digits(&colors.table_border);
        let total: f32 = widths.iter().sum();

        self.body.push_str(&format!(
            "<w:tbl><w:tblPr><w:tblW w:w=\"{}\" w:type=\"dxa\"/><w:tblBorders>",
            xml::twips_mm(total)
        ));
        for side in ["top", "left", "bottom", "right", "insideH", "insideV"] {
            self.body.push_str(&format!(
                "<w:{side} w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"{border}\"/>"
            ));
        }
        self.body
            .push_str("</w:tblBorders><w:tblLayout w:type=\"fixed\"/></w:tblPr><w:tblGrid>");
        for width in widths {
            self.body.push_str(&format!("<w:gridCol w:w=\"{}\"/>", xml::twips_mm(*width)));
        }
        self.body.push_str("</w:tblGrid>");

        let mut row = String::from("<w:tr><w:trPr><w:tblHeader/></w:trPr>");
        for (header, width) in headers.iter().zip(widths) {
            let text = xml::run(
                header,
                &RunProps {
                    font: Some(&self.config.font.body),
                    bold: true,
                    color: Some(&colors.table_header_text),
                    size: Some(self.config.font.body_size),
                    ..RunProps::default()
                },
            );
            row.push_str(&self.cell(*width, &colors.table_header_bg, &text, Some("center")));
        }
        row.push_str("</w:tr>");
        self.body.push_str(&row);
        self.widths = widths.to_vec();
        Ok(())
    }

    fn table_row(&mut self, cells: &[String], shaded: bool) -> Result<()> {
        let colors = &self.config.colors;
        let fill = if shaded {
            &colors.table_row_alt
        } else {
            &colors.table_row_normal
        };
        let mut row = String::from("<w:tr>");
        for (cell, width) in cells.iter().zip(&self.widths) {
            row.push_str(&self.cell(*width, fill, &self.body_run(cell), None));
        }
        row.push_str("</w:tr>");
        self.body.push_str(&row);
        Ok(())
    }

    fn end_table(&mut self) -> Result<()> {
        self.body.push_str("</w:tbl>");
        self.body.push_str(&xml::paragraph(&ParaProps::default(), ""));
        self.widths.clear();
        Ok(())
    }

    fn code_block(&mut self, lines: &[String]) -> Result<()> {
        let config = self.config;
        let para = xml::paragraph(
            &ParaProps {
                shading: Some(&config.colors.code_bg),
                before: Some(4.0),
                after: Some(8.0),
                indent: Some(5.0),
                ..ParaProps::default()
            },
            &xml::run(
                &lines.join("\n"),
                &RunProps {
                    font: Some(&config.font.code),
                    size: Some(config.font.code_size),
                    ..RunProps::default()
                },
            ),
        );
        self.body.push_str(&para);
        Ok(())
    }

    fn callout(&mut self, kind: CalloutKind, text: &str) -> Result<()> {
        let config = self.config;
        let colors = &config.colors;
        let (bg, border) = match kind {
            CalloutKind::Note => (&colors.note_bg, &colors.note_border),
            CalloutKind::OpenQuestion => (&colors.warn_bg, &colors.warn_border),
        };
        let label = xml::run(
            &format!("{} ", kind.label()),
            &RunProps {
                font: Some(&config.font.body),
                bold: true,
                color: Some(border),
                size: Some(config.font.body_size),
                ..RunProps::default()
            },
        );
        let para = xml::paragraph(
            &ParaProps {
                border: Some(Border::Left {
                    color: border,
                    size: 24,
                }),
                shading: Some(bg),
                before: Some(6.0),
                after: Some(6.0),
                indent: Some(2.5),
                ..ParaProps::default()
            },
            &format!("{label}{}", self.body_run(text)),
        );
        self.body.push_str(&para);
        Ok(())
    }

    fn diagram(&mut self, label: &str) -> Result<()> {
        let config = self.config;
        let colors = &config.colors;
        let frame = xml::paragraph(
            &ParaProps {
                border: Some(Border::Box {
                    color: &colors.table_border,
                    size: 6,
                }),
                before: Some(20.0),
                after: Some(20.0),
                align: Some("center"),
                ..ParaProps::default()
            },
            &xml::run(
                &format!("[ DIAGRAM: {label} ]"),
                &RunProps {
                    font: Some(&config.font.body),
                    color: Some(&colors.caption),
                    size: Some(config.font.body_size),
                    ..RunProps::default()
                },
            ),
        );
        let caption = xml::paragraph(
            &ParaProps {
                after: Some(8.0),
                align: Some("center"),
                ..ParaProps::default()
            },
            &xml::run(
                &format!("Figure: {label}"),
                &RunProps {
                    font: Some(&config.font.body),
                    italic: true,
                    color: Some(&colors.caption),
                    size: Some(config.font.caption_size),
                    ..RunProps::default()
                },
            ),
        );
        self.body.push_str(&frame);
        self.body.push_str(&caption);
        Ok(())
    }

    fn toc_field(&mut self) -> Result<()> {
        let config = self.config;
        let heading = xml::paragraph(
            &ParaProps {
                style: Some("TOCHeading"),
                ..ParaProps::default()
            },
            &xml::run("Table of Contents", &RunProps::default()),
        );
        let field = xml::paragraph(
            &ParaProps::default(),
            &xml::field(TOC_INSTRUCTION, &RunProps::default()),
        );
        let note = xml::paragraph(
            &ParaProps {
                after: Some(12.0),
                ..ParaProps::default()
            },
            &xml::run(
                "[ Right-click → Update Field to populate this Table of Contents ]",
                &RunProps {
                    italic: true,
                    color: Some(&config.colors.caption),
                    size: Some(9.0),
                    ..RunProps::default()
                },
            ),
        );
        self.body.push_str(&heading);
        self.body.push_str(&field);
        self.body.push_str(&note);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Flow;

    fn render(content: &str) -> String {
        let config = Config::default();
        let mut flow = Flow::new(DocxBackend::new(&config), &config);
        flow.render_content(content).unwrap();
        flow.into_parts().0.body
    }

    #[test]
    fn heading_uses_style() {
        assert_eq!(
            render("### Combat"),
            "<w:p><w:pPr><w:pStyle w:val=\"Heading3\"/></w:pPr>\
             <w:r><w:t xml:space=\"preserve\">Combat</w:t></w:r></w:p>"
        );
    }

    #[test]
    fn text_is_escaped() {
        let body = render("Fish & <Chips>");
        assert!(body.contains(">Fish &amp; &lt;Chips&gt;</w:t>"));
    }

    #[test]
    fn table_header_repeats_in_word() {
        let body = render("| Stat | Value |\n|---|---|\n| HP | 100 |\n| MP | 50 |");
        assert_eq!(body.matches("<w:tbl>").count(), 1);
        assert_eq!(body.matches("<w:tblHeader/>").count(), 1);
        assert_eq!(body.matches("<w:tr>").count(), 3);
        assert!(body.contains("<w:gridCol w:w=\"4535\"/><w:gridCol w:w=\"4535\"/>"));
        // first data row shaded, second plain
        let hp = body.find(">HP<").unwrap();
        let mp = body.find(">MP<").unwrap();
        assert!(body[..hp].rfind("w:fill=\"F0F5FA\"").unwrap() > body[..hp].rfind("<w:tr>").unwrap());
        assert!(body[hp..mp].contains("w:fill=\"FFFFFF\""));
    }

    #[test]
    fn long_tables_stay_whole() {
        let mut content = String::from("| A | B |\n|---|---|\n");
        for i in 0..200 {
            content.push_str(&format!("| r{i} | v |\n"));
        }
        let body = render(&content);
        assert_eq!(body.matches("<w:tbl>").count(), 1);
        assert!(!body.contains("w:type=\"page\""));
    }

    #[test]
    fn bullets_and_numbers() {
        let body = render("- one\n  - two\n1. first");
        assert!(body.contains(">•</w:t>"));
        assert!(body.contains(">–</w:t>"));
        assert!(body.contains(">1.</w:t>"));
        assert_eq!(body.matches("<w:tab/>").count(), 3);
    }

    #[test]
    fn callout_and_diagram() {
        let body = render("> 🎮 Designer's Note: pacing\n[DIAGRAM: Map]");
        assert!(body.contains("w:color=\"295985\"/></w:pBdr><w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"EBF4FF\"/>"));
        assert!(body.contains(">Designer&apos;s Note: </w:t>"));
        assert!(body.contains(">[ DIAGRAM: Map ]</w:t>"));
        assert!(body.contains(">Figure: Map</w:t>"));
    }

    #[test]
    fn code_lines_share_a_paragraph() {
        let body = render("```\nfn main() {}\n  x\n```");
        assert_eq!(body.matches("<w:p>").count(), 1);
        assert!(body.contains(">fn main() {}</w:t><w:br/><w:t xml:space=\"preserve\">  x</w:t>"));
    }

    #[test]
    fn toc_field_instruction() {
        let config = Config::default();
        let mut backend = DocxBackend::new(&config);
        backend.toc_field().unwrap();
        assert!(backend.body_xml().contains("TOC \\o &quot;1-3&quot; \\h \\z \\u"));
        assert!(backend.body_xml().contains("<w:pStyle w:val=\"TOCHeading\"/>"));
        assert!(!backend.supports(Feature::TocEntries));
    }
}
