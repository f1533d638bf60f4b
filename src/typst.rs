use crate::block::CalloutKind;
use crate::config::{Config, hex_digits};
use crate::content::Metadata;
use crate::error::Result;
use crate::render::{Backend, Feature, TocEntry};

/// Emits Typst markup. All user text goes through string literals, so no
/// markup character in content can change the layout.
pub struct TypstBackend<'a> {
    config: &'a Config,
    out: String,
}

impl<'a> TypstBackend<'a> {
    pub fn new(config: &'a Config, meta: &Metadata) -> Self {
        let mut out = String::new();
        preamble(config, meta, &mut out);
        Self { config, out }
    }

    pub fn into_markup(self) -> String {
        self.out
    }

    fn body_font(&self) -> String {
        fonts(&self.config.font.body, &self.config.font.serif_fallback)
    }
}

/// Quote `text` as a Typst string literal.
pub fn typst_str(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

pub(crate) fn rgb(color: &str) -> String {
    format!("rgb(\"#{}\")", hex_digits(color))
}

pub(crate) fn mm(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded}mm")
}

pub(crate) fn fonts(primary: &str, fallback: &str) -> String {
    format!("({}, {})", typst_str(primary), typst_str(fallback))
}

fn preamble(config: &Config, meta: &Metadata, out: &mut String) {
    let page = &config.page;
    let font = &config.font;
    let colors = &config.colors;
    let header_text = format!(
        "{}  |  Game Design Document  |  {}",
        meta.game_title, meta.version
    );

    out.push_str("#set page(\n");
    out.push_str(&format!("  width: {},\n", mm(page.width)));
    out.push_str(&format!("  height: {},\n", mm(page.height)));
    out.push_str(&format!(
        "  margin: (top: {}, bottom: {}, left: {}, right: {}),\n",
        mm(page.margin_top),
        mm(page.margin_bottom),
        mm(page.margin_left),
        mm(page.margin_right)
    ));
    out.push_str("  header: context { if here().page() > 1 {\n");
    out.push_str(&format!(
        "    set text(size: {}pt, fill: {})\n",
        font.header_size,
        rgb(&colors.caption)
    ));
    out.push_str(&format!("    align(right, {})\n", typst_str(&header_text)));
    out.push_str(&format!(
        "    line(length: 100%, stroke: 0.3pt + {})\n",
        rgb(&colors.table_border)
    ));
    out.push_str("  } },\n");
    out.push_str("  footer: context { if here().page() > 1 {\n");
    out.push_str(&format!(
        "    set text(size: {}pt, fill: {})\n",
        font.header_size,
        rgb(&colors.caption)
    ));
    out.push_str(&format!(
        "    line(length: 100%, stroke: 0.3pt + {})\n",
        rgb(&colors.table_border)
    ));
    out.push_str(&format!(
        "    grid(columns: (1fr, 1fr, 1fr), align(left, \"CONFIDENTIAL\"), \
         align(center, \"Page \" + str(here().page())), align(right, {}))\n",
        typst_str(&meta.date)
    ));
    out.push_str("  } },\n");
    out.push_str(")\n");

    let keywords: [&str; 5] = [
        "GDD",
        "game design",
        &meta.genre,
        &meta.platform,
        &meta.game_title,
    ];
    let keywords: Vec<String> = keywords.iter().map(|k| typst_str(k)).collect();
    out.push_str(&format!(
        "#set document(title: {}, author: {}, description: {}, keywords: ({}))\n",
        typst_str(&format!("{} - Game Design Document", meta.game_title)),
        typst_str(&meta.lead_designer),
        typst_str(&format!(
            "Game Design Document - {} - {}",
            meta.genre, meta.platform
        )),
        keywords.join(", ")
    ));

    out.push_str(&format!(
        "#set text(font: {}, size: {}pt, fill: {})\n",
        fonts(&font.body, &font.serif_fallback),
        font.body_size,
        rgb(&colors.body)
    ));
    out.push_str(&format!(
        "#set par(justify: true, linebreaks: \"optimized\", spacing: {})\n",
        mm(config.spacing.paragraph)
    ));
    out.push_str(&format!(
        "#show raw: set text(font: {}, size: {}pt)\n",
        fonts(&font.code, &font.mono_fallback),
        font.code_size
    ));
    out.push_str(&format!(
        "#show heading: set text(font: {}, weight: \"bold\")\n",
        fonts(&font.heading, &font.serif_fallback)
    ));
    for level in 1..=4u8 {
        let (above, below) = config.spacing.heading_gaps(level);
        out.push_str(&format!(
            "#show heading.where(level: {level}): set text(size: {}pt, fill: {})\n",
            font.size_for_heading(level),
            rgb(colors.heading(level))
        ));
        out.push_str(&format!(
            "#show heading.where(level: {level}): set block(above: {}, below: {})\n",
            mm(above),
            mm(below)
        ));
    }
    out.push_str(&format!(
        "#show heading.where(level: 1): it => {{ it; v(-2mm); line(length: 100%, stroke: 0.5pt + {}) }}\n",
        rgb(&colors.heading_1)
    ));
    out.push('\n');
}

impl Backend for TypstBackend<'_> {
    fn supports(&self, feature: Feature) -> bool {
        feature != Feature::TocField
    }

    fn cover_page(&mut self, meta: &Metadata) -> Result<()> {
        let page = &self.config.page;
        let font = &self.config.font;
        let colors = &self.config.colors;
        let accent = rgb(&colors.cover_accent);
        let bar = format!(
            "rect(width: {}, height: 8mm, fill: {accent})",
            mm(page.width)
        );
        let out = &mut self.out;

        out.push_str(&format!(
            "#place(top + left, dx: {}, dy: {}, {bar})\n",
            mm(-page.margin_left),
            mm(-page.margin_top)
        ));
        out.push_str("#v(45mm)\n");
        out.push_str("#align(center)[\n");
        out.push_str(&format!(
            "  #text(size: {}pt, weight: \"bold\", fill: {}, {})\n",
            font.cover_title_size,
            rgb(&colors.heading_1),
            typst_str(&meta.game_title)
        ));
        out.push_str("  #v(4mm)\n");
        out.push_str(&format!("  #line(length: 80mm, stroke: 1.5pt + {accent})\n"));
        out.push_str("  #v(4mm)\n");
        out.push_str(&format!(
            "  #text(size: {}pt, style: \"italic\", {})\n",
            font.cover_tagline_size,
            typst_str(&meta.tagline)
        ));
        out.push_str("  #v(12mm)\n");
        out.push_str(&format!(
            "  #text(fill: {}, {})\n",
            rgb(&colors.caption),
            typst_str(&format!(
                "{}  ·  {}  ·  {}",
                meta.genre, meta.platform, meta.audience
            ))
        ));
        out.push_str("  #v(30mm)\n");
        out.push_str(&format!(
            "  #text(size: 11pt, weight: \"bold\", fill: {}, {})\n",
            rgb(&colors.heading_1),
            typst_str(&meta.studio_name)
        ));
        out.push('\n');
        out.push_str(&format!(
            "  #text({})\n",
            typst_str(&format!(
                "Game Design Document  ·  {}  ·  {}",
                meta.version, meta.date
            ))
        ));
        out.push('\n');
        out.push_str(&format!(
            "  #text({})\n",
            typst_str(&format!("Lead Designer: {}", meta.lead_designer))
        ));
        out.push_str("  #v(15mm)\n");
        out.push_str(&format!(
            "  #text(size: 8pt, style: \"italic\", fill: {}, {})\n",
            rgb(&colors.muted),
            typst_str(
                "CONFIDENTIAL. For internal use and authorized partners only. \
                 Do not distribute without written permission."
            )
        ));
        out.push_str("]\n");
        out.push_str(&format!(
            "#place(bottom + left, dx: {}, dy: {}, {bar})\n",
            mm(-page.margin_left),
            mm(page.margin_bottom)
        ));
        out.push('\n');
        Ok(())
    }

    fn page_break(&mut self) -> Result<()> {
        self.out.push_str("#pagebreak(weak: true)\n\n");
        Ok(())
    }

    fn heading(&mut self, level: u8, text: &str) -> Result<()> {
        self.out.push_str(&format!(
            "#heading(level: {}, {})\n\n",
            level.clamp(1, 4),
            typst_str(text)
        ));
        Ok(())
    }

    fn paragraph(&mut self, text: &str) -> Result<()> {
        self.out.push_str(&format!("#{}\n\n", typst_str(text)));
        Ok(())
    }

    fn bullet(&mut self, text: &str, indent: u8) -> Result<()> {
        let spacing = &self.config.spacing;
        let offset = spacing.bullet_indent * f32::from(indent + 1);
        let marker = if indent == 0 { "•" } else { "–" };
        self.out.push_str(&format!(
            "#pad(left: {}, grid(columns: (4mm, 1fr), {}, {}))\n\n",
            mm(offset),
            typst_str(marker),
            typst_str(text)
        ));
        Ok(())
    }

    fn numbered_item(&mut self, number: usize, text: &str) -> Result<()> {
        self.out.push_str(&format!(
            "#pad(left: {}, grid(columns: (6mm, 1fr), {}, {}))\n\n",
            mm(self.config.spacing.bullet_indent),
            typst_str(&format!("{number}.")),
            typst_str(text)
        ));
        Ok(())
    }

    fn begin_table(&mut self, headers: &[String], widths: &[f32]) -> Result<()> {
        let colors = &self.config.colors;
        let columns: Vec<String> = widths.iter().map(|w| mm(*w)).collect();
        let out = &mut self.out;
        out.push_str("#table(\n");
        out.push_str(&format!("  columns: ({},),\n", columns.join(", ")));
        out.push_str(&format!("  stroke: 0.3pt + {},\n", rgb(&colors.table_border)));
        out.push_str("  table.header(\n");
        for header in headers {
            out.push_str(&format!(
                "    table.cell(fill: {}, align(center, text(weight: \"bold\", fill: {}, {}))),\n",
                rgb(&colors.table_header_bg),
                rgb(&colors.table_header_text),
                typst_str(header)
            ));
        }
        out.push_str("  ),\n");
        Ok(())
    }

    fn table_row(&mut self, cells: &[String], shaded: bool) -> Result<()> {
        let colors = &self.config.colors;
        let fill = if shaded {
            &colors.table_row_alt
        } else {
            &colors.table_row_normal
        };
        for cell in cells {
            self.out.push_str(&format!(
                "  table.cell(fill: {}, {}),\n",
                rgb(fill),
                typst_str(cell)
            ));
        }
        Ok(())
    }

    fn end_table(&mut self) -> Result<()> {
        self.out.push_str(")\n\n");
        Ok(())
    }

    fn code_block(&mut self, lines: &[String]) -> Result<()> {
        self.out.push_str(&format!(
            "#block(fill: {}, inset: 2mm, width: 100%, raw({}, block: true))\n\n",
            rgb(&self.config.colors.code_bg),
            typst_str(&lines.join("\n"))
        ));
        Ok(())
    }

    fn callout(&mut self, kind: CalloutKind, text: &str) -> Result<()> {
        let colors = &self.config.colors;
        let (bg, border) = match kind {
            CalloutKind::Note => (&colors.note_bg, &colors.note_border),
            CalloutKind::OpenQuestion => (&colors.warn_bg, &colors.warn_border),
        };
        self.out.push_str(&format!(
            "#block(fill: {}, stroke: (left: 1mm + {border}), inset: 3mm, width: 100%)\
             [#text(weight: \"bold\", fill: {border}, {}) #text(fill: {}, {})]\n\n",
            rgb(bg),
            typst_str(kind.label()),
            rgb(&colors.body),
            typst_str(text),
            border = rgb(border),
        ));
        Ok(())
    }

    fn diagram(&mut self, label: &str) -> Result<()> {
        let colors = &self.config.colors;
        self.out.push_str(&format!(
            "#block(stroke: 0.5pt + {}, inset: 8mm, width: 100%, \
             align(center, text(fill: {}, {})))\n",
            rgb(&colors.table_border),
            rgb(&colors.caption),
            typst_str(&format!("[ DIAGRAM: {label} ]"))
        ));
        self.out.push_str(&format!(
            "#align(center, text(size: {}pt, style: \"italic\", fill: {}, {}))\n\n",
            self.config.font.caption_size,
            rgb(&colors.caption),
            typst_str(&format!("Figure: {label}"))
        ));
        Ok(())
    }

    fn toc_entry(&mut self, entry: &TocEntry, indent: f32) -> Result<()> {
        let font = self.body_font();
        let colors = &self.config.colors;
        let size = self.config.font.body_size;
        let style = match entry.level {
            1 => format!(
                "size: {}pt, weight: \"bold\", fill: {}",
                size + 1.0,
                rgb(&colors.heading_1)
            ),
            2 => format!("size: {size}pt, fill: {}", rgb(&colors.body)),
            _ => format!(
                "size: {}pt, style: \"italic\", fill: {}",
                size - 1.0,
                rgb(&colors.caption)
            ),
        };
        self.out.push_str(&format!(
            "#pad(left: {}, grid(columns: (1fr, 15mm), text(font: {}, {style}, {}), \
             align(right, text(fill: {}, {}))))\n\n",
            mm(indent),
            font,
            typst_str(&entry.title),
            rgb(&colors.caption),
            typst_str(&entry.page.to_string())
        ));
        Ok(())
    }
}
