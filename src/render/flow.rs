use crate::block::{Block, CalloutKind};
use crate::config::{Config, PageConfig};
use crate::content::Metadata;
use crate::error::Result;
use crate::parser;

use super::{Backend, Feature, TocEntry};

const PT_TO_MM: f32 = 0.3528;
/// Average glyph advance as a fraction of the font size.
const GLYPH_RATIO: f32 = 0.5;
/// Horizontal padding inside a table cell.
const CELL_PADDING: f32 = 2.0;
/// Gap above tables, code blocks, callouts and diagrams.
const BLOCK_GAP: f32 = 2.0;
/// Padding inside a code block or callout box.
const BOX_PADDING: f32 = 4.0;
const DIAGRAM_PADDING: f32 = 8.0;
/// Indentation of table of contents entries by level.
const TOC_INDENT: [f32; 3] = [0.0, 8.0, 15.0];

/// Vertical position on the current page, in millimetres from the top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCursor {
    pub y: f32,
    /// 1-based page number.
    pub page: usize,
    pub top: f32,
    pub bottom: f32,
    /// Header row of the table being drawn, repeated after a page break.
    pub pending_header: Option<Vec<String>>,
}

impl LayoutCursor {
    pub fn new(page: &PageConfig) -> Self {
        Self {
            y: page.margin_top,
            page: 1,
            top: page.margin_top,
            bottom: page.content_bottom(),
            pending_header: None,
        }
    }

    pub fn fits(&self, height: f32) -> bool {
        self.y + height <= self.bottom
    }

    pub fn at_top(&self) -> bool {
        self.y <= self.top
    }

    pub fn advance(&mut self, height: f32) {
        self.y += height;
    }

    pub fn next_page(&mut self) {
        self.page += 1;
        self.y = self.top;
    }
}

/// Walks blocks in order, estimating their heights and breaking pages so
/// that nothing crosses the bottom margin.
pub struct Flow<'a, B> {
    backend: B,
    config: &'a Config,
    cursor: LayoutCursor,
    toc: Vec<TocEntry>,
}

impl<'a, B: Backend> Flow<'a, B> {
    pub fn new(backend: B, config: &'a Config) -> Self {
        Self {
            backend,
            config,
            cursor: LayoutCursor::new(&config.page),
            toc: Vec::new(),
        }
    }

    pub fn cursor(&self) -> &LayoutCursor {
        &self.cursor
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn supports(&self, feature: Feature) -> bool {
        self.backend.supports(feature)
    }

    /// Headings recorded so far, in document order.
    pub fn toc_entries(&self) -> &[TocEntry] {
        &self.toc
    }

    pub fn into_parts(self) -> (B, Vec<TocEntry>) {
        (self.backend, self.toc)
    }

    pub fn cover_page(&mut self, meta: &Metadata) -> Result<()> {
        if !self.check(Feature::Cover) {
            return Ok(());
        }
        self.backend.cover_page(meta)?;
        self.cursor.y = self.cursor.bottom;
        Ok(())
    }

    /// Unconditional page break.
    pub fn page_break(&mut self) -> Result<()> {
        self.backend.page_break()?;
        self.cursor.next_page();
        Ok(())
    }

    /// Heading recorded in the table of contents when within the configured depth.
    pub fn heading(&mut self, level: u8, text: &str) -> Result<()> {
        self.draw_heading(level, text, true)
    }

    /// Heading that never appears in the table of contents.
    pub fn untracked_heading(&mut self, level: u8, text: &str) -> Result<()> {
        self.draw_heading(level, text, false)
    }

    pub fn paragraph(&mut self, text: &str) -> Result<()> {
        if !self.check(Feature::Paragraph) {
            return Ok(());
        }
        self.draw_paragraph(text)
    }

    pub fn bullet(&mut self, text: &str, indent: u8) -> Result<()> {
        if !self.check(Feature::Bullet) {
            return Ok(());
        }
        self.draw_bullet(text, indent)
    }

    /// Scan a content string and draw the resulting blocks.
    pub fn render_content(&mut self, content: &str) -> Result<()> {
        let blocks = parser::parse(content);
        self.render_blocks(&blocks)
    }

    pub fn render_blocks(&mut self, blocks: &[Block]) -> Result<()> {
        let mut number = 0;
        for block in blocks {
            number = match block {
                Block::NumberedItem { .. } => number + 1,
                _ => 0,
            };
            self.render_block(block, number)?;
        }
        Ok(())
    }

    fn render_block(&mut self, block: &Block, number: usize) -> Result<()> {
        if !self.check(block.feature()) {
            return Ok(());
        }
        match block {
            Block::Heading { level, text } => self.draw_heading(*level, text, true),
            Block::Bullet { text, indent } => self.draw_bullet(text, *indent),
            Block::NumberedItem { text } => self.draw_numbered(number, text),
            Block::Table { headers, rows } => self.draw_table(headers, rows),
            Block::CodeBlock { lines } => self.draw_code(lines),
            Block::Callout { kind, text } => self.draw_callout(*kind, text),
            Block::DiagramRef { label } => self.draw_diagram(label),
            Block::Paragraph { text } => self.draw_paragraph(text),
        }
    }

    /// Draw a table, repeating its header row on every page it spans.
    pub fn table(&mut self, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
        if !self.check(Feature::Table) {
            return Ok(());
        }
        self.draw_table(headers, rows)
    }

    /// Insert a viewer-maintained table of contents.
    pub fn toc_field(&mut self) -> Result<()> {
        if !self.check(Feature::TocField) {
            return Ok(());
        }
        self.backend.toc_field()?;
        self.cursor.advance(self.config.spacing.line_body * 2.0);
        Ok(())
    }

    /// Draw recorded entries as table of contents lines.
    pub fn toc_entries_list(&mut self, entries: &[TocEntry]) -> Result<()> {
        if !self.check(Feature::TocEntries) {
            return Ok(());
        }
        let line = self.config.spacing.line_body;
        for entry in entries {
            self.ensure_space(line)?;
            let slot = usize::from(entry.level.max(1) - 1).min(TOC_INDENT.len() - 1);
            self.backend.toc_entry(entry, TOC_INDENT[slot])?;
            self.cursor.advance(line);
        }
        Ok(())
    }

    fn check(&self, feature: Feature) -> bool {
        let supported = self.backend.supports(feature);
        if !supported {
            log::debug!("backend does not support {feature:?}, skipping");
        }
        supported
    }

    /// Break the page when `height` does not fit below the cursor. A block
    /// taller than a whole page is drawn at the top and allowed to overflow.
    fn ensure_space(&mut self, height: f32) -> Result<()> {
        if self.cursor.fits(height) || self.cursor.at_top() {
            return Ok(());
        }
        self.overflow()
    }

    fn overflow(&mut self) -> Result<()> {
        log::debug!("page {} full at {:.1}mm", self.cursor.page, self.cursor.y);
        if self.backend.paginates_natively() {
            self.cursor.next_page();
            Ok(())
        } else {
            self.page_break()
        }
    }

    /// Estimated number of wrapped lines for `text` in a column `width` mm wide.
    fn wrapped_lines(&self, text: &str, size_pt: f32, width: f32) -> usize {
        let glyph = size_pt * PT_TO_MM * GLYPH_RATIO;
        let per_line = ((width / glyph).floor() as usize).max(1);
        text.chars().count().div_ceil(per_line).max(1)
    }

    fn body_height(&self, text: &str, width: f32) -> f32 {
        let lines = self.wrapped_lines(text, self.config.font.body_size, width);
        lines as f32 * self.config.spacing.line_body
    }

    fn draw_heading(&mut self, level: u8, text: &str, tracked: bool) -> Result<()> {
        if !self.check(Feature::Heading) {
            return Ok(());
        }
        let spacing = &self.config.spacing;
        let (above, below) = spacing.heading_gaps(level);
        let lines = self.wrapped_lines(
            text,
            self.config.font.size_for_heading(level),
            self.config.page.content_width(),
        );
        let height = above + lines as f32 * spacing.line_for_heading(level) + below;

        // keep with the first line that follows
        self.ensure_space(height + spacing.line_body)?;
        if tracked && level <= self.config.toc.depth.max(1) {
            self.toc.push(TocEntry {
                title: text.to_string(),
                level,
                page: self.cursor.page,
            });
        }
        self.backend.heading(level, text)?;
        self.cursor.advance(height);
        Ok(())
    }

    fn draw_paragraph(&mut self, text: &str) -> Result<()> {
        let height = self.body_height(text, self.config.page.content_width())
            + self.config.spacing.paragraph;
        self.ensure_space(height)?;
        self.backend.paragraph(text)?;
        self.cursor.advance(height);
        Ok(())
    }

    fn draw_bullet(&mut self, text: &str, indent: u8) -> Result<()> {
        let offset = self.config.spacing.bullet_indent * f32::from(indent + 1);
        let height = self.body_height(text, self.config.page.content_width() - offset);
        self.ensure_space(height)?;
        self.backend.bullet(text, indent)?;
        self.cursor.advance(height);
        Ok(())
    }

    fn draw_numbered(&mut self, number: usize, text: &str) -> Result<()> {
        let offset = self.config.spacing.bullet_indent;
        let height = self.body_height(text, self.config.page.content_width() - offset);
        self.ensure_space(height)?;
        self.backend.numbered_item(number, text)?;
        self.cursor.advance(height);
        Ok(())
    }

    fn draw_table(&mut self, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
        let columns = headers.len().max(1);
        let width = self.config.page.content_width() / columns as f32;
        let widths = vec![width; columns];
        let header_height = self.config.spacing.table_header_row;

        let rows: Vec<Vec<String>> = rows.iter().map(|row| fit_row(row, columns)).collect();
        let first_row = rows.first().map_or(0.0, |row| self.row_height(row, width));

        self.ensure_space(BLOCK_GAP + header_height + first_row)?;
        self.cursor.advance(BLOCK_GAP);
        self.backend.begin_table(headers, &widths)?;
        self.cursor.pending_header = Some(headers.to_vec());
        self.cursor.advance(header_height);

        for (index, row) in rows.iter().enumerate() {
            let height = self.row_height(row, width);
            if !self.cursor.fits(height) {
                if self.backend.paginates_natively() {
                    // the backend repeats the header row itself
                    self.cursor.next_page();
                } else {
                    self.backend.end_table()?;
                    self.page_break()?;
                    if let Some(header) = self.cursor.pending_header.clone() {
                        self.backend.begin_table(&header, &widths)?;
                    }
                }
                self.cursor.advance(header_height);
            }
            self.backend.table_row(row, index % 2 == 0)?;
            self.cursor.advance(height);
        }

        self.backend.end_table()?;
        self.cursor.pending_header = None;
        self.cursor.advance(self.config.spacing.paragraph);
        Ok(())
    }

    fn row_height(&self, row: &[String], width: f32) -> f32 {
        let lines = row
            .iter()
            .map(|cell| {
                self.wrapped_lines(cell, self.config.font.body_size, width - CELL_PADDING)
            })
            .max()
            .unwrap_or(1);
        lines as f32 * self.config.spacing.table_row
    }

    fn draw_code(&mut self, lines: &[String]) -> Result<()> {
        let box_height =
            lines.len().max(1) as f32 * self.config.spacing.line_body + BOX_PADDING;
        let height = BLOCK_GAP + box_height + self.config.spacing.paragraph;
        self.ensure_space(height)?;
        self.backend.code_block(lines)?;
        self.cursor.advance(height);
        Ok(())
    }

    fn draw_callout(&mut self, kind: CalloutKind, text: &str) -> Result<()> {
        let width = self.config.page.content_width() - 2.0 * BOX_PADDING;
        let label = format!("{} {}", kind.label(), text);
        let lines = self.wrapped_lines(&label, self.config.font.body_size, width);
        let box_height = lines.max(3) as f32 * self.config.spacing.callout_line + BOX_PADDING;
        let height = BLOCK_GAP + box_height + self.config.spacing.paragraph;
        self.ensure_space(height)?;
        self.backend.callout(kind, text)?;
        self.cursor.advance(height);
        Ok(())
    }

    fn draw_diagram(&mut self, label: &str) -> Result<()> {
        let spacing = &self.config.spacing;
        let height = BLOCK_GAP
            + 2.0 * DIAGRAM_PADDING
            + spacing.line_body
            + spacing.callout_line
            + spacing.paragraph;
        self.ensure_space(height)?;
        self.backend.diagram(label)?;
        self.cursor.advance(height);
        Ok(())
    }
}

/// Pad short rows with empty cells and drop cells past the header width.
fn fit_row(row: &[String], columns: usize) -> Vec<String> {
    let mut cells: Vec<String> = row.iter().take(columns).cloned().collect();
    cells.resize(columns, String::new());
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{Event, Recorder};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn long_table_repeats_header_once_per_page() {
        let config = Config::default();
        let mut flow = Flow::new(Recorder::new(), &config);
        let headers = strings(&["Level", "XP"]);
        let rows: Vec<Vec<String>> = (0..100)
            .map(|i| vec![format!("L{i}"), format!("{}", i * 100)])
            .collect();
        flow.table(&headers, &rows).unwrap();
        let (recorder, _) = flow.into_parts();

        let breaks = recorder.count(|e| *e == Event::PageBreak);
        let begins = recorder.count(|e| matches!(e, Event::BeginTable(_)));
        let ends = recorder.count(|e| *e == Event::EndTable);
        assert!(breaks >= 2, "100 rows should span several pages");
        assert_eq!(begins, breaks + 1);
        assert_eq!(ends, begins);

        let rendered: Vec<&Vec<String>> = recorder
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Row(cells, _) => Some(cells),
                _ => None,
            })
            .collect();
        assert_eq!(rendered.len(), 100);
        assert_eq!(rendered[0][0], "L0");
        assert_eq!(rendered[99][0], "L99");

        // every continuation starts with the header right after the break
        for (i, event) in recorder.events.iter().enumerate() {
            if *event == Event::PageBreak {
                assert_eq!(recorder.events[i - 1], Event::EndTable);
                assert_eq!(recorder.events[i + 1], Event::BeginTable(headers.clone()));
            }
        }
    }

    #[test]
    fn rows_are_fitted_and_shaded_alternately() {
        let config = Config::default();
        let mut flow = Flow::new(Recorder::new(), &config);
        let headers = strings(&["A", "B"]);
        let rows = vec![strings(&["1"]), strings(&["2", "x", "extra"]), strings(&["3", "y"])];
        flow.table(&headers, &rows).unwrap();
        let (recorder, _) = flow.into_parts();

        assert_eq!(
            recorder.events,
            vec![
                Event::BeginTable(headers),
                Event::Row(strings(&["1", ""]), true),
                Event::Row(strings(&["2", "x"]), false),
                Event::Row(strings(&["3", "y"]), true),
                Event::EndTable,
            ]
        );
    }

    #[test]
    fn native_pagination_never_breaks() {
        let config = Config::default();
        let mut recorder = Recorder::new();
        recorder.native_pages = true;
        let mut flow = Flow::new(recorder, &config);
        let content = "A paragraph of filler text.\n".repeat(200);
        flow.render_content(&content).unwrap();
        assert!(flow.cursor().page > 1);
        let (recorder, _) = flow.into_parts();
        assert_eq!(recorder.count(|e| *e == Event::PageBreak), 0);
        assert_eq!(recorder.count(|e| matches!(e, Event::Paragraph(_))), 200);
    }

    #[test]
    fn paragraphs_break_before_the_bottom_margin() {
        let config = Config::default();
        let mut flow = Flow::new(Recorder::new(), &config);
        flow.render_content(&"Filler line.\n".repeat(60)).unwrap();
        // 10mm per paragraph in 247mm of usable height
        assert_eq!(flow.cursor().page, 3);
        assert!(flow.cursor().y <= flow.cursor().bottom);
    }

    #[test]
    fn unsupported_blocks_are_skipped() {
        let config = Config::default();
        let mut recorder = Recorder::new();
        recorder.unsupported.push(Feature::Diagram);
        let mut flow = Flow::new(recorder, &config);
        flow.render_content("before\n[DIAGRAM: Core loop]\nafter").unwrap();
        let (recorder, _) = flow.into_parts();
        assert_eq!(
            recorder.events,
            vec![
                Event::Paragraph("before".into()),
                Event::Paragraph("after".into()),
            ]
        );
    }

    #[test]
    fn numbered_items_count_per_run() {
        let config = Config::default();
        let mut flow = Flow::new(Recorder::new(), &config);
        flow.render_content("1. a\n2. b\nbreak\n1. c").unwrap();
        let (recorder, _) = flow.into_parts();
        assert_eq!(
            recorder.events,
            vec![
                Event::Numbered(1, "a".into()),
                Event::Numbered(2, "b".into()),
                Event::Paragraph("break".into()),
                Event::Numbered(1, "c".into()),
            ]
        );
    }

    #[test]
    fn headings_within_depth_are_recorded() {
        let config = Config::default();
        let mut flow = Flow::new(Recorder::new(), &config);
        flow.heading(1, "1. Overview").unwrap();
        flow.render_content("## Pillars\n### Detail").unwrap();
        flow.untracked_heading(1, "Table of Contents").unwrap();
        let titles: Vec<_> = flow
            .toc_entries()
            .iter()
            .map(|e| (e.title.as_str(), e.level, e.page))
            .collect();
        assert_eq!(titles, vec![("1. Overview", 1, 1), ("Pillars", 2, 1)]);
    }

    #[test]
    fn heading_moves_to_next_page_with_its_content() {
        let config = Config::default();
        let mut flow = Flow::new(Recorder::new(), &config);
        flow.render_content(&"Filler line.\n".repeat(23)).unwrap();
        // 230mm used, 17mm left: not enough for an H1 and one body line
        flow.heading(1, "Next").unwrap();
        assert_eq!(flow.toc_entries()[0].page, 2);
    }

    #[test]
    fn same_input_same_calls() {
        let config = Config::default();
        let content = "# T\n| a | b |\n|---|---|\n| 1 | 2 |\n```\ncode\n```\n> 🎮 Designer's Note: n";
        let run = || {
            let mut flow = Flow::new(Recorder::new(), &config);
            flow.render_content(content).unwrap();
            flow.into_parts().0.events
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn toc_entries_list_is_skipped_without_support() {
        let config = Config::default();
        let mut recorder = Recorder::new();
        recorder.unsupported.push(Feature::TocEntries);
        let mut flow = Flow::new(recorder, &config);
        let entries = vec![TocEntry {
            title: "1. A".into(),
            level: 1,
            page: 3,
        }];
        flow.toc_entries_list(&entries).unwrap();
        flow.toc_field().unwrap();
        assert!(flow.backend().events.is_empty());
    }
}
