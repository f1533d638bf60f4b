use crate::block::{Block, CalloutKind};

/// Parse a section's content string into a list of blocks
pub fn parse(content: &str) -> Vec<Block> {
    let mut state = ScanState::default();
    let mut blocks = Vec::new();

    for line in content.lines() {
        state.feed(line, &mut blocks);
    }
    state.finish(&mut blocks);

    blocks
}

/// Classification of a single physical line
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Line<'a> {
    Fence,
    TableRow(Vec<String>),
    TableSeparator,
    DesignerNote(&'a str),
    OpenQuestion(&'a str),
    Diagram(&'a str),
    Heading(u8, &'a str),
    Bullet(&'a str, u8),
    Numbered(&'a str),
    Blank,
    Text(&'a str),
}

/// Classify one line. The first matching rule wins.
pub(crate) fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();

    if is_fence(line) {
        return Line::Fence;
    }

    if trimmed.starts_with('|') {
        if trimmed.chars().all(|c| matches!(c, '-' | '|' | ' ')) {
            return Line::TableSeparator;
        }
        return Line::TableRow(split_cells(trimmed));
    }

    if trimmed.starts_with("> 🎮") || trimmed.starts_with("> Designer") {
        return Line::DesignerNote(note_text(trimmed));
    }

    if line.contains("[OPEN QUESTION:") || line.contains("[PLAYTEST:") {
        return Line::OpenQuestion(trimmed);
    }

    if let Some(rest) = trimmed.strip_prefix("[DIAGRAM:") {
        return Line::Diagram(rest.trim_end_matches(']').trim());
    }

    for (prefix, level) in [("#### ", 4), ("### ", 3), ("## ", 2)] {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Line::Heading(level, rest.trim());
        }
    }

    if trimmed.starts_with("- ") || trimmed.starts_with("* ") {
        let text = trimmed.trim_start_matches('-').trim_start_matches('*').trim();
        return Line::Bullet(text, bullet_indent(line));
    }

    let bytes = line.as_bytes();
    if bytes.len() > 2
        && bytes[0].is_ascii_digit()
        && matches!(bytes[1], b'.' | b')')
        && bytes[2] == b' '
    {
        return Line::Numbered(line[2..].trim());
    }

    if trimmed.is_empty() {
        return Line::Blank;
    }

    Line::Text(trimmed)
}

fn is_fence(line: &str) -> bool {
    line.trim().starts_with("```")
}

fn split_cells(trimmed: &str) -> Vec<String> {
    trimmed
        .trim_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

fn note_text(trimmed: &str) -> &str {
    let text = trimmed
        .trim_start_matches(|c: char| matches!(c, '>' | ' ' | '🎮'))
        .trim();
    match text.strip_prefix("Designer's Note:") {
        Some(rest) => rest.trim(),
        None => text,
    }
}

/// Nested bullets only go one level deep.
fn bullet_indent(line: &str) -> u8 {
    let lead = &line[..line.len() - line.trim_start().len()];
    if lead.contains('\t') || lead.chars().count() >= 2 {
        1
    } else {
        0
    }
}

/// Transient state carried across the lines of one content string
#[derive(Debug, Default)]
pub struct ScanState {
    in_code_block: bool,
    code_buffer: Vec<String>,
    in_table: bool,
    table_rows: Vec<Vec<String>>,
}

impl ScanState {
    /// Consume one line, pushing any completed blocks.
    pub fn feed(&mut self, line: &str, blocks: &mut Vec<Block>) {
        if self.in_code_block && !is_fence(line) {
            self.code_buffer.push(line.to_string());
            return;
        }

        match classify(line) {
            Line::TableRow(cells) => {
                self.in_table = true;
                self.table_rows.push(cells);
            }
            Line::TableSeparator => self.in_table = true,
            kind => {
                self.flush_table(blocks);
                self.push_line(kind, blocks);
            }
        }
    }

    fn push_line(&mut self, kind: Line<'_>, blocks: &mut Vec<Block>) {
        let block = match kind {
            Line::Fence => {
                if self.in_code_block {
                    self.flush_code(blocks);
                } else {
                    self.in_code_block = true;
                }
                return;
            }
            Line::DesignerNote(text) => Block::Callout {
                kind: CalloutKind::Note,
                text: text.to_string(),
            },
            Line::OpenQuestion(text) => Block::Callout {
                kind: CalloutKind::OpenQuestion,
                text: text.to_string(),
            },
            Line::Diagram(label) => Block::DiagramRef {
                label: label.to_string(),
            },
            Line::Heading(level, text) => Block::Heading {
                level,
                text: text.to_string(),
            },
            Line::Bullet(text, indent) => Block::Bullet {
                text: text.to_string(),
                indent,
            },
            Line::Numbered(text) => Block::NumberedItem {
                text: text.to_string(),
            },
            Line::Text(text) => Block::Paragraph {
                text: text.to_string(),
            },
            Line::Blank | Line::TableRow(_) | Line::TableSeparator => return,
        };
        blocks.push(block);
    }

    /// Flush whatever is still buffered at end of input.
    pub fn finish(mut self, blocks: &mut Vec<Block>) {
        self.flush_table(blocks);
        if self.in_code_block {
            self.flush_code(blocks);
        }
    }

    fn flush_code(&mut self, blocks: &mut Vec<Block>) {
        self.in_code_block = false;
        let lines = std::mem::take(&mut self.code_buffer);
        blocks.push(Block::CodeBlock { lines });
    }

    fn flush_table(&mut self, blocks: &mut Vec<Block>) {
        if !self.in_table {
            return;
        }
        self.in_table = false;
        let rows = std::mem::take(&mut self.table_rows);
        if rows.len() < 2 {
            log::debug!("dropping table run with {} row(s)", rows.len());
            return;
        }
        let mut rows = rows.into_iter();
        let headers = rows.next().unwrap_or_default();
        blocks.push(Block::Table {
            headers,
            rows: rows.collect(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bullet_line() {
        assert_eq!(
            parse("- Feature A: great"),
            vec![Block::Bullet {
                text: "Feature A: great".to_string(),
                indent: 0
            }]
        );
    }

    #[test]
    fn bullet_run_is_not_merged() {
        let blocks = parse("- one\n* two\n- three");
        assert_eq!(blocks.len(), 3);
        assert!(blocks.iter().all(|b| matches!(b, Block::Bullet { .. })));
    }

    #[test]
    fn nested_bullet_indent() {
        assert_eq!(
            parse("  - nested"),
            vec![Block::Bullet {
                text: "nested".to_string(),
                indent: 1
            }]
        );
    }

    #[test]
    fn table_drops_separator_row() {
        assert_eq!(
            parse("| A | B |\n|---|---|\n| 1 | 2 |"),
            vec![Block::Table {
                headers: strings(&["A", "B"]),
                rows: vec![strings(&["1", "2"])],
            }]
        );
    }

    #[test]
    fn single_row_table_is_dropped() {
        assert_eq!(
            parse("| A | B |\n|---|---|\nafter"),
            vec![Block::Paragraph {
                text: "after".to_string()
            }]
        );
    }

    #[test]
    fn one_table_per_contiguous_run() {
        let content = "| A |\n| 1 |\ntext\n| B |\n| 2 |\n| 3 |\n\n| lonely |";
        let tables = parse(content)
            .into_iter()
            .filter(|b| matches!(b, Block::Table { .. }))
            .count();
        assert_eq!(tables, 2);
    }

    #[test]
    fn unterminated_table_is_flushed() {
        let blocks = parse("intro\n| A | B |\n| 1 | 2 |\n| 3 | 4 |");
        assert_eq!(blocks.len(), 2);
        match &blocks[1] {
            Block::Table { headers, rows } => {
                assert_eq!(headers, &strings(&["A", "B"]));
                assert_eq!(rows.len(), 2);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn code_fence_is_verbatim() {
        assert_eq!(
            parse("```\n## not a heading\n- not a bullet\n```"),
            vec![Block::CodeBlock {
                lines: strings(&["## not a heading", "- not a bullet"])
            }]
        );
    }

    #[test]
    fn empty_code_fence_still_emits_block() {
        assert_eq!(parse("```\n```"), vec![Block::CodeBlock { lines: vec![] }]);
    }

    #[test]
    fn unterminated_code_fence_is_flushed() {
        assert_eq!(
            parse("```python\nx = 1"),
            vec![Block::CodeBlock {
                lines: strings(&["x = 1"])
            }]
        );
    }

    #[test]
    fn fence_flushes_pending_table_first() {
        let blocks = parse("| A |\n| 1 |\n```\ncode\n```");
        assert!(matches!(blocks[0], Block::Table { .. }));
        assert!(matches!(blocks[1], Block::CodeBlock { .. }));
    }

    #[test]
    fn designer_note_strips_label() {
        assert_eq!(
            parse("> 🎮 Designer's Note: Keep it snappy."),
            vec![Block::Callout {
                kind: CalloutKind::Note,
                text: "Keep it snappy.".to_string()
            }]
        );
        assert_eq!(
            parse("> Designer's Note: Plain form."),
            vec![Block::Callout {
                kind: CalloutKind::Note,
                text: "Plain form.".to_string()
            }]
        );
    }

    #[test]
    fn open_question_keeps_whole_line() {
        assert_eq!(
            parse("[OPEN QUESTION: Is this balanced?]"),
            vec![Block::Callout {
                kind: CalloutKind::OpenQuestion,
                text: "[OPEN QUESTION: Is this balanced?]".to_string()
            }]
        );
    }

    #[test]
    fn playtest_marker_inside_bullet_wins() {
        assert_eq!(
            parse("- tune jump [PLAYTEST: height]"),
            vec![Block::Callout {
                kind: CalloutKind::OpenQuestion,
                text: "- tune jump [PLAYTEST: height]".to_string()
            }]
        );
    }

    #[test]
    fn diagram_label() {
        assert_eq!(
            parse("[DIAGRAM: Core loop]"),
            vec![Block::DiagramRef {
                label: "Core loop".to_string()
            }]
        );
    }

    #[test]
    fn headings_longest_prefix_first() {
        assert_eq!(
            parse("## Two\n### Three\n#### Four"),
            vec![
                Block::Heading { level: 2, text: "Two".to_string() },
                Block::Heading { level: 3, text: "Three".to_string() },
                Block::Heading { level: 4, text: "Four".to_string() },
            ]
        );
    }

    #[test]
    fn single_hash_is_a_paragraph() {
        assert_eq!(
            parse("# Reserved"),
            vec![Block::Paragraph {
                text: "# Reserved".to_string()
            }]
        );
    }

    #[test]
    fn numbered_items() {
        assert_eq!(
            parse("1. First\n2) Second\n10. Tenth"),
            vec![
                Block::NumberedItem { text: "First".to_string() },
                Block::NumberedItem { text: "Second".to_string() },
                Block::Paragraph { text: "10. Tenth".to_string() },
            ]
        );
    }

    #[test]
    fn paragraphs_are_per_line() {
        assert_eq!(
            parse("first line\nsecond line\n\n  third  "),
            vec![
                Block::Paragraph { text: "first line".to_string() },
                Block::Paragraph { text: "second line".to_string() },
                Block::Paragraph { text: "third".to_string() },
            ]
        );
    }

    #[test]
    fn blank_input() {
        assert!(parse("").is_empty());
        assert!(parse("\n   \n").is_empty());
    }

    #[test]
    fn classify_precedence() {
        assert_eq!(classify("|---|:--|"), Line::TableRow(strings(&["---", ":--"])));
        assert_eq!(classify("| - | - |"), Line::TableSeparator);
        assert_eq!(classify("   ```rust"), Line::Fence);
        assert_eq!(classify("## [DIAGRAM: x]"), Line::Heading(2, "[DIAGRAM: x]"));
    }
}
