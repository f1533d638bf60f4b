//! Rendering primitives shared by every output format.
//!
//! A [`Backend`] draws; the [`Flow`] decides where. The flow owns the layout
//! cursor, so backends never make pagination decisions of their own.

mod flow;

pub use flow::{Flow, LayoutCursor};

use crate::block::CalloutKind;
use crate::content::Metadata;
use crate::error::Result;

/// Something a backend may or may not be able to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Cover,
    Heading,
    Paragraph,
    Bullet,
    NumberedItem,
    Table,
    CodeBlock,
    Callout,
    Diagram,
    /// A table of contents the viewer fills in (Word's TOC field).
    TocField,
    /// A table of contents drawn from recorded entries after all content.
    TocEntries,
}

/// One line of the table of contents
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    pub title: String,
    pub level: u8,
    pub page: usize,
}

/// Drawing primitives implemented once per output format.
///
/// The flow checks [`Backend::supports`] before every call; a backend only
/// needs to implement the primitives it advertises.
pub trait Backend {
    fn supports(&self, feature: Feature) -> bool;

    /// Backends that lay out pages themselves (Word) get no automatic page
    /// breaks from the flow.
    fn paginates_natively(&self) -> bool {
        false
    }

    fn cover_page(&mut self, meta: &Metadata) -> Result<()>;

    fn page_break(&mut self) -> Result<()>;

    fn heading(&mut self, level: u8, text: &str) -> Result<()>;

    fn paragraph(&mut self, text: &str) -> Result<()>;

    fn bullet(&mut self, text: &str, indent: u8) -> Result<()>;

    fn numbered_item(&mut self, number: usize, text: &str) -> Result<()>;

    /// Start a table (or its continuation on a new page) with its header row.
    fn begin_table(&mut self, headers: &[String], widths: &[f32]) -> Result<()>;

    fn table_row(&mut self, cells: &[String], shaded: bool) -> Result<()>;

    fn end_table(&mut self) -> Result<()>;

    fn code_block(&mut self, lines: &[String]) -> Result<()>;

    fn callout(&mut self, kind: CalloutKind, text: &str) -> Result<()>;

    fn diagram(&mut self, label: &str) -> Result<()>;

    fn toc_field(&mut self) -> Result<()> {
        Ok(())
    }

    fn toc_entry(&mut self, entry: &TocEntry, indent: f32) -> Result<()> {
        let _ = (entry, indent);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Every primitive call, in order.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Event {
        Cover(String),
        PageBreak,
        Heading(u8, String),
        Paragraph(String),
        Bullet(String, u8),
        Numbered(usize, String),
        BeginTable(Vec<String>),
        Row(Vec<String>, bool),
        EndTable,
        Code(Vec<String>),
        Callout(CalloutKind, String),
        Diagram(String),
        TocField,
        TocEntry(String, u8, usize),
    }

    /// In-memory backend that records primitive calls.
    pub struct Recorder {
        pub events: Vec<Event>,
        pub unsupported: Vec<Feature>,
        pub native_pages: bool,
    }

    impl Recorder {
        pub fn new() -> Self {
            Self {
                events: Vec::new(),
                unsupported: vec![Feature::TocField],
                native_pages: false,
            }
        }

        pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
            self.events.iter().filter(|e| pred(e)).count()
        }
    }

    impl Backend for Recorder {
        fn supports(&self, feature: Feature) -> bool {
            !self.unsupported.contains(&feature)
        }

        fn paginates_natively(&self) -> bool {
            self.native_pages
        }

        fn cover_page(&mut self, meta: &Metadata) -> Result<()> {
            self.events.push(Event::Cover(meta.game_title.clone()));
            Ok(())
        }

        fn page_break(&mut self) -> Result<()> {
            self.events.push(Event::PageBreak);
            Ok(())
        }

        fn heading(&mut self, level: u8, text: &str) -> Result<()> {
            self.events.push(Event::Heading(level, text.to_string()));
            Ok(())
        }

        fn paragraph(&mut self, text: &str) -> Result<()> {
            self.events.push(Event::Paragraph(text.to_string()));
            Ok(())
        }

        fn bullet(&mut self, text: &str, indent: u8) -> Result<()> {
            self.events.push(Event::Bullet(text.to_string(), indent));
            Ok(())
        }

        fn numbered_item(&mut self, number: usize, text: &str) -> Result<()> {
            self.events.push(Event::Numbered(number, text.to_string()));
            Ok(())
        }

        fn begin_table(&mut self, headers: &[String], _widths: &[f32]) -> Result<()> {
            self.events.push(Event::BeginTable(headers.to_vec()));
            Ok(())
        }

        fn table_row(&mut self, cells: &[String], shaded: bool) -> Result<()> {
            self.events.push(Event::Row(cells.to_vec(), shaded));
            Ok(())
        }

        fn end_table(&mut self) -> Result<()> {
            self.events.push(Event::EndTable);
            Ok(())
        }

        fn code_block(&mut self, lines: &[String]) -> Result<()> {
            self.events.push(Event::Code(lines.to_vec()));
            Ok(())
        }

        fn callout(&mut self, kind: CalloutKind, text: &str) -> Result<()> {
            self.events.push(Event::Callout(kind, text.to_string()));
            Ok(())
        }

        fn diagram(&mut self, label: &str) -> Result<()> {
            self.events.push(Event::Diagram(label.to_string()));
            Ok(())
        }

        fn toc_field(&mut self) -> Result<()> {
            self.events.push(Event::TocField);
            Ok(())
        }

        fn toc_entry(&mut self, entry: &TocEntry, _indent: f32) -> Result<()> {
            self.events
                .push(Event::TocEntry(entry.title.clone(), entry.level, entry.page));
            Ok(())
        }
    }
}
