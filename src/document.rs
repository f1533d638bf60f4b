//! Assembles the full document: cover, version history, table of contents
//! and every registry section in order.

use crate::content::{GameData, Metadata, SectionContent};
use crate::error::Result;
use crate::registry::{SectionDef, SectionRegistry, element_title};
use crate::render::{Backend, Feature, Flow};

const VERSION_HISTORY_HEADERS: [&str; 4] = ["Version", "Date", "Author", "Summary of Changes"];

const TOC_NOTE: &str = "[ Note: Page numbers in this TOC are approximate. \
                        For a fully linked TOC, open the .docx version in Microsoft Word. ]";

/// Switches for the optional parts of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleOptions {
    pub include_toc: bool,
    /// Render template text for sections with no content.
    pub placeholders: bool,
    /// Start the first section on a fresh page of its own.
    pub break_before_first: bool,
    pub version_history: bool,
    /// Drop sections whose skip conditions match the genre.
    pub adapt_to_genre: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            include_toc: true,
            placeholders: true,
            break_before_first: false,
            version_history: true,
            adapt_to_genre: false,
        }
    }
}

/// Render `data` through `flow`. Backends that cannot draw a table of contents
/// field get the recorded entries appended after the last section instead.
pub fn assemble<B: Backend>(
    flow: &mut Flow<'_, B>,
    data: &GameData,
    registry: &SectionRegistry,
    options: &AssembleOptions,
) -> Result<()> {
    let meta = &data.meta;
    log::info!("assembling '{}'", meta.game_title);

    for key in data.sections.keys() {
        if !registry.contains(key) {
            log::warn!("ignoring unknown section '{key}'");
        }
    }

    let registry = if options.adapt_to_genre {
        registry.for_genre(&meta.genre)
    } else {
        registry.clone()
    };

    flow.cover_page(meta)?;
    flow.page_break()?;

    if options.version_history {
        version_history(flow, meta)?;
        flow.page_break()?;
    }

    if options.include_toc && flow.supports(Feature::TocField) {
        flow.toc_field()?;
        flow.page_break()?;
    }

    let mut rendered = 0;
    for def in registry.iter() {
        let content = data.section(def.key);
        if content.is_none() && !options.placeholders {
            log::debug!("no content for '{}', skipping", def.key);
            continue;
        }
        if rendered > 0 || options.break_before_first {
            flow.page_break()?;
        }
        rendered += 1;

        flow.heading(1, &def.heading())?;
        match content {
            Some(content) => section_body(flow, content)?,
            None => flow.render_content(&placeholder(def, meta))?,
        }
    }
    log::info!("rendered {rendered} sections");

    if options.include_toc && flow.supports(Feature::TocEntries) {
        let entries = flow.toc_entries().to_vec();
        flow.page_break()?;
        flow.untracked_heading(1, "Table of Contents")?;
        flow.paragraph(TOC_NOTE)?;
        flow.toc_entries_list(&entries)?;
    }

    Ok(())
}

fn version_history<B: Backend>(flow: &mut Flow<'_, B>, meta: &Metadata) -> Result<()> {
    let headers: Vec<String> = VERSION_HISTORY_HEADERS.iter().map(|h| h.to_string()).collect();
    let first = vec![
        meta.version.clone(),
        meta.date.clone(),
        meta.lead_designer.clone(),
        "Initial draft".to_string(),
    ];
    flow.untracked_heading(2, "Version History")?;
    flow.table(&headers, &[first])
}

/// Body text, then subsections as level 2 and their children as level 3.
fn section_body<B: Backend>(flow: &mut Flow<'_, B>, content: &SectionContent) -> Result<()> {
    flow.render_content(content.body())?;
    for sub in content.subsections() {
        titled(flow, 2, sub)?;
        for nested in sub.subsections() {
            titled(flow, 3, nested)?;
            if !nested.subsections().is_empty() {
                log::warn!(
                    "subsections below '{}' are nested too deeply and were skipped",
                    nested.title().unwrap_or("untitled")
                );
            }
        }
    }
    Ok(())
}

fn titled<B: Backend>(flow: &mut Flow<'_, B>, level: u8, content: &SectionContent) -> Result<()> {
    if let Some(title) = content.title().filter(|t| !t.trim().is_empty()) {
        flow.heading(level, title)?;
    }
    flow.render_content(content.body())
}

/// Template text for a section with no content. It goes through the same
/// scanner as real content, so elements become bullets and the closing
/// marker becomes an open question callout.
pub fn placeholder(def: &SectionDef, meta: &Metadata) -> String {
    let mut lines = vec![
        format!(
            "[This section covers the {} for {}.]",
            def.name, meta.game_title
        ),
        String::new(),
        format!("Target length: {} words", def.recommended_words),
        String::new(),
        "Required elements:".to_string(),
    ];
    for element in def.key_elements {
        lines.push(format!("- {}: [content required]", element_title(element)));
    }

    for (keyword, note) in def.adaptations_for(&meta.genre) {
        lines.push(String::new());
        lines.push(format!(
            "> 🎮 Designer's Note: {} adaptation: {note}",
            element_title(keyword)
        ));
    }

    if let Some(template) = def.template_file {
        lines.push(String::new());
        lines.push(format!("Reference: {template}"));
    }

    lines.push(String::new());
    lines.push("[OPEN QUESTION: Replace this placeholder with actual content]".to_string());
    lines.join("\n")
}
