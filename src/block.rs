/// Kind of a callout box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalloutKind {
    /// `> 🎮 Designer's Note: ...`
    Note,
    /// `[OPEN QUESTION: ...]` or `[PLAYTEST: ...]`
    OpenQuestion,
}

impl CalloutKind {
    /// Bold label printed in front of the callout body.
    pub fn label(self) -> &'static str {
        match self {
            CalloutKind::Note => "Designer's Note:",
            CalloutKind::OpenQuestion => "Open Question:",
        }
    }
}

/// Block-level elements produced by one scan of a content string
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    Bullet {
        text: String,
        indent: u8,
    },
    NumberedItem {
        text: String,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    CodeBlock {
        lines: Vec<String>,
    },
    Callout {
        kind: CalloutKind,
        text: String,
    },
    DiagramRef {
        label: String,
    },
    Paragraph {
        text: String,
    },
}

impl Block {
    /// The capability a backend needs to draw this block.
    pub fn feature(&self) -> crate::render::Feature {
        use crate::render::Feature;
        match self {
            Block::Heading { .. } => Feature::Heading,
            Block::Bullet { .. } => Feature::Bullet,
            Block::NumberedItem { .. } => Feature::NumberedItem,
            Block::Table { .. } => Feature::Table,
            Block::CodeBlock { .. } => Feature::CodeBlock,
            Block::Callout { .. } => Feature::Callout,
            Block::DiagramRef { .. } => Feature::Diagram,
            Block::Paragraph { .. } => Feature::Paragraph,
        }
    }
}
