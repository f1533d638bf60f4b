use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Document metadata shown on the cover page, headers and footers.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Metadata {
    #[serde(alias = "title")]
    pub game_title: String,
    pub tagline: String,
    pub genre: String,
    pub platform: String,
    pub audience: String,
    #[serde(alias = "studio")]
    pub studio_name: String,
    pub version: String,
    pub date: String,
    pub lead_designer: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            game_title: "Untitled Game".to_string(),
            tagline: "A new gaming experience".to_string(),
            genre: "Genre TBD".to_string(),
            platform: "Platform TBD".to_string(),
            audience: "Audience TBD".to_string(),
            studio_name: "Studio Name".to_string(),
            version: "v0.1".to_string(),
            date: current_date(),
            lead_designer: "Design Team".to_string(),
        }
    }
}

/// Month and year, e.g. `March 2025`.
pub fn current_date() -> String {
    chrono::Local::now().format("%B %Y").to_string()
}

/// Read and deserialize a JSON content file. Keys the target type does not
/// know are ignored, so one file can feed every document kind.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Body of one registry section: plain text, or text with nested subsections
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SectionContent {
    Text(String),
    Structured(StructuredSection),
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StructuredSection {
    pub title: Option<String>,
    pub content: String,
    pub subsections: Vec<SectionContent>,
}

impl SectionContent {
    pub fn title(&self) -> Option<&str> {
        match self {
            SectionContent::Text(_) => None,
            SectionContent::Structured(s) => s.title.as_deref(),
        }
    }

    /// The prose directly under this section, without subsections.
    pub fn body(&self) -> &str {
        match self {
            SectionContent::Text(text) => text,
            SectionContent::Structured(s) => &s.content,
        }
    }

    pub fn subsections(&self) -> &[SectionContent] {
        match self {
            SectionContent::Text(_) => &[],
            SectionContent::Structured(s) => &s.subsections,
        }
    }

    /// All text in this section and its subsections, used for validation.
    pub fn full_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(title) = self.title() {
            out.push_str(title);
            out.push('\n');
        }
        out.push_str(self.body());
        for sub in self.subsections() {
            out.push('\n');
            sub.collect_text(out);
        }
    }

    pub fn is_blank(&self) -> bool {
        self.body().trim().is_empty() && self.subsections().is_empty()
    }
}

/// Everything needed to build one game design document
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GameData {
    #[serde(flatten)]
    pub meta: Metadata,
    pub sections: BTreeMap<String, SectionContent>,
}

impl GameData {
    /// Parse content from a JSON string.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load content from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        load_json(path)
    }

    /// Content for a section key, treating blank content as absent.
    pub fn section(&self, key: &str) -> Option<&SectionContent> {
        self.sections.get(key).filter(|content| !content.is_blank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_and_structured_sections() {
        let data = GameData::from_json(
            r#"{
                "game_title": "Echo Chamber",
                "studio": "Night Owl",
                "sections": {
                    "executive_summary": "A short pitch.",
                    "game_mechanics": {
                        "content": "Overview",
                        "subsections": [
                            {"title": "Movement", "content": "Run and jump",
                             "subsections": [{"title": "Dash", "content": "Fast"}]},
                            "Loose text"
                        ]
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(data.meta.game_title, "Echo Chamber");
        assert_eq!(data.meta.studio_name, "Night Owl");
        assert_eq!(data.meta.version, "v0.1");

        let summary = &data.sections["executive_summary"];
        assert_eq!(summary.body(), "A short pitch.");
        assert!(summary.subsections().is_empty());

        let mechanics = &data.sections["game_mechanics"];
        assert_eq!(mechanics.body(), "Overview");
        assert_eq!(mechanics.subsections().len(), 2);
        assert_eq!(mechanics.subsections()[0].title(), Some("Movement"));
        assert_eq!(mechanics.subsections()[0].subsections()[0].body(), "Fast");
        assert_eq!(mechanics.subsections()[1].body(), "Loose text");
    }

    #[test]
    fn full_text_includes_subsections() {
        let data = GameData::from_json(
            r#"{"sections": {"x": {"content": "top", "subsections": [{"title": "Sub", "content": "inner"}]}}}"#,
        )
        .unwrap();
        assert_eq!(data.sections["x"].full_text(), "top\nSub\ninner");
    }

    #[test]
    fn blank_sections_count_as_missing() {
        let data =
            GameData::from_json(r#"{"sections": {"a": "   ", "b": "text"}}"#).unwrap();
        assert!(data.section("a").is_none());
        assert!(data.section("b").is_some());
        assert!(data.section("c").is_none());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            GameData::load(&path),
            Err(Error::ConfigParse { .. })
        ));
    }
}
