//! Single-page concept sheet for cold outreach and press kits, laid out in
//! Typst on a fixed A4 grid.

use serde::Deserialize;

use crate::config::Config;
use crate::content::Metadata;
use crate::typst::{fonts, mm, rgb, typst_str};

const MAX_FEATURES: usize = 4;
const MAX_COMPARABLES: usize = 3;
const MAX_TEAM_LINES: usize = 5;

/// Page geometry in millimetres. The top and bottom margins leave room for
/// the colored bars.
const MARGIN_X: f32 = 12.0;
const TOP_BAR: f32 = 7.0;
const FOOTER_BAR: f32 = 12.0;
const LEFT_COLUMN: f32 = 90.0;

/// Content of the one-pager. Missing fields fall back to bracketed prompts
/// so the sheet doubles as a template.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct OnePager {
    #[serde(flatten)]
    pub meta: Metadata,
    pub monetization: String,
    pub hook: String,
    pub core_loop: String,
    /// `[name, one-line description]` pairs.
    pub key_features: Vec<(String, String)>,
    /// `[title, what it contributes]` pairs.
    pub comparable_titles: Vec<(String, String)>,
    /// Free-form team lines. When empty they are built from the fields below.
    pub team_info: Vec<String>,
    pub team_size: String,
    pub lead_credential: String,
    pub dev_status: String,
    pub funding_status: String,
    pub contact_email: String,
    pub website: String,
    pub location: String,
}

impl Default for OnePager {
    fn default() -> Self {
        let pairs = |items: &[(&str, &str)]| -> Vec<(String, String)> {
            items
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect()
        };
        Self {
            meta: Metadata::default(),
            monetization: "F2P / Battle Pass".to_string(),
            hook: "[2-sentence hook. First: the experience. Second: why it's different.]"
                .to_string(),
            core_loop: "[3 sentences: micro loop → macro loop → return motivation]".to_string(),
            key_features: pairs(&[
                ("Feature 1", "[One specific sentence about this mechanic]"),
                ("Feature 2", "[One specific sentence about the innovation]"),
                ("Feature 3", "[One specific sentence about the hook]"),
                (
                    "Feature 4",
                    "[One specific sentence about the social/retention driver]",
                ),
            ]),
            comparable_titles: pairs(&[
                ("Game A × Game B", "but [your key differentiator]"),
                ("Game C", "for [what you take from it]"),
                ("Game D", "for [the market validation it provides]"),
            ]),
            team_info: Vec::new(),
            team_size: "6 developers".to_string(),
            lead_credential: "[Name] - shipped [Title]".to_string(),
            dev_status: "Vertical slice in progress".to_string(),
            funding_status: "Seeking seed round".to_string(),
            contact_email: "contact@studio.com".to_string(),
            website: "studio.gg".to_string(),
            location: "Remote".to_string(),
        }
    }
}

impl OnePager {
    pub fn new(meta: Metadata) -> Self {
        Self {
            meta,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Team lines as printed, capped at five.
    pub fn team_lines(&self) -> Vec<String> {
        let lines = if self.team_info.is_empty() {
            vec![
                format!("Team: {}", self.team_size),
                format!("Lead: {}", self.lead_credential),
                format!("Status: {}", self.dev_status),
                format!("Funding: {}", self.funding_status),
            ]
        } else {
            self.team_info.clone()
        };
        lines.into_iter().take(MAX_TEAM_LINES).collect()
    }
}

/// Lay out the one-pager as Typst markup.
pub fn to_typst(sheet: &OnePager, config: &Config) -> String {
    let meta = &sheet.meta;
    let colors = &config.colors;
    let dark = rgb(&colors.heading_1);
    let mid = rgb(&colors.heading_2);
    let mut out = String::new();

    out.push_str(&format!(
        "#set document(title: {}, author: {}, keywords: ({}, {}, {}))\n",
        typst_str(&format!("{} - One Pager", meta.game_title)),
        typst_str(&meta.studio_name),
        typst_str("one-pager"),
        typst_str(&meta.genre),
        typst_str(&meta.platform)
    ));

    let top_text = format!("{}  ·  {}", meta.studio_name, meta.date);
    let footer_text = format!(
        "{}  ·  {}  ·  {}  ·  {}",
        meta.studio_name, sheet.contact_email, sheet.website, sheet.location
    );
    out.push_str("#set page(\n  paper: \"a4\",\n");
    out.push_str(&format!(
        "  margin: (x: {}, top: {}, bottom: {}),\n",
        mm(MARGIN_X),
        mm(TOP_BAR + 4.0),
        mm(FOOTER_BAR + 4.0)
    ));
    out.push_str("  background: {\n");
    out.push_str(&format!(
        "    place(top + left, block(width: 100%, height: {}, fill: {dark}, inset: (x: {}), \
         align(right + horizon, text(size: 7pt, fill: white, {}))))\n",
        mm(TOP_BAR),
        mm(MARGIN_X),
        typst_str(&top_text)
    ));
    out.push_str(&format!(
        "    place(bottom + left, block(width: 100%, height: {}, fill: {dark}, \
         align(center + horizon, text(size: 7pt, fill: white, {}))))\n",
        mm(FOOTER_BAR),
        typst_str(&footer_text)
    ));
    out.push_str("  },\n)\n");
    out.push_str(&format!(
        "#set text(font: {}, size: 8.5pt, fill: {})\n",
        fonts(&config.font.body, &config.font.serif_fallback),
        rgb(&colors.body)
    ));
    out.push_str("#set par(spacing: 0.7em, leading: 0.5em)\n");
    out.push_str(&format!(
        "#let section-label(body) = block(width: 100%, fill: {dark}, inset: (x: 2mm, y: 1.2mm), \
         above: 2mm, below: 1.5mm, text(size: 7.5pt, weight: \"bold\", fill: white, upper(body)))\n"
    ));
    out.push_str(&format!(
        "#let divider() = line(length: 100%, stroke: 0.2mm + {})\n\n",
        rgb(&colors.table_border)
    ));

    // Title block
    out.push_str(&format!(
        "#text(size: 22pt, weight: \"bold\", fill: {dark}, {})\n\n",
        typst_str(&meta.game_title)
    ));
    out.push_str(&format!(
        "#text(size: 9.5pt, style: \"italic\", fill: {}, {})\n\n",
        rgb(&colors.caption),
        typst_str(&meta.tagline)
    ));
    out.push_str(&format!(
        "#line(length: 50mm, stroke: 0.7mm + {})\n\n",
        rgb(&colors.highlight)
    ));

    // Metadata panel: labels on the first row, values on the second
    let fields = [
        ("Genre", &meta.genre),
        ("Platform", &meta.platform),
        ("Audience", &meta.audience),
        ("Monetization", &sheet.monetization),
    ];
    out.push_str(&format!(
        "#block(width: 100%, fill: {}, inset: 1.5mm, grid(\n  columns: (1fr, 1fr, 1fr, 1fr),\n  \
         column-gutter: 2mm,\n  row-gutter: 1mm,\n",
        rgb(&colors.panel_bg)
    ));
    for (label, _) in &fields {
        out.push_str(&format!(
            "  text(size: 6.5pt, weight: \"bold\", fill: {mid}, {}),\n",
            typst_str(&label.to_uppercase())
        ));
    }
    for (_, value) in &fields {
        out.push_str(&format!("  text(size: 7.5pt, {}),\n", typst_str(value)));
    }
    out.push_str("))\n\n#divider()\n\n");

    out.push_str("#section-label(\"Hook\")\n");
    out.push_str(&format!("#text({})\n\n#divider()\n\n", typst_str(&sheet.hook)));

    out.push_str("#section-label(\"Core Gameplay Loop\")\n");
    out.push_str(&format!(
        "#text({})\n\n#divider()\n\n",
        typst_str(&sheet.core_loop)
    ));

    out.push_str("#section-label(\"Key Features\")\n");
    for (name, description) in sheet.key_features.iter().take(MAX_FEATURES) {
        out.push_str(&format!(
            "#block(above: 1mm, below: 1mm)[#text(size: 8pt, weight: \"bold\", fill: {}, {})#text(size: 8pt, {})]\n",
            rgb(&colors.highlight),
            typst_str(&format!("★ {name}: ")),
            typst_str(description)
        ));
    }
    out.push_str("\n#divider()\n\n");

    // Comparable titles beside team and status
    out.push_str(&format!(
        "#grid(\n  columns: ({}, 1fr),\n  column-gutter: 3mm,\n  [\n    #section-label(\"Comparable Titles\")\n",
        mm(LEFT_COLUMN)
    ));
    for (title, note) in sheet.comparable_titles.iter().take(MAX_COMPARABLES) {
        out.push_str(&format!(
            "    #block(above: 1mm, below: 0.5mm, text(size: 8pt, weight: \"bold\", fill: {mid}, {}))\n",
            typst_str(title)
        ));
        out.push_str(&format!(
            "    #pad(left: 1mm, text(size: 7.5pt, style: \"italic\", fill: {}, {}))\n",
            rgb(&colors.caption),
            typst_str(note)
        ));
    }
    out.push_str("  ],\n  [\n    #section-label(\"Team / Status\")\n");
    for line in sheet.team_lines() {
        out.push_str(&format!(
            "    #block(above: 1mm, below: 1mm, text(size: 8pt, {}))\n",
            typst_str(&line)
        ));
    }
    out.push_str("  ],\n)\n\n#divider()\n");

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> OnePager {
        OnePager::from_json(
            r#"{
                "game_title": "Echo Chamber",
                "studio_name": "Night Owl",
                "genre": "Puzzle",
                "date": "March 2025",
                "hook": "Sound becomes \"light\".",
                "key_features": [["Pulse", "Echoes reveal walls"], ["A", "a"], ["B", "b"], ["C", "c"], ["D", "d"]],
                "comparable_titles": [["Inside", "for mood"]]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn missing_fields_use_prompts() {
        let sheet = OnePager::from_json(r#"{"game_title": "Echo"}"#).unwrap();
        assert_eq!(sheet.meta.game_title, "Echo");
        assert_eq!(sheet.monetization, "F2P / Battle Pass");
        assert_eq!(sheet.key_features.len(), 4);
        assert_eq!(sheet.comparable_titles[0].0, "Game A × Game B");
        assert_eq!(sheet.location, "Remote");
    }

    #[test]
    fn team_lines_from_fields_or_list() {
        let mut sheet = OnePager::default();
        assert_eq!(
            sheet.team_lines(),
            vec![
                "Team: 6 developers",
                "Lead: [Name] - shipped [Title]",
                "Status: Vertical slice in progress",
                "Funding: Seeking seed round",
            ]
        );

        sheet.team_info = (1..=7).map(|i| format!("line {i}")).collect();
        let lines = sheet.team_lines();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[4], "line 5");
    }

    #[test]
    fn markup_has_bars_sections_and_metadata() {
        let markup = to_typst(&sheet(), &Config::default());
        assert!(markup.starts_with(
            "#set document(title: \"Echo Chamber - One Pager\", author: \"Night Owl\""
        ));
        assert!(markup.contains("\"Night Owl  ·  March 2025\""));
        assert!(markup.contains("\"Night Owl  ·  contact@studio.com  ·  studio.gg  ·  Remote\""));
        assert!(markup.contains("\"MONETIZATION\""));
        assert!(markup.contains("#section-label(\"Core Gameplay Loop\")"));
        assert!(markup.contains("#text(\"Sound becomes \\\"light\\\".\")"));
        assert!(markup.contains("\"★ Pulse: \""));
        assert!(markup.contains("columns: (90mm, 1fr)"));
    }

    #[test]
    fn lists_are_capped() {
        let markup = to_typst(&sheet(), &Config::default());
        assert!(markup.contains("\"★ C: \""));
        assert!(!markup.contains("\"★ D: \""));
        assert_eq!(markup.matches("#pad(left: 1mm").count(), 1);
    }
}
