//! Pitch deck content: eleven slides, each with a stock template that a
//! content file can replace slide by slide.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::content::Metadata;

/// Slide keys in deck order. Slide 1 is the title slide and has no key.
pub const SLIDE_KEYS: [&str; 10] = [
    "slide_2_problem",
    "slide_3_solution",
    "slide_4_loop",
    "slide_5_features",
    "slide_6_audience",
    "slide_7_monetization",
    "slide_8_competitive",
    "slide_9_timeline",
    "slide_10_team",
    "slide_11_ask",
];

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PitchData {
    #[serde(flatten)]
    pub meta: Metadata,
    pub monetization: String,
    pub team_size: String,
    pub comparable_1: String,
    pub comparable_2: String,
    pub unique_hook: String,
    /// Replacements for the stock slides, keyed by [`SLIDE_KEYS`].
    pub pitch_slides: BTreeMap<String, SlideContent>,
}

impl Default for PitchData {
    fn default() -> Self {
        Self {
            meta: Metadata::default(),
            monetization: "Free-to-Play with Battle Pass".to_string(),
            team_size: "6-10 developers".to_string(),
            comparable_1: "Game A".to_string(),
            comparable_2: "Game B".to_string(),
            unique_hook: "[Unique differentiator - complete in GDD interview]".to_string(),
            pitch_slides: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SlideContent {
    pub title: Option<String>,
    pub blocks: Vec<ContentBlock>,
    pub competitors: Option<Vec<Competitor>>,
    pub differentiator: Option<String>,
    pub ask: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    #[default]
    Bullets,
    Text,
    Stat,
}

/// One column of a content slide.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub title: String,
    pub items: Vec<String>,
    pub text: String,
    pub value: String,
    pub label: String,
}

impl ContentBlock {
    pub fn bullets(title: &str, items: &[&str]) -> Self {
        Self {
            kind: BlockKind::Bullets,
            title: title.to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn text(title: &str, text: &str) -> Self {
        Self {
            kind: BlockKind::Text,
            title: title.to_string(),
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn stat(value: &str, label: &str) -> Self {
        Self {
            kind: BlockKind::Stat,
            value: value.to_string(),
            label: label.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Competitor {
    pub name: String,
    pub strength: String,
    pub weakness: String,
}

impl Competitor {
    fn new(name: &str, strength: &str, weakness: &str) -> Self {
        Self {
            name: name.to_string(),
            strength: strength.to_string(),
            weakness: weakness.to_string(),
        }
    }
}

impl PitchData {
    pub fn new(meta: Metadata) -> Self {
        Self {
            meta,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Content for `key`: the provided slide when there is one, otherwise
    /// the stock template. A provided slide replaces the template whole.
    pub fn slide(&self, key: &str) -> SlideContent {
        self.pitch_slides
            .get(key)
            .cloned()
            .unwrap_or_else(|| self.stock_slide(key))
    }

    /// The ask text of the closing slide. Without an explicit `ask`, stat
    /// and bullet blocks are folded into lines.
    pub fn ask_text(slide: &SlideContent) -> String {
        if let Some(ask) = slide.ask.as_deref().filter(|a| !a.is_empty()) {
            return ask.to_string();
        }
        let lines: Vec<String> = slide
            .blocks
            .iter()
            .filter_map(|block| match block.kind {
                BlockKind::Stat => Some(format!("{} - {}", block.value, block.label)),
                BlockKind::Bullets if !block.title.is_empty() => {
                    let items: Vec<&str> =
                        block.items.iter().take(3).map(String::as_str).collect();
                    Some(format!("{}: {}", block.title, items.join("; ")))
                }
                _ => None,
            })
            .collect();
        if lines.is_empty() {
            "[The Ask - investment amount and milestone target]".to_string()
        } else {
            lines.join("\n")
        }
    }

    fn stock_slide(&self, key: &str) -> SlideContent {
        let meta = &self.meta;
        let genre = meta.genre.as_str();
        let comp_1 = self.comparable_1.as_str();
        let comp_2 = self.comparable_2.as_str();
        let titled = |title: &str, blocks: Vec<ContentBlock>| SlideContent {
            title: Some(title.to_string()),
            blocks,
            ..SlideContent::default()
        };

        match key {
            "slide_2_problem" => titled(
                "The Market Opportunity",
                vec![
                    ContentBlock::stat(
                        "$X.XB",
                        &format!("SOURCE NEEDED: {genre} market size (year)"),
                    ),
                    ContentBlock::stat(
                        "XXM",
                        "SOURCE NEEDED: Active players in genre (Steam + mobile)",
                    ),
                    ContentBlock::bullets(
                        "The Gap",
                        &[
                            &format!("Players want {genre} but with [missing element]"),
                            "Existing titles haven't [unmet need]",
                            "Last breakout title in genre: [Title, Year] - gap since then",
                            "Our target audience actively requests [feature] in forums",
                        ],
                    ),
                ],
            ),
            "slide_3_solution" => titled(
                &format!("The Game: {}", meta.game_title),
                vec![
                    ContentBlock::text("High Concept", &meta.tagline),
                    ContentBlock::text(
                        "Core Fantasy",
                        &format!(
                            "Players feel like [power fantasy] - the experience {comp_1} \
                             promised but never delivered."
                        ),
                    ),
                    ContentBlock::bullets(
                        "Three Pillars",
                        &[
                            "[Pillar 1: core mechanic experience]",
                            "[Pillar 2: progression/mastery]",
                            "[Pillar 3: social/session hook]",
                        ],
                    ),
                ],
            ),
            "slide_4_loop" => titled(
                "Core Gameplay Loop",
                vec![
                    ContentBlock::text(
                        "Micro Loop (2-5 min)",
                        "[Describe what the player does in a single combat/puzzle/interaction cycle]",
                    ),
                    ContentBlock::text(
                        "Macro Loop (20-40 min)",
                        "[Describe how micro loops build into a session - what the player achieves in one sitting]",
                    ),
                    ContentBlock::text(
                        "Meta Loop (Days → Weeks)",
                        "[Describe the long-term progression arc that creates return behavior]",
                    ),
                ],
            ),
            "slide_5_features" => titled(
                "Key Features",
                vec![
                    ContentBlock::bullets(
                        "★ [Feature 1 Name]",
                        &["[One sentence describing the specific mechanic or system]"],
                    ),
                    ContentBlock::bullets(
                        "★ [Feature 2 Name]",
                        &["[One sentence - the innovation that doesn't exist elsewhere]"],
                    ),
                    ContentBlock::bullets(
                        "★ [Feature 3 Name]",
                        &["[One sentence describing player-facing hook]"],
                    ),
                    ContentBlock::bullets(
                        "★ [Feature 4 Name]",
                        &["[One sentence - the social or retention hook]"],
                    ),
                ],
            ),
            "slide_6_audience" => titled(
                "Target Audience & Market",
                vec![
                    ContentBlock::bullets(
                        "Primary Audience",
                        &[
                            &meta.audience,
                            &format!("Platform: {}", meta.platform),
                            "[Hrs/week in similar games: estimate]",
                            "[Income range / spending behavior]",
                        ],
                    ),
                    ContentBlock::bullets(
                        "Comparable Player Bases",
                        &[
                            &format!("{comp_1}: [X]M players, [MAU data]"),
                            &format!("{comp_2}: [X]M players, [MAU data]"),
                            "We target [%] crossover from each",
                        ],
                    ),
                    ContentBlock::stat(
                        "D30",
                        "SOURCE NEEDED: Retention Target: >X% (cite industry benchmark)",
                    ),
                ],
            ),
            "slide_7_monetization" => titled(
                "Monetization Strategy",
                vec![
                    ContentBlock::bullets(
                        "Revenue Model",
                        &[
                            &format!("Model: {}", self.monetization),
                            "Battle Pass: $9.99/season (8 weeks)",
                            "Cosmetics IAP: $0.99 - $9.99",
                            "No pay-to-win - cosmetics only",
                        ],
                    ),
                    ContentBlock::stat("$XX", "SOURCE NEEDED: Target blended ARPU (monthly)"),
                    ContentBlock::stat("X-X%", "SOURCE NEEDED: D30 conversion rate target"),
                ],
            ),
            "slide_8_competitive" => SlideContent {
                title: Some("Competitive Landscape".to_string()),
                competitors: Some(vec![
                    Competitor::new(
                        comp_1,
                        "[What they do well - 1 sentence]",
                        "[What they lack that we deliver - 1 sentence]",
                    ),
                    Competitor::new(comp_2, "[Their strength]", "[Their gap we fill]"),
                    Competitor::new(
                        "[Indirect Comp]",
                        "[Why players go there]",
                        "[Why they'd prefer us]",
                    ),
                ]),
                ..SlideContent::default()
            },
            "slide_9_timeline" => titled(
                "Development Timeline",
                vec![
                    ContentBlock::bullets(
                        "Milestones",
                        &[
                            "Q[X] 202X - Vertical Slice (core loop playable)",
                            "Q[X] 202X - Alpha (feature complete, internal test)",
                            "Q[X] 202X - Beta (content complete, external playtest)",
                            "Q[X] 202X - Soft Launch (limited regions)",
                            "Q[X] 202X - Global Launch",
                        ],
                    ),
                    ContentBlock::bullets(
                        "Current Status",
                        &[
                            "[Current milestone and % complete]",
                            "[Team size and key roles filled]",
                            "[Budget status: self-funded / seeking investment]",
                            "[Prototype playable: yes/no]",
                        ],
                    ),
                ],
            ),
            "slide_10_team" => titled(
                "The Team",
                vec![
                    ContentBlock::bullets(
                        "Core Team",
                        &[
                            "[Name] - Game Director / Lead Designer: [Credential - shipped title or years exp]",
                            "[Name] - Technical Lead: [Credential]",
                            "[Name] - Art Director: [Credential]",
                            "[Name] - Producer: [Credential]",
                        ],
                    ),
                    ContentBlock::bullets(
                        "Team Profile",
                        &[
                            &format!("Total: {}", self.team_size),
                            "[Combined years exp / shipped titles]",
                            "[Notable studio backgrounds, if any]",
                            "[Key advisors, if any]",
                        ],
                    ),
                ],
            ),
            "slide_11_ask" => SlideContent {
                ask: Some("[The Ask: Seeking $X for Y months runway to Z milestone]".to_string()),
                contact: Some(format!(
                    "{}  ·  contact@studio.com  ·  studio.gg",
                    meta.studio_name
                )),
                ..SlideContent::default()
            },
            _ => SlideContent::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_slides_use_metadata() {
        let data = PitchData::from_json(
            r#"{"game_title": "Echo", "genre": "Puzzle", "comparable_1": "Inside"}"#,
        )
        .unwrap();

        let problem = data.slide("slide_2_problem");
        assert_eq!(problem.title.as_deref(), Some("The Market Opportunity"));
        assert_eq!(problem.blocks[0].kind, BlockKind::Stat);
        assert!(problem.blocks[0].label.contains("Puzzle market size"));

        let solution = data.slide("slide_3_solution");
        assert_eq!(solution.title.as_deref(), Some("The Game: Echo"));

        let competitive = data.slide("slide_8_competitive");
        let competitors = competitive.competitors.unwrap();
        assert_eq!(competitors[0].name, "Inside");
        assert_eq!(competitors[1].name, "Game B");
    }

    #[test]
    fn provided_slide_replaces_template() {
        let data = PitchData::from_json(
            r#"{"pitch_slides": {"slide_4_loop": {"blocks": [
                {"type": "text", "title": "Loop", "text": "Pulse, listen, move"},
                {"items": ["untyped blocks are bullets"]}
            ]}}}"#,
        )
        .unwrap();
        let slide = data.slide("slide_4_loop");
        assert_eq!(slide.title, None);
        assert_eq!(slide.blocks.len(), 2);
        assert_eq!(slide.blocks[0].kind, BlockKind::Text);
        assert_eq!(slide.blocks[1].kind, BlockKind::Bullets);
        // Other slides keep their templates
        assert_eq!(data.slide("slide_10_team").blocks.len(), 2);
    }

    #[test]
    fn ask_text_folds_blocks() {
        let slide = SlideContent {
            blocks: vec![
                ContentBlock::stat("$2M", "Seed round"),
                ContentBlock::bullets("Use of funds", &["Team", "Marketing", "Ops", "Extra"]),
                ContentBlock::text("ignored", "ignored"),
            ],
            ..SlideContent::default()
        };
        assert_eq!(
            PitchData::ask_text(&slide),
            "$2M - Seed round\nUse of funds: Team; Marketing; Ops"
        );
        assert_eq!(
            PitchData::ask_text(&SlideContent::default()),
            "[The Ask - investment amount and milestone target]"
        );

        let stock = PitchData::default().slide("slide_11_ask");
        assert!(PitchData::ask_text(&stock).starts_with("[The Ask: Seeking $X"));
    }
}
