//! PowerPoint (PPTX) pitch deck output.
//!
//! [`build_deck`] lays out eleven slides with absolute positions on a 16:9
//! canvas; [`package`] wraps them with a master, a blank layout and a theme.

#[cfg(feature = "pptx")]
mod package;
pub mod slide;

use crate::config::{Config, PitchConfig};
use crate::pitch::{BlockKind, ContentBlock, Competitor, PitchData, SLIDE_KEYS};

use slide::{Align, Frame, Slide, TextStyle};

/// Content slides show at most four blocks side by side.
const MAX_BLOCKS: usize = 4;

/// Lay out the whole deck.
pub fn build_deck(data: &PitchData, config: &Config) -> Vec<Slide> {
    let theme = &config.pitch;
    let meta = &data.meta;
    let mut slides = vec![title_slide(data, theme)];

    for (i, key) in SLIDE_KEYS.iter().enumerate() {
        let number = i + 2;
        let slide = data.slide(key);
        let fallback_title = default_title(key, &meta.game_title);
        let title = slide.title.clone().unwrap_or(fallback_title);

        let built = match *key {
            "slide_8_competitive" => {
                let competitors = slide.competitors.clone().unwrap_or_else(stock_competitors);
                let differentiator = slide
                    .differentiator
                    .clone()
                    .unwrap_or_else(|| data.unique_hook.clone());
                comparison_slide(
                    theme,
                    number,
                    &title,
                    &competitors,
                    &meta.game_title,
                    &differentiator,
                )
            }
            "slide_11_ask" => {
                let contact = slide
                    .contact
                    .clone()
                    .unwrap_or_else(|| format!("{}  ·  contact@studio.com", meta.studio_name));
                closing_slide(
                    theme,
                    number,
                    &meta.game_title,
                    &PitchData::ask_text(&slide),
                    &contact,
                )
            }
            _ => content_slide(theme, number, &title, &slide.blocks),
        };
        slides.push(built);
    }

    log::debug!("laid out {} slides", slides.len());
    slides
}

/// Package a laid-out deck as PPTX bytes.
#[cfg(feature = "pptx")]
pub fn write_deck(
    slides: &[Slide],
    data: &PitchData,
    config: &Config,
) -> crate::error::Result<Vec<u8>> {
    package::write_package(slides, &data.meta, &config.pitch)
}

fn default_title(key: &str, game_title: &str) -> String {
    match key {
        "slide_2_problem" => "The Market Opportunity".to_string(),
        "slide_3_solution" => format!("The Game: {game_title}"),
        "slide_4_loop" => "Core Gameplay Loop".to_string(),
        "slide_5_features" => "Key Features".to_string(),
        "slide_6_audience" => "Target Audience & Market".to_string(),
        "slide_7_monetization" => "Monetization Strategy".to_string(),
        "slide_8_competitive" => "Competitive Landscape".to_string(),
        "slide_9_timeline" => "Development Timeline".to_string(),
        "slide_10_team" => "The Team".to_string(),
        _ => String::new(),
    }
}

/// Used when a competitive slide is provided without competitors.
fn stock_competitors() -> Vec<Competitor> {
    [
        ("Comp 1", "Strong brand", "No mobile version"),
        ("Comp 2", "Large player base", "Pay-to-win criticism"),
        ("Comp 3", "Deep mechanics", "High skill barrier"),
    ]
    .into_iter()
    .map(|(name, strength, weakness)| Competitor {
        name: name.to_string(),
        strength: strength.to_string(),
        weakness: weakness.to_string(),
    })
    .collect()
}

fn body<'a>(theme: &'a PitchConfig, size: f32, color: &'a str) -> TextStyle<'a> {
    TextStyle::new(&theme.body_font, size, color)
}

fn slide_number(slide: &mut Slide, theme: &PitchConfig, number: usize) {
    slide.text(
        Frame::new(9.5, 0.1, 0.4, 0.35),
        &number.to_string(),
        &body(theme, 8.0, &theme.text_secondary).align(Align::Right),
    );
}

/// Top bar, slide number, title and rule shared by content slides.
fn content_header(theme: &PitchConfig, number: usize, title: &str) -> Slide {
    let mut slide = Slide::new(&theme.bg_slide);
    slide.rect(Frame::new(0.0, 0.0, theme.slide_width, 0.08), &theme.accent_blue);
    slide_number(&mut slide, theme, number);
    slide.text(
        Frame::new(0.4, 0.15, 9.0, 0.7),
        title,
        &TextStyle::new(&theme.heading_font, 22.0, &theme.text_primary).bold(),
    );
    slide.rect(Frame::new(0.4, 0.88, 9.2, 0.02), &theme.accent_blue);
    slide
}

fn title_slide(data: &PitchData, theme: &PitchConfig) -> Slide {
    let meta = &data.meta;
    let mut slide = Slide::new(&theme.bg_dark);
    slide.rect(Frame::new(0.0, 0.0, 0.08, theme.slide_height), &theme.accent_gold);
    slide.text(
        Frame::new(0.3, 1.2, 9.5, 1.8),
        &meta.game_title,
        &TextStyle::new(&theme.heading_font, 48.0, &theme.text_primary).bold(),
    );
    slide.text(
        Frame::new(0.3, 2.9, 9.0, 0.8),
        &meta.tagline,
        &body(theme, 18.0, &theme.accent_gold).italic(),
    );
    slide.rect(Frame::new(0.3, 3.75, 6.0, 0.02), &theme.accent_blue);
    slide.text(
        Frame::new(0.3, 3.9, 9.0, 0.5),
        &format!("{}  ·  {}  ·  {}", meta.studio_name, meta.genre, meta.platform),
        &body(theme, 12.0, &theme.text_secondary),
    );
    slide.text(
        Frame::new(7.0, 5.1, 2.8, 0.4),
        "GAME DESIGN DOCUMENT",
        &body(theme, 8.0, &theme.text_secondary).align(Align::Right),
    );
    slide
}

/// Column width and left edges for `n` blocks.
fn block_grid(n: usize) -> (f32, &'static [f32]) {
    match n {
        0..=2 => (4.4, &[0.4, 5.2]),
        3 => (2.9, &[0.4, 3.55, 6.7]),
        _ => (2.1, &[0.4, 2.65, 4.9, 7.15]),
    }
}

fn content_slide(
    theme: &PitchConfig,
    number: usize,
    title: &str,
    blocks: &[ContentBlock],
) -> Slide {
    let mut slide = content_header(theme, number, title);
    if blocks.is_empty() {
        return slide;
    }

    let blocks = &blocks[..blocks.len().min(MAX_BLOCKS)];
    let (width, columns) = block_grid(blocks.len());
    let top = 1.0;

    for (block, &left) in blocks.iter().zip(columns) {
        match block.kind {
            BlockKind::Stat => {
                let value = if block.value.is_empty() {
                    "-"
                } else {
                    block.value.as_str()
                };
                slide.text(
                    Frame::new(left, top, width, 1.5),
                    value,
                    &body(theme, 36.0, &theme.accent_gold)
                        .bold()
                        .align(Align::Center),
                );
                slide.text(
                    Frame::new(left, top + 1.5, width, 0.6),
                    &block.label,
                    &body(theme, 10.0, &theme.text_secondary).align(Align::Center),
                );
            }
            BlockKind::Text => {
                let mut y = top;
                if !block.title.is_empty() {
                    slide.text(
                        Frame::new(left, y, width, 0.45),
                        &block.title,
                        &body(theme, 13.0, &theme.accent_gold).bold(),
                    );
                    y += 0.45;
                }
                slide.text(
                    Frame::new(left, y, width, 3.5),
                    &block.text,
                    &body(theme, 10.5, &theme.text_primary),
                );
            }
            BlockKind::Bullets => {
                slide.bullets(
                    Frame::new(left, top, width, 4.0),
                    &block.title,
                    &block.items,
                    &TextStyle::new(&theme.heading_font, 13.0, &theme.accent_gold).bold(),
                    &body(theme, 10.0, &theme.text_primary),
                );
            }
        }
    }
    slide
}

fn comparison_slide(
    theme: &PitchConfig,
    number: usize,
    title: &str,
    competitors: &[Competitor],
    game_title: &str,
    differentiator: &str,
) -> Slide {
    let mut slide = content_header(theme, number, title);
    let card_width = 2.8;

    for (competitor, left) in competitors.iter().zip([0.4, 3.5, 6.6]) {
        slide.rect(Frame::new(left, 1.0, card_width, 3.5), &theme.bg_card);
        slide.text(
            Frame::new(left + 0.1, 1.05, card_width - 0.2, 0.5),
            &competitor.name,
            &body(theme, 13.0, &theme.accent_blue)
                .bold()
                .align(Align::Center),
        );
        slide.text(
            Frame::new(left + 0.1, 1.65, card_width - 0.2, 1.0),
            &format!("✓ {}", competitor.strength),
            &body(theme, 9.5, &theme.accent_green),
        );
        slide.text(
            Frame::new(left + 0.1, 2.75, card_width - 0.2, 1.0),
            &format!("✗ {}", competitor.weakness),
            &body(theme, 9.5, &theme.accent_red),
        );
    }

    let differentiator = if differentiator.is_empty() {
        "[differentiator goes here]"
    } else {
        differentiator
    };
    slide.rect(Frame::new(0.4, 4.7, 9.2, 0.02), &theme.accent_gold);
    slide.text(
        Frame::new(0.4, 4.85, 9.2, 0.6),
        &format!("★  {game_title}: {differentiator}"),
        &body(theme, 12.0, &theme.accent_gold)
            .bold()
            .align(Align::Center),
    );
    slide
}

fn closing_slide(
    theme: &PitchConfig,
    number: usize,
    game_title: &str,
    ask: &str,
    contact: &str,
) -> Slide {
    let mut slide = Slide::new(&theme.bg_dark);
    slide.rect(Frame::new(0.0, 0.0, theme.slide_width, 0.08), &theme.accent_gold);
    slide.text(
        Frame::new(0.5, 1.0, 9.0, 1.2),
        game_title,
        &TextStyle::new(&theme.heading_font, 36.0, &theme.text_primary)
            .bold()
            .align(Align::Center),
    );
    slide.text(
        Frame::new(0.5, 2.2, 9.0, 1.2),
        ask,
        &body(theme, 16.0, &theme.accent_gold).align(Align::Center),
    );
    slide.rect(Frame::new(2.5, 3.5, 5.0, 0.02), &theme.accent_blue);
    slide.text(
        Frame::new(0.5, 3.7, 9.0, 0.8),
        contact,
        &body(theme, 11.0, &theme.text_secondary).align(Align::Center),
    );
    slide_number(&mut slide, theme, number);
    slide.rect(
        Frame::new(0.0, theme.slide_height - 0.08, theme.slide_width, 0.08),
        &theme.accent_gold,
    );
    slide
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(json: &str) -> Vec<Slide> {
        build_deck(&PitchData::from_json(json).unwrap(), &Config::default())
    }

    #[test]
    fn deck_has_eleven_slides_in_order() {
        let slides = deck(r#"{"game_title": "Echo", "tagline": "Sound is sight"}"#);
        assert_eq!(slides.len(), 11);

        let title = slides[0].texts();
        assert_eq!(title[0], "Echo");
        assert_eq!(title[1], "Sound is sight");
        assert!(title.contains(&"GAME DESIGN DOCUMENT".to_string()));

        assert_eq!(slides[1].texts()[..2], ["2", "The Market Opportunity"]);
        assert_eq!(slides[2].texts()[1], "The Game: Echo");
        assert_eq!(slides[9].texts()[1], "The Team");
    }

    #[test]
    fn competitive_slide_uses_comparables_and_hook() {
        let slides = deck(
            r#"{"game_title": "Echo", "comparable_1": "Inside", "unique_hook": "sound is the map"}"#,
        );
        let texts = slides[7].texts();
        assert!(texts.contains(&"Inside".to_string()));
        assert!(texts.contains(&"★  Echo: sound is the map".to_string()));
    }

    #[test]
    fn closing_slide_folds_blocks_into_ask() {
        let slides = deck(
            r#"{"game_title": "Echo", "studio_name": "Night Owl", "pitch_slides": {"slide_11_ask": {
                "blocks": [{"type": "stat", "value": "$1.5M", "label": "Seed"}]
            }}}"#,
        );
        let texts = slides[10].texts();
        assert_eq!(texts[0], "Echo");
        assert_eq!(texts[1], "$1.5M - Seed");
        assert_eq!(texts[2], "Night Owl  ·  contact@studio.com");
        assert_eq!(texts[3], "11");
    }

    #[test]
    fn blocks_are_capped_and_laid_out_in_columns() {
        assert_eq!(block_grid(1), (4.4, &[0.4, 5.2][..]));
        assert_eq!(block_grid(3).1.len(), 3);
        assert_eq!(block_grid(6).1.len(), 4);

        let blocks: Vec<ContentBlock> = (1..=6)
            .map(|i| ContentBlock::stat(&format!("{i}"), "label"))
            .collect();
        let slide = content_slide(&PitchConfig::default(), 3, "Stats", &blocks);
        let texts = slide.texts();
        assert!(texts.contains(&"4".to_string()));
        assert!(!texts.contains(&"5".to_string()));
    }

    #[test]
    fn provided_title_overrides_default() {
        let slides = deck(
            r#"{"pitch_slides": {"slide_4_loop": {"title": "How It Plays", "blocks": []}}}"#,
        );
        assert_eq!(slides[3].texts(), vec!["4", "How It Plays"]);
    }
}
