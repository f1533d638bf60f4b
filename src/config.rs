use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

const DEFAULT_THEME: &str = include_str!("../themes/default.toml");

/// Visual theme consumed by the renderers. Every field has a default, so a
/// theme file only needs to list what it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub page: PageConfig,
    pub font: FontConfig,
    pub colors: ColorConfig,
    pub spacing: SpacingConfig,
    pub toc: TocConfig,
    pub pitch: PitchConfig,
}

/// Page geometry in millimetres.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin_top: 25.0,
            margin_bottom: 25.0,
            margin_left: 25.0,
            margin_right: 25.0,
        }
    }
}

impl PageConfig {
    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// Lowest y offset content may reach.
    pub fn content_bottom(&self) -> f32 {
        self.height - self.margin_bottom
    }
}

/// Font families and sizes (points). The `*_fallback` families are used by
/// the Typst backend when the primary family is not installed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub heading: String,
    pub body: String,
    pub code: String,
    pub serif_fallback: String,
    pub mono_fallback: String,
    pub h1_size: f32,
    pub h2_size: f32,
    pub h3_size: f32,
    pub h4_size: f32,
    pub body_size: f32,
    pub code_size: f32,
    pub caption_size: f32,
    pub header_size: f32,
    pub cover_title_size: f32,
    pub cover_tagline_size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            heading: "Cambria".to_string(),
            body: "Calibri".to_string(),
            code: "Courier New".to_string(),
            serif_fallback: "Libertinus Serif".to_string(),
            mono_fallback: "DejaVu Sans Mono".to_string(),
            h1_size: 22.0,
            h2_size: 16.0,
            h3_size: 13.0,
            h4_size: 11.0,
            body_size: 10.0,
            code_size: 9.0,
            caption_size: 8.0,
            header_size: 8.0,
            cover_title_size: 32.0,
            cover_tagline_size: 14.0,
        }
    }
}

impl FontConfig {
    /// Font size for a heading level. Levels beyond 4 use the level 4 size.
    pub fn size_for_heading(&self, level: u8) -> f32 {
        match level {
            1 => self.h1_size,
            2 => self.h2_size,
            3 => self.h3_size,
            _ => self.h4_size,
        }
    }
}

/// Colors as `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub heading_1: String,
    pub heading_2: String,
    pub heading_3: String,
    pub heading_4: String,
    pub body: String,
    pub caption: String,
    pub muted: String,
    pub table_header_bg: String,
    pub table_header_text: String,
    pub table_row_alt: String,
    pub table_row_normal: String,
    pub table_border: String,
    pub note_bg: String,
    pub note_border: String,
    pub warn_bg: String,
    pub warn_border: String,
    pub code_bg: String,
    pub cover_accent: String,
    /// Feature stars and the accent rule on the one-pager.
    pub highlight: String,
    pub panel_bg: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            heading_1: "#1a3c5e".to_string(),
            heading_2: "#295985".to_string(),
            heading_3: "#376fa1".to_string(),
            heading_4: "#505050".to_string(),
            body: "#212121".to_string(),
            caption: "#646464".to_string(),
            muted: "#a0a0a0".to_string(),
            table_header_bg: "#1a3c5e".to_string(),
            table_header_text: "#ffffff".to_string(),
            table_row_alt: "#f0f5fa".to_string(),
            table_row_normal: "#ffffff".to_string(),
            table_border: "#b4c3d2".to_string(),
            note_bg: "#ebf4ff".to_string(),
            note_border: "#295985".to_string(),
            warn_bg: "#fff8dc".to_string(),
            warn_border: "#ffa000".to_string(),
            code_bg: "#f0f0f0".to_string(),
            cover_accent: "#295985".to_string(),
            highlight: "#c89628".to_string(),
            panel_bg: "#ebf2ff".to_string(),
        }
    }
}

impl ColorConfig {
    pub fn heading(&self, level: u8) -> &str {
        match level {
            1 => &self.heading_1,
            2 => &self.heading_2,
            3 => &self.heading_3,
            _ => &self.heading_4,
        }
    }
}

/// Bare uppercase hex digits (`1A3C5E`) as WordprocessingML expects them.
pub fn hex_digits(color: &str) -> String {
    color.trim_start_matches('#').to_ascii_uppercase()
}

/// Vertical metrics in millimetres used by the layout cursor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpacingConfig {
    pub line_body: f32,
    pub line_h1: f32,
    pub line_h2: f32,
    pub line_h3: f32,
    pub line_h4: f32,
    pub paragraph: f32,
    pub section: f32,
    pub table_header_row: f32,
    pub table_row: f32,
    pub callout_line: f32,
    pub bullet_indent: f32,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            line_body: 6.0,
            line_h1: 12.0,
            line_h2: 10.0,
            line_h3: 8.0,
            line_h4: 7.0,
            paragraph: 4.0,
            section: 8.0,
            table_header_row: 7.0,
            table_row: 6.0,
            callout_line: 5.0,
            bullet_indent: 5.0,
        }
    }
}

impl SpacingConfig {
    pub fn line_for_heading(&self, level: u8) -> f32 {
        match level {
            1 => self.line_h1,
            2 => self.line_h2,
            3 => self.line_h3,
            _ => self.line_h4,
        }
    }

    /// Gap above and below a heading of the given level.
    pub fn heading_gaps(&self, level: u8) -> (f32, f32) {
        match level {
            1 => (self.section, self.paragraph),
            2 => (self.paragraph, 2.0),
            _ => (2.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    /// Deepest heading level recorded in the table of contents.
    pub depth: u8,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self { depth: 2 }
    }
}

/// Pitch deck palette and geometry. Slide sizes are in inches, 16:9 by
/// default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    pub bg_dark: String,
    pub bg_slide: String,
    pub bg_card: String,
    pub text_primary: String,
    pub text_secondary: String,
    pub accent_gold: String,
    pub accent_blue: String,
    pub accent_green: String,
    pub accent_red: String,
    pub heading_font: String,
    pub body_font: String,
    pub slide_width: f32,
    pub slide_height: f32,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            bg_dark: "#0f172a".to_string(),
            bg_slide: "#162139".to_string(),
            bg_card: "#1e2d4e".to_string(),
            text_primary: "#f0f4ff".to_string(),
            text_secondary: "#a0b9d7".to_string(),
            accent_gold: "#e8b84b".to_string(),
            accent_blue: "#4299e1".to_string(),
            accent_green: "#48bb78".to_string(),
            accent_red: "#f56565".to_string(),
            heading_font: "Calibri".to_string(),
            body_font: "Calibri".to_string(),
            slide_width: 10.0,
            slide_height: 5.625,
        }
    }
}

impl Config {
    /// The theme shipped in `themes/default.toml`, embedded at compile time.
    pub fn shipped_default() -> Result<Self> {
        toml::from_str(DEFAULT_THEME).map_err(|source| Error::Theme {
            path: "themes/default.toml".into(),
            source,
        })
    }

    /// Load a theme from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::Theme {
            path: path.to_path_buf(),
            source,
        })
    }
}
