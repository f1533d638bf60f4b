use std::fs;

/// Sections the theme loader knows. Keys inside them are checked by type:
/// `[colors]` and the pitch palette hold `#rrggbb` strings, fonts hold
/// strings, and everything else is a number.
const SECTIONS: [&str; 6] = ["page", "font", "colors", "spacing", "toc", "pitch"];

fn main() {
    // The shipped default theme must stay a loadable theme
    let theme_path = "themes/default.toml";
    println!("cargo:rerun-if-changed={theme_path}");

    let content = fs::read_to_string(theme_path).expect("Failed to read themes/default.toml");

    let theme = match content.parse::<toml::Table>() {
        Ok(theme) => theme,
        Err(e) => panic!("Invalid themes/default.toml: {e}"),
    };

    for (section, value) in &theme {
        if !SECTIONS.contains(&section.as_str()) {
            panic!("Unknown section [{section}] in themes/default.toml");
        }
        let Some(table) = value.as_table() else {
            panic!("[{section}] in themes/default.toml must be a table");
        };
        for (key, value) in table {
            check_key(section, key, value);
        }
    }

    for section in SECTIONS {
        if !theme.contains_key(section) {
            panic!("themes/default.toml is missing [{section}]");
        }
    }
}

fn check_key(section: &str, key: &str, value: &toml::Value) {
    let place = format!("{section}.{key} in themes/default.toml");
    let is_color = section == "colors"
        || (section == "pitch"
            && ["bg_", "text_", "accent_"]
                .iter()
                .any(|prefix| key.starts_with(prefix)));
    let is_font = (section == "font" && !key.ends_with("_size")) || key.ends_with("_font");

    if is_color {
        let Some(color) = value.as_str() else {
            panic!("{place} must be a color string");
        };
        let hex = color.strip_prefix('#').unwrap_or("");
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            panic!("{place} must be #rrggbb, got {color:?}");
        }
    } else if is_font {
        if value.as_str().is_none_or(|font| font.trim().is_empty()) {
            panic!("{place} must name a font");
        }
    } else if section == "toc" {
        match value.as_integer() {
            Some(depth) if (1..=4).contains(&depth) => {}
            _ => panic!("{place} must be an integer from 1 to 4"),
        }
    } else {
        match value.as_float() {
            Some(n) if n > 0.0 => {}
            _ => panic!("{place} must be a positive number with a decimal point"),
        }
    }
}
