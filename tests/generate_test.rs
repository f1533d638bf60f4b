use std::fs::File;
use std::io::Read;

use gdd::{AssembleOptions, Config, Format, GameData, OnePager, PitchData, SectionRegistry};
use zip::ZipArchive;

const SAMPLE: &str = r#"{
    "game_title": "Echo Chamber",
    "studio_name": "Night Owl Games",
    "genre": "Puzzle platformer",
    "date": "March 2025",
    "sections": {
        "executive_summary": "Sound becomes light.\n- Echo pulses reveal the level\n- Silence hides enemies",
        "game_mechanics": {
            "content": "Core verbs:",
            "subsections": [
                {
                    "title": "Echo Pulse",
                    "content": "| Input | Effect |\n|---|---|\n| Tap | Short pulse |\n| Hold | Long pulse |"
                }
            ]
        },
        "not_a_section": "ignored"
    }
}"#;

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(std::io::Cursor::new(bytes)).expect("Failed to open archive");
    let mut part = archive.by_name(name).expect("Missing part");
    let mut xml = String::new();
    part.read_to_string(&mut xml).expect("Part is not UTF-8");
    xml
}

#[test]
fn test_docx_package_contents() {
    let data = GameData::from_json(SAMPLE).expect("Failed to parse sample");
    let bytes = gdd::to_docx(
        &data,
        &Config::default(),
        &SectionRegistry::standard(),
        &AssembleOptions::default(),
    )
    .expect("Failed to build DOCX");

    let document = read_part(&bytes, "word/document.xml");

    // Every registry section gets a heading, templated or not
    assert!(document.contains("2. Executive Summary"));
    assert!(document.contains("5. Game Mechanics"));
    assert!(document.contains("8. Narrative &amp; World"));
    assert!(document.contains("19. Appendices"));
    assert!(document.contains("Echo Pulse"));

    // Word builds the table of contents from a field
    assert!(document.contains("TOC \\o"));
    assert!(document.contains("<w:tblHeader/>"));
    assert!(!document.contains("not_a_section"));
    assert!(!document.contains("ignored"));

    let styles = read_part(&bytes, "word/styles.xml");
    assert!(styles.contains("w:styleId=\"Heading1\""));

    let footer = read_part(&bytes, "word/footer1.xml");
    assert!(footer.contains("NUMPAGES"));
}

#[test]
fn test_docx_without_placeholders() {
    let data = GameData::from_json(SAMPLE).expect("Failed to parse sample");
    let options = AssembleOptions {
        placeholders: false,
        include_toc: false,
        ..AssembleOptions::default()
    };
    let bytes = gdd::to_docx(&data, &Config::default(), &SectionRegistry::standard(), &options)
        .expect("Failed to build DOCX");

    let document = read_part(&bytes, "word/document.xml");
    assert!(document.contains("2. Executive Summary"));
    assert!(!document.contains("19. Appendices"));
    assert!(!document.contains("TOC \\o"));
}

#[test]
fn test_typst_output() {
    let data = GameData::from_json(SAMPLE).expect("Failed to parse sample");
    let bytes = gdd::generate(
        &data,
        &Config::default(),
        &SectionRegistry::standard(),
        &AssembleOptions::default(),
        Format::Typst,
    )
    .expect("Failed to lay out Typst");
    let markup = String::from_utf8(bytes).expect("Typst output is not UTF-8");

    assert!(markup.starts_with("#set page("));
    assert!(markup.contains("#heading(level: 1, \"5. Game Mechanics\")"));
    assert!(markup.contains("#heading(level: 2, \"Echo Pulse\")"));
    assert!(markup.contains("table.header("));
    // Entries are appended after the last section
    let toc = markup.rfind("\"Table of Contents\"").expect("No table of contents");
    assert!(toc > markup.find("19. Appendices").expect("No appendices"));
}

#[cfg(feature = "pdf")]
#[test]
fn test_pdf_output() {
    let data = GameData::from_json(SAMPLE).expect("Failed to parse sample");
    let bytes = gdd::generate(
        &data,
        &Config::default(),
        &SectionRegistry::standard(),
        &AssembleOptions::default(),
        Format::Pdf,
    )
    .expect("Failed to compile PDF");

    assert!(bytes.starts_with(b"%PDF"));
}

#[cfg(feature = "pdf")]
#[test]
fn test_one_pager_pdf() {
    let sheet: OnePager = serde_json::from_str(SAMPLE).expect("Failed to parse sample");
    assert_eq!(sheet.meta.game_title, "Echo Chamber");

    let bytes = gdd::generate_one_pager(&sheet, &Config::default(), Format::Pdf)
        .expect("Failed to compile one-pager");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_pitch_deck_package() {
    let deck: PitchData = serde_json::from_str(SAMPLE).expect("Failed to parse sample");
    let bytes = gdd::generate_pitch_deck(&deck, &Config::default(), Format::Pptx)
        .expect("Failed to build PPTX");

    let archive = ZipArchive::new(std::io::Cursor::new(bytes.as_slice()))
        .expect("Failed to open PPTX");
    let slides = archive
        .file_names()
        .filter(|name| name.starts_with("ppt/slides/slide"))
        .count();
    assert_eq!(slides, 11);

    let title = read_part(&bytes, "ppt/slides/slide1.xml");
    assert!(title.contains("<a:t>Echo Chamber</a:t>"));
    assert!(title.contains("Night Owl Games  ·  Puzzle platformer"));

    let core = read_part(&bytes, "docProps/core.xml");
    assert!(core.contains("<dc:title>Echo Chamber - Pitch Deck</dc:title>"));
}

#[test]
fn test_write_and_reload() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let content = dir.path().join("content.json");
    std::fs::write(&content, SAMPLE).expect("Failed to write content");

    let data = GameData::load(&content).expect("Failed to load content");
    assert_eq!(data.meta.game_title, "Echo Chamber");

    let bytes = gdd::generate(
        &data,
        &Config::default(),
        &SectionRegistry::standard(),
        &AssembleOptions::default(),
        Format::Docx,
    )
    .expect("Failed to build DOCX");

    let output = dir.path().join("out/EchoChamber_GDD.docx");
    gdd::write_output(&output, &bytes).expect("Failed to write output");

    let archive = ZipArchive::new(File::open(&output).expect("Output missing"))
        .expect("Output is not a ZIP");
    assert!(archive.file_names().any(|name| name == "[Content_Types].xml"));
}

#[test]
fn test_theme_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let theme = dir.path().join("theme.toml");
    std::fs::write(&theme, "[font]\nbody = \"Georgia\"\n\n[toc]\ndepth = 3\n")
        .expect("Failed to write theme");

    let config = Config::load(&theme).expect("Failed to load theme");
    assert_eq!(config.font.body, "Georgia");
    assert_eq!(config.font.heading, "Cambria");
    assert_eq!(config.toc.depth, 3);

    std::fs::write(&theme, "[font\n").expect("Failed to write theme");
    assert!(matches!(Config::load(&theme), Err(gdd::Error::Theme { .. })));
}
