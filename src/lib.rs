mod block;
pub mod config;
pub mod content;
pub mod convert;
pub mod docx;
pub mod document;
pub mod error;
pub mod one_pager;
pub mod opc;
mod parser;
pub mod pitch;
pub mod pptx;
pub mod registry;
pub mod render;
mod typst;
pub mod validate;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use block::{Block, CalloutKind};
pub use config::Config;
pub use content::{GameData, Metadata, SectionContent};
pub use docx::DocxBackend;
pub use document::{AssembleOptions, assemble};
pub use error::{Error, Result};
pub use one_pager::OnePager;
pub use pitch::PitchData;
pub use registry::SectionRegistry;
pub use render::{Backend, Feature, Flow, TocEntry};
pub use typst::TypstBackend;

/// Scan a content string into blocks.
pub fn parse(content: &str) -> Vec<Block> {
    parser::parse(content)
}

/// Output format of a generated document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Docx,
    Pdf,
    /// PowerPoint, for pitch decks.
    Pptx,
    /// Typst source, the intermediate form of the PDF output.
    Typst,
}

impl Format {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        ext.parse().ok()
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "docx" => Ok(Format::Docx),
            "pdf" => Ok(Format::Pdf),
            "pptx" => Ok(Format::Pptx),
            "typst" | "typ" => Ok(Format::Typst),
            other => Err(format!("unknown format '{other}' (expected docx, pdf, pptx or typst)")),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Docx => "docx",
            Format::Pdf => "pdf",
            Format::Pptx => "pptx",
            Format::Typst => "typst",
        })
    }
}

/// Lay out the whole document as Typst markup.
pub fn to_typst(
    data: &GameData,
    config: &Config,
    registry: &SectionRegistry,
    options: &AssembleOptions,
) -> Result<String> {
    let mut flow = Flow::new(TypstBackend::new(config, &data.meta), config);
    assemble(&mut flow, data, registry, options)?;
    log::info!("laid out {} pages", flow.cursor().page);
    let (backend, _) = flow.into_parts();
    Ok(backend.into_markup())
}

/// Compile Typst markup to PDF bytes.
#[cfg(feature = "pdf")]
pub fn compile_pdf(markup: String) -> Result<Vec<u8>> {
    use typst_as_lib::TypstEngine;
    use typst_as_lib::typst_kit_options::TypstKitFontOptions;
    use typst_library::layout::PagedDocument;
    use typst_pdf::PdfOptions;

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(true);

    let engine = TypstEngine::builder()
        .main_file(markup)
        .search_fonts_with(font_options)
        .build();

    let doc: PagedDocument = engine
        .compile()
        .output
        .map_err(|e| Error::Typst(format!("{e:?}")))?;

    typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| Error::Pdf(format!("{e:?}")))
}

#[cfg(not(feature = "pdf"))]
pub fn compile_pdf(_markup: String) -> Result<Vec<u8>> {
    Err(Error::missing_feature("PDF", "pdf"))
}

pub fn to_pdf(
    data: &GameData,
    config: &Config,
    registry: &SectionRegistry,
    options: &AssembleOptions,
) -> Result<Vec<u8>> {
    let markup = to_typst(data, config, registry, options)?;
    compile_pdf(markup)
}

pub fn to_docx(
    data: &GameData,
    config: &Config,
    registry: &SectionRegistry,
    options: &AssembleOptions,
) -> Result<Vec<u8>> {
    let mut flow = Flow::new(DocxBackend::new(config), config);
    assemble(&mut flow, data, registry, options)?;
    let (backend, _) = flow.into_parts();
    package_docx(backend, &data.meta)
}

#[cfg(feature = "docx")]
fn package_docx(backend: DocxBackend<'_>, meta: &Metadata) -> Result<Vec<u8>> {
    backend.into_bytes(meta)
}

#[cfg(not(feature = "docx"))]
fn package_docx(_backend: DocxBackend<'_>, _meta: &Metadata) -> Result<Vec<u8>> {
    Err(Error::missing_feature("DOCX", "docx"))
}

/// Validate the content, then render it in `format`. Content warnings are
/// logged and never stop generation.
pub fn generate(
    data: &GameData,
    config: &Config,
    registry: &SectionRegistry,
    options: &AssembleOptions,
    format: Format,
) -> Result<Vec<u8>> {
    for warning in validate::check_all(registry, &data.sections) {
        log::warn!("{warning}");
    }

    match format {
        Format::Docx => to_docx(data, config, registry, options),
        Format::Pdf => to_pdf(data, config, registry, options),
        Format::Typst => to_typst(data, config, registry, options).map(String::into_bytes),
        Format::Pptx => Err(unsupported("game design document", format)),
    }
}

fn unsupported(product: &str, format: Format) -> Error {
    Error::UnsupportedFormat {
        product: product.to_string(),
        format: format.to_string(),
    }
}

/// Lay out the one-pager as Typst markup.
pub fn one_pager_typst(sheet: &OnePager, config: &Config) -> String {
    one_pager::to_typst(sheet, config)
}

/// Render the one-pager as PDF or Typst source.
pub fn generate_one_pager(sheet: &OnePager, config: &Config, format: Format) -> Result<Vec<u8>> {
    let markup = one_pager_typst(sheet, config);
    match format {
        Format::Pdf => compile_pdf(markup),
        Format::Typst => Ok(markup.into_bytes()),
        Format::Docx | Format::Pptx => Err(unsupported("one-pager", format)),
    }
}

/// Lay out and package the pitch deck as PPTX bytes.
pub fn to_pptx(data: &PitchData, config: &Config) -> Result<Vec<u8>> {
    let slides = pptx::build_deck(data, config);
    log::info!("laid out {} slides", slides.len());
    package_pptx(&slides, data, config)
}

#[cfg(feature = "pptx")]
fn package_pptx(
    slides: &[pptx::slide::Slide],
    data: &PitchData,
    config: &Config,
) -> Result<Vec<u8>> {
    pptx::write_deck(slides, data, config)
}

#[cfg(not(feature = "pptx"))]
fn package_pptx(
    _slides: &[pptx::slide::Slide],
    _data: &PitchData,
    _config: &Config,
) -> Result<Vec<u8>> {
    Err(Error::missing_feature("PPTX", "pptx"))
}

/// Render the pitch deck. Only PPTX is supported.
pub fn generate_pitch_deck(data: &PitchData, config: &Config, format: Format) -> Result<Vec<u8>> {
    match format {
        Format::Pptx => to_pptx(data, config),
        other => Err(unsupported("pitch deck", other)),
    }
}

/// Write `bytes` to `path`, creating missing parent directories.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}
