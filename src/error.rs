//! Error types for document generation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort document generation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error("a {product} cannot be written as {format}")]
    UnsupportedFormat { product: String, format: String },

    #[error("{what} is not available. {hint}")]
    MissingDependency { what: String, hint: String },

    #[error("failed to read {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid theme {}: {source}", path.display())]
    Theme {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error(
        "refusing to convert {}: conversion delegates to external office software, \
         pass --trust-docx to confirm the file is trusted",
        .0.display()
    )]
    UntrustedConversion(PathBuf),

    #[error("conversion failed: {0}")]
    Conversion(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(any(feature = "docx", feature = "pptx"))]
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Typst compilation failed: {0}")]
    Typst(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

impl Error {
    #[cfg_attr(
        all(feature = "pdf", feature = "docx", feature = "pptx"),
        allow(dead_code)
    )]
    pub(crate) fn missing_feature(backend: &str, feature: &str) -> Self {
        Error::MissingDependency {
            what: format!("{backend} output"),
            hint: format!("Rebuild with `cargo install gdd --features {feature}`."),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
