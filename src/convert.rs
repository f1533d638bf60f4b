//! DOCX to PDF through an installed LibreOffice.
//!
//! The office suite parses the input with full privileges (macros, embedded
//! objects), so conversion only runs when the caller vouches for the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

const EXECUTABLES: [&str; 2] = ["soffice", "libreoffice"];

fn find_office() -> Result<PathBuf> {
    EXECUTABLES
        .iter()
        .find_map(|name| which::which(name).ok())
        .ok_or_else(|| Error::MissingDependency {
            what: "LibreOffice".to_string(),
            hint: "Install LibreOffice and make sure `soffice` is on PATH.".to_string(),
        })
}

/// Convert `input` to a PDF at `output`.
///
/// Fails with [`Error::UntrustedConversion`] unless `trusted` is set.
pub fn docx_to_pdf(input: &Path, output: &Path, trusted: bool) -> Result<PathBuf> {
    if !trusted {
        return Err(Error::UntrustedConversion(input.to_path_buf()));
    }
    if !input.is_file() {
        return Err(Error::MissingInput(input.to_path_buf()));
    }

    let office = find_office()?;
    let outdir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&outdir)?;

    log::info!("converting {} with {}", input.display(), office.display());
    let result = Command::new(&office)
        .arg("--headless")
        .args(["--convert-to", "pdf", "--outdir"])
        .arg(&outdir)
        .arg(input)
        .output()?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(Error::Conversion(format!(
            "{} exited with {}: {}",
            office.display(),
            result.status,
            stderr.trim()
        )));
    }

    let stem = input
        .file_stem()
        .ok_or_else(|| Error::Conversion(format!("no file name in {}", input.display())))?;
    let produced = outdir.join(format!("{}.pdf", stem.to_string_lossy()));
    if !produced.is_file() {
        return Err(Error::Conversion(format!(
            "expected {} after conversion",
            produced.display()
        )));
    }
    if produced != output {
        fs::rename(&produced, output)?;
    }

    Ok(output.to_path_buf())
}
