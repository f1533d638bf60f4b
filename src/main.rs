use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use gdd::content::load_json;
use gdd::{
    AssembleOptions, Config, Error, Format, GameData, Metadata, OnePager, PitchData,
    SectionRegistry,
};

#[derive(Parser)]
#[command(name = "gdd")]
#[command(about = "Generate a game design document, one-pager or pitch deck")]
struct Cli {
    /// Game title (quick template generation without a content file)
    #[arg(long)]
    title: Option<String>,

    #[arg(long, default_value = "Studio Name")]
    studio: String,

    #[arg(long, default_value = "Genre TBD")]
    genre: String,

    #[arg(long, default_value = "Platform TBD")]
    platform: String,

    #[arg(long, default_value = "Audience TBD")]
    audience: String,

    /// Defaults to "A new <genre> experience"
    #[arg(long)]
    tagline: Option<String>,

    /// Document version shown on the cover and in headers
    #[arg(long, default_value = "v0.1")]
    version: String,

    /// JSON file with metadata and section content
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// docx, pdf, pptx or typst (defaults to the output file extension)
    #[arg(short, long)]
    format: Option<Format>,

    /// TOML theme overriding fonts, colors and spacing
    #[arg(long)]
    theme: Option<PathBuf>,

    #[arg(long)]
    no_toc: bool,

    /// Leave out sections that have no content instead of templating them
    #[arg(long)]
    no_placeholders: bool,

    #[arg(long)]
    no_version_history: bool,

    /// Drop sections that do not apply to the genre
    #[arg(long)]
    adapt_to_genre: bool,

    /// Print the section outline and exit
    #[arg(long)]
    list_sections: bool,

    /// Generate the single-page concept sheet (PDF) instead of the GDD
    #[arg(long, conflicts_with = "pitch_deck")]
    one_pager: bool,

    /// Generate the eleven-slide pitch deck (PPTX) instead of the GDD
    #[arg(long)]
    pitch_deck: bool,

    /// Convert an existing DOCX to PDF with LibreOffice instead of generating
    #[arg(long)]
    docx: Option<PathBuf>,

    /// Confirm the DOCX passed with --docx is trusted
    #[arg(long)]
    trust_docx: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> gdd::Result<()> {
    let registry = SectionRegistry::standard();

    if cli.list_sections {
        println!("{}", registry.outline());
        return Ok(());
    }

    if let Some(input) = &cli.docx {
        let output = cli.output.clone().unwrap_or_else(|| input.with_extension("pdf"));
        let written = gdd::convert::docx_to_pdf(input, &output, cli.trust_docx)?;
        println!("Created {}", written.display());
        return Ok(());
    }

    let config = match &cli.theme {
        Some(path) => Config::load(path)?,
        None => Config::shipped_default()?,
    };

    if cli.one_pager {
        let sheet = match &cli.config {
            Some(path) => load_json(path)?,
            None => OnePager::new(metadata_from_flags(&cli)?),
        };
        let output = output_path(&cli, &sheet.meta.game_title, "OnePager.pdf");
        let format = output_format(&cli, &output, Format::Pdf);
        let bytes = gdd::generate_one_pager(&sheet, &config, format)?;
        return write(&output, &bytes);
    }

    if cli.pitch_deck {
        let deck = match &cli.config {
            Some(path) => load_json(path)?,
            None => PitchData::new(metadata_from_flags(&cli)?),
        };
        let output = output_path(&cli, &deck.meta.game_title, "Pitch.pptx");
        let format = output_format(&cli, &output, Format::Pptx);
        let bytes = gdd::generate_pitch_deck(&deck, &config, format)?;
        return write(&output, &bytes);
    }

    let data = load_data(&cli)?;
    let output = output_path(&cli, &data.meta.game_title, "GDD.docx");
    let format = output_format(&cli, &output, Format::Docx);

    let options = AssembleOptions {
        include_toc: !cli.no_toc,
        placeholders: !cli.no_placeholders,
        version_history: !cli.no_version_history,
        adapt_to_genre: cli.adapt_to_genre,
        ..AssembleOptions::default()
    };

    let bytes = gdd::generate(&data, &config, &registry, &options, format)?;
    write(&output, &bytes)
}

fn write(output: &Path, bytes: &[u8]) -> gdd::Result<()> {
    gdd::write_output(output, bytes)?;
    println!("Created {}", output.display());
    Ok(())
}

/// Content from `--config`, or a template built from the metadata flags.
fn load_data(cli: &Cli) -> gdd::Result<GameData> {
    if let Some(path) = &cli.config {
        return GameData::load(path);
    }
    Ok(GameData {
        meta: metadata_from_flags(cli)?,
        ..GameData::default()
    })
}

/// Metadata for template generation. A title is required so an empty
/// invocation does not silently write an untitled document.
fn metadata_from_flags(cli: &Cli) -> gdd::Result<Metadata> {
    let Some(title) = &cli.title else {
        return Err(Error::Usage(
            "Provide either --title or --config (see --help)".to_string(),
        ));
    };
    Ok(Metadata {
        game_title: title.clone(),
        studio_name: cli.studio.clone(),
        genre: cli.genre.clone(),
        platform: cli.platform.clone(),
        audience: cli.audience.clone(),
        version: cli.version.clone(),
        tagline: cli
            .tagline
            .clone()
            .unwrap_or_else(|| format!("A new {} experience", cli.genre)),
        ..Metadata::default()
    })
}

fn output_path(cli: &Cli, title: &str, suffix: &str) -> PathBuf {
    cli.output
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_file_name(title, suffix)))
}

fn output_format(cli: &Cli, output: &Path, fallback: Format) -> Format {
    cli.format
        .or_else(|| Format::from_path(output))
        .unwrap_or(fallback)
}

fn default_file_name(title: &str, suffix: &str) -> String {
    let stem: String = title.chars().filter(|c| !c.is_whitespace()).collect();
    format!("{stem}_{suffix}")
}
