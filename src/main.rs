#![forbid(unsafe_code)]
//! # Proximity Analysis CLI
//!
//! Command-line front end for the `proximity_analysis` crate: profile which
//! adjectives tend to appear near a list of target tokens in `.txt` files.
//!
//! ## Example
//! ```bash
//! cargo run --release -- path/to/texts \
//!     --targets characters.txt --lexicon tags.tsv \
//!     --window 10 --export-format csv
//! ```
//!
//! See `--help` for all available options.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process;

use chrono::Local;
use clap::Parser;
use log::{error, info};
use proximity_analysis::{
    AnalysisError, AnalysisOptions, ExportFormat, LexiconTagger, ProximityTable, analyze_files,
    collect_files,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Text file or directory of .txt files to analyze
    path: String,

    /// Path to the target list (.txt, one token per line, order preserved)
    #[arg(long)]
    targets: String,

    /// Path to the POS lexicon (one "token TAG" entry per line)
    #[arg(long)]
    lexicon: String,

    /// Half-width of the scoring window in tokens
    #[arg(long, default_value_t = 10)]
    window: usize,

    /// Optional file of extra exclusion tokens, one per line, added to the
    /// built-in noise list
    #[arg(long)]
    exclude: Option<String>,

    /// Output format for export (csv, tsv, json)
    #[arg(long, default_value = "csv")]
    export_format: ExportFormat,

    /// Output file path; defaults to a timestamped name in the current
    /// directory
    #[arg(long)]
    out: Option<String>,
}

fn read_word_list(path: &str) -> Result<Vec<String>, AnalysisError> {
    let content =
        std::fs::read_to_string(path).map_err(|source| AnalysisError::FileAccess {
            path: PathBuf::from(path),
            source,
        })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect())
}

fn default_out_path(input: &Path, format: ExportFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "corpus".to_string());
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!(
        "{}_{}_proximity.{}",
        stem,
        timestamp,
        format.extension()
    ))
}

fn export(table: &ProximityTable, path: &Path, format: ExportFormat) -> Result<(), AnalysisError> {
    let writer = BufWriter::new(File::create(path)?);
    match format {
        ExportFormat::Csv => table.write_delimited(writer, b',')?,
        ExportFormat::Tsv => table.write_delimited(writer, b'\t')?,
        ExportFormat::Json => table.write_json(writer)?,
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<PathBuf, AnalysisError> {
    let input = Path::new(&cli.path);
    let files = collect_files(input);
    if files.is_empty() {
        return Err(AnalysisError::FileAccess {
            path: input.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no .txt files found at this path",
            ),
        });
    }

    let targets = read_word_list(&cli.targets)?;
    let tagger = LexiconTagger::from_path(&cli.lexicon)?;

    let mut options = AnalysisOptions {
        window: cli.window,
        ..AnalysisOptions::default()
    };
    if let Some(exclude) = &cli.exclude {
        options.exclusion_extras.extend(read_word_list(exclude)?);
    }

    let table = analyze_files(&files, &targets, &tagger, &options)?;
    info!(
        "finalized table: {} targets, {} neighbor columns",
        table.targets.len(),
        table.neighbors.len()
    );

    let out_path = cli
        .out
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_out_path(input, cli.export_format));
    export(&table, &out_path, cli.export_format)?;
    Ok(out_path)
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(out_path) => {
            println!("Results written to {}", out_path.display());
        }
        Err(e) => {
            error!("Error: {}", e);
            process::exit(1);
        }
    }
}
