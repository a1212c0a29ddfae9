#![forbid(unsafe_code)]
//! # Proximity Analysis
//!
//! Computes, for a fixed ordered set of target tokens (typically character
//! names), a weighted profile of the adjectives that appear near each
//! target's mentions in a plain-text corpus.
//!
//! The pipeline is a one-shot batch:
//!
//! 1. [`corpus::load_corpus`] concatenates the input files and normalizes
//!    them into a flat token sequence.
//! 2. A [`PosTagger`] collaborator annotates every token with a
//!    part-of-speech tag.
//! 3. [`scorer::score`] accumulates a target × adjective matrix, weighting
//!    each in-window neighbor by quadratically decaying token distance.
//! 4. [`table::finalize`] prunes dead columns, orders the rest by total
//!    score, and normalizes each row by the target's occurrence count.
//!
//! The result is a [`ProximityTable`] exportable as CSV, TSV, or JSON.
//!
//! ## Example
//! ```
//! use std::collections::HashMap;
//! use proximity_analysis::{AnalysisOptions, LexiconTagger, PosTag, analyze_text};
//!
//! let mut lexicon = HashMap::new();
//! lexicon.insert("brave".to_string(), PosTag::Jj);
//! let tagger = LexiconTagger::new(lexicon);
//!
//! let opts = AnalysisOptions::default();
//! let table = analyze_text("frodo was brave", &["frodo".to_string()], &tagger, &opts).unwrap();
//! assert_eq!(table.neighbors, vec!["brave".to_string()]);
//! ```

pub mod corpus;
pub mod scorer;
pub mod table;
pub mod tagger;

use std::collections::HashSet;
use std::error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::info;
use walkdir::WalkDir;

pub use scorer::{DEFAULT_EXCLUSIONS, ScoreMatrix, clamp_window, score, weight};
pub use table::{ProximityTable, finalize};
pub use tagger::{LexiconTagger, PosTag, PosTagger, TaggedToken};

/// Errors produced anywhere in the pipeline. The pipeline is a deterministic
/// batch job: every error is terminal for the run, nothing is retried.
#[derive(Debug)]
pub enum AnalysisError {
    /// An input file was missing or unreadable; no partial corpus is built.
    FileAccess { path: PathBuf, source: io::Error },
    /// Output or other I/O failure.
    Io(io::Error),
    /// Delimited export failure.
    Csv(csv::Error),
    /// JSON export failure.
    Json(serde_json::Error),
    /// Failure reported by the tagging collaborator, propagated unchanged.
    Tagger(String),
    /// The scoring window must be at least 1.
    InvalidWindow,
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::FileAccess { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            AnalysisError::Io(err) => write!(f, "i/o error: {}", err),
            AnalysisError::Csv(err) => write!(f, "csv export error: {}", err),
            AnalysisError::Json(err) => write!(f, "json export error: {}", err),
            AnalysisError::Tagger(msg) => write!(f, "tagger error: {}", msg),
            AnalysisError::InvalidWindow => write!(f, "window must be at least 1"),
        }
    }
}

impl error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            AnalysisError::FileAccess { source, .. } => Some(source),
            AnalysisError::Io(err) => Some(err),
            AnalysisError::Csv(err) => Some(err),
            AnalysisError::Json(err) => Some(err),
            AnalysisError::Tagger(_) | AnalysisError::InvalidWindow => None,
        }
    }
}

impl From<io::Error> for AnalysisError {
    fn from(err: io::Error) -> Self {
        AnalysisError::Io(err)
    }
}

impl From<csv::Error> for AnalysisError {
    fn from(err: csv::Error) -> Self {
        AnalysisError::Csv(err)
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::Json(err)
    }
}

/// Output format for the exported table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }
}

/// Tunable knobs for a run.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Half-width of the scoring neighborhood, in tokens.
    pub window: usize,
    /// Noise tokens excluded from scoring on top of the targets themselves.
    /// Defaults to [`DEFAULT_EXCLUSIONS`].
    pub exclusion_extras: HashSet<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            window: 10,
            exclusion_extras: DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Run the full pipeline over the given files.
///
/// Files are read and concatenated in the order given. Targets keep their
/// input order as the row order of the result.
pub fn analyze_files<T: PosTagger, P: AsRef<Path>>(
    paths: &[P],
    targets: &[String],
    tagger: &T,
    options: &AnalysisOptions,
) -> Result<ProximityTable, AnalysisError> {
    if options.window == 0 {
        return Err(AnalysisError::InvalidWindow);
    }
    let tokens = corpus::load_corpus(paths)?;
    analyze_tokens(tokens, targets, tagger, options)
}

/// Run the pipeline over an in-memory text instead of files. Useful for
/// library callers and tests; behavior is otherwise identical to
/// [`analyze_files`].
pub fn analyze_text<T: PosTagger>(
    text: &str,
    targets: &[String],
    tagger: &T,
    options: &AnalysisOptions,
) -> Result<ProximityTable, AnalysisError> {
    if options.window == 0 {
        return Err(AnalysisError::InvalidWindow);
    }
    analyze_tokens(corpus::normalize(text), targets, tagger, options)
}

fn analyze_tokens<T: PosTagger>(
    tokens: Vec<String>,
    targets: &[String],
    tagger: &T,
    options: &AnalysisOptions,
) -> Result<ProximityTable, AnalysisError> {
    let tagged = tagger.tag(&tokens)?;
    let matrix = score(&tagged, targets, options.window, &options.exclusion_extras);
    info!(
        "scored {} targets against {} candidate neighbors",
        matrix.targets.len(),
        matrix.neighbors.len()
    );
    Ok(finalize(matrix))
}

/// Collect the `.txt` files to analyze. A file path is returned as-is; a
/// directory is walked recursively and its `.txt` files are returned in
/// lexicographic order so repeated runs see the same corpus order.
pub fn collect_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .map(|ext| ext.eq_ignore_ascii_case("txt"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

/// Guard a cell against spreadsheet formula injection before it lands in a
/// delimited export.
pub fn csv_safe_cell(cell: &str) -> String {
    if cell.starts_with(['=', '+', '-', '@']) {
        format!("'{}", cell)
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn toy_tagger() -> LexiconTagger {
        let mut lexicon = HashMap::new();
        for adjective in ["brave", "small", "loyal", "old"] {
            lexicon.insert(adjective.to_string(), PosTag::Jj);
        }
        LexiconTagger::new(lexicon)
    }

    #[test]
    fn zero_window_is_rejected() {
        let opts = AnalysisOptions {
            window: 0,
            ..AnalysisOptions::default()
        };
        let err = analyze_text("frodo was brave", &["frodo".to_string()], &toy_tagger(), &opts)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidWindow));
    }

    #[test]
    fn empty_target_set_yields_empty_table() {
        let table =
            analyze_text("frodo was brave", &[], &toy_tagger(), &AnalysisOptions::default())
                .unwrap();
        assert!(table.targets.is_empty());
        assert!(table.neighbors.is_empty());
    }

    #[test]
    fn default_exclusions_contain_the_separated_pair() {
        // "cant" and "oh" are distinct entries, not one fused token.
        assert!(DEFAULT_EXCLUSIONS.contains(&"cant"));
        assert!(DEFAULT_EXCLUSIONS.contains(&"oh"));
        assert!(!DEFAULT_EXCLUSIONS.contains(&"cantoh"));
    }

    #[test]
    fn csv_safe_cell_prefixes_formula_starters() {
        assert_eq!(csv_safe_cell("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(csv_safe_cell("frodo"), "frodo");
    }

    #[test]
    fn missing_file_fails_fast() {
        let err = analyze_files(
            &[PathBuf::from("definitely_not_here.txt")],
            &["frodo".to_string()],
            &toy_tagger(),
            &AnalysisOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::FileAccess { .. }));
    }
}
