//! Post-processing of the raw score matrix and tabular export.

use std::io::Write;

use ndarray::Array2;
use serde::Serialize;

use crate::scorer::ScoreMatrix;
use crate::{AnalysisError, csv_safe_cell};

/// The finalized proximity table: all-zero columns pruned, remaining columns
/// ordered by total score descending, each row divided by its target's
/// occurrence count.
#[derive(Debug, Clone)]
pub struct ProximityTable {
    pub targets: Vec<String>,
    pub neighbors: Vec<String>,
    pub values: Array2<f64>,
    pub occurrences: Vec<usize>,
}

/// One exported row, kept in column order.
#[derive(Serialize)]
struct JsonRow<'a> {
    target: &'a str,
    occurrences: usize,
    scores: Vec<JsonCell<'a>>,
}

#[derive(Serialize)]
struct JsonCell<'a> {
    neighbor: &'a str,
    score: f64,
}

/// Prune, reorder, and normalize a raw [`ScoreMatrix`].
///
/// Columns that are zero for every target are dropped. The survivors are
/// sorted by their total score, descending; the sort is stable, so ties keep
/// their discovery order. Each row is then divided by its target's occurrence
/// count. A target that never occurred has an all-zero row by construction
/// and is left untouched rather than divided by zero.
pub fn finalize(raw: ScoreMatrix) -> ProximityTable {
    let totals: Vec<f64> = (0..raw.neighbors.len())
        .map(|col| raw.scores.column(col).sum())
        .collect();

    let mut kept: Vec<usize> = (0..raw.neighbors.len())
        .filter(|&col| raw.scores.column(col).iter().any(|v| *v != 0.0))
        .collect();
    kept.sort_by(|&a, &b| totals[b].total_cmp(&totals[a]));

    let mut values = Array2::<f64>::zeros((raw.targets.len(), kept.len()));
    for (out_col, &col) in kept.iter().enumerate() {
        for row in 0..raw.targets.len() {
            values[[row, out_col]] = raw.scores[[row, col]];
        }
    }

    for (row, &count) in raw.occurrences.iter().enumerate() {
        if count > 0 {
            let divisor = count as f64;
            values.row_mut(row).mapv_inplace(|v| v / divisor);
        }
    }

    let neighbors = kept
        .into_iter()
        .map(|col| raw.neighbors[col].clone())
        .collect();

    ProximityTable {
        targets: raw.targets,
        neighbors,
        values,
        occurrences: raw.occurrences,
    }
}

impl ProximityTable {
    /// Write the table as delimited text: a header row of `target` plus the
    /// neighbor columns, then one row per target in input order.
    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: u8) -> Result<(), AnalysisError> {
        let mut out = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);

        let mut header = vec!["target".to_string()];
        header.extend(self.neighbors.iter().map(|n| csv_safe_cell(n)));
        out.write_record(&header)?;

        for (row, target) in self.targets.iter().enumerate() {
            let mut record = vec![csv_safe_cell(target)];
            record.extend(self.values.row(row).iter().map(|v| v.to_string()));
            out.write_record(&record)?;
        }
        out.flush().map_err(AnalysisError::Io)?;
        Ok(())
    }

    /// Write the table as a JSON array of rows, preserving row and column
    /// order and carrying the occurrence counts alongside the scores.
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<(), AnalysisError> {
        let rows: Vec<JsonRow<'_>> = self
            .targets
            .iter()
            .enumerate()
            .map(|(row, target)| JsonRow {
                target,
                occurrences: self.occurrences[row],
                scores: self
                    .neighbors
                    .iter()
                    .enumerate()
                    .map(|(col, neighbor)| JsonCell {
                        neighbor,
                        score: self.values[[row, col]],
                    })
                    .collect(),
            })
            .collect();
        serde_json::to_writer_pretty(&mut writer, &rows)?;
        writer.write_all(b"\n").map_err(AnalysisError::Io)?;
        Ok(())
    }

    /// Column totals after normalization, in column order. Mostly useful for
    /// asserting the descending-order invariant.
    pub fn column_totals(&self) -> Vec<f64> {
        (0..self.neighbors.len())
            .map(|col| self.values.column(col).sum())
            .collect()
    }
}
