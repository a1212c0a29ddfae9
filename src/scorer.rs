//! The windowed proximity scorer.
//!
//! For every occurrence of a target token, a symmetric window of neighboring
//! positions is scanned. Adjective-tagged neighbors outside the exclusion set
//! contribute a score that decays quadratically with token distance:
//!
//! ```text
//! weight(d) = ((window - (d - 1)) / window)^2
//! ```
//!
//! which is 1.0 for the adjacent token and reaches 0 at distance
//! `window + 1`, one past the farthest position ever visited. The nominal
//! window size is always used in the formula, even when the window itself is
//! clamped at a corpus boundary.

use std::collections::{HashMap, HashSet};

use ndarray::Array2;

use crate::tagger::TaggedToken;

/// Noise words excluded from scoring on top of the targets themselves:
/// pronouns, contractions left over from apostrophe deletion, and
/// interjections common in the source dialect.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "i", "mr", "ive", "s", "nay", "o", "im", "cant", "oh", "sams", "wont", "yes", "dun",
];

/// Raw accumulation result: one row per target (input order), one column per
/// discovered neighbor adjective (first-seen corpus order), plus per-target
/// occurrence counts.
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    pub targets: Vec<String>,
    pub neighbors: Vec<String>,
    pub scores: Array2<f64>,
    pub occurrences: Vec<usize>,
}

/// Resolve the window around position `i` to valid index bounds, inclusive.
///
/// The left edge clamps to the corpus start and the right edge to the corpus
/// end; the two sides resolve independently, so a position near one boundary
/// gets an asymmetric window. `len` must be non-zero.
pub fn clamp_window(i: usize, len: usize, window: usize) -> (usize, usize) {
    debug_assert!(i < len);
    (i.saturating_sub(window), (i + window).min(len - 1))
}

/// Quadratic decay weight for a neighbor at token distance `distance`
/// (1 = adjacent). Only called for distances within the window.
pub fn weight(window: usize, distance: usize) -> f64 {
    debug_assert!(distance >= 1 && distance <= window);
    let w = window as f64;
    ((w - (distance as f64 - 1.0)) / w).powi(2)
}

/// Accumulate the raw target × neighbor proximity matrix in a single
/// left-to-right pass over the tagged corpus.
///
/// `targets` keeps its input order as the row order; duplicates beyond the
/// first occurrence are ignored. The exclusion set is the union of the
/// targets and `exclusion_extras`. Note the two tiers of filtering: column
/// discovery only removes targets, while scanning also honors the extras, so
/// an adjective listed in the extras keeps an (all-zero) column until
/// post-processing prunes it.
pub fn score(
    corpus: &[TaggedToken],
    targets: &[String],
    window: usize,
    exclusion_extras: &HashSet<String>,
) -> ScoreMatrix {
    debug_assert!(window >= 1);

    let mut target_rows: HashMap<&str, usize> = HashMap::new();
    let mut target_order: Vec<String> = Vec::new();
    for target in targets {
        if !target_rows.contains_key(target.as_str()) {
            target_rows.insert(target.as_str(), target_order.len());
            target_order.push(target.clone());
        }
    }

    // Neighbor columns in first-seen order, so repeated runs agree exactly.
    let mut neighbor_cols: HashMap<&str, usize> = HashMap::new();
    let mut neighbors: Vec<String> = Vec::new();
    for entry in corpus {
        if entry.tag.is_adjective()
            && !target_rows.contains_key(entry.token.as_str())
            && !neighbor_cols.contains_key(entry.token.as_str())
        {
            neighbor_cols.insert(entry.token.as_str(), neighbors.len());
            neighbors.push(entry.token.clone());
        }
    }

    let excluded: HashSet<&str> = target_rows
        .keys()
        .copied()
        .chain(exclusion_extras.iter().map(String::as_str))
        .collect();

    let mut scores = Array2::<f64>::zeros((target_order.len(), neighbors.len()));
    let mut occurrences = vec![0usize; target_order.len()];

    for (i, entry) in corpus.iter().enumerate() {
        let Some(&row) = target_rows.get(entry.token.as_str()) else {
            continue;
        };
        occurrences[row] += 1;

        let (start, end) = clamp_window(i, corpus.len(), window);
        for j in start..=end {
            if j == i {
                continue;
            }
            let neighbor = &corpus[j];
            if !neighbor.tag.is_adjective() || excluded.contains(neighbor.token.as_str()) {
                continue;
            }
            // Non-target adjectives always have a discovered column.
            let col = neighbor_cols[neighbor.token.as_str()];
            scores[[row, col]] += weight(window, i.abs_diff(j));
        }
    }

    ScoreMatrix {
        targets: target_order,
        neighbors,
        scores,
        occurrences,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::PosTag;

    fn tagged(pairs: &[(&str, &str)]) -> Vec<TaggedToken> {
        pairs
            .iter()
            .map(|(token, tag)| TaggedToken::new(*token, PosTag::from_label(tag)))
            .collect()
    }

    #[test]
    fn weight_bounds_and_endpoints() {
        for window in [1usize, 2, 5, 10] {
            for distance in 1..=window {
                let w = weight(window, distance);
                assert!(w > 0.0 && w <= 1.0, "weight({window}, {distance}) = {w}");
            }
            assert_eq!(weight(window, 1), 1.0);
        }
        // One past the window would be exactly zero; the scan never gets there.
        let window = 10usize;
        let w = window as f64;
        assert_eq!(((w - (11.0 - 1.0)) / w).powi(2), 0.0);
    }

    #[test]
    fn weight_decays_quadratically() {
        assert_eq!(weight(10, 1), 1.0);
        assert!((weight(10, 5) - 0.36).abs() < 1e-12);
        assert!((weight(10, 10) - 0.01).abs() < 1e-12);
        for distance in 2..=10 {
            assert!(weight(10, distance) < weight(10, distance - 1));
        }
    }

    #[test]
    fn window_clamps_at_both_ends() {
        assert_eq!(clamp_window(0, 100, 10), (0, 10));
        assert_eq!(clamp_window(3, 100, 10), (0, 13));
        assert_eq!(clamp_window(99, 100, 10), (89, 99));
        assert_eq!(clamp_window(50, 100, 10), (40, 60));
        // Corpus shorter than the full window on either side.
        assert_eq!(clamp_window(1, 3, 10), (0, 2));
    }

    #[test]
    fn first_token_target_scores_forward_only() {
        let corpus = tagged(&[("frodo", "NN"), ("brave", "JJ"), ("small", "JJ")]);
        let targets = vec!["frodo".to_string()];
        let matrix = score(&corpus, &targets, 10, &HashSet::new());

        assert_eq!(matrix.occurrences, vec![1]);
        let brave = matrix.neighbors.iter().position(|n| n == "brave").unwrap();
        let small = matrix.neighbors.iter().position(|n| n == "small").unwrap();
        assert_eq!(matrix.scores[[0, brave]], weight(10, 1));
        assert_eq!(matrix.scores[[0, small]], weight(10, 2));
    }

    #[test]
    fn targets_never_become_neighbors() {
        let corpus = tagged(&[("sam", "JJ"), ("frodo", "NN"), ("brave", "JJ")]);
        let targets = vec!["frodo".to_string(), "sam".to_string()];
        let matrix = score(&corpus, &targets, 5, &HashSet::new());
        assert!(!matrix.neighbors.contains(&"sam".to_string()));
        assert_eq!(matrix.neighbors, vec!["brave".to_string()]);
    }

    #[test]
    fn excluded_adjective_keeps_zero_column() {
        // "old" is adjective-tagged but excluded, so its column is discovered
        // and stays at zero.
        let corpus = tagged(&[("frodo", "NN"), ("old", "JJ"), ("brave", "JJ")]);
        let targets = vec!["frodo".to_string()];
        let extras: HashSet<String> = ["old".to_string()].into();
        let matrix = score(&corpus, &targets, 10, &extras);

        let old = matrix.neighbors.iter().position(|n| n == "old").unwrap();
        let brave = matrix.neighbors.iter().position(|n| n == "brave").unwrap();
        assert_eq!(matrix.scores[[0, old]], 0.0);
        assert!(matrix.scores[[0, brave]] > 0.0);
    }

    #[test]
    fn occurrences_count_every_mention() {
        let corpus = tagged(&[
            ("frodo", "NN"),
            ("brave", "JJ"),
            ("frodo", "NN"),
            ("sam", "NN"),
        ]);
        let targets = vec!["frodo".to_string(), "sam".to_string(), "pippin".to_string()];
        let matrix = score(&corpus, &targets, 10, &HashSet::new());
        assert_eq!(matrix.occurrences, vec![2, 1, 0]);
    }

    #[test]
    fn duplicate_targets_collapse_to_one_row() {
        let corpus = tagged(&[("frodo", "NN"), ("brave", "JJ")]);
        let targets = vec!["frodo".to_string(), "frodo".to_string()];
        let matrix = score(&corpus, &targets, 10, &HashSet::new());
        assert_eq!(matrix.targets, vec!["frodo".to_string()]);
        assert_eq!(matrix.occurrences, vec![1]);
    }

    #[test]
    fn empty_corpus_yields_empty_matrix() {
        let targets = vec!["frodo".to_string()];
        let matrix = score(&[], &targets, 10, &HashSet::new());
        assert!(matrix.neighbors.is_empty());
        assert_eq!(matrix.occurrences, vec![0]);
        assert_eq!(matrix.scores.dim(), (1, 0));
    }

    #[test]
    fn neighbor_columns_follow_first_appearance() {
        let corpus = tagged(&[
            ("loyal", "JJ"),
            ("frodo", "NN"),
            ("brave", "JJ"),
            ("loyal", "JJ"),
        ]);
        let matrix = score(&corpus, &["frodo".to_string()], 10, &HashSet::new());
        assert_eq!(matrix.neighbors, vec!["loyal".to_string(), "brave".to_string()]);
    }
}
