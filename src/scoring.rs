//! Table analysis scores.
//!
//! Helpers for ranking and previewing extracted tables: how varied the
//! columns are, which columns hold numbers, and how well a table matches a
//! set of wanted column names.

use std::collections::{BTreeMap, BTreeSet};

use crate::result::CandidateTable;
use crate::semantic::is_numeric;

/// Share of non-empty cells that must be numeric for a numeric column.
pub const NUMERIC_COLUMN_THRESHOLD: f64 = 0.7;

/// Header candidate chosen by [`best_header_row`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderMatch {
    /// Row index the header came from, `None` for the table's own header.
    pub row: Option<usize>,
    /// The header cells.
    pub header: Vec<String>,
    /// Per-column similarity against the targets.
    pub scores: Vec<f64>,
}

/// Mean normalized Shannon entropy of the column value distributions.
///
/// Columns holding a single distinct value carry no information and are
/// skipped. Returns 0.0 when no column qualifies.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use rs_tablescout::{scoring::table_entropy, CandidateTable, PatternType};
///
/// let rows = vec![
///     vec!["a".to_string(), "x".to_string()],
///     vec!["b".to_string(), "x".to_string()],
/// ];
/// let table = CandidateTable::new(None, rows, PatternType::VisualBlock, 0.5, BTreeSet::new()).unwrap();
/// assert!((table_entropy(&table) - 1.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn table_entropy(table: &CandidateTable) -> f64 {
    let scores: Vec<f64> = (0..table.column_count())
        .filter_map(|col| {
            let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
            for value in table.column(col) {
                *counts.entry(value).or_insert(0) += 1;
            }
            if counts.len() < 2 {
                return None;
            }

            let total = counts.values().sum::<usize>() as f64;
            let entropy: f64 = counts
                .values()
                .map(|&c| {
                    let p = c as f64 / total;
                    -p * p.ln()
                })
                .sum();
            Some(entropy / (counts.len() as f64).ln())
        })
        .collect();

    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

/// Per-column flag: at least 70% of the non-empty cells are numeric.
#[must_use]
pub fn numeric_columns(table: &CandidateTable) -> Vec<bool> {
    (0..table.column_count())
        .map(|col| {
            let values: Vec<&str> = table
                .column(col)
                .into_iter()
                .filter(|v| !v.trim().is_empty())
                .collect();
            if values.is_empty() {
                return false;
            }
            let numeric = values.iter().filter(|v| is_numeric(v)).count();
            numeric as f64 / values.len() as f64 >= NUMERIC_COLUMN_THRESHOLD
        })
        .collect()
}

/// Best similarity of each column name against the targets.
///
/// A substring match in either direction scores 1.0 when both names are at
/// least 3 characters long; otherwise the token-set Jaccard ratio is used.
#[must_use]
pub fn column_similarity<S: AsRef<str>, T: AsRef<str>>(columns: &[S], targets: &[T]) -> Vec<f64> {
    columns
        .iter()
        .map(|col| best_similarity(col.as_ref(), targets))
        .collect()
}

fn best_similarity<T: AsRef<str>>(column: &str, targets: &[T]) -> f64 {
    let column = column.trim().to_lowercase();
    let substring_hit = targets.iter().any(|target| {
        let target = target.as_ref().trim().to_lowercase();
        column.chars().count() >= 3
            && target.chars().count() >= 3
            && (column.contains(&target) || target.contains(&column))
    });
    if substring_hit {
        return 1.0;
    }
    targets
        .iter()
        .map(|target| token_set_ratio(&column, target.as_ref()))
        .fold(0.0, f64::max)
}

fn token_set_ratio(a: &str, b: &str) -> f64 {
    let a: BTreeSet<String> = a.split_whitespace().map(str::to_lowercase).collect();
    let b: BTreeSet<String> = b.split_whitespace().map(str::to_lowercase).collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

/// Find the header most similar to the targets.
///
/// Starts from the table's header (or `column_N` names when it has none) and
/// scans the first `max_header_rows` rows; a row replaces the current best
/// only with a strictly higher mean similarity.
#[must_use]
pub fn best_header_row<T: AsRef<str>>(
    table: &CandidateTable,
    targets: &[T],
    max_header_rows: usize,
) -> HeaderMatch {
    let header: Vec<String> = table.header().map_or_else(
        || (1..=table.column_count()).map(|i| format!("column_{i}")).collect(),
        <[String]>::to_vec,
    );
    let scores = column_similarity(header.as_slice(), targets);
    let mut best = HeaderMatch {
        row: None,
        header,
        scores,
    };
    let mut best_avg = mean(&best.scores);

    for (i, row) in table.rows().iter().take(max_header_rows).enumerate() {
        let scores = column_similarity(row.as_slice(), targets);
        let avg = mean(&scores);
        if avg > best_avg {
            best_avg = avg;
            best = HeaderMatch {
                row: Some(i),
                header: row.clone(),
                scores,
            };
        }
    }

    best
}

/// Average, over the targets, of the best column match in the best header.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use rs_tablescout::{scoring::target_match_score, CandidateTable, PatternType};
///
/// let table = CandidateTable::new(
///     Some(vec!["Product name".to_string(), "Unit price".to_string()]),
///     vec![vec!["Lamp".to_string(), "$10".to_string()]],
///     PatternType::StructuralRepeat,
///     0.8,
///     BTreeSet::new(),
/// )
/// .unwrap();
/// assert_eq!(target_match_score(&table, &["price", "name"], 3), 1.0);
/// ```
#[must_use]
pub fn target_match_score<T: AsRef<str>>(
    table: &CandidateTable,
    targets: &[T],
    max_header_rows: usize,
) -> f64 {
    if targets.is_empty() {
        return 0.0;
    }
    let best = best_header_row(table, targets, max_header_rows);
    let scores: Vec<f64> = targets
        .iter()
        .map(|target| {
            column_similarity(best.header.as_slice(), std::slice::from_ref(target))
                .into_iter()
                .fold(0.0, f64::max)
        })
        .collect();
    mean(&scores)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::result::PatternType;

    fn table(header: Option<&[&str]>, rows: &[&[&str]]) -> CandidateTable {
        let to_vec = |cells: &[&str]| cells.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();
        CandidateTable::new(
            header.map(to_vec),
            rows.iter().map(|r| to_vec(r)).collect(),
            PatternType::NativeTable,
            1.0,
            BTreeSet::new(),
        )
        .expect("table")
    }

    #[test]
    fn entropy_skips_constant_columns() {
        let t = table(None, &[&["a", "k"], &["a", "k"], &["a", "k"]]);
        assert_eq!(table_entropy(&t), 0.0);

        let t = table(None, &[&["a", "k"], &["b", "k"], &["c", "k"]]);
        assert!((table_entropy(&t) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn entropy_is_lower_for_skewed_columns() {
        let t = table(None, &[&["a"], &["a"], &["a"], &["b"]]);
        let e = table_entropy(&t);
        assert!(e > 0.0 && e < 1.0);
    }

    #[test]
    fn numeric_columns_use_seventy_percent_threshold() {
        let t = table(
            None,
            &[
                &["Oslo", "1", "x"],
                &["Bergen", "2", "y"],
                &["Bodø", "3", "4"],
                &["Molde", "n/a", "z"],
            ],
        );
        assert_eq!(numeric_columns(&t), vec![false, true, false]);
    }

    #[test]
    fn similarity_substring_and_tokens() {
        let scores = column_similarity(&["Unit price", "ID", "sale date"], &["price", "date of sale"]);
        assert_eq!(scores[0], 1.0);
        assert_eq!(scores[1], 0.0);
        // {sale, date} vs {date, of, sale}: 2 / 3
        assert!((scores[2] - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn short_names_do_not_substring_match() {
        let scores = column_similarity(&["id"], &["video"]);
        assert_eq!(scores[0], 0.0);
    }

    #[test]
    fn best_header_row_prefers_matching_data_row() {
        let t = table(None, &[&["Name", "Price"], &["Lamp", "10"], &["Desk", "120"]]);
        let best = best_header_row(&t, &["name", "price"], 3);
        assert_eq!(best.row, Some(0));
        assert_eq!(best.header, vec!["Name", "Price"]);
    }

    #[test]
    fn best_header_row_keeps_existing_header_on_ties() {
        let t = table(Some(&["Name", "Price"][..]), &[&["Name", "Price"], &["Lamp", "10"]]);
        assert_eq!(best_header_row(&t, &["name"], 3).row, None);
    }

    #[test]
    fn target_match_score_averages_targets() {
        let t = table(Some(&["Name", "Colour"][..]), &[&["Lamp", "red"]]);
        assert!((target_match_score(&t, &["name", "price"], 3) - 0.5).abs() < 1e-9);
        assert_eq!(target_match_score::<&str>(&t, &[], 3), 0.0);
    }
}
