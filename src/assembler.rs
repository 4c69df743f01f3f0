//! Candidate assembly: filter, deduplicate and rank detector output.
//!
//! Several detectors usually describe the same region of a page. Overlap is
//! measured on provenance paths, where a path counts as shared when the other
//! candidate holds the same node, one of its ancestors or one of its
//! descendants. Two native tables only share identical paths, so a table
//! nested in another table's cell survives next to it. The more confident
//! (then more authoritative) candidate wins.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::ops::Bound;

use crate::options::Options;
use crate::result::{CandidateTable, NodePath, PatternType};

/// Filter, deduplicate and rank candidates.
///
/// Input order is detection order and breaks all remaining ties, so the same
/// input always gives the same output.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeSet;
/// use rs_tablescout::{assembler, CandidateTable, NodePath, Options, PatternType};
///
/// let rows: Vec<Vec<String>> = ["a", "b", "c"]
///     .iter()
///     .map(|k| vec![k.to_string(), "1".to_string()])
///     .collect();
/// let paths: BTreeSet<NodePath> = [NodePath::new("/html[1]/body[1]/ul[1]")].into();
/// let native = CandidateTable::new(None, rows.clone(), PatternType::NativeTable, 1.0, paths.clone()).unwrap();
/// let visual = CandidateTable::new(None, rows, PatternType::VisualBlock, 0.6, paths).unwrap();
///
/// let kept = assembler::assemble(vec![visual, native], &Options::default());
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].pattern_type(), PatternType::NativeTable);
/// ```
#[must_use]
pub fn assemble(candidates: Vec<CandidateTable>, options: &Options) -> Vec<CandidateTable> {
    let candidates: Vec<(usize, CandidateTable)> = candidates
        .into_iter()
        .enumerate()
        .filter(|(_, table)| table.record_count() >= options.min_rows)
        .filter(|(_, table)| {
            // A key-value record keeps its pairs in columns of one row.
            table.pattern_type() == PatternType::KeyValue || table.column_count() >= options.min_columns
        })
        .collect();

    let mut visit: Vec<&(usize, CandidateTable)> = candidates.iter().collect();
    visit.sort_by(|(ia, a), (ib, b)| compare_rank(a, b).then_with(|| ia.cmp(ib)));

    let mut kept: Vec<&(usize, CandidateTable)> = Vec::new();
    for entry in visit {
        let duplicate = kept
            .iter()
            .any(|(_, other)| table_overlap(&entry.1, other) > options.dedup_threshold);
        if !duplicate {
            kept.push(entry);
        }
    }

    kept.sort_by(|(ia, a), (ib, b)| {
        b.confidence()
            .total_cmp(&a.confidence())
            .then_with(|| ia.cmp(ib))
    });
    kept.into_iter().map(|(_, table)| table.clone()).collect()
}

/// Overlap of two candidates in `[0, 1]`, as used for deduplication.
///
/// Native tables own disjoint rows even when one sits inside a cell of the
/// other, so between two of them only identical paths are shared. Every other
/// pairing uses [`overlap_ratio`].
#[must_use]
pub fn table_overlap(a: &CandidateTable, b: &CandidateTable) -> f64 {
    if a.pattern_type() == PatternType::NativeTable && b.pattern_type() == PatternType::NativeTable {
        let (a, b) = (a.provenance(), b.provenance());
        let shared = a.intersection(b).count() as f64;
        return ratio(shared, a.len()).max(ratio(shared, b.len()));
    }
    overlap_ratio(a.provenance(), b.provenance())
}

/// Overlap of two provenance sets in `[0, 1]`.
///
/// For each direction, the fraction of one set's paths that are equal to, an
/// ancestor of, or a descendant of some path in the other set; the larger of
/// the two. Empty sets overlap nothing.
#[must_use]
pub fn overlap_ratio(a: &BTreeSet<NodePath>, b: &BTreeSet<NodePath>) -> f64 {
    directed_overlap(a, b).max(directed_overlap(b, a))
}

fn directed_overlap(from: &BTreeSet<NodePath>, to: &BTreeSet<NodePath>) -> f64 {
    if to.is_empty() {
        return 0.0;
    }
    let related = from.iter().filter(|p| has_relative(p, to)).count();
    ratio(related as f64, from.len())
}

/// True when `set` holds `path`, one of its ancestors or one of its descendants.
fn has_relative(path: &NodePath, set: &BTreeSet<NodePath>) -> bool {
    if path.lineage().any(|p| set.contains(p)) {
        return true;
    }
    // Descendants sort directly after the path itself.
    set.range::<str, _>((Bound::Excluded(path.as_str()), Bound::Unbounded))
        .next()
        .is_some_and(|next| path.contains(next))
}

fn ratio(count: f64, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count / total as f64
    }
}

/// Ranking order: confidence descending, then pattern priority.
#[must_use]
pub fn compare_rank(a: &CandidateTable, b: &CandidateTable) -> Ordering {
    b.confidence()
        .total_cmp(&a.confidence())
        .then_with(|| a.pattern_type().priority().cmp(&b.pattern_type().priority()))
}
