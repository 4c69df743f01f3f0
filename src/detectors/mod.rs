//! Table detectors.
//!
//! Each detector is a stateless unit struct implementing [`Detector`]. All of
//! them read the same immutable [`Tree`] and may run concurrently; none of
//! them knows about the others. Overlap between their proposals is resolved
//! later by the assembler.

mod class_group;
mod columns;
mod fingerprint;
mod key_value;
mod native;
mod structural;
mod visual;

use std::collections::BTreeSet;

pub use class_group::ClassSignatureGrouper;
pub use fingerprint::FingerprintGrouper;
pub use key_value::KeyValueExtractor;
pub use native::NativeTableExtractor;
pub use structural::StructuralRepeatDetector;
pub use visual::VisualBlockDetector;

use crate::dom::{NodeId, Tree};
use crate::error::Result;
use crate::options::Options;
use crate::result::{CandidateTable, NodePath, PatternType};

/// A strategy that proposes candidate tables from a parsed document.
pub trait Detector: Sync {
    /// Short name used in warnings and log events.
    fn name(&self) -> &'static str;

    /// Pattern type stamped on every candidate this detector emits.
    fn pattern_type(&self) -> PatternType;

    /// Propose candidate tables.
    ///
    /// Returning `Err` (or panicking) costs only this detector's candidates;
    /// the pipeline records a warning and carries on.
    fn detect(&self, tree: &Tree, options: &Options) -> Result<Vec<CandidateTable>>;
}

/// The detector producing `pattern`.
#[must_use]
pub fn detector_for(pattern: PatternType) -> &'static dyn Detector {
    match pattern {
        PatternType::NativeTable => &NativeTableExtractor,
        PatternType::StructuralRepeat => &StructuralRepeatDetector,
        PatternType::VisualBlock => &VisualBlockDetector,
        PatternType::ClassGroup => &ClassSignatureGrouper,
        PatternType::FingerprintGroup => &FingerprintGrouper,
        PatternType::KeyValue => &KeyValueExtractor,
    }
}

/// Enabled detectors in fixed execution order.
#[must_use]
pub fn enabled(options: &Options) -> Vec<&'static dyn Detector> {
    PatternType::ALL
        .into_iter()
        .filter(|&p| options.is_enabled(p))
        .map(detector_for)
        .collect()
}

/// `n / (n + 1)`: more repetitions, more confidence, never quite 1.
pub(crate) fn repetition_score(members: usize) -> f64 {
    members as f64 / (members as f64 + 1.0)
}

/// Build a table from group members using slot alignment.
pub(crate) fn slot_table(
    tree: &Tree,
    members: &[NodeId],
    options: &Options,
    pattern_type: PatternType,
    confidence: f64,
) -> Option<CandidateTable> {
    let records: Vec<Vec<columns::Cell>> = members
        .iter()
        .map(|&m| columns::member_cells(tree, m, options.signature_depth))
        .collect();
    let aligned = columns::align(&records)?;
    CandidateTable::new(
        Some(aligned.header),
        aligned.rows,
        pattern_type,
        confidence,
        provenance(tree, members),
    )
}

pub(crate) fn provenance(tree: &Tree, nodes: &[NodeId]) -> BTreeSet<NodePath> {
    nodes.iter().map(|&n| tree.path(n).clone()).collect()
}
