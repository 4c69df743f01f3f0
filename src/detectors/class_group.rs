//! Class-signature grouping: elements that share a class set and a
//! neighbourhood, wherever they sit in the markup.

use std::collections::BTreeMap;

use crate::dom::{NodeId, Tree};
use crate::error::Result;
use crate::options::Options;
use crate::result::{CandidateTable, PatternType};

use super::{repetition_score, slot_table, Detector};

/// Groups elements by (sorted class set, grandparent).
///
/// The grandparent keeps unrelated widgets that reuse a utility class apart
/// while still catching records split across sibling wrappers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassSignatureGrouper;

impl Detector for ClassSignatureGrouper {
    fn name(&self) -> &'static str {
        "class_group"
    }

    fn pattern_type(&self) -> PatternType {
        PatternType::ClassGroup
    }

    fn detect(&self, tree: &Tree, options: &Options) -> Result<Vec<CandidateTable>> {
        let mut groups: BTreeMap<(Vec<&str>, Option<NodeId>), Vec<NodeId>> = BTreeMap::new();

        for id in tree.elements() {
            let classes = tree.classes(id);
            if classes.is_empty() || tree.children(id).next().is_none() {
                continue;
            }
            let grandparent = tree.parent(id).and_then(|p| tree.parent(p));
            groups.entry((classes, grandparent)).or_default().push(id);
        }

        let mut groups: Vec<Vec<NodeId>> = groups
            .into_values()
            .filter(|members| members.len() >= options.min_group_size.max(1))
            .collect();
        groups.sort_by_key(|members| members[0]);

        let tables = groups
            .iter()
            .filter_map(|members| {
                let confidence = homogeneity(tree, members)
                    * repetition_score(members.len())
                    * options.class_confidence_weight;
                slot_table(tree, members, options, PatternType::ClassGroup, confidence)
            })
            .collect();

        Ok(tables)
    }
}

/// Fraction of members whose child tag sequence is the most common one.
fn homogeneity(tree: &Tree, members: &[NodeId]) -> f64 {
    let mut counts: BTreeMap<Vec<&str>, usize> = BTreeMap::new();
    for &m in members {
        let shape: Vec<&str> = tree.children(m).map(|c| tree.tag(c)).collect();
        *counts.entry(shape).or_insert(0) += 1;
    }
    let best = counts.values().copied().max().unwrap_or(0);
    best as f64 / members.len().max(1) as f64
}
