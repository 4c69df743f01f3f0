//! Structural fingerprints: identical subtrees anywhere in the document.

use std::collections::BTreeMap;

use crate::dom::{NodeId, Tree};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::result::{CandidateTable, PatternType};

use super::{repetition_score, slot_table, Detector};

/// Groups elements whose subtrees have the same multiset of tag paths.
///
/// Unlike the structural detector the members need not be siblings, so
/// records spread across several containers still end up in one table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FingerprintGrouper;

impl Detector for FingerprintGrouper {
    fn name(&self) -> &'static str {
        "fingerprint_group"
    }

    fn pattern_type(&self) -> PatternType {
        PatternType::FingerprintGroup
    }

    fn detect(&self, tree: &Tree, options: &Options) -> Result<Vec<CandidateTable>> {
        let depth = tree.max_depth();
        if depth > options.max_tree_depth {
            return Err(Error::DepthLimit {
                depth,
                limit: options.max_tree_depth,
            });
        }

        let mut groups: BTreeMap<String, Vec<NodeId>> = BTreeMap::new();
        for id in tree.elements() {
            let descendants = tree.descendant_element_count(id);
            if descendants == 0 || descendants > options.fingerprint_max_descendants {
                continue;
            }
            let paths = descendant_paths(tree, id);
            if paths.len() < options.fingerprint_min_paths {
                continue;
            }
            groups.entry(fingerprint(tree, id, &paths)).or_default().push(id);
        }

        let mut groups: Vec<Vec<NodeId>> = groups
            .into_values()
            .filter(|members| members.len() >= options.min_group_size.max(1))
            .collect();
        groups.sort_by_key(|members| members[0]);

        let tables = groups
            .iter()
            .filter_map(|members| {
                slot_table(
                    tree,
                    members,
                    options,
                    PatternType::FingerprintGroup,
                    repetition_score(members.len()),
                )
            })
            .collect();

        Ok(tables)
    }
}

/// Sorted tag paths of every descendant element, relative to `root`.
fn descendant_paths(tree: &Tree, root: NodeId) -> Vec<String> {
    let mut relative: BTreeMap<NodeId, String> = BTreeMap::new();
    let mut paths = Vec::new();

    for id in tree.element_descendants(root) {
        let path = match tree.parent(id).and_then(|p| relative.get(&p)) {
            Some(parent_path) => format!("{parent_path}/{}", tree.tag(id)),
            None => tree.tag(id).to_string(),
        };
        relative.insert(id, path.clone());
        paths.push(path);
    }

    paths.sort_unstable();
    paths
}

fn fingerprint(tree: &Tree, root: NodeId, paths: &[String]) -> String {
    format!("{}:{}", tree.tag(root), paths.join(","))
}
