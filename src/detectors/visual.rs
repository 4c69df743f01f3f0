//! Visual block detection: siblings that look alike without sharing markup.
//!
//! Pages built from div soup often repeat records whose tags differ from
//! card to card. Text length and element density stand in for visual size.

use crate::dom::{NodeId, Tree};
use crate::error::Result;
use crate::options::Options;
use crate::patterns::{CLOCK_TIME, FRAGMENT_SEPARATOR, LABEL_VALUE};
use crate::result::{CandidateTable, PatternType};
use crate::semantic::classify;

use super::columns::{align, Cell};
use super::{provenance, repetition_score, Detector};

/// Groups siblings of similar text length and density and aligns their text
/// fragments by semantic kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisualBlockDetector;

impl Detector for VisualBlockDetector {
    fn name(&self) -> &'static str {
        "visual_block"
    }

    fn pattern_type(&self) -> PatternType {
        PatternType::VisualBlock
    }

    fn detect(&self, tree: &Tree, options: &Options) -> Result<Vec<CandidateTable>> {
        let min_group = options.min_group_size.max(1);
        let mut tables = Vec::new();

        for container in tree.elements() {
            let siblings: Vec<Measured> = tree
                .children(container)
                .filter_map(|id| Measured::new(tree, id))
                .collect();
            if siblings.len() < min_group {
                continue;
            }

            let median_len = median(siblings.iter().map(|m| m.text_len));
            let median_count = median(siblings.iter().map(|m| m.descendants));

            let members: Vec<(NodeId, Vec<Cell>, f64)> = siblings
                .iter()
                .filter(|m| {
                    within(m.text_len, median_len, options.visual_tolerance)
                        && within(m.descendants, median_count, options.visual_tolerance)
                })
                .filter_map(|m| {
                    let cells = fragment_cells(tree, m.id, options);
                    (cells.len() >= options.visual_min_fragments)
                        .then(|| (m.id, cells, deviation(m.text_len, median_len)))
                })
                .collect();
            if members.len() < min_group {
                continue;
            }

            let records: Vec<Vec<Cell>> = members.iter().map(|(_, cells, _)| cells.clone()).collect();
            let Some(aligned) = align(&records) else {
                continue;
            };

            let mean_deviation =
                members.iter().map(|(_, _, d)| d).sum::<f64>() / members.len() as f64;
            let tightness = (1.0 - mean_deviation).max(0.0);
            let confidence =
                options.visual_confidence_ceiling * repetition_score(members.len()) * tightness;

            let ids: Vec<NodeId> = members.iter().map(|(id, _, _)| *id).collect();
            if let Some(table) = CandidateTable::new(
                Some(aligned.header),
                aligned.rows,
                PatternType::VisualBlock,
                confidence,
                provenance(tree, &ids),
            ) {
                tables.push(table);
            }
        }

        Ok(tables)
    }
}

struct Measured {
    id: NodeId,
    text_len: usize,
    descendants: usize,
}

impl Measured {
    fn new(tree: &Tree, id: NodeId) -> Option<Self> {
        let text_len = tree.text(id).chars().count();
        (text_len > 0).then(|| Self {
            id,
            text_len,
            descendants: tree.descendant_element_count(id),
        })
    }
}

/// Split a member's text into fragments and key them by semantic kind.
///
/// `label: value` fragments contribute the value and offer the label as the
/// column header.
fn fragment_cells(tree: &Tree, member: NodeId, options: &Options) -> Vec<Cell> {
    tree.lines(member)
        .iter()
        .flat_map(|line| FRAGMENT_SEPARATOR.split(line).map(str::trim).collect::<Vec<_>>())
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| {
            let (label, value) = split_label(fragment, options.kv_max_label_len);
            let kind = classify(value).kind;
            Cell {
                key: kind.as_str().to_string(),
                label: label.map(str::to_string),
                value: value.to_string(),
            }
        })
        .collect()
}

fn split_label(fragment: &str, max_label_len: usize) -> (Option<&str>, &str) {
    if CLOCK_TIME.is_match(fragment) {
        return (None, fragment);
    }
    match LABEL_VALUE.captures(fragment) {
        Some(caps) => match (caps.get(1), caps.get(2)) {
            (Some(label), Some(value)) if label.as_str().chars().count() <= max_label_len => {
                (Some(label.as_str().trim()), value.as_str().trim())
            }
            _ => (None, fragment),
        },
        None => (None, fragment),
    }
}

fn median(values: impl Iterator<Item = usize>) -> f64 {
    let mut values: Vec<usize> = values.collect();
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) as f64 / 2.0
    } else {
        values[mid] as f64
    }
}

fn deviation(value: usize, median: f64) -> f64 {
    (value as f64 - median).abs() / median.max(1.0)
}

fn within(value: usize, median: f64, tolerance: f64) -> bool {
    deviation(value, median) <= tolerance
}
