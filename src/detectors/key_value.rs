//! Key-value extraction: one record written as label/value pairs.
//!
//! Recognized shapes:
//! - `Label: value` on one line, or a `Label:` line followed by the value
//! - an element with two children, a short label and a longer or numeric value
//! - `<dl>` definition lists
//!
//! Each qualifying block becomes a one-row table whose header holds the labels.

use std::collections::BTreeMap;

use crate::dom::{Line, NodeId, Tree};
use crate::error::Result;
use crate::options::Options;
use crate::patterns::{CLOCK_TIME, LABEL_ONLY, LABEL_VALUE};
use crate::result::{CandidateTable, PatternType};
use crate::semantic::{classify, is_numeric, SemanticKind};

use super::columns::dedup_labels;
use super::{provenance, Detector};

/// Extracts label/value blocks as single-record tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyValueExtractor;

impl Detector for KeyValueExtractor {
    fn name(&self) -> &'static str {
        "key_value"
    }

    fn pattern_type(&self) -> PatternType {
        PatternType::KeyValue
    }

    fn detect(&self, tree: &Tree, options: &Options) -> Result<Vec<CandidateTable>> {
        let mut tables = Vec::new();

        for container in tree.elements() {
            let (pairs, line_count) = if tree.tag(container) == "dl" {
                let pairs = definition_pairs(tree, container);
                let lines = pairs.len() * 2;
                (pairs, lines)
            } else {
                let lines = tree.child_lines(container);
                (line_pairs(tree, container, &lines, options), lines.len())
            };

            if pairs.len() < options.kv_min_pairs.max(1) {
                continue;
            }
            let covered: usize = pairs.iter().map(|p| p.nodes.len()).sum();
            if covered * 2 < line_count {
                continue;
            }
            if let Some(table) = pairs_table(tree, &pairs, options) {
                tables.push(table);
            }
        }

        Ok(tables)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Shape {
    Colon,
    LabelThenValue,
    Adjacent,
    Definition,
}

impl Shape {
    /// How strongly the shape alone signals a label/value pair.
    ///
    /// Two adjacent elements are also what a list of `name + price` records
    /// looks like, so that shape counts for less.
    fn weight(self) -> f64 {
        match self {
            Shape::Colon | Shape::Definition => 1.0,
            Shape::LabelThenValue => 0.9,
            Shape::Adjacent => 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pair {
    label: String,
    value: String,
    shape: Shape,
    /// Nodes the pair was read from, one per consumed line.
    nodes: Vec<NodeId>,
}

fn line_pairs(tree: &Tree, container: NodeId, lines: &[Line], options: &Options) -> Vec<Pair> {
    let mut pairs = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];

        if let Some(label) = label_only(&line.text, options.kv_max_label_len) {
            if let Some(next) = lines.get(i + 1) {
                if label_only(&next.text, options.kv_max_label_len).is_none() {
                    pairs.push(Pair {
                        label,
                        value: next.text.clone(),
                        shape: Shape::LabelThenValue,
                        nodes: vec![line.node, next.node],
                    });
                    i += 2;
                    continue;
                }
            }
        }

        // A block that renders as several lines is a record, not one pair.
        let colon = if line.node != container && tree.lines(line.node).len() > 1 {
            None
        } else {
            colon_pair(&line.text, options.kv_max_label_len)
        };
        if let Some((label, value)) = colon {
            pairs.push(Pair {
                label,
                value,
                shape: Shape::Colon,
                nodes: vec![line.node],
            });
        } else if line.node != container {
            if let Some((label, value)) = adjacent_pair(tree, line.node, options.kv_max_label_len) {
                pairs.push(Pair {
                    label,
                    value,
                    shape: Shape::Adjacent,
                    nodes: vec![line.node],
                });
            }
        }
        i += 1;
    }

    pairs
}

fn label_only(text: &str, max_label_len: usize) -> Option<String> {
    let caps = LABEL_ONLY.captures(text)?;
    let label = caps.get(1)?.as_str().trim();
    is_label(label, max_label_len).then(|| label.to_string())
}

fn colon_pair(text: &str, max_label_len: usize) -> Option<(String, String)> {
    if CLOCK_TIME.is_match(text) {
        return None;
    }
    let caps = LABEL_VALUE.captures(text)?;
    let label = caps.get(1)?.as_str().trim();
    let value = caps.get(2)?.as_str().trim();
    // `https://...` is a URL, not a label.
    if value.starts_with("//") || !is_label(label, max_label_len) {
        return None;
    }
    Some((label.to_string(), value.to_string()))
}

fn is_label(label: &str, max_label_len: usize) -> bool {
    !label.is_empty()
        && label.chars().count() <= max_label_len
        && label.chars().any(char::is_alphabetic)
}

/// `<li><b>Rooms</b><span>3</span></li>`: two element children, a short
/// label first and a value that is longer or numeric.
fn adjacent_pair(tree: &Tree, node: NodeId, max_label_len: usize) -> Option<(String, String)> {
    let children: Vec<NodeId> = tree.children(node).collect();
    let [first, second] = children[..] else {
        return None;
    };
    if !tree.own_text(node).is_empty() {
        return None;
    }

    let label = tree.text(first);
    let label = label.trim_end_matches(':').trim();
    let value = tree.text(second);
    if !is_label(label, max_label_len) || value.is_empty() {
        return None;
    }

    let value_like = value.chars().count() > label.chars().count()
        || is_numeric(&value)
        || classify(&value).kind == SemanticKind::Currency;
    value_like.then(|| (label.to_string(), value))
}

/// `<dt>` followed by `<dd>`, also inside `<div>` wrappers.
fn definition_pairs(tree: &Tree, dl: NodeId) -> Vec<Pair> {
    let items: Vec<NodeId> = tree
        .children(dl)
        .flat_map(|c| {
            if tree.tag(c) == "div" {
                tree.children(c).collect()
            } else {
                vec![c]
            }
        })
        .filter(|&c| matches!(tree.tag(c), "dt" | "dd"))
        .collect();

    items
        .windows(2)
        .filter(|w| tree.tag(w[0]) == "dt" && tree.tag(w[1]) == "dd")
        .filter_map(|w| {
            let label = tree.text(w[0]);
            let label = label.trim_end_matches(':').trim();
            (!label.is_empty()).then(|| Pair {
                label: label.to_string(),
                value: tree.text(w[1]),
                shape: Shape::Definition,
                nodes: vec![w[0], w[1]],
            })
        })
        .collect()
}

fn pairs_table(tree: &Tree, pairs: &[Pair], options: &Options) -> Option<CandidateTable> {
    let mut shapes: BTreeMap<Shape, usize> = BTreeMap::new();
    for pair in pairs {
        *shapes.entry(pair.shape).or_insert(0) += 1;
    }
    let total = pairs.len().max(1) as f64;
    let regularity = shapes.values().copied().max().unwrap_or(0) as f64 / total;
    let strength = pairs.iter().map(|p| p.shape.weight()).sum::<f64>() / total;

    let header = dedup_labels(pairs.iter().map(|p| p.label.clone()));
    let row = pairs.iter().map(|p| p.value.clone()).collect();
    let nodes: Vec<NodeId> = pairs.iter().flat_map(|p| p.nodes.iter().copied()).collect();

    CandidateTable::new(
        Some(header),
        vec![row],
        PatternType::KeyValue,
        options.kv_confidence_ceiling * regularity * strength,
        provenance(tree, &nodes),
    )
}
