//! Column alignment shared by the grouping detectors.
//!
//! A group member is flattened into keyed cells. The k-th occurrence of a key
//! in a member lands in the same column as the k-th occurrence in every other
//! member, so members with an extra or missing element still line up. Columns
//! that are empty in most members are dropped.

use std::collections::{BTreeMap, BTreeSet};

use crate::dom::{NodeId, Tree};

/// Key of the leading slot holding a member's own text.
pub(crate) const OWN_TEXT_KEY: &str = "#text";

/// One keyed value of a group member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Cell {
    pub key: String,
    /// Header suggested by the markup (class name, `label:` prefix).
    pub label: Option<String>,
    pub value: String,
}

/// Header and rectangular rows produced by [`align`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Aligned {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Flatten a member into slot cells.
///
/// Walks the descendants within `depth` levels in pre-order. Each element is a
/// slot keyed by its tag path relative to the member (`span`, `span/b`). A slot
/// whose children are inside the window contributes only its own text, a slot
/// at the window edge or without children its full text, and an `img` its
/// `alt`. The member's own text comes first under [`OWN_TEXT_KEY`].
pub(crate) fn member_cells(tree: &Tree, member: NodeId, depth: usize) -> Vec<Cell> {
    let mut cells = vec![Cell {
        key: OWN_TEXT_KEY.to_string(),
        label: None,
        value: tree.own_text(member),
    }];

    let mut stack: Vec<(NodeId, usize, String)> = tree
        .children(member)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .map(|c| (c, 1, tree.tag(c).to_string()))
        .collect();

    while let Some((node, level, key)) = stack.pop() {
        let has_children = tree.children(node).next().is_some();
        let value = if tree.tag(node) == "img" {
            tree.attr(node, "alt").unwrap_or_default().trim().to_string()
        } else if level >= depth || !has_children {
            tree.text(node)
        } else {
            tree.own_text(node)
        };
        let label = tree.classes(node).first().map(|c| (*c).to_string());

        if level < depth {
            let children: Vec<NodeId> = tree.children(node).collect();
            for &child in children.iter().rev() {
                stack.push((child, level + 1, format!("{key}/{}", tree.tag(child))));
            }
        }

        cells.push(Cell { key, label, value });
    }

    cells
}

/// Structural signature: the member's tag followed by its slot keys.
///
/// Empty when the member has no element children, which makes it ineligible
/// for grouping.
pub(crate) fn signature(tree: &Tree, member: NodeId, depth: usize) -> Vec<String> {
    let keys: Vec<String> = member_cells(tree, member, depth)
        .into_iter()
        .skip(1)
        .map(|cell| cell.key)
        .collect();
    if keys.is_empty() {
        return keys;
    }
    std::iter::once(tree.tag(member).to_string()).chain(keys).collect()
}

/// Align member records into columns.
///
/// Columns are ordered by first encounter. A column is dropped when more than
/// half of the members have no value for it. Returns `None` when nothing
/// survives.
pub(crate) fn align(records: &[Vec<Cell>]) -> Option<Aligned> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: BTreeMap<(String, usize), usize> = BTreeMap::new();
    let mut labels: Vec<Option<String>> = Vec::new();
    let mut values: Vec<BTreeMap<usize, String>> = Vec::with_capacity(records.len());

    for record in records {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        let mut row = BTreeMap::new();
        for cell in record {
            let occurrence = seen.entry(cell.key.as_str()).or_insert(0);
            let slot = (cell.key.clone(), *occurrence);
            *occurrence += 1;

            let col = *index.entry(slot.clone()).or_insert_with(|| {
                order.push(slot);
                labels.push(None);
                order.len() - 1
            });
            if labels[col].is_none() && !cell.value.is_empty() {
                labels[col].clone_from(&cell.label);
            }
            row.insert(col, cell.value.clone());
        }
        values.push(row);
    }

    let members = records.len();
    let kept: Vec<usize> = (0..order.len())
        .filter(|&col| {
            let empty = values
                .iter()
                .filter(|row| row.get(&col).map_or(true, String::is_empty))
                .count();
            empty * 2 <= members
        })
        .collect();
    if kept.is_empty() {
        return None;
    }

    let header = dedup_labels(kept.iter().map(|&col| {
        labels[col]
            .clone()
            .unwrap_or_else(|| fallback_label(&order[col].0))
    }));
    let rows = values
        .iter()
        .map(|row| {
            kept.iter()
                .map(|col| row.get(col).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    Some(Aligned { header, rows })
}

/// Make labels unique by suffixing repeats: `price`, `price_2`.
///
/// A suffixed name already taken by another label is skipped.
pub(crate) fn dedup_labels(labels: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut used: BTreeSet<String> = BTreeSet::new();
    let mut suffixes: BTreeMap<String, usize> = BTreeMap::new();
    labels
        .into_iter()
        .map(|label| {
            let name = if used.contains(&label) {
                let n = suffixes.entry(label.clone()).or_insert(1);
                loop {
                    *n += 1;
                    let candidate = format!("{label}_{n}");
                    if !used.contains(&candidate) {
                        break candidate;
                    }
                }
            } else {
                label
            };
            used.insert(name.clone());
            name
        })
        .collect()
}

fn fallback_label(key: &str) -> String {
    if key == OWN_TEXT_KEY {
        return "text".to_string();
    }
    key.rsplit('/').next().unwrap_or(key).to_string()
}
