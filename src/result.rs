//! Result types for extraction output.
//!
//! This module defines the tabular datasets produced by the detectors and the
//! result set returned to callers.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which detector produced a candidate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// A `<table>` element, read directly.
    NativeTable,
    /// Consecutive siblings with identical tag signatures.
    StructuralRepeat,
    /// Siblings with similar text length and density.
    VisualBlock,
    /// Elements sharing an identical class set.
    ClassGroup,
    /// Elements sharing an identical subtree fingerprint.
    FingerprintGroup,
    /// A single record of label/value pairs.
    KeyValue,
}

impl PatternType {
    /// Every pattern type, in detector execution order.
    pub const ALL: [PatternType; 6] = [
        PatternType::NativeTable,
        PatternType::StructuralRepeat,
        PatternType::VisualBlock,
        PatternType::ClassGroup,
        PatternType::FingerprintGroup,
        PatternType::KeyValue,
    ];

    /// Tie-break rank used by deduplication, lower wins.
    ///
    /// Orders authoritative markup before heuristics:
    /// native > structural > class > fingerprint > visual > key-value.
    #[must_use]
    pub fn priority(self) -> u8 {
        match self {
            Self::NativeTable => 0,
            Self::StructuralRepeat => 1,
            Self::ClassGroup => 2,
            Self::FingerprintGroup => 3,
            Self::VisualBlock => 4,
            Self::KeyValue => 5,
        }
    }

    /// Stable snake_case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NativeTable => "native_table",
            Self::StructuralRepeat => "structural_repeat",
            Self::VisualBlock => "visual_block",
            Self::ClassGroup => "class_group",
            Self::FingerprintGroup => "fingerprint_group",
            Self::KeyValue => "key_value",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural path of an element from the document root.
///
/// XPath-like, with a 1-based index among same-tag siblings on every step:
/// `/html[1]/body[1]/div[2]/ul[1]/li[3]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(String);

impl NodePath {
    /// Wrap an already formatted path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Path of a child step below `self`.
    #[must_use]
    pub fn child(&self, tag: &str, index: usize) -> Self {
        Self(format!("{}/{tag}[{index}]", self.0))
    }

    /// The path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `self` equals `other` or is one of its ancestors.
    #[must_use]
    pub fn contains(&self, other: &NodePath) -> bool {
        other.0.len() >= self.0.len()
            && other.0.starts_with(&self.0)
            && (other.0.len() == self.0.len() || other.0.as_bytes()[self.0.len()] == b'/')
    }

    /// True when either path contains the other.
    #[must_use]
    pub fn is_related(&self, other: &NodePath) -> bool {
        self.contains(other) || other.contains(self)
    }

    /// Ancestor paths from the root down, ending with the path itself.
    pub fn lineage(&self) -> impl Iterator<Item = &str> {
        let path = self.0.as_str();
        path.match_indices('/')
            .map(move |(i, _)| &path[..i])
            .filter(|prefix| !prefix.is_empty())
            .chain(std::iter::once(path))
    }
}

impl Borrow<str> for NodePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tabular dataset proposed by one detector.
///
/// Every row has exactly [`column_count`](Self::column_count) cells, and when a
/// header is present it has the same length. Tables always have at least one
/// row. Cell text is owned, so tables outlive the parsed tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateTable {
    header: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
    pattern_type: PatternType,
    confidence: f64,
    provenance: BTreeSet<NodePath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    caption: Option<String>,
}

impl CandidateTable {
    /// Build a table, normalizing it to a rectangle.
    ///
    /// Short rows are padded with empty cells; a short header is padded with
    /// `column_N` names. Confidence is clamped to `[0, 1]`. Returns `None` when
    /// there are no rows or no columns.
    #[must_use]
    pub fn new(
        header: Option<Vec<String>>,
        mut rows: Vec<Vec<String>>,
        pattern_type: PatternType,
        confidence: f64,
        provenance: BTreeSet<NodePath>,
    ) -> Option<Self> {
        let width = rows
            .iter()
            .map(Vec::len)
            .chain(header.iter().map(Vec::len))
            .max()
            .unwrap_or(0);
        if rows.is_empty() || width == 0 {
            return None;
        }

        for row in &mut rows {
            row.resize_with(width, String::new);
        }
        let header = header.map(|mut h| {
            let start = h.len();
            h.extend((start..width).map(|i| format!("column_{}", i + 1)));
            h
        });

        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };

        Some(Self {
            header,
            rows,
            pattern_type,
            confidence,
            provenance,
            caption: None,
        })
    }

    /// Attach a caption.
    #[must_use]
    pub fn with_caption(mut self, caption: Option<String>) -> Self {
        self.caption = caption.filter(|c| !c.is_empty());
        self
    }

    /// Column headers, if present or inferred.
    #[must_use]
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Data rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Detector that produced this table.
    #[must_use]
    pub fn pattern_type(&self) -> PatternType {
        self.pattern_type
    }

    /// Confidence in `[0, 1]`.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Paths of the DOM nodes this table was built from.
    #[must_use]
    pub fn provenance(&self) -> &BTreeSet<NodePath> {
        &self.provenance
    }

    /// Table caption (native tables only).
    #[must_use]
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Number of data rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Number of records, as used by the minimum-row filter.
    ///
    /// A key-value table is one transposed record, so its pairs (columns)
    /// are counted instead of its single row.
    #[must_use]
    pub fn record_count(&self) -> usize {
        match self.pattern_type {
            PatternType::KeyValue => self.column_count(),
            _ => self.row_count(),
        }
    }

    /// Values of one column, top to bottom.
    #[must_use]
    pub fn column(&self, index: usize) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| row.get(index).map(String::as_str))
            .collect()
    }

    /// Copy of this table with its first row promoted to the header.
    ///
    /// Empty cells become `column_N`. The previous header, if any, is
    /// discarded.
    pub fn with_first_row_as_header(&self) -> Result<Self> {
        if self.rows.len() < 2 {
            return Err(Error::InsufficientRows {
                rows: self.rows.len(),
            });
        }

        let header = self.rows[0]
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if cell.is_empty() {
                    format!("column_{}", i + 1)
                } else {
                    cell.clone()
                }
            })
            .collect();

        Ok(Self {
            header: Some(header),
            rows: self.rows[1..].to_vec(),
            ..self.clone()
        })
    }

    /// Render as a GitHub Flavored Markdown table.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        crate::markdown::table_to_markdown(self)
    }
}

/// Result set of one extraction call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractResult {
    /// Surviving tables, highest confidence first.
    pub tables: Vec<CandidateTable>,

    /// Non-fatal issues encountered during extraction, such as:
    /// - markup that needed recovery
    /// - a detector that failed and contributed nothing
    pub warnings: Vec<String>,
}
