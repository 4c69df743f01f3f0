//! Configuration options for table extraction.
//!
//! The `Options` struct holds every tunable threshold of the heuristic
//! detectors. The numbers are judgment calls, so they are exposed here rather
//! than baked into the detectors.

use serde::{Deserialize, Serialize};

use crate::result::PatternType;

/// Default minimum number of records a table needs to be reported.
pub const DEFAULT_MIN_ROWS: usize = 3;

/// Configuration options for table extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings. Deserializing fills missing fields from the defaults,
/// so a partial JSON object is a valid configuration.
///
/// # Example
///
/// ```rust
/// use rs_tablescout::Options;
///
/// let options = Options {
///     min_rows: 5,
///     parallel: false,
///     ..Options::default()
/// };
/// assert_eq!(options.min_group_size, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Tables with fewer records than this are dropped by the assembler.
    ///
    /// For key-value tables the record count is the number of label/value
    /// pairs.
    ///
    /// Default: `3`
    pub min_rows: usize,

    /// Tables with fewer columns than this are dropped by the assembler.
    ///
    /// Key-value tables are exempt, their pairs are the columns of a single
    /// record.
    ///
    /// Default: `2`
    pub min_columns: usize,

    /// Minimum number of repeated members before a group counts as a row-set.
    ///
    /// Used by the structural, visual, class and fingerprint detectors.
    ///
    /// Default: `2`
    pub min_group_size: usize,

    /// Depth of the descendant window used for structural signatures and
    /// column slots.
    ///
    /// Default: `2`
    pub signature_depth: usize,

    /// Relative tolerance band around the sibling median for visual grouping.
    ///
    /// Default: `0.3`
    pub visual_tolerance: f64,

    /// Minimum number of text fragments a visual block member must carry.
    ///
    /// Default: `2`
    pub visual_min_fragments: usize,

    /// Upper bound on visual block confidence.
    ///
    /// Default: `0.7`
    pub visual_confidence_ceiling: f64,

    /// Multiplier applied to class group confidence.
    ///
    /// Default: `0.95`
    pub class_confidence_weight: f64,

    /// Minimum number of descendant tag paths in a fingerprint.
    ///
    /// Default: `2`
    pub fingerprint_min_paths: usize,

    /// Elements with more descendants than this are not fingerprinted.
    ///
    /// Default: `250`
    pub fingerprint_max_descendants: usize,

    /// Maximum label length (characters) for key-value detection.
    ///
    /// Default: `40`
    pub kv_max_label_len: usize,

    /// Minimum number of label/value pairs in a key-value block.
    ///
    /// Default: `2`
    pub kv_min_pairs: usize,

    /// Upper bound on key-value confidence.
    ///
    /// Default: `0.9`
    pub kv_confidence_ceiling: f64,

    /// Provenance overlap above which two candidates are duplicates.
    ///
    /// Default: `0.5`
    pub dedup_threshold: f64,

    /// Trees deeper than this are refused by depth-sensitive detectors.
    ///
    /// Default: `256`
    pub max_tree_depth: usize,

    /// Skip `<table role="presentation">` and `<table role="none">`.
    ///
    /// Default: `true`
    pub skip_layout_tables: bool,

    /// Run detectors on the rayon thread pool.
    ///
    /// Output is identical either way.
    ///
    /// Default: `true`
    pub parallel: bool,

    /// Detectors to run.
    ///
    /// Default: all six pattern types
    pub enabled_patterns: Vec<PatternType>,
}

impl Options {
    /// Options with a custom minimum record count and defaults elsewhere.
    #[must_use]
    pub fn with_min_rows(min_rows: usize) -> Self {
        Self {
            min_rows,
            ..Self::default()
        }
    }

    /// Whether the detector producing `pattern` should run.
    #[must_use]
    pub fn is_enabled(&self, pattern: PatternType) -> bool {
        self.enabled_patterns.contains(&pattern)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            min_rows: DEFAULT_MIN_ROWS,
            min_columns: 2,
            min_group_size: 2,
            signature_depth: 2,
            visual_tolerance: 0.3,
            visual_min_fragments: 2,
            visual_confidence_ceiling: 0.7,
            class_confidence_weight: 0.95,
            fingerprint_min_paths: 2,
            fingerprint_max_descendants: 250,
            kv_max_label_len: 40,
            kv_min_pairs: 2,
            kv_confidence_ceiling: 0.9,
            dedup_threshold: 0.5,
            max_tree_depth: 256,
            skip_layout_tables: true,
            parallel: true,
            enabled_patterns: PatternType::ALL.to_vec(),
        }
    }
}
