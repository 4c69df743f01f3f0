//! Error types for rs-tablescout.
//!
//! Only [`Error::EmptyDocument`] ever reaches callers of [`crate::extract`].
//! The remaining variants are produced inside the pipeline (a detector refusing
//! a tree, a detector panicking) and are downgraded to warnings there, or come
//! from post-processing helpers such as header promotion.

/// Error type for extraction operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The input was empty or contained no parseable content.
    #[error("document is empty or has no parseable content")]
    EmptyDocument,

    /// A detector refused a tree deeper than the configured limit.
    #[error("tree depth {depth} exceeds limit of {limit}")]
    DepthLimit {
        /// Depth of the deepest element in the tree.
        depth: usize,
        /// Configured `Options::max_tree_depth`.
        limit: usize,
    },

    /// A detector panicked; its candidates were discarded.
    #[error("detector '{detector}' panicked")]
    DetectorPanicked {
        /// Name of the failing detector.
        detector: &'static str,
    },

    /// The table has too few rows for the requested operation.
    #[error("table has {rows} row(s); at least 2 are required")]
    InsufficientRows {
        /// Row count of the table.
        rows: usize,
    },
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
