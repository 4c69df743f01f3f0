//! # rs-tablescout
//!
//! Heuristic extraction of tabular data from arbitrary HTML.
//!
//! Given a page, the library finds native tables, repeated list-like
//! structures and label/value blocks, and turns each into an independent table
//! with a header, rectangular rows, the DOM paths it came from and a
//! confidence score. No site-specific rules are involved.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_tablescout::{extract, PatternType, DEFAULT_MIN_ROWS};
//!
//! let html = r#"<table>
//!   <tr><th>City</th><th>Population</th></tr>
//!   <tr><td>Oslo</td><td>709 000</td></tr>
//!   <tr><td>Bergen</td><td>291 000</td></tr>
//!   <tr><td>Trondheim</td><td>212 000</td></tr>
//! </table>"#;
//!
//! let tables = extract(html, DEFAULT_MIN_ROWS)?;
//! assert_eq!(tables.len(), 1);
//! assert_eq!(tables[0].pattern_type(), PatternType::NativeTable);
//! assert_eq!(tables[0].rows()[0], vec!["Oslo", "709 000"]);
//! # Ok::<(), rs_tablescout::Error>(())
//! ```
//!
//! ## Detectors
//!
//! - **Native tables**: `<table>` with header detection and span expansion
//! - **Structural repeats**: consecutive siblings with the same tag shape
//! - **Visual blocks**: siblings of similar size, aligned by value type
//! - **Class groups**: elements sharing a class set
//! - **Fingerprint groups**: identical subtrees anywhere in the page
//! - **Key-value blocks**: `Label: value` lines, label/value pairs, `<dl>`
//!
//! Overlapping proposals are deduplicated by the assembler, keeping the most
//! confident one.

mod error;
mod extract;
mod options;
mod result;

/// Arena DOM built from html5ever's tolerant parser.
pub mod dom;

/// Compiled regex patterns shared by the recognizer and the detectors.
pub mod patterns;

/// Value classification (currency, date, percentage, measurement).
pub mod semantic;

/// The six table detectors and the `Detector` trait.
pub mod detectors;

/// Filtering, deduplication and ranking of candidates.
pub mod assembler;

/// Table analysis: entropy, numeric columns, header matching.
pub mod scoring;

/// Markdown rendering of tables.
pub mod markdown;

// Public API - re-exports
pub use error::{Error, Result};
pub use options::{Options, DEFAULT_MIN_ROWS};
pub use result::{CandidateTable, ExtractResult, NodePath, PatternType};

/// Extracts tables from an HTML document.
///
/// Tables with fewer than `min_rows` records are dropped. The result is
/// ordered by confidence, highest first. A page without tabular data gives an
/// empty vector, not an error.
///
/// # Errors
///
/// Returns [`Error::EmptyDocument`] when the input is blank or has no content.
///
/// # Example
///
/// ```rust
/// use rs_tablescout::extract;
///
/// let tables = extract("<p>Just a paragraph.</p>", 3)?;
/// assert!(tables.is_empty());
/// # Ok::<(), rs_tablescout::Error>(())
/// ```
pub fn extract(html: &str, min_rows: usize) -> Result<Vec<CandidateTable>> {
    extract_with_options(html, &Options::with_min_rows(min_rows)).map(|result| result.tables)
}

/// Extracts tables with custom options, returning warnings alongside.
///
/// # Example
///
/// ```rust
/// use rs_tablescout::{extract_with_options, Options, PatternType};
///
/// let html = "<div><p>Name: Ada</p><p>Born: 1815</p><p>Field: Mathematics</p></div>";
/// let options = Options {
///     enabled_patterns: vec![PatternType::KeyValue],
///     parallel: false,
///     ..Options::default()
/// };
/// let result = extract_with_options(html, &options)?;
/// assert_eq!(result.tables[0].header().map(<[String]>::len), Some(3));
/// # Ok::<(), rs_tablescout::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract_with_options(html: &str, options: &Options) -> Result<ExtractResult> {
    extract::extract_tables(html, options)
}
