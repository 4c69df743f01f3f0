//! Integration tests for rs-tablescout
//!
//! These tests run the complete extraction pipeline end-to-end on realistic
//! page layouts and on markup edge cases.

mod edge_cases;
mod real_world_pages;

use rs_tablescout::CandidateTable;

/// Whether any column of the table holds exactly these values.
pub fn has_column(table: &CandidateTable, expected: &[&str]) -> bool {
    (0..table.column_count()).any(|i| table.column(i) == expected)
}
