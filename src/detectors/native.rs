//! Native `<table>` extraction.
//!
//! Reads real tables directly: header detection, `colspan`/`rowspan`
//! expansion into a full grid, captions. Nested tables are extracted on their
//! own; the outer cell keeps the inner table's text.

use crate::dom::{NodeId, Tree};
use crate::error::Result;
use crate::options::Options;
use crate::result::{CandidateTable, PatternType};

use super::{provenance, Detector};

/// Upper bound on expanded grid cells per table.
const MAX_TABLE_CELLS: usize = 20_000;
/// HTML caps `colspan` at 1000 and `rowspan` at 65534.
const MAX_COLSPAN: usize = 1_000;
const MAX_ROWSPAN: usize = 65_534;

/// Extracts `<table>` elements as candidates with confidence 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeTableExtractor;

impl Detector for NativeTableExtractor {
    fn name(&self) -> &'static str {
        "native_table"
    }

    fn pattern_type(&self) -> PatternType {
        PatternType::NativeTable
    }

    fn detect(&self, tree: &Tree, options: &Options) -> Result<Vec<CandidateTable>> {
        let tables = tree
            .elements()
            .filter(|&id| tree.tag(id) == "table")
            .filter(|&id| !(options.skip_layout_tables && is_layout_table(tree, id)))
            .filter_map(|id| extract_table(tree, id))
            .collect();
        Ok(tables)
    }
}

fn is_layout_table(tree: &Tree, table: NodeId) -> bool {
    tree.attr(table, "role").is_some_and(|role| {
        let role = role.trim();
        role.eq_ignore_ascii_case("presentation") || role.eq_ignore_ascii_case("none")
    })
}

/// Rows owned by `table`, skipping rows of nested tables.
fn own_rows(tree: &Tree, table: NodeId) -> Vec<NodeId> {
    tree.element_descendants(table)
        .filter(|&id| tree.tag(id) == "tr")
        .filter(|&id| tree.nearest_ancestor(id, |a| tree.tag(a) == "table") == Some(table))
        .collect()
}

fn extract_table(tree: &Tree, table: NodeId) -> Option<CandidateTable> {
    let rows = own_rows(tree, table);
    if rows.is_empty() {
        return None;
    }

    let header_row = rows
        .iter()
        .copied()
        .find(|&tr| tree.parent(tr).is_some_and(|p| tree.tag(p) == "thead"))
        .or_else(|| {
            let first = rows[0];
            let mut cells = row_cells(tree, first).peekable();
            let all_th = cells.peek().is_some() && cells.all(|c| tree.tag(c) == "th");
            all_th.then_some(first)
        });

    let grid = expand_grid(tree, &rows);

    let mut header = None;
    let mut data = Vec::new();
    let mut sources = Vec::new();
    for (&tr, cells) in rows.iter().zip(grid) {
        if Some(tr) == header_row {
            header = Some(cells);
            sources.push(tr);
            continue;
        }
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        data.push(cells);
        sources.push(tr);
    }
    if data.is_empty() {
        return None;
    }

    let caption = tree
        .children(table)
        .find(|&c| tree.tag(c) == "caption")
        .map(|c| tree.text(c));

    CandidateTable::new(
        header,
        data,
        PatternType::NativeTable,
        1.0,
        provenance(tree, &sources),
    )
    .map(|t| t.with_caption(caption))
}

fn row_cells(tree: &Tree, tr: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    tree.children(tr)
        .filter(move |&c| matches!(tree.tag(c), "td" | "th"))
}

/// Expand spans so every grid position carries the spanning cell's text.
///
/// Produces one entry per input row (possibly empty once the cell budget is
/// spent).
fn expand_grid(tree: &Tree, rows: &[NodeId]) -> Vec<Vec<String>> {
    let mut grid = Vec::with_capacity(rows.len());
    let mut rowspan: Vec<Option<(usize, String)>> = Vec::new();
    let mut total_cells: usize = 0;

    for &tr in rows {
        let mut row_cells_out: Vec<String> = Vec::new();
        if total_cells >= MAX_TABLE_CELLS {
            grid.push(row_cells_out);
            continue;
        }
        let mut col: usize = 0;

        for cell in row_cells(tree, tr) {
            push_rowspan_cells(&mut rowspan, &mut row_cells_out, &mut col);

            let text = tree.text(cell);
            let colspan = parse_span(tree.attr(cell, "colspan"), MAX_COLSPAN);
            let rowspan_n = parse_span(tree.attr(cell, "rowspan"), MAX_ROWSPAN);

            let need_len = col.saturating_add(colspan);
            if rowspan.len() < need_len {
                rowspan.resize_with(need_len, || None);
            }

            for i in 0..colspan {
                total_cells = total_cells.saturating_add(1);
                if total_cells >= MAX_TABLE_CELLS {
                    break;
                }
                row_cells_out.push(text.clone());
                if rowspan_n > 1 {
                    rowspan[col.saturating_add(i)] = Some((rowspan_n - 1, text.clone()));
                }
            }

            col = col.saturating_add(colspan);
            if total_cells >= MAX_TABLE_CELLS {
                break;
            }
        }

        push_rowspan_cells(&mut rowspan, &mut row_cells_out, &mut col);
        grid.push(row_cells_out);
    }

    grid
}

fn push_rowspan_cells(
    rowspan: &mut [Option<(usize, String)>],
    row_cells: &mut Vec<String>,
    col: &mut usize,
) {
    while *col < rowspan.len() {
        let Some((remaining, val)) = rowspan[*col].take() else {
            break;
        };
        row_cells.push(val.clone());

        let next_remaining = remaining.saturating_sub(1);
        if next_remaining > 0 {
            rowspan[*col] = Some((next_remaining, val));
        }

        *col = col.saturating_add(1);
    }
}

fn parse_span(value: Option<&str>, max: usize) -> usize {
    let Some(value) = value else {
        return 1;
    };
    match value.trim().parse::<usize>() {
        Ok(0) | Err(_) => 1,
        Ok(parsed) => parsed.min(max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    fn detect(html: &str) -> Vec<CandidateTable> {
        let tree = dom::parse(html).expect("tree");
        NativeTableExtractor
            .detect(&tree, &Options::default())
            .expect("native detection")
    }

    #[test]
    fn test_thead_header_and_caption() {
        let tables = detect(
            "<table><caption>Staff</caption>\
             <thead><tr><th>Name</th><th>Age</th></tr></thead>\
             <tbody><tr><td>Ada</td><td>36</td></tr><tr><td>Linus</td><td>28</td></tr></tbody></table>",
        );
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!(t.header(), Some(&["Name".to_string(), "Age".to_string()][..]));
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.caption(), Some("Staff"));
        assert_eq!(t.confidence(), 1.0);
        assert_eq!(t.provenance().len(), 3);
    }

    #[test]
    fn test_first_th_row_is_header_without_thead() {
        let tables = detect("<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>");
        assert_eq!(tables[0].header(), Some(&["A".to_string(), "B".to_string()][..]));
        assert_eq!(tables[0].rows(), &[vec!["1".to_string(), "2".to_string()]]);
    }

    #[test]
    fn test_mixed_first_row_is_data() {
        let tables = detect("<table><tr><th>A</th><td>x</td></tr><tr><td>1</td><td>2</td></tr></table>");
        assert!(tables[0].header().is_none());
        assert_eq!(tables[0].row_count(), 2);
    }

    #[test]
    fn test_spans_are_expanded() {
        let tables = detect(
            "<table>\
             <tr><td rowspan=2>Oslo</td><td colspan=2>Norway</td></tr>\
             <tr><td>0.7M</td><td>1048</td></tr>\
             </table>",
        );
        let rows = tables[0].rows();
        assert_eq!(rows[0], vec!["Oslo", "Norway", "Norway"]);
        assert_eq!(rows[1], vec!["Oslo", "0.7M", "1048"]);
    }

    #[test]
    fn test_nested_tables_are_separate() {
        let tables = detect(
            "<table><tr><td>outer<table><tr><td>inner</td></tr></table></td><td>x</td></tr></table>",
        );
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].row_count(), 1);
        assert_eq!(tables[0].rows()[0][0], "outer inner");
        assert_eq!(tables[1].rows()[0], vec!["inner"]);
    }

    #[test]
    fn test_layout_and_empty_tables_are_skipped() {
        assert!(detect("<table role=presentation><tr><td>a</td><td>b</td></tr></table>").is_empty());
        assert!(detect("<table><tr><td> </td></tr></table><p>x</p>").is_empty());

        let tree = dom::parse("<table role=none><tr><td>a</td></tr></table>").expect("tree");
        let options = Options {
            skip_layout_tables: false,
            ..Options::default()
        };
        let kept = NativeTableExtractor.detect(&tree, &options).expect("detect");
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let tables = detect("<table><tr><td>a</td></tr><tr><td>b</td><td>c</td><td>d</td></tr></table>");
        assert!(tables[0].rows().iter().all(|r| r.len() == 3));
    }

    #[test]
    fn test_parse_span_bounds() {
        assert_eq!(parse_span(None, 10), 1);
        assert_eq!(parse_span(Some("0"), 10), 1);
        assert_eq!(parse_span(Some("abc"), 10), 1);
        assert_eq!(parse_span(Some(" 3 "), 10), 3);
        assert_eq!(parse_span(Some("99999"), 10), 10);
    }
}
