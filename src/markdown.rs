//! Markdown rendering of extracted tables.
//!
//! Produces GitHub Flavored Markdown tables with padded columns. Numeric
//! columns are right-aligned.

use crate::result::CandidateTable;
use crate::scoring::numeric_columns;

/// Characters that have special meaning in Markdown and need escaping.
const MARKDOWN_SPECIAL_CHARS: &[char] = &['\\', '*', '_', '[', ']', '<', '>', '|'];

/// Escape Markdown special characters in cell text.
///
/// # Characters Escaped
///
/// - `\` → `\\` (backslash)
/// - `*` → `\*` (asterisk - prevents italic/bold)
/// - `_` → `\_` (underscore - prevents italic/bold)
/// - `[` → `\[` (bracket - prevents links)
/// - `]` → `\]` (bracket - prevents links)
/// - `<` → `\<` (angle bracket - prevents HTML)
/// - `>` → `\>` (angle bracket - prevents blockquotes)
/// - `|` → `\|` (pipe - prevents cell breaks)
///
/// # Examples
///
/// ```
/// use rs_tablescout::markdown::escape_markdown;
///
/// assert_eq!(escape_markdown("*not italic*"), r"\*not italic\*");
/// assert_eq!(escape_markdown("a | b"), r"a \| b");
/// ```
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 4);

    for ch in text.chars() {
        if MARKDOWN_SPECIAL_CHARS.contains(&ch) {
            result.push('\\');
        }
        result.push(ch);
    }

    result
}

/// Render a table as GitHub Flavored Markdown.
///
/// The header row is the table's header, or `column_N` names when it has
/// none. A caption, if any, is emitted as an italic line above the table.
///
/// # Output Format
///
/// ```text
/// | City   | Population |
/// | ------ | ---------: |
/// | Oslo   |    709 000 |
/// ```
#[must_use]
pub fn table_to_markdown(table: &CandidateTable) -> String {
    let col_count = table.column_count();
    if col_count == 0 {
        return String::new();
    }

    let header: Vec<String> = match table.header() {
        Some(header) => header.iter().map(|h| escape_markdown(h)).collect(),
        None => (1..=col_count).map(|i| format!("column_{i}")).collect(),
    };
    let rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(|c| escape_markdown(c)).collect())
        .collect();

    let alignments: Vec<Alignment> = numeric_columns(table)
        .into_iter()
        .map(|numeric| if numeric { Alignment::Right } else { Alignment::None })
        .collect();

    // Minimum width for ---
    let mut col_widths: Vec<usize> = vec![3; col_count];
    for row in std::iter::once(&header).chain(rows.iter()) {
        for (i, cell) in row.iter().enumerate() {
            if i < col_widths.len() {
                col_widths[i] = col_widths[i].max(cell.chars().count());
            }
        }
    }

    let mut output = String::new();
    if let Some(caption) = table.caption() {
        output.push('*');
        output.push_str(&escape_markdown(caption));
        output.push_str("*\n\n");
    }

    push_row(&mut output, &header, &col_widths, &alignments);
    output.push('|');
    for (col_idx, &width) in col_widths.iter().enumerate() {
        let align = alignments.get(col_idx).copied().unwrap_or(Alignment::None);
        output.push_str(&format_separator(width, align));
        output.push('|');
    }
    output.push('\n');

    for row in &rows {
        push_row(&mut output, row, &col_widths, &alignments);
    }

    output
}

fn push_row(output: &mut String, row: &[String], col_widths: &[usize], alignments: &[Alignment]) {
    output.push('|');
    for (col_idx, &width) in col_widths.iter().enumerate() {
        let cell = row.get(col_idx).map_or("", String::as_str);
        let align = alignments.get(col_idx).copied().unwrap_or(Alignment::None);
        output.push(' ');
        output.push_str(&pad_cell(cell, width, align));
        output.push_str(" |");
    }
    output.push('\n');
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alignment {
    None,
    Right,
}

fn format_separator(width: usize, align: Alignment) -> String {
    let dashes = width.max(3);
    match align {
        Alignment::Right => format!(" {}: ", "-".repeat(dashes - 1)),
        Alignment::None => format!(" {} ", "-".repeat(dashes)),
    }
}

fn pad_cell(text: &str, width: usize, align: Alignment) -> String {
    let text_len = text.chars().count();
    if text_len >= width {
        return text.to_string();
    }

    let padding = width - text_len;
    match align {
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        Alignment::None => format!("{}{}", text, " ".repeat(padding)),
    }
}
