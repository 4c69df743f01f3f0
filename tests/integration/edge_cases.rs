//! Edge cases: nested and spanned tables, entities, sizes and thresholds.

use rs_tablescout::{extract, extract_with_options, Options, PatternType};

use super::has_column;

#[test]
fn nested_data_table_inside_layout_table() {
    let html = r#"
        <table>
          <tr>
            <td>
              <table>
                <tr><th>Fruit</th><th>Price</th></tr>
                <tr><td>Apple</td><td>1.20</td></tr>
                <tr><td>Pear</td><td>1.50</td></tr>
                <tr><td>Plum</td><td>2.10</td></tr>
              </table>
            </td>
          </tr>
        </table>
    "#;

    let tables = extract(html, 3).expect("extraction should succeed");
    assert_eq!(tables.len(), 1, "got {tables:#?}");
    assert_eq!(tables[0].pattern_type(), PatternType::NativeTable);
    assert_eq!(tables[0].column(0), vec!["Apple", "Pear", "Plum"]);
    assert_eq!(tables[0].column(1), vec!["1.20", "1.50", "2.10"]);
}

#[test]
fn nested_data_table_inside_data_table() {
    let html = r#"
        <table>
          <tr><th>Quarter</th><th>Basket</th></tr>
          <tr><td>Q1</td><td>Apples only</td></tr>
          <tr>
            <td>Q2</td>
            <td>
              <table>
                <tr><th>Fruit</th><th>Price</th></tr>
                <tr><td>Apple</td><td>1.20</td></tr>
                <tr><td>Pear</td><td>1.50</td></tr>
                <tr><td>Plum</td><td>2.10</td></tr>
              </table>
            </td>
          </tr>
          <tr><td>Q3</td><td>Pears only</td></tr>
        </table>
    "#;

    let tables = extract(html, 3).expect("extraction should succeed");
    assert_eq!(tables.len(), 2, "got {tables:#?}");
    assert!(tables.iter().all(|t| t.pattern_type() == PatternType::NativeTable));
    assert_eq!(tables[0].column(0), vec!["Q1", "Q2", "Q3"]);
    assert_eq!(tables[1].column(0), vec!["Apple", "Pear", "Plum"]);
    assert_eq!(tables[1].column(1), vec!["1.20", "1.50", "2.10"]);
}

#[test]
fn spanned_cells_fill_the_grid() {
    let html = r#"
        <table>
          <thead><tr><th>Region</th><th>City</th><th>Population</th></tr></thead>
          <tbody>
            <tr><td rowspan="2">West</td><td>Bergen</td><td>291 000</td></tr>
            <tr><td>Stavanger</td><td>144 000</td></tr>
            <tr><td colspan="2">Total</td><td>435 000</td></tr>
          </tbody>
        </table>
    "#;

    let tables = extract(html, 3).expect("extraction should succeed");
    let table = &tables[0];
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.rows()[1], vec!["West", "Stavanger", "144 000"]);
    assert_eq!(table.rows()[2], vec!["Total", "Total", "435 000"]);
}

#[test]
fn entities_and_unicode_are_decoded() {
    let html = "<table>\
        <tr><th>Team</th><th>City</th></tr>\
        <tr><td>R&amp;D</td><td>Tromsø</td></tr>\
        <tr><td>Sales&nbsp;EU</td><td>Zürich</td></tr>\
        <tr><td>日本チーム</td><td>東京</td></tr>\
        </table>";

    let tables = extract(html, 3).expect("extraction should succeed");
    assert_eq!(tables[0].column(0), vec!["R&D", "Sales EU", "日本チーム"]);
    assert_eq!(tables[0].column(1), vec!["Tromsø", "Zürich", "東京"]);
}

#[test]
fn whitespace_is_normalized_in_cells() {
    let html = "<ul>\
        <li><b>  Alpha\n\t one </b><i> 1 </i></li>\
        <li><b>Beta   two</b><i>2</i></li>\
        <li><b>Gamma\nthree</b><i>3</i></li>\
        </ul>";

    let tables = extract(html, 3).expect("extraction should succeed");
    let table = tables
        .iter()
        .find(|t| t.pattern_type() == PatternType::StructuralRepeat)
        .expect("structural table");
    assert!(has_column(table, &["Alpha one", "Beta two", "Gamma three"]));
    assert!(has_column(table, &["1", "2", "3"]));
}

#[test]
fn large_table_keeps_every_row() {
    let mut html = String::from("<table><tr><th>Id</th><th>Square</th></tr>");
    for i in 0..1_000 {
        html.push_str(&format!("<tr><td>{i}</td><td>{}</td></tr>", i * i));
    }
    html.push_str("</table>");

    let tables = extract(&html, 3).expect("extraction should succeed");
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].row_count(), 1_000);
    assert_eq!(tables[0].rows()[999], vec!["999", "998001"]);
}

#[test]
fn zero_min_rows_still_needs_a_group() {
    let tables = extract("<div><p>One lonely paragraph.</p></div>", 0).expect("extraction should succeed");
    assert!(tables.is_empty());
}

#[test]
fn header_promotion_on_headerless_table() {
    let html = "<table>\
        <tr><td>Name</td><td>Score</td></tr>\
        <tr><td>Ann</td><td>12</td></tr>\
        <tr><td>Ben</td><td>9</td></tr>\
        <tr><td>Cy</td><td>15</td></tr>\
        </table>";

    let tables = extract(html, 3).expect("extraction should succeed");
    assert_eq!(tables[0].header(), None);
    let promoted = tables[0].with_first_row_as_header().expect("enough rows");
    assert_eq!(promoted.header(), Some(&["Name".to_string(), "Score".to_string()][..]));
    assert_eq!(promoted.row_count(), 3);
}

#[test]
fn raised_dedup_threshold_keeps_overlapping_candidates() {
    let html = r#"
        <table>
          <tr><td><b>Oslo</b></td><td>709 000</td></tr>
          <tr><td><b>Bergen</b></td><td>291 000</td></tr>
          <tr><td><b>Trondheim</b></td><td>212 000</td></tr>
        </table>
    "#;

    let strict = extract_with_options(html, &Options::default()).expect("extraction should succeed");
    assert_eq!(strict.tables.len(), 1);

    let lenient = Options {
        dedup_threshold: 1.0,
        ..Options::default()
    };
    let result = extract_with_options(html, &lenient).expect("extraction should succeed");
    assert!(result.tables.len() > 1);
    assert_eq!(result.tables[0].pattern_type(), PatternType::NativeTable);
}
