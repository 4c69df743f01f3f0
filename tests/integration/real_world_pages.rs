//! Page layouts seen in the wild: listings, job boards, infoboxes.

use rs_tablescout::{extract, PatternType};

use super::has_column;

const LISTING_PAGE: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Apartments for sale</title>
  <style>.price { font-weight: bold; }</style>
</head>
<body>
  <nav><a href="/">Home</a> | <a href="/sale">For sale</a> | <a href="/rent">Rent</a></nav>
  <main>
    <h1>Apartments for sale</h1>
    <ul class="products">
      <li class="product"><a href="/p/1">Harbour flat</a><span class="price">2 400 000 kr</span><span class="area">54 m²</span></li>
      <li class="product"><a href="/p/2">Garden house</a><span class="price">3 100 000 kr</span><span class="area">88 m²</span></li>
      <li class="product"><a href="/p/3">City loft</a><span class="price">2 900 000 kr</span><span class="area">61 m²</span></li>
      <li class="product"><a href="/p/4">Old mill</a><span class="price">4 750 000 kr</span><span class="area">140 m²</span></li>
    </ul>
    <dl>
      <dt>Agent</dt><dd>Nordic Homes</dd>
      <dt>Phone</dt><dd>+47 22 00 00 00</dd>
      <dt>Listed</dt><dd>2024-03-15</dd>
    </dl>
  </main>
  <footer><p>Copyright 2024 Nordic Homes</p></footer>
  <script>window.analytics = [1, 2, 3];</script>
</body>
</html>
"#;

#[test]
fn listing_cards_and_agent_details() {
    let tables = extract(LISTING_PAGE, 3).expect("extraction should succeed");

    let cards = tables
        .iter()
        .find(|t| has_column(t, &["Harbour flat", "Garden house", "City loft", "Old mill"]))
        .expect("listing cards");
    assert_eq!(cards.pattern_type(), PatternType::StructuralRepeat);
    assert_eq!(cards.row_count(), 4);
    assert!(has_column(cards, &["54 m²", "88 m²", "61 m²", "140 m²"]));
    let header = cards.header().expect("slot header");
    assert!(header.iter().any(|h| h == "price"), "header: {header:?}");

    let agent = tables
        .iter()
        .find(|t| t.pattern_type() == PatternType::KeyValue)
        .expect("agent details");
    assert_eq!(
        agent.header(),
        Some(&["Agent".to_string(), "Phone".to_string(), "Listed".to_string()][..])
    );
    assert_eq!(agent.rows()[0][2], "2024-03-15");
}

#[test]
fn listing_page_ignores_navigation_and_scripts() {
    let tables = extract(LISTING_PAGE, 3).expect("extraction should succeed");
    assert_eq!(tables.len(), 2, "got {tables:#?}");
    for table in &tables {
        assert!(table.provenance().iter().all(|p| !p.as_str().contains("/nav[")));
        assert!(table.rows().iter().flatten().all(|cell| !cell.contains("analytics")));
    }
}

#[test]
fn job_board_records_split_across_wrappers() {
    let html = r#"
        <html><body><main>
          <div class="row"><article class="job"><h2>Welder</h2><span class="city">Bergen</span></article></div>
          <div class="row"><article class="job"><h2>Baker</h2><span class="city">Oslo</span></article></div>
          <div class="row"><article class="job"><h2>Pilot</h2><em>remote</em><span class="city">Tromsø</span></article></div>
        </main></body></html>
    "#;

    let tables = extract(html, 3).expect("extraction should succeed");
    let jobs = tables
        .iter()
        .find(|t| has_column(t, &["Welder", "Baker", "Pilot"]))
        .expect("job records");
    assert_eq!(jobs.pattern_type(), PatternType::ClassGroup);
    assert!(has_column(jobs, &["Bergen", "Oslo", "Tromsø"]));
    assert!(jobs.confidence() < 1.0);
}

#[test]
fn infobox_table_is_read_as_rows_of_pairs() {
    let html = r#"
        <table class="infobox">
          <caption>Ada Lovelace</caption>
          <tr><th>Born</th><td>10 December 1815</td></tr>
          <tr><th>Died</th><td>27 November 1852</td></tr>
          <tr><th>Known for</th><td>Analytical Engine</td></tr>
          <tr><th>Field</th><td>Mathematics</td></tr>
        </table>
    "#;

    let tables = extract(html, 3).expect("extraction should succeed");
    assert_eq!(tables.len(), 1, "got {tables:#?}");
    let infobox = &tables[0];
    assert_eq!(infobox.pattern_type(), PatternType::NativeTable);
    assert_eq!(infobox.caption(), Some("Ada Lovelace"));
    assert_eq!(infobox.header(), None);
    assert_eq!(infobox.column(0), vec!["Born", "Died", "Known for", "Field"]);
}

#[test]
fn div_soup_blocks_are_grouped_visually() {
    let html = r#"
        <section>
          <div>Harbour flat<br>Price: 2 400 000 kr | 54 m²</div>
          <p>Garden house<br>Price: 3 100 000 kr | 88 m²</p>
          <div>City loft<br>Price: 2 900 000 kr | 61 m²</div>
        </section>
    "#;

    let tables = extract(html, 3).expect("extraction should succeed");
    let blocks = tables
        .iter()
        .find(|t| t.pattern_type() == PatternType::VisualBlock)
        .expect("visual block table");
    assert_eq!(blocks.row_count(), 3);
    assert!(has_column(blocks, &["2 400 000 kr", "3 100 000 kr", "2 900 000 kr"]));
}
