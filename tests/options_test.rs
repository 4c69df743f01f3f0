use rs_tablescout::{extract_with_options, Options, PatternType, DEFAULT_MIN_ROWS};

const MIXED_PAGE: &str = r#"
<html><body>
  <table>
    <tr><th>Year</th><th>Sales</th></tr>
    <tr><td>2021</td><td>1 200</td></tr>
    <tr><td>2022</td><td>1 450</td></tr>
    <tr><td>2023</td><td>1 610</td></tr>
  </table>
  <div class="specs">
    <p>Weight: 1.2 kg</p>
    <p>Colour: Red</p>
    <p>Warranty: 2 years</p>
  </div>
</body></html>
"#;

fn patterns(options: &Options) -> Vec<PatternType> {
    extract_with_options(MIXED_PAGE, options)
        .expect("extraction should succeed")
        .tables
        .iter()
        .map(|t| t.pattern_type())
        .collect()
}

#[test]
fn options_default_values_are_sensible() {
    let options = Options::default();
    assert_eq!(options.min_rows, DEFAULT_MIN_ROWS);
    assert_eq!(options.min_columns, 2);
    assert_eq!(options.min_group_size, 2);
    assert!((options.dedup_threshold - 0.5).abs() < f64::EPSILON);
    assert!(options.skip_layout_tables);
    assert!(options.parallel);
    assert_eq!(options.enabled_patterns, PatternType::ALL.to_vec());
}

#[test]
fn options_struct_update_syntax_overrides_selected_fields_only() {
    let options = Options {
        min_rows: 7,
        parallel: false,
        ..Options::default()
    };

    assert_eq!(options.min_rows, 7);
    assert!(!options.parallel);
    assert_eq!(options.min_group_size, Options::default().min_group_size);
    assert_eq!(Options::with_min_rows(7).min_rows, 7);
}

#[test]
fn default_options_find_table_and_key_values() {
    let found = patterns(&Options::default());
    assert!(found.contains(&PatternType::NativeTable));
    assert!(found.contains(&PatternType::KeyValue));
}

#[test]
fn enabled_patterns_restricts_detectors() {
    let only_kv = Options {
        enabled_patterns: vec![PatternType::KeyValue],
        ..Options::default()
    };
    assert_eq!(patterns(&only_kv), vec![PatternType::KeyValue]);

    let none = Options {
        enabled_patterns: Vec::new(),
        ..Options::default()
    };
    assert!(patterns(&none).is_empty());
}

#[test]
fn min_rows_drops_short_tables() {
    let strict = Options::with_min_rows(5);
    assert!(patterns(&strict).is_empty());
}

#[test]
fn layout_tables_are_skipped_unless_disabled() {
    let html = r#"<table role="presentation">
        <tr><td>Menu</td><td>Body</td></tr>
        <tr><td>Links</td><td>Text</td></tr>
        <tr><td>More</td><td>Stuff</td></tr>
    </table>"#;
    let native_only = Options {
        enabled_patterns: vec![PatternType::NativeTable],
        ..Options::default()
    };
    let result = extract_with_options(html, &native_only).expect("extraction should succeed");
    assert!(result.tables.is_empty());

    let keep_layout = Options {
        skip_layout_tables: false,
        ..native_only
    };
    let result = extract_with_options(html, &keep_layout).expect("extraction should succeed");
    assert_eq!(result.tables.len(), 1);
}

#[test]
fn parallel_and_sequential_agree() {
    let sequential = Options {
        parallel: false,
        ..Options::default()
    };
    let a = extract_with_options(MIXED_PAGE, &Options::default()).expect("parallel run");
    let b = extract_with_options(MIXED_PAGE, &sequential).expect("sequential run");
    assert_eq!(a, b);
}

#[test]
fn options_deserialize_from_partial_json() {
    let options: Options =
        serde_json::from_str(r#"{"min_rows": 5, "enabled_patterns": ["native_table", "key_value"]}"#)
            .expect("valid options");

    assert_eq!(options.min_rows, 5);
    assert_eq!(
        options.enabled_patterns,
        vec![PatternType::NativeTable, PatternType::KeyValue]
    );
    assert_eq!(options.min_group_size, Options::default().min_group_size);

    let json = serde_json::to_string(&options).expect("serializable");
    let back: Options = serde_json::from_str(&json).expect("round trip");
    assert_eq!(back, options);
}
