use rstest::rstest;
use thermolog_core::{SkipReason, parse_log};

#[rstest]
fn keeps_good_rows_and_reports_the_rest() {
    let log = "\
780000000,2048,2050
780000010,2047.5,2051.25
780000020,2046,2052,17
780000030,,2052
780000040,2045
oops,2045,2053
780000060.0,2044,2054
";
    let parsed = parse_log(log.as_bytes()).unwrap();

    let lines: Vec<u64> = parsed.rows.iter().map(|r| r.line).collect();
    assert_eq!(lines, vec![1, 2, 7]);
    assert_eq!(parsed.rows[1].adc, [2047.5, 2051.25]);
    assert_eq!(parsed.rows[2].timestamp, 780_000_060);

    let skipped: Vec<(u64, SkipReason)> = parsed
        .skipped
        .iter()
        .map(|s| (s.line, s.reason.clone()))
        .collect();
    assert_eq!(
        skipped,
        vec![
            (3, SkipReason::ColumnCount { found: 4 }),
            (4, SkipReason::NotNumeric { column: "adc1" }),
            (5, SkipReason::ColumnCount { found: 2 }),
            (6, SkipReason::NotNumeric { column: "timestamp" }),
        ]
    );
    assert_eq!(parsed.skipped[0].content, "780000020,2046,2052,17");
    assert_eq!(parsed.total_lines(), 7);
}

#[rstest]
#[case("780000000, 2048 , 2050\n", 1)]
#[case("780000000,2048,2050", 1)]
#[case("\n\n780000000,2048,2050\n\n", 1)]
#[case("", 0)]
fn tolerates_whitespace_and_blank_lines(#[case] log: &str, #[case] rows: usize) {
    let parsed = parse_log(log.as_bytes()).unwrap();
    assert_eq!(parsed.rows.len(), rows);
    assert!(parsed.skipped.is_empty());
}

#[rstest]
fn quotes_do_not_merge_lines() {
    let log = "780000000,\"2048,2050\n780000010,2048,2050\n";
    let parsed = parse_log(log.as_bytes()).unwrap();
    assert_eq!(parsed.rows.len(), 1);
    assert_eq!(parsed.rows[0].line, 2);
    assert_eq!(parsed.skipped.len(), 1);
}

#[rstest]
fn skip_reasons_read_well() {
    assert_eq!(
        SkipReason::ColumnCount { found: 4 }.to_string(),
        "expected 3 columns, found 4"
    );
    assert_eq!(
        SkipReason::NotNumeric { column: "adc2" }.to_string(),
        "adc2 is not numeric"
    );
}
