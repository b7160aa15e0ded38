#![no_main]
use libfuzzer_sys::fuzz_target;
use thermolog_core::{CalibrationCurve, Pipeline, parse_log};

fuzz_target!(|data: &[u8]| {
    let Ok(parsed) = parse_log(data) else {
        return;
    };
    let curve = CalibrationCurve::from_parameters(3.3 / 4096.0, 0.0);
    let series = Pipeline::new(curve).run(&parsed);

    assert_eq!(series.diagnostics.malformed, parsed.skipped.len());
    assert_eq!(
        series.records.len() + series.diagnostics.total_dropped(),
        parsed.total_lines()
    );
    assert!(series
        .records
        .iter()
        .all(|r| r.temperature_c.iter().all(|t| t.is_finite())));
});
