use thermolog_config::{device_epoch, load_toml};
use rstest::rstest;

#[test]
fn empty_document_uses_defaults() {
    let cfg = load_toml("").expect("parse TOML");
    cfg.validate().expect("defaults are valid");
    assert_eq!(cfg.divider.vref, 3.3);
    assert_eq!(cfg.divider.resistor_ohm, 10e3);
    assert_eq!(cfg.thermistor.rref_ohm, 10e3);
    assert_eq!(cfg.cleaning.max_difference, 60);
    assert_eq!(cfg.cleaning.adc_min_exclusive, 20.0);
    assert_eq!(cfg.cleaning.adc_max, 4095.0);
    assert_eq!(cfg.cleaning.epoch, device_epoch());
    assert_eq!(cfg.logger.n_reads, 100);
}

#[test]
fn parses_full_document() {
    let toml = r#"
[divider]
vref = 3.28
resistor_ohm = 9950.0

[thermistor]
rref_ohm = 2200.0

[cleaning]
max_difference = 25
tz_offset_s = 7200
epoch = "1970-01-01T00:00:00"

[logger]
n_reads = 20
interval_s = 5

[logging]
level = "debug"
rotation = "daily"
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid");
    assert_eq!(cfg.divider.vref, 3.28);
    assert_eq!(cfg.thermistor.rref_ohm, 2200.0);
    assert_eq!(cfg.cleaning.max_difference, 25);
    assert_eq!(cfg.cleaning.tz_offset_s, 7200);
    assert_eq!(cfg.cleaning.epoch.and_utc().timestamp(), 0);
    // untouched keys keep their defaults
    assert_eq!(cfg.cleaning.adc_max, 4095.0);
    assert_eq!(cfg.logger.interval_s, 5);
}

#[rstest]
#[case("[divider]\nvref = 0.0", "divider.vref must be > 0")]
#[case("[divider]\nresistor_ohm = -1.0", "divider.resistor_ohm must be > 0")]
#[case("[thermistor]\nrref_ohm = 0.0", "thermistor.rref_ohm must be > 0")]
#[case(
    "[cleaning]\nadc_min_exclusive = 100.0\nadc_max = 50.0",
    "adc_max must be > cleaning.adc_min_exclusive"
)]
#[case("[cleaning]\ntz_offset_s = 100000", "tz_offset_s is unreasonably large")]
#[case("[logger]\nn_reads = 0", "logger.n_reads must be >= 1")]
#[case("[logger]\ninterval_s = 0", "logger.interval_s must be >= 1")]
#[case("[logging]\nrotation = \"weekly\"", "logging.rotation must be one of")]
fn rejects_invalid_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should be rejected");
    assert!(
        format!("{err}").contains(needle),
        "expected '{needle}' in '{err}'"
    );
}
