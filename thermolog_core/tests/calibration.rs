use rstest::rstest;
use thermolog_core::{CalibrationError, CalibrationSample, fit_linear, fit_parallel};

#[rstest]
fn recovers_gradient_and_offset_from_clean_line() {
    // Ground truth: voltage = 2.0*adc + 1.0 with negligible noise
    let samples: Vec<CalibrationSample> = (0..50)
        .map(|i| {
            let adc = f64::from(i) * 80.0;
            let noise = (f64::from(i) * 37.0).sin() * 1e-9;
            CalibrationSample::new(adc, 2.0 * adc + 1.0 + noise)
        })
        .collect();
    let c = fit_linear(&samples).unwrap();
    assert!((c.gradient() - 2.0).abs() < 1e-6, "gradient {}", c.gradient());
    assert!((c.offset() - 1.0).abs() < 1e-6, "offset {}", c.offset());
    assert!(c.residual_rms() < 1e-6);
}

#[rstest]
fn identical_adc_readings_do_not_converge() {
    let samples = vec![
        CalibrationSample::new(512.0, 0.40),
        CalibrationSample::new(512.0, 0.42),
        CalibrationSample::new(512.0, 0.41),
    ];
    let err = fit_linear(&samples).expect_err("zero spread must fail");
    assert!(matches!(err, CalibrationError::NoConvergence(_)), "{err:?}");
}

#[rstest]
#[case(vec![], CalibrationError::TooFewSamples(0))]
#[case(vec![CalibrationSample::new(1.0, 1.0)], CalibrationError::TooFewSamples(1))]
#[case(
    vec![CalibrationSample::new(1.0, 1.0), CalibrationSample::new(f64::NAN, 2.0)],
    CalibrationError::NonFinite(1)
)]
#[case(
    vec![
        CalibrationSample { adc: 1.0, voltage: 1.0, uncertainty: Some(0.0) },
        CalibrationSample::new(2.0, 2.0),
    ],
    CalibrationError::InvalidUncertainty { index: 0, value: 0.0 }
)]
fn rejects_unusable_tables(#[case] samples: Vec<CalibrationSample>, #[case] expected: CalibrationError) {
    assert_eq!(fit_linear(&samples).unwrap_err(), expected);
}

#[rstest]
fn parallel_inputs_must_match_in_length() {
    let err = fit_parallel(&[1.0, 2.0, 3.0], &[1.0, 2.0], None).unwrap_err();
    assert_eq!(err, CalibrationError::LengthMismatch { adc: 3, voltage: 2 });
}

#[rstest]
fn uncertainties_weight_the_fit() {
    // Four points on voltage = 0.001*adc, one far-off point with a huge sigma.
    let adc = [500.0, 1000.0, 1500.0, 2000.0, 2500.0];
    let voltage = [0.5, 1.0, 1.5, 2.0, 3.5];
    let sigma = [0.01, 0.01, 0.01, 0.01, 100.0];

    let weighted = fit_parallel(&adc, &voltage, Some(&sigma)).unwrap();
    assert!((weighted.gradient() - 0.001).abs() < 1e-6, "{}", weighted.gradient());
    assert!(weighted.offset().abs() < 1e-3, "{}", weighted.offset());

    let unweighted = fit_parallel(&adc, &voltage, None).unwrap();
    assert!((unweighted.gradient() - 0.001).abs() > 1e-4);
}

#[rstest]
fn residuals_compare_measured_and_fitted() {
    let samples = vec![
        CalibrationSample::new(0.0, 0.0),
        CalibrationSample::new(1.0, 1.0),
        CalibrationSample::new(2.0, 2.0),
        CalibrationSample::new(3.0, 3.3),
    ];
    let c = fit_linear(&samples).unwrap();
    let res = c.residuals(&samples);
    assert_eq!(res.len(), 4);
    for r in &res {
        assert!((r.measured_v - r.fitted_v - r.residual_v).abs() < 1e-12);
    }
    // least squares residuals sum to zero with unit weights
    let sum: f64 = res.iter().map(|r| r.residual_v).sum();
    assert!(sum.abs() < 1e-9);
    assert!(c.residual_rms() > 0.0);
}
