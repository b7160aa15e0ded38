//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use thermolog_core::error::{BuildError, CalibrationError, PipelineError};

    // Typed matches first
    if let Some(ce) = err.downcast_ref::<CalibrationError>() {
        return match ce {
            CalibrationError::NoConvergence(why) => format!(
                "What happened: The ADC calibration fit did not converge ({why}).\nLikely causes: All calibration rows share the same ADC readout, or the values are degenerate.\nHow to fix: Measure the divider at several clearly different voltages and add them to the calibration table."
            ),
            CalibrationError::TooFewSamples(n) => format!(
                "What happened: The calibration table has only {n} usable row(s).\nLikely causes: Empty or truncated calibration file.\nHow to fix: Provide at least two measurements (adc,voltage)."
            ),
            CalibrationError::InvalidUncertainty { index, value } => format!(
                "What happened: Calibration row {} has uncertainty {value}.\nLikely causes: A zero or negative entry in the uncertainty column.\nHow to fix: Use positive one-sigma voltage uncertainties, or drop the column.",
                index + 2
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: Malformed calibration table.\nHow to fix: Check the calibration CSV for non-numeric or infinite values."
            ),
        };
    }

    if let Some(BuildError::InvalidConfig(why)) = err.downcast_ref::<BuildError>() {
        return format!(
            "What happened: Configuration is invalid ({why}).\nLikely causes: A divider, thermistor or ADC bound value the model cannot use.\nHow to fix: Correct the [divider], [thermistor] or [cleaning] section of the config."
        );
    }

    if let Some(pe) = err.downcast_ref::<PipelineError>() {
        return format!(
            "What happened: {pe}.\nLikely causes: The log file is unreadable or the output path is not writable.\nHow to fix: Check the paths and permissions, then rerun."
        );
    }

    // String-based heuristics for errors coming from config and file loading
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("calibration csv must have headers") {
        return "Invalid headers in calibration CSV. Expected 'adc,voltage' or 'adc,voltage,uncertainty'.".to_string();
    }

    if lower.contains("open calibration csv") {
        return format!(
            "What happened: The calibration file could not be opened.\nLikely causes: Wrong path or missing permissions.\nHow to fix: Check the --calibration argument. Original: {msg}"
        );
    }

    if lower.contains("invalid configuration") {
        return format!(
            "What happened: Configuration is invalid.\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file and try again. Original: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Calibration failures get a dedicated exit code; everything else is 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use thermolog_core::error::CalibrationError;
    if err.downcast_ref::<CalibrationError>().is_some() {
        return 3;
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    use thermolog_core::error::CalibrationError;

    let reason = if err.downcast_ref::<CalibrationError>().is_some() {
        "CalibrationFit"
    } else {
        "Error"
    };
    json!({ "reason": reason, "message": humanize(err) }).to_string()
}
