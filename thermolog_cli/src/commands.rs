//! Subcommand bodies: config mapping, file loading, output.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use eyre::{Result, WrapErr};
use thermolog_config::Config;
use thermolog_core::{
    CalibrationCurve, CalibrationSample, CleanSeries, Pipeline, fit_linear, parse_log,
    write_residuals_csv,
};

fn load_samples(path: &Path) -> Result<Vec<CalibrationSample>> {
    let rows = thermolog_config::load_calibration_csv(path)?;
    Ok(rows.iter().map(CalibrationSample::from).collect())
}

/// Fit the calibration table; a failed fit aborts the run.
fn fit(path: &Path) -> Result<(Vec<CalibrationSample>, CalibrationCurve)> {
    let samples = load_samples(path)?;
    let curve = fit_linear(&samples)?;
    tracing::info!(
        gradient = curve.gradient(),
        offset = curve.offset(),
        residual_rms = curve.residual_rms(),
        "ADC response calibrated"
    );
    Ok((samples, curve))
}

pub fn run_clean(
    cfg: &Config,
    data: &Path,
    calibration: &Path,
    output: Option<&Path>,
    label: &str,
    json: bool,
) -> Result<()> {
    let (_, curve) = fit(calibration)?;

    let file = File::open(data).wrap_err_with(|| format!("open data file {}", data.display()))?;
    let parsed = parse_log(BufReader::new(file))?;

    let pipeline = Pipeline::from_config(cfg, curve)?;
    let series = pipeline.run(&parsed);
    warn_dropped(&series);

    let labels = [format!("{label}_1"), format!("{label}_2")];
    let labels = [labels[0].as_str(), labels[1].as_str()];

    if let Some(out) = output {
        let f = File::create(out).wrap_err_with(|| format!("create output {}", out.display()))?;
        series.write_csv(BufWriter::new(f), labels)?;
        tracing::info!(path = %out.display(), records = series.records.len(), "series written");
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut w = BufWriter::new(stdout.lock());
    if json {
        for r in &series.records {
            writeln!(w, "{}", serde_json::to_string(r)?)?;
        }
    } else {
        writeln!(
            w,
            "{:<19}  {:>12}  {:>12}",
            "time",
            format!("{} [C]", labels[0]),
            format!("{} [C]", labels[1])
        )?;
        for r in &series.records {
            writeln!(
                w,
                "{:<19}  {:>12.2}  {:>12.2}",
                r.time.format("%Y-%m-%d %H:%M:%S").to_string(),
                r.temperature_c[0],
                r.temperature_c[1]
            )?;
        }
    }
    w.flush()?;
    Ok(())
}

/// One summary event covering every row that did not survive cleaning.
fn warn_dropped(series: &CleanSeries) {
    let d = &series.diagnostics;
    if d.total_dropped() == 0 {
        return;
    }
    tracing::warn!(
        total = d.total_dropped(),
        malformed = d.malformed,
        implausible_timestamp = d.implausible_timestamp,
        out_of_range = d.out_of_range,
        non_finite = d.non_finite,
        "rows dropped during cleaning"
    );
}

pub fn run_calibrate(calibration: &Path, output: Option<&Path>, json: bool) -> Result<()> {
    let (samples, curve) = fit(calibration)?;
    let residuals = curve.residuals(&samples);

    if let Some(out) = output {
        let f = File::create(out).wrap_err_with(|| format!("create output {}", out.display()))?;
        write_residuals_csv(&residuals, BufWriter::new(f))?;
    }

    if json {
        println!(
            "{}",
            serde_json::json!({
                "gradient": curve.gradient(),
                "offset": curve.offset(),
                "residual_rms": curve.residual_rms(),
                "samples": samples.len(),
            })
        );
    } else {
        println!("gradient: {:.6e} V/count", curve.gradient());
        println!("offset: {:.6} V", curve.offset());
        println!("residual rms: {:.6} V ({} samples)", curve.residual_rms(), samples.len());
    }
    Ok(())
}
