//! Data-logger session: polls ADC channels and appends raw rows to a log file.
//!
//! The session owns its channels, clock and file handle; `open` acquires them
//! and `close` flushes and releases them.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thermolog_traits::{AdcChannel, Clock};

use crate::config::LoggerParams;
use crate::error::LoggerError;

/// One row as written to the log.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedRow {
    pub timestamp: i64,
    pub adc: Vec<f64>,
}

impl LoggedRow {
    fn to_line(&self) -> String {
        let mut line = self.timestamp.to_string();
        for v in &self.adc {
            line.push(',');
            line.push_str(&v.to_string());
        }
        line
    }
}

pub struct LoggingSession<A: AdcChannel, C: Clock> {
    path: PathBuf,
    file: BufWriter<File>,
    channels: Vec<A>,
    clock: C,
    n_reads: u32,
    interval: Duration,
    rows_written: usize,
}

impl<A: AdcChannel, C: Clock> LoggingSession<A, C> {
    /// Open `path` for appending. Existing rows are kept.
    ///
    /// The polling interval is the default 10 s; see [`Self::with_params`].
    pub fn open(
        path: impl AsRef<Path>,
        channels: Vec<A>,
        clock: C,
        n_reads: u32,
    ) -> Result<Self, LoggerError> {
        let params = LoggerParams {
            n_reads,
            ..LoggerParams::default()
        };
        Self::with_params(path, channels, clock, params)
    }

    /// Open with sampling parameters taken from `[logger]`.
    pub fn with_params(
        path: impl AsRef<Path>,
        channels: Vec<A>,
        clock: C,
        params: LoggerParams,
    ) -> Result<Self, LoggerError> {
        let LoggerParams { n_reads, interval } = params;
        if channels.is_empty() {
            return Err(LoggerError::NoChannels);
        }
        if n_reads == 0 {
            return Err(LoggerError::ZeroReads);
        }
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::info!(path = %path.display(), channels = channels.len(), n_reads, "logging session opened");
        Ok(Self {
            path,
            file: BufWriter::new(file),
            channels,
            clock,
            n_reads,
            interval,
            rows_written: 0,
        })
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Average `n_reads` conversions per channel and append one row.
    pub fn poll_once(&mut self) -> Result<LoggedRow, LoggerError> {
        let timestamp = self.clock.epoch_seconds();
        let mut adc = Vec::with_capacity(self.channels.len());
        for (index, ch) in self.channels.iter_mut().enumerate() {
            let mut sum = 0u64;
            for _ in 0..self.n_reads {
                let v = ch.read().map_err(|e| LoggerError::Channel {
                    index,
                    message: e.to_string(),
                })?;
                sum += u64::from(v);
            }
            adc.push(sum as f64 / f64::from(self.n_reads));
        }
        let row = LoggedRow { timestamp, adc };
        writeln!(self.file, "{}", row.to_line())?;
        // Each row must survive a power cut.
        self.file.flush()?;
        self.rows_written += 1;
        tracing::debug!(timestamp, adc = ?row.adc, "row logged");
        Ok(row)
    }

    /// Poll every `interval` until `shutdown` is set; returns rows written by this call.
    pub fn run(&mut self, interval: Duration, shutdown: &AtomicBool) -> Result<usize, LoggerError> {
        let start = self.rows_written;
        while !shutdown.load(Ordering::Relaxed) {
            self.poll_once()?;
            if shutdown.load(Ordering::Relaxed) {
                break;
            }
            self.clock.sleep(interval);
        }
        Ok(self.rows_written - start)
    }

    /// [`Self::run`] at the session's configured interval.
    pub fn run_until(&mut self, shutdown: &AtomicBool) -> Result<usize, LoggerError> {
        self.run(self.interval, shutdown)
    }

    /// Flush and release the log file.
    pub fn close(mut self) -> Result<(), LoggerError> {
        self.file.flush()?;
        tracing::info!(path = %self.path.display(), rows = self.rows_written, "logging session closed");
        Ok(())
    }
}
