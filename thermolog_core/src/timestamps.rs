//! Timestamp repair for logs written by an unreliable device clock.
//!
//! A width-3 window slides over the sequence one position at a time. Two
//! glitches are recognised:
//!
//! - **too small**: the window's last value is its minimum (the clock went
//!   backwards). It is replaced by a linear extrapolation from the first two.
//! - **too large**: the window's middle value is its maximum (a forward
//!   spike). It is replaced by the mean of its neighbours, and its index is
//!   marked for deletion when `w[0] + w[2]` exceeds `max_difference`.
//!
//! Corrections are written back into the slice before the window moves on, so
//! every window observes the repairs made by the windows before it. The scan
//! is inherently sequential.

/// Outcome of one repair pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Indices to drop from the parallel record sequence, ascending.
    pub deletions: Vec<usize>,
    /// Windows in which the too-small correction fired.
    pub too_small: usize,
    /// Windows in which the too-large correction fired.
    pub too_large: usize,
}

/// Repair `timestamps` in place and return the indices to delete.
pub fn repair_timestamps(timestamps: &mut [i64], max_difference: i64) -> Vec<usize> {
    repair_with_report(timestamps, max_difference).deletions
}

/// Like [`repair_timestamps`], also counting the corrections applied.
pub fn repair_with_report(timestamps: &mut [i64], max_difference: i64) -> RepairReport {
    let mut report = RepairReport::default();
    let n = timestamps.len();
    if n < 3 {
        return report;
    }

    for i in 1..n - 1 {
        let mut w = [timestamps[i - 1], timestamps[i], timestamps[i + 1]];

        if min3(w) == w[2] {
            let fixed = extrapolate(w[0], w[1]);
            tracing::debug!(index = i + 1, from = w[2], to = fixed, "timestamp too small");
            timestamps[i + 1] = fixed;
            w[2] = fixed;
            report.too_small += 1;
        }

        if max3(w) == w[1] {
            // Literal sum of the neighbours, not a gap.
            let s = i128::from(w[0]) + i128::from(w[2]);
            let fixed = floor_avg(w[0], w[2]);
            if s > i128::from(max_difference) {
                report.deletions.push(i);
            }
            tracing::debug!(index = i, from = w[1], to = fixed, "timestamp too large");
            timestamps[i] = fixed;
            report.too_large += 1;
        }
    }

    report
}

#[inline]
fn min3(w: [i64; 3]) -> i64 {
    w[0].min(w[1]).min(w[2])
}

#[inline]
fn max3(w: [i64; 3]) -> i64 {
    w[0].max(w[1]).max(w[2])
}

/// `b + (b - a)`, saturating at the i64 range.
#[inline]
fn extrapolate(a: i64, b: i64) -> i64 {
    let v = 2 * i128::from(b) - i128::from(a);
    v.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// Mean of two values rounded towards negative infinity.
/// Uses 128-bit intermediates; cannot overflow and the mean fits in i64.
#[inline]
fn floor_avg(a: i64, b: i64) -> i64 {
    (i128::from(a) + i128::from(b)).div_euclid(2) as i64
}
