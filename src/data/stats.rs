//! Summary statistics over a recorded session.

use serde::Serialize;
use thiserror::Error;

use crate::source::Snapshot;

/// Errors from statistics computation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    /// The session captured no snapshots; there is nothing to summarize.
    #[error("session captured no snapshots")]
    EmptySession,
}

/// Arithmetic mean, minimum and maximum of one metric series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSummary {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

/// avg/min/max for each of the four tracked metrics.
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub sample_count: usize,
    /// Aggregate CPU utilization, percent.
    pub cpu_percent: MetricSummary,
    /// Virtual memory utilization, percent.
    pub memory_percent: MetricSummary,
    /// Network upload speed, KB/s.
    pub upload_kb: MetricSummary,
    /// Network download speed, KB/s.
    pub download_kb: MetricSummary,
}

/// Reduce a recorded buffer to summary statistics.
///
/// Pure and total over any non-empty buffer. A snapshot missing a metric
/// contributes 0 to that metric's reduction and stays in the denominator,
/// matching how the live display defaults absent values. Gaps are not
/// distinguished from true zeros here.
pub fn summarize(buffer: &[Snapshot]) -> Result<Statistics, StatsError> {
    if buffer.is_empty() {
        return Err(StatsError::EmptySession);
    }

    Ok(Statistics {
        sample_count: buffer.len(),
        cpu_percent: reduce(buffer, |s| s.cpu_percent()),
        memory_percent: reduce(buffer, |s| s.memory_percent()),
        upload_kb: reduce(buffer, |s| s.upload_kb()),
        download_kb: reduce(buffer, |s| s.download_kb()),
    })
}

fn reduce(buffer: &[Snapshot], metric: impl Fn(&Snapshot) -> Option<f64>) -> MetricSummary {
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for snapshot in buffer {
        let value = metric(snapshot).unwrap_or(0.0);
        sum += value;
        min = min.min(value);
        max = max.max(value);
    }

    MetricSummary {
        avg: sum / buffer.len() as f64,
        min,
        max,
    }
}
