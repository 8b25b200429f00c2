//! Session report generation.
//!
//! Turns a completed recording plus its computed statistics into a JSON
//! report document. The report carries the raw snapshot sequence, the
//! summary statistics, the host identification from the first captured
//! snapshot, and a rendered trend chart of the live histories. The only
//! fallible step after building is the file write; its error surfaces
//! as a status message, never as a crash.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Result};

use super::history::{MetricHistories, RingHistory};
use super::stats::Statistics;
use crate::source::Snapshot;

const SPARK_LEVELS: &[char] = &['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Build the report document for a completed session.
///
/// `snapshots` must be non-empty; callers gate on the session having
/// captured data before requesting an export.
pub fn build(
    snapshots: &[Snapshot],
    stats: &Statistics,
    histories: &MetricHistories,
) -> Result<serde_json::Value> {
    if snapshots.is_empty() {
        bail!("no captured snapshots to report");
    }

    let mut report = serde_json::Map::new();

    // Host identification from the first captured snapshot
    if let Some(system) = &snapshots[0].system {
        report.insert("system".to_string(), serde_json::to_value(system)?);
    }

    let mut session = serde_json::Map::new();
    session.insert("sample_count".to_string(), serde_json::json!(snapshots.len()));
    session.insert(
        "first_sample".to_string(),
        serde_json::json!(snapshots.first().and_then(|s| s.timestamp.clone())),
    );
    session.insert(
        "last_sample".to_string(),
        serde_json::json!(snapshots.last().and_then(|s| s.timestamp.clone())),
    );
    report.insert("session".to_string(), serde_json::Value::Object(session));

    report.insert("statistics".to_string(), serde_json::to_value(stats)?);

    report.insert(
        "trends".to_string(),
        serde_json::Value::Object(render_trend_charts(histories)),
    );

    report.insert("snapshots".to_string(), serde_json::to_value(snapshots)?);

    Ok(serde_json::Value::Object(report))
}

/// Write a completed session's report to `path` as pretty-printed JSON.
pub fn write(
    path: &Path,
    snapshots: &[Snapshot],
    stats: &Statistics,
    histories: &MetricHistories,
) -> Result<()> {
    let report = build(snapshots, stats, histories)?;
    let json = serde_json::to_string_pretty(&report)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Render each tracked history as a one-line unicode sparkline.
fn render_trend_charts(histories: &MetricHistories) -> serde_json::Map<String, serde_json::Value> {
    let mut charts = serde_json::Map::new();
    for (name, history) in [
        ("cpu_percent", &histories.cpu),
        ("memory_percent", &histories.memory),
        ("upload_kb", &histories.net_up),
        ("download_kb", &histories.net_down),
    ] {
        charts.insert(name.to_string(), serde_json::json!(sparkline_string(history)));
    }
    charts
}

fn sparkline_string(history: &RingHistory<f64>) -> String {
    history
        .sparkline(SPARK_LEVELS.len() as u64 - 1)
        .into_iter()
        .map(|level| SPARK_LEVELS[level as usize])
        .collect()
}
