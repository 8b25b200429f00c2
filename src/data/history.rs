//! Rolling history buffers for trend display.

use std::collections::VecDeque;

use crate::source::Snapshot;

/// Maximum number of values a history keeps per metric.
pub const MAX_HISTORY: usize = 60;

/// Fixed-capacity rolling buffer of recent values.
///
/// Push is append-then-evict-oldest; iteration order is chronological,
/// oldest first. Capacity never changes after construction.
#[derive(Debug, Clone)]
pub struct RingHistory<T> {
    values: VecDeque<T>,
    capacity: usize,
}

impl<T> RingHistory<T> {
    /// Create an empty history with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a value, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        self.values.push_back(value);
        if self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Most recently pushed value.
    pub fn latest(&self) -> Option<&T> {
        self.values.back()
    }

    /// Values oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }
}

impl RingHistory<f64> {
    /// Scale the history into `0..=max` integer levels for sparklines.
    ///
    /// Gauged against the largest value seen in the window so short
    /// spikes stay visible; an all-zero window renders flat.
    pub fn sparkline(&self, max_level: u64) -> Vec<u64> {
        let peak = self.values.iter().copied().fold(0.0_f64, f64::max);
        if peak <= 0.0 {
            return vec![0; self.values.len()];
        }
        self.values.iter().map(|v| ((v / peak) * max_level as f64).round() as u64).collect()
    }
}

impl Default for RingHistory<f64> {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

/// The four rolling histories the dashboard tracks.
///
/// A snapshot that lacks a subsection contributes nothing to that
/// metric's history for the tick: the gap is preserved rather than
/// recorded as a fabricated zero, leaving it to the renderer to decide
/// how to show discontinuities.
#[derive(Debug, Clone, Default)]
pub struct MetricHistories {
    /// Aggregate CPU utilization, percent.
    pub cpu: RingHistory<f64>,
    /// Virtual memory utilization, percent.
    pub memory: RingHistory<f64>,
    /// Network upload speed, KB/s.
    pub net_up: RingHistory<f64>,
    /// Network download speed, KB/s.
    pub net_down: RingHistory<f64>,
}

impl MetricHistories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the scalar projections of one accepted snapshot.
    pub fn record(&mut self, snapshot: &Snapshot) {
        if let Some(v) = snapshot.cpu_percent() {
            self.cpu.push(v);
        }
        if let Some(v) = snapshot.memory_percent() {
            self.memory.push(v);
        }
        if let Some(v) = snapshot.upload_kb() {
            self.net_up.push(v);
        }
        if let Some(v) = snapshot.download_kb() {
            self.net_down.push(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_below_capacity() {
        let mut history = RingHistory::new(3);
        history.push(1.0);
        history.push(2.0);
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest(), Some(&2.0));
        let values: Vec<f64> = history.iter().copied().collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_fifo_eviction_keeps_last_n_in_order() {
        let mut history = RingHistory::new(MAX_HISTORY);
        for i in 0..150 {
            history.push(i as f64);
        }
        assert_eq!(history.len(), MAX_HISTORY);
        let values: Vec<f64> = history.iter().copied().collect();
        let expected: Vec<f64> = (90..150).map(|i| i as f64).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_sparkline_scaling() {
        let mut history = RingHistory::new(8);
        for v in [0.0, 25.0, 50.0, 100.0] {
            history.push(v);
        }
        assert_eq!(history.sparkline(8), vec![0, 2, 4, 8]);
    }

    #[test]
    fn test_sparkline_all_zero_is_flat() {
        let mut history = RingHistory::new(4);
        history.push(0.0);
        history.push(0.0);
        assert_eq!(history.sparkline(8), vec![0, 0]);
    }

    #[test]
    fn test_record_skips_missing_sections() {
        let json = r#"{ "cpu": { "percent": 40.0 } }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();

        let mut histories = MetricHistories::new();
        histories.record(&snapshot);

        assert_eq!(histories.cpu.len(), 1);
        assert_eq!(histories.memory.len(), 0);
        assert_eq!(histories.net_up.len(), 0);
        assert_eq!(histories.net_down.len(), 0);
    }

    #[test]
    fn test_record_converts_network_to_kb() {
        let json = r#"{
            "network": { "speed": { "upload_bytes_per_sec": 4096.0, "download_bytes_per_sec": 512.0 } }
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();

        let mut histories = MetricHistories::new();
        histories.record(&snapshot);

        assert_eq!(histories.net_up.latest(), Some(&4.0));
        assert_eq!(histories.net_down.latest(), Some(&0.5));
    }
}
