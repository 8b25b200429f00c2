//! Snapshot ingestion: parse, normalize, fan out.
//!
//! The ingestor is the single writer for the ring histories and the
//! recording buffer. Everything it owns is mutated from one execution
//! context, so readers (the renderer, the report writer) only ever see
//! consistent values.

use thiserror::Error;
use tracing::debug;

use super::history::MetricHistories;
use super::recording::RecordingSession;
use crate::source::Snapshot;

/// Errors from ingesting a raw payload.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The payload was not a valid snapshot. The message is dropped;
    /// no history or recording state is touched.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),
}

/// Validates incoming payloads and distributes accepted snapshots.
#[derive(Debug, Default)]
pub struct Ingestor {
    histories: MetricHistories,
    recording: RecordingSession,
    latest: Option<Snapshot>,
    accepted: u64,
    dropped: u64,
}

impl Ingestor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and accept one raw payload.
    ///
    /// On success the snapshot's scalar projections are pushed into the
    /// histories, the full snapshot is appended to the recording buffer
    /// if a session is Active, and it becomes the latest snapshot. A
    /// parse failure leaves every piece of state exactly as it was; a
    /// single bad message must never corrupt history or stop the stream.
    pub fn ingest(&mut self, raw: &[u8]) -> Result<(), IngestError> {
        let mut snapshot: Snapshot = match serde_json::from_slice(raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.dropped += 1;
                debug!("dropping malformed payload: {}", e);
                return Err(IngestError::MalformedPayload(e));
            }
        };

        snapshot.normalize();
        self.histories.record(&snapshot);
        if self.recording.is_active() {
            self.recording.push(snapshot.clone());
        }
        self.latest = Some(snapshot);
        self.accepted += 1;
        Ok(())
    }

    /// The most recently accepted snapshot.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    pub fn histories(&self) -> &MetricHistories {
        &self.histories
    }

    pub fn recording(&self) -> &RecordingSession {
        &self.recording
    }

    pub fn recording_mut(&mut self) -> &mut RecordingSession {
        &mut self.recording
    }

    /// Snapshots accepted since startup.
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Payloads dropped as malformed since startup.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::recording::RecordingStatus;

    fn payload(cpu: f64) -> Vec<u8> {
        format!(r#"{{"cpu":{{"percent":{}}}}}"#, cpu).into_bytes()
    }

    #[test]
    fn test_accepted_snapshot_updates_history_and_latest() {
        let mut ingestor = Ingestor::new();
        ingestor.ingest(&payload(42.0)).unwrap();

        assert_eq!(ingestor.histories().cpu.latest(), Some(&42.0));
        assert_eq!(ingestor.latest().unwrap().cpu_percent(), Some(42.0));
        assert_eq!(ingestor.accepted(), 1);
    }

    #[test]
    fn test_malformed_payload_is_dropped_without_side_effects() {
        let mut ingestor = Ingestor::new();
        ingestor.ingest(&payload(10.0)).unwrap();

        let err = ingestor.ingest(b"not json at all");
        assert!(matches!(err, Err(IngestError::MalformedPayload(_))));

        // Nothing moved
        assert_eq!(ingestor.histories().cpu.len(), 1);
        assert_eq!(ingestor.latest().unwrap().cpu_percent(), Some(10.0));
        assert_eq!(ingestor.dropped(), 1);

        // And the stream keeps working afterwards
        ingestor.ingest(&payload(20.0)).unwrap();
        assert_eq!(ingestor.histories().cpu.len(), 2);
    }

    #[test]
    fn test_active_recording_receives_full_snapshots() {
        let mut ingestor = Ingestor::new();
        ingestor.ingest(&payload(1.0)).unwrap(); // before start: not captured

        ingestor.recording_mut().start();
        ingestor.ingest(&payload(2.0)).unwrap();
        ingestor.ingest(&payload(3.0)).unwrap();
        ingestor.recording_mut().stop();

        ingestor.ingest(&payload(4.0)).unwrap(); // after stop: not captured

        let buffer = ingestor.recording().buffer();
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer[0].cpu_percent(), Some(2.0));
        assert_eq!(buffer[1].cpu_percent(), Some(3.0));
        assert_eq!(ingestor.recording().status(), RecordingStatus::Completed);
    }

    #[test]
    fn test_malformed_payload_during_recording_leaves_buffer_untouched() {
        let mut ingestor = Ingestor::new();
        ingestor.recording_mut().start();
        ingestor.ingest(&payload(5.0)).unwrap();

        let _ = ingestor.ingest(b"{\"cpu\":{\"percent\":\"oops\"}}");
        assert_eq!(ingestor.recording().buffer().len(), 1);

        ingestor.ingest(&payload(6.0)).unwrap();
        assert_eq!(ingestor.recording().buffer().len(), 2);
    }

    #[test]
    fn test_percents_are_normalized_on_ingest() {
        let mut ingestor = Ingestor::new();
        ingestor.ingest(br#"{"cpu":{"percent":250.0}}"#).unwrap();
        assert_eq!(ingestor.histories().cpu.latest(), Some(&100.0));
    }
}
