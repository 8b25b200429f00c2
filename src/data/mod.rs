//! Engine state: histories, ingestion, recording, statistics, reports.
//!
//! ## Data flow
//!
//! ```text
//! raw payload (bytes)
//!        │
//!        ▼
//! Ingestor::ingest()  ── parse + normalize
//!        │
//!        ├──▶ MetricHistories (always, gaps skipped)
//!        │
//!        └──▶ RecordingSession::push() (only while Active)
//!                     │
//!                     ▼  on completion + export request
//!              stats::summarize() ──▶ report::write()
//! ```

pub mod history;
pub mod ingest;
pub mod recording;
pub mod report;
pub mod stats;

pub use history::{MetricHistories, RingHistory, MAX_HISTORY};
pub use ingest::{IngestError, Ingestor};
pub use recording::{RecordingSession, RecordingStatus, RECORDING_DURATION};
pub use stats::{summarize, MetricSummary, Statistics, StatsError};
