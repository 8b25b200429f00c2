// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # sysdeck
//!
//! A real-time system telemetry dashboard for the terminal.
//!
//! sysdeck receives periodic system-resource snapshots (CPU, memory,
//! disk, network, GPU, process list) pushed by a telemetry agent over a
//! persistent connection, renders them live, and can capture a
//! bounded-duration recording session for offline statistical reporting.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Application                           │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌──────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal │ │
//! │  │ (state) │    │ (engine) │    │(render) │    │          │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └──────────┘ │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐                                                 │
//! │  │ source  │◀── Supervisor | ChannelSource | FileSource     │
//! │  │ (input) │                                                 │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state and user interaction logic
//! - **[`source`]**: Telemetry source abstraction ([`TelemetrySource`]
//!   trait) with a supervised reconnecting TCP stream, an in-process
//!   channel, and file replay
//! - **[`data`]**: The engine - snapshot ingestion, rolling metric
//!   histories, the recording session state machine, statistics and
//!   report generation
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Engine guarantees
//!
//! - Histories keep at most the last 60 values per metric, FIFO.
//! - A lost connection is retried every 3 seconds, forever; a malformed
//!   payload is dropped without touching any state. Neither ever stops
//!   the ingestion loop.
//! - At most one recording session is active at a time; it stops itself
//!   after 5 minutes if not stopped manually, and export is only
//!   possible for a completed, non-empty session.
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Connect to a telemetry agent
//! sysdeck --connect localhost:9600
//!
//! # Replay a capture file
//! sysdeck --file capture.jsonl
//! ```
//!
//! ### As a library with a channel source
//!
//! ```
//! use sysdeck::{App, ChannelSource};
//!
//! // Create a channel for pushing raw snapshot payloads
//! let (tx, source) = ChannelSource::create("embedded-agent");
//! let app = App::new(Box::new(source), "report.json".into());
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use data::{
    summarize, IngestError, Ingestor, MetricHistories, MetricSummary, RecordingSession,
    RecordingStatus, RingHistory, Statistics, StatsError, MAX_HISTORY, RECORDING_DURATION,
};
pub use source::{
    ChannelSource, ConnectionState, FileSource, Snapshot, SourceEvent, Supervisor,
    TelemetrySource,
};
