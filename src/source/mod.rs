//! Telemetry source abstraction.
//!
//! This module provides a trait-based abstraction for receiving raw
//! telemetry payloads from various backends - a live supervised TCP
//! connection, an in-process channel, or a replay file.
//!
//! Sources deliver *raw bytes*, not parsed snapshots: parsing and
//! validation belong to the ingestor so that a malformed message is
//! handled identically no matter where it came from.

mod channel;
mod file;
pub mod snapshot;
mod supervisor;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use snapshot::{
    CpuMetrics, DiskMetrics, GpuInfo, GpuMetrics, MemoryMetrics, NetworkMetrics, Partition,
    ProcessInfo, Snapshot, SystemInfo,
};
pub use supervisor::Supervisor;

use std::fmt::Debug;

/// Connection lifecycle of a streaming source.
///
/// Created as `Connecting` at engine start; transitions are driven solely
/// by the source that owns the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionState {
    /// Short label for the header bar.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
        }
    }
}

/// An event delivered by a telemetry source.
#[derive(Debug, Clone)]
pub enum SourceEvent {
    /// The connection changed state.
    State(ConnectionState),
    /// A raw message payload arrived (one JSON snapshot).
    Payload(Vec<u8>),
}

/// Trait for receiving telemetry payloads from various sources.
///
/// # Example
///
/// ```
/// use sysdeck::source::{ChannelSource, TelemetrySource};
///
/// let (tx, mut source) = ChannelSource::create("agent");
/// tx.try_send(br#"{"cpu":{"percent":1.0}}"#.to_vec()).unwrap();
/// assert!(source.poll().is_some());
/// ```
pub trait TelemetrySource: Send + Debug {
    /// Poll for the next event.
    ///
    /// Returns `Some(event)` if one is available, `None` otherwise.
    /// This method must be non-blocking; the UI loop calls it every
    /// iteration and drains until it returns `None`.
    fn poll(&mut self) -> Option<SourceEvent>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Tear the source down, cancelling any pending I/O or retry.
    ///
    /// Idempotent; the default does nothing (channel and file sources
    /// have nothing to cancel).
    fn shutdown(&mut self) {}
}
