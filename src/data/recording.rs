//! Bounded-duration capture of the raw snapshot stream.

use std::time::{Duration, Instant};

use crate::source::Snapshot;

/// How long a recording session runs before stopping itself.
pub const RECORDING_DURATION: Duration = Duration::from_secs(5 * 60);

/// Lifecycle of a recording session.
///
/// `Idle` is the initial state; `start` re-enters `Active` from either
/// `Idle` or `Completed`, discarding any previously captured data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingStatus {
    #[default]
    Idle,
    Active,
    Completed,
}

impl RecordingStatus {
    /// Short label for the header bar.
    pub fn label(&self) -> &'static str {
        match self {
            RecordingStatus::Idle => "idle",
            RecordingStatus::Active => "REC",
            RecordingStatus::Completed => "done",
        }
    }
}

/// State machine governing capture start/stop and snapshot accumulation.
///
/// The Active -> Completed transition has two triggers, a manual stop and
/// the deadline expiring, but a single consumer: both funnel through
/// [`complete`](Self::complete), which is guarded by the Active check.
/// Whichever fires first wins; the late duplicate is a no-op.
#[derive(Debug)]
pub struct RecordingSession {
    status: RecordingStatus,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
    deadline: Option<Instant>,
    buffer: Vec<Snapshot>,
    duration: Duration,
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::with_duration(RECORDING_DURATION)
    }

    /// Create a session with a non-default capture duration.
    pub fn with_duration(duration: Duration) -> Self {
        Self {
            status: RecordingStatus::Idle,
            started_at: None,
            ended_at: None,
            deadline: None,
            buffer: Vec::new(),
            duration,
        }
    }

    pub fn status(&self) -> RecordingStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == RecordingStatus::Active
    }

    /// Captured snapshots, in ingestion order.
    pub fn buffer(&self) -> &[Snapshot] {
        &self.buffer
    }

    /// Begin a capture. Allowed from Idle or Completed only; a start
    /// while Active is rejected. The buffer is cleared unconditionally
    /// on entry, so a new session never sees prior data.
    pub fn start(&mut self) -> bool {
        self.start_at(Instant::now())
    }

    pub(crate) fn start_at(&mut self, now: Instant) -> bool {
        if self.status == RecordingStatus::Active {
            return false;
        }
        self.buffer.clear();
        self.started_at = Some(now);
        self.ended_at = None;
        self.deadline = Some(now + self.duration);
        self.status = RecordingStatus::Active;
        true
    }

    /// Manually stop an active capture. No-op unless Active.
    pub fn stop(&mut self) -> bool {
        self.complete(Instant::now())
    }

    /// Drive the deadline: completes the session once `now` reaches
    /// started_at + duration. Called from the 1 Hz tick; otherwise the
    /// tick only affects elapsed/remaining display values.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub(crate) fn tick_at(&mut self, now: Instant) {
        if let Some(deadline) = self.deadline {
            if self.status == RecordingStatus::Active && now >= deadline {
                self.complete(now);
            }
        }
    }

    /// The single Active -> Completed transition. Disarms the deadline.
    fn complete(&mut self, now: Instant) -> bool {
        if self.status != RecordingStatus::Active {
            return false;
        }
        self.status = RecordingStatus::Completed;
        self.ended_at = Some(now);
        self.deadline = None;
        true
    }

    /// Append a snapshot to the capture. No-op unless Active.
    pub fn push(&mut self, snapshot: Snapshot) -> bool {
        if self.status != RecordingStatus::Active {
            return false;
        }
        self.buffer.push(snapshot);
        true
    }

    /// Time since the capture started. For a Completed session this is
    /// the final captured span; None while Idle.
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed_at(Instant::now())
    }

    pub(crate) fn elapsed_at(&self, now: Instant) -> Option<Duration> {
        let started = self.started_at?;
        let end = match self.status {
            RecordingStatus::Active => now,
            _ => self.ended_at?,
        };
        Some(end.saturating_duration_since(started))
    }

    /// Time until the deadline fires; None unless Active.
    pub fn remaining(&self) -> Option<Duration> {
        self.remaining_at(Instant::now())
    }

    pub(crate) fn remaining_at(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }
}
