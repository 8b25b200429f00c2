//! Application state and user interaction logic.

use std::path::PathBuf;
use std::time::Instant;

use crate::data::{report, summarize, Ingestor, RecordingStatus, StatsError};
use crate::source::{ConnectionState, SourceEvent, TelemetrySource};
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Gauges, trends and GPU summary.
    Overview,
    /// Top processes table.
    Processes,
    /// Disk partition table.
    Disks,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Processes,
            View::Processes => View::Disks,
            View::Disks => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Overview => View::Disks,
            View::Processes => View::Overview,
            View::Disks => View::Processes,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Processes => "Processes",
            View::Disks => "Disks",
        }
    }
}

/// Main application state.
///
/// Owns the telemetry source and the ingestion engine. All mutation
/// happens on the UI loop's thread: the source's background task only
/// ever communicates through its event channel.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    source: Box<dyn TelemetrySource>,
    pub connection_state: ConnectionState,
    pub ingestor: Ingestor,

    // Navigation state
    pub selected_process_index: usize,

    // UI
    pub theme: Theme,
    pub export_path: PathBuf,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App with the given telemetry source.
    pub fn new(source: Box<dyn TelemetrySource>, export_path: PathBuf) -> Self {
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            source,
            connection_state: ConnectionState::Connecting,
            ingestor: Ingestor::new(),
            selected_process_index: 0,
            theme: Theme::auto_detect(),
            export_path,
            status_message: None,
        }
    }

    /// Returns a description of the current telemetry source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Drain pending source events into the engine.
    ///
    /// Returns the number of snapshots accepted this round. Malformed
    /// payloads are absorbed here (already counted and logged by the
    /// ingestor); no source event ever stops the loop.
    pub fn pump(&mut self) -> usize {
        let mut accepted = 0;
        while let Some(event) = self.source.poll() {
            match event {
                SourceEvent::State(state) => {
                    self.connection_state = state;
                }
                SourceEvent::Payload(raw) => {
                    if self.ingestor.ingest(&raw).is_ok() {
                        accepted += 1;
                    }
                }
            }
        }
        if accepted > 0 {
            self.clamp_selection();
        }
        accepted
    }

    /// 1 Hz tick: drives the recording deadline and nothing else.
    pub fn tick(&mut self) {
        let was_active = self.ingestor.recording().is_active();
        self.ingestor.recording_mut().tick();
        if was_active && !self.ingestor.recording().is_active() {
            self.set_status_message("Recording stopped: time limit reached".to_string());
        }
    }

    /// Start a session if Idle/Completed, stop it if Active.
    pub fn toggle_recording(&mut self) {
        let recording = self.ingestor.recording_mut();
        if recording.is_active() {
            recording.stop();
            self.set_status_message("Recording stopped".to_string());
        } else if recording.start() {
            self.set_status_message("Recording started (5 minute limit)".to_string());
        }
    }

    /// Export the completed session as a report.
    ///
    /// Valid only when the session is Completed with captured data;
    /// anything else is a no-op with a user-visible message.
    pub fn request_export(&mut self) {
        match self.ingestor.recording().status() {
            RecordingStatus::Active => {
                self.set_status_message("Stop the recording before exporting".to_string());
                return;
            }
            RecordingStatus::Idle => {
                self.set_status_message("No recording to export".to_string());
                return;
            }
            RecordingStatus::Completed => {}
        }

        let snapshots = self.ingestor.recording().buffer();
        let stats = match summarize(snapshots) {
            Ok(stats) => stats,
            Err(StatsError::EmptySession) => {
                self.set_status_message("No data captured, nothing to export".to_string());
                return;
            }
        };

        let message = match report::write(
            &self.export_path,
            snapshots,
            &stats,
            self.ingestor.histories(),
        ) {
            Ok(()) => format!("Report written to {}", self.export_path.display()),
            Err(e) => format!("Export failed: {}", e),
        };
        self.set_status_message(message);
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move the process selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.process_count().saturating_sub(1);
        self.selected_process_index = (self.selected_process_index + n).min(max);
    }

    /// Move the process selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_process_index = self.selected_process_index.saturating_sub(n);
    }

    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Jump the process selection to the top of the list.
    pub fn select_first(&mut self) {
        self.selected_process_index = 0;
    }

    /// Jump the process selection to the bottom of the list.
    pub fn select_last(&mut self) {
        self.selected_process_index = self.process_count().saturating_sub(1);
    }

    fn process_count(&self) -> usize {
        self.ingestor.latest().map_or(0, |s| s.processes.len())
    }

    fn clamp_selection(&mut self) {
        let max = self.process_count().saturating_sub(1);
        if self.selected_process_index > max {
            self.selected_process_index = max;
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit and tear the source down.
    pub fn quit(&mut self) {
        self.source.shutdown();
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ChannelSource;

    fn app_with_channel() -> (tokio::sync::mpsc::Sender<Vec<u8>>, App) {
        let (tx, source) = ChannelSource::create("test");
        let dir = std::env::temp_dir().join("sysdeck-app-test-report.json");
        (tx, App::new(Box::new(source), dir))
    }

    fn payload(cpu: f64) -> Vec<u8> {
        format!(r#"{{"cpu":{{"percent":{}}}}}"#, cpu).into_bytes()
    }

    #[tokio::test]
    async fn test_pump_updates_state_and_history() {
        let (tx, mut app) = app_with_channel();
        assert_eq!(app.connection_state, ConnectionState::Connecting);

        tx.send(payload(33.0)).await.unwrap();
        let accepted = app.pump();

        assert_eq!(accepted, 1);
        assert_eq!(app.connection_state, ConnectionState::Connected);
        assert_eq!(app.ingestor.histories().cpu.latest(), Some(&33.0));
    }

    #[tokio::test]
    async fn test_pump_absorbs_malformed_payloads() {
        let (tx, mut app) = app_with_channel();
        tx.send(b"garbage".to_vec()).await.unwrap();
        tx.send(payload(10.0)).await.unwrap();

        let accepted = app.pump();
        assert_eq!(accepted, 1);
        assert_eq!(app.ingestor.dropped(), 1);
    }

    #[tokio::test]
    async fn test_toggle_recording_cycles_states() {
        let (_tx, mut app) = app_with_channel();
        assert_eq!(app.ingestor.recording().status(), RecordingStatus::Idle);

        app.toggle_recording();
        assert_eq!(app.ingestor.recording().status(), RecordingStatus::Active);

        app.toggle_recording();
        assert_eq!(app.ingestor.recording().status(), RecordingStatus::Completed);

        // Toggle from Completed starts a fresh session
        app.toggle_recording();
        assert_eq!(app.ingestor.recording().status(), RecordingStatus::Active);
    }

    #[tokio::test]
    async fn test_export_requires_completed_nonempty_session() {
        let (tx, mut app) = app_with_channel();

        // Idle: no-op with message
        app.request_export();
        assert!(app.get_status_message().unwrap().contains("No recording"));

        // Completed but empty: blocked
        app.toggle_recording();
        app.toggle_recording();
        app.request_export();
        assert!(app.get_status_message().unwrap().contains("No data captured"));

        // Completed with data: report written
        let dir = tempfile::tempdir().unwrap();
        app.export_path = dir.path().join("report.json");
        app.toggle_recording();
        tx.send(payload(50.0)).await.unwrap();
        app.pump();
        app.toggle_recording();
        app.request_export();
        assert!(app.get_status_message().unwrap().contains("Report written"));
        assert!(app.export_path.exists());
    }

    #[tokio::test]
    async fn test_view_cycle_round_trips() {
        let (_tx, mut app) = app_with_channel();
        let start = app.current_view;
        app.next_view();
        app.next_view();
        app.next_view();
        assert_eq!(app.current_view, start);
        app.prev_view();
        assert_eq!(app.current_view, View::Disks);
    }
}
