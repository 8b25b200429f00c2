//! File-based telemetry source.
//!
//! Replays a capture file of newline-delimited snapshots at the
//! dashboard's own tick rate, so a recorded stream can be inspected
//! offline with live-like pacing.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::{ConnectionState, SourceEvent, TelemetrySource};

/// Delay between replayed payloads, matching the live 1 Hz stream.
pub const REPLAY_INTERVAL: Duration = Duration::from_secs(1);

/// A telemetry source that replays payloads from a file.
///
/// Each line of the file is one JSON snapshot, the same format the live
/// stream carries. Lines are handed out in order, at most one per
/// [`REPLAY_INTERVAL`] no matter how often the source is polled, so the
/// UI loop draining the source cannot swallow the whole file in one
/// iteration. After the last line the source reports a disconnect and
/// stays quiet.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    lines: Vec<Vec<u8>>,
    next: usize,
    interval: Duration,
    last_emit: Option<Instant>,
    connected_reported: bool,
    eof_reported: bool,
    last_error: Option<String>,
}

impl FileSource {
    /// Create a new file source for the given path, paced at
    /// [`REPLAY_INTERVAL`].
    ///
    /// The file is read eagerly; a read failure is reported through the
    /// first poll as a disconnect, with the error kept for the status bar.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_interval(path, REPLAY_INTERVAL)
    }

    /// Create a file source with an explicit pacing interval.
    ///
    /// `Duration::ZERO` disables pacing entirely (one payload per poll).
    pub fn with_interval<P: AsRef<Path>>(path: P, interval: Duration) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());

        let (lines, last_error) = match fs::read(&path) {
            Ok(content) => {
                let lines = content
                    .split(|&b| b == b'\n')
                    .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
                    .map(<[u8]>::to_vec)
                    .collect();
                (lines, None)
            }
            Err(e) => (Vec::new(), Some(format!("read error: {}", e))),
        };

        Self {
            path,
            description,
            lines,
            next: 0,
            interval,
            last_emit: None,
            connected_reported: false,
            eof_reported: false,
            last_error,
        }
    }

    /// Returns the path being replayed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The read error, if opening the file failed.
    pub fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True once the pacing interval has passed since the last payload.
    fn due(&self) -> bool {
        self.last_emit.is_none_or(|t| t.elapsed() >= self.interval)
    }
}

impl TelemetrySource for FileSource {
    fn poll(&mut self) -> Option<SourceEvent> {
        if !self.connected_reported {
            self.connected_reported = true;
            if self.last_error.is_some() {
                self.eof_reported = true;
                return Some(SourceEvent::State(ConnectionState::Disconnected));
            }
            return Some(SourceEvent::State(ConnectionState::Connected));
        }

        if self.next < self.lines.len() {
            if !self.due() {
                return None;
            }
            let payload = self.lines[self.next].clone();
            self.next += 1;
            self.last_emit = Some(Instant::now());
            return Some(SourceEvent::Payload(payload));
        }

        if !self.eof_reported {
            self.eof_reported = true;
            return Some(SourceEvent::State(ConnectionState::Disconnected));
        }
        None
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn capture_file(count: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for i in 0..count {
            writeln!(file, "{{\"cpu\":{{\"percent\":{}.0}}}}", i + 1).unwrap();
        }
        file.flush().unwrap();
        file
    }

    /// Drain the source the way the UI loop does, counting payloads.
    fn drain_payloads(source: &mut FileSource) -> usize {
        let mut count = 0;
        while let Some(event) = source.poll() {
            if let SourceEvent::Payload(_) = event {
                count += 1;
            }
        }
        count
    }

    #[test]
    fn test_file_source_replays_lines_in_order() {
        let file = capture_file(2);
        let mut source = FileSource::with_interval(file.path(), Duration::ZERO);

        match source.poll() {
            Some(SourceEvent::State(ConnectionState::Connected)) => {}
            other => panic!("expected Connected, got {:?}", other),
        }
        match source.poll() {
            Some(SourceEvent::Payload(p)) => assert!(p.ends_with(b":1.0}}")),
            other => panic!("expected payload, got {:?}", other),
        }
        match source.poll() {
            Some(SourceEvent::Payload(p)) => assert!(p.ends_with(b":2.0}}")),
            other => panic!("expected payload, got {:?}", other),
        }
        match source.poll() {
            Some(SourceEvent::State(ConnectionState::Disconnected)) => {}
            other => panic!("expected Disconnected at EOF, got {:?}", other),
        }
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_emits_at_most_one_payload_per_interval() {
        let file = capture_file(10);
        let mut source = FileSource::with_interval(file.path(), Duration::from_millis(40));

        let _ = source.poll(); // Connected

        // A full drain, as the UI loop does every iteration, yields only
        // the first payload; the rest are held back by the pacing
        assert_eq!(drain_payloads(&mut source), 1);
        assert_eq!(drain_payloads(&mut source), 0);

        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(drain_payloads(&mut source), 1);
    }

    #[test]
    fn test_file_source_paced_replay_completes() {
        let file = capture_file(3);
        let mut source = FileSource::with_interval(file.path(), Duration::from_millis(5));

        let _ = source.poll(); // Connected

        let mut payloads = 0;
        let mut disconnected = false;
        for _ in 0..100 {
            match source.poll() {
                Some(SourceEvent::Payload(_)) => payloads += 1,
                Some(SourceEvent::State(ConnectionState::Disconnected)) => {
                    disconnected = true;
                    break;
                }
                Some(other) => panic!("unexpected event {:?}", other),
                None => std::thread::sleep(Duration::from_millis(5)),
            }
        }
        assert_eq!(payloads, 3);
        assert!(disconnected);
    }

    #[test]
    fn test_file_source_skips_blank_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{}}\n\n   \n{{}}").unwrap();
        file.flush().unwrap();

        let mut source = FileSource::with_interval(file.path(), Duration::ZERO);
        let _ = source.poll(); // Connected

        let mut count = 0;
        while let Some(SourceEvent::Payload(_)) = source.poll() {
            count += 1;
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/capture.jsonl");

        match source.poll() {
            Some(SourceEvent::State(ConnectionState::Disconnected)) => {}
            other => panic!("expected Disconnected, got {:?}", other),
        }
        assert!(source.error().is_some());
        assert!(source.error().unwrap().contains("read error"));
        assert!(source.poll().is_none());
    }
}
