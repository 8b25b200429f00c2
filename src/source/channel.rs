//! Channel-based telemetry source.
//!
//! Receives raw payloads via a tokio mpsc channel. This is useful for
//! embedding the dashboard in a larger program where snapshots are
//! pushed rather than read from the network, and for tests.

use tokio::sync::mpsc;

use super::{ConnectionState, SourceEvent, TelemetrySource};

/// A telemetry source fed by an in-process channel.
///
/// The producer sends raw JSON payload bytes through the channel; the
/// source reports itself as connected on first poll (an in-process
/// channel has no connection to lose until the sender is dropped).
///
/// # Example
///
/// ```
/// use sysdeck::source::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("embedded-agent");
/// tx.try_send(br#"{"cpu":{"percent":12.0}}"#.to_vec()).unwrap();
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::Receiver<Vec<u8>>,
    description: String,
    connected_reported: bool,
    sender_gone: bool,
}

impl ChannelSource {
    /// Create a new channel source from the receiving end of a channel.
    pub fn new(receiver: mpsc::Receiver<Vec<u8>>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
            connected_reported: false,
            sender_gone: false,
        }
    }

    /// Create a channel pair for pushing payloads to a ChannelSource.
    pub fn create(source_description: &str) -> (mpsc::Sender<Vec<u8>>, Self) {
        let (tx, rx) = mpsc::channel(64);
        (tx, Self::new(rx, source_description))
    }
}

impl TelemetrySource for ChannelSource {
    fn poll(&mut self) -> Option<SourceEvent> {
        if !self.connected_reported {
            self.connected_reported = true;
            return Some(SourceEvent::State(ConnectionState::Connected));
        }

        match self.receiver.try_recv() {
            Ok(payload) => Some(SourceEvent::Payload(payload)),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                if self.sender_gone {
                    None
                } else {
                    self.sender_gone = true;
                    Some(SourceEvent::State(ConnectionState::Disconnected))
                }
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}
