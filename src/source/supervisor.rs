//! Supervised live connection to a telemetry agent.
//!
//! Owns the TCP connection lifecycle: connect, read newline-delimited
//! payloads, detect loss, and retry after a fixed delay until torn down.
//! State transitions and payloads are delivered as [`SourceEvent`]s in
//! order through a bounded channel.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{ConnectionState, SourceEvent, TelemetrySource};

/// Fixed delay between reconnection attempts.
///
/// Retries are unconditional with no backoff growth and no attempt cap:
/// the agent is assumed to eventually become reachable again.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// A telemetry source that maintains a resilient connection to an agent.
///
/// Spawns a background task that connects to `addr`, reads one JSON
/// payload per line, and reconnects after [`RECONNECT_DELAY`] whenever
/// the connection closes or errors. Messages before a disconnect and
/// after a reconnect belong to disjoint streams; no deduplication is
/// attempted across the boundary.
///
/// # Example
///
/// ```no_run
/// use sysdeck::Supervisor;
///
/// # tokio_test::block_on(async {
/// let source = Supervisor::spawn("localhost:9600");
/// # });
/// ```
#[derive(Debug)]
pub struct Supervisor {
    receiver: mpsc::Receiver<SourceEvent>,
    description: String,
    task: JoinHandle<()>,
}

impl Supervisor {
    /// Spawn a supervised connection to `addr` ("host:port").
    pub fn spawn(addr: &str) -> Self {
        Self::spawn_with_delay(addr, RECONNECT_DELAY)
    }

    /// Spawn with an explicit reconnect delay (tests use a short one).
    pub fn spawn_with_delay(addr: &str, reconnect_delay: Duration) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let target = addr.to_string();
        let task = tokio::spawn(supervise(target, tx, reconnect_delay));

        Self {
            receiver: rx,
            description: format!("tcp: {}", addr),
            task,
        }
    }
}

/// Connection loop: Connecting -> Connected -> Disconnected -> (delay) -> ...
///
/// Exits only when the receiving side is dropped or the task is aborted.
async fn supervise(addr: String, tx: mpsc::Sender<SourceEvent>, reconnect_delay: Duration) {
    loop {
        if tx.send(SourceEvent::State(ConnectionState::Connecting)).await.is_err() {
            return;
        }

        match TcpStream::connect(&addr).await {
            Ok(stream) => {
                if tx.send(SourceEvent::State(ConnectionState::Connected)).await.is_err() {
                    return;
                }
                info!("connected to {}", addr);

                if !read_lines(stream, &tx).await {
                    return;
                }
                info!("connection to {} lost, retrying in {:?}", addr, reconnect_delay);
            }
            Err(e) => {
                debug!("connect to {} failed: {}", addr, e);
            }
        }

        // A failed connect and a dropped connection are handled identically
        if tx.send(SourceEvent::State(ConnectionState::Disconnected)).await.is_err() {
            return;
        }
        tokio::time::sleep(reconnect_delay).await;
    }
}

/// Read newline-delimited payloads until the connection ends.
///
/// Returns false if the event receiver was dropped (caller should exit),
/// true if the connection itself closed or errored (caller reconnects).
async fn read_lines(stream: TcpStream, tx: &mpsc::Sender<SourceEvent>) -> bool {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => return true, // peer closed
            Ok(_) => {
                let payload = line.trim();
                if payload.is_empty() {
                    continue;
                }
                if tx.send(SourceEvent::Payload(payload.as_bytes().to_vec())).await.is_err() {
                    return false;
                }
            }
            Err(e) => {
                // Transport errors are treated the same as a close
                debug!("read error: {}", e);
                return true;
            }
        }
    }
}

impl TelemetrySource for Supervisor {
    fn poll(&mut self) -> Option<SourceEvent> {
        self.receiver.try_recv().ok()
    }

    fn description(&self) -> &str {
        &self.description
    }

    /// Abort the connection task, cancelling any in-flight read or
    /// pending reconnect sleep.
    fn shutdown(&mut self) {
        self.task.abort();
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    async fn drain(source: &mut Supervisor) -> Vec<SourceEvent> {
        // Give the background task time to process
        tokio::time::sleep(Duration::from_millis(50)).await;
        let mut events = Vec::new();
        while let Some(event) = source.poll() {
            events.push(event);
        }
        events
    }

    fn states(events: &[SourceEvent]) -> Vec<ConnectionState> {
        events
            .iter()
            .filter_map(|e| match e {
                SourceEvent::State(s) => Some(*s),
                SourceEvent::Payload(_) => None,
            })
            .collect()
    }

    fn payloads(events: &[SourceEvent]) -> Vec<Vec<u8>> {
        events
            .iter()
            .filter_map(|e| match e {
                SourceEvent::Payload(p) => Some(p.clone()),
                SourceEvent::State(_) => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_connects_and_delivers_payloads() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        tokio::spawn(async move {
            let (mut conn, _) = listener.accept().await.unwrap();
            conn.write_all(b"{\"a\":1}\n{\"b\":2}\n").await.unwrap();
            conn.flush().await.unwrap();
            // Keep the connection open long enough for the reads
            tokio::time::sleep(Duration::from_millis(200)).await;
        });

        let mut source = Supervisor::spawn_with_delay(&addr, Duration::from_millis(50));
        let events = drain(&mut source).await;

        assert_eq!(
            states(&events),
            vec![ConnectionState::Connecting, ConnectionState::Connected]
        );
        assert_eq!(payloads(&events), vec![b"{\"a\":1}".to_vec(), b"{\"b\":2}".to_vec()]);
    }

    #[tokio::test]
    async fn test_reconnects_after_drop() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        tokio::spawn(async move {
            // First connection: one payload, then drop
            let (mut conn, _) = listener.accept().await.unwrap();
            conn.write_all(b"{\"epoch\":1}\n").await.unwrap();
            conn.flush().await.unwrap();
            drop(conn);

            // Second connection after the supervisor retries
            let (mut conn, _) = listener.accept().await.unwrap();
            conn.write_all(b"{\"epoch\":2}\n").await.unwrap();
            conn.flush().await.unwrap();
            // Outlive the draining side so no second disconnect is seen
            tokio::time::sleep(Duration::from_secs(2)).await;
        });

        let mut source = Supervisor::spawn_with_delay(&addr, Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(300)).await;
        let mut events = Vec::new();
        while let Some(event) = source.poll() {
            events.push(event);
        }

        assert_eq!(
            states(&events),
            vec![
                ConnectionState::Connecting,
                ConnectionState::Connected,
                ConnectionState::Disconnected,
                ConnectionState::Connecting,
                ConnectionState::Connected,
            ]
        );
        // Each epoch's payload delivered exactly once, in order
        assert_eq!(
            payloads(&events),
            vec![b"{\"epoch\":1}".to_vec(), b"{\"epoch\":2}".to_vec()]
        );
    }

    #[tokio::test]
    async fn test_unreachable_agent_keeps_retrying() {
        // Bind then drop to get an address nothing is listening on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let mut source = Supervisor::spawn_with_delay(&addr, Duration::from_millis(30));
        tokio::time::sleep(Duration::from_millis(150)).await;

        let mut seen = Vec::new();
        while let Some(event) = source.poll() {
            seen.push(event);
        }

        let states = states(&seen);
        // Multiple Connecting/Disconnected cycles, never Connected
        assert!(states.len() >= 4);
        assert!(!states.contains(&ConnectionState::Connected));
        assert_eq!(states[0], ConnectionState::Connecting);
        assert_eq!(states[1], ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_pending_reconnect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let mut source = Supervisor::spawn_with_delay(&addr, Duration::from_secs(60));
        tokio::time::sleep(Duration::from_millis(50)).await;

        source.shutdown();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(source.task.is_finished());
    }

    #[tokio::test]
    async fn test_description() {
        let source = Supervisor::spawn_with_delay("127.0.0.1:1", Duration::from_secs(60));
        assert_eq!(source.description(), "tcp: 127.0.0.1:1");
    }
}
