use std::io::{ErrorKind, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use daemonlink_frame::{encode_frame, VarintAccumulator, MAX_VARINT_LEN};
use daemonlink_transport::{uds, TransportError};

use crate::deadline::Deadline;
use crate::error::{Result, RpcError};
use crate::message::ResponseStatus;
use crate::status::ErrorTable;

/// Conventional daemon socket path.
pub const DEFAULT_SOCKET_PATH: &str = "/run/daemonlink.socket";

/// Default timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Pause between attempts while the deadline still allows retries.
const RETRY_PAUSE: Duration = Duration::from_millis(50);

/// Configuration held by a channel for its whole lifetime.
#[derive(Clone, Debug)]
pub struct ChannelConfig {
    /// Filesystem path of the daemon's listening socket.
    pub socket_path: PathBuf,
    /// Default timeout for calls and connects; `None` blocks indefinitely.
    pub timeout: Option<Duration>,
    /// Reconnect and retry transparently on transient failures.
    pub auto_reconnect: bool,
    /// Classification of daemon-reported status codes.
    pub error_table: ErrorTable,
}

impl ChannelConfig {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            ..Self::default()
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            timeout: Some(DEFAULT_TIMEOUT),
            auto_reconnect: true,
            error_table: ErrorTable::default(),
        }
    }
}

/// Identity of the process that opened the current socket.
///
/// A stream socket inherited across `fork` must not be reused by the child:
/// request and response bytes would interleave with the parent's. The epoch
/// is captured at connect time and validated on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionEpoch(u32);

impl ConnectionEpoch {
    fn current() -> Self {
        Self(std::process::id())
    }
}

impl std::fmt::Display for ConnectionEpoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
struct ChannelState {
    stream: Option<UnixStream>,
    epoch: Option<ConnectionEpoch>,
}

impl ChannelState {
    /// Back to disconnected; the dropped stream closes the descriptor.
    fn reset(&mut self) {
        self.stream = None;
        self.epoch = None;
    }

    /// Current stream, connecting lazily if there is none.
    fn connected(&mut self, config: &ChannelConfig) -> Result<&mut UnixStream> {
        match self.stream {
            Some(ref mut stream) => Ok(stream),
            None => {
                let stream = uds::connect(&config.socket_path)?;
                self.epoch = Some(ConnectionEpoch::current());
                Ok(self.stream.insert(stream))
            }
        }
    }
}

/// Owner of one daemon connection: socket handle, lock, deadline handling
/// and reconnect policy.
///
/// A channel is created once per client session and reused across calls.
/// All callers are serialized on the internal lock, so exactly one framed
/// request/response exchange is in flight at any instant and partial frames
/// from different threads can never interleave.
#[derive(Debug)]
pub struct RpcChannel {
    config: ChannelConfig,
    state: Mutex<ChannelState>,
}

impl RpcChannel {
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            state: Mutex::new(ChannelState::default()),
        }
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    fn lock_state(&self) -> MutexGuard<'_, ChannelState> {
        // The guarded state is just a reconnectable handle; a poisoned lock
        // is recovered rather than propagated.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a fresh connection, replacing any existing one.
    ///
    /// With auto-reconnect enabled, failed attempts are retried every
    /// 50 ms until the configured timeout elapses.
    pub fn connect(&self) -> Result<()> {
        let mut state = self.lock_state();
        let deadline = Deadline::after(self.config.timeout);
        loop {
            match self.open(&mut state) {
                Ok(()) => return Ok(()),
                Err(err) if self.config.auto_reconnect && err.is_transient() => {
                    debug!(error = %err, "connect failed, retrying until deadline");
                    pause_before_retry(&deadline)?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// A single connection attempt outside the deadline/retry wrapper.
    ///
    /// Used for liveness probing where retry overhead is unwanted.
    pub fn try_connect(&self) -> Result<()> {
        let mut state = self.lock_state();
        self.open(&mut state)
    }

    /// Close the connection if one is open. No-op when disconnected.
    pub fn disconnect(&self) {
        let mut state = self.lock_state();
        if state.stream.is_some() {
            debug!("disconnecting from daemon");
        }
        state.reset();
    }

    /// Credentials of the daemon process, if currently connected.
    pub fn peer_credentials(&self) -> Option<(u32, u32, u32)> {
        let state = self.lock_state();
        state.stream.as_ref().and_then(uds::peer_credentials)
    }

    /// Issue one request and return the decoded response payload.
    ///
    /// The request serializes to JSON; the response must expose the daemon
    /// status pair. A non-zero status classifies through the configured
    /// error table and surfaces as [`RpcError::Daemon`].
    pub fn call<R, P>(&self, request: &R, timeout: Option<Duration>) -> Result<P>
    where
        R: Serialize,
        P: DeserializeOwned + ResponseStatus,
    {
        let payload = serde_json::to_vec(request)?;
        let raw = self.call_raw(&payload, timeout)?;
        let response: P = serde_json::from_slice(&raw)?;
        match response.status_code() {
            0 => Ok(response),
            code => Err(self
                .config
                .error_table
                .classify(code, response.status_message())
                .into()),
        }
    }

    /// Exchange one pre-serialized request payload for the raw response
    /// payload. The wire schema stays entirely with the caller.
    ///
    /// `timeout` only ever extends the configured default; passing `None`
    /// uses the default as-is.
    pub fn call_raw(&self, payload: &[u8], timeout: Option<Duration>) -> Result<Bytes> {
        let mut frame = BytesMut::with_capacity(payload.len() + MAX_VARINT_LEN);
        encode_frame(payload, &mut frame)?;

        let mut state = self.lock_state();
        let deadline = Deadline::after(effective_timeout(self.config.timeout, timeout));
        self.exchange(&mut state, &frame, &deadline)
    }

    /// Retry wrapper around [`attempt`](Self::attempt). Bounded only by the
    /// deadline; there is no retry-count cap.
    fn exchange(
        &self,
        state: &mut ChannelState,
        frame: &[u8],
        deadline: &Deadline,
    ) -> Result<Bytes> {
        loop {
            match self.attempt(state, frame, deadline) {
                Ok(response) => return Ok(response),
                Err(err) if err.is_transient() => {
                    // Any I/O failure invalidates the connection.
                    state.reset();
                    if !self.config.auto_reconnect {
                        return Err(err);
                    }
                    debug!(error = %err, "transport failure, retrying until deadline");
                    pause_before_retry(deadline)?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One full request/response exchange on the current connection.
    fn attempt(
        &self,
        state: &mut ChannelState,
        frame: &[u8],
        deadline: &Deadline,
    ) -> Result<Bytes> {
        self.guard_epoch(state)?;
        let stream = state.connected(&self.config)?;
        send_frame(stream, frame, deadline)?;
        recv_frame(stream, deadline)
    }

    /// Reject or refresh a socket inherited across a process fork, before
    /// any I/O touches it.
    fn guard_epoch(&self, state: &mut ChannelState) -> Result<()> {
        let current = ConnectionEpoch::current();
        match state.epoch {
            Some(opened_by) if opened_by != current => {
                if self.config.auto_reconnect {
                    debug!(%opened_by, %current, "connection epoch changed, reconnecting");
                    state.reset();
                    Ok(())
                } else {
                    Err(RpcError::ForkMismatch { opened_by, current })
                }
            }
            _ => Ok(()),
        }
    }

    fn open(&self, state: &mut ChannelState) -> Result<()> {
        let stream = uds::connect(&self.config.socket_path)?;
        state.epoch = Some(ConnectionEpoch::current());
        state.stream = Some(stream);
        Ok(())
    }
}

fn send_frame(stream: &mut UnixStream, frame: &[u8], deadline: &Deadline) -> Result<()> {
    stream
        .set_write_timeout(deadline.remaining()?)
        .map_err(TransportError::Io)?;
    stream
        .write_all(frame)
        .map_err(|err| io_error(err, deadline))?;
    Ok(())
}

fn recv_frame(stream: &mut UnixStream, deadline: &Deadline) -> Result<Bytes> {
    // Length prefix, one byte at a time so every read stays under the
    // deadline. Bounded to 32 bits by protocol convention.
    let mut acc = VarintAccumulator::new();
    let length = loop {
        let byte = read_byte(stream, deadline)?;
        if let Some(value) = acc.push(byte)? {
            break (value & u64::from(u32::MAX)) as usize;
        }
    };

    let mut payload = vec![0u8; length];
    let mut filled = 0;
    while filled < length {
        stream
            .set_read_timeout(deadline.remaining()?)
            .map_err(TransportError::Io)?;
        match stream.read(&mut payload[filled..]) {
            // Zero bytes read mid-frame means the daemon closed on us.
            Ok(0) => return Err(connection_reset()),
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(io_error(err, deadline)),
        }
    }
    Ok(Bytes::from(payload))
}

fn read_byte(stream: &mut UnixStream, deadline: &Deadline) -> Result<u8> {
    let mut byte = [0u8; 1];
    loop {
        stream
            .set_read_timeout(deadline.remaining()?)
            .map_err(TransportError::Io)?;
        match stream.read(&mut byte) {
            Ok(0) => return Err(connection_reset()),
            Ok(_) => return Ok(byte[0]),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(io_error(err, deadline)),
        }
    }
}

fn io_error(err: std::io::Error, deadline: &Deadline) -> RpcError {
    match err.kind() {
        ErrorKind::TimedOut | ErrorKind::WouldBlock => deadline.timeout_error(),
        _ => RpcError::Transport(TransportError::Io(err)),
    }
}

fn connection_reset() -> RpcError {
    RpcError::Transport(TransportError::Io(std::io::Error::new(
        ErrorKind::ConnectionReset,
        "daemon closed the connection",
    )))
}

fn pause_before_retry(deadline: &Deadline) -> Result<()> {
    let remaining = deadline.remaining()?;
    std::thread::sleep(remaining.map_or(RETRY_PAUSE, |left| left.min(RETRY_PAUSE)));
    Ok(())
}

/// Effective timeout for one call: the per-call value only ever extends the
/// configured default.
fn effective_timeout(default: Option<Duration>, requested: Option<Duration>) -> Option<Duration> {
    match (default, requested) {
        (Some(default), Some(requested)) => Some(default.max(requested)),
        (Some(default), None) => Some(default),
        (None, requested) => requested,
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use daemonlink_frame::{decode_frame, FrameError};
    use daemonlink_transport::UnixDomainSocket;

    use super::*;
    use crate::message::Envelope;

    fn temp_socket(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "daemonlink-rpc-{tag}-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join("daemon.sock")
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    fn config(path: &Path) -> ChannelConfig {
        ChannelConfig {
            socket_path: path.to_path_buf(),
            timeout: Some(Duration::from_secs(5)),
            auto_reconnect: true,
            error_table: ErrorTable::default(),
        }
    }

    fn read_frame(stream: &mut UnixStream, buf: &mut BytesMut) -> Option<Vec<u8>> {
        loop {
            if let Some(frame) = decode_frame(buf).unwrap() {
                return Some(frame.to_vec());
            }
            let mut chunk = [0u8; 4096];
            match stream.read(&mut chunk) {
                Ok(0) => return None,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
                Err(_) => return None,
            }
        }
    }

    fn write_frame(stream: &mut UnixStream, payload: &[u8]) {
        let mut out = BytesMut::new();
        encode_frame(payload, &mut out).unwrap();
        stream.write_all(&out).unwrap();
    }

    #[test]
    fn call_raw_roundtrip() {
        let path = temp_socket("raw");
        let listener = UnixDomainSocket::bind(&path).unwrap();

        let server = thread::spawn(move || {
            let mut stream = listener.accept().unwrap();
            let mut buf = BytesMut::new();
            let request = read_frame(&mut stream, &mut buf).unwrap();
            assert_eq!(request, b"hello");
            write_frame(&mut stream, b"world!");
        });

        let channel = RpcChannel::new(config(&path));
        let response = channel
            .call_raw(b"hello", Some(Duration::from_secs(1)))
            .unwrap();
        assert_eq!(response.as_ref(), b"world!");

        server.join().unwrap();
        cleanup(&path);
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Greeting {
        #[serde(default)]
        payload: String,
    }

    #[test]
    fn call_unwraps_success_envelope() {
        let path = temp_socket("typed");
        let listener = UnixDomainSocket::bind(&path).unwrap();

        let server = thread::spawn(move || {
            let mut stream = listener.accept().unwrap();
            let mut buf = BytesMut::new();
            let request = read_frame(&mut stream, &mut buf).unwrap();
            let value: serde_json::Value = serde_json::from_slice(&request).unwrap();
            assert_eq!(value["op"], "greet");
            let reply = serde_json::to_vec(&json!({ "error": 0, "payload": "world!" })).unwrap();
            write_frame(&mut stream, &reply);
        });

        let channel = RpcChannel::new(config(&path));
        let response: Envelope<Greeting> = channel
            .call(&json!({ "op": "greet" }), Some(Duration::from_secs(1)))
            .unwrap();
        assert_eq!(response.body.payload, "world!");

        server.join().unwrap();
        cleanup(&path);
    }

    #[test]
    fn daemon_failure_classifies_through_the_table() {
        let path = temp_socket("status");
        let listener = UnixDomainSocket::bind(&path).unwrap();

        let server = thread::spawn(move || {
            let mut stream = listener.accept().unwrap();
            let mut buf = BytesMut::new();
            let _request = read_frame(&mut stream, &mut buf).unwrap();
            let reply =
                serde_json::to_vec(&json!({ "error": 5, "errorMessage": "not found" })).unwrap();
            write_frame(&mut stream, &reply);
        });

        let mut cfg = config(&path);
        cfg.error_table = ErrorTable::new().with(5, "container-not-found");
        let channel = RpcChannel::new(cfg);

        let err = channel
            .call::<_, Envelope<Greeting>>(&json!({ "op": "find" }), None)
            .unwrap_err();
        match err {
            RpcError::Daemon(daemon) => {
                assert_eq!(daemon.code, 5);
                assert_eq!(daemon.kind.as_deref(), Some("container-not-found"));
                assert_eq!(daemon.message, "not found");
            }
            other => panic!("expected daemon error, got {other:?}"),
        }

        server.join().unwrap();
        cleanup(&path);
    }

    #[test]
    fn call_times_out_against_silent_daemon() {
        let path = temp_socket("timeout");
        let listener = UnixDomainSocket::bind(&path).unwrap();

        let server = thread::spawn(move || {
            let mut stream = listener.accept().unwrap();
            // Swallow the request and never answer.
            let mut buf = [0u8; 256];
            let _ = stream.read(&mut buf);
            thread::sleep(Duration::from_millis(600));
        });

        let timeout = Duration::from_millis(300);
        let mut cfg = config(&path);
        cfg.timeout = Some(timeout);
        let channel = RpcChannel::new(cfg);

        let started = Instant::now();
        let err = channel.call_raw(b"ping", None).unwrap_err();
        let elapsed = started.elapsed();

        assert!(matches!(err, RpcError::Timeout(t) if t == timeout));
        assert!(elapsed >= timeout, "failed too early: {elapsed:?}");
        assert!(
            elapsed < timeout + Duration::from_millis(250),
            "failed too late: {elapsed:?}"
        );

        server.join().unwrap();
        cleanup(&path);
    }

    #[test]
    fn reconnects_after_dropped_connection() {
        let path = temp_socket("reconnect");
        let listener = UnixDomainSocket::bind(&path).unwrap();
        let accepts = Arc::new(AtomicUsize::new(0));
        let server_accepts = Arc::clone(&accepts);

        let server = thread::spawn(move || {
            // First connection is dropped before any exchange.
            let first = listener.accept().unwrap();
            server_accepts.fetch_add(1, Ordering::SeqCst);
            drop(first);

            let mut stream = listener.accept().unwrap();
            server_accepts.fetch_add(1, Ordering::SeqCst);
            let mut buf = BytesMut::new();
            let request = read_frame(&mut stream, &mut buf).unwrap();
            write_frame(&mut stream, &request);
        });

        let channel = RpcChannel::new(config(&path));
        let response = channel
            .call_raw(b"ping", Some(Duration::from_secs(2)))
            .unwrap();
        assert_eq!(response.as_ref(), b"ping");
        assert!(accepts.load(Ordering::SeqCst) >= 2);

        server.join().unwrap();
        cleanup(&path);
    }

    #[test]
    fn fork_mismatch_fails_without_reconnect() {
        let path = temp_socket("fork-strict");
        let listener = UnixDomainSocket::bind(&path).unwrap();

        let mut cfg = config(&path);
        cfg.auto_reconnect = false;
        let channel = RpcChannel::new(cfg);
        channel.connect().unwrap();
        let mut daemon_side = listener.accept().unwrap();

        // Simulate a socket inherited across fork.
        let forged = ConnectionEpoch(std::process::id().wrapping_add(1));
        channel.lock_state().epoch = Some(forged);

        let err = channel.call_raw(b"ping", None).unwrap_err();
        assert!(matches!(err, RpcError::ForkMismatch { opened_by, .. } if opened_by == forged));

        // No bytes ever hit the stale socket.
        daemon_side
            .set_read_timeout(Some(Duration::from_millis(100)))
            .unwrap();
        let mut buf = [0u8; 16];
        let read = daemon_side.read(&mut buf);
        assert!(
            matches!(&read, Err(e) if e.kind() == ErrorKind::WouldBlock
                || e.kind() == ErrorKind::TimedOut),
            "stale socket saw traffic: {read:?}"
        );

        cleanup(&path);
    }

    #[test]
    fn fork_mismatch_reconnects_transparently() {
        let path = temp_socket("fork-reconnect");
        let listener = UnixDomainSocket::bind(&path).unwrap();

        let server = thread::spawn(move || {
            let mut stale = listener.accept().unwrap();

            let mut stream = listener.accept().unwrap();
            let mut buf = BytesMut::new();
            let request = read_frame(&mut stream, &mut buf).unwrap();
            write_frame(&mut stream, &request);

            // The abandoned connection was closed without any traffic.
            stale
                .set_read_timeout(Some(Duration::from_millis(500)))
                .unwrap();
            let mut probe = [0u8; 16];
            assert_eq!(stale.read(&mut probe).unwrap(), 0);
        });

        let channel = RpcChannel::new(config(&path));
        channel.connect().unwrap();
        channel.lock_state().epoch = Some(ConnectionEpoch(std::process::id().wrapping_add(1)));

        let response = channel
            .call_raw(b"ping", Some(Duration::from_secs(2)))
            .unwrap();
        assert_eq!(response.as_ref(), b"ping");

        server.join().unwrap();
        cleanup(&path);
    }

    #[test]
    fn concurrent_callers_each_get_their_own_reply() {
        let path = temp_socket("concurrent");
        let listener = UnixDomainSocket::bind(&path).unwrap();

        let server = thread::spawn(move || {
            let mut stream = listener.accept().unwrap();
            let mut buf = BytesMut::new();
            while let Some(request) = read_frame(&mut stream, &mut buf) {
                write_frame(&mut stream, &request);
            }
        });

        let channel = Arc::new(RpcChannel::new(config(&path)));
        let mut workers = Vec::new();
        for worker in 0..8u32 {
            let channel = Arc::clone(&channel);
            workers.push(thread::spawn(move || {
                for round in 0..4u32 {
                    let request = format!("worker-{worker}-round-{round}");
                    let response = channel
                        .call_raw(request.as_bytes(), Some(Duration::from_secs(5)))
                        .unwrap();
                    assert_eq!(response.as_ref(), request.as_bytes());
                }
            }));
        }
        for worker in workers {
            worker.join().unwrap();
        }

        channel.disconnect();
        server.join().unwrap();
        cleanup(&path);
    }

    #[test]
    fn per_call_timeout_extends_the_default() {
        let path = temp_socket("extend");
        let listener = UnixDomainSocket::bind(&path).unwrap();

        let server = thread::spawn(move || {
            let mut stream = listener.accept().unwrap();
            let mut buf = BytesMut::new();
            let request = read_frame(&mut stream, &mut buf).unwrap();
            thread::sleep(Duration::from_millis(250));
            write_frame(&mut stream, &request);
        });

        let mut cfg = config(&path);
        cfg.timeout = Some(Duration::from_millis(100));
        let channel = RpcChannel::new(cfg);

        let response = channel
            .call_raw(b"slow", Some(Duration::from_secs(2)))
            .unwrap();
        assert_eq!(response.as_ref(), b"slow");

        server.join().unwrap();
        cleanup(&path);
    }

    #[test]
    fn unbounded_call_waits_for_slow_daemon() {
        let path = temp_socket("unbounded");
        let listener = UnixDomainSocket::bind(&path).unwrap();

        let server = thread::spawn(move || {
            let mut stream = listener.accept().unwrap();
            let mut buf = BytesMut::new();
            let request = read_frame(&mut stream, &mut buf).unwrap();
            thread::sleep(Duration::from_millis(200));
            write_frame(&mut stream, &request);
        });

        let mut cfg = config(&path);
        cfg.timeout = None;
        let channel = RpcChannel::new(cfg);

        let response = channel.call_raw(b"patience", None).unwrap();
        assert_eq!(response.as_ref(), b"patience");

        server.join().unwrap();
        cleanup(&path);
    }

    #[test]
    fn hostile_length_prefix_is_not_retried() {
        let path = temp_socket("hostile");
        let listener = UnixDomainSocket::bind(&path).unwrap();

        let server = thread::spawn(move || {
            let mut stream = listener.accept().unwrap();
            let mut buf = BytesMut::new();
            let _request = read_frame(&mut stream, &mut buf).unwrap();
            // A length prefix that never terminates.
            stream.write_all(&[0xff; 11]).unwrap();
        });

        let channel = RpcChannel::new(config(&path));
        let started = Instant::now();
        let err = channel.call_raw(b"ping", None).unwrap_err();

        assert!(matches!(
            err,
            RpcError::Frame(FrameError::VarintOverflow { .. })
        ));
        assert!(started.elapsed() < Duration::from_secs(1));

        server.join().unwrap();
        cleanup(&path);
    }

    #[test]
    fn try_connect_probes_liveness() {
        let path = temp_socket("probe");

        let channel = RpcChannel::new(config(&path));
        assert!(matches!(
            channel.try_connect(),
            Err(RpcError::Transport(TransportError::Connect { .. }))
        ));

        let _listener = UnixDomainSocket::bind(&path).unwrap();
        channel.try_connect().unwrap();

        channel.disconnect();
        channel.disconnect();
        cleanup(&path);
    }

    #[test]
    fn connect_retries_until_deadline_when_unreachable() {
        let path = temp_socket("connect-retry");

        let timeout = Duration::from_millis(200);
        let mut cfg = config(&path);
        cfg.timeout = Some(timeout);
        let channel = RpcChannel::new(cfg);

        let started = Instant::now();
        let err = channel.connect().unwrap_err();
        assert!(matches!(err, RpcError::Timeout(t) if t == timeout));
        assert!(started.elapsed() >= timeout);

        cleanup(&path);
    }

    #[test]
    fn connect_fails_fast_without_reconnect() {
        let path = temp_socket("connect-strict");

        let mut cfg = config(&path);
        cfg.auto_reconnect = false;
        let channel = RpcChannel::new(cfg);

        let started = Instant::now();
        let err = channel.connect().unwrap_err();
        assert!(matches!(
            err,
            RpcError::Transport(TransportError::Connect { .. })
        ));
        assert!(started.elapsed() < Duration::from_millis(100));

        cleanup(&path);
    }

    #[test]
    fn effective_timeout_composition() {
        let short = Duration::from_millis(100);
        let long = Duration::from_millis(200);

        assert_eq!(effective_timeout(Some(long), Some(short)), Some(long));
        assert_eq!(effective_timeout(Some(short), Some(long)), Some(long));
        assert_eq!(effective_timeout(Some(short), None), Some(short));
        assert_eq!(effective_timeout(None, Some(long)), Some(long));
        assert_eq!(effective_timeout(None, None), None);
    }
}
