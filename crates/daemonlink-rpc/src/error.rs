use std::time::Duration;

use daemonlink_frame::FrameError;
use daemonlink_transport::TransportError;

use crate::channel::ConnectionEpoch;
use crate::status::DaemonError;

/// Errors produced by daemon calls.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The socket could not be opened or an operation failed at the OS
    /// level (refused, reset, broken pipe).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response length prefix could not be decoded.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The call deadline elapsed before the daemon answered.
    #[error("call timed out after {0:?}")]
    Timeout(Duration),

    /// The socket was opened by a different process and auto-reconnect is
    /// disabled.
    #[error("socket opened by process {opened_by}, used by process {current}")]
    ForkMismatch {
        opened_by: ConnectionEpoch,
        current: ConnectionEpoch,
    },

    /// The daemon reported a non-success status code.
    #[error(transparent)]
    Daemon(#[from] DaemonError),

    /// Request or response payload (de)serialization failed.
    #[error("payload codec error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RpcError {
    /// Transient failures are the ones worth a reconnect: transport errors
    /// and timeouts. Decode and daemon-status failures are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;
