use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::channel::{ChannelConfig, RpcChannel};
use crate::error::Result;
use crate::message::ResponseStatus;

/// Client-side handle to the daemon.
///
/// A thin wrapper over one [`RpcChannel`]: it holds the channel
/// configuration (socket path, default timeout, reconnect policy) and
/// forwards lifecycle operations and [`call`](Self::call). Typed daemon
/// handles are built on top of this type and never touch the socket
/// directly.
#[derive(Debug)]
pub struct Connection {
    channel: RpcChannel,
}

impl Connection {
    /// Connection to the given socket path with default settings.
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self::with_config(ChannelConfig::new(socket_path))
    }

    pub fn with_config(config: ChannelConfig) -> Self {
        Self {
            channel: RpcChannel::new(config),
        }
    }

    /// Open a fresh connection; see [`RpcChannel::connect`].
    pub fn connect(&self) -> Result<()> {
        self.channel.connect()
    }

    /// Single connection attempt for liveness probing.
    pub fn try_connect(&self) -> Result<()> {
        self.channel.try_connect()
    }

    /// Close the connection if one is open.
    pub fn disconnect(&self) {
        self.channel.disconnect()
    }

    /// Issue one request and return the decoded response payload.
    pub fn call<R, P>(&self, request: &R, timeout: Option<Duration>) -> Result<P>
    where
        R: Serialize,
        P: DeserializeOwned + ResponseStatus,
    {
        self.channel.call(request, timeout)
    }

    /// Exchange raw payload bytes; the wire schema stays with the caller.
    pub fn call_raw(&self, payload: &[u8], timeout: Option<Duration>) -> Result<Bytes> {
        self.channel.call_raw(payload, timeout)
    }

    /// Credentials of the daemon process, if currently connected.
    pub fn peer_credentials(&self) -> Option<(u32, u32, u32)> {
        self.channel.peer_credentials()
    }

    pub fn socket_path(&self) -> &Path {
        &self.channel.config().socket_path
    }

    pub fn config(&self) -> &ChannelConfig {
        self.channel.config()
    }
}

impl Default for Connection {
    /// Connection to the conventional daemon socket.
    fn default() -> Self {
        Self::with_config(ChannelConfig::default())
    }
}
