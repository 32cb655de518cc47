//! Blocking RPC channel to a local daemon over a Unix domain socket.
//!
//! This is the core of daemonlink. An [`RpcChannel`] owns one socket and
//! serializes every caller through an internal lock: exactly one
//! varint-framed request/response exchange is in flight at any instant.
//! Calls carry a deadline derived from the configured timeout, transient
//! transport failures are retried with transparent reconnection until that
//! deadline, and a socket inherited across a process fork is never reused.
//!
//! The [`Connection`] facade is the type higher-level daemon handles hold:
//! it stores the channel configuration and forwards lifecycle operations
//! and [`Connection::call`].

pub mod channel;
pub mod connection;
pub mod deadline;
pub mod error;
pub mod message;
pub mod status;

pub use channel::{
    ChannelConfig, ConnectionEpoch, RpcChannel, DEFAULT_SOCKET_PATH, DEFAULT_TIMEOUT,
};
pub use connection::Connection;
pub use deadline::Deadline;
pub use error::{Result, RpcError};
pub use message::{Envelope, ResponseStatus};
pub use status::{DaemonError, ErrorTable};
