//! Unix domain socket transport for daemonlink clients.
//!
//! The daemon protocol is defined over filesystem-path Unix domain stream
//! sockets, so this crate is Unix-only. The client side is [`uds::connect`];
//! [`uds::UnixDomainSocket`] provides bind/accept for in-process peers
//! (test daemons and tooling).

pub mod error;
#[cfg(unix)]
pub mod uds;

pub use error::{Result, TransportError};
#[cfg(unix)]
pub use uds::{connect, peer_credentials, UnixDomainSocket};
