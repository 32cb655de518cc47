//! Varint length-prefixed message framing for the daemonlink wire protocol.
//!
//! Every message on the wire is `varint(payload_len) || payload_len bytes`.
//! The length prefix uses the common 7-bits-per-byte continuation encoding
//! and is bounded to 32 bits by protocol convention.
//!
//! This crate is pure: it encodes into and decodes from buffers, and never
//! touches a socket.

pub mod codec;
pub mod error;
pub mod varint;

pub use codec::{decode_frame, encode_frame, MAX_FRAME_PAYLOAD};
pub use error::{FrameError, Result};
pub use varint::{decode_varint, decode_varint32, encode_varint, VarintAccumulator, MAX_VARINT_LEN};
