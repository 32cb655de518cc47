use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::varint::{decode_varint32, encode_varint};

/// Maximum payload size expressible in a 32-bit length prefix.
pub const MAX_FRAME_PAYLOAD: usize = u32::MAX as usize;

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────────────┬──────────────────────┐
/// │ varint(length)     │ Payload              │
/// │ (1-5 bytes)        │ (length bytes)       │
/// └────────────────────┴──────────────────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_FRAME_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_FRAME_PAYLOAD,
        });
    }
    dst.reserve(payload.len() + 5);
    encode_varint(payload.len() as u64, dst);
    dst.put_slice(payload);
    Ok(())
}

/// Decode one frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut) -> Result<Option<Bytes>> {
    let (length, header_len) = match decode_varint32(src, 0) {
        Ok(decoded) => decoded,
        Err(FrameError::TruncatedVarint) => return Ok(None), // Need more data
        Err(err) => return Err(err),
    };

    let length = length as usize;
    if src.len() < header_len + length {
        return Ok(None); // Need more data
    }

    src.advance(header_len);
    Ok(Some(src.split_to(length).freeze()))
}
