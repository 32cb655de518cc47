/// Errors that can occur while encoding or decoding frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A varint ran past the maximum encoded length without terminating.
    #[error("varint not terminated within {max} bytes")]
    VarintOverflow { max: usize },

    /// The buffer ended in the middle of a varint.
    #[error("truncated varint")]
    TruncatedVarint,

    /// The payload does not fit in a 32-bit length prefix.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
