use thiserror::Error;

/// Failures raised while decoding fixed-width wire structures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketError {
    /// The buffer ended before the fixed-size structure did.
    #[error("truncated frame: need {needed} bytes, got {actual}")]
    TruncatedFrame { needed: usize, actual: usize },

    /// A fixed-width field was decoded from a slice that is too short.
    #[error("malformed input: need {needed} bytes, got {actual}")]
    MalformedInput { needed: usize, actual: usize },
}
