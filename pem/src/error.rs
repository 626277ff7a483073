use base64::DecodeError;
use thiserror::Error;

/// Errors that can occur when scanning a guarded RSA public key.
///
/// Offsets are byte positions in the scanned input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Input is too short to hold both guards and a payload, or exceeds the
    /// configured maximum.
    #[error("input length {length} outside accepted range ({min}, {max}]")]
    InvalidLength {
        length: usize,
        min: usize,
        max: usize,
    },

    /// The input does not start with `-----BEGIN RSA PUBLIC KEY-----\n`
    #[error("missing a pre encapsulation boundary")]
    MissingPreEncapsulationBoundary,

    /// The input starts with a well-formed boundary for another label
    #[error("unsupported label: {0}")]
    UnsupportedLabel(String),

    #[error("unexpected '-' at offset {offset}")]
    UnexpectedHyphen { offset: usize },

    #[error("invalid byte 0x{byte:02x} at offset {offset}")]
    InvalidByte { offset: usize, byte: u8 },

    /// Input ended before the post encapsulation boundary was reached
    #[error("truncated armor")]
    Truncated,

    /// No payload between the boundaries
    #[error("missing PEM data")]
    MissingData,

    #[error("post encapsulation boundary is {actual} bytes, expected {expected}")]
    PostEncapsulationBoundaryLength { expected: usize, actual: usize },

    #[error("invalid post encapsulation boundary")]
    InvalidPostEncapsulationBoundary,

    /// Failed to decode base64 data
    #[error("base64 decode: {0}")]
    Base64Decode(DecodeError),
}

impl Error {
    /// True for size violations, false for framing and content errors.
    pub fn is_length_error(&self) -> bool {
        matches!(self, Error::InvalidLength { .. })
    }
}
