//! Error types for key extraction.
//!
//! Every failure belongs to one of four flat [`ErrorKind`]s. The variants
//! keep the lower-level cause as their source so callers can log detail
//! while branching only on the kind.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The key file could not be opened or read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input or a decoded field exceeds its configured limit.
    #[error("too large: {0}")]
    TooLarge(SizeError),

    /// Malformed PEM framing.
    #[error("corrupt PEM: {0}")]
    Corrupt(#[source] rsapub_pem::error::Error),

    /// The key field extractor failed.
    #[error("key backend: {0}")]
    BackendInternal(#[source] BackendError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SizeError {
    #[error("input length {length} outside accepted range ({min}, {max}]")]
    Input { length: usize, min: usize, max: usize },

    #[error("file is larger than {max} bytes")]
    File { max: usize },

    #[error("modulus is {actual} bytes, limit is {max}")]
    Modulus { actual: usize, max: usize },

    #[error("exponent is {actual} bytes, limit is {max}")]
    Exponent { actual: usize, max: usize },
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("base64: {0}")]
    Base64(#[source] rsapub_pem::error::Error),

    #[error("DER: {0}")]
    Der(#[from] rsapub_der::error::Error),

    #[error("negative INTEGER for {0}")]
    NegativeInteger(&'static str),

    #[error("initialization failed: {0}")]
    Initialization(String),

    /// Failure reported by a custom extractor.
    #[error("{0}")]
    Other(String),
}

/// Flat error classification with stable numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    Io,
    TooLarge,
    Corrupt,
    BackendInternal,
}

impl ErrorKind {
    pub fn code(self) -> u8 {
        match self {
            ErrorKind::Io => 1,
            ErrorKind::TooLarge => 2,
            ErrorKind::Corrupt => 3,
            ErrorKind::BackendInternal => 4,
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::TooLarge(_) => ErrorKind::TooLarge,
            Error::Corrupt(_) => ErrorKind::Corrupt,
            Error::BackendInternal(_) => ErrorKind::BackendInternal,
        }
    }

    pub fn code(&self) -> u8 {
        self.kind().code()
    }
}

impl From<rsapub_pem::error::Error> for Error {
    fn from(err: rsapub_pem::error::Error) -> Self {
        match err {
            rsapub_pem::error::Error::InvalidLength { length, min, max } => {
                Error::TooLarge(SizeError::Input { length, min, max })
            }
            other => Error::Corrupt(other),
        }
    }
}

impl From<BackendError> for Error {
    fn from(err: BackendError) -> Self {
        Error::BackendInternal(err)
    }
}

impl From<SizeError> for Error {
    fn from(err: SizeError) -> Self {
        Error::TooLarge(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
