use thiserror::Error;

/// Errors raised while reading DER or mapping it onto `RSAPublicKey`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("parser error {0:?}")]
    Parser(nom::error::ErrorKind),
    #[error("parser incomplete: {0:?}")]
    ParserIncomplete(nom::Needed),
    #[error("expected exactly one top-level element, got {0}")]
    ExpectedSingleElement(usize),
    #[error("expected SEQUENCE")]
    ExpectedSequence,
    #[error("expected {expected} elements, got {actual}")]
    InvalidElementCount { expected: usize, actual: usize },
    #[error("expected INTEGER for {field}")]
    ExpectedInteger { field: &'static str },
    #[error("INTEGER: no data for {field}")]
    IntegerNoData { field: &'static str },
}

impl From<nom::Err<nom::error::Error<&[u8]>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&[u8]>>) -> Self {
        match err {
            nom::Err::Incomplete(needed) => Error::ParserIncomplete(needed),
            nom::Err::Error(e) | nom::Err::Failure(e) => Error::Parser(e.code),
        }
    }
}
