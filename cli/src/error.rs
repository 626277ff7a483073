use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error(transparent)]
    Key(#[from] rsapub::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Exit report code, shared with `rsapub::ErrorKind::code`.
    pub(crate) fn code(&self) -> u8 {
        match self {
            Error::Key(e) => e.code(),
            Error::InvalidInput(_) => rsapub::ErrorKind::Corrupt.code(),
            // stdin and stdout failures
            Error::Io(_) | Error::Json(_) | Error::Yaml(_) | Error::Fmt(_) => {
                rsapub::ErrorKind::Io.code()
            }
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, Error>;
