use std::io::{self, Read};

use clap::Args;
use rsapub::{DEFAULT_MAX_FILE_LEN, DEFAULT_MAX_MODULUS_LEN, Limits};

use crate::error::{Error, Result};

/// Key file read when no path is given.
pub(crate) const DEFAULT_KEY_FILE: &str = "key.pub";

#[derive(Args)]
pub(crate) struct LimitArgs {
    /// Largest accepted PEM file, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_LEN)]
    pub(crate) max_file_len: usize,

    /// Largest accepted modulus, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_MODULUS_LEN)]
    pub(crate) max_modulus_len: usize,
}

impl LimitArgs {
    pub(crate) fn to_limits(&self) -> Limits {
        Limits::default()
            .with_max_file_len(self.max_file_len)
            .with_max_modulus_len(self.max_modulus_len)
    }
}

/// Returns `value` if given, otherwise everything on stdin.
pub(crate) fn read_text_input(value: Option<&str>) -> Result<String> {
    match value {
        Some(value) => Ok(value.to_string()),
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            String::from_utf8(buffer)
                .map_err(|_| Error::InvalidInput("stdin is not valid UTF-8".to_string()))
        }
    }
}
