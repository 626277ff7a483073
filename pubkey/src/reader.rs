use std::fs::File;
use std::io::Read;
use std::path::Path;

use rsapub_pem::{Base64Payload, GuardScanner};
use tracing::{debug, warn};

use crate::error::{Result, SizeError};
use crate::extractor::{DerExtractor, KeyFieldExtractor};
use crate::limits::{Limits, MAX_EXPONENT_LEN};
use crate::record::PublicKeyRecord;

/// Reads RSA public keys under a fixed set of [`Limits`].
///
/// Each call owns its input, so a `Reader` can be shared between threads
/// when its extractor can.
#[derive(Debug, Clone, Default)]
pub struct Reader<E = DerExtractor> {
    limits: Limits,
    extractor: E,
}

impl Reader<DerExtractor> {
    pub fn new(limits: Limits) -> Self {
        Reader {
            limits,
            extractor: DerExtractor,
        }
    }
}

impl<E: KeyFieldExtractor> Reader<E> {
    pub fn with_extractor(limits: Limits, extractor: E) -> Self {
        Reader { limits, extractor }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Reads at most `max_file_len` bytes from `path`.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = path.as_ref();
        let max = self.limits.max_file_len;

        let file = File::open(path)?;
        let mut buffer = Vec::new();
        // One extra byte tells an oversized file from one that fits exactly.
        file.take((max as u64).saturating_add(1)).read_to_end(&mut buffer)?;
        if buffer.len() > max {
            warn!(path = %path.display(), max, "key file too large");
            return Err(SizeError::File { max }.into());
        }

        debug!(path = %path.display(), length = buffer.len(), "read key file");
        Ok(buffer)
    }

    /// Reads and parses a PEM file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<PublicKeyRecord> {
        let buffer = self.read_file(path)?;
        self.parse_guarded(&buffer)
    }

    /// Runs the guard scanner only and returns the clean base64 payload.
    pub fn strip(&self, buffer: &[u8]) -> Result<Base64Payload> {
        let scanner = GuardScanner::new(self.limits.max_file_len);
        Ok(scanner.scan(buffer)?)
    }

    /// Parses a complete PEM buffer, guards included.
    pub fn parse_guarded(&self, buffer: &[u8]) -> Result<PublicKeyRecord> {
        let payload = self.strip(buffer)?;
        self.parse_payload(&payload)
    }

    /// Parses base64 DER with guards and line breaks already removed.
    pub fn parse_base64(&self, base64: &str) -> Result<PublicKeyRecord> {
        self.parse_payload(&Base64Payload::new(base64.as_bytes().to_vec()))
    }

    fn parse_payload(&self, payload: &Base64Payload) -> Result<PublicKeyRecord> {
        let fields = self.extractor.extract(payload)?;
        let modulus = trim_leading_zeros(&fields.modulus);
        let exponent = trim_leading_zeros(&fields.exponent);

        if modulus.len() > self.limits.max_modulus_len {
            return Err(SizeError::Modulus {
                actual: modulus.len(),
                max: self.limits.max_modulus_len,
            }
            .into());
        }
        if exponent.len() > MAX_EXPONENT_LEN {
            return Err(SizeError::Exponent {
                actual: exponent.len(),
                max: MAX_EXPONENT_LEN,
            }
            .into());
        }

        let exponent = exponent
            .iter()
            .fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
        debug!(exponent, modulus_len = modulus.len(), "key extracted");
        Ok(PublicKeyRecord::new(exponent, modulus.to_vec()))
    }
}

// Keeps at least one byte so that zero stays representable.
fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(bytes.len().saturating_sub(1));
    &bytes[start..]
}
