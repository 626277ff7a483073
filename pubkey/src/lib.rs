//! # rsapub
//!
//! Extracts the modulus and public exponent from `RSA PUBLIC KEY` (PKCS#1)
//! PEM files.
//!
//! ```text
//! file bytes → GuardScanner → Base64Payload → KeyFieldExtractor → PublicKeyRecord
//! ```
//!
//! Three entry points form a layered API; each one delegates to the next:
//!
//! - [`from_file`] reads a bounded amount of bytes from disk,
//! - [`from_guarded`] validates the guards and strips the armor,
//! - [`from_base64`] decodes an already clean payload.
//!
//! Use [`Reader`] to change the [`Limits`] or plug in another
//! [`KeyFieldExtractor`].
//!
//! ```no_run
//! let key = rsapub::from_file("key.pub")?;
//! println!("{}", key);
//! # Ok::<(), rsapub::Error>(())
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod extractor;
mod limits;
mod reader;
mod record;

use std::path::Path;

pub use error::{BackendError, Error, ErrorKind, Result, SizeError};
pub use extractor::{DerExtractor, KeyFieldExtractor, KeyFields};
pub use limits::{DEFAULT_MAX_MODULUS_LEN, Limits, MAX_EXPONENT_LEN};
pub use reader::Reader;
pub use record::PublicKeyRecord;
pub use rsapub_pem::{Base64Payload, DEFAULT_MAX_FILE_LEN};

/// Reads an `RSA PUBLIC KEY` PEM file with the default limits.
pub fn from_file(path: impl AsRef<Path>) -> Result<PublicKeyRecord> {
    Reader::new(Limits::default()).parse_file(path)
}

/// Parses a PEM buffer, guards included, with the default limits.
pub fn from_guarded(buffer: &[u8]) -> Result<PublicKeyRecord> {
    Reader::new(Limits::default()).parse_guarded(buffer)
}

/// Parses base64 DER without guards or line breaks.
pub fn from_base64(base64: &str) -> Result<PublicKeyRecord> {
    Reader::new(Limits::default()).parse_base64(base64)
}

#[cfg(test)]
mod tests {
    const RSA_2048: &[u8] = include_bytes!("../../testdata/keys/rsa2048.pub");

    #[test]
    fn test_entry_points_agree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.pub");
        std::fs::write(&path, RSA_2048).unwrap();

        let from_file = crate::from_file(&path).unwrap();
        let from_guarded = crate::from_guarded(RSA_2048).unwrap();
        let payload = crate::Reader::new(crate::Limits::default())
            .strip(RSA_2048)
            .unwrap();
        let from_base64 = crate::from_base64(&payload.to_string()).unwrap();

        assert_eq!(from_file, from_guarded);
        assert_eq!(from_guarded, from_base64);
        assert_eq!(65537, from_file.exponent());
        assert_eq!(256, from_file.modulus_length());
    }

    #[test]
    fn test_deeply_nested_der_from_base64() {
        // 200000 SEQUENCE headers with long-form lengths around a NULL
        let mut headers = Vec::new();
        let mut length: usize = 2;
        for _ in 0..200_000 {
            let octets = length.to_be_bytes();
            let skip = octets.iter().take_while(|b| **b == 0).count();
            let mut header = vec![0x30, 0x80 | (octets.len() - skip) as u8];
            header.extend_from_slice(&octets[skip..]);
            length += header.len();
            headers.push(header);
        }
        let der: Vec<u8> = headers
            .into_iter()
            .rev()
            .flatten()
            .chain([0x05, 0x00])
            .collect();
        let base64 = crate::Base64Payload::from_der(&der).to_string();

        let err = crate::from_base64(&base64).unwrap_err();
        assert_eq!(crate::ErrorKind::BackendInternal, err.kind());
    }

    #[test]
    fn test_oversized_buffer() {
        let err = crate::from_guarded(&[b'-'; 3000]).unwrap_err();
        assert_eq!(crate::ErrorKind::TooLarge, err.kind());
    }
}
