//! The key field extractor seam.
//!
//! The scanner hands a clean base64 payload to a [`KeyFieldExtractor`],
//! which returns the raw modulus and exponent bytes. [`DerExtractor`] is the
//! implementation used by default: base64 via `rsapub-pem`, then PKCS#1 DER
//! via `rsapub-der`.

use std::sync::OnceLock;

use rsapub_codec::decoder::Decoder;
use rsapub_codec::encoder::Encoder;
use rsapub_der::{Der, RSAPublicKey};
use rsapub_pem::Base64Payload;
use tracing::{debug, trace, warn};

use crate::error::BackendError;

/// Raw big-endian field bytes as returned by an extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFields {
    pub modulus: Vec<u8>,
    pub exponent: Vec<u8>,
}

/// Decodes a base64 RSA public key into its fields.
///
/// Implementations must reject anything that is not a well-formed key. Size
/// limits are enforced by the caller.
pub trait KeyFieldExtractor {
    fn extract(&self, payload: &Base64Payload) -> Result<KeyFields, BackendError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerExtractor;

impl KeyFieldExtractor for DerExtractor {
    fn extract(&self, payload: &Base64Payload) -> Result<KeyFields, BackendError> {
        initialize()?;

        let bytes: Vec<u8> = payload.decode().map_err(BackendError::Base64)?;
        trace!(der_len = bytes.len(), "payload decoded");
        let der: Der = bytes.decode()?;
        let key: RSAPublicKey = der.decode()?;
        fields_from_key(&key)
    }
}

fn fields_from_key(key: &RSAPublicKey) -> Result<KeyFields, BackendError> {
    let modulus = key
        .modulus
        .to_unsigned_bytes()
        .ok_or(BackendError::NegativeInteger("modulus"))?;
    let exponent = key
        .public_exponent
        .to_unsigned_bytes()
        .ok_or(BackendError::NegativeInteger("publicExponent"))?;
    Ok(KeyFields { modulus, exponent })
}

static BACKEND: OnceLock<Result<(), String>> = OnceLock::new();

/// Brings the DER backend up once per process.
///
/// The first caller runs a decode/encode self-test; its outcome is cached
/// and returned to every later caller, including concurrent ones.
pub fn initialize() -> Result<(), BackendError> {
    BACKEND
        .get_or_init(|| {
            let outcome = self_test().map_err(|e| e.to_string());
            match &outcome {
                Ok(()) => debug!("DER backend ready"),
                Err(e) => warn!(error = %e, "DER backend self-test failed"),
            }
            outcome
        })
        .clone()
        .map_err(BackendError::Initialization)
}

// RSAPublicKey { modulus: 11, publicExponent: 3 }
const PROBE: &[u8] = &[0x30, 0x06, 0x02, 0x01, 0x0b, 0x02, 0x01, 0x03];

fn self_test() -> Result<(), BackendError> {
    let der: Der = PROBE.decode()?;
    let key: RSAPublicKey = der.decode()?;
    let fields = fields_from_key(&key)?;
    let reencoded: Der = key.encode()?;
    let bytes: Vec<u8> = reencoded.encode()?;

    if fields.modulus != [0x0b] || fields.exponent != [0x03] || bytes != PROBE {
        return Err(BackendError::Initialization(
            "DER round trip mismatch".to_string(),
        ));
    }
    Ok(())
}
