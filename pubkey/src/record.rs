use std::fmt::{Display, Formatter, Write};

use rsapub_codec::encoder::Encoder;
use rsapub_der::{Der, Integer, RSAPublicKey};
use rsapub_pem::Base64Payload;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::{BackendError, Result};

const HEX_BYTES_PER_LINE: usize = 32;

/// The public fields of an RSA key.
///
/// Only produced by a successful extraction. `modulus` is big-endian
/// without a sign octet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyRecord {
    exponent: u32,
    modulus: Vec<u8>,
}

impl PublicKeyRecord {
    pub(crate) fn new(exponent: u32, modulus: Vec<u8>) -> Self {
        PublicKeyRecord { exponent, modulus }
    }

    pub fn exponent(&self) -> u32 {
        self.exponent
    }

    pub fn modulus(&self) -> &[u8] {
        &self.modulus
    }

    pub fn modulus_length(&self) -> usize {
        self.modulus.len()
    }

    /// Key size: the bit length of the modulus.
    pub fn bits(&self) -> u64 {
        Integer::from_unsigned_bytes(&self.modulus).bits()
    }

    /// Lowercase hex of the modulus without separators.
    pub fn modulus_hex(&self) -> String {
        let mut out = String::with_capacity(self.modulus.len() * 2);
        for byte in &self.modulus {
            // Writing to a String cannot fail.
            let _ = write!(out, "{:02x}", byte);
        }
        out
    }

    /// Canonical PKCS#1 DER encoding of the key.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        let key = RSAPublicKey {
            modulus: Integer::from_unsigned_bytes(&self.modulus),
            public_exponent: Integer::from_unsigned_bytes(&self.exponent.to_be_bytes()),
        };
        let der: Der = key.encode().map_err(BackendError::from)?;
        let bytes: Vec<u8> = der.encode().map_err(BackendError::from)?;
        Ok(bytes)
    }

    /// `RSA PUBLIC KEY` PEM text, wrapped at 64 columns.
    pub fn to_pem(&self) -> Result<String> {
        let der = self.to_der()?;
        Ok(Base64Payload::from_der(&der).to_pem())
    }
}

impl Display for PublicKeyRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Exponent: {}", self.exponent)?;
        writeln!(f, "Modulus ({} bytes):", self.modulus.len())?;
        for line in self.modulus.chunks(HEX_BYTES_PER_LINE) {
            writeln!(f)?;
            for byte in line {
                write!(f, "{:02x}", byte)?;
            }
        }
        writeln!(f)
    }
}

impl Serialize for PublicKeyRecord {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("PublicKeyRecord", 4)?;
        state.serialize_field("exponent", &self.exponent)?;
        state.serialize_field("modulus_length", &self.modulus.len())?;
        state.serialize_field("bits", &self.bits())?;
        state.serialize_field("modulus", &self.modulus_hex())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::PublicKeyRecord;

    #[test]
    fn test_display_single_line() {
        let record = PublicKeyRecord::new(3, vec![0x0b]);
        assert_eq!("Exponent: 3\nModulus (1 bytes):\n\n0b\n", record.to_string());
    }

    #[test]
    fn test_display_wraps_at_32_bytes() {
        let record = PublicKeyRecord::new(65537, (0u8..40).collect());
        let text = record.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!("Exponent: 65537", lines[0]);
        assert_eq!("Modulus (40 bytes):", lines[1]);
        assert_eq!("", lines[2]);
        assert_eq!(
            "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
            lines[3]
        );
        assert_eq!("2021222324252627", lines[4]);
        assert_eq!(5, lines.len());
        assert!(text.ends_with("2627\n"));
    }

    #[rstest(
        modulus,
        bits,
        case(vec![0x01], 1),
        case(vec![0x80, 0x00], 16),
        case(vec![0x0f, 0xff, 0xff], 20)
    )]
    fn test_bits(modulus: Vec<u8>, bits: u64) {
        assert_eq!(bits, PublicKeyRecord::new(3, modulus).bits());
    }

    #[test]
    fn test_to_der_is_canonical() {
        let record = PublicKeyRecord::new(65537, vec![0xc3]);
        assert_eq!(
            vec![0x30, 0x09, 0x02, 0x02, 0x00, 0xc3, 0x02, 0x03, 0x01, 0x00, 0x01],
            record.to_der().unwrap()
        );
    }

    #[test]
    fn test_serialize_json() {
        let record = PublicKeyRecord::new(3, vec![0x00, 0xab, 0xcd]);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(3, json["exponent"]);
        assert_eq!(3, json["modulus_length"]);
        assert_eq!(16, json["bits"]);
        assert_eq!("00abcd", json["modulus"]);
    }
}
