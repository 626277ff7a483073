//! # rsapub-codec
//!
//! Conversion traits shared by the rsapub crates.
//!
//! Every stage of the key inspection pipeline is a typed conversion:
//! ```text
//! PEM text → Base64Payload → Vec<u8> (DER) → Der → RSAPublicKey → PublicKeyRecord
//! ```
//!
//! A stage implements [`decoder::Decoder`] on its source type, and the
//! destination type opts in with [`decoder::DecodableFrom`]. The reverse
//! direction (used to re-emit canonical DER) goes through
//! [`encoder::Encoder`] and [`encoder::EncodableTo`].
//!
//! ```ignore
//! use rsapub_codec::decoder::Decoder;
//! use rsapub_der::{Der, RSAPublicKey};
//!
//! let bytes: Vec<u8> = vec![0x30, 0x06, 0x02, 0x01, 0x0b, 0x02, 0x01, 0x03];
//! let der: Der = bytes.decode()?;
//! let key: RSAPublicKey = der.decode()?;
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
