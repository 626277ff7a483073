//! Decoder trait for typed conversions.
//!
//! `Decoder<T, D>` is implemented on the source type `T` and produces a `D`.
//! `D` must implement the marker trait `DecodableFrom<T>`, so only the
//! conversions a crate declares explicitly can be called.
//!
//! ```no_run
//! use rsapub_codec::decoder::{DecodableFrom, Decoder};
//!
//! struct Armored(Vec<u8>);
//! struct Stripped(Vec<u8>);
//!
//! #[derive(Debug)]
//! struct StripError;
//!
//! impl DecodableFrom<Armored> for Stripped {}
//!
//! impl Decoder<Armored, Stripped> for Armored {
//!     type Error = StripError;
//!
//!     fn decode(&self) -> Result<Stripped, Self::Error> {
//!         Ok(Stripped(self.0.iter().copied().filter(|b| *b != b'\n').collect()))
//!     }
//! }
//! ```

/// Converts `self` (of type `T`) into a `D`.
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is malformed for the destination type.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait: `Self` can be decoded from `T`.
pub trait DecodableFrom<T> {}
