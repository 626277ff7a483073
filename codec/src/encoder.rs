//! Encoder trait, the reverse of [`crate::decoder::Decoder`].
//!
//! Used to turn extracted key fields back into canonical DER, which is how
//! the inspector re-emits a normalized PEM file.

/// Converts `self` (of type `T`) into an `E`.
pub trait Encoder<T, E: EncodableTo<T>> {
    type Error;

    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait: `Self` can be produced by encoding a `T`.
pub trait EncodableTo<T> {}
