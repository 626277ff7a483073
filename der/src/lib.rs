use nom::{IResult, Parser};
use num_bigint::{BigInt, Sign};
use rsapub_codec::decoder::{DecodableFrom, Decoder};
use rsapub_codec::encoder::{EncodableTo, Encoder};

pub mod error;

use error::Error;

/// A sequence of top-level TLVs read from a DER buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    tlvs: Vec<Tlv>,
}

impl Der {
    pub fn new(tlvs: Vec<Tlv>) -> Self {
        Der { tlvs }
    }

    pub fn elements(&self) -> &[Tlv] {
        &self.tlvs
    }
}

// Only the universal tags an RSA public key is built from are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Integer,
    Null,
    Sequence,
    Set,
    Unimplemented(u8),
}

impl From<u8> for Tag {
    fn from(value: u8) -> Self {
        match value {
            0x02 => Tag::Integer,
            0x05 => Tag::Null,
            0x30 => Tag::Sequence,
            0x31 => Tag::Set,
            _ => Tag::Unimplemented(value),
        }
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        match tag {
            Tag::Integer => 0x02,
            Tag::Null => 0x05,
            Tag::Sequence => 0x30,
            Tag::Set => 0x31,
            Tag::Unimplemented(value) => value,
        }
    }
}

impl Tag {
    fn is_constructed(self) -> bool {
        matches!(self, Tag::Sequence | Tag::Set)
    }
}

// An RSAPublicKey nests a single level below its SEQUENCE.
const MAX_NESTING_DEPTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    length: usize,
    value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Tlv(Vec<Tlv>),
    Data(Vec<u8>),
}

impl Tlv {
    pub fn new_primitive(tag: Tag, data: Vec<u8>) -> Self {
        Tlv {
            tag,
            length: data.len(),
            value: Value::Data(data),
        }
    }

    pub fn new_constructed(tag: Tag, tlvs: Vec<Tlv>) -> Self {
        Tlv {
            tag,
            length: tlvs.iter().map(Tlv::encoded_len).sum(),
            value: Value::Tlv(tlvs),
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Data(data) => Some(data),
            Value::Tlv(_) => None,
        }
    }

    pub fn tlvs(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Tlv(tlvs) => Some(tlvs),
            Value::Data(_) => None,
        }
    }

    fn parse(input: &[u8]) -> IResult<&[u8], Tlv> {
        Self::parse_nested(input, 0)
    }

    fn parse_nested(input: &[u8], depth: usize) -> IResult<&[u8], Tlv> {
        if depth > MAX_NESTING_DEPTH {
            return Err(nom::Err::Failure(nom::error::Error::new(
                input,
                nom::error::ErrorKind::TooLarge,
            )));
        }
        let (input, tag) = parse_tag(input)?;
        let (input, length) = parse_length(input)?;
        let (input, data) = take_bytes(input, length)?;

        if tag.is_constructed() {
            // parse TLV recursively.
            let mut tlvs = Vec::new();
            let mut data = data;
            while !data.is_empty() {
                let (rest, tlv) = Self::parse_nested(data, depth + 1)?;
                data = rest;
                tlvs.push(tlv);
            }

            return Ok((
                input,
                Tlv {
                    tag,
                    length,
                    value: Value::Tlv(tlvs),
                },
            ));
        }

        Ok((
            input,
            Tlv {
                tag,
                length,
                value: Value::Data(data.to_vec()),
            },
        ))
    }

    fn encoded_len(&self) -> usize {
        1 + length_octets(self.length) + self.length
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.push(u8::from(self.tag));
        write_length(out, self.length);
        match &self.value {
            Value::Data(data) => out.extend_from_slice(data),
            Value::Tlv(tlvs) => {
                for tlv in tlvs {
                    tlv.write(out);
                }
            }
        }
    }
}

fn parse_u8(input: &[u8]) -> IResult<&[u8], u8> {
    nom::number::complete::be_u8(input)
}

fn take_bytes(input: &[u8], count: usize) -> IResult<&[u8], &[u8]> {
    nom::bytes::complete::take(count).parse(input)
}

fn parse_tag(input: &[u8]) -> IResult<&[u8], Tag> {
    let (input, n) = parse_u8(input)?;
    Ok((input, Tag::from(n)))
}

fn parse_length(input: &[u8]) -> IResult<&[u8], usize> {
    let (rest, n) = parse_u8(input)?;
    if n & 0x80 == 0 {
        // short form: 0-127
        return Ok((rest, usize::from(n)));
    }
    // long form
    // The low 7 bits hold the byte count of the length field.
    // 0x80 (indefinite length) is not allowed in DER.
    let count = usize::from(n & 0x7f);
    if count == 0 || count > size_of::<usize>() {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::LengthValue,
        )));
    }
    let (rest, bs) = take_bytes(rest, count)?;
    let length = bs.iter().fold(0usize, |n, &b| (n << 8) | usize::from(b));
    Ok((rest, length))
}

fn length_octets(length: usize) -> usize {
    if length < 0x80 {
        return 1;
    }
    1 + (usize::BITS - length.leading_zeros()).div_ceil(8) as usize
}

fn write_length(out: &mut Vec<u8>, length: usize) {
    if length < 0x80 {
        out.push(length as u8);
        return;
    }
    let bytes = length.to_be_bytes();
    let skip = bytes.iter().take_while(|b| **b == 0).count();
    out.push(0x80 | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
}

fn decode_tlvs(mut input: &[u8]) -> Result<Der, Error> {
    let mut tlvs = Vec::new();
    while !input.is_empty() {
        let (rest, tlv) = Tlv::parse(input)?;
        input = rest;
        tlvs.push(tlv);
    }
    Ok(Der { tlvs })
}

impl DecodableFrom<&[u8]> for Der {}

impl Decoder<&[u8], Der> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        decode_tlvs(self)
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        decode_tlvs(self)
    }
}

impl EncodableTo<Der> for Vec<u8> {}

impl Encoder<Der, Vec<u8>> for Der {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        let mut out = Vec::with_capacity(self.tlvs.iter().map(Tlv::encoded_len).sum());
        for tlv in &self.tlvs {
            tlv.write(&mut out);
        }
        Ok(out)
    }
}

/// DER INTEGER, stored as a signed big integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Integer {
    inner: BigInt,
}

impl From<&[u8]> for Integer {
    fn from(data: &[u8]) -> Self {
        Integer {
            inner: BigInt::from_signed_bytes_be(data),
        }
    }
}

impl From<BigInt> for Integer {
    fn from(inner: BigInt) -> Self {
        Integer { inner }
    }
}

impl Integer {
    /// Builds a non-negative INTEGER from big-endian magnitude bytes.
    pub fn from_unsigned_bytes(bytes: &[u8]) -> Self {
        Integer {
            inner: BigInt::from_bytes_be(Sign::Plus, bytes),
        }
    }

    /// Big-endian magnitude without sign octets, or `None` if negative.
    pub fn to_unsigned_bytes(&self) -> Option<Vec<u8>> {
        self.inner.to_biguint().map(|n| n.to_bytes_be())
    }

    pub fn is_negative(&self) -> bool {
        self.inner.sign() == Sign::Minus
    }

    pub fn bits(&self) -> u64 {
        self.inner.bits()
    }

    fn to_der_content(&self) -> Vec<u8> {
        self.inner.to_signed_bytes_be()
    }
}

/*
RFC 8017 - RSA Public Key

RSAPublicKey ::= SEQUENCE {
    modulus           INTEGER,  -- n
    publicExponent    INTEGER   -- e
}
*/

/// PKCS#1 RSA Public Key structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RSAPublicKey {
    pub modulus: Integer,         // n
    pub public_exponent: Integer, // e
}

impl DecodableFrom<Der> for RSAPublicKey {}

impl Decoder<Der, RSAPublicKey> for Der {
    type Error = Error;

    fn decode(&self) -> Result<RSAPublicKey, Self::Error> {
        let [sequence] = self.elements() else {
            return Err(Error::ExpectedSingleElement(self.elements().len()));
        };
        let elements = match (sequence.tag(), sequence.tlvs()) {
            (Tag::Sequence, Some(tlvs)) => tlvs,
            _ => return Err(Error::ExpectedSequence),
        };
        if elements.len() != 2 {
            return Err(Error::InvalidElementCount {
                expected: 2,
                actual: elements.len(),
            });
        }

        let get_integer = |idx: usize, field: &'static str| -> Result<Integer, Error> {
            let tlv = &elements[idx];
            if tlv.tag() != Tag::Integer {
                return Err(Error::ExpectedInteger { field });
            }
            match tlv.data() {
                Some(data) if !data.is_empty() => Ok(Integer::from(data)),
                _ => Err(Error::IntegerNoData { field }),
            }
        };

        Ok(RSAPublicKey {
            modulus: get_integer(0, "modulus")?,
            public_exponent: get_integer(1, "publicExponent")?,
        })
    }
}

impl EncodableTo<RSAPublicKey> for Der {}

impl Encoder<RSAPublicKey, Der> for RSAPublicKey {
    type Error = Error;

    fn encode(&self) -> Result<Der, Self::Error> {
        Ok(Der::new(vec![Tlv::new_constructed(
            Tag::Sequence,
            vec![
                Tlv::new_primitive(Tag::Integer, self.modulus.to_der_content()),
                Tlv::new_primitive(Tag::Integer, self.public_exponent.to_der_content()),
            ],
        )]))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rsapub_codec::decoder::Decoder;
    use rsapub_codec::encoder::Encoder;

    use crate::error::Error;
    use crate::{
        Der, Integer, MAX_NESTING_DEPTH, RSAPublicKey, Tag, Tlv, Value, parse_length, parse_tag,
        write_length,
    };

    #[rstest(input, expected,
        case(vec![0x02], Tag::Integer),
        case(vec![0x02, 0x01], Tag::Integer),
        case(vec![0x30, 0x01], Tag::Sequence),
        case(vec![0x05, 0x00], Tag::Null),
        case(vec![0x04, 0x00], Tag::Unimplemented(0x04)),
    )]
    fn test_parse_tag(input: Vec<u8>, expected: Tag) {
        let actual = parse_tag(&input).unwrap();

        assert_eq!(expected, actual.1);
    }

    #[rstest(input, expected,
        case(vec![0x02], 0x02),
        case(vec![0x02, 0x01], 0x02),
        case(vec![0x7f], 0x7f),
        case(vec![0x81, 0x80], 0x80),
        case(vec![0x82, 0x01, 0x0a], 256 + 0x0a),
        case(vec![0x83, 0x01, 0x00, 0x00], 256 * 256),
        case(vec![0x82, 0xff, 0xff], 256 * 0xff + 0xff),
    )]
    fn test_parse_length(input: Vec<u8>, expected: usize) {
        let actual = parse_length(&input).unwrap();

        assert_eq!(expected, actual.1);
    }

    #[rstest(
        input,
        case::indefinite(vec![0x80]),
        case::too_many_octets(vec![0x89, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01]),
        case::truncated_long_form(vec![0x82, 0x01]),
        case::empty(vec![])
    )]
    fn test_parse_length_with_error(input: Vec<u8>) {
        assert!(parse_length(&input).is_err());
    }

    #[rstest(input, expected,
        case(vec![0x02, 0x01, 0x01], Tlv { tag: Tag::Integer, length: 1, value: Value::Data(vec![0x01]) }),
        case(vec![0x02, 0x03, 0x01, 0x00, 0x01], Tlv { tag: Tag::Integer, length: 3, value: Value::Data(vec![0x01, 0x00, 0x01]) }),
        case(vec![0x02, 0x09, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01], Tlv { tag: Tag::Integer, length: 9, value: Value::Data(vec![0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01]) }),
        case(vec![0x05, 0x00], Tlv { tag: Tag::Null, length: 0, value: Value::Data(vec![]) }),
    )]
    fn test_tlv_parse_primitive(input: Vec<u8>, expected: Tlv) {
        let (rest, actual) = Tlv::parse(&input).unwrap();
        assert!(rest.is_empty());
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_tlv_parse_structured() {
        let input = vec![0x30, 0x09, 0x02, 0x01, 0x07, 0x02, 0x01, 0x08, 0x02, 0x01, 0x09];
        let (_, actual) = Tlv::parse(&input).unwrap();

        assert_eq!(Tag::Sequence, actual.tag());
        assert_eq!(9, actual.len());
        let children = actual.tlvs().expect("SEQUENCE must hold nested TLVs");
        let values: Vec<&[u8]> = children.iter().filter_map(Tlv::data).collect();
        assert_eq!(vec![&[0x07][..], &[0x08][..], &[0x09][..]], values);
    }

    // NULL wrapped in `depth` SEQUENCEs.
    fn nested_sequences(depth: usize) -> Vec<u8> {
        let mut headers = Vec::with_capacity(depth);
        let mut length = 2;
        for _ in 0..depth {
            let mut header = vec![0x30];
            write_length(&mut header, length);
            length += header.len();
            headers.push(header);
        }
        headers
            .into_iter()
            .rev()
            .flatten()
            .chain([0x05, 0x00])
            .collect()
    }

    #[test]
    fn test_tlv_parse_nesting_within_limit() {
        let input = nested_sequences(MAX_NESTING_DEPTH);
        let (rest, _) = Tlv::parse(&input).unwrap();
        assert!(rest.is_empty());
    }

    #[rstest(depth, case(MAX_NESTING_DEPTH + 1), case(100_000))]
    fn test_decode_nesting_too_deep(depth: usize) {
        let input = nested_sequences(depth);
        let result: Result<Der, Error> = input.decode();
        assert_eq!(Err(Error::Parser(nom::error::ErrorKind::TooLarge)), result);
    }

    #[test]
    fn test_tlv_parse_value_shorter_than_length() {
        let input = vec![0x02, 0x05, 0x01, 0x02];
        assert!(Tlv::parse(&input).is_err());
    }

    #[rstest(input, modulus, exponent,
        case(vec![0x30, 0x06, 0x02, 0x01, 0x0b, 0x02, 0x01, 0x03], vec![0x0b], vec![0x03]),
        case(
            vec![0x30, 0x09, 0x02, 0x02, 0x00, 0xc3, 0x02, 0x03, 0x01, 0x00, 0x01],
            vec![0xc3],
            vec![0x01, 0x00, 0x01]
        ),
    )]
    fn test_decode_rsa_public_key(input: Vec<u8>, modulus: Vec<u8>, exponent: Vec<u8>) {
        let der: Der = input.decode().unwrap();
        let key: RSAPublicKey = der.decode().unwrap();

        assert_eq!(Some(modulus), key.modulus.to_unsigned_bytes());
        assert_eq!(Some(exponent), key.public_exponent.to_unsigned_bytes());
    }

    #[rstest(input, expected,
        case::empty(vec![], Error::ExpectedSingleElement(0)),
        case::trailing_element(
            vec![0x30, 0x06, 0x02, 0x01, 0x0b, 0x02, 0x01, 0x03, 0x05, 0x00],
            Error::ExpectedSingleElement(2)
        ),
        case::not_a_sequence(vec![0x02, 0x01, 0x03], Error::ExpectedSequence),
        case::one_field(vec![0x30, 0x03, 0x02, 0x01, 0x0b], Error::InvalidElementCount { expected: 2, actual: 1 }),
        case::null_modulus(
            vec![0x30, 0x05, 0x05, 0x00, 0x02, 0x01, 0x03],
            Error::ExpectedInteger { field: "modulus" }
        ),
        case::empty_exponent(
            vec![0x30, 0x05, 0x02, 0x01, 0x0b, 0x02, 0x00],
            Error::IntegerNoData { field: "publicExponent" }
        ),
    )]
    fn test_decode_rsa_public_key_with_error(input: Vec<u8>, expected: Error) {
        let der: Der = input.decode().unwrap();
        let result: Result<RSAPublicKey, Error> = der.decode();
        assert_eq!(Err(expected), result);
    }

    #[test]
    fn test_decode_truncated_sequence() {
        let input: Vec<u8> = vec![0x30, 0x08, 0x02, 0x01, 0x0b];
        let result: Result<Der, Error> = input.decode();
        assert!(matches!(result, Err(Error::Parser(_))));
    }

    #[test]
    fn test_negative_integer_has_no_magnitude() {
        let integer = Integer::from(&[0x8b][..]);
        assert!(integer.is_negative());
        assert_eq!(None, integer.to_unsigned_bytes());
    }

    #[test]
    fn test_encode_adds_sign_octet() {
        let key = RSAPublicKey {
            modulus: Integer::from_unsigned_bytes(&[0xc3]),
            public_exponent: Integer::from_unsigned_bytes(&[0x01, 0x00, 0x01]),
        };
        let der: Der = key.encode().unwrap();
        let bytes: Vec<u8> = der.encode().unwrap();

        assert_eq!(
            vec![0x30, 0x09, 0x02, 0x02, 0x00, 0xc3, 0x02, 0x03, 0x01, 0x00, 0x01],
            bytes
        );
    }

    #[test]
    fn test_encode_long_form_length() {
        let modulus = vec![0xab; 256];
        let key = RSAPublicKey {
            modulus: Integer::from_unsigned_bytes(&modulus),
            public_exponent: Integer::from_unsigned_bytes(&[0x01, 0x00, 0x01]),
        };
        let der: Der = key.encode().unwrap();
        let bytes: Vec<u8> = der.encode().unwrap();

        // SEQUENCE (4) + INTEGER header (4) + sign octet + 256 + exponent (5)
        assert_eq!(270, bytes.len());
        assert_eq!(&[0x30, 0x82, 0x01, 0x0a, 0x02, 0x82, 0x01, 0x01, 0x00], &bytes[..9]);

        let decoded: Der = bytes.decode().unwrap();
        let decoded: RSAPublicKey = decoded.decode().unwrap();
        assert_eq!(key, decoded);
    }
}
