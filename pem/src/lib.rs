//! Guarded-text scanner for `RSA PUBLIC KEY` PEM files.
//!
//! A single forward pass validates the begin boundary, strips the armor
//! (line breaks) from the body, and checks that exactly the end boundary
//! remains. The result is a [`Base64Payload`] ready for base64 decoding.
//!
//! ```
//! use rsapub_pem::GuardScanner;
//!
//! let pem = b"-----BEGIN RSA PUBLIC KEY-----\nMAYCAQsCAQM=\n-----END RSA PUBLIC KEY-----\n";
//! let payload = GuardScanner::default().scan(pem).unwrap();
//! assert_eq!(b"MAYCAQsCAQM=", payload.as_bytes());
//! ```

pub mod error;

use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use base64::{Engine, engine::general_purpose::STANDARD};
use error::Error;
use regex::Regex;
use rsapub_codec::decoder::{DecodableFrom, Decoder};
use tracing::{debug, trace};

const RSA_PUBLIC_KEY_LABEL: &str = "RSA PUBLIC KEY";
const BEGIN_GUARD_TEXT: &str = "-----BEGIN RSA PUBLIC KEY-----\n";
const END_GUARD_TEXT: &str = "-----END RSA PUBLIC KEY-----\n";

/// Pre encapsulation boundary, including its line break (31 bytes).
pub const BEGIN_GUARD: &[u8] = BEGIN_GUARD_TEXT.as_bytes();
/// Post encapsulation boundary, including its line break (29 bytes).
pub const END_GUARD: &[u8] = END_GUARD_TEXT.as_bytes();
/// Largest input accepted by [`GuardScanner::default`].
pub const DEFAULT_MAX_FILE_LEN: usize = 2048;

// Bytes below this value are never part of an armored body. The real
// alphabet check happens in the base64 decoder.
const MIN_PAYLOAD_BYTE: u8 = 3;
// RFC 7468: base64 text should be wrapped at 64 characters
const LINE_WIDTH: usize = 64;

static BEGIN_LABEL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^-----BEGIN ([A-Z0-9 ]+)-----").ok());

/// Base64 text with the guards and line breaks removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base64Payload {
    data: Vec<u8>,
}

impl Base64Payload {
    pub fn new(data: Vec<u8>) -> Self {
        Base64Payload { data }
    }

    /// Base64-encodes raw DER bytes.
    pub fn from_der(der: &[u8]) -> Self {
        Base64Payload {
            data: STANDARD.encode(der).into_bytes(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Wraps the payload between the guards, 64 columns per line.
    pub fn to_pem(&self) -> String {
        let mut out = String::with_capacity(
            BEGIN_GUARD.len() + END_GUARD.len() + self.data.len() + self.data.len() / LINE_WIDTH + 1,
        );
        out.push_str(BEGIN_GUARD_TEXT);
        for line in self.data.chunks(LINE_WIDTH) {
            out.extend(line.iter().map(|&b| char::from(b)));
            out.push('\n');
        }
        out.push_str(END_GUARD_TEXT);
        out
    }
}

impl Display for Base64Payload {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.data))
    }
}

impl DecodableFrom<Base64Payload> for Vec<u8> {}

impl Decoder<Base64Payload, Vec<u8>> for Base64Payload {
    type Error = Error;

    fn decode(&self) -> Result<Vec<u8>, Self::Error> {
        STANDARD.decode(&self.data).map_err(Error::Base64Decode)
    }
}

/// Validates the PEM envelope and strips the armor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardScanner {
    max_len: usize,
}

impl Default for GuardScanner {
    fn default() -> Self {
        GuardScanner {
            max_len: DEFAULT_MAX_FILE_LEN,
        }
    }
}

impl GuardScanner {
    pub fn new(max_len: usize) -> Self {
        GuardScanner { max_len }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Scans `data` and returns the clean base64 payload.
    ///
    /// `data` must be longer than twice the begin guard and no longer than
    /// the configured maximum. The input is not modified.
    pub fn scan(&self, data: &[u8]) -> Result<Base64Payload, Error> {
        let min = 2 * BEGIN_GUARD.len();
        if data.len() <= min || data.len() > self.max_len {
            debug!(length = data.len(), max = self.max_len, "input length out of range");
            return Err(Error::InvalidLength {
                length: data.len(),
                min,
                max: self.max_len,
            });
        }

        // == pre encapsulation boundary ==
        if !data.starts_with(BEGIN_GUARD) {
            let err = match sniff_label(data) {
                Some(label) if label != RSA_PUBLIC_KEY_LABEL => Error::UnsupportedLabel(label),
                _ => Error::MissingPreEncapsulationBoundary,
            };
            debug!(error = %err, "begin guard mismatch");
            return Err(err);
        }

        // == armor ==
        let (payload, end) = strip_armor(data, BEGIN_GUARD.len())?;

        // == post encapsulation boundary ==
        let rest = &data[end..];
        if rest.len() != END_GUARD.len() {
            debug!(offset = end, remaining = rest.len(), "end guard length mismatch");
            return Err(Error::PostEncapsulationBoundaryLength {
                expected: END_GUARD.len(),
                actual: rest.len(),
            });
        }
        if rest != END_GUARD {
            debug!(offset = end, "end guard mismatch");
            return Err(Error::InvalidPostEncapsulationBoundary);
        }

        trace!(payload_len = payload.len(), "armor stripped");
        Ok(Base64Payload::new(payload))
    }
}

/*
 * body byte  | copied | had_equals | is_newline | terminates
 * '='        | yes    | set        | clear      | no
 * '\n'       | no     | -          | set        | if had_equals, after the '\n'
 * '-'        | no     | -          | -          | if is_newline, on the '-'; else error
 * < 0x03     | -      | -          | -          | error
 * other      | yes    | -          | clear      | no
 */
#[derive(Debug, Default)]
struct ParseState {
    // first unprocessed byte
    read: usize,
    had_equals: bool,
    // starts false so that a body cannot open with the end guard
    is_newline: bool,
}

/// Copies the body starting at `start` into a new buffer without line breaks.
///
/// Returns the payload and the offset of the first byte after the body,
/// which is where the end guard must begin.
fn strip_armor(data: &[u8], start: usize) -> Result<(Vec<u8>, usize), Error> {
    let mut state = ParseState {
        read: start,
        ..ParseState::default()
    };
    let mut out = Vec::with_capacity(data.len().saturating_sub(start));

    loop {
        let Some(&byte) = data.get(state.read) else {
            debug!(offset = state.read, "input ended inside the armor");
            return Err(Error::Truncated);
        };
        match byte {
            b'=' => {
                state.had_equals = true;
                state.is_newline = false;
                out.push(byte);
            }
            b'\n' => {
                state.is_newline = true;
                if state.had_equals {
                    // Padding seen: the next line is the end guard.
                    state.read += 1;
                    break;
                }
            }
            b'-' => {
                if !state.is_newline {
                    debug!(offset = state.read, "hyphen inside the armor");
                    return Err(Error::UnexpectedHyphen { offset: state.read });
                }
                break;
            }
            _ if byte < MIN_PAYLOAD_BYTE => {
                debug!(offset = state.read, byte, "control byte inside the armor");
                return Err(Error::InvalidByte {
                    offset: state.read,
                    byte,
                });
            }
            _ => {
                state.is_newline = false;
                out.push(byte);
            }
        }
        state.read += 1;
    }

    debug_assert!(out.len() <= state.read - start);
    if out.is_empty() {
        debug!("armor holds no payload");
        return Err(Error::MissingData);
    }
    Ok((out, state.read))
}

fn sniff_label(data: &[u8]) -> Option<String> {
    let line = data.split(|&b| b == b'\n').next()?;
    let line = String::from_utf8_lossy(line);
    let captured = BEGIN_LABEL.as_ref()?.captures(&line)?;
    captured.get(1).map(|m| m.as_str().to_string())
}
