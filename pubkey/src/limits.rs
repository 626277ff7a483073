use rsapub_pem::DEFAULT_MAX_FILE_LEN;

/// Largest modulus accepted by default (8192-bit keys).
pub const DEFAULT_MAX_MODULUS_LEN: usize = 1024;
/// The exponent is returned as a `u32`.
pub const MAX_EXPONENT_LEN: usize = size_of::<u32>();

/// Size limits applied while reading and extracting a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Largest accepted PEM input, in bytes.
    pub max_file_len: usize,
    /// Largest accepted modulus, in bytes, after sign octets are removed.
    pub max_modulus_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_file_len: DEFAULT_MAX_FILE_LEN,
            max_modulus_len: DEFAULT_MAX_MODULUS_LEN,
        }
    }
}

impl Limits {
    pub fn with_max_file_len(mut self, max_file_len: usize) -> Self {
        self.max_file_len = max_file_len;
        self
    }

    pub fn with_max_modulus_len(mut self, max_modulus_len: usize) -> Self {
        self.max_modulus_len = max_modulus_len;
        self
    }
}
