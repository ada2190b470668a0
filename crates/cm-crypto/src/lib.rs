mod ciphers;
mod keys;
mod padding;
mod timestamp;

pub use ciphers::{
    blowfish::{self, Blowfish},
    gost::{self, Gost},
    way3::{self, Way3},
    BlockCipher,
};
pub use keys::{are_equal, fill_random, from_hex, random_bytes, to_hex};
pub use padding::{pad_marked, padding_index, strip_marker, PADDING_MARKER};
pub use timestamp::{age_in_seconds, now};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CryptoError {
    HexError,
    OsRngError,
    /// Key length the cipher does not accept
    InvalidKeyLength(usize),
    /// IV length differs from the cipher block size
    InvalidIvLength(usize),
    /// Ciphertext is not a whole number of blocks
    InvalidCiphertextLength(usize),
    /// Decrypted data lacks the padding marker in its last block
    MissingPadding,
}

impl std::fmt::Display for CryptoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CryptoError::HexError => write!(f, "invalid hex string"),
            CryptoError::OsRngError => write!(f, "os random generator failed"),
            CryptoError::InvalidKeyLength(len) => write!(f, "invalid key length: {len}"),
            CryptoError::InvalidIvLength(len) => write!(f, "invalid iv length: {len}"),
            CryptoError::InvalidCiphertextLength(len) => {
                write!(f, "invalid ciphertext length: {len}")
            }
            CryptoError::MissingPadding => write!(f, "padding marker not found"),
        }
    }
}

impl std::error::Error for CryptoError {}
