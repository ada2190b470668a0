use crate::CryptoError;
use rand::{rngs::OsRng, RngCore};
use subtle::ConstantTimeEq;

impl From<rand::Error> for CryptoError {
    fn from(_: rand::Error) -> Self {
        CryptoError::OsRngError
    }
}

impl From<hex::FromHexError> for CryptoError {
    fn from(_: hex::FromHexError) -> Self {
        CryptoError::HexError
    }
}

pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

pub fn from_hex(str: impl AsRef<[u8]>) -> Result<Vec<u8>, CryptoError> {
    Ok(hex::decode(str)?)
}

pub fn fill_random(dest: &mut [u8]) -> Result<(), CryptoError> {
    Ok(OsRng.try_fill_bytes(dest)?)
}

pub fn random_bytes(len: usize) -> Result<Vec<u8>, CryptoError> {
    let mut bytes = vec![0u8; len];
    fill_random(&mut bytes)?;
    Ok(bytes)
}

/// Compares two slices in constant time (length is not secret)
pub fn are_equal(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_bytes_have_requested_length() {
        let a = random_bytes(56).unwrap();
        let b = random_bytes(56).unwrap();
        assert_eq!(a.len(), 56);
        assert_ne!(a, b);
        assert!(random_bytes(0).unwrap().is_empty());
    }

    #[test]
    fn hex() {
        let bytes = from_hex("4ef997456198dd78").unwrap();
        assert_eq!(bytes, [0x4e, 0xf9, 0x97, 0x45, 0x61, 0x98, 0xdd, 0x78]);
        assert_eq!(to_hex(&bytes), "4ef997456198dd78");
        assert_eq!(from_hex("zz"), Err(CryptoError::HexError));
    }

    #[test]
    fn equality() {
        assert!(are_equal(b"carmel", b"carmel"));
        assert!(!are_equal(b"carmel", b"carmeL"));
        assert!(!are_equal(b"carmel", b"carme"));
        assert!(are_equal(&[], &[]));
    }
}
