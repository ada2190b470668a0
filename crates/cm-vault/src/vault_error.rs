use cm_crypto::CryptoError;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum VaultError {
    SerializationError(String),
    CryptoError(CryptoError),
    /// A key of the wrong size for its cipher
    InvalidLength { key: &'static str, len: usize },
}

impl From<bitcode::Error> for VaultError {
    fn from(value: bitcode::Error) -> Self {
        VaultError::SerializationError(value.to_string())
    }
}

impl From<CryptoError> for VaultError {
    fn from(value: CryptoError) -> Self {
        VaultError::CryptoError(value)
    }
}

impl std::fmt::Display for VaultError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VaultError::SerializationError(e) => write!(f, "serialization failed: {e}"),
            VaultError::CryptoError(e) => write!(f, "{e}"),
            VaultError::InvalidLength { key, len } => {
                write!(f, "{key} key has invalid length {len}")
            }
        }
    }
}

impl std::error::Error for VaultError {}
