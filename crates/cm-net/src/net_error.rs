use cm_crypto::CryptoError;
use cm_vault::VaultError;
use serde::{Deserialize, Serialize};

/// Outcome reported for connection attempts, handshakes and answers
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Status {
    Ok = 1,
    Timeout = 2,
    Error = 3,
    Cancel = 4,
    SecurityBreach = 5,
}

impl TryFrom<u8> for Status {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        match value {
            1 => Ok(Status::Ok),
            2 => Ok(Status::Timeout),
            3 => Ok(Status::Error),
            4 => Ok(Status::Cancel),
            5 => Ok(Status::SecurityBreach),
            other => Err(format!("unknown status {other}")),
        }
    }
}

impl From<Status> for u8 {
    fn from(value: Status) -> Self {
        value as u8
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NetError {
    CryptoError(CryptoError),
    VaultError(VaultError),
    Rsa(String),
    /// Bytes that do not decompress or parse into a message
    Decode(String),
    SignatureInvalid,
    /// Age of the rejected message in seconds
    StaleMessage(i64),
    /// A message that parsed but failed a protocol check
    InvalidMessage(&'static str),
    SecurityBreach(&'static str),
    Timeout,
    Cancelled,
    Socket(String),
    /// A blocking crypto task panicked or was cancelled
    Worker(String),
    EmptyFrame,
    FrameTooLarge(usize),
    CipherNotReady,
    KeysMissing,
    BuddyKeyMissing,
    UnknownUser(String),
    InvalidPort(u16),
    NotConnected,
    NotReady,
}

impl NetError {
    /// Folds the error into the outcome reported to the caller
    pub fn status(&self) -> Status {
        match self {
            NetError::Timeout => Status::Timeout,
            NetError::Cancelled => Status::Cancel,
            NetError::SecurityBreach(_) => Status::SecurityBreach,
            _ => Status::Error,
        }
    }
}

impl From<CryptoError> for NetError {
    fn from(value: CryptoError) -> Self {
        NetError::CryptoError(value)
    }
}

impl From<VaultError> for NetError {
    fn from(value: VaultError) -> Self {
        NetError::VaultError(value)
    }
}

impl From<rsa::Error> for NetError {
    fn from(value: rsa::Error) -> Self {
        NetError::Rsa(value.to_string())
    }
}

impl From<std::io::Error> for NetError {
    fn from(value: std::io::Error) -> Self {
        NetError::Socket(value.to_string())
    }
}

impl From<tokio::task::JoinError> for NetError {
    fn from(value: tokio::task::JoinError) -> Self {
        NetError::Worker(value.to_string())
    }
}

impl From<serde_json::Error> for NetError {
    fn from(value: serde_json::Error) -> Self {
        NetError::Decode(value.to_string())
    }
}

impl std::fmt::Display for NetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetError::CryptoError(e) => write!(f, "{e}"),
            NetError::VaultError(e) => write!(f, "{e}"),
            NetError::Rsa(e) => write!(f, "rsa: {e}"),
            NetError::Decode(e) => write!(f, "decode: {e}"),
            NetError::SignatureInvalid => write!(f, "invalid signature"),
            NetError::StaleMessage(age) => write!(f, "message is {age}s old"),
            NetError::InvalidMessage(reason) => write!(f, "invalid message: {reason}"),
            NetError::SecurityBreach(reason) => write!(f, "security breach: {reason}"),
            NetError::Timeout => write!(f, "timed out"),
            NetError::Cancelled => write!(f, "cancelled"),
            NetError::Socket(e) => write!(f, "socket: {e}"),
            NetError::Worker(e) => write!(f, "crypto worker: {e}"),
            NetError::EmptyFrame => write!(f, "empty frame"),
            NetError::FrameTooLarge(len) => write!(f, "frame of {len} bytes is too large"),
            NetError::CipherNotReady => write!(f, "ciphers are not initialized"),
            NetError::KeysMissing => write!(f, "session keys are gone"),
            NetError::BuddyKeyMissing => write!(f, "buddy public key is missing"),
            NetError::UnknownUser(user) => write!(f, "no key for user {user}"),
            NetError::InvalidPort(port) => write!(f, "invalid base port {port}"),
            NetError::NotConnected => write!(f, "stream is not connected"),
            NetError::NotReady => write!(f, "session is not ready"),
        }
    }
}

impl std::error::Error for NetError {}
