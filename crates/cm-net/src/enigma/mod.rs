mod asymmetric;
mod cascade;
mod worker;

use crate::NetError;
use cascade::CipherSuite;
use cm_vault::{IdentityBlocks, SessionKeys};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;
use zeroize::Zeroizing;

pub(crate) use worker::run_blocking;

/// Cipher cascade and RSA operations shared by both streams of a session.
///
/// The session keys are written once during the handshake. After that the
/// suite is only read, so both streams may encrypt and decrypt concurrently.
pub struct Enigma {
    identity: IdentityBlocks,
    private_key: RsaPrivateKey,
    buddy_key: RwLock<Option<RsaPublicKey>>,
    suite: RwLock<CipherSuite>,
}

impl Enigma {
    pub fn new(private_key: RsaPrivateKey) -> Self {
        Self {
            identity: IdentityBlocks::today(),
            private_key,
            buddy_key: RwLock::new(None),
            suite: RwLock::new(CipherSuite::default()),
        }
    }

    pub fn with_buddy(private_key: RsaPrivateKey, buddy_key: RsaPublicKey) -> Self {
        let enigma = Self::new(private_key);
        enigma.set_buddy_public_key(buddy_key);
        enigma
    }

    pub fn identity(&self) -> &IdentityBlocks {
        &self.identity
    }

    pub fn set_buddy_public_key(&self, key: RsaPublicKey) {
        let mut buddy = match self.buddy_key.write() {
            Ok(b) => b,
            Err(poisoned) => poisoned.into_inner(),
        };
        *buddy = Some(key);
    }

    pub fn has_buddy_key(&self) -> bool {
        self.buddy().is_some()
    }

    fn buddy(&self) -> RwLockReadGuard<'_, Option<RsaPublicKey>> {
        match self.buddy_key.read() {
            Ok(b) => b,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn suite(&self) -> RwLockReadGuard<'_, CipherSuite> {
        match self.suite.read() {
            Ok(s) => s,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn suite_mut(&self) -> RwLockWriteGuard<'_, CipherSuite> {
        match self.suite.write() {
            Ok(s) => s,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Draws fresh session keys and initializes the ciphers with them
    pub fn generate_keys(&self) -> Result<(), NetError> {
        self.install_keys(SessionKeys::generate()?)?;
        debug!("generated fresh session keys");
        Ok(())
    }

    /// Initializes the three ciphers from `keys` and keeps the bundle
    /// until [`Enigma::clear_keys`]
    pub fn install_keys(&self, keys: SessionKeys) -> Result<(), NetError> {
        self.suite_mut().install(keys)
    }

    /// Encoded copy of the current key bundle, for transfer to the peer
    pub fn export_keys(&self) -> Result<Zeroizing<Vec<u8>>, NetError> {
        let suite = self.suite();
        let keys = suite.keys().ok_or(NetError::KeysMissing)?;
        Ok(keys.to_bytes()?)
    }

    pub fn has_keys(&self) -> bool {
        self.suite().keys().is_some()
    }

    /// Zero-fills the key bundle. The initialized ciphers stay usable.
    pub fn clear_keys(&self) {
        self.suite_mut().clear_keys();
        debug!("session keys cleared");
    }

    /// Drops the ciphers and the key bundle
    pub fn clear(&self) {
        *self.suite_mut() = CipherSuite::default();
    }

    pub fn is_ready(&self) -> bool {
        self.suite().is_ready()
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, NetError> {
        self.suite().encrypt(plaintext)
    }

    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, NetError> {
        self.suite().decrypt(ciphertext)
    }
}

impl std::fmt::Debug for Enigma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enigma")
            .field("ready", &self.is_ready())
            .field("buddy_key", &self.has_buddy_key())
            .finish_non_exhaustive()
    }
}
