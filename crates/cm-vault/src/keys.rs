use crate::VaultError;
use cm_crypto::{blowfish, gost, random_bytes, way3};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

/// Symmetric keys for one session, one per cascade cipher.
///
/// The bundle only lives through the handshake. Every buffer is
/// zero-filled when it is cleared or dropped.
#[derive(Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionKeys {
    blowfish: Vec<u8>,
    ghost: Vec<u8>,
    way3: Vec<u8>,
}

impl SessionKeys {
    pub const BLOWFISH_LEN: usize = blowfish::MAX_KEY_LENGTH;
    pub const GHOST_LEN: usize = gost::KEY_SIZE;
    pub const WAY3_LEN: usize = way3::KEY_SIZE;

    /// Fresh random keys sized for each cipher
    pub fn generate() -> Result<Self, VaultError> {
        Ok(Self {
            blowfish: random_bytes(Self::BLOWFISH_LEN)?,
            ghost: random_bytes(Self::GHOST_LEN)?,
            way3: random_bytes(Self::WAY3_LEN)?,
        })
    }

    pub fn from_parts(blowfish: &[u8], ghost: &[u8], way3: &[u8]) -> Result<Self, VaultError> {
        let keys = Self {
            blowfish: blowfish.to_vec(),
            ghost: ghost.to_vec(),
            way3: way3.to_vec(),
        };
        keys.validate()?;
        Ok(keys)
    }

    pub fn blowfish(&self) -> &[u8] {
        &self.blowfish
    }

    pub fn ghost(&self) -> &[u8] {
        &self.ghost
    }

    pub fn way3(&self) -> &[u8] {
        &self.way3
    }

    pub fn is_cleared(&self) -> bool {
        self.blowfish.is_empty() && self.ghost.is_empty() && self.way3.is_empty()
    }

    fn validate(&self) -> Result<(), VaultError> {
        let expected = [
            ("blowfish", &self.blowfish, Self::BLOWFISH_LEN),
            ("ghost", &self.ghost, Self::GHOST_LEN),
            ("way3", &self.way3, Self::WAY3_LEN),
        ];
        for (key, value, len) in expected {
            if value.len() != len {
                return Err(VaultError::InvalidLength {
                    key,
                    len: value.len(),
                });
            }
        }
        Ok(())
    }

    /// Encodes the bundle for transport. The buffer wipes itself on drop.
    pub fn to_bytes(&self) -> Result<Zeroizing<Vec<u8>>, VaultError> {
        self.validate()?;
        Ok(Zeroizing::new(bitcode::serialize(self)?))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VaultError> {
        let keys: Self = bitcode::deserialize(bytes)?;
        keys.validate()?;
        Ok(keys)
    }

    /// Zero-fills and releases every key buffer
    pub fn clear(&mut self) {
        self.zeroize();
    }
}

impl Zeroize for SessionKeys {
    fn zeroize(&mut self) {
        self.blowfish.zeroize();
        self.ghost.zeroize();
        self.way3.zeroize();
    }
}

impl Drop for SessionKeys {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("cleared", &self.is_cleared())
            .finish_non_exhaustive()
    }
}
