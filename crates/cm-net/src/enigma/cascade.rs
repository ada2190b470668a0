use crate::NetError;
use cm_crypto::{BlockCipher, Blowfish, Gost, Way3};
use cm_vault::SessionKeys;

/// The three initialized ciphers plus the keys they came from
#[derive(Debug, Default)]
pub(super) struct CipherSuite {
    blowfish: Option<Blowfish>,
    ghost: Option<Gost>,
    way3: Option<Way3>,
    keys: Option<SessionKeys>,
}

impl CipherSuite {
    /// Builds all three ciphers first so a bad key leaves the suite untouched
    pub(super) fn install(&mut self, keys: SessionKeys) -> Result<(), NetError> {
        let blowfish = Blowfish::new(keys.blowfish())?;
        let ghost = Gost::new(keys.ghost())?;
        let way3 = Way3::new(keys.way3())?;
        self.blowfish = Some(blowfish);
        self.ghost = Some(ghost);
        self.way3 = Some(way3);
        self.keys = Some(keys);
        Ok(())
    }

    pub(super) fn is_ready(&self) -> bool {
        self.blowfish.is_some() && self.ghost.is_some() && self.way3.is_some()
    }

    pub(super) fn keys(&self) -> Option<&SessionKeys> {
        self.keys.as_ref().filter(|keys| !keys.is_cleared())
    }

    pub(super) fn clear_keys(&mut self) {
        if let Some(mut keys) = self.keys.take() {
            keys.clear();
        }
    }

    fn ciphers(&self) -> Result<(&Blowfish, &Gost, &Way3), NetError> {
        match (&self.blowfish, &self.ghost, &self.way3) {
            (Some(blowfish), Some(ghost), Some(way3)) => Ok((blowfish, ghost, way3)),
            _ => Err(NetError::CipherNotReady),
        }
    }

    /// Blowfish CBC encrypt, GOST ECB decrypt, 3-Way CBC encrypt.
    ///
    /// The GOST stage works on the whole Blowfish output, which is already
    /// block aligned, so it adds no padding of its own.
    pub(super) fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, NetError> {
        let (blowfish, ghost, way3) = self.ciphers()?;
        let mut stage = blowfish.encrypt_cbc(plaintext, None)?;
        ghost.decrypt_blocks(&mut stage)?;
        Ok(way3.encrypt_cbc(&stage, None)?)
    }

    pub(super) fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, NetError> {
        let (blowfish, ghost, way3) = self.ciphers()?;
        let mut stage = way3.decrypt_cbc(ciphertext)?;
        ghost.encrypt_blocks(&mut stage)?;
        Ok(blowfish.decrypt_cbc(&stage)?)
    }
}
