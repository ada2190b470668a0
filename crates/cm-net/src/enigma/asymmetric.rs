use super::Enigma;
use crate::NetError;
use rand::rngs::OsRng;
use rsa::{traits::PublicKeyParts, Pkcs1v15Encrypt, Pkcs1v15Sign, RsaPublicKey};
use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

impl Enigma {
    /// PKCS#1 v1.5 encryption with the buddy's public key
    pub fn encrypt_rsa(&self, plain: &[u8]) -> Result<Vec<u8>, NetError> {
        let buddy = self.buddy();
        let key = buddy.as_ref().ok_or(NetError::BuddyKeyMissing)?;
        Ok(key.encrypt(&mut OsRng, Pkcs1v15Encrypt, plain)?)
    }

    pub fn decrypt_rsa(&self, cipher: &[u8]) -> Result<Zeroizing<Vec<u8>>, NetError> {
        let plain = self.private_key.decrypt(Pkcs1v15Encrypt, cipher)?;
        Ok(Zeroizing::new(plain))
    }

    /// SHA-512 digest of `data` signed with the local private key
    pub fn signature(&self, data: &[u8]) -> Result<Vec<u8>, NetError> {
        let digest = Sha512::digest(data);
        let scheme = Pkcs1v15Sign::new::<Sha512>();
        Ok(self.private_key.sign_with_rng(&mut OsRng, scheme, &digest)?)
    }

    pub fn is_valid_signature(&self, signature: &[u8], data: &[u8]) -> bool {
        let buddy = self.buddy();
        let Some(key) = buddy.as_ref() else {
            return false;
        };
        let digest = Sha512::digest(data);
        key.verify(Pkcs1v15Sign::new::<Sha512>(), &digest, signature)
            .is_ok()
    }

    /// Length of the signatures the buddy appends to its messages
    pub fn signature_size(&self) -> Result<usize, NetError> {
        let buddy = self.buddy();
        buddy
            .as_ref()
            .map(|key| key.size())
            .ok_or(NetError::BuddyKeyMissing)
    }

    pub fn public_key(&self) -> RsaPublicKey {
        self.private_key.to_public_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn rsa_round_trip_between_peers() {
        let (server, client) = fixtures::enigma_pair();
        let cipher = server.encrypt_rsa(b"login payload").unwrap();
        assert_eq!(cipher.len(), 256);
        assert_eq!(client.decrypt_rsa(&cipher).unwrap().as_slice(), b"login payload");
        assert!(server.decrypt_rsa(&cipher).is_err());
    }

    #[test]
    fn signatures_verify_at_the_buddy() {
        let (server, client) = fixtures::enigma_pair();
        let data = b"ciphertext bytes".to_vec();
        let signature = server.signature(&data).unwrap();
        assert_eq!(signature.len(), client.signature_size().unwrap());
        assert!(client.is_valid_signature(&signature, &data));
        assert!(!server.is_valid_signature(&signature, &data));

        let mut tampered = data.clone();
        tampered[0] ^= 1;
        assert!(!client.is_valid_signature(&signature, &tampered));

        let mut bad_signature = signature.clone();
        bad_signature[10] ^= 0x40;
        assert!(!client.is_valid_signature(&bad_signature, &data));
    }

    #[test]
    fn imposter_signatures_fail() {
        let (_, client) = fixtures::enigma_pair();
        let imposter = Enigma::with_buddy(fixtures::mallory(), RsaPublicKey::from(&fixtures::bob()));
        let signature = imposter.signature(b"data").unwrap();
        assert!(!client.is_valid_signature(&signature, b"data"));
    }

    #[test]
    fn missing_buddy_key() {
        let enigma = Enigma::new(fixtures::alice());
        assert_eq!(enigma.encrypt_rsa(b"x"), Err(NetError::BuddyKeyMissing));
        assert_eq!(enigma.signature_size(), Err(NetError::BuddyKeyMissing));
        assert!(!enigma.is_valid_signature(&[0; 256], b"x"));
        assert_eq!(enigma.public_key(), RsaPublicKey::from(&fixtures::alice()));
    }
}
