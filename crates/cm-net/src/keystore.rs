use crate::NetError;
use rsa::{
    pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey},
    pkcs8::{DecodePrivateKey, DecodePublicKey},
    RsaPrivateKey, RsaPublicKey,
};
use std::collections::HashMap;

/// Source of RSA keys by user name.
///
/// Key files live outside this crate; sessions only ask for the local
/// private key and for the public key of the peer.
pub trait KeyStore: Send + Sync {
    fn private_key(&self, user: &str) -> Option<RsaPrivateKey>;
    fn public_key(&self, user: &str) -> Option<RsaPublicKey>;
}

#[derive(Default)]
pub struct MemoryKeyStore {
    private: HashMap<String, RsaPrivateKey>,
    public: HashMap<String, RsaPublicKey>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a key pair, the public half included
    pub fn add_private_key(&mut self, user: impl Into<String>, key: RsaPrivateKey) -> &mut Self {
        let user = user.into();
        self.public.insert(user.clone(), RsaPublicKey::from(&key));
        self.private.insert(user, key);
        self
    }

    pub fn add_public_key(&mut self, user: impl Into<String>, key: RsaPublicKey) -> &mut Self {
        self.public.insert(user.into(), key);
        self
    }
}

impl KeyStore for MemoryKeyStore {
    fn private_key(&self, user: &str) -> Option<RsaPrivateKey> {
        self.private.get(user).cloned()
    }

    fn public_key(&self, user: &str) -> Option<RsaPublicKey> {
        self.public.get(user).cloned()
    }
}

/// Parses a PKCS#1 or PKCS#8 PEM private key
pub fn private_key_from_pem(pem: &str) -> Result<RsaPrivateKey, NetError> {
    RsaPrivateKey::from_pkcs1_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
        .map_err(|e| NetError::Rsa(e.to_string()))
}

/// Parses a PKCS#1 or SPKI PEM public key
pub fn public_key_from_pem(pem: &str) -> Result<RsaPublicKey, NetError> {
    RsaPublicKey::from_pkcs1_pem(pem)
        .or_else(|_| RsaPublicKey::from_public_key_pem(pem))
        .map_err(|e| NetError::Rsa(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use rsa::{pkcs1::EncodeRsaPublicKey, pkcs8::EncodePublicKey, traits::PublicKeyParts};

    #[test]
    fn parses_fixture_keys() {
        let key = private_key_from_pem(fixtures::ALICE_PEM).unwrap();
        assert_eq!(key.size(), 256);
        assert!(private_key_from_pem("not a key").is_err());
    }

    #[test]
    fn parses_both_public_formats() {
        let public = RsaPublicKey::from(&fixtures::alice());
        let pkcs1 = public.to_pkcs1_pem(rsa::pkcs1::LineEnding::LF).unwrap();
        let spki = public.to_public_key_pem(rsa::pkcs8::LineEnding::LF).unwrap();
        assert_eq!(public_key_from_pem(&pkcs1).unwrap(), public);
        assert_eq!(public_key_from_pem(&spki).unwrap(), public);
    }

    #[test]
    fn memory_store() {
        let mut store = MemoryKeyStore::new();
        store
            .add_private_key("alice", fixtures::alice())
            .add_public_key("bob", RsaPublicKey::from(&fixtures::bob()));

        assert!(store.private_key("alice").is_some());
        assert!(store.public_key("alice").is_some());
        assert!(store.private_key("bob").is_none());
        assert_eq!(store.public_key("bob"), Some(RsaPublicKey::from(&fixtures::bob())));
        assert!(store.public_key("mallory").is_none());
    }
}
