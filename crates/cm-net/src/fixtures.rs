//! 2048-bit test keys. Production keys are 4096 bits.

use crate::{private_key_from_pem, Enigma};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::sync::Arc;

pub const ALICE_PEM: &str = include_str!("../tests/fixtures/alice.pem");
pub const BOB_PEM: &str = include_str!("../tests/fixtures/bob.pem");
pub const MALLORY_PEM: &str = include_str!("../tests/fixtures/mallory.pem");

pub fn alice() -> RsaPrivateKey {
    private_key_from_pem(ALICE_PEM).unwrap()
}

pub fn bob() -> RsaPrivateKey {
    private_key_from_pem(BOB_PEM).unwrap()
}

pub fn mallory() -> RsaPrivateKey {
    private_key_from_pem(MALLORY_PEM).unwrap()
}

/// Alice as acceptor and Bob as initiator, sharing one set of session keys
pub fn enigma_pair() -> (Arc<Enigma>, Arc<Enigma>) {
    let server = Enigma::with_buddy(alice(), RsaPublicKey::from(&bob()));
    let client = Enigma::with_buddy(bob(), RsaPublicKey::from(&alice()));
    server.generate_keys().unwrap();
    let bundle = server.export_keys().unwrap();
    client
        .install_keys(cm_vault::SessionKeys::from_bytes(&bundle).unwrap())
        .unwrap();
    server.clear_keys();
    client.clear_keys();
    (Arc::new(server), Arc::new(client))
}
