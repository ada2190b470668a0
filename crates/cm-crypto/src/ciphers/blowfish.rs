use super::{be_word, blowfish_tables::{ORG_P, ORG_S}, BlockCipher};
use crate::CryptoError;
use zeroize::Zeroize;

pub const BLOCK_SIZE: usize = 8;
pub const MIN_KEY_LENGTH: usize = 4;
pub const MAX_KEY_LENGTH: usize = 56;

const ROUNDS: usize = 16;

/// Blowfish with the key schedule expanded once at construction
pub struct Blowfish {
    p: [u32; ROUNDS + 2],
    s: [[u32; 256]; 4],
}

impl Blowfish {
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        if !(MIN_KEY_LENGTH..=MAX_KEY_LENGTH).contains(&key.len()) {
            return Err(CryptoError::InvalidKeyLength(key.len()));
        }

        let mut cipher = Self { p: ORG_P, s: ORG_S };
        let mut key_bytes = key.iter().cycle();
        for entry in cipher.p.iter_mut() {
            let mut word = 0u32;
            for _ in 0..4 {
                word = (word << 8) | u32::from(*key_bytes.next().unwrap_or(&0));
            }
            *entry ^= word;
        }

        let (mut l, mut r) = (0u32, 0u32);
        for i in (0..ROUNDS + 2).step_by(2) {
            (l, r) = cipher.encrypt_words(l, r);
            cipher.p[i] = l;
            cipher.p[i + 1] = r;
        }
        for box_index in 0..4 {
            for i in (0..256).step_by(2) {
                (l, r) = cipher.encrypt_words(l, r);
                cipher.s[box_index][i] = l;
                cipher.s[box_index][i + 1] = r;
            }
        }
        Ok(cipher)
    }

    #[inline]
    fn f(&self, x: u32) -> u32 {
        let [a, b, c, d] = x.to_be_bytes();
        (self.s[0][a as usize].wrapping_add(self.s[1][b as usize]) ^ self.s[2][c as usize])
            .wrapping_add(self.s[3][d as usize])
    }

    pub fn encrypt_words(&self, mut l: u32, mut r: u32) -> (u32, u32) {
        for i in (0..ROUNDS).step_by(2) {
            l ^= self.p[i];
            r ^= self.f(l);
            r ^= self.p[i + 1];
            l ^= self.f(r);
        }
        (r ^ self.p[ROUNDS + 1], l ^ self.p[ROUNDS])
    }

    pub fn decrypt_words(&self, mut l: u32, mut r: u32) -> (u32, u32) {
        for i in (2..=ROUNDS + 1).rev().step_by(2) {
            l ^= self.p[i];
            r ^= self.f(l);
            r ^= self.p[i - 1];
            l ^= self.f(r);
        }
        (r ^ self.p[0], l ^ self.p[1])
    }
}

impl BlockCipher for Blowfish {
    const BLOCK_SIZE: usize = BLOCK_SIZE;

    fn encrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), BLOCK_SIZE);
        let (l, r) = self.encrypt_words(be_word(&block[..4]), be_word(&block[4..8]));
        block[..4].copy_from_slice(&l.to_be_bytes());
        block[4..8].copy_from_slice(&r.to_be_bytes());
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), BLOCK_SIZE);
        let (l, r) = self.decrypt_words(be_word(&block[..4]), be_word(&block[4..8]));
        block[..4].copy_from_slice(&l.to_be_bytes());
        block[4..8].copy_from_slice(&r.to_be_bytes());
    }
}

impl Drop for Blowfish {
    fn drop(&mut self) {
        self.p.zeroize();
        self.s.zeroize();
    }
}

impl std::fmt::Debug for Blowfish {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blowfish").finish_non_exhaustive()
    }
}
