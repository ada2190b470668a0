use super::{le_word, BlockCipher};
use crate::CryptoError;
use zeroize::Zeroize;

pub const BLOCK_SIZE: usize = 8;
pub const KEY_SIZE: usize = 32;

const K8: [u8; 16] = [14, 4, 13, 1, 2, 15, 11, 8, 3, 10, 6, 12, 5, 9, 0, 7];
const K7: [u8; 16] = [15, 1, 8, 14, 6, 11, 3, 4, 9, 7, 2, 13, 12, 0, 5, 10];
const K6: [u8; 16] = [10, 0, 9, 14, 6, 3, 15, 5, 1, 13, 12, 7, 11, 4, 2, 8];
const K5: [u8; 16] = [7, 13, 14, 3, 0, 6, 9, 10, 1, 2, 8, 5, 11, 12, 4, 15];
const K4: [u8; 16] = [2, 12, 4, 1, 7, 10, 11, 6, 8, 5, 3, 15, 13, 0, 14, 9];
const K3: [u8; 16] = [12, 1, 10, 15, 9, 2, 6, 8, 0, 13, 3, 4, 14, 7, 5, 11];
const K2: [u8; 16] = [4, 11, 2, 14, 15, 0, 8, 13, 3, 12, 9, 7, 5, 10, 6, 1];
const K1: [u8; 16] = [13, 2, 8, 4, 6, 15, 11, 1, 10, 9, 3, 14, 5, 0, 12, 7];

// Key word order for the 32 rounds in each direction
const ENCRYPT_SCHEDULE: [usize; 32] = [
    0, 1, 2, 3, 4, 5, 6, 7, 0, 1, 2, 3, 4, 5, 6, 7, 0, 1, 2, 3, 4, 5, 6, 7, 7, 6, 5, 4, 3, 2, 1, 0,
];
const DECRYPT_SCHEDULE: [usize; 32] = [
    0, 1, 2, 3, 4, 5, 6, 7, 7, 6, 5, 4, 3, 2, 1, 0, 7, 6, 5, 4, 3, 2, 1, 0, 7, 6, 5, 4, 3, 2, 1, 0,
];

/// Joins two 4-bit boxes into one byte-wide substitution table
const fn combine(high: &[u8; 16], low: &[u8; 16]) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = (high[i >> 4] << 4) | low[i & 15];
        i += 1;
    }
    table
}

const K87: [u8; 256] = combine(&K8, &K7);
const K65: [u8; 256] = combine(&K6, &K5);
const K43: [u8; 256] = combine(&K4, &K3);
const K21: [u8; 256] = combine(&K2, &K1);

/// GOST 28147-89 with a fixed 256-bit key
pub struct Gost {
    k: [u32; 8],
}

impl Gost {
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength(key.len()));
        }
        let mut k = [0u32; 8];
        for (word, chunk) in k.iter_mut().zip(key.chunks_exact(4)) {
            *word = le_word(chunk);
        }
        Ok(Self { k })
    }

    #[inline]
    fn f(x: u32) -> u32 {
        let [a, b, c, d] = x.to_be_bytes();
        let x = u32::from_be_bytes([
            K87[a as usize],
            K65[b as usize],
            K43[c as usize],
            K21[d as usize],
        ]);
        x.rotate_left(11)
    }

    fn rounds(&self, mut n1: u32, mut n2: u32, schedule: &[usize; 32]) -> (u32, u32) {
        for pair in schedule.chunks_exact(2) {
            n2 ^= Self::f(n1.wrapping_add(self.k[pair[0]]));
            n1 ^= Self::f(n2.wrapping_add(self.k[pair[1]]));
        }
        (n2, n1)
    }

    pub fn encrypt_words(&self, n1: u32, n2: u32) -> (u32, u32) {
        self.rounds(n1, n2, &ENCRYPT_SCHEDULE)
    }

    pub fn decrypt_words(&self, n1: u32, n2: u32) -> (u32, u32) {
        self.rounds(n1, n2, &DECRYPT_SCHEDULE)
    }
}

impl BlockCipher for Gost {
    const BLOCK_SIZE: usize = BLOCK_SIZE;

    fn encrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), BLOCK_SIZE);
        let (a, b) = self.encrypt_words(le_word(&block[..4]), le_word(&block[4..8]));
        block[..4].copy_from_slice(&a.to_le_bytes());
        block[4..8].copy_from_slice(&b.to_le_bytes());
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), BLOCK_SIZE);
        let (a, b) = self.decrypt_words(le_word(&block[..4]), le_word(&block[4..8]));
        block[..4].copy_from_slice(&a.to_le_bytes());
        block[4..8].copy_from_slice(&b.to_le_bytes());
    }
}

impl Drop for Gost {
    fn drop(&mut self) {
        self.k.zeroize();
    }
}

impl std::fmt::Debug for Gost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gost").finish_non_exhaustive()
    }
}
