use super::{le_word, BlockCipher};
use crate::CryptoError;
use zeroize::Zeroize;

pub const BLOCK_SIZE: usize = 12;
pub const KEY_SIZE: usize = 12;

const ROUNDS: usize = 11;

const ERCON: [u32; ROUNDS + 1] = [
    0x0b0b, 0x1616, 0x2c2c, 0x5858, 0xb0b0, 0x7171, 0xe2e2, 0xd5d5, 0xbbbb, 0x6767, 0xcece, 0x8d8d,
];
const DRCON: [u32; ROUNDS + 1] = [
    0xb1b1, 0x7373, 0xe6e6, 0xdddd, 0xabab, 0x4747, 0x8e8e, 0x0d0d, 0x1a1a, 0x3434, 0x6868, 0xd0d0,
];

pub type Words = [u32; 3];

/// Reverses the bit order of the whole 96-bit state
fn mu([a0, a1, a2]: Words) -> Words {
    [a2.reverse_bits(), a1.reverse_bits(), a0.reverse_bits()]
}

fn gamma([a0, a1, a2]: Words) -> Words {
    [
        !a0 ^ (!a1 & a2),
        !a1 ^ (!a2 & a0),
        !a2 ^ (!a0 & a1),
    ]
}

fn theta([a0, a1, a2]: Words) -> Words {
    [
        a0 ^ (a0 >> 16) ^ (a1 << 16) ^ (a1 >> 16) ^ (a2 << 16) ^ (a1 >> 24) ^ (a2 << 8)
            ^ (a2 >> 8) ^ (a0 << 24) ^ (a2 >> 16) ^ (a0 << 16) ^ (a2 >> 24) ^ (a0 << 8),
        a1 ^ (a1 >> 16) ^ (a2 << 16) ^ (a2 >> 16) ^ (a0 << 16) ^ (a2 >> 24) ^ (a0 << 8)
            ^ (a0 >> 8) ^ (a1 << 24) ^ (a0 >> 16) ^ (a1 << 16) ^ (a0 >> 24) ^ (a1 << 8),
        a2 ^ (a2 >> 16) ^ (a0 << 16) ^ (a0 >> 16) ^ (a1 << 16) ^ (a0 >> 24) ^ (a1 << 8)
            ^ (a1 >> 8) ^ (a2 << 24) ^ (a1 >> 16) ^ (a2 << 16) ^ (a1 >> 24) ^ (a2 << 8),
    ]
}

fn pi1([a0, a1, a2]: Words) -> Words {
    [a0.rotate_right(10), a1, a2.rotate_left(1)]
}

fn pi2([a0, a1, a2]: Words) -> Words {
    [a0.rotate_left(1), a1, a2.rotate_right(10)]
}

fn rho(a: Words) -> Words {
    pi2(gamma(pi1(theta(a))))
}

/// Daemen's 3-Way, 96-bit block and key
pub struct Way3 {
    k: Words,
    ki: Words,
}

impl Way3 {
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength(key.len()));
        }
        let k = [le_word(&key[0..4]), le_word(&key[4..8]), le_word(&key[8..12])];
        Ok(Self { k, ki: mu(theta(k)) })
    }

    fn rounds(mut a: Words, key: &Words, rcon: &[u32; ROUNDS + 1]) -> Words {
        let mix = |a: &mut Words, rc: u32| {
            a[0] ^= key[0] ^ (rc << 16);
            a[1] ^= key[1];
            a[2] ^= key[2] ^ rc;
        };
        for &rc in &rcon[..ROUNDS] {
            mix(&mut a, rc);
            a = rho(a);
        }
        mix(&mut a, rcon[ROUNDS]);
        theta(a)
    }

    pub fn encrypt_words(&self, a: Words) -> Words {
        Self::rounds(a, &self.k, &ERCON)
    }

    pub fn decrypt_words(&self, a: Words) -> Words {
        mu(Self::rounds(mu(a), &self.ki, &DRCON))
    }
}

fn read_words(block: &[u8]) -> Words {
    [le_word(&block[0..4]), le_word(&block[4..8]), le_word(&block[8..12])]
}

fn write_words(block: &mut [u8], words: Words) {
    for (chunk, word) in block.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
}

impl BlockCipher for Way3 {
    const BLOCK_SIZE: usize = BLOCK_SIZE;

    fn encrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), BLOCK_SIZE);
        let words = self.encrypt_words(read_words(block));
        write_words(block, words);
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), BLOCK_SIZE);
        let words = self.decrypt_words(read_words(block));
        write_words(block, words);
    }
}

impl Drop for Way3 {
    fn drop(&mut self) {
        self.k.zeroize();
        self.ki.zeroize();
    }
}

impl std::fmt::Debug for Way3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Way3").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher(k: Words) -> Way3 {
        let mut key = [0u8; KEY_SIZE];
        write_words(&mut key, k);
        Way3::new(&key).unwrap()
    }

    #[test]
    fn mu_reverses_bits() {
        assert_eq!(mu([1, 2, 3]), [0xc0000000, 0x40000000, 0x80000000]);
        assert_eq!(
            mu([0x01234567, 0x89abcdef, 0xfedcba98]),
            [0x195d3b7f, 0xf7b3d591, 0xe6a2c480]
        );
        assert_eq!(mu(mu([5, 6, 7])), [5, 6, 7]);
    }

    #[test]
    fn theta_diffusion() {
        assert_eq!(theta([1, 2, 3]), [0x01000201, 0x02000302, 0x03000103]);
        assert_eq!(theta([4, 5, 6]), [0x04070204, 0x05070105, 0x06070306]);
        assert_eq!(
            theta([0x01010101, 0x02020202, 0x03030303]),
            [0x02000003, 0x03000001, 0x01000002]
        );
        assert_eq!(
            theta([0x01234567, 0x89abcdef, 0xfedcba98]),
            [0xab3210fe, 0xdc321001, 0x23321089]
        );
    }

    #[test]
    fn rho_round() {
        assert_eq!(rho([0, 0, 0]), [u32::MAX; 3]);
        assert_eq!(rho([1, 2, 3]), [0xf77f7ff6, 0x7dbfbcfd, 0xbefeffff]);
        assert_eq!(
            rho([0x01234567, 0x89abcdef, 0xfedcba98]),
            [0x842224d3, 0x1a47237a, 0xbb1e62f3]
        );
    }

    #[test]
    fn known_vectors() {
        let vectors = [
            ([0, 0, 0], [1, 1, 1], [0x4059c76e, 0x83ae9dc4, 0xad21ecf7]),
            ([6, 5, 4], [3, 2, 1], [0xd2f05b5e, 0xd6144138, 0xcab920cd]),
            (
                [0xdef01234, 0x456789ab, 0xbcdef012],
                [0x23456789, 0x9abcdef0, 0x01234567],
                [0x0aa55dbb, 0x9cdddb6d, 0x7cdb76b2],
            ),
            (
                [0xd2f05b5e, 0xd6144138, 0xcab920cd],
                [0x4059c76e, 0x83ae9dc4, 0xad21ecf7],
                [0x478ea871, 0x6b13f17c, 0x15b155ed],
            ),
        ];
        for (key, plain, expected) in vectors {
            let way3 = cipher(key);
            let encrypted = way3.encrypt_words(plain);
            assert_eq!(encrypted, expected);
            assert_eq!(way3.decrypt_words(encrypted), plain);
        }
    }

    #[test]
    fn block_bytes_are_little_endian() {
        let way3 = cipher([0, 0, 0]);
        let mut block = [0u8; BLOCK_SIZE];
        write_words(&mut block, [1, 1, 1]);
        way3.encrypt_block(&mut block);
        assert_eq!(read_words(&block), [0x4059c76e, 0x83ae9dc4, 0xad21ecf7]);
        assert_eq!(block[..4], [0x6eu8, 0xc7, 0x59, 0x40]);
    }

    #[test]
    fn key_must_be_exact() {
        assert_eq!(Way3::new(&[0; 11]).err(), Some(CryptoError::InvalidKeyLength(11)));
        assert_eq!(Way3::new(&[0; 16]).err(), Some(CryptoError::InvalidKeyLength(16)));
    }

    #[test]
    fn cbc_round_trip() {
        let way3 = Way3::new(b"twelve bytes").unwrap();
        for len in 0..=50 {
            let plain: Vec<u8> = (0..len).map(|i| (i % 100) as u8 + 1).collect();
            let cipher = way3.encrypt_cbc(&plain, None).unwrap();
            assert_eq!(cipher.len() % BLOCK_SIZE, 0);
            assert_eq!(way3.decrypt_cbc(&cipher).unwrap(), plain);
        }
    }

    #[test]
    fn aligned_input_ending_in_the_marker_survives() {
        let way3 = Way3::new(b"twelve bytes").unwrap();
        let plain = [vec![5; 11], vec![0x80]].concat();

        let cbc = way3.encrypt_cbc(&plain, None).unwrap();
        assert_eq!(cbc.len(), 3 * BLOCK_SIZE);
        assert_eq!(way3.decrypt_cbc(&cbc).unwrap(), plain);

        let ecb = way3.encrypt_ecb(&plain);
        assert_eq!(way3.decrypt_ecb(&ecb).unwrap(), plain);
    }
}
