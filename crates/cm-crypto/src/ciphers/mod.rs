pub mod blowfish;
mod blowfish_tables;
pub mod gost;
pub mod way3;

use crate::{fill_random, pad_marked, strip_marker, CryptoError};

/// A keyed block cipher with the ECB and CBC modes built on top of it.
///
/// Plaintext always gains a `0x80` marker and zeros up to the next block
/// boundary, a whole extra block when it is already aligned. Decryption
/// fails when the last block carries no marker.
pub trait BlockCipher {
    const BLOCK_SIZE: usize;

    /// Encrypts exactly one block in place.
    ///
    /// # Panics
    ///
    /// When `block` is shorter than [`BlockCipher::BLOCK_SIZE`]. Debug
    /// builds also reject longer blocks.
    fn encrypt_block(&self, block: &mut [u8]);

    /// Decrypts exactly one block in place. Same length contract as
    /// [`BlockCipher::encrypt_block`].
    fn decrypt_block(&self, block: &mut [u8]);

    fn encrypt_ecb(&self, plaintext: &[u8]) -> Vec<u8> {
        let mut buffer = pad_marked(plaintext, Self::BLOCK_SIZE);
        for block in buffer.chunks_exact_mut(Self::BLOCK_SIZE) {
            self.encrypt_block(block);
        }
        buffer
    }

    fn decrypt_ecb(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut buffer = ciphertext.to_vec();
        self.decrypt_blocks(&mut buffer)?;
        strip_marker(&mut buffer, Self::BLOCK_SIZE)?;
        Ok(buffer)
    }

    /// Output is the IV block followed by the ciphertext blocks.
    /// A random IV is drawn when `iv` is `None`.
    fn encrypt_cbc(&self, plaintext: &[u8], iv: Option<&[u8]>) -> Result<Vec<u8>, CryptoError> {
        self.encrypt_cbc_aligned(&pad_marked(plaintext, Self::BLOCK_SIZE), iv)
    }

    fn decrypt_cbc(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut buffer = self.decrypt_cbc_aligned(ciphertext)?;
        strip_marker(&mut buffer, Self::BLOCK_SIZE)?;
        Ok(buffer)
    }

    /// ECB over block aligned data, no padding involved
    fn encrypt_blocks(&self, data: &mut [u8]) -> Result<(), CryptoError> {
        check_aligned(data.len(), Self::BLOCK_SIZE)?;
        data.chunks_exact_mut(Self::BLOCK_SIZE)
            .for_each(|block| self.encrypt_block(block));
        Ok(())
    }

    fn decrypt_blocks(&self, data: &mut [u8]) -> Result<(), CryptoError> {
        check_aligned(data.len(), Self::BLOCK_SIZE)?;
        data.chunks_exact_mut(Self::BLOCK_SIZE)
            .for_each(|block| self.decrypt_block(block));
        Ok(())
    }

    /// CBC over block aligned data. Same layout as [`BlockCipher::encrypt_cbc`].
    fn encrypt_cbc_aligned(&self, data: &[u8], iv: Option<&[u8]>) -> Result<Vec<u8>, CryptoError> {
        let bs = Self::BLOCK_SIZE;
        check_aligned(data.len(), bs)?;
        let mut buffer = Vec::with_capacity(bs + data.len());
        match iv {
            Some(iv) if iv.len() != bs => return Err(CryptoError::InvalidIvLength(iv.len())),
            Some(iv) => buffer.extend_from_slice(iv),
            None => {
                buffer.resize(bs, 0);
                fill_random(&mut buffer)?;
            }
        }
        buffer.extend_from_slice(data);

        let mut offset = bs;
        while offset < buffer.len() {
            let (previous, rest) = buffer.split_at_mut(offset);
            let block = &mut rest[..bs];
            xor_in_place(block, &previous[offset - bs..]);
            self.encrypt_block(block);
            offset += bs;
        }
        Ok(buffer)
    }

    fn decrypt_cbc_aligned(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let bs = Self::BLOCK_SIZE;
        if ciphertext.len() < bs {
            return Err(CryptoError::InvalidCiphertextLength(ciphertext.len()));
        }
        check_aligned(ciphertext.len(), bs)?;
        let mut buffer = ciphertext[bs..].to_vec();
        for (block, previous) in buffer
            .chunks_exact_mut(bs)
            .zip(ciphertext.chunks_exact(bs))
        {
            self.decrypt_block(block);
            xor_in_place(block, previous);
        }
        Ok(buffer)
    }
}

fn check_aligned(len: usize, block_size: usize) -> Result<(), CryptoError> {
    match len % block_size {
        0 => Ok(()),
        _ => Err(CryptoError::InvalidCiphertextLength(len)),
    }
}

fn xor_in_place(block: &mut [u8], other: &[u8]) {
    for (b, o) in block.iter_mut().zip(other) {
        *b ^= o;
    }
}

#[inline]
pub(crate) fn be_word(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

#[inline]
pub(crate) fn le_word(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
