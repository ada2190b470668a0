use crate::CryptoError;

pub const PADDING_MARKER: u8 = 0x80;

/// Position of the padding marker, found by skipping trailing zeros.
/// `None` when the last non-zero byte is not the marker.
pub fn padding_index(data: &[u8]) -> Option<usize> {
    let index = data.iter().rposition(|&b| b != 0)?;
    (data[index] == PADDING_MARKER).then_some(index)
}

/// Copies `data` and appends the marker byte followed by zeros up to the
/// next block boundary. Aligned input gains a whole block, so
/// [`strip_marker`] restores any input exactly.
pub fn pad_marked(data: &[u8], block_size: usize) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(data.len() + block_size);
    buffer.extend_from_slice(data);
    buffer.push(PADDING_MARKER);
    let rest = buffer.len() % block_size;
    if rest != 0 {
        buffer.resize(buffer.len() + block_size - rest, 0);
    }
    buffer
}

/// Removes padding written by [`pad_marked`]. The marker must sit within
/// the last block.
pub fn strip_marker(data: &mut Vec<u8>, block_size: usize) -> Result<(), CryptoError> {
    match padding_index(data) {
        Some(index) if data.len() - index <= block_size => {
            data.truncate(index);
            Ok(())
        }
        _ => Err(CryptoError::MissingPadding),
    }
}
