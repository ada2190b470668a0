//! Length prefixed frames: a little endian `u32` byte count, then the bytes.

use crate::{NetError, MAX_FRAME_LEN};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub const HEADER_LEN: usize = 4;

pub async fn send<W>(writer: &mut W, data: &[u8]) -> Result<(), NetError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    if data.is_empty() {
        return Err(NetError::EmptyFrame);
    }
    if data.len() > MAX_FRAME_LEN {
        return Err(NetError::FrameTooLarge(data.len()));
    }
    let mut buffer = Vec::with_capacity(HEADER_LEN + data.len());
    buffer.extend_from_slice(&(data.len() as u32).to_le_bytes());
    buffer.extend_from_slice(data);
    writer.write_all(&buffer).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn read<R>(reader: &mut R) -> Result<Vec<u8>, NetError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header).await?;
    let len = u32::from_le_bytes(header) as usize;
    if len == 0 {
        return Err(NetError::EmptyFrame);
    }
    if len > MAX_FRAME_LEN {
        return Err(NetError::FrameTooLarge(len));
    }
    let mut data = vec![0u8; len];
    reader.read_exact(&mut data).await?;
    Ok(data)
}
