use super::frame;
use crate::NetError;
use std::net::SocketAddr;
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf},
    net::TcpStream,
    sync::Mutex,
};

/// A connected byte stream carrying frames in both directions.
///
/// Reads and writes lock separate halves, so a pending read never blocks a
/// send on the same stream.
pub struct Channel<S = TcpStream> {
    reader: Mutex<ReadHalf<S>>,
    writer: Mutex<WriteHalf<S>>,
    peer: Option<SocketAddr>,
}

impl<S: AsyncRead + AsyncWrite> Channel<S> {
    pub fn new(stream: S) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
            peer: None,
        }
    }

    pub async fn send(&self, data: &[u8]) -> Result<(), NetError> {
        let mut writer = self.writer.lock().await;
        frame::send(&mut *writer, data).await
    }

    pub async fn read(&self) -> Result<Vec<u8>, NetError> {
        let mut reader = self.reader.lock().await;
        frame::read(&mut *reader).await
    }

    /// Shuts down the write side; the peer sees end of stream
    pub async fn shutdown(&self) -> Result<(), NetError> {
        let mut writer = self.writer.lock().await;
        writer.shutdown().await?;
        Ok(())
    }

    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }
}

impl Channel<TcpStream> {
    pub fn tcp(stream: TcpStream) -> Self {
        let peer = stream.peer_addr().ok();
        Self {
            peer,
            ..Self::new(stream)
        }
    }
}

impl<S> std::fmt::Debug for Channel<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel").field("peer", &self.peer).finish()
    }
}
