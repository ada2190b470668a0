use super::{channel::Channel, envelope, message::Message, message::MessageKind};
use crate::{Enigma, NetError};
use rand::Rng;
use std::sync::Arc;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpStream,
};
use tracing::{debug, warn};

/// Request side of a stream: sends requests and reads the peer's requests.
///
/// The counter and marker belong to this stream alone and only change on
/// [`Requester::send`].
pub struct Requester<S = TcpStream> {
    channel: Arc<Channel<S>>,
    enigma: Arc<Enigma>,
    counter: u32,
    marker: f32,
}

impl<S: AsyncRead + AsyncWrite> Requester<S> {
    pub fn new(channel: Arc<Channel<S>>, enigma: Arc<Enigma>) -> Self {
        Self {
            channel,
            enigma,
            counter: 0,
            marker: 0.0,
        }
    }

    /// Next request of this stream: bumps the counter and draws a fresh
    /// marker in `[0, 100)`
    pub fn prepare(&mut self, id: u32, data: &[u8], extra: &[u8]) -> Message {
        self.counter = self.counter.wrapping_add(1);
        self.marker = rand::thread_rng().gen_range(0.0f32..100.0);
        Message::request(id, self.counter, self.marker, data, extra)
    }

    /// Seals and sends a request, returning the message as sent so the
    /// answer can be matched against it
    pub async fn send(&mut self, id: u32, data: &[u8], extra: &[u8]) -> Result<Message, NetError> {
        let request = self.prepare(id, data, extra);
        let sealed = envelope::seal_off_thread(&self.enigma, request.clone()).await?;
        self.channel.send(&sealed).await?;
        debug!(id, counter = self.counter, "request sent");
        Ok(request)
    }

    /// Reads a request from the peer and checks its type and age
    pub async fn read(&self) -> Result<Message, NetError> {
        let data = self.channel.read().await?;
        let received = cm_crypto::now();
        let request = envelope::open_off_thread(&self.enigma, data).await?;
        if request.kind != MessageKind::Request {
            warn!(kind = ?request.kind, "expected a request");
            return Err(NetError::InvalidMessage("not a request"));
        }
        envelope::check_freshness(&request, received)?;
        debug!(id = request.id, counter = request.counter, "request received");
        Ok(request)
    }

    /// Sends handshake bytes as a bare frame, outside the envelope
    pub async fn send_raw(&self, data: &[u8]) -> Result<(), NetError> {
        self.channel.send(data).await
    }

    pub async fn read_raw(&self) -> Result<Vec<u8>, NetError> {
        self.channel.read().await
    }

    pub async fn close(&self) -> Result<(), NetError> {
        self.channel.shutdown().await
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn marker(&self) -> f32 {
        self.marker
    }
}

impl<S> std::fmt::Debug for Requester<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Requester")
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fixtures, Operation};
    use tokio::io::DuplexStream;

    fn pair() -> (Requester<DuplexStream>, Requester<DuplexStream>) {
        let (server, client) = fixtures::enigma_pair();
        let (a, b) = tokio::io::duplex(64 * 1024);
        (
            Requester::new(Arc::new(Channel::new(a)), server),
            Requester::new(Arc::new(Channel::new(b)), client),
        )
    }

    #[tokio::test]
    async fn request_reaches_the_peer() {
        let (mut server, client) = pair();
        let sent = server
            .send(Operation::Message.id(), b"hi there", b"meta")
            .await
            .unwrap();
        let received = client.read().await.unwrap();
        assert_eq!(received, sent);
        assert_eq!(received.kind, MessageKind::Request);
        assert_eq!(received.data, b"hi there");
        assert!((0.0..100.0).contains(&received.marker));
    }

    #[tokio::test]
    async fn counter_increments_per_request() {
        let (mut server, client) = pair();
        for expected in 1..=3 {
            let sent = server.send(Operation::Message.id(), b"x", b"").await.unwrap();
            assert_eq!(sent.counter, expected);
            assert_eq!(server.counter(), expected);
            assert_eq!(server.marker(), sent.marker);
            client.read().await.unwrap();
        }
    }

    #[tokio::test]
    async fn stale_request_is_rejected() {
        let (server_enigma, client_enigma) = fixtures::enigma_pair();
        let (a, b) = tokio::io::duplex(64 * 1024);
        let sender = Channel::new(a);
        let client = Requester::new(Arc::new(Channel::new(b)), client_enigma);

        let mut request = Message::request(Operation::Message.id(), 1, 5.0, b"old", b"");
        request.timestamp = cm_crypto::now() - chrono::Duration::seconds(61);
        sender
            .send(&envelope::seal(&server_enigma, &request).unwrap())
            .await
            .unwrap();
        assert!(matches!(client.read().await, Err(NetError::StaleMessage(age)) if age >= 61));
    }

    #[tokio::test]
    async fn answers_are_not_requests() {
        let (server_enigma, client_enigma) = fixtures::enigma_pair();
        let (a, b) = tokio::io::duplex(64 * 1024);
        let sender = Channel::new(a);
        let client = Requester::new(Arc::new(Channel::new(b)), client_enigma);

        let request = Message::request(Operation::Message.id(), 1, 5.0, b"", b"");
        let answer = Message::answer(&request, crate::Status::Ok, b"", b"");
        sender
            .send(&envelope::seal(&server_enigma, &answer).unwrap())
            .await
            .unwrap();
        assert_eq!(
            client.read().await,
            Err(NetError::InvalidMessage("not a request"))
        );
    }

    #[tokio::test]
    async fn raw_frames_skip_the_envelope() {
        let (server, client) = pair();
        server.send_raw(b"raw handshake bytes").await.unwrap();
        assert_eq!(client.read_raw().await.unwrap(), b"raw handshake bytes");
    }
}
