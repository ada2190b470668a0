use super::{channel::Channel, envelope, message::Message, message::MessageKind};
use crate::{Enigma, NetError, Status, MARKER_OFFSET, MARKER_TOLERANCE};
use std::sync::Arc;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpStream,
};
use tracing::{debug, warn};

/// Answer side of a stream: answers the peer's requests and reads the
/// answers to our own
pub struct Responder<S = TcpStream> {
    channel: Arc<Channel<S>>,
    enigma: Arc<Enigma>,
}

impl<S: AsyncRead + AsyncWrite> Responder<S> {
    pub fn new(channel: Arc<Channel<S>>, enigma: Arc<Enigma>) -> Self {
        Self { channel, enigma }
    }

    pub async fn send(
        &self,
        status: Status,
        request: &Message,
        data: &[u8],
        extra: &[u8],
    ) -> Result<Message, NetError> {
        let answer = Message::answer(request, status, data, extra);
        let sealed = envelope::seal_off_thread(&self.enigma, answer.clone()).await?;
        self.channel.send(&sealed).await?;
        debug!(id = answer.id, counter = answer.counter, ?status, "answer sent");
        Ok(answer)
    }

    /// Reads the answer to `request`
    pub async fn read(&self, request: &Message) -> Result<Message, NetError> {
        let data = self.channel.read().await?;
        let received = cm_crypto::now();
        let answer = envelope::open_off_thread(&self.enigma, data).await?;
        validate_answer(request, &answer)?;
        envelope::check_freshness(&answer, received)?;
        debug!(id = answer.id, counter = answer.counter, "answer received");
        Ok(answer)
    }

    pub async fn close(&self) -> Result<(), NetError> {
        self.channel.shutdown().await
    }
}

impl<S> std::fmt::Debug for Responder<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Responder").finish_non_exhaustive()
    }
}

pub(crate) fn validate_answer(request: &Message, answer: &Message) -> Result<(), NetError> {
    let failed = if answer.kind != MessageKind::Answer {
        "not an answer"
    } else if answer.id != request.id {
        "answer id differs"
    } else if answer.counter != request.counter {
        "answer counter differs"
    } else if !marker_matches(request.marker, answer.marker) {
        "answer marker differs"
    } else {
        return Ok(());
    };
    warn!(id = answer.id, counter = answer.counter, "{failed}");
    Err(NetError::InvalidMessage(failed))
}

/// The answer marker must exceed the request marker and equal it plus the
/// offset, within [`MARKER_TOLERANCE`]. The subtraction happens in `f32`
/// like the addition on the sending side; `f32` rounding across platforms
/// stays within the tolerance for markers below 100.
pub(crate) fn marker_matches(request: f32, answer: f32) -> bool {
    answer > request && (f64::from(answer - MARKER_OFFSET) - f64::from(request)).abs() < MARKER_TOLERANCE
}
