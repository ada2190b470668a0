use super::message::Message;
use crate::{enigma::run_blocking, Enigma, NetError, MESSAGE_TIMEOUT};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;

/// [`seal`] on the blocking pool
pub(crate) async fn seal_off_thread(
    enigma: &Arc<Enigma>,
    message: Message,
) -> Result<Vec<u8>, NetError> {
    run_blocking(enigma, move |enigma| seal(enigma, &message)).await
}

/// [`open`] on the blocking pool
pub(crate) async fn open_off_thread(
    enigma: &Arc<Enigma>,
    data: Vec<u8>,
) -> Result<Message, NetError> {
    run_blocking(enigma, move |enigma| open(enigma, &data)).await
}

/// Packed message run through the cascade, followed by the signature
pub(crate) fn seal(enigma: &Enigma, message: &Message) -> Result<Vec<u8>, NetError> {
    let packed = message.to_packed()?;
    let mut sealed = enigma.encrypt(&packed)?;
    let signature = enigma.signature(&sealed)?;
    sealed.extend_from_slice(&signature);
    Ok(sealed)
}

pub(crate) fn open(enigma: &Enigma, data: &[u8]) -> Result<Message, NetError> {
    let signature_size = enigma.signature_size()?;
    if data.len() <= signature_size {
        warn!(len = data.len(), "frame too short for a signed message");
        return Err(NetError::InvalidMessage("missing signature"));
    }
    let (cipher, signature) = data.split_at(data.len() - signature_size);
    if !enigma.is_valid_signature(signature, cipher) {
        warn!("message signature rejected");
        return Err(NetError::SignatureInvalid);
    }
    let packed = enigma.decrypt(cipher).map_err(|e| {
        warn!(error = %e, "signed message does not decrypt");
        e
    })?;
    Message::from_packed(&packed).map_err(|e| {
        warn!(error = %e, "message does not decode");
        e
    })
}

/// Rejects messages older than [`MESSAGE_TIMEOUT`] seconds at `received`.
/// Timestamps ahead of `received` pass however far off they are, so a peer
/// clock running fast is never caught here.
pub(crate) fn check_freshness(message: &Message, received: DateTime<Utc>) -> Result<(), NetError> {
    let age = cm_crypto::age_in_seconds(message.timestamp, received);
    if age > MESSAGE_TIMEOUT {
        warn!(age, counter = message.counter, "stale message rejected");
        return Err(NetError::StaleMessage(age));
    }
    Ok(())
}
