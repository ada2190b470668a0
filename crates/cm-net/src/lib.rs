use std::time::Duration;

/// Oldest accepted message, in seconds
pub const MESSAGE_TIMEOUT: i64 = 60;
/// Added by the responder to the request marker
pub const MARKER_OFFSET: f32 = 3.1415;
pub const MARKER_TOLERANCE: f64 = 0.000_01;
/// Pause between two dial attempts
pub const RETRY_INTERVAL: Duration = Duration::from_secs(5);
pub const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

mod config;
mod connector;
mod enigma;
mod keystore;
mod net_error;

pub use config::{ConnectConfig, Credentials};
pub use connector::{
    cancel::CancelSignal,
    channel::Channel,
    frame,
    message::{Message, MessageKind, Operation},
    requester::Requester,
    responder::Responder,
    session::{Session, SessionState},
    stream::{Role, Stream, StreamState},
};
pub use enigma::Enigma;
pub use keystore::{private_key_from_pem, public_key_from_pem, KeyStore, MemoryKeyStore};
pub use net_error::{NetError, Status};

#[cfg(test)]
mod fixtures;
