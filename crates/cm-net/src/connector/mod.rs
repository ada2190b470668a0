pub mod cancel;
pub mod channel;
mod envelope;
pub mod frame;
mod handshake;
pub mod message;
pub mod requester;
pub mod responder;
pub mod session;
pub mod stream;
