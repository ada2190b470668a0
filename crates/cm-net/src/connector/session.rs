use super::{
    cancel::CancelSignal,
    message::Message,
    stream::{Role, Stream},
};
use crate::{ConnectConfig, Credentials, Enigma, KeyStore, NetError, Status};
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};
use tracing::{error, info, warn};
use zeroize::Zeroizing;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SessionState {
    Idle,
    Connecting,
    Connected,
    Handshaking,
    /// Handshake done, messages may flow
    Ready,
    Closed,
}

/// Two streams to one peer sharing a single cascade.
///
/// Each side sends its own requests on the outbound stream and reads the
/// peer's requests on the inbound one. A session is used once: after
/// [`Session::close`] it cannot connect again.
pub struct Session {
    pub(super) role: Role,
    state: SessionState,
    pub(super) local_user: String,
    /// Known up front when dialing, learnt from the login when accepting
    pub(super) buddy: Option<String>,
    pub(super) pin: Zeroizing<String>,
    pub(super) keystore: Arc<dyn KeyStore>,
    pub(super) enigma: Arc<Enigma>,
    pub(super) inbound: Stream,
    pub(super) outbound: Stream,
}

impl Session {
    /// Acceptor listening on `port` (inbound) and `port + 1` (outbound).
    /// Fresh session keys are generated here.
    pub fn server(
        keystore: Arc<dyn KeyStore>,
        local_user: impl Into<String>,
        bind: IpAddr,
        port: u16,
        pin: impl Into<String>,
    ) -> Result<Self, NetError> {
        let local_user = local_user.into();
        let next_port = next_port(port)?;
        let private_key = keystore
            .private_key(&local_user)
            .ok_or_else(|| NetError::UnknownUser(local_user.clone()))?;

        let enigma = Arc::new(Enigma::new(private_key));
        let inbound = Stream::server(SocketAddr::new(bind, port), enigma.clone())?;
        let outbound = Stream::server(SocketAddr::new(bind, next_port), enigma.clone())?;
        Ok(Self {
            role: Role::Acceptor,
            state: SessionState::Idle,
            local_user,
            buddy: None,
            pin: Zeroizing::new(pin.into()),
            keystore,
            enigma,
            inbound,
            outbound,
        })
    }

    /// Initiator dialing `credentials.port + 1` (inbound) and
    /// `credentials.port` (outbound)
    pub fn client(
        keystore: Arc<dyn KeyStore>,
        local_user: impl Into<String>,
        credentials: &Credentials,
        config: ConnectConfig,
    ) -> Result<Self, NetError> {
        let local_user = local_user.into();
        let next_port = next_port(credentials.port)?;
        let private_key = keystore
            .private_key(&local_user)
            .ok_or_else(|| NetError::UnknownUser(local_user.clone()))?;
        let buddy_key = keystore
            .public_key(&credentials.name)
            .ok_or_else(|| NetError::UnknownUser(credentials.name.clone()))?;

        let enigma = Arc::new(Enigma::with_buddy(private_key, buddy_key));
        let address = credentials.address.as_str();
        let inbound = Stream::client(address, next_port, enigma.clone(), config);
        let outbound = Stream::client(address, credentials.port, enigma.clone(), config);
        Ok(Self {
            role: Role::Initiator,
            state: SessionState::Idle,
            local_user,
            buddy: Some(credentials.name.clone()),
            pin: Zeroizing::new(credentials.pin.clone()),
            keystore,
            enigma,
            inbound,
            outbound,
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    pub fn local_user(&self) -> &str {
        &self.local_user
    }

    pub fn buddy(&self) -> Option<&str> {
        self.buddy.as_deref()
    }

    pub fn enigma(&self) -> &Arc<Enigma> {
        &self.enigma
    }

    /// `(inbound, outbound)`
    pub fn streams_mut(&mut self) -> (&mut Stream, &mut Stream) {
        (&mut self.inbound, &mut self.outbound)
    }

    /// Connects and runs the handshake. Any outcome other than `Ok`
    /// closes the session.
    pub async fn establish(&mut self, cancel: &CancelSignal) -> Status {
        match self.connect(cancel).await {
            Status::Ok => {}
            status => {
                self.close().await;
                return status;
            }
        }
        let result = tokio::select! {
            _ = cancel.cancelled() => Err(NetError::Cancelled),
            result = self.start_handshake() => result,
        };
        self.conclude_handshake(result).await
    }

    /// Brings both streams up concurrently. When one of them fails the
    /// other attempt is abandoned.
    pub async fn connect(&mut self, cancel: &CancelSignal) -> Status {
        if self.state != SessionState::Idle {
            warn!(state = ?self.state, "session cannot connect");
            return Status::Error;
        }
        self.state = SessionState::Connecting;

        let attempt = CancelSignal::new();
        let (inbound, outbound) = (&mut self.inbound, &mut self.outbound);
        let both = async {
            tokio::join!(
                run_watched(inbound, &attempt),
                run_watched(outbound, &attempt)
            )
        };
        tokio::pin!(both);
        let (first, second) = tokio::select! {
            pair = &mut both => pair,
            _ = cancel.cancelled() => {
                attempt.cancel();
                both.await
            }
        };

        let status = match (first, second) {
            _ if cancel.is_cancelled() => Status::Cancel,
            (Status::Ok, Status::Ok) => Status::Ok,
            // a failed stream cancels its sibling; report the failure
            (Status::Cancel, other) | (other, Status::Cancel) if other != Status::Ok => other,
            (Status::Ok, other) | (other, _) => other,
        };
        self.state = match status {
            Status::Ok => SessionState::Connected,
            _ => SessionState::Idle,
        };
        info!(role = ?self.role, ?status, "session connect finished");
        status
    }

    /// Runs the handshake over connected streams
    pub async fn handshake(&mut self) -> Status {
        let result = self.start_handshake().await;
        self.conclude_handshake(result).await
    }

    async fn start_handshake(&mut self) -> Result<(), NetError> {
        if self.state != SessionState::Connected {
            return Err(NetError::NotConnected);
        }
        self.state = SessionState::Handshaking;
        self.run_handshake().await
    }

    async fn conclude_handshake(&mut self, result: Result<(), NetError>) -> Status {
        match result {
            Ok(()) => {
                self.state = SessionState::Ready;
                info!(role = ?self.role, buddy = ?self.buddy, "session ready");
                Status::Ok
            }
            Err(e) => {
                match e {
                    NetError::SecurityBreach(_) => error!(error = %e, "handshake aborted"),
                    _ => warn!(error = %e, "handshake failed"),
                }
                self.close().await;
                e.status()
            }
        }
    }

    /// Sends a request to the peer on the outbound stream
    pub async fn request(&mut self, id: u32, data: &[u8], extra: &[u8]) -> Result<Message, NetError> {
        self.require_ready()?;
        self.outbound.requester_mut()?.send(id, data, extra).await
    }

    /// Reads the peer's answer to `request`
    pub async fn read_answer(&self, request: &Message) -> Result<Message, NetError> {
        self.require_ready()?;
        self.outbound.responder()?.read(request).await
    }

    /// Reads the next request the peer sent on the inbound stream
    pub async fn read_request(&self) -> Result<Message, NetError> {
        self.require_ready()?;
        self.inbound.requester()?.read().await
    }

    pub async fn answer(
        &self,
        status: Status,
        request: &Message,
        data: &[u8],
        extra: &[u8],
    ) -> Result<Message, NetError> {
        self.require_ready()?;
        self.inbound.responder()?.send(status, request, data, extra).await
    }

    fn require_ready(&self) -> Result<(), NetError> {
        match self.state {
            SessionState::Ready => Ok(()),
            _ => Err(NetError::NotReady),
        }
    }

    /// Closes both streams and drops the ciphers. Later calls do nothing.
    pub async fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.inbound.close().await;
        self.outbound.close().await;
        self.enigma.clear();
        self.state = SessionState::Closed;
        info!(role = ?self.role, "session closed");
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("role", &self.role)
            .field("state", &self.state)
            .field("local_user", &self.local_user)
            .field("buddy", &self.buddy)
            .field("inbound", &self.inbound)
            .field("outbound", &self.outbound)
            .finish_non_exhaustive()
    }
}

fn next_port(port: u16) -> Result<u16, NetError> {
    match port {
        0 | u16::MAX => Err(NetError::InvalidPort(port)),
        _ => Ok(port + 1),
    }
}

async fn run_watched(stream: &mut Stream, attempt: &CancelSignal) -> Status {
    let status = stream.run(attempt).await;
    if status != Status::Ok {
        attempt.cancel();
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fixtures, MemoryKeyStore};
    use std::net::Ipv4Addr;

    fn keystore() -> Arc<dyn KeyStore> {
        let mut store = MemoryKeyStore::new();
        store
            .add_private_key("alice", fixtures::alice())
            .add_private_key("bob", fixtures::bob());
        Arc::new(store)
    }

    #[test]
    fn ports_need_a_successor() {
        assert_eq!(next_port(4000), Ok(4001));
        assert_eq!(next_port(0), Err(NetError::InvalidPort(0)));
        assert_eq!(next_port(u16::MAX), Err(NetError::InvalidPort(u16::MAX)));
    }

    #[test]
    fn unknown_users_are_rejected() {
        let local = IpAddr::V4(Ipv4Addr::LOCALHOST);
        assert_eq!(
            Session::server(keystore(), "carol", local, 4000, "1234").err(),
            Some(NetError::UnknownUser("carol".into()))
        );
        let credentials = Credentials::new("127.0.0.1", 4000, "carol", "1234");
        assert_eq!(
            Session::client(keystore(), "bob", &credentials, ConnectConfig::default()).err(),
            Some(NetError::UnknownUser("carol".into()))
        );
    }

    #[tokio::test]
    async fn new_sessions_are_idle() {
        let local = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let server = Session::server(keystore(), "alice", local, 4000, "1234").unwrap();
        assert_eq!(server.state(), SessionState::Idle);
        assert_eq!(server.role(), Role::Acceptor);
        assert!(server.buddy().is_none());
        assert!(server.enigma().is_ready());

        let credentials = Credentials::new("127.0.0.1", 4000, "alice", "1234");
        let client =
            Session::client(keystore(), "bob", &credentials, ConnectConfig::default()).unwrap();
        assert_eq!(client.buddy(), Some("alice"));
        assert!(!client.enigma().is_ready());
        assert!(client.enigma().has_buddy_key());
        assert_eq!(client.read_request().await.err(), Some(NetError::NotReady));
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let local = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let mut server = Session::server(keystore(), "alice", local, 4000, "1234").unwrap();
        server.close().await;
        server.close().await;
        assert_eq!(server.state(), SessionState::Closed);
        assert!(!server.enigma().is_ready());
        assert_eq!(server.connect(&CancelSignal::new()).await, Status::Error);
    }
}
