use super::{cancel::CancelSignal, channel::Channel, requester::Requester, responder::Responder};
use crate::{ConnectConfig, Enigma, NetError, Status};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

/// Which side of the connection this peer plays
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Role {
    /// Listens and hands out the session keys
    Acceptor,
    /// Dials and receives the session keys
    Initiator,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StreamState {
    Idle,
    /// Acceptor with session keys in place, not yet listening
    KeyInit,
    Listening,
    Dialing,
    Connected,
    Closed,
}

#[derive(Clone, Debug)]
enum Endpoint {
    Listen(SocketAddr),
    Dial {
        host: String,
        port: u16,
        config: ConnectConfig,
    },
}

/// One directional TCP connection of a session with its requester and
/// responder
pub struct Stream {
    role: Role,
    endpoint: Endpoint,
    state: StreamState,
    enigma: Arc<Enigma>,
    requester: Option<Requester>,
    responder: Option<Responder>,
    remote: Option<SocketAddr>,
}

impl Stream {
    /// Acceptor stream. Generates the session keys unless the shared
    /// cascade already holds them.
    pub fn server(addr: SocketAddr, enigma: Arc<Enigma>) -> Result<Self, NetError> {
        if !enigma.is_ready() {
            enigma.generate_keys()?;
        }
        Ok(Self {
            role: Role::Acceptor,
            endpoint: Endpoint::Listen(addr),
            state: StreamState::KeyInit,
            enigma,
            requester: None,
            responder: None,
            remote: None,
        })
    }

    pub fn client(
        host: impl Into<String>,
        port: u16,
        enigma: Arc<Enigma>,
        config: ConnectConfig,
    ) -> Self {
        Self {
            role: Role::Initiator,
            endpoint: Endpoint::Dial {
                host: host.into(),
                port,
                config,
            },
            state: StreamState::Idle,
            enigma,
            requester: None,
            responder: None,
            remote: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == StreamState::Connected
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote
    }

    /// Accepts or dials until connected. Reports `Cancel` as soon as
    /// `cancel` fires and `Timeout` when the dial deadline passes.
    pub async fn run(&mut self, cancel: &CancelSignal) -> Status {
        let previous = self.state;
        let result = tokio::select! {
            _ = cancel.cancelled() => Err(NetError::Cancelled),
            result = self.connect() => result,
        };
        match result {
            Ok(socket) => {
                self.attach(socket);
                Status::Ok
            }
            Err(e) => {
                match e {
                    NetError::Cancelled => info!(role = ?self.role, "connection attempt cancelled"),
                    _ => warn!(role = ?self.role, error = %e, "connection attempt failed"),
                }
                self.state = previous;
                e.status()
            }
        }
    }

    /// Runs the accept or dial loop on its own task. Dropping the returned
    /// future aborts that task.
    async fn connect(&mut self) -> Result<TcpStream, NetError> {
        let task = match &self.endpoint {
            Endpoint::Listen(addr) => {
                self.state = StreamState::Listening;
                tokio::spawn(accept_one(*addr))
            }
            Endpoint::Dial { host, port, config } => {
                self.state = StreamState::Dialing;
                tokio::spawn(dial(host.clone(), *port, *config))
            }
        };
        let mut task = scopeguard::guard(task, |task| task.abort());
        match (&mut *task).await {
            Ok(result) => result,
            Err(e) => Err(NetError::Socket(e.to_string())),
        }
    }

    /// Binds the requester and responder to a connected socket
    pub fn attach(&mut self, socket: TcpStream) {
        if let Err(e) = socket2::SockRef::from(&socket).set_keepalive(true) {
            warn!(error = %e, "keepalive not enabled");
        }
        let channel = Arc::new(Channel::tcp(socket));
        self.remote = channel.peer();
        self.requester = Some(Requester::new(channel.clone(), self.enigma.clone()));
        self.responder = Some(Responder::new(channel, self.enigma.clone()));
        self.state = StreamState::Connected;
        info!(role = ?self.role, remote = ?self.remote, "stream connected");
    }

    pub fn requester(&self) -> Result<&Requester, NetError> {
        self.requester.as_ref().ok_or(NetError::NotConnected)
    }

    pub fn requester_mut(&mut self) -> Result<&mut Requester, NetError> {
        self.requester.as_mut().ok_or(NetError::NotConnected)
    }

    pub fn responder(&self) -> Result<&Responder, NetError> {
        self.responder.as_ref().ok_or(NetError::NotConnected)
    }

    /// Shuts the socket down and drops the requester and responder
    pub async fn close(&mut self) {
        if let Some(requester) = self.requester.take() {
            if let Err(e) = requester.close().await {
                debug!(error = %e, "socket already closed");
            }
        }
        self.responder = None;
        self.state = StreamState::Closed;
    }
}

impl std::fmt::Debug for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stream")
            .field("role", &self.role)
            .field("endpoint", &self.endpoint)
            .field("state", &self.state)
            .field("remote", &self.remote)
            .finish_non_exhaustive()
    }
}

async fn accept_one(addr: SocketAddr) -> Result<TcpStream, NetError> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "waiting for the peer");
    let (socket, peer) = listener.accept().await?;
    debug!(%peer, "peer accepted");
    Ok(socket)
}

async fn dial(host: String, port: u16, config: ConnectConfig) -> Result<TcpStream, NetError> {
    let attempts = async {
        loop {
            match TcpStream::connect((host.as_str(), port)).await {
                Ok(socket) => return socket,
                Err(e) => {
                    debug!(%host, port, error = %e, "dial failed, retrying");
                    tokio::time::sleep(config.retry_interval).await;
                }
            }
        }
    };
    match tokio::time::timeout(config.timeout, attempts).await {
        Ok(socket) => {
            info!(%host, port, "connected to the peer");
            Ok(socket)
        }
        Err(_) => Err(NetError::Timeout),
    }
}
