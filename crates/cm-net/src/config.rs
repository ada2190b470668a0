use crate::{CONNECTION_TIMEOUT, RETRY_INTERVAL};
use std::time::Duration;

/// Dialer settings for the initiating side
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ConnectConfig {
    /// Deadline for the whole connection attempt
    pub timeout: Duration,
    pub retry_interval: Duration,
}

impl ConnectConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            timeout: CONNECTION_TIMEOUT,
            retry_interval: RETRY_INTERVAL,
        }
    }
}

/// Where the acceptor waits and who it is
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Credentials {
    pub address: String,
    /// Base port, the acceptor also listens on `port + 1`
    pub port: u16,
    /// User name of the acceptor
    pub name: String,
    pub pin: String,
}

impl Credentials {
    pub fn new(
        address: impl Into<String>,
        port: u16,
        name: impl Into<String>,
        pin: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            port,
            name: name.into(),
            pin: pin.into(),
        }
    }
}
