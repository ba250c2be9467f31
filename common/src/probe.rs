//! The probe port.
//!
//! The engine only knows that a probe sends one echo to an address and comes
//! back with a round trip time or a reason it did not. Adapters (ICMP in
//! production, scripted fakes in tests) implement [`Prober`].

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::network::ip::IpVersion;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("no reply within {0:?}")]
    Timeout(Duration),

    /// The target never resolved to an address, so nothing was sent.
    #[error("target has no address")]
    Unresolved,

    /// The raw socket could not be opened, usually for lack of privileges.
    #[error("failed to open ICMP socket: {0}")]
    Socket(String),

    #[error("network error: {0}")]
    Network(String),
}

/// One echo exchange against one address.
///
/// `timeout` is a hard upper bound on how long the call may take.
/// Implementations must be safe to call concurrently for distinct addresses.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(
        &self,
        address: IpAddr,
        ip_version: IpVersion,
        timeout: Duration,
    ) -> Result<Duration, ProbeError>;
}
