//! ICMP echo adapter.
//!
//! Opens one socket per address family that the session actually needs and
//! multiplexes every probe over it. Opening the sockets requires elevated
//! privileges on most systems, so construction fails fast instead of letting
//! every probe fail later.

use std::net::IpAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use surge_ping::{Client, Config, ICMP, PingIdentifier, PingSequence, SurgeError};
use tracing::{debug, trace};

use mping_common::network::{ip::IpVersion, target::ResolvedTarget};
use mping_common::probe::{ProbeError, Prober};

/// Same payload size as the classic `ping` utility.
const PAYLOAD: [u8; 56] = [0; 56];

pub struct IcmpProber {
    v4: Option<Client>,
    v6: Option<Client>,
    identifier: PingIdentifier,
    sequence: AtomicU16,
}

impl IcmpProber {
    /// Opens sockets for the families present among the resolved targets.
    ///
    /// Unresolved targets are ignored, they are never probed.
    pub fn for_targets(targets: &[ResolvedTarget]) -> Result<Self, ProbeError> {
        let (need_v4, need_v6) = required_families(targets);
        Self::new(need_v4, need_v6)
    }

    pub fn new(need_v4: bool, need_v6: bool) -> Result<Self, ProbeError> {
        let v4 = need_v4.then(|| open_client(ICMP::V4)).transpose()?;
        let v6 = need_v6.then(|| open_client(ICMP::V6)).transpose()?;
        let identifier = PingIdentifier(rand::random());

        debug!(
            v4 = v4.is_some(),
            v6 = v6.is_some(),
            identifier = identifier.0,
            "ICMP sockets ready"
        );

        Ok(Self {
            v4,
            v6,
            identifier,
            sequence: AtomicU16::new(0),
        })
    }

    fn client_for(&self, family: IpVersion) -> Result<&Client, ProbeError> {
        let client = match family {
            IpVersion::V4 => self.v4.as_ref(),
            IpVersion::V6 => self.v6.as_ref(),
            IpVersion::Unspecified => None,
        };
        client.ok_or_else(|| ProbeError::Socket(format!("no {family} socket was opened")))
    }

    fn next_sequence(&self) -> PingSequence {
        PingSequence(self.sequence.fetch_add(1, Ordering::Relaxed))
    }
}

#[async_trait]
impl Prober for IcmpProber {
    async fn probe(
        &self,
        address: IpAddr,
        ip_version: IpVersion,
        timeout: Duration,
    ) -> Result<Duration, ProbeError> {
        let family = probe_family(address, ip_version)?;
        let client = self.client_for(family)?;

        let mut pinger = client.pinger(address, self.identifier).await;
        pinger.timeout(timeout);

        let sequence = self.next_sequence();
        trace!(%address, seq = sequence.0, "sending echo request");

        match pinger.ping(sequence, &PAYLOAD).await {
            Ok((_packet, rtt)) => Ok(rtt),
            Err(SurgeError::Timeout { .. }) => Err(ProbeError::Timeout(timeout)),
            Err(e) => Err(ProbeError::Network(e.to_string())),
        }
    }
}

fn open_client(kind: ICMP) -> Result<Client, ProbeError> {
    let config = match kind {
        ICMP::V4 => Config::default(),
        ICMP::V6 => Config::builder().kind(ICMP::V6).build(),
    };
    Client::new(&config).map_err(|e| ProbeError::Socket(e.to_string()))
}

fn required_families(targets: &[ResolvedTarget]) -> (bool, bool) {
    targets
        .iter()
        .filter_map(|target| target.address)
        .fold((false, false), |(v4, v6), ip| {
            (v4 || ip.is_ipv4(), v6 || ip.is_ipv6())
        })
}

/// The family to send on. An explicit hint must agree with the address.
fn probe_family(address: IpAddr, hint: IpVersion) -> Result<IpVersion, ProbeError> {
    match hint {
        IpVersion::Unspecified => Ok(IpVersion::of(&address)),
        hint if hint.accepts(&address) => Ok(hint),
        hint => Err(ProbeError::Network(format!(
            "{address} is not an {hint} address"
        ))),
    }
}
