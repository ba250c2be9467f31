//! # Target Resolution
//!
//! Turns parsed [`Target`]s into [`ResolvedTarget`]s.
//!
//! IP literals are taken as-is. Everything else goes through a [`HostLookup`],
//! one task per target, all in flight at once. A failed lookup is not an
//! error: the target keeps its slot with no address and is reported as lost
//! for the rest of the session.

use std::io;
use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use mping_common::network::ip::{self, IpVersion};
use mping_common::network::target::{ResolvedTarget, Target};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("target resolution was cancelled")]
    Cancelled,
}

/// Name resolution backend.
#[async_trait]
pub trait HostLookup: Send + Sync {
    /// Every address `host` resolves to, in resolver order.
    async fn lookup(&self, host: &str) -> io::Result<Vec<IpAddr>>;
}

/// Resolves through the operating system's resolver.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemLookup;

#[async_trait]
impl HostLookup for SystemLookup {
    async fn lookup(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((host, 0)).await?;
        Ok(addrs.map(|addr| addr.ip()).collect())
    }
}

/// Resolves every target, keeping input order.
///
/// Returns [`ResolveError::Cancelled`] if `cancel` fires before every target
/// has an answer. Nothing partial is returned in that case.
pub async fn resolve_targets(
    lookup: Arc<dyn HostLookup>,
    targets: &[Target],
    version: IpVersion,
    cancel: &CancellationToken,
) -> Result<Vec<ResolvedTarget>, ResolveError> {
    if cancel.is_cancelled() {
        return Err(ResolveError::Cancelled);
    }

    let mut resolved: Vec<Option<ResolvedTarget>> = vec![None; targets.len()];
    let mut lookups: JoinSet<(usize, ResolvedTarget)> = JoinSet::new();

    for (idx, target) in targets.iter().enumerate() {
        if let Some((addr, ip_version)) = ip::parse_literal(target.host()) {
            debug!(
                "Target {} is a valid IP ({addr}), no resolution needed",
                target.label()
            );
            resolved[idx] = Some(ResolvedTarget::resolved(addr, ip_version, target.label()));
            continue;
        }

        let lookup = Arc::clone(&lookup);
        let target = target.clone();
        lookups.spawn(async move { (idx, resolve_host(lookup.as_ref(), &target, version).await) });
    }

    while !lookups.is_empty() {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                debug!("Cancelled, aborting target resolution");
                lookups.abort_all();
                return Err(ResolveError::Cancelled);
            }

            joined = lookups.join_next() => match joined {
                Some(Ok((idx, target))) => resolved[idx] = Some(target),
                Some(Err(e)) => warn!("Lookup task failed: {e}"),
                None => break,
            }
        }
    }

    Ok(resolved
        .into_iter()
        .zip(targets)
        .map(|(slot, target)| slot.unwrap_or_else(|| ResolvedTarget::unresolved(target.label())))
        .collect())
}

async fn resolve_host(lookup: &dyn HostLookup, target: &Target, version: IpVersion) -> ResolvedTarget {
    debug!(host = target.host(), network = version.network(), "Resolving target");

    match lookup.lookup(target.host()).await {
        Ok(addrs) => match pick_address(addrs, version) {
            Some((addr, ip_version)) => {
                debug!("Resolved target {} to {addr}", target.label());
                ResolvedTarget::resolved(addr, ip_version, target.label())
            }
            None => {
                warn!(
                    "Failed to resolve target {} ({}): no {version} address",
                    target.label(),
                    target.host()
                );
                ResolvedTarget::unresolved(target.label())
            }
        },
        Err(e) => {
            warn!(
                "Failed to resolve target {} ({}): {e}",
                target.label(),
                target.host()
            );
            ResolvedTarget::unresolved(target.label())
        }
    }
}

/// First address of the wanted family, in canonical form.
fn pick_address(addrs: Vec<IpAddr>, version: IpVersion) -> Option<(IpAddr, IpVersion)> {
    addrs
        .into_iter()
        .map(ip::canonical)
        .find(|(addr, _)| version.accepts(addr))
}
