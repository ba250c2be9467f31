//! Fan-out and fan-in of a single round.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time;
use tracing::trace;

use mping_common::network::target::ResolvedTarget;
use mping_common::probe::{ProbeError, Prober};

use super::{EngineError, PingResult};

/// Probes every target once, concurrently, and returns the results in
/// target order.
///
/// Unresolved targets fail immediately without touching the prober. Each
/// probe is cut off at `timeout` on its own, independent of its siblings.
/// Dropping the returned future aborts every probe still in flight.
pub(super) async fn ping_all_once(
    targets: &Arc<[ResolvedTarget]>,
    prober: &Arc<dyn Prober>,
    timeout: Duration,
) -> Result<Vec<PingResult>, EngineError> {
    let mut slots: Vec<Option<PingResult>> = vec![None; targets.len()];
    let mut probes: JoinSet<(usize, PingResult)> = JoinSet::new();

    for (idx, target) in targets.iter().enumerate() {
        let Some(address) = target.address else {
            slots[idx] = Some(PingResult::failure(target.clone(), ProbeError::Unresolved));
            continue;
        };

        let prober = Arc::clone(prober);
        let target = target.clone();
        probes.spawn(async move {
            let outcome = time::timeout(timeout, prober.probe(address, target.ip_version, timeout))
                .await
                .unwrap_or(Err(ProbeError::Timeout(timeout)));
            (idx, PingResult { target, outcome })
        });
    }

    while let Some(joined) = probes.join_next().await {
        let (idx, result) = joined?;
        trace!(label = %result.target.label, outcome = ?result.outcome, "probe finished");
        slots[idx] = Some(result);
    }

    slots
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or(EngineError::IncompleteRound)
}
