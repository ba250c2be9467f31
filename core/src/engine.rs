//! # Round Scheduler
//!
//! Drives a pinging session: every interval, one probe per target, all in
//! parallel. A round is published only once every probe has answered, failed
//! or timed out, so statistics and output never see half a round.
//!
//! ```text
//! INIT ──> RUNNING ──(count reached)──> DONE
//!             │
//!             └──(cancelled)──> CANCELLED
//! ```
//!
//! Both terminal states end with exactly one summary.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinError;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, debug_span};

use mping_common::config::PingConfig;
use mping_common::network::target::ResolvedTarget;
use mping_common::probe::{ProbeError, Prober};

use crate::report::Reporter;
use crate::stats::Statistics;

mod round;

/// The header row is repeated on rounds 1, 11, 21, ...
const HEADER_EVERY: u32 = 10;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no targets to ping")]
    NoTargets,

    #[error("pinging was cancelled")]
    Cancelled,

    #[error("probe task failed: {0}")]
    Task(#[from] JoinError),

    #[error("round finished with missing results")]
    IncompleteRound,

    #[error("failed to report results: {0}")]
    Report(#[from] io::Error),
}

/// Outcome of one probe against one target in one round.
#[derive(Clone, Debug, PartialEq)]
pub struct PingResult {
    pub target: ResolvedTarget,
    pub outcome: Result<Duration, ProbeError>,
}

impl PingResult {
    pub fn success(target: ResolvedTarget, rtt: Duration) -> Self {
        Self {
            target,
            outcome: Ok(rtt),
        }
    }

    pub fn failure(target: ResolvedTarget, error: ProbeError) -> Self {
        Self {
            target,
            outcome: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn rtt(&self) -> Option<Duration> {
        self.outcome.as_ref().ok().copied()
    }

    pub fn error(&self) -> Option<&ProbeError> {
        self.outcome.as_ref().err()
    }
}

pub struct Pinger {
    targets: Arc<[ResolvedTarget]>,
    prober: Arc<dyn Prober>,
    interval: Duration,
    timeout: Duration,
    count: u32,
}

impl Pinger {
    /// Sets up a session. The target list and its order are fixed from here on.
    pub fn new(
        targets: Vec<ResolvedTarget>,
        prober: Arc<dyn Prober>,
        config: &PingConfig,
    ) -> Result<Self, EngineError> {
        if targets.is_empty() {
            return Err(EngineError::NoTargets);
        }

        Ok(Self {
            targets: targets.into(),
            prober,
            interval: config.interval,
            timeout: config.timeout.min(config.interval),
            count: config.count,
        })
    }

    pub fn targets(&self) -> &[ResolvedTarget] {
        &self.targets
    }

    /// Runs rounds until `count` is reached or `cancel` fires, then reports
    /// the summary.
    ///
    /// An interrupted session returns [`EngineError::Cancelled`] after the
    /// summary has been written.
    pub async fn run(
        &self,
        reporter: &mut dyn Reporter,
        cancel: &CancellationToken,
    ) -> Result<Statistics, EngineError> {
        debug!(count = self.count, "Pinging {} targets", self.targets.len());

        let mut stats = Statistics::new(self.targets.len());
        let outcome = self.run_rounds(reporter, &mut stats, cancel).await;

        let interrupted = matches!(outcome, Err(EngineError::Cancelled));
        reporter.summary(&stats, interrupted)?;

        outcome.map(|()| stats)
    }

    async fn run_rounds(
        &self,
        reporter: &mut dyn Reporter,
        stats: &mut Statistics,
        cancel: &CancellationToken,
    ) -> Result<(), EngineError> {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;

        let mut counter: u32 = 1;

        loop {
            let probes = round::ping_all_once(&self.targets, &self.prober, self.timeout)
                .instrument(debug_span!("round", n = counter));

            let results = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(EngineError::Cancelled),
                results = probes => results?,
            };

            stats.record(&results);
            reporter.round(counter, &results, counter % HEADER_EVERY == 1)?;

            if self.count > 0 && counter >= self.count {
                debug!("Reached {} rounds", self.count);
                return Ok(());
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(EngineError::Cancelled),
                _ = ticker.tick() => counter = counter.saturating_add(1),
            }
        }
    }
}
