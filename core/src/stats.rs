//! Per-target statistics.
//!
//! Updated once per target per round in O(1). Nothing is ever reset or
//! decremented, and no RTT history is kept: the average is a streaming mean.

use std::time::Duration;

use crate::engine::PingResult;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PingStats {
    success_count: u32,
    failure_count: u32,
    avg_rtt: Duration,
    /// Unrounded running mean in nanoseconds. `avg_rtt` is derived from it on
    /// every update so rounding error does not accumulate across samples.
    mean_nanos: f64,
}

impl PingStats {
    pub fn add_success(&mut self, rtt: Duration) {
        self.success_count = self.success_count.saturating_add(1);

        let sample = rtt.as_nanos() as f64;
        if self.success_count == 1 {
            self.mean_nanos = sample;
        } else {
            let n = f64::from(self.success_count);
            self.mean_nanos += (sample - self.mean_nanos) / n;
        }
        self.avg_rtt = Duration::from_nanos(self.mean_nanos.round() as u64);
    }

    pub fn add_failure(&mut self) {
        self.failure_count = self.failure_count.saturating_add(1);
    }

    pub fn success_count(&self) -> u32 {
        self.success_count
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    pub fn total(&self) -> u64 {
        u64::from(self.success_count) + u64::from(self.failure_count)
    }

    /// Share of attempts that failed, in percent. `0.0` before any attempt.
    pub fn loss_percent(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        if self.success_count == 0 {
            return 100.0;
        }
        self.failure_count as f64 / total as f64 * 100.0
    }

    /// Mean RTT over successful probes, zero when there were none.
    /// Use [`PingStats::has_rtt`] to tell "no data" apart from a real zero.
    pub fn avg_rtt(&self) -> Duration {
        if self.success_count == 0 {
            return Duration::ZERO;
        }
        self.avg_rtt
    }

    pub fn has_rtt(&self) -> bool {
        self.success_count > 0
    }
}

/// Statistics for the whole session, index-aligned with the target list.
#[derive(Clone, Debug, PartialEq)]
pub struct Statistics {
    targets: Vec<PingStats>,
}

impl Statistics {
    pub fn new(len: usize) -> Self {
        Self {
            targets: vec![PingStats::default(); len],
        }
    }

    pub fn add_success(&mut self, idx: usize, rtt: Duration) {
        self.targets[idx].add_success(rtt);
    }

    pub fn add_failure(&mut self, idx: usize) {
        self.targets[idx].add_failure();
    }

    pub fn loss_percent(&self, idx: usize) -> f64 {
        self.targets[idx].loss_percent()
    }

    pub fn avg_rtt(&self, idx: usize) -> Duration {
        self.targets[idx].avg_rtt()
    }

    /// Applies one complete round. `results` must be in target order.
    pub fn record(&mut self, results: &[PingResult]) {
        debug_assert_eq!(results.len(), self.targets.len());
        for (stats, result) in self.targets.iter_mut().zip(results) {
            match result.rtt() {
                Some(rtt) => stats.add_success(rtt),
                None => stats.add_failure(),
            }
        }
    }

    pub fn get(&self, idx: usize) -> Option<&PingStats> {
        self.targets.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PingStats> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
