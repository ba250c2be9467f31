//! Scripted adapters for the probe, DNS and presentation ports.

use std::collections::HashMap;
use std::io;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::Instant;

use mping_common::network::ip::IpVersion;
use mping_common::network::target::Target;
use mping_common::probe::{ProbeError, Prober};
use mping_core::engine::PingResult;
use mping_core::report::Reporter;
use mping_core::resolver::HostLookup;
use mping_core::stats::Statistics;

const FOREVER: Duration = Duration::from_secs(3600);

#[derive(Clone, Copy, Debug)]
pub enum Behavior {
    /// Answer after this long, reporting it as the RTT.
    Reply(Duration),
    /// Never answer and ignore the timeout.
    Hang,
    /// Answer after a random delay below the given bound.
    Jitter(Duration),
}

pub struct ScriptedProber {
    default: Behavior,
    overrides: HashMap<IpAddr, Behavior>,
    rng: Mutex<StdRng>,
    calls: Mutex<Vec<(IpAddr, Instant)>>,
}

impl ScriptedProber {
    pub fn new(default: Behavior) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
            rng: Mutex::new(StdRng::seed_from_u64(7)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, addr: &str, behavior: Behavior) -> Self {
        self.overrides.insert(ip(addr), behavior);
        self
    }

    pub fn calls(&self) -> Vec<(IpAddr, Instant)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, addr: &str) -> usize {
        let addr = ip(addr);
        self.calls().iter().filter(|(a, _)| *a == addr).count()
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(
        &self,
        address: IpAddr,
        _ip_version: IpVersion,
        timeout: Duration,
    ) -> Result<Duration, ProbeError> {
        self.calls.lock().unwrap().push((address, Instant::now()));

        let behavior = self.overrides.get(&address).copied().unwrap_or(self.default);
        let delay = match behavior {
            Behavior::Reply(delay) => delay,
            Behavior::Hang => FOREVER,
            Behavior::Jitter(bound) => {
                let nanos = bound.as_nanos() as u64;
                Duration::from_nanos(self.rng.lock().unwrap().random_range(1..nanos))
            }
        };

        if delay > timeout && !matches!(behavior, Behavior::Hang) {
            tokio::time::sleep(timeout).await;
            return Err(ProbeError::Timeout(timeout));
        }
        tokio::time::sleep(delay).await;
        Ok(delay)
    }
}

/// DNS from a fixed table. Unknown hosts fail like NXDOMAIN.
#[derive(Default)]
pub struct TableLookup {
    answers: HashMap<String, Vec<IpAddr>>,
    calls: Mutex<Vec<String>>,
}

impl TableLookup {
    pub fn with(mut self, host: &str, addrs: &[&str]) -> Self {
        self.answers
            .insert(host.to_string(), addrs.iter().map(|a| ip(a)).collect());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostLookup for TableLookup {
    async fn lookup(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        self.calls.lock().unwrap().push(host.to_string());
        self.answers
            .get(host)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{host} not found")))
    }
}

pub struct RecordedRound {
    pub round: u32,
    pub header: bool,
    pub results: Vec<PingResult>,
    pub at: Instant,
}

#[derive(Default)]
pub struct Recorder {
    pub rounds: Vec<RecordedRound>,
    pub summaries: Vec<(Statistics, bool)>,
}

impl Recorder {
    pub fn round_numbers(&self) -> Vec<u32> {
        self.rounds.iter().map(|r| r.round).collect()
    }
}

impl Reporter for Recorder {
    fn round(&mut self, round: u32, results: &[PingResult], show_labels: bool) -> io::Result<()> {
        self.rounds.push(RecordedRound {
            round,
            header: show_labels,
            results: results.to_vec(),
            at: Instant::now(),
        });
        Ok(())
    }

    fn summary(&mut self, stats: &Statistics, interrupted: bool) -> io::Result<()> {
        self.summaries.push((stats.clone(), interrupted));
        Ok(())
    }
}

pub fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

pub fn targets(raw: &[&str]) -> Vec<Target> {
    raw.iter().filter_map(|s| Target::parse(s)).collect()
}

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}
