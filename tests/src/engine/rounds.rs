use std::sync::Arc;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use mping_common::config::PingConfig;
use mping_common::network::ip::IpVersion;
use mping_common::network::target::ResolvedTarget;
use mping_common::probe::ProbeError;
use mping_core::engine::Pinger;

use crate::support::{Behavior, Recorder, ScriptedProber, ip, ms};

fn numbered_targets(n: u8) -> Vec<ResolvedTarget> {
    (1..=n)
        .map(|i| ResolvedTarget::resolved(ip(&format!("192.0.2.{i}")), IpVersion::V4, format!("t{i}")))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn results_keep_target_order_whatever_finishes_first() {
    let cfg = PingConfig::from_secs(0.5, 0.5, 5).unwrap();
    let prober = Arc::new(ScriptedProber::new(Behavior::Jitter(ms(300))));
    let pinger = Pinger::new(numbered_targets(8), prober, &cfg).unwrap();
    let mut recorder = Recorder::default();

    pinger.run(&mut recorder, &CancellationToken::new()).await.unwrap();

    assert_eq!(recorder.round_numbers(), [1, 2, 3, 4, 5]);
    for round in &recorder.rounds {
        let labels: Vec<&str> = round.results.iter().map(|r| r.target.label.as_str()).collect();
        assert_eq!(labels, ["t1", "t2", "t3", "t4", "t5", "t6", "t7", "t8"]);
        assert!(round.results.iter().all(|r| r.is_success()));
    }
}

#[tokio::test(start_paused = true)]
async fn a_hanging_target_only_fails_itself() {
    let cfg = PingConfig::from_secs(1.0, 0.4, 2).unwrap();
    let prober = Arc::new(
        ScriptedProber::new(Behavior::Reply(ms(10))).with("192.0.2.1", Behavior::Hang),
    );
    let pinger = Pinger::new(numbered_targets(2), prober, &cfg).unwrap();
    let mut recorder = Recorder::default();
    let started = Instant::now();

    let stats = pinger.run(&mut recorder, &CancellationToken::new()).await.unwrap();

    let first = &recorder.rounds[0];
    assert_eq!(first.at - started, ms(400), "round waits for the slowest probe");
    assert_eq!(first.results[0].error(), Some(&ProbeError::Timeout(ms(400))));
    assert_eq!(first.results[1].rtt(), Some(ms(10)));

    assert_eq!(stats.loss_percent(0), 100.0);
    assert_eq!(stats.loss_percent(1), 0.0);
    assert_eq!(stats.avg_rtt(1), ms(10));
}

#[tokio::test(start_paused = true)]
async fn rounds_start_on_the_interval_not_after_the_previous_round() {
    let cfg = PingConfig::from_secs(1.0, 1.0, 3).unwrap();
    let prober = Arc::new(ScriptedProber::new(Behavior::Reply(ms(300))));
    let pinger = Pinger::new(numbered_targets(1), prober.clone(), &cfg).unwrap();
    let mut recorder = Recorder::default();
    let started = Instant::now();

    pinger.run(&mut recorder, &CancellationToken::new()).await.unwrap();

    let starts: Vec<_> = prober.calls().iter().map(|(_, at)| *at - started).collect();
    assert_eq!(starts, [ms(0), ms(1000), ms(2000)]);

    let published: Vec<_> = recorder.rounds.iter().map(|r| r.at - started).collect();
    assert_eq!(published, [ms(300), ms(1300), ms(2300)]);
}

#[tokio::test(start_paused = true)]
async fn stops_after_count_rounds() {
    let cfg = PingConfig::from_secs(0.1, 0.1, 4).unwrap();
    let prober = Arc::new(ScriptedProber::new(Behavior::Reply(ms(1))));
    let pinger = Pinger::new(numbered_targets(3), prober.clone(), &cfg).unwrap();
    let mut recorder = Recorder::default();

    let stats = pinger.run(&mut recorder, &CancellationToken::new()).await.unwrap();

    assert_eq!(recorder.round_numbers(), [1, 2, 3, 4]);
    assert_eq!(prober.calls().len(), 12);
    assert!(stats.iter().all(|s| s.total() == 4));
    assert_eq!(recorder.summaries.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn probes_using_the_whole_interval_keep_the_schedule() {
    let cfg = PingConfig::from_secs(1.0, 1.0, 4).unwrap();
    let prober = Arc::new(ScriptedProber::new(Behavior::Hang));
    let pinger = Pinger::new(numbered_targets(1), prober.clone(), &cfg).unwrap();
    let mut recorder = Recorder::default();
    let started = Instant::now();

    pinger.run(&mut recorder, &CancellationToken::new()).await.unwrap();

    let starts: Vec<_> = prober.calls().iter().map(|(_, at)| *at - started).collect();
    assert_eq!(starts, [ms(0), ms(1000), ms(2000), ms(3000)]);
    assert_eq!(recorder.rounds[3].at - started, ms(4000));
}
