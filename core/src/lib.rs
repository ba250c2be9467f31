//! # mping core
//!
//! The three parts of mping with real invariants:
//!
//! * **[`resolver`]**: turns parsed targets into addresses, concurrently, tolerating failures.
//! * **[`engine`]**: drives fixed-interval rounds of one probe per target.
//! * **[`stats`]**: per-target counters and a streaming RTT mean.
//!
//! Presentation is reached through the [`report::Reporter`] port and probing
//! through [`mping_common::probe::Prober`], so nothing here touches a socket
//! or a terminal directly.

pub mod engine;
pub mod report;
pub mod resolver;
pub mod stats;
