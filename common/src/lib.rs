//! # mping common
//!
//! Shared vocabulary of the workspace: what a target is, which address family
//! it resolves to, how a session is configured and what a probe looks like
//! from the engine's point of view.
//!
//! Nothing in here performs network I/O.

pub mod config;
pub mod network;
pub mod probe;
