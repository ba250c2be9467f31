//! Session configuration.
//!
//! [`PingConfig`] is built once at startup from user input and handed to the
//! core as an immutable value. All validation that can fail happens here, so
//! nothing past this point has to second-guess the interval or timeout.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::network::ip::IpVersion;

/// Shortest accepted interval or timeout.
pub const MIN_PERIOD: Duration = Duration::from_millis(10);

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Cannot specify both --ipv4 and --ipv6 flags")]
    ConflictingIpVersions,

    #[error("Interval must be at least {:.2} seconds", MIN_PERIOD.as_secs_f64())]
    IntervalTooShort,

    #[error("Timeout must be at least {:.2} seconds", MIN_PERIOD.as_secs_f64())]
    TimeoutTooShort,

    #[error("{name} is not a valid number of seconds: {value}")]
    InvalidDuration { name: &'static str, value: f64 },

    #[error("No targets specified")]
    NoTargets,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PingConfig {
    /// Time between the start of two rounds.
    pub interval: Duration,
    /// Upper bound for a single probe. Never larger than `interval`.
    pub timeout: Duration,
    /// Number of rounds, `0` pings until interrupted.
    pub count: u32,
    /// Preferred family when resolving hostnames.
    pub ip_version: IpVersion,
    /// Print round trip times in round rows. Failures are always shown.
    pub show_rtt: bool,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(1),
            count: 0,
            ip_version: IpVersion::V4,
            show_rtt: true,
        }
    }
}

impl PingConfig {
    /// Builds a configuration from fractional seconds, as typed by the user.
    ///
    /// A timeout longer than the interval is clamped down to the interval,
    /// since a probe cannot outlive the round it belongs to.
    pub fn from_secs(interval: f64, timeout: f64, count: u32) -> Result<Self, ConfigError> {
        let mut timeout = timeout;

        if timeout > interval {
            warn!(
                "Timeout ({timeout:.2} seconds) is greater than interval ({interval:.2} seconds). Setting timeout to interval value."
            );
            timeout = interval;
        }

        let interval = seconds("Interval", interval)?;
        let timeout = seconds("Timeout", timeout)?;

        if interval < MIN_PERIOD {
            return Err(ConfigError::IntervalTooShort);
        }
        if timeout < MIN_PERIOD {
            return Err(ConfigError::TimeoutTooShort);
        }

        Ok(Self {
            interval,
            timeout,
            count,
            ..Self::default()
        })
    }

    pub fn with_ip_version(mut self, ip_version: IpVersion) -> Self {
        self.ip_version = ip_version;
        self
    }

    pub fn with_show_rtt(mut self, show_rtt: bool) -> Self {
        self.show_rtt = show_rtt;
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.count == 0
    }
}

/// Maps the `--ipv4` / `--ipv6` flags to a resolution preference.
///
/// Neither flag means IPv4. Both flags at once is an error.
pub fn ip_version_from_flags(ipv4: bool, ipv6: bool) -> Result<IpVersion, ConfigError> {
    match (ipv4, ipv6) {
        (true, true) => Err(ConfigError::ConflictingIpVersions),
        (false, true) => Ok(IpVersion::V6),
        (true, false) => Ok(IpVersion::V4),
        (false, false) => {
            debug!("No IP version specified, defaulting to IPv4");
            Ok(IpVersion::V4)
        }
    }
}

fn seconds(name: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::InvalidDuration { name, value })
}
