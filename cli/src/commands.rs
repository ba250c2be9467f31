use clap::Parser;
use tracing::warn;

use mping_common::config::{self, ConfigError, PingConfig};
use mping_common::network::target::Target;

#[derive(Parser, Debug)]
#[command(name = "mping", version)]
#[command(about = "Multi-Target Ping Utility")]
#[command(
    long_about = "mping pings multiple targets simultaneously and shows their latency side by side."
)]
#[command(override_usage = "mping [OPTIONS] target1[=Label1] target2[=Label2] ...")]
pub struct CommandLine {
    /// Use IPv4 for name resolution
    #[arg(short = '4', long)]
    pub ipv4: bool,

    /// Use IPv6 for name resolution
    #[arg(short = '6', long)]
    pub ipv6: bool,

    /// Number of echo requests to send to each target (0 = unlimited)
    #[arg(short, long, default_value_t = 0)]
    pub count: u32,

    /// Interval (in seconds) between sending each packet (minimum 0.01)
    #[arg(short, long, default_value_t = 1.0)]
    pub interval: f64,

    /// Timeout (in seconds) to wait for each reply (minimum 0.01)
    #[arg(short, long, default_value_t = 1.0)]
    pub timeout: f64,

    /// Only mark failures in round rows, leave successful cells blank
    #[arg(long)]
    pub hide_rtt: bool,

    /// Enable more verbose logging for debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Hosts, IP addresses or URLs, optionally labelled as host=Label
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validated session configuration.
    pub fn config(&self) -> Result<PingConfig, ConfigError> {
        let ip_version = config::ip_version_from_flags(self.ipv4, self.ipv6)?;
        Ok(PingConfig::from_secs(self.interval, self.timeout, self.count)?
            .with_ip_version(ip_version)
            .with_show_rtt(!self.hide_rtt))
    }

    /// Parsed targets. Empty arguments are skipped with a warning.
    pub fn parsed_targets(&self) -> Result<Vec<Target>, ConfigError> {
        let targets: Vec<Target> = self
            .targets
            .iter()
            .enumerate()
            .filter_map(|(idx, raw)| {
                let target = Target::parse(raw);
                if target.is_none() {
                    warn!("Skipping empty target #{}", idx + 1);
                }
                target
            })
            .collect();

        if targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        Ok(targets)
    }
}
