//! # Ping Target Model
//!
//! Defines what the user asks to ping and what that turns into once resolved.
//!
//! A raw command-line argument can be:
//! * A bare host, IP literal or hostname (e.g., `1.1.1.1`, `example.com`).
//! * A labelled host (e.g., `1.1.1.1=Cloudflare`).
//! * A URL, whose hostname becomes both host and label (e.g., `https://example.com/x`).

use std::net::IpAddr;

use tracing::{debug, warn};
use url::{Host, Url};

use crate::network::ip::IpVersion;

const SCHEME_DELIMITER: &str = "://";
const LABEL_DELIMITER: char = '=';

/// A host to ping and the label it is displayed under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    host: String,
    label: String,
}

impl Target {
    /// Parses one raw argument.
    ///
    /// Returns `None` for input that names no host (empty, whitespace only,
    /// `=Label`, or a URL without a host). The `=` split happens on the first
    /// occurrence, so labels may contain `=` but hosts may not.
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        if s.contains(SCHEME_DELIMITER) {
            let host = host_from_url(s)?;
            debug!("Parsed host from URL: {host}");
            return Some(Self::new(host.clone(), host));
        }

        match s.split_once(LABEL_DELIMITER) {
            Some((host, label)) => {
                let host = host.trim();
                if host.is_empty() {
                    return None;
                }
                Some(Self::new(host.to_string(), label.trim().to_string()))
            }
            None => Some(Self::new(s.to_string(), s.to_string())),
        }
    }

    fn new(host: String, label: String) -> Self {
        let label = if label.is_empty() { host.clone() } else { label };
        Self { host, label }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

fn host_from_url(s: &str) -> Option<String> {
    match Url::parse(s) {
        Ok(url) => match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => Some(domain.to_string()),
            Some(Host::Ipv4(addr)) => Some(addr.to_string()),
            Some(Host::Ipv6(addr)) => Some(addr.to_string()),
            _ => {
                warn!("URL has no host: {s}");
                None
            }
        },
        Err(e) => {
            warn!("Failed to parse URL {s}: {e}");
            Some(s.to_string())
        }
    }
}

/// A target after address resolution.
///
/// `address` is `None` when resolution failed. That is permanent: the target
/// stays in the session for display and loss accounting but is never probed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub address: Option<IpAddr>,
    pub ip_version: IpVersion,
    pub label: String,
}

impl ResolvedTarget {
    pub fn resolved(address: IpAddr, ip_version: IpVersion, label: impl Into<String>) -> Self {
        Self {
            address: Some(address),
            ip_version,
            label: label.into(),
        }
    }

    pub fn unresolved(label: impl Into<String>) -> Self {
        Self {
            address: None,
            ip_version: IpVersion::Unspecified,
            label: label.into(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.address.is_some()
    }
}
