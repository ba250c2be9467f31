use std::fmt;
use std::net::IpAddr;

/// Address family a target is (or should be) resolved to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IpVersion {
    /// No preference, any family is acceptable.
    #[default]
    Unspecified,
    V4,
    V6,
}

impl IpVersion {
    /// Family of a concrete address.
    pub fn of(ip: &IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => IpVersion::V4,
            IpAddr::V6(_) => IpVersion::V6,
        }
    }

    /// Whether `ip` is acceptable under this preference.
    pub fn accepts(&self, ip: &IpAddr) -> bool {
        match self {
            IpVersion::Unspecified => true,
            IpVersion::V4 => ip.is_ipv4(),
            IpVersion::V6 => ip.is_ipv6(),
        }
    }

    /// Resolver network hint, in the `ip` / `ip4` / `ip6` notation.
    pub fn network(&self) -> &'static str {
        match self {
            IpVersion::Unspecified => "ip",
            IpVersion::V4 => "ip4",
            IpVersion::V6 => "ip6",
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpVersion::Unspecified => write!(f, "IP"),
            IpVersion::V4 => write!(f, "IPv4"),
            IpVersion::V6 => write!(f, "IPv6"),
        }
    }
}

/// Returns the address in its most compact form along with its family.
///
/// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) collapse to plain IPv4.
pub fn canonical(ip: IpAddr) -> (IpAddr, IpVersion) {
    let ip = ip.to_canonical();
    (ip, IpVersion::of(&ip))
}

/// Parses `s` as a literal IP address, if it is one.
pub fn parse_literal(s: &str) -> Option<(IpAddr, IpVersion)> {
    s.parse::<IpAddr>().ok().map(canonical)
}
