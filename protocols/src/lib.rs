//! Wire adapters for the probe port.

pub mod icmp;
