//! IP address generators.

use rand::Rng;
use seed_core::Value;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Generate a random IPv4 address.
pub fn generate_ipv4<R: Rng>(rng: &mut R) -> Value {
    Value::String(Ipv4Addr::from(rng.random::<u32>()).to_string())
}

/// Generate a random IPv6 address.
pub fn generate_ipv6<R: Rng>(rng: &mut R) -> Value {
    Value::String(Ipv6Addr::from(rng.random::<u128>()).to_string())
}
