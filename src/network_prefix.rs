// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Random IPv6 Unique Local Address prefixes for cluster pod networks.
//!
//! A prefix is the ULA marker byte `0xfd` followed by 56 random bits, written as
//! four hextets (e.g. `fd3a:91c2:07be:5d10`). Prefixes are generated once per
//! cluster. No uniqueness check is made against existing clusters; with 56 bits
//! of entropy a collision is not a practical concern.

use rand::{CryptoRng, RngCore};
use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

/// Marker byte of the locally assigned half of `fc00::/7`
pub const ULA_MARKER: u8 = 0xfd;

/// Number of random bytes drawn per prefix
pub const RANDOM_BYTES: usize = 7;

/// Length of the generated prefix in bits
pub const PREFIX_LEN: u8 = 64;

/// A generated `/64` ULA prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkPrefix([u8; 8]);

/// Draws a fresh prefix from a cryptographically secure random source.
///
/// # Example
///
/// ```rust
/// use appstack::network_prefix::generate_prefix;
///
/// let prefix = generate_prefix(&mut rand::rng());
/// assert!(prefix.to_string().starts_with("fd"));
/// ```
pub fn generate_prefix<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> NetworkPrefix {
    let mut random = [0u8; RANDOM_BYTES];
    rng.fill_bytes(&mut random);

    let mut bytes = [0u8; 8];
    bytes[0] = ULA_MARKER;
    bytes[1..].copy_from_slice(&random);
    NetworkPrefix(bytes)
}

impl NetworkPrefix {
    /// Raw prefix bytes, marker included.
    #[must_use]
    pub fn bytes(&self) -> [u8; 8] {
        self.0
    }

    /// Network address of the prefix (host bits zeroed).
    #[must_use]
    pub fn network_address(&self) -> Ipv6Addr {
        let mut octets = [0u8; 16];
        octets[..8].copy_from_slice(&self.0);
        Ipv6Addr::from(octets)
    }

    /// CIDR notation, e.g. `fd3a:91c2:7be:5d10::/64`, suitable for a CNI's
    /// IPv6 native routing CIDR.
    #[must_use]
    pub fn cidr(&self) -> String {
        format!("{}/{PREFIX_LEN}", self.network_address())
    }
}

impl fmt::Display for NetworkPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}{:02x}:{:02x}{:02x}:{:02x}{:02x}:{:02x}{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]
        )
    }
}

/// Error returned when parsing a string that is not a ULA prefix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a ULA prefix of four fd-prefixed hextets")]
pub struct ParsePrefixError(String);

impl FromStr for NetworkPrefix {
    type Err = ParsePrefixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePrefixError(s.to_string());

        let groups: Vec<&str> = s.split(':').collect();
        if groups.len() != 4 {
            return Err(err());
        }

        let mut bytes = [0u8; 8];
        for (i, group) in groups.iter().enumerate() {
            if group.len() != 4 || !group.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(err());
            }
            let value = u16::from_str_radix(group, 16).map_err(|_| err())?;
            bytes[i * 2..i * 2 + 2].copy_from_slice(&value.to_be_bytes());
        }

        if bytes[0] != ULA_MARKER {
            return Err(err());
        }
        Ok(Self(bytes))
    }
}
