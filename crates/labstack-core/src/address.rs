//! Private address derivation
//!
//! Hosts are addressed by the last octet only; the first three octets come
//! from the CIDR block of the subnet the host lives in.

use crate::error::{ConfigError, Result};
use crate::model::LabConfig;
use regex::Regex;
use std::sync::LazyLock;

static CIDR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3}\.\d{1,3}\.\d{1,3})\.\d{1,3}/\d{1,2}$").expect("cidr regex"));

/// Derive a full dotted-quad address from a subnet CIDR and a host suffix.
///
/// The first three octets of the CIDR become the prefix; the suffix becomes
/// the last octet. The suffix must fit in three decimal digits.
pub fn derive_address(cidr: &str, suffix: u16) -> Result<String> {
    let captures = CIDR_RE
        .captures(cidr)
        .ok_or_else(|| ConfigError::InvalidCidr(cidr.to_string()))?;

    if suffix > 999 {
        return Err(ConfigError::InvalidSuffix(suffix.to_string()));
    }

    Ok(format!("{}.{}", &captures[1], suffix))
}

/// Resolve every server group's suffixes into full private addresses.
///
/// Overwrites any previously resolved addresses, so running it twice on the
/// same tree is harmless.
pub fn resolve_addresses(config: &mut LabConfig) -> Result<()> {
    for subnet in &mut config.subnets {
        for group in &mut subnet.servers {
            let mut addresses = Vec::with_capacity(group.private_ip_suffixes.len());
            for suffix in &group.private_ip_suffixes {
                addresses.push(derive_address(&subnet.cidr, *suffix)?);
            }
            group.private_ip_addresses = addresses;
        }
    }

    Ok(())
}
