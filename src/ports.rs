//! Port specification parsing
//!
//! Accepts single values, comma lists and hyphen ranges in any mix,
//! e.g. `22`, `22,80` or `22,80,8000-8010`.

use std::collections::BTreeSet;

use crate::{Result, ScanError};

/// Parse a port specification into a deduplicated ascending list.
///
/// Reversed ranges are normalized by swapping the endpoints. Values
/// outside (0, 65535] are silently discarded rather than rejected; only
/// a token that fails to parse as an integer at all is an error.
pub fn parse_ports(spec: &str) -> Result<Vec<u16>> {
    let mut ports: BTreeSet<u16> = BTreeSet::new();

    for token in spec.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        if let Some((lo, hi)) = token.split_once('-') {
            let mut lo = parse_port_value(lo, token)?;
            let mut hi = parse_port_value(hi, token)?;
            if lo > hi {
                std::mem::swap(&mut lo, &mut hi);
            }
            // Clamp before enumerating; out-of-range values are dropped,
            // not enumerated.
            let lo = lo.max(1);
            let hi = hi.min(65_535);
            for port in lo..=hi {
                ports.insert(port as u16);
            }
        } else {
            let value = parse_port_value(token, token)?;
            if (1..=65_535).contains(&value) {
                ports.insert(value as u16);
            }
        }
    }

    Ok(ports.into_iter().collect())
}

fn parse_port_value(raw: &str, token: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ScanError::InvalidPortSpec(format!("cannot parse token '{}'", token)))
}
