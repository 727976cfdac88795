//! Target expansion: CIDR blocks, IP ranges, host files and single hosts
//!
//! Every specification resolves deterministically to an ordered list of
//! host strings before any probing starts.

use ipnetwork::Ipv4Network;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::{Result, ScanError};

/// Refuse to expand networks or ranges larger than this many addresses.
const MAX_EXPANSION: u64 = 65_536;

/// One of the mutually exclusive ways to name the scan targets
#[derive(Debug, Clone)]
pub enum HostSpec {
    /// CIDR block, e.g. 192.168.1.0/24 (host bits permitted and masked)
    Cidr(String),
    /// Inclusive IPv4 range; reversed endpoints are swapped
    Range(String, String),
    /// Newline-delimited host file; blank lines and `#` comments skipped
    File(PathBuf),
    /// A single IP literal or hostname
    Host(String),
}

impl HostSpec {
    /// Resolve the specification to an ordered host list.
    ///
    /// Fails with `InvalidTargetSpec` when a literal does not parse or the
    /// file cannot be read, and with `EmptyTargetSpec` when the resolved
    /// list is empty.
    pub fn expand(&self) -> Result<Vec<String>> {
        let hosts = match self {
            HostSpec::Cidr(cidr) => expand_network(cidr)?,
            HostSpec::Range(start, end) => expand_ip_range(start, end)?,
            HostSpec::File(path) => load_hosts_from_file(path)?,
            HostSpec::Host(host) => vec![host.clone()],
        };

        if hosts.is_empty() {
            return Err(ScanError::EmptyTargetSpec);
        }

        log::debug!("target specification expanded to {} host(s)", hosts.len());
        Ok(hosts)
    }
}

/// Expand a CIDR block into its usable host addresses.
///
/// Network and broadcast addresses are excluded for prefixes up to /30.
/// A /31 yields both addresses and a /32 its single address, where no
/// network/broadcast pair exists.
pub fn expand_network(cidr: &str) -> Result<Vec<String>> {
    let network = Ipv4Network::from_str(cidr.trim())
        .map_err(|e| ScanError::InvalidTargetSpec(format!("bad CIDR '{}': {}", cidr, e)))?;

    let host_bits = 32 - network.prefix();
    if (1u64 << host_bits) > MAX_EXPANSION {
        return Err(ScanError::InvalidTargetSpec(format!(
            "network too large: {} spans 2^{} addresses (limit {})",
            cidr, host_bits, MAX_EXPANSION
        )));
    }

    let base = u32::from(network.network());
    let broadcast = u32::from(network.broadcast());

    let (lo, hi) = match network.prefix() {
        31 | 32 => (base, broadcast),
        _ => (base.saturating_add(1), broadcast.saturating_sub(1)),
    };

    Ok((lo..=hi)
        .map(|addr| Ipv4Addr::from(addr).to_string())
        .collect())
}

/// Enumerate every IPv4 address in the inclusive range, ascending.
/// Reversed endpoints are normalized by swapping.
pub fn expand_ip_range(start_ip: &str, end_ip: &str) -> Result<Vec<String>> {
    let start: Ipv4Addr = start_ip
        .trim()
        .parse()
        .map_err(|_| ScanError::InvalidTargetSpec(format!("bad IPv4 address '{}'", start_ip)))?;
    let end: Ipv4Addr = end_ip
        .trim()
        .parse()
        .map_err(|_| ScanError::InvalidTargetSpec(format!("bad IPv4 address '{}'", end_ip)))?;

    let mut lo = u32::from(start);
    let mut hi = u32::from(end);
    if lo > hi {
        std::mem::swap(&mut lo, &mut hi);
    }

    if (hi - lo) as u64 + 1 > MAX_EXPANSION {
        return Err(ScanError::InvalidTargetSpec(format!(
            "range {}-{} spans more than {} addresses",
            start_ip, end_ip, MAX_EXPANSION
        )));
    }

    Ok((lo..=hi)
        .map(|addr| Ipv4Addr::from(addr).to_string())
        .collect())
}

/// Read one host per line, preserving order. Whitespace is trimmed;
/// blank lines and lines starting with `#` are skipped.
pub fn load_hosts_from_file(path: &PathBuf) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| {
        ScanError::InvalidTargetSpec(format!("cannot read hosts file {}: {}", path.display(), e))
    })?;

    let mut hosts = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| {
            ScanError::InvalidTargetSpec(format!(
                "cannot read hosts file {}: {}",
                path.display(),
                e
            ))
        })?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        hosts.push(line.to_string());
    }

    Ok(hosts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cidr_excludes_network_and_broadcast() {
        let hosts = expand_network("192.168.1.0/30").unwrap();
        assert_eq!(hosts, vec!["192.168.1.1", "192.168.1.2"]);

        let hosts = expand_network("192.168.1.0/24").unwrap();
        assert_eq!(hosts.len(), 254);
        assert_eq!(hosts.first().unwrap(), "192.168.1.1");
        assert_eq!(hosts.last().unwrap(), "192.168.1.254");
    }

    #[test]
    fn test_cidr_host_bits_are_masked() {
        // Non-strict parse: 192.168.1.77/30 is the 192.168.1.76/30 block
        let hosts = expand_network("192.168.1.77/30").unwrap();
        assert_eq!(hosts, vec!["192.168.1.77", "192.168.1.78"]);
    }

    #[test]
    fn test_cidr_degenerate_prefixes() {
        let hosts = expand_network("10.0.0.4/31").unwrap();
        assert_eq!(hosts, vec!["10.0.0.4", "10.0.0.5"]);

        let hosts = expand_network("10.0.0.9/32").unwrap();
        assert_eq!(hosts, vec!["10.0.0.9"]);
    }

    #[test]
    fn test_cidr_invalid_or_oversized() {
        assert!(matches!(
            expand_network("not-a-network"),
            Err(ScanError::InvalidTargetSpec(_))
        ));
        assert!(matches!(
            expand_network("10.0.0.0/33"),
            Err(ScanError::InvalidTargetSpec(_))
        ));
        assert!(matches!(
            expand_network("10.0.0.0/8"),
            Err(ScanError::InvalidTargetSpec(_))
        ));
    }

    #[test]
    fn test_ip_range_reversed_endpoints_swap() {
        let hosts = expand_ip_range("10.0.0.5", "10.0.0.2").unwrap();
        assert_eq!(hosts, vec!["10.0.0.2", "10.0.0.3", "10.0.0.4", "10.0.0.5"]);
    }

    #[test]
    fn test_ip_range_single_address() {
        let hosts = expand_ip_range("10.0.0.7", "10.0.0.7").unwrap();
        assert_eq!(hosts, vec!["10.0.0.7"]);
    }

    #[test]
    fn test_ip_range_invalid_literal() {
        assert!(matches!(
            expand_ip_range("10.0.0.300", "10.0.0.5"),
            Err(ScanError::InvalidTargetSpec(_))
        ));
    }

    #[test]
    fn test_hosts_file_skips_blanks_and_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# lab machines").unwrap();
        writeln!(file, "10.0.0.1").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  gateway.local  ").unwrap();
        writeln!(file, "#10.0.0.9").unwrap();
        writeln!(file, "10.0.0.2").unwrap();

        let spec = HostSpec::File(file.path().to_path_buf());
        let hosts = spec.expand().unwrap();
        assert_eq!(hosts, vec!["10.0.0.1", "gateway.local", "10.0.0.2"]);
    }

    #[test]
    fn test_hosts_file_missing_is_invalid_spec() {
        let spec = HostSpec::File(PathBuf::from("/nonexistent/hosts.txt"));
        assert!(matches!(
            spec.expand(),
            Err(ScanError::InvalidTargetSpec(_))
        ));
    }

    #[test]
    fn test_empty_hosts_file_is_empty_spec() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# nothing here").unwrap();

        let spec = HostSpec::File(file.path().to_path_buf());
        assert!(matches!(spec.expand(), Err(ScanError::EmptyTargetSpec)));
    }

    #[test]
    fn test_single_host_passthrough() {
        let spec = HostSpec::Host("192.168.1.15".to_string());
        assert_eq!(spec.expand().unwrap(), vec!["192.168.1.15"]);
    }
}
