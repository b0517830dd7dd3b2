//! Normalization of the caller-supplied subject-alternative-name inputs.

use std::net::IpAddr;

/// Trim every DNS name and drop entries that are left empty.
///
/// Order among surviving entries is preserved and duplicates are kept; no
/// syntactic validation of DNS label rules is performed.
pub fn normalize_dns_names(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse each entry as a textual IPv4 or IPv6 address after trimming.
///
/// Entries that fail to parse are silently dropped; order is preserved and
/// duplicates are kept.
pub fn parse_ip_addresses(raw: &[String]) -> Vec<IpAddr> {
    raw.iter()
        .filter_map(|addr| addr.trim().parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_blank_dns_names_are_dropped() {
        let raw = strings(&["", "  ", "example.com", "foo.test"]);
        assert_eq!(normalize_dns_names(&raw), ["example.com", "foo.test"]);
    }

    #[test]
    fn test_dns_names_are_trimmed_but_not_deduplicated() {
        let raw = strings(&[" a.test ", "a.test"]);
        assert_eq!(normalize_dns_names(&raw), ["a.test", "a.test"]);
    }

    #[test]
    fn test_invalid_ip_addresses_are_dropped() {
        let raw = strings(&["not-an-ip", "10.0.0.1", "::1"]);
        assert_eq!(
            parse_ip_addresses(&raw),
            [
                IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
                IpAddr::V6(Ipv6Addr::LOCALHOST),
            ]
        );
    }

    #[test]
    fn test_ip_addresses_are_trimmed() {
        let raw = strings(&[" 127.0.0.1 "]);
        assert_eq!(parse_ip_addresses(&raw), [IpAddr::V4(Ipv4Addr::LOCALHOST)]);
    }
}
