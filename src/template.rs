//! Certificate signing templates.
//!
//! A template is the request half of a certificate: the identity and
//! validity fields to be embedded, plus the position that decides its
//! constraints. It carries no key material and is not yet signed.

use crate::configs::CertificateSpec;
use crate::position::ChainPosition;
use crate::san;
use chrono::{DateTime, Utc};
use std::net::IpAddr;

/// The unsigned request for one certificate.
#[derive(Debug, Clone)]
pub struct CertificateTemplate {
    pub position: ChainPosition,
    pub common_name: String,
    pub serial: u64,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    /// Normalized DNS names; empty for CA positions.
    pub dns_names: Vec<String>,
    /// Parsed IP addresses; empty for CA positions.
    pub ip_addresses: Vec<IpAddr>,
}

/// Build the signing template for one position.
///
/// Pure data transformation, no key material and no I/O. CA certificates do
/// not carry subject alternative names, so the DNS/IP inputs of the rootca
/// and middle specs are ignored.
pub fn build_template(position: ChainPosition, spec: &CertificateSpec) -> CertificateTemplate {
    let (dns_names, ip_addresses) = if position.is_ca() {
        (Vec::new(), Vec::new())
    } else {
        (
            san::normalize_dns_names(&spec.dns_names),
            san::parse_ip_addresses(&spec.ip_addresses),
        )
    };

    CertificateTemplate {
        position,
        common_name: spec.common_name.clone(),
        serial: spec.serial,
        not_before: spec.not_before,
        not_after: spec.not_after,
        dns_names,
        ip_addresses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::net::Ipv4Addr;

    fn spec() -> CertificateSpec {
        let not_before = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        CertificateSpec {
            common_name: "unit.test".to_string(),
            serial: 7,
            not_before,
            not_after: not_before + chrono::Duration::hours(1),
            dns_names: vec!["".to_string(), " unit.test ".to_string()],
            ip_addresses: vec!["bogus".to_string(), "10.0.0.1".to_string()],
        }
    }

    #[test]
    fn test_leaf_template_normalizes_alternative_names() {
        let template = build_template(ChainPosition::Server, &spec());
        assert_eq!(template.dns_names, ["unit.test"]);
        assert_eq!(
            template.ip_addresses,
            [IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))]
        );
    }

    #[test]
    fn test_ca_template_carries_no_alternative_names() {
        for position in [ChainPosition::RootCa, ChainPosition::Middle] {
            let template = build_template(position, &spec());
            assert!(template.dns_names.is_empty());
            assert!(template.ip_addresses.is_empty());
        }
    }

    #[test]
    fn test_identity_fields_are_copied_verbatim() {
        let spec = spec();
        let template = build_template(ChainPosition::Client, &spec);
        assert_eq!(template.common_name, spec.common_name);
        assert_eq!(template.serial, spec.serial);
        assert_eq!(template.not_before, spec.not_before);
        assert_eq!(template.not_after, spec.not_after);
    }
}
