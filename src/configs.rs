//! Build configuration for one chain-generation run.
//!
//! The library does not read configuration files; the caller (normally the
//! CLI shell) populates these structures and hands them to
//! [`create_chain`](crate::generate_chain::create_chain).

use crate::position::ChainPosition;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Identity and validity parameters for one certificate in the chain.
#[derive(Debug, Clone)]
pub struct CertificateSpec {
    /// Subject common name.
    pub common_name: String,
    /// Positive serial number. Uniqueness across positions is the caller's
    /// responsibility.
    pub serial: u64,
    /// Start of the validity window (absolute UTC).
    pub not_before: DateTime<Utc>,
    /// End of the validity window. Must be after `not_before`; the core does
    /// not enforce this.
    pub not_after: DateTime<Utc>,
    /// Raw DNS names for the subject alternative names. Blank and
    /// whitespace-only entries are discarded during normalization.
    pub dns_names: Vec<String>,
    /// Raw textual IP addresses for the subject alternative names. Entries
    /// that fail to parse are discarded during normalization.
    pub ip_addresses: Vec<String>,
}

/// Full configuration for one chain build, immutable for its duration.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Output directory. Must exist and be writable.
    pub directory: PathBuf,
    /// RSA modulus size in bits, conventionally 1024, 2048 or 4096.
    pub key_bits: u32,
    pub rootca: CertificateSpec,
    pub middle: CertificateSpec,
    pub server: CertificateSpec,
    pub client: CertificateSpec,
}

impl ChainConfig {
    /// The spec supplied for a given position.
    pub fn spec(&self, position: ChainPosition) -> &CertificateSpec {
        match position {
            ChainPosition::RootCa => &self.rootca,
            ChainPosition::Middle => &self.middle,
            ChainPosition::Server => &self.server,
            ChainPosition::Client => &self.client,
        }
    }
}
