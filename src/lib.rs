//! certchain - Development X.509 Certificate Chain Generator
//!
//! Generates a self-contained, four-level certificate chain for local
//! development and debugging of TLS-secured services:
//!
//! ```text
//! rootca (self-signed, pathlen=2)
//!   └── middle (signed by rootca, pathlen=1)
//!       ├── server (leaf, serverAuth)
//!       └── client (leaf, clientAuth)
//! ```
//!
//! One synchronous batch operation generates a fresh RSA key per position,
//! builds the four templates with position-specific constraints, signs each
//! against its issuer, and writes ten PEM artifacts (private keys, leaf
//! certificates, and pre-concatenated full chains) into a directory. This
//! is not a certificate authority service: there is no revocation, no
//! storage beyond flat files, and no rotation.
//!
//! # Module Overview
//!
//! - [`configs`]: the [`ChainConfig`]/[`CertificateSpec`] input structures
//! - [`position`]: the [`ChainPosition`] enum and its constraint mapping
//! - [`san`]: DNS name / IP address normalization
//! - [`keygen`]: RSA key generation and PKCS#1 PEM encoding
//! - [`template`]: unsigned certificate templates
//! - [`sign`]: signing against the chain's issuers, with DER re-parse
//! - [`generate_chain`]: the sequential pipeline and [`create_chain`]
//! - [`persist`]: artifact files, owner read/write only
//!
//! # Example
//!
//! ```no_run
//! use certchain::{create_chain, CertificateSpec, ChainConfig};
//! use chrono::{Duration, Utc};
//!
//! fn main() -> anyhow::Result<()> {
//!     let now = Utc::now();
//!     let ca = CertificateSpec {
//!         common_name: "Local Dev CA".to_string(),
//!         serial: now.timestamp() as u64,
//!         not_before: now,
//!         not_after: now + Duration::days(365),
//!         dns_names: Vec::new(),
//!         ip_addresses: Vec::new(),
//!     };
//!     let leaf = CertificateSpec {
//!         dns_names: vec!["localhost".to_string()],
//!         ip_addresses: vec!["127.0.0.1".to_string()],
//!         ..ca.clone()
//!     };
//!
//!     create_chain(&ChainConfig {
//!         directory: "certs".into(),
//!         key_bits: 2048,
//!         rootca: ca.clone(),
//!         middle: ca,
//!         server: leaf.clone(),
//!         client: leaf,
//!     })
//! }
//! ```

pub mod configs;
pub mod generate_chain;
pub mod keygen;
pub mod persist;
pub mod position;
pub mod san;
pub mod sign;
pub mod template;

pub use configs::{CertificateSpec, ChainConfig};
pub use generate_chain::{build_chain, create_chain, CertificateChain, ChainEntry};
pub use position::ChainPosition;
