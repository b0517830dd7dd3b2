//! The ordered chain-generation pipeline.
//!
//! Control flow is strictly sequential: one key per position up front, then
//! root (self-signed), then middle (signed by root), then the server and
//! client leaves (each signed by middle), then persistence. The first error
//! at any stage aborts the rest; files already written are not rolled back.

use crate::configs::ChainConfig;
use crate::keygen::{self, GeneratedKey};
use crate::persist;
use crate::position::ChainPosition;
use crate::sign::{sign_template, SignedCertificate, SigningAuthority};
use crate::template::{build_template, CertificateTemplate};
use anyhow::{Context, Result};

/// Everything generated for one position: the private key, the request
/// template, and the signed certificate with its encodings.
pub struct ChainEntry {
    pub position: ChainPosition,
    pub key: GeneratedKey,
    pub template: CertificateTemplate,
    pub signed: SignedCertificate,
}

/// A fully signed four-certificate chain, not yet persisted.
pub struct CertificateChain {
    pub rootca: ChainEntry,
    pub middle: ChainEntry,
    pub server: ChainEntry,
    pub client: ChainEntry,
}

impl CertificateChain {
    /// All entries in signing order.
    pub fn entries(&self) -> [&ChainEntry; 4] {
        [&self.rootca, &self.middle, &self.server, &self.client]
    }

    /// The two leaf entries, which additionally get full-chain files.
    pub fn leaves(&self) -> [&ChainEntry; 2] {
        [&self.server, &self.client]
    }
}

/// Generate keys, build templates, and sign the whole chain.
///
/// No filesystem access; use [`create_chain`] to also persist the artifacts.
pub fn build_chain(config: &ChainConfig) -> Result<CertificateChain> {
    let rootca_key = generate_key(config, ChainPosition::RootCa)?;
    let middle_key = generate_key(config, ChainPosition::Middle)?;
    let server_key = generate_key(config, ChainPosition::Server)?;
    let client_key = generate_key(config, ChainPosition::Client)?;

    let rootca_template = build_template(ChainPosition::RootCa, config.spec(ChainPosition::RootCa));
    let middle_template = build_template(ChainPosition::Middle, config.spec(ChainPosition::Middle));
    let server_template = build_template(ChainPosition::Server, config.spec(ChainPosition::Server));
    let client_template = build_template(ChainPosition::Client, config.spec(ChainPosition::Client));

    let rootca = sign_template(&rootca_template, &rootca_key.key, SigningAuthority::SelfSigned)
        .context("Failed to sign rootca certificate")?;

    let middle = sign_template(
        &middle_template,
        &middle_key.key,
        SigningAuthority::Ca {
            certificate: &rootca.certificate,
            key: &rootca_key.key,
        },
    )
    .context("Failed to sign middle certificate")?;

    let server = sign_template(
        &server_template,
        &server_key.key,
        SigningAuthority::Ca {
            certificate: &middle.certificate,
            key: &middle_key.key,
        },
    )
    .context("Failed to sign server certificate")?;

    let client = sign_template(
        &client_template,
        &client_key.key,
        SigningAuthority::Ca {
            certificate: &middle.certificate,
            key: &middle_key.key,
        },
    )
    .context("Failed to sign client certificate")?;

    Ok(CertificateChain {
        rootca: ChainEntry {
            position: ChainPosition::RootCa,
            key: rootca_key,
            template: rootca_template,
            signed: rootca,
        },
        middle: ChainEntry {
            position: ChainPosition::Middle,
            key: middle_key,
            template: middle_template,
            signed: middle,
        },
        server: ChainEntry {
            position: ChainPosition::Server,
            key: server_key,
            template: server_template,
            signed: server,
        },
        client: ChainEntry {
            position: ChainPosition::Client,
            key: client_key,
            template: client_template,
            signed: client,
        },
    })
}

/// Build, sign, and write the whole chain into the configured directory.
///
/// Returns success or the first error encountered; there is no
/// partial-success status.
pub fn create_chain(config: &ChainConfig) -> Result<()> {
    let chain = build_chain(config)?;
    persist::write_chain(&config.directory, &chain)
}

fn generate_key(config: &ChainConfig, position: ChainPosition) -> Result<GeneratedKey> {
    keygen::generate_rsa_key(config.key_bits)
        .with_context(|| format!("Failed to generate {} key", position.file_stem()))
}
