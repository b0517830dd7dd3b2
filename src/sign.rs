//! X.509 certificate signing.
//!
//! Turns a [`CertificateTemplate`] into a signed certificate by
//! materializing an openssl `X509Builder`, applying the constraints the
//! template's position dictates, and signing with the issuing authority's
//! private key (SHA-256 with RSA).

use crate::position::LeafAuth;
use crate::template::CertificateTemplate;
use anyhow::{anyhow, Result};
use openssl::asn1::Asn1Time;
use openssl::bn::BigNum;
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::x509::extension::{
    BasicConstraints, ExtendedKeyUsage, KeyUsage, SubjectAlternativeName,
};
use openssl::x509::{X509, X509Builder, X509Name};

const X509_VERSION_3: i32 = 2; // X509 version 3 is represented by 2

/// The key and certificate that issue the certificate being signed.
pub enum SigningAuthority<'a> {
    /// The template is both subject and issuer; only the root uses this.
    SelfSigned,
    /// Signed by a parent CA. The certificate must be the re-parsed signed
    /// form of the issuer, never its pre-signing template.
    Ca {
        certificate: &'a X509,
        key: &'a PKey<Private>,
    },
}

/// One signed certificate in every encoding later stages need.
pub struct SignedCertificate {
    /// Structured form, re-parsed from `der`; the issuer object for the
    /// next signing step.
    pub certificate: X509,
    pub der: Vec<u8>,
    pub pem: Vec<u8>,
}

/// Sign a template against its issuing authority.
///
/// The subject's public key is embedded from `subject_key`; the signature is
/// produced with the authority's private key (the subject's own key when
/// self-signed). The signed DER is parsed back into an [`X509`] before being
/// returned, so issuer fields read during subsequent signing steps come from
/// the actual encoded certificate.
pub fn sign_template(
    template: &CertificateTemplate,
    subject_key: &PKey<Private>,
    authority: SigningAuthority<'_>,
) -> Result<SignedCertificate> {
    let mut builder =
        X509::builder().map_err(|e| anyhow!("Failed to create X509 builder: {}", e))?;

    builder
        .set_version(X509_VERSION_3)
        .map_err(|e| anyhow!("Failed to set version: {}", e))?;

    let serial = BigNum::from_dec_str(&template.serial.to_string())
        .map_err(|e| anyhow!("Failed to create serial number: {}", e))?;
    let serial = serial
        .to_asn1_integer()
        .map_err(|e| anyhow!("Failed to convert serial number: {}", e))?;
    builder
        .set_serial_number(&serial)
        .map_err(|e| anyhow!("Failed to set serial number: {}", e))?;

    let subject = subject_name(&template.common_name)?;
    builder
        .set_subject_name(&subject)
        .map_err(|e| anyhow!("Failed to set subject: {}", e))?;

    match &authority {
        SigningAuthority::SelfSigned => builder
            .set_issuer_name(&subject)
            .map_err(|e| anyhow!("Failed to set issuer: {}", e))?,
        SigningAuthority::Ca { certificate, .. } => builder
            .set_issuer_name(certificate.subject_name())
            .map_err(|e| anyhow!("Failed to set issuer from signing certificate: {}", e))?,
    }

    let not_before = Asn1Time::from_unix(template.not_before.timestamp())
        .map_err(|e| anyhow!("Failed to create not_before: {}", e))?;
    builder
        .set_not_before(&not_before)
        .map_err(|e| anyhow!("Failed to set not_before: {}", e))?;

    let not_after = Asn1Time::from_unix(template.not_after.timestamp())
        .map_err(|e| anyhow!("Failed to create not_after: {}", e))?;
    builder
        .set_not_after(&not_after)
        .map_err(|e| anyhow!("Failed to set not_after: {}", e))?;

    builder
        .set_pubkey(subject_key)
        .map_err(|e| anyhow!("Failed to set public key: {}", e))?;

    append_constraints(&mut builder, template)?;
    append_subject_alt_names(&mut builder, template)?;

    let signing_key = match &authority {
        SigningAuthority::SelfSigned => subject_key,
        SigningAuthority::Ca { key, .. } => *key,
    };
    builder
        .sign(signing_key, MessageDigest::sha256())
        .map_err(|e| anyhow!("Failed to sign certificate: {}", e))?;

    let der = builder
        .build()
        .to_der()
        .map_err(|e| anyhow!("Failed to encode certificate as DER: {}", e))?;

    let certificate = X509::from_der(&der)
        .map_err(|e| anyhow!("Failed to re-parse signed certificate: {}", e))?;

    let pem = certificate
        .to_pem()
        .map_err(|e| anyhow!("Failed to encode certificate as PEM: {}", e))?;

    Ok(SignedCertificate {
        certificate,
        der,
        pem,
    })
}

fn subject_name(common_name: &str) -> Result<X509Name> {
    let mut name_builder =
        X509Name::builder().map_err(|e| anyhow!("Failed to create name builder: {}", e))?;
    name_builder
        .append_entry_by_nid(Nid::COMMONNAME, common_name)
        .map_err(|e| anyhow!("Failed to set CN: {}", e))?;
    Ok(name_builder.build())
}

/// Basic constraints, key usage and extended key usage per position.
///
/// CAs sign certificates and nothing else; leaves sign handshakes and wrap
/// keys but cannot issue, and are pinned to their authentication role.
fn append_constraints(builder: &mut X509Builder, template: &CertificateTemplate) -> Result<()> {
    let position = template.position;

    let mut bc = BasicConstraints::new();
    bc.critical();
    if position.is_ca() {
        bc.ca();
        if let Some(len) = position.path_len() {
            bc.pathlen(len);
        }
    }
    let bc = bc
        .build()
        .map_err(|e| anyhow!("Failed to build BasicConstraints: {}", e))?;
    builder
        .append_extension(bc)
        .map_err(|e| anyhow!("Failed to add BasicConstraints: {}", e))?;

    let mut ku = KeyUsage::new();
    ku.critical();
    if position.is_ca() {
        ku.key_cert_sign();
    } else {
        ku.digital_signature();
        ku.key_encipherment();
    }
    let ku = ku
        .build()
        .map_err(|e| anyhow!("Failed to build KeyUsage: {}", e))?;
    builder
        .append_extension(ku)
        .map_err(|e| anyhow!("Failed to add KeyUsage: {}", e))?;

    if let Some(auth) = position.leaf_auth() {
        let mut eku = ExtendedKeyUsage::new();
        match auth {
            LeafAuth::Server => eku.server_auth(),
            LeafAuth::Client => eku.client_auth(),
        };
        let eku = eku
            .build()
            .map_err(|e| anyhow!("Failed to build ExtendedKeyUsage: {}", e))?;
        builder
            .append_extension(eku)
            .map_err(|e| anyhow!("Failed to add ExtendedKeyUsage: {}", e))?;
    }

    Ok(())
}

fn append_subject_alt_names(
    builder: &mut X509Builder,
    template: &CertificateTemplate,
) -> Result<()> {
    if template.dns_names.is_empty() && template.ip_addresses.is_empty() {
        return Ok(());
    }

    let mut san = SubjectAlternativeName::new();
    for name in &template.dns_names {
        san.dns(name);
    }
    for addr in &template.ip_addresses {
        san.ip(&addr.to_string());
    }
    let san = san
        .build(&builder.x509v3_context(None, None))
        .map_err(|e| anyhow!("Failed to build SubjectAlternativeName: {}", e))?;
    builder
        .append_extension(san)
        .map_err(|e| anyhow!("Failed to add SubjectAlternativeName: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configs::CertificateSpec;
    use crate::keygen::generate_rsa_key;
    use crate::position::ChainPosition;
    use crate::template::build_template;
    use chrono::{Duration, TimeZone, Utc};

    fn spec(serial: u64) -> CertificateSpec {
        let not_before = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        CertificateSpec {
            common_name: "sign.test".to_string(),
            serial,
            not_before,
            not_after: not_before + Duration::hours(1),
            dns_names: Vec::new(),
            ip_addresses: Vec::new(),
        }
    }

    #[test]
    fn test_self_signed_root_verifies_with_its_own_key() {
        let key = generate_rsa_key(2048).unwrap();
        let template = build_template(ChainPosition::RootCa, &spec(1));
        let signed = sign_template(&template, &key.key, SigningAuthority::SelfSigned).unwrap();

        assert!(signed.certificate.verify(&key.key).unwrap());
        assert_eq!(
            signed
                .certificate
                .serial_number()
                .to_bn()
                .unwrap()
                .to_dec_str()
                .unwrap()
                .to_string(),
            "1"
        );
    }

    #[test]
    fn test_child_certificate_is_signed_by_its_issuer() {
        let root_key = generate_rsa_key(2048).unwrap();
        let root_template = build_template(ChainPosition::RootCa, &spec(1));
        let root =
            sign_template(&root_template, &root_key.key, SigningAuthority::SelfSigned).unwrap();

        let middle_key = generate_rsa_key(2048).unwrap();
        let middle_template = build_template(ChainPosition::Middle, &spec(2));
        let middle = sign_template(
            &middle_template,
            &middle_key.key,
            SigningAuthority::Ca {
                certificate: &root.certificate,
                key: &root_key.key,
            },
        )
        .unwrap();

        // Signed by the root key, not its own
        assert!(middle.certificate.verify(&root_key.key).unwrap());
        assert!(!middle.certificate.verify(&middle_key.key).unwrap());
        assert_eq!(
            middle.certificate.issuer_name().to_der().unwrap(),
            root.certificate.subject_name().to_der().unwrap()
        );
    }
}
