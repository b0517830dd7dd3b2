//! Filesystem persistence of the generated artifacts.

use crate::generate_chain::CertificateChain;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Write the ten PEM artifacts for a signed chain into `directory`.
///
/// Per position: `<stem>.key.pem` and `<stem>.crt.pem`. For the two leaves
/// additionally `<stem>.full-crt.pem` with the chain in leaf-first order.
/// Existing files are overwritten in place; writes are not transactional,
/// so a failure partway through leaves a partial set behind.
pub fn write_chain(directory: &Path, chain: &CertificateChain) -> Result<()> {
    for entry in chain.entries() {
        let stem = entry.position.file_stem();
        write_restricted(&directory.join(format!("{stem}.key.pem")), &entry.key.pem)?;
        write_restricted(&directory.join(format!("{stem}.crt.pem")), &entry.signed.pem)?;
    }

    for leaf in chain.leaves() {
        let stem = leaf.position.file_stem();
        let full = full_chain_pem(
            &leaf.signed.pem,
            &chain.middle.signed.pem,
            &chain.rootca.signed.pem,
        );
        write_restricted(&directory.join(format!("{stem}.full-crt.pem")), &full)?;
    }

    Ok(())
}

/// Concatenate the PEM blocks in leaf-first order, each trimmed, joined
/// with a single newline. TLS stacks expect the leaf before its issuers.
fn full_chain_pem(leaf: &[u8], middle: &[u8], root: &[u8]) -> Vec<u8> {
    [leaf, middle, root]
        .iter()
        .map(|block| trim_pem(block))
        .collect::<Vec<_>>()
        .join(&b"\n"[..])
}

fn trim_pem(block: &[u8]) -> &[u8] {
    let start = block
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(block.len());
    let end = block
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &block[start..end]
}

fn write_restricted(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;

    // Private keys must not be group- or world-readable; the same mode is
    // applied to every artifact.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_chain_is_leaf_first_with_trimmed_blocks() {
        let full = full_chain_pem(b"LEAF\n", b"\nMIDDLE\n\n", b"  ROOT");
        assert_eq!(full, b"LEAF\nMIDDLE\nROOT");
    }

    #[test]
    fn test_trim_pem_handles_whitespace_only_input() {
        assert_eq!(trim_pem(b" \n\t "), b"");
        assert_eq!(trim_pem(b""), b"");
    }
}
