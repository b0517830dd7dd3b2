//! The four fixed positions of the generated chain and their constraints.
//!
//! Every position-specific behavior (issuer, CA capability, path length,
//! key usage, extended key usage, artifact file naming) is decided by this
//! mapping, so a certificate can never be built with constraints that do
//! not match its place in the hierarchy.

/// One position in the `rootca → middle → {server, client}` hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainPosition {
    /// Self-signed trust anchor.
    RootCa,
    /// Intermediate CA, signed by the root.
    Middle,
    /// Server leaf, signed by the middle CA.
    Server,
    /// Client leaf, signed by the middle CA.
    Client,
}

/// Authentication role a leaf certificate is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafAuth {
    Server,
    Client,
}

impl ChainPosition {
    /// All positions in signing order: every position appears after its issuer.
    pub const ALL: [ChainPosition; 4] = [
        ChainPosition::RootCa,
        ChainPosition::Middle,
        ChainPosition::Server,
        ChainPosition::Client,
    ];

    /// File stem shared by every artifact written for this position
    /// (`<stem>.key.pem`, `<stem>.crt.pem`, `<stem>.full-crt.pem`).
    pub fn file_stem(self) -> &'static str {
        match self {
            ChainPosition::RootCa => "rootca",
            ChainPosition::Middle => "middle",
            ChainPosition::Server => "server",
            ChainPosition::Client => "client",
        }
    }

    /// The position whose key signs this certificate. `None` means self-signed.
    pub fn issuer(self) -> Option<ChainPosition> {
        match self {
            ChainPosition::RootCa => None,
            ChainPosition::Middle => Some(ChainPosition::RootCa),
            ChainPosition::Server | ChainPosition::Client => Some(ChainPosition::Middle),
        }
    }

    pub fn is_ca(self) -> bool {
        matches!(self, ChainPosition::RootCa | ChainPosition::Middle)
    }

    /// Maximum number of intermediate CA levels permitted below this
    /// certificate. `None` for leaves, which carry no path-length constraint.
    pub fn path_len(self) -> Option<u32> {
        match self {
            ChainPosition::RootCa => Some(2),
            ChainPosition::Middle => Some(1),
            ChainPosition::Server | ChainPosition::Client => None,
        }
    }

    /// Extended key usage carried by leaf positions; CAs carry none.
    pub fn leaf_auth(self) -> Option<LeafAuth> {
        match self {
            ChainPosition::Server => Some(LeafAuth::Server),
            ChainPosition::Client => Some(LeafAuth::Client),
            ChainPosition::RootCa | ChainPosition::Middle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_order_places_issuers_first() {
        for (index, position) in ChainPosition::ALL.iter().enumerate() {
            if let Some(issuer) = position.issuer() {
                let issuer_index = ChainPosition::ALL
                    .iter()
                    .position(|p| *p == issuer)
                    .unwrap();
                assert!(issuer_index < index, "{:?} signed before its issuer", position);
            }
        }
    }

    #[test]
    fn test_ca_constraints() {
        assert!(ChainPosition::RootCa.is_ca());
        assert!(ChainPosition::Middle.is_ca());
        assert_eq!(ChainPosition::RootCa.path_len(), Some(2));
        assert_eq!(ChainPosition::Middle.path_len(), Some(1));
        assert_eq!(ChainPosition::RootCa.leaf_auth(), None);
        assert_eq!(ChainPosition::Middle.leaf_auth(), None);
    }

    #[test]
    fn test_leaf_constraints() {
        for position in [ChainPosition::Server, ChainPosition::Client] {
            assert!(!position.is_ca());
            assert_eq!(position.path_len(), None);
            assert_eq!(position.issuer(), Some(ChainPosition::Middle));
        }
        assert_eq!(ChainPosition::Server.leaf_auth(), Some(LeafAuth::Server));
        assert_eq!(ChainPosition::Client.leaf_auth(), Some(LeafAuth::Client));
    }

    #[test]
    fn test_file_stems() {
        let stems: Vec<_> = ChainPosition::ALL.iter().map(|p| p.file_stem()).collect();
        assert_eq!(stems, ["rootca", "middle", "server", "client"]);
    }
}
