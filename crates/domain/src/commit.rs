//! Commits

use alloy_primitives::Bytes;

use crate::ValidationError;

/// A raw aggregator signature.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signature(pub Bytes);

/// Commit carried from one block to the next as `last_commit`.
///
/// Signatures are ordered to match the aggregator set; their wire
/// representation (addresses, flags, timestamps) is produced by the
/// conversion layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Commit {
    /// Ordered aggregator signatures.
    pub signatures: Vec<Signature>,
}

impl Commit {
    /// A commit with no signatures, used below the initial height.
    pub const fn empty() -> Self {
        Self { signatures: Vec::new() }
    }

    /// Number of signatures.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Whether the commit carries no signatures.
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Structural validation independent of chain state.
    pub fn validate_basic(&self) -> Result<(), ValidationError> {
        // Signature bytes are opaque here; nothing to check structurally.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_commit() {
        let commit = Commit::empty();
        assert!(commit.is_empty());
        assert_eq!(commit.len(), 0);
        assert!(commit.validate_basic().is_ok());
    }

    #[test]
    fn commit_len_counts_signatures() {
        let commit = Commit {
            signatures: vec![
                Signature(Bytes::from(vec![0xAA; 64])),
                Signature(Bytes::from(vec![0xBB; 64])),
            ],
        };
        assert_eq!(commit.len(), 2);
        assert!(!commit.is_empty());
    }
}
