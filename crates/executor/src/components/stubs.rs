//! Stub collaborators for nodes running without the optional services.

use sanza_abci::StateFraudProof;

use crate::traits::{FraudProofGossip, GossipError};

/// Fraud-proof gossip that drops every proof.
///
/// Used by nodes that run with fraud proofs disabled but still need a
/// concrete gossip type.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopFraudGossip;

impl FraudProofGossip for NoopFraudGossip {
    async fn broadcast(&self, _proof: &StateFraudProof) -> Result<(), GossipError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_gossip_accepts_everything() {
        let gossip = NoopFraudGossip;
        assert!(gossip.broadcast(&StateFraudProof::default()).await.is_ok());
    }
}
