//! Executor configuration.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// 8-byte identifier associating a rollup's blocks with its
/// data-availability lane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceId(pub [u8; 8]);

/// Configuration for a [`crate::BlockExecutor`].
///
/// The proposer address and namespace id end up in every block the executor
/// creates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Address designated to author blocks.
    pub proposer_address: Address,
    /// Data-availability namespace of this rollup.
    #[serde(default)]
    pub namespace_id: NamespaceId,
    /// Chain identifier stamped into created blocks.
    pub chain_id: String,
    /// Whether execution captures intermediate state roots and produces
    /// fraud proofs on divergence.
    #[serde(default)]
    pub fraud_proofs_enabled: bool,
}

impl ExecutorConfig {
    /// Create a config for the given proposer and chain.
    pub const fn new(proposer_address: Address, chain_id: String) -> Self {
        Self {
            proposer_address,
            namespace_id: NamespaceId([0; 8]),
            chain_id,
            fraud_proofs_enabled: false,
        }
    }

    /// Set the data-availability namespace.
    #[must_use]
    pub const fn with_namespace_id(mut self, namespace_id: NamespaceId) -> Self {
        self.namespace_id = namespace_id;
        self
    }

    /// Enable or disable fraud-proof mode.
    #[must_use]
    pub const fn with_fraud_proofs(mut self, enabled: bool) -> Self {
        self.fraud_proofs_enabled = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_new_defaults() {
        let config = ExecutorConfig::new(Address::repeat_byte(0x01), "c1".to_string());
        assert_eq!(config.proposer_address, Address::repeat_byte(0x01));
        assert_eq!(config.chain_id, "c1");
        assert_eq!(config.namespace_id, NamespaceId([0; 8]));
        assert!(!config.fraud_proofs_enabled);
    }

    #[test]
    fn config_builder() {
        let config = ExecutorConfig::new(Address::ZERO, "c1".to_string())
            .with_namespace_id(NamespaceId([1, 2, 3, 4, 5, 6, 7, 8]))
            .with_fraud_proofs(true);
        assert_eq!(config.namespace_id.0, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(config.fraud_proofs_enabled);
    }

    #[test]
    fn config_serde_roundtrip() {
        let config = ExecutorConfig::new(Address::repeat_byte(0x02), "sanza-1".to_string())
            .with_fraud_proofs(true);
        let json = serde_json::to_string(&config).expect("serialize");
        let back: ExecutorConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(config, back);
    }

    #[test]
    fn config_serde_defaults_optional_fields() {
        let json = r#"{"proposer_address": "0x0101010101010101010101010101010101010101", "chain_id": "c1"}"#;
        let config: ExecutorConfig = serde_json::from_str(json).expect("deserialize");
        assert_eq!(config.namespace_id, NamespaceId([0; 8]));
        assert!(!config.fraud_proofs_enabled);
    }
}
