//! Consensus parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default maximum block size in bytes.
pub const DEFAULT_MAX_BYTES: i64 = 22_020_096;

/// Default maximum gas per block (-1 means unlimited).
pub const DEFAULT_MAX_GAS: i64 = -1;

/// Default evidence age in blocks.
pub const DEFAULT_MAX_AGE_NUM_BLOCKS: i64 = 100_000;

/// Default evidence age in time (48 hours).
pub const DEFAULT_MAX_AGE_DURATION: Duration = Duration::from_secs(48 * 60 * 60);

/// Default maximum total evidence size in bytes.
pub const DEFAULT_EVIDENCE_MAX_BYTES: i64 = 1_048_576;

/// Consensus parameters agreed on at genesis and updatable by the application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusParams {
    /// Block size and gas limits.
    #[serde(default)]
    pub block: BlockParams,
    /// Evidence acceptance window.
    #[serde(default)]
    pub evidence: EvidenceParams,
    /// Accepted validator key types.
    #[serde(default)]
    pub validator: ValidatorParams,
    /// Application protocol version.
    #[serde(default)]
    pub version: VersionParams,
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self {
            block: BlockParams::default(),
            evidence: EvidenceParams::default(),
            validator: ValidatorParams::default(),
            version: VersionParams::default(),
        }
    }
}

/// Block size and gas limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockParams {
    /// Maximum block size in bytes.
    pub max_bytes: i64,
    /// Maximum gas per block; -1 means unlimited.
    pub max_gas: i64,
}

impl Default for BlockParams {
    fn default() -> Self {
        Self { max_bytes: DEFAULT_MAX_BYTES, max_gas: DEFAULT_MAX_GAS }
    }
}

/// Evidence acceptance window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceParams {
    /// Maximum evidence age in blocks.
    pub max_age_num_blocks: i64,
    /// Maximum evidence age in time.
    pub max_age_duration: Duration,
    /// Maximum total evidence size in bytes.
    pub max_bytes: i64,
}

impl Default for EvidenceParams {
    fn default() -> Self {
        Self {
            max_age_num_blocks: DEFAULT_MAX_AGE_NUM_BLOCKS,
            max_age_duration: DEFAULT_MAX_AGE_DURATION,
            max_bytes: DEFAULT_EVIDENCE_MAX_BYTES,
        }
    }
}

/// Accepted validator public-key types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorParams {
    /// Key type names accepted for validator updates.
    pub pub_key_types: Vec<String>,
}

impl Default for ValidatorParams {
    fn default() -> Self {
        Self { pub_key_types: vec![crate::PublicKey::ED25519_TYPE.to_string()] }
    }
}

impl ValidatorParams {
    /// Whether the given key type name is accepted.
    pub fn is_supported(&self, key_type: &str) -> bool {
        self.pub_key_types.iter().any(|t| t == key_type)
    }
}

/// Application protocol version.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionParams {
    /// Application version.
    pub app: u64,
}
