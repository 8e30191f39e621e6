//! Genesis documents

use std::path::Path;

use alloy_primitives::Bytes;
use sanza_abci::{ConsensusParams, PublicKey, ValidatorUpdate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading a genesis document.
#[derive(Debug, Error)]
pub enum GenesisError {
    /// Reading the genesis file failed.
    #[error("failed to read genesis file: {0}")]
    Io(#[from] std::io::Error),

    /// The genesis file is not valid JSON.
    #[error("failed to parse genesis file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An initial aggregator listed in the genesis document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisValidator {
    /// Consensus public key.
    pub pub_key: PublicKey,
    /// Initial voting power.
    pub power: i64,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
}

/// The genesis document describing a chain's starting point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    /// Genesis time, Unix seconds.
    pub genesis_time: u64,
    /// Chain identifier.
    pub chain_id: String,
    /// Height of the first block.
    pub initial_height: u64,
    /// Initial consensus parameters.
    #[serde(default)]
    pub consensus_params: ConsensusParams,
    /// Initial aggregator set.
    #[serde(default)]
    pub validators: Vec<GenesisValidator>,
    /// Application-defined genesis state.
    #[serde(default)]
    pub app_state: Bytes,
}

impl Genesis {
    /// Load a genesis document from a JSON file.
    pub fn load(path: &Path) -> Result<Self, GenesisError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// The initial aggregator set as validator updates.
    pub fn validator_updates(&self) -> Vec<ValidatorUpdate> {
        self.validators
            .iter()
            .map(|v| ValidatorUpdate { pub_key: v.pub_key.clone(), power: v.power })
            .collect()
    }
}
