//! Chain state

use sanza_abci::{
    BlockId, ConsensusParams, InitChainResponse, ValidatorSet, ValidatorSetError,
    validators_from_updates,
};

use crate::{BLOCK_PROTOCOL, Genesis, Hash, Version};

/// Copy up to 32 bytes into a [`Hash`], zero-padding the tail.
///
/// Application state commitments arrive as free-form bytes on the wire; the
/// chain state pins them at 32 bytes.
pub fn hash_from_bytes(bytes: &[u8]) -> Hash {
    let mut out = Hash::ZERO;
    let n = bytes.len().min(32);
    out[..n].copy_from_slice(&bytes[..n]);
    out
}

/// The chain's post-block summary.
///
/// `State` is a value: the executor never mutates one in place, it derives
/// the successor and hands it back to the caller, who owns persistence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
    /// Consensus block/app versions.
    pub version: Version,
    /// Chain identifier.
    pub chain_id: String,
    /// Height of the first block.
    pub initial_height: u64,
    /// Height of the last applied block, 0 before any block.
    pub last_block_height: u64,
    /// Time of the last applied block, Unix seconds.
    pub last_block_time: u64,
    /// Identifier of the last applied block.
    pub last_block_id: BlockId,
    /// Aggregators producing the current block.
    pub validators: ValidatorSet,
    /// Aggregators producing the next block.
    pub next_validators: ValidatorSet,
    /// Aggregators that produced the last block.
    pub last_validators: ValidatorSet,
    /// Height at which the aggregator set last changed.
    pub last_height_validators_changed: u64,
    /// Consensus parameters in force.
    pub consensus_params: ConsensusParams,
    /// Height at which the consensus parameters last changed.
    pub last_height_consensus_params_changed: u64,
    /// Application state commitment after the last block.
    pub app_hash: Hash,
    /// Commitment to the last block's transaction results.
    pub last_results_hash: Hash,
}

impl State {
    /// Compose the initial state from a genesis document and the
    /// application's init-chain response.
    ///
    /// The response's validator list, consensus parameters, and app hash
    /// override the genesis values when present.
    pub fn from_genesis(
        genesis: &Genesis,
        response: &InitChainResponse,
    ) -> Result<Self, ValidatorSetError> {
        let updates = if response.validators.is_empty() {
            genesis.validator_updates()
        } else {
            response.validators.clone()
        };
        for update in &updates {
            update.pub_key.validate()?;
        }
        let validators = ValidatorSet::new(validators_from_updates(&updates));

        let consensus_params = response
            .consensus_params
            .clone()
            .unwrap_or_else(|| genesis.consensus_params.clone());

        Ok(Self {
            version: Version { block: BLOCK_PROTOCOL, app: consensus_params.version.app },
            chain_id: genesis.chain_id.clone(),
            initial_height: genesis.initial_height,
            last_block_height: 0,
            last_block_time: genesis.genesis_time,
            last_block_id: BlockId::default(),
            validators: validators.clone(),
            next_validators: validators.clone(),
            last_validators: validators,
            last_height_validators_changed: genesis.initial_height,
            consensus_params,
            last_height_consensus_params_changed: genesis.initial_height,
            app_hash: hash_from_bytes(&response.app_hash),
            last_results_hash: Hash::ZERO,
        })
    }
}
