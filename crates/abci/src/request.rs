//! Requests issued to the application.

use alloy_primitives::{Address, B256, Bytes};

use crate::{
    CommitInfo, ConsensusParams, FraudProof, ValidatorUpdate, WireHeader,
};

/// Initialize the application at genesis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitChainRequest {
    /// Genesis time, Unix seconds.
    pub time: u64,
    /// Chain identifier.
    pub chain_id: String,
    /// Initial consensus parameters.
    pub consensus_params: ConsensusParams,
    /// Initial validator set, as updates.
    pub validators: Vec<ValidatorUpdate>,
    /// Application-defined genesis state.
    pub app_state_bytes: Bytes,
    /// Height of the first block.
    pub initial_height: u64,
}

/// Begin executing a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeginBlockRequest {
    /// Hash of the block being executed.
    pub hash: B256,
    /// Header of the block being executed.
    pub header: WireHeader,
    /// The decided previous commit.
    pub last_commit_info: CommitInfo,
}

/// Deliver a single transaction for execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliverTxRequest {
    /// Raw transaction bytes.
    pub tx: Bytes,
}

/// Finish executing a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndBlockRequest {
    /// Height of the executed block.
    pub height: u64,
}

/// Execute a whole block in a single request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinalizeBlockRequest {
    /// Hash of the block being executed.
    pub hash: B256,
    /// Hash of the validator set for the next block.
    pub next_validators_hash: B256,
    /// Address of the block proposer.
    pub proposer_address: Address,
    /// Height of the block being executed.
    pub height: u64,
    /// Block time, Unix seconds.
    pub time: u64,
    /// The decided previous commit.
    pub decided_last_commit: CommitInfo,
    /// Raw transactions in block order.
    pub txs: Vec<Bytes>,
}

/// Ask the application to produce a fraud proof for a faulted step.
///
/// The deliver prefix holds exactly the transactions executed before the
/// divergence; the end-block request is present only when the divergence
/// was observed after the end phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateFraudProofRequest {
    /// Begin-phase request of the faulted block.
    pub begin_block_request: BeginBlockRequest,
    /// Deliver requests executed before the fault.
    pub deliver_tx_requests: Vec<DeliverTxRequest>,
    /// End-phase request, when the fault followed the end phase.
    pub end_block_request: Option<EndBlockRequest>,
}

/// Ask the application to verify a gossiped fraud proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyFraudProofRequest {
    /// The gossiped proof.
    pub fraud_proof: FraudProof,
    /// The app hash the proof claims to contradict.
    pub expected_valid_app_hash: Bytes,
}
