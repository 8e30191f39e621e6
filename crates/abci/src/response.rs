//! Responses returned by the application.

use alloy_primitives::Bytes;

use crate::{ConsensusParams, Event, FraudProof, TxResult, ValidatorUpdate};

/// Response to [`crate::InitChainRequest`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InitChainResponse {
    /// Consensus-parameter overrides, when the application has any.
    pub consensus_params: Option<ConsensusParams>,
    /// Validator-set overrides; empty keeps the genesis set.
    pub validators: Vec<ValidatorUpdate>,
    /// Initial application state commitment.
    pub app_hash: Bytes,
}

/// Begin-phase slice of a block's execution results.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BeginBlockResponse {
    /// Events emitted by the begin phase.
    pub events: Vec<Event>,
}

/// End-phase slice of a block's execution results.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndBlockResponse {
    /// Validator-set changes taking effect two heights later.
    pub validator_updates: Vec<ValidatorUpdate>,
    /// Consensus-parameter changes, when the application has any.
    pub consensus_param_updates: Option<ConsensusParams>,
    /// Events emitted by the end phase.
    pub events: Vec<Event>,
}

/// Response to [`crate::FinalizeBlockRequest`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FinalizeBlockResponse {
    /// Events emitted by the whole block, partitioned by the application.
    pub events: Vec<Event>,
    /// One result per transaction, in block order.
    pub tx_results: Vec<TxResult>,
    /// Validator-set changes taking effect two heights later.
    pub validator_updates: Vec<ValidatorUpdate>,
    /// Consensus-parameter changes, when the application has any.
    pub consensus_param_updates: Option<ConsensusParams>,
    /// Application state commitment after the block.
    pub app_hash: Bytes,
}

/// Per-phase response bundle consumed by downstream state and event logic.
///
/// The application speaks the single-request finalize protocol; the executor
/// re-slots its response into this legacy shape.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LegacyResponses {
    /// Begin-phase slice.
    pub begin_block: BeginBlockResponse,
    /// One result per transaction, in block order.
    pub deliver_txs: Vec<TxResult>,
    /// End-phase slice.
    pub end_block: EndBlockResponse,
}

/// Response to a commit request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitResponse {
    /// Earliest height the application asks the node to keep on disk.
    pub retain_height: i64,
}

/// Response to an app-hash query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetAppHashResponse {
    /// Current application state commitment.
    pub app_hash: Bytes,
}

/// Response to [`crate::GenerateFraudProofRequest`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerateFraudProofResponse {
    /// The produced proof, absent when generation failed.
    pub fraud_proof: Option<FraudProof>,
}

/// Response to [`crate::VerifyFraudProofRequest`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerifyFraudProofResponse {
    /// Whether the proof checks out.
    pub success: bool,
}

impl LegacyResponses {
    /// Slot a finalize response into the per-phase shape.
    ///
    /// The finalize protocol does not say which phase emitted an event, so
    /// the whole event list lands in both the begin and end slices and
    /// validator/parameter updates in the end slice, matching what
    /// downstream logic expects from the discrete-phase protocol.
    pub fn from_finalize(response: &FinalizeBlockResponse) -> Self {
        Self {
            begin_block: BeginBlockResponse { events: response.events.clone() },
            deliver_txs: response.tx_results.clone(),
            end_block: EndBlockResponse {
                validator_updates: response.validator_updates.clone(),
                consensus_param_updates: response.consensus_param_updates.clone(),
                events: response.events.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_responses_from_finalize() {
        let response = FinalizeBlockResponse {
            events: vec![Event { kind: "begin".to_string(), attributes: Vec::new() }],
            tx_results: vec![TxResult::default(), TxResult::default()],
            validator_updates: Vec::new(),
            consensus_param_updates: None,
            app_hash: Bytes::from(vec![0xAA; 32]),
        };
        let legacy = LegacyResponses::from_finalize(&response);
        assert_eq!(legacy.begin_block.events.len(), 1);
        assert_eq!(legacy.end_block.events.len(), 1);
        assert_eq!(legacy.deliver_txs.len(), 2);
        assert!(legacy.end_block.validator_updates.is_empty());
    }
}
