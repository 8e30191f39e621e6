//! Executor error types.

use sanza_abci::ValidatorSetError;
use sanza_domain::{ConversionError, ValidationError};
use thiserror::Error;

use crate::{AppConnError, GossipError, MempoolError};

/// Errors from block creation, validation, execution, and commit.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The block failed structural validation.
    #[error("invalid block: {0}")]
    InvalidBlock(#[from] ValidationError),

    /// The block's consensus or app version differs from the state's.
    #[error("block version mismatch")]
    VersionMismatch,

    /// The first block does not carry the initial height.
    #[error("initial block height mismatch: expected {expected}, got {got}")]
    InitialHeightMismatch {
        /// The state's initial height.
        expected: u64,
        /// The block's height.
        got: u64,
    },

    /// The block does not extend the current tip.
    #[error("block height mismatch: expected {expected}, got {got}")]
    HeightMismatch {
        /// One past the state's last block height.
        expected: u64,
        /// The block's height.
        got: u64,
    },

    /// The header's app hash differs from the state's.
    #[error("AppHash mismatch")]
    AppHashMismatch,

    /// The header's last-results hash differs from the state's.
    #[error("LastResultsHash mismatch")]
    LastResultsHashMismatch,

    /// The header's aggregators hash differs from the state's validator set.
    #[error("AggregatorsHash mismatch")]
    AggregatorsHashMismatch,

    /// A validator update carries negative voting power.
    #[error("error in validator updates: voting power can't be negative: {0}")]
    NegativePower(i64),

    /// A validator update uses a key type the consensus params reject.
    #[error("error in validator updates: pubkey type {0} is unsupported for consensus")]
    UnsupportedPubKeyType(String),

    /// Applying validator updates failed.
    #[error(transparent)]
    ValidatorSet(#[from] ValidatorSetError),

    /// Validator updates were applied against an already-empty set.
    #[error("cannot add validators to empty validator set")]
    AddingValidatorToBased,

    /// Translating the block onto the wire failed.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// The application returned the wrong number of transaction results.
    #[error(
        "expected tx results length to match size of transactions in block: expected {expected}, got {got}"
    )]
    TxResultCountMismatch {
        /// Transactions in the block.
        expected: usize,
        /// Results in the response.
        got: usize,
    },

    /// A follower-supplied ISR list has the wrong length.
    #[error("invalid length of ISR list: {got}, expected length: {expected}")]
    InvalidIsrLength {
        /// Required length, transaction count plus three.
        expected: usize,
        /// Observed length.
        got: usize,
    },

    /// Execution diverged from the declared trace; a fraud proof was
    /// generated and gossiped. The caller is expected to halt the node.
    #[error("failed to apply block: halting node due to fraud")]
    FraudProofGenerated,

    /// The application could not produce a fraud proof for the faulted step.
    #[error("fraud proof generation failed")]
    FraudProofFailed,

    /// The application connection failed.
    #[error(transparent)]
    App(#[from] AppConnError),

    /// The mempool failed during the commit critical section.
    #[error(transparent)]
    Mempool(#[from] MempoolError),

    /// Broadcasting a fraud proof failed.
    #[error("failed to broadcast fraud proof: {0}")]
    FraudGossip(#[from] GossipError),
}
