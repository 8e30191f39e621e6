//! Blocks

use alloy_primitives::Bytes;

use crate::{Hash, SignedHeader, Tx, ValidationError};

/// Capture points surrounding transaction execution: one before any phase,
/// one after begin, one after end.
pub const ISR_SURROUNDING_CAPTURES: usize = 3;

/// Ordered intermediate state roots captured during block execution.
///
/// `None` means the roots have not been produced yet; the block producer
/// fills them while executing. A follower carries the producer's declared
/// roots and checks its own captures against them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntermediateStateRoots {
    /// One root per capture point, `len(txs) + 3` once filled.
    pub raw_roots: Option<Vec<Bytes>>,
}

/// Transactions and their execution trace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Data {
    /// Transactions in execution order.
    pub txs: Vec<Tx>,
    /// Intermediate state roots captured during execution.
    pub intermediate_state_roots: IntermediateStateRoots,
}

/// A rollup block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    /// Header and the commit that finalized the previous block.
    pub signed_header: SignedHeader,
    /// Transactions and execution trace.
    pub data: Data,
}

impl Block {
    /// The block hash: its header hash.
    pub fn hash(&self) -> Hash {
        self.signed_header.header.hash()
    }

    /// Block height.
    pub const fn height(&self) -> u64 {
        self.signed_header.header.height()
    }

    /// Required intermediate-state-root count for this block: one capture
    /// per transaction plus the three surrounding captures.
    pub fn expected_isr_count(&self) -> usize {
        self.data.txs.len() + ISR_SURROUNDING_CAPTURES
    }

    /// Structural validation independent of chain state.
    pub fn validate_basic(&self) -> Result<(), ValidationError> {
        self.signed_header.validate_basic()?;
        if let Some(roots) = &self.data.intermediate_state_roots.raw_roots {
            let expected = self.expected_isr_count();
            if roots.len() != expected {
                return Err(ValidationError::InvalidIsrLength { expected, got: roots.len() });
            }
        }
        Ok(())
    }
}
