//! Block event payloads and the event bus seam.

use alloy_primitives::Bytes;
use sanza_abci::{Evidence, FinalizeBlockResponse, TxResult};
use sanza_domain::{Block, Header};
use thiserror::Error;

/// Error from publishing an event.
#[derive(Debug, Error)]
#[error("event publication failed: {0}")]
pub struct EventError(pub String);

/// A newly applied block with its aggregated execution results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventNewBlock {
    /// The applied block.
    pub block: Block,
    /// Execution results, re-aggregated into the finalize shape.
    pub result: FinalizeBlockResponse,
}

/// Header of a newly applied block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventNewBlockHeader {
    /// The applied block's header.
    pub header: Header,
}

/// Evidence observed in a newly applied block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventNewEvidence {
    /// The observed evidence.
    pub evidence: Evidence,
    /// Height the evidence was included at.
    pub height: u64,
}

/// Result of a single transaction in a newly applied block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventTx {
    /// Height of the block containing the transaction.
    pub height: u64,
    /// Position of the transaction within the block.
    pub index: u32,
    /// Raw transaction bytes.
    pub tx: Bytes,
    /// Execution result of the transaction.
    pub result: TxResult,
}

/// A block-lifecycle event, as delivered to subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockEvent {
    /// A block was applied.
    NewBlock(EventNewBlock),
    /// A block header was applied.
    NewBlockHeader(EventNewBlockHeader),
    /// Evidence was observed.
    NewEvidence(EventNewEvidence),
    /// A transaction was executed.
    Tx(EventTx),
}

/// Best-effort fan-out of block events.
///
/// Publication failures are reported to the caller but must never fail the
/// operation that produced the event.
pub trait EventBus: Clone + Send + Sync + 'static {
    /// Publish a new-block event.
    fn publish_new_block(&self, event: EventNewBlock) -> Result<(), EventError>;

    /// Publish a new-block-header event.
    fn publish_new_block_header(&self, event: EventNewBlockHeader) -> Result<(), EventError>;

    /// Publish a new-evidence event.
    fn publish_new_evidence(&self, event: EventNewEvidence) -> Result<(), EventError>;

    /// Publish a per-transaction event.
    fn publish_tx(&self, event: EventTx) -> Result<(), EventError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_error_display() {
        let err = EventError("bus closed".to_string());
        assert_eq!(err.to_string(), "event publication failed: bus closed");
    }

    #[test]
    fn block_event_carries_tx_payload() {
        let event = BlockEvent::Tx(EventTx {
            height: 3,
            index: 1,
            tx: Bytes::from(vec![0x01]),
            result: TxResult::default(),
        });
        match event {
            BlockEvent::Tx(tx) => {
                assert_eq!(tx.height, 3);
                assert_eq!(tx.index, 1);
            }
            _ => panic!("expected tx event"),
        }
    }
}
