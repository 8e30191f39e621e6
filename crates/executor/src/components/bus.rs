//! In-memory event bus implementation.

use std::sync::Arc;

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use parking_lot::Mutex;

use crate::events::{
    BlockEvent, EventBus, EventError, EventNewBlock, EventNewBlockHeader, EventNewEvidence,
    EventTx,
};

/// Pub-sub fan-out of block events over unbounded channels.
///
/// Closed subscriber channels are dropped on the next publish; publication
/// itself never fails.
#[derive(Clone, Debug)]
pub struct InMemoryEventBus {
    listeners: Arc<Mutex<Vec<UnboundedSender<BlockEvent>>>>,
}

impl InMemoryEventBus {
    /// Create a new, empty event bus.
    pub fn new() -> Self {
        Self { listeners: Arc::new(Mutex::new(Vec::new())) }
    }

    /// Subscribe to block events and receive a stream of updates.
    pub fn subscribe(&self) -> UnboundedReceiver<BlockEvent> {
        let (sender, receiver) = unbounded();
        self.listeners.lock().push(sender);
        receiver
    }

    fn publish(&self, event: BlockEvent) {
        let mut listeners = self.listeners.lock();
        listeners.retain(|sender| sender.unbounded_send(event.clone()).is_ok());
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus for InMemoryEventBus {
    fn publish_new_block(&self, event: EventNewBlock) -> Result<(), EventError> {
        self.publish(BlockEvent::NewBlock(event));
        Ok(())
    }

    fn publish_new_block_header(&self, event: EventNewBlockHeader) -> Result<(), EventError> {
        self.publish(BlockEvent::NewBlockHeader(event));
        Ok(())
    }

    fn publish_new_evidence(&self, event: EventNewEvidence) -> Result<(), EventError> {
        self.publish(BlockEvent::NewEvidence(event));
        Ok(())
    }

    fn publish_tx(&self, event: EventTx) -> Result<(), EventError> {
        self.publish(BlockEvent::Tx(event));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Bytes;
    use sanza_abci::{Evidence, TxResult};
    use sanza_domain::Header;

    use super::*;

    #[test]
    fn subscriber_receives_published_events() {
        let bus = InMemoryEventBus::new();
        let mut receiver = bus.subscribe();

        bus.publish_new_block_header(EventNewBlockHeader { header: Header::default() })
            .expect("publish");
        bus.publish_tx(EventTx {
            height: 1,
            index: 0,
            tx: Bytes::from(vec![0x01]),
            result: TxResult::default(),
        })
        .expect("publish");

        assert!(matches!(receiver.try_next(), Ok(Some(BlockEvent::NewBlockHeader(_)))));
        assert!(matches!(receiver.try_next(), Ok(Some(BlockEvent::Tx(_)))));
    }

    #[test]
    fn evidence_events_fan_out() {
        let bus = InMemoryEventBus::new();
        let mut receiver = bus.subscribe();

        bus.publish_new_evidence(EventNewEvidence {
            evidence: Evidence { height: 2, data: Bytes::new() },
            height: 2,
        })
        .expect("publish");

        match receiver.try_next() {
            Ok(Some(BlockEvent::NewEvidence(event))) => assert_eq!(event.height, 2),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let bus = InMemoryEventBus::new();
        let receiver = bus.subscribe();
        drop(receiver);

        bus.publish_new_block_header(EventNewBlockHeader { header: Header::default() })
            .expect("publish");
        assert!(bus.listeners.lock().is_empty());
    }
}
