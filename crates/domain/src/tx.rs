//! Transactions

use alloy_primitives::{B256, Bytes};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error as CodecError, RangeCfg, Read, Write};
use sanza_abci::{DEFAULT_MAX_BYTES, sha256};

/// Transaction identifier (32 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxId(pub B256);

/// Largest transaction payload the codec accepts.
///
/// A transaction rides the data-availability lane inside a block, so
/// nothing larger than the block size budget can ever be well-formed.
pub const MAX_TX_BYTES: usize = DEFAULT_MAX_BYTES as usize;

/// An opaque transaction payload.
///
/// The executor never interprets these bytes: they are framed for the
/// data-availability lane and handed to the external application verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tx(Bytes);

impl Tx {
    /// Create a transaction from its payload bytes.
    pub const fn new(payload: Bytes) -> Self {
        Self(payload)
    }

    /// The payload bytes, exactly as submitted.
    pub const fn payload(&self) -> &Bytes {
        &self.0
    }

    /// Transaction identifier: SHA-256 of the payload.
    ///
    /// The id commits to the payload alone, not the lane framing, so the
    /// same submission keeps its identity across re-encodings.
    pub fn id(&self) -> TxId {
        TxId(sha256(&self.0))
    }

    /// Byte size the transaction contributes to a block's size budget,
    /// framing included.
    pub fn size(&self) -> usize {
        self.encode_size()
    }
}

impl Write for Tx {
    fn write(&self, buf: &mut impl BufMut) {
        self.0.as_ref().write(buf);
    }
}

impl EncodeSize for Tx {
    fn encode_size(&self) -> usize {
        self.0.as_ref().encode_size()
    }
}

impl Read for Tx {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &Self::Cfg) -> Result<Self, CodecError> {
        let payload = Vec::<u8>::read_cfg(buf, &(RangeCfg::new(0..=MAX_TX_BYTES), ()))?;
        Ok(Self(Bytes::from(payload)))
    }
}

#[cfg(test)]
mod tests {
    use commonware_codec::{Decode, Encode};

    use super::*;

    fn lane_payload(lane: u8) -> Bytes {
        // A namespaced submission: 8-byte lane id followed by app bytes.
        let mut raw = vec![lane; 8];
        raw.extend_from_slice(&[0x10, 0x20, 0x30]);
        Bytes::from(raw)
    }

    #[test]
    fn id_commits_to_payload_not_framing() {
        let tx = Tx::new(lane_payload(0x5A));
        assert_eq!(tx.id(), TxId(sha256(tx.payload())));
        assert_ne!(tx.id(), TxId(sha256(tx.encode().as_ref())));
    }

    #[test]
    fn id_differs_between_lanes() {
        assert_ne!(Tx::new(lane_payload(0x5A)).id(), Tx::new(lane_payload(0x5B)).id());
    }

    #[test]
    fn size_counts_framing_against_the_budget() {
        let tx = Tx::new(lane_payload(0x5A));
        assert_eq!(tx.size(), tx.encode().len());
        assert!(tx.size() > tx.payload().len());
        // Even an empty submission costs framing bytes.
        assert!(Tx::new(Bytes::new()).size() > 0);
    }

    #[test]
    fn decode_roundtrip_keeps_identity() {
        let tx = Tx::new(lane_payload(0x5A));
        let decoded = Tx::decode_cfg(tx.encode(), &()).expect("decode");
        assert_eq!(tx, decoded);
        assert_eq!(tx.id(), decoded.id());
    }

    #[test]
    fn decode_enforces_block_size_budget() {
        let at_budget = Tx::new(Bytes::from(vec![0x42; MAX_TX_BYTES]));
        assert!(Tx::decode_cfg(at_budget.encode(), &()).is_ok());

        let over_budget = Tx::new(Bytes::from(vec![0x42; MAX_TX_BYTES + 1]));
        assert!(Tx::decode_cfg(over_budget.encode(), &()).is_err());
    }
}
