//! Block headers

use alloy_primitives::Address;
use bytes::BufMut;
use commonware_codec::{Encode, EncodeSize, Write};
use sanza_abci::sha256;

use crate::{Commit, Hash, ValidationError};

/// Consensus (block structure) protocol version.
pub const BLOCK_PROTOCOL: u64 = 11;

/// Protocol versions carried in every header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Version {
    /// Consensus (block structure) version.
    pub block: u64,
    /// Application version.
    pub app: u64,
}

/// The part of a header every chain shares.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BaseHeader {
    /// Chain identifier.
    pub chain_id: String,
    /// Block height.
    pub height: u64,
    /// Block time, Unix seconds.
    pub time: u64,
}

/// A rollup block header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    /// Protocol versions.
    pub version: Version,
    /// Chain id, height, and time.
    pub base: BaseHeader,
    /// Hash of the previous header.
    pub last_header_hash: Hash,
    /// Hash of the previous block's commit.
    pub last_commit_hash: Hash,
    /// Commitment to the block's transaction data.
    pub data_hash: Hash,
    /// Commitment to the consensus parameters.
    pub consensus_hash: Hash,
    /// Application state commitment after the previous block.
    pub app_hash: Hash,
    /// Commitment to the previous block's transaction results.
    pub last_results_hash: Hash,
    /// Hash of the aggregator set producing this block.
    pub aggregators_hash: Hash,
    /// Address of the block proposer.
    pub proposer_address: Address,
}

impl Header {
    /// Block height.
    pub const fn height(&self) -> u64 {
        self.base.height
    }

    /// Block time, Unix seconds.
    pub const fn time(&self) -> u64 {
        self.base.time
    }

    /// Chain identifier.
    pub fn chain_id(&self) -> &str {
        &self.base.chain_id
    }

    /// Header hash: SHA-256 of the canonical header encoding.
    pub fn hash(&self) -> Hash {
        sha256(&self.encode())
    }

    /// Structural validation independent of chain state.
    pub fn validate_basic(&self) -> Result<(), ValidationError> {
        if self.base.chain_id.is_empty() {
            return Err(ValidationError::EmptyChainId);
        }
        if self.base.height == 0 {
            return Err(ValidationError::ZeroHeight);
        }
        if self.proposer_address.is_zero() {
            return Err(ValidationError::MissingProposer);
        }
        Ok(())
    }
}

impl Write for Version {
    fn write(&self, buf: &mut impl BufMut) {
        self.block.write(buf);
        self.app.write(buf);
    }
}

impl EncodeSize for Version {
    fn encode_size(&self) -> usize {
        self.block.encode_size() + self.app.encode_size()
    }
}

impl Write for BaseHeader {
    fn write(&self, buf: &mut impl BufMut) {
        self.chain_id.as_bytes().write(buf);
        self.height.write(buf);
        self.time.write(buf);
    }
}

impl EncodeSize for BaseHeader {
    fn encode_size(&self) -> usize {
        self.chain_id.as_bytes().encode_size()
            + self.height.encode_size()
            + self.time.encode_size()
    }
}

impl Write for Header {
    fn write(&self, buf: &mut impl BufMut) {
        self.version.write(buf);
        self.base.write(buf);
        buf.put_slice(self.last_header_hash.as_slice());
        buf.put_slice(self.last_commit_hash.as_slice());
        buf.put_slice(self.data_hash.as_slice());
        buf.put_slice(self.consensus_hash.as_slice());
        buf.put_slice(self.app_hash.as_slice());
        buf.put_slice(self.last_results_hash.as_slice());
        buf.put_slice(self.aggregators_hash.as_slice());
        buf.put_slice(self.proposer_address.as_slice());
    }
}

impl EncodeSize for Header {
    fn encode_size(&self) -> usize {
        self.version.encode_size() + self.base.encode_size() + 7 * 32 + 20
    }
}

/// A header together with the commit that finalized it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignedHeader {
    /// The block header.
    pub header: Header,
    /// Commit for the previous block, carried into this one.
    pub commit: Commit,
}

impl SignedHeader {
    /// Structural validation of the header and its commit.
    pub fn validate_basic(&self) -> Result<(), ValidationError> {
        self.header.validate_basic()?;
        self.commit.validate_basic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> Header {
        Header {
            version: Version { block: BLOCK_PROTOCOL, app: 1 },
            base: BaseHeader { chain_id: "sanza-test".to_string(), height: 3, time: 1_700_000_000 },
            app_hash: Hash::repeat_byte(0xAA),
            proposer_address: Address::repeat_byte(0x01),
            ..Default::default()
        }
    }

    #[test]
    fn hash_is_deterministic() {
        let header = sample_header();
        assert_eq!(header.hash(), header.hash());
    }

    #[test]
    fn hash_differs_by_height() {
        let header = sample_header();
        let mut other = sample_header();
        other.base.height = 4;
        assert_ne!(header.hash(), other.hash());
    }

    #[test]
    fn hash_differs_by_app_hash() {
        let header = sample_header();
        let mut other = sample_header();
        other.app_hash = Hash::repeat_byte(0xBB);
        assert_ne!(header.hash(), other.hash());
    }

    #[test]
    fn encode_size_matches_encoded() {
        let header = sample_header();
        assert_eq!(header.encode_size(), header.encode().len());
    }

    #[test]
    fn validate_basic_accepts_sample() {
        assert!(sample_header().validate_basic().is_ok());
    }

    #[test]
    fn validate_basic_rejects_empty_chain_id() {
        let mut header = sample_header();
        header.base.chain_id = String::new();
        assert_eq!(header.validate_basic(), Err(ValidationError::EmptyChainId));
    }

    #[test]
    fn validate_basic_rejects_zero_height() {
        let mut header = sample_header();
        header.base.height = 0;
        assert_eq!(header.validate_basic(), Err(ValidationError::ZeroHeight));
    }

    #[test]
    fn validate_basic_rejects_missing_proposer() {
        let mut header = sample_header();
        header.proposer_address = Address::ZERO;
        assert_eq!(header.validate_basic(), Err(ValidationError::MissingProposer));
    }
}
