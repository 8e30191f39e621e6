//! Wire structures shared between requests, responses, and hashes.

use std::sync::Arc;

use alloy_primitives::{Address, B256, Bytes};
use bytes::{Buf, BufMut};
use commonware_codec::{
    EncodeSize, Error as CodecError, RangeCfg, Read, ReadExt, Write,
};

use crate::merkle::merkle_root;

/// Result code for a successfully executed transaction.
pub const CODE_TYPE_OK: u32 = 0;

/// Identifier of a block on the consensus wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockId {
    /// Header hash of the identified block.
    pub hash: B256,
}

impl Write for BlockId {
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_slice(self.hash.as_slice());
    }
}

impl EncodeSize for BlockId {
    fn encode_size(&self) -> usize {
        32
    }
}

/// How a validator's signature relates to the committed block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockIdFlag {
    /// No signature was received.
    Absent,
    /// The signature endorses the committed block.
    Commit,
    /// The signature endorses nil.
    Nil,
}

impl Write for BlockIdFlag {
    fn write(&self, buf: &mut impl BufMut) {
        let tag: u8 = match self {
            Self::Absent => 1,
            Self::Commit => 2,
            Self::Nil => 3,
        };
        tag.write(buf);
    }
}

impl EncodeSize for BlockIdFlag {
    fn encode_size(&self) -> usize {
        1
    }
}

/// A single signature slot in a wire commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitSig {
    /// Relation of this signature to the block.
    pub block_id_flag: BlockIdFlag,
    /// Address of the signing validator.
    pub validator_address: Address,
    /// Signing time, Unix seconds.
    pub timestamp: u64,
    /// Raw signature bytes.
    pub signature: Bytes,
}

impl Write for CommitSig {
    fn write(&self, buf: &mut impl BufMut) {
        self.block_id_flag.write(buf);
        buf.put_slice(self.validator_address.as_slice());
        self.timestamp.write(buf);
        self.signature.as_ref().write(buf);
    }
}

impl EncodeSize for CommitSig {
    fn encode_size(&self) -> usize {
        self.block_id_flag.encode_size()
            + 20
            + self.timestamp.encode_size()
            + self.signature.as_ref().encode_size()
    }
}

/// Commit for a block on the consensus wire.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WireCommit {
    /// Height of the committed block.
    pub height: u64,
    /// Consensus round the commit was produced in.
    pub round: i32,
    /// Identifier of the committed block.
    pub block_id: BlockId,
    /// One signature slot per validator.
    pub signatures: Vec<CommitSig>,
}

impl WireCommit {
    /// Merkle root over the canonical signature encodings.
    pub fn hash(&self) -> B256 {
        let leaves: Vec<Vec<u8>> = self
            .signatures
            .iter()
            .map(|sig| {
                let mut leaf = Vec::with_capacity(sig.encode_size());
                sig.write(&mut leaf);
                leaf
            })
            .collect();
        merkle_root(&leaves)
    }

    /// Number of signature slots.
    pub fn size(&self) -> usize {
        self.signatures.len()
    }
}

/// Version of the consensus protocol and the application, on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WireVersion {
    /// Consensus (block structure) version.
    pub block: u64,
    /// Application version.
    pub app: u64,
}

/// Block header on the consensus wire, as handed to the application.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WireHeader {
    /// Protocol versions.
    pub version: WireVersion,
    /// Chain identifier.
    pub chain_id: String,
    /// Block height.
    pub height: u64,
    /// Block time, Unix seconds.
    pub time: u64,
    /// Identifier of the previous block.
    pub last_block_id: BlockId,
    /// Hash of the previous block's commit.
    pub last_commit_hash: B256,
    /// Hash of the block's transaction data.
    pub data_hash: B256,
    /// Hash of the validator set producing this block.
    pub validators_hash: B256,
    /// Hash of the validator set producing the next block.
    pub next_validators_hash: B256,
    /// Hash of the consensus parameters.
    pub consensus_hash: B256,
    /// Application state commitment after the previous block.
    pub app_hash: B256,
    /// Commitment to the previous block's transaction results.
    pub last_results_hash: B256,
    /// Address of the block proposer.
    pub proposer_address: Address,
}

/// A single vote slot in a decided commit, as handed to the application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteInfo {
    /// Address of the voting validator.
    pub validator_address: Address,
    /// Voting power of the validator.
    pub voting_power: i64,
    /// Relation of the vote to the committed block.
    pub block_id_flag: BlockIdFlag,
}

/// The decided previous commit, as handed to the application.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommitInfo {
    /// Consensus round of the decided commit.
    pub round: i32,
    /// One vote slot per validator.
    pub votes: Vec<VoteInfo>,
}

/// A key/value attribute of an [`Event`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventAttribute {
    /// Attribute key.
    pub key: String,
    /// Attribute value.
    pub value: String,
    /// Whether the attribute is indexed for queries.
    pub index: bool,
}

/// A typed event emitted by the application during execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Event type name.
    pub kind: String,
    /// Event attributes.
    pub attributes: Vec<EventAttribute>,
}

/// Result of executing a single transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxResult {
    /// Result code; [`CODE_TYPE_OK`] means success.
    pub code: u32,
    /// Application-defined result payload.
    pub data: Bytes,
    /// Human-readable execution log.
    pub log: String,
    /// Additional application-defined information.
    pub info: String,
    /// Gas requested by the transaction.
    pub gas_wanted: i64,
    /// Gas consumed by the transaction.
    pub gas_used: i64,
    /// Events emitted while executing the transaction.
    pub events: Vec<Event>,
    /// Namespace for the result code.
    pub codespace: String,
}

impl TxResult {
    /// Whether the transaction executed successfully.
    pub const fn is_ok(&self) -> bool {
        self.code == CODE_TYPE_OK
    }
}

/// Commitment to a list of transaction results.
///
/// Only the deterministic subset of each result (code, data, gas wanted,
/// gas used) enters the commitment, so every node derives the same root
/// regardless of local log or info strings.
pub fn results_hash(results: &[TxResult]) -> B256 {
    let leaves: Vec<Vec<u8>> = results
        .iter()
        .map(|result| {
            let mut leaf = Vec::new();
            (result.code as u64).write(&mut leaf);
            result.data.as_ref().write(&mut leaf);
            (result.gas_wanted as u64).write(&mut leaf);
            (result.gas_used as u64).write(&mut leaf);
            leaf
        })
        .collect();
    merkle_root(&leaves)
}

/// Evidence of validator misbehavior, opaque to the executor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evidence {
    /// Height the misbehavior was observed at.
    pub height: u64,
    /// Application-defined evidence payload.
    pub data: Bytes,
}

/// Proof that a single execution step produced a wrong intermediate state
/// root, re-verifiable by any peer given only the step's inputs.
///
/// The payload is produced and consumed by the application; the executor
/// treats it as opaque and only moves it to the gossip service and back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FraudProof {
    /// Height of the faulted block.
    pub block_height: u64,
    /// Application-defined proof payload.
    pub payload: Bytes,
}

impl Write for FraudProof {
    fn write(&self, buf: &mut impl BufMut) {
        self.block_height.write(buf);
        self.payload.as_ref().write(buf);
    }
}

impl EncodeSize for FraudProof {
    fn encode_size(&self) -> usize {
        self.block_height.encode_size() + self.payload.as_ref().encode_size()
    }
}

impl Read for FraudProof {
    type Cfg = usize;

    fn read_cfg(buf: &mut impl Buf, max_payload: &Self::Cfg) -> Result<Self, CodecError> {
        let block_height = u64::read(buf)?;
        let payload = Vec::<u8>::read_cfg(buf, &(RangeCfg::new(0..=*max_payload), ()))?;
        Ok(Self { block_height, payload: Bytes::from(payload) })
    }
}

/// A fraud proof as gossiped between nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateFraudProof {
    /// The application-produced proof.
    pub fraud_proof: FraudProof,
}

/// Requests observed on the application's mempool channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    /// Deliver a single transaction.
    DeliverTx(crate::DeliverTxRequest),
    /// Flush buffered requests.
    Flush,
}

/// Responses observed on the application's mempool channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    /// Result of a delivered transaction.
    DeliverTx(TxResult),
    /// Acknowledgement of a flush.
    Flush,
}

/// Callback invoked for every response on the mempool channel.
///
/// Runs in the transport's receiving context; implementations must be
/// re-entrant with respect to the executor's own calls.
pub type ResponseCallback = Arc<dyn Fn(&Request, &Response) + Send + Sync>;
