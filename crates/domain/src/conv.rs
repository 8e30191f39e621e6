//! Conversion between rollup-native and consensus-layer wire types.

use alloy_primitives::Address;
use sanza_abci::{
    BlockId, BlockIdFlag, CommitInfo, CommitSig, ValidatorSet, VoteInfo, WireCommit,
    WireHeader, WireVersion,
};
use thiserror::Error;

use crate::{Block, Commit, Hash, Header};

/// Errors from translating domain structures onto the wire.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    /// A commit's signature count does not match the aggregator set.
    #[error("commit size ({commit}) doesn't match validator set length ({validators})")]
    CommitSizeMismatch {
        /// Signatures in the commit.
        commit: usize,
        /// Validators in the set.
        validators: usize,
    },
}

/// Translate a header onto the consensus wire.
///
/// The aggregators hash fills both validator-set slots: this chain rotates
/// its set two heights ahead, so header construction has no separate
/// next-set commitment.
pub fn to_wire_header(header: &Header) -> WireHeader {
    WireHeader {
        version: WireVersion { block: header.version.block, app: header.version.app },
        chain_id: header.base.chain_id.clone(),
        height: header.height(),
        time: header.time(),
        last_block_id: BlockId { hash: header.last_header_hash },
        last_commit_hash: header.last_commit_hash,
        data_hash: header.data_hash,
        validators_hash: header.aggregators_hash,
        next_validators_hash: header.aggregators_hash,
        consensus_hash: header.consensus_hash,
        app_hash: header.app_hash,
        last_results_hash: header.last_results_hash,
        proposer_address: header.proposer_address,
    }
}

/// Translate a commit onto the consensus wire.
///
/// Every signature becomes a commit-flagged slot; validator addresses and
/// timestamps start zeroed and are filled by callers that know them.
pub fn to_wire_commit(commit: &Commit, height: u64, header_hash: Hash) -> WireCommit {
    WireCommit {
        height,
        round: 0,
        block_id: BlockId { hash: header_hash },
        signatures: commit
            .signatures
            .iter()
            .map(|sig| CommitSig {
                block_id_flag: BlockIdFlag::Commit,
                validator_address: Address::ZERO,
                timestamp: 0,
                signature: sig.0.clone(),
            })
            .collect(),
    }
}

/// Hash of the previous commit as it enters the new header.
///
/// A single-signer commit first gets its one signature stamped with the
/// proposer's address and the new header's time, so the hash commits to
/// who produced it and when.
pub fn last_commit_hash(last_commit: &Commit, header: &Header, proposer: Address) -> Hash {
    let mut wire = to_wire_commit(last_commit, header.height(), header.hash());
    if last_commit.len() == 1 {
        wire.signatures[0].validator_address = proposer;
        wire.signatures[0].timestamp = header.time();
    }
    wire.hash()
}

/// The decided previous commit as handed to the application.
///
/// There is no previous commit at the initial height, so the info is empty
/// there. Otherwise every signature pairs with the validator at the same
/// index; a count mismatch means commit and set have diverged and the block
/// cannot be executed.
pub fn build_last_commit_info(
    block: &Block,
    validators: &ValidatorSet,
    initial_height: u64,
) -> Result<CommitInfo, ConversionError> {
    if block.height() == initial_height {
        return Ok(CommitInfo::default());
    }

    let commit = &block.signed_header.commit;
    let wire = to_wire_commit(commit, block.height(), block.hash());
    if wire.size() != validators.len() {
        return Err(ConversionError::CommitSizeMismatch {
            commit: wire.size(),
            validators: validators.len(),
        });
    }

    let votes = validators
        .validators
        .iter()
        .zip(&wire.signatures)
        .map(|(validator, sig)| VoteInfo {
            validator_address: validator.address,
            voting_power: validator.voting_power,
            block_id_flag: sig.block_id_flag,
        })
        .collect();

    Ok(CommitInfo { round: wire.round, votes })
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Bytes;
    use sanza_abci::{PublicKey, Validator};

    use super::*;
    use crate::{BaseHeader, Data, Signature, SignedHeader, Version};

    fn sample_header() -> Header {
        Header {
            version: Version { block: 11, app: 1 },
            base: BaseHeader {
                chain_id: "sanza-test".to_string(),
                height: 5,
                time: 1_700_000_000,
            },
            proposer_address: Address::repeat_byte(0x01),
            ..Default::default()
        }
    }

    fn one_signature_commit() -> Commit {
        Commit { signatures: vec![Signature(Bytes::from(vec![0xAA; 64]))] }
    }

    #[test]
    fn wire_header_mirrors_fields() {
        let header = sample_header();
        let wire = to_wire_header(&header);
        assert_eq!(wire.chain_id, "sanza-test");
        assert_eq!(wire.height, 5);
        assert_eq!(wire.validators_hash, header.aggregators_hash);
        assert_eq!(wire.next_validators_hash, header.aggregators_hash);
        assert_eq!(wire.proposer_address, header.proposer_address);
    }

    #[test]
    fn wire_commit_starts_unstamped() {
        let commit = one_signature_commit();
        let wire = to_wire_commit(&commit, 5, Hash::repeat_byte(0x01));
        assert_eq!(wire.size(), 1);
        assert_eq!(wire.signatures[0].validator_address, Address::ZERO);
        assert_eq!(wire.signatures[0].timestamp, 0);
        assert_eq!(wire.signatures[0].block_id_flag, BlockIdFlag::Commit);
    }

    #[test]
    fn single_signer_hash_is_stamped() {
        let commit = one_signature_commit();
        let header = sample_header();
        let proposer = Address::repeat_byte(0x07);

        let mut expected = to_wire_commit(&commit, header.height(), header.hash());
        expected.signatures[0].validator_address = proposer;
        expected.signatures[0].timestamp = header.time();

        assert_eq!(last_commit_hash(&commit, &header, proposer), expected.hash());
        // The unstamped hash must differ, or the rewrite committed nothing.
        assert_ne!(
            last_commit_hash(&commit, &header, proposer),
            to_wire_commit(&commit, header.height(), header.hash()).hash()
        );
    }

    #[test]
    fn multi_signer_hash_is_not_stamped() {
        let commit = Commit {
            signatures: vec![
                Signature(Bytes::from(vec![0xAA; 64])),
                Signature(Bytes::from(vec![0xBB; 64])),
            ],
        };
        let header = sample_header();
        let unstamped = to_wire_commit(&commit, header.height(), header.hash()).hash();
        assert_eq!(
            last_commit_hash(&commit, &header, Address::repeat_byte(0x07)),
            unstamped
        );
    }

    fn block_at_height(height: u64, commit: Commit) -> Block {
        Block {
            signed_header: SignedHeader {
                header: Header {
                    base: BaseHeader {
                        chain_id: "sanza-test".to_string(),
                        height,
                        time: 1_700_000_000,
                    },
                    ..Default::default()
                },
                commit,
            },
            data: Data::default(),
        }
    }

    fn one_validator_set() -> ValidatorSet {
        ValidatorSet::new(vec![Validator::new(
            PublicKey::Ed25519(Bytes::from(vec![0x01; 32])),
            10,
        )])
    }

    #[test]
    fn commit_info_empty_at_initial_height() {
        let block = block_at_height(1, Commit::empty());
        let info = build_last_commit_info(&block, &one_validator_set(), 1).expect("info");
        assert_eq!(info, CommitInfo::default());
    }

    #[test]
    fn commit_info_pairs_votes_with_validators() {
        let block = block_at_height(2, one_signature_commit());
        let validators = one_validator_set();
        let info = build_last_commit_info(&block, &validators, 1).expect("info");
        assert_eq!(info.votes.len(), 1);
        assert_eq!(info.votes[0].validator_address, validators.validators[0].address);
        assert_eq!(info.votes[0].voting_power, 10);
    }

    #[test]
    fn commit_info_rejects_size_mismatch() {
        let block = block_at_height(2, Commit::empty());
        let result = build_last_commit_info(&block, &one_validator_set(), 1);
        assert_eq!(
            result,
            Err(ConversionError::CommitSizeMismatch { commit: 0, validators: 1 })
        );
    }
}
