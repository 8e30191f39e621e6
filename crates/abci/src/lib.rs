#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/sanza-chain/sanza/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod merkle;
pub use merkle::{merkle_root, sha256};

mod params;
pub use params::{
    BlockParams, ConsensusParams, DEFAULT_EVIDENCE_MAX_BYTES, DEFAULT_MAX_AGE_DURATION,
    DEFAULT_MAX_AGE_NUM_BLOCKS, DEFAULT_MAX_BYTES, DEFAULT_MAX_GAS, EvidenceParams,
    ValidatorParams, VersionParams,
};

mod validator;
pub use validator::{
    PublicKey, Validator, ValidatorSet, ValidatorSetError, ValidatorUpdate,
    validators_from_updates,
};

mod types;
pub use types::{
    BlockId, BlockIdFlag, CommitInfo, CommitSig, Event, EventAttribute, Evidence,
    FraudProof, Request, Response, ResponseCallback, StateFraudProof, TxResult, VoteInfo,
    WireCommit, WireHeader, WireVersion, results_hash, CODE_TYPE_OK,
};

mod request;
pub use request::{
    BeginBlockRequest, DeliverTxRequest, EndBlockRequest, FinalizeBlockRequest,
    GenerateFraudProofRequest, InitChainRequest, VerifyFraudProofRequest,
};

mod response;
pub use response::{
    BeginBlockResponse, CommitResponse, EndBlockResponse, FinalizeBlockResponse,
    GenerateFraudProofResponse, GetAppHashResponse, InitChainResponse, LegacyResponses,
    VerifyFraudProofResponse,
};
