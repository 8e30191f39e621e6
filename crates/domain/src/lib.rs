#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/sanza-chain/sanza/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use alloy_primitives::B256;

/// A 32-byte hash.
pub type Hash = B256;

mod error;
pub use error::ValidationError;

mod tx;
pub use tx::{MAX_TX_BYTES, Tx, TxId};

mod header;
pub use header::{BaseHeader, Header, SignedHeader, Version, BLOCK_PROTOCOL};

mod commit;
pub use commit::{Commit, Signature};

mod block;
pub use block::{Block, Data, ISR_SURROUNDING_CAPTURES, IntermediateStateRoots};

mod state;
pub use state::{State, hash_from_bytes};

mod genesis;
pub use genesis::{Genesis, GenesisError, GenesisValidator};

mod conv;
pub use conv::{
    ConversionError, build_last_commit_info, last_commit_hash, to_wire_commit,
    to_wire_header,
};
