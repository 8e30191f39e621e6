#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/sanza-chain/sanza/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;
pub use config::{ExecutorConfig, NamespaceId};

mod error;
pub use error::ExecutorError;

mod traits;
pub use traits::{AppConn, AppConnError, FraudProofGossip, GossipError, Mempool, MempoolError};

mod events;
pub use events::{
    BlockEvent, EventBus, EventError, EventNewBlock, EventNewBlockHeader, EventNewEvidence,
    EventTx,
};

mod executor;
pub use executor::BlockExecutor;

pub mod components;
