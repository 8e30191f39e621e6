//! Consumed-interface traits: the application connection, the mempool, and
//! the fraud-proof gossip service.

use sanza_abci::{
    CommitResponse, FinalizeBlockRequest, FinalizeBlockResponse, GenerateFraudProofRequest,
    GenerateFraudProofResponse, GetAppHashResponse, InitChainRequest, InitChainResponse,
    ResponseCallback, StateFraudProof, TxResult, VerifyFraudProofRequest,
    VerifyFraudProofResponse,
};
use sanza_domain::Tx;
use thiserror::Error;

/// Error from the application connection.
#[derive(Debug, Error)]
pub enum AppConnError {
    /// The transport to the application failed or was cancelled.
    #[error("application transport error: {0}")]
    Transport(String),
}

/// Error from the mempool.
#[derive(Debug, Error)]
pub enum MempoolError {
    /// Flushing the mempool's application-side buffer failed.
    #[error("failed to flush mempool app connection: {0}")]
    Flush(String),

    /// Applying the committed block to the mempool failed.
    #[error("failed to update mempool: {0}")]
    Update(String),
}

/// Error from the fraud-proof gossip service.
#[derive(Debug, Error)]
#[error("fraud proof gossip failed: {0}")]
pub struct GossipError(pub String);

/// Connection to the external application state machine.
///
/// Two logical channels share the connection: the consensus channel carries
/// the typed requests below, and the mempool channel streams transaction
/// responses to the installed callback. The executor is oblivious to the
/// transport behind the trait.
pub trait AppConn: Clone + Send + Sync + 'static {
    /// Initialize the application at genesis.
    fn init_chain(
        &self,
        request: InitChainRequest,
    ) -> impl Future<Output = Result<InitChainResponse, AppConnError>> + Send;

    /// Execute a whole block in a single request.
    fn finalize_block(
        &self,
        request: FinalizeBlockRequest,
    ) -> impl Future<Output = Result<FinalizeBlockResponse, AppConnError>> + Send;

    /// Persist the executed block's application state.
    fn commit(&self) -> impl Future<Output = Result<CommitResponse, AppConnError>> + Send;

    /// Query the current application state commitment.
    fn get_app_hash(
        &self,
    ) -> impl Future<Output = Result<GetAppHashResponse, AppConnError>> + Send;

    /// Ask the application to produce a fraud proof for a faulted step.
    fn generate_fraud_proof(
        &self,
        request: GenerateFraudProofRequest,
    ) -> impl Future<Output = Result<GenerateFraudProofResponse, AppConnError>> + Send;

    /// Ask the application to verify a gossiped fraud proof.
    fn verify_fraud_proof(
        &self,
        request: VerifyFraudProofRequest,
    ) -> impl Future<Output = Result<VerifyFraudProofResponse, AppConnError>> + Send;

    /// Install the callback observing the mempool channel.
    ///
    /// The callback runs in the transport's receiving context and replaces
    /// any previously installed one.
    fn set_response_callback(&self, callback: ResponseCallback);
}

/// Pool of pending transactions consumed during block building.
///
/// Implementations may use different ordering strategies; the executor only
/// requires that reaping respects the byte and gas budgets.
pub trait Mempool: Clone + Send + Sync + 'static {
    /// Guard holding the pool's exclusive lock; dropping it unlocks.
    type Guard: Send;

    /// Reap transactions up to the given byte and gas budgets.
    ///
    /// A negative budget means unlimited.
    fn reap_max_bytes_max_gas(&self, max_bytes: i64, max_gas: i64) -> Vec<Tx>;

    /// Take the pool's exclusive lock for the commit critical section.
    fn lock(&self) -> impl Future<Output = Self::Guard> + Send;

    /// Flush the pool's application-side buffer.
    fn flush_app_conn(&self) -> impl Future<Output = Result<(), MempoolError>> + Send;

    /// Remove committed transactions and re-check the remainder against the
    /// post-block size and gas limits.
    fn update(
        &self,
        height: u64,
        txs: &[Tx],
        results: &[TxResult],
        pre_check_max_bytes: i64,
        post_check_max_gas: i64,
    ) -> impl Future<Output = Result<(), MempoolError>> + Send;
}

/// Gossip service broadcasting fraud proofs to peers.
pub trait FraudProofGossip: Clone + Send + Sync + 'static {
    /// Broadcast a fraud proof.
    fn broadcast(
        &self,
        proof: &StateFraudProof,
    ) -> impl Future<Output = Result<(), GossipError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_conn_error_display() {
        let err = AppConnError::Transport("connection reset".to_string());
        assert_eq!(err.to_string(), "application transport error: connection reset");
    }

    #[test]
    fn mempool_error_display() {
        let err = MempoolError::Flush("closed".to_string());
        assert_eq!(err.to_string(), "failed to flush mempool app connection: closed");
        let err = MempoolError::Update("bad height".to_string());
        assert_eq!(err.to_string(), "failed to update mempool: bad height");
    }

    #[test]
    fn gossip_error_display() {
        let err = GossipError("no peers".to_string());
        assert_eq!(err.to_string(), "fraud proof gossip failed: no peers");
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AppConnError>();
        assert_send_sync::<MempoolError>();
        assert_send_sync::<GossipError>();
    }
}
