//! Block creation, validation, execution, and commit.

use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use alloy_primitives::Bytes;
use parking_lot::Mutex;
use sanza_abci::{
    BeginBlockRequest, BlockId, CommitInfo, DeliverTxRequest, EndBlockRequest,
    FinalizeBlockRequest, FinalizeBlockResponse, FraudProof, GenerateFraudProofRequest,
    InitChainRequest, InitChainResponse, LegacyResponses, Response, StateFraudProof,
    TxResult, Validator, ValidatorParams, ValidatorSet, ValidatorSetError, ValidatorUpdate,
    VerifyFraudProofRequest, results_hash, validators_from_updates,
};
use sanza_domain::{
    BaseHeader, Block, Commit, Data, Genesis, Hash, Header, IntermediateStateRoots,
    SignedHeader, State, build_last_commit_info, hash_from_bytes, last_commit_hash,
    to_wire_header,
};
use tracing::{debug, error, info, warn};

use crate::{
    AppConn, EventBus, EventError, EventNewBlock, EventNewBlockHeader, EventTx,
    ExecutorConfig, ExecutorError, FraudProofGossip, Mempool,
};

/// Creates and applies blocks and maintains chain state.
///
/// The executor is driven by a single logical caller; its operations are not
/// safe for concurrent invocation on the same instance. Every collaborator
/// is injected behind a trait, so the executor is oblivious to transports.
#[derive(Debug)]
pub struct BlockExecutor<A, M, E, F> {
    config: ExecutorConfig,
    app: A,
    mempool: M,
    event_bus: Option<E>,
    fraud_service: Option<F>,
}

/// Tx results observed on the mempool channel, in delivery order.
#[derive(Debug, Default)]
struct DeliverySlots {
    results: Vec<Option<TxResult>>,
    next: usize,
    valid: usize,
    invalid: usize,
}

impl<A, M, E, F> BlockExecutor<A, M, E, F>
where
    A: AppConn,
    M: Mempool,
    E: EventBus,
    F: FraudProofGossip,
{
    /// Create a new executor.
    ///
    /// The configured proposer address and namespace id end up in all newly
    /// created blocks. Passing no event bus disables event publication.
    pub const fn new(config: ExecutorConfig, app: A, mempool: M, event_bus: Option<E>) -> Self {
        Self { config, app, mempool, event_bus, fraud_service: None }
    }

    /// Install the fraud-proof gossip service.
    pub fn set_fraud_proof_service(&mut self, service: F) {
        self.fraud_service = Some(service);
    }

    /// Forward the genesis descriptor to the application's consensus
    /// channel and return its response unchanged.
    ///
    /// No state is composed here; the caller builds the initial [`State`]
    /// from the response.
    pub async fn init_chain(&self, genesis: &Genesis) -> Result<InitChainResponse, ExecutorError> {
        let request = InitChainRequest {
            time: genesis.genesis_time,
            chain_id: genesis.chain_id.clone(),
            consensus_params: genesis.consensus_params.clone(),
            validators: genesis.validator_updates(),
            app_state_bytes: genesis.app_state.clone(),
            initial_height: genesis.initial_height,
        };
        Ok(self.app.init_chain(request).await?)
    }

    /// Reap transactions from the mempool and build a block at the given
    /// height on top of the current state.
    pub fn create_block(
        &self,
        height: u64,
        last_commit: &Commit,
        last_header_hash: Hash,
        state: &State,
    ) -> Block {
        let max_bytes = state.consensus_params.block.max_bytes;
        let max_gas = state.consensus_params.block.max_gas;
        let txs = self.mempool.reap_max_bytes_max_gas(max_bytes, max_gas);

        let mut block = Block {
            signed_header: SignedHeader {
                header: Header {
                    version: state.version,
                    base: BaseHeader {
                        chain_id: self.config.chain_id.clone(),
                        height,
                        time: unix_now(),
                    },
                    data_hash: Hash::ZERO,
                    consensus_hash: Hash::ZERO,
                    app_hash: state.app_hash,
                    last_results_hash: state.last_results_hash,
                    proposer_address: self.config.proposer_address,
                    ..Default::default()
                },
                commit: last_commit.clone(),
            },
            data: Data {
                txs,
                intermediate_state_roots: IntermediateStateRoots { raw_roots: None },
            },
        };
        block.signed_header.header.last_commit_hash = last_commit_hash(
            last_commit,
            &block.signed_header.header,
            self.config.proposer_address,
        );
        block.signed_header.header.last_header_hash = last_header_hash;
        block.signed_header.header.aggregators_hash = state.validators.hash();

        block
    }

    /// Validate and execute the block, returning the successor state and
    /// the per-phase response bundle.
    ///
    /// The input state is never mutated; on any error the caller keeps its
    /// current state. A [`ExecutorError::FraudProofGenerated`] error means
    /// the proof is already gossiped and the node is expected to halt.
    pub async fn apply_block(
        &self,
        state: &State,
        block: &mut Block,
    ) -> Result<(State, LegacyResponses), ExecutorError> {
        self.validate(state, block)?;

        let responses = self.execute(state, block).await?;

        let updates = &responses.end_block.validator_updates;
        validate_validator_updates(updates, &state.consensus_params.validator)?;
        let validator_changes = validators_from_updates(updates);
        if !validator_changes.is_empty() {
            debug!(count = validator_changes.len(), "updates to validators");
        }
        if state.consensus_params.block.max_bytes == 0 {
            error!(height = block.height(), "state consensus params have max_bytes=0");
        }

        let new_state = self.update_state(state, block, &responses, validator_changes)?;

        Ok((new_state, responses))
    }

    /// Commit the executed block's application state.
    ///
    /// Under the mempool lock: flush the mempool's app-side buffer, commit
    /// the application, query the new app hash, and update the mempool with
    /// the applied transactions. The new app hash is written into `state`
    /// and events are published best-effort afterwards.
    ///
    /// Returns the new app hash and the application's retain height.
    pub async fn commit(
        &self,
        state: &mut State,
        block: &Block,
        responses: &LegacyResponses,
    ) -> Result<(Bytes, u64), ExecutorError> {
        let (app_hash, retain_height) =
            self.commit_locked(state, block, &responses.deliver_txs).await?;

        state.app_hash = hash_from_bytes(&app_hash);

        if let Err(err) = self.publish_events(responses, block, state) {
            error!(%err, "failed to fire block events");
        }

        Ok((app_hash, retain_height))
    }

    /// Ask the application to verify a gossiped fraud proof against the
    /// expected valid app hash.
    pub async fn verify_fraud_proof(
        &self,
        fraud_proof: &FraudProof,
        expected_valid_app_hash: &[u8],
    ) -> Result<bool, ExecutorError> {
        let response = self
            .app
            .verify_fraud_proof(VerifyFraudProofRequest {
                fraud_proof: fraud_proof.clone(),
                expected_valid_app_hash: Bytes::copy_from_slice(expected_valid_app_hash),
            })
            .await?;
        Ok(response.success)
    }

    fn validate(&self, state: &State, block: &Block) -> Result<(), ExecutorError> {
        block.validate_basic()?;
        let header = &block.signed_header.header;

        if header.version.app != state.version.app || header.version.block != state.version.block
        {
            return Err(ExecutorError::VersionMismatch);
        }
        if state.last_block_height == 0 && header.height() != state.initial_height {
            return Err(ExecutorError::InitialHeightMismatch {
                expected: state.initial_height,
                got: header.height(),
            });
        }
        if state.last_block_height > 0 && header.height() != state.last_block_height + 1 {
            return Err(ExecutorError::HeightMismatch {
                expected: state.last_block_height + 1,
                got: header.height(),
            });
        }
        if header.app_hash != state.app_hash {
            return Err(ExecutorError::AppHashMismatch);
        }
        if header.last_results_hash != state.last_results_hash {
            return Err(ExecutorError::LastResultsHashMismatch);
        }
        if header.aggregators_hash != state.validators.hash() {
            return Err(ExecutorError::AggregatorsHashMismatch);
        }
        Ok(())
    }

    /// Issue the finalize request and synthesize the per-phase bundle.
    ///
    /// With fraud proofs enabled, an intermediate state root is captured
    /// before execution, after the begin phase, after every transaction,
    /// and after the end phase; a follower's declared roots are compared at
    /// each capture and the first divergence triggers proof generation.
    async fn execute(
        &self,
        state: &State,
        block: &mut Block,
    ) -> Result<LegacyResponses, ExecutorError> {
        let tx_count = block.data.txs.len();
        let declared_isrs = block.data.intermediate_state_roots.raw_roots.clone();

        if self.config.fraud_proofs_enabled {
            if let Some(declared) = &declared_isrs {
                let expected = block.expected_isr_count();
                if declared.len() != expected {
                    return Err(ExecutorError::InvalidIsrLength {
                        expected,
                        got: declared.len(),
                    });
                }
            }
        }

        let slots = Arc::new(Mutex::new(DeliverySlots {
            results: vec![None; tx_count],
            ..Default::default()
        }));
        let callback_slots = Arc::clone(&slots);
        self.app.set_response_callback(Arc::new(move |_request, response| {
            if let Response::DeliverTx(result) = response {
                let mut slots = callback_slots.lock();
                if result.is_ok() {
                    slots.valid += 1;
                } else {
                    debug!(code = result.code, log = %result.log, "invalid tx");
                    slots.invalid += 1;
                }
                if slots.next < slots.results.len() {
                    let index = slots.next;
                    slots.results[index] = Some(result.clone());
                    slots.next += 1;
                }
            }
        }));

        let mut isrs: Vec<Bytes> = Vec::new();
        let mut isr_index = 0usize;
        if self.config.fraud_proofs_enabled {
            isrs.push(self.app_hash().await?);
            isr_index += 1;
        }

        let hash = block.hash();
        let mut wire_header = to_wire_header(&block.signed_header.header);
        wire_header.chain_id = self.config.chain_id.clone();
        wire_header.validators_hash = state.validators.hash();
        let begin_request =
            BeginBlockRequest { hash, header: wire_header, last_commit_info: CommitInfo::default() };

        let commit_info = build_last_commit_info(block, &state.validators, state.initial_height)?;
        let finalize_request = FinalizeBlockRequest {
            hash,
            next_validators_hash: block.signed_header.header.aggregators_hash,
            proposer_address: block.signed_header.header.proposer_address,
            height: block.height(),
            time: block.signed_header.header.time(),
            decided_last_commit: commit_info,
            txs: block.data.txs.iter().map(|tx| tx.payload().clone()).collect(),
        };

        let response = match self.app.finalize_block(finalize_request).await {
            Ok(response) => response,
            Err(err) => {
                error!(%err, "error in application finalize block");
                return Err(err.into());
            }
        };

        info!(
            height = block.height(),
            num_txs_res = response.tx_results.len(),
            num_val_updates = response.validator_updates.len(),
            app_hash = %response.app_hash,
            "finalized block"
        );

        if response.tx_results.len() != tx_count {
            return Err(ExecutorError::TxResultCountMismatch {
                expected: tx_count,
                got: response.tx_results.len(),
            });
        }

        let responses = LegacyResponses::from_finalize(&response);

        self.capture_isr(&mut isrs, &mut isr_index, declared_isrs.as_ref(), &begin_request, &[], None)
            .await?;

        let mut deliver_requests = Vec::with_capacity(tx_count);
        for tx in &block.data.txs {
            deliver_requests.push(DeliverTxRequest { tx: tx.payload().clone() });
            self.capture_isr(
                &mut isrs,
                &mut isr_index,
                declared_isrs.as_ref(),
                &begin_request,
                &deliver_requests,
                None,
            )
            .await?;
        }

        let end_request = EndBlockRequest { height: block.height() };
        self.capture_isr(
            &mut isrs,
            &mut isr_index,
            declared_isrs.as_ref(),
            &begin_request,
            &deliver_requests,
            Some(&end_request),
        )
        .await?;

        {
            let slots = slots.lock();
            if slots.next > 0 {
                debug!(
                    valid = slots.valid,
                    invalid = slots.invalid,
                    "tx responses streamed on the mempool channel"
                );
            }
        }

        // Block producer: the captured roots become the block's declared trace.
        if self.config.fraud_proofs_enabled
            && block.data.intermediate_state_roots.raw_roots.is_none()
        {
            block.data.intermediate_state_roots.raw_roots = Some(isrs);
        }

        Ok(responses)
    }

    /// Capture one intermediate state root and compare it against the
    /// declared trace at the current position.
    ///
    /// The declared list's length was checked once before execution; each
    /// capture indexes it directly. On the first divergence the faulted
    /// request context is handed to the application for proof generation,
    /// the proof is gossiped, and execution fails terminally.
    async fn capture_isr(
        &self,
        isrs: &mut Vec<Bytes>,
        isr_index: &mut usize,
        declared_isrs: Option<&Vec<Bytes>>,
        begin_request: &BeginBlockRequest,
        deliver_requests: &[DeliverTxRequest],
        end_request: Option<&EndBlockRequest>,
    ) -> Result<(), ExecutorError> {
        if !self.config.fraud_proofs_enabled {
            return Ok(());
        }
        let isr = self.app_hash().await?;
        isrs.push(isr.clone());

        if let Some(declared) = declared_isrs {
            let expected = &declared[*isr_index];
            if expected.as_ref() != isr.as_ref() {
                debug!(index = *isr_index, declared = %expected, generated = %isr, "ISR mismatch");
                info!("found fraud occurrence, generating a fraud proof...");
                let fraud_proof =
                    self.generate_fraud_proof(begin_request, deliver_requests, end_request).await?;
                self.gossip_fraud_proof(fraud_proof).await?;
                return Err(ExecutorError::FraudProofGenerated);
            }
        }
        *isr_index += 1;
        Ok(())
    }

    async fn generate_fraud_proof(
        &self,
        begin_request: &BeginBlockRequest,
        deliver_requests: &[DeliverTxRequest],
        end_request: Option<&EndBlockRequest>,
    ) -> Result<FraudProof, ExecutorError> {
        let request = GenerateFraudProofRequest {
            begin_block_request: begin_request.clone(),
            deliver_tx_requests: deliver_requests.to_vec(),
            end_block_request: end_request.cloned(),
        };
        let response = self.app.generate_fraud_proof(request).await?;
        response.fraud_proof.ok_or(ExecutorError::FraudProofFailed)
    }

    async fn gossip_fraud_proof(&self, fraud_proof: FraudProof) -> Result<(), ExecutorError> {
        match &self.fraud_service {
            Some(service) => {
                service.broadcast(&StateFraudProof { fraud_proof }).await?;
                Ok(())
            }
            None => {
                warn!("no fraud proof service installed, dropping fraud proof");
                Ok(())
            }
        }
    }

    /// Compute the successor state for an executed block.
    fn update_state(
        &self,
        state: &State,
        block: &Block,
        responses: &LegacyResponses,
        validator_changes: Vec<Validator>,
    ) -> Result<State, ExecutorError> {
        let mut n_val_set = state.next_validators.clone();
        let mut last_height_validators_changed = state.last_height_validators_changed;

        // The chain can run without validators ("based" mode).
        if !n_val_set.is_empty() {
            if !validator_changes.is_empty() {
                match n_val_set.apply_updates(&validator_changes) {
                    Ok(()) => {}
                    Err(ValidatorSetError::EmptySet) => {
                        n_val_set = ValidatorSet::empty();
                    }
                    Err(err) => return Err(err.into()),
                }
                // Changes decided at this height apply two heights later.
                last_height_validators_changed = block.height() + 1 + 1;
            }
            if !n_val_set.is_empty() {
                n_val_set.increment_proposer_priority(1);
            }
        } else if !validator_changes.is_empty() {
            return Err(ExecutorError::AddingValidatorToBased);
        }

        Ok(State {
            version: state.version,
            chain_id: state.chain_id.clone(),
            initial_height: state.initial_height,
            last_block_height: block.height(),
            last_block_time: block.signed_header.header.time(),
            last_block_id: BlockId { hash: block.hash() },
            validators: n_val_set.clone(),
            next_validators: n_val_set,
            last_validators: state.validators.clone(),
            last_height_validators_changed,
            consensus_params: state.consensus_params.clone(),
            last_height_consensus_params_changed: state.last_height_consensus_params_changed,
            app_hash: Hash::ZERO,
            last_results_hash: results_hash(&responses.deliver_txs),
        })
    }

    async fn commit_locked(
        &self,
        state: &State,
        block: &Block,
        deliver_txs: &[TxResult],
    ) -> Result<(Bytes, u64), ExecutorError> {
        let _guard = self.mempool.lock().await;

        self.mempool.flush_app_conn().await?;

        let commit_response = self.app.commit().await?;
        let app_hash = self.app.get_app_hash().await?.app_hash;

        let max_bytes = state.consensus_params.block.max_bytes;
        let max_gas = state.consensus_params.block.max_gas;
        self.mempool
            .update(block.height(), &block.data.txs, deliver_txs, max_bytes, max_gas)
            .await?;

        Ok((app_hash, commit_response.retain_height as u64))
    }

    /// Best-effort event fan-out: NewBlock, NewBlockHeader, then one event
    /// per transaction in block order. Failures accumulate and are reported
    /// as one error, never failing the commit.
    fn publish_events(
        &self,
        responses: &LegacyResponses,
        block: &Block,
        state: &State,
    ) -> Result<(), EventError> {
        let Some(bus) = &self.event_bus else {
            return Ok(());
        };
        let mut failures: Vec<String> = Vec::new();

        let mut events = responses.begin_block.events.clone();
        events.extend(responses.end_block.events.iter().cloned());
        let result = FinalizeBlockResponse {
            events,
            tx_results: responses.deliver_txs.clone(),
            validator_updates: responses.end_block.validator_updates.clone(),
            consensus_param_updates: responses.end_block.consensus_param_updates.clone(),
            app_hash: Bytes::copy_from_slice(state.app_hash.as_slice()),
        };
        if let Err(err) = bus.publish_new_block(EventNewBlock { block: block.clone(), result }) {
            failures.push(err.to_string());
        }

        if let Err(err) = bus.publish_new_block_header(EventNewBlockHeader {
            header: block.signed_header.header.clone(),
        }) {
            failures.push(err.to_string());
        }

        // The data model carries no evidence, so no evidence events fire
        // between the header event and the tx events.
        for (index, tx_result) in responses.deliver_txs.iter().enumerate() {
            if let Err(err) = bus.publish_tx(EventTx {
                height: block.height(),
                index: index as u32,
                tx: block.data.txs[index].payload().clone(),
                result: tx_result.clone(),
            }) {
                failures.push(err.to_string());
            }
        }

        if failures.is_empty() { Ok(()) } else { Err(EventError(failures.join("; "))) }
    }

    async fn app_hash(&self) -> Result<Bytes, ExecutorError> {
        Ok(self.app.get_app_hash().await?.app_hash)
    }
}

/// Sanity-check validator updates against the consensus params.
///
/// Power 0 deletes a validator, so no key check applies there; any other
/// power requires a well-formed key of an accepted type.
fn validate_validator_updates(
    updates: &[ValidatorUpdate],
    params: &ValidatorParams,
) -> Result<(), ExecutorError> {
    for update in updates {
        if update.power < 0 {
            return Err(ExecutorError::NegativePower(update.power));
        }
        if update.power == 0 {
            continue;
        }
        update.pub_key.validate()?;
        if !params.is_supported(update.pub_key.type_str()) {
            return Err(ExecutorError::UnsupportedPubKeyType(
                update.pub_key.type_str().to_string(),
            ));
        }
    }
    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Address;
    use sanza_abci::{
        CommitResponse, ConsensusParams, GenerateFraudProofResponse, GetAppHashResponse,
        PublicKey, ResponseCallback, VerifyFraudProofResponse,
    };
    use sanza_domain::{Tx, Version};

    use super::*;
    use crate::{
        AppConnError, NamespaceId,
        components::{InMemoryEventBus, InMemoryMempool, NoopFraudGossip},
    };

    /// Application double that answers every request with fixed data.
    #[derive(Clone, Debug, Default)]
    struct StaticApp;

    impl AppConn for StaticApp {
        async fn init_chain(
            &self,
            _request: InitChainRequest,
        ) -> Result<InitChainResponse, AppConnError> {
            Ok(InitChainResponse::default())
        }

        async fn finalize_block(
            &self,
            request: FinalizeBlockRequest,
        ) -> Result<FinalizeBlockResponse, AppConnError> {
            Ok(FinalizeBlockResponse {
                tx_results: vec![TxResult::default(); request.txs.len()],
                ..Default::default()
            })
        }

        async fn commit(&self) -> Result<CommitResponse, AppConnError> {
            Ok(CommitResponse { retain_height: 0 })
        }

        async fn get_app_hash(&self) -> Result<GetAppHashResponse, AppConnError> {
            Ok(GetAppHashResponse { app_hash: Bytes::from(vec![0x11; 32]) })
        }

        async fn generate_fraud_proof(
            &self,
            _request: GenerateFraudProofRequest,
        ) -> Result<GenerateFraudProofResponse, AppConnError> {
            Ok(GenerateFraudProofResponse { fraud_proof: Some(FraudProof::default()) })
        }

        async fn verify_fraud_proof(
            &self,
            _request: VerifyFraudProofRequest,
        ) -> Result<VerifyFraudProofResponse, AppConnError> {
            Ok(VerifyFraudProofResponse { success: true })
        }

        fn set_response_callback(&self, _callback: ResponseCallback) {}
    }

    type TestExecutor = BlockExecutor<StaticApp, InMemoryMempool, InMemoryEventBus, NoopFraudGossip>;

    fn ed_key(byte: u8) -> PublicKey {
        PublicKey::Ed25519(Bytes::from(vec![byte; 32]))
    }

    fn test_state() -> State {
        let validators =
            ValidatorSet::new(vec![Validator::new(ed_key(0x01), 10)]);
        State {
            version: Version { block: 11, app: 0 },
            chain_id: "sanza-test".to_string(),
            initial_height: 1,
            validators: validators.clone(),
            next_validators: validators.clone(),
            last_validators: validators,
            last_height_validators_changed: 1,
            last_height_consensus_params_changed: 1,
            consensus_params: ConsensusParams::default(),
            ..Default::default()
        }
    }

    fn test_executor(mempool: InMemoryMempool) -> TestExecutor {
        let config = ExecutorConfig::new(Address::repeat_byte(0x01), "sanza-test".to_string())
            .with_namespace_id(NamespaceId([1; 8]));
        BlockExecutor::new(config, StaticApp, mempool, Some(InMemoryEventBus::new()))
    }

    #[test]
    fn create_block_carries_state_and_config() {
        let mempool = InMemoryMempool::new();
        mempool.insert(Tx::new(vec![0x01].into()));
        let executor = test_executor(mempool);

        let mut state = test_state();
        state.app_hash = Hash::repeat_byte(0xAA);

        let block = executor.create_block(1, &Commit::empty(), Hash::ZERO, &state);
        let header = &block.signed_header.header;

        assert_eq!(header.height(), 1);
        assert_eq!(header.chain_id(), "sanza-test");
        assert_eq!(header.proposer_address, Address::repeat_byte(0x01));
        assert_eq!(header.app_hash, Hash::repeat_byte(0xAA));
        assert_eq!(header.aggregators_hash, state.validators.hash());
        assert_eq!(block.data.txs.len(), 1);
        assert!(block.data.intermediate_state_roots.raw_roots.is_none());
    }

    #[test]
    fn created_block_passes_validation() {
        let executor = test_executor(InMemoryMempool::new());
        let state = test_state();
        let block = executor.create_block(1, &Commit::empty(), Hash::ZERO, &state);
        assert!(executor.validate(&state, &block).is_ok());
    }

    #[test]
    fn validate_rejects_version_mismatch() {
        let executor = test_executor(InMemoryMempool::new());
        let state = test_state();
        let mut block = executor.create_block(1, &Commit::empty(), Hash::ZERO, &state);
        block.signed_header.header.version.app = 9;
        assert!(matches!(
            executor.validate(&state, &block),
            Err(ExecutorError::VersionMismatch)
        ));
    }

    #[test]
    fn validate_rejects_wrong_initial_height() {
        let executor = test_executor(InMemoryMempool::new());
        let state = test_state();
        let block = executor.create_block(3, &Commit::empty(), Hash::ZERO, &state);
        assert!(matches!(
            executor.validate(&state, &block),
            Err(ExecutorError::InitialHeightMismatch { expected: 1, got: 3 })
        ));
    }

    #[test]
    fn validate_rejects_non_consecutive_height() {
        let executor = test_executor(InMemoryMempool::new());
        let mut state = test_state();
        state.last_block_height = 4;
        let block = executor.create_block(6, &Commit::empty(), Hash::ZERO, &state);
        assert!(matches!(
            executor.validate(&state, &block),
            Err(ExecutorError::HeightMismatch { expected: 5, got: 6 })
        ));
    }

    #[test]
    fn validate_rejects_app_hash_mismatch() {
        let executor = test_executor(InMemoryMempool::new());
        let state = test_state();
        let mut block = executor.create_block(1, &Commit::empty(), Hash::ZERO, &state);
        block.signed_header.header.app_hash = Hash::repeat_byte(0xBB);
        assert!(matches!(
            executor.validate(&state, &block),
            Err(ExecutorError::AppHashMismatch)
        ));
    }

    #[test]
    fn validate_rejects_aggregators_hash_mismatch() {
        let executor = test_executor(InMemoryMempool::new());
        let state = test_state();
        let mut block = executor.create_block(1, &Commit::empty(), Hash::ZERO, &state);
        block.signed_header.header.aggregators_hash = Hash::repeat_byte(0x0F);
        assert!(matches!(
            executor.validate(&state, &block),
            Err(ExecutorError::AggregatorsHashMismatch)
        ));
    }

    #[test]
    fn update_state_rotates_validators() {
        let executor = test_executor(InMemoryMempool::new());
        let state = test_state();
        let block = executor.create_block(1, &Commit::empty(), Hash::ZERO, &state);

        let new_state = executor
            .update_state(&state, &block, &LegacyResponses::default(), Vec::new())
            .expect("update");

        assert_eq!(new_state.last_block_height, 1);
        assert_eq!(new_state.last_validators, state.validators);
        assert_eq!(new_state.validators, new_state.next_validators);
        assert_eq!(new_state.app_hash, Hash::ZERO);
        // No updates: membership unchanged, only the rotation advanced.
        assert_eq!(new_state.validators.hash(), state.validators.hash());
    }

    #[test]
    fn update_state_schedules_changes_two_heights_later() {
        let executor = test_executor(InMemoryMempool::new());
        let state = test_state();
        let block = executor.create_block(1, &Commit::empty(), Hash::ZERO, &state);

        let changes = vec![Validator::new(ed_key(0x02), 5)];
        let new_state = executor
            .update_state(&state, &block, &LegacyResponses::default(), changes)
            .expect("update");

        assert_eq!(new_state.last_height_validators_changed, 3);
        assert_eq!(new_state.validators.len(), 2);
    }

    #[test]
    fn update_state_substitutes_empty_set() {
        let executor = test_executor(InMemoryMempool::new());
        let state = test_state();
        let block = executor.create_block(1, &Commit::empty(), Hash::ZERO, &state);

        let changes = vec![Validator::new(ed_key(0x01), 0)];
        let new_state = executor
            .update_state(&state, &block, &LegacyResponses::default(), changes)
            .expect("update");

        assert!(new_state.validators.is_empty());
        assert!(new_state.validators.proposer.is_none());
    }

    #[test]
    fn update_state_rejects_additions_to_empty_set() {
        let executor = test_executor(InMemoryMempool::new());
        let mut state = test_state();
        state.validators = ValidatorSet::empty();
        state.next_validators = ValidatorSet::empty();
        let mut block = executor.create_block(1, &Commit::empty(), Hash::ZERO, &state);
        block.signed_header.header.aggregators_hash = state.validators.hash();

        let changes = vec![Validator::new(ed_key(0x02), 5)];
        let result =
            executor.update_state(&state, &block, &LegacyResponses::default(), changes);
        assert!(matches!(result, Err(ExecutorError::AddingValidatorToBased)));
    }

    #[test]
    fn update_state_commits_to_results() {
        let executor = test_executor(InMemoryMempool::new());
        let state = test_state();
        let block = executor.create_block(1, &Commit::empty(), Hash::ZERO, &state);

        let responses = LegacyResponses {
            deliver_txs: vec![TxResult { code: 0, ..Default::default() }],
            ..Default::default()
        };
        let new_state = executor
            .update_state(&state, &block, &responses, Vec::new())
            .expect("update");
        assert_eq!(new_state.last_results_hash, results_hash(&responses.deliver_txs));
    }

    #[test]
    fn validator_update_sanity() {
        let params = ValidatorParams::default();

        assert!(validate_validator_updates(&[], &params).is_ok());

        let negative = vec![ValidatorUpdate { pub_key: ed_key(0x01), power: -5 }];
        assert!(matches!(
            validate_validator_updates(&negative, &params),
            Err(ExecutorError::NegativePower(-5))
        ));

        // Deletions skip the key check entirely.
        let deletion = vec![ValidatorUpdate {
            pub_key: PublicKey::Secp256k1(Bytes::from(vec![0x01; 33])),
            power: 0,
        }];
        assert!(validate_validator_updates(&deletion, &params).is_ok());

        let unsupported = vec![ValidatorUpdate {
            pub_key: PublicKey::Secp256k1(Bytes::from(vec![0x01; 33])),
            power: 5,
        }];
        assert!(matches!(
            validate_validator_updates(&unsupported, &params),
            Err(ExecutorError::UnsupportedPubKeyType(_))
        ));

        let malformed = vec![ValidatorUpdate {
            pub_key: PublicKey::Ed25519(Bytes::from(vec![0x01; 4])),
            power: 5,
        }];
        assert!(matches!(
            validate_validator_updates(&malformed, &params),
            Err(ExecutorError::ValidatorSet(ValidatorSetError::InvalidKeyLength { .. }))
        ));
    }

    #[tokio::test]
    async fn init_chain_forwards_genesis() {
        let executor = test_executor(InMemoryMempool::new());
        let genesis = Genesis {
            genesis_time: 1_700_000_000,
            chain_id: "sanza-test".to_string(),
            initial_height: 1,
            consensus_params: ConsensusParams::default(),
            validators: Vec::new(),
            app_state: Bytes::new(),
        };
        let response = executor.init_chain(&genesis).await.expect("init chain");
        assert_eq!(response, InitChainResponse::default());
    }
}
