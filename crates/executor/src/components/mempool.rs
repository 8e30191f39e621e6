//! In-memory mempool implementation.

use std::{collections::BTreeMap, sync::Arc};

use parking_lot::RwLock;
use sanza_abci::TxResult;
use sanza_domain::{Tx, TxId};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::traits::{Mempool, MempoolError};

/// Simple FIFO in-memory mempool backed by a BTreeMap.
///
/// Reaping walks insertion order and stops at the byte budget; transactions
/// that no longer fit the post-block limits are dropped on update.
#[derive(Clone, Debug)]
pub struct InMemoryMempool {
    txs: Arc<RwLock<BTreeMap<u64, Tx>>>,
    next_seq: Arc<RwLock<u64>>,
    commit_lock: Arc<Mutex<()>>,
}

impl InMemoryMempool {
    /// Create a new empty mempool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            txs: Arc::new(RwLock::new(BTreeMap::new())),
            next_seq: Arc::new(RwLock::new(0)),
            commit_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Insert a transaction.
    ///
    /// Returns `false` when an identical transaction is already pending.
    pub fn insert(&self, tx: Tx) -> bool {
        let id = tx.id();
        let mut txs = self.txs.write();
        if txs.values().any(|pending| pending.id() == id) {
            return false;
        }
        let mut seq = self.next_seq.write();
        txs.insert(*seq, tx);
        *seq += 1;
        true
    }

    /// Number of pending transactions.
    pub fn len(&self) -> usize {
        self.txs.read().len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.txs.read().is_empty()
    }

    fn remove_ids(&self, ids: &[TxId]) {
        let mut txs = self.txs.write();
        txs.retain(|_, tx| !ids.contains(&tx.id()));
    }
}

impl Default for InMemoryMempool {
    fn default() -> Self {
        Self::new()
    }
}

impl Mempool for InMemoryMempool {
    type Guard = OwnedMutexGuard<()>;

    fn reap_max_bytes_max_gas(&self, max_bytes: i64, _max_gas: i64) -> Vec<Tx> {
        let txs = self.txs.read();
        let mut reaped = Vec::new();
        let mut total: i64 = 0;
        for tx in txs.values() {
            let size = tx.size() as i64;
            if max_bytes >= 0 && total + size > max_bytes {
                break;
            }
            total += size;
            reaped.push(tx.clone());
        }
        reaped
    }

    async fn lock(&self) -> Self::Guard {
        Arc::clone(&self.commit_lock).lock_owned().await
    }

    async fn flush_app_conn(&self) -> Result<(), MempoolError> {
        Ok(())
    }

    async fn update(
        &self,
        _height: u64,
        txs: &[Tx],
        _results: &[TxResult],
        pre_check_max_bytes: i64,
        _post_check_max_gas: i64,
    ) -> Result<(), MempoolError> {
        let committed: Vec<TxId> = txs.iter().map(Tx::id).collect();
        self.remove_ids(&committed);

        if pre_check_max_bytes >= 0 {
            let mut pending = self.txs.write();
            pending.retain(|_, tx| tx.size() as i64 <= pre_check_max_bytes);
        }
        Ok(())
    }
}
