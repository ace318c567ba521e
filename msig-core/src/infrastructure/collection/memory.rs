use super::{ConfirmationSink, SignatureCollectionService};
use crate::domain::{AggregateSignatureState, RawMessage, SignatureRecord};
use crate::foundation::{Address, SigningError, WalletScopedHash};
use async_trait::async_trait;
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct MemoryInner {
    thresholds: HashMap<Address, u32>,
    records: HashMap<WalletScopedHash, AggregateSignatureState>,
    unavailable: Option<u16>,
}

/// In-process collection service. Records are keyed by wallet-scoped hash and confirm as soon as
/// the wallet's threshold of distinct owners has signed.
#[derive(Clone, Default)]
pub struct MemoryCollectionService {
    inner: Arc<RwLock<MemoryInner>>,
    reads: Arc<AtomicU64>,
}

impl MemoryCollectionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wallet(self, wallet: Address, threshold: u32) -> Self {
        self.register_wallet(wallet, threshold);
        self
    }

    pub fn register_wallet(&self, wallet: Address, threshold: u32) {
        self.inner.write().thresholds.insert(wallet, threshold);
    }

    /// Stores `state` verbatim, bypassing threshold bookkeeping.
    pub fn insert_state(&self, state: AggregateSignatureState) {
        self.inner.write().records.insert(state.hash, state);
    }

    pub fn state(&self, hash: &WalletScopedHash) -> Option<AggregateSignatureState> {
        self.inner.read().records.get(hash).cloned()
    }

    pub fn record_count(&self) -> usize {
        self.inner.read().records.len()
    }

    /// Number of `get_message` calls served so far.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Makes every call fail with the given HTTP-like status until cleared with `None`.
    pub fn set_unavailable(&self, status: Option<u16>) {
        self.inner.write().unavailable = status;
    }

    fn check_available(&self, inner: &MemoryInner, operation: &str) -> Result<(), SigningError> {
        match inner.unavailable {
            Some(status) => Err(SigningError::service_error(operation, Some(status), "service unavailable")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SignatureCollectionService for MemoryCollectionService {
    async fn get_message(&self, hash: &WalletScopedHash) -> Result<Option<AggregateSignatureState>, SigningError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        let inner = self.inner.read();
        self.check_available(&inner, "get_message")?;
        Ok(inner.records.get(hash).cloned())
    }
}

#[async_trait]
impl ConfirmationSink for MemoryCollectionService {
    async fn submit_signature(
        &self,
        wallet: &Address,
        hash: &WalletScopedHash,
        message: &RawMessage,
        record: SignatureRecord,
    ) -> Result<(), SigningError> {
        let mut inner = self.inner.write();
        self.check_available(&inner, "submit_signature")?;
        let required = *inner
            .thresholds
            .get(wallet)
            .ok_or_else(|| SigningError::service_error("submit_signature", Some(404), format!("unknown wallet {wallet}")))?;

        let owner = record.owner;
        let state = inner.records.entry(*hash).or_insert_with(|| {
            info!("message proposed wallet={} wallet_scoped_hash={} required={}", wallet, hash, required);
            AggregateSignatureState::pending(*hash, message.clone(), required)
        });
        let accepted = state.add_confirmation(record);
        debug!(
            "confirmation submitted wallet_scoped_hash={} owner={} accepted={} submitted={} required={} status={:?}",
            hash, owner, accepted, state.confirmations_submitted, state.confirmations_required, state.status
        );
        Ok(())
    }
}
