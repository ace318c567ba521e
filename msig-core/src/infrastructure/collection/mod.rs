//! Signature collection service: where owners' partial signatures accumulate.

use crate::domain::{AggregateSignatureState, RawMessage, SignatureRecord};
use crate::foundation::{Address, SigningError, WalletScopedHash};
use async_trait::async_trait;

pub mod http;
pub mod memory;

pub use http::{parse_message_record, HttpCollectionService};
pub use memory::MemoryCollectionService;

/// Read side used by the confirmation poller.
#[async_trait]
pub trait SignatureCollectionService: Send + Sync {
    /// Returns `None` when the service has no record for `hash`.
    async fn get_message(&self, hash: &WalletScopedHash) -> Result<Option<AggregateSignatureState>, SigningError>;
}

/// Write side used by signing transports to deliver an owner's partial signature. The first
/// signature for a hash proposes the message; later ones add confirmations.
#[async_trait]
pub trait ConfirmationSink: Send + Sync {
    async fn submit_signature(
        &self,
        wallet: &Address,
        hash: &WalletScopedHash,
        message: &RawMessage,
        record: SignatureRecord,
    ) -> Result<(), SigningError>;
}
