use crate::domain::{content_hash, RawMessage};
use crate::foundation::{Address, ContentHash, SigningError, WalletScopedHash};
use crate::infrastructure::rpc::WalletContract;
use log::debug;
use std::sync::Arc;

/// Produces the two digests of a message: the content hash owners ultimately vouch for, and the
/// wallet-scoped hash they actually sign.
pub struct HashDeriver {
    contract: Arc<dyn WalletContract>,
}

impl HashDeriver {
    pub fn new(contract: Arc<dyn WalletContract>) -> Self {
        Self { contract }
    }

    pub fn content_hash(&self, message: &RawMessage) -> Result<ContentHash, SigningError> {
        let hash = content_hash(message)?;
        debug!("content hash derived kind={} content_hash={}", message.kind(), hash);
        Ok(hash)
    }

    pub async fn wallet_scoped_hash(&self, wallet: &Address, hash: &ContentHash) -> Result<WalletScopedHash, SigningError> {
        self.contract.message_hash(wallet, hash).await
    }
}
