//! Signing transports: how a signing request reaches an owner.

use crate::domain::RawMessage;
use crate::foundation::{Address, SigningError, WalletScopedHash};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod local_key;

pub use local_key::LocalKeyTransport;

/// Wallet session settings; serialized as `{"offChainSigning": true}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSettings {
    pub off_chain_signing: bool,
}

impl SessionSettings {
    pub const fn off_chain() -> Self {
        Self { off_chain_signing: true }
    }
}

/// Acknowledgement that one owner signed; the signature reaches the collection service
/// independently of this value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningAck {
    pub owner: Address,
    pub wallet_scoped_hash: WalletScopedHash,
    pub submitted_at: u64,
}

#[async_trait]
pub trait SigningTransport: Send + Sync {
    /// Applies `settings` to the wallet session and returns the settings actually in effect.
    async fn enable_off_chain_signing(&self, settings: SessionSettings) -> Result<SessionSettings, SigningError>;

    /// Sends the raw message for signing and returns once the first owner signature is produced.
    async fn submit(&self, wallet: &Address, message: &RawMessage) -> Result<SigningAck, SigningError>;
}
