//! Wallet contract access: the two read-only EIP-1271 calls the signing flow depends on.

use crate::foundation::{Address, ContentHash, MagicValue, SigningError, WalletScopedHash};
use async_trait::async_trait;

pub mod evm;
pub mod local;

pub use evm::EvmWalletContract;
pub use local::{LocalWalletContract, WalletSetup};

pub const GET_MESSAGE_HASH_METHOD: &str = "getMessageHash";
pub const IS_VALID_SIGNATURE_METHOD: &str = "isValidSignature";

#[async_trait]
pub trait WalletContract: Send + Sync {
    /// Derives the wallet-scoped hash for `hash` (`getMessageHash(abi.encode(hash))`).
    async fn message_hash(&self, wallet: &Address, hash: &ContentHash) -> Result<WalletScopedHash, SigningError>;

    /// Calls `isValidSignature(hash, signature)` and returns the raw 4-byte result. A revert caused by
    /// a signature the wallet rejects is reported as a non-magic value, not an error.
    async fn is_valid_signature(&self, wallet: &Address, hash: &ContentHash, signature: &[u8]) -> Result<MagicValue, SigningError>;
}
