use super::{WalletContract, GET_MESSAGE_HASH_METHOD, IS_VALID_SIGNATURE_METHOD};
use crate::domain::{recover_owners, safe_message_hash};
use crate::foundation::{
    Address, ContentHash, MagicValue, SigningError, WalletScopedHash, ECDSA_SIGNATURE_LEN, EIP1271_INVALID_VALUE, EIP1271_MAGIC_VALUE,
};
use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Owner set and threshold of a simulated multi-owner wallet.
#[derive(Clone, Debug)]
pub struct WalletSetup {
    pub owners: Vec<Address>,
    pub threshold: usize,
    /// Wallets deployed without a message-signing fallback handler fail every call.
    pub fallback_handler: bool,
}

impl WalletSetup {
    pub fn new(owners: Vec<Address>, threshold: usize) -> Self {
        Self { owners, threshold, fallback_handler: true }
    }

    pub fn without_fallback_handler(mut self) -> Self {
        self.fallback_handler = false;
        self
    }
}

/// In-process wallet contract that applies the Safe `checkSignatures` rules: the first `threshold`
/// 65-byte signatures must recover to distinct owners in strictly ascending address order.
pub struct LocalWalletContract {
    chain_id: u64,
    wallets: RwLock<HashMap<Address, WalletSetup>>,
}

impl LocalWalletContract {
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id, wallets: RwLock::new(HashMap::new()) }
    }

    pub fn with_wallet(self, wallet: Address, setup: WalletSetup) -> Self {
        self.deploy(wallet, setup);
        self
    }

    pub fn deploy(&self, wallet: Address, setup: WalletSetup) {
        self.wallets.write().insert(wallet, setup);
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn threshold(&self, wallet: &Address) -> Option<usize> {
        self.wallets.read().get(wallet).map(|setup| setup.threshold)
    }

    fn setup(&self, wallet: &Address, method: &str) -> Result<WalletSetup, SigningError> {
        let setup = self
            .wallets
            .read()
            .get(wallet)
            .cloned()
            .ok_or_else(|| SigningError::contract_call_failed(wallet, method, "no contract code at address"))?;
        if !setup.fallback_handler {
            return Err(SigningError::contract_call_failed(wallet, method, "wallet has no message-signing fallback handler"));
        }
        Ok(setup)
    }

    fn check_signatures(&self, setup: &WalletSetup, hash: &WalletScopedHash, signature: &[u8]) -> bool {
        if setup.threshold == 0 || signature.len() < setup.threshold * ECDSA_SIGNATURE_LEN {
            return false;
        }
        let Ok(recovered) = recover_owners(hash, &signature[..setup.threshold * ECDSA_SIGNATURE_LEN]) else {
            return false;
        };
        let mut last: Option<Address> = None;
        for owner in recovered {
            if last.is_some_and(|prev| owner <= prev) || !setup.owners.contains(&owner) {
                return false;
            }
            last = Some(owner);
        }
        true
    }
}

#[async_trait]
impl WalletContract for LocalWalletContract {
    async fn message_hash(&self, wallet: &Address, hash: &ContentHash) -> Result<WalletScopedHash, SigningError> {
        self.setup(wallet, GET_MESSAGE_HASH_METHOD)?;
        Ok(safe_message_hash(self.chain_id, wallet, hash))
    }

    async fn is_valid_signature(&self, wallet: &Address, hash: &ContentHash, signature: &[u8]) -> Result<MagicValue, SigningError> {
        let setup = self.setup(wallet, IS_VALID_SIGNATURE_METHOD)?;
        let scoped = safe_message_hash(self.chain_id, wallet, hash);
        let valid = self.check_signatures(&setup, &scoped, signature);
        debug!("local isValidSignature wallet={} wallet_scoped_hash={} valid={}", wallet, scoped, valid);
        Ok(if valid { EIP1271_MAGIC_VALUE } else { EIP1271_INVALID_VALUE })
    }
}
