#![allow(dead_code)]

use crate::fixtures::{OWNER_KEYS, TEST_CHAIN_ID, TEST_WALLET_HEX};
use alloy::signers::local::PrivateKeySigner;
use msig_core::application::MessageSigningCoordinator;
use msig_core::foundation::Address;
use msig_core::infrastructure::collection::MemoryCollectionService;
use msig_core::infrastructure::config::PollingConfig;
use msig_core::infrastructure::rpc::{LocalWalletContract, WalletSetup};
use msig_core::infrastructure::transport::LocalKeyTransport;
use std::sync::Arc;
use std::time::Duration;

pub fn test_wallet_address() -> Address {
    TEST_WALLET_HEX.parse().expect("wallet address")
}

pub fn owner_signer(index: usize) -> PrivateKeySigner {
    PrivateKeySigner::from_slice(&OWNER_KEYS[index]).expect("owner key")
}

pub fn fast_polling() -> PollingConfig {
    PollingConfig::new(Duration::from_millis(10), Duration::from_millis(100))
}

/// A wallet deployed on the in-process contract with a matching memory collection service.
pub struct TestWallet {
    pub address: Address,
    pub chain_id: u64,
    pub threshold: usize,
    pub signers: Vec<PrivateKeySigner>,
    pub contract: Arc<LocalWalletContract>,
    pub service: MemoryCollectionService,
}

impl TestWallet {
    pub fn owners(&self) -> Vec<Address> {
        self.signers.iter().map(|signer| signer.address()).collect()
    }

    pub fn transport(&self, owner: usize) -> Arc<LocalKeyTransport> {
        Arc::new(LocalKeyTransport::new(self.signers[owner].clone(), self.chain_id, Arc::new(self.service.clone())))
    }

    pub fn coordinator(&self, owner: usize, polling: PollingConfig) -> MessageSigningCoordinator {
        MessageSigningCoordinator::new(
            self.address,
            self.contract.clone(),
            Arc::new(self.service.clone()),
            self.transport(owner),
            polling,
        )
    }
}

pub struct TestWalletBuilder {
    owners: usize,
    threshold: usize,
    chain_id: u64,
    address: Address,
    fallback_handler: bool,
}

impl Default for TestWalletBuilder {
    fn default() -> Self {
        Self { owners: 1, threshold: 1, chain_id: TEST_CHAIN_ID, address: test_wallet_address(), fallback_handler: true }
    }
}

impl TestWalletBuilder {
    pub fn owners(mut self, owners: usize) -> Self {
        self.owners = owners;
        self
    }

    pub fn threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn without_fallback_handler(mut self) -> Self {
        self.fallback_handler = false;
        self
    }

    pub fn build(self) -> TestWallet {
        let signers: Vec<PrivateKeySigner> = (0..self.owners).map(owner_signer).collect();
        let owners = signers.iter().map(|signer| signer.address()).collect();
        let mut setup = WalletSetup::new(owners, self.threshold);
        if !self.fallback_handler {
            setup = setup.without_fallback_handler();
        }
        let contract = Arc::new(LocalWalletContract::new(self.chain_id).with_wallet(self.address, setup));
        let service = MemoryCollectionService::new().with_wallet(self.address, self.threshold as u32);
        TestWallet { address: self.address, chain_id: self.chain_id, threshold: self.threshold, signers, contract, service }
    }
}
