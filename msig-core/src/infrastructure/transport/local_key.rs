use super::{SessionSettings, SigningAck, SigningTransport};
use crate::domain::{content_hash, safe_message_hash, RawMessage, SignatureRecord};
use crate::foundation::util::encoding::decode_hex;
use crate::foundation::util::time::now_millis;
use crate::foundation::{Address, SignatureBytes, SigningError};
use crate::infrastructure::collection::ConfirmationSink;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use async_trait::async_trait;
use log::info;
use parking_lot::RwLock;
use std::sync::Arc;

/// Owner backed by a local secp256k1 key. Signs the wallet-scoped hash directly and hands the
/// signature to a [`ConfirmationSink`].
pub struct LocalKeyTransport {
    signer: PrivateKeySigner,
    chain_id: u64,
    sink: Arc<dyn ConfirmationSink>,
    supports_off_chain: bool,
    settings: RwLock<SessionSettings>,
}

impl LocalKeyTransport {
    pub fn new(signer: PrivateKeySigner, chain_id: u64, sink: Arc<dyn ConfirmationSink>) -> Self {
        Self { signer, chain_id, sink, supports_off_chain: true, settings: RwLock::new(SessionSettings::default()) }
    }

    /// Loads a hex private key (with or without `0x`) from the environment variable `var`.
    pub fn from_env(var: &str, chain_id: u64, sink: Arc<dyn ConfirmationSink>) -> Result<Self, SigningError> {
        let raw = std::env::var(var).map_err(|_| SigningError::ConfigError(format!("owner key env var {var} is not set")))?;
        let bytes = decode_hex(&raw)?;
        let signer = PrivateKeySigner::from_slice(&bytes)
            .map_err(|err| SigningError::ConfigError(format!("owner key in {var} is not a valid secp256k1 key: {err}")))?;
        Ok(Self::new(signer, chain_id, sink))
    }

    /// Simulates a wallet session that ignores the off-chain signing setting.
    pub fn without_off_chain_support(mut self) -> Self {
        self.supports_off_chain = false;
        self
    }

    pub fn owner(&self) -> Address {
        self.signer.address()
    }

    pub fn settings(&self) -> SessionSettings {
        *self.settings.read()
    }
}

#[async_trait]
impl SigningTransport for LocalKeyTransport {
    async fn enable_off_chain_signing(&self, settings: SessionSettings) -> Result<SessionSettings, SigningError> {
        let mut current = self.settings.write();
        current.off_chain_signing = settings.off_chain_signing && self.supports_off_chain;
        info!("wallet session settings owner={} off_chain_signing={}", self.signer.address(), current.off_chain_signing);
        Ok(*current)
    }

    async fn submit(&self, wallet: &Address, message: &RawMessage) -> Result<SigningAck, SigningError> {
        if !self.settings().off_chain_signing {
            return Err(SigningError::transport_error("submit", "off-chain signing is not enabled for this session"));
        }
        let hash = safe_message_hash(self.chain_id, wallet, &content_hash(message)?);
        let signature = self
            .signer
            .sign_hash_sync(&hash.to_b256())
            .map_err(|err| SigningError::transport_error("sign_hash", err))?;

        let owner = self.signer.address();
        let submitted_at = now_millis();
        let record = SignatureRecord { owner, signature: SignatureBytes::new(signature.as_bytes().to_vec()), submitted_at };
        self.sink.submit_signature(wallet, &hash, message, record).await?;

        info!("owner signature submitted wallet={} wallet_scoped_hash={} owner={} kind={}", wallet, hash, owner, message.kind());
        Ok(SigningAck { owner, wallet_scoped_hash: hash, submitted_at })
    }
}
