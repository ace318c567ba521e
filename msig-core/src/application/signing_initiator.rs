use crate::domain::RawMessage;
use crate::foundation::{Address, SigningError};
use crate::infrastructure::transport::{SessionSettings, SigningAck, SigningTransport};
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Sends raw messages to the signing transport. Never waits for the threshold: the session is
/// switched to off-chain signing before the first request, and a session that refuses the switch
/// is an error.
pub struct SigningInitiator {
    transport: Arc<dyn SigningTransport>,
    off_chain_enabled: AtomicBool,
}

impl SigningInitiator {
    pub fn new(transport: Arc<dyn SigningTransport>) -> Self {
        Self { transport, off_chain_enabled: AtomicBool::new(false) }
    }

    pub async fn enable_off_chain_signing(&self) -> Result<(), SigningError> {
        let applied = self.transport.enable_off_chain_signing(SessionSettings::off_chain()).await?;
        if !applied.off_chain_signing {
            return Err(SigningError::transport_error(
                "enable_off_chain_signing",
                "wallet session did not acknowledge offChainSigning; signing would block until the full threshold",
            ));
        }
        self.off_chain_enabled.store(true, Ordering::Release);
        Ok(())
    }

    pub async fn request_signature(&self, wallet: &Address, message: &RawMessage) -> Result<SigningAck, SigningError> {
        if !self.off_chain_enabled.load(Ordering::Acquire) {
            self.enable_off_chain_signing().await?;
        }
        let ack = self.transport.submit(wallet, message).await?;
        info!("signing request acknowledged wallet={} wallet_scoped_hash={} owner={}", wallet, ack.wallet_scoped_hash, ack.owner);
        Ok(ack)
    }
}
