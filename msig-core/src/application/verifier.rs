use crate::domain::VerificationOutcome;
use crate::foundation::{Address, ContentHash, SigningError};
use crate::infrastructure::rpc::WalletContract;
use log::{info, warn};
use std::sync::Arc;

/// EIP-1271 check of an aggregate signature against the content hash.
pub struct SignatureVerifier {
    contract: Arc<dyn WalletContract>,
}

impl SignatureVerifier {
    pub fn new(contract: Arc<dyn WalletContract>) -> Self {
        Self { contract }
    }

    pub async fn verify(&self, wallet: &Address, hash: &ContentHash, signature: &[u8]) -> Result<bool, SigningError> {
        Ok(self.outcome(wallet, hash, signature).await?.is_verified())
    }

    pub async fn outcome(&self, wallet: &Address, hash: &ContentHash, signature: &[u8]) -> Result<VerificationOutcome, SigningError> {
        let magic = self.contract.is_valid_signature(wallet, hash, signature).await?;
        let outcome = VerificationOutcome::from_magic(&magic);
        match outcome {
            VerificationOutcome::Verified => {
                info!("signature accepted wallet={} content_hash={} signature_len={}", wallet, hash, signature.len())
            }
            VerificationOutcome::Mismatch => warn!(
                "signature rejected wallet={} content_hash={} signature_len={} returned=0x{}",
                wallet,
                hash,
                signature.len(),
                hex::encode(magic)
            ),
        }
        Ok(outcome)
    }
}
