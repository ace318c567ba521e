//! EIP-1271 result interpretation and owner-signature recovery.

use crate::foundation::{Address, MagicValue, SigningError, WalletScopedHash, ECDSA_SIGNATURE_LEN, EIP1271_MAGIC_VALUE};
use alloy::primitives::PrimitiveSignature;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationOutcome {
    Verified,
    /// Structurally valid call whose signature the wallet did not accept.
    Mismatch,
}

impl VerificationOutcome {
    pub fn from_magic(code: &MagicValue) -> Self {
        if is_valid_magic(code) {
            VerificationOutcome::Verified
        } else {
            VerificationOutcome::Mismatch
        }
    }

    pub fn is_verified(self) -> bool {
        self == VerificationOutcome::Verified
    }
}

pub fn is_valid_magic(code: &MagicValue) -> bool {
    code == &EIP1271_MAGIC_VALUE
}

/// Splits a concatenated aggregate signature into 65-byte owner signatures.
pub fn split_signatures(signature: &[u8]) -> Result<Vec<&[u8]>, SigningError> {
    if signature.is_empty() || signature.len() % ECDSA_SIGNATURE_LEN != 0 {
        return Err(SigningError::InvalidSignature(format!(
            "aggregate signature length {} is not a multiple of {}",
            signature.len(),
            ECDSA_SIGNATURE_LEN
        )));
    }
    Ok(signature.chunks(ECDSA_SIGNATURE_LEN).collect())
}

/// Recovers the signer of every 65-byte chunk over the wallet-scoped hash, in order.
pub fn recover_owners(hash: &WalletScopedHash, signature: &[u8]) -> Result<Vec<Address>, SigningError> {
    let prehash = hash.to_b256();
    split_signatures(signature)?
        .into_iter()
        .map(|chunk| {
            let sig = PrimitiveSignature::from_raw(chunk).map_err(|err| SigningError::InvalidSignature(err.to_string()))?;
            sig.recover_address_from_prehash(&prehash).map_err(|err| SigningError::InvalidSignature(err.to_string()))
        })
        .collect()
}
