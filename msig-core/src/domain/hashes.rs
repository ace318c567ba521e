use crate::domain::RawMessage;
use crate::foundation::{Address, ContentHash, SigningError, WalletScopedHash, SAFE_DOMAIN_SEPARATOR_TYPE, SAFE_MSG_TYPE};
use alloy::primitives::{eip191_hash_message, keccak256, B256, U256};

/// Canonical digest of a message: EIP-191 `personal_sign` hash for text, EIP-712 signing hash for
/// typed data.
pub fn content_hash(message: &RawMessage) -> Result<ContentHash, SigningError> {
    match message {
        RawMessage::Text(text) => Ok(ContentHash::from(eip191_hash_message(text.as_bytes()))),
        RawMessage::TypedData(typed) => typed
            .eip712_signing_hash()
            .map(ContentHash::from)
            .map_err(|err| SigningError::MalformedMessage(format!("typed data hashing failed: {err}"))),
    }
}

/// Wallet-scoped hash computed the way a Safe fallback handler's `getMessageHash` does:
/// an EIP-712 `SafeMessage(bytes message)` over the 32-byte content hash, under the
/// `(chainId, verifyingContract)` domain.
pub fn safe_message_hash(chain_id: u64, wallet: &Address, hash: &ContentHash) -> WalletScopedHash {
    let domain_separator = safe_domain_separator(chain_id, wallet);

    let mut struct_buf = Vec::with_capacity(64);
    struct_buf.extend_from_slice(keccak256(SAFE_MSG_TYPE.as_bytes()).as_slice());
    struct_buf.extend_from_slice(keccak256(hash.as_hash()).as_slice());
    let struct_hash = keccak256(&struct_buf);

    let mut buf = Vec::with_capacity(66);
    buf.extend_from_slice(&[0x19, 0x01]);
    buf.extend_from_slice(domain_separator.as_slice());
    buf.extend_from_slice(struct_hash.as_slice());
    WalletScopedHash::from(keccak256(&buf))
}

pub fn safe_domain_separator(chain_id: u64, wallet: &Address) -> B256 {
    let mut buf = Vec::with_capacity(96);
    buf.extend_from_slice(keccak256(SAFE_DOMAIN_SEPARATOR_TYPE.as_bytes()).as_slice());
    buf.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
    buf.extend_from_slice(B256::left_padding_from(wallet.as_slice()).as_slice());
    keccak256(&buf)
}
