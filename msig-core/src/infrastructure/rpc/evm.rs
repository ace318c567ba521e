use super::{WalletContract, GET_MESSAGE_HASH_METHOD, IS_VALID_SIGNATURE_METHOD};
use crate::foundation::{Address, ContentHash, MagicValue, SigningError, WalletScopedHash, EIP1271_INVALID_VALUE};
use alloy::primitives::Bytes;
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;
use alloy::transports::http::{Client, Http};
use alloy::transports::{RpcError, TransportErrorKind};
use async_trait::async_trait;
use log::{debug, warn};

sol! {
    function getMessageHash(bytes message) external view returns (bytes32 messageHash);
    function isValidSignature(bytes32 _dataHash, bytes _signature) external view returns (bytes4 magicValue);
}

/// JSON-RPC error code geth/anvil use for `execution reverted`.
const EXECUTION_REVERTED_CODE: i64 = 3;

/// `eth_call` based wallet contract client.
pub struct EvmWalletContract {
    provider: RootProvider<Http<Client>>,
    rpc_url: String,
}

impl EvmWalletContract {
    pub fn connect_http(rpc_url: &str) -> Result<Self, SigningError> {
        let url = rpc_url.parse().map_err(|err| SigningError::ConfigError(format!("invalid rpc url '{rpc_url}': {err}")))?;
        let provider = ProviderBuilder::new().on_http(url);
        Ok(Self { provider, rpc_url: rpc_url.to_string() })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn eth_call(&self, wallet: &Address, input: Vec<u8>) -> Result<Bytes, RpcError<TransportErrorKind>> {
        let tx = TransactionRequest::default().to(*wallet).input(input.into());
        self.provider.call(&tx).await
    }
}

fn is_revert(err: &RpcError<TransportErrorKind>) -> bool {
    match err {
        RpcError::ErrorResp(payload) => {
            payload.code == EXECUTION_REVERTED_CODE || payload.message.to_lowercase().contains("revert")
        }
        _ => false,
    }
}

#[async_trait]
impl WalletContract for EvmWalletContract {
    async fn message_hash(&self, wallet: &Address, hash: &ContentHash) -> Result<WalletScopedHash, SigningError> {
        let call = getMessageHashCall { message: Bytes::copy_from_slice(hash.as_hash()) };
        let raw = self
            .eth_call(wallet, call.abi_encode())
            .await
            .map_err(|err| SigningError::contract_call_failed(wallet, GET_MESSAGE_HASH_METHOD, err))?;
        let decoded = getMessageHashCall::abi_decode_returns(&raw, true).map_err(|err| {
            SigningError::contract_call_failed(wallet, GET_MESSAGE_HASH_METHOD, format!("undecodable return data len={}: {err}", raw.len()))
        })?;
        let scoped = WalletScopedHash::from(decoded.messageHash);
        debug!("wallet message hash derived wallet={} content_hash={} wallet_scoped_hash={}", wallet, hash, scoped);
        Ok(scoped)
    }

    async fn is_valid_signature(&self, wallet: &Address, hash: &ContentHash, signature: &[u8]) -> Result<MagicValue, SigningError> {
        let call = isValidSignatureCall { _dataHash: hash.to_b256(), _signature: Bytes::copy_from_slice(signature) };
        let raw = match self.eth_call(wallet, call.abi_encode()).await {
            Ok(raw) => raw,
            Err(err) if is_revert(&err) => {
                warn!("isValidSignature reverted wallet={} content_hash={} signature_len={} error={}", wallet, hash, signature.len(), err);
                return Ok(EIP1271_INVALID_VALUE);
            }
            Err(err) => return Err(SigningError::contract_call_failed(wallet, IS_VALID_SIGNATURE_METHOD, err)),
        };
        let decoded = isValidSignatureCall::abi_decode_returns(&raw, true).map_err(|err| {
            SigningError::contract_call_failed(wallet, IS_VALID_SIGNATURE_METHOD, format!("undecodable return data len={}: {err}", raw.len()))
        })?;
        Ok(decoded.magicValue.0)
    }
}
