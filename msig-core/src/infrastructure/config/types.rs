use crate::foundation::config_helpers::parse_required;
use crate::foundation::{
    Address, SigningError, DEFAULT_POLL_INTERVAL_MS, DEFAULT_POLL_TIMEOUT_MS, DEFAULT_REQUEST_TIMEOUT_MS,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_CHAIN_ID: u64 = 1;
pub const DEFAULT_EVM_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_COLLECTION_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_OWNER_KEY_ENV: &str = "MSIG_OWNER_PRIVATE_KEY";
pub const DEFAULT_LOG_FILTERS: &str = "info";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub collection: CollectionConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn wallet_address(&self) -> Result<Address, SigningError> {
        parse_required(&self.wallet.address, "wallet.address")
    }
}

/// The smart-contract wallet whose owners sign.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Wallet contract address (0x...).
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// JSON-RPC endpoint used for read-only `eth_call`s against the wallet.
    #[serde(default = "default_evm_rpc_url")]
    pub rpc_url: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self { address: None, chain_id: default_chain_id(), rpc_url: default_evm_rpc_url() }
    }
}

/// Remote signature collection service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CollectionConfig {
    #[serde(default = "default_collection_base_url")]
    pub base_url: String,
    /// Optional bearer token sent with every request.
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self { base_url: default_collection_base_url(), api_token: None, request_timeout_ms: default_request_timeout_ms() }
    }
}

impl CollectionConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_poll_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval_ms: default_poll_interval_ms(), timeout_ms: default_poll_timeout_ms() }
    }
}

impl PollingConfig {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self {
            interval_ms: u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Environment variable holding the owner's private key for the local-key transport.
    #[serde(default = "default_owner_key_env")]
    pub owner_key_env: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { owner_key_env: default_owner_key_env() }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default = "default_log_filters")]
    pub filters: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { dir: None, filters: default_log_filters() }
    }
}

const fn default_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

fn default_evm_rpc_url() -> String {
    DEFAULT_EVM_RPC_URL.to_string()
}

fn default_collection_base_url() -> String {
    DEFAULT_COLLECTION_BASE_URL.to_string()
}

const fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

const fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

const fn default_poll_timeout_ms() -> u64 {
    DEFAULT_POLL_TIMEOUT_MS
}

fn default_owner_key_env() -> String {
    DEFAULT_OWNER_KEY_ENV.to_string()
}

fn default_log_filters() -> String {
    DEFAULT_LOG_FILTERS.to_string()
}
