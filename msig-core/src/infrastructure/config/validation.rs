use crate::foundation::{Address, MAX_POLL_TIMEOUT_MS};
use crate::infrastructure::config::types::AppConfig;
use std::str::FromStr;

impl AppConfig {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        // Absent is fine; wallet commands require it through `wallet_address()`.
        if let Some(addr) = self.wallet.address.as_deref().map(str::trim).filter(|addr| !addr.is_empty()) {
            if Address::from_str(addr).is_err() {
                errors.push(format!("invalid wallet.address: {}", addr));
            }
        }
        if self.wallet.chain_id == 0 {
            errors.push("wallet.chain_id must be > 0".to_string());
        }
        if !is_http_url(&self.wallet.rpc_url) {
            errors.push(format!("wallet.rpc_url must be an http(s) url: {}", self.wallet.rpc_url));
        }

        if !is_http_url(&self.collection.base_url) {
            errors.push(format!("collection.base_url must be an http(s) url: {}", self.collection.base_url));
        }
        if self.collection.request_timeout_ms == 0 {
            errors.push("collection.request_timeout_ms must be > 0".to_string());
        }

        if self.polling.interval_ms == 0 {
            errors.push("polling.interval_ms must be > 0".to_string());
        }
        if self.polling.timeout_ms == 0 {
            errors.push("polling.timeout_ms must be > 0".to_string());
        }
        if self.polling.timeout_ms > MAX_POLL_TIMEOUT_MS {
            errors.push(format!("polling.timeout_ms should not exceed {}", MAX_POLL_TIMEOUT_MS));
        }
        if self.polling.interval_ms > self.polling.timeout_ms {
            errors.push("polling.interval_ms cannot exceed polling.timeout_ms".to_string());
        }

        if self.transport.owner_key_env.trim().is_empty() {
            errors.push("transport.owner_key_env must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn is_http_url(url: &str) -> bool {
    let url = url.trim();
    (url.starts_with("http://") || url.starts_with("https://")) && url.len() > "https://".len()
}
