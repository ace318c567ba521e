//! Configuration loader using Figment for layered config management.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML config file
//! 3. Environment variables (MSIG_* prefix)

use crate::foundation::SigningError;
use crate::infrastructure::config::types::AppConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use log::{debug, info};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "msig.toml";

/// Environment variable prefix for config overrides.
///
/// Example: `MSIG_POLLING__TIMEOUT_MS` -> `polling.timeout_ms`
const ENV_PREFIX: &str = "MSIG_";

/// Load configuration from the default file in `data_dir` (`msig.toml`).
pub fn load_config(data_dir: &Path) -> Result<AppConfig, SigningError> {
    load_config_from_file(&data_dir.join(CONFIG_FILE_NAME))
}

/// Load configuration from a specific file path. A missing file falls back to defaults + env.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig, SigningError> {
    info!("loading configuration path={}", path.display());
    let figment = figment_base(path).merge(Env::prefixed(ENV_PREFIX).split("__"));
    let mut config: AppConfig =
        figment.extract().map_err(|e| SigningError::ConfigError(format!("config extraction failed: {e}")))?;
    postprocess(&mut config);
    debug!(
        "configuration loaded wallet={} chain_id={} rpc_url={} collection_url={} poll_interval_ms={} poll_timeout_ms={}",
        config.wallet.address.as_deref().unwrap_or("<unset>"),
        config.wallet.chain_id,
        redact_url(&config.wallet.rpc_url),
        redact_url(&config.collection.base_url),
        config.polling.interval_ms,
        config.polling.timeout_ms
    );
    Ok(config)
}

fn figment_base(path: &Path) -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));
    if path.exists() {
        figment = figment.merge(Toml::file(path));
    } else {
        debug!("configuration file missing; using defaults and env only path={}", path.display());
    }
    figment
}

fn postprocess(config: &mut AppConfig) {
    config.collection.base_url = config.collection.base_url.trim().trim_end_matches('/').to_string();
    config.wallet.rpc_url = config.wallet.rpc_url.trim().to_string();
    if config.collection.api_token.as_deref().map_or(false, |token| token.trim().is_empty()) {
        config.collection.api_token = None;
    }
}

/// Strips userinfo and query strings so credentials never reach the logs.
pub(crate) fn redact_url(url: &str) -> String {
    let without_query = url.split('?').next().unwrap_or(url);
    match without_query.split_once("://") {
        Some((scheme, rest)) => match rest.split_once('@') {
            Some((_, host)) => format!("{scheme}://***@{host}"),
            None => without_query.to_string(),
        },
        None => without_query.to_string(),
    }
}
