use crate::foundation::SigningError;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn current_timestamp_millis_env(env_var: Option<&str>) -> Result<u64, SigningError> {
    if let Some(var) = env_var {
        if let Ok(value) = std::env::var(var) {
            return value
                .trim()
                .parse::<u64>()
                .map_err(|err| SigningError::ConfigError(format!("{var} must be a millisecond timestamp: {err}")));
        }
    }
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| SigningError::ClockError { details: err.to_string() })?;
    Ok(u64::try_from(now.as_millis()).unwrap_or(u64::MAX))
}

/// Returns the current wall-clock timestamp in milliseconds.
///
/// For test determinism, this respects `TEST_NOW_MILLIS_ENV_VAR` when set.
pub fn now_millis() -> u64 {
    current_timestamp_millis_env(Some(crate::foundation::constants::TEST_NOW_MILLIS_ENV_VAR))
        .or_else(|_| current_timestamp_millis_env(None))
        .unwrap_or(0)
}
