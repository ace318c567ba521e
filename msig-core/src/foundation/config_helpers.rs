use crate::foundation::SigningError;
use std::str::FromStr;

/// Parse required config option (returns error if `None` or empty).
pub fn parse_required<T>(opt: &Option<String>, field: &str) -> Result<T, SigningError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    opt.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SigningError::ConfigError(format!("missing {}", field)))?
        .parse()
        .map_err(|err| SigningError::ConfigError(format!("invalid {}: {}", field, err)))
}
