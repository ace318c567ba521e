use crate::foundation::{Hash32, SigningError};

/// Decode hex with or without a `0x` prefix.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, SigningError> {
    let trimmed = s.trim();
    let stripped = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")).unwrap_or(trimmed);
    hex::decode(stripped).map_err(|e| e.into())
}

pub fn parse_hex_32bytes(s: &str) -> Result<Hash32, SigningError> {
    let bytes = decode_hex(s)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| SigningError::EncodingError(format!("expected 32 bytes, got {len}")))
}
