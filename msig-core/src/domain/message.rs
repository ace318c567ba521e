//! Raw message model: what the owners are asked to sign.

use crate::foundation::SigningError;
use alloy::dyn_abi::TypedData;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

const EIP712_DOMAIN_TYPE: &str = "EIP712Domain";

/// User-supplied content to sign.
///
/// On the wire a text message is a JSON string and typed data is an EIP-712 JSON object
/// (`types`, `primaryType`, `domain`, `message`).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawMessage {
    Text(String),
    TypedData(TypedData),
}

impl RawMessage {
    pub fn text(text: impl Into<String>) -> Self {
        RawMessage::Text(text.into())
    }

    /// Parse EIP-712 typed data, rejecting structurally inconsistent type declarations up front.
    pub fn typed_data_from_json(json: &str) -> Result<Self, SigningError> {
        let value: Value =
            serde_json::from_str(json).map_err(|err| SigningError::MalformedMessage(format!("invalid typed data json: {err}")))?;
        Self::typed_data_from_value(value)
    }

    pub fn typed_data_from_value(value: Value) -> Result<Self, SigningError> {
        validate_typed_data_structure(&value)?;
        let typed: TypedData =
            serde_json::from_value(value).map_err(|err| SigningError::MalformedMessage(format!("invalid typed data: {err}")))?;
        Ok(RawMessage::TypedData(typed))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RawMessage::Text(_) => "text",
            RawMessage::TypedData(_) => "typed_data",
        }
    }
}

/// Checks that the primary type is declared and that every struct type referenced by a field is
/// declared in `types`.
pub fn validate_typed_data_structure(value: &Value) -> Result<(), SigningError> {
    let types = value
        .get("types")
        .and_then(Value::as_object)
        .ok_or_else(|| SigningError::MalformedMessage("typed data is missing the `types` object".to_string()))?;
    let primary_type = value
        .get("primaryType")
        .and_then(Value::as_str)
        .ok_or_else(|| SigningError::MalformedMessage("typed data is missing `primaryType`".to_string()))?;

    if primary_type != EIP712_DOMAIN_TYPE && !types.contains_key(primary_type) {
        return Err(SigningError::MalformedMessage(format!("primary type `{primary_type}` is not declared")));
    }

    let declared: HashSet<&str> = types.keys().map(String::as_str).collect();
    for (type_name, fields) in types {
        let fields = fields
            .as_array()
            .ok_or_else(|| SigningError::MalformedMessage(format!("type `{type_name}` must be a list of fields")))?;
        for field in fields {
            let field_name = field.get("name").and_then(Value::as_str).unwrap_or_default();
            let field_type = field
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| SigningError::MalformedMessage(format!("field `{type_name}.{field_name}` has no type")))?;
            let base = strip_array_suffixes(field_type);
            if !is_primitive_type(base) && !declared.contains(base) {
                return Err(SigningError::MalformedMessage(format!(
                    "field `{type_name}.{field_name}` references undeclared type `{base}`"
                )));
            }
        }
    }
    Ok(())
}

fn strip_array_suffixes(ty: &str) -> &str {
    let mut base = ty.trim();
    while base.ends_with(']') {
        match base.rfind('[') {
            Some(idx) => base = &base[..idx],
            None => break,
        }
    }
    base
}

fn is_primitive_type(ty: &str) -> bool {
    match ty {
        "address" | "bool" | "string" | "bytes" | "uint" | "int" => true,
        _ => {
            if let Some(size) = ty.strip_prefix("bytes") {
                return size.parse::<u16>().map_or(false, |n| (1..=32).contains(&n));
            }
            let bits = ty.strip_prefix("uint").or_else(|| ty.strip_prefix("int"));
            bits.and_then(|b| b.parse::<u16>().ok()).map_or(false, |n| n > 0 && n <= 256 && n % 8 == 0)
        }
    }
}
