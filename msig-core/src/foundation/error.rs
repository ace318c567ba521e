use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SigningError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    MalformedMessage,
    ContractCallFailed,
    NotFound,
    Timeout,
    ServiceError,
    InvalidServiceResponse,
    TransportError,
    InvalidStateTransition,
    InvalidSignature,
    ConfigError,
    EncodingError,
    SerializationError,
    StorageError,
    ClockError,
}

#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("wallet contract call {method} failed for {wallet}: {details}")]
    ContractCallFailed { wallet: String, method: String, details: String },

    #[error("no message record for hash {hash}")]
    NotFound { hash: String },

    #[error("confirmation timed out after {elapsed_ms}ms for hash {hash} (submitted={submitted} required={required})")]
    Timeout { hash: String, elapsed_ms: u64, submitted: u32, required: u32 },

    #[error("collection service error during {operation}: status={status:?} details={details}")]
    ServiceError { operation: String, status: Option<u16>, details: String },

    #[error("invalid collection service response for {hash}: {reason}")]
    InvalidServiceResponse { hash: String, reason: String },

    #[error("signing transport error during {operation}: {details}")]
    TransportError { operation: String, details: String },

    #[error("invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("{format} serialization error: {details}")]
    SerializationError { format: String, details: String },

    #[error("storage error during {operation}: {details}")]
    StorageError { operation: String, details: String },

    #[error("system clock error: {details}")]
    ClockError { details: String },
}

impl SigningError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SigningError::MalformedMessage(_) => ErrorCode::MalformedMessage,
            SigningError::ContractCallFailed { .. } => ErrorCode::ContractCallFailed,
            SigningError::NotFound { .. } => ErrorCode::NotFound,
            SigningError::Timeout { .. } => ErrorCode::Timeout,
            SigningError::ServiceError { .. } => ErrorCode::ServiceError,
            SigningError::InvalidServiceResponse { .. } => ErrorCode::InvalidServiceResponse,
            SigningError::TransportError { .. } => ErrorCode::TransportError,
            SigningError::InvalidStateTransition { .. } => ErrorCode::InvalidStateTransition,
            SigningError::InvalidSignature(_) => ErrorCode::InvalidSignature,
            SigningError::ConfigError(_) => ErrorCode::ConfigError,
            SigningError::EncodingError(_) => ErrorCode::EncodingError,
            SigningError::SerializationError { .. } => ErrorCode::SerializationError,
            SigningError::StorageError { .. } => ErrorCode::StorageError,
            SigningError::ClockError { .. } => ErrorCode::ClockError,
        }
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext { code: self.code(), message: self.to_string() }
    }

    /// Transport-level failures a caller may reasonably retry. Nothing in this crate retries
    /// automatically apart from the confirmation poll loop.
    pub fn is_retryable(&self) -> bool {
        match self {
            SigningError::ContractCallFailed { .. } | SigningError::TransportError { .. } => true,
            SigningError::ServiceError { status, .. } => status.map_or(true, |code| code >= 500 || code == 429),
            _ => false,
        }
    }

    pub fn contract_call_failed(wallet: impl ToString, method: impl Into<String>, details: impl ToString) -> Self {
        SigningError::ContractCallFailed { wallet: wallet.to_string(), method: method.into(), details: details.to_string() }
    }

    pub fn service_error(operation: impl Into<String>, status: Option<u16>, details: impl ToString) -> Self {
        SigningError::ServiceError { operation: operation.into(), status, details: details.to_string() }
    }

    pub fn invalid_response(hash: impl ToString, reason: impl Into<String>) -> Self {
        SigningError::InvalidServiceResponse { hash: hash.to_string(), reason: reason.into() }
    }

    pub fn transport_error(operation: impl Into<String>, details: impl ToString) -> Self {
        SigningError::TransportError { operation: operation.into(), details: details.to_string() }
    }

    pub fn invalid_transition(from: impl std::fmt::Debug, to: impl std::fmt::Debug) -> Self {
        SigningError::InvalidStateTransition { from: format!("{from:?}"), to: format!("{to:?}") }
    }
}

impl From<hex::FromHexError> for SigningError {
    fn from(err: hex::FromHexError) -> Self {
        SigningError::EncodingError(format!("hex decode error: {}", err))
    }
}

impl From<serde_json::Error> for SigningError {
    fn from(err: serde_json::Error) -> Self {
        SigningError::SerializationError { format: "json".to_string(), details: err.to_string() }
    }
}

impl From<io::Error> for SigningError {
    fn from(err: io::Error) -> Self {
        SigningError::StorageError { operation: "io".to_string(), details: err.to_string() }
    }
}

impl From<reqwest::Error> for SigningError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|status| status.as_u16());
        SigningError::ServiceError { operation: "http".to_string(), status, details: err.to_string() }
    }
}

// NOTE: Avoid adding generic "stringly" error conversions here.
// Use structured `SigningError` variants at the call site to preserve context.
