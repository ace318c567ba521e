//! Result/Option helper traits.
//!
//! This module provides a small extension trait that makes it easier to work with
//! `Result<Option<T>>` values returned by collection services.

use crate::foundation::SigningError;

/// Extension for converting `Result<Option<T>>` into `Result<T>`.
pub trait ResultExt<T> {
    /// Convert `Ok(None)` into an error.
    fn required(self, error: impl FnOnce() -> SigningError) -> Result<T, SigningError>;
}

impl<T> ResultExt<T> for Result<Option<T>, SigningError> {
    fn required(self, error: impl FnOnce() -> SigningError) -> Result<T, SigningError> {
        self?.ok_or_else(error)
    }
}
