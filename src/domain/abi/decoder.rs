//! Calldata decoder trait and error type

use thiserror::Error;

use super::DecodedCalldata;

/// Reasons a (signature, calldata) pair cannot be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The signature text is not a valid function declaration
    #[error("invalid function signature '{signature}': {reason}")]
    Signature { signature: String, reason: String },

    /// The calldata is not valid hex or is too short
    #[error("invalid calldata: {0}")]
    Calldata(String),

    /// The calldata selector belongs to a different function
    #[error("selector mismatch: calldata starts with {found}, but {signature} has selector {expected}")]
    SelectorMismatch {
        signature: String,
        expected: String,
        found: String,
    },

    /// The argument bytes do not match the declared parameter layout
    #[error("{0}")]
    Abi(String),
}

/// Trait for calldata decoding implementations
///
/// Implementations must be deterministic and free of side effects: the same
/// inputs always produce the same result or the same error.
pub trait CalldataDecoder {
    /// Decode `calldata` (hex, including the 4-byte selector) against a
    /// textual function `signature`
    fn decode(&self, signature: &str, calldata: &str) -> Result<DecodedCalldata, DecodeError>;
}

impl<D: CalldataDecoder + ?Sized> CalldataDecoder for &D {
    fn decode(&self, signature: &str, calldata: &str) -> Result<DecodedCalldata, DecodeError> {
        (**self).decode(signature, calldata)
    }
}

impl<D: CalldataDecoder + ?Sized> CalldataDecoder for std::sync::Arc<D> {
    fn decode(&self, signature: &str, calldata: &str) -> Result<DecodedCalldata, DecodeError> {
        (**self).decode(signature, calldata)
    }
}
