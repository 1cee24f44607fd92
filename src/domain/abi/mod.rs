//! ABI domain models and contracts
//!
//! This module defines the decoder trait and the decoded parameter tree,
//! independent of the underlying implementation (alloy-dyn-abi).

mod decoder;
mod params;

pub use decoder::{CalldataDecoder, DecodeError};
pub use params::{collect_param_ids, DecodedCalldata, ParamId, ProcessedParam};
