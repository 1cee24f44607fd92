//! Infrastructure layer - collaborator implementations
//!
//! This layer contains:
//! - ABI decoding using alloy-dyn-abi
//! - URL-backed share links
//! - Tokio runtime bridge for background decoding

pub mod abi;
pub mod location;
pub mod runtime;

pub use abi::AlloyCalldataDecoder;
pub use location::ShareLink;
pub use runtime::DecodeBridge;
