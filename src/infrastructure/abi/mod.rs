//! ABI infrastructure - alloy-based calldata decoding

mod decoder;

pub use decoder::AlloyCalldataDecoder;
