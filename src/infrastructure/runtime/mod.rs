//! Runtime infrastructure - Tokio runtime bridge for background decoding

mod bridge;
mod worker;

pub use bridge::{DecodeBridge, DecodeEvent};
