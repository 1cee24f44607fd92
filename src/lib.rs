//! calldata-lens: decode session state for ABI calldata
//!
//! The [`store::SessionStore`] holds the user's signature and calldata, runs
//! the decoder, tracks which decoded parameters are selected and mirrors the
//! inputs into a shareable link.

pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod store;

pub use crate::core::{Action, Command};
pub use domain::abi::{CalldataDecoder, DecodeError, DecodedCalldata, ParamId, ProcessedParam};
pub use domain::example::Example;
pub use domain::location::{UrlParams, UrlSync};
pub use infrastructure::{AlloyCalldataDecoder, DecodeBridge, ShareLink};
pub use store::{Phase, Session, SessionStore};
