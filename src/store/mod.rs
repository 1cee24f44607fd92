//! Session state

mod session;

pub use session::{
    format_decode_error, DecodeRequest, DecodeTicket, Phase, Session, SessionStore,
    DECODE_ERROR_PREFIX,
};
