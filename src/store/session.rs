//! Decode session store
//!
//! Owns the session state and exposes it through named actions. Every path
//! that drops the decoded result goes through [`SessionStore::clear_decoded`],
//! which also drops the selection and hover, so no id can outlive its tree.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use tokio::sync::watch;

use crate::core::Action;
use crate::domain::abi::{CalldataDecoder, DecodeError, DecodedCalldata, ParamId};
use crate::domain::example::Example;
use crate::domain::location::UrlSync;

/// Prefix of every message stored in [`Session::last_error`]
pub const DECODE_ERROR_PREFIX: &str = "Decoding error: ";

/// Where the session is in its decode cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    Decoding,
    Decoded,
    Failed,
}

/// Snapshot of a decode session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    signature: String,
    calldata: String,
    decoded: Option<DecodedCalldata>,
    last_error: Option<String>,
    selected: BTreeSet<ParamId>,
    hovered: Option<ParamId>,
    decoding: bool,
}

impl Session {
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn calldata(&self) -> &str {
        &self.calldata
    }

    pub fn decoded(&self) -> Option<&DecodedCalldata> {
        self.decoded.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn selected(&self) -> &BTreeSet<ParamId> {
        &self.selected
    }

    pub fn is_selected(&self, id: ParamId) -> bool {
        self.selected.contains(&id)
    }

    pub fn hovered(&self) -> Option<ParamId> {
        self.hovered
    }

    pub fn phase(&self) -> Phase {
        if self.decoding {
            Phase::Decoding
        } else if self.decoded.is_some() {
            Phase::Decoded
        } else if self.last_error.is_some() {
            Phase::Failed
        } else {
            Phase::Idle
        }
    }
}

/// Identifies one `decode` cycle; only the latest one may complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecodeTicket(u64);

impl fmt::Display for DecodeTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Inputs captured when a decode cycle starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeRequest {
    pub ticket: DecodeTicket,
    pub signature: String,
    pub calldata: String,
}

/// Session state plus the collaborators its actions call
pub struct SessionStore<D, U> {
    session: Session,
    decoder: D,
    url_sync: U,
    last_ticket: u64,
    pending: Option<DecodeTicket>,
    updates: watch::Sender<Session>,
}

impl<D: CalldataDecoder, U: UrlSync> SessionStore<D, U> {
    /// Create a store with an empty session
    pub fn new(decoder: D, url_sync: U) -> Self {
        let (updates, _) = watch::channel(Session::default());
        Self {
            session: Session::default(),
            decoder,
            url_sync,
            last_ticket: 0,
            pending: None,
            updates,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn url_sync(&self) -> &U {
        &self.url_sync
    }

    pub fn url_sync_mut(&mut self) -> &mut U {
        &mut self.url_sync
    }

    /// Receive a snapshot after every action
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.updates.subscribe()
    }

    /// Apply a named action
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::SetSignature(text) => self.set_signature(text),
            Action::SetCalldata(text) => self.set_calldata(text),
            Action::SetHoveredParam(id) => self.set_hovered_param(id),
            Action::ToggleParamSelection(id) => self.toggle_param_selection(id),
            Action::SelectAll => self.select_all(),
            Action::DeselectAll => self.deselect_all(),
            Action::ResetSelection => self.reset_selection(),
            Action::ClearDecoded => self.clear_decoded(),
            Action::ClearAll => self.clear_all(),
            Action::Decode => self.decode(),
            Action::LoadExample(example) => self.load_example(&example),
            Action::LoadFromUrl => {
                self.load_from_url();
            }
        }
    }

    // === Inputs ===

    pub fn set_signature(&mut self, text: impl Into<String>) {
        self.session.signature = text.into();
        self.publish();
    }

    pub fn set_calldata(&mut self, text: impl Into<String>) {
        self.session.calldata = text.into();
        self.publish();
    }

    pub fn set_hovered_param(&mut self, id: Option<ParamId>) {
        self.session.hovered = id;
        self.publish();
    }

    // === Selection ===

    /// Flip membership of `id`; ancestors and descendants are not touched
    pub fn toggle_param_selection(&mut self, id: ParamId) {
        if !self.session.selected.remove(&id) {
            self.session.selected.insert(id);
        }
        tracing::debug!(id, selected = self.session.selected.len(), "toggled param selection");
        self.publish();
    }

    /// Select every id of the decoded tree, nested components included
    pub fn select_all(&mut self) {
        self.select_all_params();
        self.publish();
    }

    pub fn deselect_all(&mut self) {
        self.session.selected.clear();
        self.publish();
    }

    pub fn reset_selection(&mut self) {
        self.deselect_all();
    }

    // === Clearing ===

    /// Drop the decoded result, error, hover and selection; keep the inputs
    pub fn clear_decoded(&mut self) {
        self.clear_decoded_state();
        self.publish();
    }

    /// Reset the inputs as well as everything derived from them
    pub fn clear_all(&mut self) {
        self.session.signature.clear();
        self.session.calldata.clear();
        self.clear_decoded_state();
        self.publish();
    }

    // === Decoding ===

    /// Decode the current inputs with the store's decoder
    ///
    /// Never fails: the outcome is recorded in the session.
    pub fn decode(&mut self) {
        let request = self.begin_decode();
        let outcome = self.decoder.decode(&request.signature, &request.calldata);
        self.finish_decode(request.ticket, outcome);
    }

    /// Start a decode cycle whose result is produced elsewhere
    ///
    /// Clears the previous outcome, mirrors the inputs into the location and
    /// supersedes any cycle still in flight.
    pub fn begin_decode(&mut self) -> DecodeRequest {
        self.clear_decoded_state();
        self.url_sync
            .update_url_params(&self.session.signature, &self.session.calldata);

        self.last_ticket += 1;
        let ticket = DecodeTicket(self.last_ticket);
        self.pending = Some(ticket);
        self.session.decoding = true;
        tracing::debug!(%ticket, signature = %self.session.signature, "decode started");
        self.publish();

        DecodeRequest {
            ticket,
            signature: self.session.signature.clone(),
            calldata: self.session.calldata.clone(),
        }
    }

    /// Complete a decode cycle
    ///
    /// Returns `false` (leaving the session untouched) when `ticket` is not
    /// the cycle currently in flight.
    pub fn finish_decode(
        &mut self,
        ticket: DecodeTicket,
        outcome: Result<DecodedCalldata, DecodeError>,
    ) -> bool {
        if self.pending != Some(ticket) {
            tracing::debug!(%ticket, "discarding stale decode result");
            return false;
        }
        self.pending = None;
        self.session.decoding = false;

        match outcome {
            Ok(decoded) => {
                tracing::info!(
                    %ticket,
                    function = %decoded.function_name,
                    params = decoded.top_level_params.len(),
                    "decoded calldata"
                );
                self.session.decoded = Some(decoded);
                self.select_all_params();
            }
            Err(err) => {
                let message = format_decode_error(&err);
                tracing::info!(%ticket, error = %message, "decode failed");
                self.session.last_error = Some(message);
            }
        }
        self.publish();
        true
    }

    /// Whether a decode cycle is waiting for [`SessionStore::finish_decode`]
    pub fn is_decoding(&self) -> bool {
        self.pending.is_some()
    }

    // === Loading ===

    pub fn load_example(&mut self, example: &Example) {
        self.session.signature = example.signature.clone();
        self.session.calldata = example.calldata.clone();
        self.decode();
    }

    /// Load inputs from the location and decode them
    ///
    /// Returns `false` without touching the session when either param is
    /// missing or cannot be percent-decoded.
    pub fn load_from_url(&mut self) -> bool {
        let params = self.url_sync.url_params();
        let (Some(signature), Some(calldata)) = (
            params.signature.filter(|s| !s.is_empty()),
            params.calldata.filter(|s| !s.is_empty()),
        ) else {
            tracing::debug!("location has no session params");
            return false;
        };

        let (signature, calldata) =
            match (urlencoding::decode(&signature), urlencoding::decode(&calldata)) {
                (Ok(signature), Ok(calldata)) => (signature.into_owned(), calldata.into_owned()),
                (Err(err), _) | (_, Err(err)) => {
                    tracing::warn!(error = %err, "location params are not valid percent-encoded UTF-8");
                    return false;
                }
            };

        self.session.signature = signature;
        self.session.calldata = calldata;
        self.decode();
        true
    }

    fn select_all_params(&mut self) {
        if let Some(decoded) = &self.session.decoded {
            self.session.selected = decoded.all_param_ids().into_iter().collect();
        }
    }

    fn clear_decoded_state(&mut self) {
        self.session.last_error = None;
        self.session.decoded = None;
        self.session.hovered = None;
        self.session.selected.clear();
        self.session.decoding = false;
        self.pending = None;
    }

    fn publish(&self) {
        if self.updates.receiver_count() > 0 {
            self.updates.send_replace(self.session.clone());
        }
    }
}

/// Format a decode failure for display
pub fn format_decode_error(err: &dyn fmt::Display) -> String {
    let message = err.to_string();
    if message.is_empty() {
        format!("{}unknown error", DECODE_ERROR_PREFIX)
    } else {
        format!("{}{}", DECODE_ERROR_PREFIX, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::ProcessedParam;
    use crate::domain::location::UrlParams;

    fn leaf(id: ParamId) -> ProcessedParam {
        ProcessedParam {
            id,
            name: format!("arg{id}"),
            kind: "uint256".to_string(),
            value: id.to_string(),
            components: Vec::new(),
        }
    }

    fn nested_result() -> DecodedCalldata {
        DecodedCalldata {
            function_name: "f".to_string(),
            signature: "f(uint256,(uint256,uint256))".to_string(),
            selector: "0x00000000".to_string(),
            top_level_params: vec![
                leaf(1),
                ProcessedParam {
                    components: vec![leaf(3), leaf(4)],
                    ..leaf(2)
                },
            ],
        }
    }

    /// Decoder that succeeds only for the signature "ok()"
    struct FakeDecoder;

    impl CalldataDecoder for FakeDecoder {
        fn decode(&self, signature: &str, _calldata: &str) -> Result<DecodedCalldata, DecodeError> {
            match signature {
                "ok()" => Ok(nested_result()),
                "silent()" => Err(DecodeError::Abi(String::new())),
                _ => Err(DecodeError::Abi("buffer overrun while deserializing".to_string())),
            }
        }
    }

    #[derive(Default)]
    struct FakeUrl {
        params: UrlParams,
        writes: Vec<(String, String)>,
    }

    impl UrlSync for FakeUrl {
        fn update_url_params(&mut self, signature: &str, calldata: &str) {
            self.writes.push((signature.to_string(), calldata.to_string()));
        }

        fn url_params(&self) -> UrlParams {
            self.params.clone()
        }
    }

    fn store() -> SessionStore<FakeDecoder, FakeUrl> {
        SessionStore::new(FakeDecoder, FakeUrl::default())
    }

    fn ids(values: &[ParamId]) -> BTreeSet<ParamId> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_initial_session_is_empty() {
        let store = store();
        let session = store.session();
        assert_eq!(session.signature(), "");
        assert_eq!(session.calldata(), "");
        assert!(session.decoded().is_none());
        assert!(session.last_error().is_none());
        assert!(session.selected().is_empty());
        assert_eq!(session.hovered(), None);
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_decode_success_selects_whole_tree() {
        let mut store = store();
        store.set_signature("ok()");
        store.set_calldata("0x00");
        store.decode();

        let session = store.session();
        assert!(session.decoded().is_some());
        assert!(session.last_error().is_none());
        assert_eq!(session.selected(), &ids(&[1, 2, 3, 4]));
        assert_eq!(session.phase(), Phase::Decoded);
        assert_eq!(
            store.url_sync().writes,
            vec![("ok()".to_string(), "0x00".to_string())]
        );
    }

    #[test]
    fn test_decode_failure_records_message() {
        let mut store = store();
        store.set_signature("bad()");
        store.decode();

        let session = store.session();
        assert!(session.decoded().is_none());
        assert_eq!(
            session.last_error(),
            Some("Decoding error: buffer overrun while deserializing")
        );
        assert!(session.selected().is_empty());
        assert_eq!(session.phase(), Phase::Failed);
    }

    #[test]
    fn test_decode_failure_without_message() {
        let mut store = store();
        store.set_signature("silent()");
        store.decode();
        assert_eq!(store.session().last_error(), Some("Decoding error: unknown error"));
    }

    #[test]
    fn test_failed_decode_drops_previous_result() {
        let mut store = store();
        store.set_signature("ok()");
        store.decode();
        store.set_hovered_param(Some(3));

        store.set_signature("bad()");
        store.decode();

        let session = store.session();
        assert!(session.decoded().is_none());
        assert!(session.last_error().is_some());
        assert!(session.selected().is_empty());
        assert_eq!(session.hovered(), None);
    }

    #[test]
    fn test_setters_leave_decoded_state_untouched() {
        let mut store = store();
        store.set_signature("ok()");
        store.set_calldata("0x00");
        store.decode();
        let decoded = store.session().decoded().cloned();

        store.set_signature("bad()");
        store.set_calldata("0x1234");
        store.set_hovered_param(Some(3));

        let session = store.session();
        assert_eq!(session.signature(), "bad()");
        assert_eq!(session.calldata(), "0x1234");
        assert_eq!(session.hovered(), Some(3));
        assert_eq!(session.decoded().cloned(), decoded);
        assert_eq!(session.selected(), &ids(&[1, 2, 3, 4]));
        assert!(session.last_error().is_none());
        assert_eq!(session.phase(), Phase::Decoded);
        assert_eq!(store.url_sync().writes.len(), 1);
    }

    #[test]
    fn test_toggle_is_flat_and_involutive() {
        let mut store = store();
        store.set_signature("ok()");
        store.decode();

        store.toggle_param_selection(2);
        assert_eq!(store.session().selected(), &ids(&[1, 3, 4]));

        store.toggle_param_selection(2);
        assert_eq!(store.session().selected(), &ids(&[1, 2, 3, 4]));

        store.deselect_all();
        store.toggle_param_selection(4);
        assert_eq!(store.session().selected(), &ids(&[4]));
    }

    #[test]
    fn test_select_all_without_result_is_noop() {
        let mut store = store();
        store.select_all();
        assert!(store.session().selected().is_empty());
    }

    #[test]
    fn test_deselect_and_reset() {
        let mut store = store();
        store.set_signature("ok()");
        store.decode();

        store.deselect_all();
        assert!(store.session().selected().is_empty());
        assert!(store.session().decoded().is_some());

        store.select_all();
        store.reset_selection();
        assert!(store.session().selected().is_empty());
    }

    #[test]
    fn test_clear_decoded_keeps_inputs() {
        let mut store = store();
        store.set_signature("ok()");
        store.set_calldata("0x00");
        store.decode();
        store.set_hovered_param(Some(1));

        store.clear_decoded();

        let session = store.session();
        assert_eq!(session.signature(), "ok()");
        assert_eq!(session.calldata(), "0x00");
        assert!(session.decoded().is_none());
        assert!(session.last_error().is_none());
        assert!(session.selected().is_empty());
        assert_eq!(session.hovered(), None);
    }

    #[test]
    fn test_clear_all_is_idempotent() {
        let mut store = store();
        store.set_signature("bad()");
        store.set_calldata("0x00");
        store.decode();

        store.clear_all();
        let once = store.session().clone();
        store.clear_all();

        assert_eq!(store.session(), &once);
        assert_eq!(once, Session::default());
    }

    #[test]
    fn test_load_from_url_decodes_params() {
        let mut store = store();
        store.url_sync_mut().params = UrlParams {
            signature: Some("ok%28%29".to_string()),
            calldata: Some("0x00".to_string()),
        };

        assert!(store.load_from_url());
        assert_eq!(store.session().signature(), "ok()");
        assert_eq!(store.session().phase(), Phase::Decoded);
    }

    #[test]
    fn test_load_from_url_without_params_is_noop() {
        let mut store = store();
        store.set_signature("ok()");
        store.decode();
        let before = store.session().clone();

        store.url_sync_mut().params = UrlParams {
            signature: None,
            calldata: Some("0x00".to_string()),
        };
        assert!(!store.load_from_url());

        store.url_sync_mut().params = UrlParams {
            signature: Some(String::new()),
            calldata: Some("0x00".to_string()),
        };
        assert!(!store.load_from_url());

        assert_eq!(store.session(), &before);
        assert_eq!(store.url_sync().writes.len(), 1);
    }

    #[test]
    fn test_load_from_url_rejects_invalid_encoding() {
        let mut store = store();
        store.url_sync_mut().params = UrlParams {
            signature: Some("%FF".to_string()),
            calldata: Some("0x00".to_string()),
        };
        assert!(!store.load_from_url());
        assert_eq!(store.session(), &Session::default());
    }

    #[test]
    fn test_load_example() {
        let mut store = store();
        store.load_example(&Example::new("demo", "ok()", "0x1234"));

        assert_eq!(store.session().signature(), "ok()");
        assert_eq!(store.session().calldata(), "0x1234");
        assert_eq!(store.session().selected().len(), 4);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut store = store();
        store.set_signature("ok()");
        let first = store.begin_decode();
        assert!(store.is_decoding());
        assert_eq!(store.session().phase(), Phase::Decoding);

        store.set_signature("bad()");
        let second = store.begin_decode();
        assert!(second.ticket > first.ticket);

        assert!(!store.finish_decode(first.ticket, Ok(nested_result())));
        assert!(store.session().decoded().is_none());

        let err = DecodeError::Abi("layout mismatch".to_string());
        assert!(store.finish_decode(second.ticket, Err(err)));
        assert_eq!(store.session().last_error(), Some("Decoding error: layout mismatch"));

        // A ticket completes at most once
        assert!(!store.finish_decode(second.ticket, Ok(nested_result())));
        assert!(store.session().decoded().is_none());
    }

    #[test]
    fn test_clear_cancels_in_flight_decode() {
        let mut store = store();
        store.set_signature("ok()");
        let request = store.begin_decode();
        store.clear_all();

        assert!(!store.finish_decode(request.ticket, Ok(nested_result())));
        assert_eq!(store.session(), &Session::default());
    }

    #[test]
    fn test_dispatch_routes_actions() {
        let mut store = store();
        store.dispatch(Action::SetSignature("ok()".to_string()));
        store.dispatch(Action::SetCalldata("0x00".to_string()));
        store.dispatch(Action::Decode);
        store.dispatch(Action::ToggleParamSelection(1));
        store.dispatch(Action::SetHoveredParam(Some(2)));
        assert_eq!(store.session().selected(), &ids(&[2, 3, 4]));
        assert_eq!(store.session().hovered(), Some(2));

        store.dispatch(Action::ClearAll);
        assert_eq!(store.session(), &Session::default());
    }

    #[test]
    fn test_subscribers_see_every_action() {
        let mut store = store();
        let mut rx = store.subscribe();

        store.set_signature("ok()");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().signature(), "ok()");

        store.decode();
        assert_eq!(rx.borrow_and_update().selected().len(), 4);
    }

    #[test]
    fn test_format_decode_error() {
        assert_eq!(format_decode_error(&"boom"), "Decoding error: boom");
        assert_eq!(format_decode_error(&""), "Decoding error: unknown error");
        assert_eq!(format_decode_error(&"  "), "Decoding error:   ");
    }
}
