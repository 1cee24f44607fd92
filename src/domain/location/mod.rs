//! Shareable location contract
//!
//! The session store mirrors its inputs into a shareable location (a URL) so
//! a decode can be bookmarked and reopened later.

/// Query parameter holding the function signature
pub const SIGNATURE_PARAM: &str = "signature";
/// Query parameter holding the raw calldata
pub const CALLDATA_PARAM: &str = "calldata";

/// Raw parameters read from the location
///
/// Values are returned as stored, i.e. still percent-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams {
    pub signature: Option<String>,
    pub calldata: Option<String>,
}

/// Read/write access to the shareable location
pub trait UrlSync {
    /// Persist both values into the location
    ///
    /// Best-effort: implementations log failures instead of returning them.
    fn update_url_params(&mut self, signature: &str, calldata: &str);

    /// Read the raw values currently present in the location
    fn url_params(&self) -> UrlParams;
}

impl<U: UrlSync + ?Sized> UrlSync for Box<U> {
    fn update_url_params(&mut self, signature: &str, calldata: &str) {
        (**self).update_url_params(signature, calldata)
    }

    fn url_params(&self) -> UrlParams {
        (**self).url_params()
    }
}
