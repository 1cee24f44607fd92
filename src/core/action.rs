//! Actions that consumers dispatch to the session store

use crate::domain::abi::ParamId;
use crate::domain::example::Example;

/// Named state transitions of a decode session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the signature text
    SetSignature(String),

    /// Replace the calldata text
    SetCalldata(String),

    /// Replace (or clear) the hovered parameter
    SetHoveredParam(Option<ParamId>),

    /// Add the parameter to the selection, or remove it if already selected
    ToggleParamSelection(ParamId),

    /// Select every parameter of the decoded tree
    SelectAll,

    /// Empty the selection
    DeselectAll,

    /// Empty the selection after a clear
    ResetSelection,

    /// Drop the decoded result, error, hover and selection
    ClearDecoded,

    /// Clear the inputs and everything derived from them
    ClearAll,

    /// Decode the current inputs
    Decode,

    /// Load an example's inputs and decode them
    LoadExample(Example),

    /// Load inputs from the shareable location and decode them
    LoadFromUrl,
}
