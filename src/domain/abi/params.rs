//! Decoded parameter tree

use serde::{Deserialize, Serialize};

/// Identifier of a decoded parameter, unique across one decoded tree
pub type ParamId = u32;

/// One decoded argument, possibly with nested sub-fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedParam {
    pub id: ParamId,
    /// Parameter name (or a positional fallback such as "arg0" / "[2]")
    pub name: String,
    /// Solidity type (e.g., "address", "uint256", "(uint256,address)[]")
    pub kind: String,
    /// Display value; composites carry a short summary
    pub value: String,
    /// Tuple fields or array elements; empty for leaf types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ProcessedParam>,
}

impl ProcessedParam {
    pub fn is_leaf(&self) -> bool {
        self.components.is_empty()
    }
}

/// Result of decoding one function call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedCalldata {
    /// Function name
    pub function_name: String,
    /// Canonical signature (e.g., "transfer(address,uint256)")
    pub signature: String,
    /// 4-byte selector as 0x-prefixed hex
    pub selector: String,
    /// Decoded arguments in declaration order
    pub top_level_params: Vec<ProcessedParam>,
}

impl DecodedCalldata {
    /// Every id in the tree, parents before their components
    pub fn all_param_ids(&self) -> Vec<ParamId> {
        collect_param_ids(&self.top_level_params)
    }
}

/// Collect the ids of `params` and, recursively, of all their components
pub fn collect_param_ids(params: &[ProcessedParam]) -> Vec<ParamId> {
    let mut ids = Vec::new();
    for param in params {
        ids.push(param.id);
        ids.extend(collect_param_ids(&param.components));
    }
    ids
}
