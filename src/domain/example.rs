//! Example decode inputs

use serde::{Deserialize, Serialize};

/// A named (signature, calldata) pair that can be loaded into a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub name: String,
    pub signature: String,
    pub calldata: String,
}

impl Example {
    pub fn new(
        name: impl Into<String>,
        signature: impl Into<String>,
        calldata: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            signature: signature.into(),
            calldata: calldata.into(),
        }
    }
}

/// Examples shipped with the tool
pub fn builtin_examples() -> Vec<Example> {
    vec![
        Example::new(
            "erc20-transfer",
            "transfer(address to, uint256 amount)",
            concat!(
                "0xa9059cbb",
                "000000000000000000000000742d35cc6634c0532925a3b844bc9e7595f0beb0",
                "00000000000000000000000000000000000000000000000000000000000f4240",
            ),
        ),
        Example::new(
            "erc20-approve-max",
            "approve(address spender, uint256 amount)",
            concat!(
                "0x095ea7b3",
                "00000000000000000000000068b3465833fb72a70ecdf485e0e4c7bd8665fc45",
                "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
            ),
        ),
        Example::new(
            "uniswap-v3-exact-input-single",
            "exactInputSingle((address,address,uint24,address,uint256,uint256,uint256,uint160))",
            concat!(
                "0x414bf389",
                "000000000000000000000000c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
                "000000000000000000000000a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
                "0000000000000000000000000000000000000000000000000000000000000bb8",
                "000000000000000000000000742d35cc6634c0532925a3b844bc9e7595f0beb0",
                "000000000000000000000000000000000000000000000000000000006553f100",
                "0000000000000000000000000000000000000000000000000de0b6b3a7640000",
                "0000000000000000000000000000000000000000000000000000000000000000",
                "0000000000000000000000000000000000000000000000000000000000000000",
            ),
        ),
        Example::new(
            "multicall",
            "multicall(bytes[] data)",
            concat!(
                "0xac9650d8",
                "0000000000000000000000000000000000000000000000000000000000000020",
                "0000000000000000000000000000000000000000000000000000000000000002",
                "0000000000000000000000000000000000000000000000000000000000000040",
                "00000000000000000000000000000000000000000000000000000000000000c0",
                "0000000000000000000000000000000000000000000000000000000000000044",
                "a9059cbb000000000000000000000000742d35cc6634c0532925a3b844bc9e75",
                "95f0beb000000000000000000000000000000000000000000000000000000000",
                "000f424000000000000000000000000000000000000000000000000000000000",
                "0000000000000000000000000000000000000000000000000000000000000004",
                "18160ddd00000000000000000000000000000000000000000000000000000000",
            ),
        ),
    ]
}

/// Look up an example by case-insensitive name
///
/// `extra` examples (e.g. from the config file) take precedence over the
/// built-in ones.
pub fn find_example(name: &str, extra: &[Example]) -> Option<Example> {
    let name = name.trim();
    extra
        .iter()
        .find(|example| example.name.eq_ignore_ascii_case(name))
        .cloned()
        .or_else(|| {
            builtin_examples()
                .into_iter()
                .find(|example| example.name.eq_ignore_ascii_case(name))
        })
}
