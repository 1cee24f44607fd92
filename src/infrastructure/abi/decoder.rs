//! Calldata decoder implementation using alloy-dyn-abi

use alloy_dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier};
use alloy_json_abi::{Function, Param};

use crate::domain::abi::{CalldataDecoder, DecodeError, DecodedCalldata, ParamId, ProcessedParam};

/// Decoder backed by alloy's signature parser and dynamic ABI codec
#[derive(Debug, Default, Clone, Copy)]
pub struct AlloyCalldataDecoder;

impl AlloyCalldataDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl CalldataDecoder for AlloyCalldataDecoder {
    fn decode(&self, signature: &str, calldata: &str) -> Result<DecodedCalldata, DecodeError> {
        let function = parse_signature(signature)?;
        let data = parse_calldata(calldata)?;

        // Verify selector matches
        let selector = function.selector();
        if data[..4] != selector[..] {
            return Err(DecodeError::SelectorMismatch {
                signature: function.signature(),
                expected: format!("0x{}", hex::encode(selector)),
                found: format!("0x{}", hex::encode(&data[..4])),
            });
        }

        let values = function
            .abi_decode_input(&data[4..])
            .map_err(|e| DecodeError::Abi(e.to_string()))?;

        let mut builder = TreeBuilder::default();
        let mut top_level_params = Vec::with_capacity(values.len());
        for (idx, (param, value)) in function.inputs.iter().zip(values.iter()).enumerate() {
            let ty = param.resolve().map_err(|e| DecodeError::Signature {
                signature: signature.trim().to_string(),
                reason: format!("failed to resolve type '{}': {}", param.ty, e),
            })?;
            let name = if param.name.trim().is_empty() {
                format!("arg{}", idx)
            } else {
                param.name.clone()
            };
            top_level_params.push(builder.build(name, &ty, &param.components, value));
        }

        Ok(DecodedCalldata {
            function_name: function.name.clone(),
            signature: function.signature(),
            selector: format!("0x{}", hex::encode(selector)),
            top_level_params,
        })
    }
}

/// Parse a human-readable function signature
///
/// Accepts `transfer(address,uint256)`, named parameters and an optional
/// leading `function` keyword.
fn parse_signature(signature: &str) -> Result<Function, DecodeError> {
    let trimmed = signature.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::Signature {
            signature: String::new(),
            reason: "signature is empty".to_string(),
        });
    }

    Function::parse(trimmed).map_err(|e| DecodeError::Signature {
        signature: trimmed.to_string(),
        reason: e.to_string(),
    })
}

/// Parse hex calldata, requiring at least the 4-byte selector
fn parse_calldata(calldata: &str) -> Result<Vec<u8>, DecodeError> {
    let trimmed = calldata.trim();
    let payload = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let data = hex::decode(payload).map_err(|e| DecodeError::Calldata(e.to_string()))?;
    if data.len() < 4 {
        return Err(DecodeError::Calldata(format!(
            "too short (need at least 4 bytes for selector, got {})",
            data.len()
        )));
    }
    Ok(data)
}

/// Assigns ids depth-first, each parameter before its components
#[derive(Debug, Default)]
struct TreeBuilder {
    next_id: ParamId,
}

impl TreeBuilder {
    fn build(
        &mut self,
        name: String,
        ty: &DynSolType,
        fields: &[Param],
        value: &DynSolValue,
    ) -> ProcessedParam {
        let id = self.next_id;
        self.next_id += 1;

        let components = match (ty, value) {
            (DynSolType::Tuple(types), DynSolValue::Tuple(values)) => types
                .iter()
                .zip(values.iter())
                .enumerate()
                .map(|(idx, (field_ty, field_value))| {
                    let field = fields.get(idx);
                    let field_name = field
                        .map(|f| f.name.trim())
                        .filter(|n| !n.is_empty())
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("field{}", idx));
                    let nested = field.map(|f| f.components.as_slice()).unwrap_or(&[]);
                    self.build(field_name, field_ty, nested, field_value)
                })
                .collect(),
            (DynSolType::Array(inner), DynSolValue::Array(items))
            | (DynSolType::FixedArray(inner, _), DynSolValue::FixedArray(items)) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| self.build(format!("{}[{}]", name, idx), inner, fields, item))
                .collect(),
            _ => Vec::new(),
        };

        ProcessedParam {
            id,
            kind: ty.sol_type_name().into_owned(),
            value: format_dyn_sol_value(value),
            name,
            components,
        }
    }
}

/// Format a DynSolValue for display
fn format_dyn_sol_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::FixedBytes(word, size) => {
            let bytes = &word.as_slice()[..(*size).min(32)];
            format!("0x{}", hex::encode(bytes))
        }
        DynSolValue::Address(addr) => addr.to_checksum(None),
        DynSolValue::Function(func) => format!("0x{}", hex::encode(func.as_slice())),
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::String(s) => format!("\"{}\"", s),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            format!("[{} items]", items.len())
        }
        DynSolValue::Tuple(fields) => format!("({} fields)", fields.len()),
    }
}
