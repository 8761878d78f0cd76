//! Type-description synthesis.
//!
//! Pure functions that combine children's descriptions into a canonical
//! `(type_string, type_identifier)` pair. Identifiers are consumed by ABI
//! tooling downstream and must stay byte-for-byte stable.

use once_cell::sync::Lazy;
use regex::Regex;
use solace_core::{NodeId, TypeDescription};

use crate::ast::{StateMutability, StorageLocation};

static DOLLAR_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\${2,}").expect("valid pattern"));

const UNKNOWN_STRING: &str = "unknown";
const UNKNOWN_IDENTIFIER: &str = "$_t_unknown";

/// Description of an index access from its recorded input list.
///
/// `None` entries stand for inputs that are not resolved yet.
pub fn index_access(descriptions: &[Option<TypeDescription>]) -> TypeDescription {
    let mut strings = Vec::with_capacity(descriptions.len());
    let mut identifiers = Vec::with_capacity(descriptions.len());

    for description in descriptions {
        let Some(description) = description else {
            strings.push(UNKNOWN_STRING.to_string());
            identifiers.push(UNKNOWN_IDENTIFIER.to_string());
            continue;
        };

        if description.type_string.contains("literal_string") {
            strings.push("string memory".to_string());
            identifiers.push(format!("_{}", description.type_identifier));
        } else if description.type_string.contains("contract") {
            strings.push("address".to_string());
            identifiers.push("$_t_address".to_string());
        } else {
            strings.push(description.type_string.clone());
            identifiers.push(format!("$_{}", description.type_identifier));
        }
    }

    let type_string = format!("index[{}]", strings.join(":"));
    let mut type_identifier = format!("t_[_[{}", identifiers.join("]$"));
    if !type_identifier.ends_with('$') {
        type_identifier.push_str("]$");
    }
    let type_identifier = DOLLAR_RUN.replace_all(&type_identifier, "$").into_owned();

    TypeDescription::new(type_string, type_identifier)
}

/// Description of a tuple from its components' descriptions.
pub fn tuple(components: &[Option<TypeDescription>]) -> TypeDescription {
    let (strings, identifiers): (Vec<_>, Vec<_>) = components
        .iter()
        .map(|component| match component {
            Some(description) => (
                description.type_string.clone(),
                format!("$_{}", description.type_identifier),
            ),
            None => (UNKNOWN_STRING.to_string(), UNKNOWN_IDENTIFIER.to_string()),
        })
        .unzip();

    TypeDescription::new(
        format!("tuple({})", strings.join(",")),
        format!("t_tuple_{}$", identifiers.join("_")),
    )
}

pub fn revert() -> TypeDescription {
    TypeDescription::new("revert", "$_t_revert")
}

fn canonical_elementary(name: &str) -> &str {
    match name {
        "uint" => "uint256",
        "int" => "int256",
        "byte" => "bytes1",
        other => other,
    }
}

/// Elementary type as written at a declaration with the given location.
pub fn elementary(name: &str, location: StorageLocation) -> TypeDescription {
    let name = canonical_elementary(name);
    match name {
        "string" | "bytes" => match location {
            StorageLocation::Default => TypeDescription::new(name, format!("t_{name}_storage")),
            StorageLocation::Memory => {
                TypeDescription::new(format!("{name} memory"), format!("t_{name}_memory_ptr"))
            }
            StorageLocation::Storage => TypeDescription::new(
                format!("{name} storage ref"),
                format!("t_{name}_storage_ptr"),
            ),
            StorageLocation::Calldata => TypeDescription::new(
                format!("{name} calldata"),
                format!("t_{name}_calldata_ptr"),
            ),
        },
        "address payable" => TypeDescription::new("address payable", "t_address_payable"),
        _ => TypeDescription::new(name, format!("t_{name}")),
    }
}

pub fn contract(name: &str, id: NodeId) -> TypeDescription {
    TypeDescription::new(
        format!("contract {name}"),
        format!("t_contract$_{name}_${}", id.raw()),
    )
}

pub fn mapping(
    key: Option<&TypeDescription>,
    value: Option<&TypeDescription>,
) -> Option<TypeDescription> {
    let (key, value) = (key?, value?);
    Some(TypeDescription::new(
        format!("mapping({} => {})", key.type_string, value.type_string),
        format!(
            "t_mapping$_{}_$_{}_$",
            key.type_identifier, value.type_identifier
        ),
    ))
}

pub fn array(
    base: Option<&TypeDescription>,
    length: Option<&str>,
    location: StorageLocation,
) -> Option<TypeDescription> {
    let base = base?;
    let (string_suffix, identifier_suffix) = match location {
        StorageLocation::Default => ("", "_storage"),
        StorageLocation::Memory => (" memory", "_memory_ptr"),
        StorageLocation::Storage => (" storage ref", "_storage_ptr"),
        StorageLocation::Calldata => (" calldata", "_calldata_ptr"),
    };
    let extent = length.unwrap_or("");
    let identifier_extent = length.unwrap_or("dyn");
    Some(TypeDescription::new(
        format!("{}[{extent}]{string_suffix}", base.type_string),
        format!(
            "t_array$_{}_${identifier_extent}{identifier_suffix}",
            base.type_identifier
        ),
    ))
}

fn signature_lists(descriptions: &[Option<TypeDescription>]) -> Option<(String, String)> {
    let descriptions: Vec<&TypeDescription> =
        descriptions.iter().map(Option::as_ref).collect::<Option<_>>()?;
    let strings: Vec<&str> = descriptions
        .iter()
        .map(|description| description.type_string.as_str())
        .collect();
    let identifiers: Vec<&str> = descriptions
        .iter()
        .map(|description| description.type_identifier.as_str())
        .collect();
    Some((strings.join(","), format!("$_{}_$", identifiers.join("_$_"))))
}

/// Internal function type from parameter and return descriptions.
///
/// Unresolved parameters leave the whole function unresolved.
pub fn function(
    parameters: &[Option<TypeDescription>],
    returns: &[Option<TypeDescription>],
    mutability: StateMutability,
) -> Option<TypeDescription> {
    let (parameter_strings, parameter_identifiers) = signature_lists(parameters)?;
    let (return_strings, return_identifiers) = signature_lists(returns)?;

    let mut type_string = format!("function ({parameter_strings})");
    if mutability != StateMutability::Nonpayable {
        type_string.push(' ');
        type_string.push_str(mutability.as_str());
    }
    if !returns.is_empty() {
        type_string.push_str(&format!(" returns ({return_strings})"));
    }

    Some(TypeDescription::new(
        type_string,
        format!("t_function_internal_{mutability}{parameter_identifiers}returns{return_identifiers}"),
    ))
}

pub fn error(parameters: &[Option<TypeDescription>]) -> Option<TypeDescription> {
    let (strings, identifiers) = signature_lists(parameters)?;
    Some(TypeDescription::new(
        format!("function ({strings}) pure"),
        format!("t_function_error_pure{identifiers}returns$__$"),
    ))
}

pub fn number_literal(text: &str) -> TypeDescription {
    let value = text.replace('_', "");
    TypeDescription::new(
        format!("int_const {value}"),
        format!("t_rational_{value}_by_1"),
    )
}

pub fn hex_number_literal(text: &str) -> TypeDescription {
    let digits = text
        .trim_start_matches("0x")
        .trim_start_matches("0X")
        .replace('_', "");
    match u128::from_str_radix(&digits, 16) {
        Ok(value) => number_literal(&value.to_string()),
        Err(_) => TypeDescription::new(
            format!("int_const {text}"),
            format!("t_rational_{text}_by_1"),
        ),
    }
}

/// String literal; `text` includes its quotes.
pub fn string_literal(text: &str) -> TypeDescription {
    let content = text
        .strip_prefix(['"', '\''])
        .and_then(|rest| rest.strip_suffix(['"', '\'']))
        .unwrap_or(text);
    let hex: String = content.bytes().map(|byte| format!("{byte:02x}")).collect();
    TypeDescription::new(
        format!("literal_string \"{content}\""),
        format!("t_stringliteral_{hex}"),
    )
}

pub fn boolean() -> TypeDescription {
    TypeDescription::new("bool", "t_bool")
}

pub fn address() -> TypeDescription {
    TypeDescription::new("address", "t_address")
}

pub fn uint256() -> TypeDescription {
    TypeDescription::new("uint256", "t_uint256")
}

/// Globally available identifiers that need no declaration.
pub fn magic(name: &str) -> Option<TypeDescription> {
    let description = match name {
        "msg" => TypeDescription::new("msg", "t_magic_message"),
        "block" => TypeDescription::new("block", "t_magic_block"),
        "tx" => TypeDescription::new("tx", "t_magic_transaction"),
        "assert" => TypeDescription::new(
            "function (bool) pure",
            "t_function_assert_pure$_t_bool_$returns$__$",
        ),
        "require" => TypeDescription::new(
            "function (bool,string memory) pure",
            "t_function_require_pure$_t_bool_$_t_string_memory_ptr_$returns$__$",
        ),
        "keccak256" => TypeDescription::new(
            "function (bytes memory) pure returns (bytes32)",
            "t_function_keccak256_pure$_t_bytes_memory_ptr_$returns$_t_bytes32_$",
        ),
        "gasleft" => TypeDescription::new(
            "function () view returns (uint256)",
            "t_function_gasleft_view$__$returns$_t_uint256_$",
        ),
        _ => return None,
    };
    Some(description)
}

/// An elementary type name used as a value, e.g. the callee of `uint256(x)`.
pub fn type_expression(name: &str) -> TypeDescription {
    let inner = elementary(name, StorageLocation::Default);
    TypeDescription::new(
        format!("type({})", inner.type_string),
        format!("t_type${}_$", prefixed(&inner.type_identifier)),
    )
}

fn prefixed(identifier: &str) -> String {
    format!("_{identifier}")
}

pub fn meta_type(inner: Option<&TypeDescription>) -> Option<TypeDescription> {
    let inner = inner?;
    Some(TypeDescription::new(
        format!("type({})", inner.type_string),
        format!("t_magic_meta_type_{}", inner.type_identifier),
    ))
}

pub fn payable() -> TypeDescription {
    elementary("address payable", StorageLocation::Default)
}

pub fn slice(base: Option<&TypeDescription>) -> Option<TypeDescription> {
    let base = base?;
    Some(TypeDescription::new(
        format!("{} slice", base.type_string),
        format!("{}_slice", base.type_identifier),
    ))
}

/// Result of a call given the callee's description.
///
/// Type conversions yield the target type; everything else carries the
/// callee's own description.
pub fn call(callee: Option<&TypeDescription>) -> Option<TypeDescription> {
    let callee = callee?;
    let conversion = callee
        .type_string
        .strip_prefix("type(")
        .and_then(|rest| rest.strip_suffix(')'))
        .zip(
            callee
                .type_identifier
                .strip_prefix("t_type$_")
                .and_then(|rest| rest.strip_suffix("_$")),
        );
    match conversion {
        Some((type_string, type_identifier)) => {
            Some(TypeDescription::new(type_string, type_identifier))
        }
        None => Some(callee.clone()),
    }
}

pub fn binary(
    operator: &str,
    left: Option<&TypeDescription>,
    right: Option<&TypeDescription>,
) -> Option<TypeDescription> {
    match operator {
        "<" | ">" | "<=" | ">=" | "==" | "!=" | "||" | "&&" => Some(boolean()),
        // A number literal takes the type of the other operand.
        _ => match (left, right) {
            (Some(left), Some(right)) if is_number_literal(left) => Some(right.clone()),
            _ => left.or(right).cloned(),
        },
    }
}

fn is_number_literal(description: &TypeDescription) -> bool {
    description.type_identifier.starts_with("t_rational_")
}

pub fn unary(operator: &str, operand: Option<&TypeDescription>) -> Option<TypeDescription> {
    match operator {
        "!" => Some(boolean()),
        _ => operand.cloned(),
    }
}

/// Members whose type is known without a declaration.
pub fn member(base: Option<&TypeDescription>, member: &str) -> Option<TypeDescription> {
    let base_string = base.map(|base| base.type_string.as_str());
    match (base_string, member) {
        (Some("msg"), "sender") | (Some("tx"), "origin") => Some(address()),
        (Some("msg"), "value") | (Some("block"), "timestamp") | (Some("block"), "number") => {
            Some(uint256())
        }
        (Some("msg"), "data") => {
            Some(TypeDescription::new("bytes calldata", "t_bytes_calldata_ptr"))
        }
        (Some("address" | "address payable"), _) => address_member(base_string, member),
        (_, "length") | (_, "balance") => Some(uint256()),
        _ => None,
    }
}

/// Builtin members of `address`; `transfer` and `send` need `address payable`.
fn address_member(base: Option<&str>, member: &str) -> Option<TypeDescription> {
    let payable = base == Some("address payable");
    let description = match member {
        "balance" => uint256(),
        "code" => TypeDescription::new("bytes memory", "t_bytes_memory_ptr"),
        "codehash" => TypeDescription::new("bytes32", "t_bytes32"),
        "call" => TypeDescription::new(
            "function (bytes memory) payable returns (bool,bytes memory)",
            "t_function_barecall_payable$_t_bytes_memory_ptr_$returns$_t_bool_$_t_bytes_memory_ptr_$",
        ),
        "delegatecall" => TypeDescription::new(
            "function (bytes memory) returns (bool,bytes memory)",
            "t_function_baredelegatecall_nonpayable$_t_bytes_memory_ptr_$returns$_t_bool_$_t_bytes_memory_ptr_$",
        ),
        "staticcall" => TypeDescription::new(
            "function (bytes memory) view returns (bool,bytes memory)",
            "t_function_barestaticcall_view$_t_bytes_memory_ptr_$returns$_t_bool_$_t_bytes_memory_ptr_$",
        ),
        "transfer" if payable => TypeDescription::new(
            "function (uint256)",
            "t_function_transfer_nonpayable$_t_uint256_$returns$__$",
        ),
        "send" if payable => TypeDescription::new(
            "function (uint256) returns (bool)",
            "t_function_send_nonpayable$_t_uint256_$returns$_t_bool_$",
        ),
        _ => return None,
    };
    Some(description)
}
