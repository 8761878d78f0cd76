//! Structured document form.
//!
//! Nodes serialize as their plain struct. Decoding a polymorphic position
//! reads the raw value, extracts `node_type` and dispatches to the variant
//! that tag names; fixed-shape children decode directly through their
//! derived impls.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::error::{CodecError, CodecResult};
use crate::ast::{AstNode, Node, NodeType, SourceUnit};

/// Read the discriminator of a raw node value.
pub fn node_type_of(value: &Value) -> CodecResult<NodeType> {
    let tag = value
        .get("node_type")
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingDiscriminator)?;
    NodeType::from_tag(tag).ok_or_else(|| CodecError::UnknownNodeType(tag.to_string()))
}

/// Decode a raw value into the variant its `node_type` names.
pub fn decode_node(value: Value) -> CodecResult<Node> {
    let node = match node_type_of(&value)? {
        NodeType::SourceUnit => Node::SourceUnit(serde_json::from_value(value)?),
        NodeType::PragmaDirective => Node::Pragma(serde_json::from_value(value)?),
        NodeType::ContractDefinition => Node::Contract(serde_json::from_value(value)?),
        NodeType::VariableDeclaration => Node::VariableDeclaration(serde_json::from_value(value)?),
        NodeType::FunctionDefinition => Node::Function(serde_json::from_value(value)?),
        NodeType::ParameterList => Node::ParameterList(serde_json::from_value(value)?),
        NodeType::Parameter => Node::Parameter(serde_json::from_value(value)?),
        NodeType::ErrorDefinition => Node::Error(serde_json::from_value(value)?),
        NodeType::TypeName => Node::TypeName(serde_json::from_value(value)?),
        NodeType::Block => Node::Body(serde_json::from_value(value)?),
        NodeType::RevertStatement => Node::Revert(serde_json::from_value(value)?),
        NodeType::ReturnStatement => Node::Return(serde_json::from_value(value)?),
        NodeType::BinaryOperation => Node::BinaryOperation(serde_json::from_value(value)?),
        NodeType::Assignment => Node::Assignment(serde_json::from_value(value)?),
        NodeType::FunctionCall => Node::FunctionCall(serde_json::from_value(value)?),
        NodeType::FunctionCallOption => Node::FunctionCallOption(serde_json::from_value(value)?),
        NodeType::MemberAccess => Node::MemberAccess(serde_json::from_value(value)?),
        NodeType::Identifier | NodeType::Literal => Node::Primary(serde_json::from_value(value)?),
        NodeType::IndexAccess => Node::IndexAccess(serde_json::from_value(value)?),
        NodeType::IndexRangeAccess => Node::IndexRangeAccess(serde_json::from_value(value)?),
        NodeType::MetaType => Node::MetaType(serde_json::from_value(value)?),
        NodeType::PayableConversion => Node::PayableConversion(serde_json::from_value(value)?),
        NodeType::UnaryOperation => Node::UnaryOperation(serde_json::from_value(value)?),
        NodeType::NewExpression => Node::NewExpression(serde_json::from_value(value)?),
        NodeType::TupleExpression => Node::Tuple(serde_json::from_value(value)?),
    };
    Ok(node)
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        decode_node(value).map_err(serde::de::Error::custom)
    }
}

pub fn to_json<T: Serialize + ?Sized>(node: &T) -> CodecResult<String> {
    Ok(serde_json::to_string(node)?)
}

pub fn to_json_pretty<T: Serialize + ?Sized>(node: &T) -> CodecResult<String> {
    Ok(serde_json::to_string_pretty(node)?)
}

/// Decode any node from a JSON document.
pub fn from_json(json: &str) -> CodecResult<Node> {
    decode_node(serde_json::from_str(json)?)
}

pub fn source_unit_from_json(json: &str) -> CodecResult<SourceUnit> {
    match from_json(json)? {
        Node::SourceUnit(unit) => Ok(unit),
        other => Err(CodecError::UnexpectedNode {
            expected: NodeType::SourceUnit,
            found: other.node_type(),
        }),
    }
}
