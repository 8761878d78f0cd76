//! Binary envelope form.
//!
//! Every node becomes `{type_name, payload}` where `type_name` is the
//! variant's envelope name and `payload` maps field names to plain values,
//! nested envelopes or lists of envelopes. Bytes are MessagePack.
//!
//! Unlike the structured document, the envelope never carries a type-bearing
//! node without its description: encoding such a node fails.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{CodecError, CodecResult};
use super::json::{decode_node, node_type_of};
use crate::ast::{Node, NodeType};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub type_name: String,
    pub payload: BTreeMap<String, Field>,
}

/// One payload entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    Node(Envelope),
    Nodes(Vec<Envelope>),
    Value(Value),
}

impl Envelope {
    pub fn node_type(&self) -> Option<NodeType> {
        NodeType::from_envelope_name(&self.type_name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.payload.get(name)
    }
}

/// Pack any serializable node.
pub fn pack<T: Serialize + ?Sized>(node: &T) -> CodecResult<Envelope> {
    pack_value(serde_json::to_value(node)?)
}

fn is_node(value: &Value) -> bool {
    value.get("id").is_some_and(Value::is_u64)
        && value
            .get("node_type")
            .and_then(Value::as_str)
            .and_then(NodeType::from_tag)
            .is_some()
}

fn pack_value(value: Value) -> CodecResult<Envelope> {
    let node_type = node_type_of(&value)?;
    let Value::Object(fields) = value else {
        return Err(CodecError::MalformedEnvelope(format!(
            "{node_type} is not an object"
        )));
    };

    if node_type.is_type_bearing()
        && fields.get("type_description").is_none_or(Value::is_null)
    {
        let id = fields.get("id").and_then(Value::as_u64).unwrap_or_default();
        tracing::warn!("refusing to pack {} #{} without a type description", node_type, id);
        return Err(CodecError::MissingTypeDescription { node_type, id });
    }

    let payload = fields
        .into_iter()
        .map(|(name, value)| pack_field(value).map(|field| (name, field)))
        .collect::<CodecResult<BTreeMap<_, _>>>()?;

    Ok(Envelope {
        type_name: node_type.envelope_name().to_string(),
        payload,
    })
}

fn pack_field(value: Value) -> CodecResult<Field> {
    if is_node(&value) {
        return pack_value(value).map(Field::Node);
    }
    match value {
        Value::Array(items) if !items.is_empty() && items.iter().all(is_node) => items
            .into_iter()
            .map(pack_value)
            .collect::<CodecResult<Vec<_>>>()
            .map(Field::Nodes),
        other => Ok(Field::Value(other)),
    }
}

/// Rebuild the node an envelope carries.
pub fn unpack(envelope: Envelope) -> CodecResult<Node> {
    decode_node(unpack_value(envelope)?)
}

fn unpack_value(envelope: Envelope) -> CodecResult<Value> {
    let expected = envelope
        .node_type()
        .ok_or_else(|| CodecError::UnknownNodeType(envelope.type_name.clone()))?;

    let mut fields = Map::new();
    for (name, field) in envelope.payload {
        let value = match field {
            Field::Node(node) => unpack_value(node)?,
            Field::Nodes(nodes) => Value::Array(
                nodes
                    .into_iter()
                    .map(unpack_value)
                    .collect::<CodecResult<Vec<_>>>()?,
            ),
            Field::Value(value) => value,
        };
        fields.insert(name, value);
    }

    let value = Value::Object(fields);
    let found = node_type_of(&value)?;
    if found != expected {
        return Err(CodecError::MalformedEnvelope(format!(
            "`{}` envelope carries a {found} payload",
            expected.envelope_name()
        )));
    }
    Ok(value)
}

/// Pack a node and encode it as MessagePack.
pub fn to_bytes<T: Serialize + ?Sized>(node: &T) -> CodecResult<Vec<u8>> {
    Ok(rmp_serde::to_vec_named(&pack(node)?)?)
}

pub fn from_bytes(bytes: &[u8]) -> CodecResult<Node> {
    let envelope: Envelope = rmp_serde::from_slice(bytes)?;
    unpack(envelope)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ast::AstNode;

    fn identifier(id: u64, type_description: Value) -> Value {
        json!({
            "id": id,
            "node_type": "IDENTIFIER",
            "src": {"line": 1, "column": 1, "start": 1, "end": 2, "length": 1, "parent_index": 1},
            "kind": "identifier",
            "name": "a",
            "type_description": type_description
        })
    }

    fn tuple(component: Value) -> Node {
        decode_node(json!({
            "id": 1,
            "node_type": "TUPLE_EXPRESSION",
            "src": {"line": 1, "column": 0, "start": 0, "end": 3, "length": 3},
            "is_pure": false,
            "components": [component],
            "type_description": {"type_string": "tuple(uint256)", "type_identifier": "t_tuple_$_t_uint256$"}
        }))
        .unwrap()
    }

    #[test]
    fn test_pack_uses_envelope_names() {
        let node = tuple(identifier(2, json!({"type_string": "uint256", "type_identifier": "t_uint256"})));

        let envelope = pack(&node).unwrap();
        assert_eq!(envelope.type_name, "Tuple");
        let Some(Field::Nodes(components)) = envelope.field("components") else {
            panic!("components should pack as envelopes");
        };
        assert_eq!(components[0].type_name, "Identifier");
        assert!(matches!(envelope.field("src"), Some(Field::Value(_))));
    }

    #[test]
    fn test_missing_description_fails_encode() {
        let node = tuple(identifier(2, Value::Null));

        let error = to_bytes(&node).unwrap_err();
        assert!(matches!(
            error,
            CodecError::MissingTypeDescription { node_type: NodeType::Identifier, id: 2 }
        ));
    }

    #[test]
    fn test_bytes_round_trip() {
        let node = tuple(identifier(2, json!({"type_string": "uint256", "type_identifier": "t_uint256"})));

        let bytes = to_bytes(&node).unwrap();
        let decoded = from_bytes(&bytes).unwrap();
        assert_eq!(decoded, node);
        assert_eq!(decoded.children()[0].id().raw(), 2);
    }

    #[test]
    fn test_unknown_envelope_name_fails() {
        let envelope = Envelope {
            type_name: "EventDefinition".to_string(),
            payload: BTreeMap::new(),
        };
        assert!(matches!(unpack(envelope), Err(CodecError::UnknownNodeType(_))));
    }

    #[test]
    fn test_mismatched_payload_fails() {
        let node = tuple(identifier(2, json!({"type_string": "uint256", "type_identifier": "t_uint256"})));
        let mut envelope = pack(&node).unwrap();
        envelope.type_name = "Literal".to_string();

        assert!(matches!(unpack(envelope), Err(CodecError::MalformedEnvelope(_))));
    }
}
