use derive_more::Display;

use crate::ast::NodeType;

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Debug, Display)]
pub enum CodecError {
    #[display("JSON error: {_0}")]
    Json(serde_json::Error),

    #[display("envelope encode error: {_0}")]
    EnvelopeEncode(rmp_serde::encode::Error),

    #[display("envelope decode error: {_0}")]
    EnvelopeDecode(rmp_serde::decode::Error),

    #[display("node has no `node_type` discriminator")]
    MissingDiscriminator,

    #[display("unknown node type `{_0}`")]
    UnknownNodeType(String),

    /// Type-bearing nodes must carry a description in the binary form.
    #[display("{node_type} #{id} has no type description")]
    MissingTypeDescription { node_type: NodeType, id: u64 },

    #[display("expected {expected}, found {found}")]
    UnexpectedNode { expected: NodeType, found: NodeType },

    #[display("malformed envelope: {_0}")]
    MalformedEnvelope(String),
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Json(error) => Some(error),
            CodecError::EnvelopeEncode(error) => Some(error),
            CodecError::EnvelopeDecode(error) => Some(error),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(error: serde_json::Error) -> Self {
        CodecError::Json(error)
    }
}

impl From<rmp_serde::encode::Error> for CodecError {
    fn from(error: rmp_serde::encode::Error) -> Self {
        CodecError::EnvelopeEncode(error)
    }
}

impl From<rmp_serde::decode::Error> for CodecError {
    fn from(error: rmp_serde::decode::Error) -> Self {
        CodecError::EnvelopeDecode(error)
    }
}
