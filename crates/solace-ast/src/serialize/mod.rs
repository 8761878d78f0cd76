//! Structured document (JSON) and binary envelope (MessagePack) forms.

mod envelope;
mod error;
mod json;

pub use envelope::{Envelope, Field, from_bytes, pack, to_bytes, unpack};
pub use error::{CodecError, CodecResult};
pub use json::{
    decode_node, from_json, node_type_of, source_unit_from_json, to_json, to_json_pretty,
};
