use serde::{Deserialize, Serialize};
use solace_core::TypeDescription;

/// One ABI entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub inputs: Vec<MethodIO>,
    pub outputs: Vec<MethodIO>,
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde(rename = "stateMutability", default, skip_serializing_if = "String::is_empty")]
    pub state_mutability: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodIO {
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde(rename = "internalType")]
    pub internal_type: String,
}

impl MethodIO {
    /// Both `type` and `internalType` carry the description's type string
    /// as written, data location included.
    pub fn new(name: impl Into<String>, description: &TypeDescription) -> Self {
        Self {
            name: name.into(),
            r#type: description.type_string.clone(),
            internal_type: description.type_string.clone(),
        }
    }
}
