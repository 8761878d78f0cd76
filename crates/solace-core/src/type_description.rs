use serde::{Deserialize, Serialize};

/// Canonical description of an expression's type.
///
/// `type_string` is the human-readable form (`uint256`, `tuple(uint256,bool)`),
/// `type_identifier` the mangled form downstream ABI tooling keys on
/// (`t_uint256`, `t_tuple_$_t_uint256_$_t_bool$`). A node whose description is
/// not known yet carries `None` instead of a partially filled value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescription {
    pub type_string: String,
    pub type_identifier: String,
}

impl TypeDescription {
    pub fn new(type_string: impl Into<String>, type_identifier: impl Into<String>) -> Self {
        Self {
            type_string: type_string.into(),
            type_identifier: type_identifier.into(),
        }
    }
}

impl std::fmt::Display for TypeDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.type_string, self.type_identifier)
    }
}
