//! Error types for ABI generation

use derive_more::{Display, From};

pub type AbiResult<T> = Result<T, AbiError>;

#[derive(Clone, Display, Debug, From, PartialEq)]
#[display("{kind}")]
pub struct AbiError {
    #[from]
    kind: Box<AbiErrorKind>,
}

impl From<AbiErrorKind> for AbiError {
    fn from(kind: AbiErrorKind) -> Self {
        AbiError {
            kind: Box::new(kind),
        }
    }
}

impl AbiError {
    pub(crate) fn untyped_parameter(method: &str, parameter: &str, position: usize) -> Self {
        AbiErrorKind::UntypedParameter {
            method: method.to_string(),
            parameter: parameter.to_string(),
            position,
        }
        .into()
    }

    pub(crate) fn serialize(error: serde_json::Error) -> Self {
        AbiErrorKind::Serialize(error.to_string()).into()
    }

    pub fn kind(&self) -> &AbiErrorKind {
        &self.kind
    }
}

#[derive(Clone, Display, Debug, PartialEq, Eq)]
pub enum AbiErrorKind {
    /// The parameter's type was never resolved.
    #[display("parameter {position} (`{parameter}`) of `{method}` has no type description")]
    UntypedParameter {
        method: String,
        parameter: String,
        position: usize,
    },

    #[display("ABI serialization failed: {_0}")]
    Serialize(String),
}

impl std::error::Error for AbiError {}
