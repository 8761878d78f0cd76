//! Error types for IR construction

use derive_more::{Display, From};
use solace_core::NodeId;

pub type IrResult<T> = Result<T, IrError>;

#[derive(Clone, Display, Debug, From, PartialEq)]
#[display("{kind}")]
pub struct IrError {
    #[from]
    kind: Box<IrErrorKind>,
}

impl From<IrErrorKind> for IrError {
    fn from(kind: IrErrorKind) -> Self {
        IrError {
            kind: Box::new(kind),
        }
    }
}

impl IrError {
    pub(crate) fn duplicate_entry_point(contract: &str, entry: &'static str, id: NodeId) -> Self {
        IrErrorKind::DuplicateEntryPoint {
            contract: contract.to_string(),
            entry,
            id,
        }
        .into()
    }

    pub fn kind(&self) -> &IrErrorKind {
        &self.kind
    }
}

#[derive(Clone, Display, Debug, PartialEq, Eq)]
pub enum IrErrorKind {
    /// A contract declares a second constructor, receive or fallback.
    #[display("contract `{contract}` declares more than one {entry} (second at {id})")]
    DuplicateEntryPoint {
        contract: String,
        entry: &'static str,
        id: NodeId,
    },
}

impl std::error::Error for IrError {}
