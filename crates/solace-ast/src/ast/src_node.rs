use serde::{Deserialize, Serialize};
use solace_core::{NodeId, Span};
use solace_cst::CstNode;

/// Source location of a node plus the id of its logical parent.
///
/// `line` is 1-based, `column` 0-based, `end` exclusive and
/// `length == end - start`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SrcNode {
    pub line: usize,
    pub column: usize,
    pub start: usize,
    pub end: usize,
    pub length: usize,
    #[serde(default)]
    pub parent_index: Option<NodeId>,
}

impl SrcNode {
    pub fn from_cst(node: &CstNode, parent_index: Option<NodeId>) -> Self {
        Self {
            line: node.line(),
            column: node.column(),
            start: node.start_byte,
            end: node.end_byte,
            length: node.end_byte.saturating_sub(node.start_byte),
            parent_index,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}
