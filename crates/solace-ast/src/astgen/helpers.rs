//! Small CST accessors shared by the lowering modules.

use solace_cst::CstNode;

use crate::error::{BuildError, BuildResult};

/// Check if a node is a comment (should be skipped).
pub fn is_comment(node: &CstNode) -> bool {
    matches!(node.kind(), "comment" | "line_comment" | "block_comment")
}

/// Named children that carry syntax.
pub fn significant_children(node: &CstNode) -> impl Iterator<Item = &CstNode> {
    node.named_children().filter(|child| !is_comment(child))
}

pub fn required<'a>(node: &'a CstNode, field: &'static str) -> BuildResult<&'a CstNode> {
    node.child_by_field_name(field)
        .ok_or_else(|| BuildError::missing_field(node, field))
}

/// Text with runs of whitespace collapsed to one space.
pub fn normalized_text(node: &CstNode) -> String {
    node.text().split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn field_text(node: &CstNode, field: &str) -> Option<String> {
    node.child_by_field_name(field).map(normalized_text)
}

/// Operator of a unary or binary production: its `operator` field, else its
/// first anonymous token.
pub fn operator_text(node: &CstNode) -> BuildResult<String> {
    node.child_by_field_name("operator")
        .or_else(|| node.tokens().next())
        .map(normalized_text)
        .ok_or_else(|| BuildError::missing_field(node, "operator"))
}

/// Expressions inside the `arguments` call argument list.
pub fn call_arguments(node: &CstNode) -> Vec<&CstNode> {
    node.child_by_field_name("arguments")
        .map(|arguments| significant_children(arguments).collect())
        .unwrap_or_default()
}
