//! Adapter from a live tree-sitter parse to the owned [`CstNode`] model.

use derive_more::Display;
use ropey::Rope;
use tree_sitter::{Language, LanguageError, Node, Parser};

use crate::{CstNode, Point};

/// Failure to obtain a tree from a grammar.
#[derive(Debug, Display)]
pub enum CstError {
    #[display("grammar rejected: {_0}")]
    Language(LanguageError),
    #[display("parser produced no tree")]
    NoTree,
}

impl std::error::Error for CstError {}

impl From<LanguageError> for CstError {
    fn from(err: LanguageError) -> Self {
        CstError::Language(err)
    }
}

/// Parse `source` with a caller-supplied grammar and convert the result.
pub fn parse_with(language: &Language, source: &str) -> Result<CstNode, CstError> {
    let mut parser = Parser::new();
    parser.set_language(language)?;
    let tree = parser.parse(source, None).ok_or(CstError::NoTree)?;
    let rope = Rope::from_str(source);
    Ok(from_tree_sitter(tree.root_node(), &rope))
}

/// Copy a tree-sitter subtree into an owned [`CstNode`].
///
/// Comments and other `extra` nodes are dropped; field labels are read off
/// the cursor so the front end can address children by role.
pub fn from_tree_sitter(node: Node, source: &Rope) -> CstNode {
    convert(node, None, source)
}

fn convert(node: Node, field: Option<&str>, source: &Rope) -> CstNode {
    let mut children = Vec::new();
    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            if !child.is_extra() {
                children.push(convert(child, cursor.field_name(), source));
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    let position = node.start_position();
    CstNode {
        kind: node.kind().to_string(),
        field: field.map(str::to_string),
        named: node.is_named(),
        text: node_text(&node, source),
        start: Point::new(position.row, position.column),
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
        children,
    }
}

fn node_text(node: &Node, source: &Rope) -> String {
    let end = node.end_byte().min(source.len_bytes());
    let start = node.start_byte().min(end);
    source.byte_slice(start..end).to_string()
}
