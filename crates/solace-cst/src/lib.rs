//! Concrete syntax tree handed over by the external grammar.
//!
//! The front end never talks to a grammar directly. Whatever parser produced
//! the tree (a tree-sitter grammar through [`from_tree_sitter`], or a
//! serialized JSON document) delivers it as an owned [`CstNode`] tree that
//! mirrors tree-sitter's node model: a production `kind`, an optional field
//! label assigned by the parent production, named/anonymous distinction,
//! 0-based positions and an exclusive end byte.

mod tree_sitter;

use serde::{Deserialize, Serialize};
use solace_core::Span;

pub use crate::tree_sitter::{CstError, from_tree_sitter, parse_with};

/// A position in the source text (0-based row and byte column).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// One node of the concrete parse tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CstNode {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default = "named_by_default")]
    pub named: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub start: Point,
    #[serde(default)]
    pub start_byte: usize,
    #[serde(default)]
    pub end_byte: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CstNode>,
}

fn named_by_default() -> bool {
    true
}

impl CstNode {
    /// A named interior node.
    pub fn branch(kind: impl Into<String>, children: Vec<CstNode>) -> Self {
        Self {
            kind: kind.into(),
            field: None,
            named: true,
            text: String::new(),
            start: Point::default(),
            start_byte: 0,
            end_byte: 0,
            children,
        }
    }

    /// A named leaf carrying its own text, e.g. `identifier` or `number_literal`.
    pub fn leaf(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::branch(kind, Vec::new())
        }
    }

    /// An anonymous token such as `+`, `(` or `pragma`.
    pub fn token(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            named: false,
            ..Self::leaf(text.clone(), text)
        }
    }

    /// Assign the field label this node occupies in its parent production.
    pub fn labeled(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Lay leaves out left to right on a single line, separated by one space,
    /// and derive every node's span and text from that layout.
    ///
    /// Trees synthesized by hand (tools, tests) have no source behind them;
    /// after `layout` they look exactly like trees read from real text.
    pub fn layout(mut self) -> Self {
        let mut source = String::new();
        self.layout_into(&mut source);
        self
    }

    fn layout_into(&mut self, source: &mut String) {
        if self.children.is_empty() {
            if !source.is_empty() {
                source.push(' ');
            }
            self.start_byte = source.len();
            source.push_str(&self.text);
            self.end_byte = source.len();
            self.start = Point::new(0, self.start_byte);
            return;
        }

        for child in &mut self.children {
            child.layout_into(source);
        }

        let (start, start_byte) = (self.children[0].start, self.children[0].start_byte);
        let end_byte = self.children[self.children.len() - 1].end_byte;
        self.start = start;
        self.start_byte = start_byte;
        self.end_byte = end_byte;
        self.text = source[start_byte..end_byte].to_string();
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_named(&self) -> bool {
        self.named
    }

    pub fn children(&self) -> &[CstNode] {
        &self.children
    }

    /// Byte span of this node.
    pub fn span(&self) -> Span {
        Span::new(self.start_byte, self.end_byte)
    }

    /// 1-based line of the first byte.
    pub fn line(&self) -> usize {
        self.start.row + 1
    }

    /// 0-based column of the first byte.
    pub fn column(&self) -> usize {
        self.start.column
    }

    /// First child carrying the given field label.
    pub fn child_by_field_name(&self, field: &str) -> Option<&CstNode> {
        self.children
            .iter()
            .find(|child| child.field.as_deref() == Some(field))
    }

    /// All children carrying the given field label, in source order.
    pub fn children_by_field_name<'a>(
        &'a self,
        field: &'a str,
    ) -> impl Iterator<Item = &'a CstNode> + 'a {
        self.children
            .iter()
            .filter(move |child| child.field.as_deref() == Some(field))
    }

    /// Named children, in source order.
    pub fn named_children(&self) -> impl Iterator<Item = &CstNode> {
        self.children.iter().filter(|child| child.named)
    }

    pub fn first_named_child(&self) -> Option<&CstNode> {
        self.named_children().next()
    }

    /// Anonymous tokens, in source order.
    pub fn tokens(&self) -> impl Iterator<Item = &CstNode> {
        self.children.iter().filter(|child| !child.named)
    }

    /// Whether an anonymous token with this text is a direct child.
    pub fn has_token(&self, text: &str) -> bool {
        self.tokens().any(|token| token.text == text)
    }
}
