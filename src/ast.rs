//! Stylesheet tree types shared by the parser and the reducer

use crate::error::Result;
use std::fmt;

/// Kind of a stylesheet tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// `@name ...` block or statement; the name keeps its `@`.
    AtRule(String),
    /// Style rule with a selector list.
    Rule,
    /// `property: value` declaration.
    Declaration,
    /// `/* ... */` comment.
    Comment,
}

impl NodeKind {
    pub fn is_at_rule(&self, name: &str) -> bool {
        matches!(self, NodeKind::AtRule(n) if n == name)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::AtRule(name) => write!(f, "{}", name),
            NodeKind::Rule => write!(f, "rule"),
            NodeKind::Declaration => write!(f, "decl"),
            NodeKind::Comment => write!(f, "comm"),
        }
    }
}

/// Node of the stylesheet tree
#[derive(Debug, Clone, PartialEq)]
pub struct StyleNode {
    pub kind: NodeKind,
    /// Ordered selector texts (rules) or prelude (at-rules). Absent for
    /// declarations and comments.
    pub props: Option<Vec<String>>,
    /// Raw text of declarations and comments.
    pub value: Option<String>,
    pub children: Vec<StyleNode>,
    pub line: usize,
}

impl StyleNode {
    pub fn rule(selectors: Vec<String>, children: Vec<StyleNode>, line: usize) -> Self {
        Self {
            kind: NodeKind::Rule,
            props: Some(selectors),
            value: None,
            children,
            line,
        }
    }

    pub fn at_rule(name: impl Into<String>, props: Vec<String>, children: Vec<StyleNode>, line: usize) -> Self {
        Self {
            kind: NodeKind::AtRule(name.into()),
            props: Some(props),
            value: None,
            children,
            line,
        }
    }

    pub fn declaration(text: impl Into<String>, line: usize) -> Self {
        Self {
            kind: NodeKind::Declaration,
            props: None,
            value: Some(text.into()),
            children: Vec::new(),
            line,
        }
    }

    pub fn comment(text: impl Into<String>, line: usize) -> Self {
        Self {
            kind: NodeKind::Comment,
            props: None,
            value: Some(text.into()),
            children: Vec::new(),
            line,
        }
    }

    /// Number of nodes in this subtree, including self.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(StyleNode::subtree_len).sum::<usize>()
    }
}

/// Declaration kinds the component model is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    /// `@scope (.name)` component declaration.
    Scope,
    /// Style rule inside (or after) a scope.
    Rule,
}

/// Flattened tree node kept by the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub props: Vec<String>,
    pub line: usize,
}

impl Declaration {
    pub fn first_prop(&self) -> Option<&str> {
        self.props.first().map(String::as_str)
    }
}

/// Anything that turns stylesheet text into a tree of [`StyleNode`]s.
///
/// The component pipeline only depends on this contract, so another CSS
/// front end can be swapped in for [`crate::parser::CssParser`].
pub trait StylesheetParser {
    fn parse_stylesheet(&self, source: &str, filename: &str) -> Result<Vec<StyleNode>>;
}
