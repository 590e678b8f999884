//! Flattens a stylesheet tree into the declarations the component model needs

use crate::ast::{Declaration, DeclarationKind, NodeKind, StyleNode};
use crate::types::SCOPE_AT_RULE;

/// Walks `nodes` in document order (pre-order, self before children) and
/// keeps every `@scope` and style rule node that carries a props list.
///
/// Children are visited for every node, kept or not, so declarations nested
/// in unrelated wrappers such as `@media` are still found.
pub fn reduce(nodes: &[StyleNode]) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    visit(nodes, &mut declarations);
    declarations
}

fn visit(nodes: &[StyleNode], out: &mut Vec<Declaration>) {
    for node in nodes {
        if let (Some(kind), Some(props)) = (declaration_kind(&node.kind), &node.props) {
            out.push(Declaration {
                kind,
                props: props.clone(),
                line: node.line,
            });
        }
        visit(&node.children, out);
    }
}

fn declaration_kind(kind: &NodeKind) -> Option<DeclarationKind> {
    match kind {
        NodeKind::AtRule(_) if kind.is_at_rule(SCOPE_AT_RULE) => Some(DeclarationKind::Scope),
        NodeKind::Rule => Some(DeclarationKind::Rule),
        _ => None,
    }
}
