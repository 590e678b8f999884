//! Core types and constants for the Mist compiler

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// Stylesheet conventions
pub const SCOPE_AT_RULE: &str = "@scope";
pub const SELF_REFERENCE_MARKER: &str = ":scope";
pub const DATA_ATTRIBUTE_PREFIX: &str = "data-";

// File naming conventions
pub const STYLESHEET_SUFFIX: &str = ".mist.css";
pub const OUTPUT_EXTENSION: &str = "tsx";

/// At-rules that keep the enclosing selector context for their children.
pub const CONDITIONAL_AT_RULES: &[&str] = &[
    "@scope",
    "@media",
    "@supports",
    "@container",
    "@layer",
    "@document",
];

/// How a data attribute is exposed on the generated component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "values", rename_all = "lowercase")]
pub enum AttributeSpec {
    /// Closed set of string values, in first-seen order, without duplicates.
    Enum(Vec<String>),
    /// Presence-only attribute.
    Boolean,
}

impl fmt::Display for AttributeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeSpec::Enum(values) => write!(f, "enum({})", values.join(", ")),
            AttributeSpec::Boolean => write!(f, "boolean"),
        }
    }
}

/// A component declared by one `@scope` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Component {
    /// Element the component renders as. Empty until a `<tag>:scope` rule binds it.
    pub tag: String,
    /// Data attributes keyed by camelCase name, in first-seen order.
    pub data: IndexMap<String, AttributeSpec>,
}

impl Component {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self) -> bool {
        !self.tag.is_empty()
    }
}

/// Components keyed by PascalCase name, in order of first declaration.
pub type Components = IndexMap<String, Component>;

/// Whether a stylesheet may declare one component or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentMode {
    /// Exactly one `@scope`, which must bind a tag.
    Single,
    /// Any number of `@scope` blocks.
    #[default]
    Multi,
}

impl fmt::Display for ComponentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentMode::Single => write!(f, "single"),
            ComponentMode::Multi => write!(f, "multi"),
        }
    }
}
