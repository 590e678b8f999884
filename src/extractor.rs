//! Data attribute matcher extraction
//!
//! A selector can carry two kinds of matchers:
//!
//! - `[data-size='sm']` declares one value of an enumerated attribute
//! - `[data-disabled]` declares a boolean (presence-only) attribute
//!
//! Both scans are independent; callers run the enum scan first so that a
//! name classified as enum is never downgraded to boolean.

use crate::types::AttributeSpec;
use crate::utils::camel_case;
use regex::Regex;

/// One classified matcher found in a selector, with its name in camelCase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeMatch {
    Enum { name: String, value: String },
    Boolean { name: String },
}

impl AttributeMatch {
    pub fn name(&self) -> &str {
        match self {
            AttributeMatch::Enum { name, .. } | AttributeMatch::Boolean { name } => name,
        }
    }

    /// Starting spec for an attribute first classified by this match.
    pub fn initial_spec(&self) -> AttributeSpec {
        match self {
            AttributeMatch::Enum { value, .. } => AttributeSpec::Enum(vec![value.clone()]),
            AttributeMatch::Boolean { .. } => AttributeSpec::Boolean,
        }
    }
}

pub struct AttributeExtractor {
    enum_regex: Regex,
    boolean_regex: Regex,
}

impl AttributeExtractor {
    pub fn new() -> Self {
        Self {
            enum_regex: Regex::new(
                r#"\[\s*data-(?P<attribute>[a-z][a-z0-9-]*)\s*=\s*(?:'(?P<single>(?:[^'\\]|\\.)*)'|"(?P<double>(?:[^"\\]|\\.)*)")\s*\]"#,
            )
            .expect("enum attribute pattern is valid"),
            boolean_regex: Regex::new(r"\[\s*data-(?P<attribute>[a-z][a-z0-9-]*)\s*\]")
                .expect("boolean attribute pattern is valid"),
        }
    }

    /// `[data-<name>='<value>']` matchers, in selector order.
    pub fn enum_matches(&self, selector: &str) -> Vec<AttributeMatch> {
        self.enum_regex
            .captures_iter(selector)
            .filter_map(|caps| {
                let attribute = caps.name("attribute")?;
                let value = caps.name("single").or_else(|| caps.name("double"))?;
                Some(AttributeMatch::Enum {
                    name: camel_case(attribute.as_str()),
                    value: unescape_css_string(value.as_str()),
                })
            })
            .collect()
    }

    /// `[data-<name>]` matchers, in selector order.
    pub fn boolean_matches(&self, selector: &str) -> Vec<AttributeMatch> {
        self.boolean_regex
            .captures_iter(selector)
            .filter_map(|caps| {
                let attribute = caps.name("attribute")?;
                Some(AttributeMatch::Boolean {
                    name: camel_case(attribute.as_str()),
                })
            })
            .collect()
    }

    /// All matchers of a selector: every enum match, then every boolean match.
    pub fn extract(&self, selector: &str) -> Vec<AttributeMatch> {
        let mut matches = self.enum_matches(selector);
        matches.extend(self.boolean_matches(selector));
        matches
    }
}

/// Resolves CSS string escapes: `\'` becomes `'`, `\26 ` becomes `&`.
fn unescape_css_string(raw: &str) -> String {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }

        let mut hex = String::new();
        while hex.len() < 6 {
            match chars.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    hex.push(*c);
                    chars.next();
                }
                _ => break,
            }
        }

        if hex.is_empty() {
            if let Some(escaped) = chars.next() {
                value.push(escaped);
            }
            continue;
        }

        if chars.peek().map_or(false, |c| c.is_whitespace()) {
            chars.next();
        }
        let code = u32::from_str_radix(&hex, 16).unwrap_or(0);
        value.push(match char::from_u32(code) {
            Some(c) if code != 0 => c,
            _ => char::REPLACEMENT_CHARACTER,
        });
    }

    value
}

impl Default for AttributeExtractor {
    fn default() -> Self {
        Self::new()
    }
}
