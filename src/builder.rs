//! Component model construction
//!
//! One pass over the reduced declarations. A `@scope (.name)` declaration
//! opens a component and makes it current; the style rules that follow bind
//! its tag (`<tag>:scope`) or add data attributes to it.
//!
//! Classification policy: for each selector the enum scan runs before the
//! boolean scan, and an attribute keeps the kind it was given at its first
//! match. Later matches of the other kind for the same name are ignored.

use crate::ast::{Declaration, DeclarationKind};
use crate::error::{CompilerError, Result};
use crate::extractor::{AttributeExtractor, AttributeMatch};
use crate::types::{AttributeSpec, Component, ComponentMode, Components, SELF_REFERENCE_MARKER};
use crate::utils::pascal_case;
use indexmap::map::Entry;
use regex::Regex;

/// Which component following rules apply to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    NoCurrent,
    Has(String),
}

impl Cursor {
    /// Transition taken on every scope declaration.
    pub fn enter_scope(&mut self, name: String) {
        *self = Cursor::Has(name);
    }

    pub fn current(&self) -> Option<&str> {
        match self {
            Cursor::NoCurrent => None,
            Cursor::Has(name) => Some(name),
        }
    }
}

/// Outcome of applying one matcher to a component's data map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergeOutcome {
    Added,
    Unchanged,
    Conflict,
}

pub struct ComponentModelBuilder {
    filename: String,
    mode: ComponentMode,
    extractor: AttributeExtractor,
    scope_class_regex: Regex,
    cursor: Cursor,
    components: Components,
    scope_count: usize,
    bound_tags: usize,
}

impl ComponentModelBuilder {
    pub fn new(filename: impl Into<String>, mode: ComponentMode) -> Self {
        Self {
            filename: filename.into(),
            mode,
            extractor: AttributeExtractor::new(),
            scope_class_regex: Regex::new(r"^\(\s*\.(?P<class>-?[_a-zA-Z][_a-zA-Z0-9-]*)")
                .expect("scope class pattern is valid"),
            cursor: Cursor::NoCurrent,
            components: Components::new(),
            scope_count: 0,
            bound_tags: 0,
        }
    }

    /// Consumes the builder and returns the finished component map.
    pub fn build(mut self, declarations: &[Declaration]) -> Result<Components> {
        for declaration in declarations {
            match declaration.kind {
                DeclarationKind::Scope => self.visit_scope(declaration)?,
                DeclarationKind::Rule => self.visit_rule(declaration),
            }
        }

        self.check_mode(declarations)?;
        Ok(self.components)
    }

    fn visit_scope(&mut self, declaration: &Declaration) -> Result<()> {
        let class_name = declaration
            .first_prop()
            .and_then(|prop| self.scope_class(prop))
            .ok_or_else(|| {
                CompilerError::parse(
                    self.filename.as_str(),
                    declaration.line,
                    "Invalid Mist file, no class found in @scope",
                )
            })?;

        let name = pascal_case(&class_name);
        if self.components.insert(name.clone(), Component::new()).is_some() {
            log::warn!(
                "{}:{}: component '{}' declared again, previous definition discarded",
                self.filename,
                declaration.line,
                name
            );
        } else {
            log::debug!("Found component '{}' (.{})", name, class_name);
        }

        self.scope_count += 1;
        self.cursor.enter_scope(name);
        Ok(())
    }

    fn scope_class(&self, prop: &str) -> Option<String> {
        self.scope_class_regex
            .captures(prop.trim())
            .and_then(|caps| caps.name("class"))
            .map(|m| m.as_str().to_string())
    }

    fn visit_rule(&mut self, declaration: &Declaration) {
        let Some(name) = self.cursor.current().map(str::to_string) else {
            log::trace!("{}:{}: rule outside @scope ignored", self.filename, declaration.line);
            return;
        };
        let Some(selector) = declaration.first_prop() else {
            return;
        };
        let Some(component) = self.components.get_mut(&name) else {
            return;
        };

        if let Some(tag) = selector.strip_suffix(SELF_REFERENCE_MARKER) {
            let tag = tag.trim();
            if tag.is_empty() {
                log::debug!("{}:{}: ':scope' without a tag ignored", self.filename, declaration.line);
                return;
            }
            component.tag = tag.to_string();
            self.bound_tags += 1;
            log::debug!("Component '{}' renders as <{}>", name, component.tag);
            return;
        }

        for matched in self.extractor.extract(selector) {
            if merge_attribute(component, &matched) == MergeOutcome::Conflict {
                log::debug!(
                    "{}:{}: '{}' on '{}' already classified as {}, matcher ignored",
                    self.filename,
                    declaration.line,
                    matched.name(),
                    name,
                    component.data[matched.name()]
                );
            }
        }
    }

    fn check_mode(&self, declarations: &[Declaration]) -> Result<()> {
        if self.mode != ComponentMode::Single {
            return Ok(());
        }

        let last_line = declarations.last().map_or(1, |d| d.line);
        if self.scope_count == 0 {
            return Err(CompilerError::parse(
                self.filename.as_str(),
                last_line,
                "Invalid Mist file, no @scope found",
            ));
        }
        if self.scope_count > 1 {
            let second = declarations
                .iter()
                .filter(|d| d.kind == DeclarationKind::Scope)
                .nth(1)
                .map_or(last_line, |d| d.line);
            return Err(CompilerError::parse(
                self.filename.as_str(),
                second,
                "Only one @scope is allowed in single-component mode",
            ));
        }
        if self.bound_tags == 0 {
            return Err(CompilerError::parse(
                self.filename.as_str(),
                last_line,
                format!("Invalid Mist file, no tag found (expected a '<tag>{}' rule)", SELF_REFERENCE_MARKER),
            ));
        }
        Ok(())
    }
}

fn merge_attribute(component: &mut Component, matched: &AttributeMatch) -> MergeOutcome {
    match component.data.entry(matched.name().to_string()) {
        Entry::Vacant(slot) => {
            slot.insert(matched.initial_spec());
            MergeOutcome::Added
        }
        Entry::Occupied(mut slot) => match (slot.get_mut(), matched) {
            (AttributeSpec::Enum(values), AttributeMatch::Enum { value, .. }) => {
                if values.contains(value) {
                    MergeOutcome::Unchanged
                } else {
                    values.push(value.clone());
                    MergeOutcome::Added
                }
            }
            (AttributeSpec::Boolean, AttributeMatch::Boolean { .. }) => MergeOutcome::Unchanged,
            _ => MergeOutcome::Conflict,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_components(declarations: &[Declaration], filename: &str, mode: ComponentMode) -> Result<Components> {
        ComponentModelBuilder::new(filename, mode).build(declarations)
    }

    fn scope(class: &str, line: usize) -> Declaration {
        Declaration {
            kind: DeclarationKind::Scope,
            props: vec![format!("(.{})", class)],
            line,
        }
    }

    fn rule(selector: &str, line: usize) -> Declaration {
        Declaration {
            kind: DeclarationKind::Rule,
            props: vec![selector.to_string()],
            line,
        }
    }

    fn build(declarations: &[Declaration]) -> Components {
        build_components(declarations, "test.mist.css", ComponentMode::Multi).unwrap()
    }

    fn enum_values(values: &[&str]) -> AttributeSpec {
        AttributeSpec::Enum(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_cursor_transitions() {
        let mut cursor = Cursor::default();
        assert_eq!(cursor, Cursor::NoCurrent);
        assert_eq!(cursor.current(), None);

        cursor.enter_scope("Card".to_string());
        assert_eq!(cursor.current(), Some("Card"));

        cursor.enter_scope("Badge".to_string());
        assert_eq!(cursor, Cursor::Has("Badge".to_string()));
    }

    #[test]
    fn test_card_component() {
        let components = build(&[
            scope("card", 1),
            rule("button:scope", 2),
            rule("[data-size='sm']", 3),
            rule("[data-size='lg']", 4),
            rule("[data-disabled]", 5),
        ]);

        assert_eq!(components.len(), 1);
        let card = &components["Card"];
        assert_eq!(card.tag, "button");
        assert_eq!(card.data["size"], enum_values(&["sm", "lg"]));
        assert_eq!(card.data["disabled"], AttributeSpec::Boolean);
        assert_eq!(card.data.keys().collect::<Vec<_>>(), vec!["size", "disabled"]);
    }

    #[test]
    fn test_enum_values_deduplicated_in_first_seen_order() {
        let components = build(&[
            scope("chip", 1),
            rule("[data-variant='a']", 2),
            rule("[data-variant='b']", 3),
            rule("[data-variant='a']", 4),
        ]);
        assert_eq!(components["Chip"].data["variant"], enum_values(&["a", "b"]));
    }

    #[test]
    fn test_boolean_never_becomes_enum() {
        let components = build(&[
            scope("chip", 1),
            rule("[data-disabled][data-size='sm']", 2),
            rule("[data-size='sm'][data-disabled]", 3),
        ]);
        assert_eq!(components["Chip"].data["disabled"], AttributeSpec::Boolean);
        assert_eq!(components["Chip"].data["size"], enum_values(&["sm"]));
    }

    #[test]
    fn test_first_classification_wins() {
        let components = build(&[
            scope("chip", 1),
            rule("[data-tone='info']", 2),
            rule("[data-tone]", 3),
            rule("[data-open]", 4),
            rule("[data-open='yes']", 5),
        ]);
        let data = &components["Chip"].data;
        assert_eq!(data["tone"], enum_values(&["info"]));
        assert_eq!(data["open"], AttributeSpec::Boolean);
    }

    #[test]
    fn test_names_are_converted() {
        let components = build(&[scope("my-button", 1), rule("[data-is-active='true']", 2)]);
        let button = &components["MyButton"];
        assert_eq!(button.data["isActive"], enum_values(&["true"]));
    }

    #[test]
    fn test_rules_before_scope_are_ignored() {
        let components = build(&[
            rule("div:scope", 1),
            rule("[data-size='sm']", 2),
            scope("card", 3),
            rule("[data-tone='x']", 4),
        ]);
        let card = &components["Card"];
        assert_eq!(card.tag, "");
        assert!(!card.data.contains_key("size"));
        assert!(card.data.contains_key("tone"));
    }

    #[test]
    fn test_components_in_first_appearance_order() {
        let components = build(&[
            scope("b-one", 1),
            scope("a-two", 2),
            scope("b-one", 3),
            rule("span:scope", 4),
        ]);
        assert_eq!(components.keys().collect::<Vec<_>>(), vec!["BOne", "ATwo"]);
        // Redeclaring resets the component; the following rule binds the new one.
        assert_eq!(components["BOne"].tag, "span");
        assert_eq!(components["ATwo"].tag, "");
    }

    #[test]
    fn test_redeclaration_discards_previous_state() {
        let components = build(&[
            scope("card", 1),
            rule("div:scope", 2),
            rule("[data-size='sm']", 3),
            scope("card", 4),
        ]);
        assert_eq!(components["Card"], Component::new());
    }

    #[test]
    fn test_scope_without_class_fails() {
        let declarations = [Declaration {
            kind: DeclarationKind::Scope,
            props: Vec::new(),
            line: 7,
        }];
        let err = build_components(&declarations, "bad.mist.css", ComponentMode::Multi).unwrap_err();
        assert!(err.is_parse_failure());
        assert!(err.to_string().contains("line 7"));

        let declarations = [Declaration {
            kind: DeclarationKind::Scope,
            props: vec!["(div)".to_string()],
            line: 1,
        }];
        assert!(build_components(&declarations, "bad.mist.css", ComponentMode::Multi).is_err());
    }

    #[test]
    fn test_scope_class_with_limit() {
        let declarations = [Declaration {
            kind: DeclarationKind::Scope,
            props: vec!["(.tab-list) to (.tab-panel)".to_string()],
            line: 1,
        }];
        let components = build(&declarations);
        assert!(components.contains_key("TabList"));
    }

    #[test]
    fn test_rule_without_selector_is_skipped() {
        let declarations = [
            scope("card", 1),
            Declaration {
                kind: DeclarationKind::Rule,
                props: Vec::new(),
                line: 2,
            },
        ];
        assert_eq!(build(&declarations)["Card"], Component::new());
    }

    #[test]
    fn test_single_mode_requires_tag() {
        let declarations = [scope("card", 1), rule("[data-size='sm']", 2)];
        let err = build_components(&declarations, "card.mist.css", ComponentMode::Single).unwrap_err();
        assert!(err.to_string().contains("no tag found"));

        let declarations = [scope("card", 1), rule("div:scope", 2)];
        assert!(build_components(&declarations, "card.mist.css", ComponentMode::Single).is_ok());
    }

    #[test]
    fn test_bare_scope_selector_binds_nothing() {
        let declarations = [scope("card", 1), rule(":scope", 2)];
        let err = build_components(&declarations, "card.mist.css", ComponentMode::Single).unwrap_err();
        assert!(err.is_parse_failure());

        let components = build(&declarations);
        assert!(!components["Card"].is_bound());
    }

    #[test]
    fn test_single_mode_rejects_multiple_scopes() {
        let declarations = [scope("card", 1), rule("div:scope", 2), scope("badge", 3)];
        let err = build_components(&declarations, "card.mist.css", ComponentMode::Single).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_single_mode_requires_scope() {
        let err = build_components(&[rule("div", 1)], "card.mist.css", ComponentMode::Single).unwrap_err();
        assert!(err.to_string().contains("no @scope found"));
    }
}
