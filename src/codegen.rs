//! TSX code generation for Mist components

use crate::error::{CompilerError, Result};
use crate::types::{AttributeSpec, Component, Components, DATA_ATTRIBUTE_PREFIX, STYLESHEET_SUFFIX};
use crate::utils::{is_valid_identifier, is_valid_tag_name, quote_ts_string};
use std::fmt::Write;

pub struct CodeGenerator {
    output: String,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    /// Renders every component of `components`, in map order, as one TSX module
    /// importing `./<module_name>.mist.css`.
    pub fn generate(&mut self, components: &Components, module_name: &str) -> Result<String> {
        self.output.clear();

        self.write_header(module_name)?;
        for (name, component) in components {
            self.output.push('\n');
            self.write_component(name, component)?;
        }

        Ok(self.output.trim().to_string())
    }

    fn write_header(&mut self, module_name: &str) -> Result<()> {
        writeln!(self.output, "// Generated by {}, do not modify", crate::NAME)?;
        writeln!(self.output, "import './{}{}'", module_name, STYLESHEET_SUFFIX)?;
        Ok(())
    }

    fn write_component(&mut self, name: &str, component: &Component) -> Result<()> {
        validate_component(name, component)?;
        let tag = component.tag.as_str();
        let out = &mut self.output;

        // Props type
        writeln!(out, "type {}Props = {{", name)?;
        writeln!(out, "  children?: React.ReactNode")?;
        for (attribute, spec) in &component.data {
            writeln!(out, "  {}?: {}", attribute, prop_type(spec))?;
        }
        writeln!(out, "}} & JSX.IntrinsicElements['{}']", tag)?;
        writeln!(out)?;

        // Component function
        let params = std::iter::once("children")
            .chain(component.data.keys().map(String::as_str))
            .chain(std::iter::once("...props"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "export function {}({{ {} }}: {}Props) {{", name, params, name)?;
        writeln!(out, "  return (")?;

        write!(out, "    <{} {{...props}} className=\"{}\"", tag, name)?;
        for attribute in component.data.keys() {
            write!(out, " {}{}={{{}}}", DATA_ATTRIBUTE_PREFIX, attribute, attribute)?;
        }
        writeln!(out, ">")?;
        writeln!(out, "      {{children}}")?;
        writeln!(out, "    </{}>", tag)?;

        writeln!(out, "  )")?;
        writeln!(out, "}}")?;
        Ok(())
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn prop_type(spec: &AttributeSpec) -> String {
    match spec {
        AttributeSpec::Enum(values) => values
            .iter()
            .map(|v| quote_ts_string(v))
            .collect::<Vec<_>>()
            .join(" | "),
        AttributeSpec::Boolean => "boolean".to_string(),
    }
}

fn validate_component(name: &str, component: &Component) -> Result<()> {
    if !is_valid_identifier(name) {
        return Err(CompilerError::codegen(format!(
            "Component name '{}' is not a valid identifier",
            name
        )));
    }
    if !component.is_bound() {
        return Err(CompilerError::codegen(format!(
            "Component '{}' has no tag, add a '<tag>:scope' rule to its @scope block",
            name
        )));
    }
    if !is_valid_tag_name(&component.tag) {
        return Err(CompilerError::codegen(format!(
            "Component '{}' binds '{}', which is not an element name",
            name, component.tag
        )));
    }
    if let Some(attribute) = component.data.keys().find(|a| !is_valid_identifier(a)) {
        return Err(CompilerError::codegen(format!(
            "Attribute '{}' of component '{}' is not a valid identifier",
            attribute, name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn generate(components: &Components, module_name: &str) -> Result<String> {
        CodeGenerator::new().generate(components, module_name)
    }

    fn component(tag: &str, data: &[(&str, AttributeSpec)]) -> Component {
        let mut component = Component::new();
        component.tag = tag.to_string();
        for (name, spec) in data {
            component.data.insert(name.to_string(), spec.clone());
        }
        component
    }

    fn size_spec() -> AttributeSpec {
        AttributeSpec::Enum(vec!["sm".to_string(), "lg".to_string()])
    }

    #[test]
    fn test_generate_single_component() {
        let mut components = Components::new();
        components.insert(
            "Card".to_string(),
            component("button", &[("size", size_spec()), ("disabled", AttributeSpec::Boolean)]),
        );

        let expected = r#"// Generated by mistc, do not modify
import './card.mist.css'

type CardProps = {
  children?: React.ReactNode
  size?: 'sm' | 'lg'
  disabled?: boolean
} & JSX.IntrinsicElements['button']

export function Card({ children, size, disabled, ...props }: CardProps) {
  return (
    <button {...props} className="Card" data-size={size} data-disabled={disabled}>
      {children}
    </button>
  )
}"#;
        assert_eq!(generate(&components, "card").unwrap(), expected);
    }

    #[test]
    fn test_generate_without_attributes() {
        let mut components = Components::new();
        components.insert("Box".to_string(), component("div", &[]));

        let output = generate(&components, "box").unwrap();
        assert!(output.contains("type BoxProps = {\n  children?: React.ReactNode\n} & JSX.IntrinsicElements['div']"));
        assert!(output.contains("export function Box({ children, ...props }: BoxProps) {"));
        assert!(output.contains("<div {...props} className=\"Box\">"));
    }

    #[test]
    fn test_components_separated_in_map_order() {
        let mut components = Components::new();
        components.insert("Title".to_string(), component("h1", &[]));
        components.insert("Body".to_string(), component("p", &[]));

        let output = generate(&components, "text").unwrap();
        let title = output.find("export function Title").unwrap();
        let body = output.find("export function Body").unwrap();
        assert!(title < body);
        assert!(output.contains("}\n\ntype BodyProps"));
        assert!(!output.ends_with('\n'));
    }

    #[test]
    fn test_empty_components_renders_header_only() {
        let output = generate(&Components::new(), "empty").unwrap();
        assert_eq!(output, "// Generated by mistc, do not modify\nimport './empty.mist.css'");
    }

    #[test]
    fn test_enum_values_are_escaped() {
        let mut components = Components::new();
        components.insert(
            "Quote".to_string(),
            component("q", &[("mark", AttributeSpec::Enum(vec!["it's".to_string()]))]),
        );
        let output = generate(&components, "quote").unwrap();
        assert!(output.contains("  mark?: 'it\\'s'\n"));
    }

    #[test]
    fn test_unbound_tag_is_an_error() {
        let mut components = Components::new();
        components.insert("Card".to_string(), Component::new());
        let err = generate(&components, "card").unwrap_err();
        assert!(matches!(err, CompilerError::CodeGen { .. }));
        assert!(err.to_string().contains("Card"));
    }

    #[test]
    fn test_compound_tag_selector_is_an_error() {
        let mut components = Components::new();
        components.insert("Card".to_string(), component("div > button", &[]));
        let err = generate(&components, "card").unwrap_err();
        assert!(err.to_string().contains("div > button"));
    }

    #[test]
    fn test_invalid_component_name_is_an_error() {
        let mut components = Components::new();
        components.insert("2Col".to_string(), component("div", &[]));
        assert!(generate(&components, "grid").is_err());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let mut components = Components::new();
        components.insert(
            "Card".to_string(),
            component("article", &[("tone", size_spec()), ("open", AttributeSpec::Boolean)]),
        );
        let mut generator = CodeGenerator::new();
        let first = generator.generate(&components, "card").unwrap();
        let second = generator.generate(&components, "card").unwrap();
        assert_eq!(first, second);
    }
}
