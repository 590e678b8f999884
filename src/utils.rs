//! Naming and path helpers for the Mist compiler

use crate::error::{CompilerError, Result};
use crate::types::{OUTPUT_EXTENSION, STYLESHEET_SUFFIX};
use std::path::{Path, PathBuf};

/// `my-button` -> `MyButton`. The first letter and every letter right after a
/// hyphen are uppercased; hyphens are dropped.
pub fn pascal_case(name: &str) -> String {
    convert_kebab(name, true)
}

/// `is-active` -> `isActive`.
pub fn camel_case(name: &str) -> String {
    convert_kebab(name, false)
}

fn convert_kebab(name: &str, capitalize_first: bool) -> String {
    let mut result = String::with_capacity(name.len());
    let mut capitalize_next = capitalize_first;

    for ch in name.chars() {
        if ch == '-' {
            capitalize_next = true;
            continue;
        }
        if capitalize_next && ch.is_alphabetic() {
            result.extend(ch.to_uppercase());
        } else {
            result.push(ch);
        }
        capitalize_next = false;
    }

    result
}

/// Check if a string is a valid identifier
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    if !first.is_ascii_alphabetic() && first != '_' && first != '$' {
        return false;
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Element names such as `button`, `h1` or `my-element`.
pub fn is_valid_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphabetic() && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Quote a value as a single-quoted TypeScript string literal.
pub fn quote_ts_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

/// Whether `path` names a Mist stylesheet (`*.mist.css`).
pub fn is_mist_stylesheet(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map_or(false, |n| n.len() > STYLESHEET_SUFFIX.len() && n.ends_with(STYLESHEET_SUFFIX))
}

/// `src/button.mist.css` -> `button`
pub fn module_name_from_path(path: &Path) -> Result<String> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CompilerError::invalid_format(format!("Invalid input path: {}", path.display())))?;

    match file_name.strip_suffix(STYLESHEET_SUFFIX) {
        Some(module) if !module.is_empty() => Ok(module.to_string()),
        _ => Err(CompilerError::invalid_format(format!(
            "Input file '{}' must end with {}",
            file_name, STYLESHEET_SUFFIX
        ))),
    }
}

/// `src/button.mist.css` -> `src/button.mist.tsx`
pub fn output_path_for(input: &Path) -> PathBuf {
    input.with_extension(OUTPUT_EXTENSION)
}
