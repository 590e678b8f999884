//! Recursive descent parser for Mist stylesheets
//!
//! Produces a forest of [`StyleNode`]s. Nested rules are resolved against
//! their enclosing selectors the way CSS nesting does: `&` stands for the
//! parent selector, and a selector without `&` becomes a descendant of it.

use crate::ast::{StyleNode, StylesheetParser};
use crate::error::{CompilerError, Result};
use crate::lexer::{Lexer, Token, TokenType};
use crate::types::CONDITIONAL_AT_RULES;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    filename: String,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last().map(|t| &t.token_type), Some(TokenType::Eof)) {
            let (line, filename) = tokens
                .last()
                .map_or((1, String::new()), |t| (t.line, t.filename.clone()));
            tokens.push(Token {
                token_type: TokenType::Eof,
                line,
                column: 1,
                filename,
            });
        }
        let filename = tokens
            .first()
            .map(|t| t.filename.clone())
            .unwrap_or_default();
        Self {
            tokens,
            current: 0,
            filename,
        }
    }

    pub fn parse(&mut self) -> Result<Vec<StyleNode>> {
        self.parse_block(&[], false)
    }

    fn parse_block(&mut self, parents: &[String], nested: bool) -> Result<Vec<StyleNode>> {
        let mut nodes = Vec::new();
        let open_line = self.previous_line();

        loop {
            let token = self.advance();
            let line = token.line;

            match token.token_type {
                TokenType::Eof => {
                    if nested {
                        return Err(CompilerError::parse(
                            self.filename.as_str(),
                            open_line,
                            "Unclosed block, expected '}'",
                        ));
                    }
                    return Ok(nodes);
                }
                TokenType::RightBrace => {
                    if nested {
                        return Ok(nodes);
                    }
                    return Err(CompilerError::parse(
                        self.filename.as_str(),
                        line,
                        "Unexpected '}'",
                    ));
                }
                TokenType::Semicolon => continue,
                TokenType::Comment(text) => nodes.push(StyleNode::comment(text, line)),
                TokenType::LeftBrace => {
                    // A block without a prelude still nests; its selector list is empty.
                    let children = self.parse_block(&[], true)?;
                    nodes.push(StyleNode::rule(Vec::new(), children, line));
                }
                TokenType::Text(text) => {
                    if self.match_token(&TokenType::LeftBrace) {
                        nodes.push(self.parse_block_statement(&text, parents, line)?);
                    } else {
                        self.match_token(&TokenType::Semicolon);
                        nodes.push(parse_statement(&text, line));
                    }
                }
            }
        }
    }

    fn parse_block_statement(&mut self, prelude: &str, parents: &[String], line: usize) -> Result<StyleNode> {
        if prelude.starts_with('@') {
            let (name, rest) = split_at_rule(prelude);
            let context = if CONDITIONAL_AT_RULES.contains(&name.as_str()) {
                parents.to_vec()
            } else {
                Vec::new()
            };
            let children = self.parse_block(&context, true)?;
            return Ok(StyleNode::at_rule(name, at_rule_props(rest), children, line));
        }

        let selectors = resolve_selectors(parents, &split_selector_list(prelude));
        let children = self.parse_block(&selectors, true)?;
        Ok(StyleNode::rule(selectors, children, line))
    }

    fn advance(&mut self) -> Token {
        let last = self.tokens.len() - 1;
        let token = self.tokens[self.current.min(last)].clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
            || matches!(self.tokens[self.current].token_type, TokenType::Eof)
    }

    fn check(&self, token_type: &TokenType) -> bool {
        self.tokens
            .get(self.current)
            .map_or(false, |t| &t.token_type == token_type)
    }

    fn match_token(&mut self, token_type: &TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn previous_line(&self) -> usize {
        self.current
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(1, |t| t.line)
    }
}

/// Default stylesheet front end: [`Lexer`] followed by [`Parser`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CssParser;

impl StylesheetParser for CssParser {
    fn parse_stylesheet(&self, source: &str, filename: &str) -> Result<Vec<StyleNode>> {
        let mut lexer = Lexer::new(source, filename.to_string());
        let tokens = lexer.tokenize()?;
        Parser::new(tokens).parse()
    }
}

/// Convenience wrapper around [`CssParser`].
pub fn parse_stylesheet(source: &str, filename: &str) -> Result<Vec<StyleNode>> {
    CssParser.parse_stylesheet(source, filename)
}

fn parse_statement(text: &str, line: usize) -> StyleNode {
    if text.starts_with('@') {
        let (name, rest) = split_at_rule(text);
        StyleNode::at_rule(name, at_rule_props(rest), Vec::new(), line)
    } else {
        StyleNode::declaration(text, line)
    }
}

/// Splits `@name prelude` into the lowercased name (with `@`) and the prelude.
fn split_at_rule(text: &str) -> (String, &str) {
    let end = text
        .char_indices()
        .skip(1)
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '-' || *c == '_'))
        .map_or(text.len(), |(i, _)| i);
    (text[..end].to_lowercase(), text[end..].trim())
}

fn at_rule_props(rest: &str) -> Vec<String> {
    if rest.is_empty() {
        Vec::new()
    } else {
        vec![rest.to_string()]
    }
}

/// Splits a selector list on commas that are not inside quotes, parentheses
/// or brackets.
pub fn split_selector_list(text: &str) -> Vec<String> {
    let mut selectors = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for ch in text.chars() {
        if let Some(q) = quote {
            current.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' => {
                quote = Some(ch);
                current.push(ch);
            }
            '(' | '[' => {
                depth += 1;
                current.push(ch);
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                selectors.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    selectors.push(current.trim().to_string());

    selectors.retain(|s| !s.is_empty());
    selectors
}

/// Resolves nested selectors against the enclosing selector list.
pub fn resolve_selectors(parents: &[String], selectors: &[String]) -> Vec<String> {
    if parents.is_empty() {
        return selectors
            .iter()
            .map(|s| replace_nesting(s, "").unwrap_or_else(|| s.clone()).trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    let mut resolved = Vec::with_capacity(parents.len() * selectors.len());
    for parent in parents {
        for selector in selectors {
            match replace_nesting(selector, parent) {
                Some(selector) => resolved.push(selector),
                None => resolved.push(format!("{} {}", parent, selector)),
            }
        }
    }
    resolved
}

/// Replaces every `&` outside quoted strings with `parent`. Returns `None`
/// when the selector has no such `&`.
fn replace_nesting(selector: &str, parent: &str) -> Option<String> {
    let mut out = String::with_capacity(selector.len() + parent.len());
    let mut found = false;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for ch in selector.chars() {
        if let Some(q) = quote {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' => {
                quote = Some(ch);
                out.push(ch);
            }
            '&' => {
                found = true;
                out.push_str(parent);
            }
            _ => out.push(ch),
        }
    }

    found.then_some(out)
}
