//! Lexical analysis for Mist stylesheets
//!
//! The lexer only splits the input on block structure: braces, semicolons
//! and comments. Everything between them (selectors, at-rule preludes,
//! declarations) is kept as one whitespace-collapsed text chunk, with quoted
//! strings, parentheses and brackets preserved verbatim.

use crate::error::{CompilerError, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    LeftBrace,  // {
    RightBrace, // }
    Semicolon,  // ;

    /// Selector, prelude or declaration text
    Text(String),
    Comment(String),

    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub line: usize,
    pub column: usize,
    pub filename: String,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::LeftBrace => write!(f, "{{"),
            TokenType::RightBrace => write!(f, "}}"),
            TokenType::Semicolon => write!(f, ";"),
            TokenType::Text(t) => write!(f, "text(\"{}\")", t),
            TokenType::Comment(c) => write!(f, "comment({})", c),
            TokenType::Eof => write!(f, "EOF"),
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    filename: String,
}

impl Lexer {
    pub fn new(input: &str, filename: String) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            filename,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            if let Some(token) = self.next_token()? {
                tokens.push(token);
            }
        }

        tokens.push(Token {
            token_type: TokenType::Eof,
            line: self.line,
            column: self.column,
            filename: self.filename.clone(),
        });

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();

        if self.is_at_end() {
            return Ok(None);
        }

        let start_line = self.line;
        let start_column = self.column;

        let token_type = match self.peek() {
            Some('{') => {
                self.advance();
                TokenType::LeftBrace
            }
            Some('}') => {
                self.advance();
                TokenType::RightBrace
            }
            Some(';') => {
                self.advance();
                TokenType::Semicolon
            }
            Some('/') if self.peek_next() == Some('*') => {
                let comment = self.read_comment()?;
                TokenType::Comment(comment)
            }
            _ => {
                let text = self.read_text()?;
                if text.is_empty() {
                    return Ok(None);
                }
                TokenType::Text(text)
            }
        };

        Ok(Some(Token {
            token_type,
            line: start_line,
            column: start_column,
            filename: self.filename.clone(),
        }))
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn advance(&mut self) -> char {
        if self.position < self.input.len() {
            let ch = self.input[self.position];
            self.position += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            ch
        } else {
            '\0'
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Reads a `/* ... */` comment; the cursor is on the opening `/`.
    fn read_comment(&mut self) -> Result<String> {
        let start_line = self.line;
        self.advance(); // '/'
        self.advance(); // '*'

        let mut comment = String::new();
        while let Some(ch) = self.peek() {
            if ch == '*' && self.peek_next() == Some('/') {
                self.advance();
                self.advance();
                return Ok(comment.trim().to_string());
            }
            comment.push(self.advance());
        }

        Err(CompilerError::parse(
            self.filename.as_str(),
            start_line,
            "Unterminated comment",
        ))
    }

    /// Reads a quoted string including its quotes; escapes are kept as written.
    fn read_string(&mut self, quote: char, out: &mut String) -> Result<()> {
        out.push(self.advance());

        while let Some(ch) = self.peek() {
            match ch {
                '\\' => {
                    out.push(self.advance());
                    if self.peek().is_some() {
                        out.push(self.advance());
                    }
                }
                '\n' | '\r' => break,
                c if c == quote => {
                    out.push(self.advance());
                    return Ok(());
                }
                _ => out.push(self.advance()),
            }
        }

        Err(CompilerError::parse(
            self.filename.as_str(),
            self.line,
            "Unterminated string literal",
        ))
    }

    /// Reads text up to the next structural delimiter. Runs of whitespace
    /// and embedded comments collapse into a single space.
    fn read_text(&mut self) -> Result<String> {
        let mut text = String::new();
        let mut depth = 0usize;
        let mut pending_space = false;

        while let Some(ch) = self.peek() {
            match ch {
                '{' | '}' => break,
                ';' if depth == 0 => break,
                '/' if self.peek_next() == Some('*') => {
                    self.read_comment()?;
                    pending_space = true;
                    continue;
                }
                c if c.is_whitespace() => {
                    self.advance();
                    pending_space = true;
                    continue;
                }
                _ => {}
            }

            if pending_space && !text.is_empty() {
                text.push(' ');
            }
            pending_space = false;

            match ch {
                '"' | '\'' => self.read_string(ch, &mut text)?,
                '(' | '[' => {
                    depth += 1;
                    text.push(self.advance());
                }
                ')' | ']' => {
                    depth = depth.saturating_sub(1);
                    text.push(self.advance());
                }
                _ => text.push(self.advance()),
            }
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_types(input: &str) -> Vec<TokenType> {
        let mut lexer = Lexer::new(input, "test.mist.css".to_string());
        lexer
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token_type)
            .collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            token_types("{ } ;"),
            vec![
                TokenType::LeftBrace,
                TokenType::RightBrace,
                TokenType::Semicolon,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_rule_with_declaration() {
        assert_eq!(
            token_types("button:scope {\n  color: red;\n}"),
            vec![
                TokenType::Text("button:scope".to_string()),
                TokenType::LeftBrace,
                TokenType::Text("color: red".to_string()),
                TokenType::Semicolon,
                TokenType::RightBrace,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_whitespace_collapses() {
        let types = token_types("@scope   (.my-button)\n\t{}");
        assert_eq!(types[0], TokenType::Text("@scope (.my-button)".to_string()));
    }

    #[test]
    fn test_quoted_values_are_preserved() {
        let types = token_types(r#"[data-label='a; {b}'] { content: "x;y"; }"#);
        assert_eq!(types[0], TokenType::Text("[data-label='a; {b}']".to_string()));
        assert_eq!(types[2], TokenType::Text("content: \"x;y\"".to_string()));
    }

    #[test]
    fn test_semicolon_inside_parens() {
        let types = token_types("background: url(data:image/png;base64,AAAA);");
        assert_eq!(
            types[0],
            TokenType::Text("background: url(data:image/png;base64,AAAA)".to_string())
        );
        assert_eq!(types[1], TokenType::Semicolon);
    }

    #[test]
    fn test_comments() {
        let types = token_types("/* header */ a /* inline */ b {}");
        assert_eq!(types[0], TokenType::Comment("header".to_string()));
        assert_eq!(types[1], TokenType::Text("a b".to_string()));
    }

    #[test]
    fn test_line_numbers() {
        let mut lexer = Lexer::new("a {\n\n  b: c;\n}", "test.mist.css".to_string());
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[2].line, 3);
        assert_eq!(tokens[2].column, 3);
        assert_eq!(tokens[4].line, 4);
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("[data-size='sm] {}", "test.mist.css".to_string());
        assert!(lexer.tokenize().is_err());
    }

    #[test]
    fn test_unterminated_comment() {
        let mut lexer = Lexer::new("a {} /* never closed", "test.mist.css".to_string());
        let err = lexer.tokenize().unwrap_err();
        assert!(err.to_string().contains("Unterminated comment"));
    }
}
