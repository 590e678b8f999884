//! Error types for the Mist compiler

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompilerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {file} at line {line}: {message}")]
    Parse { file: String, line: usize, message: String },

    #[error("Code generation error: {message}")]
    CodeGen { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },
}

pub type Result<T> = std::result::Result<T, CompilerError>;

impl From<std::fmt::Error> for CompilerError {
    fn from(e: std::fmt::Error) -> Self {
        CompilerError::codegen(format!("Failed to format output: {}", e))
    }
}

impl CompilerError {
    pub fn parse(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn codegen(message: impl Into<String>) -> Self {
        Self::CodeGen {
            message: message.into(),
        }
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Whether this error was raised while reading the stylesheet rather than
    /// while generating or writing output.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
