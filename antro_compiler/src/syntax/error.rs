//! Syntax errors raised by the predictive descent parser
//!
//! Every failure is fatal to the current parse; there is no recovery and
//! only the first error is reported.

use crate::logging::{codes, Code};
use crate::tokens::{TokenCategory, TokenStreamError};
use crate::utils::{Position, Span};

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Syntax error on line {line}: expected {expected}, found {actual} '{lexeme}'")]
    UnexpectedToken {
        expected: String,
        actual: TokenCategory,
        lexeme: String,
        line: u32,
        column: u32,
    },

    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEndOfInput { expected: String },

    #[error("Unexpected {actual} '{lexeme}' on line {line} after the end of the program")]
    TrailingInput {
        actual: TokenCategory,
        lexeme: String,
        line: u32,
        column: u32,
    },

    #[error("Keyword token '{lexeme}' on line {line} is not a reserved word")]
    InvalidKeyword { lexeme: String, line: u32 },

    #[error("Maximum nesting depth exceeded on line {line}")]
    MaxRecursionDepth { line: u32 },

    #[error(transparent)]
    Stream(#[from] TokenStreamError),
}

impl SyntaxError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::UnexpectedEndOfInput { .. } => codes::syntax::UNEXPECTED_END_OF_INPUT,
            Self::TrailingInput { .. } => codes::syntax::TRAILING_INPUT,
            Self::InvalidKeyword { .. } => codes::syntax::INVALID_KEYWORD,
            Self::MaxRecursionDepth { .. } => codes::syntax::MAX_RECURSION_DEPTH,
            Self::Stream(error) => error.error_code(),
        }
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            Self::UnexpectedToken { line, .. }
            | Self::TrailingInput { line, .. }
            | Self::InvalidKeyword { line, .. }
            | Self::MaxRecursionDepth { line } => Some(*line),
            Self::UnexpectedEndOfInput { .. } | Self::Stream(_) => None,
        }
    }

    /// Source range of the offending token, when one exists
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedToken {
                lexeme,
                line,
                column,
                ..
            }
            | Self::TrailingInput {
                lexeme,
                line,
                column,
                ..
            } => Some(Span::covering(Position::new(0, *line, *column), lexeme)),
            Self::InvalidKeyword { line, .. } | Self::MaxRecursionDepth { line } => {
                Some(Span::single(Position::new(0, *line, 1)))
            }
            Self::UnexpectedEndOfInput { .. } | Self::Stream(_) => None,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn description(&self) -> &'static str {
        codes::get_description(self.error_code().as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}
