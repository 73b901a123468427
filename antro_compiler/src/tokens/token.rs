//! Token categories and the positioned token value produced by the automaton
use crate::utils::{Position, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of lexical categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCategory {
    // === LITERALS AND NAMES ===
    Int,
    Float,
    Variable,
    Keyword,
    Boolean,
    String,

    // === OPERATORS ===
    /// `==` `===` `!=` `<` `>` `<=` `>=`
    RelationalOp,
    /// `=`
    AssignmentOp,
    /// `+`
    ArithmeticAdd,
    /// `-`
    ArithmeticSub,
    /// `*` and `/`
    ArithmeticMul,
    /// `%`
    ArithmeticMod,
    /// `++` `--`
    ArithmeticUnaryOp,
    /// `!`
    LogicalUnaryOp,
    /// `&&` `||`
    LogicalBinaryOp,
    /// `&` `|`
    BitwiseOp,

    // === PUNCTUATION ===
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Comma,
    /// `:`
    Cursor,
    /// `;`
    Terminator,

    Eof,
}

impl TokenCategory {
    /// Name used in diagnostics and parse tree leaf labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Variable => "variable",
            Self::Keyword => "keyword",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::RelationalOp => "relational_op",
            Self::AssignmentOp => "assignment_op",
            Self::ArithmeticAdd => "arithmetic_add",
            Self::ArithmeticSub => "arithmetic_sub",
            Self::ArithmeticMul => "arithmetic_mul",
            Self::ArithmeticMod => "arithmetic_mod",
            Self::ArithmeticUnaryOp => "arithmetic_unary_op",
            Self::LogicalUnaryOp => "logical_unary_op",
            Self::LogicalBinaryOp => "logical_binary_op",
            Self::BitwiseOp => "bitwise_op",
            Self::OpenBracket => "open_bracket",
            Self::CloseBracket => "close_bracket",
            Self::OpenBrace => "open_brace",
            Self::CloseBrace => "close_brace",
            Self::Comma => "comma",
            Self::Cursor => "cursor",
            Self::Terminator => "terminator",
            Self::Eof => "eof",
        }
    }

    /// Literal categories usable as an expression factor
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Int | Self::Float | Self::Boolean | Self::String
        )
    }

    /// Categories that complete an operand; a sign after one of these is binary
    pub fn ends_operand(&self) -> bool {
        self.is_literal() || matches!(self, Self::Variable | Self::CloseBracket)
    }

    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Self::RelationalOp
                | Self::AssignmentOp
                | Self::ArithmeticAdd
                | Self::ArithmeticSub
                | Self::ArithmeticMul
                | Self::ArithmeticMod
                | Self::ArithmeticUnaryOp
                | Self::LogicalUnaryOp
                | Self::LogicalBinaryOp
                | Self::BitwiseOp
        )
    }

    pub fn all() -> &'static [TokenCategory] {
        &[
            Self::Int,
            Self::Float,
            Self::Variable,
            Self::Keyword,
            Self::Boolean,
            Self::String,
            Self::RelationalOp,
            Self::AssignmentOp,
            Self::ArithmeticAdd,
            Self::ArithmeticSub,
            Self::ArithmeticMul,
            Self::ArithmeticMod,
            Self::ArithmeticUnaryOp,
            Self::LogicalUnaryOp,
            Self::LogicalBinaryOp,
            Self::BitwiseOp,
            Self::OpenBracket,
            Self::CloseBracket,
            Self::OpenBrace,
            Self::CloseBrace,
            Self::Comma,
            Self::Cursor,
            Self::Terminator,
            Self::Eof,
        ]
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable classified lexeme with the position of its first character
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub category: TokenCategory,
    pub lexeme: String,
    pub position: Position,
}

impl Token {
    pub fn new(category: TokenCategory, lexeme: impl Into<String>, position: Position) -> Self {
        Self {
            category,
            lexeme: lexeme.into(),
            position,
        }
    }

    /// End-of-input marker
    pub fn eof(position: Position) -> Self {
        Self::new(TokenCategory::Eof, "", position)
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn column(&self) -> u32 {
        self.position.column
    }

    pub fn span(&self) -> Span {
        Span::covering(self.position, &self.lexeme)
    }

    pub fn is(&self, category: TokenCategory) -> bool {
        self.category == category
    }

    /// Keyword or boolean token spelled exactly `word`
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self.category, TokenCategory::Keyword | TokenCategory::Boolean)
            && self.lexeme == word
    }

    pub fn is_eof(&self) -> bool {
        self.category == TokenCategory::Eof
    }

    /// Last character of the lexeme, used in lexical diagnostics
    pub fn tail(&self) -> Option<char> {
        self.lexeme.chars().last()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:?}", self.category, self.lexeme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_accessors() {
        let token = Token::new(TokenCategory::Variable, "$x", Position::new(4, 1, 5));
        assert_eq!(token.line(), 1);
        assert_eq!(token.column(), 5);
        assert_eq!(token.tail(), Some('x'));
        assert_eq!(token.span().len(), 2);
        assert_eq!(token.to_string(), "variable:\"$x\"");
    }

    #[test]
    fn test_is_word_accepts_keywords_and_booleans_only() {
        let kw = Token::new(TokenCategory::Keyword, "retn", Position::start());
        let boolean = Token::new(TokenCategory::Boolean, "true", Position::start());
        let var = Token::new(TokenCategory::Variable, "retn", Position::start());

        assert!(kw.is_word("retn"));
        assert!(boolean.is_word("true"));
        assert!(!var.is_word("retn"));
        assert!(!kw.is_word("end"));
    }

    #[test]
    fn test_operand_classification() {
        assert!(TokenCategory::Int.ends_operand());
        assert!(TokenCategory::CloseBracket.ends_operand());
        assert!(!TokenCategory::AssignmentOp.ends_operand());
        assert!(!TokenCategory::OpenBracket.ends_operand());
        assert!(TokenCategory::BitwiseOp.is_operator());
    }

    #[test]
    fn test_category_names_are_unique() {
        let mut names: Vec<&str> = TokenCategory::all().iter().map(|c| c.as_str()).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_category_serializes_as_snake_case() {
        let json = serde_json::to_string(&TokenCategory::LogicalBinaryOp).unwrap();
        assert_eq!(json, "\"logical_binary_op\"");
    }
}
