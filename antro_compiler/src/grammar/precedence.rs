//! Operator precedence for Antro expressions
//!
//! Binary operators, loosest to tightest, all left-associative:
//!
//! | level | operators |
//! |-------|-----------|
//! | 1 | `\|\|` |
//! | 2 | `&&` |
//! | 3 | `==` `===` `!=` `<` `>` `<=` `>=` |
//! | 4 | `\|` |
//! | 5 | `&` |
//! | 6 | `+` `-` |
//! | 7 | `*` `/` `%` |
//!
//! Prefix `!`, `-`, `+`, `++`, `--` bind tighter than every binary operator.

use crate::tokens::{Token, TokenCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    LogicalOr = 1,
    LogicalAnd = 2,
    Relational = 3,
    BitwiseOr = 4,
    BitwiseAnd = 5,
    Additive = 6,
    Multiplicative = 7,
}

impl Precedence {
    pub const LOWEST: Precedence = Precedence::LogicalOr;

    /// Next tighter level, used for the right operand of a left-associative operator
    pub fn tighter(self) -> Option<Precedence> {
        match self {
            Self::LogicalOr => Some(Self::LogicalAnd),
            Self::LogicalAnd => Some(Self::Relational),
            Self::Relational => Some(Self::BitwiseOr),
            Self::BitwiseOr => Some(Self::BitwiseAnd),
            Self::BitwiseAnd => Some(Self::Additive),
            Self::Additive => Some(Self::Multiplicative),
            Self::Multiplicative => None,
        }
    }
}

/// Precedence of `token` when it appears between two operands
pub fn binary_precedence(token: &Token) -> Option<Precedence> {
    match token.category {
        TokenCategory::LogicalBinaryOp => match token.lexeme.as_str() {
            "||" => Some(Precedence::LogicalOr),
            "&&" => Some(Precedence::LogicalAnd),
            _ => None,
        },
        TokenCategory::RelationalOp => Some(Precedence::Relational),
        TokenCategory::BitwiseOp => match token.lexeme.as_str() {
            "|" => Some(Precedence::BitwiseOr),
            "&" => Some(Precedence::BitwiseAnd),
            _ => None,
        },
        TokenCategory::ArithmeticAdd | TokenCategory::ArithmeticSub => Some(Precedence::Additive),
        TokenCategory::ArithmeticMul | TokenCategory::ArithmeticMod => {
            Some(Precedence::Multiplicative)
        }
        _ => None,
    }
}

pub fn is_prefix_operator(category: TokenCategory) -> bool {
    matches!(
        category,
        TokenCategory::LogicalUnaryOp
            | TokenCategory::ArithmeticSub
            | TokenCategory::ArithmeticAdd
            | TokenCategory::ArithmeticUnaryOp
    )
}
