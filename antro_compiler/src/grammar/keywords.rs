//! Reserved words of the Antro language
//!
//! Identifiers spelled like a reserved word are re-tagged on emission:
//! `true`/`false` become boolean tokens, everything else here a keyword.
//! Type names such as `int` are not reserved and stay variables.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    // === PROGRAM STRUCTURE ===
    Main,
    Require,
    Begin,
    End,
    Def,
    Method,
    Void,

    // === STATEMENTS ===
    Var,
    New,
    Call,
    Retn,

    // === CONTROL FLOW ===
    If,
    Else,
    While,
    For,
    Switch,
    Case,
    Break,
}

impl Keyword {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "main" => Some(Self::Main),
            "require" => Some(Self::Require),
            "begin" => Some(Self::Begin),
            "end" => Some(Self::End),
            "def" => Some(Self::Def),
            "method" => Some(Self::Method),
            "void" => Some(Self::Void),
            "var" => Some(Self::Var),
            "new" => Some(Self::New),
            "call" => Some(Self::Call),
            "retn" => Some(Self::Retn),
            "if" => Some(Self::If),
            "else" => Some(Self::Else),
            "while" => Some(Self::While),
            "for" => Some(Self::For),
            "switch" => Some(Self::Switch),
            "case" => Some(Self::Case),
            "break" => Some(Self::Break),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Require => "require",
            Self::Begin => "begin",
            Self::End => "end",
            Self::Def => "def",
            Self::Method => "method",
            Self::Void => "void",
            Self::Var => "var",
            Self::New => "new",
            Self::Call => "call",
            Self::Retn => "retn",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::For => "for",
            Self::Switch => "switch",
            Self::Case => "case",
            Self::Break => "break",
        }
    }

    pub fn all() -> &'static [Keyword] {
        &[
            Self::Main,
            Self::Require,
            Self::Begin,
            Self::End,
            Self::Def,
            Self::Method,
            Self::Void,
            Self::Var,
            Self::New,
            Self::Call,
            Self::Retn,
            Self::If,
            Self::Else,
            Self::While,
            Self::For,
            Self::Switch,
            Self::Case,
            Self::Break,
        ]
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Boolean literal spellings
pub const BOOLEAN_LITERALS: [&str; 2] = ["true", "false"];

/// How an identifier-shaped lexeme is categorized on emission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordType {
    Keyword,
    BooleanLiteral,
    Identifier,
}

pub fn is_reserved_keyword(s: &str) -> bool {
    Keyword::from_str(s).is_some()
}

pub fn classify_word(word: &str) -> WordType {
    if BOOLEAN_LITERALS.contains(&word) {
        WordType::BooleanLiteral
    } else if is_reserved_keyword(word) {
        WordType::Keyword
    } else {
        WordType::Identifier
    }
}
