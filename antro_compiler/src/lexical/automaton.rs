//! Deterministic finite automaton over character classes
//!
//! `State::transition` is the whole transition table. The analyzer's
//! recognizers decide which of the reachable states they are allowed to
//! enter, so `+` followed by a digit only becomes a signed number when the
//! number recognizer claims it.

use crate::tokens::TokenCategory;

/// Input alphabet of the automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    Digit,
    /// `e` and `E`, which start both identifiers and exponents
    Exponent,
    Letter,
    Dollar,
    Dot,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Equals,
    Less,
    Greater,
    Bang,
    Ampersand,
    Pipe,
    Quote,
    Colon,
    Semicolon,
    Comma,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Whitespace,
    /// Anything the language does not use outside string literals
    Other,
    /// Past the last source character
    End,
}

impl CharClass {
    pub fn of(ch: char) -> Self {
        match ch {
            '0'..='9' => Self::Digit,
            'e' | 'E' => Self::Exponent,
            '$' => Self::Dollar,
            '.' => Self::Dot,
            '+' => Self::Plus,
            '-' => Self::Minus,
            '*' => Self::Star,
            '/' => Self::Slash,
            '%' => Self::Percent,
            '=' => Self::Equals,
            '<' => Self::Less,
            '>' => Self::Greater,
            '!' => Self::Bang,
            '&' => Self::Ampersand,
            '|' => Self::Pipe,
            '"' => Self::Quote,
            ':' => Self::Colon,
            ';' => Self::Semicolon,
            ',' => Self::Comma,
            '(' => Self::OpenParen,
            ')' => Self::CloseParen,
            '{' => Self::OpenBrace,
            '}' => Self::CloseBrace,
            c if c.is_alphabetic() => Self::Letter,
            c if c.is_whitespace() => Self::Whitespace,
            _ => Self::Other,
        }
    }

    pub fn starts_identifier(self) -> bool {
        matches!(self, Self::Letter | Self::Exponent | Self::Dollar)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Start,
    Whitespace,

    // Numbers
    Plus,
    Minus,
    Integer,
    FractionMark,
    Fraction,
    ExponentMark,
    ExponentSign,
    Exponent,

    Identifier,
    StringBody,
    StringEnd,

    // Operators
    Increment,
    Decrement,
    Star,
    Slash,
    Percent,
    Assign,
    Equal,
    StrictEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Not,
    NotEqual,
    Ampersand,
    Pipe,
    LogicalAnd,
    LogicalOr,

    // Punctuation
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Comma,
    Cursor,
    Terminator,

    End,
}

impl State {
    pub fn transition(self, class: CharClass) -> Option<State> {
        use CharClass as C;

        let next = match (self, class) {
            (Self::Start, C::Whitespace) => Self::Whitespace,
            (Self::Start, C::Digit) => Self::Integer,
            (Self::Start, c) if c.starts_identifier() => Self::Identifier,
            (Self::Start, C::Quote) => Self::StringBody,
            (Self::Start, C::Plus) => Self::Plus,
            (Self::Start, C::Minus) => Self::Minus,
            (Self::Start, C::Star) => Self::Star,
            (Self::Start, C::Slash) => Self::Slash,
            (Self::Start, C::Percent) => Self::Percent,
            (Self::Start, C::Equals) => Self::Assign,
            (Self::Start, C::Less) => Self::Less,
            (Self::Start, C::Greater) => Self::Greater,
            (Self::Start, C::Bang) => Self::Not,
            (Self::Start, C::Ampersand) => Self::Ampersand,
            (Self::Start, C::Pipe) => Self::Pipe,
            (Self::Start, C::OpenParen) => Self::OpenBracket,
            (Self::Start, C::CloseParen) => Self::CloseBracket,
            (Self::Start, C::OpenBrace) => Self::OpenBrace,
            (Self::Start, C::CloseBrace) => Self::CloseBrace,
            (Self::Start, C::Comma) => Self::Comma,
            (Self::Start, C::Colon) => Self::Cursor,
            (Self::Start, C::Semicolon) => Self::Terminator,
            (Self::Start, C::End) => Self::End,

            (Self::Plus, C::Plus) => Self::Increment,
            (Self::Minus, C::Minus) => Self::Decrement,
            (Self::Plus | Self::Minus, C::Digit) => Self::Integer,

            (Self::Integer, C::Digit) => Self::Integer,
            (Self::Integer, C::Dot) => Self::FractionMark,
            (Self::FractionMark | Self::Fraction, C::Digit) => Self::Fraction,
            (Self::Integer | Self::Fraction, C::Exponent) => Self::ExponentMark,
            (Self::ExponentMark, C::Plus | C::Minus) => Self::ExponentSign,
            (Self::ExponentMark | Self::ExponentSign | Self::Exponent, C::Digit) => Self::Exponent,

            (Self::Identifier, C::Letter | C::Exponent | C::Digit) => Self::Identifier,

            (Self::StringBody, C::Quote) => Self::StringEnd,
            (Self::StringBody, C::End) => return None,
            (Self::StringBody, _) => Self::StringBody,

            (Self::Assign, C::Equals) => Self::Equal,
            (Self::Equal, C::Equals) => Self::StrictEqual,
            (Self::Less, C::Equals) => Self::LessEqual,
            (Self::Greater, C::Equals) => Self::GreaterEqual,
            (Self::Not, C::Equals) => Self::NotEqual,
            (Self::Ampersand, C::Ampersand) => Self::LogicalAnd,
            (Self::Pipe, C::Pipe) => Self::LogicalOr,

            _ => return None,
        };
        Some(next)
    }

    /// Whether stopping here yields a complete lexeme
    pub fn is_accepting(self) -> bool {
        !matches!(
            self,
            Self::Start
                | Self::FractionMark
                | Self::ExponentMark
                | Self::ExponentSign
                | Self::StringBody
                | Self::End
        )
    }

    /// States that belong to a numeric literal
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Plus
                | Self::Minus
                | Self::Integer
                | Self::FractionMark
                | Self::Fraction
                | Self::ExponentMark
                | Self::ExponentSign
                | Self::Exponent
        )
    }

    /// Category emitted when the automaton stops here. Whitespace accepts but
    /// emits nothing; identifiers are refined into keywords and booleans later.
    pub fn category(self) -> Option<TokenCategory> {
        use TokenCategory as T;

        let category = match self {
            Self::Integer => T::Int,
            Self::Fraction | Self::Exponent => T::Float,
            Self::Identifier => T::Variable,
            Self::StringEnd => T::String,
            Self::Plus => T::ArithmeticAdd,
            Self::Minus => T::ArithmeticSub,
            Self::Increment | Self::Decrement => T::ArithmeticUnaryOp,
            Self::Star | Self::Slash => T::ArithmeticMul,
            Self::Percent => T::ArithmeticMod,
            Self::Assign => T::AssignmentOp,
            Self::Equal
            | Self::StrictEqual
            | Self::Less
            | Self::LessEqual
            | Self::Greater
            | Self::GreaterEqual
            | Self::NotEqual => T::RelationalOp,
            Self::Not => T::LogicalUnaryOp,
            Self::Ampersand | Self::Pipe => T::BitwiseOp,
            Self::LogicalAnd | Self::LogicalOr => T::LogicalBinaryOp,
            Self::OpenBracket => T::OpenBracket,
            Self::CloseBracket => T::CloseBracket,
            Self::OpenBrace => T::OpenBrace,
            Self::CloseBrace => T::CloseBrace,
            Self::Comma => T::Comma,
            Self::Cursor => T::Cursor,
            Self::Terminator => T::Terminator,
            Self::Start
            | Self::Whitespace
            | Self::FractionMark
            | Self::ExponentMark
            | Self::ExponentSign
            | Self::StringBody
            | Self::End => return None,
        };
        Some(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> Option<State> {
        input
            .chars()
            .try_fold(State::Start, |state, ch| state.transition(CharClass::of(ch)))
    }

    #[test]
    fn test_char_classes() {
        assert_eq!(CharClass::of('e'), CharClass::Exponent);
        assert_eq!(CharClass::of('E'), CharClass::Exponent);
        assert_eq!(CharClass::of('q'), CharClass::Letter);
        assert_eq!(CharClass::of('é'), CharClass::Letter);
        assert_eq!(CharClass::of('Ж'), CharClass::Letter);
        assert_eq!(CharClass::of('٣'), CharClass::Other);
        assert_eq!(CharClass::of('\t'), CharClass::Whitespace);
        assert_eq!(CharClass::of('~'), CharClass::Other);
        assert!(CharClass::Dollar.starts_identifier());
        assert!(!CharClass::Digit.starts_identifier());
    }

    #[test]
    fn test_number_paths() {
        assert_eq!(run("42"), Some(State::Integer));
        assert_eq!(run("-42"), Some(State::Integer));
        assert_eq!(run("3.14"), Some(State::Fraction));
        assert_eq!(run("1e5"), Some(State::Exponent));
        assert_eq!(run("2.5E-3"), Some(State::Exponent));

        let dangling = run("1.").unwrap();
        assert!(!dangling.is_accepting());
        assert_eq!(dangling.category(), None);
        assert_eq!(run("1.e"), None);
    }

    #[test]
    fn test_operator_paths() {
        assert_eq!(run("===").and_then(State::category), Some(TokenCategory::RelationalOp));
        assert_eq!(run("=").and_then(State::category), Some(TokenCategory::AssignmentOp));
        assert_eq!(run("++").and_then(State::category), Some(TokenCategory::ArithmeticUnaryOp));
        assert_eq!(run("&&").and_then(State::category), Some(TokenCategory::LogicalBinaryOp));
        assert_eq!(run("|").and_then(State::category), Some(TokenCategory::BitwiseOp));
        assert_eq!(run("/").and_then(State::category), Some(TokenCategory::ArithmeticMul));
        assert_eq!(run("!").and_then(State::category), Some(TokenCategory::LogicalUnaryOp));
        assert_eq!(run("===="), None);
        assert_eq!(run("+++"), None);
    }

    #[test]
    fn test_strings_need_closing_quote() {
        assert_eq!(run("\"a b ~\""), Some(State::StringEnd));
        let open = run("\"abc").unwrap();
        assert!(!open.is_accepting());
        assert_eq!(open.transition(CharClass::End), None);
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(run("$x1"), Some(State::Identifier));
        assert_eq!(run("else"), Some(State::Identifier));
        assert_eq!(run("$$"), None);
        assert!(State::Whitespace.is_accepting());
        assert_eq!(State::Whitespace.category(), None);
    }
}
