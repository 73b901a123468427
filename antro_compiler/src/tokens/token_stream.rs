//! Token stream with lookahead, consumption history and bounded pushback
//!
//! Tokens live in one buffer; a read cursor splits it into consumed history
//! (before the cursor) and pending tokens (from the cursor on). Pushing back
//! moves the cursor toward the start, so restored tokens keep their order.

use crate::logging::codes::{self, Code};
use crate::tokens::token::Token;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenStreamError {
    #[error("Cannot push back {requested} tokens: only {available} consumed")]
    PushBackFailed { requested: usize, available: usize },
}

impl TokenStreamError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::PushBackFailed { .. } => codes::stream::PUSH_BACK_FAILED,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Append a freshly produced token to the pending end
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    // === CONSUMER OPERATIONS ===

    /// Front of the pending sequence
    pub fn lookahead(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    /// Pending token `n` places after the front
    pub fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.cursor + n)
    }

    /// Most recently produced token, regardless of cursor position
    pub fn last_produced(&self) -> Option<&Token> {
        self.tokens.last()
    }

    /// Move the front pending token into history and return it
    pub fn consume(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(token)
    }

    /// Restore the `n` most recently consumed tokens to the front of pending.
    /// Asking for more than were consumed rewinds to the start and reports the shortfall.
    pub fn push_back(&mut self, n: usize) -> Result<(), TokenStreamError> {
        if n > self.cursor {
            let available = self.cursor;
            self.cursor = 0;
            return Err(TokenStreamError::PushBackFailed {
                requested: n,
                available,
            });
        }
        self.cursor -= n;
        Ok(())
    }

    /// Number of pending tokens
    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.cursor
    }

    // === INSPECTION ===

    /// Number of tokens in history
    pub fn consumed(&self) -> usize {
        self.cursor
    }

    pub fn history(&self) -> &[Token] {
        &self.tokens[..self.cursor]
    }

    pub fn pending(&self) -> &[Token] {
        &self.tokens[self.cursor..]
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Only an EOF marker, or nothing, remains
    pub fn is_exhausted(&self) -> bool {
        self.lookahead().map_or(true, Token::is_eof)
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenCategory;
    use crate::utils::Position;
    use assert_matches::assert_matches;

    fn stream_of(lexemes: &[(TokenCategory, &str)]) -> TokenStream {
        let tokens = lexemes
            .iter()
            .enumerate()
            .map(|(i, (cat, lex))| Token::new(*cat, *lex, Position::new(i, 1, i as u32 + 1)))
            .collect();
        TokenStream::from_tokens(tokens)
    }

    fn sample() -> TokenStream {
        stream_of(&[
            (TokenCategory::Keyword, "retn"),
            (TokenCategory::Variable, "x"),
            (TokenCategory::Terminator, ";"),
        ])
    }

    #[test]
    fn test_lookahead_does_not_consume() {
        let stream = sample();
        assert_eq!(stream.lookahead().map(|t| t.lexeme.as_str()), Some("retn"));
        assert_eq!(stream.lookahead().map(|t| t.lexeme.as_str()), Some("retn"));
        assert_eq!(stream.remaining(), 3);
        assert_eq!(stream.peek_ahead(2).map(|t| t.lexeme.as_str()), Some(";"));
    }

    #[test]
    fn test_consume_moves_into_history() {
        let mut stream = sample();
        let first = stream.consume().unwrap();
        assert_eq!(first.lexeme, "retn");
        assert_eq!(stream.history(), &[first]);
        assert_eq!(stream.remaining(), 2);
        assert_eq!(stream.consumed() + stream.remaining(), stream.len());
    }

    #[test]
    fn test_consume_all_then_push_back_restores_sequence() {
        let mut stream = sample();
        let original: Vec<Token> = stream.pending().to_vec();

        while stream.consume().is_some() {}
        assert_eq!(stream.remaining(), 0);
        assert!(stream.lookahead().is_none());

        stream.push_back(3).unwrap();
        assert_eq!(stream.remaining(), 3);
        assert_eq!(stream.pending(), original.as_slice());
    }

    #[test]
    fn test_push_back_restores_lexed_program() {
        let source = "require:\"io\";\ndef total int;\nbegin:\n  var total = 1 + 2.5 * x;\n  call print(\"done\n\", total);\n  retn total;\nend;\n";
        let mut stream = crate::lexical::tokenize(source).expect("tokenize");
        let signature = |tokens: &[Token]| -> Vec<(TokenCategory, String, u32)> {
            tokens
                .iter()
                .map(|t| (t.category, t.lexeme.clone(), t.line()))
                .collect()
        };
        let original = signature(stream.pending());
        let total = stream.remaining();
        assert!(total > 20);
        assert_eq!(original.iter().find(|t| t.1 == "end").map(|t| t.2), Some(8));

        for n in [1, 7, total / 2, total] {
            for _ in 0..n {
                assert!(stream.consume().is_some());
            }
            stream.push_back(n).unwrap();
            assert_eq!(stream.remaining(), total);
            assert_eq!(signature(stream.pending()), original);
        }
    }

    #[test]
    fn test_partial_push_back_restores_order() {
        let mut stream = sample();
        stream.consume();
        stream.consume();
        stream.push_back(1).unwrap();

        assert_eq!(stream.lookahead().map(|t| t.lexeme.as_str()), Some("x"));
        assert_eq!(stream.consumed(), 1);
    }

    #[test]
    fn test_push_back_more_than_history_fails() {
        let mut stream = sample();
        stream.consume();

        let result = stream.push_back(4);
        assert_matches!(
            result,
            Err(TokenStreamError::PushBackFailed {
                requested: 4,
                available: 1
            })
        );
        assert_eq!(stream.consumed(), 0);
        assert_eq!(stream.remaining(), 3);
        assert_eq!(
            result.unwrap_err().error_code(),
            codes::stream::PUSH_BACK_FAILED
        );
    }

    #[test]
    fn test_last_produced_ignores_cursor() {
        let mut stream = sample();
        stream.consume();
        assert_eq!(stream.last_produced().map(|t| t.lexeme.as_str()), Some(";"));

        stream.push(Token::eof(Position::new(3, 1, 4)));
        assert!(stream.last_produced().unwrap().is_eof());
    }

    #[test]
    fn test_exhausted_with_only_eof_left() {
        let mut stream = stream_of(&[(TokenCategory::Terminator, ";"), (TokenCategory::Eof, "")]);
        assert!(!stream.is_exhausted());
        stream.consume();
        assert!(stream.is_exhausted());
        stream.consume();
        assert!(stream.is_exhausted());
        assert!(stream.consume().is_none());
    }
}
