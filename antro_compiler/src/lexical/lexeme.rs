//! Buffer for the characters of the token being recognized

use crate::config::compile_time::lexical::MAX_TOKEN_SIZE;
use crate::utils::Position;

#[derive(Debug, Clone)]
pub struct LexemeAccumulator {
    buffer: String,
    char_count: usize,
    start: Position,
}

impl Default for LexemeAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl LexemeAccumulator {
    pub fn new() -> Self {
        Self {
            buffer: String::with_capacity(MAX_TOKEN_SIZE),
            char_count: 0,
            start: Position::start(),
        }
    }

    /// Append `ch`; the first character fixes the token's start position
    pub fn push(&mut self, ch: char, at: Position) {
        if self.buffer.is_empty() {
            self.start = at;
        }
        self.buffer.push(ch);
        self.char_count += 1;
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.char_count
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn start(&self) -> Position {
        self.start
    }

    /// Take the lexeme and its start position, leaving the buffer empty
    pub fn flush(&mut self) -> (String, Position) {
        let lexeme = std::mem::replace(&mut self.buffer, String::with_capacity(MAX_TOKEN_SIZE));
        self.char_count = 0;
        (lexeme, self.start)
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.char_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_returns_lexeme_and_start() {
        let mut acc = LexemeAccumulator::new();
        acc.push('=', Position::new(7, 2, 3));
        acc.push('=', Position::new(8, 2, 4));
        assert_eq!(acc.len(), 2);

        let (lexeme, start) = acc.flush();
        assert_eq!(lexeme, "==");
        assert_eq!(start, Position::new(7, 2, 3));
        assert!(acc.is_empty());
        assert_eq!(acc.len(), 0);
    }

    #[test]
    fn test_lexeme_may_exceed_initial_capacity() {
        let mut acc = LexemeAccumulator::new();
        for i in 0..MAX_TOKEN_SIZE * 2 {
            acc.push('a', Position::new(i, 1, i as u32 + 1));
        }
        assert_eq!(acc.len(), MAX_TOKEN_SIZE * 2);
    }

    #[test]
    fn test_char_count_differs_from_bytes() {
        let mut acc = LexemeAccumulator::new();
        acc.push('"', Position::start());
        acc.push('é', Position::new(1, 1, 2));
        assert_eq!(acc.len(), 2);
        assert_eq!(acc.as_str().len(), 3);
    }
}
