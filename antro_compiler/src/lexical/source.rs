//! Addressable source text with a single forward cursor

use crate::lexical::automaton::CharClass;
use crate::utils::Position;

/// Character handed out once the cursor has passed the last source character
pub const END_OF_INPUT: char = '\0';

#[derive(Debug, Clone)]
pub struct SourceBuffer {
    chars: Vec<char>,
    cursor: usize,
    position: Position,
}

impl SourceBuffer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            cursor: 0,
            position: Position::start(),
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.chars.len()
    }

    /// Character under the cursor, or [`END_OF_INPUT`] once exhausted
    pub fn current(&self) -> char {
        self.peek_at(0).unwrap_or(END_OF_INPUT)
    }

    /// Class of the character under the cursor; the end of input has its own class
    pub fn current_class(&self) -> CharClass {
        if self.is_at_end() {
            CharClass::End
        } else {
            CharClass::of(self.current())
        }
    }

    /// Character `n` places past the cursor without moving it
    pub fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.cursor + n).copied()
    }

    /// Consume the current character; position follows newlines
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek_at(0)?;
        self.cursor += 1;
        self.position = self.position.advance(ch);
        Some(ch)
    }

    /// Position of the character under the cursor
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_walks_to_sentinel() {
        let mut buffer = SourceBuffer::new("a\nb");
        assert_eq!(buffer.current(), 'a');
        assert_eq!(buffer.advance(), Some('a'));
        assert_eq!(buffer.advance(), Some('\n'));
        assert_eq!(buffer.line(), 2);
        assert_eq!(buffer.position().column, 1);
        assert_eq!(buffer.advance(), Some('b'));

        assert!(buffer.is_at_end());
        assert_eq!(buffer.current(), END_OF_INPUT);
        assert_eq!(buffer.current_class(), CharClass::End);
        assert_eq!(buffer.advance(), None);
        assert_eq!(buffer.position().offset, 3);
    }

    #[test]
    fn test_nul_in_source_is_not_the_end() {
        let buffer = SourceBuffer::new("\0");
        assert!(!buffer.is_at_end());
        assert_eq!(buffer.current_class(), CharClass::Other);
    }

    #[test]
    fn test_peek_does_not_move() {
        let buffer = SourceBuffer::new("12.5");
        assert_eq!(buffer.peek_at(2), Some('.'));
        assert_eq!(buffer.peek_at(4), None);
        assert_eq!(buffer.current(), '1');
    }
}
