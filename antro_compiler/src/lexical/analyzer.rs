//! Lexical analyzer: recognizers driving the automaton over a source buffer
//!
//! Each scan step offers the current character to the recognizers in a fixed
//! priority order. The first recognizer that claims it runs the automaton to
//! the end of its lexeme; the accepting state then decides the token category.

use std::collections::HashMap;

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::grammar::keywords::{classify_word, WordType};
use crate::lexical::automaton::{CharClass, State};
use crate::lexical::lexeme::LexemeAccumulator;
use crate::lexical::source::SourceBuffer;
use crate::logging::codes;
use crate::tokens::{Token, TokenCategory, TokenStream};
use crate::utils::{Position, Span};
use crate::{log_debug, log_error, log_success};

/// Lexical analysis errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error(
        "Invalid token character: '{character}' found on line :{line} just before: '{}'",
        .preceding_token_tail.map(String::from).unwrap_or_default()
    )]
    InvalidCharacter {
        character: char,
        line: u32,
        column: u32,
        /// Last character of the token emitted before the failure
        preceding_token_tail: Option<char>,
    },

    #[error("Unterminated string literal starting on line {line}")]
    UnterminatedString { line: u32 },

    #[error("Malformed number '{lexeme}' on line {line}")]
    MalformedNumber { lexeme: String, line: u32 },

    #[error("Identifier too long on line {line}: {length} characters (max {MAX_IDENTIFIER_LENGTH})")]
    IdentifierTooLong { length: usize, line: u32 },

    #[error("String too large on line {line}: {size} characters (max {MAX_STRING_SIZE})")]
    StringTooLarge { size: usize, line: u32 },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            LexerError::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            LexerError::MalformedNumber { .. } => codes::lexical::MALFORMED_NUMBER,
            LexerError::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
            LexerError::StringTooLarge { .. } => codes::lexical::STRING_TOO_LARGE,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            LexerError::InvalidCharacter { line, .. }
            | LexerError::UnterminatedString { line }
            | LexerError::MalformedNumber { line, .. }
            | LexerError::IdentifierTooLong { line, .. }
            | LexerError::StringTooLarge { line, .. } => Some(*line),
            LexerError::TooManyTokens { .. } => None,
        }
    }

    /// Location for diagnostics; column 1 when only the line is known
    pub fn span(&self) -> Option<Span> {
        let column = match self {
            LexerError::InvalidCharacter { column, .. } => *column,
            _ => 1,
        };
        self.line()
            .map(|line| Span::single(Position::new(0, line, column)))
    }
}

/// Counters collected while tokenizing
#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub longest_lexeme: usize,
    pub lines_scanned: u32,
    pub whitespace_chars: usize,

    // Runtime preference-controlled metrics
    pub category_counts: HashMap<TokenCategory, usize>,
}

impl LexicalMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        self.total_tokens += 1;
        if token.category == TokenCategory::Keyword {
            self.keyword_tokens += 1;
        }
        self.longest_lexeme = self.longest_lexeme.max(token.lexeme.chars().count());

        if preferences.track_category_counts {
            *self.category_counts.entry(token.category).or_insert(0) += 1;
        }
    }

    /// Tokens seen in `category`; zero when category tracking is off
    pub fn count(&self, category: TokenCategory) -> usize {
        self.category_counts.get(&category).copied().unwrap_or(0)
    }
}

/// Tokenizer entry point holding preferences and the metrics of the last run
#[derive(Debug, Default)]
pub struct LexicalAnalyzer {
    preferences: LexicalPreferences,
    metrics: LexicalMetrics,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            preferences,
            metrics: LexicalMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: LexicalPreferences) {
        self.preferences = preferences;
    }

    pub fn tokenize(&mut self, source: &str) -> Result<TokenStream, LexerError> {
        self.tokenize_named("<input>", source)
    }

    /// Tokenize `source` in a single pass; `source_name` only labels log events
    pub fn tokenize_named(
        &mut self,
        source_name: &str,
        source: &str,
    ) -> Result<TokenStream, LexerError> {
        log_debug!("Starting tokenization",
            "source" => source_name,
            "chars" => source.chars().count()
        );

        let mut scanner = Scanner::new(source, self.preferences.clone());
        let outcome = scanner.run();
        self.metrics = scanner.metrics;

        match outcome {
            Ok(()) => {
                log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
                    "source" => source_name,
                    "tokens" => self.metrics.total_tokens,
                    "keywords" => self.metrics.keyword_tokens,
                    "lines" => self.metrics.lines_scanned
                );
                Ok(scanner.stream)
            }
            Err(error) => {
                self.log_failure(source_name, &error);
                Err(error)
            }
        }
    }

    fn log_failure(&self, source_name: &str, error: &LexerError) {
        let line = error.line().map(|l| l.to_string()).unwrap_or_default();
        match (error, self.preferences.include_position_in_errors) {
            (LexerError::InvalidCharacter { column, .. }, true) => {
                log_error!(error.error_code(), &error.to_string(),
                    "source" => source_name,
                    "line" => line,
                    "column" => column
                );
            }
            _ => {
                log_error!(error.error_code(), &error.to_string(),
                    "source" => source_name,
                    "line" => line
                );
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberShape {
    Int,
    Float,
}

type Recognizer = fn(&mut Scanner) -> Result<bool, LexerError>;

/// Recognizers in priority order
const RECOGNIZERS: [Recognizer; 16] = [
    Scanner::recognize_float,
    Scanner::recognize_int,
    Scanner::recognize_cursor,
    Scanner::recognize_comma,
    Scanner::recognize_whitespace,
    Scanner::recognize_variable,
    Scanner::recognize_relational,
    Scanner::recognize_arithmetic,
    Scanner::recognize_assignment,
    Scanner::recognize_logical,
    Scanner::recognize_open_bracket,
    Scanner::recognize_open_brace,
    Scanner::recognize_close_brace,
    Scanner::recognize_close_bracket,
    Scanner::recognize_string,
    Scanner::recognize_terminator,
];

/// State of one tokenization run
struct Scanner {
    source: SourceBuffer,
    lexeme: LexemeAccumulator,
    state: State,
    stream: TokenStream,
    preferences: LexicalPreferences,
    metrics: LexicalMetrics,
}

impl Scanner {
    fn new(source: &str, preferences: LexicalPreferences) -> Self {
        Self {
            source: SourceBuffer::new(source),
            lexeme: LexemeAccumulator::new(),
            state: State::Start,
            stream: TokenStream::new(),
            preferences,
            metrics: LexicalMetrics::new(),
        }
    }

    fn run(&mut self) -> Result<(), LexerError> {
        while !self.source.is_at_end() {
            if !self.recognize_next()? {
                return Err(self.invalid_character());
            }
            self.emit()?;
        }

        self.state = State::End;
        self.metrics.lines_scanned = self.source.line();

        if self.preferences.emit_eof_token {
            self.push_token(Token::eof(self.source.position()))?;
        }
        Ok(())
    }

    fn recognize_next(&mut self) -> Result<bool, LexerError> {
        for recognize in RECOGNIZERS {
            if recognize(self)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    // === AUTOMATON STEPS ===

    fn step(&mut self, next: State) {
        let at = self.source.position();
        if let Some(ch) = self.source.advance() {
            self.lexeme.push(ch, at);
        }
        self.state = next;
    }

    /// Take the transition on the current character if `allowed` admits its target
    fn advance_if(&mut self, allowed: impl Fn(State) -> bool) -> bool {
        match self.state.transition(self.source.current_class()) {
            Some(next) if allowed(next) => {
                self.step(next);
                true
            }
            _ => false,
        }
    }

    fn advance_while(&mut self, allowed: impl Fn(State) -> bool) {
        while self.advance_if(&allowed) {}
    }

    fn claim(&mut self, class: CharClass) -> bool {
        self.source.current_class() == class && self.advance_if(|_| true)
    }

    fn claim_any(&mut self, classes: &[CharClass]) -> bool {
        classes.contains(&self.source.current_class()) && self.advance_if(|_| true)
    }

    // === RECOGNIZERS ===

    fn recognize_float(&mut self) -> Result<bool, LexerError> {
        if self.number_shape() != Some(NumberShape::Float) {
            return Ok(false);
        }
        self.munch_number()
    }

    fn recognize_int(&mut self) -> Result<bool, LexerError> {
        if self.number_shape() != Some(NumberShape::Int) {
            return Ok(false);
        }
        self.munch_number()
    }

    fn recognize_cursor(&mut self) -> Result<bool, LexerError> {
        Ok(self.claim(CharClass::Colon))
    }

    fn recognize_comma(&mut self) -> Result<bool, LexerError> {
        Ok(self.claim(CharClass::Comma))
    }

    /// One whitespace character per step
    fn recognize_whitespace(&mut self) -> Result<bool, LexerError> {
        Ok(self.claim(CharClass::Whitespace))
    }

    fn recognize_variable(&mut self) -> Result<bool, LexerError> {
        if !self.source.current_class().starts_identifier() {
            return Ok(false);
        }
        self.advance_while(|next| next == State::Identifier);

        if self.lexeme.len() > MAX_IDENTIFIER_LENGTH {
            return Err(LexerError::IdentifierTooLong {
                length: self.lexeme.len(),
                line: self.lexeme.start().line,
            });
        }
        Ok(true)
    }

    /// `<` `>` `!` with an optional `=`, plus `==` and `===`
    fn recognize_relational(&mut self) -> Result<bool, LexerError> {
        let claimed = match self.source.current_class() {
            CharClass::Less | CharClass::Greater | CharClass::Bang => self.advance_if(|_| true),
            CharClass::Equals if self.source.peek_at(1) == Some('=') => self.advance_if(|_| true),
            _ => false,
        };
        if claimed {
            self.advance_while(|_| true);
        }
        Ok(claimed)
    }

    fn recognize_arithmetic(&mut self) -> Result<bool, LexerError> {
        let claimed = self.claim_any(&[
            CharClass::Plus,
            CharClass::Minus,
            CharClass::Star,
            CharClass::Slash,
            CharClass::Percent,
        ]);
        if claimed {
            self.advance_if(|next| matches!(next, State::Increment | State::Decrement));
        }
        Ok(claimed)
    }

    fn recognize_assignment(&mut self) -> Result<bool, LexerError> {
        Ok(self.claim(CharClass::Equals))
    }

    fn recognize_logical(&mut self) -> Result<bool, LexerError> {
        let claimed = self.claim_any(&[CharClass::Ampersand, CharClass::Pipe]);
        if claimed {
            self.advance_while(|_| true);
        }
        Ok(claimed)
    }

    fn recognize_open_bracket(&mut self) -> Result<bool, LexerError> {
        Ok(self.claim(CharClass::OpenParen))
    }

    fn recognize_open_brace(&mut self) -> Result<bool, LexerError> {
        Ok(self.claim(CharClass::OpenBrace))
    }

    fn recognize_close_brace(&mut self) -> Result<bool, LexerError> {
        Ok(self.claim(CharClass::CloseBrace))
    }

    fn recognize_close_bracket(&mut self) -> Result<bool, LexerError> {
        Ok(self.claim(CharClass::CloseParen))
    }

    fn recognize_string(&mut self) -> Result<bool, LexerError> {
        let line = self.source.line();
        if !self.claim(CharClass::Quote) {
            return Ok(false);
        }

        while self.state != State::StringEnd {
            if !self.advance_if(|_| true) {
                return Err(LexerError::UnterminatedString { line });
            }
            if self.lexeme.len() > MAX_STRING_SIZE {
                return Err(LexerError::StringTooLarge {
                    size: self.lexeme.len(),
                    line,
                });
            }
        }
        Ok(true)
    }

    fn recognize_terminator(&mut self) -> Result<bool, LexerError> {
        Ok(self.claim(CharClass::Semicolon))
    }

    // === NUMBERS ===

    /// Look ahead over an optional sign and a digit run without consuming
    fn number_shape(&self) -> Option<NumberShape> {
        let mut offset = 0;
        if matches!(self.source.peek_at(0), Some('+' | '-')) {
            if !self.at_expression_start() {
                return None;
            }
            offset = 1;
        }

        let digits = (offset..)
            .take_while(|&i| self.source.peek_at(i).is_some_and(|c| c.is_ascii_digit()))
            .count();
        if digits == 0 {
            return None;
        }

        match self.source.peek_at(offset + digits) {
            Some('.' | 'e' | 'E') => Some(NumberShape::Float),
            _ => Some(NumberShape::Int),
        }
    }

    /// A sign may only start a number when the previous token cannot end an operand
    fn at_expression_start(&self) -> bool {
        self.stream
            .last_produced()
            .map_or(true, |token| !token.category.ends_operand())
    }

    fn munch_number(&mut self) -> Result<bool, LexerError> {
        self.advance_while(State::is_numeric);

        if !self.state.is_accepting() {
            return Err(LexerError::MalformedNumber {
                lexeme: self.lexeme.as_str().to_string(),
                line: self.lexeme.start().line,
            });
        }
        Ok(true)
    }

    // === EMISSION ===

    fn emit(&mut self) -> Result<(), LexerError> {
        let state = std::mem::replace(&mut self.state, State::Start);

        let Some(category) = state.category() else {
            self.metrics.whitespace_chars += self.lexeme.len();
            self.lexeme.clear();
            return Ok(());
        };

        let (lexeme, position) = self.lexeme.flush();
        let category = match category {
            TokenCategory::Variable => match classify_word(&lexeme) {
                WordType::Keyword => TokenCategory::Keyword,
                WordType::BooleanLiteral => TokenCategory::Boolean,
                WordType::Identifier => TokenCategory::Variable,
            },
            other => other,
        };

        self.push_token(Token::new(category, lexeme, position))
    }

    fn push_token(&mut self, token: Token) -> Result<(), LexerError> {
        if self.stream.len() >= MAX_TOKEN_COUNT {
            return Err(LexerError::TooManyTokens {
                count: self.stream.len() + 1,
            });
        }
        self.metrics.record_token(&token, &self.preferences);
        self.stream.push(token);
        Ok(())
    }

    fn invalid_character(&self) -> LexerError {
        let position = self.source.position();
        LexerError::InvalidCharacter {
            character: self.source.current(),
            line: position.line,
            column: position.column,
            preceding_token_tail: self.stream.last_produced().and_then(|token| token.tail()),
        }
    }
}
