//! Lexical analysis for Antro source text
//!
//! The whole source is tokenized eagerly into a [`TokenStream`] before
//! parsing starts; the first lexical failure aborts the run.

pub mod analyzer;
pub mod automaton;
pub mod lexeme;
pub mod source;

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::TokenStream;

pub use analyzer::{LexerError, LexicalAnalyzer, LexicalMetrics};
pub use automaton::{CharClass, State};

/// Tokenize with default preferences
pub fn tokenize(source: &str) -> Result<TokenStream, LexerError> {
    create_analyzer().tokenize(source)
}

/// Tokenize with custom runtime preferences (limits remain compile-time)
pub fn tokenize_with_preferences(
    source: &str,
    preferences: LexicalPreferences,
) -> Result<TokenStream, LexerError> {
    create_analyzer_with_preferences(preferences).tokenize(source)
}

pub fn create_analyzer() -> LexicalAnalyzer {
    LexicalAnalyzer::new()
}

pub fn create_analyzer_with_preferences(preferences: LexicalPreferences) -> LexicalAnalyzer {
    LexicalAnalyzer::with_preferences(preferences)
}

/// Check that every lexical error code is registered and the limits are usable
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    let lexical_codes = [
        codes::lexical::INVALID_CHARACTER,
        codes::lexical::UNTERMINATED_STRING,
        codes::lexical::MALFORMED_NUMBER,
        codes::lexical::IDENTIFIER_TOO_LONG,
        codes::lexical::STRING_TOO_LARGE,
        codes::lexical::TOO_MANY_TOKENS,
    ];

    for code in &lexical_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    if MAX_STRING_SIZE == 0 || MAX_IDENTIFIER_LENGTH == 0 || MAX_TOKEN_COUNT == 0 {
        return Err("Lexical limits cannot be zero".to_string());
    }

    crate::log_debug!("Lexical limits initialized",
        "max_token_size" => MAX_TOKEN_SIZE,
        "max_string_size" => MAX_STRING_SIZE,
        "max_identifier_length" => MAX_IDENTIFIER_LENGTH,
        "max_token_count" => MAX_TOKEN_COUNT
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenCategory;

    #[test]
    fn test_module_api() {
        let stream = tokenize("retn x;").expect("tokenize");
        assert_eq!(stream.len(), 3);
        assert_eq!(stream.consumed(), 0);

        let prefs = LexicalPreferences {
            emit_eof_token: true,
            ..LexicalPreferences::default()
        };
        let stream = tokenize_with_preferences("", prefs).expect("tokenize");
        assert_eq!(stream.len(), 1);
        assert_eq!(stream.tokens()[0].category, TokenCategory::Eof);
    }

    #[test]
    fn test_lexical_codes_registered() {
        assert!(init_lexical_analysis_logging().is_ok());
    }
}
