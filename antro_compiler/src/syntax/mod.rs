//! Syntax analysis: token stream to parse tree
//!
//! A predictive descent parser with single-token lookahead and bounded
//! pushback. The first mandatory mismatch aborts the parse.

mod error;
mod parser;

pub use error::{SyntaxError, SyntaxResult};
pub use parser::AntroParser;

use crate::config::runtime::SyntaxPreferences;
use crate::grammar::tree::ParseTree;
use crate::logging::codes;
use crate::tokens::TokenStream;
use crate::{log_debug, log_error, log_success};

/// Parse a program with default preferences
pub fn parse(token_stream: TokenStream) -> SyntaxResult<ParseTree> {
    parse_with_preferences(token_stream, SyntaxPreferences::default())
}

pub fn parse_with_preferences(
    token_stream: TokenStream,
    preferences: SyntaxPreferences,
) -> SyntaxResult<ParseTree> {
    log_debug!("Starting syntax analysis", "tokens" => token_stream.len());

    let result = AntroParser::with_preferences(token_stream, preferences).parse();

    match &result {
        Ok(tree) => {
            log_success!(codes::success::PARSE_TREE_COMPLETE, "Syntax analysis completed",
                "nodes" => tree.len(),
                "depth" => tree.depth()
            );
        }
        Err(error) => {
            let line = error.line().map(|l| l.to_string()).unwrap_or_default();
            log_error!(error.error_code(), "Syntax analysis failed",
                "error" => error,
                "line" => line
            );
        }
    }

    result
}

/// Check that every syntax error code is registered
pub fn init_syntax_logging() -> Result<(), String> {
    let syntax_codes = [
        codes::syntax::TRAILING_INPUT,
        codes::syntax::UNEXPECTED_END_OF_INPUT,
        codes::syntax::INVALID_KEYWORD,
        codes::syntax::UNEXPECTED_TOKEN,
        codes::syntax::MAX_RECURSION_DEPTH,
        codes::stream::PUSH_BACK_FAILED,
    ];

    for code in &syntax_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Syntax error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_module_api() {
        let tree = parse(tokenize("begin: call run(); end;").unwrap()).unwrap();
        assert_eq!(tree.child_labels(), vec!["program_block"]);
        assert!(tree.find("call").is_some());
    }

    #[test]
    fn test_failure_is_returned_once() {
        let err = parse(tokenize("begin: retn x end;").unwrap()).unwrap_err();
        assert_matches!(err, SyntaxError::UnexpectedToken { line: 1, .. });
        assert_eq!(err.error_code(), codes::syntax::UNEXPECTED_TOKEN);
    }

    #[test]
    fn test_syntax_codes_registered() {
        assert!(init_syntax_logging().is_ok());
    }
}
