use crate::file_processor::FileProcessorError;
use crate::lexical::LexerError;
use crate::logging::Code;
use crate::syntax::SyntaxError;
use crate::utils::{SourceMap, Span};

/// First failure of a tokenize-then-parse run
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Syntax analysis failed: {0}")]
    SyntaxAnalysis(#[from] SyntaxError),
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::FileProcessing(error) => error.error_code(),
            Self::LexicalAnalysis(error) => error.error_code(),
            Self::SyntaxAnalysis(error) => error.error_code(),
        }
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            Self::FileProcessing(_) => None,
            Self::LexicalAnalysis(error) => error.line(),
            Self::SyntaxAnalysis(error) => error.line(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::FileProcessing(_) => None,
            Self::LexicalAnalysis(error) => error.span(),
            Self::SyntaxAnalysis(error) => error.span(),
        }
    }

    /// Render against the source that produced the error, with a caret
    /// under the offending text when its location is known
    pub fn render(&self, source: &str) -> String {
        let message = format!("[{}] {}", self.error_code(), self);
        match self.span() {
            Some(span) => SourceMap::new(source).format_error(&span, &message),
            None => format!("error: {}\n", message),
        }
    }
}
