//! Front end of the Antro language: a DFA tokenizer feeding a predictive
//! descent parser that builds a labelled parse tree.

// Internal modules
pub mod config;
pub mod file_processor;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use grammar::{ParseOutput, ParseTree};
pub use lexical::{tokenize, LexerError, LexicalAnalyzer};
pub use pipeline::output::PipelineOutput;
pub use pipeline::{process_file, process_source, PipelineError, PipelineResult};
pub use syntax::{parse, AntroParser, SyntaxError};
pub use tokens::{Token, TokenCategory, TokenStream, TokenStreamError};
