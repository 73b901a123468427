//! Token model for the Antro front end
//!
//! The lexical automaton fills a [`TokenStream`] with [`Token`]s in one pass;
//! the parser then drains it through lookahead, consume and pushback.

pub mod token;
pub mod token_stream;

pub use token::{Token, TokenCategory};
pub use token_stream::{TokenStream, TokenStreamError};
