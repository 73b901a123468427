//! Language tables and the parse tree model

pub mod keywords;
pub mod precedence;
pub mod tree;

pub use keywords::{is_reserved_keyword, Keyword};
pub use precedence::{binary_precedence, Precedence};
pub use tree::{ParseOutput, ParseTree};
