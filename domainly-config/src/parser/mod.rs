//! nginx-style configuration parsing
//!
//! Pipeline: [`cursor`] walks the raw text, [`parser`] builds the generic
//! directive tree, [`specialize`] classifies it into the typed model in
//! [`ast`].

pub mod ast;
pub mod cursor;
pub mod parser;
pub mod specialize;

pub use ast::{Directive, DirectiveValue, Location, NginxConfig, ServerBlock, Upstream};
pub use cursor::Cursor;
pub use parser::{parse_directives, Parser, MAX_BLOCK_DEPTH};
pub use specialize::classify;

/// Parse configuration text into the typed model
pub fn parse(source: &str) -> NginxConfig {
    classify(parse_directives(source))
}
