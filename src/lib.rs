//! Zig-grammar parser and Mach-O export trie.
//!
//! Two independent cores share this crate. The [`ast`] and [`token`]
//! modules take source bytes to a flat, index-based syntax tree plus a
//! list of structured diagnostics, recovering from syntax errors instead
//! of stopping at the first one. The [`export_trie`] module builds,
//! lays out and (de)serializes the export trie found in Mach-O binaries.

pub mod token;
pub use token::{Token, Tokenizer};

pub mod ast;
pub use ast::Ast;

mod parse;

pub mod export_trie;
