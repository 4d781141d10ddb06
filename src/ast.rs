//! The abstract syntax tree.
//!
//! An [`Ast`] is three flat arrays: one node per grammar production that
//! needed materializing, a `u32` side arena for variable-length payloads,
//! and the token arrays produced by the tokenizer. Nodes reference each
//! other and the arena by index; node 0 is always the root.

use crate::parse::Parser;
use crate::token;
use crate::Tokenizer;

pub mod error;
pub mod node;

pub use error::Error;
pub use node::Node;

#[cfg(test)]
mod tests;

pub type TokenIndex = u32;
pub type ByteOffset = u32;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// A full source file: a top-level container.
    Zig,
    /// Object notation: a single expression.
    Zon,
}

pub struct Ast<'src> {
    pub source: &'src [u8],
    pub mode: Mode,
    pub token_tags: Vec<token::Tag>,
    pub token_starts: Vec<ByteOffset>,
    pub nodes: Vec<Node>,
    pub extra_data: Vec<node::Index>,
    pub errors: Vec<Error>,
}

pub struct Location {
    pub line: usize,
    pub column: usize,
    pub line_start: usize,
    pub line_end: usize,
}

impl<'src> Ast<'src> {
    pub fn parse(source: &'src [u8], mode: Mode) -> Ast<'src> {
        // Source text runs about eight bytes per token.
        let estimated_token_count = source.len() / 8;
        let mut token_tags = Vec::with_capacity(estimated_token_count);
        let mut token_starts = Vec::with_capacity(estimated_token_count);

        let mut tokenizer = Tokenizer::new(source);
        loop {
            let token = tokenizer.next();
            token_tags.push(token.tag);
            token_starts.push(token.start as ByteOffset);
            if token.tag == token::Tag::Eof {
                break;
            }
        }

        // And about two tokens per AST node.
        let estimated_node_count = (token_tags.len() + 2) / 2;

        let mut parser = Parser {
            source,
            token_tags: &token_tags,
            token_starts: &token_starts,
            tok_i: 0,
            nodes: Vec::with_capacity(estimated_node_count),
            extra_data: Vec::new(),
            errors: Vec::new(),
        };

        match mode {
            Mode::Zig => parser.parse_root(),
            Mode::Zon => parser.parse_zon(),
        }

        let Parser {
            nodes,
            extra_data,
            errors,
            ..
        } = parser;

        Ast {
            source,
            mode,
            token_tags,
            token_starts,
            nodes,
            extra_data,
            errors,
        }
    }

    pub fn token_tag(&self, index: TokenIndex) -> token::Tag {
        self.token_tags[index as usize]
    }

    pub fn token_start(&self, index: TokenIndex) -> ByteOffset {
        self.token_starts[index as usize]
    }

    pub fn node(&self, index: node::Index) -> &Node {
        &self.nodes[index as usize]
    }

    /// The source text from `start` to the end of the buffer.
    pub fn source_from(&self, start: ByteOffset) -> &[u8] {
        &self.source[start as usize..]
    }

    /// The top-level container members.
    pub fn root_decls(&self) -> &[node::Index] {
        let root = self.node(0);
        &self.extra_data[root.data.lhs as usize..root.data.rhs as usize]
    }

    /// Decode a packed record out of the extra arena.
    pub fn extra<T: node::Extra>(&self, index: node::Index) -> T {
        let start = index as usize;
        T::decode(&self.extra_data[start..start + T::LEN])
    }

    /// A single raw word of the extra arena.
    pub fn extra_u32(&self, index: node::Index) -> u32 {
        self.extra_data[index as usize]
    }

    /// Recover the text of a token. Fixed-lexeme tokens are answered from
    /// the tag; everything else is re-lexed from the recorded offset.
    pub fn token_slice(&self, index: TokenIndex) -> &[u8] {
        let tag = self.token_tag(index);
        if let Some(lexeme) = tag.lexeme() {
            return lexeme.as_bytes();
        }
        let mut tokenizer = Tokenizer::at(self.source, self.token_start(index) as usize);
        let token = tokenizer.next();
        debug_assert_eq!(token.tag, tag);
        &self.source[token.start..token.end]
    }

    /// Column correction for diagnostics whose token was retargeted to the
    /// previous token: point just past it instead of at its start.
    pub fn error_offset(&self, error: &Error) -> u32 {
        if error.token_is_prev {
            self.token_slice(error.token).len() as u32
        } else {
            0
        }
    }

    /// Line/column of a token, scanning from `start_offset`.
    pub fn token_location(&self, start_offset: ByteOffset, token: TokenIndex) -> Location {
        let target = self.token_start(token) as usize;
        let mut loc = Location {
            line: 0,
            column: 0,
            line_start: start_offset as usize,
            line_end: self.source.len(),
        };
        for (i, &c) in self.source.iter().enumerate().skip(loc.line_start) {
            if i == target {
                break;
            }
            if c == b'\n' {
                loc.line += 1;
                loc.column = 0;
                loc.line_start = i + 1;
            } else {
                loc.column += 1;
            }
        }
        loc.line_end = self.source[target..]
            .iter()
            .position(|&c| c == b'\n')
            .map_or(self.source.len(), |i| target + i);
        loc
    }
}
