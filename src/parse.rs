//! Recursive-descent parser.
//!
//! Grammar productions are methods on [`Parser`], split across the
//! submodules by area. Productions return `Result<node::Index>`: `Ok(0)`
//! means "this production does not apply here" (the null node), and `Err`
//! is a [`ParseError`] that has already been recorded as a diagnostic and
//! is handled by the closest enclosing member/statement loop, which scans
//! forward to a synchronization point and keeps going.

use tracing::trace;

use crate::ast::{self, error, node, Error, Node, TokenIndex};
use crate::token;

use crate::ast::error::Tag as E;
use crate::ast::node::Tag as N;
use crate::token::Tag as T;

mod asm;
mod container;
mod decl;
mod expr;
mod flow;
mod stmt;
mod types;

/// Recoverable syntactic fault. Carries no payload; the diagnostic was
/// pushed onto `Parser::errors` before this was raised.
pub struct ParseError;

pub type Result<T> = std::result::Result<T, ParseError>;

/// Index 0 doubles as "no node": the root occupies it and can never be the
/// child of anything.
const NULL_NODE: node::Index = 0;

pub struct Parser<'src, 'tok> {
    pub source: &'src [u8],
    pub token_tags: &'tok [token::Tag],
    pub token_starts: &'tok [ast::ByteOffset],
    pub tok_i: TokenIndex,
    pub nodes: Vec<Node>,
    pub extra_data: Vec<node::Index>,
    pub errors: Vec<Error>,
}

impl Parser<'_, '_> {
    pub fn parse_root(&mut self) {
        self.nodes.push(Node {
            tag: N::Root,
            main_token: 0,
            data: node::Data { lhs: 0, rhs: 0 },
        });
        let members = self.parse_container_members();
        let root_span = members.to_span(self);
        if self.token_tag(self.tok_i) != T::Eof {
            self.warn_expected(T::Eof);
        }
        self.nodes[0].data = node::Data {
            lhs: root_span.start,
            rhs: root_span.end,
        };
    }

    pub fn parse_zon(&mut self) {
        self.nodes.push(Node {
            tag: N::Root,
            main_token: 0,
            data: node::Data { lhs: 0, rhs: 0 },
        });
        // TODO: restrict ZON trees to the literal subset once the flag for
        // it exists; for now any expression is accepted.
        let Ok(expr) = self.expect_expr() else {
            assert!(!self.errors.is_empty());
            return;
        };
        if self.token_tag(self.tok_i) != T::Eof {
            self.warn_expected(T::Eof);
        }
        self.nodes[0].data = node::Data { lhs: expr, rhs: 0 };
    }

    // ---- token cursor ----

    pub(crate) fn token_tag(&self, index: TokenIndex) -> token::Tag {
        self.token_tags[index as usize]
    }

    pub(crate) fn token_start(&self, index: TokenIndex) -> ast::ByteOffset {
        self.token_starts[index as usize]
    }

    pub(crate) fn next_token(&mut self) -> TokenIndex {
        let result = self.tok_i;
        self.tok_i += 1;
        result
    }

    pub(crate) fn eat_token(&mut self, tag: token::Tag) -> Option<TokenIndex> {
        if self.token_tag(self.tok_i) == tag {
            Some(self.next_token())
        } else {
            None
        }
    }

    /// Consume a token the caller has already matched.
    pub(crate) fn assert_token(&mut self, tag: token::Tag) -> TokenIndex {
        let token = self.next_token();
        assert_eq!(self.token_tag(token), tag);
        token
    }

    pub(crate) fn expect_token(&mut self, tag: token::Tag) -> Result<TokenIndex> {
        if self.token_tag(self.tok_i) != tag {
            return self.fail_expected(tag);
        }
        Ok(self.next_token())
    }

    pub(crate) fn expect_semicolon(&mut self, error_tag: error::Tag, recoverable: bool) -> Result<()> {
        if self.token_tag(self.tok_i) == T::Semicolon {
            self.next_token();
            return Ok(());
        }
        self.warn(error_tag);
        if recoverable {
            Ok(())
        } else {
            Err(ParseError)
        }
    }

    pub(crate) fn tokens_on_same_line(&self, first: TokenIndex, second: TokenIndex) -> bool {
        let between = &self.source[self.token_start(first) as usize..self.token_start(second) as usize];
        !between.contains(&b'\n')
    }

    /// Skip a run of doc comments, reporting one that shares a line with
    /// the preceding token. Returns the first usable doc comment token.
    pub(crate) fn eat_doc_comments(&mut self) -> Option<TokenIndex> {
        let first = self.eat_token(T::DocComment)?;
        let mut first_line = first;
        if first != 0 && self.tokens_on_same_line(first - 1, first) {
            self.warn_msg(Error::new(E::SameLineDocComment, first));
            first_line = self.eat_token(T::DocComment)?;
        }
        while self.eat_token(T::DocComment).is_some() {}
        Some(first_line)
    }

    // ---- node and extra arenas ----

    pub(crate) fn node(&self, index: node::Index) -> &Node {
        &self.nodes[index as usize]
    }

    pub(crate) fn node_mut(&mut self, index: node::Index) -> &mut Node {
        &mut self.nodes[index as usize]
    }

    pub(crate) fn add_node(&mut self, elem: Node) -> node::Index {
        let result = self.nodes.len() as node::Index;
        self.nodes.push(elem);
        result
    }

    /// Allocate a node slot before its children so it gets a lower index.
    /// Pair with [`set_node`] on success or [`unreserve_node`] on error.
    ///
    /// [`set_node`]: Parser::set_node
    /// [`unreserve_node`]: Parser::unreserve_node
    pub(crate) fn reserve_node(&mut self, tag: node::Tag) -> node::Index {
        let result = self.nodes.len() as node::Index;
        self.nodes.push(Node {
            tag,
            main_token: 0,
            data: node::Data { lhs: 0, rhs: 0 },
        });
        result
    }

    pub(crate) fn set_node(&mut self, index: node::Index, elem: Node) -> node::Index {
        self.nodes[index as usize] = elem;
        index
    }

    /// Give back a reserved slot. If it is no longer the top of the arena
    /// it cannot be popped, so it is rewritten as an `unreachable` literal
    /// anchored at the current token.
    pub(crate) fn unreserve_node(&mut self, index: node::Index) {
        if self.nodes.len() == index as usize + 1 {
            self.nodes.pop();
        } else {
            self.nodes[index as usize].tag = N::UnreachableLiteral;
            self.nodes[index as usize].main_token = self.tok_i;
        }
    }

    pub(crate) fn add_extra<X: node::Extra>(&mut self, extra: X) -> node::Index {
        let index = self.extra_data.len() as node::Index;
        extra.encode(&mut self.extra_data);
        index
    }

    pub(crate) fn list_to_span(&mut self, list: &[node::Index]) -> node::SubRange {
        self.extra_data.extend_from_slice(list);
        node::SubRange {
            start: (self.extra_data.len() - list.len()) as node::Index,
            end: self.extra_data.len() as node::Index,
        }
    }

    // ---- diagnostics ----

    #[cold]
    pub(crate) fn warn(&mut self, error_tag: error::Tag) {
        self.warn_msg(Error::new(error_tag, self.tok_i));
    }

    #[cold]
    pub(crate) fn warn_expected(&mut self, expected: token::Tag) {
        self.warn_msg(Error::new(E::ExpectedToken(expected), self.tok_i));
    }

    /// Record a diagnostic. "Expected X" style messages that land on the
    /// first token of a new line are retargeted at the previous token,
    /// which is where the missing thing belongs.
    #[cold]
    pub(crate) fn warn_msg(&mut self, mut msg: Error) {
        match msg.tag {
            E::ExpectedSemiAfterDecl
            | E::ExpectedSemiAfterStmt
            | E::ExpectedCommaAfterField
            | E::ExpectedCommaAfterArg
            | E::ExpectedCommaAfterParam
            | E::ExpectedCommaAfterInitializer
            | E::ExpectedCommaAfterSwitchProng
            | E::ExpectedCommaAfterForOperand
            | E::ExpectedCommaAfterCapture
            | E::ExpectedSemiOrElse
            | E::ExpectedSemiOrLBrace
            | E::ExpectedToken(_)
            | E::ExpectedBlock
            | E::ExpectedBlockOrAssignment
            | E::ExpectedBlockOrExpr
            | E::ExpectedBlockOrField
            | E::ExpectedExpr
            | E::ExpectedExprOrAssignment
            | E::ExpectedFn
            | E::ExpectedInlinable
            | E::ExpectedLabelable
            | E::ExpectedParamList
            | E::ExpectedPrefixExpr
            | E::ExpectedPrimaryTypeExpr
            | E::ExpectedPubItem
            | E::ExpectedReturnType
            | E::ExpectedSuffixOp
            | E::ExpectedTypeExpr
            | E::ExpectedVarDecl
            | E::ExpectedVarDeclOrFn
            | E::ExpectedLoopPayload
            | E::ExpectedContainer => {
                if msg.token != 0 && !self.tokens_on_same_line(msg.token - 1, msg.token) {
                    msg.token_is_prev = true;
                    msg.token -= 1;
                }
            }
            _ => {}
        }
        self.errors.push(msg);
    }

    #[cold]
    pub(crate) fn fail<X>(&mut self, error_tag: error::Tag) -> Result<X> {
        self.fail_msg(Error::new(error_tag, self.tok_i))
    }

    #[cold]
    pub(crate) fn fail_expected<X>(&mut self, expected: token::Tag) -> Result<X> {
        self.fail_msg(Error::new(E::ExpectedToken(expected), self.tok_i))
    }

    #[cold]
    pub(crate) fn fail_msg<X>(&mut self, msg: Error) -> Result<X> {
        self.warn_msg(msg);
        Err(ParseError)
    }

    // ---- panic recovery ----

    /// Skip forward to the next plausible start of a container member,
    /// tracking bracket depth so members inside nested braces are not
    /// mistaken for members of this container.
    pub(crate) fn find_next_container_member(&mut self) {
        trace!(token = self.tok_i, "syncing to next container member");
        let mut level: u32 = 0;
        loop {
            let tok = self.next_token();
            match self.token_tag(tok) {
                T::KeywordTest
                | T::KeywordComptime
                | T::KeywordPub
                | T::KeywordExport
                | T::KeywordExtern
                | T::KeywordInline
                | T::KeywordNoinline
                | T::KeywordUsingnamespace
                | T::KeywordThreadlocal
                | T::KeywordConst
                | T::KeywordVar
                | T::KeywordFn => {
                    if level == 0 {
                        self.tok_i -= 1;
                        return;
                    }
                }
                T::Identifier => {
                    // A field: `name,`
                    if level == 0 && self.token_tag(tok + 1) == T::Comma {
                        self.tok_i -= 1;
                        return;
                    }
                }
                T::Comma | T::Semicolon => {
                    // The member likely ended here; resume right after.
                    if level == 0 {
                        return;
                    }
                }
                T::LParen | T::LBracket | T::LBrace => level += 1,
                T::RParen | T::RBracket => {
                    if level != 0 {
                        level -= 1;
                    }
                }
                T::RBrace => {
                    if level == 0 {
                        // End of this container.
                        self.tok_i -= 1;
                        return;
                    }
                    level -= 1;
                }
                T::Eof => {
                    self.tok_i -= 1;
                    return;
                }
                _ => {}
            }
        }
    }

    /// Skip forward past the next `;` at brace depth zero.
    pub(crate) fn find_next_stmt(&mut self) {
        trace!(token = self.tok_i, "syncing to next statement");
        let mut level: u32 = 0;
        loop {
            let tok = self.next_token();
            match self.token_tag(tok) {
                T::LBrace => level += 1,
                T::RBrace => {
                    if level == 0 {
                        self.tok_i -= 1;
                        return;
                    }
                    level -= 1;
                }
                T::Semicolon => {
                    if level == 0 {
                        return;
                    }
                }
                T::Eof => {
                    self.tok_i -= 1;
                    return;
                }
                _ => {}
            }
        }
    }
}
