use super::*;

/// Result of a member list: up to two members are carried inline, longer
/// lists live in the extra arena already.
pub(crate) struct Members {
    pub len: usize,
    pub lhs: node::Index,
    pub rhs: node::Index,
    pub trailing: bool,
}

impl Members {
    pub fn to_span(&self, p: &mut Parser) -> node::SubRange {
        if self.len <= 2 {
            let inline = [self.lhs, self.rhs];
            p.list_to_span(&inline[0..self.len])
        } else {
            node::SubRange {
                start: self.lhs,
                end: self.rhs,
            }
        }
    }
}

impl Parser<'_, '_> {
    /// Accumulate container members until `}` or EOF. Implements the
    /// fields/declarations interleaving check: once a declaration follows a
    /// field, the next field reports the declaration (with previous/next
    /// field notes) and the tracker latches so it only fires once.
    pub(crate) fn parse_container_members(&mut self) -> Members {
        let mut items: Vec<node::Index> = Vec::new();

        enum FieldState {
            /// No fields seen yet.
            None,
            /// Fields seen, no declaration after them yet.
            Seen,
            /// A declaration was parsed after a field.
            End(node::Index),
            /// Interleaving already reported.
            Err,
        }
        let mut field_state = FieldState::None;
        let mut last_field: TokenIndex = 0;

        while self.eat_token(T::ContainerDocComment).is_some() {}

        let mut trailing = false;
        loop {
            let doc_comment = self.eat_doc_comments();

            match self.token_tag(self.tok_i) {
                T::KeywordTest => {
                    if let Some(token) = doc_comment {
                        self.warn_msg(Error::new(E::TestDocComment, token));
                    }
                    let test_decl = self.expect_test_decl_recoverable();
                    if test_decl != 0 {
                        if let FieldState::Seen = field_state {
                            field_state = FieldState::End(test_decl);
                        }
                        items.push(test_decl);
                    }
                    trailing = false;
                }
                T::KeywordComptime if self.token_tag(self.tok_i + 1) == T::LBrace => {
                    if let Some(token) = doc_comment {
                        self.warn_msg(Error::new(E::ComptimeDocComment, token));
                    }
                    let comptime_token = self.next_token();
                    let block = match self.parse_block() {
                        Ok(block) => block,
                        Err(ParseError) => {
                            self.find_next_container_member();
                            continue;
                        }
                    };
                    if block != 0 {
                        let comptime_node = self.add_node(Node {
                            tag: N::Comptime,
                            main_token: comptime_token,
                            data: node::Data { lhs: block, rhs: 0 },
                        });
                        if let FieldState::Seen = field_state {
                            field_state = FieldState::End(comptime_node);
                        }
                        items.push(comptime_node);
                    }
                    trailing = false;
                }
                T::KeywordPub => {
                    self.tok_i += 1;
                    let decl = self.expect_top_level_decl_recoverable();
                    if decl != 0 {
                        if let FieldState::Seen = field_state {
                            field_state = FieldState::End(decl);
                        }
                        items.push(decl);
                    }
                    trailing = self.token_tag(self.tok_i - 1) == T::Semicolon;
                }
                T::KeywordUsingnamespace => {
                    let decl = self.expect_using_namespace_recoverable();
                    if decl != 0 {
                        if let FieldState::Seen = field_state {
                            field_state = FieldState::End(decl);
                        }
                        items.push(decl);
                    }
                    trailing = self.token_tag(self.tok_i - 1) == T::Semicolon;
                }
                T::KeywordConst
                | T::KeywordVar
                | T::KeywordThreadlocal
                | T::KeywordExport
                | T::KeywordExtern
                | T::KeywordInline
                | T::KeywordNoinline
                | T::KeywordFn => {
                    let decl = self.expect_top_level_decl_recoverable();
                    if decl != 0 {
                        if let FieldState::Seen = field_state {
                            field_state = FieldState::End(decl);
                        }
                        items.push(decl);
                    }
                    trailing = self.token_tag(self.tok_i - 1) == T::Semicolon;
                }
                T::Eof | T::RBrace => {
                    if let Some(token) = doc_comment {
                        self.warn_msg(Error::new(E::UnattachedDocComment, token));
                    }
                    break;
                }
                // Anything else is a container field, possibly starting
                // with `comptime`.
                _ => {
                    if self.parse_c_style_container().unwrap_or(false) {
                        continue;
                    }

                    let identifier = self.tok_i;
                    let previous_field = last_field;
                    last_field = identifier;
                    let container_field = match self.expect_container_field() {
                        Ok(field) => field,
                        Err(ParseError) => {
                            self.find_next_container_member();
                            continue;
                        }
                    };
                    match field_state {
                        FieldState::None => field_state = FieldState::Seen,
                        FieldState::Seen | FieldState::Err => {}
                        FieldState::End(decl) => {
                            self.warn_msg(Error::new(
                                E::DeclBetweenFields,
                                self.node(decl).main_token,
                            ));
                            self.warn_msg(Error::note(E::PreviousField, previous_field));
                            self.warn_msg(Error::note(E::NextField, identifier));
                            field_state = FieldState::Err;
                        }
                    }
                    items.push(container_field);
                    match self.token_tag(self.tok_i) {
                        T::Comma => {
                            self.tok_i += 1;
                            trailing = true;
                            continue;
                        }
                        T::RBrace | T::Eof => {
                            trailing = false;
                            break;
                        }
                        _ => {}
                    }
                    // A field with no trailing comma must be the last
                    // member.
                    self.warn(E::ExpectedCommaAfterField);
                    if self.token_tag(self.tok_i) == T::Semicolon
                        && self.token_tag(identifier) == T::Identifier
                    {
                        self.warn_msg(Error::note(E::VarConstDecl, identifier));
                    }
                    self.find_next_container_member();
                    continue;
                }
            }
        }

        match items[..] {
            [] => Members {
                len: 0,
                lhs: 0,
                rhs: 0,
                trailing,
            },
            [lhs] => Members {
                len: 1,
                lhs,
                rhs: 0,
                trailing,
            },
            [lhs, rhs] => Members {
                len: 2,
                lhs,
                rhs,
                trailing,
            },
            _ => {
                let span = self.list_to_span(&items);
                Members {
                    len: items.len(),
                    lhs: span.start,
                    rhs: span.end,
                    trailing,
                }
            }
        }
    }

    /// `name: Type align(A) = value`, any piece but the name optional; a
    /// missing `name:` makes it a tuple-like field whose type starts
    /// immediately. A leading `comptime` is consumed but not materialized.
    pub(crate) fn expect_container_field(&mut self) -> Result<node::Index> {
        let mut main_token = self.tok_i;
        self.eat_token(T::KeywordComptime);
        let tuple_like = self.token_tag(self.tok_i) != T::Identifier
            || self.token_tag(self.tok_i + 1) != T::Colon;
        if !tuple_like {
            main_token = self.assert_token(T::Identifier);
        }

        let mut type_expr: node::Index = 0;
        let mut align_expr: node::Index = 0;
        if self.eat_token(T::Colon).is_some() || tuple_like {
            type_expr = self.expect_type_expr()?;
            align_expr = self.parse_byte_align()?;
        }

        let value_expr = match self.eat_token(T::Equal) {
            None => 0,
            Some(_) => self.expect_expr()?,
        };

        if align_expr == 0 {
            Ok(self.add_node(Node {
                tag: N::ContainerFieldInit,
                main_token,
                data: node::Data {
                    lhs: type_expr,
                    rhs: value_expr,
                },
            }))
        } else if value_expr == 0 {
            Ok(self.add_node(Node {
                tag: N::ContainerFieldAlign,
                main_token,
                data: node::Data {
                    lhs: type_expr,
                    rhs: align_expr,
                },
            }))
        } else {
            let rhs = self.add_extra(node::ContainerField {
                align_expr,
                value_expr,
            });
            Ok(self.add_node(Node {
                tag: N::ContainerField,
                main_token,
                data: node::Data {
                    lhs: type_expr,
                    rhs,
                },
            }))
        }
    }

    /// Recover from `struct Foo {...};` written C-style: report it, parse
    /// and discard the body, and tell the caller to continue.
    pub(crate) fn parse_c_style_container(&mut self) -> Result<bool> {
        let container = self.token_tag(self.tok_i);
        match container {
            T::KeywordEnum | T::KeywordUnion | T::KeywordStruct => {}
            _ => return Ok(false),
        }
        let identifier = self.tok_i + 1;
        if self.token_tag(identifier) != T::Identifier {
            return Ok(false);
        }
        self.tok_i += 2;
        self.warn_msg(Error::new(E::CStyleContainer(container), identifier));
        self.warn_msg(Error::note(E::ZigStyleContainer(container), identifier));

        self.expect_token(T::LBrace)?;
        let _ = self.parse_container_members();
        self.expect_token(T::RBrace)?;
        self.expect_semicolon(E::ExpectedSemiAfterDecl, true)?;
        Ok(true)
    }

    /// `struct {...}`, `opaque {...}`, `enum(T) {...}`, `union(enum) {...}`
    /// and friends. The head keyword has already been matched but not
    /// consumed.
    pub(crate) fn parse_container_decl_auto(&mut self) -> Result<node::Index> {
        let main_token = self.next_token();
        let arg_expr = match self.token_tag(main_token) {
            T::KeywordOpaque => NULL_NODE,
            T::KeywordStruct | T::KeywordEnum => match self.eat_token(T::LParen) {
                Some(_) => {
                    let expr = self.expect_expr()?;
                    self.expect_token(T::RParen)?;
                    expr
                }
                None => NULL_NODE,
            },
            T::KeywordUnion => match self.eat_token(T::LParen) {
                Some(_) => {
                    if self.eat_token(T::KeywordEnum).is_some() {
                        return self.parse_tagged_union(main_token);
                    }
                    let expr = self.expect_expr()?;
                    self.expect_token(T::RParen)?;
                    expr
                }
                None => NULL_NODE,
            },
            _ => {
                self.tok_i -= 1;
                return self.fail(E::ExpectedContainer);
            }
        };
        self.expect_token(T::LBrace)?;
        let members = self.parse_container_members();
        self.expect_token(T::RBrace)?;

        if arg_expr == 0 {
            if members.len <= 2 {
                return Ok(self.add_node(Node {
                    tag: match members.trailing {
                        true => N::ContainerDeclTwoTrailing,
                        false => N::ContainerDeclTwo,
                    },
                    main_token,
                    data: node::Data {
                        lhs: members.lhs,
                        rhs: members.rhs,
                    },
                }));
            }
            let span = members.to_span(self);
            Ok(self.add_node(Node {
                tag: match members.trailing {
                    true => N::ContainerDeclTrailing,
                    false => N::ContainerDecl,
                },
                main_token,
                data: node::Data {
                    lhs: span.start,
                    rhs: span.end,
                },
            }))
        } else {
            let span = members.to_span(self);
            let rhs = self.add_extra(span);
            Ok(self.add_node(Node {
                tag: match members.trailing {
                    true => N::ContainerDeclArgTrailing,
                    false => N::ContainerDeclArg,
                },
                main_token,
                data: node::Data { lhs: arg_expr, rhs },
            }))
        }
    }

    /// `union(enum ...)`: the `union`, `(` and `enum` tokens are consumed.
    fn parse_tagged_union(&mut self, main_token: TokenIndex) -> Result<node::Index> {
        if self.eat_token(T::LParen).is_some() {
            // union(enum(tag_type))
            let enum_tag_expr = self.expect_expr()?;
            self.expect_token(T::RParen)?;
            self.expect_token(T::RParen)?;
            self.expect_token(T::LBrace)?;
            let members = self.parse_container_members();
            self.expect_token(T::RBrace)?;
            let span = members.to_span(self);
            let rhs = self.add_extra(span);
            Ok(self.add_node(Node {
                tag: match members.trailing {
                    true => N::TaggedUnionEnumTagTrailing,
                    false => N::TaggedUnionEnumTag,
                },
                main_token,
                data: node::Data {
                    lhs: enum_tag_expr,
                    rhs,
                },
            }))
        } else {
            self.expect_token(T::RParen)?;
            self.expect_token(T::LBrace)?;
            let members = self.parse_container_members();
            self.expect_token(T::RBrace)?;
            if members.len <= 2 {
                return Ok(self.add_node(Node {
                    tag: match members.trailing {
                        true => N::TaggedUnionTwoTrailing,
                        false => N::TaggedUnionTwo,
                    },
                    main_token,
                    data: node::Data {
                        lhs: members.lhs,
                        rhs: members.rhs,
                    },
                }));
            }
            let span = members.to_span(self);
            Ok(self.add_node(Node {
                tag: match members.trailing {
                    true => N::TaggedUnionTrailing,
                    false => N::TaggedUnion,
                },
                main_token,
                data: node::Data {
                    lhs: span.start,
                    rhs: span.end,
                },
            }))
        }
    }

    pub(crate) fn expect_test_decl(&mut self) -> Result<node::Index> {
        let test_token = self.assert_token(T::KeywordTest);
        let name_token = match self.token_tag(self.tok_i) {
            T::StringLiteral | T::Identifier => Some(self.next_token()),
            _ => None,
        };
        let block = self.parse_block()?;
        if block == 0 {
            return self.fail(E::ExpectedBlock);
        }
        Ok(self.add_node(Node {
            tag: N::TestDecl,
            main_token: test_token,
            data: node::Data {
                lhs: name_token.unwrap_or(0),
                rhs: block,
            },
        }))
    }

    pub(crate) fn expect_test_decl_recoverable(&mut self) -> node::Index {
        self.expect_test_decl().unwrap_or_else(|ParseError| {
            self.find_next_container_member();
            NULL_NODE
        })
    }

    pub(crate) fn expect_using_namespace(&mut self) -> Result<node::Index> {
        let usingnamespace_token = self.assert_token(T::KeywordUsingnamespace);
        let expr = self.expect_expr()?;
        self.expect_semicolon(E::ExpectedSemiAfterDecl, false)?;
        Ok(self.add_node(Node {
            tag: N::Usingnamespace,
            main_token: usingnamespace_token,
            data: node::Data { lhs: expr, rhs: 0 },
        }))
    }

    pub(crate) fn expect_using_namespace_recoverable(&mut self) -> node::Index {
        self.expect_using_namespace().unwrap_or_else(|ParseError| {
            self.find_next_container_member();
            NULL_NODE
        })
    }
}
