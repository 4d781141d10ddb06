use super::*;

/// A node list that is usually empty or a single node; only longer lists
/// pay for an extra-arena span.
pub(crate) enum SmallSpan {
    ZeroOrOne(node::Index),
    Multi(node::SubRange),
}

impl Parser<'_, '_> {
    /// A top-level declaration: function (prototype or definition), global
    /// variable, or `usingnamespace`, possibly behind `extern`/`export`/
    /// `inline`/`noinline`/`threadlocal` qualifiers. Any leading `pub` was
    /// consumed by the caller.
    pub(crate) fn expect_top_level_decl(&mut self) -> Result<node::Index> {
        let qualifier_token = self.next_token();
        let mut is_extern = false;
        let mut expect_fn = false;
        let mut expect_var_or_fn = false;
        match self.token_tag(qualifier_token) {
            T::KeywordExtern => {
                // Optional library name: extern "c" fn ...
                self.eat_token(T::StringLiteral);
                is_extern = true;
                expect_var_or_fn = true;
            }
            T::KeywordExport => expect_var_or_fn = true,
            T::KeywordInline | T::KeywordNoinline => expect_fn = true,
            _ => self.tok_i -= 1,
        }

        let fn_proto = self.parse_fn_proto()?;
        if fn_proto != 0 {
            match self.token_tag(self.tok_i) {
                T::Semicolon => {
                    self.tok_i += 1;
                    return Ok(fn_proto);
                }
                T::LBrace => {
                    if is_extern {
                        self.warn_msg(Error::new(E::ExternFnBody, qualifier_token));
                        return Ok(NULL_NODE);
                    }
                    // Reserve so the decl sits between prototype and body.
                    let fn_decl = self.reserve_node(N::FnDecl);
                    let body_block = match self.parse_block() {
                        Ok(block) => block,
                        Err(err) => {
                            self.unreserve_node(fn_decl);
                            return Err(err);
                        }
                    };
                    assert!(body_block != 0);
                    let main_token = self.node(fn_proto).main_token;
                    return Ok(self.set_node(
                        fn_decl,
                        Node {
                            tag: N::FnDecl,
                            main_token,
                            data: node::Data {
                                lhs: fn_proto,
                                rhs: body_block,
                            },
                        },
                    ));
                }
                _ => {
                    self.warn(E::ExpectedSemiOrLBrace);
                    return Ok(NULL_NODE);
                }
            }
        }
        if expect_fn {
            self.warn(E::ExpectedFn);
            return Err(ParseError);
        }

        let thread_local_token = self.eat_token(T::KeywordThreadlocal);
        let var_decl = self.parse_global_var_decl()?;
        if var_decl != 0 {
            return Ok(var_decl);
        }
        if thread_local_token.is_some() {
            return self.fail(E::ExpectedVarDecl);
        }
        if expect_var_or_fn {
            return self.fail(E::ExpectedVarDeclOrFn);
        }
        if self.token_tag(self.tok_i) != T::KeywordUsingnamespace {
            return self.fail(E::ExpectedPubItem);
        }
        self.expect_using_namespace()
    }

    pub(crate) fn expect_top_level_decl_recoverable(&mut self) -> node::Index {
        self.expect_top_level_decl().unwrap_or_else(|ParseError| {
            self.find_next_container_member();
            NULL_NODE
        })
    }

    pub(crate) fn parse_fn_proto(&mut self) -> Result<node::Index> {
        let Some(fn_token) = self.eat_token(T::KeywordFn) else {
            return Ok(NULL_NODE);
        };
        // The prototype must precede its parameter nodes in index order.
        let fn_proto = self.reserve_node(N::FnProto);
        match self.finish_fn_proto(fn_token, fn_proto) {
            Ok(index) => Ok(index),
            Err(err) => {
                self.unreserve_node(fn_proto);
                Err(err)
            }
        }
    }

    fn finish_fn_proto(
        &mut self,
        fn_token: TokenIndex,
        fn_proto: node::Index,
    ) -> Result<node::Index> {
        self.eat_token(T::Identifier);
        let params = self.parse_param_decl_list()?;
        let align_expr = self.parse_byte_align()?;
        let addrspace_expr = self.parse_addr_space()?;
        let section_expr = self.parse_link_section()?;
        let callconv_expr = self.parse_callconv()?;
        // Error-union return types keep only the payload type in the tree;
        // the `!` is recovered from the tokens when needed.
        self.eat_token(T::Bang);

        let return_type_expr = self.parse_type_expr()?;
        if return_type_expr == 0 {
            self.warn(E::ExpectedReturnType);
        }

        if align_expr == 0 && addrspace_expr == 0 && section_expr == 0 && callconv_expr == 0 {
            let elem = match params {
                SmallSpan::ZeroOrOne(param) => Node {
                    tag: N::FnProtoSimple,
                    main_token: fn_token,
                    data: node::Data {
                        lhs: param,
                        rhs: return_type_expr,
                    },
                },
                SmallSpan::Multi(span) => {
                    let lhs = self.add_extra(span);
                    Node {
                        tag: N::FnProtoMulti,
                        main_token: fn_token,
                        data: node::Data {
                            lhs,
                            rhs: return_type_expr,
                        },
                    }
                }
            };
            return Ok(self.set_node(fn_proto, elem));
        }
        let elem = match params {
            SmallSpan::ZeroOrOne(param) => {
                let lhs = self.add_extra(node::FnProtoOne {
                    param,
                    align_expr,
                    addrspace_expr,
                    section_expr,
                    callconv_expr,
                });
                Node {
                    tag: N::FnProtoOne,
                    main_token: fn_token,
                    data: node::Data {
                        lhs,
                        rhs: return_type_expr,
                    },
                }
            }
            SmallSpan::Multi(span) => {
                let lhs = self.add_extra(node::FnProto {
                    params_start: span.start,
                    params_end: span.end,
                    align_expr,
                    addrspace_expr,
                    section_expr,
                    callconv_expr,
                });
                Node {
                    tag: N::FnProto,
                    main_token: fn_token,
                    data: node::Data {
                        lhs,
                        rhs: return_type_expr,
                    },
                }
            }
        };
        Ok(self.set_node(fn_proto, elem))
    }

    /// One parameter. `anytype` and `...` parameters produce no node.
    pub(crate) fn expect_param_decl(&mut self) -> Result<node::Index> {
        self.eat_doc_comments();
        match self.token_tag(self.tok_i) {
            T::KeywordNoalias | T::KeywordComptime => self.tok_i += 1,
            T::Ellipsis3 => {
                self.tok_i += 1;
                return Ok(NULL_NODE);
            }
            _ => {}
        }
        if self.token_tag(self.tok_i) == T::Identifier && self.token_tag(self.tok_i + 1) == T::Colon
        {
            self.tok_i += 2;
        }
        match self.token_tag(self.tok_i) {
            T::KeywordAnytype => {
                self.tok_i += 1;
                Ok(NULL_NODE)
            }
            _ => self.expect_type_expr(),
        }
    }

    pub(crate) fn parse_param_decl_list(&mut self) -> Result<SmallSpan> {
        self.expect_token(T::LParen)?;
        let mut params = Vec::new();
        enum Varargs {
            None,
            Seen,
            Nonfinal(TokenIndex),
        }
        let mut varargs = Varargs::None;
        loop {
            if self.eat_token(T::RParen).is_some() {
                break;
            }
            if matches!(varargs, Varargs::Seen) {
                varargs = Varargs::Nonfinal(self.tok_i);
            }
            let param = self.expect_param_decl()?;
            if param != 0 {
                params.push(param);
            } else if self.token_tag(self.tok_i - 1) == T::Ellipsis3 {
                if matches!(varargs, Varargs::None) {
                    varargs = Varargs::Seen;
                }
            }
            match self.token_tag(self.tok_i) {
                T::Comma => self.tok_i += 1,
                T::RParen => {
                    self.tok_i += 1;
                    break;
                }
                T::Colon | T::RBrace | T::RBracket => return self.fail_expected(T::RParen),
                _ => self.warn(E::ExpectedCommaAfterParam),
            }
        }
        if let Varargs::Nonfinal(token) = varargs {
            self.warn_msg(Error::new(E::VarargsNonfinal, token));
        }
        Ok(match params[..] {
            [] => SmallSpan::ZeroOrOne(0),
            [param] => SmallSpan::ZeroOrOne(param),
            _ => SmallSpan::Multi(self.list_to_span(&params)),
        })
    }

    /// The declaration head `const`/`var` + name + type/align/addrspace/
    /// linksection modifiers, picking the smallest node shape that can hold
    /// what is present. The init expression is patched into `rhs` later.
    pub(crate) fn parse_var_decl_proto(&mut self) -> Result<node::Index> {
        let Some(mut_token) = self
            .eat_token(T::KeywordConst)
            .or_else(|| self.eat_token(T::KeywordVar))
        else {
            return Ok(NULL_NODE);
        };

        self.expect_token(T::Identifier)?;
        let type_node = match self.eat_token(T::Colon) {
            None => 0,
            Some(_) => self.expect_type_expr()?,
        };
        let align_node = self.parse_byte_align()?;
        let addrspace_node = self.parse_addr_space()?;
        let section_node = self.parse_link_section()?;

        if addrspace_node == 0 && section_node == 0 {
            if align_node == 0 {
                return Ok(self.add_node(Node {
                    tag: N::SimpleVarDecl,
                    main_token: mut_token,
                    data: node::Data {
                        lhs: type_node,
                        rhs: 0,
                    },
                }));
            }
            if type_node == 0 {
                return Ok(self.add_node(Node {
                    tag: N::AlignedVarDecl,
                    main_token: mut_token,
                    data: node::Data {
                        lhs: align_node,
                        rhs: 0,
                    },
                }));
            }
            let lhs = self.add_extra(node::LocalVarDecl {
                type_node,
                align_node,
            });
            Ok(self.add_node(Node {
                tag: N::LocalVarDecl,
                main_token: mut_token,
                data: node::Data { lhs, rhs: 0 },
            }))
        } else {
            let lhs = self.add_extra(node::GlobalVarDecl {
                type_node,
                align_node,
                addrspace_node,
                section_node,
            });
            Ok(self.add_node(Node {
                tag: N::GlobalVarDecl,
                main_token: mut_token,
                data: node::Data { lhs, rhs: 0 },
            }))
        }
    }

    pub(crate) fn parse_global_var_decl(&mut self) -> Result<node::Index> {
        let var_decl = self.parse_var_decl_proto()?;
        if var_decl == 0 {
            return Ok(NULL_NODE);
        }

        let init_node = match self.token_tag(self.tok_i) {
            T::EqualEqual => {
                self.warn(E::WrongEqualVarDecl);
                self.tok_i += 1;
                self.expect_expr()?
            }
            T::Equal => {
                self.tok_i += 1;
                self.expect_expr()?
            }
            _ => 0,
        };

        self.node_mut(var_decl).data.rhs = init_node;

        self.expect_semicolon(E::ExpectedSemiAfterDecl, false)?;
        Ok(var_decl)
    }
}
