use super::*;

impl Parser<'_, '_> {
    /// `allow_defer_var` is false in positions where a statement must be a
    /// single expression or assignment (after `else`, in switch prongs).
    pub(crate) fn expect_statement(&mut self, allow_defer_var: bool) -> Result<node::Index> {
        if let Some(comptime_token) = self.eat_token(T::KeywordComptime) {
            let block_expr = self.parse_block_expr()?;
            if block_expr != 0 {
                return Ok(self.add_node(Node {
                    tag: N::Comptime,
                    main_token: comptime_token,
                    data: node::Data {
                        lhs: block_expr,
                        rhs: 0,
                    },
                }));
            }
            if allow_defer_var {
                return self.expect_var_decl_expr_statement(Some(comptime_token));
            }
            let assign = self.expect_assign_expr()?;
            self.expect_semicolon(E::ExpectedSemiAfterStmt, true)?;
            return Ok(self.add_node(Node {
                tag: N::Comptime,
                main_token: comptime_token,
                data: node::Data {
                    lhs: assign,
                    rhs: 0,
                },
            }));
        }

        match self.token_tag(self.tok_i) {
            T::KeywordNosuspend => {
                let token = self.next_token();
                let block_expr = self.expect_block_expr_statement()?;
                return Ok(self.add_node(Node {
                    tag: N::Nosuspend,
                    main_token: token,
                    data: node::Data {
                        lhs: block_expr,
                        rhs: 0,
                    },
                }));
            }
            T::KeywordSuspend => {
                let token = self.next_token();
                let block_expr = self.expect_block_expr_statement()?;
                return Ok(self.add_node(Node {
                    tag: N::Suspend,
                    main_token: token,
                    data: node::Data {
                        lhs: block_expr,
                        rhs: 0,
                    },
                }));
            }
            T::KeywordDefer if allow_defer_var => {
                let token = self.next_token();
                let block_expr = self.expect_block_expr_statement()?;
                return Ok(self.add_node(Node {
                    tag: N::Defer,
                    main_token: token,
                    data: node::Data {
                        lhs: 0,
                        rhs: block_expr,
                    },
                }));
            }
            T::KeywordErrdefer if allow_defer_var => {
                let token = self.next_token();
                let payload = self.parse_payload()?;
                let block_expr = self.expect_block_expr_statement()?;
                return Ok(self.add_node(Node {
                    tag: N::Errdefer,
                    main_token: token,
                    data: node::Data {
                        lhs: payload,
                        rhs: block_expr,
                    },
                }));
            }
            T::KeywordSwitch => return self.expect_switch_expr(),
            T::KeywordIf => return self.expect_if_statement(),
            T::KeywordEnum | T::KeywordStruct | T::KeywordUnion => {
                let identifier = self.tok_i + 1;
                if self.parse_c_style_container()? {
                    // Pretend the `struct Foo {...};` was a statement.
                    return Ok(self.add_node(Node {
                        tag: N::Identifier,
                        main_token: identifier,
                        data: node::Data { lhs: 0, rhs: 0 },
                    }));
                }
            }
            _ => {}
        }

        let labeled = self.parse_labeled_statement()?;
        if labeled != 0 {
            return Ok(labeled);
        }

        if allow_defer_var {
            self.expect_var_decl_expr_statement(None)
        } else {
            let assign = self.expect_assign_expr()?;
            self.expect_semicolon(E::ExpectedSemiAfterStmt, true)?;
            Ok(assign)
        }
    }

    pub(crate) fn expect_statement_recoverable(&mut self) -> Result<node::Index> {
        loop {
            return match self.expect_statement(true) {
                Ok(statement) => Ok(statement),
                Err(ParseError) => {
                    self.find_next_stmt();
                    match self.token_tag(self.tok_i) {
                        T::RBrace => Ok(NULL_NODE),
                        T::Eof => Err(ParseError),
                        _ => continue,
                    }
                }
            };
        }
    }

    /// "LHS, LHS, ... = RHS;" and "expr;" statements share this entry. The
    /// LHS items may mix var-decl protos and plain expressions; what was
    /// collected decides between patching a single declaration, building a
    /// destructure, or falling back to an expression statement.
    pub(crate) fn expect_var_decl_expr_statement(
        &mut self,
        comptime_token: Option<TokenIndex>,
    ) -> Result<node::Index> {
        let mut lhs_items: Vec<node::Index> = Vec::new();

        loop {
            let var_decl_proto = self.parse_var_decl_proto()?;
            if var_decl_proto != 0 {
                lhs_items.push(var_decl_proto);
            } else {
                let expr = self.parse_expr()?;
                if expr == 0 {
                    if lhs_items.is_empty() {
                        return self.fail(E::ExpectedStatement);
                    }
                    // A comma promised another LHS that never came.
                    return self.fail(E::ExpectedExprOrVarDecl);
                }
                lhs_items.push(expr);
            }
            if self.eat_token(T::Comma).is_none() {
                break;
            }
        }

        let equal_token = 'equal: {
            if let Some(token) = self.eat_token(T::Equal) {
                break 'equal token;
            }
            let definitely_decl = lhs_items.len() > 1 || self.node_is_var_decl(lhs_items[0]);
            if definitely_decl {
                // `==` can only be a typo for `=` here; take it and report.
                if let Some(token) = self.eat_token(T::EqualEqual) {
                    self.warn_msg(Error::new(E::WrongEqualVarDecl, token));
                    break 'equal token;
                }
                return self.fail_expected(T::Equal);
            }
            // One plain expression: an ordinary expression or assignment
            // statement after all.
            let expr = self.finish_assign_expr(lhs_items[0])?;
            self.expect_semicolon(E::ExpectedSemiAfterStmt, true)?;
            let result = match comptime_token {
                Some(comptime_token) => self.add_node(Node {
                    tag: N::Comptime,
                    main_token: comptime_token,
                    data: node::Data { lhs: expr, rhs: 0 },
                }),
                None => expr,
            };
            return Ok(result);
        };

        let rhs = self.expect_expr()?;
        self.expect_semicolon(E::ExpectedSemiAfterDecl, true)?;

        if let [lhs] = lhs_items[..] {
            if self.node_is_var_decl(lhs) {
                // Patch the initializer in. A leading `comptime` token is
                // not materialized for declarations.
                self.node_mut(lhs).data.rhs = rhs;
                return Ok(lhs);
            }
            return Ok(self.add_node(Node {
                tag: N::Assign,
                main_token: equal_token,
                data: node::Data { lhs, rhs },
            }));
        }

        // Inline destructure record: count, then the LHS nodes.
        let extra_start = self.extra_data.len() as node::Index;
        self.extra_data.push(lhs_items.len() as node::Index);
        self.extra_data.extend_from_slice(&lhs_items);
        Ok(self.add_node(Node {
            tag: N::AssignDestructure,
            main_token: equal_token,
            data: node::Data {
                lhs: extra_start,
                rhs,
            },
        }))
    }

    pub(crate) fn node_is_var_decl(&self, index: node::Index) -> bool {
        matches!(
            self.node(index).tag,
            N::GlobalVarDecl | N::LocalVarDecl | N::SimpleVarDecl | N::AlignedVarDecl
        )
    }

    /// Label, block, or loop. A label followed by anything else is an
    /// error; a var-decl-looking tail upgrades it to a hint that `var`/
    /// `const` is missing.
    pub(crate) fn parse_labeled_statement(&mut self) -> Result<node::Index> {
        let label_token = self.parse_block_label();
        let block = self.parse_block()?;
        if block != 0 {
            return Ok(block);
        }

        let loop_stmt = self.parse_loop_statement()?;
        if loop_stmt != 0 {
            return Ok(loop_stmt);
        }

        if label_token != 0 {
            let after_colon = self.tok_i;
            let type_expr = self.parse_type_expr()?;
            if type_expr != 0 {
                let align = self.parse_byte_align()?;
                let addrspace = self.parse_addr_space()?;
                let section = self.parse_link_section()?;
                let init = match self.eat_token(T::Equal) {
                    None => 0,
                    Some(_) => self.expect_expr()?,
                };
                if align != 0 || addrspace != 0 || section != 0 || init != 0 {
                    return self.fail_msg(Error::new(E::ExpectedVarConst, label_token));
                }
            }
            return self.fail_msg(Error::new(E::ExpectedLabelable, after_colon));
        }

        Ok(NULL_NODE)
    }

    pub(crate) fn parse_loop_statement(&mut self) -> Result<node::Index> {
        let inline_token = self.eat_token(T::KeywordInline);

        let for_statement = self.parse_for_statement()?;
        if for_statement != 0 {
            return Ok(for_statement);
        }

        let while_statement = self.parse_while_statement()?;
        if while_statement != 0 {
            return Ok(while_statement);
        }

        if inline_token.is_none() {
            return Ok(NULL_NODE);
        }
        self.fail(E::ExpectedInlinable)
    }

    pub(crate) fn parse_for_statement(&mut self) -> Result<node::Index> {
        let Some(for_token) = self.eat_token(T::KeywordFor) else {
            return Ok(NULL_NODE);
        };
        // Inputs first; the then- and else-arms are appended to the same
        // list so the whole thing lands contiguously in the extra arena.
        let mut list: Vec<node::Index> = Vec::new();
        let inputs = self.for_prefix(&mut list)?;

        let mut else_required = false;
        let mut seen_semicolon = false;
        let then_expr = 'then: {
            let block_expr = self.parse_block_expr()?;
            if block_expr != 0 {
                break 'then block_expr;
            }
            let assign_expr = self.parse_assign_expr()?;
            if assign_expr == 0 {
                return self.fail(E::ExpectedBlockOrAssignment);
            }
            if self.eat_token(T::Semicolon).is_some() {
                seen_semicolon = true;
            } else {
                else_required = true;
            }
            assign_expr
        };

        let mut has_else = false;
        if !seen_semicolon && self.eat_token(T::KeywordElse).is_some() {
            list.push(then_expr);
            let else_stmt = self.expect_statement(false)?;
            list.push(else_stmt);
            has_else = true;
        } else if inputs == 1 {
            if else_required {
                self.warn(E::ExpectedSemiOrElse);
            }
            return Ok(self.add_node(Node {
                tag: N::ForSimple,
                main_token: for_token,
                data: node::Data {
                    lhs: list[0],
                    rhs: then_expr,
                },
            }));
        } else {
            if else_required {
                self.warn(E::ExpectedSemiOrElse);
            }
            list.push(then_expr);
        }

        let span = self.list_to_span(&list);
        Ok(self.add_node(Node {
            tag: N::For,
            main_token: for_token,
            data: node::Data {
                lhs: span.start,
                rhs: node::For { inputs, has_else }.to_word(),
            },
        }))
    }

    pub(crate) fn parse_while_statement(&mut self) -> Result<node::Index> {
        let Some(while_token) = self.eat_token(T::KeywordWhile) else {
            return Ok(NULL_NODE);
        };
        self.expect_token(T::LParen)?;
        let condition = self.expect_expr()?;
        self.expect_token(T::RParen)?;
        self.parse_ptr_payload()?;
        let cont_expr = self.parse_while_continue_expr()?;

        let mut else_required = false;
        let then_expr = 'then: {
            let block_expr = self.parse_block_expr()?;
            if block_expr != 0 {
                break 'then block_expr;
            }
            let assign_expr = self.parse_assign_expr()?;
            if assign_expr == 0 {
                return self.fail(E::ExpectedBlockOrAssignment);
            }
            if self.eat_token(T::Semicolon).is_some() {
                let node = self.while_without_else(while_token, condition, cont_expr, assign_expr);
                return Ok(node);
            }
            else_required = true;
            assign_expr
        };
        if self.eat_token(T::KeywordElse).is_none() {
            if else_required {
                self.warn(E::ExpectedSemiOrElse);
            }
            let node = self.while_without_else(while_token, condition, cont_expr, then_expr);
            return Ok(node);
        }
        self.parse_payload()?;
        let else_expr = self.expect_statement(false)?;
        let rhs = self.add_extra(node::While {
            cont_expr,
            then_expr,
            else_expr,
        });
        Ok(self.add_node(Node {
            tag: N::While,
            main_token: while_token,
            data: node::Data {
                lhs: condition,
                rhs,
            },
        }))
    }

    /// `WhileSimple` or `WhileCont` depending on the continue expression.
    pub(crate) fn while_without_else(
        &mut self,
        while_token: TokenIndex,
        condition: node::Index,
        cont_expr: node::Index,
        then_expr: node::Index,
    ) -> node::Index {
        if cont_expr == 0 {
            self.add_node(Node {
                tag: N::WhileSimple,
                main_token: while_token,
                data: node::Data {
                    lhs: condition,
                    rhs: then_expr,
                },
            })
        } else {
            let rhs = self.add_extra(node::WhileCont {
                cont_expr,
                then_expr,
            });
            self.add_node(Node {
                tag: N::WhileCont,
                main_token: while_token,
                data: node::Data {
                    lhs: condition,
                    rhs,
                },
            })
        }
    }

    pub(crate) fn expect_if_statement(&mut self) -> Result<node::Index> {
        let if_token = self.assert_token(T::KeywordIf);
        self.expect_token(T::LParen)?;
        let condition = self.expect_expr()?;
        self.expect_token(T::RParen)?;
        self.parse_ptr_payload()?;

        // A bare assignment as the then-arm must be closed by `;` or
        // continued by `else`.
        let mut else_required = false;
        let then_expr = 'then: {
            let block_expr = self.parse_block_expr()?;
            if block_expr != 0 {
                break 'then block_expr;
            }
            let assign_expr = self.parse_assign_expr()?;
            if assign_expr == 0 {
                return self.fail(E::ExpectedBlockOrAssignment);
            }
            if self.eat_token(T::Semicolon).is_some() {
                return Ok(self.add_node(Node {
                    tag: N::IfSimple,
                    main_token: if_token,
                    data: node::Data {
                        lhs: condition,
                        rhs: assign_expr,
                    },
                }));
            }
            else_required = true;
            assign_expr
        };
        if self.eat_token(T::KeywordElse).is_none() {
            if else_required {
                self.warn(E::ExpectedSemiOrElse);
            }
            return Ok(self.add_node(Node {
                tag: N::IfSimple,
                main_token: if_token,
                data: node::Data {
                    lhs: condition,
                    rhs: then_expr,
                },
            }));
        }
        self.parse_payload()?;
        let else_expr = self.expect_statement(false)?;
        let rhs = self.add_extra(node::If {
            then_expr,
            else_expr,
        });
        Ok(self.add_node(Node {
            tag: N::If,
            main_token: if_token,
            data: node::Data {
                lhs: condition,
                rhs,
            },
        }))
    }

    // ---- blocks ----

    pub(crate) fn parse_block_expr_statement(&mut self) -> Result<node::Index> {
        let block_expr = self.parse_block_expr()?;
        if block_expr != 0 {
            return Ok(block_expr);
        }
        let assign_expr = self.parse_assign_expr()?;
        if assign_expr != 0 {
            self.expect_semicolon(E::ExpectedSemiAfterStmt, true)?;
            return Ok(assign_expr);
        }
        Ok(NULL_NODE)
    }

    pub(crate) fn expect_block_expr_statement(&mut self) -> Result<node::Index> {
        let node = self.parse_block_expr_statement()?;
        if node == 0 {
            return self.fail(E::ExpectedBlockOrExpr);
        }
        Ok(node)
    }

    pub(crate) fn parse_block_expr(&mut self) -> Result<node::Index> {
        match self.token_tag(self.tok_i) {
            T::Identifier => {
                if self.token_tag(self.tok_i + 1) == T::Colon
                    && self.token_tag(self.tok_i + 2) == T::LBrace
                {
                    self.tok_i += 2;
                    self.parse_block()
                } else {
                    Ok(NULL_NODE)
                }
            }
            T::LBrace => self.parse_block(),
            _ => Ok(NULL_NODE),
        }
    }

    pub(crate) fn parse_block(&mut self) -> Result<node::Index> {
        let Some(lbrace) = self.eat_token(T::LBrace) else {
            return Ok(NULL_NODE);
        };
        let mut statements = Vec::new();
        loop {
            if self.token_tag(self.tok_i) == T::RBrace {
                break;
            }
            let statement = self.expect_statement_recoverable()?;
            if statement == 0 {
                break;
            }
            statements.push(statement);
        }
        self.expect_token(T::RBrace)?;
        let semicolon = self.token_tag(self.tok_i - 2) == T::Semicolon;
        match statements[..] {
            [] => Ok(self.add_node(Node {
                tag: N::BlockTwo,
                main_token: lbrace,
                data: node::Data { lhs: 0, rhs: 0 },
            })),
            [lhs] => Ok(self.add_node(Node {
                tag: match semicolon {
                    true => N::BlockTwoSemicolon,
                    false => N::BlockTwo,
                },
                main_token: lbrace,
                data: node::Data { lhs, rhs: 0 },
            })),
            [lhs, rhs] => Ok(self.add_node(Node {
                tag: match semicolon {
                    true => N::BlockTwoSemicolon,
                    false => N::BlockTwo,
                },
                main_token: lbrace,
                data: node::Data { lhs, rhs },
            })),
            _ => {
                let span = self.list_to_span(&statements);
                Ok(self.add_node(Node {
                    tag: match semicolon {
                        true => N::BlockSemicolon,
                        false => N::Block,
                    },
                    main_token: lbrace,
                    data: node::Data {
                        lhs: span.start,
                        rhs: span.end,
                    },
                }))
            }
        }
    }

    /// `label:` before a block, loop, or switch. Returns the label token or
    /// 0.
    pub(crate) fn parse_block_label(&mut self) -> TokenIndex {
        if self.token_tag(self.tok_i) == T::Identifier
            && self.token_tag(self.tok_i + 1) == T::Colon
        {
            let identifier = self.tok_i;
            self.tok_i += 2;
            return identifier;
        }
        0
    }
}
