use super::*;

impl Parser<'_, '_> {
    /// `if` in expression position. `body_parse_fn` parses the arms, so
    /// the same production serves expression and type-expression contexts.
    pub(crate) fn parse_if(
        &mut self,
        mut body_parse_fn: impl FnMut(&mut Self) -> Result<node::Index>,
    ) -> Result<node::Index> {
        let Some(if_token) = self.eat_token(T::KeywordIf) else {
            return Ok(NULL_NODE);
        };
        self.expect_token(T::LParen)?;
        let condition = self.expect_expr()?;
        self.expect_token(T::RParen)?;
        self.parse_ptr_payload()?;

        let then_expr = body_parse_fn(self)?;
        if self.eat_token(T::KeywordElse).is_none() {
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
        let else_expr = body_parse_fn(self)?;
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

    /// `for` in expression position.
    pub(crate) fn parse_for(
        &mut self,
        mut body_parse_fn: impl FnMut(&mut Self) -> Result<node::Index>,
    ) -> Result<node::Index> {
        let Some(for_token) = self.eat_token(T::KeywordFor) else {
            return Ok(NULL_NODE);
        };
        let mut list: Vec<node::Index> = Vec::new();
        let inputs = self.for_prefix(&mut list)?;

        let then_expr = body_parse_fn(self)?;
        let mut has_else = false;
        if self.eat_token(T::KeywordElse).is_some() {
            list.push(then_expr);
            let else_expr = body_parse_fn(self)?;
            list.push(else_expr);
            has_else = true;
        } else if inputs == 1 {
            return Ok(self.add_node(Node {
                tag: N::ForSimple,
                main_token: for_token,
                data: node::Data {
                    lhs: list[0],
                    rhs: then_expr,
                },
            }));
        } else {
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

    /// The `(input, a..b, ...) |x, *y|` head of a `for`. Inputs are pushed
    /// onto `list`; returns how many there were. Capture arity mismatches
    /// are reported but do not stop the parse.
    pub(crate) fn for_prefix(&mut self, list: &mut Vec<node::Index>) -> Result<u32> {
        self.expect_token(T::LParen)?;
        loop {
            let mut input = self.expect_expr()?;
            if let Some(ellipsis) = self.eat_token(T::Ellipsis2) {
                let end = self.parse_expr()?;
                input = self.add_node(Node {
                    tag: N::ForRange,
                    main_token: ellipsis,
                    data: node::Data {
                        lhs: input,
                        rhs: end,
                    },
                });
            }
            list.push(input);
            match self.token_tag(self.tok_i) {
                T::Comma => self.tok_i += 1,
                T::RParen => {
                    self.tok_i += 1;
                    break;
                }
                T::Colon | T::RBrace | T::RBracket => return self.fail_expected(T::RParen),
                _ => self.warn(E::ExpectedCommaAfterForOperand),
            }
            if self.eat_token(T::RParen).is_some() {
                break;
            }
        }
        let inputs = list.len() as u32;

        if self.eat_token(T::Pipe).is_none() {
            self.warn(E::ExpectedLoopPayload);
            return Ok(inputs);
        }

        let mut captures: u32 = 0;
        let mut warned_excess = false;
        loop {
            self.eat_token(T::Asterisk);
            let identifier = self.expect_token(T::Identifier)?;
            captures += 1;
            if captures > inputs && !warned_excess {
                self.warn_msg(Error::new(E::ExtraForCapture, identifier));
                warned_excess = true;
            }
            match self.token_tag(self.tok_i) {
                T::Comma => self.tok_i += 1,
                T::Pipe => {
                    self.tok_i += 1;
                    break;
                }
                _ => self.warn(E::ExpectedCommaAfterCapture),
            }
            if self.eat_token(T::Pipe).is_some() {
                break;
            }
        }

        if captures < inputs {
            let uncaptured = list[captures as usize];
            let token = self.node(uncaptured).main_token;
            self.warn_msg(Error::new(E::ForInputNotCaptured, token));
        }
        Ok(inputs)
    }

    pub(crate) fn parse_while_expr(&mut self) -> Result<node::Index> {
        self.parse_while(Self::expect_expr)
    }

    pub(crate) fn parse_while_type_expr(&mut self) -> Result<node::Index> {
        self.parse_while(Self::expect_type_expr)
    }

    fn parse_while(
        &mut self,
        mut body_parse_fn: impl FnMut(&mut Self) -> Result<node::Index>,
    ) -> Result<node::Index> {
        let Some(while_token) = self.eat_token(T::KeywordWhile) else {
            return Ok(NULL_NODE);
        };
        self.expect_token(T::LParen)?;
        let condition = self.expect_expr()?;
        self.expect_token(T::RParen)?;
        self.parse_ptr_payload()?;
        let cont_expr = self.parse_while_continue_expr()?;

        let then_expr = body_parse_fn(self)?;
        if self.eat_token(T::KeywordElse).is_none() {
            let node = self.while_without_else(while_token, condition, cont_expr, then_expr);
            return Ok(node);
        }
        self.parse_payload()?;
        let else_expr = body_parse_fn(self)?;
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

    /// `: (expr)` between a while condition and its body. Also catches a
    /// `(` on the same line with no `:`, which is how a misplaced continue
    /// expression usually looks.
    pub(crate) fn parse_while_continue_expr(&mut self) -> Result<node::Index> {
        if self.eat_token(T::Colon).is_none() {
            if self.token_tag(self.tok_i) == T::LParen
                && self.tokens_on_same_line(self.tok_i - 1, self.tok_i)
            {
                return self.fail(E::ExpectedContinueExpr);
            }
            return Ok(NULL_NODE);
        }
        self.expect_token(T::LParen)?;
        let node = self.parse_assign_expr()?;
        if node == 0 {
            return self.fail(E::ExpectedExprOrAssignment);
        }
        self.expect_token(T::RParen)?;
        Ok(node)
    }

    // ---- switch ----

    pub(crate) fn expect_switch_expr(&mut self) -> Result<node::Index> {
        let switch_token = self.assert_token(T::KeywordSwitch);
        self.expect_token(T::LParen)?;
        let operand = self.expect_expr()?;
        self.expect_token(T::RParen)?;
        self.expect_token(T::LBrace)?;
        let cases = self.parse_switch_prong_list()?;
        let trailing_comma = self.token_tag(self.tok_i - 1) == T::Comma;
        self.expect_token(T::RBrace)?;

        let rhs = self.add_extra(cases);
        Ok(self.add_node(Node {
            tag: match trailing_comma {
                true => N::SwitchComma,
                false => N::Switch,
            },
            main_token: switch_token,
            data: node::Data { lhs: operand, rhs },
        }))
    }

    pub(crate) fn parse_switch_prong_list(&mut self) -> Result<node::SubRange> {
        let mut prongs = Vec::new();
        loop {
            let prong = self.parse_switch_prong()?;
            if prong == 0 {
                break;
            }
            prongs.push(prong);

            match self.token_tag(self.tok_i) {
                T::Comma => self.tok_i += 1,
                T::Colon | T::RParen | T::RBrace | T::RBracket => break,
                _ => self.warn(E::ExpectedCommaAfterSwitchProng),
            }
        }
        Ok(self.list_to_span(&prongs))
    }

    /// `inline? (else | item (, item)*) => |*capture, index| expr`.
    pub(crate) fn parse_switch_prong(&mut self) -> Result<node::Index> {
        let mut items = Vec::new();

        let is_inline = self.eat_token(T::KeywordInline).is_some();

        if self.eat_token(T::KeywordElse).is_none() {
            loop {
                let item = self.parse_switch_item()?;
                if item == 0 {
                    break;
                }
                items.push(item);
                if self.eat_token(T::Comma).is_none() {
                    break;
                }
            }
            if items.is_empty() {
                if is_inline {
                    self.tok_i -= 1;
                }
                return Ok(NULL_NODE);
            }
        }
        let arrow_token = self.expect_token(T::EqualAngleBracketRight)?;
        self.parse_ptr_index_payload()?;

        match items[..] {
            [] => {
                let rhs = self.expect_single_assign_expr()?;
                Ok(self.add_node(Node {
                    tag: match is_inline {
                        true => N::SwitchCaseInlineOne,
                        false => N::SwitchCaseOne,
                    },
                    main_token: arrow_token,
                    data: node::Data { lhs: 0, rhs },
                }))
            }
            [lhs] => {
                let rhs = self.expect_single_assign_expr()?;
                Ok(self.add_node(Node {
                    tag: match is_inline {
                        true => N::SwitchCaseInlineOne,
                        false => N::SwitchCaseOne,
                    },
                    main_token: arrow_token,
                    data: node::Data { lhs, rhs },
                }))
            }
            _ => {
                let span = self.list_to_span(&items);
                let lhs = self.add_extra(span);
                let rhs = self.expect_single_assign_expr()?;
                Ok(self.add_node(Node {
                    tag: match is_inline {
                        true => N::SwitchCaseInline,
                        false => N::SwitchCase,
                    },
                    main_token: arrow_token,
                    data: node::Data { lhs, rhs },
                }))
            }
        }
    }

    /// One prong item; `a...b` becomes a `SwitchRange` node.
    pub(crate) fn parse_switch_item(&mut self) -> Result<node::Index> {
        let expr = self.parse_expr()?;
        if expr == 0 {
            return Ok(NULL_NODE);
        }

        if let Some(token) = self.eat_token(T::Ellipsis3) {
            let rhs = self.expect_expr()?;
            return Ok(self.add_node(Node {
                tag: N::SwitchRange,
                main_token: token,
                data: node::Data { lhs: expr, rhs },
            }));
        }
        Ok(expr)
    }

    // ---- captures ----

    /// `|name|`. Returns the identifier token or 0.
    pub(crate) fn parse_payload(&mut self) -> Result<TokenIndex> {
        if self.eat_token(T::Pipe).is_none() {
            return Ok(0);
        }
        let identifier = self.expect_token(T::Identifier)?;
        self.expect_token(T::Pipe)?;
        Ok(identifier)
    }

    /// `|*name|`.
    pub(crate) fn parse_ptr_payload(&mut self) -> Result<TokenIndex> {
        if self.eat_token(T::Pipe).is_none() {
            return Ok(0);
        }
        self.eat_token(T::Asterisk);
        let identifier = self.expect_token(T::Identifier)?;
        self.expect_token(T::Pipe)?;
        Ok(identifier)
    }

    /// `|*name, index|`.
    pub(crate) fn parse_ptr_index_payload(&mut self) -> Result<TokenIndex> {
        if self.eat_token(T::Pipe).is_none() {
            return Ok(0);
        }
        self.eat_token(T::Asterisk);
        let identifier = self.expect_token(T::Identifier)?;
        if self.eat_token(T::Comma).is_some() {
            self.expect_token(T::Identifier)?;
        }
        self.expect_token(T::Pipe)?;
        Ok(identifier)
    }
}
