use super::*;

#[derive(Clone, Copy)]
enum Assoc {
    Left,
    /// Chaining two operators of this precedence is an error.
    None,
}

#[derive(Clone, Copy)]
struct OperInfo {
    prec: i8,
    tag: node::Tag,
    assoc: Assoc,
}

/// The binary operator table. Anything absent binds at precedence -1 and
/// terminates precedence climbing.
fn oper_info(tag: token::Tag) -> Option<OperInfo> {
    let op = |prec, tag, assoc| {
        Some(OperInfo { prec, tag, assoc })
    };
    match tag {
        T::KeywordOr => op(10, N::BoolOr, Assoc::Left),

        T::KeywordAnd => op(20, N::BoolAnd, Assoc::Left),

        T::EqualEqual => op(30, N::EqualEqual, Assoc::None),
        T::BangEqual => op(30, N::BangEqual, Assoc::None),
        T::AngleBracketLeft => op(30, N::LessThan, Assoc::None),
        T::AngleBracketRight => op(30, N::GreaterThan, Assoc::None),
        T::AngleBracketLeftEqual => op(30, N::LessOrEqual, Assoc::None),
        T::AngleBracketRightEqual => op(30, N::GreaterOrEqual, Assoc::None),

        T::Ampersand => op(40, N::BitAnd, Assoc::Left),
        T::Caret => op(40, N::BitXor, Assoc::Left),
        T::Pipe => op(40, N::BitOr, Assoc::Left),
        T::KeywordOrelse => op(40, N::Orelse, Assoc::Left),
        T::KeywordCatch => op(40, N::Catch, Assoc::Left),

        T::AngleBracketAngleBracketLeft => op(50, N::Shl, Assoc::Left),
        T::AngleBracketAngleBracketLeftPipe => op(50, N::ShlSat, Assoc::Left),
        T::AngleBracketAngleBracketRight => op(50, N::Shr, Assoc::Left),

        T::Plus => op(60, N::Add, Assoc::Left),
        T::Minus => op(60, N::Sub, Assoc::Left),
        T::PlusPlus => op(60, N::ArrayCat, Assoc::Left),
        T::PlusPercent => op(60, N::AddWrap, Assoc::Left),
        T::MinusPercent => op(60, N::SubWrap, Assoc::Left),
        T::PlusPipe => op(60, N::AddSat, Assoc::Left),
        T::MinusPipe => op(60, N::SubSat, Assoc::Left),

        T::PipePipe => op(70, N::MergeErrorSets, Assoc::Left),
        T::Asterisk => op(70, N::Mul, Assoc::Left),
        T::Slash => op(70, N::Div, Assoc::Left),
        T::Percent => op(70, N::Mod, Assoc::Left),
        T::AsteriskAsterisk => op(70, N::ArrayMult, Assoc::Left),
        T::AsteriskPercent => op(70, N::MulWrap, Assoc::Left),
        T::AsteriskPipe => op(70, N::MulSat, Assoc::Left),

        _ => None,
    }
}

impl Parser<'_, '_> {
    pub(crate) fn parse_expr(&mut self) -> Result<node::Index> {
        self.parse_expr_precedence(0)
    }

    pub(crate) fn expect_expr(&mut self) -> Result<node::Index> {
        let node = self.parse_expr()?;
        if node == 0 {
            return self.fail(E::ExpectedExpr);
        }
        Ok(node)
    }

    pub(crate) fn parse_expr_precedence(&mut self, min_prec: i8) -> Result<node::Index> {
        assert!(min_prec >= 0);
        let mut node = self.parse_prefix_expr()?;
        if node == 0 {
            return Ok(NULL_NODE);
        }

        let mut banned_prec: i8 = -1;

        loop {
            let tok_tag = self.token_tag(self.tok_i);
            let Some(info) = oper_info(tok_tag) else { break };
            if info.prec < min_prec {
                break;
            }
            if info.prec == banned_prec {
                return self.fail(E::ChainedComparisonOperators);
            }

            let oper_token = self.next_token();
            if tok_tag == T::KeywordCatch {
                self.parse_payload()?;
            }
            let rhs = self.parse_expr_precedence(info.prec + 1)?;
            if rhs == 0 {
                self.warn(E::ExpectedExpr);
                return Ok(node);
            }

            {
                // Whitespace symmetry is checked on raw source bytes;
                // token boundaries alone cannot distinguish `a &&b` from
                // `a & &b`.
                let len = tok_tag.lexeme().unwrap().len();
                let start = self.token_start(oper_token) as usize;
                let before = self.source[start - 1];
                let after = self.source[start + len];
                if tok_tag == T::Ampersand && after == b'&' {
                    self.warn_msg(Error::new(E::InvalidAmpersandAmpersand, oper_token));
                } else if before.is_ascii_whitespace() != after.is_ascii_whitespace() {
                    self.warn_msg(Error::new(E::MismatchedBinaryOpWhitespace, oper_token));
                }
            }

            node = self.add_node(Node {
                tag: info.tag,
                main_token: oper_token,
                data: node::Data { lhs: node, rhs },
            });

            if let Assoc::None = info.assoc {
                banned_prec = info.prec;
            }
        }

        Ok(node)
    }

    pub(crate) fn parse_prefix_expr(&mut self) -> Result<node::Index> {
        let tag = match self.token_tag(self.tok_i) {
            T::Bang => N::BoolNot,
            T::Minus => N::Negation,
            T::Tilde => N::BitNot,
            T::MinusPercent => N::NegationWrap,
            T::Ampersand => N::AddressOf,
            T::KeywordTry => N::Try,
            T::KeywordAwait => N::Await,
            _ => return self.parse_primary_expr(),
        };
        let main_token = self.next_token();
        let lhs = self.expect_prefix_expr()?;
        Ok(self.add_node(Node {
            tag,
            main_token,
            data: node::Data { lhs, rhs: 0 },
        }))
    }

    pub(crate) fn expect_prefix_expr(&mut self) -> Result<node::Index> {
        let node = self.parse_prefix_expr()?;
        if node == 0 {
            return self.fail(E::ExpectedPrefixExpr);
        }
        Ok(node)
    }

    pub(crate) fn parse_primary_expr(&mut self) -> Result<node::Index> {
        match self.token_tag(self.tok_i) {
            T::KeywordAsm => self.expect_asm_expr(),
            T::KeywordIf => self.parse_if(Self::expect_expr),
            T::KeywordBreak => {
                let main_token = self.next_token();
                let lhs = self.parse_break_label()?;
                let rhs = self.parse_expr()?;
                Ok(self.add_node(Node {
                    tag: N::Break,
                    main_token,
                    data: node::Data { lhs, rhs },
                }))
            }
            T::KeywordContinue => {
                let main_token = self.next_token();
                let lhs = self.parse_break_label()?;
                Ok(self.add_node(Node {
                    tag: N::Continue,
                    main_token,
                    data: node::Data { lhs, rhs: 0 },
                }))
            }
            T::KeywordComptime => {
                let main_token = self.next_token();
                let lhs = self.expect_expr()?;
                Ok(self.add_node(Node {
                    tag: N::Comptime,
                    main_token,
                    data: node::Data { lhs, rhs: 0 },
                }))
            }
            T::KeywordNosuspend => {
                let main_token = self.next_token();
                let lhs = self.expect_expr()?;
                Ok(self.add_node(Node {
                    tag: N::Nosuspend,
                    main_token,
                    data: node::Data { lhs, rhs: 0 },
                }))
            }
            T::KeywordResume => {
                let main_token = self.next_token();
                let lhs = self.expect_expr()?;
                Ok(self.add_node(Node {
                    tag: N::Resume,
                    main_token,
                    data: node::Data { lhs, rhs: 0 },
                }))
            }
            T::KeywordReturn => {
                let main_token = self.next_token();
                let lhs = self.parse_expr()?;
                Ok(self.add_node(Node {
                    tag: N::Return,
                    main_token,
                    data: node::Data { lhs, rhs: 0 },
                }))
            }
            T::Identifier => {
                if self.token_tag(self.tok_i + 1) == T::Colon {
                    match self.token_tag(self.tok_i + 2) {
                        T::KeywordInline => {
                            self.tok_i += 3;
                            match self.token_tag(self.tok_i) {
                                T::KeywordFor => self.parse_for(Self::expect_expr),
                                T::KeywordWhile => self.parse_while_expr(),
                                _ => self.fail(E::ExpectedInlinable),
                            }
                        }
                        T::KeywordFor => {
                            self.tok_i += 2;
                            self.parse_for(Self::expect_expr)
                        }
                        T::KeywordWhile => {
                            self.tok_i += 2;
                            self.parse_while_expr()
                        }
                        T::LBrace => {
                            self.tok_i += 2;
                            self.parse_block()
                        }
                        _ => self.parse_curly_suffix_expr(),
                    }
                } else {
                    self.parse_curly_suffix_expr()
                }
            }
            T::KeywordInline => {
                self.tok_i += 1;
                match self.token_tag(self.tok_i) {
                    T::KeywordFor => self.parse_for(Self::expect_expr),
                    T::KeywordWhile => self.parse_while_expr(),
                    _ => self.fail(E::ExpectedInlinable),
                }
            }
            T::KeywordFor => self.parse_for(Self::expect_expr),
            T::KeywordWhile => self.parse_while_expr(),
            T::LBrace => self.parse_block(),
            _ => self.parse_curly_suffix_expr(),
        }
    }

    /// A type expression optionally followed by an initializer list:
    /// `T{...}` is a struct init when it opens with `.name =`, an array
    /// init otherwise.
    pub(crate) fn parse_curly_suffix_expr(&mut self) -> Result<node::Index> {
        let lhs = self.parse_type_expr()?;
        if lhs == 0 {
            return Ok(NULL_NODE);
        }
        let Some(lbrace) = self.eat_token(T::LBrace) else {
            return Ok(lhs);
        };

        let mut inits = Vec::new();
        let field_init = self.parse_field_init()?;
        if field_init != 0 {
            inits.push(field_init);
            loop {
                match self.token_tag(self.tok_i) {
                    T::Comma => self.tok_i += 1,
                    T::RBrace => {
                        self.tok_i += 1;
                        break;
                    }
                    T::Colon | T::RParen | T::RBracket => {
                        return self.fail_expected(T::RBrace)
                    }
                    _ => self.warn(E::ExpectedCommaAfterInitializer),
                }
                if self.eat_token(T::RBrace).is_some() {
                    break;
                }
                let next = self.expect_field_init()?;
                inits.push(next);
            }
            let comma = self.token_tag(self.tok_i - 2) == T::Comma;
            return Ok(match inits[..] {
                [] => unreachable!(),
                [rhs] => self.add_node(Node {
                    tag: match comma {
                        true => N::StructInitOneComma,
                        false => N::StructInitOne,
                    },
                    main_token: lbrace,
                    data: node::Data { lhs, rhs },
                }),
                _ => {
                    let span = self.list_to_span(&inits);
                    let rhs = self.add_extra(span);
                    self.add_node(Node {
                        tag: match comma {
                            true => N::StructInitComma,
                            false => N::StructInit,
                        },
                        main_token: lbrace,
                        data: node::Data { lhs, rhs },
                    })
                }
            });
        }

        loop {
            if self.eat_token(T::RBrace).is_some() {
                break;
            }
            let elem_init = self.expect_expr()?;
            inits.push(elem_init);
            match self.token_tag(self.tok_i) {
                T::Comma => self.tok_i += 1,
                T::RBrace => {
                    self.tok_i += 1;
                    break;
                }
                T::Colon | T::RParen | T::RBracket => return self.fail_expected(T::RBrace),
                _ => self.warn(E::ExpectedCommaAfterInitializer),
            }
        }
        let comma = self.token_tag(self.tok_i - 2) == T::Comma;
        Ok(match inits[..] {
            // `T{}` is an empty struct init.
            [] => self.add_node(Node {
                tag: N::StructInitOne,
                main_token: lbrace,
                data: node::Data { lhs, rhs: 0 },
            }),
            [rhs] => self.add_node(Node {
                tag: match comma {
                    true => N::ArrayInitOneComma,
                    false => N::ArrayInitOne,
                },
                main_token: lbrace,
                data: node::Data { lhs, rhs },
            }),
            _ => {
                let span = self.list_to_span(&inits);
                let rhs = self.add_extra(span);
                self.add_node(Node {
                    tag: match comma {
                        true => N::ArrayInitComma,
                        false => N::ArrayInit,
                    },
                    main_token: lbrace,
                    data: node::Data { lhs, rhs },
                })
            }
        })
    }

    /// `:label` after `break`/`continue`. Returns the label token or 0.
    pub(crate) fn parse_break_label(&mut self) -> Result<TokenIndex> {
        match self.eat_token(T::Colon) {
            None => Ok(0),
            Some(_) => self.expect_token(T::Identifier),
        }
    }

    /// `.name = expr`, or 0 when the cursor is not at a field initializer.
    pub(crate) fn parse_field_init(&mut self) -> Result<node::Index> {
        if self.token_tag(self.tok_i) == T::Period
            && self.token_tag(self.tok_i + 1) == T::Identifier
            && self.token_tag(self.tok_i + 2) == T::Equal
        {
            self.tok_i += 3;
            self.expect_expr()
        } else {
            Ok(NULL_NODE)
        }
    }

    pub(crate) fn expect_field_init(&mut self) -> Result<node::Index> {
        if self.token_tag(self.tok_i) == T::Period
            && self.token_tag(self.tok_i + 1) == T::Identifier
            && self.token_tag(self.tok_i + 2) == T::Equal
        {
            self.tok_i += 3;
            self.expect_expr()
        } else {
            self.fail(E::ExpectedInitializer)
        }
    }

    // ---- assignment ----

    pub(crate) fn parse_assign_expr(&mut self) -> Result<node::Index> {
        let expr = self.parse_expr()?;
        if expr == 0 {
            return Ok(NULL_NODE);
        }
        self.finish_assign_expr(expr)
    }

    pub(crate) fn expect_assign_expr(&mut self) -> Result<node::Index> {
        let expr = self.parse_assign_expr()?;
        if expr == 0 {
            return self.fail(E::ExpectedExprOrAssignment);
        }
        Ok(expr)
    }

    /// Assignment without destructuring, used by switch prongs.
    pub(crate) fn parse_single_assign_expr(&mut self) -> Result<node::Index> {
        let lhs = self.parse_expr()?;
        if lhs == 0 {
            return Ok(NULL_NODE);
        }
        let Some(tag) = assign_op_node(self.token_tag(self.tok_i)) else {
            return Ok(lhs);
        };
        let main_token = self.next_token();
        let rhs = self.expect_expr()?;
        Ok(self.add_node(Node {
            tag,
            main_token,
            data: node::Data { lhs, rhs },
        }))
    }

    pub(crate) fn expect_single_assign_expr(&mut self) -> Result<node::Index> {
        let expr = self.parse_single_assign_expr()?;
        if expr == 0 {
            return self.fail(E::ExpectedExprOrAssignment);
        }
        Ok(expr)
    }

    /// Attach an assignment (or destructure) to an already-parsed LHS, or
    /// return the LHS untouched when no assignment operator follows.
    pub(crate) fn finish_assign_expr(&mut self, lhs: node::Index) -> Result<node::Index> {
        let tok = self.token_tag(self.tok_i);
        if tok == T::Comma {
            return self.finish_assign_destructure_expr(lhs);
        }
        let Some(tag) = assign_op_node(tok) else {
            return Ok(lhs);
        };
        let main_token = self.next_token();
        let rhs = self.expect_expr()?;
        Ok(self.add_node(Node {
            tag,
            main_token,
            data: node::Data { lhs, rhs },
        }))
    }

    pub(crate) fn finish_assign_destructure_expr(
        &mut self,
        first_lhs: node::Index,
    ) -> Result<node::Index> {
        let mut lhs_items = vec![first_lhs];

        while self.eat_token(T::Comma).is_some() {
            let expr = self.expect_expr()?;
            lhs_items.push(expr);
        }

        let equal_token = self.expect_token(T::Equal)?;
        let rhs = self.expect_expr()?;

        assert!(lhs_items.len() > 1);

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
}

fn assign_op_node(tok: token::Tag) -> Option<node::Tag> {
    match tok {
        T::AsteriskEqual => Some(N::AssignMul),
        T::SlashEqual => Some(N::AssignDiv),
        T::PercentEqual => Some(N::AssignMod),
        T::PlusEqual => Some(N::AssignAdd),
        T::MinusEqual => Some(N::AssignSub),
        T::AngleBracketAngleBracketLeftEqual => Some(N::AssignShl),
        T::AngleBracketAngleBracketLeftPipeEqual => Some(N::AssignShlSat),
        T::AngleBracketAngleBracketRightEqual => Some(N::AssignShr),
        T::AmpersandEqual => Some(N::AssignBitAnd),
        T::CaretEqual => Some(N::AssignBitXor),
        T::PipeEqual => Some(N::AssignBitOr),
        T::AsteriskPercentEqual => Some(N::AssignMulWrap),
        T::PlusPercentEqual => Some(N::AssignAddWrap),
        T::MinusPercentEqual => Some(N::AssignSubWrap),
        T::AsteriskPipeEqual => Some(N::AssignMulSat),
        T::PlusPipeEqual => Some(N::AssignAddSat),
        T::MinusPipeEqual => Some(N::AssignSubSat),
        T::Equal => Some(N::Assign),
        _ => None,
    }
}
