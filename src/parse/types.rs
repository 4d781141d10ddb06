use super::*;

/// Collected `align`/`addrspace`/`const`/`volatile`/`allowzero` modifiers
/// on a pointer head. Duplicates are reported where they appear.
pub(crate) struct PtrModifiers {
    align_node: node::Index,
    addrspace_node: node::Index,
    bit_range_start: node::Index,
    bit_range_end: node::Index,
}

impl Parser<'_, '_> {
    pub(crate) fn parse_type_expr(&mut self) -> Result<node::Index> {
        match self.token_tag(self.tok_i) {
            T::QuestionMark => {
                let main_token = self.next_token();
                let lhs = self.expect_type_expr()?;
                Ok(self.add_node(Node {
                    tag: N::OptionalType,
                    main_token,
                    data: node::Data { lhs, rhs: 0 },
                }))
            }
            T::KeywordAnyframe => match self.token_tag(self.tok_i + 1) {
                T::Arrow => {
                    let main_token = self.next_token();
                    let lhs = self.next_token();
                    let rhs = self.expect_type_expr()?;
                    Ok(self.add_node(Node {
                        tag: N::AnyframeType,
                        main_token,
                        data: node::Data { lhs, rhs },
                    }))
                }
                _ => self.parse_error_union_expr(),
            },
            T::Asterisk => {
                let asterisk = self.next_token();
                let mods = self.parse_ptr_modifiers()?;
                let elem_type = self.expect_type_expr()?;
                Ok(self.ptr_type_node(asterisk, 0, mods, elem_type))
            }
            T::AsteriskAsterisk => {
                // `**T` is a pointer to a pointer; both levels share the
                // one token.
                let asterisk = self.next_token();
                let mods = self.parse_ptr_modifiers()?;
                let elem_type = self.expect_type_expr()?;
                let inner = self.ptr_type_node(asterisk, 0, mods, elem_type);
                Ok(self.add_node(Node {
                    tag: N::PtrTypeAligned,
                    main_token: asterisk,
                    data: node::Data {
                        lhs: 0,
                        rhs: inner,
                    },
                }))
            }
            T::LBracket => match self.token_tag(self.tok_i + 1) {
                T::Asterisk => {
                    self.next_token();
                    let asterisk = self.next_token();
                    let mut sentinel: node::Index = 0;
                    if let Some(ident) = self.eat_token(T::Identifier) {
                        // Only `c` may follow the `*` of a many-item
                        // pointer; anything else is put back.
                        let start = self.token_start(ident) as usize;
                        let end = self.token_start(ident + 1) as usize;
                        if self.source[start..end].trim_ascii_end() != b"c" {
                            self.tok_i -= 1;
                        }
                    } else if self.eat_token(T::Colon).is_some() {
                        sentinel = self.expect_expr()?;
                    }
                    self.expect_token(T::RBracket)?;
                    let mods = self.parse_ptr_modifiers()?;
                    let elem_type = self.expect_type_expr()?;
                    Ok(self.ptr_type_node(asterisk, sentinel, mods, elem_type))
                }
                _ => {
                    let lbracket = self.next_token();
                    let len_expr = self.parse_expr()?;
                    let sentinel = match self.eat_token(T::Colon) {
                        Some(_) => self.expect_expr()?,
                        None => 0,
                    };
                    self.expect_token(T::RBracket)?;
                    if len_expr == 0 {
                        // Slice shapes reuse the pointer nodes.
                        let mut mods = self.parse_ptr_modifiers()?;
                        let elem_type = self.expect_type_expr()?;
                        if mods.bit_range_start != 0 {
                            let token = self.node(mods.bit_range_start).main_token;
                            self.warn_msg(Error::new(E::InvalidBitRange, token));
                            mods.bit_range_start = 0;
                            mods.bit_range_end = 0;
                        }
                        Ok(self.ptr_type_node(lbracket, sentinel, mods, elem_type))
                    } else {
                        match self.token_tag(self.tok_i) {
                            T::KeywordAlign
                            | T::KeywordConst
                            | T::KeywordVolatile
                            | T::KeywordAllowzero
                            | T::KeywordAddrspace => {
                                return self.fail(E::PtrModOnArrayChildType);
                            }
                            _ => {}
                        }
                        let elem_type = self.expect_type_expr()?;
                        if sentinel == 0 {
                            Ok(self.add_node(Node {
                                tag: N::ArrayType,
                                main_token: lbracket,
                                data: node::Data {
                                    lhs: len_expr,
                                    rhs: elem_type,
                                },
                            }))
                        } else {
                            let rhs = self.add_extra(node::ArrayTypeSentinel {
                                sentinel,
                                elem_type,
                            });
                            Ok(self.add_node(Node {
                                tag: N::ArrayTypeSentinel,
                                main_token: lbracket,
                                data: node::Data { lhs: len_expr, rhs },
                            }))
                        }
                    }
                }
            },
            _ => self.parse_error_union_expr(),
        }
    }

    pub(crate) fn expect_type_expr(&mut self) -> Result<node::Index> {
        let node = self.parse_type_expr()?;
        if node == 0 {
            return self.fail(E::ExpectedTypeExpr);
        }
        Ok(node)
    }

    /// Collapse a pointer/slice head to the smallest node shape its
    /// modifiers allow.
    fn ptr_type_node(
        &mut self,
        main_token: TokenIndex,
        sentinel: node::Index,
        mods: PtrModifiers,
        elem_type: node::Index,
    ) -> node::Index {
        if mods.bit_range_start != 0 {
            let lhs = self.add_extra(node::PtrTypeBitRange {
                sentinel,
                align_node: mods.align_node,
                addrspace_node: mods.addrspace_node,
                bit_range_start: mods.bit_range_start,
                bit_range_end: mods.bit_range_end,
            });
            self.add_node(Node {
                tag: N::PtrTypeBitRange,
                main_token,
                data: node::Data {
                    lhs,
                    rhs: elem_type,
                },
            })
        } else if sentinel == 0 && mods.addrspace_node == 0 {
            self.add_node(Node {
                tag: N::PtrTypeAligned,
                main_token,
                data: node::Data {
                    lhs: mods.align_node,
                    rhs: elem_type,
                },
            })
        } else if mods.align_node == 0 && mods.addrspace_node == 0 {
            self.add_node(Node {
                tag: N::PtrTypeSentinel,
                main_token,
                data: node::Data {
                    lhs: sentinel,
                    rhs: elem_type,
                },
            })
        } else {
            let lhs = self.add_extra(node::PtrType {
                sentinel,
                align_node: mods.align_node,
                addrspace_node: mods.addrspace_node,
            });
            self.add_node(Node {
                tag: N::PtrType,
                main_token,
                data: node::Data {
                    lhs,
                    rhs: elem_type,
                },
            })
        }
    }

    pub(crate) fn parse_ptr_modifiers(&mut self) -> Result<PtrModifiers> {
        let mut result = PtrModifiers {
            align_node: 0,
            addrspace_node: 0,
            bit_range_start: 0,
            bit_range_end: 0,
        };
        let mut saw_const = false;
        let mut saw_volatile = false;
        let mut saw_allowzero = false;
        loop {
            match self.token_tag(self.tok_i) {
                T::KeywordAlign => {
                    if result.align_node != 0 {
                        self.warn(E::ExtraAlignQualifier);
                    }
                    self.tok_i += 1;
                    self.expect_token(T::LParen)?;
                    result.align_node = self.expect_expr()?;
                    if self.eat_token(T::Colon).is_some() {
                        result.bit_range_start = self.expect_expr()?;
                        self.expect_token(T::Colon)?;
                        result.bit_range_end = self.expect_expr()?;
                    }
                    self.expect_token(T::RParen)?;
                }
                T::KeywordAddrspace => {
                    if result.addrspace_node != 0 {
                        self.warn(E::ExtraAddrspaceQualifier);
                    }
                    result.addrspace_node = self.parse_addr_space()?;
                }
                T::KeywordConst => {
                    if saw_const {
                        self.warn(E::ExtraConstQualifier);
                    }
                    self.tok_i += 1;
                    saw_const = true;
                }
                T::KeywordVolatile => {
                    if saw_volatile {
                        self.warn(E::ExtraVolatileQualifier);
                    }
                    self.tok_i += 1;
                    saw_volatile = true;
                }
                T::KeywordAllowzero => {
                    if saw_allowzero {
                        self.warn(E::ExtraAllowzeroQualifier);
                    }
                    self.tok_i += 1;
                    saw_allowzero = true;
                }
                _ => return Ok(result),
            }
        }
    }

    pub(crate) fn parse_error_union_expr(&mut self) -> Result<node::Index> {
        let suffix_expr = self.parse_suffix_expr()?;
        if suffix_expr == 0 {
            return Ok(NULL_NODE);
        }
        let Some(bang) = self.eat_token(T::Bang) else {
            return Ok(suffix_expr);
        };
        let rhs = self.expect_type_expr()?;
        Ok(self.add_node(Node {
            tag: N::ErrorUnion,
            main_token: bang,
            data: node::Data {
                lhs: suffix_expr,
                rhs,
            },
        }))
    }

    pub(crate) fn parse_suffix_expr(&mut self) -> Result<node::Index> {
        if self.eat_token(T::KeywordAsync).is_some() {
            let mut res = self.expect_primary_type_expr()?;
            loop {
                let node = self.parse_suffix_op(res)?;
                if node == 0 {
                    break;
                }
                res = node;
            }
            let Some(lparen) = self.eat_token(T::LParen) else {
                self.warn(E::ExpectedParamList);
                return Ok(res);
            };
            return self.finish_call(res, lparen, true);
        }

        let mut res = self.parse_primary_type_expr()?;
        if res == 0 {
            return Ok(res);
        }
        loop {
            let suffix_op = self.parse_suffix_op(res)?;
            if suffix_op != 0 {
                res = suffix_op;
                continue;
            }
            let Some(lparen) = self.eat_token(T::LParen) else {
                return Ok(res);
            };
            res = self.finish_call(res, lparen, false)?;
        }
    }

    /// Argument list and call node; the lparen has been consumed.
    fn finish_call(
        &mut self,
        callee: node::Index,
        lparen: TokenIndex,
        is_async: bool,
    ) -> Result<node::Index> {
        let mut params = Vec::new();
        loop {
            if self.eat_token(T::RParen).is_some() {
                break;
            }
            let param = self.expect_expr()?;
            params.push(param);
            match self.token_tag(self.tok_i) {
                T::Comma => self.tok_i += 1,
                T::RParen => {
                    self.tok_i += 1;
                    break;
                }
                T::Colon | T::RBrace | T::RBracket => return self.fail_expected(T::RParen),
                _ => self.warn(E::ExpectedCommaAfterArg),
            }
        }
        let comma = self.token_tag(self.tok_i - 2) == T::Comma;
        Ok(match params[..] {
            [] | [_] => {
                let rhs = params.first().copied().unwrap_or(0);
                let tag = match (is_async, comma) {
                    (false, false) => N::CallOne,
                    (false, true) => N::CallOneComma,
                    (true, false) => N::AsyncCallOne,
                    (true, true) => N::AsyncCallOneComma,
                };
                self.add_node(Node {
                    tag,
                    main_token: lparen,
                    data: node::Data { lhs: callee, rhs },
                })
            }
            _ => {
                let span = self.list_to_span(&params);
                let rhs = self.add_extra(span);
                let tag = match (is_async, comma) {
                    (false, false) => N::Call,
                    (false, true) => N::CallComma,
                    (true, false) => N::AsyncCall,
                    (true, true) => N::AsyncCallComma,
                };
                self.add_node(Node {
                    tag,
                    main_token: lparen,
                    data: node::Data { lhs: callee, rhs },
                })
            }
        })
    }

    pub(crate) fn parse_suffix_op(&mut self, lhs: node::Index) -> Result<node::Index> {
        match self.token_tag(self.tok_i) {
            T::LBracket => {
                let lbracket = self.next_token();
                let index_expr = self.expect_expr()?;

                if self.eat_token(T::Ellipsis2).is_some() {
                    let end_expr = self.parse_expr()?;
                    if self.eat_token(T::Colon).is_some() {
                        let sentinel = self.expect_expr()?;
                        self.expect_token(T::RBracket)?;
                        let rhs = self.add_extra(node::SliceSentinel {
                            start: index_expr,
                            end: end_expr,
                            sentinel,
                        });
                        return Ok(self.add_node(Node {
                            tag: N::SliceSentinel,
                            main_token: lbracket,
                            data: node::Data { lhs, rhs },
                        }));
                    }
                    self.expect_token(T::RBracket)?;
                    if end_expr == 0 {
                        return Ok(self.add_node(Node {
                            tag: N::SliceOpen,
                            main_token: lbracket,
                            data: node::Data {
                                lhs,
                                rhs: index_expr,
                            },
                        }));
                    }
                    let rhs = self.add_extra(node::Slice {
                        start: index_expr,
                        end: end_expr,
                    });
                    return Ok(self.add_node(Node {
                        tag: N::Slice,
                        main_token: lbracket,
                        data: node::Data { lhs, rhs },
                    }));
                }
                self.expect_token(T::RBracket)?;
                Ok(self.add_node(Node {
                    tag: N::ArrayAccess,
                    main_token: lbracket,
                    data: node::Data {
                        lhs,
                        rhs: index_expr,
                    },
                }))
            }
            T::PeriodAsterisk => {
                let main_token = self.next_token();
                Ok(self.add_node(Node {
                    tag: N::Deref,
                    main_token,
                    data: node::Data { lhs, rhs: 0 },
                }))
            }
            T::InvalidPeriodAsterisks => {
                self.warn(E::AsteriskAfterPtrDeref);
                let main_token = self.next_token();
                Ok(self.add_node(Node {
                    tag: N::Deref,
                    main_token,
                    data: node::Data { lhs, rhs: 0 },
                }))
            }
            T::Period => match self.token_tag(self.tok_i + 1) {
                T::Identifier => {
                    let main_token = self.next_token();
                    let rhs = self.next_token();
                    Ok(self.add_node(Node {
                        tag: N::FieldAccess,
                        main_token,
                        data: node::Data { lhs, rhs },
                    }))
                }
                T::QuestionMark => {
                    let main_token = self.next_token();
                    let rhs = self.next_token();
                    Ok(self.add_node(Node {
                        tag: N::UnwrapOptional,
                        main_token,
                        data: node::Data { lhs, rhs },
                    }))
                }
                // `.{` starts an initializer, not a suffix.
                T::LBrace => Ok(NULL_NODE),
                _ => {
                    self.tok_i += 1;
                    self.warn(E::ExpectedSuffixOp);
                    Ok(NULL_NODE)
                }
            },
            _ => Ok(NULL_NODE),
        }
    }

    pub(crate) fn parse_primary_type_expr(&mut self) -> Result<node::Index> {
        match self.token_tag(self.tok_i) {
            T::CharLiteral => {
                let main_token = self.next_token();
                Ok(self.leaf(N::CharLiteral, main_token))
            }
            T::NumberLiteral => {
                let main_token = self.next_token();
                Ok(self.leaf(N::NumberLiteral, main_token))
            }
            T::KeywordUnreachable => {
                let main_token = self.next_token();
                Ok(self.leaf(N::UnreachableLiteral, main_token))
            }
            T::KeywordAnyframe => {
                let main_token = self.next_token();
                Ok(self.leaf(N::AnyframeLiteral, main_token))
            }
            T::StringLiteral => {
                let main_token = self.next_token();
                Ok(self.leaf(N::StringLiteral, main_token))
            }

            T::Builtin => self.parse_builtin_call(),
            T::KeywordFn => self.parse_fn_proto(),
            T::KeywordIf => self.parse_if(Self::expect_type_expr),
            T::KeywordSwitch => self.expect_switch_expr(),

            T::KeywordExtern | T::KeywordPacked => {
                self.tok_i += 1;
                self.parse_container_decl_auto()
            }
            T::KeywordStruct | T::KeywordOpaque | T::KeywordEnum | T::KeywordUnion => {
                self.parse_container_decl_auto()
            }

            T::KeywordComptime => {
                let main_token = self.next_token();
                let lhs = self.expect_type_expr()?;
                Ok(self.add_node(Node {
                    tag: N::Comptime,
                    main_token,
                    data: node::Data { lhs, rhs: 0 },
                }))
            }
            T::MultilineStringLiteralLine => {
                let first_line = self.next_token();
                while self.token_tag(self.tok_i) == T::MultilineStringLiteralLine {
                    self.tok_i += 1;
                }
                Ok(self.add_node(Node {
                    tag: N::MultilineStringLiteral,
                    main_token: first_line,
                    data: node::Data {
                        lhs: first_line,
                        rhs: self.tok_i - 1,
                    },
                }))
            }
            T::Identifier => match self.token_tag(self.tok_i + 1) {
                T::Colon => match self.token_tag(self.tok_i + 2) {
                    T::KeywordInline => {
                        self.tok_i += 3;
                        match self.token_tag(self.tok_i) {
                            T::KeywordFor => self.parse_for(Self::expect_type_expr),
                            T::KeywordWhile => self.parse_while_type_expr(),
                            _ => self.fail(E::ExpectedInlinable),
                        }
                    }
                    T::KeywordFor => {
                        self.tok_i += 2;
                        self.parse_for(Self::expect_type_expr)
                    }
                    T::KeywordWhile => {
                        self.tok_i += 2;
                        self.parse_while_type_expr()
                    }
                    T::LBrace => {
                        self.tok_i += 2;
                        self.parse_block()
                    }
                    _ => {
                        let main_token = self.next_token();
                        Ok(self.leaf(N::Identifier, main_token))
                    }
                },
                _ => {
                    let main_token = self.next_token();
                    Ok(self.leaf(N::Identifier, main_token))
                }
            },
            T::KeywordInline => {
                self.tok_i += 1;
                match self.token_tag(self.tok_i) {
                    T::KeywordFor => self.parse_for(Self::expect_type_expr),
                    T::KeywordWhile => self.parse_while_type_expr(),
                    _ => self.fail(E::ExpectedInlinable),
                }
            }
            T::KeywordFor => self.parse_for(Self::expect_type_expr),
            T::KeywordWhile => self.parse_while_type_expr(),
            T::Period => match self.token_tag(self.tok_i + 1) {
                T::Identifier => {
                    let lhs = self.next_token();
                    let main_token = self.next_token();
                    Ok(self.add_node(Node {
                        tag: N::EnumLiteral,
                        main_token,
                        data: node::Data { lhs, rhs: 0 },
                    }))
                }
                T::LBrace => self.parse_dot_init_list(),
                _ => Ok(NULL_NODE),
            },
            T::KeywordError => match self.token_tag(self.tok_i + 1) {
                T::LBrace => {
                    let error_token = self.tok_i;
                    self.tok_i += 2;
                    loop {
                        if self.eat_token(T::RBrace).is_some() {
                            break;
                        }
                        self.eat_doc_comments();
                        self.expect_token(T::Identifier)?;
                        match self.token_tag(self.tok_i) {
                            T::Comma => self.tok_i += 1,
                            T::RBrace => {
                                self.tok_i += 1;
                                break;
                            }
                            T::Colon | T::RParen | T::RBracket => {
                                return self.fail_expected(T::RBrace)
                            }
                            _ => self.warn(E::ExpectedCommaAfterField),
                        }
                    }
                    Ok(self.add_node(Node {
                        tag: N::ErrorSetDecl,
                        main_token: error_token,
                        data: node::Data {
                            lhs: 0,
                            rhs: self.tok_i - 1,
                        },
                    }))
                }
                _ => {
                    let main_token = self.next_token();
                    let period = self.eat_token(T::Period);
                    if period.is_none() {
                        self.warn_expected(T::Period);
                    }
                    let identifier = self.eat_token(T::Identifier);
                    if identifier.is_none() {
                        self.warn_expected(T::Identifier);
                    }
                    Ok(self.add_node(Node {
                        tag: N::ErrorValue,
                        main_token,
                        data: node::Data {
                            lhs: period.unwrap_or(0),
                            rhs: identifier.unwrap_or(0),
                        },
                    }))
                }
            },
            T::LParen => {
                let main_token = self.next_token();
                let lhs = self.expect_expr()?;
                let rhs = self.expect_token(T::RParen)?;
                Ok(self.add_node(Node {
                    tag: N::GroupedExpression,
                    main_token,
                    data: node::Data { lhs, rhs },
                }))
            }
            _ => Ok(NULL_NODE),
        }
    }

    pub(crate) fn expect_primary_type_expr(&mut self) -> Result<node::Index> {
        let node = self.parse_primary_type_expr()?;
        if node == 0 {
            return self.fail(E::ExpectedPrimaryTypeExpr);
        }
        Ok(node)
    }

    fn leaf(&mut self, tag: node::Tag, main_token: TokenIndex) -> node::Index {
        self.add_node(Node {
            tag,
            main_token,
            data: node::Data { lhs: 0, rhs: 0 },
        })
    }

    /// `.{...}` with no explicit type: struct init when it opens with
    /// `.name =`, array init otherwise. The cursor is at the `.`.
    fn parse_dot_init_list(&mut self) -> Result<node::Index> {
        let lbrace = self.tok_i + 1;
        self.tok_i = lbrace + 1;

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
                [lhs] => self.add_node(Node {
                    tag: match comma {
                        true => N::StructInitDotTwoComma,
                        false => N::StructInitDotTwo,
                    },
                    main_token: lbrace,
                    data: node::Data { lhs, rhs: 0 },
                }),
                [lhs, rhs] => self.add_node(Node {
                    tag: match comma {
                        true => N::StructInitDotTwoComma,
                        false => N::StructInitDotTwo,
                    },
                    main_token: lbrace,
                    data: node::Data { lhs, rhs },
                }),
                _ => {
                    let span = self.list_to_span(&inits);
                    self.add_node(Node {
                        tag: match comma {
                            true => N::StructInitDotComma,
                            false => N::StructInitDot,
                        },
                        main_token: lbrace,
                        data: node::Data {
                            lhs: span.start,
                            rhs: span.end,
                        },
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
            // `.{}` is an empty struct init.
            [] => self.add_node(Node {
                tag: N::StructInitDotTwo,
                main_token: lbrace,
                data: node::Data { lhs: 0, rhs: 0 },
            }),
            [lhs] => self.add_node(Node {
                tag: match comma {
                    true => N::ArrayInitDotTwoComma,
                    false => N::ArrayInitDotTwo,
                },
                main_token: lbrace,
                data: node::Data { lhs, rhs: 0 },
            }),
            [lhs, rhs] => self.add_node(Node {
                tag: match comma {
                    true => N::ArrayInitDotTwoComma,
                    false => N::ArrayInitDotTwo,
                },
                main_token: lbrace,
                data: node::Data { lhs, rhs },
            }),
            _ => {
                let span = self.list_to_span(&inits);
                self.add_node(Node {
                    tag: match comma {
                        true => N::ArrayInitDotComma,
                        false => N::ArrayInitDot,
                    },
                    main_token: lbrace,
                    data: node::Data {
                        lhs: span.start,
                        rhs: span.end,
                    },
                })
            }
        })
    }

    pub(crate) fn parse_builtin_call(&mut self) -> Result<node::Index> {
        let builtin_token = self.assert_token(T::Builtin);
        if self.eat_token(T::LParen).is_none() {
            self.warn(E::ExpectedParamList);
            // Pretend the builtin was an identifier so parsing continues.
            return Ok(self.leaf(N::Identifier, builtin_token));
        }
        let mut params = Vec::new();
        loop {
            if self.eat_token(T::RParen).is_some() {
                break;
            }
            let param = self.expect_expr()?;
            params.push(param);
            match self.token_tag(self.tok_i) {
                T::Comma => self.tok_i += 1,
                T::RParen => {
                    self.tok_i += 1;
                    break;
                }
                _ => self.warn(E::ExpectedCommaAfterArg),
            }
        }
        let comma = self.token_tag(self.tok_i - 2) == T::Comma;
        Ok(match params[..] {
            [] => self.add_node(Node {
                tag: match comma {
                    true => N::BuiltinCallTwoComma,
                    false => N::BuiltinCallTwo,
                },
                main_token: builtin_token,
                data: node::Data { lhs: 0, rhs: 0 },
            }),
            [lhs] => self.add_node(Node {
                tag: match comma {
                    true => N::BuiltinCallTwoComma,
                    false => N::BuiltinCallTwo,
                },
                main_token: builtin_token,
                data: node::Data { lhs, rhs: 0 },
            }),
            [lhs, rhs] => self.add_node(Node {
                tag: match comma {
                    true => N::BuiltinCallTwoComma,
                    false => N::BuiltinCallTwo,
                },
                main_token: builtin_token,
                data: node::Data { lhs, rhs },
            }),
            _ => {
                let span = self.list_to_span(&params);
                self.add_node(Node {
                    tag: match comma {
                        true => N::BuiltinCallComma,
                        false => N::BuiltinCall,
                    },
                    main_token: builtin_token,
                    data: node::Data {
                        lhs: span.start,
                        rhs: span.end,
                    },
                })
            }
        })
    }

    // ---- modifier suites ----

    pub(crate) fn parse_byte_align(&mut self) -> Result<node::Index> {
        if self.eat_token(T::KeywordAlign).is_none() {
            return Ok(NULL_NODE);
        }
        self.expect_token(T::LParen)?;
        let expr = self.expect_expr()?;
        self.expect_token(T::RParen)?;
        Ok(expr)
    }

    pub(crate) fn parse_addr_space(&mut self) -> Result<node::Index> {
        if self.eat_token(T::KeywordAddrspace).is_none() {
            return Ok(NULL_NODE);
        }
        self.expect_token(T::LParen)?;
        let expr = self.expect_expr()?;
        self.expect_token(T::RParen)?;
        Ok(expr)
    }

    pub(crate) fn parse_link_section(&mut self) -> Result<node::Index> {
        if self.eat_token(T::KeywordLinksection).is_none() {
            return Ok(NULL_NODE);
        }
        self.expect_token(T::LParen)?;
        let expr = self.expect_expr()?;
        self.expect_token(T::RParen)?;
        Ok(expr)
    }

    pub(crate) fn parse_callconv(&mut self) -> Result<node::Index> {
        if self.eat_token(T::KeywordCallconv).is_none() {
            return Ok(NULL_NODE);
        }
        self.expect_token(T::LParen)?;
        let expr = self.expect_expr()?;
        self.expect_token(T::RParen)?;
        Ok(expr)
    }
}
