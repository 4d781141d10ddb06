use std::fmt;

use super::{Ast, TokenIndex};
use crate::token;

/// A single parser diagnostic. The parser appends these and keeps going;
/// callers must check the list before trusting the tree.
#[derive(Clone, Copy, Debug)]
pub struct Error {
    pub tag: Tag,
    pub token: TokenIndex,
    pub is_note: bool,
    /// True when `token` was retargeted to the token *before* the offending
    /// one because the offender starts a new line (keeps messages like
    /// "missing semicolon" on the line that needs fixing).
    pub token_is_prev: bool,
}

impl Error {
    pub fn new(tag: Tag, token: TokenIndex) -> Error {
        Error {
            tag,
            token,
            is_note: false,
            token_is_prev: false,
        }
    }

    pub fn note(tag: Tag, token: TokenIndex) -> Error {
        Error {
            is_note: true,
            ..Error::new(tag, token)
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tag {
    AsteriskAfterPtrDeref,
    ChainedComparisonOperators,
    DeclBetweenFields,
    ExpectedBlock,
    ExpectedBlockOrAssignment,
    ExpectedBlockOrExpr,
    ExpectedBlockOrField,
    ExpectedContainerMembers,
    ExpectedExpr,
    ExpectedExprOrAssignment,
    ExpectedExprOrVarDecl,
    ExpectedFn,
    ExpectedInlinable,
    ExpectedLabelable,
    ExpectedParamList,
    ExpectedPrefixExpr,
    ExpectedPrimaryTypeExpr,
    ExpectedPubItem,
    ExpectedReturnType,
    ExpectedSemiOrElse,
    ExpectedSemiOrLBrace,
    ExpectedStatement,
    ExpectedSuffixOp,
    ExpectedTypeExpr,
    ExpectedVarDecl,
    ExpectedVarDeclOrFn,
    ExpectedLoopPayload,
    ExpectedContainer,
    ExternFnBody,
    ExtraAddrspaceQualifier,
    ExtraAlignQualifier,
    ExtraAllowzeroQualifier,
    ExtraConstQualifier,
    ExtraVolatileQualifier,
    PtrModOnArrayChildType,
    InvalidBitRange,
    SameLineDocComment,
    UnattachedDocComment,
    TestDocComment,
    ComptimeDocComment,
    VarargsNonfinal,
    ExpectedContinueExpr,
    ExpectedSemiAfterDecl,
    ExpectedSemiAfterStmt,
    ExpectedCommaAfterField,
    ExpectedCommaAfterArg,
    ExpectedCommaAfterParam,
    ExpectedCommaAfterInitializer,
    ExpectedCommaAfterSwitchProng,
    ExpectedCommaAfterForOperand,
    ExpectedCommaAfterCapture,
    ExpectedInitializer,
    MismatchedBinaryOpWhitespace,
    InvalidAmpersandAmpersand,
    ExpectedVarConst,
    WrongEqualVarDecl,
    VarConstDecl,
    ExtraForCapture,
    ForInputNotCaptured,

    /// Carries the container keyword that was used C-style.
    CStyleContainer(token::Tag),
    /// Note paired with `CStyleContainer`.
    ZigStyleContainer(token::Tag),
    /// Note pointing at the field before a misplaced declaration.
    PreviousField,
    /// Note pointing at the field after a misplaced declaration.
    NextField,

    ExpectedToken(token::Tag),
}

impl Error {
    /// Render the canonical message for this diagnostic. The tree is needed
    /// to spell out the offending token.
    pub fn message(&self, tree: &Ast) -> String {
        let found = || {
            let token = self.token + u32::from(self.token_is_prev);
            tree.token_tag(token).symbol()
        };
        match self.tag {
            Tag::AsteriskAfterPtrDeref => {
                "'.*' cannot be followed by '*'; are you missing a space?".to_string()
            }
            Tag::ChainedComparisonOperators => {
                "comparison operators cannot be chained".to_string()
            }
            Tag::DeclBetweenFields => {
                "declarations are not allowed between container fields".to_string()
            }
            Tag::ExpectedBlock => format!("expected block, found '{}'", found()),
            Tag::ExpectedBlockOrAssignment => {
                format!("expected block or assignment, found '{}'", found())
            }
            Tag::ExpectedBlockOrExpr => {
                format!("expected block or expression, found '{}'", found())
            }
            Tag::ExpectedBlockOrField => {
                format!("expected block or field, found '{}'", found())
            }
            Tag::ExpectedContainerMembers => {
                format!("expected test, comptime, var decl, or container field, found '{}'", found())
            }
            Tag::ExpectedExpr => format!("expected expression, found '{}'", found()),
            Tag::ExpectedExprOrAssignment => {
                format!("expected expression or assignment, found '{}'", found())
            }
            Tag::ExpectedExprOrVarDecl => {
                format!("expected expression or var decl, found '{}'", found())
            }
            Tag::ExpectedFn => format!("expected function, found '{}'", found()),
            Tag::ExpectedInlinable => {
                format!("expected 'while' or 'for', found '{}'", found())
            }
            Tag::ExpectedLabelable => {
                format!("expected 'while', 'for', 'inline', or '{{', found '{}'", found())
            }
            Tag::ExpectedParamList => {
                format!("expected parameter list, found '{}'", found())
            }
            Tag::ExpectedPrefixExpr => {
                format!("expected prefix expression, found '{}'", found())
            }
            Tag::ExpectedPrimaryTypeExpr => {
                format!("expected primary type expression, found '{}'", found())
            }
            Tag::ExpectedPubItem => {
                "expected function or variable declaration after pub".to_string()
            }
            Tag::ExpectedReturnType => {
                format!("expected return type expression, found '{}'", found())
            }
            Tag::ExpectedSemiOrElse => "expected ';' or 'else' after statement".to_string(),
            Tag::ExpectedSemiOrLBrace => {
                "expected ';' or block after function prototype".to_string()
            }
            Tag::ExpectedStatement => format!("expected statement, found '{}'", found()),
            Tag::ExpectedSuffixOp => {
                format!("expected pointer dereference, optional unwrap, or field access, found '{}'", found())
            }
            Tag::ExpectedTypeExpr => format!("expected type expression, found '{}'", found()),
            Tag::ExpectedVarDecl => {
                format!("expected variable declaration, found '{}'", found())
            }
            Tag::ExpectedVarDeclOrFn => {
                format!("expected variable declaration or function, found '{}'", found())
            }
            Tag::ExpectedLoopPayload => {
                format!("expected loop payload, found '{}'", found())
            }
            Tag::ExpectedContainer => {
                format!("expected a struct, enum or union, found '{}'", found())
            }
            Tag::ExternFnBody => "extern functions have no body".to_string(),
            Tag::ExtraAddrspaceQualifier => "extra addrspace qualifier".to_string(),
            Tag::ExtraAlignQualifier => "extra align qualifier".to_string(),
            Tag::ExtraAllowzeroQualifier => "extra allowzero qualifier".to_string(),
            Tag::ExtraConstQualifier => "extra const qualifier".to_string(),
            Tag::ExtraVolatileQualifier => "extra volatile qualifier".to_string(),
            Tag::PtrModOnArrayChildType => {
                "pointer modifier not allowed on array child type".to_string()
            }
            Tag::InvalidBitRange => "bit range not allowed on slices and arrays".to_string(),
            Tag::SameLineDocComment => "same line documentation comment".to_string(),
            Tag::UnattachedDocComment => "unattached documentation comment".to_string(),
            Tag::TestDocComment => {
                "documentation comments cannot be attached to tests".to_string()
            }
            Tag::ComptimeDocComment => {
                "documentation comments cannot be attached to comptime blocks".to_string()
            }
            Tag::VarargsNonfinal => "function prototype has parameter after varargs".to_string(),
            Tag::ExpectedContinueExpr => {
                "expected ':' before while continue expression".to_string()
            }
            Tag::ExpectedSemiAfterDecl => "expected ';' after declaration".to_string(),
            Tag::ExpectedSemiAfterStmt => "expected ';' after statement".to_string(),
            Tag::ExpectedCommaAfterField => "expected ',' after field".to_string(),
            Tag::ExpectedCommaAfterArg => "expected ',' after argument".to_string(),
            Tag::ExpectedCommaAfterParam => "expected ',' after parameter".to_string(),
            Tag::ExpectedCommaAfterInitializer => "expected ',' after initializer".to_string(),
            Tag::ExpectedCommaAfterSwitchProng => "expected ',' after switch prong".to_string(),
            Tag::ExpectedCommaAfterForOperand => "expected ',' after for operand".to_string(),
            Tag::ExpectedCommaAfterCapture => "expected ',' after for capture".to_string(),
            Tag::ExpectedInitializer => format!("expected field initializer, found '{}'", found()),
            Tag::MismatchedBinaryOpWhitespace => format!(
                "binary operator '{}' has whitespace on one side, but not the other",
                tree.token_tag(self.token).symbol()
            ),
            Tag::InvalidAmpersandAmpersand => {
                "ambiguous use of '&&'; use 'and' for logical AND, or change whitespace to '& &' for bitwise AND"
                    .to_string()
            }
            Tag::ExpectedVarConst => {
                "expected 'var' or 'const' before variable declaration".to_string()
            }
            Tag::WrongEqualVarDecl => {
                "variable initialized with '==' instead of '='".to_string()
            }
            Tag::VarConstDecl => "to declare a variable use 'var' or 'const'".to_string(),
            Tag::ExtraForCapture => "extra capture in for loop".to_string(),
            Tag::ForInputNotCaptured => "for input is not captured".to_string(),
            Tag::CStyleContainer(container) => format!(
                "'{} {}' is invalid",
                container.symbol(),
                String::from_utf8_lossy(tree.token_slice(self.token)),
            ),
            Tag::ZigStyleContainer(container) => format!(
                "to declare a container do 'const {} = {}'",
                String::from_utf8_lossy(tree.token_slice(self.token)),
                container.symbol(),
            ),
            Tag::PreviousField => "field before declarations here".to_string(),
            Tag::NextField => "field after declarations here".to_string(),
            Tag::ExpectedToken(expected) => {
                format!("expected '{}', found '{}'", expected.symbol(), found())
            }
        }
    }

    /// Adapter rendering `file:line:col: error: message`.
    pub fn display<'err, 'file, 'ast, 'src>(
        &'err self,
        filename: &'file str,
        tree: &'ast Ast<'src>,
    ) -> Display<'err, 'file, 'ast, 'src> {
        Display {
            error: self,
            filename,
            tree,
        }
    }
}

pub struct Display<'err, 'file, 'ast, 'src> {
    error: &'err Error,
    filename: &'file str,
    tree: &'ast Ast<'src>,
}

impl fmt::Display for Display<'_, '_, '_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let loc = self.tree.token_location(0, self.error.token);
        let line = loc.line + 1;
        let column = loc.column + 1 + self.tree.error_offset(self.error) as usize;
        let kind = if self.error.is_note { "note" } else { "error" };
        write!(
            f,
            "{}:{}:{}: {}: {}",
            self.filename,
            line,
            column,
            kind,
            self.error.message(self.tree)
        )
    }
}
