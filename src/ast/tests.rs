use super::*;

use crate::ast::error::Tag as E;
use crate::ast::node::Tag as N;
use crate::token::Tag as T;

macro_rules! assert_node {
    ($tree:ident, $index:expr, $tag:ident) => {{
        let node = $tree.node($index);
        assert_eq!(node.tag, N::$tag);
        node
    }};

    // "Identifier" alone says little; also pin down the token text.
    ($tree:ident, $index:expr, Identifier, $needle:expr) => {{
        let node = assert_node!($tree, $index, Identifier);
        assert_token!($tree, node.main_token, Identifier, $needle);
        node
    }};
}

macro_rules! assert_token {
    ($tree:ident, $index:expr, $tag:ident, $needle:expr) => {{
        assert_eq!($tree.token_tag($index), T::$tag);
        let start = $tree.token_start($index);
        assert!($tree.source_from(start).starts_with($needle.as_bytes()));
    }};
    ($tree:ident, $index:expr, $tag:ident) => {{
        assert!(T::$tag.lexeme().is_some());
        assert_token!($tree, $index, $tag, T::$tag.symbol());
    }};
}

macro_rules! assert_error {
    ($tree:ident, $index:expr, $tag:ident, is_note: $is_note:expr) => {{
        let error = &$tree.errors[$index];
        assert_eq!(error.tag, E::$tag);
        assert_eq!(error.is_note, $is_note);
        error
    }};
    ($tree:ident, $index:expr, $tag:ident) => {
        assert_error!($tree, $index, $tag, is_note: false)
    };
    ($tree:ident, $index:expr, $tag:ident(_), is_note: $is_note:expr) => {{
        let error = &$tree.errors[$index];
        assert!(matches!(error.tag, E::$tag(_)));
        assert_eq!(error.is_note, $is_note);
        error
    }};
    ($tree:ident, $index:expr, $tag:ident(_)) => {
        assert_error!($tree, $index, $tag(_), is_note: false)
    };
}

#[track_caller]
fn parse_recoverable(source: &str, mode: Mode) -> Ast {
    Ast::parse(source.as_bytes(), mode)
}

#[track_caller]
fn parse(source: &str, mode: Mode) -> (Ast, node::Index, node::Index) {
    let tree = parse_recoverable(source, mode);
    assert!(
        tree.errors.is_empty(),
        "unexpected errors in {source:?}: {:?}",
        tree.errors.iter().map(|e| e.tag).collect::<Vec<_>>()
    );

    let root = assert_node!(tree, 0, Root);
    let (lhs, rhs) = (root.data.lhs, root.data.rhs);
    (tree, lhs, rhs)
}

/// Parse a source file with exactly one top-level member and return it.
#[track_caller]
fn parse_zig(source: &str) -> (Ast, node::Index) {
    let (tree, start, end) = parse(source, Mode::Zig);
    assert_eq!(end - start, 1);

    let index = tree.extra_u32(start);
    (tree, index)
}

#[track_caller]
fn parse_zon(source: &str) -> (Ast, node::Index) {
    let (tree, index, _) = parse(source, Mode::Zon);
    (tree, index)
}

// ---- declarations ----

#[test]
fn test_simple_var_decl() {
    let (tree, index) = parse_zig("var foo = 42;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    assert_token!(tree, node.main_token, KeywordVar);
    assert_eq!(node.data.lhs, 0);
    assert_node!(tree, node.data.rhs, NumberLiteral);

    let (tree, index) = parse_zig("pub const foo = 42;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    assert_token!(tree, node.main_token - 1, KeywordPub);
    assert_token!(tree, node.main_token, KeywordConst);
}

#[test]
fn test_aligned_var_decl() {
    let (tree, index) = parse_zig("var foo align(bar) = baz;");
    let node = assert_node!(tree, index, AlignedVarDecl);
    assert_token!(tree, node.main_token, KeywordVar);
    assert_node!(tree, node.data.lhs, Identifier, "bar");
    assert_node!(tree, node.data.rhs, Identifier, "baz");
}

#[test]
fn test_local_var_decl() {
    let (tree, index) = parse_zig("const foo: Foo align(bar) = .{};");
    let node = assert_node!(tree, index, LocalVarDecl);
    assert_token!(tree, node.main_token, KeywordConst);
    let extra: node::LocalVarDecl = tree.extra(node.data.lhs);
    assert_node!(tree, extra.type_node, Identifier, "Foo");
    assert_node!(tree, extra.align_node, Identifier, "bar");
    assert_node!(tree, node.data.rhs, StructInitDotTwo);
}

#[test]
fn test_global_var_decl() {
    let (tree, index) = parse_zig("var foo linksection(bar) = baz;");
    let node = assert_node!(tree, index, GlobalVarDecl);
    let extra: node::GlobalVarDecl = tree.extra(node.data.lhs);
    assert_eq!(extra.type_node, 0);
    assert_eq!(extra.align_node, 0);
    assert_eq!(extra.addrspace_node, 0);
    assert_node!(tree, extra.section_node, Identifier, "bar");
    assert_node!(tree, node.data.rhs, Identifier, "baz");

    let (tree, index) = parse_zig("threadlocal var foo addrspace(bar) = baz;");
    let node = assert_node!(tree, index, GlobalVarDecl);
    let extra: node::GlobalVarDecl = tree.extra(node.data.lhs);
    assert_node!(tree, extra.addrspace_node, Identifier, "bar");
    assert_eq!(extra.section_node, 0);
}

#[test]
fn test_wrong_equal_var_decl() {
    let tree = parse_recoverable("const x == 1;", Mode::Zig);
    assert_eq!(tree.errors.len(), 1);
    assert_error!(tree, 0, WrongEqualVarDecl);

    let members = tree.root_decls();
    assert_eq!(members.len(), 1);
    let node = assert_node!(tree, members[0], SimpleVarDecl);
    assert_node!(tree, node.data.rhs, NumberLiteral);
}

#[test]
fn test_usingnamespace() {
    let (tree, index) = parse_zig("usingnamespace foo;");
    let node = assert_node!(tree, index, Usingnamespace);
    assert_token!(tree, node.main_token, KeywordUsingnamespace);
    assert_node!(tree, node.data.lhs, Identifier, "foo");

    let (tree, index) = parse_zig("pub usingnamespace @import(\"std\");");
    let node = assert_node!(tree, index, Usingnamespace);
    assert_node!(tree, node.data.lhs, BuiltinCallTwo);
}

#[test]
fn test_test_decl() {
    let (tree, index) = parse_zig("test {}");
    let node = assert_node!(tree, index, TestDecl);
    assert_token!(tree, node.main_token, KeywordTest);
    assert_eq!(node.data.lhs, 0);
    assert_node!(tree, node.data.rhs, BlockTwo);

    let (tree, index) = parse_zig(r#"test "foo" {}"#);
    let node = assert_node!(tree, index, TestDecl);
    assert_token!(tree, node.data.lhs, StringLiteral, r#""foo""#);
}

#[test]
fn test_fn_proto_simple() {
    let (tree, index) = parse_zig("fn foo() void {}");
    let decl = assert_node!(tree, index, FnDecl);
    let proto = assert_node!(tree, decl.data.lhs, FnProtoSimple);
    assert_token!(tree, proto.main_token, KeywordFn);
    assert_eq!(proto.data.lhs, 0);
    assert_node!(tree, proto.data.rhs, Identifier, "void");
    assert_node!(tree, decl.data.rhs, BlockTwo);
    // The prototype precedes the decl, which precedes the body.
    assert!(decl.data.lhs < index);
    assert!(index < decl.data.rhs);

    let (tree, index) = parse_zig("fn foo(a: A) void {}");
    let decl = assert_node!(tree, index, FnDecl);
    let proto = assert_node!(tree, decl.data.lhs, FnProtoSimple);
    assert_node!(tree, proto.data.lhs, Identifier, "A");
}

#[test]
fn test_fn_proto_multi() {
    let (tree, index) = parse_zig("fn foo(a: A, b: B) void {}");
    let decl = assert_node!(tree, index, FnDecl);
    let proto = assert_node!(tree, decl.data.lhs, FnProtoMulti);
    let extra: node::SubRange = tree.extra(proto.data.lhs);
    assert_eq!(extra.end - extra.start, 2);
    assert_node!(tree, proto.data.rhs, Identifier, "void");
}

#[test]
fn test_fn_proto_one() {
    let (tree, index) = parse_zig("fn foo(a: A) addrspace(bar) void {}");
    let decl = assert_node!(tree, index, FnDecl);
    let proto = assert_node!(tree, decl.data.lhs, FnProtoOne);
    let extra: node::FnProtoOne = tree.extra(proto.data.lhs);
    assert_node!(tree, extra.param, Identifier, "A");
    assert_eq!(extra.align_expr, 0);
    assert_node!(tree, extra.addrspace_expr, Identifier, "bar");
    assert_eq!(extra.section_expr, 0);
    assert_eq!(extra.callconv_expr, 0);
}

#[test]
fn test_fn_proto_full() {
    let (tree, index) = parse_zig("fn foo(a: A, b: B) callconv(bar) void {}");
    let decl = assert_node!(tree, index, FnDecl);
    let proto = assert_node!(tree, decl.data.lhs, FnProto);
    let extra: node::FnProto = tree.extra(proto.data.lhs);
    assert_eq!(extra.params_end - extra.params_start, 2);
    assert_node!(tree, extra.callconv_expr, Identifier, "bar");
}

#[test]
fn test_extern_fn_proto() {
    let (tree, index) = parse_zig("extern \"c\" fn write(fd: i32) isize;");
    let proto = assert_node!(tree, index, FnProtoSimple);
    assert_token!(tree, proto.main_token, KeywordFn);
}

#[test]
fn test_extern_fn_body_is_an_error() {
    let tree = parse_recoverable("extern fn f() void {}", Mode::Zig);
    assert!(!tree.errors.is_empty());
    let error = assert_error!(tree, 0, ExternFnBody);
    assert_token!(tree, error.token, KeywordExtern);
}

#[test]
fn test_varargs_nonfinal() {
    let tree = parse_recoverable("fn f(..., a: u8) void;", Mode::Zig);
    assert_eq!(tree.errors.len(), 1);
    let error = assert_error!(tree, 0, VarargsNonfinal);
    assert_token!(tree, error.token, Identifier, "a");
}

// ---- containers ----

#[test]
fn test_container_decl_two() {
    let (tree, index) = parse_zig("const Foo = struct {};");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let node = assert_node!(tree, node.data.rhs, ContainerDeclTwo);
    assert_token!(tree, node.main_token, KeywordStruct);
    assert_eq!(node.data.lhs, 0);
    assert_eq!(node.data.rhs, 0);

    let (tree, index) = parse_zig("const Foo = struct { const a = 1; };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let node = assert_node!(tree, node.data.rhs, ContainerDeclTwoTrailing);
    assert_node!(tree, node.data.lhs, SimpleVarDecl);
}

#[test]
fn test_container_decl_many() {
    let (tree, index) =
        parse_zig("const Foo = opaque { const a = 1; const b = 2; fn c() void {} };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let node = assert_node!(tree, node.data.rhs, ContainerDecl);
    assert_token!(tree, node.main_token, KeywordOpaque);
    assert_eq!(node.data.rhs - node.data.lhs, 3);
}

#[test]
fn test_container_decl_arg() {
    let (tree, index) = parse_zig("const Foo = enum(u8) { a, b };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let node = assert_node!(tree, node.data.rhs, ContainerDeclArg);
    assert_node!(tree, node.data.lhs, Identifier, "u8");
    let extra: node::SubRange = tree.extra(node.data.rhs);
    assert_eq!(extra.end - extra.start, 2);
}

#[test]
fn test_tagged_union() {
    let (tree, index) = parse_zig("const U = union(enum) { a: A, b: B };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let node = assert_node!(tree, node.data.rhs, TaggedUnionTwo);
    assert_token!(tree, node.main_token, KeywordUnion);
    assert_node!(tree, node.data.lhs, ContainerFieldInit);
    assert_node!(tree, node.data.rhs, ContainerFieldInit);

    let (tree, index) = parse_zig("const U = union(enum(u8)) { a, b, c, };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let node = assert_node!(tree, node.data.rhs, TaggedUnionEnumTagTrailing);
    assert_node!(tree, node.data.lhs, Identifier, "u8");
    let extra: node::SubRange = tree.extra(node.data.rhs);
    assert_eq!(extra.end - extra.start, 3);
}

#[test]
fn test_container_field_shapes() {
    let (tree, index) = parse_zig("foo: Foo = .{}");
    let node = assert_node!(tree, index, ContainerFieldInit);
    assert_token!(tree, node.main_token, Identifier, "foo");
    assert_node!(tree, node.data.lhs, Identifier, "Foo");
    assert_node!(tree, node.data.rhs, StructInitDotTwo);

    let (tree, index) = parse_zig("foo: Foo align(bar)");
    let node = assert_node!(tree, index, ContainerFieldAlign);
    assert_node!(tree, node.data.rhs, Identifier, "bar");

    let (tree, index) = parse_zig("foo: Foo align(bar) = .{}");
    let node = assert_node!(tree, index, ContainerField);
    let extra: node::ContainerField = tree.extra(node.data.rhs);
    assert_node!(tree, extra.align_expr, Identifier, "bar");
    assert_node!(tree, extra.value_expr, StructInitDotTwo);

    // Tuple-like: no `name:` prefix.
    let (tree, index) = parse_zig("Foo = .{}");
    let node = assert_node!(tree, index, ContainerFieldInit);
    assert_token!(tree, node.main_token, Identifier, "Foo");
}

#[test]
fn test_comptime_container_members() {
    let (tree, index) = parse_zig("comptime {}");
    let node = assert_node!(tree, index, Comptime);
    assert_node!(tree, node.data.lhs, BlockTwo);

    let (tree, index) = parse_zig("comptime foo: u8 = 1,");
    let node = assert_node!(tree, index, ContainerFieldInit);
    assert_token!(tree, node.main_token, Identifier, "foo");
}

#[test]
fn test_decl_between_fields() {
    let source = "
a: A,
var foo = 42;
b: B,
";
    let tree = parse_recoverable(source, Mode::Zig);
    assert_eq!(tree.errors.len(), 3);
    let error = assert_error!(tree, 0, DeclBetweenFields);
    assert_token!(tree, error.token, KeywordVar);
    let error = assert_error!(tree, 1, PreviousField, is_note: true);
    assert_token!(tree, error.token, Identifier, "a");
    let error = assert_error!(tree, 2, NextField, is_note: true);
    assert_token!(tree, error.token, Identifier, "b");

    // All three members still made it into the tree.
    assert_eq!(tree.root_decls().len(), 3);
}

#[test]
fn test_expected_comma_after_field() {
    let source = "
a: A
b: B,
";
    let tree = parse_recoverable(source, Mode::Zig);
    assert_eq!(tree.errors.len(), 1);
    assert_error!(tree, 0, ExpectedCommaAfterField);
}

#[test]
fn test_c_style_container() {
    let tree = parse_recoverable("struct Foo {};", Mode::Zig);
    assert_eq!(tree.errors.len(), 2);
    let error = assert_error!(tree, 0, CStyleContainer(_));
    assert_token!(tree, error.token, Identifier, "Foo");
    let error = assert_error!(tree, 1, ZigStyleContainer(_), is_note: true);
    assert_token!(tree, error.token, Identifier, "Foo");

    // Recovery skips the whole body and the `;` and keeps going.
    let tree = parse_recoverable("struct Foo {}; const a = 1;", Mode::Zig);
    assert_eq!(tree.errors.len(), 2);
    let members = tree.root_decls();
    assert_eq!(members.len(), 1);
    assert_node!(tree, members[0], SimpleVarDecl);
}

#[test]
fn test_doc_comment_warnings() {
    let tree = parse_recoverable("/// Foo", Mode::Zig);
    assert_eq!(tree.errors.len(), 1);
    assert_error!(tree, 0, UnattachedDocComment);

    let tree = parse_recoverable("/// Foo\ntest {}", Mode::Zig);
    assert_eq!(tree.errors.len(), 1);
    assert_error!(tree, 0, TestDocComment);

    let tree = parse_recoverable("const a = 1; /// doc\nconst b = 2;", Mode::Zig);
    assert_eq!(tree.errors.len(), 1);
    assert_error!(tree, 0, SameLineDocComment);
}

#[test]
fn test_missing_semicolon_targets_previous_line() {
    let tree = parse_recoverable("const x = 1\nconst y = 2;", Mode::Zig);
    assert_eq!(tree.errors.len(), 1);
    let error = assert_error!(tree, 0, ExpectedSemiAfterDecl);
    assert!(error.token_is_prev);
    assert_token!(tree, error.token, NumberLiteral, "1");

    // The second declaration survives.
    let members = tree.root_decls();
    assert_eq!(members.len(), 1);
}

// ---- expressions ----

#[test]
fn test_operator_precedence() {
    let (tree, index) = parse_zig("const _ = a or b and c;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let or_node = assert_node!(tree, node.data.rhs, BoolOr);
    assert_token!(tree, or_node.main_token, KeywordOr);
    assert_node!(tree, or_node.data.lhs, Identifier, "a");
    let and_node = assert_node!(tree, or_node.data.rhs, BoolAnd);
    assert_node!(tree, and_node.data.lhs, Identifier, "b");
    assert_node!(tree, and_node.data.rhs, Identifier, "c");
}

#[test]
fn test_left_associativity() {
    let (tree, index) = parse_zig("const _ = a + b - c;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let sub = assert_node!(tree, node.data.rhs, Sub);
    let add = assert_node!(tree, sub.data.lhs, Add);
    assert_node!(tree, add.data.lhs, Identifier, "a");
    assert_node!(tree, add.data.rhs, Identifier, "b");
    assert_node!(tree, sub.data.rhs, Identifier, "c");
}

#[test]
fn test_chained_comparison_is_an_error() {
    let tree = parse_recoverable("const _ = a == b == c;", Mode::Zig);
    assert_eq!(tree.errors.len(), 1);
    assert_error!(tree, 0, ChainedComparisonOperators);
    assert_node!(tree, 0, Root);
}

#[test]
fn test_mismatched_binary_op_whitespace() {
    let tree = parse_recoverable("const _ = a+ b;", Mode::Zig);
    assert_eq!(tree.errors.len(), 1);
    let error = assert_error!(tree, 0, MismatchedBinaryOpWhitespace);
    assert_token!(tree, error.token, Plus);
}

#[test]
fn test_invalid_ampersand_ampersand() {
    let tree = parse_recoverable("const _ = a && b;", Mode::Zig);
    assert_eq!(tree.errors.len(), 1);
    assert_error!(tree, 0, InvalidAmpersandAmpersand);

    // Still parsed as bitwise AND of an address-of.
    let members = tree.root_decls();
    let node = assert_node!(tree, members[0], SimpleVarDecl);
    let and_node = assert_node!(tree, node.data.rhs, BitAnd);
    assert_node!(tree, and_node.data.rhs, AddressOf);
}

#[test]
fn test_prefix_operators() {
    let (tree, index) = parse_zig("const _ = try -%~x;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let try_node = assert_node!(tree, node.data.rhs, Try);
    let neg = assert_node!(tree, try_node.data.lhs, NegationWrap);
    let not = assert_node!(tree, neg.data.lhs, BitNot);
    assert_node!(tree, not.data.lhs, Identifier, "x");
}

#[test]
fn test_catch_with_payload() {
    let (tree, index) = parse_zig("const _ = a catch |err| b;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let catch_node = assert_node!(tree, node.data.rhs, Catch);
    assert_token!(tree, catch_node.main_token, KeywordCatch);
    assert_node!(tree, catch_node.data.lhs, Identifier, "a");
    assert_node!(tree, catch_node.data.rhs, Identifier, "b");
}

#[test]
fn test_calls() {
    let (tree, index) = parse_zig("const _ = foo();");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let call = assert_node!(tree, node.data.rhs, CallOne);
    assert_token!(tree, call.main_token, LParen);
    assert_node!(tree, call.data.lhs, Identifier, "foo");
    assert_eq!(call.data.rhs, 0);

    let (tree, index) = parse_zig("const _ = foo(a,);");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let call = assert_node!(tree, node.data.rhs, CallOneComma);
    assert_node!(tree, call.data.rhs, Identifier, "a");

    let (tree, index) = parse_zig("const _ = foo(a, b, c);");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let call = assert_node!(tree, node.data.rhs, Call);
    let extra: node::SubRange = tree.extra(call.data.rhs);
    assert_eq!(extra.end - extra.start, 3);
}

#[test]
fn test_async_and_await() {
    let (tree, index) = parse_zig("const _ = async foo(a);");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let call = assert_node!(tree, node.data.rhs, AsyncCallOne);
    assert_node!(tree, call.data.lhs, Identifier, "foo");
    assert_node!(tree, call.data.rhs, Identifier, "a");

    let (tree, index) = parse_zig("const _ = await frame;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let await_node = assert_node!(tree, node.data.rhs, Await);
    assert_node!(tree, await_node.data.lhs, Identifier, "frame");
}

#[test]
fn test_builtin_call() {
    let (tree, index) = parse_zig("const std = @import(\"std\");");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let call = assert_node!(tree, node.data.rhs, BuiltinCallTwo);
    assert_token!(tree, call.main_token, Builtin, "@import");
    assert_node!(tree, call.data.lhs, StringLiteral);
    assert_eq!(call.data.rhs, 0);
}

#[test]
fn test_suffix_ops() {
    let (tree, index) = parse_zig("const _ = a.b.?.*;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let deref = assert_node!(tree, node.data.rhs, Deref);
    let unwrap = assert_node!(tree, deref.data.lhs, UnwrapOptional);
    let access = assert_node!(tree, unwrap.data.lhs, FieldAccess);
    assert_node!(tree, access.data.lhs, Identifier, "a");
    assert_token!(tree, access.data.rhs, Identifier, "b");

    let (tree, index) = parse_zig("const _ = a[i];");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let access = assert_node!(tree, node.data.rhs, ArrayAccess);
    assert_node!(tree, access.data.rhs, Identifier, "i");
}

#[test]
fn test_asterisk_after_ptr_deref() {
    let tree = parse_recoverable("const _ = a.**;", Mode::Zig);
    assert_eq!(tree.errors.len(), 1);
    assert_error!(tree, 0, AsteriskAfterPtrDeref);
    let members = tree.root_decls();
    let node = assert_node!(tree, members[0], SimpleVarDecl);
    assert_node!(tree, node.data.rhs, Deref);
}

#[test]
fn test_slices() {
    let (tree, index) = parse_zig("const _ = a[1..];");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let slice = assert_node!(tree, node.data.rhs, SliceOpen);
    assert_node!(tree, slice.data.rhs, NumberLiteral);

    let (tree, index) = parse_zig("const _ = a[1..2];");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let slice = assert_node!(tree, node.data.rhs, Slice);
    let extra: node::Slice = tree.extra(slice.data.rhs);
    assert_node!(tree, extra.start, NumberLiteral);
    assert_node!(tree, extra.end, NumberLiteral);

    let (tree, index) = parse_zig("const _ = a[1..2 :0];");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let slice = assert_node!(tree, node.data.rhs, SliceSentinel);
    let extra: node::SliceSentinel = tree.extra(slice.data.rhs);
    assert_node!(tree, extra.sentinel, NumberLiteral);
}

#[test]
fn test_struct_and_array_inits() {
    let (tree, index) = parse_zig("const _ = Foo{ .a = 1 };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let init = assert_node!(tree, node.data.rhs, StructInitOne);
    assert_node!(tree, init.data.lhs, Identifier, "Foo");
    assert_node!(tree, init.data.rhs, NumberLiteral);

    let (tree, index) = parse_zig("const _ = .{ .a = 1, .b = 2 };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let init = assert_node!(tree, node.data.rhs, StructInitDotTwo);
    assert_node!(tree, init.data.lhs, NumberLiteral);
    assert_node!(tree, init.data.rhs, NumberLiteral);

    let (tree, index) = parse_zig("const _ = .{ 1, 2, 3 };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let init = assert_node!(tree, node.data.rhs, ArrayInitDot);
    assert_eq!(init.data.rhs - init.data.lhs, 3);

    let (tree, index) = parse_zig("const _ = Foo{ 1, 2 };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let init = assert_node!(tree, node.data.rhs, ArrayInit);
    let extra: node::SubRange = tree.extra(init.data.rhs);
    assert_eq!(extra.end - extra.start, 2);
}

#[test]
fn test_grouped_expression() {
    let (tree, index) = parse_zig("const _ = (a);");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let group = assert_node!(tree, node.data.rhs, GroupedExpression);
    assert_node!(tree, group.data.lhs, Identifier, "a");
    assert_token!(tree, group.data.rhs, RParen);
}

#[test]
fn test_error_set_and_error_value() {
    let (tree, index) = parse_zig("const E = error{ A, B };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let set = assert_node!(tree, node.data.rhs, ErrorSetDecl);
    assert_token!(tree, set.main_token, KeywordError);
    assert_token!(tree, set.data.rhs, RBrace);

    let (tree, index) = parse_zig("const e = error.Foo;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let value = assert_node!(tree, node.data.rhs, ErrorValue);
    assert_token!(tree, value.data.rhs, Identifier, "Foo");
}

#[test]
fn test_multiline_string_literal() {
    let source = "const s =\n    \\\\hello\n    \\\\world\n;";
    let (tree, index) = parse_zig(source);
    let node = assert_node!(tree, index, SimpleVarDecl);
    let string = assert_node!(tree, node.data.rhs, MultilineStringLiteral);
    assert_eq!(string.data.rhs - string.data.lhs, 1);
}

#[test]
fn test_enum_literal() {
    let (tree, index) = parse_zig("const _ = .foo;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let lit = assert_node!(tree, node.data.rhs, EnumLiteral);
    assert_token!(tree, lit.main_token, Identifier, "foo");
}

// ---- type expressions ----

#[test]
fn test_optional_and_error_union_types() {
    let (tree, index) = parse_zig("const x: ?u8 = undefined;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let opt = assert_node!(tree, node.data.lhs, OptionalType);
    assert_node!(tree, opt.data.lhs, Identifier, "u8");

    let (tree, index) = parse_zig("const x: E!u8 = undefined;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let err_union = assert_node!(tree, node.data.lhs, ErrorUnion);
    assert_node!(tree, err_union.data.lhs, Identifier, "E");
    assert_node!(tree, err_union.data.rhs, Identifier, "u8");
}

#[test]
fn test_anyframe_type() {
    let (tree, index) = parse_zig("const x: anyframe->u8 = undefined;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let frame = assert_node!(tree, node.data.lhs, AnyframeType);
    assert_token!(tree, frame.main_token, KeywordAnyframe);
    assert_node!(tree, frame.data.rhs, Identifier, "u8");
}

#[test]
fn test_ptr_and_slice_types() {
    let (tree, index) = parse_zig("const foo: []Foo = undefined;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let ptr = assert_node!(tree, node.data.lhs, PtrTypeAligned);
    assert_token!(tree, ptr.main_token, LBracket);
    assert_eq!(ptr.data.lhs, 0);
    assert_node!(tree, ptr.data.rhs, Identifier, "Foo");

    let (tree, index) = parse_zig("const foo: []align(bar) Foo = undefined;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let ptr = assert_node!(tree, node.data.lhs, PtrTypeAligned);
    assert_node!(tree, ptr.data.lhs, Identifier, "bar");

    let (tree, index) = parse_zig("const foo: [:bar]Foo = undefined;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let ptr = assert_node!(tree, node.data.lhs, PtrTypeSentinel);
    assert_node!(tree, ptr.data.lhs, Identifier, "bar");

    let (tree, index) = parse_zig("const foo: [:bar]align(baz) Foo = undefined;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let ptr = assert_node!(tree, node.data.lhs, PtrType);
    let extra: node::PtrType = tree.extra(ptr.data.lhs);
    assert_node!(tree, extra.sentinel, Identifier, "bar");
    assert_node!(tree, extra.align_node, Identifier, "baz");
    assert_eq!(extra.addrspace_node, 0);

    let (tree, index) = parse_zig("const foo: *const u8 = undefined;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let ptr = assert_node!(tree, node.data.lhs, PtrTypeAligned);
    assert_token!(tree, ptr.main_token, Asterisk);

    let (tree, index) = parse_zig("const foo: [*:0]u8 = undefined;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let ptr = assert_node!(tree, node.data.lhs, PtrTypeSentinel);
    assert_node!(tree, ptr.data.lhs, NumberLiteral);
}

#[test]
fn test_double_pointer_type() {
    let (tree, index) = parse_zig("const foo: **u8 = undefined;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let outer = assert_node!(tree, node.data.lhs, PtrTypeAligned);
    assert_token!(tree, outer.main_token, AsteriskAsterisk);
    let inner = assert_node!(tree, outer.data.rhs, PtrTypeAligned);
    assert_node!(tree, inner.data.rhs, Identifier, "u8");
}

#[test]
fn test_array_types() {
    let (tree, index) = parse_zig("const foo: [bar]Foo = undefined;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let array = assert_node!(tree, node.data.lhs, ArrayType);
    assert_node!(tree, array.data.lhs, Identifier, "bar");
    assert_node!(tree, array.data.rhs, Identifier, "Foo");

    let (tree, index) = parse_zig("const foo: [bar:baz]Foo = undefined;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let array = assert_node!(tree, node.data.lhs, ArrayTypeSentinel);
    let extra: node::ArrayTypeSentinel = tree.extra(array.data.rhs);
    assert_node!(tree, extra.sentinel, Identifier, "baz");
    assert_node!(tree, extra.elem_type, Identifier, "Foo");
}

#[test]
fn test_ptr_type_bit_range() {
    let (tree, index) = parse_zig("const x: *align(8:0:2) u8 = undefined;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let ptr = assert_node!(tree, node.data.lhs, PtrTypeBitRange);
    let extra: node::PtrTypeBitRange = tree.extra(ptr.data.lhs);
    assert_eq!(extra.sentinel, 0);
    assert_node!(tree, extra.align_node, NumberLiteral);
    assert_node!(tree, extra.bit_range_start, NumberLiteral);
    assert_node!(tree, extra.bit_range_end, NumberLiteral);
}

#[test]
fn test_invalid_bit_range_on_slice() {
    let tree = parse_recoverable("const x: []align(8:0:2) u8 = undefined;", Mode::Zig);
    assert_eq!(tree.errors.len(), 1);
    assert_error!(tree, 0, InvalidBitRange);
    let members = tree.root_decls();
    let node = assert_node!(tree, members[0], SimpleVarDecl);
    // The bit range is dropped; the align expression survives.
    let ptr = assert_node!(tree, node.data.lhs, PtrTypeAligned);
    assert_node!(tree, ptr.data.lhs, NumberLiteral);
}

#[test]
fn test_ptr_mod_on_array_child_type() {
    let tree = parse_recoverable("const x: [2]align(8) u8 = undefined;", Mode::Zig);
    assert_eq!(tree.errors.len(), 1);
    assert_error!(tree, 0, PtrModOnArrayChildType);
}

#[test]
fn test_extra_const_qualifier() {
    let tree = parse_recoverable("const x: *const const u8 = undefined;", Mode::Zig);
    assert_eq!(tree.errors.len(), 1);
    assert_error!(tree, 0, ExtraConstQualifier);
}

// ---- statements ----

#[test]
fn test_blocks() {
    let (tree, index) = parse_zig("const _ = {};");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let block = assert_node!(tree, node.data.rhs, BlockTwo);
    assert_eq!((block.data.lhs, block.data.rhs), (0, 0));

    let (tree, index) = parse_zig("const _ = { a(); b(); };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let block = assert_node!(tree, node.data.rhs, BlockTwoSemicolon);
    assert_node!(tree, block.data.lhs, CallOne);
    assert_node!(tree, block.data.rhs, CallOne);

    let (tree, index) = parse_zig("const _ = { a(); b(); c(); };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let block = assert_node!(tree, node.data.rhs, BlockSemicolon);
    assert_eq!(block.data.rhs - block.data.lhs, 3);
}

#[test]
fn test_defer_and_errdefer() {
    let (tree, index) = parse_zig("const _ = { defer {} };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let block = assert_node!(tree, node.data.rhs, BlockTwo);
    let defer_node = assert_node!(tree, block.data.lhs, Defer);
    assert_node!(tree, defer_node.data.rhs, BlockTwo);

    let (tree, index) = parse_zig("const _ = { errdefer |e| {} };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let block = assert_node!(tree, node.data.rhs, BlockTwo);
    let errdefer_node = assert_node!(tree, block.data.lhs, Errdefer);
    assert_token!(tree, errdefer_node.data.lhs, Identifier, "e");
}

#[test]
fn test_suspend_resume_nosuspend() {
    let (tree, index) = parse_zig("const _ = { suspend {} nosuspend {} };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let block = assert_node!(tree, node.data.rhs, BlockTwo);
    let suspend_node = assert_node!(tree, block.data.lhs, Suspend);
    assert_node!(tree, suspend_node.data.lhs, BlockTwo);
    assert_node!(tree, block.data.rhs, Nosuspend);

    let (tree, index) = parse_zig("fn f() void { resume frame; }");
    let decl = assert_node!(tree, index, FnDecl);
    let block = assert_node!(tree, decl.data.rhs, BlockTwoSemicolon);
    assert_node!(tree, block.data.lhs, Resume);
}

#[test]
fn test_var_decl_statement() {
    let (tree, index) = parse_zig("const _ = { var a = foo; };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let block = assert_node!(tree, node.data.rhs, BlockTwoSemicolon);
    let decl = assert_node!(tree, block.data.lhs, SimpleVarDecl);
    assert_node!(tree, decl.data.rhs, Identifier, "foo");
}

#[test]
fn test_assign_destructure_of_var_decls() {
    let (tree, index) = parse_zig("const _ = { var a, const b = foo; };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let block = assert_node!(tree, node.data.rhs, BlockTwoSemicolon);
    let destructure = assert_node!(tree, block.data.lhs, AssignDestructure);
    assert_token!(tree, destructure.main_token, Equal);
    assert_eq!(tree.extra_u32(destructure.data.lhs), 2);
    assert_node!(tree, destructure.data.rhs, Identifier, "foo");
}

#[test]
fn test_assign_destructure_of_exprs() {
    let (tree, index) = parse_zig("fn f() void { a, b = x; }");
    let decl = assert_node!(tree, index, FnDecl);
    let block = assert_node!(tree, decl.data.rhs, BlockTwoSemicolon);
    let destructure = assert_node!(tree, block.data.lhs, AssignDestructure);
    let extra_index = destructure.data.lhs;
    assert_eq!(tree.extra_u32(extra_index), 2);
    assert_node!(tree, tree.extra_u32(extra_index + 1), Identifier, "a");
    assert_node!(tree, tree.extra_u32(extra_index + 2), Identifier, "b");
    assert_node!(tree, destructure.data.rhs, Identifier, "x");
}

#[test]
fn test_wrong_equal_in_statement() {
    let tree = parse_recoverable("fn f() void { var x == 1; }", Mode::Zig);
    assert_eq!(tree.errors.len(), 1);
    assert_error!(tree, 0, WrongEqualVarDecl);
}

#[test]
fn test_assign_operators() {
    let (tree, index) = parse_zig("fn f() void { x +%= 1; }");
    let decl = assert_node!(tree, index, FnDecl);
    let block = assert_node!(tree, decl.data.rhs, BlockTwoSemicolon);
    assert_node!(tree, block.data.lhs, AssignAddWrap);

    let (tree, index) = parse_zig("fn f() void { x <<|= 1; }");
    let decl = assert_node!(tree, index, FnDecl);
    let block = assert_node!(tree, decl.data.rhs, BlockTwoSemicolon);
    assert_node!(tree, block.data.lhs, AssignShlSat);
}

#[test]
fn test_expected_labelable() {
    let tree = parse_recoverable("fn f() void { blk: 1; }", Mode::Zig);
    assert!(!tree.errors.is_empty());
    assert_error!(tree, 0, ExpectedLabelable);
}

#[test]
fn test_label_without_var_const() {
    let tree = parse_recoverable("fn f() void { x: i32 = 1; }", Mode::Zig);
    assert!(!tree.errors.is_empty());
    let error = assert_error!(tree, 0, ExpectedVarConst);
    assert_token!(tree, error.token, Identifier, "x");
}

// ---- control flow ----

#[test]
fn test_if_expr() {
    let (tree, index) = parse_zig("const _ = if (a) b else c;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let if_node = assert_node!(tree, node.data.rhs, If);
    assert_node!(tree, if_node.data.lhs, Identifier, "a");
    let extra: node::If = tree.extra(if_node.data.rhs);
    assert_node!(tree, extra.then_expr, Identifier, "b");
    assert_node!(tree, extra.else_expr, Identifier, "c");
}

#[test]
fn test_if_statement_simple() {
    let (tree, index) = parse_zig("fn f() void { if (a) b(); }");
    let decl = assert_node!(tree, index, FnDecl);
    let block = assert_node!(tree, decl.data.rhs, BlockTwoSemicolon);
    let if_node = assert_node!(tree, block.data.lhs, IfSimple);
    assert_node!(tree, if_node.data.lhs, Identifier, "a");
    assert_node!(tree, if_node.data.rhs, CallOne);
}

#[test]
fn test_if_statement_missing_semi_or_else() {
    let tree = parse_recoverable("fn f() void { if (a) x = 1 }", Mode::Zig);
    assert_eq!(tree.errors.len(), 1);
    assert_error!(tree, 0, ExpectedSemiOrElse);
}

#[test]
fn test_while_shapes() {
    let (tree, index) = parse_zig("fn f() void { while (a) {} }");
    let decl = assert_node!(tree, index, FnDecl);
    let block = assert_node!(tree, decl.data.rhs, BlockTwo);
    let while_node = assert_node!(tree, block.data.lhs, WhileSimple);
    assert_node!(tree, while_node.data.lhs, Identifier, "a");

    let (tree, index) = parse_zig("fn f() void { while (a) : (i += 1) {} }");
    let decl = assert_node!(tree, index, FnDecl);
    let block = assert_node!(tree, decl.data.rhs, BlockTwo);
    let while_node = assert_node!(tree, block.data.lhs, WhileCont);
    let extra: node::WhileCont = tree.extra(while_node.data.rhs);
    assert_node!(tree, extra.cont_expr, AssignAdd);

    let (tree, index) = parse_zig("const _ = while (a) b else c;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let while_node = assert_node!(tree, node.data.rhs, While);
    let extra: node::While = tree.extra(while_node.data.rhs);
    assert_eq!(extra.cont_expr, 0);
    assert_node!(tree, extra.then_expr, Identifier, "b");
    assert_node!(tree, extra.else_expr, Identifier, "c");
}

#[test]
fn test_while_with_capture() {
    let (tree, index) = parse_zig("fn f() void { while (next()) |item| {} }");
    let decl = assert_node!(tree, index, FnDecl);
    let block = assert_node!(tree, decl.data.rhs, BlockTwo);
    let while_node = assert_node!(tree, block.data.lhs, WhileSimple);
    assert_node!(tree, while_node.data.lhs, CallOne);
}

#[test]
fn test_for_simple_and_range() {
    let (tree, index) = parse_zig("fn f() void { for (xs) |x| {} }");
    let decl = assert_node!(tree, index, FnDecl);
    let block = assert_node!(tree, decl.data.rhs, BlockTwo);
    let for_node = assert_node!(tree, block.data.lhs, ForSimple);
    assert_token!(tree, for_node.main_token, KeywordFor);
    assert_node!(tree, for_node.data.lhs, Identifier, "xs");

    let (tree, index) = parse_zig("fn f() void { for (0..10) |i| {} }");
    let decl = assert_node!(tree, index, FnDecl);
    let block = assert_node!(tree, decl.data.rhs, BlockTwo);
    let for_node = assert_node!(tree, block.data.lhs, ForSimple);
    let range = assert_node!(tree, for_node.data.lhs, ForRange);
    assert_node!(tree, range.data.lhs, NumberLiteral);
    assert_node!(tree, range.data.rhs, NumberLiteral);
}

#[test]
fn test_for_multi_input() {
    let (tree, index) = parse_zig("fn f() void { for (xs, ys) |x, y| {} }");
    let decl = assert_node!(tree, index, FnDecl);
    let block = assert_node!(tree, decl.data.rhs, BlockTwo);
    let for_node = assert_node!(tree, block.data.lhs, For);
    let packed = node::For::from_word(for_node.data.rhs);
    assert_eq!(packed.inputs, 2);
    assert!(!packed.has_else);
    let base = for_node.data.lhs;
    assert_node!(tree, tree.extra_u32(base), Identifier, "xs");
    assert_node!(tree, tree.extra_u32(base + 1), Identifier, "ys");
    assert_node!(tree, tree.extra_u32(base + 2), BlockTwo);
}

#[test]
fn test_for_expr_with_else() {
    let (tree, index) = parse_zig("const _ = for (xs, ys) |x, y| a else b;");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let for_node = assert_node!(tree, node.data.rhs, For);
    let packed = node::For::from_word(for_node.data.rhs);
    assert_eq!(packed.inputs, 2);
    assert!(packed.has_else);
    let base = for_node.data.lhs;
    assert_node!(tree, tree.extra_u32(base + 2), Identifier, "a");
    assert_node!(tree, tree.extra_u32(base + 3), Identifier, "b");
}

#[test]
fn test_for_capture_arity_mismatches() {
    let tree = parse_recoverable("fn f() void { for (xs) |x, y| {} }", Mode::Zig);
    assert_eq!(tree.errors.len(), 1);
    let error = assert_error!(tree, 0, ExtraForCapture);
    assert_token!(tree, error.token, Identifier, "y");

    let tree = parse_recoverable("fn f() void { for (xs, ys) |x| {} }", Mode::Zig);
    assert_eq!(tree.errors.len(), 1);
    assert_error!(tree, 0, ForInputNotCaptured);
}

#[test]
fn test_labeled_loop_with_break() {
    let (tree, index) = parse_zig("fn f() void { outer: for (xs) |x| { break :outer x; } }");
    let decl = assert_node!(tree, index, FnDecl);
    let block = assert_node!(tree, decl.data.rhs, BlockTwo);
    let for_node = assert_node!(tree, block.data.lhs, ForSimple);
    // The label sits two tokens before the loop keyword.
    assert_token!(tree, for_node.main_token, KeywordFor);
    assert_token!(tree, for_node.main_token - 2, Identifier, "outer");

    let body = assert_node!(tree, for_node.data.rhs, BlockTwoSemicolon);
    let break_node = assert_node!(tree, body.data.lhs, Break);
    assert_token!(tree, break_node.data.lhs, Identifier, "outer");
    assert_node!(tree, break_node.data.rhs, Identifier, "x");
}

#[test]
fn test_labeled_block_value() {
    let (tree, index) = parse_zig("const x = blk: { break :blk 1; };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let block = assert_node!(tree, node.data.rhs, BlockTwoSemicolon);
    assert_token!(tree, block.main_token, LBrace);
    assert_token!(tree, block.main_token - 2, Identifier, "blk");
}

#[test]
fn test_switch() {
    let source = "
const _ = switch (x) {
    1 => a,
    2...3 => b,
    else => c,
};
";
    let (tree, index) = parse_zig(source);
    let node = assert_node!(tree, index, SimpleVarDecl);
    let switch_node = assert_node!(tree, node.data.rhs, SwitchComma);
    assert_node!(tree, switch_node.data.lhs, Identifier, "x");
    let cases: node::SubRange = tree.extra(switch_node.data.rhs);
    assert_eq!(cases.end - cases.start, 3);

    let first = assert_node!(tree, tree.extra_u32(cases.start), SwitchCaseOne);
    assert_token!(tree, first.main_token, EqualAngleBracketRight);
    assert_node!(tree, first.data.lhs, NumberLiteral);

    let second = assert_node!(tree, tree.extra_u32(cases.start + 1), SwitchCaseOne);
    assert_node!(tree, second.data.lhs, SwitchRange);

    let third = assert_node!(tree, tree.extra_u32(cases.start + 2), SwitchCaseOne);
    assert_eq!(third.data.lhs, 0);
}

#[test]
fn test_switch_inline_and_multi_item_prongs() {
    let source = "const _ = switch (x) { inline 1 => a, 2, 3 => |*v, i| b };";
    let (tree, index) = parse_zig(source);
    let node = assert_node!(tree, index, SimpleVarDecl);
    let switch_node = assert_node!(tree, node.data.rhs, Switch);
    let cases: node::SubRange = tree.extra(switch_node.data.rhs);
    assert_eq!(cases.end - cases.start, 2);

    assert_node!(tree, tree.extra_u32(cases.start), SwitchCaseInlineOne);
    let multi = assert_node!(tree, tree.extra_u32(cases.start + 1), SwitchCase);
    let items: node::SubRange = tree.extra(multi.data.lhs);
    assert_eq!(items.end - items.start, 2);
}

#[test]
fn test_asm_simple() {
    let (tree, index) = parse_zig("const _ = { asm(\"nop\"); };");
    let node = assert_node!(tree, index, SimpleVarDecl);
    let block = assert_node!(tree, node.data.rhs, BlockTwoSemicolon);
    let asm_node = assert_node!(tree, block.data.lhs, AsmSimple);
    assert_token!(tree, asm_node.main_token, KeywordAsm);
    assert_node!(tree, asm_node.data.lhs, StringLiteral);
    assert_token!(tree, asm_node.data.rhs, RParen);
}

#[test]
fn test_asm_full() {
    let source = r#"
fn f() void {
    asm volatile ("syscall"
        : [ret] "={rax}" (-> usize)
        : [number] "{rax}" (n)
        : "rcx", "r11"
    );
}
"#;
    let (tree, index) = parse_zig(source);
    let decl = assert_node!(tree, index, FnDecl);
    let block = assert_node!(tree, decl.data.rhs, BlockTwoSemicolon);
    let asm_node = assert_node!(tree, block.data.lhs, Asm);
    assert_node!(tree, asm_node.data.lhs, StringLiteral);
    let extra: node::Asm = tree.extra(asm_node.data.rhs);
    assert_eq!(extra.items_end - extra.items_start, 2);
    assert_token!(tree, extra.rparen, RParen);

    let output = assert_node!(tree, tree.extra_u32(extra.items_start), AsmOutput);
    assert_token!(tree, output.main_token, Identifier, "ret");
    assert_node!(tree, output.data.lhs, Identifier, "usize");

    let input = assert_node!(tree, tree.extra_u32(extra.items_start + 1), AsmInput);
    assert_node!(tree, input.data.lhs, Identifier, "n");
}

// ---- ZON mode ----

#[test]
fn test_zon_literals() {
    let (tree, index) = parse_zon("42");
    let node = assert_node!(tree, index, NumberLiteral);
    assert_token!(tree, node.main_token, NumberLiteral, "42");

    let (tree, index) = parse_zon("'?'");
    assert_node!(tree, index, CharLiteral);
}

#[test]
fn test_zon_struct_init() {
    let (tree, index) = parse_zon(".{}");
    let node = assert_node!(tree, index, StructInitDotTwo);
    assert_token!(tree, node.main_token, LBrace);
    assert_eq!((node.data.lhs, node.data.rhs), (0, 0));

    let (tree, index) = parse_zon(".{ .foo = 42 }");
    let node = assert_node!(tree, index, StructInitDotTwo);
    assert_node!(tree, node.data.lhs, NumberLiteral);
}

#[test]
fn test_zon_requires_eof() {
    let tree = parse_recoverable("1 2", Mode::Zon);
    assert_eq!(tree.errors.len(), 1);
    assert_error!(tree, 0, ExpectedToken(_));
}

// ---- whole-file smoke test ----

#[test]
fn test_well_formed_file_has_no_errors() {
    let source = r#"
//! A small but busy file.

const std = @import("std");

pub const Config = struct {
    name: []const u8,
    retries: u32 = 3,
    flags: packed struct(u8) { a: bool, rest: u7 } = .{ .a = false, .rest = 0 },

    pub fn init(name: []const u8) Config {
        return .{ .name = name };
    }
};

var total: usize = 0;

fn accumulate(values: []const u32) !u32 {
    var sum: u32 = 0;
    for (values, 0..) |value, i| {
        if (i % 2 == 0) {
            sum +%= value;
        } else {
            sum = sat: {
                break :sat value;
            };
        }
    }
    while (sum > 100) : (sum -= 10) {
        total += 1;
    }
    return switch (sum) {
        0 => error.Empty,
        1...10 => sum * 2,
        else => sum,
    };
}

test "accumulate" {
    const result = accumulate(&.{ 1, 2, 3 }) catch |err| {
        _ = err;
        return;
    };
    _ = result;
}
"#;
    let tree = parse_recoverable(source, Mode::Zig);
    assert!(
        tree.errors.is_empty(),
        "{:?}",
        tree.errors.iter().map(|e| e.tag).collect::<Vec<_>>()
    );
    assert_node!(tree, 0, Root);
    assert_eq!(tree.root_decls().len(), 5);
}
