//! Integration scenarios straight from the front-end's testable
//! properties (§8) -- kept separate from the unit tests living next to
//! each parser submodule, the way `ahoy-lexer`'s higher-level scenarios
//! live in its own `tests/` directory.

use ahoy_parser::{parse_lint, parse_strict, NodeKind};

#[test]
fn s4_precedence_star_binds_tighter_than_plus() {
    let ast = parse_strict("r: 1 + 2 * 3\n").expect("parses");
    let rhs = &ast.children[0].children[0];
    assert_eq!(rhs.kind, NodeKind::BinaryOp);
    assert_eq!(rhs.value, "+");
    assert_eq!(rhs.children[0].value, "1");
    let right = &rhs.children[1];
    assert_eq!(right.kind, NodeKind::BinaryOp);
    assert_eq!(right.value, "*");
    assert_eq!(right.children[0].value, "2");
    assert_eq!(right.children[1].value, "3");
}

#[test]
fn s5_if_anif_else_multiline_has_six_children() {
    let src = "if x is 1 then\n    a: 1\nanif x is 2 then\n    a: 2\nelse\n    a: 3\n";
    let ast = parse_strict(src).expect("parses");
    let if_node = &ast.children[0];
    assert_eq!(if_node.kind, NodeKind::If);
    assert_eq!(if_node.children.len(), 6);
    assert_eq!(if_node.children[0].kind, NodeKind::BinaryOp);
    assert_eq!(if_node.children[1].kind, NodeKind::Block);
    assert_eq!(if_node.children[2].kind, NodeKind::BinaryOp);
    assert_eq!(if_node.children[4].kind, NodeKind::Block);
}

#[test]
fn s6_method_chain_with_lambda() {
    let ast = parse_strict("r: [1,2,3].map|x: x + 1|.sum||\n").expect("parses");
    let rhs = &ast.children[0].children[0];
    assert_eq!(rhs.kind, NodeKind::MethodCall);
    assert_eq!(rhs.value, "sum");
    assert!(rhs.children[1].children.is_empty(), "sum|| has no arguments");

    let map_call = &rhs.children[0];
    assert_eq!(map_call.kind, NodeKind::MethodCall);
    assert_eq!(map_call.value, "map");

    let receiver = &map_call.children[0];
    assert_eq!(receiver.kind, NodeKind::ArrayLiteral);
    assert_eq!(receiver.children.len(), 3);

    let args = &map_call.children[1];
    assert_eq!(args.children.len(), 1);
    let lambda = &args.children[0];
    assert_eq!(lambda.kind, NodeKind::Lambda);
    assert_eq!(lambda.value, "x");
    assert_eq!(lambda.children[0].kind, NodeKind::BinaryOp);
    assert_eq!(lambda.children[0].value, "+");
}

#[test]
fn s7_loop_over_dict_has_four_children() {
    let ast = parse_strict("loop k, v in cfg do\n    print|k|\n").expect("parses");
    let loop_node = &ast.children[0];
    assert_eq!(loop_node.kind, NodeKind::ForInDictLoop);
    assert_eq!(loop_node.children.len(), 4);
    assert_eq!(loop_node.children[0].value, "k");
    assert_eq!(loop_node.children[1].value, "v");
    assert_eq!(loop_node.children[2].value, "cfg");
    assert_eq!(loop_node.children[3].kind, NodeKind::Block);
    assert_eq!(loop_node.children[3].children[0].kind, NodeKind::Call);
}

#[test]
fn s8_lint_recovery_on_missing_then() {
    let parse = parse_lint("if x is 1\n    a: 1\n");
    assert_eq!(parse.errors.len(), 1);
    assert!(parse.errors[0].message.contains("'then' or 'do'"));
    let if_node = &parse.ast.children[0];
    assert_eq!(if_node.kind, NodeKind::If);
    let block = &if_node.children[1];
    assert_eq!(block.kind, NodeKind::Block);
    assert_eq!(block.children[0].kind, NodeKind::Assignment);
}

#[test]
fn strict_mode_aborts_on_first_structural_error() {
    let err = parse_strict("x: |\n").unwrap_err();
    assert!(err.line >= 1);
}

#[test]
fn lint_mode_is_deterministic() {
    let src = "if x\n    a: 1\nfoo|1, 2\n";
    let first = parse_lint(src);
    let second = parse_lint(src);
    assert_eq!(first.ast, second.ast);
    assert_eq!(first.errors, second.errors);
}

#[test]
fn for_range_loop_with_named_variable() {
    let ast = parse_strict("loop i from:0 to 10 do\n    print|i|\n").expect("parses");
    let node = &ast.children[0];
    assert_eq!(node.kind, NodeKind::ForRangeLoop);
    assert_eq!(node.children.len(), 4);
    assert_eq!(node.children[0].value, "i");
}

#[test]
fn while_loop_without_named_variable() {
    let ast = parse_strict("loop till done do\n    next\n").expect("parses");
    let node = &ast.children[0];
    assert_eq!(node.kind, NodeKind::WhileLoop);
    assert_eq!(node.children.len(), 2);
}

#[test]
fn switch_with_case_list_and_range_and_default() {
    let src = "switch code:\n    1, 2: a: 1\n    3 to 5: a: 2\n    _: a: 3\n";
    let ast = parse_strict(src).expect("parses");
    let switch = &ast.children[0];
    assert_eq!(switch.kind, NodeKind::Switch);
    assert_eq!(switch.children.len(), 4); // scrutinee + 3 cases
    let case1 = &switch.children[1];
    assert_eq!(case1.children[0].kind, NodeKind::CaseList);
    let case2 = &switch.children[2];
    assert_eq!(case2.children[0].kind, NodeKind::CaseRange);
    let default_case = &switch.children[3];
    assert_eq!(default_case.children[0].value, "_");
}

#[test]
fn ternary_looser_than_or() {
    let ast = parse_strict("r: a or b ?? 1 : 2\n").expect("parses");
    let rhs = &ast.children[0].children[0];
    assert_eq!(rhs.kind, NodeKind::Ternary);
    assert_eq!(rhs.children[0].kind, NodeKind::BinaryOp);
    assert_eq!(rhs.children[0].value, "or");
}

#[test]
fn and_binds_tighter_than_or() {
    let ast = parse_strict("r: a or b and c\n").expect("parses");
    let rhs = &ast.children[0].children[0];
    assert_eq!(rhs.kind, NodeKind::BinaryOp);
    assert_eq!(rhs.value, "or");
    assert_eq!(rhs.children[1].kind, NodeKind::BinaryOp);
    assert_eq!(rhs.children[1].value, "and");
}

#[test]
fn function_declaration_with_defaulted_params() {
    let src = "add :: |a: int, b: int = 1| int:\n    return a + b\n";
    let ast = parse_strict(src).expect("parses");
    let func = &ast.children[0];
    assert_eq!(func.kind, NodeKind::Function);
    assert_eq!(func.value, "add");
    assert_eq!(func.data_type.as_deref(), Some("int"));
    let params = &func.children[0];
    assert_eq!(params.children.len(), 2);
    assert!(params.children[0].default_value.is_none());
    assert!(params.children[1].default_value.is_some());
}
