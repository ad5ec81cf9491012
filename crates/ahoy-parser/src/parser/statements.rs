//! Top-level loop and statement dispatch (§4.2).
//!
//! Every statement form that isn't control flow or a function/loop lives
//! here: declarations (`program`, `enum`, `struct`, `import`), the
//! `when` compile-time block, the `print`/`ahoy` shorthand, `return`,
//! `halt`/`next`, `assert`/`defer`, tuple assignment, plain assignment,
//! constant declaration, and the expression-statement fallback.

use ahoy_common::token::{Token, TokenKind};

use crate::ast::{Node, NodeKind};
use crate::error::Diagnostic;

use super::control_flow;
use super::expressions::{self, parse_expression};
use super::functions;
use super::special_forms;
use super::Parser;

/// `program → statement*` (§4.2 "Top-level loop"). Skips stray
/// `NEWLINE`/`SEMICOLON`/`DEDENT` between statements, consumes a trailing
/// `SEMICOLON` to allow another statement on the same line, and forces
/// progress if a statement parse somehow consumed nothing.
pub(crate) fn parse_program(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    let mut children = Vec::new();
    loop {
        p.skip_top_level_noise();
        if p.at_eof() {
            break;
        }
        let before = p.position();
        let stmt = parse_statement(p)?;
        children.push(stmt);
        p.eat(TokenKind::Semicolon);
        if p.position() == before {
            p.force_advance();
        }
    }
    Ok(Node::new(NodeKind::Program, line).with_children(children))
}

/// Dispatch on the leading token of a statement (§4.2).
pub(crate) fn parse_statement(p: &mut Parser) -> Result<Node, Diagnostic> {
    match p.kind() {
        TokenKind::Program => parse_program_decl(p),
        TokenKind::Enum => parse_enum_decl(p),
        TokenKind::Struct => parse_struct_decl(p),
        TokenKind::Func => functions::parse_legacy_func(p),
        TokenKind::If => control_flow::parse_if(p),
        TokenKind::Switch => control_flow::parse_switch(p),
        TokenKind::Loop => control_flow::parse_loop(p),
        TokenKind::When => parse_when(p),
        TokenKind::Ahoy | TokenKind::Print => parse_print_shorthand(p),
        TokenKind::Return => parse_return(p),
        TokenKind::Halt => {
            let line = p.current_line();
            p.advance();
            Ok(Node::new(NodeKind::Halt, line))
        }
        TokenKind::Next => {
            let line = p.current_line();
            p.advance();
            Ok(Node::new(NodeKind::Next, line))
        }
        TokenKind::Assert => parse_assert(p),
        TokenKind::Defer => parse_defer(p),
        TokenKind::Import => parse_import(p),
        TokenKind::Identifier if p.peek_kind(1) == TokenKind::ColonColon => {
            let name = p.advance();
            p.advance(); // '::'
            if p.at(TokenKind::Pipe) {
                functions::parse_function_decl(p, name)
            } else {
                parse_constant_declaration(p, name)
            }
        }
        TokenKind::Identifier if p.peek_kind(1) == TokenKind::Comma => parse_tuple_assignment(p),
        TokenKind::Identifier if p.peek_kind(1) == TokenKind::Colon => parse_variable_assignment(p),
        _ => parse_expression_statement(p),
    }
}

/// `program NAME` — captures the program/package name (§4.2).
fn parse_program_decl(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    p.advance(); // 'program'
    let name = p.expect(TokenKind::Identifier, "expected a program name after 'program'")?;
    Ok(Node::with_value(NodeKind::ProgramDecl, name.lexeme, line))
}

/// `enum NAME :` then an indented list of `IDENTIFIER` members (§4.2).
fn parse_enum_decl(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    p.advance(); // 'enum'
    let name = p.expect(TokenKind::Identifier, "expected an enum name")?;
    p.expect(TokenKind::Colon, "expected ':' after enum name")?;
    p.expect(TokenKind::Newline, "expected a newline before enum body")?;
    p.expect(TokenKind::Indent, "expected an indented enum body")?;
    let mut members = Vec::new();
    loop {
        match p.kind() {
            TokenKind::Dedent => {
                p.advance();
                break;
            }
            TokenKind::Eof | TokenKind::End => {
                if p.at(TokenKind::End) {
                    p.advance();
                }
                break;
            }
            TokenKind::Newline | TokenKind::Semicolon => {
                p.advance();
            }
            _ => {
                let member = p.expect(TokenKind::Identifier, "expected an enum member name")?;
                members.push(Node::with_value(NodeKind::Identifier, member.lexeme, member.line));
            }
        }
    }
    Ok(Node::with_value(NodeKind::EnumDecl, name.lexeme, line).with_children(members))
}

/// `struct NAME :` then an indented list of `field : TYPE` lines and
/// nested `type NAME :` sub-blocks (§4.2, §3 child conventions).
fn parse_struct_decl(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    p.advance(); // 'struct'
    let name = p.expect(TokenKind::Identifier, "expected a struct name")?;
    p.expect(TokenKind::Colon, "expected ':' after struct name")?;
    p.expect(TokenKind::Newline, "expected a newline before struct body")?;
    p.expect(TokenKind::Indent, "expected an indented struct body")?;
    let mut children = Vec::new();
    loop {
        match p.kind() {
            TokenKind::Dedent => {
                p.advance();
                break;
            }
            TokenKind::Eof | TokenKind::End => {
                if p.at(TokenKind::End) {
                    p.advance();
                }
                break;
            }
            TokenKind::Newline | TokenKind::Semicolon => {
                p.advance();
            }
            TokenKind::TypeKw => children.push(parse_nested_type(p)?),
            _ => children.push(parse_struct_field(p)?),
        }
    }
    Ok(Node::with_value(NodeKind::StructDecl, name.lexeme, line).with_children(children))
}

/// `field : TYPE` — one struct field, surfaced as an `identifier` node
/// with `data_type` set (§3).
fn parse_struct_field(p: &mut Parser) -> Result<Node, Diagnostic> {
    let field = p.expect(TokenKind::Identifier, "expected a field name")?;
    p.expect(TokenKind::Colon, "expected ':' after field name")?;
    let ty = p.parse_type_name();
    Ok(Node::with_value(NodeKind::Identifier, field.lexeme, field.line).with_data_type(ty))
}

/// `type NAME :` nested inside a struct body, with its own indented
/// field list (§3: "nested `type` nodes").
fn parse_nested_type(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    p.advance(); // 'type'
    let name = p.expect(TokenKind::Identifier, "expected a nested type name")?;
    p.expect(TokenKind::Colon, "expected ':' after nested type name")?;
    p.expect(TokenKind::Newline, "expected a newline before nested type body")?;
    p.expect(TokenKind::Indent, "expected an indented nested type body")?;
    let mut fields = Vec::new();
    loop {
        match p.kind() {
            TokenKind::Dedent => {
                p.advance();
                break;
            }
            TokenKind::Eof | TokenKind::End => {
                if p.at(TokenKind::End) {
                    p.advance();
                }
                break;
            }
            TokenKind::Newline | TokenKind::Semicolon => {
                p.advance();
            }
            _ => fields.push(parse_struct_field(p)?),
        }
    }
    Ok(Node::with_value(NodeKind::TypeNode, name.lexeme, line).with_children(fields))
}

/// `when IDENT` then an indented (or inline) body — a compile-time
/// conditional block (§4.2).
fn parse_when(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    p.advance(); // 'when'
    let cond = p.expect(TokenKind::Identifier, "expected an identifier condition after 'when'")?;
    let body = p.parse_body()?;
    Ok(Node::with_value(NodeKind::When, cond.lexeme, line).with_children(vec![body]))
}

/// `ahoy`/`print` shorthand, desugaring to a `call` whose callee is
/// `print` (§4.2). `print` and `ahoy` are keywords, not identifiers, so
/// they never reach the ordinary `IDENT | ARGS |` postfix-chain rule
/// (§4.6) -- this is the statement dispatcher's special case for them.
/// The argument list uses the same pipe-delimited call syntax as any
/// other call (§8 S3); a bare `print`/`ahoy` with no `|` takes no
/// arguments.
fn parse_print_shorthand(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    p.advance(); // 'ahoy' | 'print'
    let args = if p.at(TokenKind::Pipe) {
        special_forms::parse_call_args(p)?
    } else {
        Vec::new()
    };
    Ok(Node::with_value(NodeKind::Call, "print", line).with_children(args))
}

/// `return [EXPR]` (§4.2).
fn parse_return(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    p.advance(); // 'return'
    let mut children = Vec::new();
    if !at_statement_end(p) {
        children.push(parse_expression(p)?);
    }
    Ok(Node::new(NodeKind::Return, line).with_children(children))
}

/// `assert EXPR` (§4.2).
fn parse_assert(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    p.advance(); // 'assert'
    let expr = parse_expression(p)?;
    Ok(Node::new(NodeKind::Assert, line).with_children(vec![expr]))
}

/// `defer EXPR` (§4.2).
fn parse_defer(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    p.advance(); // 'defer'
    let expr = parse_expression(p)?;
    Ok(Node::new(NodeKind::Defer, line).with_children(vec![expr]))
}

/// `import [ident] "path"` (§4.2): `value` = path, `data_type` =
/// namespace (empty string if unnamed).
fn parse_import(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    p.advance(); // 'import'
    let namespace = if p.at(TokenKind::Identifier) {
        p.advance().lexeme
    } else {
        String::new()
    };
    let path = p.expect(TokenKind::StringLit, "expected a string path after 'import'")?;
    Ok(Node::with_value(NodeKind::Import, path.lexeme, line).with_data_type(namespace))
}

/// `NAME :: [TYPE =] EXPR` (§4.4). The caller has already consumed `NAME`
/// and `::` and confirmed no `|` follows (that would make it a function).
fn parse_constant_declaration(p: &mut Parser, name: Token) -> Result<Node, Diagnostic> {
    let line = name.line;
    let data_type = if p.at_type_then_eq() {
        let ty = p.parse_type_name();
        p.expect(TokenKind::Eq, "expected '=' after type in constant declaration")?;
        ty
    } else {
        String::new()
    };
    let value = parse_expression(p)?;
    Ok(Node::with_value(NodeKind::ConstantDeclaration, name.lexeme, line)
        .with_children(vec![value])
        .with_data_type(data_type))
}

/// `NAME : [TYPE =] EXPR` (§4.4).
fn parse_variable_assignment(p: &mut Parser) -> Result<Node, Diagnostic> {
    let name = p.advance(); // identifier
    p.advance(); // ':'
    let data_type = if p.at_type_then_eq() {
        let ty = p.parse_type_name();
        p.expect(TokenKind::Eq, "expected '=' after type in variable assignment")?;
        ty
    } else {
        String::new()
    };
    let value = parse_expression(p)?;
    Ok(Node::with_value(NodeKind::Assignment, name.lexeme, name.line)
        .with_children(vec![value])
        .with_data_type(data_type))
}

/// `IDENT, IDENT, … : EXPR, EXPR, …` (§4.2). Each side is a flat `block`
/// of comma-separated positions (§3).
fn parse_tuple_assignment(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    let mut lhs = Vec::new();
    loop {
        let id = p.expect(TokenKind::Identifier, "expected an identifier in tuple assignment")?;
        lhs.push(Node::with_value(NodeKind::Identifier, id.lexeme, id.line));
        if p.eat(TokenKind::Comma) {
            continue;
        }
        break;
    }
    p.expect(TokenKind::Colon, "expected ':' in tuple assignment")?;
    let mut rhs = Vec::new();
    loop {
        rhs.push(parse_expression(p)?);
        if p.eat(TokenKind::Comma) {
            continue;
        }
        break;
    }
    let lhs_block = Node::new(NodeKind::Block, line).with_children(lhs);
    let rhs_block = Node::new(NodeKind::Block, line).with_children(rhs);
    Ok(Node::new(NodeKind::TupleAssignment, line).with_children(vec![lhs_block, rhs_block]))
}

/// Anything that doesn't match a declaration or control-flow form is an
/// expression statement (§4.2 final bullet).
fn parse_expression_statement(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    let expr = expressions::parse_expression(p)?;
    Ok(Node::new(NodeKind::ExpressionStatement, line).with_children(vec![expr]))
}

/// Whether the current token ends a statement without an expression
/// following it (used by `return`/`ahoy`/`print` to detect the
/// argument-less form).
fn at_statement_end(p: &Parser) -> bool {
    matches!(
        p.kind(),
        TokenKind::Newline | TokenKind::Semicolon | TokenKind::Dedent | TokenKind::Eof | TokenKind::End
    )
}

#[cfg(test)]
mod tests {
    use super::super::parse_lint;
    use crate::ast::NodeKind;

    #[test]
    fn simple_assignment_shape() {
        let parse = parse_lint("x: 42");
        assert!(parse.errors.is_empty());
        let stmt = &parse.ast.children[0];
        assert_eq!(stmt.kind, NodeKind::Assignment);
        assert_eq!(stmt.value, "x");
        assert_eq!(stmt.data_type.as_deref(), Some(""));
        assert_eq!(stmt.children[0].value, "42");
    }

    #[test]
    fn typed_constant_shape() {
        let parse = parse_lint("MAX :: int = 100");
        assert!(parse.errors.is_empty());
        let stmt = &parse.ast.children[0];
        assert_eq!(stmt.kind, NodeKind::ConstantDeclaration);
        assert_eq!(stmt.value, "MAX");
        assert_eq!(stmt.data_type.as_deref(), Some("int"));
        assert_eq!(stmt.children[0].value, "100");
    }

    #[test]
    fn tuple_assignment_shape() {
        let parse = parse_lint("a, b: 1, 2");
        assert!(parse.errors.is_empty());
        let stmt = &parse.ast.children[0];
        assert_eq!(stmt.kind, NodeKind::TupleAssignment);
        assert_eq!(stmt.children[0].children.len(), 2);
        assert_eq!(stmt.children[1].children.len(), 2);
    }

    #[test]
    fn print_shorthand_desugars_to_call() {
        let parse = parse_lint(r#"print|"hi %d", 7|"#);
        let stmt = &parse.ast.children[0];
        assert_eq!(stmt.kind, NodeKind::Call);
        assert_eq!(stmt.value, "print");
        assert_eq!(stmt.children.len(), 2);
    }

    #[test]
    fn enum_decl_collects_members() {
        let parse = parse_lint("enum Color:\n    red\n    green\n    blue\n");
        assert!(parse.errors.is_empty());
        let stmt = &parse.ast.children[0];
        assert_eq!(stmt.kind, NodeKind::EnumDecl);
        assert_eq!(stmt.value, "Color");
        assert_eq!(stmt.children.len(), 3);
        assert_eq!(stmt.children[0].value, "red");
    }

    #[test]
    fn struct_decl_collects_fields_and_nested_type() {
        let src = "struct Player:\n    name: string\n    type Stats:\n        hp: int\n";
        let parse = parse_lint(src);
        assert!(parse.errors.is_empty());
        let stmt = &parse.ast.children[0];
        assert_eq!(stmt.kind, NodeKind::StructDecl);
        assert_eq!(stmt.value, "Player");
        assert_eq!(stmt.children[0].data_type.as_deref(), Some("string"));
        assert_eq!(stmt.children[1].kind, NodeKind::TypeNode);
        assert_eq!(stmt.children[1].value, "Stats");
    }

    #[test]
    fn import_with_namespace() {
        let parse = parse_lint(r#"import io "std/io""#);
        let stmt = &parse.ast.children[0];
        assert_eq!(stmt.kind, NodeKind::Import);
        assert_eq!(stmt.value, r#""std/io""#);
        assert_eq!(stmt.data_type.as_deref(), Some("io"));
    }

    #[test]
    fn import_without_namespace() {
        let parse = parse_lint(r#"import "std/io""#);
        let stmt = &parse.ast.children[0];
        assert_eq!(stmt.data_type.as_deref(), Some(""));
    }

    #[test]
    fn halt_and_next_are_bare_markers() {
        let parse = parse_lint("halt\nnext\n");
        assert_eq!(parse.ast.children[0].kind, NodeKind::Halt);
        assert_eq!(parse.ast.children[1].kind, NodeKind::Next);
    }

    #[test]
    fn assert_and_defer_wrap_an_expression() {
        let parse = parse_lint("assert x is 1\ndefer close|f|\n");
        assert_eq!(parse.ast.children[0].kind, NodeKind::Assert);
        assert_eq!(parse.ast.children[0].children[0].kind, NodeKind::BinaryOp);
        assert_eq!(parse.ast.children[1].kind, NodeKind::Defer);
        assert_eq!(parse.ast.children[1].children[0].kind, NodeKind::Call);
    }

    #[test]
    fn program_progress_guard_handles_trailing_garbage() {
        // A lone ':' at top level matches no statement dispatch arm and
        // falls through to the expression layer, which recovers with a
        // placeholder -- the top-level loop must still terminate.
        let parse = parse_lint(":::");
        assert!(!parse.errors.is_empty());
    }
}
