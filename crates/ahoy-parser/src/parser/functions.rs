//! Function declarations, primary (`::`) and legacy (`func`) forms
//! (§4.4).

use ahoy_common::token::{Token, TokenKind};

use crate::ast::{Node, NodeKind};
use crate::error::Diagnostic;

use super::expressions::parse_expression;
use super::Parser;

/// `NAME :: | PARAMS | [RETURN_TYPES] : BODY`. The caller has already
/// consumed `NAME` and `::` and confirmed a `|` follows.
pub(crate) fn parse_function_decl(p: &mut Parser, name: Token) -> Result<Node, Diagnostic> {
    let line = name.line;
    let params = parse_params(p)?;
    let return_type = parse_return_types(p);
    p.expect(TokenKind::Colon, "expected ':' before function body")?;
    let body = p.parse_body()?;
    let mut node = Node::with_value(NodeKind::Function, name.lexeme, line).with_children(vec![params, body]);
    if let Some(rt) = return_type {
        node = node.with_data_type(rt);
    }
    Ok(node)
}

/// `func NAME (|params|)? [-> TYPE] (then|do) BODY` (legacy form, §4.4).
pub(crate) fn parse_legacy_func(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    p.advance(); // 'func'
    let name = p.expect(TokenKind::Identifier, "expected a function name after 'func'")?;
    let params = if p.at(TokenKind::Pipe) {
        parse_params(p)?
    } else {
        Node::new(NodeKind::Block, line)
    };
    let mut return_type = None;
    if p.eat(TokenKind::Minus) && p.eat(TokenKind::RAngle) {
        return_type = Some(p.parse_type_name());
    }
    if !(p.eat(TokenKind::Then) || p.eat(TokenKind::Do)) {
        p.expect(TokenKind::Then, "expected 'then' or 'do'")?;
    }
    let body = p.parse_body()?;
    let mut node = Node::with_value(NodeKind::Function, name.lexeme, line).with_children(vec![params, body]);
    if let Some(rt) = return_type {
        node = node.with_data_type(rt);
    }
    Ok(node)
}

/// Comma-separated `IDENT [: TYPE] [= DEFAULT]` parameter list between a
/// matching pair of `|`. A parameter with no explicit type gets
/// `"generic"`; once a parameter carries a default, every later
/// parameter must also carry one (§4.4), checked here and reported as a
/// recoverable error rather than aborting the whole declaration.
fn parse_params(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    p.expect(TokenKind::Pipe, "expected '|' to open parameter list")?;
    let mut params = Vec::new();
    let mut seen_default = false;
    if !p.at(TokenKind::Pipe) {
        loop {
            let name = p.expect(TokenKind::Identifier, "expected a parameter name")?;
            let mut node = Node::with_value(NodeKind::Identifier, name.lexeme, name.line);
            if p.eat(TokenKind::Colon) {
                node = node.with_data_type(p.parse_type_name());
            } else {
                node = node.with_data_type("generic");
            }
            if p.eat(TokenKind::Eq) {
                let default = parse_expression(p)?;
                node = node.with_default(default);
                seen_default = true;
            } else if seen_default {
                p.push_note_here(
                    "parameter without a default follows a defaulted parameter",
                );
            }
            params.push(node);
            if p.eat(TokenKind::Comma) {
                continue;
            }
            break;
        }
    }
    p.expect(TokenKind::Pipe, "expected closing '|' after parameter list")?;
    Ok(Node::new(NodeKind::Block, line).with_children(params))
}

/// Zero, one, or several comma-separated return type names, or the
/// keywords `infer`/`void`. Multiple types are comma-joined into a
/// single string for `data_type` (§4.4). Returns `None` when no return
/// type is present at all (the following token is the body-opening
/// `:`).
fn parse_return_types(p: &mut Parser) -> Option<String> {
    if p.at(TokenKind::Colon) {
        return None;
    }
    if p.eat(TokenKind::Infer) {
        return Some("infer".to_string());
    }
    if p.eat(TokenKind::Void) {
        return Some("void".to_string());
    }
    let mut names = vec![p.parse_type_name()];
    while p.eat(TokenKind::Comma) {
        names.push(p.parse_type_name());
    }
    Some(names.join(","))
}
