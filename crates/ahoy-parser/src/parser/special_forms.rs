//! Pipe-call argument lists and the lambda form nested inside them
//! (§4.6, §9).

use ahoy_common::token::TokenKind;

use crate::ast::{Node, NodeKind};
use crate::error::Diagnostic;

use super::expressions;
use super::Parser;

/// Parses `| arg, arg, … |`, setting the `in_function_call` guard for
/// the duration so a bare identifier immediately followed by the
/// matching closing `|` is never mistaken for the start of *another*
/// call (see the guard's doc comment in `mod.rs`).
pub(crate) fn parse_call_args(p: &mut Parser) -> Result<Vec<Node>, Diagnostic> {
    p.expect(TokenKind::Pipe, "expected '|' to open argument list")?;
    let previous = p.enter_function_call();
    let mut args = Vec::new();
    if !p.at(TokenKind::Pipe) {
        loop {
            args.push(parse_argument(p)?);
            if p.eat(TokenKind::Comma) {
                continue;
            }
            break;
        }
    }
    p.leave_function_call(previous);
    p.expect(TokenKind::Pipe, "expected closing '|'")?;
    Ok(args)
}

/// One argument: either a lambda (`IDENT : EXPR`, detected with a single
/// token of lookahead) or a plain additive-precedence expression.
fn parse_argument(p: &mut Parser) -> Result<Node, Diagnostic> {
    if p.at(TokenKind::Identifier) && p.peek_kind(1) == TokenKind::Colon {
        let name_tok = p.advance();
        p.advance(); // ':'
        let body = expressions::parse_additive(p)?;
        return Ok(Node::with_value(NodeKind::Lambda, name_tok.lexeme, name_tok.line)
            .with_children(vec![body]));
    }
    expressions::parse_additive(p)
}
