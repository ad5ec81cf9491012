//! Conditionals, switch, and the five loop forms (§4.3).

use ahoy_common::token::TokenKind;

use crate::ast::{Node, NodeKind};
use crate::error::Diagnostic;

use super::expressions::parse_expression;
use super::Parser;

/// `if EXPR (then|do) BODY (anif EXPR (then|do) BODY)* (else BODY)?`
/// Children are the alternating `(cond, block)` pairs followed by an
/// optional trailing else-block (§3, §8 S5).
pub(crate) fn parse_if(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    p.advance(); // 'if'
    let mut children = Vec::new();
    children.push(parse_expression(p)?);
    expect_then_or_do(p)?;
    children.push(p.parse_body()?);
    while p.at(TokenKind::AnIf) || p.at(TokenKind::ElseIf) {
        p.advance();
        children.push(parse_expression(p)?);
        expect_then_or_do(p)?;
        children.push(p.parse_body()?);
    }
    if p.eat(TokenKind::Else) {
        children.push(p.parse_body()?);
    }
    Ok(Node::new(NodeKind::If, line).with_children(children))
}

fn expect_then_or_do(p: &mut Parser) -> Result<(), Diagnostic> {
    if p.eat(TokenKind::Then) || p.eat(TokenKind::Do) {
        return Ok(());
    }
    // Per §4.7/S8: recorded as a missing-keyword error but the body is
    // still parsed on the token that follows, so the resulting `if` node
    // keeps a correctly-shaped block even without `then`/`do` present.
    p.expect(TokenKind::Then, "expected 'then' or 'do'")?;
    Ok(())
}

/// `switch EXPR (on|then|:)` then an indented body of cases (§4.3).
pub(crate) fn parse_switch(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    p.advance(); // 'switch'
    let scrutinee = parse_expression(p)?;
    if !(p.eat(TokenKind::On) || p.eat(TokenKind::Then) || p.eat(TokenKind::Colon)) {
        p.expect(TokenKind::Colon, "expected 'on', 'then', or ':' after switch expression")?;
    }
    let mut children = vec![scrutinee];
    p.expect(TokenKind::Newline, "expected a newline before switch body")?;
    p.expect(TokenKind::Indent, "expected an indented switch body")?;
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
            _ => children.push(parse_case(p)?),
        }
    }
    Ok(Node::new(NodeKind::Switch, line).with_children(children))
}

fn parse_case(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    let mut values = vec![parse_case_value(p)?];
    let mut is_range = false;
    if p.eat(TokenKind::To) {
        is_range = true;
        values.push(parse_case_value(p)?);
    } else {
        while p.eat(TokenKind::Comma) || p.eat(TokenKind::WordOr) {
            values.push(parse_case_value(p)?);
        }
    }
    p.expect(TokenKind::Colon, "expected ':' after case value")?;
    let body = p.parse_body()?;
    let selector = if is_range {
        Node::new(NodeKind::CaseRange, line).with_children(values)
    } else if values.len() > 1 {
        Node::new(NodeKind::CaseList, line).with_children(values)
    } else {
        values.into_iter().next().expect("at least one case value")
    };
    Ok(Node::new(NodeKind::Case, line).with_children(vec![selector, body]))
}

fn parse_case_value(p: &mut Parser) -> Result<Node, Diagnostic> {
    if p.at(TokenKind::Identifier) && p.current_lexeme() == "_" {
        let line = p.current_line();
        p.advance();
        return Ok(Node::with_value(NodeKind::Identifier, "_", line));
    }
    parse_expression(p)
}

/// Dispatches all five loop grammar forms after `loop` has been seen
/// (§4.3). The dict-vs-array branching (comma *after* the leading
/// identifier, before `in`) mirrors the source's own ordering, per the
/// spec's open question on preserving that order.
pub(crate) fn parse_loop(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    p.advance(); // 'loop'

    let mut loop_var: Option<String> = None;
    if p.at(TokenKind::Identifier) {
        loop_var = Some(p.advance().lexeme);
    }

    if loop_var.is_some() && p.eat(TokenKind::Comma) {
        let value_var = p.expect(TokenKind::Identifier, "expected a value identifier after ','")?;
        p.expect(TokenKind::In, "expected 'in' in dict loop")?;
        let collection = parse_expression(p)?;
        p.expect(TokenKind::Do, "expected 'do' before dict loop body")?;
        let body = p.parse_body()?;
        let key = Node::with_value(NodeKind::Identifier, loop_var.unwrap(), line);
        let value = Node::with_value(NodeKind::Identifier, value_var.lexeme, line);
        return Ok(Node::new(NodeKind::ForInDictLoop, line).with_children(vec![key, value, collection, body]));
    }

    if p.at(TokenKind::Colon) {
        // The colon belongs only to `from:`; a bare colon right after the
        // loop variable is reported but does not abort the parse.
        p.push_note_here("bare ':' after loop variable is ambiguous with 'from:'");
        p.advance();
    }

    if p.eat(TokenKind::From) {
        p.expect(TokenKind::Colon, "expected ':' after 'from'")?;
        let start = parse_expression(p)?;
        p.expect(TokenKind::To, "expected 'to' in range loop")?;
        let end = parse_expression(p)?;
        p.expect(TokenKind::Do, "expected 'do' before loop body")?;
        let body = p.parse_body()?;
        let mut children = Vec::new();
        if let Some(name) = loop_var {
            children.push(Node::with_value(NodeKind::Identifier, name, line));
        }
        children.push(start);
        children.push(end);
        children.push(body);
        return Ok(Node::new(NodeKind::ForRangeLoop, line).with_children(children));
    }

    if p.eat(TokenKind::Till) {
        let cond = parse_expression(p)?;
        p.expect(TokenKind::Do, "expected 'do' before loop body")?;
        let body = p.parse_body()?;
        let mut children = Vec::new();
        if let Some(name) = loop_var {
            children.push(Node::with_value(NodeKind::Identifier, name, line));
        }
        children.push(cond);
        children.push(body);
        return Ok(Node::new(NodeKind::WhileLoop, line).with_children(children));
    }

    if p.eat(TokenKind::In) {
        let elem = Node::with_value(NodeKind::Identifier, loop_var.unwrap_or_default(), line);
        let collection = parse_expression(p)?;
        p.expect(TokenKind::Do, "expected 'do' before loop body")?;
        let body = p.parse_body()?;
        return Ok(Node::new(NodeKind::ForInArrayLoop, line).with_children(vec![elem, collection, body]));
    }

    p.expect(TokenKind::Do, "expected 'from', 'till', 'in', or 'do' in loop")?;
    let body = p.parse_body()?;
    let mut children = Vec::new();
    if let Some(name) = loop_var {
        children.push(Node::with_value(NodeKind::Identifier, name, line));
    }
    children.push(body);
    Ok(Node::new(NodeKind::ForCountLoop, line).with_children(children))
}
