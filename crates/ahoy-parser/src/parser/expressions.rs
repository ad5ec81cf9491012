//! Expression layer (§4.5, §4.6): a ten-level precedence cascade from
//! ternary down to primary, with postfix chaining for access/call/member
//! forms layered directly on top of primary.

use ahoy_common::token::TokenKind;

use crate::ast::{Node, NodeKind};
use crate::error::Diagnostic;

use super::special_forms;
use super::Parser;

/// Entry point used by statement parsers: the full cascade starting at
/// ternary, the loosest level.
pub(crate) fn parse_expression(p: &mut Parser) -> Result<Node, Diagnostic> {
    parse_ternary(p)
}

/// `COND ?? THEN : ELSE` (§4.5 level 1). `??` is already its own token
/// from the lexer, so no lookahead is needed to tell it apart from a
/// bare `?` (which never reaches the parser).
fn parse_ternary(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    let cond = parse_or(p)?;
    if p.eat(TokenKind::QQ) {
        let then_branch = parse_expression(p)?;
        p.expect(TokenKind::Colon, "expected ':' in ternary expression")?;
        let else_branch = parse_expression(p)?;
        return Ok(
            Node::new(NodeKind::Ternary, line).with_children(vec![cond, then_branch, else_branch])
        );
    }
    Ok(cond)
}

fn parse_or(p: &mut Parser) -> Result<Node, Diagnostic> {
    let mut left = parse_and(p)?;
    while p.at(TokenKind::WordOr) {
        let line = p.current_line();
        let op = p.advance();
        let right = parse_and(p)?;
        left = Node::with_value(NodeKind::BinaryOp, op.lexeme, line).with_children(vec![left, right]);
    }
    Ok(left)
}

fn parse_and(p: &mut Parser) -> Result<Node, Diagnostic> {
    let mut left = parse_equality(p)?;
    while p.at(TokenKind::WordAnd) {
        let line = p.current_line();
        let op = p.advance();
        let right = parse_equality(p)?;
        left = Node::with_value(NodeKind::BinaryOp, op.lexeme, line).with_children(vec![left, right]);
    }
    Ok(left)
}

fn parse_equality(p: &mut Parser) -> Result<Node, Diagnostic> {
    let mut left = parse_relational(p)?;
    while p.at(TokenKind::WordIs) {
        let line = p.current_line();
        let op = p.advance();
        let right = parse_relational(p)?;
        left = Node::with_value(NodeKind::BinaryOp, op.lexeme, line).with_children(vec![left, right]);
    }
    Ok(left)
}

fn parse_relational(p: &mut Parser) -> Result<Node, Diagnostic> {
    let mut left = parse_additive(p)?;
    loop {
        if !matches!(
            p.kind(),
            TokenKind::LAngle
                | TokenKind::RAngle
                | TokenKind::LtEq
                | TokenKind::GtEq
                | TokenKind::WordGreaterThan
                | TokenKind::WordLessThan
        ) {
            break;
        }
        let line = p.current_line();
        let op = p.advance();
        let right = parse_additive(p)?;
        left = Node::with_value(NodeKind::BinaryOp, op.lexeme, line).with_children(vec![left, right]);
    }
    Ok(left)
}

/// Additive level (§4.5 level 6). This is also the entry point used
/// directly by pipe-call argument parsing (§4.6, §9): arguments never
/// climb past this level, so a bare `|` can never be mistaken for an
/// operator Ahoy doesn't have.
pub(crate) fn parse_additive(p: &mut Parser) -> Result<Node, Diagnostic> {
    let mut left = parse_multiplicative(p)?;
    while matches!(
        p.kind(),
        TokenKind::Plus | TokenKind::Minus | TokenKind::WordPlus | TokenKind::WordMinus
    ) {
        let line = p.current_line();
        let op = p.advance();
        let right = parse_multiplicative(p)?;
        left = Node::with_value(NodeKind::BinaryOp, op.lexeme, line).with_children(vec![left, right]);
    }
    Ok(left)
}

fn parse_multiplicative(p: &mut Parser) -> Result<Node, Diagnostic> {
    let mut left = parse_unary(p)?;
    while matches!(
        p.kind(),
        TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::WordTimes
            | TokenKind::WordDiv
            | TokenKind::WordMod
    ) {
        let line = p.current_line();
        let op = p.advance();
        let right = parse_unary(p)?;
        left = Node::with_value(NodeKind::BinaryOp, op.lexeme, line).with_children(vec![left, right]);
    }
    Ok(left)
}

/// Unary prefix (§4.5 level 8): `not` and unary `-`, right-recursive.
fn parse_unary(p: &mut Parser) -> Result<Node, Diagnostic> {
    if matches!(p.kind(), TokenKind::WordNot | TokenKind::Minus) {
        let line = p.current_line();
        let op = p.advance();
        let operand = parse_unary(p)?;
        return Ok(Node::with_value(NodeKind::UnaryOp, op.lexeme, line).with_children(vec![operand]));
    }
    parse_primary_chain(p)
}

fn parse_primary_chain(p: &mut Parser) -> Result<Node, Diagnostic> {
    let base = parse_primary(p)?;
    parse_postfix(p, base)
}

/// Postfix access/call/member chain (§4.6). Runs on top of any primary:
/// identifiers, literals, and parenthesized expressions may all be
/// chained (`[1,2,3].map|...|.sum||`).
pub(crate) fn parse_postfix(p: &mut Parser, mut base: Node) -> Result<Node, Diagnostic> {
    loop {
        match p.kind() {
            TokenKind::LBracket => {
                let line = p.current_line();
                p.advance();
                let index = parse_expression(p)?;
                p.expect(TokenKind::RBracket, "expected ']' after array index")?;
                base = Node::new(NodeKind::ArrayAccess, line).with_children(vec![base, index]);
            }
            TokenKind::LBrace => {
                let line = p.current_line();
                p.advance();
                let key = parse_expression(p)?;
                p.expect(TokenKind::RBrace, "expected '}' after dict key")?;
                base = Node::new(NodeKind::DictAccess, line).with_children(vec![base, key]);
            }
            TokenKind::Dot => {
                p.advance();
                let line = p.current_line();
                let name_tok = p.expect(TokenKind::Identifier, "expected member name after '.'")?;
                if p.at(TokenKind::Pipe) {
                    let args = special_forms::parse_call_args(p)?;
                    let args_block = Node::new(NodeKind::Block, line).with_children(args);
                    base = Node::with_value(NodeKind::MethodCall, name_tok.lexeme, line)
                        .with_children(vec![base, args_block]);
                } else {
                    base = Node::with_value(NodeKind::MemberAccess, name_tok.lexeme, line)
                        .with_children(vec![base]);
                }
            }
            TokenKind::Pipe if !p.in_function_call() && is_bare_identifier(&base) => {
                let args = special_forms::parse_call_args(p)?;
                let line = base.line;
                base = Node::with_value(NodeKind::Call, base.value.clone(), line).with_children(args);
            }
            _ => break,
        }
    }
    Ok(base)
}

fn is_bare_identifier(node: &Node) -> bool {
    node.kind == NodeKind::Identifier && node.children.is_empty()
}

fn parse_primary(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    match p.kind() {
        TokenKind::Number => {
            let tok = p.advance();
            let dtype = if tok.lexeme.contains('.') { "float" } else { "int" };
            Ok(Node::with_value(NodeKind::Number, tok.lexeme, line).with_data_type(dtype))
        }
        TokenKind::StringLit => {
            let tok = p.advance();
            Ok(Node::with_value(NodeKind::StringLit, tok.lexeme, line).with_data_type("string"))
        }
        TokenKind::FString => {
            let tok = p.advance();
            Ok(Node::with_value(NodeKind::FString, tok.lexeme, line).with_data_type("fstring"))
        }
        TokenKind::CharLit => {
            let tok = p.advance();
            Ok(Node::with_value(NodeKind::CharLit, tok.lexeme, line).with_data_type("char"))
        }
        TokenKind::True | TokenKind::False => {
            let tok = p.advance();
            Ok(Node::with_value(NodeKind::Boolean, tok.lexeme, line).with_data_type("bool"))
        }
        TokenKind::Identifier => {
            let tok = p.advance();
            Ok(Node::with_value(NodeKind::Identifier, tok.lexeme, line))
        }
        TokenKind::LParen => {
            p.advance();
            let inner = parse_expression(p)?;
            p.expect(TokenKind::RParen, "expected ')' to close parenthesized expression")?;
            Ok(inner)
        }
        TokenKind::LBracket => parse_array_literal(p),
        TokenKind::LBrace => parse_dict_literal(p),
        TokenKind::LAngle => parse_legacy_angle_literal(p),
        _ => p.recover("expected an expression"),
    }
}

fn parse_array_literal(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    p.advance(); // '['
    let mut items = Vec::new();
    if !p.at(TokenKind::RBracket) {
        loop {
            items.push(parse_expression(p)?);
            if p.eat(TokenKind::Comma) {
                continue;
            }
            break;
        }
    }
    p.expect(TokenKind::RBracket, "expected ']' to close array literal")?;
    Ok(Node::new(NodeKind::ArrayLiteral, line).with_children(items))
}

/// `< a, b, … >` — the legacy array-literal spelling (§4.6). Only
/// recognized as a standalone primary, never as a postfix chained off an
/// identifier: chaining it there would collide with `<` as the
/// relational operator, and ordinary comparisons are far more common
/// than this legacy spelling (see DESIGN.md).
fn parse_legacy_angle_literal(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    p.advance(); // '<'
    let mut items = Vec::new();
    if !p.at(TokenKind::RAngle) {
        loop {
            items.push(parse_expression(p)?);
            if p.eat(TokenKind::Comma) {
                continue;
            }
            break;
        }
    }
    p.expect(TokenKind::RAngle, "expected '>' to close legacy array literal")?;
    Ok(Node::new(NodeKind::ArrayLiteral, line).with_children(items))
}

fn parse_dict_literal(p: &mut Parser) -> Result<Node, Diagnostic> {
    let line = p.current_line();
    p.advance(); // '{'
    let mut pairs = Vec::new();
    if !p.at(TokenKind::RBrace) {
        loop {
            let key = parse_expression(p)?;
            p.expect(TokenKind::Colon, "expected ':' between dict key and value")?;
            let value = parse_expression(p)?;
            pairs.push(key);
            pairs.push(value);
            if p.eat(TokenKind::Comma) {
                continue;
            }
            break;
        }
    }
    p.expect(TokenKind::RBrace, "expected '}' to close dict literal")?;
    Ok(Node::new(NodeKind::DictLiteral, line).with_children(pairs))
}
