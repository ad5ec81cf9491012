//! Higher-level lexer scenarios, separate from the unit tests living next
//! to the scanner implementation.

use ahoy_common::token::TokenKind;
use ahoy_lexer::Lexer;

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::tokenize(source).into_iter().map(|t| t.kind).collect()
}

#[test]
fn pipe_call_with_multiple_args() {
    // S3 from the front-end's testable-properties scenarios.
    use TokenKind::*;
    assert_eq!(
        kinds(r#"print|"hi %d", 7|"#),
        vec![Print, Pipe, StringLit, Comma, Number, Pipe, Newline, Eof]
    );
}

#[test]
fn precedence_relevant_tokens_for_mixed_expression() {
    // S4: `r: 1 + 2 * 3` -- lexer just needs to hand the parser the right
    // tokens in order; precedence itself is a parser concern.
    use TokenKind::*;
    assert_eq!(
        kinds("r: 1 + 2 * 3"),
        vec![Identifier, Colon, Number, Plus, Number, Star, Number, Newline, Eof]
    );
}

#[test]
fn loop_over_dict_keyword_sequence() {
    // S7: `loop k, v in cfg do`
    use TokenKind::*;
    assert_eq!(
        kinds("loop k, v in cfg do"),
        vec![Loop, Identifier, Comma, Identifier, In, Identifier, Do, Newline, Eof]
    );
}

#[test]
fn if_anif_else_multiline_produces_balanced_indentation() {
    let source = "if x is 1 then\n    a: 1\nanif x is 2 then\n    a: 2\nelse\n    a: 3\n";
    let tokens = Lexer::tokenize(source);
    let indents = tokens.iter().filter(|t| t.kind == TokenKind::Indent).count();
    let dedents = tokens.iter().filter(|t| t.kind == TokenKind::Dedent).count();
    assert_eq!(indents, dedents);
    assert_eq!(indents, 3);
}

#[test]
fn method_chain_with_lambda_tokens() {
    // S6: `r: [1,2,3].map|x: x + 1|.sum||`
    use TokenKind::*;
    assert_eq!(
        kinds("r: [1,2,3].map|x: x + 1|.sum||"),
        vec![
            Identifier, Colon, LBracket, Number, Comma, Number, Comma, Number, RBracket,
            Dot, Identifier, Pipe, Identifier, Colon, Identifier, Plus, Number, Pipe,
            Dot, Identifier, Pipe, Pipe, Newline, Eof,
        ]
    );
}
