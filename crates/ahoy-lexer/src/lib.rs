//! Ahoy lexer -- indentation-aware tokenizer for the Ahoy language.
//!
//! Scans source line by line (§4.1): each line first has its indentation
//! measured against an indent stack (synthesizing `Indent`/`Dedent`), then
//! its body is scanned for tokens, then a `Newline` is emitted. The lexer
//! never fails; unrecognized characters produce an advisory [`LexNote`]
//! and are otherwise skipped.

mod cursor;

use ahoy_common::token::{keyword_from_str, Token, TokenKind};
use ahoy_common::Position;
use cursor::Cursor;

const TAB_WIDTH: u32 = 2;
const ANCHOR: char = '⚓';

/// An informational note the lexer recorded about unrecognized input.
///
/// These are never fatal (§4.1: "There are no fatal lexer errors") -- they
/// exist purely so a caller can surface "unknown character" diagnostics if
/// it wants to.
#[derive(Debug, Clone, PartialEq)]
pub struct LexNote {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

/// The Ahoy lexer. Converts source text into a token stream ending in `Eof`.
pub struct Lexer {
    tokens: std::vec::IntoIter<Token>,
    notes: Vec<LexNote>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        let (tokens, notes) = scan(source);
        Self {
            tokens: tokens.into_iter(),
            notes,
        }
    }

    /// Tokenize the entire source into a `Vec<Token>`, including the
    /// trailing `Eof`. The common entry point for callers that just want
    /// tokens and don't care about advisory notes.
    pub fn tokenize(source: &str) -> Vec<Token> {
        scan(source).0
    }

    /// Tokenize and also return any advisory notes about unrecognized
    /// characters encountered along the way.
    pub fn tokenize_with_notes(source: &str) -> (Vec<Token>, Vec<LexNote>) {
        scan(source)
    }

    /// Advisory notes accumulated so far.
    pub fn notes(&self) -> &[LexNote] {
        &self.notes
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.tokens.next()
    }
}

fn scan(source: &str) -> (Vec<Token>, Vec<LexNote>) {
    let mut tokens = Vec::new();
    let mut notes = Vec::new();
    let mut indent_stack: Vec<u32> = vec![0];
    let mut line_no: u32 = 0;

    for raw_line in source.split('\n') {
        line_no += 1;
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

        if line.trim().is_empty() {
            continue;
        }

        let (indent_width, indent_bytes) = measure_indent(line);
        let rest = &line[indent_bytes..];
        let start_column = indent_bytes as u32 + 1;

        // A comment-only line carries no structure of its own (§4.1: "emit
        // a NEWLINE and skip to the next line") -- its indentation must not
        // touch the indent stack, or an indented comment would open an
        // `Indent` with no statement inside it to balance against a later
        // `Dedent`.
        if rest.starts_with('?') {
            tokens.push(Token::synthetic(
                TokenKind::Newline,
                Position::new(line_no, start_column + 1),
            ));
            continue;
        }

        adjust_indent(&mut indent_stack, indent_width, line_no, &mut tokens);

        let mut cursor = Cursor::new_at(rest, start_column);
        scan_body(&mut cursor, line_no, &mut tokens, &mut notes);

        tokens.push(Token::synthetic(
            TokenKind::Newline,
            Position::new(line_no, cursor.column()),
        ));
    }

    while indent_stack.len() > 1 {
        indent_stack.pop();
        tokens.push(Token::synthetic(
            TokenKind::Dedent,
            Position::new(line_no + 1, 1),
        ));
    }
    tokens.push(Token::synthetic(
        TokenKind::Eof,
        Position::new(line_no + 1, 1),
    ));

    (tokens, notes)
}

/// Count leading whitespace on `line`, counting a tab as two columns
/// (§4.1/§9). Returns `(indent_width, byte_count)`.
fn measure_indent(line: &str) -> (u32, usize) {
    let mut width = 0u32;
    let mut bytes = 0usize;
    for c in line.chars() {
        match c {
            ' ' => {
                width += 1;
                bytes += 1;
            }
            '\t' => {
                width += TAB_WIDTH;
                bytes += 1;
            }
            _ => break,
        }
    }
    (width, bytes)
}

/// Push `Indent`/`Dedent` synthetics to reconcile the indent stack with a
/// newly measured indent width.
fn adjust_indent(stack: &mut Vec<u32>, width: u32, line_no: u32, tokens: &mut Vec<Token>) {
    let top = *stack.last().expect("indent stack must never be empty");
    if width > top {
        stack.push(width);
        tokens.push(Token::synthetic(TokenKind::Indent, Position::new(line_no, 1)));
    } else if width < top {
        while *stack.last().expect("indent stack must never be empty") > width {
            stack.pop();
            tokens.push(Token::synthetic(TokenKind::Dedent, Position::new(line_no, 1)));
        }
        // A dedent that lands between two previously pushed levels realigns
        // to the new (shallower) level rather than erroring -- the lexer
        // never fails (§4.1). The realignment still needs a matching
        // `Indent` or the stream would carry more `Dedent`s than `Indent`s
        // once this level is unwound later (§3 invariant 2).
        if *stack.last().expect("indent stack must never be empty") < width {
            stack.push(width);
            tokens.push(Token::synthetic(TokenKind::Indent, Position::new(line_no, 1)));
        }
    }
}

fn scan_body(cursor: &mut Cursor<'_>, line: u32, tokens: &mut Vec<Token>, notes: &mut Vec<LexNote>) {
    while let Some(c) = cursor.peek() {
        let col = cursor.column();
        match c {
            ' ' | '\t' => {
                cursor.advance();
            }
            '?' => {
                if cursor.peek_next() == Some('?') {
                    cursor.advance();
                    cursor.advance();
                    tokens.push(Token::new(TokenKind::QQ, "??", line, col));
                } else {
                    // Inline comment: stop scanning the rest of this line.
                    break;
                }
            }
            '0'..='9' => lex_number(cursor, line, tokens),
            '"' => lex_string(cursor, line, tokens, notes, false),
            '\'' => lex_string(cursor, line, tokens, notes, true),
            c if is_ident_start(c) => lex_ident(cursor, line, tokens, notes),
            ':' => lex_two_char(cursor, line, tokens, ':', TokenKind::ColonColon, '=', TokenKind::ColonEq, TokenKind::Colon),
            '<' => lex_lt(cursor, line, tokens),
            '>' => lex_two_char_single(cursor, line, tokens, '>', '=', TokenKind::GtEq, TokenKind::RAngle),
            '+' => lex_two_char_single(cursor, line, tokens, '+', '=', TokenKind::PlusEq, TokenKind::Plus),
            '-' => lex_two_char_single(cursor, line, tokens, '-', '=', TokenKind::MinusEq, TokenKind::Minus),
            '*' => lex_two_char_single(cursor, line, tokens, '*', '=', TokenKind::StarEq, TokenKind::Star),
            '/' => lex_two_char_single(cursor, line, tokens, '/', '=', TokenKind::SlashEq, TokenKind::Slash),
            '%' => lex_two_char_single(cursor, line, tokens, '%', '=', TokenKind::PercentEq, TokenKind::Percent),
            ';' => single(cursor, line, tokens, TokenKind::Semicolon),
            ',' => single(cursor, line, tokens, TokenKind::Comma),
            '.' => single(cursor, line, tokens, TokenKind::Dot),
            '|' => single(cursor, line, tokens, TokenKind::Pipe),
            '(' => single(cursor, line, tokens, TokenKind::LParen),
            ')' => single(cursor, line, tokens, TokenKind::RParen),
            '{' => single(cursor, line, tokens, TokenKind::LBrace),
            '}' => single(cursor, line, tokens, TokenKind::RBrace),
            '[' => single(cursor, line, tokens, TokenKind::LBracket),
            ']' => single(cursor, line, tokens, TokenKind::RBracket),
            '=' => single(cursor, line, tokens, TokenKind::Eq),
            '@' => single(cursor, line, tokens, TokenKind::At),
            '^' => single(cursor, line, tokens, TokenKind::Caret),
            '&' => single(cursor, line, tokens, TokenKind::Amp),
            '$' => lex_end(cursor, line, tokens),
            ANCHOR => {
                cursor.advance();
                tokens.push(Token::new(TokenKind::End, ANCHOR.to_string(), line, col));
            }
            other => {
                cursor.advance();
                notes.push(LexNote {
                    message: format!("unknown character: {other:?}"),
                    line,
                    column: col,
                });
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn single(cursor: &mut Cursor<'_>, line: u32, tokens: &mut Vec<Token>, kind: TokenKind) {
    let col = cursor.column();
    let start = cursor.byte_pos();
    cursor.advance();
    let text = cursor.slice(start, cursor.byte_pos()).to_string();
    tokens.push(Token::new(kind, text, line, col));
}

/// `first` opens the operator; `second` extends it to a two-char form
/// `two_kind`, otherwise it's the bare `one_kind`.
fn lex_two_char_single(
    cursor: &mut Cursor<'_>,
    line: u32,
    tokens: &mut Vec<Token>,
    first: char,
    second: char,
    two_kind: TokenKind,
    one_kind: TokenKind,
) {
    let col = cursor.column();
    let start = cursor.byte_pos();
    cursor.advance(); // consume `first`
    debug_assert_eq!(cursor.slice(start, cursor.byte_pos()).chars().next(), Some(first));
    if cursor.peek() == Some(second) {
        cursor.advance();
        let text = cursor.slice(start, cursor.byte_pos()).to_string();
        tokens.push(Token::new(two_kind, text, line, col));
    } else {
        let text = cursor.slice(start, cursor.byte_pos()).to_string();
        tokens.push(Token::new(one_kind, text, line, col));
    }
}

/// `:` -> `Colon`, `:=` -> `ColonEq`, `::` -> `ColonColon`.
fn lex_two_char(
    cursor: &mut Cursor<'_>,
    line: u32,
    tokens: &mut Vec<Token>,
    double: char,
    double_kind: TokenKind,
    eq: char,
    eq_kind: TokenKind,
    base_kind: TokenKind,
) {
    let col = cursor.column();
    let start = cursor.byte_pos();
    cursor.advance(); // consume ':'
    match cursor.peek() {
        Some(c) if c == double => {
            cursor.advance();
            let text = cursor.slice(start, cursor.byte_pos()).to_string();
            tokens.push(Token::new(double_kind, text, line, col));
        }
        Some(c) if c == eq => {
            cursor.advance();
            let text = cursor.slice(start, cursor.byte_pos()).to_string();
            tokens.push(Token::new(eq_kind, text, line, col));
        }
        _ => {
            let text = cursor.slice(start, cursor.byte_pos()).to_string();
            tokens.push(Token::new(base_kind, text, line, col));
        }
    }
}

/// `<` -> `LAngle`, `<=` -> `LtEq`. (`<` never collapses with `>` in Ahoy;
/// the parser disambiguates angle-bracket access from comparison by
/// position, not the lexer -- §9.)
fn lex_lt(cursor: &mut Cursor<'_>, line: u32, tokens: &mut Vec<Token>) {
    let col = cursor.column();
    let start = cursor.byte_pos();
    cursor.advance();
    if cursor.peek() == Some('=') {
        cursor.advance();
        let text = cursor.slice(start, cursor.byte_pos()).to_string();
        tokens.push(Token::new(TokenKind::LtEq, text, line, col));
    } else {
        let text = cursor.slice(start, cursor.byte_pos()).to_string();
        tokens.push(Token::new(TokenKind::LAngle, text, line, col));
    }
}

fn lex_number(cursor: &mut Cursor<'_>, line: u32, tokens: &mut Vec<Token>) {
    let col = cursor.column();
    let start = cursor.byte_pos();
    cursor.eat_while(|c| c.is_ascii_digit());
    if cursor.peek() == Some('.') && cursor.peek_next().is_some_and(|c| c.is_ascii_digit()) {
        cursor.advance(); // consume '.'
        cursor.eat_while(|c| c.is_ascii_digit());
    }
    let text = cursor.slice(start, cursor.byte_pos()).to_string();
    tokens.push(Token::new(TokenKind::Number, text, line, col));
}

fn lex_ident(cursor: &mut Cursor<'_>, line: u32, tokens: &mut Vec<Token>, notes: &mut Vec<LexNote>) {
    let col = cursor.column();
    let start = cursor.byte_pos();
    cursor.advance();
    cursor.eat_while(is_ident_continue);
    let text = cursor.slice(start, cursor.byte_pos());

    // F-string retraction (§4.1/§9): `f` immediately followed by a quote
    // is not a reference to an identifier named `f`.
    if text == "f" && cursor.peek() == Some('"') {
        lex_string(cursor, line, tokens, notes, false);
        // Rewrite the STRING we just pushed into an F_STRING covering the
        // leading `f` too -- this is the lexer's one back-step (§9).
        let last = tokens.last_mut().expect("lex_string always pushes a token");
        last.kind = TokenKind::FString;
        last.lexeme = format!("f{}", last.lexeme);
        last.column = col;
        return;
    }

    let kind = keyword_from_str(text).unwrap_or(TokenKind::Identifier);
    tokens.push(Token::new(kind, text.to_string(), line, col));
}

/// Lex a `"..."` or `'...'` literal. `\` escapes the next character
/// unconditionally (§4.1). An unterminated literal consumes to end of
/// line and emits whatever was accumulated -- there are no fatal lexer
/// errors.
fn lex_string(
    cursor: &mut Cursor<'_>,
    line: u32,
    tokens: &mut Vec<Token>,
    notes: &mut Vec<LexNote>,
    is_char: bool,
) {
    let col = cursor.column();
    let start = cursor.byte_pos();
    let quote = if is_char { '\'' } else { '"' };
    cursor.advance(); // consume opening quote

    loop {
        match cursor.peek() {
            None => {
                notes.push(LexNote {
                    message: "unterminated string literal".to_string(),
                    line,
                    column: col,
                });
                break;
            }
            Some(c) if c == quote => {
                cursor.advance();
                break;
            }
            Some('\\') => {
                cursor.advance();
                cursor.advance();
            }
            Some(_) => {
                cursor.advance();
            }
        }
    }

    let text = cursor.slice(start, cursor.byte_pos()).to_string();
    let kind = if is_char { TokenKind::CharLit } else { TokenKind::StringLit };
    tokens.push(Token::new(kind, text, line, col));
}

/// `$` -> `End` ("$"), `$#N` -> `End` ("$#N").
fn lex_end(cursor: &mut Cursor<'_>, line: u32, tokens: &mut Vec<Token>) {
    let col = cursor.column();
    let start = cursor.byte_pos();
    cursor.advance(); // consume '$'
    if cursor.peek() == Some('#') {
        cursor.advance();
        cursor.eat_while(|c| c.is_ascii_digit());
    }
    let text = cursor.slice(start, cursor.byte_pos()).to_string();
    tokens.push(Token::new(TokenKind::End, text, line, col));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahoy_common::token::TokenKind::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn simple_assignment() {
        assert_eq!(kinds("x: 42"), vec![Identifier, Colon, Number, Newline, Eof]);
    }

    #[test]
    fn indent_and_dedent_balance() {
        let tokens = Lexer::tokenize("if x is 1 then\n    a: 1\nb: 2");
        let indents = tokens.iter().filter(|t| t.kind == Indent).count();
        let dedents = tokens.iter().filter(|t| t.kind == Dedent).count();
        assert_eq!(indents, dedents);
        assert_eq!(indents, 1);
    }

    #[test]
    fn trailing_dedents_unwind_at_eof() {
        let tokens = Lexer::tokenize("if x then\n    a: 1\n    if y then\n        b: 2");
        assert_eq!(tokens.last().unwrap().kind, Eof);
        let dedents = tokens.iter().filter(|t| t.kind == Dedent).count();
        assert_eq!(dedents, 2);
    }

    #[test]
    fn comment_only_line_emits_just_newline() {
        let tokens = Lexer::tokenize("x: 1\n? a whole comment\ny: 2");
        let k: Vec<_> = tokens.iter().map(|t| &t.kind).collect();
        assert_eq!(
            k,
            vec![
                &Identifier, &Colon, &Number, &Newline,
                &Newline,
                &Identifier, &Colon, &Number, &Newline,
                &Eof,
            ]
        );
    }

    #[test]
    fn indented_comment_only_line_emits_no_indent_or_dedent() {
        // An indented comment-only line must not touch the indent stack --
        // it has no statement for a later `Dedent` to balance against.
        let tokens = Lexer::tokenize("x: 1\n    ? note\ny: 2\n");
        let k: Vec<_> = tokens.iter().map(|t| &t.kind).collect();
        assert_eq!(
            k,
            vec![
                &Identifier, &Colon, &Number, &Newline,
                &Newline,
                &Identifier, &Colon, &Number, &Newline,
                &Eof,
            ]
        );
    }

    #[test]
    fn dedent_realigning_between_levels_emits_balancing_indent() {
        // Dedenting to a width that sits strictly between two previously
        // pushed levels realigns to that new level -- and must push a
        // matching `Indent` so the eventual EOF `Dedent` doesn't leave the
        // stream with more `Dedent`s than `Indent`s (§3 invariant 2).
        let tokens = Lexer::tokenize("x: 1\n    y: 2\n  z: 3\n");
        let indents = tokens.iter().filter(|t| t.kind == Indent).count();
        let dedents = tokens.iter().filter(|t| t.kind == Dedent).count();
        assert_eq!(indents, dedents);
        assert_eq!(indents, 2);
    }

    #[test]
    fn inline_comment_stops_line() {
        let tokens = Lexer::tokenize("x: 1 ? trailing comment");
        assert_eq!(kinds("x: 1 ? trailing comment"), vec![Identifier, Colon, Number, Newline, Eof]);
        assert_eq!(tokens.last().unwrap().kind, Eof);
    }

    #[test]
    fn ternary_token_before_comment_check() {
        assert_eq!(
            kinds("r: x ?? 1 : 2"),
            vec![Identifier, Colon, Identifier, QQ, Number, Colon, Number, Newline, Eof]
        );
    }

    #[test]
    fn word_operators_are_keywords() {
        assert_eq!(
            kinds("r: 1 plus 2 greater_than 3"),
            vec![
                Identifier, Colon, Number, WordPlus, Number, WordGreaterThan, Number, Newline, Eof
            ]
        );
    }

    #[test]
    fn fstring_retracts_leading_identifier() {
        let tokens = Lexer::tokenize(r#"r: f"hi {name}""#);
        assert_eq!(tokens[2].kind, FString);
        assert_eq!(tokens[2].lexeme, r#"f"hi {name}""#);
        // Only one token for the f-string -- not a leftover `Identifier("f")`.
        assert_eq!(
            tokens.iter().map(|t| &t.kind).collect::<Vec<_>>(),
            vec![&Identifier, &Colon, &FString, &Newline, &Eof]
        );
    }

    #[test]
    fn plain_string_is_not_retracted() {
        assert_eq!(kinds(r#""hello""#), vec![StringLit, Newline, Eof]);
    }

    #[test]
    fn multi_char_operators_win_over_prefixes() {
        assert_eq!(kinds("x := 1"), vec![Identifier, ColonEq, Number, Newline, Eof]);
        assert_eq!(kinds("NAME :: int = 1"), vec![Identifier, ColonColon, IntType, Eq, Number, Newline, Eof]);
        assert_eq!(kinds("x <= 1"), vec![Identifier, LtEq, Number, Newline, Eof]);
        assert_eq!(kinds("x += 1"), vec![Identifier, PlusEq, Number, Newline, Eof]);
    }

    #[test]
    fn angle_brackets_are_always_langle_rangle() {
        assert_eq!(kinds("a < b"), vec![Identifier, LAngle, Identifier, Newline, Eof]);
        assert_eq!(kinds("a<1,2>"), vec![Identifier, LAngle, Number, Comma, Number, RAngle, Newline, Eof]);
    }

    #[test]
    fn end_token_with_count_suffix() {
        let tokens = Lexer::tokenize("$#3");
        assert_eq!(tokens[0].kind, End);
        assert_eq!(tokens[0].lexeme, "$#3");
    }

    #[test]
    fn blank_lines_emit_nothing() {
        assert_eq!(kinds("x: 1\n\n\ny: 2"), vec![Identifier, Colon, Number, Newline, Identifier, Colon, Number, Newline, Eof]);
    }

    #[test]
    fn unknown_character_is_skipped_with_a_note() {
        let (tokens, notes) = Lexer::tokenize_with_notes("x: 1 ~ 2");
        assert_eq!(notes.len(), 1);
        assert!(notes[0].message.contains('~'));
        assert!(tokens.iter().all(|t| t.lexeme != "~"));
    }

    #[test]
    fn stream_always_ends_in_single_eof() {
        let tokens = Lexer::tokenize("x: 1\ny: 2");
        assert_eq!(tokens.last().unwrap().kind, Eof);
        assert_eq!(tokens.iter().filter(|t| t.kind == Eof).count(), 1);
    }

    #[test]
    fn tab_counts_as_two_columns_for_indent() {
        // One tab (2 cols) should indent the same as two spaces.
        let tabbed = Lexer::tokenize("if x then\n\ta: 1");
        let spaced = Lexer::tokenize("if x then\n  a: 1");
        let tabbed_indents = tabbed.iter().filter(|t| t.kind == Indent).count();
        let spaced_indents = spaced.iter().filter(|t| t.kind == Indent).count();
        assert_eq!(tabbed_indents, spaced_indents);
    }
}
