//! Recursive-descent parser for Ahoy (§4.2-§4.7).
//!
//! The parser is a single `Parser` struct carrying a token vector, a
//! cursor position, a `lint_mode` flag, and an accumulated error buffer.
//! Every call site that would otherwise abort routes through [`Parser::expect`]
//! or [`Parser::recover`] so the lint/strict duality lives in exactly two
//! places instead of being duplicated at each call site (§9 design notes).

pub(crate) mod control_flow;
pub(crate) mod expressions;
pub(crate) mod functions;
pub(crate) mod special_forms;
pub(crate) mod statements;

use ahoy_common::token::{Token, TokenKind};

use crate::ast::Node;
use crate::error::Diagnostic;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    lint_mode: bool,
    errors: Vec<Diagnostic>,
    /// Guard set while parsing a pipe-call's argument list (§4.6/§9):
    /// arguments are parsed at additive precedence so that `|` is never
    /// mistaken for a (nonexistent) bitwise-or operator, and so the
    /// matching closer isn't re-consumed by a nested call parse.
    in_function_call: bool,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, lint_mode: bool) -> Self {
        Self {
            tokens,
            pos: 0,
            lint_mode,
            errors: Vec::new(),
            in_function_call: false,
        }
    }

    pub fn into_errors(self) -> Vec<Diagnostic> {
        self.errors
    }

    // ── Token stream navigation ────────────────────────────────────────

    fn current(&self) -> &Token {
        // `tokens` always ends in exactly one `Eof`; `pos` is clamped to
        // that final index so this never goes out of bounds.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.current().kind
    }

    fn peek_kind(&self, n: usize) -> TokenKind {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        self.tokens[idx].kind
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    fn current_line(&self) -> u32 {
        self.current().line
    }

    fn current_pos(&self) -> (u32, u32) {
        (self.current().line, self.current().column)
    }

    fn current_lexeme(&self) -> &str {
        &self.current().lexeme
    }

    /// Consume and return the current token, advancing the cursor. Never
    /// advances past the final `Eof`.
    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    /// Consume the current token if it matches `kind`.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ── Error handling (§4.7, §9) ────────────────────────────────────────

    /// Record (lint mode) or raise (strict mode) a diagnostic that the
    /// current token is not the one that was required. Does *not* force
    /// advancement: the expected token simply wasn't there, so the next
    /// construct in the grammar should still get a chance to recognize
    /// whatever token actually follows (this is what makes scenario S8 --
    /// a missing `then` -- still parse the rest of the `if` body).
    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<Token, Diagnostic> {
        if self.at(kind) {
            return Ok(self.advance());
        }
        let (line, column) = self.current_pos();
        let diag = Diagnostic::new(message.to_string(), line, column);
        if self.lint_mode {
            self.errors.push(diag);
            Ok(Token::new(kind, String::new(), line, column))
        } else {
            Err(diag)
        }
    }

    /// Record (lint mode) or raise (strict mode) a diagnostic at a point
    /// where nothing recognizable was found at all (e.g. an unexpected
    /// token in primary position, §4.6). Unlike [`Self::expect`], this
    /// always advances at least one token in lint mode, guaranteeing
    /// forward progress (§4.7 point 3), and produces an `identifier`
    /// placeholder with value `"error"` for the caller to splice in.
    fn recover(&mut self, message: impl Into<String>) -> Result<Node, Diagnostic> {
        let (line, column) = self.current_pos();
        let diag = Diagnostic::new(message.into(), line, column);
        if self.lint_mode {
            self.errors.push(diag);
            if !self.at_eof() {
                self.advance();
            }
            Ok(Node::error_placeholder(line))
        } else {
            Err(diag)
        }
    }

    fn push_note(&mut self, message: impl Into<String>, line: u32, column: u32) {
        self.errors.push(Diagnostic::new(message.into(), line, column));
    }

    /// Records an advisory diagnostic at the current position without
    /// affecting control flow -- used for contextual warnings (§7) that
    /// don't block the parse even in strict mode.
    fn push_note_here(&mut self, message: impl Into<String>) {
        let (line, column) = self.current_pos();
        self.push_note(message, line, column);
    }

    // ── Pipe-call guard (§4.6, §9) ───────────────────────────────────────

    pub(crate) fn in_function_call(&self) -> bool {
        self.in_function_call
    }

    /// Sets the guard, returning its previous value so the caller can
    /// restore it once the argument list is done (guards nest when a
    /// method-call argument is itself a pipe-call via `.method|...|`).
    pub(crate) fn enter_function_call(&mut self) -> bool {
        std::mem::replace(&mut self.in_function_call, true)
    }

    pub(crate) fn leave_function_call(&mut self, previous: bool) {
        self.in_function_call = previous;
    }

    // ── Blocks (§4.3 "Block boundary tokens") ────────────────────────────

    /// Skip any run of statement-separator noise (`NEWLINE`, `SEMICOLON`)
    /// that can appear between statements.
    fn skip_statement_separators(&mut self) {
        while matches!(self.kind(), TokenKind::Newline | TokenKind::Semicolon) {
            self.advance();
        }
    }

    /// Skip stray `NEWLINE`/`SEMICOLON`/`DEDENT` between top-level
    /// statements (§4.2 "Top-level loop").
    fn skip_top_level_noise(&mut self) {
        while matches!(
            self.kind(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Dedent
        ) {
            self.advance();
        }
    }

    fn position(&self) -> usize {
        self.pos
    }

    /// Forces progress when a statement parse consumed nothing (§4.2
    /// safety check, §8 "Progress" property).
    fn force_advance(&mut self) {
        if !self.at_eof() {
            self.advance();
        }
    }

    /// Whether a type name (or type-like identifier) is immediately
    /// followed by `=`: the lookahead that distinguishes a typed
    /// `NAME : TYPE = EXPR` / `NAME :: TYPE = EXPR` from an untyped
    /// `NAME : EXPR` (§4.4).
    fn at_type_then_eq(&self) -> bool {
        self.looks_like_type_start() && self.peek_kind(1) == TokenKind::Eq
    }

    /// Parse a statement `BODY`: either a single inline statement (current
    /// token is not `NEWLINE`) or an indented block (§4.3). Always
    /// produces a `block` node so callers don't need to special-case the
    /// inline form.
    pub(crate) fn parse_body(&mut self) -> Result<Node, Diagnostic> {
        let line = self.current_line();
        if !self.at(TokenKind::Newline) {
            let stmt = statements::parse_statement(self)?;
            return Ok(Node::new(crate::ast::NodeKind::Block, line).with_children(vec![stmt]));
        }
        self.advance(); // consume NEWLINE
        self.expect(TokenKind::Indent, "expected an indented block")?;
        let mut block = Node::new(crate::ast::NodeKind::Block, line);
        loop {
            match self.kind() {
                TokenKind::Dedent => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => break,
                // §9 open question: terminator validation is a separate
                // lint pass, not a hard parser error -- an `End` closes
                // the block here without checking its count.
                TokenKind::End => {
                    self.advance();
                    break;
                }
                TokenKind::Newline | TokenKind::Semicolon => {
                    self.advance();
                }
                _ => {
                    let before = self.pos;
                    let stmt = statements::parse_statement(self)?;
                    block.push(stmt);
                    if before == self.pos && !self.at_eof() {
                        self.advance();
                    }
                }
            }
        }
        Ok(block)
    }

    // ── Types (shared by variable/constant decls, params, returns) ──────

    /// Whether the current token could begin a type annotation: one of
    /// the built-in type keywords, or an identifier used as a (nominal)
    /// type name.
    fn looks_like_type_start(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::IntType
                | TokenKind::FloatType
                | TokenKind::StringType
                | TokenKind::CharType
                | TokenKind::BoolType
                | TokenKind::DictType
                | TokenKind::ArrayType
                | TokenKind::Vector2Type
                | TokenKind::ColorType
                | TokenKind::Identifier
        )
    }

    /// Consume one type-name token and return its text.
    fn parse_type_name(&mut self) -> String {
        self.advance().lexeme
    }
}

/// The result of a successful parse (lint or strict): the root `program`
/// node plus whatever diagnostics were accumulated (empty outside lint
/// mode, per §3 invariant 5).
pub struct Parse {
    pub ast: Node,
    pub errors: Vec<Diagnostic>,
}

/// Parse `source` in strict mode: the first structural error aborts with
/// a single fatal diagnostic (§7).
pub fn parse_strict(source: &str) -> Result<Node, Diagnostic> {
    let tokens = ahoy_lexer::Lexer::tokenize(source);
    let mut parser = Parser::new(tokens, false);
    statements::parse_program(&mut parser)
}

/// Parse `source` in lint mode: never fails, accumulating diagnostics and
/// recovering with placeholder nodes instead (§7).
pub fn parse_lint(source: &str) -> Parse {
    let tokens = ahoy_lexer::Lexer::tokenize(source);
    let mut parser = Parser::new(tokens, true);
    let ast = statements::parse_program(&mut parser)
        .expect("lint mode parsing never returns Err: every recovery path yields Ok");
    Parse {
        ast,
        errors: parser.into_errors(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lint_mode_never_errs() {
        let parse = parse_lint("if x\n    a: 1\n");
        assert!(!parse.errors.is_empty());
    }
}
