// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation.
//!
//! Recursive descent over a token cursor. Builders do not return nodes up
//! the call stack; each one swaps out the current insertion target, fills a
//! fresh one, restores the old target and appends exactly one finished node
//! to it.

use std::mem;

use jass_ast::{Ast, AstNode, Comparison, LiteralKind, ObjectField, Param, Span, Token, TokenKind};
use jass_stdlib::lookup_mnemonic;
use thiserror::Error;
use tracing::{debug, instrument, trace, warn};

use crate::hints;

/// Maximum number of recovered errors to keep.
const MAX_ERRORS: usize = 50;

/// Default number of unrecognized tokens tolerated before giving up.
pub const DEFAULT_RETRY_BUDGET: u32 = 5;

const ASSIGN_OPS: &[&str] = &["=", "+=", "-=", "*=", "/=", "%="];

/// Prefix operators that can start a mnemonic operand, as in `push -1`.
const OPERAND_PREFIXES: &[&str] = &["-", "+", "!", "~"];

/// Keywords allowed inside an expression. Any other keyword ends it.
const EXPRESSION_KEYWORDS: &[&str] = &["is", "not", "and", "or", "nil", "null", "true", "false", "await", "do"];

static EOF_TOKEN: Token = Token { kind: TokenKind::Eof, text: None, line: None, span: Span { start: 0, end: 0 } };

/// Parser switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Record type names on declarations and parameters.
    pub types_enabled: bool,
    /// Accept register mnemonics as statements.
    pub asm_enabled: bool,
    pub retry_budget: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { types_enabled: false, asm_enabled: false, retry_budget: DEFAULT_RETRY_BUDGET }
    }
}

/// A token shape that stops `parse_until`: a kind plus an optional
/// case-insensitive text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndCondition {
    pub kind: TokenKind,
    pub value: Option<&'static str>,
}

impl EndCondition {
    pub const fn kind(kind: TokenKind) -> Self {
        Self { kind, value: None }
    }

    pub const fn keyword(word: &'static str) -> Self {
        Self { kind: TokenKind::Keyword, value: Some(word) }
    }

    pub const fn operator(symbol: &'static str) -> Self {
        Self { kind: TokenKind::Operator, value: Some(symbol) }
    }

    pub fn matches(&self, token: &Token) -> bool {
        token.kind == self.kind && self.value.map_or(true, |v| token.text().eq_ignore_ascii_case(v))
    }

    fn describe(&self) -> String {
        match self.value {
            Some(v) => format!("'{v}'"),
            None => self.kind.display_name().to_string(),
        }
    }
}

const END: EndCondition = EndCondition::keyword("end");
const EOF: EndCondition = EndCondition::kind(TokenKind::Eof);
const COMMA: EndCondition = EndCondition::operator(",");
const RBRACKET: EndCondition = EndCondition::operator("]");

const GLOBALS_END: &[EndCondition] = &[END, EndCondition::keyword("endglobals")];
const FUNCTION_END: &[EndCondition] = &[END, EndCondition::keyword("endfunction")];
const DO_END: &[EndCondition] = &[END];
const IF_BRANCH_END: &[EndCondition] =
    &[EndCondition::keyword("else"), EndCondition::keyword("elseif"), END, EndCondition::keyword("endif")];
const IF_END: &[EndCondition] = &[END, EndCondition::keyword("endif")];
const LOOP_END: &[EndCondition] = &[END, EndCondition::keyword("endloop")];
const FOR_END: &[EndCondition] = &[END, EndCondition::keyword("endfor")];
const STRUCT_END: &[EndCondition] = &[END, EndCondition::keyword("endstruct")];

/// What a bare `NAME = EXPR` line means where it appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclContext {
    Block,
    Globals,
    Struct,
}

/// An open function or `do` block collecting the async flag.
#[derive(Debug, Default)]
struct Frame {
    is_async: bool,
}

/// The parser for dialect source.
pub struct Parser {
    options: ParseOptions,
    tokens: Vec<Token>,
    pos: usize,
    /// Where the next finished node goes.
    target: Vec<AstNode>,
    context: DeclContext,
    in_expression: bool,
    /// Bottom frame is the program itself.
    frames: Vec<Frame>,
    /// Opening keyword of each block being parsed.
    openers: Vec<Span>,
    budget: u32,
    aborted: bool,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            tokens: vec![EOF_TOKEN.clone()],
            pos: 0,
            target: Vec::new(),
            context: DeclContext::Block,
            in_expression: false,
            frames: vec![Frame::default()],
            openers: Vec::new(),
            budget: options.retry_budget,
            aborted: false,
            errors: Vec::new(),
        }
    }

    /// Load a token stream and clear all per-parse state. A missing `Eof`
    /// terminator is appended.
    pub fn reset(&mut self, tokens: Vec<Token>) {
        self.tokens = tokens;
        if self.tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let end = self.tokens.last().map_or(0, |t| t.span.end);
            self.tokens.push(Token::new(TokenKind::Eof, None, Span::point(end)));
        }
        self.pos = 0;
        self.target.clear();
        self.context = DeclContext::Block;
        self.in_expression = false;
        self.frames = vec![Frame::default()];
        self.openers.clear();
        self.budget = self.options.retry_budget;
        self.aborted = false;
        self.errors.clear();
    }

    /// Parse the whole stream.
    #[instrument(level = "debug", skip_all, fields(tokens = self.tokens.len()))]
    pub fn parse(&mut self) -> ParseResult {
        let body = self.parse_until_end(None);
        self.finish(body)
    }

    /// Parse statements until `end` (which is consumed) or end of input.
    pub fn parse_until_end(&mut self, end: Option<EndCondition>) -> Vec<AstNode> {
        let ends: Vec<EndCondition> = end.into_iter().chain(std::iter::once(EOF)).collect();
        let saved = mem::take(&mut self.target);
        let stop = self.parse_until(&ends, true);
        if stop.is_some_and(|s| s != EOF) {
            self.advance();
        }
        mem::replace(&mut self.target, saved)
    }

    /// Package `body` with the errors collected so far.
    pub fn finish(&mut self, body: Vec<AstNode>) -> ParseResult {
        if !self.errors.is_empty() {
            debug!(errors = self.errors.len(), aborted = self.aborted, "parse finished with errors");
        }
        ParseResult { ast: Ast { body, is_async: self.is_async() }, errors: mem::take(&mut self.errors), aborted: self.aborted }
    }

    /// An await was seen outside any function.
    pub fn is_async(&self) -> bool {
        self.frames.first().is_some_and(|f| f.is_async)
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&EOF_TOKEN)
    }

    fn peek(&self, n: usize) -> &Token {
        self.tokens.get(self.pos + n).unwrap_or(&EOF_TOKEN)
    }

    /// Span of the token just consumed.
    fn previous_span(&self) -> Span {
        self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)).map_or(self.current().span, |t| t.span)
    }

    fn at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn advance(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    fn current_text(&self) -> String {
        self.current().text().to_string()
    }

    fn eat_kind(&mut self, kind: TokenKind) -> bool {
        if self.current().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, word: &str) -> bool {
        if self.current().is_keyword(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_operator(&mut self, symbol: &str) -> bool {
        if self.current().is_operator(symbol) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_eols(&mut self) {
        while self.current().kind == TokenKind::Eol {
            self.advance();
        }
    }

    /// Reject leftovers on a header line.
    fn skip_to_line_end(&mut self) {
        while !self.aborted && !matches!(self.current().kind, TokenKind::Eol | TokenKind::Eof | TokenKind::Comment) {
            self.reject();
        }
    }

    fn expect_name(&mut self) -> String {
        if self.current().kind == TokenKind::Identifier {
            let name = self.current_text();
            self.advance();
            name
        } else {
            self.expected("a name");
            String::from("_")
        }
    }

    // =========================================================================
    // Errors and recovery
    // =========================================================================

    fn record(&mut self, error: ParseError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
    }

    fn expected(&mut self, what: &str) {
        let found = self.current().clone();
        let hint = hints::for_expected(what, &found).map(String::from);
        self.record(ParseError {
            kind: ParseErrorKind::Expected { expected: what.to_string(), found: found.describe() },
            span: found.span,
            hint,
            opened_at: None,
        });
    }

    /// Skip a token no rule accepts and charge it to the retry budget.
    fn reject(&mut self) {
        let tok = self.current().clone();
        self.advance();
        debug!(token = %tok.describe(), budget = self.budget, "skipping unexpected token");
        let hint = hints::for_unexpected(&tok).map(String::from);
        self.record(ParseError {
            kind: ParseErrorKind::UnexpectedToken(tok.describe()),
            span: tok.span,
            hint,
            opened_at: None,
        });

        self.budget = self.budget.saturating_sub(1);
        if self.budget == 0 {
            self.aborted = true;
            warn!(errors = self.errors.len(), "retry budget exhausted, returning partial tree");
            self.errors.push(ParseError {
                kind: ParseErrorKind::RetryBudgetExhausted,
                span: tok.span,
                hint: Some("fix the errors above and parse again".to_string()),
                opened_at: None,
            });
        }
    }

    // =========================================================================
    // Core loop
    // =========================================================================

    /// Dispatch tokens into the current target until one matches `ends`.
    /// The matching token is not consumed.
    fn parse_until(&mut self, ends: &[EndCondition], skip_eol: bool) -> Option<EndCondition> {
        loop {
            if self.aborted {
                return None;
            }
            let tok = self.current();
            if let Some(end) = ends.iter().find(|e| e.matches(tok)) {
                return Some(*end);
            }
            if self.in_expression && is_expression_boundary(tok) {
                return Some(EndCondition::kind(tok.kind));
            }
            match tok.kind {
                TokenKind::Eol if skip_eol => {
                    self.advance();
                    continue;
                }
                TokenKind::Eof => {
                    let span = tok.span;
                    let expected = ends.first().map_or_else(|| "more input".to_string(), EndCondition::describe);
                    let opened_at = self.openers.last().copied();
                    self.record(ParseError { kind: ParseErrorKind::UnexpectedEof(expected), span, hint: None, opened_at });
                    return None;
                }
                _ => {}
            }

            let before = self.pos;
            let accepted = if self.in_expression { self.dispatch_expression() } else { self.dispatch_statement() };
            if !accepted || (self.pos == before && !self.aborted) {
                self.reject();
            }
        }
    }

    fn push(&mut self, node: AstNode) {
        self.target.push(node);
    }

    /// Parse an expression into a fresh target and hand back its parts.
    fn collect_expression(&mut self, ends: &[EndCondition]) -> Vec<AstNode> {
        let saved_target = mem::take(&mut self.target);
        let saved_mode = mem::replace(&mut self.in_expression, true);
        self.parse_until(ends, false);
        self.in_expression = saved_mode;
        mem::replace(&mut self.target, saved_target)
    }

    /// Parse a statement block and consume its closer. `opener` is the
    /// keyword that started the block.
    fn parse_block(
        &mut self,
        opener: Span,
        context: DeclContext,
        closers: &[EndCondition],
    ) -> (Vec<AstNode>, Option<EndCondition>) {
        let saved_target = mem::take(&mut self.target);
        let saved_mode = mem::replace(&mut self.in_expression, false);
        let saved_context = mem::replace(&mut self.context, context);

        self.openers.push(opener);
        let closer = self.parse_until(closers, true);
        self.openers.pop();
        if closer.is_some() {
            self.advance();
        }

        self.context = saved_context;
        self.in_expression = saved_mode;
        (mem::replace(&mut self.target, saved_target), closer)
    }

    fn open_frame(&mut self) {
        self.frames.push(Frame::default());
    }

    fn close_frame(&mut self) -> bool {
        self.frames.pop().is_some_and(|f| f.is_async)
    }

    fn mark_async(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.is_async = true;
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn dispatch_statement(&mut self) -> bool {
        let kind = self.current().kind;
        match kind {
            TokenKind::Keyword => {
                let word = self.current_text();
                trace!(keyword = %word, "statement");
                match word.as_str() {
                    "globals" => self.build_globals(),
                    "function" => self.build_function(),
                    "local" => self.build_local(),
                    "const" | "constant" => self.build_const(),
                    "set" => self.build_set(),
                    "return" => self.build_return(),
                    "if" => self.build_if(),
                    "call" => {
                        self.advance();
                        self.build_expression_statement();
                    }
                    "loop" => self.build_loop(),
                    "exitwhen" => self.build_exitwhen(),
                    "for" => self.build_for(),
                    "struct" => self.build_struct(),
                    "expect" => self.build_expect(),
                    "debug" => {
                        self.advance();
                        self.push(AstNode::DebugStmt);
                    }
                    w if EXPRESSION_KEYWORDS.contains(&w) => self.build_expression_statement(),
                    _ => return false,
                }
            }
            TokenKind::Comment => {
                let text = self.current_text();
                self.advance();
                self.push(AstNode::Comment { text });
            }
            TokenKind::Identifier if self.at_mnemonic() => self.build_mnemonic(),
            TokenKind::Identifier if self.at_typed_declaration() => self.build_typed_declaration(),
            TokenKind::Identifier
            | TokenKind::Number
            | TokenKind::String
            | TokenKind::Operator
            | TokenKind::LParen
            | TokenKind::LBrace => self.build_expression_statement(),
            _ => return false,
        }
        true
    }

    /// A mnemonic followed by the start of an operand. `add(1, 2)` with no
    /// space before the parenthesis stays a call, and `sub - 1` with a
    /// detached minus stays arithmetic.
    fn at_mnemonic(&self) -> bool {
        if !self.options.asm_enabled || lookup_mnemonic(self.current().text()).is_none() {
            return false;
        }
        let (word, next, after) = (self.current(), self.peek(1), self.peek(2));
        match next.kind {
            TokenKind::Identifier | TokenKind::Number | TokenKind::String => true,
            TokenKind::LParen => word.span.end < next.span.start,
            TokenKind::Operator if next.text() == "[" => word.span.end < next.span.start,
            TokenKind::Operator => {
                OPERAND_PREFIXES.contains(&next.text())
                    && word.span.end < next.span.start
                    && next.span.end == after.span.start
            }
            _ => false,
        }
    }

    /// `TYPE NAME` or `TYPE array NAME` at the start of a line.
    fn at_typed_declaration(&self) -> bool {
        let next = self.peek(1);
        next.kind == TokenKind::Identifier || next.is_keyword("array")
    }

    /// `TARGET op VALUE`, a call, or a bare expression.
    fn build_expression_statement(&mut self) {
        let mut parts = self.collect_expression(&[]);
        if parts.is_empty() {
            self.expected("an expression");
            return;
        }

        if let Some(at) = parts.iter().position(is_assignment_operator) {
            let value = parts.split_off(at + 1);
            let op = match parts.pop() {
                Some(AstNode::Operator { symbol }) => symbol,
                _ => String::from("="),
            };
            self.push_assignment(parts, op, value);
            return;
        }

        if self.context != DeclContext::Block {
            if let [AstNode::Identifier { name }] = parts.as_slice() {
                let name = name.clone();
                self.push(AstNode::VarDecl { name, var_type: None, mutable: true, is_array: false, init: Vec::new() });
                return;
            }
        }

        if parts.len() == 1 && matches!(parts[0], AstNode::CallExpr { .. } | AstNode::DoBlock { .. }) {
            let node = parts.remove(0);
            self.push(node);
        } else {
            self.push(AstNode::ExprStmt { expr: parts });
        }
    }

    fn push_assignment(&mut self, target: Vec<AstNode>, op: String, value: Vec<AstNode>) {
        if op == "=" && self.context != DeclContext::Block {
            if let [AstNode::Identifier { name }] = target.as_slice() {
                let name = name.clone();
                self.push(AstNode::VarDecl { name, var_type: None, mutable: true, is_array: false, init: value });
                return;
            }
        }
        self.push(AstNode::Assign { target, op, value });
    }

    fn build_globals(&mut self) {
        let opener = self.current().span;
        self.advance();
        let (body, _) = self.parse_block(opener, DeclContext::Globals, GLOBALS_END);
        self.push(AstNode::GlobalsBlock { body });
    }

    fn build_function(&mut self) {
        let opener = self.current().span;
        self.advance();
        let name = self.expect_name();

        let mut params = Vec::new();
        if self.eat_kind(TokenKind::LParen) {
            params = self.parse_params();
            if !self.eat_kind(TokenKind::RParen) {
                self.expected("')'");
            }
        } else if self.eat_keyword("takes") {
            params = self.parse_params();
        }

        let mut return_type = None;
        if self.eat_keyword("returns") {
            if self.current().kind == TokenKind::Identifier {
                let ty = self.current_text();
                self.advance();
                if self.options.types_enabled {
                    return_type = Some(ty);
                }
            } else if !self.eat_keyword("nothing") {
                self.expected("a type");
            }
        }
        self.skip_to_line_end();

        self.open_frame();
        let (body, _) = self.parse_block(opener, DeclContext::Block, FUNCTION_END);
        let is_async = self.close_frame();
        self.push(AstNode::FuncDecl { name, params, return_type, is_async, body });
    }

    fn parse_params(&mut self) -> Vec<Param> {
        let mut params = Vec::new();
        if self.eat_keyword("nothing") {
            return params;
        }
        while !self.aborted && self.current().kind == TokenKind::Identifier {
            let (param_type, name, _) = self.parse_typed_name();
            params.push(Param { name, param_type });
            if !self.eat_operator(",") {
                break;
            }
        }
        params
    }

    /// `[TYPE] [array] NAME`. Two names in a row mean the first is a type;
    /// it is only kept when types are enabled.
    fn parse_typed_name(&mut self) -> (Option<String>, String, bool) {
        let mut type_name = None;
        let next = self.peek(1);
        if self.current().kind == TokenKind::Identifier
            && (next.kind == TokenKind::Identifier || next.is_keyword("array"))
        {
            type_name = Some(self.current_text());
            self.advance();
        }
        let is_array = self.eat_keyword("array");
        let name = self.expect_name();
        let type_name = if self.options.types_enabled { type_name } else { None };
        (type_name, name, is_array)
    }

    fn build_local(&mut self) {
        self.advance();
        let (var_type, name, is_array) = self.parse_typed_name();
        let init = if self.eat_operator("=") { self.collect_expression(&[]) } else { Vec::new() };
        self.push(AstNode::VarDecl { name, var_type, mutable: true, is_array, init });
    }

    fn build_const(&mut self) {
        self.advance();
        // `constant function` is a plain function.
        if self.current().is_keyword("function") {
            self.build_function();
            return;
        }
        let (var_type, name, is_array) = self.parse_typed_name();
        let init = if self.eat_operator("=") {
            self.collect_expression(&[])
        } else {
            self.expected("'='");
            Vec::new()
        };
        self.push(AstNode::VarDecl { name, var_type, mutable: false, is_array, init });
    }

    fn build_typed_declaration(&mut self) {
        let (var_type, name, is_array) = self.parse_typed_name();
        let init = if self.eat_operator("=") { self.collect_expression(&[]) } else { Vec::new() };
        self.push(AstNode::VarDecl { name, var_type, mutable: true, is_array, init });
    }

    fn build_set(&mut self) {
        self.advance();
        let mut parts = self.collect_expression(&[]);
        match parts.iter().position(is_assignment_operator) {
            Some(at) => {
                let value = parts.split_off(at + 1);
                let op = match parts.pop() {
                    Some(AstNode::Operator { symbol }) => symbol,
                    _ => String::from("="),
                };
                self.push(AstNode::Assign { target: parts, op, value });
            }
            None => {
                self.expected("'='");
                if !parts.is_empty() {
                    self.push(AstNode::ExprStmt { expr: parts });
                }
            }
        }
    }

    fn build_return(&mut self) {
        self.advance();
        let value = self.collect_expression(&[]);
        self.push(AstNode::Return { value });
    }

    fn build_if(&mut self) {
        let opener = self.current().span;
        self.advance();
        let node = self.parse_if_chain(opener);
        self.push(node);
    }

    /// Condition, `then` branch and whatever follows, after `if`/`elseif`.
    fn parse_if_chain(&mut self, opener: Span) -> AstNode {
        let test = Comparison { parts: self.collect_expression(&[]) };
        if !self.eat_keyword("then") {
            self.expected("'then'");
        }
        let (then, closer) = self.parse_block(opener, DeclContext::Block, IF_BRANCH_END);
        let else_ = match closer.and_then(|c| c.value) {
            Some("else") => {
                let opener = self.previous_span();
                Some(self.parse_block(opener, DeclContext::Block, IF_END).0)
            }
            Some("elseif") => {
                let opener = self.previous_span();
                Some(vec![self.parse_if_chain(opener)])
            }
            _ => None,
        };
        AstNode::IfStmt { test, then, else_ }
    }

    fn build_loop(&mut self) {
        let opener = self.current().span;
        self.advance();
        let (mut body, _) = self.parse_block(opener, DeclContext::Block, LOOP_END);
        let exit_when = if matches!(body.first(), Some(AstNode::ExitWhen { .. })) {
            match body.remove(0) {
                AstNode::ExitWhen { condition } => Some(condition),
                _ => None,
            }
        } else {
            None
        };
        self.push(AstNode::LoopStmt { exit_when, body });
    }

    fn build_exitwhen(&mut self) {
        self.advance();
        let condition = self.collect_expression(&[]);
        self.push(AstNode::ExitWhen { condition });
    }

    fn build_for(&mut self) {
        let opener = self.current().span;
        self.advance();
        let index_var = self.expect_name();
        self.eat_operator("=");
        let from = self.collect_expression(&[]);
        if !self.eat_keyword("to") {
            self.expected("'to'");
        }
        let to = self.collect_expression(&[]);
        let (body, _) = self.parse_block(opener, DeclContext::Block, FOR_END);
        self.push(AstNode::ForStmt { index_var, from, to, body });
    }

    fn build_struct(&mut self) {
        let opener = self.current().span;
        self.advance();
        let name = self.expect_name();
        self.skip_to_line_end();
        let (body, _) = self.parse_block(opener, DeclContext::Struct, STRUCT_END);
        self.push(AstNode::StructDecl { name, body });
    }

    fn build_expect(&mut self) {
        self.advance();
        let condition = self.collect_expression(&[]);
        self.push(AstNode::Expect { condition });
    }

    fn build_mnemonic(&mut self) {
        let op = self.current().text().to_ascii_lowercase();
        self.advance();
        let mut operands = Vec::new();
        while !self.aborted {
            let parts = self.collect_expression(&[COMMA]);
            if parts.is_empty() {
                break;
            }
            operands.push(AstNode::from_parts(parts));
            if !self.eat_operator(",") {
                break;
            }
        }
        self.push(AstNode::Mnemonic { op, operands });
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn dispatch_expression(&mut self) -> bool {
        let kind = self.current().kind;
        let text = self.current_text();
        match kind {
            TokenKind::Identifier => {
                let parts = self.parse_reference();
                self.target.extend(parts);
            }
            TokenKind::Number => {
                self.advance();
                self.push_postfix(AstNode::Literal { kind: LiteralKind::Number, value: text });
            }
            TokenKind::String => {
                self.advance();
                self.push_postfix(AstNode::Literal { kind: LiteralKind::String, value: text });
            }
            TokenKind::Operator if text == "]" => return false,
            TokenKind::Operator if text == "[" => {
                let node = self.build_array_literal();
                self.push_postfix(node);
            }
            TokenKind::Operator => {
                self.advance();
                self.push(AstNode::Operator { symbol: text });
            }
            TokenKind::LParen => {
                let node = self.build_group();
                self.push_postfix(node);
            }
            TokenKind::LBrace => {
                let node = self.build_object_literal();
                self.push_postfix(node);
            }
            TokenKind::Keyword => match text.as_str() {
                "is" | "not" | "and" | "or" => {
                    self.advance();
                    self.push(AstNode::Operator { symbol: text });
                }
                "nil" | "null" => {
                    self.advance();
                    self.push(AstNode::Literal { kind: LiteralKind::Nil, value: String::from("null") });
                }
                "true" | "false" => {
                    self.advance();
                    self.push(AstNode::Literal { kind: LiteralKind::Bool, value: text });
                }
                "await" => self.build_await(),
                "do" => self.build_do(),
                _ => return false,
            },
            _ => return false,
        }
        true
    }

    /// Identifier with optional `.prop` / `->prop` / `[index]` links, then
    /// any calls and further links.
    fn parse_reference(&mut self) -> Vec<AstNode> {
        let name = self.current_text();
        self.advance();

        let mut chain = Vec::new();
        while !self.aborted {
            match self.parse_link() {
                Some(link) => chain.push(link),
                None => break,
            }
        }

        let node = if chain.is_empty() {
            AstNode::Identifier { name }
        } else {
            AstNode::MemberExpr { object: name, chain }
        };
        self.parse_postfix(node)
    }

    /// One `.name`, `->name` or `[index]` link at the cursor.
    fn parse_link(&mut self) -> Option<AstNode> {
        if self.eat_operator(".") || self.eat_operator("->") {
            if matches!(self.current().kind, TokenKind::Identifier | TokenKind::Keyword) {
                let name = self.current_text();
                self.advance();
                return Some(AstNode::Property { name });
            }
            self.expected("a name");
            return None;
        }
        if self.eat_operator("[") {
            let index = self.collect_expression(&[RBRACKET]);
            if !self.eat_operator("]") {
                self.expected("']'");
            }
            return Some(AstNode::Index { index });
        }
        None
    }

    /// Calls and links after a complete operand: `f().x`, `"a".split(",")`,
    /// `(p).hp`. The operand and its trailing `Property`/`Index` links stay
    /// siblings; a call takes everything before it as its callee. A bare
    /// literal is never called.
    fn parse_postfix(&mut self, base: AstNode) -> Vec<AstNode> {
        let mut parts = vec![base];
        while !self.aborted {
            if self.current().kind == TokenKind::LParen {
                if matches!(
                    parts.as_slice(),
                    [AstNode::Literal { .. } | AstNode::ArrayLiteral { .. } | AstNode::ObjectLiteral { .. }]
                ) {
                    break;
                }
                let callee = mem::take(&mut parts);
                parts.push(self.finish_call(callee));
            } else if let Some(link) = self.parse_link() {
                parts.push(link);
            } else {
                break;
            }
        }
        parts
    }

    fn push_postfix(&mut self, base: AstNode) {
        let parts = self.parse_postfix(base);
        self.target.extend(parts);
    }

    /// Argument list after a callee; the cursor is on `(`.
    fn finish_call(&mut self, callee: Vec<AstNode>) -> AstNode {
        self.advance();
        let mut args = Vec::new();
        loop {
            self.skip_eols();
            if self.aborted || self.eat_kind(TokenKind::RParen) {
                break;
            }
            let parts = self.collect_expression(&[COMMA]);
            if !parts.is_empty() {
                args.push(AstNode::from_parts(parts));
            }
            self.skip_eols();
            if self.eat_operator(",") {
                continue;
            }
            if !self.eat_kind(TokenKind::RParen) {
                self.expected("')'");
            }
            break;
        }
        AstNode::CallExpr { callee, is_async: false, args }
    }

    /// `await CALL` flags the call and the innermost open frame.
    fn build_await(&mut self) {
        self.advance();
        self.mark_async();
        if self.current().kind != TokenKind::Identifier {
            self.push(AstNode::op("await"));
            return;
        }
        let mut parts = self.parse_reference();
        match parts.as_mut_slice() {
            [AstNode::CallExpr { is_async, .. }] => *is_async = true,
            _ => self.push(AstNode::op("await")),
        }
        self.target.extend(parts);
    }

    fn build_do(&mut self) {
        let opener = self.current().span;
        self.advance();
        self.open_frame();
        let (body, _) = self.parse_block(opener, DeclContext::Block, DO_END);
        let is_async = self.close_frame();
        self.push(AstNode::DoBlock { is_async, body });
    }

    fn build_group(&mut self) -> AstNode {
        self.advance();
        let body = self.collect_expression(&[]);
        if !self.eat_kind(TokenKind::RParen) {
            self.expected("')'");
        }
        AstNode::Group { body }
    }

    fn build_array_literal(&mut self) -> AstNode {
        self.advance();
        let mut items = Vec::new();
        loop {
            self.skip_eols();
            if self.aborted || self.eat_operator("]") {
                break;
            }
            let parts = self.collect_expression(&[COMMA, RBRACKET]);
            if !parts.is_empty() {
                items.push(AstNode::from_parts(parts));
            }
            self.skip_eols();
            if self.eat_operator(",") {
                continue;
            }
            if !self.eat_operator("]") {
                self.expected("']'");
            }
            break;
        }
        AstNode::ArrayLiteral { items }
    }

    fn build_object_literal(&mut self) -> AstNode {
        self.advance();
        let mut fields = Vec::new();
        loop {
            self.skip_eols();
            if self.aborted || self.eat_kind(TokenKind::RBrace) {
                break;
            }
            let kind = self.current().kind;
            let key = match kind {
                TokenKind::Identifier | TokenKind::Keyword | TokenKind::String | TokenKind::Number => self.current_text(),
                _ => {
                    self.expected("a field name");
                    break;
                }
            };
            self.advance();
            if !(self.eat_operator(":") || self.eat_operator("=")) {
                self.expected("':'");
            }
            let value = self.collect_expression(&[COMMA]);
            fields.push(ObjectField { key, value });
            self.skip_eols();
            self.eat_operator(",");
        }
        AstNode::ObjectLiteral { fields }
    }
}

fn is_assignment_operator(node: &AstNode) -> bool {
    matches!(node, AstNode::Operator { symbol } if ASSIGN_OPS.contains(&symbol.as_str()))
}

/// Tokens that end any expression regardless of the caller's end set.
fn is_expression_boundary(tok: &Token) -> bool {
    match tok.kind {
        TokenKind::Eol | TokenKind::Eof | TokenKind::RParen | TokenKind::RBrace | TokenKind::Comment => true,
        TokenKind::Keyword => !EXPRESSION_KEYWORDS.contains(&tok.text()),
        _ => false,
    }
}

/// Parse a whole token stream.
pub fn parse(tokens: Vec<Token>, options: &ParseOptions) -> ParseResult {
    let mut parser = Parser::new(*options);
    parser.reset(tokens);
    parser.parse()
}

/// Result of parsing: the tree plus any recovered errors.
#[derive(Debug)]
pub struct ParseResult {
    pub ast: Ast,
    pub errors: Vec<ParseError>,
    /// The retry budget ran out and `ast` is partial.
    pub aborted: bool,
}

impl ParseResult {
    /// Returns true if parsing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected {0}")]
    UnexpectedToken(String),
    #[error("unexpected end of input, expected {0}")]
    UnexpectedEof(String),
    #[error("expected {expected}, found {found}")]
    Expected { expected: String, found: String },
    #[error("too many unrecognized tokens, parsing stopped")]
    RetryBudgetExhausted,
}

/// A recovered parse error with location and an optional fix-it hint.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub hint: Option<String>,
    /// Keyword that opened the block left unclosed.
    pub opened_at: Option<Span>,
}

impl ParseError {
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }
}
