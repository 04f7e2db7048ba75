// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree walker that turns the AST into JavaScript source text.

use std::collections::HashSet;

use jass_ast::{Ast, AstNode, Comparison, LiteralKind, ObjectField, Param};
use jass_stdlib::{is_register, lookup, lookup_mnemonic, register_prelude, HELPERS, MNEMONICS};
use tracing::{debug, instrument};

use crate::config::GenerateOptions;
use crate::context::EmitContext;

/// Operators that bind to the operand after them when nothing precedes.
const PREFIX_OPERATORS: &[&str] = &["-", "+", "!", "~", "++", "--", "not"];

/// Output of a generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub code: String,
    /// Canonical helper names, in prologue order.
    pub used_helpers: Vec<&'static str>,
    pub used_mnemonics: Vec<&'static str>,
}

/// Emits one program. Collects the helpers and mnemonics the program
/// references so only those bodies are inlined.
pub struct CodeGenerator {
    options: GenerateOptions,
    helpers: HashSet<&'static str>,
    mnemonics: HashSet<&'static str>,
    uses_registers: bool,
}

impl CodeGenerator {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options, helpers: HashSet::new(), mnemonics: HashSet::new(), uses_registers: false }
    }

    #[instrument(level = "debug", skip_all, fields(nodes = ast.body.len(), is_async = ast.is_async))]
    pub fn generate(mut self, ast: &Ast) -> Generated {
        let body = self.walk(&ast.body, EmitContext::root());

        let used_mnemonics: Vec<&'static str> =
            MNEMONICS.iter().map(|m| m.name).filter(|name| self.mnemonics.contains(name)).collect();
        let used_helpers: Vec<&'static str> =
            HELPERS.iter().map(|h| h.name).filter(|name| self.helpers.contains(name)).collect();
        debug!(helpers = ?used_helpers, mnemonics = ?used_mnemonics, "selected prologue");

        let mut code = String::new();
        if self.uses_registers || !used_mnemonics.is_empty() {
            code.push_str(&register_prelude());
            code.push('\n');
        }
        for mnemonic in MNEMONICS.iter().filter(|m| self.mnemonics.contains(m.name)) {
            code.push_str(mnemonic.body);
            code.push('\n');
        }
        for helper in HELPERS.iter().filter(|h| self.helpers.contains(h.name)) {
            code.push_str(helper.body);
            code.push('\n');
        }
        code.push_str(&body);

        if self.options.wrap_in_closure {
            let prefix = if ast.is_async { "async " } else { "" };
            code = format!("({prefix}() => {{\n{code}}})();\n");
        }

        Generated { code, used_helpers, used_mnemonics }
    }

    fn pad(&self, ctx: EmitContext) -> String {
        " ".repeat(ctx.indent * self.options.indent_width)
    }

    /// Emit sibling nodes. In expression position parts are joined with the
    /// context separator, except right after a prefix operator, right before
    /// a postfix one, and on either side of a member access.
    fn walk(&mut self, nodes: &[AstNode], ctx: EmitContext) -> String {
        let mut out = String::new();
        let mut tight = true;
        for (i, node) in nodes.iter().enumerate() {
            let prev = i.checked_sub(1).and_then(|j| nodes.get(j));
            let next = nodes.get(i + 1);
            let piece = self.emit_node(node, prev, next, ctx);
            if piece.is_empty() {
                continue;
            }
            if !ctx.allow_semicolons && !tight && !is_postfix(node, prev) && !is_member_access(node) {
                out.push_str(ctx.separator_text());
            }
            out.push_str(&piece);
            tight = !ctx.allow_semicolons
                && ctx.separator.is_none()
                && (is_prefix(node, prev) || is_member_operator(node));
        }
        out
    }

    fn emit_node(&mut self, node: &AstNode, prev: Option<&AstNode>, next: Option<&AstNode>, ctx: EmitContext) -> String {
        let pad = self.pad(ctx);
        match node {
            AstNode::GlobalsBlock { body } => self.walk(body, ctx),
            AstNode::VarDecl { name, var_type, mutable, is_array, init } => {
                let value = if !init.is_empty() {
                    Some(self.walk(init, ctx.inline()))
                } else if *is_array {
                    Some(String::from("[]"))
                } else {
                    None
                };
                let mut out = self.type_annotation(var_type.as_deref(), &pad);
                if ctx.in_object {
                    let value = value.unwrap_or_else(|| String::from("null"));
                    out.push_str(&format!("{pad}{name}: {value},\n"));
                } else {
                    let keyword = if *mutable { "let" } else { "const" };
                    match value {
                        Some(value) => out.push_str(&format!("{pad}{keyword} {name} = {value};\n")),
                        None => out.push_str(&format!("{pad}{keyword} {name};\n")),
                    }
                }
                out
            }
            AstNode::Assign { target, op, value } => {
                let target = self.walk(target, ctx.inline());
                let value = self.walk(value, ctx.inline());
                if ctx.in_object {
                    format!("{pad}{target}: {value},\n")
                } else {
                    format!("{pad}{target} {op} {value};\n")
                }
            }
            AstNode::FuncDecl { name, params, return_type, is_async, body } => {
                self.function(name, params, return_type.as_deref(), *is_async, body, ctx)
            }
            AstNode::DoBlock { is_async, body } => {
                let prefix = if *is_async { "async " } else { "" };
                let body = self.walk(body, ctx.block());
                let iife = format!("({prefix}() => {{\n{body}{pad}}})()");
                if ctx.at_statement_level() {
                    format!("{pad}{iife};\n")
                } else {
                    iife
                }
            }
            AstNode::Return { value } if value.is_empty() => format!("{pad}return;\n"),
            AstNode::Return { value } => format!("{pad}return {};\n", self.walk(value, ctx.inline())),
            AstNode::IfStmt { test, then, else_ } => {
                format!("{pad}{}\n", self.if_chain(test, then, else_.as_deref(), ctx))
            }
            AstNode::CallExpr { callee, is_async, args } => {
                let after_dot = prev.is_some_and(is_member_operator);
                let callee = self.callee(callee, after_dot, ctx);
                let args = self.walk(args, ctx.call_args());
                let prefix = if *is_async { "await " } else { "" };
                let call = format!("{prefix}{callee}({args})");
                if ctx.at_statement_level() {
                    format!("{pad}{call};\n")
                } else {
                    call
                }
            }
            AstNode::MemberExpr { object, chain } => {
                let mut out = self.identifier(object);
                for link in chain {
                    out.push_str(&self.emit_node(link, None, None, ctx.inline()));
                }
                out
            }
            // Links after a call, literal or group arrive as siblings.
            AstNode::Property { name } => match name.strip_prefix('#') {
                Some(rest) if !rest.is_empty() => format!(".{rest}.length"),
                _ => format!(".{name}"),
            },
            AstNode::Index { index } => format!("[{}]", self.walk(index, ctx.inline())),
            AstNode::ForStmt { index_var, from, to, body } => {
                let from = self.walk(from, ctx.inline());
                let to = self.walk(to, ctx.inline());
                let body = self.walk(body, ctx.block());
                format!("{pad}for (let {index_var} = {from}; {index_var} <= {to}; {index_var}++) {{\n{body}{pad}}}\n")
            }
            AstNode::LoopStmt { exit_when, body } => {
                let head = match exit_when {
                    Some(cond) => format!("while (!({})) {{", self.walk(cond, ctx.inline())),
                    None => String::from("while (true) {"),
                };
                let body = self.walk(body, ctx.block());
                format!("{pad}{head}\n{body}{pad}}}\n")
            }
            AstNode::ExitWhen { condition } => {
                format!("{pad}if ({}) {{ break; }}\n", self.walk(condition, ctx.inline()))
            }
            AstNode::StructDecl { name, body } => {
                let fields = self.walk(body, ctx.object());
                format!("{pad}const {name} = {{\n{fields}{pad}}};\n")
            }
            AstNode::Expect { condition } => {
                format!("{pad}if (!({})) {{ return; }}\n", self.walk(condition, ctx.inline()))
            }
            AstNode::ExprStmt { expr } => {
                let expr = self.walk(expr, ctx.inline());
                if ctx.allow_semicolons {
                    format!("{pad}{expr};\n")
                } else {
                    expr
                }
            }
            AstNode::Expr { parts } => self.walk(parts, ctx.inline()),
            AstNode::Group { body } => format!("({})", self.walk(body, ctx.inline())),
            AstNode::ArrayLiteral { items } => format!("[{}]", self.walk(items, ctx.separated(", "))),
            AstNode::ObjectLiteral { fields } => self.object_literal(fields, ctx),
            AstNode::Literal { kind: LiteralKind::Nil, .. } => String::from("null"),
            AstNode::Literal { value, .. } => value.clone(),
            AstNode::Identifier { name } => self.identifier(name),
            AstNode::Operator { symbol } => operator(symbol, prev, next).to_string(),
            AstNode::Comment { text } => format!("{pad}// {text}\n"),
            AstNode::Mnemonic { op, operands } => self.mnemonic(op, operands, ctx),
            AstNode::DebugStmt => format!("{pad}debugger;\n"),
        }
    }

    fn identifier(&mut self, name: &str) -> String {
        if let Some(rest) = name.strip_prefix('#').filter(|rest| !rest.is_empty()) {
            return format!("{rest}.length");
        }
        if self.options.asm_enabled && is_register(name) {
            self.uses_registers = true;
            return format!("__regs.{}", name.to_ascii_lowercase());
        }
        name.to_string()
    }

    /// Registry names are rewritten to their private alias. A method name
    /// after a member access is left alone.
    fn callee(&mut self, callee: &[AstNode], after_dot: bool, ctx: EmitContext) -> String {
        if let [node] = callee {
            let helper = node.flattened_name().as_deref().and_then(lookup).filter(|_| !after_dot);
            if let Some(helper) = helper {
                self.helpers.insert(helper.name);
                return helper.alias();
            }
        }
        self.walk(callee, ctx.inline())
    }

    /// `if (...) {...}` plus any else branches, without leading indent or
    /// trailing newline.
    fn if_chain(&mut self, test: &Comparison, then: &[AstNode], else_: Option<&[AstNode]>, ctx: EmitContext) -> String {
        let pad = self.pad(ctx);
        let test = self.walk(&test.parts, ctx.inline());
        let then = self.walk(then, ctx.block());
        let mut out = format!("if ({test}) {{\n{then}{pad}}}");
        match else_ {
            Some([AstNode::IfStmt { test, then, else_ }]) => {
                out.push_str(" else ");
                out.push_str(&self.if_chain(test, then, else_.as_deref(), ctx));
            }
            Some(body) => {
                let body = self.walk(body, ctx.block());
                out.push_str(&format!(" else {{\n{body}{pad}}}"));
            }
            None => {}
        }
        out
    }

    fn function(
        &mut self,
        name: &str,
        params: &[Param],
        return_type: Option<&str>,
        is_async: bool,
        body: &[AstNode],
        ctx: EmitContext,
    ) -> String {
        let pad = self.pad(ctx);
        let mut out = String::new();
        let typed = params.iter().any(|p| p.param_type.is_some()) || return_type.is_some();
        if self.options.types_enabled && typed {
            out.push_str(&format!("{pad}/**\n"));
            for param in params {
                let ty = param.param_type.as_deref().map_or("*", jsdoc_type);
                out.push_str(&format!("{pad} * @param {{{ty}}} {}\n", param.name));
            }
            if let Some(ty) = return_type {
                out.push_str(&format!("{pad} * @returns {{{}}}\n", jsdoc_type(ty)));
            }
            out.push_str(&format!("{pad} */\n"));
        }

        let prefix = if is_async { "async " } else { "" };
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        let params = names.join(", ");
        let body = self.walk(body, ctx.block());
        if ctx.in_object {
            out.push_str(&format!("{pad}{prefix}{name}({params}) {{\n{body}{pad}}},\n"));
        } else {
            out.push_str(&format!("{pad}{prefix}function {name}({params}) {{\n{body}{pad}}}\n"));
        }
        out
    }

    fn type_annotation(&self, var_type: Option<&str>, pad: &str) -> String {
        match var_type {
            Some(ty) if self.options.types_enabled => format!("{pad}/** @type {{{}}} */\n", jsdoc_type(ty)),
            _ => String::new(),
        }
    }

    fn object_literal(&mut self, fields: &[ObjectField], ctx: EmitContext) -> String {
        if fields.is_empty() {
            return String::from("{}");
        }
        let mut entries = Vec::with_capacity(fields.len());
        for field in fields {
            let value = self.walk(&field.value, ctx.inline());
            entries.push(format!("{}: {}", field.key, value));
        }
        format!("{{ {} }}", entries.join(", "))
    }

    /// `__op("reg", value)`: destination registers are passed by name.
    fn mnemonic(&mut self, op: &str, operands: &[AstNode], ctx: EmitContext) -> String {
        let Some(mnemonic) = lookup_mnemonic(op) else {
            panic!("unknown mnemonic `{op}` in tree");
        };
        self.mnemonics.insert(mnemonic.name);
        self.uses_registers = true;

        let mut args = Vec::with_capacity(operands.len());
        for (i, operand) in operands.iter().enumerate() {
            match operand {
                AstNode::Identifier { name } if i < mnemonic.dest_operands => {
                    args.push(format!("\"{}\"", name.to_ascii_lowercase()));
                }
                other => args.push(self.emit_node(other, None, None, ctx.inline())),
            }
        }
        format!("{}{}({});\n", self.pad(ctx), mnemonic.alias(), args.join(", "))
    }
}

/// Fixed source-to-target operator table.
pub fn translate_operator(symbol: &str) -> &str {
    match symbol.to_ascii_lowercase().as_str() {
        "is" | "==" => "===",
        "not" | "!=" => "!==",
        "and" => "&&",
        "or" => "||",
        "." | "->" => ".",
        _ => symbol,
    }
}

/// `is not` collapses into one comparison; a leading `not` negates.
fn operator<'a>(symbol: &'a str, prev: Option<&AstNode>, next: Option<&AstNode>) -> &'a str {
    if symbol.eq_ignore_ascii_case("is") && next.is_some_and(|n| n.is_operator("not")) {
        return "!==";
    }
    if symbol.eq_ignore_ascii_case("not") {
        if prev.is_some_and(|p| p.is_operator("is")) {
            return "";
        }
        if prev.map_or(true, |p| matches!(p, AstNode::Operator { .. })) {
            return "!";
        }
    }
    translate_operator(symbol)
}

fn is_prefix(node: &AstNode, prev: Option<&AstNode>) -> bool {
    match node {
        AstNode::Operator { symbol } => {
            PREFIX_OPERATORS.iter().any(|op| op.eq_ignore_ascii_case(symbol))
                && prev.map_or(true, |p| matches!(p, AstNode::Operator { .. }))
        }
        _ => false,
    }
}

fn is_member_operator(node: &AstNode) -> bool {
    node.is_operator(".") || node.is_operator("->")
}

/// `.`/`->` operators and trailing `Property`/`Index` links.
fn is_member_access(node: &AstNode) -> bool {
    is_member_operator(node) || matches!(node, AstNode::Property { .. } | AstNode::Index { .. })
}

fn is_postfix(node: &AstNode, prev: Option<&AstNode>) -> bool {
    (node.is_operator("++") || node.is_operator("--")) && prev.is_some_and(|p| !matches!(p, AstNode::Operator { .. }))
}

fn jsdoc_type(name: &str) -> &str {
    match name.to_ascii_lowercase().as_str() {
        "integer" | "real" => "number",
        "boolean" => "boolean",
        "string" => "string",
        "code" => "Function",
        _ => name,
    }
}
