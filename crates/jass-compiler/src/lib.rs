// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! One-call compilation: lex, parse and generate, with diagnostics.
//!
//! Hosts that only want a script out of a source string use `compile`. The
//! CLI runs the stages itself when it needs intermediate output.

use jass_codegen::{CodeGenerator, GenerateOptions};
use jass_diagnostics::{Diagnostic, ToDiagnostic};
use jass_lexer::Lexer;
use jass_parser::{ParseOptions, DEFAULT_RETRY_BUDGET};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    pub types_enabled: bool,
    pub asm_enabled: bool,
    /// Carry `//` comments through to the output.
    pub keep_comments: bool,
    pub wrap_in_closure: bool,
    pub retry_budget: u32,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            types_enabled: false,
            asm_enabled: false,
            keep_comments: false,
            wrap_in_closure: true,
            retry_budget: DEFAULT_RETRY_BUDGET,
        }
    }
}

impl CompileOptions {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            types_enabled: self.types_enabled,
            asm_enabled: self.asm_enabled,
            retry_budget: self.retry_budget,
        }
    }

    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            types_enabled: self.types_enabled,
            asm_enabled: self.asm_enabled,
            wrap_in_closure: self.wrap_in_closure,
            ..GenerateOptions::default()
        }
    }
}

/// Output of one compilation.
#[derive(Debug, Clone)]
pub struct Compilation {
    /// Generated script. Covers only the parsed prefix when `aborted`.
    pub code: String,
    /// Lexer warnings followed by parser errors, in source order per stage.
    pub diagnostics: Vec<Diagnostic>,
    pub aborted: bool,
}

impl Compilation {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

#[instrument(level = "info", skip_all, fields(len = source.len()))]
pub fn compile(source: &str, options: &CompileOptions) -> Compilation {
    let lexed = Lexer::new(source).with_comments(options.keep_comments).tokenize();
    let mut diagnostics: Vec<Diagnostic> = lexed.errors.iter().map(ToDiagnostic::to_diagnostic).collect();

    let parsed = jass_parser::parse(lexed.tokens, &options.parse_options());
    diagnostics.extend(parsed.errors.iter().map(ToDiagnostic::to_diagnostic));
    if parsed.aborted {
        warn!("parse aborted, generating partial output");
    }

    let generated = CodeGenerator::new(options.generate_options()).generate(&parsed.ast);
    info!(
        bytes = generated.code.len(),
        helpers = generated.used_helpers.len(),
        diagnostics = diagnostics.len(),
        "compiled"
    );

    Compilation { code: generated.code, diagnostics, aborted: parsed.aborted }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_fan_out_to_stages() {
        let options = CompileOptions { types_enabled: true, wrap_in_closure: false, retry_budget: 2, ..Default::default() };
        let parse = options.parse_options();
        assert!(parse.types_enabled);
        assert_eq!(parse.retry_budget, 2);
        let generate = options.generate_options();
        assert!(generate.types_enabled);
        assert!(!generate.wrap_in_closure);
        assert_eq!(generate.indent_width, 4);
    }

    #[test]
    fn default_budget_matches_parser() {
        assert_eq!(CompileOptions::default().retry_budget, DEFAULT_RETRY_BUDGET);
    }
}
