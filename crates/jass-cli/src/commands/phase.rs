// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Stage inspection: `jassc lex` and `jassc parse`.

use std::path::Path;
use std::process::ExitCode;

use colored::Colorize;
use jass_ast::TokenKind;
use jass_diagnostics::{Diagnostic, ToDiagnostic};
use jass_parser::ParseOptions;

use super::{read_source, show_diagnostics, CliError};
use crate::{output, Format};

pub fn lex(path: &Path, keep_comments: bool, format: Format) -> Result<ExitCode, CliError> {
    let source = read_source(path)?;
    let result = jass_lexer::Lexer::new(&source).with_comments(keep_comments).tokenize();

    let diags: Vec<Diagnostic> = result.errors.iter().map(|e| e.to_diagnostic()).collect();
    if !diags.is_empty() {
        show_diagnostics(&diags, &source, path, "lex", format);
    }

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&result.tokens)?),
        Format::Human => {
            println!("{} Tokens ({}) {}\n", "===".dimmed(), result.tokens.len(), "===".dimmed());
            for tok in result.tokens.iter().filter(|t| t.kind != TokenKind::Eol) {
                println!("{:4}:{:<4} {:<10} {}", tok.span.start, tok.span.end, format!("{:?}", tok.kind), tok.text());
            }
            println!("\n{}", output::banner_ok(&format!("Lex: {} tokens", result.tokens.len())));
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub fn parse(path: &Path, json: bool, types: bool, asm: bool, format: Format) -> Result<ExitCode, CliError> {
    let source = read_source(path)?;
    let lexed = jass_lexer::tokenize(&source);
    let mut diags: Vec<Diagnostic> = lexed.errors.iter().map(|e| e.to_diagnostic()).collect();

    let options = ParseOptions { types_enabled: types, asm_enabled: asm, ..ParseOptions::default() };
    let result = jass_parser::parse(lexed.tokens, &options);
    diags.extend(result.errors.iter().map(|e| e.to_diagnostic()));
    if !diags.is_empty() {
        show_diagnostics(&diags, &source, path, "parse", format);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result.ast)?);
    } else {
        println!("{:#?}", result.ast);
    }

    if result.aborted {
        if format == Format::Human {
            eprintln!("{}", output::banner_fail("Parse", result.errors.len()));
        }
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
