// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! JavaScript code generation.
//!
//! Walks the AST once, collecting the standard-library helpers and register
//! mnemonics it references, then assembles prologue and body into a single
//! script wrapped in an isolating closure.

mod config;
mod context;
mod tests;
mod walker;

pub use config::GenerateOptions;
pub use context::EmitContext;
pub use walker::{translate_operator, CodeGenerator, Generated};

use jass_ast::Ast;

/// Generate the program text for `ast`.
pub fn generate(ast: &Ast, options: &GenerateOptions) -> String {
    CodeGenerator::new(*options).generate(ast).code
}
