// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `jassc build`: source file in, JavaScript file out.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use jass_compiler::{compile, CompileOptions};
use tracing::{debug, warn};

use super::{read_source, show_diagnostics, CliError};
use crate::{output, Format};

#[derive(Args, Debug)]
pub struct BuildArgs {
    pub file: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "out.js")]
    pub output: PathBuf,

    /// Emit JSDoc annotations for declared types
    #[arg(long)]
    pub types: bool,

    /// Enable register mnemonics
    #[arg(long)]
    pub asm: bool,

    /// Carry `//` comments into the output
    #[arg(long)]
    pub keep_comments: bool,

    /// Do not wrap the program in a closure
    #[arg(long)]
    pub no_wrap: bool,

    /// Malformed tokens tolerated before parsing stops
    #[arg(long, default_value_t = jass_parser::DEFAULT_RETRY_BUDGET)]
    pub retry_budget: u32,
}

impl BuildArgs {
    fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            types_enabled: self.types,
            asm_enabled: self.asm,
            keep_comments: self.keep_comments,
            wrap_in_closure: !self.no_wrap,
            retry_budget: self.retry_budget,
        }
    }
}

pub fn run(args: &BuildArgs, format: Format) -> Result<ExitCode, CliError> {
    let source = read_source(&args.file)?;
    let options = args.compile_options();
    debug!(?options, "building");

    let result = compile(&source, &options);
    show_diagnostics(&result.diagnostics, &source, &args.file, "generate", format);

    let (errors, warnings) = jass_diagnostics::count(&result.diagnostics);
    if result.aborted {
        warn!(file = %args.file.display(), "parse aborted, nothing written");
        if format == Format::Human {
            eprintln!("{}", output::banner_fail("Build", errors));
        }
        return Ok(ExitCode::FAILURE);
    }

    fs::write(&args.output, &result.code).map_err(|source| CliError::Write { path: args.output.clone(), source })?;
    if format == Format::Human {
        let input = args.file.display().to_string();
        let out = args.output.display().to_string();
        eprintln!("{}", output::compiled(&input, &out, warnings, errors));
    }
    Ok(ExitCode::SUCCESS)
}
