// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `jassc`: compile JASS-style scripts to JavaScript.

mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use commands::BuildArgs;

#[derive(Parser, Debug)]
#[command(name = "jassc", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log compiler stages (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// How diagnostics are printed
    #[arg(long, value_enum, default_value_t = Format::Human, global = true)]
    format: Format,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a script to JavaScript
    Build(BuildArgs),

    /// Print the token stream
    Lex {
        file: PathBuf,
        /// Keep `//` comments as tokens
        #[arg(long)]
        keep_comments: bool,
    },

    /// Parse a script and print its tree
    Parse {
        file: PathBuf,
        /// Print the tree as JSON instead of debug text
        #[arg(long)]
        json: bool,
        #[arg(long)]
        types: bool,
        #[arg(long)]
        asm: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Human,
    Json,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    output::init();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Build(args) => commands::build::run(&args, cli.format),
        Command::Lex { file, keep_comments } => commands::phase::lex(&file, keep_comments, cli.format),
        Command::Parse { file, json, types, asm } => commands::phase::parse(&file, json, types, asm, cli.format),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", output::error_label(), e);
            ExitCode::FAILURE
        }
    }
}
