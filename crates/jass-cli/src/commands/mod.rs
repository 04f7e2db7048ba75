// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Subcommand implementations.

pub mod build;
pub mod phase;

use std::fs;
use std::path::{Path, PathBuf};

use jass_diagnostics::json::{to_json_report, to_json_string};
use jass_diagnostics::{Diagnostic, DiagnosticFormatter};
use thiserror::Error;

use crate::Format;

pub use build::BuildArgs;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serializing output: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn read_source(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

/// Print diagnostics to stderr, so stdout stays free for program data.
pub fn show_diagnostics(diags: &[Diagnostic], source: &str, path: &Path, phase: &str, format: Format) {
    let file = path.display().to_string();
    match format {
        Format::Human => {
            let formatter = DiagnosticFormatter::new(source).with_file_name(&file);
            for diag in diags {
                eprintln!("{}", formatter.format(diag));
            }
        }
        Format::Json => eprintln!("{}", to_json_string(&to_json_report(diags, source, &file, phase))),
    }
}
