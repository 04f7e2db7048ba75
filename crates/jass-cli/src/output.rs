// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Colored terminal output.
//!
//! Respects NO_COLOR and FORCE_COLOR.

use colored::{ColoredString, Colorize};

/// Apply the color environment overrides. Call once at startup.
pub fn init() {
    if std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    } else if std::env::var_os("FORCE_COLOR").is_some() {
        colored::control::set_override(true);
    }
}

pub fn error_label() -> ColoredString {
    "error".red().bold()
}

pub fn file_path(path: &str) -> ColoredString {
    path.underline()
}

pub fn banner_ok(phase: &str) -> String {
    format!("{} {} {}", "===".dimmed(), format!("{phase} OK").green().bold(), "===".dimmed())
}

pub fn banner_fail(phase: &str, errors: usize) -> String {
    let msg = match errors {
        1 => format!("{phase} FAILED: 1 error"),
        n => format!("{phase} FAILED: {n} errors"),
    };
    format!("{} {} {}", "===".dimmed(), msg.red().bold(), "===".dimmed())
}

/// `Compiled map.j -> out.js (2 warnings)`
pub fn compiled(input: &str, output: &str, warnings: usize, errors: usize) -> String {
    let mut line = format!("{} {} -> {}", "Compiled".green().bold(), input, file_path(output));
    match (errors, warnings) {
        (0, 0) => {}
        (0, w) => line.push_str(&format!(" ({})", plural(w, "warning").yellow())),
        (e, 0) => line.push_str(&format!(" ({})", plural(e, "error").red())),
        (e, w) => line.push_str(&format!(" ({}, {})", plural(e, "error").red(), plural(w, "warning").yellow())),
    }
    line
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}
