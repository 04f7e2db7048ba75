// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Terminal rendering for diagnostics.
//!
//! ```text
//! error[E0102]: expected 'then', found end of line
//!   --> map.j:3:13
//!     |
//!   3 |     if x > 5
//!     |             ^ here
//!     |
//!     = help: an 'if' condition ends with 'then'
//! ```

use std::collections::BTreeMap;

use colored::Colorize;
use jass_ast::LineMap;

use crate::{Diagnostic, LabelStyle, Severity};

/// Formats diagnostics against the source they refer to.
pub struct DiagnosticFormatter<'a> {
    source: &'a str,
    file_name: Option<&'a str>,
    line_map: LineMap,
}

/// Underline runs for one source line. Columns are 1-based.
struct Marks<'a> {
    text: &'a str,
    runs: Vec<(usize, usize, LabelStyle, Option<&'a str>)>,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, file_name: None, line_map: LineMap::new(source) }
    }

    pub fn with_file_name(mut self, name: &'a str) -> Self {
        self.file_name = Some(name);
        self
    }

    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        self.header(&mut out, diagnostic);

        let lines = self.mark_lines(diagnostic);
        if let Some(span) = diagnostic.primary_span() {
            let (line, col) = self.line_map.offset_to_line_col(span.start);
            let file = self.file_name.unwrap_or("<source>");
            out.push_str(&format!("  {} {}:{}:{}\n", "-->".blue(), file, line, col));
        }

        let width = lines.keys().last().map(|n| n.to_string().len()).unwrap_or(1).max(2);
        let gutter = " ".repeat(width + 1);
        if !lines.is_empty() {
            out.push_str(&format!("{} {}\n", gutter, "|".blue()));
        }

        let mut prev: Option<u32> = None;
        for (num, marks) in &lines {
            if prev.is_some_and(|p| *num > p + 1) {
                out.push_str(&format!("{} {}\n", " ".repeat(width), "...".blue()));
            }
            out.push_str(&format!(
                "{:>w$} {} {}\n",
                num.to_string().blue().bold(),
                "|".blue(),
                marks.text,
                w = width + 1
            ));
            self.underline(&mut out, marks, &gutter);
            prev = Some(*num);
        }

        self.footer(&mut out, diagnostic, &gutter);
        out
    }

    fn header(&self, out: &mut String, diagnostic: &Diagnostic) {
        let severity = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        match diagnostic.code {
            Some(ref code) => {
                out.push_str(&format!("{}[{}]: {}\n", severity, code.0, diagnostic.message.bold()))
            }
            None => out.push_str(&format!("{}: {}\n", severity, diagnostic.message.bold())),
        }
    }

    fn footer(&self, out: &mut String, diagnostic: &Diagnostic, gutter: &str) {
        if diagnostic.notes.is_empty() && diagnostic.help.is_none() {
            return;
        }
        if !diagnostic.labels.is_empty() {
            out.push_str(&format!("{} {}\n", gutter, "|".blue()));
        }
        for note in &diagnostic.notes {
            out.push_str(&format!("{} {} {}: {}\n", gutter, "=".cyan(), "note".cyan().bold(), note));
        }
        if let Some(ref help) = diagnostic.help {
            out.push_str(&format!("{} {} {}: {}\n", gutter, "=".cyan(), "help".cyan().bold(), help));
        }
    }

    fn mark_lines<'d>(&'d self, diagnostic: &'d Diagnostic) -> BTreeMap<u32, Marks<'d>> {
        let mut lines: BTreeMap<u32, Marks<'d>> = BTreeMap::new();
        for label in &diagnostic.labels {
            let (line, start) = self.line_map.offset_to_line_col(label.span.start);
            let (end_line, end) = self.line_map.offset_to_line_col(label.span.end);
            let Some(text) = self.line_map.line_text(self.source, line) else { continue };
            // Multi-line spans are marked to the end of their first line.
            let end = if end_line == line { end as usize } else { text.len() + 1 };
            let start = start as usize;
            lines.entry(line).or_insert_with(|| Marks { text, runs: Vec::new() }).runs.push((
                start,
                end.max(start + 1),
                label.style,
                label.message.as_deref(),
            ));
        }
        lines
    }

    fn underline(&self, out: &mut String, marks: &Marks<'_>, gutter: &str) {
        let len = marks.runs.iter().map(|r| r.1).max().unwrap_or(0);
        let mut chars = vec![' '; len];
        // Secondary first so primary carets win on overlap.
        let mut runs: Vec<_> = marks.runs.iter().collect();
        runs.sort_by_key(|r| (r.2 == LabelStyle::Primary, r.0));
        for (start, end, style, _) in &runs {
            let ch = if *style == LabelStyle::Primary { '^' } else { '-' };
            for slot in &mut chars[start - 1..end - 1] {
                *slot = ch;
            }
        }
        let line: String = chars.into_iter().collect::<String>().trim_end().to_string();
        let line = color_underline(&line);

        let messages: Vec<_> = runs.iter().filter_map(|r| r.3.map(|m| (r.0, r.2, m))).collect();
        match messages.as_slice() {
            [] => out.push_str(&format!("{} {} {}\n", gutter, "|".blue(), line)),
            [(_, style, msg)] => {
                out.push_str(&format!("{} {} {} {}\n", gutter, "|".blue(), line, styled(msg, *style)))
            }
            many => {
                out.push_str(&format!("{} {} {}\n", gutter, "|".blue(), line));
                for (col, style, msg) in many.iter().rev() {
                    out.push_str(&format!(
                        "{} {} {}{} {}\n",
                        gutter,
                        "|".blue(),
                        " ".repeat(col - 1),
                        styled("|", *style),
                        styled(msg, *style)
                    ));
                }
            }
        }
    }
}

fn styled(text: &str, style: LabelStyle) -> String {
    match style {
        LabelStyle::Primary => text.red().bold().to_string(),
        LabelStyle::Secondary => text.blue().to_string(),
    }
}

/// Color runs of `^` red and runs of `-` blue.
fn color_underline(s: &str) -> String {
    let mut out = String::new();
    let mut run = String::new();
    let mut current: Option<char> = None;
    for ch in s.chars().chain(std::iter::once('\0')) {
        if Some(ch) != current {
            match current {
                Some('^') => out.push_str(&run.red().bold().to_string()),
                Some('-') => out.push_str(&run.blue().to_string()),
                _ => out.push_str(&run),
            }
            run.clear();
            current = Some(ch);
        }
        if ch != '\0' {
            run.push(ch);
        }
    }
    out
}
