// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Machine-readable diagnostic output.
//!
//! `jassc --format json` prints one `DiagnosticReport` per input file.

use jass_ast::LineMap;
use serde::Serialize;

use crate::{codes, count, Diagnostic, LabelStyle, Severity};

/// All diagnostics for one file.
#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    pub version: u32,
    pub file: String,
    pub success: bool,
    /// Last stage that ran: "lex", "parse" or "generate".
    pub phase: String,
    pub diagnostics: Vec<JsonDiagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
}

#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    pub labels: Vec<JsonLabel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// Primary location plus the line it sits on.
#[derive(Debug, Serialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
    pub byte_offset: usize,
    pub source_line: String,
}

#[derive(Debug, Serialize)]
pub struct JsonLabel {
    pub role: LabelStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub start: LineCol,
    pub end: LineCol,
}

/// 1-based line and column.
#[derive(Debug, Serialize)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
    pub byte_offset: usize,
}

pub fn to_json_report(diagnostics: &[Diagnostic], source: &str, file: &str, phase: &str) -> DiagnosticReport {
    let line_map = LineMap::new(source);
    let (error_count, warning_count) = count(diagnostics);
    DiagnosticReport {
        version: 1,
        file: file.to_string(),
        success: error_count == 0,
        phase: phase.to_string(),
        diagnostics: diagnostics.iter().map(|d| to_json_diagnostic(d, source, &line_map)).collect(),
        error_count,
        warning_count,
    }
}

pub fn to_json_string(report: &DiagnosticReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

fn to_json_diagnostic(diag: &Diagnostic, source: &str, line_map: &LineMap) -> JsonDiagnostic {
    let code = diag.code.as_ref().map(|c| c.0.clone());
    let category = code.as_deref().and_then(codes::lookup).map(|info| info.category.to_string());

    let location = diag.primary_span().map(|span| {
        let (line, column) = line_map.offset_to_line_col(span.start);
        SourceLocation {
            line,
            column,
            byte_offset: span.start,
            source_line: line_map.line_text(source, line).unwrap_or("").to_string(),
        }
    });

    let labels = diag
        .labels
        .iter()
        .map(|l| JsonLabel {
            role: l.style,
            message: l.message.clone(),
            start: line_col(line_map, l.span.start),
            end: line_col(line_map, l.span.end),
        })
        .collect();

    JsonDiagnostic {
        severity: diag.severity,
        code,
        category,
        message: diag.message.clone(),
        location,
        labels,
        notes: diag.notes.clone(),
        help: diag.help.clone(),
    }
}

fn line_col(line_map: &LineMap, offset: usize) -> LineCol {
    let (line, column) = line_map.offset_to_line_col(offset);
    LineCol { line, column, byte_offset: offset }
}
