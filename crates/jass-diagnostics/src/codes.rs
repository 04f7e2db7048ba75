// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error code registry.
//!
//! Maps error codes to titles and categories for display and JSON output.

/// Information about a single error code.
#[derive(Debug)]
pub struct ErrorCodeInfo {
    pub code: &'static str,
    pub title: &'static str,
    pub category: ErrorCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lexical,
    Syntax,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Lexical => write!(f, "Lexical"),
            ErrorCategory::Syntax => write!(f, "Syntax"),
        }
    }
}

pub const CODES: &[ErrorCodeInfo] = &[
    ErrorCodeInfo { code: "E0001", title: "unexpected character", category: ErrorCategory::Lexical },
    ErrorCodeInfo { code: "E0002", title: "unterminated string literal", category: ErrorCategory::Lexical },
    ErrorCodeInfo { code: "E0003", title: "unterminated block comment", category: ErrorCategory::Lexical },
    ErrorCodeInfo { code: "E0100", title: "unexpected token", category: ErrorCategory::Syntax },
    ErrorCodeInfo { code: "E0101", title: "unexpected end of input", category: ErrorCategory::Syntax },
    ErrorCodeInfo { code: "E0102", title: "missing expected token", category: ErrorCategory::Syntax },
    ErrorCodeInfo { code: "E0103", title: "retry budget exhausted", category: ErrorCategory::Syntax },
];

pub fn lookup(code: &str) -> Option<&'static ErrorCodeInfo> {
    CODES.iter().find(|info| info.code == code)
}
