// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Fixed keyword table. Matching is case-insensitive.

pub const KEYWORDS: &[&str] = &[
    // blocks
    "globals", "endglobals", "function", "endfunction", "takes", "returns",
    "nothing", "do", "end",
    // declarations
    "local", "const", "constant", "array",
    // statements
    "set", "return", "if", "then", "else", "elseif", "endif", "call", "await",
    "loop", "exitwhen", "endloop", "for", "to", "endfor", "struct", "endstruct",
    "debug", "expect",
    // keyword operators and constants
    "is", "not", "and", "or", "nil", "null", "true", "false",
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}
