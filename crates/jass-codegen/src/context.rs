// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Formatting state threaded through the walk by value.

/// Flags describing where the node being emitted sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitContext {
    pub indent: usize,
    /// Separate expression parts with a space when no explicit separator is set.
    pub allow_spaces: bool,
    /// Nodes are statements: they carry their own indent and terminator.
    pub allow_semicolons: bool,
    /// Separator between sibling parts, e.g. `", "` in argument lists.
    pub separator: Option<&'static str>,
    /// Number of enclosing call argument lists.
    pub nested_call_depth: usize,
    /// Declarations become `name: value,` fields.
    pub in_object: bool,
}

impl EmitContext {
    /// Top-level statements.
    pub fn root() -> Self {
        Self {
            indent: 0,
            allow_spaces: true,
            allow_semicolons: true,
            separator: None,
            nested_call_depth: 0,
            in_object: false,
        }
    }

    /// Expression position at the same indent.
    pub fn inline(self) -> Self {
        Self { allow_semicolons: false, separator: None, ..self }
    }

    /// Statements one level deeper.
    pub fn block(self) -> Self {
        Self {
            indent: self.indent + 1,
            allow_semicolons: true,
            separator: None,
            nested_call_depth: 0,
            in_object: false,
            ..self
        }
    }

    /// Fields of an object body one level deeper.
    pub fn object(self) -> Self {
        Self { in_object: true, ..self.block() }
    }

    /// Arguments of a call.
    pub fn call_args(self) -> Self {
        Self {
            allow_semicolons: false,
            separator: Some(", "),
            nested_call_depth: self.nested_call_depth + 1,
            ..self
        }
    }

    pub fn separated(self, separator: &'static str) -> Self {
        Self { allow_semicolons: false, separator: Some(separator), ..self }
    }

    /// A statement outside any argument list.
    pub fn at_statement_level(&self) -> bool {
        self.allow_semicolons && self.nested_call_depth == 0
    }

    pub fn separator_text(&self) -> &'static str {
        match self.separator {
            Some(sep) => sep,
            None if self.allow_spaces => " ",
            None => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_resets_call_depth() {
        let ctx = EmitContext::root().call_args().call_args();
        assert_eq!(ctx.nested_call_depth, 2);
        assert!(!ctx.at_statement_level());
        let inner = ctx.block();
        assert_eq!(inner.indent, 1);
        assert!(inner.at_statement_level());
    }

    #[test]
    fn separators() {
        assert_eq!(EmitContext::root().inline().separator_text(), " ");
        assert_eq!(EmitContext::root().call_args().separator_text(), ", ");
        let compact = EmitContext { allow_spaces: false, ..EmitContext::root() };
        assert_eq!(compact.inline().separator_text(), "");
    }

    #[test]
    fn object_context() {
        let ctx = EmitContext::root().object();
        assert!(ctx.in_object);
        assert!(!ctx.block().in_object);
    }
}
