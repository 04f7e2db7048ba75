// SPDX-License-Identifier: (MIT OR Apache-2.0)

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Emit JSDoc annotations for declared types.
    pub types_enabled: bool,
    /// Treat register names as reads from the register file.
    pub asm_enabled: bool,
    pub indent_width: usize,
    /// Wrap the program in an immediately invoked arrow function.
    pub wrap_in_closure: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self { types_enabled: false, asm_enabled: false, indent_width: 4, wrap_in_closure: true }
    }
}
