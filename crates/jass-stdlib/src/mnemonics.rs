// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Register emulation for the asm dialect.
//!
//! Registers live in a `__regs` object and a `__stack` array declared by
//! the prelude. Destination operands are passed by register name.

/// Register names, lowercase.
pub const REGISTERS: &[&str] = &["ax", "bx", "cx", "dx"];

#[derive(Debug)]
pub struct Mnemonic {
    pub name: &'static str,
    /// Leading operands that name a destination register.
    pub dest_operands: usize,
    pub body: &'static str,
}

impl Mnemonic {
    pub fn alias(&self) -> String {
        format!("{}{}", crate::PRIVATE_PREFIX, self.name)
    }
}

pub const MNEMONICS: &[Mnemonic] = &[
    Mnemonic {
        name: "mov",
        dest_operands: 1,
        body: "function __mov(r, v) { __regs[r] = v; }",
    },
    Mnemonic {
        name: "add",
        dest_operands: 1,
        body: "function __add(r, v) { __regs[r] += v; }",
    },
    Mnemonic {
        name: "sub",
        dest_operands: 1,
        body: "function __sub(r, v) { __regs[r] -= v; }",
    },
    Mnemonic {
        name: "mul",
        dest_operands: 1,
        body: "function __mul(r, v) { __regs[r] *= v; }",
    },
    Mnemonic {
        name: "div",
        dest_operands: 1,
        body: "function __div(r, v) { __regs[r] = Math.trunc(__regs[r] / v); }",
    },
    Mnemonic {
        name: "inc",
        dest_operands: 1,
        body: "function __inc(r) { __regs[r] += 1; }",
    },
    Mnemonic {
        name: "dec",
        dest_operands: 1,
        body: "function __dec(r) { __regs[r] -= 1; }",
    },
    Mnemonic {
        name: "push",
        dest_operands: 0,
        body: "function __push(v) { __stack.push(v); }",
    },
    Mnemonic {
        name: "pop",
        dest_operands: 1,
        body: "function __pop(r) { __regs[r] = __stack.pop(); }",
    },
    Mnemonic {
        name: "out",
        dest_operands: 0,
        body: "function __out(v) { console.log(v); }",
    },
];

/// Mnemonic names are case-insensitive.
pub fn lookup_mnemonic(name: &str) -> Option<&'static Mnemonic> {
    MNEMONICS.iter().find(|m| m.name.eq_ignore_ascii_case(name))
}

pub fn is_register(name: &str) -> bool {
    REGISTERS.iter().any(|r| r.eq_ignore_ascii_case(name))
}

/// Register file and stack declarations, emitted once before any mnemonic.
pub fn register_prelude() -> String {
    let regs: Vec<String> = REGISTERS.iter().map(|r| format!("{}: 0", r)).collect();
    format!("const __regs = {{ {} }};\nconst __stack = [];", regs.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonic_lookup_ignores_case() {
        assert_eq!(lookup_mnemonic("MOV").map(|m| m.dest_operands), Some(1));
        assert_eq!(lookup_mnemonic("push").map(|m| m.alias()), Some("__push".to_string()));
        assert!(lookup_mnemonic("jmp").is_none());
    }

    #[test]
    fn registers() {
        assert!(is_register("AX"));
        assert!(!is_register("ex"));
    }

    #[test]
    fn prelude_declares_every_register() {
        assert_eq!(
            register_prelude(),
            "const __regs = { ax: 0, bx: 0, cx: 0, dx: 0 };\nconst __stack = [];"
        );
    }
}
