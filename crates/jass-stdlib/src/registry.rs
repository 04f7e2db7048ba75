// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Helper function registry.
//!
//! Each helper is emitted under a private alias (`__` + canonical name) so
//! it cannot collide with user functions. JASS native names are accepted as
//! aliases of the matching helper.

/// Prefix for every emitted helper and mnemonic function.
pub const PRIVATE_PREFIX: &str = "__";

/// A built-in helper that can be inlined into generated output.
#[derive(Debug)]
pub struct Helper {
    pub name: &'static str,
    /// Other source-level names that resolve to this helper.
    pub aliases: &'static [&'static str],
    /// Complete function definition, already using the private alias.
    pub body: &'static str,
}

impl Helper {
    /// Name the generated call uses, e.g. `__len`.
    pub fn alias(&self) -> String {
        format!("{}{}", PRIVATE_PREFIX, self.name)
    }

    fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

/// Registry order is prologue order.
pub const HELPERS: &[Helper] = &[
    // strings and conversion
    Helper {
        name: "len",
        aliases: &["StringLength"],
        body: "function __len(v) { return v == null ? 0 : v.length; }",
    },
    Helper {
        name: "str",
        aliases: &["I2S", "R2S"],
        body: "function __str(v) { return String(v); }",
    },
    Helper {
        name: "num",
        aliases: &["S2R", "I2R"],
        body: "function __num(v) { const n = Number(v); return Number.isNaN(n) ? 0 : n; }",
    },
    Helper {
        name: "int",
        aliases: &["S2I", "R2I"],
        body: "function __int(v) { const n = parseInt(v, 10); return Number.isNaN(n) ? 0 : n; }",
    },
    Helper {
        name: "upper",
        aliases: &[],
        body: "function __upper(s) { return String(s).toUpperCase(); }",
    },
    Helper {
        name: "lower",
        aliases: &[],
        body: "function __lower(s) { return String(s).toLowerCase(); }",
    },
    Helper {
        name: "substr",
        aliases: &["SubString"],
        body: "function __substr(s, start, end) { return String(s).substring(start, end); }",
    },
    Helper {
        name: "split",
        aliases: &[],
        body: "function __split(s, sep) { return String(s).split(sep); }",
    },
    Helper {
        name: "join",
        aliases: &[],
        body: "function __join(xs, sep) { return xs.join(sep === undefined ? \",\" : sep); }",
    },
    // math
    Helper {
        name: "floor",
        aliases: &[],
        body: "function __floor(x) { return Math.floor(x); }",
    },
    Helper {
        name: "ceil",
        aliases: &[],
        body: "function __ceil(x) { return Math.ceil(x); }",
    },
    Helper {
        name: "round",
        aliases: &[],
        body: "function __round(x) { return Math.round(x); }",
    },
    Helper {
        name: "abs",
        aliases: &["RAbsBJ", "IAbsBJ"],
        body: "function __abs(x) { return Math.abs(x); }",
    },
    Helper {
        name: "min",
        aliases: &["RMinBJ", "IMinBJ"],
        body: "function __min(a, b) { return Math.min(a, b); }",
    },
    Helper {
        name: "max",
        aliases: &["RMaxBJ", "IMaxBJ"],
        body: "function __max(a, b) { return Math.max(a, b); }",
    },
    Helper {
        name: "sqrt",
        aliases: &["SquareRoot"],
        body: "function __sqrt(x) { return Math.sqrt(x); }",
    },
    Helper {
        name: "pow",
        aliases: &["Pow"],
        body: "function __pow(x, y) { return Math.pow(x, y); }",
    },
    Helper {
        name: "random",
        aliases: &["GetRandomInt"],
        body: "function __random(lo, hi) { return Math.floor(Math.random() * (hi - lo + 1)) + lo; }",
    },
    // arrays
    Helper {
        name: "append",
        aliases: &[],
        body: "function __append(xs, v) { xs.push(v); return xs.length; }",
    },
    Helper {
        name: "remove",
        aliases: &[],
        body: "function __remove(xs, i) { return xs.splice(i, 1)[0]; }",
    },
    // io and timing
    Helper {
        name: "print",
        aliases: &["BJDebugMsg", "DisplayTextToPlayer"],
        body: "function __print(...args) { console.log(...args); }",
    },
    Helper {
        name: "sleep",
        aliases: &["TriggerSleepAction", "PolledWait"],
        body: "function __sleep(seconds) { return new Promise((resolve) => setTimeout(resolve, seconds * 1000)); }",
    },
];

/// Find the helper a source-level call name refers to.
pub fn lookup(name: &str) -> Option<&'static Helper> {
    HELPERS.iter().find(|h| h.answers_to(name))
}
