// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Standard library for generated scripts.
//!
//! Static tables of helper functions and register mnemonics. The code
//! generator inlines a helper's body into the output prologue only when the
//! program references it.

pub mod mnemonics;
pub mod registry;

pub use mnemonics::{is_register, lookup_mnemonic, register_prelude, Mnemonic, MNEMONICS, REGISTERS};
pub use registry::{lookup, Helper, HELPERS, PRIVATE_PREFIX};
