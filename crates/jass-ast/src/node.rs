// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! AST nodes.
//!
//! Expressions are kept flat: an operand/operator sequence such as
//! `x + 1` is a `Vec<AstNode>` of `Identifier`, `Operator`, `Literal`.
//! Only calls, member chains, groups and literals nest.

/// Root of a parsed compilation unit.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ast {
    pub body: Vec<AstNode>,
    /// An await-marked call appeared outside any function.
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum AstNode {
    GlobalsBlock {
        body: Vec<AstNode>,
    },
    VarDecl {
        name: String,
        var_type: Option<String>,
        mutable: bool,
        is_array: bool,
        init: Vec<AstNode>,
    },
    /// `set target op value`, or a bare `target = value` statement.
    Assign {
        target: Vec<AstNode>,
        op: String,
        value: Vec<AstNode>,
    },
    FuncDecl {
        name: String,
        params: Vec<Param>,
        return_type: Option<String>,
        is_async: bool,
        body: Vec<AstNode>,
    },
    /// Anonymous `do ... end` block, run immediately.
    DoBlock {
        is_async: bool,
        body: Vec<AstNode>,
    },
    Return {
        value: Vec<AstNode>,
    },
    IfStmt {
        test: Comparison,
        then: Vec<AstNode>,
        else_: Option<Vec<AstNode>>,
    },
    CallExpr {
        callee: Vec<AstNode>,
        is_async: bool,
        args: Vec<AstNode>,
    },
    /// `object` followed by `Property` / `Index` links.
    MemberExpr {
        object: String,
        chain: Vec<AstNode>,
    },
    /// `.name` link: inside a `MemberExpr` chain, or a sibling after a
    /// call, literal or group.
    Property {
        name: String,
    },
    Index {
        index: Vec<AstNode>,
    },
    ForStmt {
        index_var: String,
        from: Vec<AstNode>,
        to: Vec<AstNode>,
        body: Vec<AstNode>,
    },
    LoopStmt {
        exit_when: Option<Vec<AstNode>>,
        body: Vec<AstNode>,
    },
    /// An `exitwhen` that could not become the loop condition.
    ExitWhen {
        condition: Vec<AstNode>,
    },
    StructDecl {
        name: String,
        body: Vec<AstNode>,
    },
    /// Guard that returns early when its condition fails.
    Expect {
        condition: Vec<AstNode>,
    },
    ExprStmt {
        expr: Vec<AstNode>,
    },
    /// Multi-part expression in a single-value position (call argument,
    /// array item).
    Expr {
        parts: Vec<AstNode>,
    },
    Group {
        body: Vec<AstNode>,
    },
    ArrayLiteral {
        items: Vec<AstNode>,
    },
    ObjectLiteral {
        fields: Vec<ObjectField>,
    },
    Literal {
        kind: LiteralKind,
        value: String,
    },
    Identifier {
        name: String,
    },
    Operator {
        symbol: String,
    },
    Comment {
        text: String,
    },
    /// Register instruction, asm dialect only.
    Mnemonic {
        op: String,
        operands: Vec<AstNode>,
    },
    DebugStmt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiteralKind {
    Number,
    String,
    Bool,
    Nil,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: String,
    pub param_type: Option<String>,
}

/// Condition of an `if`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comparison {
    pub parts: Vec<AstNode>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectField {
    pub key: String,
    pub value: Vec<AstNode>,
}

impl AstNode {
    pub fn ident(name: impl Into<String>) -> Self {
        AstNode::Identifier { name: name.into() }
    }

    pub fn op(symbol: impl Into<String>) -> Self {
        AstNode::Operator { symbol: symbol.into() }
    }

    pub fn number(value: impl Into<String>) -> Self {
        AstNode::Literal { kind: LiteralKind::Number, value: value.into() }
    }

    pub fn is_operator(&self, symbol: &str) -> bool {
        matches!(self, AstNode::Operator { symbol: s } if s.eq_ignore_ascii_case(symbol))
    }

    /// Dotted name of a callee or member chain, e.g. `obj.items.push`.
    /// Index links and other shapes have no flat name.
    pub fn flattened_name(&self) -> Option<String> {
        match self {
            AstNode::Identifier { name } => Some(name.clone()),
            AstNode::MemberExpr { object, chain } => {
                let mut out = object.clone();
                for link in chain {
                    match link {
                        AstNode::Property { name } => {
                            out.push('.');
                            out.push_str(name);
                        }
                        _ => return None,
                    }
                }
                Some(out)
            }
            _ => None,
        }
    }

    /// Wrap a part list as a single value node.
    pub fn from_parts(mut parts: Vec<AstNode>) -> AstNode {
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            AstNode::Expr { parts }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattened_member_name() {
        let node = AstNode::MemberExpr {
            object: "units".into(),
            chain: vec![
                AstNode::Property { name: "first".into() },
                AstNode::Property { name: "kill".into() },
            ],
        };
        assert_eq!(node.flattened_name().as_deref(), Some("units.first.kill"));
    }

    #[test]
    fn indexed_chain_has_no_flat_name() {
        let node = AstNode::MemberExpr {
            object: "xs".into(),
            chain: vec![AstNode::Index { index: vec![AstNode::number("0")] }],
        };
        assert_eq!(node.flattened_name(), None);
    }

    #[test]
    fn single_part_is_unwrapped() {
        assert_eq!(AstNode::from_parts(vec![AstNode::ident("a")]), AstNode::ident("a"));
        let multi = AstNode::from_parts(vec![AstNode::ident("a"), AstNode::op("+"), AstNode::number("1")]);
        assert!(matches!(multi, AstNode::Expr { ref parts } if parts.len() == 3));
    }
}
