// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Codegen tests: source through lexer and parser, checked against the
//! emitted JavaScript text.

#[cfg(test)]
mod tests {
    use jass_ast::{Ast, AstNode};
    use jass_parser::ParseOptions;

    use crate::{generate, translate_operator, CodeGenerator, GenerateOptions, Generated};

    // ── Helpers ─────────────────────────────────────────────────

    fn bare() -> GenerateOptions {
        GenerateOptions { wrap_in_closure: false, ..GenerateOptions::default() }
    }

    fn parse(src: &str, options: ParseOptions) -> Ast {
        let lexed = jass_lexer::tokenize(src);
        let parsed = jass_parser::parse(lexed.tokens, &options);
        assert!(parsed.is_ok(), "Parse errors in {:?}: {:?}", src, parsed.errors);
        parsed.ast
    }

    fn emit(src: &str) -> String {
        generate(&parse(src, ParseOptions::default()), &bare())
    }

    fn emit_wrapped(src: &str) -> Generated {
        CodeGenerator::new(GenerateOptions::default()).generate(&parse(src, ParseOptions::default()))
    }

    fn emit_typed(src: &str) -> String {
        let ast = parse(src, ParseOptions { types_enabled: true, ..ParseOptions::default() });
        generate(&ast, &GenerateOptions { types_enabled: true, ..bare() })
    }

    // ── Declarations ────────────────────────────────────────────

    #[test]
    fn local_declaration() {
        assert_eq!(emit("local x = 5"), "let x = 5;\n");
    }

    #[test]
    fn typed_local_without_types_has_no_annotation() {
        let out = emit("local integer x = 5");
        assert_eq!(out, "let x = 5;\n");
        assert!(!out.contains("integer"));
        assert!(!out.contains("@type"));
    }

    #[test]
    fn typed_local_gets_jsdoc() {
        assert_eq!(emit_typed("local integer x = 5"), "/** @type {number} */\nlet x = 5;\n");
        assert_eq!(emit_typed("local code cb = f"), "/** @type {Function} */\nlet cb = f;\n");
        assert_eq!(emit_typed("local unit u"), "/** @type {unit} */\nlet u;\n");
    }

    #[test]
    fn constants_and_arrays() {
        assert_eq!(emit("constant MAX = 10"), "const MAX = 10;\n");
        assert_eq!(emit("local integer array xs"), "let xs = [];\n");
        assert_eq!(emit("local y"), "let y;\n");
    }

    #[test]
    fn globals_flatten_into_declarations() {
        assert_eq!(emit("globals\n  integer count = 0\n  limit = 3\nendglobals"), "let count = 0;\nlet limit = 3;\n");
    }

    // ── Control flow ────────────────────────────────────────────

    #[test]
    fn loop_with_leading_exitwhen() {
        assert_eq!(emit("loop exitwhen x > 5 end"), "while (!(x > 5)) {\n}\n");
    }

    #[test]
    fn loop_without_exit_condition() {
        assert_eq!(emit("loop\n  call f()\nend"), "while (true) {\n    f();\n}\n");
    }

    #[test]
    fn late_exitwhen_breaks() {
        assert_eq!(
            emit("loop\n  call f()\n  exitwhen done\nendloop"),
            "while (true) {\n    f();\n    if (done) { break; }\n}\n"
        );
    }

    #[test]
    fn for_is_inclusive() {
        assert_eq!(emit("for i 0 to 10\n  call f(i)\nend"), "for (let i = 0; i <= 10; i++) {\n    f(i);\n}\n");
        assert!(emit("for i = 0 to n - 1\nend").contains("for (let i = 0; i <= n - 1; i++) {"));
    }

    #[test]
    fn expect_returns_early() {
        assert_eq!(emit("expect c"), "if (!(c)) { return; }\n");
    }

    #[test]
    fn if_elseif_else() {
        assert_eq!(
            emit("if a then\n  call f()\nelseif b then\n  call g()\nelse\n  call h()\nendif"),
            "if (a) {\n    f();\n} else if (b) {\n    g();\n} else {\n    h();\n}\n"
        );
    }

    #[test]
    fn nested_indentation() {
        assert_eq!(
            emit("function f()\n  if a then\n    return 1\n  end\nend"),
            "function f() {\n    if (a) {\n        return 1;\n    }\n}\n"
        );
    }

    #[test]
    fn indent_width_is_configurable() {
        let ast = parse("function f()\n  return\nend", ParseOptions::default());
        let out = generate(&ast, &GenerateOptions { indent_width: 2, ..bare() });
        assert_eq!(out, "function f() {\n  return;\n}\n");
    }

    // ── Functions and structs ───────────────────────────────────

    #[test]
    fn jass_function() {
        assert_eq!(
            emit("function add takes integer a, integer b returns integer\n  return a + b\nendfunction"),
            "function add(a, b) {\n    return a + b;\n}\n"
        );
    }

    #[test]
    fn function_jsdoc() {
        let out = emit_typed("function add takes integer a, real b returns real\n  return a + b\nendfunction");
        assert!(out.starts_with(
            "/**\n * @param {number} a\n * @param {number} b\n * @returns {number}\n */\nfunction add(a, b) {\n"
        ));
    }

    #[test]
    fn struct_fields() {
        assert_eq!(emit("struct Name\n  field = value\nend"), "const Name = {\n    field: value,\n};\n");
    }

    #[test]
    fn struct_methods_and_empty_fields() {
        assert_eq!(
            emit("struct Hero\n  hp = 100\n  name\n  function heal(n)\n    set hp = hp + n\n  end\nendstruct"),
            "const Hero = {\n    hp: 100,\n    name: null,\n    heal(n) {\n        hp = hp + n;\n    },\n};\n"
        );
    }

    #[test]
    fn do_block_statement_and_value() {
        assert_eq!(emit("do\n  call f()\nend"), "(() => {\n    f();\n})();\n");
        assert_eq!(emit("local r = do\n  return 1\nend"), "let r = (() => {\n    return 1;\n})();\n");
    }

    // ── Expressions ─────────────────────────────────────────────

    #[test]
    fn operator_translation() {
        assert_eq!(emit("if a is b and c != d or not e then\nend"), "if (a === b && c !== d || !e) {\n}\n");
        assert_eq!(emit("if x is not nil then\nend"), "if (x !== null) {\n}\n");
        assert_eq!(emit("if a == b then\nend"), "if (a === b) {\n}\n");
    }

    #[test]
    fn operator_table() {
        assert_eq!(translate_operator("is"), "===");
        assert_eq!(translate_operator("NOT"), "!==");
        assert_eq!(translate_operator("and"), "&&");
        assert_eq!(translate_operator("or"), "||");
        assert_eq!(translate_operator("->"), ".");
        assert_eq!(translate_operator("<="), "<=");
    }

    #[test]
    fn unary_and_postfix_operators_are_tight() {
        assert_eq!(emit("local x = -1"), "let x = -1;\n");
        assert_eq!(emit("set y = a - -b"), "y = a - -b;\n");
        assert_eq!(emit("x++"), "x++;\n");
    }

    #[test]
    fn length_sigil() {
        assert_eq!(emit("local n = #items"), "let n = items.length;\n");
    }

    #[test]
    fn member_and_index_chains() {
        assert_eq!(emit("set grid[i + 1].x = 0"), "grid[i + 1].x = 0;\n");
        assert_eq!(emit("call hero->stats.reset()"), "hero.stats.reset();\n");
    }

    #[test]
    fn member_access_after_calls_and_groups_is_tight() {
        assert_eq!(emit("local n = getUnit().hp"), "let n = getUnit().hp;\n");
        assert_eq!(emit("local y = (a + b).x"), "let y = (a + b).x;\n");
        assert_eq!(emit("local z = f()->x[0]"), "let z = f().x[0];\n");
        assert_eq!(emit("set getUnit().hp = 5"), "getUnit().hp = 5;\n");
    }

    #[test]
    fn loose_dot_operator_has_no_spaces() {
        let ast = Ast {
            body: vec![AstNode::ExprStmt {
                expr: vec![AstNode::ident("a"), AstNode::op("."), AstNode::ident("b"), AstNode::op("->"), AstNode::ident("c")],
            }],
            is_async: false,
        };
        assert_eq!(generate(&ast, &bare()), "a.b.c;\n");
    }

    #[test]
    fn literals() {
        assert_eq!(
            emit("local p = { a: 1, b: [1, -2], c: \"s\", d: nil, e: true }"),
            "let p = { a: 1, b: [1, -2], c: \"s\", d: null, e: true };\n"
        );
        assert_eq!(emit("local o = {}"), "let o = {};\n");
        assert_eq!(emit("local s = 'single'"), "let s = 'single';\n");
    }

    #[test]
    fn groups() {
        assert_eq!(emit("local y = (a + b) * 2"), "let y = (a + b) * 2;\n");
    }

    #[test]
    fn nested_calls_have_one_terminator() {
        assert_eq!(emit("call f(g(1), h(2, 3))"), "f(g(1), h(2, 3));\n");
    }

    #[test]
    fn comments_and_debugger() {
        let tokens = jass_lexer::Lexer::new("// hello\nlocal x = 1\ndebug").with_comments(true).tokenize().tokens;
        let parsed = jass_parser::parse(tokens, &ParseOptions::default());
        assert_eq!(generate(&parsed.ast, &bare()), "// hello\nlet x = 1;\ndebugger;\n");
    }

    // ── Helpers and program assembly ────────────────────────────

    #[test]
    fn helpers_are_renamed_and_emitted_once() {
        let out = emit_wrapped("call len(s)\ncall StringLength(t)");
        assert!(out.code.starts_with("(() => {\n"));
        assert!(out.code.ends_with("})();\n"));
        assert!(out.code.contains("__len(s);\n"));
        assert!(out.code.contains("__len(t);\n"));
        assert_eq!(out.code.matches("function __len(").count(), 1);
        assert_eq!(out.used_helpers, vec!["len"]);
    }

    #[test]
    fn helpers_follow_registry_order() {
        let out = emit_wrapped("call print(len(s))");
        assert!(out.code.contains("__print(__len(s));\n"));
        assert_eq!(out.used_helpers, vec!["len", "print"]);
        let len_at = out.code.find("function __len(").expect("len helper");
        let print_at = out.code.find("function __print(").expect("print helper");
        let body_at = out.code.find("__print(__len(s));").expect("call");
        assert!(len_at < print_at && print_at < body_at);
    }

    #[test]
    fn method_names_are_not_helpers() {
        let out = emit_wrapped("call getList().join(\",\")\nlocal parts = \"a,b\".split(\",\")");
        assert!(out.code.contains("getList().join(\",\");\n"));
        assert!(out.code.contains("let parts = \"a,b\".split(\",\");\n"));
        assert!(out.used_helpers.is_empty());
        assert!(!out.code.contains("__join") && !out.code.contains("__split"));
    }

    #[test]
    fn helper_result_can_be_chained() {
        let out = emit_wrapped("local s = len(xs).toString()");
        assert!(out.code.contains("let s = __len(xs).toString();\n"));
        assert_eq!(out.used_helpers, vec!["len"]);
    }

    #[test]
    fn callee_after_loose_dot_is_not_renamed() {
        let call = AstNode::CallExpr { callee: vec![AstNode::ident("join")], is_async: false, args: vec![] };
        let ast = Ast {
            body: vec![AstNode::ExprStmt { expr: vec![AstNode::ident("xs"), AstNode::op("."), call] }],
            is_async: false,
        };
        let out = CodeGenerator::new(bare()).generate(&ast);
        assert_eq!(out.code, "xs.join();\n");
        assert!(out.used_helpers.is_empty());
    }

    #[test]
    fn unknown_calls_are_left_alone() {
        let out = emit_wrapped("call myLen(s)\ncall Len(s)");
        assert!(out.used_helpers.is_empty());
        assert!(out.code.contains("myLen(s);\n"));
        assert!(out.code.contains("Len(s);\n"));
        assert!(!out.code.contains("function __"));
    }

    #[test]
    fn program_level_await_makes_wrapper_async() {
        let out = emit_wrapped("await sleep(1)");
        assert!(out.code.starts_with("(async () => {\n"));
        assert!(out.code.contains("await __sleep(1);\n"));
    }

    #[test]
    fn async_function() {
        let out = emit_wrapped("function f()\n  await sleep(1)\nend");
        assert!(out.code.starts_with("(() => {\n"));
        assert!(out.code.contains("async function f() {\n    await __sleep(1);\n}\n"));
    }

    #[test]
    fn async_do_block() {
        assert_eq!(emit("do\n  await tick()\nend"), "(async () => {\n    await tick();\n})();\n");
    }

    #[test]
    fn asm_registers_and_mnemonics() {
        let ast = parse("mov ax, 5\nadd ax, bx\nout ax", ParseOptions { asm_enabled: true, ..ParseOptions::default() });
        let out = CodeGenerator::new(GenerateOptions { asm_enabled: true, ..bare() }).generate(&ast);
        assert_eq!(out.used_mnemonics, vec!["mov", "add", "out"]);
        assert!(out.code.starts_with(&jass_stdlib::register_prelude()));
        assert!(out.code.contains("__mov(\"ax\", 5);\n"));
        assert!(out.code.contains("__add(\"ax\", __regs.bx);\n"));
        assert!(out.code.contains("__out(__regs.ax);\n"));
        assert_eq!(out.code.matches("function __mov(").count(), 1);
    }

    #[test]
    fn register_read_in_expression() {
        let ast = parse("local total = ax + 1", ParseOptions { asm_enabled: true, ..ParseOptions::default() });
        let out = generate(&ast, &GenerateOptions { asm_enabled: true, ..bare() });
        assert!(out.contains("const __regs = "));
        assert!(out.ends_with("let total = __regs.ax + 1;\n"));
        // Without asm the same name is an ordinary variable.
        assert_eq!(emit("local total = ax + 1"), "let total = ax + 1;\n");
    }

    #[test]
    fn generation_is_deterministic() {
        let src = "call print(len(a))\ncall sqrt(abs(b))\nfunction f()\n  await sleep(1)\nend";
        assert_eq!(emit_wrapped(src), emit_wrapped(src));
    }

    #[test]
    fn free_function_matches_generator() {
        let ast = parse("call print(1)", ParseOptions::default());
        let options = GenerateOptions::default();
        assert_eq!(generate(&ast, &options), CodeGenerator::new(options).generate(&ast).code);
    }

    #[test]
    fn asm_operands_with_prefix_and_group() {
        let ast = parse("mov ax, -1\npush -1\npush (x + 1)", ParseOptions { asm_enabled: true, ..ParseOptions::default() });
        let out = generate(&ast, &GenerateOptions { asm_enabled: true, ..bare() });
        assert!(out.ends_with("__mov(\"ax\", -1);\n__push(-1);\n__push((x + 1));\n"), "{out}");
    }

    #[test]
    fn lone_sigil_is_left_unchanged() {
        let ast = Ast {
            body: vec![AstNode::VarDecl {
                name: "x".into(),
                var_type: None,
                mutable: true,
                is_array: false,
                init: vec![AstNode::ident("#")],
            }],
            is_async: false,
        };
        assert_eq!(generate(&ast, &bare()), "let x = #;\n");
    }
}
