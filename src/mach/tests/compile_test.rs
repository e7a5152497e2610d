use super::{run, runtime};
use crate::mach::{compile, Chunk, Interner, Opcode, Value};

fn assemble(source: &str) -> Chunk {
    let mut chunk = Chunk::new();
    let mut strings = Interner::new();
    compile(source, &mut chunk, &mut strings).expect("source should compile");
    chunk
}

fn bytes(chunk: &Chunk) -> Vec<u8> {
    (0..chunk.len()).filter_map(|offset| chunk.code(offset)).collect()
}

#[test]
fn test_expression_statement_bytecode() {
    let chunk = assemble("1 + 2 * 3;");
    assert_eq!(
        bytes(&chunk),
        vec![
            Opcode::Constant.into(),
            0,
            Opcode::Constant.into(),
            1,
            Opcode::Constant.into(),
            2,
            Opcode::Multiply.into(),
            Opcode::Add.into(),
            Opcode::Pop.into(),
            Opcode::Return.into(),
        ]
    );
    assert_eq!(chunk.constant(2), Some(&Value::Number(3.0)));
}

#[test]
fn test_comparison_pairs_rewrite() {
    // `<=` and `>=` have no opcode of their own.
    let chunk = assemble("1 <= 2;");
    assert_eq!(
        bytes(&chunk),
        vec![
            Opcode::Constant.into(),
            0,
            Opcode::Constant.into(),
            1,
            Opcode::Greater.into(),
            Opcode::Not.into(),
            Opcode::Pop.into(),
            Opcode::Return.into(),
        ]
    );
}

#[test]
fn test_global_declaration_bytecode() {
    let chunk = assemble("var answer = 42;");
    assert_eq!(
        bytes(&chunk),
        vec![
            Opcode::Constant.into(),
            1,
            Opcode::DefineGlobal.into(),
            0,
            Opcode::Return.into(),
        ]
    );
    assert_eq!(chunk.constant(0), Some(&Value::Str("answer".into())));
}

#[test]
fn test_missing_initializer_defaults_to_nil() {
    let chunk = assemble("var empty;");
    assert_eq!(
        bytes(&chunk),
        vec![
            Opcode::Nil.into(),
            Opcode::DefineGlobal.into(),
            0,
            Opcode::Return.into(),
        ]
    );
}

#[test]
fn test_local_slots_and_scope_pops() {
    let chunk = assemble("{ var a = 1; var b = 2; a; }");
    assert_eq!(
        bytes(&chunk),
        vec![
            Opcode::Constant.into(),
            0,
            Opcode::Constant.into(),
            1,
            Opcode::GetLocal.into(),
            0,
            Opcode::Pop.into(),
            Opcode::Pop.into(),
            Opcode::Pop.into(),
            Opcode::Return.into(),
        ]
    );
}

#[test]
fn test_lines_follow_tokens() {
    let chunk = assemble("1;\n2;");
    assert_eq!(chunk.len(), 7);
    assert_eq!(chunk.line(0), 1);
    assert_eq!(chunk.line(2), 1);
    assert_eq!(chunk.line(3), 2);
}

#[test]
fn test_constant_pool_limit() {
    let mut below = String::new();
    for n in 0..256 {
        below.push_str(&format!("{};", n));
    }
    let chunk = assemble(&below);
    assert_eq!(chunk.constants_len(), 256);

    let mut r = runtime();
    let over = format!("{}256;", below);
    assert_eq!(
        run(&mut r, &over),
        "[line 1] Error at '256': Too many constants in one chunk.\n"
    );
}

#[test]
fn test_local_count_limit() {
    let mut below = String::from("{");
    for n in 0..256 {
        below.push_str(&format!("var v{};", n));
    }
    below.push('}');
    assemble(&below);

    let mut over = String::from("{");
    for n in 0..257 {
        over.push_str(&format!("var v{};", n));
    }
    over.push('}');
    let mut r = runtime();
    assert_eq!(
        run(&mut r, &over),
        "[line 1] Error at 'v256': Too many local variables in function.\n"
    );
}

#[test]
fn test_duplicate_local_rejected() {
    let mut r = runtime();
    assert_eq!(
        run(&mut r, "{ var twice = 1; var twice = 2; }"),
        "[line 1] Error at 'twice': Already a variable with this name in this scope.\n"
    );
}

#[test]
fn test_shadowing_across_scopes_allowed() {
    assemble("{ var x = 1; { var x = 2; } }");
}

#[test]
fn test_own_initializer_rejected() {
    let mut r = runtime();
    assert_eq!(
        run(&mut r, "{ var x = x; }"),
        "[line 1] Error at 'x': Can't read local variable in its own initializer.\n"
    );
}

#[test]
fn test_invalid_assignment_target() {
    let mut r = runtime();
    assert_eq!(
        run(&mut r, "var a = 1; var b = 2; var c = 3; a * b = c;"),
        "[line 1] Error at '=': Invalid assignment target.\n"
    );
}

#[test]
fn test_reserved_keywords_do_not_parse() {
    let mut r = runtime();
    assert_eq!(
        run(&mut r, "if;"),
        "[line 1] Error at 'if': Expect expression.\n"
    );
    assert_eq!(
        run(&mut r, "class Box;"),
        "[line 1] Error at 'class': Expect expression.\n"
    );
}

#[test]
fn test_synchronize_reports_later_statements() {
    let mut r = runtime();
    assert_eq!(
        run(&mut r, "var 1;\nprint;"),
        "[line 1] Error at '1': Expect variable name.\n\
         [line 2] Error at ';': Expect expression.\n"
    );
}

#[test]
fn test_scanner_errors_surface_once() {
    let mut r = runtime();
    assert_eq!(
        run(&mut r, "print @;"),
        "[line 1] Error: Unexpected character.\n"
    );
    assert_eq!(
        run(&mut r, "print \"open;"),
        "[line 1] Error: Unterminated string.\n"
    );
}

#[test]
fn test_missing_semicolon_at_end() {
    let mut r = runtime();
    assert_eq!(
        run(&mut r, "print 1"),
        "[line 1] Error at end: Expect ';' after value.\n"
    );
}
