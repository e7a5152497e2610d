mod common;
use common::*;

#[test]
fn test_read_in_own_initializer() {
    let mut r = new_runtime();
    assert_eq!(
        exec(
            &mut r,
            "{ var x = 10; { var x = x + 1; print x; } print x; }"
        ),
        "[line 1] Error at 'x': Can't read local variable in its own initializer.\n"
    );
}

#[test]
fn test_mixed_add_is_a_runtime_error() {
    let mut r = new_runtime();
    assert_eq!(
        exec(&mut r, "print 1 + \"a\";"),
        "Operands must be two numbers or two strings.\n[line 1] in script\n"
    );
}

#[test]
fn test_undefined_variable() {
    let mut r = new_runtime();
    assert_eq!(
        exec(&mut r, "print undefinedVar;"),
        "Undefined variable 'undefinedVar'.\n[line 1] in script\n"
    );
}

#[test]
fn test_assigning_an_undefined_global() {
    let mut r = new_runtime();
    assert_eq!(
        exec(&mut r, "ghost = 1;"),
        "Undefined variable 'ghost'.\n[line 1] in script\n"
    );
    // The failed assignment must not have defined it.
    assert_eq!(
        exec(&mut r, "print ghost;"),
        "Undefined variable 'ghost'.\n[line 1] in script\n"
    );
}

#[test]
fn test_error_lines_count_from_one() {
    let mut r = new_runtime();
    assert_eq!(
        exec(&mut r, "var fine = 1;\nprint fine;\nprint fine + nil;"),
        "1\nOperands must be numbers.\n[line 3] in script\n"
    );
    assert_eq!(
        exec(&mut r, "// comment\n\nprint missing;"),
        "Undefined variable 'missing'.\n[line 3] in script\n"
    );
}

#[test]
fn test_one_error_per_statement() {
    let mut r = new_runtime();
    assert_eq!(
        exec(&mut r, "print 1 2;\nprint 3;"),
        "[line 1] Error at '2': Expect ';' after value.\n"
    );
}

#[test]
fn test_bad_statements_report_independently() {
    let mut r = new_runtime();
    assert_eq!(
        exec(&mut r, "var 1;\nvar 2;\nvar ok = 3;"),
        "[line 1] Error at '1': Expect variable name.\n\
         [line 2] Error at '2': Expect variable name.\n"
    );
}

#[test]
fn test_unterminated_group() {
    let mut r = new_runtime();
    assert_eq!(
        exec(&mut r, "print (1 + 2;"),
        "[line 1] Error at ';': Expect ')' after expression.\n"
    );
}

#[test]
fn test_lexical_errors() {
    let mut r = new_runtime();
    assert_eq!(
        exec(&mut r, "var pound = #;"),
        "[line 1] Error: Unexpected character.\n"
    );
    assert_eq!(
        exec(&mut r, "print \"no closing quote;"),
        "[line 1] Error: Unterminated string.\n"
    );
}

#[test]
fn test_compile_errors_do_not_run_anything() {
    let mut r = new_runtime();
    assert_eq!(
        exec(&mut r, "print \"before\"; print after"),
        "[line 1] Error at end: Expect ';' after value.\n"
    );
}
