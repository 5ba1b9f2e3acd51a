mod util;

use indoc::indoc;
use util::run_program;
use util::{NO_OUTPUT, RUNTIME_ERROR, STATIC_ERROR, SUCCESS};

// -------- Static errors: scanning and parsing --------

#[test]
fn unexpected_character() {
    let input = indoc! {r#"
        print "never";
        @
    "#};
    let expected_error = indoc! {"
        [line 2] Error: Unexpected character: @
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn unterminated_string() {
    let input = r#""abc"#;
    let expected_error = indoc! {"
        [line 1] Error: Unterminated string.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn missing_semicolon() {
    let input = "print 1";
    let expected_error = indoc! {"
        [line 1] Error at end: Expect ';' after value.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn invalid_assignment_target() {
    let input = "1 = 2;";
    let expected_error = indoc! {"
        [line 1] Error at '=': Invalid assignment target.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn parser_recovers_and_reports_multiple_errors() {
    let input = indoc! {r#"
        print 1
        print 2;
        var = 3;
    "#};
    let expected_error = indoc! {"
        [line 2] Error at 'print': Expect ';' after value.
        [line 3] Error at '=': Expect variable name.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

// -------- Static errors: resolution --------

#[test]
fn return_at_top_level() {
    let input = "return;";
    let expected_error = indoc! {"
        [line 1] Error at 'return': Cannot return from top-level code.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn return_value_from_initializer() {
    let input = indoc! {r#"
        class C {
            init() {
                return 1;
            }
        }
    "#};
    let expected_error = indoc! {"
        [line 3] Error at 'return': Cannot return a value from an initializer.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn local_read_in_its_own_initializer() {
    let input = indoc! {r#"
        var a = "outer";
        {
            var a = a;
        }
    "#};
    let expected_error = indoc! {"
        [line 3] Error at 'a': Cannot read local variable in its own initializer.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn duplicate_declaration_in_local_scope() {
    let input = indoc! {r#"
        fun bad() {
            var a = 1;
            var a = 2;
        }
    "#};
    let expected_error = indoc! {"
        [line 3] Error at 'a': Variable with this name already declared in this scope.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn duplicate_declaration_of_globals_is_allowed() {
    let input = indoc! {r#"
        var a = 1;
        var a = 2;
        print a;
    "#};
    run_program(input, "2\n", NO_OUTPUT, SUCCESS);
}

#[test]
fn this_outside_a_class() {
    let input = "print this;";
    let expected_error = indoc! {"
        [line 1] Error at 'this': Cannot use 'this' outside of a class.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn super_outside_a_class() {
    let input = "print super.x;";
    let expected_error = indoc! {"
        [line 1] Error at 'super': Cannot use 'super' outside of a class.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn super_in_a_class_with_no_superclass() {
    let input = indoc! {r#"
        class C {
            m() {
                super.m();
            }
        }
    "#};
    let expected_error = indoc! {"
        [line 3] Error at 'super': Cannot use 'super' in a class with no superclass.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn class_inheriting_from_itself() {
    let input = "class C < C {}";
    let expected_error = indoc! {"
        [line 1] Error at 'C': A class cannot inherit from itself.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

// -------- Runtime errors --------

#[test]
fn subtraction_rejects_strings() {
    let input = r#"print "a" - 1;"#;
    let expected_error = indoc! {"
        Operands must be a number.
        [line 1]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn negation_rejects_non_numbers() {
    let input = r#"print -"x";"#;
    let expected_error = indoc! {"
        Operand must be a number.
        [line 1]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn addition_rejects_other_mixes() {
    let input = "print true + 1;";
    let expected_error = indoc! {"
        Operators must be two numbers or strings.
        [line 1]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn comparison_rejects_strings() {
    let input = r#"print 1 < "2";"#;
    let expected_error = indoc! {"
        Operands must be a number.
        [line 1]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn undefined_variable() {
    let input = indoc! {r#"
        print "before";
        print missing;
        print "after";
    "#};
    let expected_error = indoc! {"
        Undefined variable 'missing'.
        [line 2]
    "};
    // Execution stops at the error; "after" never prints.
    run_program(input, "before\n", expected_error, RUNTIME_ERROR);
}

#[test]
fn undefined_assignment_target() {
    let input = "missing = 1;";
    let expected_error = indoc! {"
        Undefined variable 'missing'.
        [line 1]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn calling_a_non_callable() {
    let input = r#""hi"();"#;
    let expected_error = indoc! {"
        Can only call functions and classes.
        [line 1]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn arity_mismatch() {
    let input = indoc! {r#"
        fun f(a) {
            return a;
        }
        f();
    "#};
    let expected_error = indoc! {"
        Expected 1 arguments but got 0.
        [line 4]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn property_access_on_non_instance() {
    let input = "print 4.foo;";
    let expected_error = indoc! {"
        Only instances have properties.
        [line 1]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn field_set_on_non_instance() {
    let input = indoc! {r#"
        var s = "str";
        s.x = 1;
    "#};
    let expected_error = indoc! {"
        Only instances have fields.
        [line 2]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn undefined_property() {
    let input = indoc! {r#"
        class C {}
        print C().missing;
    "#};
    let expected_error = indoc! {"
        Undefined property missing.
        [line 2]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn undefined_super_method() {
    let input = indoc! {r#"
        class A {}
        class B < A {
            go() {
                super.missing();
            }
        }
        B().go();
    "#};
    let expected_error = indoc! {"
        Undefined property missing.
        [line 4]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn superclass_must_be_a_class() {
    let input = indoc! {r#"
        var NotAClass = 5;
        class C < NotAClass {}
    "#};
    let expected_error = indoc! {"
        Superclass must be a class.
        [line 2]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}
