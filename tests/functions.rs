mod util;

use indoc::indoc;
use util::{run_program, run_program_with_stdin};
use util::{NO_OUTPUT, SUCCESS};

#[test]
fn call_and_return() {
    let input = indoc! {r#"
        fun add(a, b) {
            return a + b;
        }
        print add(1, 2);
    "#};
    run_program(input, "3\n", NO_OUTPUT, SUCCESS);
}

#[test]
fn function_without_return_produces_nil() {
    let input = indoc! {r#"
        fun noisy() {
            print "called";
        }
        print noisy();
    "#};
    let expected = indoc! {"
        called
        Nil
    "};
    run_program(input, expected, NO_OUTPUT, SUCCESS);
}

#[test]
fn return_unwinds_nested_statements() {
    let input = indoc! {r#"
        fun find() {
            for (var i = 0; i < 100; i = i + 1) {
                if (i == 3) {
                    return i;
                }
            }
        }
        print find();
        print "after";
    "#};
    let expected = indoc! {"
        3
        after
    "};
    run_program(input, expected, NO_OUTPUT, SUCCESS);
}

#[test]
fn recursion() {
    let input = indoc! {r#"
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 2) + fib(n - 1);
        }
        print fib(10);
    "#};
    run_program(input, "55\n", NO_OUTPUT, SUCCESS);
}

#[test]
fn closure_keeps_its_environment_alive() {
    let input = indoc! {r#"
        fun makeCounter() {
            var count = 0;
            fun increment() {
                count = count + 1;
                return count;
            }
            return increment;
        }
        var counter = makeCounter();
        print counter();
        print counter();
        var other = makeCounter();
        print other();
    "#};
    let expected = indoc! {"
        1
        2
        1
    "};
    run_program(input, expected, NO_OUTPUT, SUCCESS);
}

#[test]
fn closure_binds_to_declaration_scope() {
    // The later shadowing declaration in the block must not be visible
    // to a closure that captured the scope before it existed.
    let input = indoc! {r#"
        var a = "global";
        {
            fun show() {
                print a;
            }
            show();
            var a = "block";
            show();
        }
    "#};
    let expected = indoc! {"
        global
        global
    "};
    run_program(input, expected, NO_OUTPUT, SUCCESS);
}

#[test]
fn globals_bind_late() {
    let input = indoc! {r#"
        fun callGlobal() {
            return message;
        }
        var message = "defined later";
        print callGlobal();
    "#};
    run_program(input, "defined later\n", NO_OUTPUT, SUCCESS);
}

#[test]
fn functions_stringify_by_name() {
    let input = indoc! {r#"
        fun f() {}
        print f;
        print clock;
    "#};
    let expected = indoc! {"
        <fn f>
        <native fn>
    "};
    run_program(input, expected, NO_OUTPUT, SUCCESS);
}

#[test]
fn clock_returns_a_number() {
    let input = indoc! {r#"
        print clock() > 0;
    "#};
    run_program(input, "true\n", NO_OUTPUT, SUCCESS);
}

#[test]
fn float_converts_or_returns_nil() {
    let input = indoc! {r#"
        print float("3.5");
        print float(" 42 ");
        print float("abc");
        print float(7);
        print float(true);
        print float(false);
        print float(nil);
    "#};
    let expected = indoc! {"
        3.5
        42
        Nil
        7
        1
        0
        Nil
    "};
    run_program(input, expected, NO_OUTPUT, SUCCESS);
}

#[test]
fn read_prompts_and_returns_the_line() {
    let input = indoc! {r#"
        var name = read("? ");
        print "Hello " + name;
    "#};
    run_program_with_stdin(input, "World\n", "? Hello World\n", NO_OUTPUT, SUCCESS);
}

#[test]
fn read_result_converts_with_float() {
    let input = indoc! {r#"
        var n = float(read(""));
        print n + 1;
    "#};
    run_program_with_stdin(input, "41\n", "42\n", NO_OUTPUT, SUCCESS);
}
