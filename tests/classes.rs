mod util;

use indoc::indoc;
use util::run_program;
use util::{NO_OUTPUT, SUCCESS};

#[test]
fn classes_and_instances_stringify() {
    let input = indoc! {r#"
        class Breakfast {}
        print Breakfast;
        print Breakfast();
    "#};
    let expected = indoc! {"
        Breakfast
        Breakfast <instance>
    "};
    run_program(input, expected, NO_OUTPUT, SUCCESS);
}

#[test]
fn fields_are_per_instance() {
    let input = indoc! {r#"
        class Box {}
        var a = Box();
        var b = Box();
        a.value = 1;
        b.value = 2;
        print a.value;
        print b.value;
    "#};
    let expected = indoc! {"
        1
        2
    "};
    run_program(input, expected, NO_OUTPUT, SUCCESS);
}

#[test]
fn methods_see_this() {
    let input = indoc! {r#"
        class Egotist {
            speak() {
                print this;
            }
        }
        var e = Egotist();
        e.speak();
    "#};
    run_program(input, "Egotist <instance>\n", NO_OUTPUT, SUCCESS);
}

#[test]
fn initializer_binds_fields() {
    let input = indoc! {r#"
        class Person {
            init(name) {
                this.name = name;
            }
            greet() {
                print "Hi, I am " + this.name;
            }
        }
        Person("Ada").greet();
    "#};
    run_program(input, "Hi, I am Ada\n", NO_OUTPUT, SUCCESS);
}

#[test]
fn extracted_method_stays_bound() {
    let input = indoc! {r#"
        class Person {
            init(name) {
                this.name = name;
            }
            greet() {
                print this.name;
            }
        }
        var greet = Person("Ada").greet;
        greet();
    "#};
    run_program(input, "Ada\n", NO_OUTPUT, SUCCESS);
}

#[test]
fn fields_shadow_methods() {
    let input = indoc! {r#"
        class Thing {
            label() {
                return "method";
            }
        }
        var t = Thing();
        t.label = "field";
        print t.label;
    "#};
    run_program(input, "field\n", NO_OUTPUT, SUCCESS);
}

#[test]
fn initializer_returns_the_instance() {
    // Even a bare early return hands back the instance under
    // construction, and so does calling init directly.
    let input = indoc! {r#"
        class C {
            init() {
                return;
            }
        }
        print C();
        var c = C();
        print c.init();
    "#};
    let expected = indoc! {"
        C <instance>
        C <instance>
    "};
    run_program(input, expected, NO_OUTPUT, SUCCESS);
}

#[test]
fn methods_are_inherited() {
    let input = indoc! {r#"
        class A {
            ping() {
                print "A.ping";
            }
        }
        class B < A {}
        B().ping();
    "#};
    run_program(input, "A.ping\n", NO_OUTPUT, SUCCESS);
}

#[test]
fn subclass_methods_shadow_inherited_ones() {
    let input = indoc! {r#"
        class A {
            speak() {
                print "A";
            }
        }
        class B < A {
            speak() {
                print "B";
            }
        }
        B().speak();
    "#};
    run_program(input, "B\n", NO_OUTPUT, SUCCESS);
}

#[test]
fn super_dispatches_to_the_superclass() {
    let input = indoc! {r#"
        class A {
            greet() {
                print "A";
            }
        }
        class B < A {
            greet() {
                super.greet();
                print "B";
            }
        }
        B().greet();
    "#};
    let expected = indoc! {"
        A
        B
    "};
    run_program(input, expected, NO_OUTPUT, SUCCESS);
}

#[test]
fn super_skips_the_receiver_class() {
    // The classic three-level check: `super` in a method inherited by a
    // grandchild still starts above the class that defined the method.
    let input = indoc! {r#"
        class A {
            cook() {
                print "A cooks";
            }
        }
        class B < A {
            cook() {
                super.cook();
            }
        }
        class C < B {}
        C().cook();
    "#};
    run_program(input, "A cooks\n", NO_OUTPUT, SUCCESS);
}

#[test]
fn inherited_initializer_runs_for_subclass() {
    let input = indoc! {r#"
        class Base {
            init(x) {
                this.x = x;
            }
        }
        class Derived < Base {}
        print Derived(9).x;
    "#};
    run_program(input, "9\n", NO_OUTPUT, SUCCESS);
}

#[test]
fn methods_can_call_each_other_through_this() {
    let input = indoc! {r#"
        class Counter {
            init() {
                this.count = 0;
            }
            bump() {
                this.count = this.count + 1;
                return this.count;
            }
            bumpTwice() {
                this.bump();
                this.bump();
                return this.count;
            }
        }
        print Counter().bumpTwice();
    "#};
    run_program(input, "2\n", NO_OUTPUT, SUCCESS);
}

#[test]
fn class_can_refer_to_itself_in_methods() {
    let input = indoc! {r#"
        class Node {
            make() {
                return Node();
            }
        }
        print Node().make();
    "#};
    run_program(input, "Node <instance>\n", NO_OUTPUT, SUCCESS);
}
