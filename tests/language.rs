use gibbon::eval_source;
use gibbon::object::Object;

fn eval(input: &str) -> Object {
    eval_source(input).unwrap_or_else(|errors| panic!("parse errors: {errors:?}"))
}

#[test]
fn arithmetic() {
    assert_eq!(eval("5 + 2 * 10"), Object::Integer(25));
    assert_eq!(eval("(5 + 10 * 2 + 15 / 3) * 2 + -10"), Object::Integer(50));
}

#[test]
fn string_concatenation() {
    assert_eq!(
        eval(r#""hello" + " " + "world""#),
        Object::String(String::from("hello world"))
    );
}

#[test]
fn arrays() {
    assert_eq!(
        eval("var a = [1,2,3] a[0] + a[1] + a[2]"),
        Object::Integer(6)
    );
    assert_eq!(eval("[1,2,3][-1]"), Object::Nil);
    assert_eq!(eval("[1,2,3][3]"), Object::Nil);
}

#[test]
fn maps() {
    let input = r#"
        var two = "two"
        var m = {"one": 1, two: 2, "thr"+"ee": 3, 4: 4, true: 5, false: 6}
        m["one"] + m["two"] + m["three"] + m[4] + m[true] + m[false]
    "#;
    assert_eq!(eval(input), Object::Integer(21));

    match eval(r#"var two = "two" {"one": 1, two: 2, "thr"+"ee": 3, 4: 4, true: 5, false: 6}"#) {
        Object::Map(elements) => assert_eq!(elements.len(), 6),
        other => panic!("expected map, got {other:?}"),
    }
}

#[test]
fn closures_and_shadowing() {
    let input = "
        var first = 10
        var second = 10
        var third = 10
        func add(first) { var second = 20; first + second + third }
        add(20) + first + second
    ";
    assert_eq!(eval(input), Object::Integer(70));
}

#[test]
fn closures_outlive_their_scope() {
    let input = "
        func makeCounter(start) {
            func next() { start + 1 }
        }
        var next = makeCounter(41)
        next()
    ";
    assert_eq!(eval(input), Object::Integer(42));
}

#[test]
fn quote_unquote() {
    let result = eval("var q = quote(4 + 4) quote(unquote(4 + 4) + unquote(q))");
    assert_eq!(result.to_string(), "QUOTE((8 + (4 + 4)))");
}

#[test]
fn macro_expansion() {
    // The branches swap because unless negates its condition.
    let input = r#"
        macro unless(c, a, b) {
            quote(if (!(unquote(c))) { unquote(a) } else { unquote(b) })
        }
        unless(10 > 5, "then", "else")
    "#;
    assert_eq!(eval(input), Object::String(String::from("else")));

    let input = r#"
        macro unless(c, a, b) {
            quote(if (!(unquote(c))) { unquote(a) } else { unquote(b) })
        }
        unless(10 < 5, "then", "else")
    "#;
    assert_eq!(eval(input), Object::String(String::from("then")));
}

#[test]
fn macro_arguments_stay_unevaluated() {
    // Only the chosen branch runs: `boom` taken apart as AST, never
    // evaluated, cannot error.
    let input = r#"
        macro pick(c, a, b) {
            quote(if (unquote(c)) { unquote(a) } else { unquote(b) })
        }
        pick(true, 1, boom())
    "#;
    assert_eq!(eval(input), Object::Integer(1));
}

#[test]
fn top_level_return_unwraps() {
    assert_eq!(eval("return 7"), Object::Integer(7));
    assert_eq!(eval("return 7; 9"), Object::Integer(7));
}

#[test]
fn runtime_errors_are_values() {
    assert_eq!(
        eval("5 + true"),
        Object::Err(String::from("type mismatch: INT + BOOL"))
    );
    assert_eq!(
        eval("a = 1"),
        Object::Err(String::from("type mismatch: NIL = INT"))
    );
}

#[test]
fn parse_errors_are_reported() {
    let errors = eval_source("var = 5").unwrap_err();
    assert!(errors
        .iter()
        .any(|error| error == "expected token Ident, got Assign"));
}

#[test]
fn builtins() {
    assert_eq!(eval(r#"len("hello")"#), Object::Integer(5));
    assert_eq!(eval("len([1, 2, 3])"), Object::Integer(3));
    assert_eq!(eval(r#"print("side effect only")"#), Object::Nil);
}
