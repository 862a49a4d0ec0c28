use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::modify::modify_expr;
use crate::ast::Expression;
use crate::evaluator::eval::Evaluator;
use crate::object::environment::Environment;
use crate::object::Object;

/// `quote(expr)` lifts the unevaluated argument into the value domain,
/// after replacing every embedded `unquote(...)` call with AST synthesized
/// from its evaluated argument.
pub fn quote(expr: Expression, env: Rc<RefCell<Environment>>) -> Object {
    Object::Quote(eval_unquote_calls(expr, env))
}

fn eval_unquote_calls(quoted: Expression, env: Rc<RefCell<Environment>>) -> Expression {
    let modify_func = |expr: Expression| {
        if !is_unquote_call(&expr) {
            return expr;
        }

        if let Expression::Call(_, ref args) = expr {
            if args.len() != 1 {
                return expr;
            }
            // Unquote escapes back into evaluation, against the same
            // environment the quote runs in.
            let mut evaluator = Evaluator::with_env(Rc::clone(&env));
            let value = evaluator.eval_expr(args[0].clone());
            object_to_node(value)
        } else {
            expr
        }
    };

    modify_expr(quoted, &modify_func)
}

fn is_unquote_call(expr: &Expression) -> bool {
    if let Expression::Call(callee, _) = expr {
        **callee == Expression::Ident(String::from("unquote"))
    } else {
        false
    }
}

/// Translates an evaluation result back into AST for splicing. Values with
/// no literal form become the identifier `nil`, which evaluates to nil.
fn object_to_node(value: Object) -> Expression {
    match value {
        Object::Integer(value) => Expression::IntLiteral(value),
        Object::Boolean(value) => Expression::Boolean(value),
        Object::Quote(node) => node,
        _ => Expression::Ident(String::from("nil")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Infix;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn test_eval(input: &str) -> Object {
        let mut parser = Parser::new(Lexer::new(input));
        let program = parser.parse_program();
        assert_eq!(parser.errors(), &[] as &[String], "input: {input}");

        let mut evaluator = Evaluator::new();
        evaluator.eval_program(program)
    }

    #[test]
    fn test_quote() {
        let tests = vec![
            ("quote(5)", Object::Quote(Expression::IntLiteral(5))),
            (
                "quote(5 + 8)",
                Object::Quote(Expression::InfixExpr(
                    Infix::Plus,
                    Box::from(Expression::IntLiteral(5)),
                    Box::from(Expression::IntLiteral(8)),
                )),
            ),
            (
                "quote(foobar)",
                Object::Quote(Expression::Ident(String::from("foobar"))),
            ),
            (
                "quote(foobar + barfoo)",
                Object::Quote(Expression::InfixExpr(
                    Infix::Plus,
                    Box::from(Expression::Ident(String::from("foobar"))),
                    Box::from(Expression::Ident(String::from("barfoo"))),
                )),
            ),
        ];

        for (input, expected) in tests {
            assert_eq!(test_eval(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_quote_unquote() {
        let tests = vec![
            ("quote(unquote(4))", Object::Quote(Expression::IntLiteral(4))),
            (
                "quote(unquote(4 + 4))",
                Object::Quote(Expression::IntLiteral(8)),
            ),
            (
                "quote(8 + unquote(4 + 5))",
                Object::Quote(Expression::InfixExpr(
                    Infix::Plus,
                    Box::from(Expression::IntLiteral(8)),
                    Box::from(Expression::IntLiteral(9)),
                )),
            ),
            (
                "quote(unquote(4 + 5) + 8)",
                Object::Quote(Expression::InfixExpr(
                    Infix::Plus,
                    Box::from(Expression::IntLiteral(9)),
                    Box::from(Expression::IntLiteral(8)),
                )),
            ),
            (
                "var foobar = 8;
                quote(foobar)",
                Object::Quote(Expression::Ident(String::from("foobar"))),
            ),
            (
                "var foobar = 8;
                quote(unquote(foobar))",
                Object::Quote(Expression::IntLiteral(8)),
            ),
            (
                "quote(unquote(true))",
                Object::Quote(Expression::Boolean(true)),
            ),
            (
                "quote(unquote(true == false))",
                Object::Quote(Expression::Boolean(false)),
            ),
            (
                "quote(unquote(quote(4 + 4)))",
                Object::Quote(Expression::InfixExpr(
                    Infix::Plus,
                    Box::from(Expression::IntLiteral(4)),
                    Box::from(Expression::IntLiteral(4)),
                )),
            ),
            (
                "var quotedInfixExpression = quote(4 + 4);
                quote(unquote(4 + 4) + unquote(quotedInfixExpression))",
                Object::Quote(Expression::InfixExpr(
                    Infix::Plus,
                    Box::from(Expression::IntLiteral(8)),
                    Box::from(Expression::InfixExpr(
                        Infix::Plus,
                        Box::from(Expression::IntLiteral(4)),
                        Box::from(Expression::IntLiteral(4)),
                    )),
                )),
            ),
            // Unquote calls nested inside call arguments are found too.
            (
                "quote(add(unquote(2 + 2)))",
                Object::Quote(Expression::Call(
                    Box::from(Expression::Ident(String::from("add"))),
                    vec![Expression::IntLiteral(4)],
                )),
            ),
            // Values with no literal form splice as the nil identifier.
            (
                r#"quote(unquote("s"))"#,
                Object::Quote(Expression::Ident(String::from("nil"))),
            ),
        ];

        for (input, expected) in tests {
            assert_eq!(test_eval(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_quote_inspect() {
        let tests = vec![
            (
                "var q = quote(4 + 4)
                quote(unquote(4 + 4) + unquote(q))",
                "QUOTE((8 + (4 + 4)))",
            ),
            ("quote(foobar)", "QUOTE(foobar)"),
        ];

        for (input, expected) in tests {
            assert_eq!(test_eval(input).to_string(), expected, "input: {input}");
        }
    }

    #[test]
    fn test_quote_uses_live_environment() {
        // Unquote sees bindings made earlier in the same program.
        let input = "var a = 3; var b = 4; quote(unquote(a * b))";
        assert_eq!(
            test_eval(input),
            Object::Quote(Expression::IntLiteral(12))
        );
    }

    #[test]
    fn test_quote_without_argument() {
        assert_eq!(
            test_eval("quote()"),
            Object::Err(String::from("wrong number of arguments. got=0, want=1"))
        );
    }
}
