use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::modify::modify_program;
use crate::ast::{Expression, Program, Statement};
use crate::evaluator::eval::Evaluator;
use crate::object::environment::Environment;
use crate::object::Object;

/// Pre-pass over the top-level statement list: every expression statement
/// holding a macro literal is registered in the macro environment and
/// removed from the program in place, preserving the order of the rest.
/// The macro environment is distinct from the value environment.
pub fn define_macros(program: &mut Program, env: &Rc<RefCell<Environment>>) {
    let mut definitions = vec![];

    for (i, statement) in program.iter().enumerate() {
        if let Statement::ExpressionStmt(Expression::MacroLiteral(name, parameters, body)) =
            statement
        {
            let macro_obj = Object::Macro {
                parameters: parameters.clone(),
                body: body.clone(),
                env: Rc::clone(env),
            };
            env.borrow_mut().set(name.clone(), macro_obj);
            definitions.push(i);
        }
    }

    for i in definitions.iter().rev() {
        program.remove(*i);
    }
}

/// Rewrites every call to a registered macro: arguments are wrapped
/// unevaluated in `Quote` values, bound positionally in a child of the
/// macro's captured environment, and the body is evaluated. The body must
/// produce a `Quote`; its node replaces the call site. Expansion is a
/// single pass, so macro calls produced by an expansion are not
/// re-expanded.
///
/// # Panics
///
/// A macro body that evaluates to anything but a `Quote` is a programmer
/// error and aborts.
pub fn expand_macros(program: Program, env: &Rc<RefCell<Environment>>) -> Program {
    let modify_func = |expr: Expression| {
        let (parameters, body, macro_env) = match macro_call(&expr, env) {
            Some(found) => found,
            None => return expr,
        };

        let args = match &expr {
            Expression::Call(_, args) => args.clone(),
            _ => unreachable!(),
        };

        let mut scope = Environment::new_enclosed(macro_env);
        for (parameter, arg) in parameters.into_iter().zip(args) {
            scope.set(parameter, Object::Quote(arg));
        }

        let mut evaluator = Evaluator::with_env(Rc::new(RefCell::new(scope)));
        match evaluator.eval_program(body) {
            Object::Quote(node) => node,
            other => panic!("invalid macro return value: {}", other.obj_type()),
        }
    };

    modify_program(program, &modify_func)
}

fn macro_call(
    expr: &Expression,
    env: &Rc<RefCell<Environment>>,
) -> Option<(Vec<String>, Program, Rc<RefCell<Environment>>)> {
    let Expression::Call(callee, _) = expr else {
        return None;
    };
    let Expression::Ident(name) = callee.as_ref() else {
        return None;
    };
    match env.borrow().get(name) {
        Some(Object::Macro {
            parameters,
            body,
            env,
        }) => Some((parameters, body, env)),
        _ => None,
    }
}
