use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{Block, Expression, Infix, Prefix, Program, Statement};
use crate::evaluator::quote_unquote::quote;
use crate::object::builtin::builtins;
use crate::object::environment::Environment;
use crate::object::{MapPair, Object};

/// Single-threaded recursive walker over the AST. Runtime errors are
/// ordinary `Object::Err` values that short-circuit by propagation; the
/// evaluator itself never fails.
pub struct Evaluator {
    pub environment: Rc<RefCell<Environment>>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            environment: Rc::new(RefCell::new(Environment::new())),
        }
    }

    /// Evaluates against an existing environment, shared by reference.
    pub fn with_env(environment: Rc<RefCell<Environment>>) -> Self {
        Self { environment }
    }

    /// Program walker: `Return` short-circuits and is unwrapped here, so a
    /// top-level `return x` yields `x` as the program result.
    pub fn eval_program(&mut self, program: Program) -> Object {
        let mut result = Object::Nil;
        for statement in program {
            result = self.eval_statement(statement);

            match result {
                Object::Return(value) => return *value,
                Object::Err(_) => return result,
                _ => {}
            }
        }
        result
    }

    // Unlike the program walker this propagates `Return` unopened, so a
    // return inside nested blocks still escapes the enclosing function.
    fn eval_block(&mut self, statements: Block) -> Object {
        let mut result = Object::Nil;
        for statement in statements {
            result = self.eval_statement(statement);

            match result {
                Object::Return(_) | Object::Err(_) => return result,
                _ => {}
            }
        }
        result
    }

    fn eval_statement(&mut self, statement: Statement) -> Object {
        match statement {
            Statement::ExpressionStmt(expr) => self.eval_expr(expr),
            Statement::Var(name, expression) => {
                let value = self.eval_expr(expression);
                if is_error(&value) {
                    return value;
                }
                self.environment.borrow_mut().set(name, value);
                Object::Nil
            }
            Statement::Return(expression) => {
                let value = self.eval_expr(expression);
                if is_error(&value) {
                    return value;
                }
                Object::Return(Box::from(value))
            }
        }
    }

    pub fn eval_expr(&mut self, expr: Expression) -> Object {
        match expr {
            Expression::IntLiteral(value) => Object::Integer(value),
            Expression::StringLiteral(value) => Object::String(value),
            Expression::Boolean(value) => Object::Boolean(value),
            Expression::Ident(name) => self.eval_ident(&name),
            Expression::PrefixExpr(op, right) => {
                let right = self.eval_expr(*right);
                if is_error(&right) {
                    return right;
                }
                self.eval_prefix_expression(op, right)
            }
            Expression::InfixExpr(op, left, right) => {
                let left = self.eval_expr(*left);
                if is_error(&left) {
                    return left;
                }
                let right = self.eval_expr(*right);
                if is_error(&right) {
                    return right;
                }
                self.eval_infix_expression(op, left, right)
            }
            Expression::IfExpr(condition, consequence, alternative) => {
                self.eval_if_expression(*condition, consequence, alternative)
            }
            Expression::FuncLiteral(name, parameters, body) => {
                let function = Object::Function {
                    name: name.clone(),
                    parameters,
                    body,
                    env: Rc::clone(&self.environment),
                };
                // Functions bind themselves, which is what enables
                // recursion through the closure environment.
                self.environment.borrow_mut().set(name, function.clone());
                function
            }
            Expression::Call(callee, arguments) => self.eval_call_expression(*callee, arguments),
            Expression::ArrayLiteral(elements) => {
                let elements = self.eval_expressions(elements);
                if elements.len() == 1 && is_error(&elements[0]) {
                    return elements[0].clone();
                }
                Object::Array(elements)
            }
            Expression::IndexExpr(left, index) => {
                let left = self.eval_expr(*left);
                if is_error(&left) {
                    return left;
                }
                let index = self.eval_expr(*index);
                if is_error(&index) {
                    return index;
                }
                self.eval_index_expression(left, index)
            }
            Expression::MapLiteral(pairs) => self.eval_map_literal(pairs),
            // Macro definitions are collected by the pre-pass; one that
            // survives to evaluation has no value.
            Expression::MacroLiteral(_, _, _) => Object::Nil,
        }
    }

    fn eval_ident(&mut self, name: &str) -> Object {
        if let Some(value) = self.environment.borrow().get(name) {
            return value;
        }
        if let Some(value) = builtins().get(name) {
            return value.clone();
        }
        // Unknown identifiers are silently nil.
        Object::Nil
    }

    fn eval_prefix_expression(&mut self, op: Prefix, right: Object) -> Object {
        match op {
            Prefix::Bang => match right {
                Object::Boolean(value) => Object::Boolean(!value),
                Object::Nil => Object::Boolean(true),
                _ => Object::Boolean(false),
            },
            Prefix::Minus => match right {
                Object::Integer(value) => Object::Integer(value.wrapping_neg()),
                other => Object::Err(format!("unknown sub operator: {}", other.obj_type())),
            },
        }
    }

    fn eval_infix_expression(&mut self, op: Infix, left: Object, right: Object) -> Object {
        match (&left, &right) {
            (Object::Integer(l), Object::Integer(r)) => self.eval_integer_infix(op, *l, *r),
            _ if matches!(op, Infix::Eq | Infix::Neq)
                && left.obj_type() == right.obj_type() =>
            {
                // Same-type equality compares the printable form.
                let equal = left.to_string() == right.to_string();
                Object::Boolean(if op == Infix::Eq { equal } else { !equal })
            }
            (Object::String(l), Object::String(r)) => self.eval_string_infix(op, l, r),
            _ if left.obj_type() != right.obj_type() => Object::Err(format!(
                "type mismatch: {} {} {}",
                left.obj_type(),
                op,
                right.obj_type()
            )),
            _ => Object::Err(format!(
                "unknown infix operator: {} {} {}",
                left.obj_type(),
                op,
                right.obj_type()
            )),
        }
    }

    fn eval_integer_infix(&self, op: Infix, left: i64, right: i64) -> Object {
        match op {
            Infix::Plus => Object::Integer(left.wrapping_add(right)),
            Infix::Minus => Object::Integer(left.wrapping_sub(right)),
            Infix::Asterisk => Object::Integer(left.wrapping_mul(right)),
            Infix::Slash => {
                if right == 0 {
                    Object::Err(String::from("division by zero"))
                } else {
                    Object::Integer(left.wrapping_div(right))
                }
            }
            Infix::Lt => Object::Boolean(left < right),
            Infix::Gt => Object::Boolean(left > right),
            Infix::Eq => Object::Boolean(left == right),
            Infix::Neq => Object::Boolean(left != right),
            _ => Object::Err(format!("unknown infix operator: INT {} INT", op)),
        }
    }

    fn eval_string_infix(&self, op: Infix, left: &str, right: &str) -> Object {
        match op {
            Infix::Plus => Object::String(format!("{}{}", left, right)),
            _ => Object::Err(format!("unknown infix operator: STRING {} STRING", op)),
        }
    }

    fn eval_if_expression(
        &mut self,
        condition: Expression,
        consequence: Block,
        alternative: Option<Block>,
    ) -> Object {
        let condition = self.eval_expr(condition);
        if is_error(&condition) {
            return condition;
        }
        if is_truthy(&condition) {
            self.eval_block(consequence)
        } else if let Some(alternative) = alternative {
            self.eval_block(alternative)
        } else {
            Object::Nil
        }
    }

    fn eval_call_expression(&mut self, callee: Expression, arguments: Vec<Expression>) -> Object {
        // `quote` suppresses evaluation of its argument entirely.
        if callee == Expression::Ident(String::from("quote")) {
            return match arguments.into_iter().next() {
                Some(argument) => quote(argument, Rc::clone(&self.environment)),
                None => Object::Err(String::from("wrong number of arguments. got=0, want=1")),
            };
        }

        let function = self.eval_expr(callee);
        if is_error(&function) {
            return function;
        }

        let arguments = self.eval_expressions(arguments);
        if arguments.len() == 1 && is_error(&arguments[0]) {
            return arguments[0].clone();
        }

        self.apply_function(function, arguments)
    }

    fn apply_function(&mut self, function: Object, arguments: Vec<Object>) -> Object {
        match function {
            Object::Function {
                parameters,
                body,
                env,
                ..
            } => {
                if parameters.len() != arguments.len() {
                    return Object::Err(format!(
                        "wrong number of arguments. got={}, want={}",
                        arguments.len(),
                        parameters.len()
                    ));
                }
                let mut scope = Environment::new_enclosed(env);
                for (parameter, argument) in parameters.into_iter().zip(arguments) {
                    scope.set(parameter, argument);
                }
                let mut evaluator = Evaluator::with_env(Rc::new(RefCell::new(scope)));
                let evaluated = evaluator.eval_block(body);
                unwrap_return(evaluated)
            }
            Object::Builtin(function) => function(arguments),
            _ => Object::Err(String::from("not a function")),
        }
    }

    fn eval_expressions(&mut self, exprs: Vec<Expression>) -> Vec<Object> {
        let mut result = vec![];
        for expr in exprs {
            let evaluated = self.eval_expr(expr);
            if is_error(&evaluated) {
                // A single error element signals the failure upward.
                return vec![evaluated];
            }
            result.push(evaluated);
        }
        result
    }

    fn eval_index_expression(&self, left: Object, index: Object) -> Object {
        match (left, index) {
            (Object::Array(elements), Object::Integer(idx)) => {
                let max = elements.len() as i64 - 1;
                if idx < 0 || idx > max {
                    return Object::Nil;
                }
                elements[idx as usize].clone()
            }
            (Object::Map(elements), index) => match index.map_key() {
                Some(key) => match elements.get(&key) {
                    Some(pair) => pair.value.clone(),
                    None => Object::Nil,
                },
                None => Object::Err(format!("unhashable type: {}", index.obj_type())),
            },
            (left, _) => Object::Err(format!(
                "index operator not supported: {}",
                left.obj_type()
            )),
        }
    }

    fn eval_map_literal(&mut self, pairs: Vec<(Expression, Expression)>) -> Object {
        let mut elements = HashMap::new();

        for (key_expr, value_expr) in pairs {
            let key = self.eval_expr(key_expr);
            if is_error(&key) {
                return key;
            }
            let map_key = match key.map_key() {
                Some(map_key) => map_key,
                None => {
                    return Object::Err(format!("unable to hash key: {}", key.obj_type()))
                }
            };

            let value = self.eval_expr(value_expr);
            if is_error(&value) {
                return value;
            }

            elements.insert(map_key, MapPair { key, value });
        }

        Object::Map(elements)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn is_error(value: &Object) -> bool {
    matches!(value, Object::Err(_))
}

fn is_truthy(value: &Object) -> bool {
    match value {
        Object::Nil => false,
        Object::Boolean(value) => *value,
        _ => true,
    }
}

fn unwrap_return(value: Object) -> Object {
    match value {
        Object::Return(inner) => *inner,
        other => other,
    }
}
