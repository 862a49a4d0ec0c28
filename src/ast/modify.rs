use crate::ast::{Expression, Program, Statement};

pub type ModifyFn<'a> = &'a dyn Fn(Expression) -> Expression;

/// Generic top-down rewriter: every expression has its children rebuilt
/// first, then `func` applied to the rebuilt node. Statement and program
/// walkers thread the same function through every expression position.
pub fn modify_program(program: Program, func: ModifyFn) -> Program {
    modify_statements(program, func)
}

pub fn modify_statements(statements: Vec<Statement>, func: ModifyFn) -> Vec<Statement> {
    statements
        .into_iter()
        .map(|statement| modify_statement(statement, func))
        .collect()
}

pub fn modify_statement(statement: Statement, func: ModifyFn) -> Statement {
    match statement {
        Statement::Var(name, value) => Statement::Var(name, modify_expr(value, func)),
        Statement::Return(value) => Statement::Return(modify_expr(value, func)),
        Statement::ExpressionStmt(expr) => Statement::ExpressionStmt(modify_expr(expr, func)),
    }
}

pub fn modify_exprs(exprs: Vec<Expression>, func: ModifyFn) -> Vec<Expression> {
    exprs.into_iter().map(|expr| modify_expr(expr, func)).collect()
}

pub fn modify_expr(expr: Expression, func: ModifyFn) -> Expression {
    let expr = match expr {
        Expression::InfixExpr(op, left, right) => Expression::InfixExpr(
            op,
            Box::from(modify_expr(*left, func)),
            Box::from(modify_expr(*right, func)),
        ),
        Expression::PrefixExpr(op, right) => {
            Expression::PrefixExpr(op, Box::from(modify_expr(*right, func)))
        }
        Expression::IndexExpr(left, index) => Expression::IndexExpr(
            Box::from(modify_expr(*left, func)),
            Box::from(modify_expr(*index, func)),
        ),
        Expression::IfExpr(condition, consequence, alternative) => Expression::IfExpr(
            Box::from(modify_expr(*condition, func)),
            modify_statements(consequence, func),
            alternative.map(|block| modify_statements(block, func)),
        ),
        Expression::FuncLiteral(name, params, body) => {
            Expression::FuncLiteral(name, params, modify_statements(body, func))
        }
        Expression::MacroLiteral(name, params, body) => {
            Expression::MacroLiteral(name, params, modify_statements(body, func))
        }
        Expression::ArrayLiteral(elements) => {
            Expression::ArrayLiteral(modify_exprs(elements, func))
        }
        // Key identity may change, so the pair collection is rebuilt.
        Expression::MapLiteral(pairs) => Expression::MapLiteral(
            pairs
                .into_iter()
                .map(|(key, value)| (modify_expr(key, func), modify_expr(value, func)))
                .collect(),
        ),
        Expression::Call(callee, args) => Expression::Call(
            Box::from(modify_expr(*callee, func)),
            modify_exprs(args, func),
        ),
        other => other,
    };

    func(expr)
}
