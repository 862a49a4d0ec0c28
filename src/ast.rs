use std::fmt;

pub mod modify;

pub type Block = Vec<Statement>;

pub type Program = Vec<Statement>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    Var(String, Expression),
    Return(Expression),
    ExpressionStmt(Expression),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expression {
    Ident(String),
    IntLiteral(i64),
    StringLiteral(String),
    Boolean(bool),
    ArrayLiteral(Vec<Expression>),
    /// Key-value pairs in source order; duplicate keys are not detected
    /// until evaluation, where later pairs overwrite earlier ones.
    MapLiteral(Vec<(Expression, Expression)>),
    PrefixExpr(Prefix, Box<Expression>),
    InfixExpr(Infix, Box<Expression>, Box<Expression>),
    /// The alternative is absent for `if` without `else`, distinct from an
    /// empty `else` block.
    IfExpr(Box<Expression>, Block, Option<Block>),
    /// Functions are always named: `func name(params) { body }`.
    FuncLiteral(String, Vec<String>, Block),
    Call(Box<Expression>, Vec<Expression>),
    IndexExpr(Box<Expression>, Box<Expression>),
    /// Macros are always named: `macro name(params) { body }`.
    MacroLiteral(String, Vec<String>, Block),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prefix {
    Minus,
    Bang,
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minus => write!(f, "-"),
            Self::Bang => write!(f, "!"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Infix {
    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    Lt,
    Gt,
    Leq,
    Geq,
    Eq,
    Neq,
    Assign,
}

impl fmt::Display for Infix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Asterisk => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Percent => write!(f, "%"),
            Self::Lt => write!(f, "<"),
            Self::Gt => write!(f, ">"),
            Self::Leq => write!(f, "<="),
            Self::Geq => write!(f, ">="),
            Self::Eq => write!(f, "=="),
            Self::Neq => write!(f, "!="),
            Self::Assign => write!(f, "="),
        }
    }
}

/// Canonical form of a statement list. Statements are joined with `"; "`
/// so the rendered text re-parses to the same list.
pub fn block_to_string(block: &[Statement]) -> String {
    block
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var(name, value) => write!(f, "var {} = {}", name, value),
            Self::Return(value) => write!(f, "return {}", value),
            Self::ExpressionStmt(expr) => write!(f, "{}", expr),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "{}", name),
            Self::IntLiteral(value) => write!(f, "{}", value),
            Self::StringLiteral(value) => write!(f, "{}", value),
            Self::Boolean(value) => write!(f, "{}", value),
            Self::ArrayLiteral(elements) => {
                let elements: Vec<String> = elements.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", elements.join(", "))
            }
            Self::MapLiteral(pairs) => {
                let pairs: Vec<String> = pairs
                    .iter()
                    .map(|(key, value)| format!("{}:{}", key, value))
                    .collect();
                write!(f, "{{{}}}", pairs.join(", "))
            }
            Self::PrefixExpr(op, right) => write!(f, "({}{})", op, right),
            Self::InfixExpr(op, left, right) => write!(f, "({} {} {})", left, op, right),
            Self::IfExpr(condition, consequence, alternative) => {
                // The condition gets its own parentheses and the branches
                // their braces, so the canonical text stays parseable.
                write!(f, "if ({}) {{{}}}", condition, block_to_string(consequence))?;
                if let Some(alternative) = alternative {
                    write!(f, " else {{{}}}", block_to_string(alternative))?;
                }
                Ok(())
            }
            Self::FuncLiteral(name, params, body) => {
                write!(
                    f,
                    "func {}({}) {{{}}}",
                    name,
                    params.join(", "),
                    block_to_string(body)
                )
            }
            Self::Call(callee, args) => {
                let args: Vec<String> = args.iter().map(ToString::to_string).collect();
                write!(f, "{}({})", callee, args.join(", "))
            }
            Self::IndexExpr(left, index) => write!(f, "({}[{}])", left, index),
            Self::MacroLiteral(name, params, body) => {
                write!(
                    f,
                    "macro {}({}) {{{}}}",
                    name,
                    params.join(", "),
                    block_to_string(body)
                )
            }
        }
    }
}
