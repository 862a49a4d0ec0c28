pub mod ast;
pub mod evaluator;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod repl;
pub mod token;

use std::cell::RefCell;
use std::rc::Rc;

use evaluator::eval::Evaluator;
use evaluator::macro_expansion::{define_macros, expand_macros};
use lexer::Lexer;
use object::environment::Environment;
use object::Object;
use parser::Parser;

/// Runs the whole pipeline over one source text: parse, macro pre-pass,
/// macro expansion, evaluation. Parse errors abort before evaluation and
/// are returned as the parser accumulated them.
pub fn eval_source(input: &str) -> Result<Object, Vec<String>> {
    let mut parser = Parser::new(Lexer::new(input));
    let mut program = parser.parse_program();
    if !parser.errors().is_empty() {
        return Err(parser.errors().to_vec());
    }

    let macro_env = Rc::new(RefCell::new(Environment::new()));
    define_macros(&mut program, &macro_env);
    let expanded = expand_macros(program, &macro_env);

    let mut evaluator = Evaluator::new();
    Ok(evaluator.eval_program(expanded))
}
