use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use crate::evaluator::eval::Evaluator;
use crate::evaluator::macro_expansion::{define_macros, expand_macros};
use crate::lexer::Lexer;
use crate::object::environment::Environment;
use crate::object::Object;
use crate::parser::Parser;
use anyhow::Result;

const PROMPT: &str = ">> ";

/// Interactive loop. The value environment and the macro environment both
/// survive across lines, so definitions from earlier inputs stay visible.
pub fn start() -> Result<()> {
    let env = Rc::new(RefCell::new(Environment::new()));
    let macro_env = Rc::new(RefCell::new(Environment::new()));

    println!("gibbon {}", env!("CARGO_PKG_VERSION"));
    let stdin = io::stdin();
    loop {
        print!("{}", PROMPT);
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let mut parser = Parser::new(Lexer::new(&line));
        let mut program = parser.parse_program();
        if !parser.errors().is_empty() {
            for error in parser.errors() {
                println!("\t{}", error);
            }
            continue;
        }

        define_macros(&mut program, &macro_env);
        let expanded = expand_macros(program, &macro_env);

        let mut evaluator = Evaluator::with_env(Rc::clone(&env));
        let result = evaluator.eval_program(expanded);
        if result != Object::Nil {
            println!("{}", result);
        }
    }
}
