use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use gibbon::object::Object;

/// Tree-walking interpreter for the gibbon scripting language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script to evaluate; starts a REPL when omitted.
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let Some(path) = args.script else {
        return gibbon::repl::start();
    };

    let source = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    match gibbon::eval_source(&source) {
        Ok(Object::Err(error)) => bail!("runtime error: {}", error),
        Ok(Object::Nil) => Ok(()),
        Ok(value) => {
            println!("{}", value);
            Ok(())
        }
        Err(errors) => {
            for error in &errors {
                eprintln!("parse error: {}", error);
            }
            bail!("{} parse error(s) in {}", errors.len(), path.display());
        }
    }
}
