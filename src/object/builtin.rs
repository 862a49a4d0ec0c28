use std::collections::HashMap;

use crate::object::{BuiltinFn, Object};

/// Table of native functions consulted after environment lookup misses.
pub fn builtins() -> HashMap<&'static str, Object> {
    HashMap::from([
        ("len", Object::Builtin(builtin_len as BuiltinFn)),
        ("print", Object::Builtin(builtin_print as BuiltinFn)),
    ])
}

fn builtin_len(args: Vec<Object>) -> Object {
    if args.len() != 1 {
        return Object::Err(format!(
            "wrong number of arguments. got={}, want=1",
            args.len()
        ));
    }
    match &args[0] {
        // Byte length, not character count.
        Object::String(value) => Object::Integer(value.len() as i64),
        Object::Array(elements) => Object::Integer(elements.len() as i64),
        Object::Map(elements) => Object::Integer(elements.len() as i64),
        other => Object::Err(format!(
            "argument to `len` not supported, got {}",
            other.obj_type()
        )),
    }
}

fn builtin_print(args: Vec<Object>) -> Object {
    for arg in &args {
        println!("{}", arg);
    }
    Object::Nil
}
