pub mod eval;
pub mod macro_expansion;
pub mod quote_unquote;
