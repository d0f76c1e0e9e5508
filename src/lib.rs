//! Interpreter for SPL, a small Python-flavored toy language.
//!
//! Three stages, consumed in order: [`lexer::tokenize`] turns source text
//! into tokens, [`parser::parse`] builds the AST, and an [`Interpreter`]
//! walks it against a mutable variable environment.

pub mod ast;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod token;

pub use interpreter::{Interpreter, RuntimeError, Value};
pub use lexer::LexError;
pub use parser::ParseError;

use anyhow::Result;

/// Runs `source` through all three stages with a fresh interpreter,
/// returning the final value (if the last statement produced one) and the
/// printed output lines.
///
/// ```
/// let (result, output) = spl::run("x = 2\nprint(x + 3)").unwrap();
/// assert!(result.is_none());
/// assert_eq!(output, vec!["5".to_string()]);
/// ```
pub fn run(source: &str) -> Result<(Option<Value>, Vec<String>)> {
    let tokens = lexer::tokenize(source)?;
    let program = parser::parse(tokens)?;
    let mut interpreter = Interpreter::new();
    let result = interpreter.run(&program)?;
    Ok((result, interpreter.take_output()))
}
