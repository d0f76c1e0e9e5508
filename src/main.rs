use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use spl::{lexer, parser, Interpreter, Value};

/// Interpreter for the SPL toy language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script to execute; an interactive session starts when omitted.
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    match args.file {
        Some(path) => run_file(&path),
        None => repl(),
    }
}

fn run_file(path: &Path) -> Result<()> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    let mut interpreter = Interpreter::new();
    let result = run_source(&mut interpreter, &source);
    // Output accumulated before a failure is still shown.
    for line in interpreter.take_output() {
        println!("{line}");
    }
    result?;
    Ok(())
}

fn repl() -> Result<()> {
    println!("SPL interactive session ('quit' to exit)");
    let stdin = io::stdin();
    let mut interpreter = Interpreter::new();
    let mut input = String::new();

    loop {
        print!(">>> ");
        io::stdout().flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit" | "q") {
            break;
        }

        // One long-lived interpreter, so variables persist across lines;
        // an error only aborts the current line.
        match run_source(&mut interpreter, line) {
            Ok(result) => {
                for out in interpreter.take_output() {
                    println!("{out}");
                }
                if let Some(value) = result {
                    println!("{value}");
                }
            }
            Err(error) => {
                for out in interpreter.take_output() {
                    println!("{out}");
                }
                eprintln!("Error: {error}");
            }
        }
    }

    Ok(())
}

fn run_source(interpreter: &mut Interpreter, source: &str) -> Result<Option<Value>> {
    let tokens = lexer::tokenize(source)?;
    let program = parser::parse(tokens)?;
    Ok(interpreter.run(&program)?)
}
