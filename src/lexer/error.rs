use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexError {
    #[error("Unexpected character '{character}' at line {line}, column {column}")]
    UnexpectedCharacter {
        character: char,
        line: usize,
        column: usize,
    },
    #[error("Unterminated string literal at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },
    #[error("Malformed number literal '{literal}' at line {line}, column {column}")]
    MalformedNumber {
        literal: String,
        line: usize,
        column: usize,
    },
    #[error("Incomplete expression: trailing operator '{operator}' at line {line}, column {column}")]
    TrailingOperator {
        operator: char,
        line: usize,
        column: usize,
    },
}

pub type LexResult<T> = Result<T, LexError>;
