use std::iter::Peekable;
use std::str::Chars;

use crate::token::{Span, Token, TokenKind};

mod error;

pub use error::{LexError, LexResult};

/// Reclassifies an identifier that matches the fixed keyword table.
/// Lookup is case-sensitive; `def` is reserved but has no grammar yet.
fn keyword(ident: &str) -> Option<TokenKind> {
    match ident {
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "while" => Some(TokenKind::While),
        "def" => Some(TokenKind::Def),
        "print" => Some(TokenKind::Print),
        _ => None,
    }
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    pub fn next_token(&mut self) -> LexResult<Token> {
        loop {
            let Some(&ch) = self.chars.peek() else {
                return Ok(Token::new(TokenKind::EOF, self.position()));
            };

            let span = self.position();
            match ch {
                ' ' | '\t' => {
                    self.advance();
                }
                '#' => self.skip_comment(),
                // The newline token keeps the line number of the line it ends.
                '\n' => {
                    self.advance();
                    return Ok(Token::new(TokenKind::Newline, span));
                }
                '"' | '\'' => return self.read_string(ch),
                c if c.is_ascii_digit() || c == '.' => return self.read_number(),
                c if c.is_alphabetic() || c == '_' => return Ok(self.read_identifier()),
                '+' => return Ok(self.single(TokenKind::Plus)),
                '-' => return Ok(self.single(TokenKind::Minus)),
                '*' => return Ok(self.single(TokenKind::Star)),
                '/' => return Ok(self.single(TokenKind::Slash)),
                '(' => return Ok(self.single(TokenKind::LParen)),
                ')' => return Ok(self.single(TokenKind::RParen)),
                '=' => return Ok(self.single(TokenKind::Assign)),
                '>' => return Ok(self.single(TokenKind::Greater)),
                '<' => return Ok(self.single(TokenKind::Less)),
                ':' => return Ok(self.single(TokenKind::Colon)),
                ',' => return Ok(self.single(TokenKind::Comma)),
                other => {
                    return Err(LexError::UnexpectedCharacter {
                        character: other,
                        line: span.line,
                        column: span.column,
                    });
                }
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let span = self.position();
        self.advance();
        Token::new(kind, span)
    }

    fn skip_comment(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn read_number(&mut self) -> LexResult<Token> {
        let span = self.position();
        let mut literal = String::new();
        let mut decimal_points = 0;

        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                literal.push(c);
                self.advance();
            } else if c == '.' {
                decimal_points += 1;
                literal.push(c);
                self.advance();
            } else {
                break;
            }
        }

        // A literal that runs straight into a name (`123abc`) is rejected,
        // with the whole run reported back to the user.
        if matches!(self.chars.peek(), Some(&c) if c.is_alphabetic() || c == '_') {
            while let Some(&c) = self.chars.peek() {
                if c.is_alphanumeric() || c == '_' {
                    literal.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
            return Err(self.malformed_number(literal, span));
        }

        if decimal_points > 1 || !literal.chars().any(|c| c.is_ascii_digit()) {
            return Err(self.malformed_number(literal, span));
        }

        let value = literal
            .parse::<f64>()
            .map_err(|_| self.malformed_number(literal.clone(), span))?;
        Ok(Token::new(TokenKind::Number(value), span))
    }

    fn malformed_number(&self, literal: String, span: Span) -> LexError {
        LexError::MalformedNumber {
            literal,
            line: span.line,
            column: span.column,
        }
    }

    fn read_string(&mut self, quote: char) -> LexResult<Token> {
        let span = self.position();
        self.advance(); // opening quote

        let mut value = String::new();
        loop {
            let Some(c) = self.advance() else {
                return Err(LexError::UnterminatedString {
                    line: span.line,
                    column: span.column,
                });
            };
            if c == quote {
                return Ok(Token::new(TokenKind::String(value), span));
            }
            if c == '\\' {
                let Some(escaped) = self.advance() else {
                    return Err(LexError::UnterminatedString {
                        line: span.line,
                        column: span.column,
                    });
                };
                match escaped {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    // `\\`, `\"`, `\'` and anything else: the backslash is
                    // dropped and the character kept as-is.
                    other => value.push(other),
                }
            } else {
                value.push(c);
            }
        }
    }

    fn read_identifier(&mut self) -> Token {
        let span = self.position();
        let mut ident = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }

        let kind = keyword(&ident).unwrap_or(TokenKind::Identifier(ident));
        Token::new(kind, span)
    }

    fn advance(&mut self) -> Option<char> {
        let next = self.chars.next();
        if let Some(c) = next {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        next
    }

    fn position(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
        }
    }
}

/// Tokenizes `source` into a sequence terminated by a single EOF token.
pub fn tokenize(source: &str) -> LexResult<Vec<Token>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let is_eof = matches!(token.kind, TokenKind::EOF);
        tokens.push(token);
        if is_eof {
            break;
        }
    }

    // Whole-stream check: an arithmetic operator directly before EOF can
    // never start a well-formed statement continuation.
    if tokens.len() >= 2 {
        let last = &tokens[tokens.len() - 2];
        let operator = match last.kind {
            TokenKind::Plus => Some('+'),
            TokenKind::Minus => Some('-'),
            TokenKind::Star => Some('*'),
            TokenKind::Slash => Some('/'),
            _ => None,
        };
        if let Some(operator) = operator {
            return Err(LexError::TrailingOperator {
                operator,
                line: last.span.line,
                column: last.span.column,
            });
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .expect("tokenize should succeed")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn tokenizes_number_literals() {
        assert_eq!(
            kinds("42"),
            vec![TokenKind::Number(42.0), TokenKind::EOF]
        );
        assert_eq!(
            kinds("3.14"),
            vec![TokenKind::Number(3.14), TokenKind::EOF]
        );
    }

    #[test]
    fn rejects_number_with_multiple_decimal_points() {
        let err = tokenize("2.5.3").expect_err("expected lexing failure");
        assert_eq!(
            err,
            LexError::MalformedNumber {
                literal: "2.5.3".to_string(),
                line: 1,
                column: 1,
            }
        );
    }

    #[test]
    fn rejects_number_followed_by_letters() {
        let err = tokenize("123abc").expect_err("expected lexing failure");
        assert_eq!(
            err,
            LexError::MalformedNumber {
                literal: "123abc".to_string(),
                line: 1,
                column: 1,
            }
        );
    }

    #[test]
    fn rejects_lone_decimal_point() {
        let err = tokenize("x = .").expect_err("expected lexing failure");
        assert_eq!(
            err,
            LexError::MalformedNumber {
                literal: ".".to_string(),
                line: 1,
                column: 5,
            }
        );
    }

    #[test]
    fn rejects_unterminated_string() {
        let err = tokenize("\"unterminated").expect_err("expected lexing failure");
        assert_eq!(
            err,
            LexError::UnterminatedString { line: 1, column: 1 }
        );
    }

    #[test]
    fn reads_string_escape_sequences() {
        assert_eq!(
            kinds(r#""a\n\t\\\"b""#),
            vec![
                TokenKind::String("a\n\t\\\"b".to_string()),
                TokenKind::EOF
            ]
        );
    }

    #[test]
    fn reads_single_quoted_strings() {
        assert_eq!(
            kinds(r"'it\'s'"),
            vec![TokenKind::String("it's".to_string()), TokenKind::EOF]
        );
    }

    #[test]
    fn unknown_escape_drops_the_backslash() {
        assert_eq!(
            kinds(r#""a\qb""#),
            vec![TokenKind::String("aqb".to_string()), TokenKind::EOF]
        );
    }

    #[test]
    fn reclassifies_keywords_case_sensitively() {
        assert_eq!(
            kinds("if else while def print If"),
            vec![
                TokenKind::If,
                TokenKind::Else,
                TokenKind::While,
                TokenKind::Def,
                TokenKind::Print,
                TokenKind::Identifier("If".to_string()),
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn tokenizes_operators_and_delimiters() {
        assert_eq!(
            kinds("+ - * / ( ) = > < : ,"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Assign,
                TokenKind::Greater,
                TokenKind::Less,
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn tracks_line_and_column_positions() {
        let tokens = tokenize("a = 1\nbc = 2").expect("tokenize should succeed");
        let positions = tokens
            .iter()
            .map(|token| (token.span.line, token.span.column))
            .collect::<Vec<_>>();
        // a, =, 1, newline, bc, =, 2, EOF
        assert_eq!(
            positions,
            vec![
                (1, 1),
                (1, 3),
                (1, 5),
                (1, 6),
                (2, 1),
                (2, 4),
                (2, 6),
                (2, 7),
            ]
        );
    }

    #[test]
    fn skips_comments_to_end_of_line() {
        let source = indoc! {"
            x = 1 # first
            # a whole comment line
            y = 2
        "};
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Identifier("x".to_string()),
                TokenKind::Assign,
                TokenKind::Number(1.0),
                TokenKind::Newline,
                TokenKind::Newline,
                TokenKind::Identifier("y".to_string()),
                TokenKind::Assign,
                TokenKind::Number(2.0),
                TokenKind::Newline,
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn rejects_trailing_operator_before_eof() {
        let err = tokenize("1 +").expect_err("expected lexing failure");
        assert_eq!(
            err,
            LexError::TrailingOperator {
                operator: '+',
                line: 1,
                column: 3,
            }
        );
    }

    #[test]
    fn trailing_operator_check_only_applies_directly_before_eof() {
        // A newline between the operator and EOF is accepted; the parser
        // reports the dangling expression instead.
        assert!(tokenize("1 *\n").is_ok());
    }

    #[test]
    fn rejects_unexpected_character() {
        let err = tokenize("x = 1 @ 2").expect_err("expected lexing failure");
        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                character: '@',
                line: 1,
                column: 7,
            }
        );
    }

    #[test]
    fn tokenize_is_deterministic() {
        let source = "x = 1 + 2\nprint(x)";
        assert_eq!(tokenize(source), tokenize(source));
    }
}
