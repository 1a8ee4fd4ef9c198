use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::ast::{Span, Token};

/// Errors raised while splitting source text into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at byte {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("unterminated string starting at byte {start}")]
    UnterminatedString { start: usize },

    #[error("unterminated template interpolation starting at byte {start}")]
    UnterminatedInterpolation { start: usize },

    #[error("unterminated comment starting at byte {start}")]
    UnterminatedComment { start: usize },

    #[error("unterminated heredoc '{marker}' starting at byte {start}")]
    UnterminatedHeredoc { marker: String, start: usize },
}

pub struct Lexer<'a> {
    source: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            position: 0,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    fn rest(&self) -> &'a str {
        &self.source[self.position..]
    }

    fn current_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.rest().chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += ch.len_utf8();
        }
    }

    /// Skip spaces and comments. Line breaks are tokens and stay put.
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.current_char() {
                Some(' ' | '\t' | '\r') => self.advance(),
                Some('#') => self.skip_line_comment(),
                Some('/') if self.peek_char(1) == Some('/') => self.skip_line_comment(),
                Some('/') if self.peek_char(1) == Some('*') => {
                    let start = self.position;
                    match self.rest()[2..].find("*/") {
                        Some(end) => self.position += 2 + end + 2,
                        None => return Err(LexError::UnterminatedComment { start }),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn read_identifier(&mut self) -> String {
        let start = self.position;
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                self.advance();
            } else {
                break;
            }
        }
        self.source[start..self.position].to_string()
    }

    /// Read a quoted template, returning the raw text between the quotes.
    fn read_quoted(&mut self) -> Result<String, LexError> {
        let start = self.position;
        self.advance(); // Consume opening quote
        let body_start = self.position;

        loop {
            match self.current_char() {
                None | Some('\n') => return Err(LexError::UnterminatedString { start }),
                Some('"') => {
                    let raw = self.source[body_start..self.position].to_string();
                    self.advance();
                    return Ok(raw);
                }
                Some('\\') => {
                    self.advance();
                    if self.current_char().is_none() {
                        return Err(LexError::UnterminatedString { start });
                    }
                    self.advance();
                }
                // `$${` and `%%{` are escapes, not interpolations
                Some('$' | '%') if self.peek_char(1) == self.current_char()
                    && self.peek_char(2) == Some('{') =>
                {
                    self.position += 3;
                }
                Some('$' | '%') if self.peek_char(1) == Some('{') => {
                    let interpolation_start = self.position;
                    self.position += 2;
                    let len = interpolation_len(self.rest()).ok_or(
                        LexError::UnterminatedInterpolation {
                            start: interpolation_start,
                        },
                    )?;
                    self.position += len;
                }
                Some(_) => self.advance(),
            }
        }
    }

    fn read_heredoc(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        self.position += 2; // Consume `<<`

        let strip_indent = self.current_char() == Some('-');
        if strip_indent {
            self.advance();
        }

        let marker = match self.current_char() {
            Some(ch) if ch.is_alphabetic() || ch == '_' => self.read_identifier(),
            Some(ch) => {
                return Err(LexError::UnexpectedCharacter {
                    ch,
                    position: self.position,
                });
            }
            None => {
                return Err(LexError::UnterminatedHeredoc {
                    marker: String::new(),
                    start,
                });
            }
        };

        match self.rest().find('\n') {
            Some(eol) if self.rest()[..eol].trim().is_empty() => self.position += eol + 1,
            _ => return Err(LexError::UnterminatedHeredoc { marker, start }),
        }

        let content_start = self.position;
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Err(LexError::UnterminatedHeredoc { marker, start });
            }
            let line_len = rest.find('\n').unwrap_or(rest.len());
            let line = &rest[..line_len];
            if line.trim() == marker {
                let raw = &self.source[content_start..self.position];
                // Leave the closing line break for the next token
                self.position += line.trim_end().len();
                let content = if strip_indent {
                    strip_common_indent(raw)
                } else {
                    raw.to_string()
                };
                return Ok(Token::Heredoc {
                    content,
                    strip_indent,
                });
            }
            self.position += (line_len + 1).min(rest.len());
        }
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut scientific = false;

        while self.current_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.current_char() == Some('.')
            && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.advance();
            while self.current_char().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.current_char(), Some('e' | 'E')) {
            let digits_at = match self.peek_char(1) {
                Some('+' | '-') => 2,
                _ => 1,
            };
            if self.peek_char(digits_at).is_some_and(|c| c.is_ascii_digit()) {
                scientific = true;
                for _ in 0..digits_at {
                    self.advance();
                }
                while self.current_char().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        // The scan above only admits well-formed literals, so a failed parse
        // means the value is out of decimal range
        let literal = &self.source[start..self.position];
        let parsed = if scientific {
            Decimal::from_scientific(literal)
        } else {
            Decimal::from_str(literal)
        };
        Ok(match parsed {
            Ok(n) => Token::Number(n.normalize()),
            Err(_) => Token::RawNumber(literal.to_string()),
        })
    }

    /// Consume `len` characters and yield `token`.
    fn single(&mut self, len: usize, token: Token) -> Result<Token, LexError> {
        for _ in 0..len {
            self.advance();
        }
        Ok(token)
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.next_spanned().map(|(token, _)| token)
    }

    /// Produce the next token together with the bytes it covers.
    pub fn next_spanned(&mut self) -> Result<(Token, Span), LexError> {
        self.skip_trivia()?;
        let start = self.position;
        let token = self.lex_token()?;
        Ok((token, Span::new(start, self.position)))
    }

    fn lex_token(&mut self) -> Result<Token, LexError> {
        let Some(ch) = self.current_char() else {
            return Ok(Token::Eof);
        };

        match ch {
            '\n' => self.single(1, Token::Newline),
            '+' => self.single(1, Token::Plus),
            '-' => self.single(1, Token::Minus),
            '*' => self.single(1, Token::Star),
            '/' => self.single(1, Token::Slash),
            '%' => self.single(1, Token::Percent),
            '?' => self.single(1, Token::Question),
            ':' => self.single(1, Token::Colon),
            ',' => self.single(1, Token::Comma),
            '(' => self.single(1, Token::LParen),
            ')' => self.single(1, Token::RParen),
            '[' => self.single(1, Token::LBracket),
            ']' => self.single(1, Token::RBracket),
            '{' => self.single(1, Token::LBrace),
            '}' => self.single(1, Token::RBrace),
            '.' => {
                if self.rest().starts_with("...") {
                    self.single(3, Token::Ellipsis)
                } else {
                    self.single(1, Token::Dot)
                }
            }
            '=' => match self.peek_char(1) {
                Some('=') => self.single(2, Token::EqEq),
                Some('>') => self.single(2, Token::FatArrow),
                _ => self.single(1, Token::Equal),
            },
            '!' => match self.peek_char(1) {
                Some('=') => self.single(2, Token::NotEq),
                _ => self.single(1, Token::Bang),
            },
            '<' => match self.peek_char(1) {
                Some('=') => self.single(2, Token::LtEq),
                Some('<') => self.read_heredoc(),
                _ => self.single(1, Token::Lt),
            },
            '>' => match self.peek_char(1) {
                Some('=') => self.single(2, Token::GtEq),
                _ => self.single(1, Token::Gt),
            },
            '&' if self.peek_char(1) == Some('&') => self.single(2, Token::AndAnd),
            '|' if self.peek_char(1) == Some('|') => self.single(2, Token::OrOr),
            '"' => self.read_quoted().map(Token::QuotedTemplate),
            c if c.is_alphabetic() || c == '_' => {
                let ident = self.read_identifier();
                Ok(match ident.as_str() {
                    "true" => Token::Boolean(true),
                    "false" => Token::Boolean(false),
                    "null" => Token::Null,
                    _ => Token::Identifier(ident),
                })
            }
            c if c.is_ascii_digit() => self.read_number(),
            c => Err(LexError::UnexpectedCharacter {
                ch: c,
                position: self.position,
            }),
        }
    }
}

/// Length in bytes of an interpolation body, up to and including the `}`
/// that closes it. `rest` starts right after the opening `${`.
pub(crate) fn interpolation_len(rest: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in rest.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn strip_common_indent(raw: &str) -> String {
    let indent = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    raw.split_inclusive('\n')
        .map(|line| {
            let cut: usize = line
                .char_indices()
                .take_while(|(i, c)| *i < indent && c.is_whitespace() && *c != '\n')
                .map(|(_, c)| c.len_utf8())
                .sum();
            &line[cut..]
        })
        .collect()
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("true false null for");
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(true));
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(false));
    assert_eq!(lexer.next_token().unwrap(), Token::Null);
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::Identifier("for".to_string())
    );
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_attribute_line() {
    let mut lexer = Lexer::new("count = 3 # three\n");
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::Identifier("count".to_string())
    );
    assert_eq!(lexer.next_token().unwrap(), Token::Equal);
    assert_eq!(lexer.next_token().unwrap(), Token::Number(Decimal::from(3)));
    assert_eq!(lexer.next_token().unwrap(), Token::Newline);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_spans_are_byte_offsets() {
    let mut lexer = Lexer::new("é = \"ü\"");
    let (token, span) = lexer.next_spanned().unwrap();
    assert_eq!(token, Token::Identifier("é".to_string()));
    assert_eq!(span, Span::new(0, 2));
    lexer.next_spanned().unwrap();
    let (_, span) = lexer.next_spanned().unwrap();
    assert_eq!(span, Span::new(5, 9));
}
