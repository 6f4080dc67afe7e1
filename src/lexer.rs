//! Splits source text into lexemes.
//!
//! Recognition of each token shape is done with `nom` combinators; the [`Lexer`] itself only
//! tracks the byte offset so parse errors can point back into the source.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{take_till, take_till1, take_while1},
    character::complete::{char, one_of},
    combinator::recognize,
    sequence::{delimited, terminated},
};

use crate::ast::NumberType;
use crate::{ParseError, ParseErrorKind};

/// Characters forming one-character structural tokens
const BRACES: &str = "()[]{}";
const OPEN_BRACES: &str = "([{";
const QUOTE: char = '\'';
const COMMENT: char = ';';
const STRING_DELIMITER: char = '"';

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn is_separator(c: char) -> bool {
    is_whitespace(c) || BRACES.contains(c)
}

/// A lexeme together with its byte offset in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub lexeme: &'a str,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Open,
    Close,
    Quote,
    String,
    Number(NumberType),
    Symbol,
}

impl Token<'_> {
    /// Kind inferred from the lexeme
    pub fn kind(&self) -> TokenKind {
        let lexeme = self.lexeme;
        let mut chars = lexeme.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if BRACES.contains(c) => {
                if OPEN_BRACES.contains(c) {
                    TokenKind::Open
                } else {
                    TokenKind::Close
                }
            }
            (Some(QUOTE), None) => TokenKind::Quote,
            (Some(STRING_DELIMITER), _) => TokenKind::String,
            _ => match lexeme.parse::<NumberType>() {
                Ok(n) => TokenKind::Number(n),
                Err(_) => TokenKind::Symbol,
            },
        }
    }
}

fn whitespace(input: &str) -> IResult<&str, &str> {
    take_while1(is_whitespace).parse(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    recognize(terminated(
        (char(COMMENT), take_till(|c: char| c == '\n')),
        char('\n'),
    ))
    .parse(input)
}

fn string_literal(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char(STRING_DELIMITER),
        take_till(|c: char| c == STRING_DELIMITER),
        char(STRING_DELIMITER),
    ))
    .parse(input)
}

fn brace(input: &str) -> IResult<&str, &str> {
    recognize(one_of(BRACES)).parse(input)
}

fn quote(input: &str) -> IResult<&str, &str> {
    recognize(char(QUOTE)).parse(input)
}

fn atom(input: &str) -> IResult<&str, &str> {
    take_till1(is_separator).parse(input)
}

/// Streaming tokenizer over a source string
pub struct Lexer<'a> {
    input: &'a str,
    offset: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, offset: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.offset..]
    }

    fn advance_to(&mut self, rest: &'a str) {
        self.offset = self.input.len() - rest.len();
    }

    /// `Ok(None)` at end of input. After an error the lexer is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        let result = self.scan();
        if result.is_err() {
            self.offset = self.input.len();
        }
        result
    }

    fn scan(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        self.skip_trivia()?;

        let rest = self.remaining();
        if rest.is_empty() {
            return Ok(None);
        }

        let start = self.offset;
        let scanned = if rest.starts_with(STRING_DELIMITER) {
            string_literal(rest).map_err(|_| {
                self.incomplete("Unterminated string literal", start, rest)
            })?
        } else {
            alt((brace, quote, atom)).parse(rest).map_err(|_| {
                ParseError::with_context(
                    ParseErrorKind::InvalidSyntax,
                    "Unrecognized token",
                    self.input,
                    start,
                )
            })?
        };

        let (remaining, lexeme) = scanned;
        self.advance_to(remaining);
        Ok(Some(Token {
            lexeme,
            offset: start,
        }))
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            let rest = self.remaining();
            if let Ok((remaining, _)) = whitespace(rest) {
                self.advance_to(remaining);
            } else if rest.starts_with(COMMENT) {
                let (remaining, _) = comment(rest).map_err(|_| {
                    self.incomplete("Unterminated comment", self.offset, rest)
                })?;
                self.advance_to(remaining);
            } else {
                return Ok(());
            }
        }
    }

    fn incomplete(&self, message: &str, offset: usize, rest: &str) -> ParseError {
        let found: String = rest.chars().take(20).collect();
        ParseError::with_context_and_found(
            ParseErrorKind::Incomplete,
            message,
            self.input,
            offset,
            Some(found),
        )
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
