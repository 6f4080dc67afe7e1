//! Builds top-level forms from the token stream.
//!
//! Nesting is tracked with an explicit stack of open containers rather than recursive
//! descent, so the depth of a form is bounded by memory, not by the native call stack.
//! A brace directly preceded by the quote marker opens a [`List`]; every other brace opens
//! an `Expression`. The three brace pairs are interchangeable.

use std::rc::Rc;

use crate::ast::Value;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::list::List;
use crate::{ParseError, ParseErrorKind};

enum Container {
    Expression(Vec<Value>),
    List(List),
}

impl Container {
    fn push(&mut self, value: Value) {
        match self {
            Container::Expression(elements) => elements.push(value),
            Container::List(list) => list.push_back(value),
        }
    }

    fn finish(self) -> Value {
        match self {
            Container::Expression(elements) => Value::Expression(Rc::from(elements)),
            Container::List(list) => Value::List(list),
        }
    }
}

/// Parse a whole source unit into its top-level forms
pub fn parse(source: &str) -> Result<Vec<Value>, ParseError> {
    let mut lexer = Lexer::new(source);
    let mut forms = Vec::new();
    let mut stack: Vec<Container> = Vec::new();
    let mut quoted = false;

    while let Some(token) = lexer.next_token()? {
        let quote_pending = std::mem::take(&mut quoted);

        let atom = match token.kind() {
            TokenKind::Quote => {
                quoted = true;
                continue;
            }
            TokenKind::Open => {
                stack.push(if quote_pending {
                    Container::List(List::new())
                } else {
                    Container::Expression(Vec::new())
                });
                continue;
            }
            TokenKind::Close => {
                let finished = stack
                    .pop()
                    .ok_or_else(|| unmatched(source, &token))?
                    .finish();
                match stack.last_mut() {
                    Some(parent) => parent.push(finished),
                    None => forms.push(finished),
                }
                continue;
            }
            TokenKind::Number(n) => Value::Number(n),
            TokenKind::String | TokenKind::Symbol => Value::literal(token.lexeme),
        };

        match stack.last_mut() {
            Some(container) => container.push(atom),
            None => {
                return Err(ParseError::with_context_and_found(
                    ParseErrorKind::InvalidSyntax,
                    "atom outside of a form",
                    source,
                    token.offset,
                    Some(token.lexeme.to_owned()),
                ));
            }
        }
    }

    if !stack.is_empty() {
        return Err(ParseError::with_context(
            ParseErrorKind::UnmatchedPair,
            format!("unmatched pair: {} form(s) still open", stack.len()),
            source,
            source.len(),
        ));
    }

    Ok(forms)
}

fn unmatched(source: &str, token: &Token) -> ParseError {
    ParseError::with_context_and_found(
        ParseErrorKind::UnmatchedPair,
        "unmatched pair",
        source,
        token.offset,
        Some(token.lexeme.to_owned()),
    )
}
