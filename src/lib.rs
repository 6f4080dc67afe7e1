//! tinylisp - a small Lisp with persistent lists, native macros and a recur trampoline
//!
//! This crate implements a minimal Lisp-family language: a tokenizer, an iterative parser
//! producing symbolic-expression trees, a tree-walking evaluator with lexical environments,
//! a persistent (structurally shared) linked list, a macro mechanism distinct from ordinary
//! functions, and an explicit trampoline for self-recursive tail calls.
//!
//! ```lisp
//! (def square (fn (n) (+ n n)))          ; closures are built by the `fn` macro
//! (head (tail '(1 2 3)))                 ; quoted lists are persistent data
//! (def count-down (fn (n)
//!   (if (eq n 0) 0 (recur (- n 1)))))   ; recur loops instead of growing the stack
//! ```
//!
//! ## Two error tiers
//!
//! - Structural problems in the source text (unmatched braces, an unterminated string or
//!   comment) are hard failures: [`Error::ParseError`] aborts the whole source unit before
//!   anything is evaluated.
//! - Runtime problems (wrong arity, wrong argument variant, calling something that is not
//!   callable) never abort. They are reported as `tracing` diagnostics and the offending
//!   operation yields no value (`None`); sibling and later forms keep evaluating.
//!
//! ## Modules
//!
//! - `lexer`: splits source text into lexemes
//! - `parser`: builds top-level forms with an explicit stack
//! - `ast`: the [`ast::Value`] sum type
//! - `list`: the persistent list behind quoted data
//! - `evaluator`: environments, evaluation, closures and the trampoline
//! - `builtinops`: native primitives and macros bound into the root environment
//! - `prelude`: library functions written in the language itself
//! - `interpreter`: entry points used by the file loader and the REPL

use std::fmt;

use crate::evaluator::Arity;

/// Categorizes the different kinds of parsing errors.
#[derive(Debug, PartialEq, Clone)]
pub enum ParseErrorKind {
    /// A closing brace without an open form, or forms still open at end of input
    UnmatchedPair,
    /// Input ended inside a string literal or a comment
    Incomplete,
    /// Tokens that cannot appear where they were found (e.g. an atom outside any form)
    InvalidSyntax,
}

/// A structured error providing detailed information about a parsing failure.
#[derive(Debug, PartialEq, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    /// Context snippet from the input showing where the error occurred (max 100 chars)
    pub context: Option<String>,
    /// The problematic lexeme, if identifiable
    pub found: Option<String>,
}

impl ParseError {
    /// Create a ParseError with all fields
    pub fn new(
        kind: ParseErrorKind,
        message: impl Into<String>,
        context: Option<String>,
        found: Option<String>,
    ) -> Self {
        ParseError {
            kind,
            message: message.into(),
            context,
            found,
        }
    }

    /// Create a ParseError with context extracted from input at a given byte offset
    pub fn with_context(
        kind: ParseErrorKind,
        message: impl Into<String>,
        input: &str,
        error_offset: usize,
    ) -> Self {
        Self::with_context_and_found(kind, message, input, error_offset, None)
    }

    /// Create a ParseError with context and found lexeme
    pub fn with_context_and_found(
        kind: ParseErrorKind,
        message: impl Into<String>,
        input: &str,
        error_offset: usize,
        found: Option<String>,
    ) -> Self {
        const MAX_CONTEXT: usize = 100;

        // Show a little of what precedes the error, snapped back to a char boundary
        let mut context_start = error_offset.saturating_sub(20).min(input.len());
        while !input.is_char_boundary(context_start) {
            context_start -= 1;
        }

        let context_str: String = input[context_start..].chars().take(MAX_CONTEXT).collect();

        let mut display_context = String::new();
        if context_start > 0 {
            display_context.push_str("[...]");
        }
        display_context.push_str(&context_str);
        if context_start + context_str.len() < input.len() {
            display_context.push_str("[...]");
        }

        // Replace newlines with visible markers for better error display
        let display_context = display_context.replace('\n', "\\n").replace('\r', "");

        Self::new(kind, message, Some(display_context), found)
    }
}

/// Errors surfaced to callers of the interpreter entry points
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    ParseError(ParseError),
    /// Reading a source unit failed before it could be parsed
    IoError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ParseError(e) => {
                write!(f, "ParseError: {}", e.message)?;
                if let Some(found) = &e.found {
                    write!(f, "\nFound: {found}")?;
                }
                if let Some(context) = &e.context {
                    write!(f, "\nContext: {context}")?;
                }
                Ok(())
            }
            Error::IoError(msg) => write!(f, "IoError: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ParseError> for Error {
    fn from(error: ParseError) -> Self {
        Error::ParseError(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::IoError(error.to_string())
    }
}

/// Problems raised while evaluating.
///
/// These never escape evaluation: the function or macro that produced one has it reported
/// as a diagnostic (see [`RuntimeError::report`]) and yields no value.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    EvalError(String),
    TypeError(String),
    ArityError { expected: Arity, got: usize },
    /// The head of an expression evaluated to something that cannot be called
    NotCallable(String),
}

impl RuntimeError {
    pub(crate) fn arity_error(expected: Arity, got: usize) -> Self {
        RuntimeError::ArityError { expected, got }
    }

    /// Emit this error as a warning diagnostic attributed to `context`
    pub fn report(&self, context: &str) {
        match self {
            RuntimeError::ArityError { expected, got } => {
                tracing::warn!(function = context, expected = %expected, got, "{self}");
            }
            _ => tracing::warn!(function = context, "{self}"),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RuntimeError::EvalError(msg) => write!(f, "EvaluationError: {msg}"),
            RuntimeError::TypeError(msg) => write!(f, "Type error: {msg}"),
            RuntimeError::ArityError { expected, got } => {
                write!(f, "Invalid number of arguments: expected {expected}, got {got}")
            }
            RuntimeError::NotCallable(head) => write!(f, "Cannot apply non-function: {head}"),
        }
    }
}

pub mod ast;
pub mod builtinops;
pub mod evaluator;
pub mod interpreter;
pub mod lexer;
pub mod list;
pub mod parser;
pub mod prelude;

pub use interpreter::{Config, Interpreter, exec, exec_reader};


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record_events;

    #[test]
    fn test_arity_report_carries_structured_fields() {
        let error = RuntimeError::arity_error(Arity::Range(2, 3), 4);
        let ((), events) = record_events(|| error.report("if"));

        assert_eq!(events.len(), 1);
        let fields = &events[0];
        for expected in [
            ("function", "\"if\""),
            ("expected", "2 to 3"),
            ("got", "4"),
        ] {
            assert!(
                fields.iter().any(|(name, value)| (name.as_str(), value.as_str()) == expected),
                "missing {expected:?} in {fields:?}"
            );
        }
    }

    #[test]
    fn test_other_reports_name_only_the_function() {
        let ((), events) = record_events(|| {
            RuntimeError::TypeError("expected number".into()).report("+");
        });

        let mut names: Vec<&str> = events[0].iter().map(|(name, _)| name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["function", "message"]);
    }
}
