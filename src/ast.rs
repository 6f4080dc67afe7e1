//! This module defines the core value type of the interpreter. [`Value`] is a closed sum
//! of eight variants: symbols (`Literal`), integers, booleans, evaluable forms
//! (`Expression`), quoted data (`List`), callables (`Function`, `Macro`) and the transient
//! `Recur` sentinel used by the tail-call trampoline. Parsed forms and runtime data share
//! this one type, so a form can be rendered back to source text and re-parsed.
//!
//! Helper functions such as [`val`], [`sym`], [`expr`] and [`nil`] keep AST construction
//! short in tests.

use std::fmt;
use std::rc::Rc;

use crate::evaluator::{Function, Macro};
use crate::list::List;

/// Type alias for number values in interpreter
pub type NumberType = i64;

#[derive(Clone)]
pub enum Value {
    /// Symbols; string atoms are also literals and keep their surrounding quotes
    Literal(Rc<str>),
    Number(NumberType),
    Boolean(bool),
    /// Evaluable form, frozen once parsed
    Expression(Rc<[Value]>),
    /// Quoted data
    List(List),
    /// Native primitives and user closures
    Function(Rc<Function>),
    /// Receives its form unevaluated
    Macro(Rc<Macro>),
    /// "Call the enclosing function again with these arguments"; `None` is an argument
    /// that produced no value
    Recur(Rc<[Option<Value>]>),
}

impl Value {
    pub fn literal(name: &str) -> Value {
        Value::Literal(Rc::from(name))
    }

    pub fn expression(elements: Vec<Value>) -> Value {
        Value::Expression(Rc::from(elements))
    }

    /// Truthiness used by `if` and `not`
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Literal(_) => false,
            Value::Number(n) => *n != 0,
            Value::Boolean(b) => *b,
            Value::Expression(elements) => !elements.is_empty(),
            Value::List(list) => !list.is_empty(),
            Value::Function(_) | Value::Macro(_) => true,
            Value::Recur(args) => !args.is_empty(),
        }
    }

    /// Variant name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Literal(_) => "literal",
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::Expression(_) => "expression",
            Value::List(_) => "list",
            Value::Function(_) => "function",
            Value::Macro(_) => "macro",
            Value::Recur(_) => "recur",
        }
    }

    /// Whether dropping this value may release nested values
    pub(crate) fn has_children(&self) -> bool {
        match self {
            Value::Expression(elements) => !elements.is_empty(),
            Value::List(list) => !list.is_empty(),
            Value::Recur(args) => !args.is_empty(),
            _ => false,
        }
    }
}

// Nested values are released from a work stack rather than one native frame per level
impl Drop for Value {
    fn drop(&mut self) {
        if !self.has_children() {
            return;
        }
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut value) = pending.pop() {
            detach_children(&mut value, &mut pending);
        }
    }
}

/// Move the nested values owned only by `value` onto `pending`, leaving cheap
/// placeholders behind
fn detach_children(value: &mut Value, pending: &mut Vec<Value>) {
    match value {
        Value::Expression(elements) => {
            if let Some(elements) = Rc::get_mut(elements) {
                for element in elements.iter_mut().filter(|e| e.has_children()) {
                    pending.push(std::mem::replace(element, Value::Boolean(false)));
                }
            }
        }
        Value::Recur(args) => {
            if let Some(args) = Rc::get_mut(args) {
                let nested = args.iter_mut().filter_map(|arg| arg.take_if(|v| v.has_children()));
                pending.extend(nested);
            }
        }
        Value::List(list) => list.detach_nested(pending),
        _ => {}
    }
}

/// Text of an evaluation outcome; no value renders as `nil`
pub fn render(outcome: Option<&Value>) -> String {
    outcome.map_or_else(|| "nil".to_owned(), ToString::to_string)
}

/// Truthiness of an evaluation outcome; no value counts as false
pub fn is_truthy(outcome: Option<&Value>) -> bool {
    outcome.is_some_and(Value::is_truthy)
}

fn write_sequence<'a>(
    f: &mut fmt::Formatter<'_>,
    values: impl IntoIterator<Item = &'a Value>,
) -> fmt::Result {
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{value}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(name) => write!(f, "{name}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Expression(elements) => {
                write!(f, "(")?;
                write_sequence(f, elements.iter())?;
                write!(f, ")")
            }
            Value::List(list) => {
                write!(f, "'(")?;
                write_sequence(f, list)?;
                write!(f, ")")
            }
            Value::Function(function) => match function.name() {
                Some(name) => write!(f, "#<function:{name}>"),
                None => write!(f, "#<function>"),
            },
            Value::Macro(mac) => write!(f, "#<macro:{}>", mac.name()),
            Value::Recur(args) => {
                write!(f, "(recur")?;
                for arg in args.iter() {
                    write!(f, " {}", render(arg.as_ref()))?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(name) => write!(f, "Literal({name})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Boolean(b) => write!(f, "Boolean({b})"),
            Value::Expression(elements) => write!(f, "Expression({elements:?})"),
            Value::List(list) => write!(f, "List({list:?})"),
            Value::Function(function) => write!(f, "Function({})", function.display_name()),
            Value::Macro(mac) => write!(f, "Macro({})", mac.name()),
            Value::Recur(args) => write!(f, "Recur({args:?})"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Literal(a), Value::Literal(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Expression(a), Value::Expression(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            // Callables compare by identity
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Macro(a), Value::Macro(b)) => Rc::ptr_eq(a, b),
            (Value::Recur(a), Value::Recur(b)) => a == b,
            _ => false,
        }
    }
}

// From trait implementations for Value - enables .into() conversion
impl From<&str> for Value {
    fn from(name: &str) -> Self {
        Value::literal(name)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Value::List(list)
    }
}

macro_rules! impl_from_integer {
    ($int_type:ty) => {
        impl From<$int_type> for Value {
            fn from(n: $int_type) -> Self {
                Value::Number(NumberType::from(n))
            }
        }
    };
}

impl_from_integer!(i8);
impl_from_integer!(i16);
impl_from_integer!(i32);
impl_from_integer!(NumberType);
impl_from_integer!(u8);
impl_from_integer!(u16);
impl_from_integer!(u32);

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(arr: [T; N]) -> Self {
        Value::List(arr.into_iter().map(Into::into).collect())
    }
}

/// Helper function for creating symbols
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn sym<S: AsRef<str>>(name: S) -> Value {
    Value::literal(name.as_ref())
}

/// Helper function for creating Values; arrays and vectors become quoted lists
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn val<T: Into<Value>>(value: T) -> Value {
    value.into()
}

/// Helper function for creating evaluable forms
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn expr<const N: usize>(elements: [Value; N]) -> Value {
    Value::expression(elements.into())
}

/// Helper function for creating the empty list
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn nil() -> Value {
    Value::List(List::new())
}
