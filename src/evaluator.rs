use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::RuntimeError;
use crate::ast::Value;
use crate::builtinops::get_builtin_ops;
use crate::list::List;

/// Signature of native functions: already-evaluated arguments in, `None` for no value.
/// An argument whose expression produced no value arrives as `None`.
pub type NativeFn = dyn Fn(&[Option<Value>]) -> Result<Option<Value>, RuntimeError>;

/// Signature of native macros: the calling environment and the whole unevaluated form,
/// head included
pub type MacroFn = dyn Fn(&Environment, &[Value]) -> Result<Option<Value>, RuntimeError>;

/// Number of operands a callable accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    /// Inclusive bounds
    Range(usize, usize),
    Any,
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
            Arity::Range(min, max) => (min..=max).contains(&count),
            Arity::Any => true,
        }
    }

    pub fn validate(self, count: usize) -> Result<(), RuntimeError> {
        if self.accepts(count) {
            Ok(())
        } else {
            Err(RuntimeError::arity_error(self, count))
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
            Arity::Range(min, max) => write!(f, "{min} to {max}"),
            Arity::Any => write!(f, "any number"),
        }
    }
}

/// Environment for variable bindings.
///
/// A cheap handle: clones share the same frame. Closures keep their defining frame alive
/// through such a handle.
#[derive(Clone)]
pub struct Environment(Rc<Scope>);

struct Scope {
    /// `None` marks a parameter bound to no value
    bindings: RefCell<HashMap<String, Option<Value>>>,
    parent: Option<Environment>,
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

impl Environment {
    /// A fresh root frame with no bindings
    pub fn new() -> Self {
        Environment(Rc::new(Scope {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        }))
    }

    pub fn with_parent(parent: &Environment) -> Self {
        Environment(Rc::new(Scope {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent.clone()),
        }))
    }

    /// Bind in this frame only
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.bind(name, Some(value));
    }

    /// Bind an evaluation outcome in this frame only; `None` shadows outer bindings of
    /// `name` with no value
    pub fn bind(&self, name: impl Into<String>, outcome: Option<Value>) {
        self.0.bindings.borrow_mut().insert(name.into(), outcome);
    }

    /// Innermost binding of `name`, walking outward through the parents.
    /// `Some(None)` is a binding to no value; `None` means `name` is unbound.
    pub fn lookup(&self, name: &str) -> Option<Option<Value>> {
        let mut scope = &self.0;
        loop {
            if let Some(outcome) = scope.bindings.borrow().get(name) {
                return Some(outcome.clone());
            }
            scope = &scope.parent.as_ref()?.0;
        }
    }

    /// Innermost value bound to `name`
    pub fn get(&self, name: &str) -> Option<Value> {
        self.lookup(name).flatten()
    }

    /// The outermost frame of the chain
    pub fn root(&self) -> Environment {
        let mut env = self;
        while let Some(parent) = &env.0.parent {
            env = parent;
        }
        env.clone()
    }

    pub fn is_root(&self) -> bool {
        self.0.parent.is_none()
    }

    /// Register a native function under `name` in this frame.
    ///
    /// Errors returned by `func` are reported as diagnostics and the call yields no value.
    ///
    /// # Example
    /// ```
    /// use tinylisp::ast::Value;
    /// use tinylisp::evaluator::create_global_env;
    ///
    /// let env = create_global_env();
    /// env.register_builtin_function("answer", |_args| Ok(Some(Value::Number(42))));
    /// env.register_builtin_function("present", |args| {
    ///     Ok(Some(Value::Number(args.iter().flatten().count() as i64)))
    /// });
    /// let results = tinylisp::exec("(answer) (present 1 (head '()) 2)", &env).unwrap();
    /// assert_eq!(results, vec![Some(Value::Number(42)), Some(Value::Number(2))]);
    /// ```
    pub fn register_builtin_function(
        &self,
        name: &str,
        func: impl Fn(&[Option<Value>]) -> Result<Option<Value>, RuntimeError> + 'static,
    ) {
        self.define(name, Value::Function(Rc::new(Function::native(name, func))));
    }

    /// Register a native macro under `name` in this frame. The transform receives the
    /// calling environment and the whole unevaluated form.
    pub fn register_macro(
        &self,
        name: &str,
        transform: impl Fn(&Environment, &[Value]) -> Result<Option<Value>, RuntimeError> + 'static,
    ) {
        self.define(name, Value::Macro(Rc::new(Macro::new(name, transform))));
    }

    /// Sorted (name, outcome) pairs visible from this environment; inner frames shadow
    /// outer ones
    fn visible(&self) -> Vec<(String, Option<Value>)> {
        let mut bindings = HashMap::new();
        let mut scope = Some(&self.0);
        while let Some(current) = scope {
            for (name, outcome) in current.bindings.borrow().iter() {
                bindings
                    .entry(name.clone())
                    .or_insert_with(|| outcome.clone());
            }
            scope = current.parent.as_ref().map(|parent| &parent.0);
        }

        let mut result: Vec<_> = bindings.into_iter().collect();
        result.sort_by(|a, b| a.0.cmp(&b.0));
        result
    }

    /// Get all bindings visible from this environment.
    /// Returns a Vec of (name, value) pairs sorted by name; inner frames shadow outer ones.
    /// Names bound to no value are left out.
    pub fn get_all_bindings(&self) -> Vec<(String, Value)> {
        self.visible()
            .into_iter()
            .filter_map(|(name, outcome)| outcome.map(|value| (name, value)))
            .collect()
    }

    /// Sorted names visible from this environment
    pub fn names(&self) -> Vec<String> {
        self.visible().into_iter().map(|(name, _)| name).collect()
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.bindings.borrow().keys().cloned().collect();
        f.debug_struct("Environment")
            .field("bindings", &names)
            .field("has_parent", &self.0.parent.is_some())
            .finish()
    }
}

pub enum FunctionKind {
    Native(Box<NativeFn>),
    Closure {
        params: Vec<Rc<str>>,
        body: Value,
        env: Environment,
    },
}

/// A callable value: a native primitive or a user closure
pub struct Function {
    name: Option<String>,
    kind: FunctionKind,
}

impl Function {
    pub fn native(
        name: &str,
        func: impl Fn(&[Option<Value>]) -> Result<Option<Value>, RuntimeError> + 'static,
    ) -> Self {
        Function {
            name: Some(name.to_owned()),
            kind: FunctionKind::Native(Box::new(func)),
        }
    }

    /// An anonymous closure over `env`
    pub fn closure(params: Vec<Rc<str>>, body: Value, env: Environment) -> Self {
        Function {
            name: None,
            kind: FunctionKind::Closure { params, body, env },
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name used in diagnostics
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous function")
    }

    pub fn kind(&self) -> &FunctionKind {
        &self.kind
    }

    /// Anonymous closures take the given name; anything else is returned unchanged
    pub(crate) fn named(self: &Rc<Self>, name: &str) -> Rc<Function> {
        match (&self.name, &self.kind) {
            (None, FunctionKind::Closure { params, body, env }) => Rc::new(Function {
                name: Some(name.to_owned()),
                kind: FunctionKind::Closure {
                    params: params.clone(),
                    body: body.clone(),
                    env: env.clone(),
                },
            }),
            _ => Rc::clone(self),
        }
    }

    /// Invoke with evaluated arguments; `None` entries are arguments that produced no
    /// value and are passed through as such.
    ///
    /// Closures run on a trampoline: when the body evaluates to [`Value::Recur`] the call
    /// starts over with the carried arguments in a fresh frame, so self tail calls through
    /// `recur` use constant native stack.
    pub fn call(&self, mut args: Vec<Option<Value>>) -> Option<Value> {
        let (params, body, env) = match &self.kind {
            FunctionKind::Native(native) => {
                return native(&args).unwrap_or_else(|error| {
                    error.report(self.display_name());
                    None
                });
            }
            FunctionKind::Closure { params, body, env } => (params, body, env),
        };

        loop {
            if let Err(error) = Arity::Exact(params.len()).validate(args.len()) {
                error.report(self.display_name());
                return None;
            }

            let frame = Environment::with_parent(env);
            for (param, arg) in params.iter().zip(args) {
                frame.bind(param.as_ref(), arg);
            }

            let result = eval(body, &frame);
            match &result {
                Some(Value::Recur(next)) => args = next.to_vec(),
                _ => return result,
            }
        }
    }
}

/// A native transform over unevaluated forms
pub struct Macro {
    name: String,
    transform: Box<MacroFn>,
}

impl Macro {
    pub fn new(
        name: &str,
        transform: impl Fn(&Environment, &[Value]) -> Result<Option<Value>, RuntimeError> + 'static,
    ) -> Self {
        Macro {
            name: name.to_owned(),
            transform: Box::new(transform),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the transform on `form` (head included)
    pub fn expand(&self, env: &Environment, form: &[Value]) -> Option<Value> {
        (self.transform)(env, form).unwrap_or_else(|error| {
            error.report(&self.name);
            None
        })
    }
}

/// Evaluate a value. `None` is the no-value outcome: nothing to bind or print, and false
/// in conditionals.
pub fn eval(value: &Value, env: &Environment) -> Option<Value> {
    match value {
        // Unbound symbols evaluate to themselves
        Value::Literal(name) => env.lookup(name).unwrap_or_else(|| Some(value.clone())),
        Value::Number(_)
        | Value::Boolean(_)
        | Value::Function(_)
        | Value::Macro(_)
        | Value::Recur(_) => Some(value.clone()),
        Value::List(list) => Some(Value::List(eval_list(list, env))),
        Value::Expression(elements) => eval_expression(elements, env),
    }
}

/// Fresh list of evaluated elements; elements with no value keep their source form
fn eval_list(list: &List, env: &Environment) -> List {
    list.iter()
        .map(|element| eval(element, env).unwrap_or_else(|| element.clone()))
        .collect()
}

fn eval_expression(form: &[Value], env: &Environment) -> Option<Value> {
    let (head, operands) = form.split_first()?;
    let callee = eval(head, env);
    match &callee {
        Some(Value::Macro(mac)) => mac.expand(env, form),
        Some(Value::Function(function)) => function.call(eval_args(operands, env)),
        Some(other) => {
            RuntimeError::NotCallable(other.to_string()).report(&head.to_string());
            None
        }
        None => {
            RuntimeError::NotCallable("nil".to_owned()).report(&head.to_string());
            None
        }
    }
}

/// Evaluate every operand left to right, keeping the ones that produced no value
fn eval_args(operands: &[Value], env: &Environment) -> Vec<Option<Value>> {
    operands.iter().map(|operand| eval(operand, env)).collect()
}

/// Create a root environment holding the boolean constants and every native builtin
pub fn create_global_env() -> Environment {
    let env = Environment::new();
    env.define("true", Value::Boolean(true));
    env.define("false", Value::Boolean(false));

    for builtin_op in get_builtin_ops() {
        builtin_op.bind(&env);
    }

    env
}
