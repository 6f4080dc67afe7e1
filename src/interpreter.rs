//! Entry points for running source text against an environment.

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use tracing::debug;

use crate::Error;
use crate::ast::Value;
use crate::evaluator::{Environment, create_global_env, eval};
use crate::parser::parse;
use crate::prelude;

/// Parse all of `source`, then evaluate each top-level form in order against `env`.
///
/// A parse error aborts before anything is evaluated. Runtime problems do not abort:
/// the affected form's outcome is `None` and later forms still run.
pub fn exec(source: &str, env: &Environment) -> Result<Vec<Option<Value>>, Error> {
    let start = Instant::now();
    let forms = parse(source)?;
    debug!(forms = forms.len(), elapsed = ?start.elapsed(), "parsed source");

    Ok(forms.iter().map(|form| eval(form, env)).collect())
}

/// Like [`exec`], reading the whole source from `reader` first
pub fn exec_reader<R: Read>(mut reader: R, env: &Environment) -> Result<Vec<Option<Value>>, Error> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    exec(&source, env)
}

/// Interpreter construction options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Run the bootstrap prelude into the root environment
    pub load_prelude: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config { load_prelude: true }
    }
}

/// A root environment ready for user code
pub struct Interpreter {
    env: Environment,
}

impl Interpreter {
    /// Interpreter with the default [`Config`]
    pub fn new() -> Result<Self, Error> {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Result<Self, Error> {
        let env = create_global_env();
        if config.load_prelude {
            prelude::load(&env)?;
        }
        Ok(Interpreter { env })
    }

    /// The root environment
    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn exec(&self, source: &str) -> Result<Vec<Option<Value>>, Error> {
        exec(source, &self.env)
    }

    /// Run a source file. A missing final newline is supplied so a trailing comment
    /// still terminates.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Vec<Option<Value>>, Error> {
        let path = path.as_ref();
        let mut source = std::fs::read_to_string(path)
            .map_err(|e| Error::IoError(format!("{}: {e}", path.display())))?;
        if !source.ends_with('\n') {
            source.push('\n');
        }
        debug!(path = %path.display(), bytes = source.len(), "loading file");
        exec(&source, &self.env)
    }
}
