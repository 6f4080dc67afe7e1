use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;

use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tinylisp::ast::{Value, render};
use tinylisp::evaluator::{Environment, FunctionKind};
use tinylisp::{Config, Error, Interpreter};
use tracing::error;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "TINYLISP_LOG";
const USAGE: &str = "usage: tinylisp [--no-prelude] [FILE]";

/// Characters that end the word being completed
const WORD_BREAKS: &str = " \t\n()[]{}'";

struct Options {
    config: Config,
    file: Option<String>,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Option<Options>, String> {
    let mut options = Options {
        config: Config::default(),
        file: None,
    };
    for arg in args {
        match arg.as_str() {
            "--no-prelude" => options.config.load_prelude = false,
            "-h" | "--help" => return Ok(None),
            flag if flag.starts_with('-') => return Err(format!("unknown option: {flag}")),
            _ if options.file.is_some() => return Err(format!("unexpected argument: {arg}")),
            _ => options.file = Some(arg),
        }
    }
    Ok(Some(options))
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(Some(options)) => options,
        Ok(None) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let interpreter = match Interpreter::with_config(&options.config) {
        Ok(interpreter) => interpreter,
        Err(e) => {
            error!("failed to initialize interpreter: {e}");
            return ExitCode::FAILURE;
        }
    };

    match options.file {
        Some(path) => run_file(&interpreter, &path),
        None => {
            let result = panic::catch_unwind(AssertUnwindSafe(|| run_repl(&interpreter)));
            match result {
                Ok(code) => code,
                Err(panic_info) => {
                    eprintln!("The REPL encountered an unexpected error and must exit.");
                    if let Some(msg) = panic_info.downcast_ref::<&str>() {
                        eprintln!("Error: {msg}");
                    } else if let Some(msg) = panic_info.downcast_ref::<String>() {
                        eprintln!("Error: {msg}");
                    } else {
                        eprintln!("Error: Unknown panic occurred");
                    }
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn run_file(interpreter: &Interpreter, path: &str) -> ExitCode {
    match interpreter.load_file(path) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed loading {path}: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Completes the word under the cursor against the names bound in the root environment
struct LispHelper {
    env: Environment,
}

impl Completer for LispHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let before = &line[..pos];
        // Word breaks are all ASCII, so +1 stays on a char boundary
        let start = before
            .rfind(|c: char| WORD_BREAKS.contains(c))
            .map_or(0, |i| i + 1);
        let word = &before[start..];
        if word.is_empty() {
            return Ok((pos, Vec::new()));
        }

        let candidates = self
            .env
            .names()
            .into_iter()
            .filter(|name| name.starts_with(word))
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for LispHelper {
    type Hint = String;
}

impl Highlighter for LispHelper {}

impl Validator for LispHelper {}

impl Helper for LispHelper {}

fn run_repl(interpreter: &Interpreter) -> ExitCode {
    println!("tinylisp");
    println!("Enter forms like: (+ 1 2) or (map inc '(1 2 3))");
    println!("Type :help for more commands, or Ctrl+D to exit.");
    println!();

    let mut rl: Editor<LispHelper, DefaultHistory> = match Editor::new() {
        Ok(rl) => rl,
        Err(e) => {
            error!("could not initialize line editor: {e}");
            return ExitCode::FAILURE;
        }
    };
    rl.set_helper(Some(LispHelper {
        env: interpreter.env().root(),
    }));

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                match line {
                    ":help" => {
                        print_help();
                        continue;
                    }
                    ":env" => {
                        print_environment(interpreter.env());
                        continue;
                    }
                    ":quit" | ":exit" => {
                        println!("Goodbye!");
                        break;
                    }
                    _ => {}
                }

                // A trailing comment needs its newline to terminate
                match interpreter.exec(&format!("{line}\n")) {
                    Ok(results) => {
                        for result in results {
                            println!(">> {}", render(result.as_ref()));
                        }
                    }
                    Err(e @ Error::ParseError(_)) => println!("Failed parsing line: {e}"),
                    Err(e) => println!("Error: {e}"),
                }
            }

            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(err) => {
                println!("Error: {err:?}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn print_help() {
    println!("Commands:");
    println!("  :help      - Show this help message");
    println!("  :env       - Show current environment bindings");
    println!("  :quit      - Exit the interpreter");
    println!("  :exit      - Exit the interpreter");
    println!("  Ctrl+D     - Exit the interpreter");
    println!("  Tab        - Complete a bound name");
    println!();
    println!("Examples:");
    println!("  (def square (fn (n) (+ n n)))");
    println!("  (map square (range 5))");
    println!("  (filter odd? '(1 2 3 4 5))");
    println!("  (time (reduce + 0 (range 10000)))");
    println!();
    println!("Set {LOG_ENV_VAR}=debug for more diagnostics.");
    println!();
}

fn print_environment(env: &Environment) {
    let bindings = env.get_all_bindings();

    if bindings.is_empty() {
        println!("Environment is empty.");
        return;
    }

    println!("Environment bindings ({} total):", bindings.len());
    println!();

    // Separate natives from everything defined in the language
    let mut natives = Vec::new();
    let mut user_defined = Vec::new();

    for (name, value) in bindings {
        match &value {
            Value::Macro(_) => natives.push(name),
            Value::Function(function) if matches!(function.kind(), FunctionKind::Native(_)) => {
                natives.push(name);
            }
            _ => user_defined.push((name, value)),
        }
    }

    if !natives.is_empty() {
        println!("Built-in functions and macros ({}):", natives.len());
        // Print in columns for readability
        let mut col = 0;
        for name in natives {
            print!("  {name:<15}");
            col += 1;
            if col % 4 == 0 {
                println!();
            }
        }
        if col % 4 != 0 {
            println!();
        }
        println!();
    }

    if !user_defined.is_empty() {
        println!("User-defined values ({}):", user_defined.len());
        for (name, value) in user_defined {
            println!("  {name} = {value}");
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used)] // test code OK
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| (*s).to_owned()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args_data_driven() {
        // (args, expected load_prelude, expected file)
        let test_cases: Vec<(Vec<&str>, bool, Option<&str>)> = vec![
            (vec![], true, None),
            (vec!["prog.lisp"], true, Some("prog.lisp")),
            (vec!["--no-prelude"], false, None),
            (vec!["--no-prelude", "prog.lisp"], false, Some("prog.lisp")),
            (vec!["prog.lisp", "--no-prelude"], false, Some("prog.lisp")),
        ];

        for (input, load_prelude, file) in test_cases {
            let options = parse_args(args(&input)).unwrap().unwrap();
            assert_eq!(options.config.load_prelude, load_prelude, "{input:?}");
            assert_eq!(options.file.as_deref(), file, "{input:?}");
        }

        assert!(parse_args(args(&["--help"])).unwrap().is_none());
        assert!(parse_args(args(&["--verbose"])).is_err());
        assert!(parse_args(args(&["a.lisp", "b.lisp"])).is_err());
    }

    #[test]
    fn test_completion_candidates() {
        let interpreter = Interpreter::new().unwrap();
        let helper = LispHelper {
            env: interpreter.env().clone(),
        };
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);

        let (start, candidates) = helper.complete("(ma", 3, &ctx).unwrap();
        assert_eq!(start, 1);
        assert_eq!(candidates, vec!["map".to_owned()]);

        let (start, candidates) = helper.complete("(map in", 7, &ctx).unwrap();
        assert_eq!(start, 5);
        assert_eq!(candidates, vec!["inc".to_owned()]);

        let (_, candidates) = helper.complete("(", 1, &ctx).unwrap();
        assert!(candidates.is_empty());
    }
}
