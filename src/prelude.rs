//! Library functions written in the language itself, loaded into the root environment
//! before any user code runs.

use tracing::debug;

use crate::Error;
use crate::evaluator::Environment;
use crate::interpreter::exec;

/// Source of the bootstrap prelude
pub const PRELUDE: &str = r#"
(def inc (fn (n) (+ n 1)))
(def dec (fn (n) (- n 1)))

(def _reverse (fn (l acc)
  (if l (recur (tail l) (cons (head l) acc)) acc)))
(def reverse (fn (l) (_reverse l '())))

(def each (fn (f l)
  (if l (do (f (head l)) (recur f (tail l))))))

; helpers accumulate in reverse, callers restore the order
(def _filter (fn (f l acc)
  (if l
    (recur f (tail l) (if (f (head l)) (cons (head l) acc) acc))
    acc)))
(def filter (fn (f l) (reverse (_filter f l '()))))

(def _map (fn (f l acc)
  (if l (recur f (tail l) (cons (f (head l)) acc)) acc)))
(def map (fn (f l) (reverse (_map f l '()))))

(def reduce (fn (f acc l)
  (if l (recur f (f acc (head l)) (tail l)) acc)))
"#;

/// Define the prelude functions in the root of `env`
pub fn load(env: &Environment) -> Result<(), Error> {
    let results = exec(PRELUDE, env)?;
    debug!(definitions = results.len(), "prelude loaded");
    Ok(())
}

#[cfg(test)]
#[expect(clippy::unwrap_used)] // test code OK
mod tests {
    use super::*;
    use crate::ast::{Value, nil, val};
    use crate::evaluator::create_global_env;

    fn prelude_env() -> Environment {
        let env = create_global_env();
        load(&env).unwrap();
        env
    }

    #[test]
    fn test_prelude_data_driven() {
        let test_cases: Vec<(&str, Option<Value>)> = vec![
            ("(inc 41)", Some(val(42))),
            ("(dec 0)", Some(val(-1))),
            ("(reverse '(1 2 3))", Some(val([3, 2, 1]))),
            ("(reverse '())", Some(nil())),
            ("(map inc '(1 2 3))", Some(val([2, 3, 4]))),
            ("(map inc '())", Some(nil())),
            ("(filter odd? '(1 2 3 4 5))", Some(val([1, 3, 5]))),
            ("(filter odd? '(2 4))", Some(nil())),
            ("(reduce + 0 '(1 2 3 4))", Some(val(10))),
            ("(reduce + 7 '())", Some(val(7))),
            ("(reduce (fn (acc x) (cons x acc)) '() '(1 2 3))", Some(val([3, 2, 1]))),
            ("(map (fn (x) (+ x x)) (range 4))", Some(val([0, 2, 4, 6]))),
            ("(each inc '(1 2))", None),
            ("(each println '(1 2))", None),
            // Long inputs run on the trampoline
            ("(reduce + 0 (range 10000))", Some(val(49_995_000))),
            ("(head (reverse (map inc (range 20000))))", Some(val(20_000))),
        ];

        let env = prelude_env();
        for (i, (input, expected)) in test_cases.iter().enumerate() {
            let results = exec(input, &env).unwrap();
            assert_eq!(
                results.last().cloned().flatten(),
                *expected,
                "test_id prelude_{i}: '{input}'"
            );
        }
    }

    #[test]
    fn test_prelude_binds_at_root() {
        let env = prelude_env();
        for name in ["inc", "dec", "each", "filter", "_filter", "map", "_map", "reduce", "reverse"] {
            match env.get(name).as_ref() {
                Some(Value::Function(function)) => assert_eq!(function.name(), Some(name)),
                other => panic!("{name} should be a named function, got {other:?}"),
            }
        }
    }
}
