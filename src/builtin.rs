use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use crate::error::Error;
use crate::runtime::Environment;
use crate::value::Value;

// Writes the textual form of the first argument and hands it back, so
// `print` can sit in the middle of an expression.
fn write_value<W: Write>(out: &RefCell<W>, args: Vec<Value>, newline: bool)
    -> Result<Value, Error> {

    let value = args.into_iter().next().unwrap_or(Value::boolean(false));
    let mut out = out.borrow_mut();
    write!(out, "{}", value)?;
    if newline {
        writeln!(out)?;
    }
    out.flush()?;
    Ok(value)
}

/// Root environment with `print` and `println` writing to `output`.
pub fn initial_environment<W: Write + 'static>(output: Rc<RefCell<W>>)
    -> Environment {

    let print_output = output.clone();
    let pre_hashmap = hashmap! {
        "print" => Value::builtin("print",
            move |args| write_value(&print_output, args, false)),
        "println" => Value::builtin("println",
            move |args| write_value(&output, args, true)),
    };

    let mut hashmap = HashMap::new();
    for (key, value) in pre_hashmap {
        hashmap.insert(key.to_string(), value);
    }

    Environment::from_hashmap(hashmap)
}

pub fn stdout_environment() -> Environment {
    initial_environment(Rc::new(RefCell::new(io::stdout())))
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::run;
    use crate::value::Value;
    use super::initial_environment;

    fn output_of(input: &str) -> (Value, String) {
        let out = Rc::new(RefCell::new(Vec::new()));
        let env = initial_environment(out.clone());
        let value = run(input, &env).unwrap();
        let text = String::from_utf8(out.borrow().clone()).unwrap();
        (value, text)
    }

    #[test]
    fn test_print_returns_argument() {
        let (value, text) = output_of("print(2 + 3 * 4)");
        assert_eq!(value, Value::number(14.0));
        assert_eq!(text, "14");
    }

    #[test]
    fn test_println() {
        let (_, text) = output_of("println(\"Hello World!\"); println(true)");
        assert_eq!(text, "Hello World!\ntrue\n");
    }

    #[test]
    fn test_print_without_argument() {
        let (value, text) = output_of("print()");
        assert_eq!(value, Value::boolean(false));
        assert_eq!(text, "false");
    }

    #[test]
    fn test_print_range() {
        let (_, text) = output_of("
            # `λ` is a synonym for `lambda`
            print_range = λ(a, b)
                if a <= b then {
                    print(a);
                    if a + 1 <= b {
                        print(\", \");
                        print_range(a + 1, b);
                    } else println(\"\");
                };
            print_range(1, 5);");
        assert_eq!(text, "1, 2, 3, 4, 5\n");
    }

    #[test]
    fn test_builtins_can_be_shadowed() {
        let (value, text) = output_of("f = lambda(print) print; f(1)");
        assert_eq!(value, Value::number(1.0));
        assert_eq!(text, "");
    }
}
