use std::ptr;

use crate::value::Value;

/// Equality as seen by `==` and `!=`: no coercion between kinds, callables
/// compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => ptr::eq(&**a, &**b),
            (Value::Builtin(a), Value::Builtin(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::builtin::initial_environment;
    use crate::run;
    use crate::value::Value;

    #[test]
    fn test_no_coercion() {
        assert_ne!(Value::number(1.0), Value::string("1"));
        assert_ne!(Value::number(0.0), Value::boolean(false));
        assert_ne!(Value::string(""), Value::boolean(false));
        assert_eq!(Value::string("a"), Value::string("a"));
    }

    #[test]
    fn test_closure_identity() {
        let env = initial_environment(Rc::new(RefCell::new(Vec::new())));
        let same = run("f = lambda(x) x; g = lambda(x) x; f == f", &env);
        assert_eq!(same.unwrap(), Value::boolean(true));
        let different = run("f == g", &env);
        assert_eq!(different.unwrap(), Value::boolean(false));
        assert_eq!(run("print == print", &env).unwrap(), Value::boolean(true));
        assert_eq!(run("print != println", &env).unwrap(),
            Value::boolean(true));
    }
}
