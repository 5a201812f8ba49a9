use std::fmt;
use std::rc::Rc;

use gc::{Finalize, Gc, Trace};

use crate::ast::Lambda;
use crate::error::Error;
use crate::runtime::Environment;

#[derive(Clone, Finalize, Trace)]
pub enum Value {
    Number(f64),
    String(String),
    Boolean(bool),
    Closure(Gc<Closure>),
    Builtin(Builtin),
}

/// A lambda paired with the scope it was created in.
#[derive(Finalize, Trace)]
pub struct Closure {
    // AST nodes hold no `Gc` pointers.
    #[unsafe_ignore_trace]
    pub(crate) lambda: Rc<Lambda>,
    pub(crate) env: Environment,
}

pub type NativeFn = dyn Fn(Vec<Value>) -> Result<Value, Error>;

/// A host function injected into the root environment, such as `print`.
#[derive(Clone, Finalize)]
pub struct Builtin {
    name: &'static str,
    func: Rc<NativeFn>,
}

// Builtins only capture host state (output sinks), never `Gc` values.
unsafe impl Trace for Builtin {
    gc::unsafe_empty_trace!();
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        (self.func)(args)
    }

    pub fn ptr_eq(&self, other: &Builtin) -> bool {
        Rc::as_ptr(&self.func) as *const () == Rc::as_ptr(&other.func) as *const ()
    }
}

impl Closure {
    pub fn name(&self) -> Option<&str> {
        self.lambda.name.as_deref()
    }

    pub fn params(&self) -> &[String] {
        &self.lambda.params
    }
}

impl Value {
    pub fn number(n: f64) -> Value {
        Value::Number(n)
    }

    pub fn string<S: ToString>(s: S) -> Value {
        Value::String(s.to_string())
    }

    pub fn boolean(b: bool) -> Value {
        Value::Boolean(b)
    }

    pub(crate) fn closure(lambda: Rc<Lambda>, env: Environment) -> Value {
        Value::Closure(Gc::new(Closure { lambda, env }))
    }

    pub fn builtin<F>(name: &'static str, func: F) -> Value
        where F: Fn(Vec<Value>) -> Result<Value, Error> + 'static {

        Value::Builtin(Builtin { name, func: Rc::new(func) })
    }

    pub fn as_number(&self) -> Option<f64> {
        match *self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match *self {
            Value::Boolean(b) => Some(b),
            _ => None,
        }
    }

    /// Only `false` is falsy.
    pub fn truey(&self) -> bool {
        self.as_boolean() != Some(false)
    }

    pub fn is_callable(&self) -> bool {
        matches!(*self, Value::Closure(_) | Value::Builtin(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Number(n) => write!(f, "{}", n),
            Value::String(ref s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Closure(ref closure) => match closure.name() {
                Some(name) => write!(f, "<lambda {}>", name),
                None => write!(f, "<lambda>"),
            },
            Value::Builtin(ref builtin) =>
                write!(f, "<builtin {}>", builtin.name()),
        }
    }
}

// Like Display, but strings are quoted so error messages stay unambiguous.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::String(ref s) => write!(f, "{:?}", s),
            _ => write!(f, "{}", self),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Value;

    #[test]
    fn test_truthiness() {
        assert!(!Value::boolean(false).truey());
        assert!(Value::boolean(true).truey());
        assert!(Value::number(0.0).truey());
        assert!(Value::string("").truey());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::number(14.0).to_string(), "14");
        assert_eq!(Value::number(2.5).to_string(), "2.5");
        assert_eq!(Value::string("hi").to_string(), "hi");
        assert_eq!(format!("{:?}", Value::string("hi")), "\"hi\"");
        assert_eq!(Value::boolean(false).to_string(), "false");
        let print = Value::builtin("print", |args| Ok(args[0].clone()));
        assert_eq!(print.to_string(), "<builtin print>");
    }
}
