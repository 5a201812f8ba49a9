use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use gc::{Finalize, Gc, GcCell, Trace};

use crate::ast::{Lambda, Node, Operator};
use crate::error::Error;
use crate::number;
use crate::value::{Closure, Value};

/// A lexical scope. Clones share the same scope.
#[derive(Clone, Finalize, Trace)]
pub struct Environment(Gc<GcCell<Scope>>);

#[derive(Finalize, Trace)]
struct Scope {
    parent: Option<Environment>,
    local: HashMap<String, Value>,
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let scope = self.0.borrow();
        let mut names: Vec<_> = scope.local.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("local", &names)
            .field("parent", &scope.parent)
            .finish()
    }
}

impl Default for Environment {
    fn default() -> Environment {
        Environment::new()
    }
}

impl Environment {
    fn from_data(data: Scope) -> Environment {
        Environment(Gc::new(GcCell::new(data)))
    }

    /// An empty root scope.
    pub fn new() -> Environment {
        Environment::from_hashmap(HashMap::new())
    }

    pub fn from_hashmap(local: HashMap<String, Value>) -> Environment {
        Environment::from_data(Scope {
            parent: None,
            local,
        })
    }

    pub fn extend(&self) -> Environment {
        Environment::from_data(Scope {
            parent: Some(self.clone()),
            local: HashMap::new(),
        })
    }

    pub fn is_root(&self) -> bool {
        self.0.borrow().parent.is_none()
    }

    /// Bind `name` in this scope, shadowing any outer binding.
    pub fn define(&self, name: &str, value: Value) {
        self.0.borrow_mut().local.insert(name.to_string(), value);
    }

    // The nearest scope that binds `name` itself.
    fn owner(&self, name: &str) -> Option<Environment> {
        let mut scope = self.clone();
        loop {
            if scope.0.borrow().local.contains_key(name) {
                return Some(scope);
            }
            let parent = scope.0.borrow().parent.clone();
            scope = parent?;
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.owner(name).and_then(|scope| {
            let value = scope.0.borrow().local.get(name).cloned();
            value
        })
    }

    pub fn read(&self, name: &str) -> Result<Value, Error> {
        self.lookup(name)
            .ok_or_else(|| Error::UndefinedVariable(name.to_string()))
    }

    /// Overwrite the binding that `read` would find. Only the root scope may
    /// create a binding that does not exist yet.
    pub fn rebind(&self, name: &str, value: Value) -> Result<(), Error> {
        match self.owner(name) {
            Some(scope) => {
                scope.define(name, value);
                Ok(())
            },
            None if self.is_root() => {
                tracing::debug!(name, "creating global binding");
                self.define(name, value);
                Ok(())
            },
            None => Err(Error::UndefinedVariable(name.to_string())),
        }
    }
}

fn make_closure(lambda: &Rc<Lambda>, env: &Environment) -> Value {
    match lambda.name {
        Some(ref name) => {
            // The closure's own scope holds its name, so the body can recurse.
            let scope = env.extend();
            let closure = Value::closure(lambda.clone(), scope.clone());
            scope.define(name, closure.clone());
            closure
        },
        None => Value::closure(lambda.clone(), env.clone()),
    }
}

fn apply_binary(op: Operator, lhs: Value, rhs: Value) -> Result<Value, Error> {
    match op {
        Operator::Add | Operator::Sub | Operator::Mul | Operator::Div
            | Operator::Rem => number::arithmetic(op, &lhs, &rhs),
        Operator::Less | Operator::Greater | Operator::LessEqual
            | Operator::GreaterEqual => number::compare(op, &lhs, &rhs),
        Operator::Equal => Ok(Value::boolean(lhs == rhs)),
        Operator::NotEqual => Ok(Value::boolean(lhs != rhs)),
        Operator::And => Ok(if lhs.truey() { rhs } else { Value::boolean(false) }),
        Operator::Or => Ok(if lhs.truey() { lhs } else { rhs }),
        Operator::Assign =>
            Err(Error::InvalidAssignmentTarget(format!("{:?}", lhs))),
    }
}

impl Closure {
    fn invoke(&self, args: Vec<Value>) -> Result<Value, Error> {
        let _span = tracing::trace_span!("call",
            name = self.name().unwrap_or("<anonymous>"),
            argc = args.len()).entered();

        let scope = self.env.extend();
        let mut args = args.into_iter();
        for param in self.params() {
            scope.define(param, args.next().unwrap_or(Value::boolean(false)));
        }
        self.lambda.body.eval(&scope)
    }
}

impl Value {
    pub fn apply(&self, args: Vec<Value>) -> Result<Value, Error> {
        match *self {
            Value::Closure(ref closure) => closure.invoke(args),
            Value::Builtin(ref builtin) => builtin.call(args),
            _ => Err(Error::NotCallable(format!("{:?}", self))),
        }
    }
}

impl Node {
    pub fn eval(&self, env: &Environment) -> Result<Value, Error> {
        match *self {
            Node::Num(n) => Ok(Value::number(n)),
            Node::Str(ref s) => Ok(Value::string(s)),
            Node::Bool(b) => Ok(Value::boolean(b)),
            Node::Var(ref name) => env.read(name),
            Node::Assign { ref left, ref right } => {
                let name = match **left {
                    Node::Var(ref name) => name,
                    ref other => return Err(Error::InvalidAssignmentTarget(
                        other.to_string())),
                };
                let value = right.eval(env)?;
                env.rebind(name, value.clone())?;
                Ok(value)
            },
            // Both sides are always evaluated; `&&` and `||` do not
            // short-circuit.
            Node::Binary { op, ref left, ref right } => {
                let lhs = left.eval(env)?;
                let rhs = right.eval(env)?;
                apply_binary(op, lhs, rhs)
            },
            Node::Lambda(ref lambda) => Ok(make_closure(lambda, env)),
            Node::If { ref cond, ref then, ref otherwise } => {
                if cond.eval(env)?.truey() {
                    then.eval(env)
                } else if let Some(otherwise) = otherwise {
                    otherwise.eval(env)
                } else {
                    Ok(Value::boolean(false))
                }
            },
            Node::Let { ref bindings, ref body } => {
                let mut scope = env.clone();
                for (name, init) in bindings {
                    let value = match init {
                        Some(init) => init.eval(&scope)?,
                        None => Value::boolean(false),
                    };
                    scope = scope.extend();
                    scope.define(name, value);
                }
                body.eval(&scope)
            },
            Node::Program(ref prog) => {
                let mut value = Value::boolean(false);
                for expr in prog {
                    value = expr.eval(env)?;
                }
                Ok(value)
            },
            Node::Call { ref func, ref args } => {
                let callee = func.eval(env)?;
                if !callee.is_callable() {
                    return Err(Error::NotCallable(func.to_string()));
                }
                let args = args.iter()
                    .map(|arg| arg.eval(env))
                    .collect::<Result<Vec<_>, _>>()?;
                callee.apply(args)
            },
        }
    }
}
