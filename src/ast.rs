use std::fmt;
use std::rc::Rc;

/// The closed set of binary operators, `=` included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Assign,
    Or,
    And,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl Operator {
    pub fn from_str(s: &str) -> Option<Operator> {
        let op = match s {
            "=" => Operator::Assign,
            "||" => Operator::Or,
            "&&" => Operator::And,
            "<" => Operator::Less,
            ">" => Operator::Greater,
            "<=" => Operator::LessEqual,
            ">=" => Operator::GreaterEqual,
            "==" => Operator::Equal,
            "!=" => Operator::NotEqual,
            "+" => Operator::Add,
            "-" => Operator::Sub,
            "*" => Operator::Mul,
            "/" => Operator::Div,
            "%" => Operator::Rem,
            _ => return None,
        };
        Some(op)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Assign => "=",
            Operator::Or => "||",
            Operator::And => "&&",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Rem => "%",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `lambda` expression. Kept behind an `Rc` so closures built from it share
/// the node instead of copying the body.
#[derive(Debug, PartialEq)]
pub struct Lambda {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Node,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Num(f64),
    Str(String),
    Bool(bool),
    Var(String),
    Lambda(Rc<Lambda>),
    Call {
        func: Box<Node>,
        args: Vec<Node>,
    },
    If {
        cond: Box<Node>,
        then: Box<Node>,
        otherwise: Option<Box<Node>>,
    },
    /// `left = right`; `left` is only checked to be a variable when evaluated.
    Assign {
        left: Box<Node>,
        right: Box<Node>,
    },
    Binary {
        op: Operator,
        left: Box<Node>,
        right: Box<Node>,
    },
    Let {
        bindings: Vec<(String, Option<Node>)>,
        body: Box<Node>,
    },
    Program(Vec<Node>),
}

impl Node {
    pub fn lambda(name: Option<String>, params: Vec<String>, body: Node)
        -> Node {

        Node::Lambda(Rc::new(Lambda { name, params, body }))
    }

    pub fn call(func: Node, args: Vec<Node>) -> Node {
        Node::Call { func: Box::new(func), args }
    }

    pub fn binary(op: Operator, left: Node, right: Node) -> Node {
        if op == Operator::Assign {
            Node::Assign { left: Box::new(left), right: Box::new(right) }
        } else {
            Node::Binary { op, left: Box::new(left), right: Box::new(right) }
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter, items: &[T],
    sep: &str) -> fmt::Result {

    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

// Renders source-like text; used in runtime error messages.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Num(n) => write!(f, "{}", n),
            Node::Str(s) => write!(f, "{:?}", s),
            Node::Bool(b) => write!(f, "{}", b),
            Node::Var(name) => f.write_str(name),
            Node::Lambda(lambda) => {
                f.write_str("lambda ")?;
                if let Some(ref name) = lambda.name {
                    write!(f, "{} ", name)?;
                }
                f.write_str("(")?;
                write_list(f, &lambda.params, ", ")?;
                write!(f, ") {}", lambda.body)
            },
            Node::Call { func, args } => {
                write!(f, "{}(", func)?;
                write_list(f, args, ", ")?;
                f.write_str(")")
            },
            Node::If { cond, then, otherwise } => {
                write!(f, "if {} then {}", cond, then)?;
                match otherwise {
                    Some(otherwise) => write!(f, " else {}", otherwise),
                    None => Ok(()),
                }
            },
            Node::Assign { left, right } => write!(f, "{} = {}", left, right),
            Node::Binary { op, left, right } =>
                write!(f, "({} {} {})", left, op, right),
            Node::Let { bindings, body } => {
                f.write_str("let (")?;
                for (i, (name, init)) in bindings.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(name)?;
                    if let Some(init) = init {
                        write!(f, " = {}", init)?;
                    }
                }
                write!(f, ") {}", body)
            },
            Node::Program(prog) => {
                f.write_str("{ ")?;
                write_list(f, prog, "; ")?;
                f.write_str(" }")
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Node, Operator};

    #[test]
    fn test_operator_names() {
        for text in &["=", "||", "&&", "<", ">", "<=", ">=", "==", "!=", "+",
            "-", "*", "/", "%"] {
            assert_eq!(Operator::from_str(text).unwrap().as_str(), *text);
        }
        assert_eq!(Operator::from_str("=>"), None);
        assert_eq!(Operator::from_str("!"), None);
    }

    #[test]
    fn test_binary_assign_split() {
        let assign = Node::binary(Operator::Assign, Node::Var("x".into()),
            Node::Num(1.0));
        assert!(matches!(assign, Node::Assign { .. }));
        let sum = Node::binary(Operator::Add, Node::Num(1.0), Node::Num(2.0));
        assert_eq!(sum.to_string(), "(1 + 2)");
    }

    #[test]
    fn test_display_lambda() {
        let node = Node::lambda(Some("f".into()), vec!["a".into(), "b".into()],
            Node::call(Node::Var("f".into()), vec![Node::Var("a".into())]));
        assert_eq!(node.to_string(), "lambda f (a, b) f(a)");
    }
}
