mod cursor;
pub mod lexer;

use std::collections::HashMap;

use crate::ast::{Node, Operator};
use crate::error::Error;
use self::lexer::{Keyword, Lexer, Token};

pub use self::lexer::tokenize;

lazy_static! {
    static ref PRECEDENCE: HashMap<Operator, u8> = hashmap! {
        Operator::Assign => 1,
        Operator::Or => 2,
        Operator::And => 3,
        Operator::Less => 7,
        Operator::Greater => 7,
        Operator::LessEqual => 7,
        Operator::GreaterEqual => 7,
        Operator::Equal => 7,
        Operator::NotEqual => 7,
        Operator::Add => 10,
        Operator::Sub => 10,
        Operator::Mul => 20,
        Operator::Div => 20,
        Operator::Rem => 20,
    };
}

fn precedence(op: Operator) -> u8 {
    PRECEDENCE.get(&op).cloned().unwrap_or(0)
}

/// Parse a whole program: `;`-separated expressions up to end of input.
pub fn read(input: &str) -> Result<Node, Error> {
    Reader::new(input).read_program()
}

pub struct Reader<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a str) -> Self {
        Reader {
            lexer: Lexer::new(input),
        }
    }

    fn is_punctuation(&mut self, ch: char) -> Result<bool, Error> {
        Ok(self.lexer.peek()?.map_or(false, |tok| tok.is_punctuation(ch)))
    }

    fn is_keyword(&mut self, kw: Keyword) -> Result<bool, Error> {
        Ok(self.lexer.peek()?.map_or(false, |tok| tok.is_keyword(kw)))
    }

    fn peek_operator(&mut self) -> Result<Option<Operator>, Error> {
        match self.lexer.peek()? {
            Some(&Token::Operator(op)) => Ok(Some(op)),
            _ => Ok(None),
        }
    }

    fn peek_variable(&mut self) -> Result<bool, Error> {
        Ok(matches!(self.lexer.peek()?, Some(Token::Variable(_))))
    }

    fn skip_punctuation(&mut self, ch: char) -> Result<(), Error> {
        if self.is_punctuation(ch)? {
            self.lexer.next()?;
            Ok(())
        } else {
            Err(self.lexer.croak(format!("Expecting punctuation: \"{}\"", ch)))
        }
    }

    fn skip_keyword(&mut self, kw: Keyword) -> Result<(), Error> {
        if self.is_keyword(kw)? {
            self.lexer.next()?;
            Ok(())
        } else {
            Err(self.lexer.croak(format!("Expecting keyword: \"{}\"",
                kw.as_str())))
        }
    }

    /// `start item sep item ... stop`; a trailing separator is allowed.
    fn delimited<T, F>(&mut self, start: char, stop: char, separator: char,
        mut parser: F) -> Result<Vec<T>, Error>
        where F: FnMut(&mut Self) -> Result<T, Error> {

        let mut result = Vec::new();
        let mut first = true;
        self.skip_punctuation(start)?;
        while !self.lexer.eof()? {
            if self.is_punctuation(stop)? {
                break;
            }
            if first {
                first = false;
            } else {
                self.skip_punctuation(separator)?;
            }
            if self.is_punctuation(stop)? {
                break;
            }
            result.push(parser(self)?);
        }
        self.skip_punctuation(stop)?;
        Ok(result)
    }

    pub fn read_program(&mut self) -> Result<Node, Error> {
        let mut prog = Vec::new();
        while !self.lexer.eof()? {
            prog.push(self.read_expression()?);
            if !self.lexer.eof()? {
                self.skip_punctuation(';')?;
            }
        }
        Ok(Node::Program(prog))
    }

    pub fn read_expression(&mut self) -> Result<Node, Error> {
        let atom = self.read_atom()?;
        let expr = self.maybe_binary(atom, 0)?;
        self.maybe_call(expr)
    }

    fn maybe_call(&mut self, mut expr: Node) -> Result<Node, Error> {
        while self.is_punctuation('(')? {
            let args = self.delimited('(', ')', ',', Self::read_expression)?;
            expr = Node::call(expr, args);
        }
        Ok(expr)
    }

    // Precedence climbing. The right operand only absorbs operators binding
    // strictly tighter than `op`, so equal precedence associates left.
    fn maybe_binary(&mut self, mut left: Node, min_prec: u8)
        -> Result<Node, Error> {

        loop {
            let op = match self.peek_operator()? {
                Some(op) if precedence(op) > min_prec => op,
                _ => return Ok(left),
            };
            self.lexer.next()?;
            let atom = self.read_atom()?;
            let right = self.maybe_binary(atom, precedence(op))?;
            left = Node::binary(op, left, right);
        }
    }

    fn read_atom(&mut self) -> Result<Node, Error> {
        let expr = self.read_primary()?;
        self.maybe_call(expr)
    }

    fn read_primary(&mut self) -> Result<Node, Error> {
        if self.is_punctuation('(')? {
            self.lexer.next()?;
            let expr = self.read_expression()?;
            self.skip_punctuation(')')?;
            return Ok(expr);
        }
        if self.is_punctuation('{')? {
            return self.read_block();
        }
        if self.is_keyword(Keyword::Let)? {
            return self.read_let();
        }
        if self.is_keyword(Keyword::If)? {
            return self.read_if();
        }

        let tok = match self.lexer.peek()?.cloned() {
            Some(tok) => tok,
            None => return Err(self.lexer.croak("Unexpected end of input")),
        };
        let node = match tok {
            Token::Boolean(b) => Node::Bool(b),
            Token::Number(n) => Node::Num(n),
            Token::String(s) => Node::Str(s),
            Token::Variable(name) => Node::Var(name),
            Token::Keyword(Keyword::Lambda)
                | Token::Keyword(Keyword::LambdaSign) => {
                self.lexer.next()?;
                return self.read_lambda();
            },
            tok => {
                return Err(self.lexer.croak(format!("Unexpected token: {}",
                    tok)));
            },
        };
        self.lexer.next()?;
        Ok(node)
    }

    fn read_varname(&mut self) -> Result<String, Error> {
        match self.lexer.next()? {
            Some(Token::Variable(name)) => Ok(name),
            _ => Err(self.lexer.croak("Expecting variable name")),
        }
    }

    fn read_vardef(&mut self) -> Result<(String, Option<Node>), Error> {
        let name = self.read_varname()?;
        let init = if self.peek_operator()? == Some(Operator::Assign) {
            self.lexer.next()?;
            Some(self.read_expression()?)
        } else {
            None
        };
        Ok((name, init))
    }

    // Keyword already consumed.
    fn read_lambda(&mut self) -> Result<Node, Error> {
        let name = if self.peek_variable()? {
            Some(self.read_varname()?)
        } else {
            None
        };
        let params = self.delimited('(', ')', ',', Self::read_varname)?;
        let body = self.read_expression()?;
        Ok(Node::lambda(name, params, body))
    }

    fn read_block(&mut self) -> Result<Node, Error> {
        let mut prog = self.delimited('{', '}', ';', Self::read_expression)?;
        Ok(match prog.len() {
            0 => Node::Bool(false),
            1 => prog.remove(0),
            _ => Node::Program(prog),
        })
    }

    fn read_if(&mut self) -> Result<Node, Error> {
        self.skip_keyword(Keyword::If)?;
        let cond = self.read_expression()?;
        if !self.is_punctuation('{')? {
            self.skip_keyword(Keyword::Then)?;
        }
        let then = self.read_expression()?;
        let otherwise = if self.is_keyword(Keyword::Else)? {
            self.lexer.next()?;
            Some(Box::new(self.read_expression()?))
        } else {
            None
        };
        Ok(Node::If {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise,
        })
    }

    // `let name(a = 1, b) body` is sugar for calling a self-named lambda;
    // `let (a = 1, b) body` gets its own node.
    fn read_let(&mut self) -> Result<Node, Error> {
        self.skip_keyword(Keyword::Let)?;
        if self.peek_variable()? {
            let name = self.read_varname()?;
            let defs = self.delimited('(', ')', ',', Self::read_vardef)?;
            let body = self.read_expression()?;
            let (params, args): (Vec<_>, Vec<_>) = defs.into_iter()
                .map(|(param, init)| (param, init.unwrap_or(Node::Bool(false))))
                .unzip();
            Ok(Node::call(Node::lambda(Some(name), params, body), args))
        } else {
            let bindings = self.delimited('(', ')', ',', Self::read_vardef)?;
            let body = self.read_expression()?;
            Ok(Node::Let {
                bindings,
                body: Box::new(body),
            })
        }
    }
}
