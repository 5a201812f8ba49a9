use std::collections::HashMap;
use std::fmt;

use nom::combinator::all_consuming;
use nom::number::complete::double;
use nom::IResult;

use crate::ast::Operator;
use crate::error::Error;
use super::cursor::Cursor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    If,
    Then,
    Else,
    Lambda,
    /// `λ`, interchangeable with `lambda`.
    LambdaSign,
    Let,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::Then => "then",
            Keyword::Else => "else",
            Keyword::Lambda => "lambda",
            Keyword::LambdaSign => "λ",
            Keyword::Let => "let",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    String(String),
    Boolean(bool),
    Keyword(Keyword),
    Variable(String),
    Punctuation(char),
    Operator(Operator),
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, Token> = hashmap! {
        "if" => Token::Keyword(Keyword::If),
        "then" => Token::Keyword(Keyword::Then),
        "else" => Token::Keyword(Keyword::Else),
        "lambda" => Token::Keyword(Keyword::Lambda),
        "λ" => Token::Keyword(Keyword::LambdaSign),
        "let" => Token::Keyword(Keyword::Let),
        "true" => Token::Boolean(true),
        "false" => Token::Boolean(false),
    };
}

impl Token {
    pub fn is_punctuation(&self, ch: char) -> bool {
        *self == Token::Punctuation(ch)
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        *self == Token::Keyword(kw)
    }
}

// The literal form; lexing it again gives back an equal token.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::String(s) => {
                f.write_str("\"")?;
                for ch in s.chars() {
                    if ch == '"' || ch == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", ch)?;
                }
                f.write_str("\"")
            },
            Token::Boolean(b) => write!(f, "{}", b),
            Token::Keyword(kw) => f.write_str(kw.as_str()),
            Token::Variable(name) => f.write_str(name),
            Token::Punctuation(ch) => write!(f, "{}", ch),
            Token::Operator(op) => f.write_str(op.as_str()),
        }
    }
}

fn is_whitespace(ch: char) -> bool {
    ch == ' ' || ch == '\t' || ch == '\n'
}

fn is_id_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == 'λ' || ch == '_'
}

fn is_id(ch: char) -> bool {
    is_id_start(ch) || ch.is_ascii_digit() || ch == '?'
}

fn is_punctuation(ch: char) -> bool {
    ",;(){}[]".contains(ch)
}

fn is_op_char(ch: char) -> bool {
    "+-*/%=&|<>!".contains(ch)
}

fn parse_number(text: &str) -> Option<f64> {
    let res: IResult<&str, f64> = all_consuming(double)(text);
    res.ok().map(|(_, n)| n)
}

/// Tokenizer with one token of lookahead.
#[derive(Debug)]
pub struct Lexer<'a> {
    input: Cursor<'a>,
    cur_token: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer {
            input: Cursor::new(input),
            cur_token: None,
        }
    }

    pub fn peek(&mut self) -> Result<Option<&Token>, Error> {
        if self.cur_token.is_none() {
            self.cur_token = self.read_next()?;
        }
        Ok(self.cur_token.as_ref())
    }

    pub fn next(&mut self) -> Result<Option<Token>, Error> {
        match self.cur_token.take() {
            Some(tok) => Ok(Some(tok)),
            None => self.read_next(),
        }
    }

    pub fn eof(&mut self) -> Result<bool, Error> {
        Ok(self.peek()?.is_none())
    }

    pub fn croak<S: ToString>(&self, message: S) -> Error {
        self.input.croak(message)
    }

    fn read_next(&mut self) -> Result<Option<Token>, Error> {
        loop {
            self.input.read_while(is_whitespace);
            let ch = match self.input.peek() {
                Some(ch) => ch,
                None => return Ok(None),
            };

            let token = if ch == '#' {
                self.skip_comment();
                continue;
            } else if ch == '"' {
                self.read_string()?
            } else if ch.is_ascii_digit() {
                self.read_number()?
            } else if is_id_start(ch) {
                self.read_ident()
            } else if is_punctuation(ch) {
                self.input.next();
                Token::Punctuation(ch)
            } else if is_op_char(ch) {
                self.read_operator()?
            } else {
                return Err(self.croak(format!("Can't handle character: {}",
                    ch)));
            };
            return Ok(Some(token));
        }
    }

    fn skip_comment(&mut self) {
        self.input.read_while(|ch| ch != '\n');
        self.input.next();
    }

    fn read_string(&mut self) -> Result<Token, Error> {
        let mut escaped = false;
        let mut s = String::new();
        self.input.next();
        loop {
            let ch = match self.input.next() {
                Some(ch) => ch,
                None => return Err(self.croak("Unterminated string literal")),
            };
            if escaped {
                s.push(ch);
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                return Ok(Token::String(s));
            } else {
                s.push(ch);
            }
        }
    }

    fn read_number(&mut self) -> Result<Token, Error> {
        let start = self.input.position();
        let mut has_dot = false;
        let text = self.input.read_while(|ch| {
            if ch == '.' {
                !std::mem::replace(&mut has_dot, true)
            } else {
                ch.is_ascii_digit()
            }
        });
        match parse_number(&text) {
            Some(n) => Ok(Token::Number(n)),
            None => Err(Error::Syntax {
                message: format!("Invalid number: {}", text),
                position: start,
            }),
        }
    }

    fn read_ident(&mut self) -> Token {
        let id = self.input.read_while(is_id);
        match KEYWORDS.get(&*id) {
            Some(kw) => kw.clone(),
            None => Token::Variable(id),
        }
    }

    fn read_operator(&mut self) -> Result<Token, Error> {
        let start = self.input.position();
        let text = self.input.read_while(is_op_char);
        match Operator::from_str(&text) {
            Some(op) => Ok(Token::Operator(op)),
            None => Err(Error::Syntax {
                message: format!("Unknown operator: {}", text),
                position: start,
            }),
        }
    }
}

/// Lex the whole input into a vector of tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, Error> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(tok) = lexer.next()? {
        tokens.push(tok);
    }
    Ok(tokens)
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn var(name: &str) -> Token {
    Token::Variable(name.to_string())
}

#[test]
fn test_lexer() {
    assert_eq!(tokenize("f(x, 1.5);").unwrap(), vec![var("f"),
        Token::Punctuation('('), var("x"), Token::Punctuation(','),
        Token::Number(1.5), Token::Punctuation(')'),
        Token::Punctuation(';')]);
}

#[test]
fn test_keywords() {
    assert_eq!(tokenize("if then else lambda λ let true false iffy")
        .unwrap(), vec![Token::Keyword(Keyword::If),
        Token::Keyword(Keyword::Then), Token::Keyword(Keyword::Else),
        Token::Keyword(Keyword::Lambda), Token::Keyword(Keyword::LambdaSign),
        Token::Keyword(Keyword::Let), Token::Boolean(true),
        Token::Boolean(false), var("iffy")]);
}

#[test]
fn test_identifiers() {
    assert_eq!(tokenize("_tmp empty? x2 λx").unwrap(), vec![var("_tmp"),
        var("empty?"), var("x2"), var("λx")]);
}

#[test]
fn test_minus_is_not_an_identifier_char() {
    assert_eq!(tokenize("n-1").unwrap(), vec![var("n"),
        Token::Operator(Operator::Sub), Token::Number(1.0)]);
}

#[test]
fn test_operators_maximal_munch() {
    assert_eq!(tokenize("a<=b==c&&d||e!=f").unwrap(), vec![var("a"),
        Token::Operator(Operator::LessEqual), var("b"),
        Token::Operator(Operator::Equal), var("c"),
        Token::Operator(Operator::And), var("d"),
        Token::Operator(Operator::Or), var("e"),
        Token::Operator(Operator::NotEqual), var("f")]);
}

#[test]
fn test_unknown_operator() {
    let err = tokenize("x = -1").unwrap_err();
    assert_eq!(err.to_string(), "Unknown operator: =- (1:2)");
}

#[test]
fn test_numbers() {
    assert_eq!(tokenize("0 42 3.25 7.").unwrap(), vec![Token::Number(0.0),
        Token::Number(42.0), Token::Number(3.25), Token::Number(7.0)]);
}

#[test]
fn test_second_dot_ends_number() {
    let err = tokenize("1.2.3").unwrap_err();
    assert_eq!(err.to_string(), "Can't handle character: . (1:3)");
}

#[test]
fn test_strings_and_escapes() {
    assert_eq!(tokenize(r#""a \"quoted\" \\ word" "" "#).unwrap(),
        vec![Token::String("a \"quoted\" \\ word".to_string()),
        Token::String(String::new())]);
}

#[test]
fn test_unterminated_string() {
    let err = tokenize("\"abc").unwrap_err();
    assert_eq!(err.to_string(), "Unterminated string literal (1:4)");
}

#[test]
fn test_comments_and_whitespace() {
    assert_eq!(tokenize("# header\n\tx # trailing\n  y").unwrap(),
        vec![var("x"), var("y")]);
    assert_eq!(tokenize("# only a comment").unwrap(), Vec::<Token>::new());
}

#[test]
fn test_bad_character_position() {
    let err = tokenize("x;\n  @").unwrap_err();
    assert_eq!(err.to_string(), "Can't handle character: @ (2:2)");
}

#[test]
fn test_identifiers_are_ascii() {
    assert_eq!(tokenize("é").unwrap_err().to_string(),
        "Can't handle character: é (1:0)");
    assert_eq!(tokenize("x²").unwrap_err().to_string(),
        "Can't handle character: ² (1:1)");
}

#[test]
fn test_peek_does_not_consume() {
    let mut lexer = Lexer::new("a b");
    assert_eq!(lexer.peek().unwrap(), Some(&var("a")));
    assert_eq!(lexer.peek().unwrap(), Some(&var("a")));
    assert_eq!(lexer.next().unwrap(), Some(var("a")));
    assert_eq!(lexer.next().unwrap(), Some(var("b")));
    assert!(lexer.eof().unwrap());
    assert_eq!(lexer.next().unwrap(), None);
}

#[cfg(test)]
mod proptest_round_trip {
    use proptest::prelude::*;

    use crate::ast::Operator;
    use super::{tokenize, Keyword, Token};

    const OPERATORS: &[&str] = &["=", "||", "&&", "<", ">", "<=", ">=", "==",
        "!=", "+", "-", "*", "/", "%"];

    fn token() -> impl Strategy<Value = Token> {
        prop_oneof![
            (0u32..100_000, 0u32..1000).prop_map(|(int, frac)|
                Token::Number(int as f64 + frac as f64 / 1000.0)),
            "[a-z \"\\\\λ]{0,8}".prop_map(Token::String),
            any::<bool>().prop_map(Token::Boolean),
            prop_oneof![
                Just(Keyword::If),
                Just(Keyword::Then),
                Just(Keyword::Else),
                Just(Keyword::Lambda),
                Just(Keyword::LambdaSign),
                Just(Keyword::Let),
            ].prop_map(Token::Keyword),
            "[a-z_][a-z0-9_?]{0,6}"
                .prop_filter("keywords are not variables", |s|
                    !["if", "then", "else", "lambda", "let", "true", "false"]
                        .contains(&s.as_str()))
                .prop_map(Token::Variable),
            prop::sample::select(vec![',', ';', '(', ')', '{', '}', '[', ']'])
                .prop_map(Token::Punctuation),
            prop::sample::select(OPERATORS).prop_map(|s|
                Token::Operator(Operator::from_str(s).unwrap())),
        ]
    }

    proptest! {
        #[test]
        fn lexing_literal_forms_round_trips(
            tokens in proptest::collection::vec(token(), 0..32)
        ) {
            let text = tokens.iter()
                .map(|tok| tok.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            prop_assert_eq!(tokenize(&text).unwrap(), tokens);
        }
    }
}
