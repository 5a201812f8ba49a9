use std::iter::Peekable;
use std::str::Chars;

use crate::error::{Error, Position};

/// Character stream over the source text with one character of lookahead.
#[derive(Debug)]
pub struct Cursor<'a> {
    chars: Peekable<Chars<'a>>,
    at: Position,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Cursor<'a> {
        Cursor {
            chars: input.chars().peekable(),
            at: Position::default(),
        }
    }

    pub fn peek(&mut self) -> Option<char> {
        self.chars.peek().cloned()
    }

    pub fn next(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.at.line += 1;
            self.at.column = 0;
        } else {
            self.at.column += 1;
        }
        Some(ch)
    }

    pub fn position(&self) -> Position {
        self.at
    }

    pub fn croak<S: ToString>(&self, message: S) -> Error {
        Error::Syntax {
            message: message.to_string(),
            position: self.at,
        }
    }

    /// Consume characters while `pred` holds and return them.
    pub fn read_while<F>(&mut self, mut pred: F) -> String
        where F: FnMut(char) -> bool {

        let mut buf = String::new();
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            buf.push(ch);
            self.next();
        }
        buf
    }
}

#[cfg(test)]
mod test {
    use super::Cursor;
    use crate::error::Position;

    #[test]
    fn test_position_tracking() {
        let mut cursor = Cursor::new("ab\ncd");
        assert_eq!(cursor.position(), Position { line: 1, column: 0 });
        cursor.next();
        cursor.next();
        assert_eq!(cursor.position(), Position { line: 1, column: 2 });
        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!(cursor.position(), Position { line: 2, column: 0 });
        assert_eq!(cursor.next(), Some('c'));
        assert_eq!(cursor.position(), Position { line: 2, column: 1 });
    }

    #[test]
    fn test_read_while() {
        let mut cursor = Cursor::new("123abc");
        assert_eq!(cursor.read_while(|c| c.is_ascii_digit()), "123");
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.read_while(|_| true), "abc");
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.next(), None);
    }

    #[test]
    fn test_croak_message() {
        let mut cursor = Cursor::new("x\n  y");
        cursor.read_while(|c| c != 'y');
        assert_eq!(cursor.croak("bad").to_string(), "bad (2:2)");
    }
}
