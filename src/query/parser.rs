//! # Custom Query Parser
//!
//! Parses free-text query blocks, one statement per line:
//!
//! ```text
//! Query.equal("status", "active")
//! Query.greaterThan("price", 100)
//! between("price", 10, 100)
//! Query.select(["name", "email"])
//! ```
//!
//! Each statement is a single call `[Query.]method(arg, ...)` where an
//! argument is a quoted string, a number, `true`/`false`, or a bracketed list
//! of those. Nothing is evaluated. Unlike the structured builder, an unknown
//! method is an error: the author typed it and a typo must surface.

use serde_json::Number;

use super::errors::{LineFault, QueryError, QueryResult};
use super::expression::QueryExpression;
use super::kind::{QueryKind, Shape};
use super::value::{QueryValue, Scalar};

/// Optional namespace in front of the method name
const NAMESPACE: &str = "Query";

/// Custom query text parser
pub struct CustomQueryParser;

impl CustomQueryParser {
    /// Parse a whole block. Blank lines are ignored; the first bad line fails
    /// the block with its 1-based line number.
    pub fn parse(text: &str) -> QueryResult<Vec<QueryExpression>> {
        let mut expressions = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let expr = Self::parse_statement(line).map_err(|fault| QueryError::InvalidLine {
                line: index + 1,
                text: line.to_string(),
                fault,
            })?;
            expressions.push(expr);
        }

        Ok(expressions)
    }

    /// Parse a single trimmed statement
    pub fn parse_statement(statement: &str) -> Result<QueryExpression, LineFault> {
        let mut cursor = Cursor::new(statement);
        let (kind, args) = cursor.call()?;
        assemble(kind, args)
    }
}

/// A parsed call argument
#[derive(Debug, Clone, PartialEq)]
enum Arg {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

/// Character cursor over one statement. Columns are 1-based.
struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn column(&self) -> usize {
        self.pos + 1
    }

    fn skip_whitespace(&mut self) {
        while self.peek().map_or(false, char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char, expected: &'static str) -> Result<(), LineFault> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(LineFault::Expected {
                expected,
                column: self.column(),
            })
        }
    }

    fn identifier(&mut self) -> Option<String> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(c) = self.peek() {
            let valid = if self.pos == start {
                c.is_ascii_alphabetic() || c == '_' || c == '$'
            } else {
                c.is_ascii_alphanumeric() || c == '_' || c == '$'
            };
            if !valid {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            None
        } else {
            Some(self.chars[start..self.pos].iter().collect())
        }
    }

    /// `[Query.]method(args...)[;]` followed by end of input
    fn call(&mut self) -> Result<(QueryKind, Vec<Arg>), LineFault> {
        let missing_method = |column| LineFault::Expected {
            expected: "query method",
            column,
        };

        let mut name = self
            .identifier()
            .ok_or_else(|| missing_method(self.column()))?;
        if name == NAMESPACE && self.eat('.') {
            name = self
                .identifier()
                .ok_or_else(|| missing_method(self.column()))?;
        }

        let kind = QueryKind::from_method(&name).ok_or(LineFault::UnknownMethod(name))?;

        self.expect('(', "'('")?;
        let mut args = Vec::new();
        if !self.eat(')') {
            loop {
                args.push(self.arg()?);
                if self.eat(',') {
                    continue;
                }
                self.expect(')', "',' or ')'")?;
                break;
            }
        }

        self.eat(';');
        self.skip_whitespace();
        if self.pos < self.chars.len() {
            return Err(LineFault::TrailingInput(self.column()));
        }

        Ok((kind, args))
    }

    fn arg(&mut self) -> Result<Arg, LineFault> {
        if !self.eat('[') {
            return self.scalar().map(Arg::Scalar);
        }

        let mut items = Vec::new();
        if self.eat(']') {
            return Ok(Arg::List(items));
        }
        loop {
            items.push(self.scalar()?);
            if self.eat(',') {
                continue;
            }
            self.expect(']', "',' or ']'")?;
            return Ok(Arg::List(items));
        }
    }

    fn scalar(&mut self) -> Result<Scalar, LineFault> {
        self.skip_whitespace();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => self.string(quote).map(Scalar::String),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number().map(Scalar::Number),
            Some(c) if c.is_ascii_alphabetic() => {
                let word = self.identifier().unwrap_or_default();
                match word.as_str() {
                    "true" => Ok(Scalar::Bool(true)),
                    "false" => Ok(Scalar::Bool(false)),
                    _ => Err(LineFault::InvalidLiteral(word)),
                }
            }
            _ => Err(LineFault::Expected {
                expected: "a string, number or boolean",
                column: self.column(),
            }),
        }
    }

    fn string(&mut self, quote: char) -> Result<String, LineFault> {
        let start = self.column();
        self.pos += 1;

        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(LineFault::UnterminatedString(start)),
                Some('\\') => {
                    self.pos += 1;
                    match self.peek() {
                        None => return Err(LineFault::UnterminatedString(start)),
                        Some('n') => out.push('\n'),
                        Some('r') => out.push('\r'),
                        Some('t') => out.push('\t'),
                        Some(c) => out.push(c),
                    }
                    self.pos += 1;
                }
                Some(c) if c == quote => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some(c) => {
                    out.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    fn number(&mut self) -> Result<Number, LineFault> {
        let start = self.pos;
        while self
            .peek()
            .map_or(false, |c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
        {
            self.pos += 1;
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        serde_json::from_str::<Number>(&literal).map_err(|_| LineFault::InvalidLiteral(literal))
    }
}

/// Map parsed arguments onto the kind's shape
fn assemble(kind: QueryKind, args: Vec<Arg>) -> Result<QueryExpression, LineFault> {
    let shape_fault = |err: QueryError| LineFault::Shape(Box::new(err));
    let mut args = args.into_iter();

    let attribute = if kind.takes_attribute() {
        match args.next() {
            Some(Arg::Scalar(Scalar::String(attr))) => Some(attr),
            Some(_) => {
                return Err(shape_fault(QueryError::InvalidOperand {
                    kind,
                    reason: "attribute must be a string".to_string(),
                }))
            }
            None => return Err(shape_fault(QueryError::MissingAttribute(kind))),
        }
    } else {
        None
    };

    let mut operands = Vec::new();
    for arg in args {
        let operand = match (kind.shape(), arg) {
            (Shape::Single, Arg::List(mut items)) => {
                if items.len() != 1 {
                    return Err(shape_fault(QueryError::Arity {
                        kind,
                        expected: Shape::Single.describe(),
                        found: items.len(),
                    }));
                }
                QueryValue::Scalar(items.remove(0))
            }
            (_, Arg::List(items)) => QueryValue::List(items),
            (_, Arg::Scalar(s)) => QueryValue::Scalar(s),
        };
        operands.push(operand);
    }

    QueryExpression::new(kind, attribute, operands).map_err(shape_fault)
}
