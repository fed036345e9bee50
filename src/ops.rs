use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::lstack::{Stack, StackError};
use crate::types::{Count, Value};

op_variants! {
    StackOps,
    Push(Value),
    Pop(),
    Peek(),
    Size(),
    IsEmpty(),
    Clear()
}

/// Outcome of applying one [`StackOps`] to a stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reply {
    Ok,
    Int(Value),
    Count(Count),
    Bool(bool),
    Error(StackError),
}

impl Reply {
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}

impl From<Count> for Reply {
    fn from(count: Count) -> Reply {
        Reply::Count(count)
    }
}

impl From<bool> for Reply {
    fn from(b: bool) -> Reply {
        Reply::Bool(b)
    }
}

impl Display for Reply {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => write!(f, "OK"),
            Reply::Int(i) => write!(f, "(integer) {}", i),
            Reply::Count(n) => write!(f, "(count) {}", n),
            Reply::Bool(b) => write!(f, "(bool) {}", b),
            Reply::Error(err) => write!(f, "(error) {}", err),
        }
    }
}

pub fn stack_interact(stack_op: StackOps, stack: &mut Stack) -> Reply {
    match stack_op {
        StackOps::Push(value) => stack.push(value).map_or_else(Reply::Error, Reply::Count),
        StackOps::Pop() => stack.pop().map_or_else(Reply::Error, Reply::Int),
        StackOps::Peek() => stack.peek().map_or_else(Reply::Error, Reply::Int),
        StackOps::Size() => stack.size().into(),
        StackOps::IsEmpty() => stack.is_empty().into(),
        StackOps::Clear() => {
            stack.clear();
            Reply::Ok
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOpError {
    Empty,
    UnknownOp(String),
    MissingArgument(String),
    InvalidArgument(String),
    TrailingInput(String),
}

impl Display for ParseOpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseOpError::Empty => write!(f, "empty operation"),
            ParseOpError::UnknownOp(name) => write!(f, "unknown operation \"{}\"", name),
            ParseOpError::MissingArgument(name) => {
                write!(f, "operation \"{}\" needs an integer argument", name)
            }
            ParseOpError::InvalidArgument(arg) => write!(f, "\"{}\" is not an integer", arg),
            ParseOpError::TrailingInput(rest) => write!(f, "unexpected input \"{}\"", rest),
        }
    }
}

impl Error for ParseOpError {}

impl FromStr for StackOps {
    type Err = ParseOpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let name = parts.next().ok_or(ParseOpError::Empty)?.to_ascii_lowercase();
        let op = match name.as_str() {
            "push" => {
                let arg = parts
                    .next()
                    .ok_or_else(|| ParseOpError::MissingArgument(name.clone()))?;
                let value = arg
                    .parse::<Value>()
                    .map_err(|_| ParseOpError::InvalidArgument(arg.to_string()))?;
                StackOps::Push(value)
            }
            "pop" => StackOps::Pop(),
            "peek" => StackOps::Peek(),
            "size" => StackOps::Size(),
            "is_empty" | "isempty" => StackOps::IsEmpty(),
            "clear" => StackOps::Clear(),
            _ => return Err(ParseOpError::UnknownOp(name)),
        };
        if let Some(rest) = parts.next() {
            return Err(ParseOpError::TrailingInput(rest.to_string()));
        }
        Ok(op)
    }
}

/// Parses one operation per line. Blank lines and lines starting with `#`
/// are skipped.
pub fn parse_script(script: &str) -> Result<Vec<StackOps>, ParseOpError> {
    script
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::parse)
        .collect()
}
