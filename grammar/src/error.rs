use std::error;
use std::fmt::{self, Display};

pub type Result<T> = std::result::Result<T, Error>;

/// Which stage of grammar processing rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Lex,
    Syntax,
    Semantic,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Io {
        path: String,
        message: String,
    },
    Lex {
        line: usize,
        column: usize,
        message: String,
    },
    MalformedRule {
        line: usize,
        message: String,
    },
    UnexpectedToken {
        rule: String,
        token: String,
        line: usize,
        column: usize,
    },
    MixedCaseName {
        rule: String,
        name: String,
    },
    DanglingRepetition {
        rule: String,
        line: usize,
    },
    UnclosedGroup {
        rule: String,
    },
    DuplicateRule(String),
    GroupCount {
        rule: String,
        count: usize,
    },
    MissingDefinitions(Vec<String>),
    SelfAlias(String),
    CyclicAlias {
        rule: String,
        via: String,
    },
    UnknownStartSymbol(String),
}

impl Error {
    /// Attach a source position to a lex error.
    pub(crate) fn at(self, line: usize, column: usize) -> Self {
        match self {
            Error::Lex { message, .. } => Error::Lex {
                line,
                column,
                message,
            },
            other => other,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match *self {
            Error::Io { .. } => ErrorCategory::Io,
            Error::Lex { .. } => ErrorCategory::Lex,
            Error::MalformedRule { .. }
            | Error::UnexpectedToken { .. }
            | Error::MixedCaseName { .. }
            | Error::DanglingRepetition { .. }
            | Error::UnclosedGroup { .. } => ErrorCategory::Syntax,
            Error::DuplicateRule(_)
            | Error::GroupCount { .. }
            | Error::MissingDefinitions(_)
            | Error::SelfAlias(_)
            | Error::CyclicAlias { .. }
            | Error::UnknownStartSymbol(_) => ErrorCategory::Semantic,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io {
                ref path,
                ref message,
            } => write!(f, "failed to read {}: {}", path, message),
            Error::Lex {
                line,
                column,
                ref message,
            } => write!(f, "lex error at {}:{}: {}", line, column, message),
            Error::MalformedRule { line, ref message } => {
                write!(f, "malformed rule at line {}: {}", line, message)
            }
            Error::UnexpectedToken {
                ref rule,
                ref token,
                line,
                column,
            } => write!(
                f,
                "unexpected token {} in rule {} at {}:{}",
                token, rule, line, column
            ),
            Error::MixedCaseName { ref rule, ref name } => {
                write!(f, "unexpected mixed-case NAME token {} in rule {}", name, rule)
            }
            Error::DanglingRepetition { ref rule, line } => write!(
                f,
                "repetition marker without a preceding component in rule {} at line {}",
                rule, line
            ),
            Error::UnclosedGroup { ref rule } => write!(f, "unclosed group in rule {}", rule),
            Error::DuplicateRule(ref rule) => write!(f, "rule {} is defined more than once", rule),
            Error::GroupCount { ref rule, count } => write!(
                f,
                "rule {} has {} top-level groups instead of exactly 1",
                rule, count
            ),
            Error::MissingDefinitions(ref names) => write!(
                f,
                "invalid grammar: missing definitions for the following non-terminals: {}",
                names.join(", ")
            ),
            Error::SelfAlias(ref rule) => write!(f, "cannot have self-reference in rule {}", rule),
            Error::CyclicAlias { ref rule, ref via } => write!(
                f,
                "cannot have circular references in rules {} and {}",
                rule, via
            ),
            Error::UnknownStartSymbol(ref name) => {
                write!(f, "start symbol {} is not a rule of the grammar", name)
            }
        }
    }
}

impl error::Error for Error {}

impl From<nom::Err<nom::error::Error<&str>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Error {
        let message = match err {
            nom::Err::Incomplete(_) => "incomplete input".to_owned(),
            nom::Err::Error(e) | nom::Err::Failure(e) => match e.code {
                nom::error::ErrorKind::TakeUntil => "unterminated string literal".to_owned(),
                code => format!(
                    "{} near {:?}",
                    code.description(),
                    e.input.lines().next().unwrap_or_default()
                ),
            },
        };
        Error::Lex {
            line: 0,
            column: 0,
            message,
        }
    }
}
