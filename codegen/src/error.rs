use grammar::SymbolTag;
use std::error;
use std::fmt::{self, Display};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A rule reached a generator with other than exactly one group.
    Contract { rule: String, groups: usize },
    EmptyGroup { rule: String },
    /// A component that normalization should have removed.
    InvalidComponent { rule: String, tag: SymbolTag },
    UnnamedTerminal { rule: String, terminal: String },
    UntaggedToken(String),
    /// The target format can't encode a production this long.
    TooManyComponents {
        backend: &'static str,
        rule: String,
        count: usize,
        limit: usize,
    },
    UnknownBackend(String),
}

impl Error {
    /// Whether the error means an unnormalized grammar was handed to a
    /// generator, rather than a grammar the target can't express.
    pub fn is_contract_violation(&self) -> bool {
        match *self {
            Error::Contract { .. }
            | Error::EmptyGroup { .. }
            | Error::InvalidComponent { .. }
            | Error::UnnamedTerminal { .. }
            | Error::UntaggedToken(_) => true,
            Error::TooManyComponents { .. } | Error::UnknownBackend(_) => false,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Contract { ref rule, groups } => write!(
                f,
                "rule {} has {} top-level groups; expected 1",
                rule, groups
            ),
            Error::EmptyGroup { ref rule } => write!(f, "rule {} has no productions", rule),
            Error::InvalidComponent { ref rule, tag } => write!(
                f,
                "invalid component instance in production of rule {} of class {}",
                rule, tag
            ),
            Error::UnnamedTerminal {
                ref rule,
                ref terminal,
            } => write!(f, "terminal {} in rule {} has no token name", terminal, rule),
            Error::UntaggedToken(ref name) => write!(f, "token {} has no tag", name),
            Error::TooManyComponents {
                backend,
                ref rule,
                count,
                limit,
            } => write!(
                f,
                "cannot create production of rule {} with {} parts; {} allows at most {}",
                rule, count, backend, limit
            ),
            Error::UnknownBackend(ref name) => write!(f, "unknown backend {}", name),
        }
    }
}

impl error::Error for Error {}
