//! Code generators turning a [`GrammarDescription`] into parser sources for
//! the benchmarked parsing libraries.
//!
//! Every generator expects a normalized grammar: one implicit group per rule
//! and productions of bare terminals and non-terminals. Output is returned as
//! lines; nothing here touches the filesystem.

use grammar::GrammarDescription;
use log::debug;
use std::fmt::{self, Display};
use std::str::FromStr;

mod common;
mod dypgen;
mod error;
mod menhir;
mod pwd_binary;
mod pwd_binary_opt;
mod pwd_nary;
mod pwd_nary_opt;
mod pwz_binary;
mod pwz_nary;
mod pwz_nary_list;
mod pwz_nary_look;
mod tokens;
mod yacc;

use common::let_rec;
pub use error::{Error, Result};
pub use menhir::MAX_COMPONENTS as MENHIR_MAX_COMPONENTS;

/// Name of the shared token module.
pub const TOKENS_FILE: &str = "pytokens.ml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Menhir,
    Dypgen,
    PwzNary,
    PwzNaryList,
    PwzNaryLook,
    PwzBinary,
    PwdBinary,
    PwdBinaryOpt,
    PwdNary,
    PwdNaryOpt,
}

impl Backend {
    pub const ALL: &'static [Backend] = &[
        Backend::Menhir,
        Backend::Dypgen,
        Backend::PwzNary,
        Backend::PwzNaryList,
        Backend::PwzNaryLook,
        Backend::PwzBinary,
        Backend::PwdBinary,
        Backend::PwdBinaryOpt,
        Backend::PwdNary,
        Backend::PwdNaryOpt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Backend::Menhir => "menhir",
            Backend::Dypgen => "dypgen",
            Backend::PwzNary => "pwz_nary",
            Backend::PwzNaryList => "pwz_nary_list",
            Backend::PwzNaryLook => "pwz_nary_look",
            Backend::PwzBinary => "pwz_binary",
            Backend::PwdBinary => "pwd_binary",
            Backend::PwdBinaryOpt => "pwd_binary_opt",
            Backend::PwdNary => "pwd_nary",
            Backend::PwdNaryOpt => "pwd_nary_opt",
        }
    }

    /// The file the backend's output is written to.
    pub fn file_name(self) -> String {
        match self {
            Backend::Menhir => "pymen.mly".to_owned(),
            Backend::Dypgen => "pydyp.dyp".to_owned(),
            _ => format!("{}_pygram.ml", self.name()),
        }
    }

    /// Render the grammar for this backend.
    pub fn generate(self, desc: &GrammarDescription) -> Result<Vec<String>> {
        let lines = match self {
            Backend::Menhir => menhir::generate(desc),
            Backend::Dypgen => dypgen::generate(desc),
            Backend::PwzNary => let_rec(&pwz_nary::PwzNary, desc),
            Backend::PwzNaryList => let_rec(&pwz_nary_list::PwzNaryList, desc),
            Backend::PwzNaryLook => let_rec(&pwz_nary_look::PwzNaryLook, desc),
            Backend::PwzBinary => let_rec(&pwz_binary::PwzBinary, desc),
            Backend::PwdBinary => let_rec(&pwd_binary::PwdBinary, desc),
            Backend::PwdBinaryOpt => let_rec(&pwd_binary_opt::PwdBinaryOpt, desc),
            Backend::PwdNary => let_rec(&pwd_nary::PwdNary, desc),
            Backend::PwdNaryOpt => let_rec(&pwd_nary_opt::PwdNaryOpt, desc),
        }?;
        debug!("{}: generated {} lines", self, lines.len());
        Ok(lines)
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Backend::ALL
            .iter()
            .copied()
            .find(|backend| backend.name() == s)
            .ok_or_else(|| Error::UnknownBackend(s.to_owned()))
    }
}

/// Render the token module shared by all backends.
pub fn generate_tokens(desc: &GrammarDescription) -> Result<Vec<String>> {
    tokens::generate(desc)
}
