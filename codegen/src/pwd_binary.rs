//! Binary derivative combinators over lazy nodes.

use grammar::TokenCollection;

use crate::common::{binary_sequence, fold_right, token_pair, Encoding};
use crate::error::Result;

pub(crate) struct PwdBinary;

impl Encoding for PwdBinary {
    const PREFIX: &'static str = "pwd_binary_rule_";
    const MODULE: &'static str = "Pwd_binary";

    fn token(&self, name: &str, tokens: &TokenCollection) -> Result<String> {
        Ok(format!("lazy (Tok {})", token_pair(tokens, name)?))
    }

    fn production(&self, label: &str, parts: &[String]) -> String {
        match parts {
            [] => format!("lazy (Eps (lazy [Pyast.Seq (\"{}\", [])]))", label),
            [part] => format!(
                "lazy (Red ((fun t -> Pyast.Seq (\"{}\", [t])), {}))",
                label, part
            ),
            [first, second] => format!("lazy (Seq (\"{}\", {}, {}))", label, first, second),
            _ => binary_sequence(
                label,
                parts,
                |label, left, rest| format!("lazy (Seq (\"{}\", {}, {}))", label, left, rest),
                |depth, nested| {
                    format!(
                        "lazy (Red (Pyast.flatten_binary_seqs {} \"{}\", {}))",
                        depth, label, nested
                    )
                },
            ),
        }
    }

    fn alternation(&self, productions: Vec<String>) -> String {
        fold_right(productions, |left, right| {
            format!("lazy (Alt ({}, {}))", left, right)
        })
    }
}
