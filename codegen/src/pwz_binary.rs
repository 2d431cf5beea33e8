//! Binary zipper combinators. Every node is a record carrying a memo field.

use grammar::TokenCollection;

use crate::common::{binary_sequence, fold_right, token_pair, Encoding};
use crate::error::Result;

const M_BOT: &str = "m_bottom";

pub(crate) struct PwzBinary;

fn node(expression: &str) -> String {
    format!("{{ m = {}; e' = {} }}", M_BOT, expression)
}

impl Encoding for PwzBinary {
    const PREFIX: &'static str = "pwz_binary_rule_";
    const MODULE: &'static str = "Pwz_binary";

    fn token(&self, name: &str, tokens: &TokenCollection) -> Result<String> {
        Ok(node(&format!("Tok {}", token_pair(tokens, name)?)))
    }

    fn production(&self, label: &str, parts: &[String]) -> String {
        match parts {
            [] => node(&format!("Eps \"{}\"", label)),
            [part] => node(&format!(
                "Red ((fun t -> Pyast.Ast (\"{}\", [t])), {})",
                label, part
            )),
            [first, second] => node(&format!("Seq (\"{}\", {}, {})", label, first, second)),
            _ => binary_sequence(
                label,
                parts,
                |label, left, rest| node(&format!("Seq (\"{}\", {}, {})", label, left, rest)),
                |depth, nested| {
                    node(&format!(
                        "Red (Pyast.flatten_binary_seqs {} \"{}\", {})",
                        depth, label, nested
                    ))
                },
            ),
        }
    }

    fn alternation(&self, productions: Vec<String>) -> String {
        fold_right(productions, |left, right| {
            node(&format!("Alt (ref (Some {}), ref (Some {}))", left, right))
        })
    }
}
