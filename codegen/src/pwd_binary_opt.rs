//! Binary derivative combinators with mutable, pre-allocated node records.

use grammar::TokenCollection;

use crate::common::{fold_right, token_tag, Encoding};
use crate::error::Result;

/// Fields every node record starts out with.
const NODE_FILLER: &str =
    "nullable = Nullable_unvisited; listeners = []; key = false_token; value = false_node; ast = []";

pub(crate) struct PwdBinaryOpt;

fn node(tag: &str, child1: &str, child2: &str) -> String {
    format!(
        "{{ tag = {}; child1 = {}; child2 = {}; {} }}",
        tag, child1, child2, NODE_FILLER
    )
}

impl Encoding for PwdBinaryOpt {
    const PREFIX: &'static str = "pwd_binary_opt_rule_";
    const MODULE: &'static str = "Pwd_binary_opt";

    fn token(&self, name: &str, tokens: &TokenCollection) -> Result<String> {
        Ok(format!(
            "make_token_node (fun c -> fst c == {}) \"{}\"",
            token_tag(tokens, name)?,
            name
        ))
    }

    fn production(&self, label: &str, parts: &[String]) -> String {
        match parts {
            [] => format!("make_eps_node (lazy [Pyast.Seq (\"{}\", [])])", label),
            [part] => node(
                &format!(
                    "Red_tag (List.map (fun t -> Pyast.Seq (\"{}\", [t])))",
                    label
                ),
                part,
                "false_node",
            ),
            [first, second] => node(
                &format!(
                    "Red_tag (List.map (fun (Pyast.Seq (_, [t1; t2])) -> Pyast.Seq (\"{}\", [t1; t2])))",
                    label
                ),
                &node("Seq_tag", first, second),
                "false_node",
            ),
            _ => {
                let nested = fold_right(parts.to_vec(), |left, rest| node("Seq_tag", left, rest));
                node(
                    &format!(
                        "Red_tag (List.map (Pyast.flatten_binary_seqs {} \"{}\"))",
                        parts.len() - 1,
                        label
                    ),
                    &nested,
                    "false_node",
                )
            }
        }
    }

    fn alternation(&self, productions: Vec<String>) -> String {
        fold_right(productions, |left, right| node("Alt_tag", left, right))
    }
}
