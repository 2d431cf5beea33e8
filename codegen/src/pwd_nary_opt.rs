//! N-ary derivative combinators with mutable node records holding a list of
//! children.

use grammar::TokenCollection;

use crate::common::{token_tag, Encoding};
use crate::error::Result;

const NODE_FILLER: &str =
    "nullable = Nullable_unvisited; listeners = []; key = false_token; value = false_node; ast = []";

pub(crate) struct PwdNaryOpt;

fn node(tag: &str, children: &[String]) -> String {
    format!(
        "{{ tag = {}; children = [ {} ]; {} }}",
        tag,
        children.join("; "),
        NODE_FILLER
    )
}

impl Encoding for PwdNaryOpt {
    const PREFIX: &'static str = "pwd_nary_opt_rule_";
    const MODULE: &'static str = "Pwd_nary_opt";

    fn token(&self, name: &str, tokens: &TokenCollection) -> Result<String> {
        Ok(format!(
            "make_token_node (fun c -> fst c == {}) \"{}\"",
            token_tag(tokens, name)?,
            name
        ))
    }

    fn production(&self, label: &str, parts: &[String]) -> String {
        match parts {
            [] => format!("make_eps_node (lazy [Pyast.Ast (\"{}\", [])])", label),
            [_] => node(
                &format!(
                    "Red_tag (List.map (fun t -> Pyast.Ast (\"{}\", [t])))",
                    label
                ),
                parts,
            ),
            _ => node(
                &format!(
                    "Red_tag (List.map (fun (Pyast.Ast (_, ts)) -> Pyast.Ast (\"{}\", ts)))",
                    label
                ),
                &[node("Seq_tag", parts)],
            ),
        }
    }

    fn alternation(&self, productions: Vec<String>) -> String {
        node("Alt_tag", &productions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn productions() {
        assert_eq!(
            PwdNaryOpt.production("r", &[]),
            "make_eps_node (lazy [Pyast.Ast (\"r\", [])])"
        );
        assert_eq!(
            PwdNaryOpt.production("r", &parts(&["a"])),
            format!(
                "{{ tag = Red_tag (List.map (fun t -> Pyast.Ast (\"r\", [t]))); children = [ a ]; {} }}",
                NODE_FILLER
            )
        );
        let seq = format!(
            "{{ tag = Seq_tag; children = [ a; b; c ]; {} }}",
            NODE_FILLER
        );
        assert_eq!(
            PwdNaryOpt.production("r", &parts(&["a", "b", "c"])),
            format!(
                "{{ tag = Red_tag (List.map (fun (Pyast.Ast (_, ts)) -> Pyast.Ast (\"r\", ts))); children = [ {} ]; {} }}",
                seq, NODE_FILLER
            )
        );
    }
}
