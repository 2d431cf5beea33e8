//! N-ary derivative combinators over lazy nodes.

use grammar::TokenCollection;

use crate::common::{token_pair, Encoding};
use crate::error::Result;

pub(crate) struct PwdNary;

impl Encoding for PwdNary {
    const PREFIX: &'static str = "pwd_nary_rule_";
    const MODULE: &'static str = "Pwd_nary";

    fn token(&self, name: &str, tokens: &TokenCollection) -> Result<String> {
        Ok(format!("lazy (Tok {})", token_pair(tokens, name)?))
    }

    fn production(&self, label: &str, parts: &[String]) -> String {
        format!("lazy (Seq (\"{}\", [ {} ]))", label, parts.join("; "))
    }

    fn alternation(&self, productions: Vec<String>) -> String {
        format!("lazy (Alt [ {} ])", productions.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grammar::{Grammar, GrammarDescription};

    fn parts(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn productions() {
        let tests = vec![
            (vec![], "lazy (Seq (\"r\", [  ]))"),
            (vec!["a"], "lazy (Seq (\"r\", [ a ]))"),
            (vec!["a", "b", "c"], "lazy (Seq (\"r\", [ a; b; c ]))"),
        ];
        for (names, expected) in tests {
            assert_eq!(PwdNary.production("r", &parts(&names)), expected, "parts: {:?}", names);
        }
        assert_eq!(
            PwdNary.alternation(parts(&["a", "b", "c"])),
            "lazy (Alt [ a; b; c ])"
        );
    }

    #[test]
    fn tokens() {
        let grammar: Grammar = "s: '(' NAME ')'\n".parse().unwrap();
        let desc = GrammarDescription::new(grammar, vec!["s".to_owned()]).unwrap();
        assert_eq!(
            PwdNary.token("L_PAR", desc.tokens()).unwrap(),
            "lazy (Tok (8, \"L_PAR\"))"
        );
        assert_eq!(
            PwdNary.token("NAME", desc.tokens()).unwrap(),
            "lazy (Tok (83, \"NAME\"))"
        );
    }
}
