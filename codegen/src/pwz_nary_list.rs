//! N-ary zipper combinators where every node is a record with a memo field.

use grammar::TokenCollection;

use crate::common::{token_pair, Encoding};
use crate::error::Result;

pub(crate) struct PwzNaryList;

fn node(expression: &str) -> String {
    format!("{{ m = m_bottom; e' = {} }}", expression)
}

impl Encoding for PwzNaryList {
    const PREFIX: &'static str = "pwz_nary_list_rule_";
    const MODULE: &'static str = "Pwz_nary_list";

    fn token(&self, name: &str, tokens: &TokenCollection) -> Result<String> {
        Ok(node(&format!("Tok {}", token_pair(tokens, name)?)))
    }

    fn production(&self, label: &str, parts: &[String]) -> String {
        node(&format!("Seq (\"{}\", [ {} ])", label, parts.join("; ")))
    }

    fn alternation(&self, productions: Vec<String>) -> String {
        node(&format!("Alt (ref [ {} ])", productions.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn records() {
        let tests = vec![
            (vec![], "{ m = m_bottom; e' = Seq (\"r-2\", [  ]) }"),
            (vec!["a"], "{ m = m_bottom; e' = Seq (\"r-2\", [ a ]) }"),
            (vec!["a", "b"], "{ m = m_bottom; e' = Seq (\"r-2\", [ a; b ]) }"),
        ];
        for (names, expected) in tests {
            assert_eq!(PwzNaryList.production("r-2", &parts(&names)), expected, "parts: {:?}", names);
        }
        assert_eq!(
            PwzNaryList.alternation(parts(&["a", "b"])),
            "{ m = m_bottom; e' = Alt (ref [ a; b ]) }"
        );
    }

    #[test]
    fn untagged_token() {
        let tokens = TokenCollection::default();
        assert!(PwzNaryList.token("PLUS", &tokens).is_ok());
        assert_eq!(
            PwzNaryList.token("TOKEN_1", &tokens).unwrap_err(),
            crate::error::Error::UntaggedToken("TOKEN_1".to_owned())
        );
    }
}
