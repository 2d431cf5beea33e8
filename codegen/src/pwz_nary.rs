//! N-ary zipper combinators with memoized alternatives.

use grammar::TokenCollection;

use crate::common::{token_pair, Encoding};
use crate::error::Result;

pub(crate) struct PwzNary;

impl Encoding for PwzNary {
    const PREFIX: &'static str = "pwz_nary_rule_";
    const MODULE: &'static str = "Pwz_nary";

    fn token(&self, name: &str, tokens: &TokenCollection) -> Result<String> {
        Ok(format!("Tok {}", token_pair(tokens, name)?))
    }

    fn production(&self, label: &str, parts: &[String]) -> String {
        format!("Seq (\"{}\", [ {} ])", label, parts.join("; "))
    }

    fn alternation(&self, productions: Vec<String>) -> String {
        format!("Alt (ref [ {} ])", productions.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::let_rec;
    use grammar::{Grammar, GrammarDescription};

    #[test]
    fn binding_group() {
        let grammar: Grammar = "s: NAME '+' s | '?'\n".parse().unwrap();
        let desc = GrammarDescription::new(grammar, vec!["s".to_owned()]).unwrap();
        let expected = vec![
            "open Pytokens",
            "open Pwz_nary",
            "",
            "let rec pwz_nary_rule_PLUS = Tok (26, \"PLUS\")",
            "    and pwz_nary_rule_TOKEN_1 = Tok (86, \"TOKEN_1\")",
            "    and pwz_nary_rule_NAME = Tok (83, \"NAME\")",
            "    and pwz_nary_rule_s = Alt (ref [ Seq (\"s-1\", [ pwz_nary_rule_NAME; pwz_nary_rule_PLUS; pwz_nary_rule_s ]); Seq (\"s-2\", [ pwz_nary_rule_TOKEN_1 ]) ])",
            "",
        ];
        assert_eq!(let_rec(&PwzNary, &desc).unwrap(), expected);
    }
}
