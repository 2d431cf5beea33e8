//! N-ary zipper combinators built through smart constructors that compute
//! lookahead sets.

use grammar::TokenCollection;

use crate::common::{token_pair, Encoding};
use crate::error::Result;

pub(crate) struct PwzNaryLook;

impl Encoding for PwzNaryLook {
    const PREFIX: &'static str = "pwz_nary_look_rule_";
    const MODULE: &'static str = "Pwz_nary_look";

    fn token(&self, name: &str, tokens: &TokenCollection) -> Result<String> {
        Ok(format!("make_tok {}", token_pair(tokens, name)?))
    }

    fn production(&self, label: &str, parts: &[String]) -> String {
        format!("make_seq \"{}\" [ {} ]", label, parts.join("; "))
    }

    fn alternation(&self, productions: Vec<String>) -> String {
        format!("make_alt [ {} ]", productions.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::let_rec;
    use grammar::{Grammar, GrammarDescription};

    #[test]
    fn smart_constructors() {
        let grammar: Grammar = "s: NAME s | ';'\n".parse().unwrap();
        let desc = GrammarDescription::new(grammar, vec!["s".to_owned()]).unwrap();
        let expected = vec![
            "open Pytokens",
            "open Pwz_nary_look",
            "",
            "let rec pwz_nary_look_rule_SEMICOLON = make_tok (2, \"SEMICOLON\")",
            "    and pwz_nary_look_rule_NAME = make_tok (83, \"NAME\")",
            "    and pwz_nary_look_rule_s = make_alt [ make_seq \"s-1\" [ pwz_nary_look_rule_NAME; pwz_nary_look_rule_s ]; make_seq \"s-2\" [ pwz_nary_look_rule_SEMICOLON ] ]",
            "",
        ];
        assert_eq!(let_rec(&PwzNaryLook, &desc).unwrap(), expected);
    }

    #[test]
    fn empty_sequence() {
        assert_eq!(PwzNaryLook.production("r", &[]), "make_seq \"r\" [  ]");
    }
}
