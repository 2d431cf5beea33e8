//! dypgen grammar file (`pydyp.dyp`).

use grammar::GrammarDescription;

use crate::error::Result;
use crate::yacc::{self, Dialect};

const DYPGEN: Dialect = Dialect {
    name: "dypgen",
    header: ("{", "}"),
    max_components: None,
    inline_single: false,
};

pub(crate) fn generate(desc: &GrammarDescription) -> Result<Vec<String>> {
    yacc::generate(&DYPGEN, desc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grammar::Grammar;

    #[test]
    fn every_rule_uses_alternatives() {
        let grammar: Grammar = "pair: NAME ',' NAME\n".parse().unwrap();
        let desc = GrammarDescription::new(grammar, vec!["pair".to_owned()]).unwrap();
        let lines = generate(&desc).unwrap();
        assert_eq!(lines[1], "{");
        assert_eq!(lines[4], "}");
        let tail: Vec<&str> = lines.iter().rev().take(3).rev().map(String::as_str).collect();
        assert_eq!(
            tail,
            vec![
                "pair:",
                "    | NAME COMMA NAME { seq (\"pair\", [ $1; $2; $3 ]) }",
                "",
            ]
        );
    }

    #[test]
    fn long_productions() {
        let grammar: Grammar = "t: NAME NAME NAME NAME NAME NAME NAME NAME NAME NAME NAME\n"
            .parse()
            .unwrap();
        let desc = GrammarDescription::new(grammar, vec!["t".to_owned()]).unwrap();
        let lines = generate(&desc).unwrap();
        assert!(lines.iter().any(|l| l.contains("$11")));
    }
}
