//! Rewrites repetitions, optional blocks and nested groups into synthesized
//! rules until every rule is a flat alternation of symbol sequences.

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::{
    Component, GrammarDict, NonTerminal, Production, ProductionGroup, Repeat, Rule, Symbol,
};

/// What a synthesized rule stands for. Part of the rule's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisKind {
    List,
    Group,
    OptionalGroup,
}

impl SynthesisKind {
    pub fn modifier(self) -> &'static str {
        match self {
            SynthesisKind::List => "lst",
            SynthesisKind::Group => "grp",
            SynthesisKind::OptionalGroup => "opt_grp",
        }
    }
}

/// Hands out synthesized rule names of the form
/// `{rule}__{modifier}_{position}__{counter}`.
///
/// The counter is shared by every name produced during one run.
#[derive(Debug)]
pub struct NameSynthesizer {
    next_id: usize,
}

impl NameSynthesizer {
    pub fn new() -> Self {
        NameSynthesizer { next_id: 1 }
    }

    pub fn next(&mut self, rule_name: &str, kind: SynthesisKind, position: usize) -> String {
        let name = format!(
            "{}__{}_{}__{}",
            rule_name,
            kind.modifier(),
            position,
            self.next_id
        );
        self.next_id += 1;
        name
    }
}

impl Default for NameSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct Normalizer {
    names: NameSynthesizer,
}

impl Normalizer {
    pub fn new() -> Self {
        Normalizer {
            names: NameSynthesizer::new(),
        }
    }

    /// Normalize every rule. Each rule is followed by the rules synthesized
    /// from it.
    pub fn transform_grammar(&mut self, rules: &GrammarDict) -> Result<GrammarDict> {
        let mut out = GrammarDict::new();
        for rule in rules.values() {
            for new_rule in self.transform_rule(rule)? {
                if out.contains_key(&new_rule.name) {
                    return Err(Error::DuplicateRule(new_rule.name));
                }
                out.insert(new_rule.name.clone(), new_rule);
            }
        }
        debug!("synthesized {} rules", out.len() - rules.len());
        Ok(out)
    }

    /// Returns the rewritten rule followed by its synthesized rules.
    pub fn transform_rule(&mut self, rule: &Rule) -> Result<Vec<Rule>> {
        let group = rule.single_group().ok_or_else(|| Error::GroupCount {
            rule: rule.name.clone(),
            count: rule.groups.len(),
        })?;

        let mut synthesized = Vec::new();
        let group = self.transform_group(group, &rule.name, &mut synthesized);
        let mut rules = Vec::with_capacity(synthesized.len() + 1);
        rules.push(Rule::new(&rule.name, group));
        rules.extend(synthesized);
        Ok(rules)
    }

    fn transform_group(
        &mut self,
        group: &ProductionGroup,
        rule_name: &str,
        out: &mut Vec<Rule>,
    ) -> ProductionGroup {
        let productions = group
            .productions
            .iter()
            .enumerate()
            .map(|(i, production)| self.transform_production(production, rule_name, i + 1, out))
            .collect();
        ProductionGroup {
            optional: group.optional,
            implicit: group.implicit,
            productions,
        }
    }

    /// `position` numbers the synthesized rules of this production, starting
    /// from the given value.
    fn transform_production(
        &mut self,
        production: &Production,
        rule_name: &str,
        mut position: usize,
        out: &mut Vec<Rule>,
    ) -> Production {
        let mut components = Vec::with_capacity(production.components.len());
        for component in &production.components {
            let symbol = if component.repeat.is_repeated() {
                let nt = self.rule_from_list(component, rule_name, position, out);
                position += 1;
                Symbol::NonTerminal(nt)
            } else if let Symbol::Group(group) = &component.symbol {
                let nt = self.rule_from_group(group, rule_name, position, out);
                position += 1;
                Symbol::NonTerminal(nt)
            } else {
                component.symbol.clone()
            };
            components.push(Component::new(symbol));
        }
        Production::new(components)
    }

    /// `x*` becomes `snt: | x snt` and `x+` becomes `snt: x | x snt`. A
    /// repeated group is first turned into its own rule.
    fn rule_from_list(
        &mut self,
        component: &Component,
        rule_name: &str,
        position: usize,
        out: &mut Vec<Rule>,
    ) -> NonTerminal {
        // The element rule is named after the list rule, so the list takes
        // its counter value first.
        let name = self.names.next(rule_name, SynthesisKind::List, position);
        let mut nested = Vec::new();
        let element = match &component.symbol {
            Symbol::Group(group) => Symbol::NonTerminal(self.rule_from_group(group, &name, 1, &mut nested)),
            symbol => symbol.clone(),
        };

        let first = if component.repeat == Repeat::NonEmptyList {
            Production::new(vec![element.clone().into()])
        } else {
            Production::empty()
        };
        let rest = Production::new(vec![
            element.into(),
            Symbol::NonTerminal(NonTerminal(name.clone())).into(),
        ]);
        trace!("synthesized list rule {}", name);
        out.push(Rule::new(&name, ProductionGroup::implicit(vec![first, rest])));
        out.extend(nested);
        NonTerminal(name)
    }

    /// `(a | b)` becomes `snt: a | b`, and `[a | b]` becomes `snt: | a | b`.
    fn rule_from_group(
        &mut self,
        group: &ProductionGroup,
        rule_name: &str,
        position: usize,
        out: &mut Vec<Rule>,
    ) -> NonTerminal {
        let kind = if group.optional {
            SynthesisKind::OptionalGroup
        } else {
            SynthesisKind::Group
        };
        let name = self.names.next(rule_name, kind, position);

        let mut nested = Vec::new();
        let mut productions = Vec::with_capacity(group.productions.len() + 1);
        if group.optional {
            productions.push(Production::empty());
        }
        for production in &group.productions {
            productions.push(self.transform_production(production, &name, 1, &mut nested));
        }
        trace!("synthesized group rule {}", name);
        out.push(Rule::new(&name, ProductionGroup::implicit(productions)));
        out.extend(nested);
        NonTerminal(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse_rules;

    struct TestCase {
        input: &'static str,
        out: &'static str,
    }

    fn parse(input: &str) -> GrammarDict {
        parse_rules(&tokenize(input, true).unwrap()).unwrap()
    }

    fn display(rules: &GrammarDict) -> String {
        rules
            .values()
            .map(|rule| format!("{}\n", rule))
            .collect()
    }

    #[test]
    fn synthesized_names() {
        let mut names = NameSynthesizer::new();
        assert_eq!(names.next("stmt", SynthesisKind::List, 1), "stmt__lst_1__1");
        assert_eq!(names.next("stmt", SynthesisKind::OptionalGroup, 2), "stmt__opt_grp_2__2");
        assert_eq!(names.next("expr", SynthesisKind::Group, 1), "expr__grp_1__3");
    }

    #[test]
    fn transform_grammar() {
        let tests = vec![
            TestCase {
                input: "stmt: 'if' expr ':' stmt ('elif' expr ':' stmt)* ['else' ':' stmt]\nexpr: NAME\n",
                out: "stmt: 'if' expr ':' stmt stmt__lst_1__1 stmt__opt_grp_2__3\n\
                      stmt__lst_1__1: | stmt__lst_1__1__grp_1__2 stmt__lst_1__1\n\
                      stmt__lst_1__1__grp_1__2: 'elif' expr ':' stmt\n\
                      stmt__opt_grp_2__3: | 'else' ':' stmt\n\
                      expr: NAME\n",
            },
            TestCase {
                input: "a: b+ | c [d (e | f)*]\n",
                out: "a: a__lst_1__1 | c a__opt_grp_2__2\n\
                      a__lst_1__1: b | b a__lst_1__1\n\
                      a__opt_grp_2__2: | d a__opt_grp_2__2__lst_1__3\n\
                      a__opt_grp_2__2__lst_1__3: | a__opt_grp_2__2__lst_1__3__grp_1__4 a__opt_grp_2__2__lst_1__3\n\
                      a__opt_grp_2__2__lst_1__3__grp_1__4: e | f\n",
            },
            TestCase {
                input: "a: (b | c) (d | e)\n",
                out: "a: a__grp_1__1 a__grp_2__2\n\
                      a__grp_1__1: b | c\n\
                      a__grp_2__2: d | e\n",
            },
            TestCase {
                input: "a: b*\nc: 'x' d* | ['y']\n",
                out: "a: a__lst_1__1\n\
                      a__lst_1__1: | b a__lst_1__1\n\
                      c: 'x' c__lst_1__2 | c__opt_grp_2__3\n\
                      c__lst_1__2: | d c__lst_1__2\n\
                      c__opt_grp_2__3: | 'y'\n",
            },
        ];

        for t in tests {
            let rules = Normalizer::new().transform_grammar(&parse(t.input)).unwrap();
            assert_eq!(display(&rules), t.out, "input: {:?}", t.input);
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = Normalizer::new()
            .transform_grammar(&parse("a: (b | [c])* d+ | [e]\n"))
            .unwrap();
        let twice = Normalizer::new().transform_grammar(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn normalized_rules_are_flat() {
        let rules = Normalizer::new()
            .transform_grammar(&parse("a: ((b c)+ | [d [e]])* f\n"))
            .unwrap();
        for rule in rules.values() {
            let group = rule.single_group().unwrap();
            assert!(group.implicit && !group.optional, "rule: {}", rule);
            for production in &group.productions {
                for component in &production.components {
                    assert_eq!(component.repeat, Repeat::None, "rule: {}", rule);
                    assert!(!matches!(component.symbol, Symbol::Group(_)), "rule: {}", rule);
                }
            }
        }
    }

    #[test]
    fn group_count() {
        let rule = Rule {
            name: "a".to_owned(),
            groups: vec![ProductionGroup::default(), ProductionGroup::default()],
        };
        let err = Normalizer::new().transform_rule(&rule).unwrap_err();
        assert_eq!(
            err,
            Error::GroupCount {
                rule: "a".to_owned(),
                count: 2,
            }
        );
    }

    #[test]
    fn synthesized_name_collision() {
        let err = Normalizer::new()
            .transform_grammar(&parse("a: b*\na__lst_1__1: c\n"))
            .unwrap_err();
        assert_eq!(err, Error::DuplicateRule("a__lst_1__1".to_owned()));
    }
}
