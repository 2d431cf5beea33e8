//! Pieces shared by the generators.

use grammar::{GrammarDescription, Production, ProductionGroup, Rule, Symbol, TokenCollection};

use crate::error::{Error, Result};

/// The rule's only group.
pub(crate) fn single_group(rule: &Rule) -> Result<&ProductionGroup> {
    let group = rule.single_group().ok_or_else(|| Error::Contract {
        rule: rule.name.clone(),
        groups: rule.groups.len(),
    })?;
    if group.productions.is_empty() {
        return Err(Error::EmptyGroup {
            rule: rule.name.clone(),
        });
    }
    Ok(group)
}

/// `rule` for a rule's only production, `rule-i` otherwise.
pub(crate) fn production_label(rule: &str, index: Option<usize>) -> String {
    match index {
        Some(i) => format!("{}-{}", rule, i),
        None => rule.to_owned(),
    }
}

/// The names the components of a production refer to, each with `prefix`.
pub(crate) fn component_names(
    desc: &GrammarDescription,
    rule: &Rule,
    production: &Production,
    prefix: &str,
) -> Result<Vec<String>> {
    production
        .components
        .iter()
        .map(|component| match &component.symbol {
            Symbol::Terminal(t) | Symbol::Literal(t) => desc
                .terminal_name(t)
                .map(|name| format!("{}{}", prefix, name))
                .ok_or_else(|| Error::UnnamedTerminal {
                    rule: rule.name.clone(),
                    terminal: t.to_string(),
                }),
            Symbol::NonTerminal(nt) => Ok(format!("{}{}", prefix, nt)),
            symbol => Err(Error::InvalidComponent {
                rule: rule.name.clone(),
                tag: symbol.tag(),
            }),
        })
        .collect()
}

pub(crate) fn token_tag(tokens: &TokenCollection, name: &str) -> Result<u32> {
    tokens
        .tag_of(name)
        .ok_or_else(|| Error::UntaggedToken(name.to_owned()))
}

/// `(tag, "NAME")`
pub(crate) fn token_pair(tokens: &TokenCollection, name: &str) -> Result<String> {
    Ok(format!("({}, \"{}\")", token_tag(tokens, name)?, name))
}

/// Combine elements pairwise from the right: `[a, b, c]` becomes
/// `combine(a, combine(b, c))`.
pub(crate) fn fold_right<F>(elements: Vec<String>, combine: F) -> String
where
    F: Fn(&str, &str) -> String,
{
    let mut elements = elements.into_iter().rev();
    let last = elements.next().unwrap_or_default();
    elements.fold(last, |acc, element| combine(&element, &acc))
}

/// Nest a sequence of three or more parts into binary sequence nodes, then
/// wrap it in a reduction that flattens it back out.
///
/// Intermediate nodes are labelled `BINRED-{i}-{label}`. `seq` receives the
/// intermediate label, the left part and the rest; `reduce` receives the
/// nesting depth and the nested sequence.
pub(crate) fn binary_sequence<S, R>(label: &str, parts: &[String], seq: S, reduce: R) -> String
where
    S: Fn(&str, &str, &str) -> String,
    R: Fn(usize, &str) -> String,
{
    let (last, init) = match parts.split_last() {
        Some(split) => split,
        None => return reduce(0, ""),
    };
    let nested = init
        .iter()
        .enumerate()
        .rev()
        .fold(last.clone(), |acc, (i, part)| {
            seq(&format!("BINRED-{}-{}", i + 1, label), part, &acc)
        });
    reduce(init.len(), &nested)
}

/// How a combinator library encodes tokens, productions and alternations.
pub(crate) trait Encoding {
    /// Prefix of every binding, e.g. `pwz_binary_rule_`.
    const PREFIX: &'static str;
    /// The combinator module the output opens.
    const MODULE: &'static str;

    fn token(&self, name: &str, tokens: &TokenCollection) -> Result<String>;

    /// `parts` are the prefixed names of the production's components.
    fn production(&self, label: &str, parts: &[String]) -> String;

    /// Called with at least two productions.
    fn alternation(&self, productions: Vec<String>) -> String;
}

/// Emit one recursive binding group: a binding per token, then a binding
/// per rule.
pub(crate) fn let_rec<E: Encoding>(encoding: &E, desc: &GrammarDescription) -> Result<Vec<String>> {
    let tokens = desc.tokens();
    let mut bindings = Vec::with_capacity(tokens.len() + desc.grammar().rules().len());

    for name in tokens.all() {
        bindings.push(format!("{}{} = {}", E::PREFIX, name, encoding.token(name, tokens)?));
    }

    for rule in desc.grammar().rules().values() {
        let group = single_group(rule)?;
        let single = group.productions.len() == 1;
        let mut productions = Vec::with_capacity(group.productions.len());
        for (i, production) in group.productions.iter().enumerate() {
            let label = production_label(&rule.name, if single { None } else { Some(i + 1) });
            let parts = component_names(desc, rule, production, E::PREFIX)?;
            productions.push(encoding.production(&label, &parts));
        }
        let body = if single {
            productions.remove(0)
        } else {
            encoding.alternation(productions)
        };
        bindings.push(format!("{}{} = {}", E::PREFIX, rule.name, body));
    }

    let text = format!(
        "open Pytokens\nopen {}\n\nlet rec {}\n",
        E::MODULE,
        bindings.join("\n    and ")
    );
    Ok(text.split('\n').map(str::to_owned).collect())
}
