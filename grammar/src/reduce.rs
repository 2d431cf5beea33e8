//! Inlines rules that only rename a single terminal or non-terminal.

use indexmap::IndexSet;
use log::{debug, trace};

use crate::error::{Error, Result};
use crate::{GrammarDict, ProductionGroup, Repeat, Rule, Symbol};

/// The symbol an alias rule stands for, or None if the rule is not an alias.
pub fn reduction_target(rule: &Rule) -> Option<&Symbol> {
    let group = rule.single_group()?;
    if group.optional || !group.implicit {
        return None;
    }
    let production = match group.productions.as_slice() {
        [production] => production,
        _ => return None,
    };
    match production.components.as_slice() {
        [component] if component.repeat == Repeat::None => match component.symbol {
            Symbol::Terminal(_) | Symbol::Literal(_) | Symbol::NonTerminal(_) => {
                Some(&component.symbol)
            }
            Symbol::Group(_) => None,
        },
        _ => None,
    }
}

pub fn is_alias(rule: &Rule) -> bool {
    reduction_target(rule).is_some()
}

/// Remove every alias rule, rewriting references to it into references to
/// its target. Aliases are processed in declaration order.
///
/// An alias of itself, or a chain of pending aliases leading back to the
/// rule being reduced, is an error.
pub fn reduce_aliases(rules: &mut GrammarDict) -> Result<()> {
    let mut pending: IndexSet<String> = rules
        .values()
        .filter(|rule| is_alias(rule))
        .map(|rule| rule.name.clone())
        .collect();

    let mut reduced = 0;
    while let Some(name) = pending.shift_remove_index(0) {
        let target = match rules.get(&name).and_then(reduction_target) {
            Some(target) => target.clone(),
            None => continue,
        };
        if let Symbol::NonTerminal(nt) = &target {
            if nt.0 == name {
                return Err(Error::SelfAlias(name));
            }
            if alias_cycle(rules, &pending, &name, &nt.0) {
                return Err(Error::CyclicAlias {
                    rule: name,
                    via: nt.0.clone(),
                });
            }
        }

        replace_references(rules, &name, &target);
        rules.shift_remove(&name);
        trace!("reduced alias {} to {}", name, target);
        reduced += 1;
    }
    debug!("reduced {} alias rules", reduced);
    Ok(())
}

/// Whether following pending aliases from `target` arrives back at `name`.
fn alias_cycle(rules: &GrammarDict, pending: &IndexSet<String>, name: &str, target: &str) -> bool {
    let mut current = target;
    for _ in 0..=pending.len() {
        if !pending.contains(current) {
            return false;
        }
        match rules.get(current).and_then(reduction_target) {
            Some(Symbol::NonTerminal(next)) if next.0 == name => return true,
            Some(Symbol::NonTerminal(next)) => current = &next.0,
            _ => return false,
        }
    }
    false
}

fn replace_references(rules: &mut GrammarDict, name: &str, replacement: &Symbol) {
    fn replace_in_group(group: &mut ProductionGroup, name: &str, replacement: &Symbol) {
        for production in &mut group.productions {
            for component in &mut production.components {
                if matches!(&component.symbol, Symbol::NonTerminal(nt) if nt.0 == name) {
                    component.symbol = replacement.clone();
                } else if let Symbol::Group(inner) = &mut component.symbol {
                    replace_in_group(inner, name, replacement);
                }
            }
        }
    }

    for rule in rules.values_mut() {
        if rule.name == name {
            continue;
        }
        for group in &mut rule.groups {
            replace_in_group(group, name, replacement);
        }
    }
}
